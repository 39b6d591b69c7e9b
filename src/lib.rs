#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
pub mod core;

pub use crate::core::alerts::channel::{NotificationChannel, RewardLedger};
pub use crate::core::engine::SafeZoneEngine;
pub use crate::core::error::{ChannelError, EngineError, StoreError};
pub use crate::core::model::{EventKind, GeoPoint, SafeZoneEvent, Statistics, ZoneSnapshot};
pub use crate::core::settings::{AlertSettings, QuietHours, SettingsPatch};
pub use crate::core::storage::{FileStore, KeyValueStore, MemoryStore};
