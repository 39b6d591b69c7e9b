//! Engine façade orchestrating settings, history, gating, and persistence.
//!
//! The engine is a single logical actor: every mutating operation serializes
//! on an internal write gate held across the mutate-then-persist sequence,
//! while reads take snapshots of the in-memory state. Persistence is
//! best-effort durability; an event counts as handled once the in-memory
//! state is updated.

use std::sync::{Arc, RwLock};

use chrono::{Local, Utc};
use tokio::sync::Mutex;

use super::alerts::channel::{NotificationChannel, RewardLedger};
use super::alerts::dispatcher::NotificationDispatcher;
use super::alerts::gate::{self, CooldownTracker};
use super::error::EngineError;
use super::history::EventLedger;
use super::model::{EventKind, GeoPoint, SafeZoneEvent, Statistics, ZoneSnapshot};
use super::settings::{AlertSettings, SettingsPatch};
use super::stats;
use super::storage::{KeyValueStore, RetryingStore};

/// Persisted key for the alert settings payload.
pub const SETTINGS_KEY: &str = "safe_zone_alert_settings";
/// Persisted key for the event history payload.
pub const HISTORY_KEY: &str = "safe_zone_event_history";

struct EngineState {
    settings: AlertSettings,
    ledger: EventLedger,
    cooldowns: CooldownTracker,
}

/// Safe zone alert engine.
///
/// Constructed with its collaborators injected; usable before `initialize`
/// (defaults apply) and after any storage fault (in-memory state stays
/// authoritative).
pub struct SafeZoneEngine {
    state: RwLock<EngineState>,
    // Serializes handle_safe_zone_event / update_settings / clear_event_history
    // so concurrent callers cannot interleave mutate-then-persist sequences.
    write_gate: Mutex<()>,
    store: RetryingStore,
    dispatcher: NotificationDispatcher,
}

impl SafeZoneEngine {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        channel: Arc<dyn NotificationChannel>,
        rewards: Arc<dyn RewardLedger>,
    ) -> Self {
        Self {
            state: RwLock::new(EngineState {
                settings: AlertSettings::default(),
                ledger: EventLedger::new(),
                cooldowns: CooldownTracker::new(),
            }),
            write_gate: Mutex::new(()),
            store: RetryingStore::new(store),
            dispatcher: NotificationDispatcher::new(channel, rewards),
        }
    }

    /// Load persisted settings and history.
    ///
    /// Anything that fails to load (storage error, missing key, corrupt or
    /// out-of-range payload) falls back to defaults; this never errors.
    pub async fn initialize(&self) {
        let _guard = self.write_gate.lock().await;

        let settings = match self.store.get_json::<AlertSettings>(SETTINGS_KEY).await {
            Some(loaded) if loaded.validate().is_ok() => loaded,
            Some(_) => {
                log::warn!("persisted settings out of range, using defaults");
                AlertSettings::default()
            }
            None => AlertSettings::default(),
        };
        let events = self
            .store
            .get_json::<Vec<SafeZoneEvent>>(HISTORY_KEY)
            .await
            .unwrap_or_default();

        let mut state = self.state.write().unwrap();
        state.settings = settings;
        state.ledger = EventLedger::from_events(events);
    }

    /// Snapshot of the current settings. Fully populated even before
    /// `initialize` has run.
    pub fn settings(&self) -> AlertSettings {
        self.state.read().unwrap().settings.clone()
    }

    /// Merge and apply a settings update.
    ///
    /// The merged value is validated before anything changes; a rejected
    /// update leaves settings exactly as they were. A successful update is
    /// applied in memory and persisted best-effort.
    pub async fn update_settings(&self, patch: SettingsPatch) -> Result<(), EngineError> {
        let _guard = self.write_gate.lock().await;

        let merged = self.state.read().unwrap().settings.merged(patch);
        merged.validate()?;

        self.state.write().unwrap().settings = merged.clone();
        self.store.set_json(SETTINGS_KEY, &merged).await;
        Ok(())
    }

    /// Process one geofence crossing.
    ///
    /// The event is validated, appended to the ledger (evicting the oldest
    /// entry beyond capacity), persisted best-effort, and then, unless quiet
    /// hours or the zone's cooldown suppress it, dispatched to the
    /// notification hooks. Only validation failures are returned; storage and
    /// channel faults are logged and swallowed.
    pub async fn handle_safe_zone_event(
        &self,
        zone_id: &str,
        kind: EventKind,
        zone: ZoneSnapshot,
        location: GeoPoint,
    ) -> Result<(), EngineError> {
        if zone_id.trim().is_empty() || !location.is_finite() {
            return Err(EngineError::InvalidParameters);
        }

        let _guard = self.write_gate.lock().await;
        let now = Utc::now();
        let event = SafeZoneEvent {
            zone_id: zone_id.to_string(),
            kind,
            zone,
            location,
            timestamp: now,
        };

        // Record first: quiet hours and cooldowns mute alerts, not history.
        let (history, settings, should_notify) = {
            let mut state = self.state.write().unwrap();
            state.ledger.push(event.clone());

            let local_time = now.with_timezone(&Local).time();
            let quiet = gate::is_quiet(&state.settings.quiet_hours, local_time);
            let cooling =
                state
                    .cooldowns
                    .is_active(zone_id, now, state.settings.alert_cooldown_minutes);
            let should_notify = !quiet && !cooling;
            if should_notify {
                state.cooldowns.mark(zone_id, now);
            }

            (state.ledger.to_vec(), state.settings.clone(), should_notify)
        };

        self.store.set_json(HISTORY_KEY, &history).await;

        if should_notify {
            self.dispatcher.dispatch(&event, &settings);
        }
        Ok(())
    }

    /// Chronological snapshot of the ledger (oldest first).
    pub fn event_history(&self) -> Vec<SafeZoneEvent> {
        self.state.read().unwrap().ledger.to_vec()
    }

    /// Empty the ledger and persist the empty state best-effort.
    pub async fn clear_event_history(&self) {
        let _guard = self.write_gate.lock().await;
        self.state.write().unwrap().ledger.clear();
        self.store
            .set_json(HISTORY_KEY, &Vec::<SafeZoneEvent>::new())
            .await;
    }

    /// Statistics derived from the current ledger and today's local date.
    pub fn statistics(&self) -> Statistics {
        let events = self.state.read().unwrap().ledger.to_vec();
        stats::compute(&events, Local::now().date_naive())
    }
}
