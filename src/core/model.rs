use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ZoneId = String;

/// Direction of a geofence crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Enter,
    Exit,
}

impl EventKind {
    /// Get the string representation used in messages and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Enter => "enter",
            EventKind::Exit => "exit",
        }
    }
}

/// A point reported by the geofence layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Zone definition as it looked when the crossing happened.
///
/// The caller owns zone lifecycle; the engine only keeps this frozen copy so
/// history stays meaningful after a zone is edited or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSnapshot {
    pub id: ZoneId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
    pub is_active: bool,
}

/// A processed crossing event. Immutable once appended to the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeZoneEvent {
    pub zone_id: ZoneId,
    pub kind: EventKind,
    pub zone: ZoneSnapshot,
    pub location: GeoPoint,
    pub timestamp: DateTime<Utc>,
}

/// Derived counters over the ledger. Computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub today_events: usize,
    pub today_enters: usize,
    pub today_exits: usize,
    pub total_events: usize,
    pub most_visited_zone: Option<ZoneId>,
    pub safety_score: f32,
}
