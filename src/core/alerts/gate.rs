// Notification gating - per-zone cooldowns and the quiet-hours window.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::core::settings::{parse_clock, QuietHours};

/// Tracks when each zone last produced an active notification.
///
/// In-memory only by design: cooldowns are a UX smoothing concern, so losing
/// them on restart is acceptable.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    last_notified: HashMap<String, DateTime<Utc>>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A zone is cooling down when it notified less than `cooldown_minutes`
    /// ago, regardless of crossing direction. A cooldown of 0 never
    /// suppresses.
    pub fn is_active(&self, zone_id: &str, now: DateTime<Utc>, cooldown_minutes: u32) -> bool {
        if cooldown_minutes == 0 {
            return false;
        }
        match self.last_notified.get(zone_id) {
            Some(last) => {
                now.signed_duration_since(*last) < Duration::minutes(i64::from(cooldown_minutes))
            }
            None => false,
        }
    }

    pub fn mark(&mut self, zone_id: &str, now: DateTime<Utc>) {
        self.last_notified.insert(zone_id.to_string(), now);
    }
}

/// Whether `t` falls inside the window. A window whose start is later than
/// its end spans midnight: active if `t >= start || t < end`.
pub fn within_window(t: NaiveTime, start: NaiveTime, end: NaiveTime) -> bool {
    if start > end {
        t >= start || t < end
    } else {
        t >= start && t < end
    }
}

/// Whether alerts are muted at local time `t`. A stored window that fails to
/// parse never mutes, so a bad payload cannot silence the engine.
pub fn is_quiet(quiet: &QuietHours, t: NaiveTime) -> bool {
    if !quiet.enabled {
        return false;
    }
    match (parse_clock(&quiet.start), parse_clock(&quiet.end)) {
        (Some(start), Some(end)) => within_window(t, start, end),
        _ => false,
    }
}
