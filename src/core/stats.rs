use std::collections::HashMap;

use chrono::{Local, NaiveDate};

use super::model::{EventKind, SafeZoneEvent, Statistics, ZoneId};

/// Compute derived statistics over ledger contents.
///
/// `today` is the caller's local calendar date; events are bucketed by the
/// local date of their timestamp. The computation is pure so the same ledger
/// and date always produce the same result.
pub fn compute(events: &[SafeZoneEvent], today: NaiveDate) -> Statistics {
    let mut today_events = 0;
    let mut today_enters = 0;
    let mut today_exits = 0;
    let mut enters = 0usize;
    let mut exits = 0usize;

    let mut visits: HashMap<&str, usize> = HashMap::new();
    // Zone ids in order of first appearance, for deterministic tie-breaking.
    let mut first_seen: Vec<&str> = Vec::new();

    for event in events {
        match event.kind {
            EventKind::Enter => enters += 1,
            EventKind::Exit => exits += 1,
        }

        let count = visits.entry(event.zone_id.as_str()).or_insert(0);
        if *count == 0 {
            first_seen.push(event.zone_id.as_str());
        }
        *count += 1;

        if event.timestamp.with_timezone(&Local).date_naive() == today {
            today_events += 1;
            match event.kind {
                EventKind::Enter => today_enters += 1,
                EventKind::Exit => today_exits += 1,
            }
        }
    }

    // Highest count wins; ties go to the zone that appeared first.
    let mut most_visited_zone: Option<ZoneId> = None;
    let mut best = 0;
    for zone in first_seen {
        let count = visits[zone];
        if count > best {
            best = count;
            most_visited_zone = Some(zone.to_string());
        }
    }

    Statistics {
        today_events,
        today_enters,
        today_exits,
        total_events: events.len(),
        most_visited_zone,
        safety_score: safety_score(enters, exits),
    }
}

/// Share of enter events in the ledger, scaled to 0-100 with one decimal.
/// An empty ledger scores 100: no recorded exits means nothing to flag.
fn safety_score(enters: usize, exits: usize) -> f32 {
    let total = enters + exits;
    if total == 0 {
        return 100.0;
    }
    let ratio = enters as f32 / total as f32;
    (ratio * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{GeoPoint, ZoneSnapshot};
    use chrono::{DateTime, Duration, Utc};

    fn make_event(zone_id: &str, kind: EventKind, timestamp: DateTime<Utc>) -> SafeZoneEvent {
        SafeZoneEvent {
            zone_id: zone_id.to_string(),
            kind,
            zone: ZoneSnapshot {
                id: zone_id.to_string(),
                name: zone_id.to_uppercase(),
                latitude: 51.9,
                longitude: 4.5,
                radius_meters: 200.0,
                is_active: true,
            },
            location: GeoPoint {
                latitude: 51.9,
                longitude: 4.5,
            },
            timestamp,
        }
    }

    fn today() -> NaiveDate {
        Utc::now().with_timezone(&Local).date_naive()
    }

    #[test]
    fn test_empty_ledger() {
        let stats = compute(&[], today());
        assert_eq!(stats.total_events, 0);
        assert_eq!(stats.today_events, 0);
        assert_eq!(stats.most_visited_zone, None);
        assert_eq!(stats.safety_score, 100.0);
    }

    #[test]
    fn test_today_filter_excludes_older_events() {
        let now = Utc::now();
        let events = vec![
            make_event("home", EventKind::Enter, now - Duration::days(2)),
            make_event("home", EventKind::Exit, now - Duration::days(2)),
            make_event("school", EventKind::Enter, now),
        ];

        let stats = compute(&events, today());
        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.today_events, 1);
        assert_eq!(stats.today_enters, 1);
        assert_eq!(stats.today_exits, 0);
    }

    #[test]
    fn test_most_visited_counts_occurrences() {
        let now = Utc::now();
        let events = vec![
            make_event("home", EventKind::Enter, now),
            make_event("school", EventKind::Enter, now),
            make_event("school", EventKind::Exit, now),
        ];

        let stats = compute(&events, today());
        assert_eq!(stats.most_visited_zone.as_deref(), Some("school"));
    }

    #[test]
    fn test_most_visited_tie_goes_to_first_seen() {
        let now = Utc::now();
        let events = vec![
            make_event("park", EventKind::Enter, now),
            make_event("home", EventKind::Enter, now),
            make_event("home", EventKind::Exit, now),
            make_event("park", EventKind::Exit, now),
        ];

        let stats = compute(&events, today());
        assert_eq!(stats.most_visited_zone.as_deref(), Some("park"));
    }

    #[test]
    fn test_safety_score_is_enter_share() {
        let now = Utc::now();
        let events = vec![
            make_event("home", EventKind::Enter, now),
            make_event("home", EventKind::Enter, now),
            make_event("home", EventKind::Exit, now),
        ];

        let stats = compute(&events, today());
        assert_eq!(stats.safety_score, 66.7);
    }

    #[test]
    fn test_statistics_are_deterministic() {
        let base = Utc::now();
        let events: Vec<_> = (0..10)
            .map(|i| {
                let kind = if i % 3 == 0 {
                    EventKind::Exit
                } else {
                    EventKind::Enter
                };
                make_event(&format!("z{}", i % 4), kind, base)
            })
            .collect();

        let first = compute(&events, today());
        let second = compute(&events, today());
        assert_eq!(first, second);
    }
}
