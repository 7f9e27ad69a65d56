//! Durable prompt records
//!
//! Timestamped flags in local storage: iOS install-prompt dismissal,
//! notification re-ask throttling, and visit tracking for the delayed
//! install nudge. Expiry is checked against the wall clock on every read;
//! unavailable storage reads as "no record".

use chrono::{DateTime, Duration, Utc};
use messhub_platform::{Clock, LocalStorage};

pub const IOS_INSTALL_PROMPT_KEY: &str = "ios-install-prompt-shown";
pub const NOTIFICATION_ASKED_KEY: &str = "notification-permission-asked";
pub const VISIT_COUNT_KEY: &str = "pwa-visit-count";
pub const LAST_VISIT_KEY: &str = "pwa-last-visit";

/// Days before the iOS install instructions may reappear
pub const IOS_REPROMPT_DAYS: i64 = 14;
/// Days before the notification prompt may ask again
pub const NOTIFICATION_REASK_DAYS: i64 = 7;
/// Visits before the install nudge engages
pub const INSTALL_NUDGE_MIN_VISITS: u32 = 3;

fn read_timestamp(storage: &LocalStorage, key: &str) -> Option<DateTime<Utc>> {
    let raw = storage.get_item(key).ok().flatten()?;
    match raw.parse::<DateTime<Utc>>() {
        Ok(at) => Some(at),
        Err(_) => {
            tracing::debug!(key, value = %raw, "ignoring unparseable record");
            None
        }
    }
}

fn write_timestamp(storage: &LocalStorage, key: &str, at: DateTime<Utc>) {
    if storage.set_item(key, &at.to_rfc3339()).is_err() {
        tracing::debug!(key, "storage unavailable, record not written");
    }
}

/// Whether an unexpired iOS dismissal record suppresses the instructions
pub fn ios_prompt_suppressed(storage: &LocalStorage, clock: &Clock) -> bool {
    match read_timestamp(storage, IOS_INSTALL_PROMPT_KEY) {
        Some(until) => clock.now() < until,
        None => false,
    }
}

/// Record an iOS dismissal, suppressing the instructions for 14 days
pub fn record_ios_dismissal(storage: &LocalStorage, clock: &Clock) {
    let until = clock.now() + Duration::days(IOS_REPROMPT_DAYS);
    write_timestamp(storage, IOS_INSTALL_PROMPT_KEY, until);
}

/// Whether a notification ask within the last 7 days throttles re-asking
pub fn notification_ask_throttled(storage: &LocalStorage, clock: &Clock) -> bool {
    match read_timestamp(storage, NOTIFICATION_ASKED_KEY) {
        Some(asked) => clock.now() - asked < Duration::days(NOTIFICATION_REASK_DAYS),
        None => false,
    }
}

/// Record that the user was just asked about notifications
pub fn record_notification_asked(storage: &LocalStorage, clock: &Clock) {
    write_timestamp(storage, NOTIFICATION_ASKED_KEY, clock.now());
}

/// Count this visit and stamp its time; returns the new total
pub fn record_visit(storage: &LocalStorage, clock: &Clock) -> u32 {
    let count = visit_count(storage).saturating_add(1);
    if storage.set_item(VISIT_COUNT_KEY, &count.to_string()).is_err() {
        tracing::debug!("storage unavailable, visit not counted");
    }
    write_timestamp(storage, LAST_VISIT_KEY, clock.now());
    count
}

/// Visits recorded so far
pub fn visit_count(storage: &LocalStorage) -> u32 {
    storage
        .get_item(VISIT_COUNT_KEY)
        .ok()
        .flatten()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(0)
}

/// Time of the last recorded visit
pub fn last_visit(storage: &LocalStorage) -> Option<DateTime<Utc>> {
    read_timestamp(storage, LAST_VISIT_KEY)
}

/// Whether enough visits have accumulated to nudge about installing
pub fn install_nudge_ready(storage: &LocalStorage) -> bool {
    visit_count(storage) >= INSTALL_NUDGE_MIN_VISITS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> (LocalStorage, Clock) {
        (
            LocalStorage::new(),
            Clock::fixed("2026-02-01T09:00:00Z".parse().unwrap()),
        )
    }

    #[test]
    fn test_ios_dismissal_expires_after_fourteen_days() {
        let (storage, clock) = env();
        assert!(!ios_prompt_suppressed(&storage, &clock));

        record_ios_dismissal(&storage, &clock);
        assert!(ios_prompt_suppressed(&storage, &clock));

        clock.advance(Duration::days(13));
        assert!(ios_prompt_suppressed(&storage, &clock));

        clock.advance(Duration::days(2));
        assert!(!ios_prompt_suppressed(&storage, &clock));
    }

    #[test]
    fn test_notification_throttle_lapses_after_seven_days() {
        let (storage, clock) = env();
        assert!(!notification_ask_throttled(&storage, &clock));

        record_notification_asked(&storage, &clock);
        assert!(notification_ask_throttled(&storage, &clock));

        clock.advance(Duration::days(6));
        assert!(notification_ask_throttled(&storage, &clock));

        clock.advance(Duration::days(2));
        assert!(!notification_ask_throttled(&storage, &clock));
    }

    #[test]
    fn test_garbage_record_reads_as_absent() {
        let (storage, clock) = env();
        storage.set_item(IOS_INSTALL_PROMPT_KEY, "not-a-date").unwrap();
        assert!(!ios_prompt_suppressed(&storage, &clock));
    }

    #[test]
    fn test_unavailable_storage_reads_as_no_record() {
        let (storage, clock) = env();
        record_ios_dismissal(&storage, &clock);
        record_notification_asked(&storage, &clock);

        storage.set_available(false);
        assert!(!ios_prompt_suppressed(&storage, &clock));
        assert!(!notification_ask_throttled(&storage, &clock));
        assert_eq!(visit_count(&storage), 0);
        // Writes are swallowed, not fatal
        record_ios_dismissal(&storage, &clock);
        assert_eq!(record_visit(&storage, &clock), 1);
    }

    #[test]
    fn test_visit_tracking_gates_nudge() {
        let (storage, clock) = env();
        assert!(!install_nudge_ready(&storage));

        assert_eq!(record_visit(&storage, &clock), 1);
        clock.advance(Duration::days(1));
        assert_eq!(record_visit(&storage, &clock), 2);
        assert!(!install_nudge_ready(&storage));

        clock.advance(Duration::days(1));
        assert_eq!(record_visit(&storage, &clock), 3);
        assert!(install_nudge_ready(&storage));
        assert_eq!(last_visit(&storage), Some(clock.now()));
    }
}
