use chrono::Utc;

/// Three-way partition of a time window relative to a reference time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowState {
    /// The window has opened and not yet closed
    Active,
    /// The window has closed
    Expired,
    /// The window has not opened yet
    Pending,
}

/// Classify a time window against `now_ms`
///
/// Both bounds are inclusive and the active check runs first, so a window
/// whose end equals `now_ms` still counts as active for this pass. An
/// inverted window (start after end) can never be active and is expired as
/// soon as its end has passed.
pub fn classify_window(start_ms: i64, end_ms: i64, now_ms: i64) -> WindowState {
    if start_ms <= now_ms && now_ms <= end_ms {
        WindowState::Active
    } else if end_ms <= now_ms {
        WindowState::Expired
    } else {
        WindowState::Pending
    }
}

/// Parse an epoch-millisecond timestamp stored as text
pub fn parse_epoch_ms(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Current time as epoch milliseconds; read once per poller pass
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_active_between_its_bounds() {
        assert_eq!(classify_window(100, 200, 150), WindowState::Active);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        assert_eq!(classify_window(100, 200, 100), WindowState::Active);
        assert_eq!(classify_window(100, 200, 200), WindowState::Active);
    }

    #[test]
    fn active_wins_over_expired_at_the_end_boundary() {
        // end <= now also holds at now == end; the active check runs first
        assert_eq!(classify_window(200, 200, 200), WindowState::Active);
    }

    #[test]
    fn window_is_expired_once_past_its_end() {
        assert_eq!(classify_window(100, 200, 201), WindowState::Expired);
    }

    #[test]
    fn window_is_pending_before_its_start() {
        assert_eq!(classify_window(100, 200, 99), WindowState::Pending);
    }

    #[test]
    fn inverted_window_never_activates() {
        // start after end: pending until the end passes, then expired
        assert_eq!(classify_window(200, 100, 99), WindowState::Pending);
        assert_eq!(classify_window(200, 100, 150), WindowState::Expired);
        assert_eq!(classify_window(200, 100, 300), WindowState::Expired);
    }

    #[test]
    fn parse_accepts_plain_integers_only() {
        assert_eq!(parse_epoch_ms("1756080000000"), Some(1_756_080_000_000));
        assert_eq!(parse_epoch_ms(" 42 "), Some(42));
        assert_eq!(parse_epoch_ms("-5"), Some(-5));
        assert_eq!(parse_epoch_ms(""), None);
        assert_eq!(parse_epoch_ms("soon"), None);
        assert_eq!(parse_epoch_ms("1.5e3"), None);
    }
}
