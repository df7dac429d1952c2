use chrono::{DateTime, Utc};

/// All timestamps are UTC.
pub type Timestamp = DateTime<Utc>;

/// Opaque holder token handed out on a successful claim.
pub type Token = String;

/// Current time truncated to whole milliseconds, the precision timestamps are
/// stored and sent with.
pub fn now() -> Timestamp {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
