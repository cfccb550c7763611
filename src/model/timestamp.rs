use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

use crate::error::{Error, Result};

// Unix timestamp in milliseconds.
pub type Timestamp = i64;

pub trait TimestampTrait {
    fn to_rfc3339(&self) -> String;
}

impl TimestampTrait for Timestamp {
    fn to_rfc3339(&self) -> String {
        match Utc.timestamp_millis_opt(*self).single() {
            Some(ts) => ts.to_rfc3339_opts(SecondsFormat::Millis, true),
            None => self.to_string(),
        }
    }
}

pub fn now() -> Timestamp {
    Utc::now().timestamp_millis()
}

/// Converts collectd's fractional epoch seconds into a millisecond timestamp.
pub fn from_epoch_secs(secs: f64) -> Result<Timestamp> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(Error::from(format!("invalid sample time {}", secs)));
    }

    let millis = (secs * 1000.0).round();
    if millis >= Timestamp::MAX as f64 {
        return Err(Error::from(format!("sample time {} is out of range", secs)));
    }
    Ok(millis as Timestamp)
}

/// Largest millisecond timestamp not after `secs`. Saturates instead of
/// failing, so it suits deadlines computed from already validated samples.
pub fn floor_epoch_secs(secs: f64) -> Timestamp {
    (secs * 1000.0).floor() as Timestamp
}

pub fn parse_rfc3339(s: &str) -> Result<Timestamp> {
    s.parse::<DateTime<Utc>>()
        .map(|t| t.timestamp_millis())
        .map_err(|e| ("timestamp parsing failed", e).into())
}
