//! Access request sent to the daemon
//!
//! Wire format: one JSON document per connection, no length prefix. The
//! daemon reads until the client closes the connection.
//!
//! ```json
//! {"user":"alice","mac":"AA:BB:CC:DD:EE:FF","duration":7200000000000}
//! ```
//!
//! `duration` is an integer number of nanoseconds.

use crate::{Error, Result, DEFAULT_DURATION_HOURS, MAX_DURATION_HOURS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SECS_PER_HOUR: u64 = 3600;

/// Clamp requested hours into (0h, 4h]
pub fn clamp_hours(hours: i64) -> Duration {
    let hours = if hours <= 0 {
        DEFAULT_DURATION_HOURS
    } else {
        (hours as u64).min(MAX_DURATION_HOURS)
    };
    Duration::from_secs(hours * SECS_PER_HOUR)
}

/// Grant request: allow `mac` on the network for `duration` on behalf of
/// the authenticated `user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessRequest {
    user: String,
    mac: String,
    #[serde(with = "duration_nanos")]
    duration: Duration,
}

impl AccessRequest {
    /// The MAC is kept exactly as entered; the hours are clamped.
    pub fn new(user: impl Into<String>, mac: impl Into<String>, hours: i64) -> Self {
        Self {
            user: user.into(),
            mac: mac.into(),
            duration: clamp_hours(hours),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn mac(&self) -> &str {
        &self.mac
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a payload as the daemon receives it. Unknown fields and
    /// durations outside (0h, 4h] are rejected.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let request: Self = serde_json::from_slice(payload)?;

        let max = Duration::from_secs(MAX_DURATION_HOURS * SECS_PER_HOUR);
        if request.duration.is_zero() || request.duration > max {
            return Err(Error::Validation(format!(
                "duration {:?} outside (0h, {}h]",
                request.duration, MAX_DURATION_HOURS
            )));
        }

        Ok(request)
    }

    /// `<mac>\t<user>\t<duration>` line shown after a successful send
    pub fn summary(&self) -> String {
        format!("{}\t{}\t{}", self.mac, self.user, format_duration(self.duration))
    }
}

/// Render as `2h0m0s`
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!(
        "{}h{}m{}s",
        secs / SECS_PER_HOUR,
        (secs % SECS_PER_HOUR) / 60,
        secs % 60
    )
}

mod duration_nanos {
    use serde::{de, ser, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = u64::try_from(duration.as_nanos())
            .map_err(|_| <S::Error as ser::Error>::custom("duration overflows u64 nanoseconds"))?;
        serializer.serialize_u64(nanos)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let nanos = i64::deserialize(deserializer)?;
        if nanos < 0 {
            return Err(<D::Error as de::Error>::custom("negative duration"));
        }
        Ok(Duration::from_nanos(nanos as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn test_clamp_hours() {
        assert_eq!(clamp_hours(i64::MIN), HOUR);
        assert_eq!(clamp_hours(-3), HOUR);
        assert_eq!(clamp_hours(0), HOUR);
        for hours in 1..=4 {
            assert_eq!(clamp_hours(hours), HOUR * hours as u32);
        }
        assert_eq!(clamp_hours(5), HOUR * 4);
        assert_eq!(clamp_hours(99), HOUR * 4);
        assert_eq!(clamp_hours(i64::MAX), HOUR * 4);
    }

    #[test]
    fn test_wire_fields() {
        let request = AccessRequest::new("alice", "AA:BB:CC:DD:EE:FF", 2);
        let payload = request.encode().unwrap();

        let value: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["duration", "mac", "user"]);
        assert_eq!(object["user"], "alice");
        assert_eq!(object["mac"], "AA:BB:CC:DD:EE:FF");
        assert_eq!(object["duration"], 7_200_000_000_000u64);
    }

    #[test]
    fn test_decode_reproduces_request() {
        let request = AccessRequest::new("bob", "not-a-mac", 99);
        let decoded = AccessRequest::decode(&request.encode().unwrap()).unwrap();

        assert_eq!(decoded, request);
        assert_eq!(decoded.duration(), HOUR * 4);
        assert_eq!(decoded.mac(), "not-a-mac");
    }

    #[test]
    fn test_decode_rejects_extra_fields() {
        let payload = br#"{"user":"a","mac":"m","duration":3600000000000,"admin":true}"#;
        assert!(matches!(
            AccessRequest::decode(payload),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_decode_rejects_out_of_range_duration() {
        let zero = br#"{"user":"a","mac":"m","duration":0}"#;
        assert!(matches!(AccessRequest::decode(zero), Err(Error::Validation(_))));

        let five_hours = br#"{"user":"a","mac":"m","duration":18000000000000}"#;
        assert!(matches!(
            AccessRequest::decode(five_hours),
            Err(Error::Validation(_))
        ));

        let negative = br#"{"user":"a","mac":"m","duration":-1}"#;
        assert!(AccessRequest::decode(negative).is_err());
    }

    #[test]
    fn test_summary() {
        let request = AccessRequest::new("alice", "AA:BB:CC:DD:EE:FF", 2);
        assert_eq!(request.summary(), "AA:BB:CC:DD:EE:FF\talice\t2h0m0s");
    }
}
