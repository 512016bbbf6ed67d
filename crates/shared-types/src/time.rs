//! Timestamp helpers.
//!
//! Product history and transaction dates use the naive
//! `YYYY-MM-DDTHH:MM:SS` form consumed by the dashboard; sub-second
//! precision is dropped everywhere so the serialized form and the hashed
//! form always agree.

use chrono::{NaiveDateTime, SubsecRound};

/// Wire format for history and transaction dates.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Truncate a timestamp to whole seconds.
#[inline]
pub fn whole_seconds(at: NaiveDateTime) -> NaiveDateTime {
    at.trunc_subsecs(0)
}

/// Serde adapter for `NaiveDateTime` in [`DATE_FORMAT`].
pub mod naive_seconds {
    use super::DATE_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(at: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&at.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for whole-second `DateTime<Utc>` (`YYYY-MM-DDTHH:MM:SSZ`).
///
/// Deserialization rejects any fractional second, so a stored block time
/// can never differ from the one that was hashed.
pub mod utc_seconds {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

    pub fn serialize<S>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&at.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let at = DateTime::parse_from_rfc3339(&raw)
            .map_err(serde::de::Error::custom)?
            .with_timezone(&Utc);
        if at.timestamp_subsec_nanos() != 0 {
            return Err(serde::de::Error::custom(format!(
                "block time {} has a fractional second",
                raw
            )));
        }
        Ok(at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_whole_seconds_drops_fraction() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_milli_opt(10, 15, 30, 750)
            .unwrap();
        let truncated = whole_seconds(at);
        assert_eq!(truncated.format(DATE_FORMAT).to_string(), "2024-03-01T10:15:30");
        assert_eq!(truncated.and_utc().timestamp_subsec_nanos(), 0);
    }

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Stamped {
        #[serde(with = "utc_seconds")]
        at: chrono::DateTime<chrono::Utc>,
    }

    #[test]
    fn test_utc_seconds_format() {
        use chrono::TimeZone;
        let stamped = Stamped {
            at: chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 1, 0).unwrap(),
        };
        let json = serde_json::to_string(&stamped).unwrap();
        assert_eq!(json, r#"{"at":"2024-01-01T00:01:00Z"}"#);
        assert_eq!(serde_json::from_str::<Stamped>(&json).unwrap(), stamped);
    }

    #[test]
    fn test_utc_seconds_rejects_fraction() {
        let json = r#"{"at":"2024-01-01T00:01:00.999Z"}"#;
        assert!(serde_json::from_str::<Stamped>(json).is_err());
    }
}
