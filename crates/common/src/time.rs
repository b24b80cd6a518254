//! Elapsed-time formatting and timestamp (de)serialization for stored documents.

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::{Error, Result};

/// Whole seconds elapsed between two points in time.
///
/// Negative spans (clock skew, timestamps written in the future) clamp to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Elapsed {
    secs: u64,
}

impl Elapsed {
    #[must_use]
    pub fn from_secs(secs: u64) -> Self {
        Self { secs }
    }

    #[must_use]
    pub fn between(since: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let secs = (now - since).num_seconds().max(0) as u64;
        Self { secs }
    }

    #[must_use]
    pub fn as_secs(self) -> u64 {
        self.secs
    }

    #[must_use]
    pub fn minutes(self) -> u64 {
        self.secs / 60
    }

    #[must_use]
    pub fn seconds(self) -> u64 {
        self.secs % 60
    }

    /// `"45 seconds ago"` below one minute, else `"2 minutes and 5 seconds ago"`.
    #[must_use]
    pub fn ago(self) -> String {
        if self.secs < 60 {
            format!("{} seconds ago", self.secs)
        } else {
            format!(
                "{} minutes and {} seconds ago",
                self.minutes(),
                self.seconds()
            )
        }
    }

    /// Always minutes and seconds: `"0 minutes and 7 seconds"`.
    #[must_use]
    pub fn away_for(self) -> String {
        format!("{} minutes and {} seconds", self.minutes(), self.seconds())
    }

    /// `"45 seconds"` below one minute, else `"2m 5s"`. No hours bucket.
    #[must_use]
    pub fn compact(self) -> String {
        if self.secs < 60 {
            format!("{} seconds", self.secs)
        } else {
            format!("{}m {}s", self.minutes(), self.seconds())
        }
    }
}

/// Parse an ISO-8601 timestamp.
///
/// RFC 3339 strings keep their offset. Naive timestamps without an offset
/// were written as host wall-clock time and are read in the local zone.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    parse_timestamp_in(value, &Local)
}

/// [`parse_timestamp`] with naive values interpreted in `zone`.
///
/// A wall-clock time skipped by a DST transition has no local instant and
/// falls back to UTC; an ambiguous one takes the earlier instant.
pub fn parse_timestamp_in<Tz: TimeZone>(value: &str, zone: &Tz) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = value
        .parse::<NaiveDateTime>()
        .map_err(|_| Error::invalid_timestamp(value))?;
    Ok(zone
        .from_local_datetime(&naive)
        .earliest()
        .map_or_else(|| naive.and_utc(), |dt| dt.with_timezone(&Utc)))
}

#[must_use]
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// `#[serde(with = "warden_common::time::timestamp")]` for `DateTime<Utc>` fields.
pub mod timestamp {
    use {
        chrono::{DateTime, Utc},
        serde::{Deserialize, Deserializer, Serializer, de},
    };

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(de::Error::custom)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, chrono::FixedOffset, rstest::rstest};

    #[rstest]
    #[case(0, "0 seconds ago")]
    #[case(45, "45 seconds ago")]
    #[case(59, "59 seconds ago")]
    #[case(60, "1 minutes and 0 seconds ago")]
    #[case(125, "2 minutes and 5 seconds ago")]
    #[case(7384, "123 minutes and 4 seconds ago")]
    fn ago_buckets(#[case] secs: u64, #[case] expected: &str) {
        assert_eq!(Elapsed::from_secs(secs).ago(), expected);
    }

    #[rstest]
    #[case(7, "7 seconds")]
    #[case(61, "1m 1s")]
    #[case(3725, "62m 5s")]
    fn compact_has_no_hours_bucket(#[case] secs: u64, #[case] expected: &str) {
        assert_eq!(Elapsed::from_secs(secs).compact(), expected);
    }

    #[test]
    fn away_for_always_shows_minutes() {
        assert_eq!(Elapsed::from_secs(7).away_for(), "0 minutes and 7 seconds");
        assert_eq!(Elapsed::from_secs(125).away_for(), "2 minutes and 5 seconds");
    }

    #[test]
    fn between_clamps_future_timestamps() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let later = now + chrono::Duration::seconds(30);
        assert_eq!(Elapsed::between(later, now).as_secs(), 0);
        assert_eq!(Elapsed::between(now, later).as_secs(), 30);
    }

    #[test]
    fn parses_rfc3339_and_naive() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(parse_timestamp("2025-03-04T05:06:07Z").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2025-03-04T07:06:07+02:00").unwrap(),
            expected
        );
        let micros = parse_timestamp("2025-03-04T05:06:07.123456").unwrap();
        assert_eq!(micros.timestamp_subsec_micros(), 123_456);
    }

    #[rstest]
    #[case(0, "2025-03-04T05:06:07")]
    #[case(2 * 3600, "2025-03-04T07:06:07")]
    #[case(-5 * 3600, "2025-03-04T00:06:07")]
    fn naive_timestamps_use_the_given_zone(#[case] offset_secs: i32, #[case] raw: &str) {
        let zone = FixedOffset::east_opt(offset_secs).unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(parse_timestamp_in(raw, &zone).unwrap(), expected);
    }

    #[test]
    fn naive_timestamps_default_to_local_time() {
        let naive: NaiveDateTime = "2025-03-04T05:06:07".parse().unwrap();
        let expected = Local
            .from_local_datetime(&naive)
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parse_timestamp("2025-03-04T05:06:07").unwrap(), expected);
    }

    #[test]
    fn offsets_ignore_the_given_zone() {
        let zone = FixedOffset::east_opt(9 * 3600).unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(
            parse_timestamp_in("2025-03-04T05:06:07Z", &zone).unwrap(),
            expected
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(Error::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn serde_roundtrip_keeps_precision() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Wrapper {
            #[serde(with = "timestamp")]
            at: DateTime<Utc>,
        }

        let at = Utc::now();
        let json = serde_json::to_string(&Wrapper { at }).unwrap();
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.at, at);
    }
}
