use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::ValidationError;

/// `2025-01-06T00:00:00` with optional fraction, as written by `utcnow().isoformat()`.
const NAIVE_ISO: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");

/// Instant a snapshot was taken, held in UTC.
///
/// Snapshot writers disagree on the stamp: `Z`, a local offset such as
/// `+09:00`, or no offset at all. Offsets are converted to UTC and a naive
/// stamp is read as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        if let Ok(stamped) = OffsetDateTime::parse(input, &Rfc3339) {
            return Ok(stamped.into());
        }

        PrimitiveDateTime::parse(input, NAIVE_ISO)
            .map(|naive| Self(naive.assume_utc()))
            .map_err(|_| ValidationError::InvalidTimestamp {
                value: input.to_owned(),
            })
    }

    pub fn format_rfc3339(self) -> String {
        self.0
            .format(&Rfc3339)
            .unwrap_or_else(|_| String::from("<unformattable>"))
    }
}

impl From<OffsetDateTime> for UtcDateTime {
    fn from(value: OffsetDateTime) -> Self {
        Self(value.to_offset(UtcOffset::UTC))
    }
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
    }
}

// Always written back as RFC3339 with a `Z` suffix.
impl Serialize for UtcDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_rfc3339())
    }
}

impl<'de> Deserialize<'de> for UtcDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zulu_and_zero_offset_read_the_same() {
        let zulu = UtcDateTime::parse("2025-03-04T09:30:00.123456Z").expect("zulu");
        let offset = UtcDateTime::parse("2025-03-04T09:30:00.123456+00:00").expect("offset");

        assert_eq!(zulu, offset);
        assert_eq!(offset.format_rfc3339(), "2025-03-04T09:30:00.123456Z");
    }

    #[test]
    fn local_offset_is_converted_to_utc() {
        let seoul = UtcDateTime::parse("2025-01-06T09:00:00+09:00").expect("offset stamp");

        assert_eq!(seoul.format_rfc3339(), "2025-01-06T00:00:00Z");
    }

    #[test]
    fn naive_stamp_is_read_as_utc() {
        let whole = UtcDateTime::parse("2025-01-06T00:00:00").expect("naive");
        let fraction = UtcDateTime::parse("2025-01-06T00:00:00.123456").expect("naive fraction");

        assert_eq!(whole.format_rfc3339(), "2025-01-06T00:00:00Z");
        assert_eq!(fraction.format_rfc3339(), "2025-01-06T00:00:00.123456Z");
    }

    #[test]
    fn rejects_non_timestamps() {
        for input in ["yesterday", "2025-01-06", ""] {
            assert!(matches!(
                UtcDateTime::parse(input),
                Err(ValidationError::InvalidTimestamp { .. })
            ));
        }
    }
}
