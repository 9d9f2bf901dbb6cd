use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use crate::TimestampError;

const ISO_LOCAL_T: &[FormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);
const ISO_LOCAL_SPACE: &[FormatItem<'static>] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"
);
const CLOCK: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second]");

/// Shortest all-digit value read as `YYYYMMDDHHMMSS` calendar digits.
const CALENDAR_DIGITS: usize = 14;

/// RFC3339 timestamp guaranteed to be UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn parse(input: &str) -> Result<Self, TimestampError> {
        let parsed = OffsetDateTime::parse(input, &Rfc3339).map_err(|_| {
            TimestampError::NotUtc {
                value: input.to_owned(),
            }
        })?;

        Self::from_offset_datetime(parsed)
    }

    pub fn from_offset_datetime(value: OffsetDateTime) -> Result<Self, TimestampError> {
        if value.offset() != UtcOffset::UTC {
            return Err(TimestampError::NotUtc {
                value: value
                    .format(&Rfc3339)
                    .unwrap_or_else(|_| String::from("<unformattable>")),
            });
        }

        Ok(Self(value))
    }

    /// Normalizes the timestamp shapes found in exchange exports.
    ///
    /// Tried in order:
    /// 1. RFC3339 with any offset (converted to UTC), or an ISO local
    ///    date-time without offset (read as UTC);
    /// 2. an all-digit value of 14+ digits sliced as `YYYYMMDDHHMMSS`,
    ///    trailing sub-second digits dropped;
    /// 3. an all-digit value read as a Unix epoch, its unit picked from the
    ///    digit count (ms up to 13 digits, µs up to 16, ns up to 19).
    ///
    /// Anything else is an error. There is no wall-clock fallback.
    pub fn parse_flexible(input: &str) -> Result<Self, TimestampError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TimestampError::Empty);
        }

        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            if trimmed.len() >= CALENDAR_DIGITS {
                if let Ok(parsed) = Self::from_calendar_digits(trimmed) {
                    return Ok(parsed);
                }
            }
            return Self::from_epoch_digits(trimmed);
        }

        if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
            return Ok(Self(parsed.to_offset(UtcOffset::UTC)));
        }

        PrimitiveDateTime::parse(trimmed, ISO_LOCAL_T)
            .or_else(|_| PrimitiveDateTime::parse(trimmed, ISO_LOCAL_SPACE))
            .map(|parsed| Self(parsed.assume_utc()))
            .map_err(|_| TimestampError::Unrecognized {
                value: trimmed.to_owned(),
            })
    }

    /// Reads `YYYYMMDDHHMMSS` from the first 14 digits.
    pub fn from_calendar_digits(digits: &str) -> Result<Self, TimestampError> {
        let out_of_range = || TimestampError::OutOfRange {
            value: digits.to_owned(),
        };
        if digits.len() < CALENDAR_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TimestampError::Unrecognized {
                value: digits.to_owned(),
            });
        }

        let field = |start: usize, end: usize| -> Result<u16, TimestampError> {
            digits[start..end].parse::<u16>().map_err(|_| out_of_range())
        };

        let year = i32::from(field(0, 4)?);
        let month = u8::try_from(field(4, 6)?).map_err(|_| out_of_range())?;
        let month = Month::try_from(month).map_err(|_| out_of_range())?;
        let day = u8::try_from(field(6, 8)?).map_err(|_| out_of_range())?;
        let hour = u8::try_from(field(8, 10)?).map_err(|_| out_of_range())?;
        let minute = u8::try_from(field(10, 12)?).map_err(|_| out_of_range())?;
        let second = u8::try_from(field(12, 14)?).map_err(|_| out_of_range())?;

        let date = Date::from_calendar_date(year, month, day).map_err(|_| out_of_range())?;
        let time = Time::from_hms(hour, minute, second).map_err(|_| out_of_range())?;
        Ok(Self(PrimitiveDateTime::new(date, time).assume_utc()))
    }

    fn from_epoch_digits(digits: &str) -> Result<Self, TimestampError> {
        let value = digits
            .parse::<i128>()
            .map_err(|_| TimestampError::OutOfRange {
                value: digits.to_owned(),
            })?;

        let nanos = match digits.len() {
            0..=13 => value * 1_000_000,
            14..=16 => value * 1_000,
            17..=19 => value,
            _ => {
                return Err(TimestampError::OutOfRange {
                    value: digits.to_owned(),
                })
            }
        };

        Self::from_unix_nanos(nanos).map_err(|_| TimestampError::OutOfRange {
            value: digits.to_owned(),
        })
    }

    pub fn from_unix_nanos(nanos: i128) -> Result<Self, TimestampError> {
        OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .map(Self)
            .map_err(|_| TimestampError::OutOfRange {
                value: nanos.to_string(),
            })
    }

    pub fn unix_nanos(self) -> i128 {
        self.0.unix_timestamp_nanos()
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    pub fn format_rfc3339(self) -> String {
        self.0
            .format(&Rfc3339)
            .expect("UtcDateTime must be RFC3339 formattable")
    }

    /// `HH:MM:SS`, the label format used on chart time axes.
    pub fn format_clock(self) -> String {
        self.0
            .format(CLOCK)
            .expect("UtcDateTime must be clock formattable")
    }
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
    }
}

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
