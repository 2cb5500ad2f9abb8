//! Time-slot resolution.
//!
//! A [`Resolution`] is the width of one discrete time slot used when a time id
//! is derived from a timestamp. It is parsed from a short spec such as `15min`,
//! `15T`, `1h` or `30s`.

use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * 60;
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Errors returned when parsing a [`Resolution`] spec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseResolutionError {
    /// The spec was empty or whitespace.
    #[error("resolution is empty")]
    Empty,

    /// The numeric prefix could not be parsed.
    #[error("invalid number '{number}' in resolution '{spec}'")]
    InvalidNumber { spec: String, number: String },

    /// The numeric prefix was zero.
    #[error("resolution must be > 0 in '{spec}'")]
    NonPositive { spec: String },

    /// The unit suffix is not supported.
    #[error("unknown resolution unit '{unit}' in '{spec}' (expected s|min|T|h|d)")]
    UnknownUnit { spec: String, unit: String },

    /// The slot width does not split a day into whole slots.
    #[error("resolution '{spec}' ({seconds}s) does not evenly divide a day")]
    NotDayDivisor { spec: String, seconds: u64 },
}

/// Width of one time slot, in whole seconds.
///
/// Slots are counted from midnight, so the width must divide a day evenly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Resolution {
    seconds: u32,
}

impl Resolution {
    /// Parse a resolution spec (e.g. `15min`, `15T`, `1h`, `30s`).
    ///
    /// # Errors
    /// Returns [`ParseResolutionError`] if the spec is empty, has an invalid
    /// or zero count, uses an unknown unit, or does not divide a day.
    pub fn parse(spec: &str) -> Result<Self, ParseResolutionError> {
        spec.parse()
    }

    /// Resolution of `minutes` minutes.
    pub fn minutes(minutes: u32) -> Result<Self, ParseResolutionError> {
        Self::from_seconds(u64::from(minutes) * SECONDS_PER_MINUTE, &format!("{minutes}min"))
    }

    fn from_seconds(seconds: u64, spec: &str) -> Result<Self, ParseResolutionError> {
        if seconds == 0 {
            return Err(ParseResolutionError::NonPositive {
                spec: spec.to_string(),
            });
        }
        if seconds > SECONDS_PER_DAY || SECONDS_PER_DAY % seconds != 0 {
            return Err(ParseResolutionError::NotDayDivisor {
                spec: spec.to_string(),
                seconds,
            });
        }
        Ok(Self {
            seconds: seconds as u32,
        })
    }

    pub fn as_seconds(&self) -> i64 {
        i64::from(self.seconds)
    }

    pub fn as_duration(&self) -> TimeDelta {
        TimeDelta::seconds(self.as_seconds())
    }

    /// Number of slots in one day.
    pub fn slots_per_day(&self) -> i64 {
        (SECONDS_PER_DAY / u64::from(self.seconds)) as i64
    }

    /// Slot index for an offset from midnight, in seconds.
    pub fn slot_of(&self, seconds_since_midnight: i64) -> i64 {
        seconds_since_midnight.div_euclid(self.as_seconds())
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            seconds: (15 * SECONDS_PER_MINUTE) as u32,
        }
    }
}

impl FromStr for Resolution {
    type Err = ParseResolutionError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let spec = input.trim();
        if spec.is_empty() {
            return Err(ParseResolutionError::Empty);
        }

        // Split into numeric prefix + unit suffix (unit starts at first alphabetic char).
        let unit_start = spec
            .char_indices()
            .find(|(_, c)| c.is_ascii_alphabetic())
            .map_or(spec.len(), |(i, _)| i);
        let (num_str, unit_str) = spec.split_at(unit_start);
        let num_str = num_str.trim();

        // A bare unit means one of it ("T" is one minute)
        let count: u64 = if num_str.is_empty() {
            1
        } else {
            num_str
                .parse()
                .map_err(|_| ParseResolutionError::InvalidNumber {
                    spec: spec.to_string(),
                    number: num_str.to_string(),
                })?
        };
        if count == 0 {
            return Err(ParseResolutionError::NonPositive {
                spec: spec.to_string(),
            });
        }

        let unit_seconds = match unit_str.trim() {
            "s" | "S" | "sec" | "secs" | "second" | "seconds" => 1,
            "T" | "m" | "min" | "mins" | "minute" | "minutes" => SECONDS_PER_MINUTE,
            "h" | "H" | "hr" | "hrs" | "hour" | "hours" => SECONDS_PER_HOUR,
            "d" | "D" | "day" | "days" => SECONDS_PER_DAY,
            other => {
                return Err(ParseResolutionError::UnknownUnit {
                    spec: spec.to_string(),
                    unit: other.to_string(),
                });
            }
        };

        let seconds = count.saturating_mul(unit_seconds);
        Self::from_seconds(seconds, spec)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = u64::from(self.seconds);
        if secs % SECONDS_PER_DAY == 0 {
            write!(f, "{}d", secs / SECONDS_PER_DAY)
        } else if secs % SECONDS_PER_HOUR == 0 {
            write!(f, "{}h", secs / SECONDS_PER_HOUR)
        } else if secs % SECONDS_PER_MINUTE == 0 {
            write!(f, "{}min", secs / SECONDS_PER_MINUTE)
        } else {
            write!(f, "{secs}s")
        }
    }
}

impl TryFrom<String> for Resolution {
    type Error = ParseResolutionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Resolution> for String {
    fn from(value: Resolution) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pandas_and_short_aliases() {
        assert_eq!(Resolution::parse("15T").unwrap().as_seconds(), 900);
        assert_eq!(Resolution::parse("15min").unwrap().as_seconds(), 900);
        assert_eq!(Resolution::parse("15m").unwrap().as_seconds(), 900);
        assert_eq!(Resolution::parse("1H").unwrap().as_seconds(), 3600);
        assert_eq!(Resolution::parse("H").unwrap().as_seconds(), 3600);
        assert_eq!(Resolution::parse(" 30s ").unwrap().as_seconds(), 30);
        assert_eq!(Resolution::parse("1D").unwrap().slots_per_day(), 1);
    }

    #[test]
    fn default_is_fifteen_minutes() {
        let res = Resolution::default();
        assert_eq!(res, Resolution::minutes(15).unwrap());
        assert_eq!(res.to_string(), "15min");
        assert_eq!(res.slots_per_day(), 96);
        assert_eq!(res.as_duration(), TimeDelta::minutes(15));
    }

    #[test]
    fn rejects_bad_specs() {
        assert_eq!(Resolution::parse(""), Err(ParseResolutionError::Empty));
        assert!(matches!(
            Resolution::parse("0min"),
            Err(ParseResolutionError::NonPositive { .. })
        ));
        assert!(matches!(
            Resolution::parse("x5min"),
            Err(ParseResolutionError::UnknownUnit { .. })
        ));
        assert!(matches!(
            Resolution::parse("1.5h"),
            Err(ParseResolutionError::UnknownUnit { .. })
                | Err(ParseResolutionError::InvalidNumber { .. })
        ));
        assert!(matches!(
            Resolution::parse("15M"),
            Err(ParseResolutionError::UnknownUnit { .. })
        ));
        assert!(matches!(
            Resolution::parse("7min"),
            Err(ParseResolutionError::NotDayDivisor { seconds: 420, .. })
        ));
        assert!(matches!(
            Resolution::parse("2d"),
            Err(ParseResolutionError::NotDayDivisor { .. })
        ));
    }

    #[test]
    fn display_round_trips() {
        for spec in ["30s", "90s", "15min", "2h", "1d"] {
            let res = Resolution::parse(spec).unwrap();
            assert_eq!(Resolution::parse(&res.to_string()).unwrap(), res);
        }
    }

    #[test]
    fn slot_of_floors() {
        let res = Resolution::default();
        assert_eq!(res.slot_of(0), 0);
        assert_eq!(res.slot_of(14 * 60 + 59), 0);
        assert_eq!(res.slot_of(45 * 60), 3);
        assert_eq!(res.slot_of(60 * 60), 4);
    }
}
