//! Ordered, hashable key values.
//!
//! Polars `AnyValue` is neither `Eq` nor `Hash` (it carries floats), so group
//! and time keys are lowered to a [`Label`] for grouping and sorting. Labels are
//! only used for lookups; output key columns are always gathered from the
//! source Series so their dtype survives the reshape.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use polars::prelude::AnyValue;
use tsreshape_common::format_numeric;

/// A single key value.
///
/// Labels of different kinds order as `Null < Bool < Int < Float < Str`.
/// Floats compare with [`f64::total_cmp`]; `-0.0` is stored as `0.0` so both
/// zeros are one key.
#[derive(Debug, Clone)]
pub enum Label {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Label {
    /// Lower a Polars value to a label.
    ///
    /// Integer-backed logical types (dates, datetimes, durations) become
    /// [`Label::Int`] of their physical value.
    pub fn from_any(value: &AnyValue<'_>) -> Self {
        match value {
            AnyValue::Null => Self::Null,
            AnyValue::Boolean(b) => Self::Bool(*b),
            AnyValue::Int8(v) => Self::Int(i64::from(*v)),
            AnyValue::Int16(v) => Self::Int(i64::from(*v)),
            AnyValue::Int32(v) => Self::Int(i64::from(*v)),
            AnyValue::Int64(v) => Self::Int(*v),
            AnyValue::UInt8(v) => Self::Int(i64::from(*v)),
            AnyValue::UInt16(v) => Self::Int(i64::from(*v)),
            AnyValue::UInt32(v) => Self::Int(i64::from(*v)),
            AnyValue::UInt64(v) => {
                i64::try_from(*v).map_or_else(|_| Self::Str(v.to_string()), Self::Int)
            }
            AnyValue::Float32(v) => Self::float(f64::from(*v)),
            AnyValue::Float64(v) => Self::float(*v),
            AnyValue::String(s) => Self::Str((*s).to_string()),
            AnyValue::StringOwned(s) => Self::Str(s.to_string()),
            other => match other.extract::<i64>() {
                Some(v) => Self::Int(v),
                None => Self::Str(other.to_string()),
            },
        }
    }

    fn float(value: f64) -> Self {
        // -0.0 == 0.0, so this maps negative zero to positive zero
        Self::Float(if value == 0.0 { 0.0 } else { value })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) => 2,
            Self::Float(_) => 3,
            Self::Str(_) => 4,
        }
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Label {}

impl Hash for Label {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Null => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(v) => v.hash(state),
            // total_cmp equality is bit equality
            Self::Float(v) => v.to_bits().hash(state),
            Self::Str(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => f.write_str(&format_numeric(*v)),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Label {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Label {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Label {
    fn from(value: f64) -> Self {
        Self::float(value)
    }
}

impl From<bool> for Label {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}
