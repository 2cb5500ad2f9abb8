//! Time-series table reshaping.
//!
//! This crate converts between three layouts of the same dataset:
//!
//! - **long**: one row per `(group, time)` observation ([`LongFrame`])
//! - **wide**: one row per group, columns keyed by `(channel, time)`
//! - **multiindex**: one row per `(group, channel)`, columns keyed by time
//!
//! Wide and multiindex tables are both [`LabeledFrame`]s. When a long table
//! has no time column, time ids are derived from its timestamp index as
//! slots of [`ReshapeOptions::resolution`] counted from midnight.

pub(crate) mod keys;
pub mod multiindex;
pub mod time_id;
pub mod wide;

pub use multiindex::{long_to_multiindex, multiindex_to_long};
pub use time_id::{derive_time_ids, resolve_time_key};
pub use wide::{long_to_wide, wide_to_long};

// Re-export the model types every caller needs
pub use tsreshape_model::{
    FEATURE_LEVEL, Label, LabeledFrame, LongFrame, ReshapeError, ReshapeOptions, Resolution,
    Result,
};
