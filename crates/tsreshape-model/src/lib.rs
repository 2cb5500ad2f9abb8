//! Data model for reshaping time-series tables.
//!
//! - **frame**: [`LongFrame`], a Polars DataFrame with an optional row index
//! - **labeled**: [`LabeledFrame`], a table with hierarchical row and column keys
//! - **label**: [`Label`], an ordered, hashable key value
//! - **resolution**: [`Resolution`], the width of one time slot
//! - **options**: [`ReshapeOptions`], column names and resolution for a reshape

pub mod error;
pub mod frame;
pub mod label;
pub mod labeled;
pub mod options;
pub mod resolution;

pub use error::{ReshapeError, Result};
pub use frame::LongFrame;
pub use label::Label;
pub use labeled::{FEATURE_LEVEL, LabeledFrame};
pub use options::ReshapeOptions;
pub use resolution::{ParseResolutionError, Resolution};
