//! Long-format frame representation.
//!
//! This module provides the [`LongFrame`] type which wraps a Polars DataFrame
//! with an optional row index. A long table has one row per
//! `(group, time)` observation: a group column, then either an explicit time
//! column or a timestamp row index, then any number of feature columns.

use polars::prelude::{DataFrame, DataType, Series};

use crate::error::{ReshapeError, Result};

/// A long-format table.
///
/// Polars frames have no row labels, so the index is carried alongside the
/// data. Without an index, rows are identified by position only.
#[derive(Debug, Clone)]
pub struct LongFrame {
    data: DataFrame,
    index: Option<Series>,
}

impl LongFrame {
    /// Create a frame with a positional index.
    pub fn new(data: DataFrame) -> Self {
        Self { data, index: None }
    }

    /// Create a frame with an explicit row index.
    ///
    /// The index must have exactly one entry per row.
    pub fn with_index(data: DataFrame, index: Series) -> Result<Self> {
        if index.len() != data.height() {
            return Err(ReshapeError::IndexLength {
                expected: data.height(),
                actual: index.len(),
            });
        }
        Ok(Self {
            data,
            index: Some(index),
        })
    }

    /// The table contents.
    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    /// The row index, if one was attached.
    pub fn index(&self) -> Option<&Series> {
        self.index.as_ref()
    }

    /// Returns the number of rows in the frame.
    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.data.get_column_index(name).is_some()
    }

    /// Whether the row index is a timestamp sequence.
    pub fn has_time_index(&self) -> bool {
        self.index
            .as_ref()
            .is_some_and(|index| matches!(index.dtype(), DataType::Datetime(_, _)))
    }
}

impl From<DataFrame> for LongFrame {
    fn from(data: DataFrame) -> Self {
        Self::new(data)
    }
}
