//! Tables with hierarchical row and column keys.
//!
//! [`LabeledFrame`] is the single table type behind the wide and multiindex
//! layouts:
//!
//! | layout     | row levels               | column levels           |
//! |------------|--------------------------|-------------------------|
//! | wide       | `[group_id]`             | `[channels, time_id]`   |
//! | multiindex | `[group_id, channels]`   | `[time_id]`             |
//!
//! Each level is a Series whose name is the level name. Row levels have one
//! entry per row, column levels one entry per column, and the cell values are
//! stored column by column.

use polars::prelude::{AnyValue, Column, DataFrame, IntoColumn, PlSmallStr, Series};
use tsreshape_common::any_to_string;

use crate::error::{ReshapeError, Result};
use crate::label::Label;

/// Name of the level holding feature (channel) names.
pub const FEATURE_LEVEL: &str = "channels";

/// A table keyed by one or more row levels and one or more column levels.
#[derive(Debug, Clone)]
pub struct LabeledFrame {
    row_levels: Vec<Series>,
    column_levels: Vec<Series>,
    values: Vec<Series>,
}

impl LabeledFrame {
    /// Assemble a frame from its levels and value columns.
    ///
    /// # Errors
    /// Returns [`ReshapeError::Shape`] when there is no row or column level,
    /// when row levels and value columns disagree on the height, or when column
    /// levels disagree with the number of value columns.
    pub fn new(
        row_levels: Vec<Series>,
        column_levels: Vec<Series>,
        values: Vec<Series>,
    ) -> Result<Self> {
        let Some(first_row_level) = row_levels.first() else {
            return Err(ReshapeError::shape("at least one row level is required"));
        };
        if column_levels.is_empty() {
            return Err(ReshapeError::shape("at least one column level is required"));
        }

        let height = first_row_level.len();
        if let Some(level) = row_levels.iter().find(|level| level.len() != height) {
            return Err(ReshapeError::shape(format!(
                "row level '{}' has {} entries, expected {height}",
                level.name(),
                level.len()
            )));
        }
        let width = values.len();
        if let Some(level) = column_levels.iter().find(|level| level.len() != width) {
            return Err(ReshapeError::shape(format!(
                "column level '{}' has {} entries, expected {width}",
                level.name(),
                level.len()
            )));
        }
        if let Some((idx, column)) = values
            .iter()
            .enumerate()
            .find(|(_, column)| column.len() != height)
        {
            return Err(ReshapeError::shape(format!(
                "value column {idx} has {} rows, expected {height}",
                column.len()
            )));
        }

        Ok(Self {
            row_levels,
            column_levels,
            values,
        })
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.row_levels.first().map_or(0, |level| level.len())
    }

    /// Number of value columns.
    pub fn width(&self) -> usize {
        self.values.len()
    }

    pub fn row_levels(&self) -> &[Series] {
        &self.row_levels
    }

    pub fn column_levels(&self) -> &[Series] {
        &self.column_levels
    }

    pub fn values(&self) -> &[Series] {
        &self.values
    }

    /// Find a row level by name.
    pub fn row_level(&self, name: &str) -> Option<&Series> {
        self.row_levels
            .iter()
            .find(|level| level.name().as_str() == name)
    }

    /// Find a column level by name.
    pub fn column_level(&self, name: &str) -> Option<&Series> {
        self.column_levels
            .iter()
            .find(|level| level.name().as_str() == name)
    }

    /// Key of row `row`, outermost level first.
    pub fn row_key(&self, row: usize) -> Result<Vec<Label>> {
        key_at(&self.row_levels, row)
    }

    /// Key of column `col`, outermost level first.
    pub fn column_key(&self, col: usize) -> Result<Vec<Label>> {
        key_at(&self.column_levels, col)
    }

    /// Position of the column whose key equals `key`.
    pub fn find_column(&self, key: &[Label]) -> Option<usize> {
        if key.len() != self.column_levels.len() {
            return None;
        }
        (0..self.width()).find(|&col| {
            self.column_levels
                .iter()
                .zip(key)
                .all(|(level, label)| level.get(col).is_ok_and(|v| Label::from_any(&v) == *label))
        })
    }

    /// Value column whose key equals `key`.
    pub fn column(&self, key: &[Label]) -> Option<&Series> {
        self.find_column(key).map(|col| &self.values[col])
    }

    /// Position of the row whose key equals `key`.
    pub fn find_row(&self, key: &[Label]) -> Option<usize> {
        if key.len() != self.row_levels.len() {
            return None;
        }
        (0..self.height()).find(|&row| {
            self.row_levels
                .iter()
                .zip(key)
                .all(|(level, label)| level.get(row).is_ok_and(|v| Label::from_any(&v) == *label))
        })
    }

    /// Cell value at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<AnyValue<'_>> {
        let column = self.values.get(col).ok_or_else(|| {
            ReshapeError::shape(format!("column {col} out of range for width {}", self.width()))
        })?;
        Ok(column.get(row)?)
    }

    /// Flatten into a plain DataFrame.
    ///
    /// Row levels become leading columns; each value column is named by
    /// joining its key with `separator` (e.g. `load_3`).
    pub fn to_flat_dataframe(&self, separator: &str) -> Result<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(self.row_levels.len() + self.width());
        for level in &self.row_levels {
            columns.push(level.clone().into_column());
        }
        for (col, values) in self.values.iter().enumerate() {
            let mut parts = Vec::with_capacity(self.column_levels.len());
            for level in &self.column_levels {
                parts.push(any_to_string(level.get(col)?));
            }
            let name = PlSmallStr::from_string(parts.join(separator));
            columns.push(values.clone().with_name(name).into_column());
        }
        Ok(DataFrame::new(columns)?)
    }
}

fn key_at(levels: &[Series], idx: usize) -> Result<Vec<Label>> {
    levels
        .iter()
        .map(|level| Ok(Label::from_any(&level.get(idx)?)))
        .collect()
}
