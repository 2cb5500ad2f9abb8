//! Long ⇄ wide conversion.
//!
//! The wide table has one row per group and one column per
//! `(channel, time_id)` pair. Columns are grouped by channel in table order,
//! then by ascending time id within each channel.

use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, PlSmallStr, Series};
use tsreshape_common::{gather, gather_stacked, stack_series};
use tsreshape_model::{FEATURE_LEVEL, LabeledFrame, LongFrame, ReshapeError, ReshapeOptions, Result};

use crate::keys::{KeyIndex, feature_columns, group_column, observation_cells};
use crate::time_id::resolve_time_key;

/// Pivot a long table into a wide table.
///
/// Rows are the distinct groups in ascending order; columns are every
/// `(channel, time_id)` pair, so the result is
/// `|groups|` × `|channels| * |time ids|`. A pair with no observation is null.
/// Channel dtypes are preserved.
///
/// # Errors
/// - [`ReshapeError::ColumnNotFound`] if the group column is missing.
/// - [`ReshapeError::MissingTimeKey`] if there is no time column and no
///   timestamp index.
/// - [`ReshapeError::DuplicateObservation`] if a `(group, time)` pair repeats.
pub fn long_to_wide(table: &LongFrame, options: &ReshapeOptions) -> Result<LabeledFrame> {
    let groups = group_column(table, options)?;
    let times = resolve_time_key(table, options)?;
    let features = feature_columns(table.data(), options);

    let group_keys = KeyIndex::sorted(&groups)?;
    let time_keys = KeyIndex::sorted(&times)?;
    let cells = observation_cells(&group_keys, &time_keys)?;
    let (n_groups, n_times) = (group_keys.len(), time_keys.len());

    tracing::debug!(
        groups = n_groups,
        features = features.len(),
        time_ids = n_times,
        "Pivoting long table to wide"
    );

    let group_level = gather(&groups, &group_keys.first_rows())?;
    let distinct_times = gather(&times, &time_keys.first_rows())?;

    let mut channel_names: Vec<&str> = Vec::with_capacity(features.len() * n_times);
    let mut time_positions: Vec<Option<usize>> = Vec::with_capacity(features.len() * n_times);
    let mut values: Vec<Series> = Vec::with_capacity(features.len() * n_times);
    for feature in &features {
        for time in 0..n_times {
            let positions: Vec<Option<usize>> = (0..n_groups)
                .map(|group| cells[group * n_times + time])
                .collect();
            values.push(gather(feature, &positions)?);
            channel_names.push(feature.name().as_str());
            time_positions.push(Some(time));
        }
    }

    let channel_level = Series::new(FEATURE_LEVEL.into(), channel_names);
    let time_level = gather(&distinct_times, &time_positions)?;

    LabeledFrame::new(vec![group_level], vec![channel_level, time_level], values)
}

/// Stack a wide table back into long form.
///
/// The output columns are the group column, the time column, then one column
/// per channel (in first-seen order). There is one row per group and time id
/// (groups in row order, time ids ascending). Pairs with no wide column, or
/// with null cells, come out as nulls.
///
/// # Errors
/// Returns [`ReshapeError::Shape`] unless the table has exactly one row level
/// and two column levels `(channel, time_id)`, or if a column key repeats.
pub fn wide_to_long(wide: &LabeledFrame) -> Result<DataFrame> {
    let [groups] = wide.row_levels() else {
        return Err(ReshapeError::shape(format!(
            "wide table needs one row level, found {}",
            wide.row_levels().len()
        )));
    };
    let [channel_level, time_level] = wide.column_levels() else {
        return Err(ReshapeError::shape(format!(
            "wide table needs two column levels (channel, time), found {}",
            wide.column_levels().len()
        )));
    };

    let channel_keys = KeyIndex::first_seen(channel_level)?;
    let time_keys = KeyIndex::sorted(time_level)?;
    let (height, n_channels, n_times) = (wide.height(), channel_keys.len(), time_keys.len());

    let mut lookup: Vec<Option<usize>> = vec![None; n_channels * n_times];
    for col in 0..wide.width() {
        let slot = channel_keys.slot(col) * n_times + time_keys.slot(col);
        if lookup[slot].is_some() {
            return Err(ReshapeError::shape(format!(
                "duplicate column key ({}, {})",
                channel_keys.label(channel_keys.slot(col)),
                time_keys.label(time_keys.slot(col))
            )));
        }
        lookup[slot] = Some(col);
    }

    tracing::debug!(
        groups = height,
        features = n_channels,
        time_ids = n_times,
        "Stacking wide table to long"
    );

    let out_rows: Vec<(usize, usize)> = (0..height)
        .flat_map(|row| (0..n_times).map(move |time| (row, time)))
        .collect();

    let mut columns: Vec<Column> = Vec::with_capacity(n_channels + 2);
    let group_positions: Vec<Option<usize>> = out_rows.iter().map(|&(row, _)| Some(row)).collect();
    columns.push(gather(groups, &group_positions)?.into_column());

    let distinct_times = gather(time_level, &time_keys.first_rows())?;
    let time_positions: Vec<Option<usize>> =
        out_rows.iter().map(|&(_, time)| Some(time)).collect();
    columns.push(gather(&distinct_times, &time_positions)?.into_column());

    let all_values = wide.values();
    for channel in 0..n_channels {
        let blocks: Vec<Option<&Series>> = (0..n_times)
            .map(|time| lookup[channel * n_times + time].map(|col| &all_values[col]))
            .collect();
        let dtype = blocks
            .iter()
            .flatten()
            .next()
            .map_or(DataType::Null, |series| series.dtype().clone());
        let name = PlSmallStr::from_string(channel_keys.label(channel).to_string());

        let stacked = stack_series(name, &dtype, &blocks, height)?;
        let positions: Vec<Option<(usize, usize)>> = out_rows
            .iter()
            .map(|&(row, time)| blocks[time].map(|_| (time, row)))
            .collect();
        columns.push(gather_stacked(&stacked, height, &positions)?.into_column());
    }

    Ok(DataFrame::new(columns)?)
}
