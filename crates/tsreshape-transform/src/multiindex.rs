//! Long ⇄ multiindex conversion.
//!
//! The multiindex table has one row per `(group_id, channel)` pair and one
//! column per time id. Groups and time ids keep their order of first
//! appearance in the long table.
//!
//! Both directions are a single pass: every output cell is located through
//! the `(group, time)` cell map and gathered from a stacked value Series,
//! instead of slicing, transposing and concatenating one group at a time.

use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, PlSmallStr, Series};
use tsreshape_common::{gather, gather_stacked, stack_series};
use tsreshape_model::{FEATURE_LEVEL, LabeledFrame, LongFrame, ReshapeError, ReshapeOptions, Result};

use crate::keys::{KeyIndex, feature_columns, group_column, observation_cells};
use crate::time_id::resolve_time_key;

/// Reshape a long table into a multiindex table.
///
/// The result has `|groups| * |channels|` rows keyed `(group_id, channels)`
/// and one column per distinct time id. Each time column mixes all channels,
/// so they are cast strictly to a common dtype (see [`channel_dtype`]).
///
/// # Errors
/// Same as [`crate::long_to_wide`], plus [`ReshapeError::Polars`] when a
/// channel cannot be cast to the common dtype.
pub fn long_to_multiindex(table: &LongFrame, options: &ReshapeOptions) -> Result<LabeledFrame> {
    let groups = group_column(table, options)?;
    let times = resolve_time_key(table, options)?;
    let features = feature_columns(table.data(), options);

    let group_keys = KeyIndex::first_seen(&groups)?;
    let time_keys = KeyIndex::first_seen(&times)?;
    let cells = observation_cells(&group_keys, &time_keys)?;
    let (height, n_groups, n_times, n_channels) = (
        table.height(),
        group_keys.len(),
        time_keys.len(),
        features.len(),
    );

    let blocks: Vec<Option<&Series>> = features.iter().map(Some).collect();
    let dtype = channel_dtype(&blocks);

    tracing::debug!(
        groups = n_groups,
        features = n_channels,
        time_ids = n_times,
        dtype = %dtype,
        "Reshaping long table to multiindex"
    );

    let stacked = stack_series("values".into(), &dtype, &blocks, height)?;

    let mut group_rows: Vec<Option<usize>> = Vec::with_capacity(n_groups * n_channels);
    let mut channel_names: Vec<&str> = Vec::with_capacity(n_groups * n_channels);
    for group in 0..n_groups {
        for feature in &features {
            group_rows.push(Some(group_keys.first_row(group)));
            channel_names.push(feature.name().as_str());
        }
    }
    let group_level = gather(&groups, &group_rows)?;
    let channel_level = Series::new(FEATURE_LEVEL.into(), channel_names);
    let time_level = gather(&times, &time_keys.first_rows())?;

    let mut values: Vec<Series> = Vec::with_capacity(n_times);
    for time in 0..n_times {
        let positions: Vec<Option<(usize, usize)>> = (0..n_groups)
            .flat_map(|group| {
                let row = cells[group * n_times + time];
                (0..n_channels).map(move |channel| row.map(|row| (channel, row)))
            })
            .collect();
        let name = PlSmallStr::from_string(time_keys.label(time).to_string());
        values.push(gather_stacked(&stacked, height, &positions)?.with_name(name));
    }

    LabeledFrame::new(vec![group_level, channel_level], vec![time_level], values)
}

/// Common dtype of the channels sharing a time column.
///
/// Channels of one dtype keep it, all-integer channels widen to `Int64`, and
/// any other mix (or no channel at all) becomes `Float64`.
fn channel_dtype(channels: &[Option<&Series>]) -> DataType {
    let mut dtypes = channels.iter().copied().flatten().map(|series| series.dtype());
    let Some(first) = dtypes.next() else {
        return DataType::Float64;
    };
    let (mut uniform, mut integer) = (true, first.is_integer());
    for dtype in dtypes {
        uniform &= dtype == first;
        integer &= dtype.is_integer();
    }
    if uniform {
        first.clone()
    } else if integer {
        DataType::Int64
    } else {
        DataType::Float64
    }
}

/// Reshape a multiindex table back into long form.
///
/// For each outer row key (in first-seen order) one row is emitted per time
/// column. Output columns are `options.group_id`, `options.time_id`, then the
/// union of channels in first-seen order; a group without a given channel gets
/// nulls there. All value columns are cast to their common dtype.
///
/// # Errors
/// Returns [`ReshapeError::Shape`] unless the table has two row levels and one
/// column level, or if a `(group, channel)` row key repeats.
pub fn multiindex_to_long(table: &LabeledFrame, options: &ReshapeOptions) -> Result<DataFrame> {
    let [outer, inner] = table.row_levels() else {
        return Err(ReshapeError::shape(format!(
            "multiindex table needs two row levels (group, channel), found {}",
            table.row_levels().len()
        )));
    };
    let [time_level] = table.column_levels() else {
        return Err(ReshapeError::shape(format!(
            "multiindex table needs one column level, found {}",
            table.column_levels().len()
        )));
    };

    let group_keys = KeyIndex::first_seen(outer)?;
    let channel_keys = KeyIndex::first_seen(inner)?;
    let (height, n_groups, n_channels, n_times) = (
        table.height(),
        group_keys.len(),
        channel_keys.len(),
        table.width(),
    );

    let mut lookup: Vec<Option<usize>> = vec![None; n_groups * n_channels];
    for row in 0..height {
        let (group, channel) = (group_keys.slot(row), channel_keys.slot(row));
        let slot = &mut lookup[group * n_channels + channel];
        if slot.is_some() {
            return Err(ReshapeError::shape(format!(
                "duplicate row key ({}, {})",
                group_keys.label(group),
                channel_keys.label(channel)
            )));
        }
        *slot = Some(row);
    }

    let blocks: Vec<Option<&Series>> = table.values().iter().map(Some).collect();
    let dtype = channel_dtype(&blocks);

    tracing::debug!(
        groups = n_groups,
        features = n_channels,
        time_ids = n_times,
        dtype = %dtype,
        "Reshaping multiindex table to long"
    );

    let stacked = stack_series("values".into(), &dtype, &blocks, height)?;

    let out_rows: Vec<(usize, usize)> = (0..n_groups)
        .flat_map(|group| (0..n_times).map(move |time| (group, time)))
        .collect();

    let mut columns: Vec<Column> = Vec::with_capacity(n_channels + 2);
    let group_positions: Vec<Option<usize>> = out_rows
        .iter()
        .map(|&(group, _)| Some(group_keys.first_row(group)))
        .collect();
    let group_column = gather(outer, &group_positions)?.with_name(options.group_id.as_str().into());
    columns.push(group_column.into_column());

    let time_positions: Vec<Option<usize>> = out_rows.iter().map(|&(_, time)| Some(time)).collect();
    let time_column = gather(time_level, &time_positions)?.with_name(options.time_id.as_str().into());
    columns.push(time_column.into_column());

    for channel in 0..n_channels {
        let positions: Vec<Option<(usize, usize)>> = out_rows
            .iter()
            .map(|&(group, time)| lookup[group * n_channels + channel].map(|row| (time, row)))
            .collect();
        let name = PlSmallStr::from_string(channel_keys.label(channel).to_string());
        columns.push(
            gather_stacked(&stacked, height, &positions)?
                .with_name(name)
                .into_column(),
        );
    }

    Ok(DataFrame::new(columns)?)
}
