//! Time id resolution and derivation.
//!
//! A long table carries its time key either as an explicit column or as a
//! timestamp row index. In the second case the time id of a row is the number
//! of whole resolution slots between midnight and the row's hour and minute:
//!
//! ```text
//! time_id = floor((hour * 60 + minute) * 60 / resolution_seconds)
//! ```
//!
//! Seconds and the calendar date are ignored, so all timestamps are treated
//! as falling on one common day. Hours and minutes of a timezone-aware index
//! are read on the local clock of its zone.

use chrono::{DateTime, Offset, TimeZone};
use polars::prelude::{DataType, NamedFrom, Series, TimeUnit};
use tsreshape_model::{LongFrame, ReshapeError, ReshapeOptions, Resolution, Result};

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Derive slot-based time ids from a timestamp Series.
///
/// Null timestamps yield null ids. The result is an `Int64` Series named
/// `name`.
///
/// # Errors
/// Returns [`ReshapeError::MissingTimeKey`] if `index` is not a `Datetime`
/// Series, and [`ReshapeError::Polars`] if its time zone is unknown.
pub fn derive_time_ids(index: &Series, resolution: &Resolution, name: &str) -> Result<Series> {
    let DataType::Datetime(unit, time_zone) = index.dtype() else {
        return Err(ReshapeError::MissingTimeKey {
            time_id: name.to_string(),
        });
    };
    let ticks_per_second: i64 = match unit {
        TimeUnit::Nanoseconds => 1_000_000_000,
        TimeUnit::Microseconds => 1_000_000,
        TimeUnit::Milliseconds => 1_000,
    };
    let zone = time_zone.as_ref().map(polars::prelude::TimeZone::to_chrono).transpose()?;

    let physical = index.to_physical_repr();
    let ticks = physical.i64()?;
    let ids: Vec<Option<i64>> = ticks
        .into_iter()
        .map(|tick| {
            tick.map(|tick| {
                let utc_seconds = tick.div_euclid(ticks_per_second);
                let local_seconds = utc_seconds + utc_offset(zone.as_ref(), utc_seconds);
                let second_of_day = local_seconds.rem_euclid(SECONDS_PER_DAY);
                // hour and minute only
                let minute_start = second_of_day - second_of_day % SECONDS_PER_MINUTE;
                resolution.slot_of(minute_start)
            })
        })
        .collect();

    Ok(Series::new(name.into(), ids))
}

/// Seconds the zone's local clock is ahead of UTC at `utc_seconds`.
fn utc_offset<Z: TimeZone>(zone: Option<&Z>, utc_seconds: i64) -> i64 {
    let Some(zone) = zone else {
        return 0;
    };
    DateTime::from_timestamp(utc_seconds, 0).map_or(0, |utc| {
        let offset = zone.offset_from_utc_datetime(&utc.naive_utc());
        i64::from(offset.fix().local_minus_utc())
    })
}

/// Resolve the time key of a long table.
///
/// Uses the `time_id` column when present, otherwise derives ids from the
/// timestamp index with the configured resolution.
///
/// # Errors
/// Returns [`ReshapeError::MissingTimeKey`] when there is neither a time
/// column nor a timestamp index.
pub fn resolve_time_key(table: &LongFrame, options: &ReshapeOptions) -> Result<Series> {
    if table.has_column(&options.time_id) {
        let column = table.data().column(&options.time_id)?;
        return Ok(column.as_materialized_series().clone());
    }

    match table.index() {
        Some(index) if table.has_time_index() => {
            tracing::debug!(
                time_id = options.time_id.as_str(),
                resolution = %options.resolution,
                rows = table.height(),
                "Deriving time ids from timestamp index"
            );
            derive_time_ids(index, &options.resolution, &options.time_id)
        }
        _ => Err(ReshapeError::MissingTimeKey {
            time_id: options.time_id.clone(),
        }),
    }
}
