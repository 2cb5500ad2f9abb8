//! Positional gather helpers.
//!
//! Every reshape in the workspace reduces to "pick these rows from that
//! Series, leave a hole where there is no row". These helpers keep the
//! source dtype intact, so key and value columns come out typed the same way
//! they went in.

use polars::prelude::{DataType, IdxCa, IdxSize, NewChunkedArray, PlSmallStr, PolarsResult, Series};

/// Gather rows of `series` by position.
///
/// `None` positions produce nulls. The result keeps the name and dtype of
/// `series`.
pub fn gather(series: &Series, positions: &[Option<usize>]) -> PolarsResult<Series> {
    let idx = IdxCa::from_iter_options(
        PlSmallStr::EMPTY,
        positions.iter().map(|pos| pos.map(|p| p as IdxSize)),
    );
    series.take(&idx)
}

/// Concatenate equally long blocks into one Series of `dtype`.
///
/// Missing blocks (`None`) are filled with `block_len` nulls. Each present
/// block is strictly cast to `dtype` first, so incompatible blocks are an error
/// rather than silently nulled.
pub fn stack_series(
    name: PlSmallStr,
    dtype: &DataType,
    blocks: &[Option<&Series>],
    block_len: usize,
) -> PolarsResult<Series> {
    let mut stacked = Series::new_empty(name, dtype);
    for block in blocks {
        match block {
            Some(series) => {
                let cast = series.strict_cast(dtype)?;
                stacked.append(&cast)?;
            }
            None => {
                stacked.append(&Series::full_null(PlSmallStr::EMPTY, block_len, dtype))?;
            }
        }
    }
    Ok(stacked)
}

/// Gather from a Series built by [`stack_series`].
///
/// Each position is `(block, row)`; `None` produces a null.
pub fn gather_stacked(
    stacked: &Series,
    block_len: usize,
    positions: &[Option<(usize, usize)>],
) -> PolarsResult<Series> {
    let flat: Vec<Option<usize>> = positions
        .iter()
        .map(|pos| pos.map(|(block, row)| block * block_len + row))
        .collect();
    gather(stacked, &flat)
}
