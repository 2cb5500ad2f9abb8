//! Key grouping shared by the reshapes.

use std::collections::HashMap;

use polars::prelude::{DataFrame, Series};
use tsreshape_model::{Label, LongFrame, ReshapeError, ReshapeOptions, Result};

/// Distinct values of a key Series and the slot of every row.
///
/// Slots are numbered either in order of first appearance or in ascending
/// label order, depending on the constructor.
pub(crate) struct KeyIndex {
    row_slots: Vec<usize>,
    slots: Vec<(Label, usize)>,
}

impl KeyIndex {
    /// Slots in order of first appearance.
    pub(crate) fn first_seen(series: &Series) -> Result<Self> {
        let mut lookup: HashMap<Label, usize> = HashMap::new();
        let mut slots: Vec<(Label, usize)> = Vec::new();
        let mut row_slots = Vec::with_capacity(series.len());

        for row in 0..series.len() {
            let label = Label::from_any(&series.get(row)?);
            let slot = match lookup.get(&label) {
                Some(&slot) => slot,
                None => {
                    let slot = slots.len();
                    lookup.insert(label.clone(), slot);
                    slots.push((label, row));
                    slot
                }
            };
            row_slots.push(slot);
        }

        Ok(Self { row_slots, slots })
    }

    /// Slots in ascending label order.
    pub(crate) fn sorted(series: &Series) -> Result<Self> {
        let Self { row_slots, slots } = Self::first_seen(series)?;

        let mut order: Vec<usize> = (0..slots.len()).collect();
        order.sort_by(|&a, &b| slots[a].0.cmp(&slots[b].0));

        let mut renumber = vec![0usize; slots.len()];
        for (new_slot, &old_slot) in order.iter().enumerate() {
            renumber[old_slot] = new_slot;
        }

        let mut sorted_slots: Vec<Option<(Label, usize)>> = slots.into_iter().map(Some).collect();
        let slots = order
            .iter()
            .filter_map(|&old_slot| sorted_slots[old_slot].take())
            .collect();
        let row_slots = row_slots.iter().map(|&slot| renumber[slot]).collect();

        Ok(Self { row_slots, slots })
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Slot of row `row`.
    pub(crate) fn slot(&self, row: usize) -> usize {
        self.row_slots[row]
    }

    pub(crate) fn label(&self, slot: usize) -> &Label {
        &self.slots[slot].0
    }

    /// First row holding the value of `slot`.
    pub(crate) fn first_row(&self, slot: usize) -> usize {
        self.slots[slot].1
    }

    /// First row of every slot, in slot order.
    pub(crate) fn first_rows(&self) -> Vec<Option<usize>> {
        self.slots.iter().map(|(_, row)| Some(*row)).collect()
    }
}

/// Row of each `(group, time)` cell, laid out group-major.
///
/// # Errors
/// Returns [`ReshapeError::DuplicateObservation`] when two rows share a cell.
pub(crate) fn observation_cells(groups: &KeyIndex, times: &KeyIndex) -> Result<Vec<Option<usize>>> {
    let n_times = times.len();
    let mut cells = vec![None; groups.len() * n_times];

    for row in 0..groups.row_slots.len() {
        let (group, time) = (groups.slot(row), times.slot(row));
        let cell = &mut cells[group * n_times + time];
        if cell.is_some() {
            return Err(ReshapeError::DuplicateObservation {
                group: groups.label(group).to_string(),
                time: times.label(time).to_string(),
            });
        }
        *cell = Some(row);
    }

    Ok(cells)
}

/// The group column of a long table.
pub(crate) fn group_column(table: &LongFrame, options: &ReshapeOptions) -> Result<Series> {
    if !table.has_column(&options.group_id) {
        return Err(ReshapeError::ColumnNotFound {
            column: options.group_id.clone(),
        });
    }
    let column = table.data().column(&options.group_id)?;
    Ok(column.as_materialized_series().clone())
}

/// Every column other than the group and time columns, in table order.
pub(crate) fn feature_columns(data: &DataFrame, options: &ReshapeOptions) -> Vec<Series> {
    data.get_columns()
        .iter()
        .filter(|column| {
            let name = column.name().as_str();
            name != options.group_id && name != options.time_id
        })
        .map(|column| column.as_materialized_series().clone())
        .collect()
}
