//! Configuration options for reshaping.

use serde::{Deserialize, Serialize};

use crate::resolution::Resolution;

/// Default name of the group (series identifier) column.
pub const DEFAULT_GROUP_ID: &str = "group_id";

/// Default name of the time column.
pub const DEFAULT_TIME_ID: &str = "time_id";

/// Column names and slot resolution shared by the reshape functions.
///
/// `resolution` only matters when a time id has to be derived from a
/// timestamp index. Every field has a default, so a partial configuration
/// deserializes cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReshapeOptions {
    /// Name of the group column (row key of the wide table).
    pub group_id: String,
    /// Name of the time column (inner column key of the wide table).
    pub time_id: String,
    /// Width of one derived time slot.
    pub resolution: Resolution,
}

impl Default for ReshapeOptions {
    fn default() -> Self {
        Self {
            group_id: DEFAULT_GROUP_ID.to_string(),
            time_id: DEFAULT_TIME_ID.to_string(),
            resolution: Resolution::default(),
        }
    }
}

impl ReshapeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = group_id.into();
        self
    }

    pub fn with_time_id(mut self, time_id: impl Into<String>) -> Self {
        self.time_id = time_id.into();
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }
}
