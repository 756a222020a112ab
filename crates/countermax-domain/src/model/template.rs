//! Counter templates and counter rows

use serde::{Deserialize, Serialize};

use super::group::DirectionGroup;
use super::lenient;

/// Binding of one direction to a shortcut sheet, plus a display label.
///
/// `name` is the sheet name (or a legacy "카운터N" placeholder).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CounterRow {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::optional_u32")]
    pub dir: Option<u32>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub label: String,
}

impl CounterRow {
    pub fn new(name: impl Into<String>, dir: u32) -> Self {
        Self {
            name: name.into(),
            dir: Some(dir),
            label: String::new(),
        }
    }

    /// Trimmed sheet name, `None` when blank
    pub fn sheet_name(&self) -> Option<&str> {
        let name = self.name.trim();
        (!name.is_empty()).then_some(name)
    }
}

/// Reusable (groups, counters) configuration owned by a catalog
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Template {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    /// Input groups, stored under the historical "dirs" key
    #[serde(default)]
    pub dirs: Vec<DirectionGroup>,
    #[serde(default)]
    pub counters: Vec<CounterRow>,
}

impl Template {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Highest direction number referenced by the groups or counters
    pub fn max_direction(&self) -> Option<u32> {
        let from_groups = self
            .dirs
            .iter()
            .flat_map(|g| g.directions().iter().copied());
        let from_counters = self.counters.iter().filter_map(|c| c.dir);
        from_groups.chain(from_counters).max()
    }
}
