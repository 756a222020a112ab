//! Direction groups (입력그룹)
//!
//! A group is a set of physical direction numbers counted together on one
//! input tab. On disk it is still written as the dash-joined label the field
//! application expects ("4-5-6"); in memory it is a sorted set.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct DirectionGroup {
    directions: BTreeSet<u32>,
}

impl DirectionGroup {
    pub fn new(directions: impl IntoIterator<Item = u32>) -> Self {
        Self {
            directions: directions.into_iter().collect(),
        }
    }

    /// Read a label by collecting every decimal run in it.
    ///
    /// "4-5-6", "4, 5, 6" and "4번-5번-6번" all yield {4, 5, 6}.
    pub fn parse(label: &str) -> Self {
        Self::new(parse_direction_numbers(label))
    }

    /// Canonical label: numerically sorted, dash-joined
    pub fn label(&self) -> String {
        self.directions
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join("-")
    }

    pub fn directions(&self) -> &BTreeSet<u32> {
        &self.directions
    }

    pub fn contains(&self, direction: u32) -> bool {
        self.directions.contains(&direction)
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.directions.len()
    }
}

/// Every decimal run in `text`, in order of appearance
pub fn parse_direction_numbers(text: &str) -> Vec<u32> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.parse().ok())
        .collect()
}

impl fmt::Display for DirectionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<String> for DirectionGroup {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<DirectionGroup> for String {
    fn from(group: DirectionGroup) -> Self {
        group.label()
    }
}
