//! Partitioning of a site's directions into input groups
//!
//! The available pool is never stored. It is always derived as
//! `{1..total} - used`, so a direction can only be picked while it is not
//! in any group.

use std::collections::BTreeSet;

use countermax_types::{Error, Result};

use crate::model::DirectionGroup;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionGroupResolver {
    total_directions: u32,
    groups: Vec<DirectionGroup>,
}

impl DirectionGroupResolver {
    pub fn new(total_directions: u32, groups: Vec<DirectionGroup>) -> Self {
        Self {
            total_directions,
            groups,
        }
    }

    pub fn total_directions(&self) -> u32 {
        self.total_directions
    }

    pub fn groups(&self) -> &[DirectionGroup] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<DirectionGroup> {
        self.groups
    }

    /// Directions consumed by some group
    pub fn used(&self) -> BTreeSet<u32> {
        self.groups
            .iter()
            .flat_map(|g| g.directions().iter().copied())
            .collect()
    }

    /// Directions still free for grouping, ascending
    pub fn available(&self) -> Vec<u32> {
        let used = self.used();
        (1..=self.total_directions)
            .filter(|d| !used.contains(d))
            .collect()
    }

    /// Number of distinct grouped directions
    pub fn direction_count(&self) -> u32 {
        self.used().len() as u32
    }

    /// Group the selected directions into one new tab.
    ///
    /// Every selected direction must currently be available.
    pub fn add_group(&mut self, selected: &[u32]) -> Result<DirectionGroup> {
        if selected.is_empty() {
            return Err(Error::InvalidSelection("no direction selected".to_string()));
        }
        let available = self.available();
        if let Some(d) = selected.iter().find(|d| !available.contains(d)) {
            return Err(Error::InvalidSelection(format!(
                "direction {} is not available",
                d
            )));
        }
        let group = DirectionGroup::new(selected.iter().copied());
        self.groups.push(group.clone());
        Ok(group)
    }

    /// Remove a group; its directions become available again
    pub fn remove_group(&mut self, group: &DirectionGroup) -> bool {
        let before = self.groups.len();
        self.groups.retain(|g| g != group);
        self.groups.len() != before
    }

    /// Resize the pool. Shrinking below a grouped direction is refused.
    pub fn set_total(&mut self, total: u32) -> Result<()> {
        if let Some(&max_used) = self.used().iter().next_back() {
            if total < max_used {
                return Err(Error::InvalidSelection(format!(
                    "direction {} is grouped; cannot reduce to {}",
                    max_used, total
                )));
            }
        }
        self.total_directions = total;
        Ok(())
    }
}
