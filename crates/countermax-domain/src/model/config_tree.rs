//! The whole configuration document
//!
//! Read and written as one unit by a [`ConfigTreeRepository`](crate::repository::ConfigTreeRepository).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::catalog::{Catalog, VehicleType};
use super::survey::Survey;
use super::user::User;

pub const DEFAULT_CATALOG_NAME: &str = "기본 작업";

pub const DEFAULT_VEHICLE_TYPES: [&str; 6] =
    ["승용", "소형버스", "대형버스", "소형화물", "중형화물", "대형화물"];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigTree {
    /// Advisory schema tag, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<serde_json::Value>,
    /// Vehicle-type catalogs
    #[serde(default)]
    pub projects: Vec<Catalog>,
    #[serde(default)]
    pub surveys: Vec<Survey>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl ConfigTree {
    /// Tree used when no document exists yet
    pub fn with_default_catalog() -> Self {
        let mut catalog = Catalog::new(DEFAULT_CATALOG_NAME);
        catalog.vehicle_types = DEFAULT_VEHICLE_TYPES
            .iter()
            .enumerate()
            .map(|(i, name)| VehicleType::new(i as u32 + 1, *name))
            .collect();
        Self {
            projects: vec![catalog],
            ..Default::default()
        }
    }

    pub fn catalog_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.projects.iter().position(|c| c.name.trim() == name)
    }

    pub fn survey_index(&self, sn: &str) -> Option<usize> {
        self.surveys.iter().position(|s| s.info.sn == sn)
    }

    pub fn survey(&self, sn: &str) -> Option<&Survey> {
        self.surveys.iter().find(|s| s.info.sn == sn)
    }

    pub fn survey_mut(&mut self, sn: &str) -> Option<&mut Survey> {
        self.surveys.iter_mut().find(|s| s.info.sn == sn)
    }

    /// Every work order id in the store, across all surveys
    pub fn work_order_ids(&self) -> HashSet<String> {
        self.surveys
            .iter()
            .flat_map(|s| s.sites.iter())
            .map(|site| site.work_order_id.clone())
            .filter(|id| !id.is_empty())
            .collect()
    }

    pub fn survey_ids(&self) -> HashSet<String> {
        self.surveys.iter().map(|s| s.info.sn.clone()).collect()
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tree_has_one_catalog() {
        let tree = ConfigTree::with_default_catalog();
        assert_eq!(tree.projects.len(), 1);
        assert_eq!(tree.projects[0].vehicle_type_names().len(), 6);
        assert_eq!(tree.catalog_index(" 기본 작업 "), Some(0));
    }

    #[test]
    fn test_missing_sections_default() {
        let tree: ConfigTree = serde_json::from_str(r#"{"version": "1.2"}"#).unwrap();
        assert!(tree.projects.is_empty());
        assert!(tree.work_order_ids().is_empty());
        assert!(tree.version.is_some());
    }
}
