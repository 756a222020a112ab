//! Survey sites (조사지점)

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

use super::group::DirectionGroup;
use super::lenient;
use super::survey::SurveyState;
use super::template::CounterRow;

pub const DEFAULT_DIRECTION_COUNT: u32 = 4;

/// One physical survey location and its per-direction counter configuration.
///
/// Stored records are read through `SiteRecord`: the pool is widened to
/// cover every grouped direction and `direction_count` is recomputed, so a
/// loaded site always satisfies the partition invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SiteRecord")]
pub struct Site {
    #[serde(rename = "순번")]
    pub sequence: u32,
    /// 지번
    #[serde(rename = "지번")]
    pub parcel_id: String,
    #[serde(rename = "지점명")]
    pub name: String,
    #[serde(rename = "작업번호")]
    pub work_order_id: String,
    /// Derived: distinct directions referenced by `groups`, or the default
    /// count when there are no groups. Refreshed by [`Site::recompute_direction_count`].
    #[serde(rename = "방향수")]
    pub direction_count: u32,
    #[serde(rename = "상태")]
    pub state: SurveyState,
    pub groups: Vec<DirectionGroup>,
    pub counters: Vec<CounterRow>,
    /// Catalog index chosen per group
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub group_projects: BTreeMap<DirectionGroup, usize>,
    /// Size of the direction pool (방향수 spinner)
    #[serde(rename = "spin")]
    pub default_direction_count: u32,
}

/// Site as the editor stores it. Older records carry no `spin` and a
/// `방향수` that may disagree with `groups`.
#[derive(Deserialize)]
struct SiteRecord {
    #[serde(rename = "순번", default, deserialize_with = "lenient::u32_or_zero")]
    sequence: u32,
    #[serde(rename = "지번", default, deserialize_with = "lenient::string")]
    parcel_id: String,
    #[serde(rename = "지점명", default, deserialize_with = "lenient::string")]
    name: String,
    #[serde(rename = "작업번호", default, deserialize_with = "lenient::string")]
    work_order_id: String,
    #[serde(rename = "상태", default)]
    state: SurveyState,
    #[serde(default)]
    groups: Vec<DirectionGroup>,
    #[serde(default)]
    counters: Vec<CounterRow>,
    #[serde(default, deserialize_with = "group_projects")]
    group_projects: BTreeMap<DirectionGroup, usize>,
    #[serde(rename = "spin", default, deserialize_with = "lenient::u32_or_zero")]
    spin: u32,
}

impl From<SiteRecord> for Site {
    fn from(record: SiteRecord) -> Self {
        let spin = if record.spin == 0 { DEFAULT_DIRECTION_COUNT } else { record.spin };
        let mut site = Self {
            sequence: record.sequence,
            parcel_id: record.parcel_id,
            name: record.name,
            work_order_id: record.work_order_id,
            direction_count: 0,
            state: record.state,
            groups: record.groups,
            counters: record.counters,
            group_projects: record.group_projects,
            default_direction_count: spin,
        };
        if let Some(&highest) = site.grouped_directions().last() {
            site.default_direction_count = site.default_direction_count.max(highest);
        }
        site.recompute_direction_count();
        site
    }
}

impl Site {
    pub fn new(sequence: u32, work_order_id: impl Into<String>, default_direction_count: u32, state: SurveyState) -> Self {
        let mut site = Self {
            sequence,
            parcel_id: String::new(),
            name: String::new(),
            work_order_id: work_order_id.into(),
            direction_count: 0,
            state,
            groups: Vec::new(),
            counters: Vec::new(),
            group_projects: BTreeMap::new(),
            default_direction_count,
        };
        site.recompute_direction_count();
        site
    }

    /// Group that contains `direction`, if any
    pub fn group_for(&self, direction: u32) -> Option<&DirectionGroup> {
        self.groups.iter().find(|g| g.contains(direction))
    }

    /// Catalog index recorded for the group containing `direction`
    pub fn catalog_for_direction(&self, direction: u32) -> Option<usize> {
        self.group_projects
            .iter()
            .find(|(group, _)| group.contains(direction))
            .map(|(_, index)| *index)
    }

    /// Union of the directions of all groups
    pub fn grouped_directions(&self) -> BTreeSet<u32> {
        self.groups
            .iter()
            .flat_map(|g| g.directions().iter().copied())
            .collect()
    }

    /// Directions that get their own count matrix; direction 1 alone when
    /// nothing is grouped yet
    pub fn realized_directions(&self) -> Vec<u32> {
        let grouped = self.grouped_directions();
        if grouped.is_empty() {
            vec![1]
        } else {
            grouped.into_iter().collect()
        }
    }

    pub fn recompute_direction_count(&mut self) {
        let grouped = self.grouped_directions().len() as u32;
        self.direction_count = if grouped > 0 {
            grouped
        } else {
            self.default_direction_count
        };
    }

    /// Sheet name bound to `direction`; the last non-empty row wins
    pub fn counter_sheet_for(&self, direction: u32) -> Option<&str> {
        self.counters
            .iter()
            .filter(|c| c.dir == Some(direction))
            .filter_map(CounterRow::sheet_name)
            .last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_count_follows_groups() {
        let mut site = Site::new(1, "WN_1", 6, SurveyState::Waiting);
        assert_eq!(site.direction_count, 6);

        site.groups = vec![DirectionGroup::parse("1-2"), DirectionGroup::parse("5")];
        site.recompute_direction_count();
        assert_eq!(site.direction_count, 3);
    }

    #[test]
    fn test_reads_original_site_record() {
        let json = r#"{
            "순번": 1, "지번": "123-4", "지점명": "정문", "작업번호": "WN_25120414043013",
            "방향수": "3", "상태": "진행",
            "groups": ["1-2", "3"],
            "counters": [{"name": "1", "dir": "1", "label": "좌"}],
            "group_projects": {"1-2": "1"}
        }"#;
        let site: Site = serde_json::from_str(json).unwrap();
        assert_eq!(site.direction_count, 3);
        assert_eq!(site.state, SurveyState::InProgress);
        assert_eq!(site.catalog_for_direction(2), Some(1));
        assert_eq!(site.catalog_for_direction(3), None);
        assert_eq!(site.default_direction_count, DEFAULT_DIRECTION_COUNT);
    }

    #[test]
    fn test_loaded_pool_covers_grouped_directions() {
        let site: Site = serde_json::from_str(r#"{"방향수": "3", "groups": ["5-6", "7"]}"#).unwrap();
        assert_eq!(site.default_direction_count, 7);
        assert_eq!(site.direction_count, 3);

        let resolver = crate::service::DirectionGroupResolver::new(site.default_direction_count, site.groups.clone());
        let used = resolver.used();
        let available: BTreeSet<u32> = resolver.available().into_iter().collect();
        assert!(used.is_disjoint(&available));
        let all: BTreeSet<u32> = used.union(&available).copied().collect();
        assert_eq!(all, (1..=7).collect());
    }

    #[test]
    fn test_stored_direction_count_is_recomputed() {
        let site: Site = serde_json::from_str(r#"{"방향수": "9", "spin": 6, "groups": ["1-2"]}"#).unwrap();
        assert_eq!(site.default_direction_count, 6);
        assert_eq!(site.direction_count, 2);

        let ungrouped: Site = serde_json::from_str(r#"{"방향수": "9", "spin": 6}"#).unwrap();
        assert_eq!(ungrouped.direction_count, 6);
    }

    #[test]
    fn test_counter_sheet_last_row_wins() {
        let mut site = Site::new(1, "WN_1", 4, SurveyState::Waiting);
        site.counters = vec![
            CounterRow::new("A", 1),
            CounterRow::new("", 1),
            CounterRow::new("B", 1),
            CounterRow::new("C", 2),
        ];
        assert_eq!(site.counter_sheet_for(1), Some("B"));
        assert_eq!(site.counter_sheet_for(3), None);
    }

    #[test]
    fn test_realized_directions_default_to_first() {
        let site = Site::new(1, "WN_1", 4, SurveyState::Waiting);
        assert_eq!(site.realized_directions(), vec![1]);
    }
}
