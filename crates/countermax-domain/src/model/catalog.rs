//! Vehicle-type catalogs (차종유형, "project" in the stored document)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::lenient;
use super::template::Template;

/// One vehicle type row of a catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "VehicleTypeRecord", into = "VehicleTypeRecord")]
pub struct VehicleType {
    /// 번호
    pub number: u32,
    /// 차종명
    pub name: String,
    /// 설명
    pub description: String,
}

impl VehicleType {
    pub fn new(number: u32, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
            description: String::new(),
        }
    }
}

/// Stored shape: older documents carry the name under "차종구분", newer ones
/// under both keys.
#[derive(Serialize, Deserialize)]
struct VehicleTypeRecord {
    #[serde(rename = "번호", default, deserialize_with = "lenient::u32_or_zero")]
    number: u32,
    #[serde(rename = "차종구분", default, deserialize_with = "lenient::string")]
    kind: String,
    #[serde(rename = "차종명", default, deserialize_with = "lenient::string")]
    name: String,
    #[serde(rename = "설명", default, deserialize_with = "lenient::string")]
    description: String,
}

impl From<VehicleTypeRecord> for VehicleType {
    fn from(record: VehicleTypeRecord) -> Self {
        let name = if record.kind.is_empty() {
            record.name
        } else {
            record.kind
        };
        Self {
            number: record.number,
            name,
            description: record.description,
        }
    }
}

impl From<VehicleType> for VehicleTypeRecord {
    fn from(vehicle: VehicleType) -> Self {
        Self {
            number: vehicle.number,
            kind: vehicle.name.clone(),
            name: vehicle.name,
            description: vehicle.description,
        }
    }
}

/// One (vehicle type, keyboard shortcut) pair of a sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeyItem {
    #[serde(rename = "순번", default, deserialize_with = "lenient::u32_or_zero")]
    pub sequence: u32,
    #[serde(rename = "차종명", default, deserialize_with = "lenient::string")]
    pub vehicle_type: String,
    #[serde(rename = "단축키", default, deserialize_with = "lenient::string")]
    pub shortcut: String,
}

/// Named shortcut sheet (카운터 단축키 시트)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeySheet {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default)]
    pub items: Vec<HotkeyItem>,
}

impl HotkeySheet {
    /// Column headers this sheet contributes to a count matrix
    pub fn vehicle_type_names(&self) -> Vec<String> {
        self.items.iter().map(|i| i.vehicle_type.clone()).collect()
    }
}

/// A vehicle-type catalog with its shortcut sheets and templates.
///
/// The legacy first-sheet mirrors (`hotkey_items_global`, `hotkeys_global`)
/// are not stored here; they are computed from `sheets[0]` whenever the
/// catalog is written.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "CatalogDocument", into = "CatalogDocument")]
pub struct Catalog {
    pub name: String,
    pub vehicle_types: Vec<VehicleType>,
    pub sheets: Vec<HotkeySheet>,
    pub templates: Vec<Template>,
}

impl Catalog {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn vehicle_type_names(&self) -> Vec<String> {
        self.vehicle_types
            .iter()
            .map(|v| v.name.clone())
            .filter(|n| !n.is_empty())
            .collect()
    }

    /// Find a sheet by exact (trimmed) name
    pub fn find_sheet(&self, name: &str) -> Option<(usize, &HotkeySheet)> {
        let name = name.trim();
        self.sheets
            .iter()
            .enumerate()
            .find(|(_, s)| s.name.trim() == name)
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    /// Flat item list of the first sheet, for consumers predating multi-sheet support
    pub fn legacy_hotkey_items(&self) -> Vec<HotkeyItem> {
        self.sheets
            .first()
            .map(|s| s.items.clone())
            .unwrap_or_default()
    }

    /// Vehicle-type name → shortcut map of the first sheet
    pub fn legacy_hotkeys(&self) -> BTreeMap<String, String> {
        self.sheets
            .first()
            .map(|s| {
                s.items
                    .iter()
                    .map(|i| (i.vehicle_type.clone(), i.shortcut.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Serialize, Deserialize)]
struct CatalogDocument {
    #[serde(default, deserialize_with = "lenient::string")]
    name: String,
    #[serde(default)]
    vehicle_set: Vec<VehicleType>,
    #[serde(default)]
    hotkey_sheets_global: Vec<HotkeySheet>,
    #[serde(default, skip_deserializing)]
    hotkey_items_global: Vec<HotkeyItem>,
    #[serde(default, skip_deserializing)]
    hotkeys_global: BTreeMap<String, String>,
    #[serde(default)]
    templates: Vec<Template>,
}

impl From<CatalogDocument> for Catalog {
    fn from(doc: CatalogDocument) -> Self {
        Self {
            name: doc.name,
            vehicle_types: doc.vehicle_set,
            sheets: doc.hotkey_sheets_global,
            templates: doc.templates,
        }
    }
}

impl From<Catalog> for CatalogDocument {
    fn from(catalog: Catalog) -> Self {
        Self {
            hotkey_items_global: catalog.legacy_hotkey_items(),
            hotkeys_global: catalog.legacy_hotkeys(),
            name: catalog.name,
            vehicle_set: catalog.vehicle_types,
            hotkey_sheets_global: catalog.sheets,
            templates: catalog.templates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(name: &str, pairs: &[(&str, &str)]) -> HotkeySheet {
        HotkeySheet {
            name: name.to_string(),
            items: pairs
                .iter()
                .enumerate()
                .map(|(i, (v, k))| HotkeyItem {
                    sequence: i as u32 + 1,
                    vehicle_type: v.to_string(),
                    shortcut: k.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_old_vehicle_rows_use_kind_key() {
        let json = r#"{"name": "기본", "vehicle_set": [{"번호": "1", "차종구분": "승용"}, {"번호": 2, "차종명": "버스"}]}"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.vehicle_type_names(), vec!["승용", "버스"]);
        assert_eq!(catalog.vehicle_types[0].number, 1);
    }

    #[test]
    fn test_mirrors_are_written_from_first_sheet() {
        let mut catalog = Catalog::new("기본");
        catalog.sheets.push(sheet("1", &[("승용", "A"), ("버스", "B")]));
        catalog.sheets.push(sheet("2", &[("승용", "Z")]));

        let value = serde_json::to_value(&catalog).unwrap();
        assert_eq!(value["hotkeys_global"]["승용"], "A");
        assert_eq!(value["hotkey_items_global"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_stored_mirrors_are_ignored_on_read() {
        let json = r#"{
            "name": "기본",
            "hotkey_sheets_global": [{"name": "1", "items": [{"순번": 1, "차종명": "승용", "단축키": "Q"}]}],
            "hotkeys_global": {"승용": "STALE"}
        }"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.legacy_hotkeys().get("승용").map(String::as_str), Some("Q"));
    }

    #[test]
    fn test_find_sheet_trims_names() {
        let mut catalog = Catalog::new("기본");
        catalog.sheets.push(sheet(" 좌회전 ", &[]));
        assert_eq!(catalog.find_sheet("좌회전").map(|(i, _)| i), Some(0));
        assert!(catalog.find_sheet("우회전").is_none());
    }
}
