//! Shortcut sheets of a catalog
//!
//! The first sheet also feeds the legacy flat mirrors; those are derived by
//! [`Catalog`] on write, so nothing here has to refresh them.

use countermax_types::{Error, Result};

use crate::model::{Catalog, HotkeyItem, HotkeySheet};

/// Items for a fresh sheet: one per vehicle type, shortcuts empty
pub fn seed_items(catalog: &Catalog) -> Vec<HotkeyItem> {
    catalog
        .vehicle_type_names()
        .into_iter()
        .enumerate()
        .map(|(i, name)| HotkeyItem {
            sequence: i as u32 + 1,
            vehicle_type: name,
            shortcut: String::new(),
        })
        .collect()
}

/// Create sheet "1" from the vehicle types when the catalog has no sheets.
/// Returns true if a sheet was created.
pub fn ensure_default_sheet(catalog: &mut Catalog) -> bool {
    if !catalog.sheets.is_empty() {
        return false;
    }
    let items = seed_items(catalog);
    catalog.sheets.push(HotkeySheet {
        name: "1".to_string(),
        items,
    });
    true
}

/// Append a sheet named after the next integer; returns its index
pub fn add_sheet(catalog: &mut Catalog) -> usize {
    let name = (catalog.sheets.len() + 1).to_string();
    let items = seed_items(catalog);
    catalog.sheets.push(HotkeySheet { name, items });
    catalog.sheets.len() - 1
}

/// Renumber purely numeric sheet names 1, 2, 3, ... in list order.
///
/// Custom names keep their text and their place, and are not counted.
/// Numbers are ranks among the numeric names, not list positions:
/// `["1", "custom", "3"]` becomes `["1", "custom", "2"]`, never `"3"`.
pub fn renumber_after_delete(catalog: &mut Catalog) {
    let mut next = 1;
    for sheet in catalog.sheets.iter_mut() {
        let name = sheet.name.trim();
        if !name.is_empty() && name.chars().all(|c| c.is_ascii_digit()) {
            sheet.name = next.to_string();
            next += 1;
        }
    }
}

pub fn remove_sheet(catalog: &mut Catalog, index: usize) -> Result<HotkeySheet> {
    if index >= catalog.sheets.len() {
        return Err(Error::NotFound(format!("sheet #{}", index + 1)));
    }
    let removed = catalog.sheets.remove(index);
    renumber_after_delete(catalog);
    Ok(removed)
}

pub fn rename_sheet(catalog: &mut Catalog, index: usize, name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput("sheet name is empty".to_string()));
    }
    let sheet = catalog
        .sheets
        .get_mut(index)
        .ok_or_else(|| Error::NotFound(format!("sheet #{}", index + 1)))?;
    sheet.name = name.to_string();
    Ok(())
}

/// Set the shortcut of one item
pub fn set_shortcut(catalog: &mut Catalog, sheet: usize, row: usize, shortcut: &str) -> Result<()> {
    let item = catalog
        .sheets
        .get_mut(sheet)
        .ok_or_else(|| Error::NotFound(format!("sheet #{}", sheet + 1)))?
        .items
        .get_mut(row)
        .ok_or_else(|| Error::NotFound(format!("row #{}", row + 1)))?;
    item.shortcut = shortcut.trim().to_string();
    Ok(())
}

/// Clear every shortcut of a sheet
pub fn reset_shortcuts(catalog: &mut Catalog, sheet: usize) -> Result<()> {
    let sheet = catalog
        .sheets
        .get_mut(sheet)
        .ok_or_else(|| Error::NotFound(format!("sheet #{}", sheet + 1)))?;
    for item in &mut sheet.items {
        item.shortcut.clear();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VehicleType;

    fn catalog() -> Catalog {
        let mut c = Catalog::new("기본");
        c.vehicle_types = vec![VehicleType::new(1, "승용"), VehicleType::new(2, "버스")];
        c
    }

    fn names(c: &Catalog) -> Vec<String> {
        c.sheet_names()
    }

    #[test]
    fn test_ensure_default_sheet_seeds_from_vehicle_types() {
        let mut c = catalog();
        assert!(ensure_default_sheet(&mut c));
        assert!(!ensure_default_sheet(&mut c));
        assert_eq!(names(&c), vec!["1"]);
        assert_eq!(c.sheets[0].vehicle_type_names(), vec!["승용", "버스"]);
        assert_eq!(c.sheets[0].items[1].sequence, 2);
        assert!(c.sheets[0].items.iter().all(|i| i.shortcut.is_empty()));
    }

    #[test]
    fn test_add_sheet_uses_next_integer() {
        let mut c = catalog();
        ensure_default_sheet(&mut c);
        assert_eq!(add_sheet(&mut c), 1);
        assert_eq!(names(&c), vec!["1", "2"]);
    }

    #[test]
    fn test_renumber_numeric_names_only() {
        let mut c = catalog();
        for _ in 0..3 {
            add_sheet(&mut c);
        }
        remove_sheet(&mut c, 1).unwrap();
        assert_eq!(names(&c), vec!["1", "2"]);

        let mut c = catalog();
        for _ in 0..3 {
            add_sheet(&mut c);
        }
        rename_sheet(&mut c, 1, "custom").unwrap();
        remove_sheet(&mut c, 0).unwrap();
        assert_eq!(names(&c), vec!["custom", "1"]);
    }

    #[test]
    fn test_renumber_keeps_custom_in_place() {
        let mut c = catalog();
        for _ in 0..4 {
            add_sheet(&mut c);
        }
        rename_sheet(&mut c, 2, "custom").unwrap();
        remove_sheet(&mut c, 1).unwrap();
        assert_eq!(names(&c), vec!["1", "custom", "2"]);
    }

    #[test]
    fn test_set_shortcut_on_first_sheet_updates_mirror() {
        let mut c = catalog();
        ensure_default_sheet(&mut c);
        set_shortcut(&mut c, 0, 1, " B ").unwrap();
        assert_eq!(c.legacy_hotkeys().get("버스").map(String::as_str), Some("B"));
        assert_eq!(c.legacy_hotkey_items()[1].shortcut, "B");

        reset_shortcuts(&mut c, 0).unwrap();
        assert_eq!(c.legacy_hotkeys().get("버스").map(String::as_str), Some(""));
    }

    #[test]
    fn test_out_of_range_is_not_found() {
        let mut c = catalog();
        assert!(matches!(set_shortcut(&mut c, 0, 0, "A"), Err(Error::NotFound(_))));
        assert!(remove_sheet(&mut c, 0).is_err());
        assert!(rename_sheet(&mut c, 0, "x").is_err());
    }
}
