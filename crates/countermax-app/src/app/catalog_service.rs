//! Catalog use cases addressed by name, as the CLI sees them

use serde::Serialize;

use countermax_domain::model::{Catalog, ConfigTree, CounterRow, DirectionGroup, HotkeyItem, Template, VehicleType};
use countermax_domain::service::{catalog_ops, hotkey_registry};
use countermax_types::{Error, Result};

#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub index: usize,
    pub name: String,
    pub vehicle_types: Vec<String>,
    pub sheets: Vec<String>,
    pub templates: usize,
}

pub fn list_catalogs(tree: &ConfigTree) -> Vec<CatalogSummary> {
    tree.projects
        .iter()
        .enumerate()
        .map(|(index, c)| CatalogSummary {
            index,
            name: c.name.clone(),
            vehicle_types: c.vehicle_type_names(),
            sheets: c.sheet_names(),
            templates: c.templates.len(),
        })
        .collect()
}

pub fn find_catalog(tree: &ConfigTree, name: &str) -> Result<usize> {
    tree.catalog_index(name)
        .ok_or_else(|| Error::NotFound(format!("catalog '{}'", name.trim())))
}

fn catalog_mut<'a>(tree: &'a mut ConfigTree, name: &str) -> Result<&'a mut Catalog> {
    let index = find_catalog(tree, name)?;
    Ok(&mut tree.projects[index])
}

fn sheet_index(catalog: &Catalog, sheet: &str) -> Result<usize> {
    catalog
        .find_sheet(sheet)
        .map(|(i, _)| i)
        .ok_or_else(|| Error::NotFound(format!("sheet '{}' in catalog '{}'", sheet, catalog.name)))
}

/// New catalog, optionally seeded with vehicle types and a first sheet
pub fn create_catalog(tree: &mut ConfigTree, name: &str, vehicle_types: &[String]) -> Result<usize> {
    if tree.catalog_index(name).is_some() {
        return Err(Error::InvalidInput(format!("catalog '{}' already exists", name.trim())));
    }
    let index = catalog_ops::add_catalog(tree, name)?;
    if !vehicle_types.is_empty() {
        let catalog = &mut tree.projects[index];
        let rows = vehicle_types.iter().map(|n| VehicleType::new(0, n.as_str())).collect();
        catalog_ops::set_vehicle_types(catalog, rows);
        hotkey_registry::ensure_default_sheet(catalog);
    }
    Ok(index)
}

pub fn rename_catalog(tree: &mut ConfigTree, name: &str, new_name: &str) -> Result<()> {
    let index = find_catalog(tree, name)?;
    catalog_ops::rename_catalog(tree, index, new_name)
}

/// Returns the number of site group links dropped with the catalog
pub fn delete_catalog(tree: &mut ConfigTree, name: &str) -> Result<usize> {
    let index = find_catalog(tree, name)?;
    let (_, dropped) = catalog_ops::delete_catalog(tree, index)?;
    Ok(dropped)
}

pub fn set_vehicle_types(tree: &mut ConfigTree, name: &str, vehicle_types: &[String]) -> Result<()> {
    let catalog = catalog_mut(tree, name)?;
    let rows = vehicle_types.iter().map(|n| VehicleType::new(0, n.as_str())).collect();
    catalog_ops::set_vehicle_types(catalog, rows);
    Ok(())
}

/// Sheet names; the default sheet is created first when there are none
pub fn sheets(tree: &mut ConfigTree, name: &str) -> Result<Vec<String>> {
    let catalog = catalog_mut(tree, name)?;
    hotkey_registry::ensure_default_sheet(catalog);
    Ok(catalog.sheet_names())
}

pub fn sheet_items(tree: &ConfigTree, name: &str, sheet: &str) -> Result<Vec<HotkeyItem>> {
    let catalog = &tree.projects[find_catalog(tree, name)?];
    let index = sheet_index(catalog, sheet)?;
    Ok(catalog.sheets[index].items.clone())
}

/// Returns the new sheet's name
pub fn add_sheet(tree: &mut ConfigTree, name: &str) -> Result<String> {
    let catalog = catalog_mut(tree, name)?;
    let index = hotkey_registry::add_sheet(catalog);
    Ok(catalog.sheets[index].name.clone())
}

pub fn rename_sheet(tree: &mut ConfigTree, name: &str, sheet: &str, new_name: &str) -> Result<()> {
    let catalog = catalog_mut(tree, name)?;
    let index = sheet_index(catalog, sheet)?;
    hotkey_registry::rename_sheet(catalog, index, new_name)
}

/// Delete a sheet; the remaining numeric names are renumbered
pub fn delete_sheet(tree: &mut ConfigTree, name: &str, sheet: &str) -> Result<Vec<String>> {
    let catalog = catalog_mut(tree, name)?;
    let index = sheet_index(catalog, sheet)?;
    hotkey_registry::remove_sheet(catalog, index)?;
    Ok(catalog.sheet_names())
}

/// Set the shortcut of the item for `vehicle_type` on `sheet`
pub fn set_key(tree: &mut ConfigTree, name: &str, sheet: &str, vehicle_type: &str, key: &str) -> Result<()> {
    let catalog = catalog_mut(tree, name)?;
    let index = sheet_index(catalog, sheet)?;
    let row = catalog.sheets[index]
        .items
        .iter()
        .position(|i| i.vehicle_type == vehicle_type.trim())
        .ok_or_else(|| Error::NotFound(format!("vehicle type '{}' on sheet '{}'", vehicle_type, sheet)))?;
    hotkey_registry::set_shortcut(catalog, index, row, key)
}

pub fn reset_keys(tree: &mut ConfigTree, name: &str, sheet: &str) -> Result<()> {
    let catalog = catalog_mut(tree, name)?;
    let index = sheet_index(catalog, sheet)?;
    hotkey_registry::reset_shortcuts(catalog, index)
}

fn template_index(catalog: &Catalog, template: &str) -> Result<usize> {
    catalog
        .templates
        .iter()
        .position(|t| t.name.trim() == template.trim())
        .ok_or_else(|| Error::NotFound(format!("template '{}' in catalog '{}'", template.trim(), catalog.name)))
}

fn template_mut<'a>(tree: &'a mut ConfigTree, name: &str, template: &str) -> Result<&'a mut Template> {
    let catalog = catalog_mut(tree, name)?;
    let index = template_index(catalog, template)?;
    Ok(&mut catalog.templates[index])
}

pub fn templates(tree: &ConfigTree, name: &str) -> Result<Vec<Template>> {
    Ok(tree.projects[find_catalog(tree, name)?].templates.clone())
}

pub fn add_template(tree: &mut ConfigTree, name: &str, template: &str) -> Result<()> {
    let catalog = catalog_mut(tree, name)?;
    if template_index(catalog, template).is_ok() {
        return Err(Error::InvalidInput(format!("template '{}' already exists", template.trim())));
    }
    catalog_ops::add_template(catalog, template)?;
    Ok(())
}

pub fn rename_template(tree: &mut ConfigTree, name: &str, template: &str, new_name: &str) -> Result<()> {
    let catalog = catalog_mut(tree, name)?;
    let index = template_index(catalog, template)?;
    catalog_ops::rename_template(catalog, index, new_name)
}

pub fn delete_template(tree: &mut ConfigTree, name: &str, template: &str) -> Result<()> {
    let catalog = catalog_mut(tree, name)?;
    let index = template_index(catalog, template)?;
    catalog_ops::delete_template(catalog, index)?;
    Ok(())
}

/// Group template directions out of a pool of `total`
pub fn template_group(tree: &mut ConfigTree, name: &str, template: &str, total: u32, directions: &[u32]) -> Result<DirectionGroup> {
    catalog_ops::template_group(template_mut(tree, name, template)?, total, directions)
}

pub fn template_ungroup(tree: &mut ConfigTree, name: &str, template: &str, group: &str) -> Result<()> {
    let group = DirectionGroup::parse(group);
    if !catalog_ops::template_ungroup(template_mut(tree, name, template)?, &group) {
        return Err(Error::NotFound(format!("group {}", group)));
    }
    Ok(())
}

/// Returns the new row's index
pub fn add_template_counter(tree: &mut ConfigTree, name: &str, template: &str) -> Result<usize> {
    Ok(catalog_ops::add_template_counter(template_mut(tree, name, template)?))
}

pub fn set_template_counters(tree: &mut ConfigTree, name: &str, template: &str, rows: Vec<CounterRow>) -> Result<()> {
    catalog_ops::set_template_counters(template_mut(tree, name, template)?, rows);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_seeds_first_sheet() {
        let mut tree = ConfigTree::with_default_catalog();
        create_catalog(&mut tree, "교차로", &["승용".into(), " ".into(), "버스".into()]).unwrap();
        let items = sheet_items(&tree, "교차로", "1").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].vehicle_type, "버스");
        assert!(create_catalog(&mut tree, "교차로", &[]).is_err());
    }

    #[test]
    fn test_delete_sheet_renumbers() {
        let mut tree = ConfigTree::with_default_catalog();
        assert_eq!(sheets(&mut tree, "기본 작업").unwrap(), vec!["1"]);
        add_sheet(&mut tree, "기본 작업").unwrap();
        add_sheet(&mut tree, "기본 작업").unwrap();
        rename_sheet(&mut tree, "기본 작업", "2", "custom").unwrap();
        let names = delete_sheet(&mut tree, "기본 작업", "1").unwrap();
        assert_eq!(names, vec!["custom", "1"]);
    }

    #[test]
    fn test_set_key_by_vehicle_type() {
        let mut tree = ConfigTree::with_default_catalog();
        sheets(&mut tree, "기본 작업").unwrap();
        set_key(&mut tree, "기본 작업", "1", "대형버스", " 3 ").unwrap();
        let items = sheet_items(&tree, "기본 작업", "1").unwrap();
        assert_eq!(items[2].shortcut, "3");
        assert_eq!(tree.projects[0].legacy_hotkeys()["대형버스"], "3");
        assert!(matches!(
            set_key(&mut tree, "기본 작업", "1", "트랙터", "9"),
            Err(Error::NotFound(_))
        ));

        reset_keys(&mut tree, "기본 작업", "1").unwrap();
        assert!(sheet_items(&tree, "기본 작업", "1")
            .unwrap()
            .iter()
            .all(|i| i.shortcut.is_empty()));
    }

    #[test]
    fn test_template_editing_by_name() {
        let mut tree = ConfigTree::with_default_catalog();
        add_template(&mut tree, "기본 작업", "사거리").unwrap();
        assert!(add_template(&mut tree, "기본 작업", " 사거리 ").is_err());

        template_group(&mut tree, "기본 작업", "사거리", 4, &[2, 1]).unwrap();
        template_group(&mut tree, "기본 작업", "사거리", 4, &[3]).unwrap();
        assert!(template_group(&mut tree, "기본 작업", "사거리", 4, &[1]).is_err());
        template_ungroup(&mut tree, "기본 작업", "사거리", "3").unwrap();
        assert!(template_ungroup(&mut tree, "기본 작업", "사거리", "3").is_err());

        add_template_counter(&mut tree, "기본 작업", "사거리").unwrap();
        set_template_counters(
            &mut tree,
            "기본 작업",
            "사거리",
            vec![CounterRow::new("1", 1), CounterRow::default(), CounterRow::new("2", 2)],
        )
        .unwrap();
        rename_template(&mut tree, "기본 작업", "사거리", "오거리").unwrap();

        let list = templates(&tree, "기본 작업").unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "오거리");
        assert_eq!(list[0].dirs, vec![DirectionGroup::parse("1-2")]);
        assert_eq!(list[0].counters.len(), 2);

        delete_template(&mut tree, "기본 작업", "오거리").unwrap();
        assert!(templates(&tree, "기본 작업").unwrap().is_empty());
        assert!(delete_template(&mut tree, "기본 작업", "오거리").is_err());
    }
}
