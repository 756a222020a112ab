//! Catalog, vehicle-type and template editing

use countermax_types::{Error, Result};
use tracing::info;

use crate::model::{Catalog, ConfigTree, CounterRow, DirectionGroup, Template, VehicleType};
use crate::service::direction_groups::DirectionGroupResolver;

fn non_empty(name: &str, what: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput(format!("{} name is empty", what)));
    }
    Ok(name.to_string())
}

fn catalog_mut(tree: &mut ConfigTree, index: usize) -> Result<&mut Catalog> {
    tree.projects
        .get_mut(index)
        .ok_or_else(|| Error::NotFound(format!("catalog #{}", index + 1)))
}

/// Append a catalog; returns its index
pub fn add_catalog(tree: &mut ConfigTree, name: &str) -> Result<usize> {
    let name = non_empty(name, "catalog")?;
    tree.projects.push(Catalog::new(name));
    Ok(tree.projects.len() - 1)
}

pub fn rename_catalog(tree: &mut ConfigTree, index: usize, name: &str) -> Result<()> {
    let name = non_empty(name, "catalog")?;
    catalog_mut(tree, index)?.name = name;
    Ok(())
}

/// Delete a catalog and repair every site's group -> catalog index.
///
/// Entries pointing at the deleted catalog are dropped; entries pointing past
/// it shift down by one. Returns the removed catalog and the number of
/// dropped entries.
pub fn delete_catalog(tree: &mut ConfigTree, index: usize) -> Result<(Catalog, usize)> {
    if index >= tree.projects.len() {
        return Err(Error::NotFound(format!("catalog #{}", index + 1)));
    }
    let removed = tree.projects.remove(index);
    let mut dropped = 0;
    for site in tree.surveys.iter_mut().flat_map(|s| s.sites.iter_mut()) {
        let before = site.group_projects.len();
        site.group_projects.retain(|_, i| *i != index);
        dropped += before - site.group_projects.len();
        for i in site.group_projects.values_mut() {
            if *i > index {
                *i -= 1;
            }
        }
    }
    info!(catalog = %removed.name, dropped, "catalog deleted");
    Ok((removed, dropped))
}

/// Replace the vehicle-type list. Rows with blank names are dropped; a zero
/// number takes the row's 1-based position.
pub fn set_vehicle_types(catalog: &mut Catalog, rows: Vec<VehicleType>) {
    catalog.vehicle_types = rows
        .into_iter()
        .filter(|v| !v.name.trim().is_empty())
        .enumerate()
        .map(|(i, mut v)| {
            v.name = v.name.trim().to_string();
            if v.number == 0 {
                v.number = i as u32 + 1;
            }
            v
        })
        .collect();
}

pub fn add_template(catalog: &mut Catalog, name: &str) -> Result<usize> {
    let name = non_empty(name, "template")?;
    catalog.templates.push(Template::new(name));
    Ok(catalog.templates.len() - 1)
}

fn template_mut(catalog: &mut Catalog, index: usize) -> Result<&mut Template> {
    catalog
        .templates
        .get_mut(index)
        .ok_or_else(|| Error::NotFound(format!("template #{}", index + 1)))
}

pub fn rename_template(catalog: &mut Catalog, index: usize, name: &str) -> Result<()> {
    let name = non_empty(name, "template")?;
    template_mut(catalog, index)?.name = name;
    Ok(())
}

pub fn delete_template(catalog: &mut Catalog, index: usize) -> Result<Template> {
    template_mut(catalog, index)?;
    Ok(catalog.templates.remove(index))
}

/// Group directions of a template out of a pool of `total`
pub fn template_group(template: &mut Template, total: u32, selected: &[u32]) -> Result<DirectionGroup> {
    let total = total.max(template.max_direction().unwrap_or(0));
    let mut r = DirectionGroupResolver::new(total, template.dirs.clone());
    let group = r.add_group(selected)?;
    template.dirs = r.into_groups();
    Ok(group)
}

pub fn template_ungroup(template: &mut Template, group: &DirectionGroup) -> bool {
    let before = template.dirs.len();
    template.dirs.retain(|g| g != group);
    template.dirs.len() != before
}

/// Append "카운터{n}" bound to direction 1
pub fn add_template_counter(template: &mut Template) -> usize {
    let name = format!("카운터{}", template.counters.len() + 1);
    template.counters.push(CounterRow::new(name, 1));
    template.counters.len() - 1
}

/// Replace the counter rows; rows blank in every field are dropped
pub fn set_template_counters(template: &mut Template, rows: Vec<CounterRow>) {
    template.counters = rows
        .into_iter()
        .filter(|c| c.sheet_name().is_some() || c.dir.is_some() || !c.label.trim().is_empty())
        .collect();
}
