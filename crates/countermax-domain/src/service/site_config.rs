//! Per-site direction and counter configuration
//!
//! Every operation leaves `direction_count` recomputed from the groups.

use countermax_types::{Error, Result};
use tracing::debug;

use crate::model::{Catalog, CounterRow, DirectionGroup, Site, Template};
use crate::service::direction_groups::DirectionGroupResolver;
use crate::service::sheet_resolver::ResolveContext;

fn resolver(site: &Site) -> DirectionGroupResolver {
    DirectionGroupResolver::new(site.default_direction_count, site.groups.clone())
}

/// Directions of the pool not yet in a group
pub fn available_directions(site: &Site) -> Vec<u32> {
    resolver(site).available()
}

/// Set the pool size and return the directions left for grouping
pub fn generate_directions(site: &mut Site, total: u32) -> Result<Vec<u32>> {
    let mut r = resolver(site);
    r.set_total(total)?;
    site.default_direction_count = total;
    site.recompute_direction_count();
    Ok(r.available())
}

pub fn group_directions(site: &mut Site, selected: &[u32]) -> Result<DirectionGroup> {
    let mut r = resolver(site);
    let group = r.add_group(selected)?;
    site.groups = r.into_groups();
    site.recompute_direction_count();
    Ok(group)
}

/// Remove a group and forget its catalog choice
pub fn ungroup(site: &mut Site, group: &DirectionGroup) -> bool {
    let mut r = resolver(site);
    if !r.remove_group(group) {
        return false;
    }
    site.groups = r.into_groups();
    site.group_projects.remove(group);
    site.recompute_direction_count();
    true
}

/// Append "카운터{n}" bound to direction 1; returns its index
pub fn add_counter_row(site: &mut Site) -> usize {
    let name = format!("카운터{}", site.counters.len() + 1);
    site.counters.push(CounterRow::new(name, 1));
    site.counters.len() - 1
}

pub fn remove_counter_row(site: &mut Site, index: usize) -> Result<CounterRow> {
    if index >= site.counters.len() {
        return Err(Error::NotFound(format!("counter row #{}", index + 1)));
    }
    Ok(site.counters.remove(index))
}

/// Replace the site's groups and counters with a template's.
///
/// The pool grows to the highest direction the template references.
pub fn apply_template(site: &mut Site, template: &Template) {
    let total = template
        .max_direction()
        .unwrap_or_else(|| site.default_direction_count.max(1));
    site.default_direction_count = total;
    site.groups = template.dirs.clone();
    site.counters = template.counters.clone();
    let groups = site.groups.clone();
    site.group_projects.retain(|g, _| groups.contains(g));
    site.recompute_direction_count();
    debug!(template = %template.name, total, "template applied");
}

/// Bind sheets of one catalog to directions of a group.
///
/// Each `(direction, sheet)` renames every counter row on that direction, or
/// appends one when there is none. Blank sheet names are skipped. The group's
/// catalog choice is recorded. Returns the number of directions bound.
pub fn assign_group_sheets(
    site: &mut Site,
    catalogs: &[Catalog],
    group: &DirectionGroup,
    catalog_index: usize,
    assignments: &[(u32, String)],
) -> Result<usize> {
    if !site.groups.contains(group) {
        return Err(Error::NotFound(format!("group {}", group)));
    }
    let catalog = catalogs
        .get(catalog_index)
        .ok_or_else(|| Error::NotFound(format!("catalog #{}", catalog_index + 1)))?;

    // validate everything before touching the site
    let mut bindings = Vec::new();
    for (direction, sheet) in assignments {
        let sheet = sheet.trim();
        if sheet.is_empty() {
            continue;
        }
        if !group.contains(*direction) {
            return Err(Error::InvalidSelection(format!(
                "direction {} is not in group {}",
                direction, group
            )));
        }
        if catalog.find_sheet(sheet).is_none() {
            return Err(Error::NotFound(format!(
                "sheet '{}' in catalog '{}'",
                sheet, catalog.name
            )));
        }
        bindings.push((*direction, sheet.to_string()));
    }

    for (direction, sheet) in &bindings {
        let mut found = false;
        for row in site.counters.iter_mut().filter(|c| c.dir == Some(*direction)) {
            row.name = sheet.clone();
            found = true;
        }
        if !found {
            site.counters.push(CounterRow::new(sheet.clone(), *direction));
        }
    }
    site.group_projects.insert(group.clone(), catalog_index);
    site.recompute_direction_count();
    Ok(bindings.len())
}

/// Catalog to offer when editing a group's sheets: the saved choice, else
/// the catalog owning a sheet already bound to one of its directions, else
/// the selected catalog
pub fn default_catalog_for_group(ctx: &ResolveContext<'_>, site: &Site, group: &DirectionGroup) -> Option<usize> {
    if let Some(&saved) = site.group_projects.get(group) {
        if saved < ctx.catalogs.len() {
            return Some(saved);
        }
    }
    let existing = site
        .counters
        .iter()
        .filter(|c| c.dir.is_some_and(|d| group.contains(d)))
        .find_map(CounterRow::sheet_name);
    if let Some(name) = existing {
        if let Some(index) = ctx.catalogs.iter().position(|c| c.find_sheet(name).is_some()) {
            return Some(index);
        }
    }
    ctx.selected_index()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HotkeySheet, SurveyState};

    fn site() -> Site {
        Site::new(1, "WN_1", 6, SurveyState::Waiting)
    }

    fn catalogs() -> Vec<Catalog> {
        let mut a = Catalog::new("A");
        a.sheets = vec![HotkeySheet { name: "1".into(), items: vec![] }];
        let mut b = Catalog::new("B");
        b.sheets = vec![
            HotkeySheet { name: "좌".into(), items: vec![] },
            HotkeySheet { name: "우".into(), items: vec![] },
        ];
        vec![a, b]
    }

    #[test]
    fn test_group_and_ungroup_recompute_count() {
        let mut s = site();
        let g = group_directions(&mut s, &[2, 1]).unwrap();
        assert_eq!(s.direction_count, 2);
        assert_eq!(available_directions(&s), vec![3, 4, 5, 6]);
        group_directions(&mut s, &[5]).unwrap();
        assert_eq!(s.direction_count, 3);

        s.group_projects.insert(g.clone(), 1);
        assert!(ungroup(&mut s, &g));
        assert!(!ungroup(&mut s, &g));
        assert!(s.group_projects.is_empty());
        assert_eq!(s.direction_count, 1);
        assert_eq!(available_directions(&s), vec![1, 2, 3, 4, 6]);
    }

    #[test]
    fn test_generate_directions() {
        let mut s = site();
        assert_eq!(generate_directions(&mut s, 3).unwrap(), vec![1, 2, 3]);
        assert_eq!(s.direction_count, 3);
        group_directions(&mut s, &[3]).unwrap();
        assert!(generate_directions(&mut s, 2).is_err());
    }

    #[test]
    fn test_counter_rows() {
        let mut s = site();
        add_counter_row(&mut s);
        let i = add_counter_row(&mut s);
        assert_eq!(s.counters[i].name, "카운터2");
        assert_eq!(s.counters[i].dir, Some(1));
        remove_counter_row(&mut s, 0).unwrap();
        assert!(remove_counter_row(&mut s, 5).is_err());
        assert_eq!(s.counters.len(), 1);
    }

    #[test]
    fn test_apply_template() {
        let mut s = site();
        let stale = DirectionGroup::parse("9");
        s.group_projects.insert(stale.clone(), 0);
        let mut t = Template::new("교차로");
        t.dirs = vec![DirectionGroup::parse("1-2"), DirectionGroup::parse("3")];
        t.counters = vec![CounterRow::new("좌", 7)];
        apply_template(&mut s, &t);
        assert_eq!(s.default_direction_count, 7);
        assert_eq!(s.direction_count, 3);
        assert_eq!(s.counters.len(), 1);
        assert!(!s.group_projects.contains_key(&stale));
    }

    #[test]
    fn test_assign_group_sheets() {
        let cats = catalogs();
        let mut s = site();
        let g = group_directions(&mut s, &[1, 2]).unwrap();
        s.counters = vec![CounterRow::new("카운터1", 1), CounterRow::new("카운터2", 1)];

        let bound = assign_group_sheets(
            &mut s,
            &cats,
            &g,
            1,
            &[(1, "좌".to_string()), (2, "우".to_string())],
        )
        .unwrap();
        assert_eq!(bound, 2);
        assert_eq!(s.counters[0].name, "좌");
        assert_eq!(s.counters[1].name, "좌");
        assert_eq!(s.counters[2], CounterRow::new("우", 2));
        assert_eq!(s.group_projects.get(&g), Some(&1));
    }

    #[test]
    fn test_assign_rejects_without_mutation() {
        let cats = catalogs();
        let mut s = site();
        let g = group_directions(&mut s, &[1, 2]).unwrap();
        let before = s.clone();
        assert!(assign_group_sheets(&mut s, &cats, &g, 1, &[(3, "좌".into())]).is_err());
        assert!(assign_group_sheets(&mut s, &cats, &g, 1, &[(1, "없음".into())]).is_err());
        assert!(assign_group_sheets(&mut s, &cats, &g, 5, &[]).is_err());
        assert_eq!(s, before);
    }

    #[test]
    fn test_default_catalog_for_group() {
        let cats = catalogs();
        let ctx = ResolveContext::new(&cats, 0);
        let mut s = site();
        let g = group_directions(&mut s, &[1, 2]).unwrap();
        assert_eq!(default_catalog_for_group(&ctx, &s, &g), Some(0));

        s.counters = vec![CounterRow::new("우", 2)];
        assert_eq!(default_catalog_for_group(&ctx, &s, &g), Some(1));

        s.group_projects.insert(g.clone(), 0);
        assert_eq!(default_catalog_for_group(&ctx, &s, &g), Some(0));
    }
}
