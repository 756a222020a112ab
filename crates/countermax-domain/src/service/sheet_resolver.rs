//! Counter sheet resolution
//!
//! Finds the shortcut sheet that governs one direction of a site. The search
//! runs through a fixed chain and stops at the first hit:
//!
//! 1. the catalog recorded for the direction's group (`group_projects`)
//! 2. the selected catalog
//! 3. a decimal run in the counter name read as a 1-based sheet index
//! 4. other counter rows bound to the same direction, retrying 1-3
//! 5. every catalog, by exact sheet name
//!
//! [`resolve`] never mutates. A hit in step 5 reports the catalog it found so
//! the caller can record it with [`persist_discovered_association`].

use tracing::debug;

use crate::model::group::parse_direction_numbers;
use crate::model::{Catalog, DirectionGroup, HotkeySheet, Site};

/// Catalog set plus the catalog the operator has selected
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub catalogs: &'a [Catalog],
    pub selected: usize,
}

impl<'a> ResolveContext<'a> {
    pub fn new(catalogs: &'a [Catalog], selected: usize) -> Self {
        Self { catalogs, selected }
    }

    /// Selected catalog index; an invalid selection falls back to the first catalog
    pub fn selected_index(&self) -> Option<usize> {
        if self.catalogs.is_empty() {
            None
        } else if self.selected < self.catalogs.len() {
            Some(self.selected)
        } else {
            Some(0)
        }
    }

    fn valid(&self, index: usize) -> Option<usize> {
        (index < self.catalogs.len()).then_some(index)
    }

    /// Catalog for a direction: its group's saved catalog, else the selected one
    pub fn catalog_for(&self, site: &Site, direction: u32) -> Option<usize> {
        site.catalog_for_direction(direction)
            .and_then(|i| self.valid(i))
            .or_else(|| self.selected_index())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStep {
    GroupCatalog,
    SelectedCatalog,
    NumericSuffix,
    SiblingRow,
    GlobalSearch,
}

/// A `group -> catalog` link found by the global search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredAssociation {
    pub group: DirectionGroup,
    pub catalog_index: usize,
}

#[derive(Debug, Clone)]
pub struct SheetResolution<'a> {
    pub catalog_index: usize,
    pub sheet_index: usize,
    pub sheet: &'a HotkeySheet,
    pub step: ResolutionStep,
    /// Counter name that produced the hit (a sibling's name for step 4)
    pub matched_name: String,
    pub discovered: Option<DiscoveredAssociation>,
}

/// Resolve the sheet for `(site, direction, counter_name)`.
///
/// `None` means no sheet is configured; callers fall back to the catalog's
/// vehicle types.
pub fn resolve<'a>(
    ctx: &ResolveContext<'a>,
    site: &Site,
    direction: u32,
    counter_name: &str,
) -> Option<SheetResolution<'a>> {
    let name = counter_name.trim();

    if let Some(hit) = resolve_by_name(ctx, site, direction, name) {
        return Some(hit);
    }

    for alt in siblings(site, direction, name) {
        if let Some(mut hit) = resolve_by_name(ctx, site, direction, alt) {
            debug!(direction, counter = name, sibling = alt, "resolved through sibling row");
            hit.step = ResolutionStep::SiblingRow;
            return Some(hit);
        }
    }

    if name.is_empty() {
        debug!(direction, "no counter name and no sibling sheet");
        return None;
    }

    for (catalog_index, catalog) in ctx.catalogs.iter().enumerate() {
        if let Some((sheet_index, sheet)) = catalog.find_sheet(name) {
            let discovered = site
                .group_for(direction)
                .filter(|g| site.group_projects.get(*g) != Some(&catalog_index))
                .map(|g| DiscoveredAssociation {
                    group: g.clone(),
                    catalog_index,
                });
            debug!(direction, counter = name, catalog_index, "resolved by global search");
            return Some(SheetResolution {
                catalog_index,
                sheet_index,
                sheet,
                step: ResolutionStep::GlobalSearch,
                matched_name: name.to_string(),
                discovered,
            });
        }
    }

    debug!(direction, counter = name, "no shortcut sheet configured");
    None
}

/// Resolve using the sheet name bound to the direction by the counter table
pub fn resolve_direction<'a>(
    ctx: &ResolveContext<'a>,
    site: &Site,
    direction: u32,
) -> Option<SheetResolution<'a>> {
    let name = site.counter_sheet_for(direction).unwrap_or_default();
    resolve(ctx, site, direction, name)
}

/// Record a group -> catalog link reported by [`resolve`].
/// Returns true if the site changed.
pub fn persist_discovered_association(site: &mut Site, assoc: &DiscoveredAssociation) -> bool {
    if !site.groups.contains(&assoc.group) {
        return false;
    }
    let previous = site
        .group_projects
        .insert(assoc.group.clone(), assoc.catalog_index);
    previous != Some(assoc.catalog_index)
}

/// Steps 1-3 for one name
fn resolve_by_name<'a>(
    ctx: &ResolveContext<'a>,
    site: &Site,
    direction: u32,
    name: &str,
) -> Option<SheetResolution<'a>> {
    if name.is_empty() {
        return None;
    }
    let group_catalog = site
        .catalog_for_direction(direction)
        .and_then(|i| ctx.valid(i));

    if let Some(ci) = group_catalog {
        if let Some(hit) = find_named(ctx, ci, name, ResolutionStep::GroupCatalog) {
            return Some(hit);
        }
    }
    if let Some(ci) = ctx.selected_index() {
        if let Some(hit) = find_named(ctx, ci, name, ResolutionStep::SelectedCatalog) {
            return Some(hit);
        }
    }

    let index = parse_direction_numbers(name).first().copied()?;
    let ci = group_catalog.or_else(|| ctx.selected_index())?;
    let catalog = &ctx.catalogs[ci];
    let sheet_index = (index as usize).checked_sub(1)?;
    let sheet = catalog.sheets.get(sheet_index)?;
    Some(SheetResolution {
        catalog_index: ci,
        sheet_index,
        sheet,
        step: ResolutionStep::NumericSuffix,
        matched_name: name.to_string(),
        discovered: None,
    })
}

fn find_named<'a>(
    ctx: &ResolveContext<'a>,
    catalog_index: usize,
    name: &str,
    step: ResolutionStep,
) -> Option<SheetResolution<'a>> {
    let (sheet_index, sheet) = ctx.catalogs[catalog_index].find_sheet(name)?;
    Some(SheetResolution {
        catalog_index,
        sheet_index,
        sheet,
        step,
        matched_name: name.to_string(),
        discovered: None,
    })
}

/// Other non-empty counter names bound to `direction`, in table order
fn siblings<'s>(site: &'s Site, direction: u32, name: &str) -> Vec<&'s str> {
    let mut out: Vec<&str> = Vec::new();
    for alt in site
        .counters
        .iter()
        .filter(|c| c.dir == Some(direction))
        .filter_map(|c| c.sheet_name())
    {
        if alt != name && !out.contains(&alt) {
            out.push(alt);
        }
    }
    out
}
