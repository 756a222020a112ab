//! Survey task use cases: info, time table, sites and site configuration
//!
//! Sites are addressed by their 1-based 순번 as shown to the operator.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info};

use countermax_domain::model::{
    ConfigTree, CounterRow, DirectionGroup, Site, Survey, SurveyInfo, SurveyState, TimeRange,
};
use countermax_domain::service::{
    build_schedule, hotkey_registry, persist_discovered_association, resolve_direction,
    site_config, DirectionPane, IdGenerator, RangeOutcome, ResolveContext, TimeTable,
};
use countermax_types::{Error, Result};

const NEW_SURVEY_NAME: &str = "새 조사";

#[derive(Debug, Clone, Serialize)]
pub struct SurveySummary {
    pub sn: String,
    pub name: String,
    pub state: SurveyState,
    pub catalog: String,
    pub slots: usize,
    pub sites: usize,
}

pub fn list_surveys(tree: &ConfigTree) -> Vec<SurveySummary> {
    tree.surveys
        .iter()
        .map(|s| SurveySummary {
            sn: s.info.sn.clone(),
            name: s.info.name.clone(),
            state: s.info.state,
            catalog: s.vehicle.project_ref.clone(),
            slots: s.times.len(),
            sites: s.sites.len(),
        })
        .collect()
}

pub fn find_survey<'a>(tree: &'a ConfigTree, sn: &str) -> Result<&'a Survey> {
    tree.survey(sn)
        .ok_or_else(|| Error::NotFound(format!("survey '{}'", sn)))
}

pub fn survey_mut<'a>(tree: &'a mut ConfigTree, sn: &str) -> Result<&'a mut Survey> {
    tree.survey_mut(sn)
        .ok_or_else(|| Error::NotFound(format!("survey '{}'", sn)))
}

/// Catalog the survey counts with: its 작업참조, else the first catalog
pub fn selected_catalog(tree: &ConfigTree, survey: &Survey) -> usize {
    tree.catalog_index(&survey.vehicle.project_ref).unwrap_or(0)
}

/// New survey with a fresh SN; returns the SN
pub fn create_survey(tree: &mut ConfigTree, ids: &mut IdGenerator, name: &str, now: NaiveDateTime) -> Result<String> {
    let name = match name.trim() {
        "" => NEW_SURVEY_NAME,
        n => n,
    };
    let sn = ids.next_survey_id(now, &tree.survey_ids());
    let mut survey = Survey::new(SurveyInfo::new(name, sn.clone(), now.date()));
    if let Some(catalog) = tree.projects.first() {
        survey.vehicle.project_ref = catalog.name.clone();
    }
    tree.surveys.push(survey);
    info!(sn = %sn, "survey created");
    Ok(sn)
}

/// Deep copy of a survey under a fresh SN. Every copied site gets a new
/// work order id that is unique across the whole store.
pub fn duplicate_survey(tree: &mut ConfigTree, ids: &mut IdGenerator, sn: &str, now: NaiveDateTime) -> Result<String> {
    let mut copy = find_survey(tree, sn)?.clone();
    let new_sn = ids.next_survey_id(now, &tree.survey_ids());
    copy.info.sn = new_sn.clone();

    let mut taken = tree.work_order_ids();
    for site in &mut copy.sites {
        site.work_order_id = ids.next_work_order_id(now, &taken);
        taken.insert(site.work_order_id.clone());
    }
    tree.surveys.push(copy);
    info!(from = %sn, sn = %new_sn, "survey duplicated");
    Ok(new_sn)
}

pub fn delete_survey(tree: &mut ConfigTree, sn: &str) -> Result<Survey> {
    let index = tree
        .survey_index(sn)
        .ok_or_else(|| Error::NotFound(format!("survey '{}'", sn)))?;
    Ok(tree.surveys.remove(index))
}

pub fn set_state(tree: &mut ConfigTree, sn: &str, state: SurveyState) -> Result<()> {
    survey_mut(tree, sn)?.info.state = state;
    Ok(())
}

/// "Copy from project": point the survey at `catalog` and refill its
/// vehicle rows from the catalog's vehicle types. Returns the row count.
pub fn copy_vehicle_rows(tree: &mut ConfigTree, sn: &str, catalog: &str) -> Result<usize> {
    let index = tree
        .catalog_index(catalog)
        .ok_or_else(|| Error::NotFound(format!("catalog '{}'", catalog.trim())))?;
    let catalog = &tree.projects[index];
    let rows = hotkey_registry::seed_items(catalog);
    let name = catalog.name.clone();

    let survey = survey_mut(tree, sn)?;
    survey.vehicle.project_ref = name;
    survey.vehicle.rows = rows;
    Ok(survey.vehicle.rows.len())
}

fn checked_range(range: TimeRange) -> Result<TimeRange> {
    if range.step_minutes == 0 {
        return Err(Error::InvalidTimeRange("step must be at least one minute".to_string()));
    }
    if range.start >= range.end {
        return Err(Error::InvalidTimeRange(format!(
            "{} is not before {}",
            range.start.format("%H:%M"),
            range.end.format("%H:%M")
        )));
    }
    Ok(range)
}

/// Interactive add: a range that was already added is reported, not appended
pub fn add_time_range(tree: &mut ConfigTree, sn: &str, range: TimeRange) -> Result<RangeOutcome> {
    let range = checked_range(range)?;
    Ok(TimeTable::new(survey_mut(tree, sn)?).add_range(range))
}

/// Auto-generate: always appends; returns the number of slots added
pub fn generate_times(tree: &mut ConfigTree, sn: &str, range: TimeRange) -> Result<usize> {
    let range = checked_range(range)?;
    Ok(TimeTable::new(survey_mut(tree, sn)?).generate(range))
}

/// Delete slots by 1-based number
pub fn remove_time_rows(tree: &mut ConfigTree, sn: &str, numbers: &[usize]) -> Result<usize> {
    let indices: Vec<usize> = numbers.iter().filter_map(|n| n.checked_sub(1)).collect();
    Ok(TimeTable::new(survey_mut(tree, sn)?).remove_rows(&indices))
}

pub fn reset_times(tree: &mut ConfigTree, sn: &str) -> Result<()> {
    TimeTable::new(survey_mut(tree, sn)?).reset();
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteSummary {
    pub sequence: u32,
    pub work_order_id: String,
    pub parcel_id: String,
    pub name: String,
    pub direction_count: u32,
    pub groups: Vec<String>,
    /// (sheet name, direction)
    pub counters: Vec<(String, Option<u32>)>,
}

pub fn list_sites(tree: &ConfigTree, sn: &str) -> Result<Vec<SiteSummary>> {
    Ok(find_survey(tree, sn)?
        .sites
        .iter()
        .map(|s| SiteSummary {
            sequence: s.sequence,
            work_order_id: s.work_order_id.clone(),
            parcel_id: s.parcel_id.clone(),
            name: s.name.clone(),
            direction_count: s.direction_count,
            groups: s.groups.iter().map(DirectionGroup::label).collect(),
            counters: s.counters.iter().map(|c| (c.name.clone(), c.dir)).collect(),
        })
        .collect())
}

fn site_index(survey: &Survey, sequence: usize) -> Result<usize> {
    sequence
        .checked_sub(1)
        .filter(|&i| i < survey.sites.len())
        .ok_or_else(|| Error::NotFound(format!("site #{} in survey '{}'", sequence, survey.info.sn)))
}

pub fn find_site<'a>(tree: &'a ConfigTree, sn: &str, sequence: usize) -> Result<&'a Site> {
    let survey = find_survey(tree, sn)?;
    Ok(&survey.sites[site_index(survey, sequence)?])
}

pub fn site_mut<'a>(tree: &'a mut ConfigTree, sn: &str, sequence: usize) -> Result<&'a mut Site> {
    let survey = survey_mut(tree, sn)?;
    let index = site_index(survey, sequence)?;
    Ok(&mut survey.sites[index])
}

/// Append a site with a fresh work order id; returns that id
pub fn add_site(
    tree: &mut ConfigTree,
    ids: &mut IdGenerator,
    sn: &str,
    name: &str,
    direction_count: u32,
    now: NaiveDateTime,
) -> Result<String> {
    let taken = tree.work_order_ids();
    let survey = survey_mut(tree, sn)?;
    let wn = ids.next_work_order_id(now, &taken);
    let mut site = Site::new(0, wn.clone(), direction_count, survey.info.state);
    site.name = name.trim().to_string();
    survey.push_site(site);
    Ok(wn)
}

/// Delete sites by 1-based sequence; the rest are renumbered
pub fn delete_sites(tree: &mut ConfigTree, sn: &str, sequences: &[usize]) -> Result<usize> {
    let indices: Vec<usize> = sequences.iter().filter_map(|n| n.checked_sub(1)).collect();
    Ok(survey_mut(tree, sn)?.remove_sites(&indices))
}

/// Move a site up (negative) or down; returns its new sequence
pub fn move_site(tree: &mut ConfigTree, sn: &str, sequence: usize, delta: isize) -> Result<usize> {
    let survey = survey_mut(tree, sn)?;
    let index = site_index(survey, sequence)?;
    survey
        .move_site(index, delta)
        .map(|i| i + 1)
        .ok_or_else(|| Error::InvalidInput(format!("site #{} cannot move by {}", sequence, delta)))
}

pub fn move_site_top(tree: &mut ConfigTree, sn: &str, sequence: usize) -> Result<bool> {
    let survey = survey_mut(tree, sn)?;
    let index = site_index(survey, sequence)?;
    Ok(survey.move_site_top(index))
}

/// Resize the direction pool; returns the directions still ungrouped
pub fn generate_directions(tree: &mut ConfigTree, sn: &str, sequence: usize, total: u32) -> Result<Vec<u32>> {
    site_config::generate_directions(site_mut(tree, sn, sequence)?, total)
}

pub fn group_directions(tree: &mut ConfigTree, sn: &str, sequence: usize, directions: &[u32]) -> Result<DirectionGroup> {
    site_config::group_directions(site_mut(tree, sn, sequence)?, directions)
}

pub fn ungroup(tree: &mut ConfigTree, sn: &str, sequence: usize, group: &str) -> Result<()> {
    let group = DirectionGroup::parse(group);
    if !site_config::ungroup(site_mut(tree, sn, sequence)?, &group) {
        return Err(Error::NotFound(format!("group {}", group)));
    }
    Ok(())
}

pub fn add_counter_row(tree: &mut ConfigTree, sn: &str, sequence: usize) -> Result<usize> {
    Ok(site_config::add_counter_row(site_mut(tree, sn, sequence)?))
}

/// Delete counter row `row` (1-based)
pub fn delete_counter_row(tree: &mut ConfigTree, sn: &str, sequence: usize, row: usize) -> Result<CounterRow> {
    if row == 0 {
        return Err(Error::NotFound("counter row #0".to_string()));
    }
    site_config::remove_counter_row(site_mut(tree, sn, sequence)?, row - 1)
}

/// Replace a site's groups and counters with a catalog template
pub fn apply_template(tree: &mut ConfigTree, sn: &str, sequence: usize, catalog: &str, template: &str) -> Result<()> {
    let index = tree
        .catalog_index(catalog)
        .ok_or_else(|| Error::NotFound(format!("catalog '{}'", catalog.trim())))?;
    let template = tree.projects[index]
        .templates
        .iter()
        .find(|t| t.name.trim() == template.trim())
        .cloned()
        .ok_or_else(|| Error::NotFound(format!("template '{}'", template.trim())))?;
    site_config::apply_template(site_mut(tree, sn, sequence)?, &template);
    Ok(())
}

/// Bind sheets to a group's directions. Without `catalog` the group's
/// default catalog is used.
pub fn assign_sheets(
    tree: &mut ConfigTree,
    sn: &str,
    sequence: usize,
    group: &str,
    catalog: Option<&str>,
    assignments: &[(u32, String)],
) -> Result<usize> {
    let group = DirectionGroup::parse(group);
    let catalog_index = match catalog {
        Some(name) => tree
            .catalog_index(name)
            .ok_or_else(|| Error::NotFound(format!("catalog '{}'", name.trim())))?,
        None => {
            let survey = find_survey(tree, sn)?;
            let ctx = ResolveContext::new(&tree.projects, selected_catalog(tree, survey));
            let site = &survey.sites[site_index(survey, sequence)?];
            site_config::default_catalog_for_group(&ctx, site, &group)
                .ok_or_else(|| Error::NotFound("catalog".to_string()))?
        }
    };

    let ConfigTree { projects, surveys, .. } = tree;
    let survey = surveys
        .iter_mut()
        .find(|s| s.info.sn == sn)
        .ok_or_else(|| Error::NotFound(format!("survey '{}'", sn)))?;
    let index = site_index(survey, sequence)?;
    site_config::assign_group_sheets(&mut survey.sites[index], projects, &group, catalog_index, assignments)
}

/// How one direction's sheet was found
#[derive(Debug, Clone, Serialize)]
pub struct DirectionResolution {
    pub direction: u32,
    pub counter: String,
    pub catalog: Option<String>,
    pub sheet: Option<String>,
    pub step: Option<String>,
    /// The group -> catalog link was learned by the global search
    pub discovered: bool,
}

/// Resolve every realized direction of a site. With `persist`, links found
/// by the global search are recorded on the site.
pub fn resolve_site(tree: &mut ConfigTree, sn: &str, sequence: usize, persist: bool) -> Result<Vec<DirectionResolution>> {
    let mut found = Vec::new();
    let report: Vec<DirectionResolution> = {
        let survey = find_survey(tree, sn)?;
        let site = &survey.sites[site_index(survey, sequence)?];
        let ctx = ResolveContext::new(&tree.projects, selected_catalog(tree, survey));
        site.realized_directions()
            .into_iter()
            .map(|direction| {
                let counter = site.counter_sheet_for(direction).unwrap_or_default().to_string();
                match resolve_direction(&ctx, site, direction) {
                    Some(hit) => {
                        if let Some(assoc) = &hit.discovered {
                            found.push(assoc.clone());
                        }
                        DirectionResolution {
                            direction,
                            counter,
                            catalog: Some(tree.projects[hit.catalog_index].name.clone()),
                            sheet: Some(hit.sheet.name.clone()),
                            step: Some(format!("{:?}", hit.step)),
                            discovered: hit.discovered.is_some(),
                        }
                    }
                    None => DirectionResolution {
                        direction,
                        counter,
                        catalog: None,
                        sheet: None,
                        step: None,
                        discovered: false,
                    },
                }
            })
            .collect()
    };

    if persist && !found.is_empty() {
        let site = site_mut(tree, sn, sequence)?;
        let changed = found
            .iter()
            .filter(|assoc| persist_discovered_association(site, assoc))
            .count();
        debug!(changed, "discovered group catalogs recorded");
    }
    Ok(report)
}

/// Zero-filled schedule panes for a site
pub fn preview(tree: &ConfigTree, sn: &str, sequence: usize) -> Result<Vec<DirectionPane>> {
    let survey = find_survey(tree, sn)?;
    let site = &survey.sites[site_index(survey, sequence)?];
    let ctx = ResolveContext::new(&tree.projects, selected_catalog(tree, survey));
    Ok(build_schedule(&ctx, site, &survey.times))
}
