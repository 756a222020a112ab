//! Command handlers

use chrono::{Local, NaiveDate, NaiveTime};
use tracing::debug;

use countermax_app::app::{catalog_service, survey_service, task_service, user_service};
use countermax_app::config::Config;
use countermax_app::export::export_schedule;
use countermax_app::repository::{open_config_repo, open_session, open_task_repo};
use countermax_domain::model::group::parse_direction_numbers;
use countermax_domain::model::lenient::parse_time;
use countermax_domain::model::{CounterRow, SurveyState, TimeRange, UserRole};
use countermax_domain::repository::ConfigTreeRepository;
use countermax_domain::service::{IdGenerator, RangeOutcome};
use countermax_types::{Error, OutputFormat, Result};

use crate::cli::{
    CatalogCommand, Cli, Commands, ConfigArgs, DatCommand, SiteCommand, SurveyCommand,
    TemplateCommand, TimeCommand, UserCommand,
};
use crate::output::*;

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if cli.data_root.is_some() {
        config.data_root = cli.data_root.clone();
    }
    let format = cli.format.unwrap_or(config.output_format);
    debug!("data root override: {:?}", config.data_root);

    match cli.command {
        Commands::Config(args) => handle_config(args),
        Commands::Catalog(cmd) => handle_catalog(&config, format, cmd),
        Commands::Survey(cmd) => handle_survey(&config, format, cmd),
        Commands::Time(cmd) => handle_time(&config, format, cmd),
        Commands::Site(cmd) => handle_site(&config, format, cmd),
        Commands::User(cmd) => handle_user(&config, format, cmd),
        Commands::Dat(cmd) => handle_dat(&config, format, cmd),
        Commands::ExportHotkeys => {
            let repo = open_config_repo(&config)?;
            let tree = repo.load()?;
            let path = repo.export_hotkeys(&tree)?;
            output_message(format, &format!("Exported: {}", path.display()))
        }
    }
}

fn handle_config(args: ConfigArgs) -> Result<()> {
    if args.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    // Edit the stored config, not the copy with CLI overrides applied
    let mut config = Config::load()?;
    let mut changed = false;

    if let Some(dir) = args.set_data_root {
        config.data_root = Some(dir);
        changed = true;
    }
    if let Some(format) = args.set_output {
        config.output_format = format;
        changed = true;
    }
    if let Some(n) = args.set_direction_count {
        if n == 0 {
            return Err(Error::InvalidInput("direction count must be at least 1".to_string()));
        }
        config.default_direction_count = n;
        changed = true;
    }
    if let Some(step) = args.set_step {
        if step == 0 {
            return Err(Error::InvalidInput("step must be at least one minute".to_string()));
        }
        config.default_step_minutes = step;
        changed = true;
    }
    if let Some(start) = args.set_start {
        parse_hhmm(&start)?;
        config.default_start = start;
        changed = true;
    }
    if let Some(end) = args.set_end {
        parse_hhmm(&end)?;
        config.default_end = end;
        changed = true;
    }
    if let Some(id) = args.set_operator {
        config.operator_id = Some(id.trim().to_string()).filter(|s| !s.is_empty());
        changed = true;
    }
    if let Some(enabled) = args.set_export_hotkeys {
        config.export_hotkeys_db = enabled;
        changed = true;
    }

    if changed {
        config.save()?;
        println!("Configuration updated");
    }

    if args.show || !changed {
        println!("{}", config);
    }

    Ok(())
}

fn handle_catalog(config: &Config, format: OutputFormat, cmd: CatalogCommand) -> Result<()> {
    let session = open_session(config)?;
    match cmd {
        CatalogCommand::List => output_catalogs(format, &catalog_service::list_catalogs(&session.load()?)),
        CatalogCommand::Add { name, vehicle_types } => {
            session.apply(|tree| catalog_service::create_catalog(tree, &name, &vehicle_types))?;
            output_message(format, &format!("Catalog added: {}", name.trim()))
        }
        CatalogCommand::Rename { name, new_name } => {
            session.apply(|tree| catalog_service::rename_catalog(tree, &name, &new_name))?;
            output_message(format, &format!("Catalog renamed: {} -> {}", name, new_name.trim()))
        }
        CatalogCommand::Delete { name } => {
            let dropped = session.apply(|tree| catalog_service::delete_catalog(tree, &name))?;
            output_message(
                format,
                &format!("Catalog deleted: {} ({} site group links removed)", name, dropped),
            )
        }
        CatalogCommand::SetTypes { name, vehicle_types } => {
            session.apply(|tree| catalog_service::set_vehicle_types(tree, &name, &vehicle_types))?;
            output_message(format, &format!("Vehicle types updated: {}", name))
        }
        CatalogCommand::Sheets { name, sheet: None } => {
            let names = session.apply(|tree| catalog_service::sheets(tree, &name))?;
            output_names(format, &names)
        }
        CatalogCommand::Sheets { name, sheet: Some(sheet) } => {
            let items = catalog_service::sheet_items(&session.load()?, &name, &sheet)?;
            output_sheet_items(format, &items)
        }
        CatalogCommand::AddSheet { name } => {
            let sheet = session.apply(|tree| catalog_service::add_sheet(tree, &name))?;
            output_message(format, &format!("Sheet added: {}", sheet))
        }
        CatalogCommand::RenameSheet { name, sheet, new_name } => {
            session.apply(|tree| catalog_service::rename_sheet(tree, &name, &sheet, &new_name))?;
            output_message(format, &format!("Sheet renamed: {} -> {}", sheet, new_name.trim()))
        }
        CatalogCommand::DeleteSheet { name, sheet } => {
            let names = session.apply(|tree| catalog_service::delete_sheet(tree, &name, &sheet))?;
            output_names(format, &names)
        }
        CatalogCommand::SetKey { name, sheet, vehicle_type, key } => {
            session.apply(|tree| catalog_service::set_key(tree, &name, &sheet, &vehicle_type, &key))?;
            output_message(format, &format!("{}: {} = {}", sheet, vehicle_type, key.trim()))
        }
        CatalogCommand::ResetKeys { name, sheet } => {
            session.apply(|tree| catalog_service::reset_keys(tree, &name, &sheet))?;
            output_message(format, &format!("Shortcuts cleared: {}", sheet))
        }
        CatalogCommand::Template(cmd) => handle_template(config, format, cmd),
    }
}

fn handle_template(config: &Config, format: OutputFormat, cmd: TemplateCommand) -> Result<()> {
    let session = open_session(config)?;
    match cmd {
        TemplateCommand::List { name } => output_templates(format, &catalog_service::templates(&session.load()?, &name)?),
        TemplateCommand::Add { name, template } => {
            session.apply(|tree| catalog_service::add_template(tree, &name, &template))?;
            output_message(format, &format!("Template added: {}", template.trim()))
        }
        TemplateCommand::Rename { name, template, new_name } => {
            session.apply(|tree| catalog_service::rename_template(tree, &name, &template, &new_name))?;
            output_message(format, &format!("Template renamed: {} -> {}", template, new_name.trim()))
        }
        TemplateCommand::Delete { name, template } => {
            session.apply(|tree| catalog_service::delete_template(tree, &name, &template))?;
            output_message(format, &format!("Template deleted: {}", template))
        }
        TemplateCommand::Group { name, template, directions, total } => {
            let selected = parse_direction_numbers(&directions);
            let total = total.unwrap_or(config.default_direction_count);
            let group = session
                .apply(|tree| catalog_service::template_group(tree, &name, &template, total, &selected))?;
            output_message(format, &format!("Group added: {}", group))
        }
        TemplateCommand::Ungroup { name, template, group } => {
            session.apply(|tree| catalog_service::template_ungroup(tree, &name, &template, &group))?;
            output_message(format, &format!("Group removed: {}", group))
        }
        TemplateCommand::AddCounter { name, template } => {
            let index = session.apply(|tree| catalog_service::add_template_counter(tree, &name, &template))?;
            output_message(format, &format!("Counter row #{} added", index + 1))
        }
        TemplateCommand::SetCounters { name, template, rows } => {
            let rows = rows
                .iter()
                .map(|r| parse_counter_row(r))
                .collect::<Result<Vec<_>>>()?;
            let n = rows.len();
            session.apply(|tree| catalog_service::set_template_counters(tree, &name, &template, rows))?;
            output_message(format, &format!("{} counter rows set", n))
        }
    }
}

fn handle_survey(config: &Config, format: OutputFormat, cmd: SurveyCommand) -> Result<()> {
    let session = open_session(config)?;
    let mut ids = IdGenerator::new();
    let now = Local::now().naive_local();
    match cmd {
        SurveyCommand::List => output_surveys(format, &survey_service::list_surveys(&session.load()?)),
        SurveyCommand::Add { name } => {
            let sn = session.apply(|tree| survey_service::create_survey(tree, &mut ids, &name, now))?;
            output_message(format, &sn)
        }
        SurveyCommand::Duplicate { sn } => {
            let copy = session.apply(|tree| survey_service::duplicate_survey(tree, &mut ids, &sn, now))?;
            output_message(format, &copy)
        }
        SurveyCommand::Delete { sn } => {
            session.apply(|tree| survey_service::delete_survey(tree, &sn))?;
            output_message(format, &format!("Survey deleted: {}", sn))
        }
        SurveyCommand::State { sn, state } => {
            let state = SurveyState::from_label(&state).ok_or_else(|| {
                Error::InvalidInput(format!("unknown state '{}' (대기, 진행, 완료)", state))
            })?;
            session.apply(|tree| survey_service::set_state(tree, &sn, state))?;
            output_message(format, &format!("{}: {}", sn, state))
        }
        SurveyCommand::CopyVehicles { sn, catalog } => {
            let rows = session.apply(|tree| survey_service::copy_vehicle_rows(tree, &sn, &catalog))?;
            output_message(format, &format!("{} vehicle rows copied from {}", rows, catalog))
        }
    }
}

fn handle_time(config: &Config, format: OutputFormat, cmd: TimeCommand) -> Result<()> {
    let session = open_session(config)?;
    match cmd {
        TimeCommand::AddRange { sn, start, end, step } => {
            let range = TimeRange::new(
                parse_hhmm(&start)?,
                parse_hhmm(&end)?,
                step.unwrap_or(config.default_step_minutes),
            );
            let message = match session.apply(|tree| survey_service::add_time_range(tree, &sn, range))? {
                RangeOutcome::Added(n) => format!("{} slots added", n),
                RangeOutcome::Duplicate => "Range already added; nothing changed".to_string(),
                RangeOutcome::EmptyRange => "Empty range; nothing changed".to_string(),
            };
            output_message(format, &message)
        }
        TimeCommand::Generate { sn, start, end, step } => {
            let start = match start {
                Some(s) => parse_hhmm(&s)?,
                None => config.start_time()?,
            };
            let end = match end {
                Some(s) => parse_hhmm(&s)?,
                None => config.end_time()?,
            };
            let range = TimeRange::new(start, end, step.unwrap_or(config.default_step_minutes));
            let n = session.apply(|tree| survey_service::generate_times(tree, &sn, range))?;
            output_message(format, &format!("{} slots added", n))
        }
        TimeCommand::List { sn } => {
            let tree = session.load()?;
            output_time_slots(format, &survey_service::find_survey(&tree, &sn)?.times)
        }
        TimeCommand::Delete { sn, rows } => {
            let n = session.apply(|tree| survey_service::remove_time_rows(tree, &sn, &rows))?;
            output_message(format, &format!("{} slots deleted", n))
        }
        TimeCommand::Reset { sn } => {
            session.apply(|tree| survey_service::reset_times(tree, &sn))?;
            output_message(format, "Time table cleared")
        }
    }
}

fn handle_site(config: &Config, format: OutputFormat, cmd: SiteCommand) -> Result<()> {
    let session = open_session(config)?;
    match cmd {
        SiteCommand::List { sn } => output_sites(format, &survey_service::list_sites(&session.load()?, &sn)?),
        SiteCommand::Add { sn, name, directions } => {
            let mut ids = IdGenerator::new();
            let now = Local::now().naive_local();
            let dirs = directions.unwrap_or(config.default_direction_count);
            let wn = session.apply(|tree| survey_service::add_site(tree, &mut ids, &sn, &name, dirs, now))?;
            output_message(format, &wn)
        }
        SiteCommand::Delete { sn, sites } => {
            let n = session.apply(|tree| survey_service::delete_sites(tree, &sn, &sites))?;
            output_message(format, &format!("{} sites deleted", n))
        }
        SiteCommand::Move { sn, site, up, down, top } => {
            let message = if top {
                session.apply(|tree| survey_service::move_site_top(tree, &sn, site))?;
                format!("Site #{} moved to the top", site)
            } else {
                let delta = match (up, down) {
                    (true, _) => -1,
                    (_, true) => 1,
                    _ => return Err(Error::InvalidInput("choose --up, --down or --top".to_string())),
                };
                let to = session.apply(|tree| survey_service::move_site(tree, &sn, site, delta))?;
                format!("Site #{} is now #{}", site, to)
            };
            output_message(format, &message)
        }
        SiteCommand::Directions { sn, site, total } => {
            let free = session.apply(|tree| survey_service::generate_directions(tree, &sn, site, total))?;
            let free: Vec<String> = free.iter().map(u32::to_string).collect();
            output_message(format, &format!("Ungrouped directions: {}", free.join(", ")))
        }
        SiteCommand::Group { sn, site, directions } => {
            let selected = parse_direction_numbers(&directions);
            let group = session.apply(|tree| survey_service::group_directions(tree, &sn, site, &selected))?;
            output_message(format, &format!("Group added: {}", group))
        }
        SiteCommand::Ungroup { sn, site, group } => {
            session.apply(|tree| survey_service::ungroup(tree, &sn, site, &group))?;
            output_message(format, &format!("Group removed: {}", group))
        }
        SiteCommand::AddCounter { sn, site } => {
            let index = session.apply(|tree| survey_service::add_counter_row(tree, &sn, site))?;
            output_message(format, &format!("Counter row #{} added", index + 1))
        }
        SiteCommand::DeleteCounter { sn, site, row } => {
            let removed = session.apply(|tree| survey_service::delete_counter_row(tree, &sn, site, row))?;
            output_message(format, &format!("Counter row #{} deleted: {}", row, removed.name))
        }
        SiteCommand::ApplyTemplate { sn, site, catalog, template } => {
            session.apply(|tree| survey_service::apply_template(tree, &sn, site, &catalog, &template))?;
            output_message(format, &format!("Template applied: {}", template))
        }
        SiteCommand::AssignSheets { sn, site, group, assignments, catalog } => {
            let assignments = assignments
                .iter()
                .map(|a| parse_assignment(a))
                .collect::<Result<Vec<_>>>()?;
            let n = session.apply(|tree| {
                survey_service::assign_sheets(tree, &sn, site, &group, catalog.as_deref(), &assignments)
            })?;
            output_message(format, &format!("{} directions bound", n))
        }
        SiteCommand::Resolve { sn, site, persist } => {
            let report = if persist {
                session.apply(|tree| survey_service::resolve_site(tree, &sn, site, true))?
            } else {
                let mut tree = session.load()?;
                survey_service::resolve_site(&mut tree, &sn, site, false)?
            };
            output_resolutions(format, &report)
        }
        SiteCommand::Preview { sn, site, output } => {
            let panes = survey_service::preview(&session.load()?, &sn, site)?;
            if let Some(path) = output {
                export_schedule(&panes, &path)?;
                eprintln!("Exported to: {}", path.display());
            }
            output_panes(format, &panes)
        }
    }
}

fn handle_user(config: &Config, format: OutputFormat, cmd: UserCommand) -> Result<()> {
    let session = open_session(config)?;
    match cmd {
        UserCommand::List => output_users(format, &session.load()?.users),
        UserCommand::Add { id, name, admin } => {
            let role = if admin { UserRole::Admin } else { UserRole::Operator };
            let today = Local::now().date_naive();
            let number = session.apply(|tree| user_service::add_user(tree, &id, &name, role, today))?;
            output_message(format, &format!("User #{} added: {}", number, id.trim()))
        }
        UserCommand::Delete { id } => {
            session.apply(|tree| user_service::delete_user(tree, &id))?;
            output_message(format, &format!("User deleted: {}", id))
        }
    }
}

fn handle_dat(config: &Config, format: OutputFormat, cmd: DatCommand) -> Result<()> {
    let tasks = open_task_repo(config)?;
    match cmd {
        DatCommand::Write { sn, site, user, date } => {
            let user = user
                .or_else(|| config.operator_id.clone())
                .ok_or_else(|| Error::InvalidInput("no operator id (--user or config --set-operator)".to_string()))?;
            let now = Local::now().naive_local();
            let rec_date = match date {
                Some(d) => NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d")
                    .map_err(|_| Error::InvalidInput(format!("invalid date '{}'", d)))?,
                None => now.date(),
            };
            let tree = open_session(config)?.load()?;
            let path = task_service::write_task_file(&tasks, &tree, &sn, site, &user, rec_date, now)?;
            output_message(format, &format!("Written: {}", path.display()))
        }
        DatCommand::List { sn } => output_names(format, &task_service::list_task_files(&tasks, &sn)?),
        DatCommand::Show { sn, doc_no } => {
            let doc = task_service::read_task_file(&tasks, &sn, &doc_no)?;
            output_task_document(format, &doc)
        }
    }
}

fn parse_hhmm(raw: &str) -> Result<NaiveTime> {
    parse_time(raw).ok_or_else(|| Error::InvalidInput(format!("invalid time '{}' (HH:MM)", raw)))
}

/// "3=좌회전" -> (3, "좌회전")
fn parse_assignment(raw: &str) -> Result<(u32, String)> {
    let invalid = || Error::InvalidInput(format!("invalid assignment '{}' (direction=sheet)", raw));
    let (direction, sheet) = raw.split_once('=').ok_or_else(invalid)?;
    let direction = direction.trim().parse().map_err(|_| invalid())?;
    Ok((direction, sheet.trim().to_string()))
}

/// "3=좌회전" or "3=좌회전:좌" -> counter row for direction 3
fn parse_counter_row(raw: &str) -> Result<CounterRow> {
    let (direction, sheet) = parse_assignment(raw)?;
    let (sheet, label) = sheet.split_once(':').unwrap_or((sheet.as_str(), ""));
    let mut row = CounterRow::new(sheet.trim(), direction);
    row.label = label.trim().to_string();
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("3=좌회전").unwrap(), (3, "좌회전".to_string()));
        assert_eq!(parse_assignment(" 1 = 1 ").unwrap(), (1, "1".to_string()));
        assert!(parse_assignment("좌회전").is_err());
        assert!(parse_assignment("x=1").is_err());
    }

    #[test]
    fn test_parse_counter_row() {
        let row = parse_counter_row("2=좌회전:좌").unwrap();
        assert_eq!(row.dir, Some(2));
        assert_eq!(row.name, "좌회전");
        assert_eq!(row.label, "좌");
        assert_eq!(parse_counter_row("1=1").unwrap().label, "");
        assert!(parse_counter_row("좌회전").is_err());
    }

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("07:30").unwrap(), NaiveTime::from_hms_opt(7, 30, 0).unwrap());
        assert!(parse_hhmm("25:00").is_err());
    }
}
