//! Output formatting module

use serde::Serialize;
use serde_json::json;

use countermax_app::app::catalog_service::CatalogSummary;
use countermax_app::app::survey_service::{DirectionResolution, SiteSummary, SurveySummary};
use countermax_domain::model::{CountMatrix, HotkeyItem, TaskDocument, Template, TimeSlot, User};
use countermax_domain::service::DirectionPane;
use countermax_types::{OutputFormat, Result};

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One-line confirmation, or `{"message": ...}` in JSON mode
pub fn output_message(format: OutputFormat, message: &str) -> Result<()> {
    if format == OutputFormat::Json {
        print_json(&json!({ "message": message }))
    } else {
        println!("{}", message);
        Ok(())
    }
}

pub fn output_catalogs(format: OutputFormat, catalogs: &[CatalogSummary]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(catalogs);
    }
    println!("{:<4} {:<20} {:<8} {:<8} Vehicle types", "#", "Catalog", "Sheets", "Tmpl");
    for c in catalogs {
        println!(
            "{:<4} {:<20} {:<8} {:<8} {}",
            c.index + 1,
            c.name,
            c.sheets.len(),
            c.templates,
            c.vehicle_types.join(", ")
        );
    }
    Ok(())
}

pub fn output_names(format: OutputFormat, names: &[String]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(names);
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

pub fn output_sheet_items(format: OutputFormat, items: &[HotkeyItem]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(items);
    }
    println!("{:<4} {:<16} Key", "#", "Vehicle type");
    for item in items {
        println!("{:<4} {:<16} {}", item.sequence, item.vehicle_type, item.shortcut);
    }
    Ok(())
}

pub fn output_templates(format: OutputFormat, templates: &[Template]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(templates);
    }
    for t in templates {
        let groups: Vec<String> = t.dirs.iter().map(ToString::to_string).collect();
        println!("{}  [{}]", t.name, groups.join("] ["));
        for (i, c) in t.counters.iter().enumerate() {
            let dir = c.dir.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
            println!("  {:>2}. {}→{} {}", i + 1, dir, c.name, c.label);
        }
    }
    Ok(())
}

pub fn output_surveys(format: OutputFormat, surveys: &[SurveySummary]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(surveys);
    }
    println!("{:<22} {:<6} {:<20} {:<6} {:<6} Catalog", "SN", "State", "Name", "Slots", "Sites");
    for s in surveys {
        println!(
            "{:<22} {:<6} {:<20} {:<6} {:<6} {}",
            s.sn, s.state, s.name, s.slots, s.sites, s.catalog
        );
    }
    Ok(())
}

pub fn output_time_slots(format: OutputFormat, slots: &[TimeSlot]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(slots);
    }
    for slot in slots {
        println!("{:>3}  {}", slot.sequence, slot.label());
    }
    Ok(())
}

pub fn output_sites(format: OutputFormat, sites: &[SiteSummary]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(sites);
    }
    println!("{:<4} {:<20} {:<16} {:<5} Groups / counters", "#", "Work order", "Name", "Dirs");
    for s in sites {
        let counters: Vec<String> = s
            .counters
            .iter()
            .map(|(name, dir)| match dir {
                Some(d) => format!("{}→{}", d, name),
                None => format!("-→{}", name),
            })
            .collect();
        println!(
            "{:<4} {:<20} {:<16} {:<5} [{}] {}",
            s.sequence,
            s.work_order_id,
            s.name,
            s.direction_count,
            s.groups.join("] ["),
            counters.join(", ")
        );
    }
    Ok(())
}

pub fn output_resolutions(format: OutputFormat, report: &[DirectionResolution]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(report);
    }
    for r in report {
        match (&r.catalog, &r.sheet) {
            (Some(catalog), Some(sheet)) => println!(
                "{}번 방향: '{}' -> {} / {} ({}){}",
                r.direction,
                r.counter,
                catalog,
                sheet,
                r.step.as_deref().unwrap_or(""),
                if r.discovered { " [new link]" } else { "" }
            ),
            _ => println!(
                "{}번 방향: '{}' -> no sheet, catalog vehicle types",
                r.direction, r.counter
            ),
        }
    }
    Ok(())
}

pub fn output_panes(format: OutputFormat, panes: &[DirectionPane]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(panes);
    }
    for pane in panes {
        println!("\n{}", pane.title);
        println!("{}", "=".repeat(pane.title.chars().count() * 2));
        println!("{}", pane.header().join("\t"));
        for row in pane.cells() {
            println!("{}", row.join("\t"));
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct UserRow<'a> {
    number: u32,
    id: &'a str,
    name: &'a str,
    role: &'static str,
    status: &'static str,
    start: Option<String>,
    end: Option<String>,
}

/// Passwords are never printed
pub fn output_users(format: OutputFormat, users: &[User]) -> Result<()> {
    let rows: Vec<UserRow> = users
        .iter()
        .map(|u| UserRow {
            number: u.number,
            id: &u.id,
            name: &u.name,
            role: u.role.label(),
            status: u.status.label(),
            start: u.start.map(|d| d.to_string()),
            end: u.end.map(|d| d.to_string()),
        })
        .collect();
    if format == OutputFormat::Json {
        return print_json(&rows);
    }
    println!("{:<4} {:<12} {:<10} {:<10} {:<6} Period", "#", "Id", "Name", "Role", "Status");
    for r in &rows {
        println!(
            "{:<4} {:<12} {:<10} {:<10} {:<6} {}~{}",
            r.number,
            r.id,
            r.name,
            r.role,
            r.status,
            r.start.as_deref().unwrap_or(""),
            r.end.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

pub fn output_task_document(format: OutputFormat, doc: &TaskDocument) -> Result<()> {
    if format == OutputFormat::Json {
        let info: serde_json::Map<String, serde_json::Value> = doc
            .info
            .iter()
            .map(|(k, v)| (k.clone(), json!(v)))
            .collect();
        let sections: Vec<Vec<Vec<i64>>> = doc.matrices().into_iter().map(|m| m.rows).collect();
        return print_json(&json!({ "info": info, "sections": sections }));
    }
    for (key, value) in &doc.info {
        println!("{:<11} {}", key, value);
    }
    for (index, cells) in &doc.sections {
        let matrix = CountMatrix::from_cells(cells);
        println!("\n[{}] total {}", index, matrix.total());
        for row in &matrix.rows {
            let cells: Vec<String> = row.iter().map(i64::to_string).collect();
            println!("{}", cells.join("\t"));
        }
    }
    Ok(())
}
