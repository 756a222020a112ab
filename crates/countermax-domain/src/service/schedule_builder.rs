//! Per-direction schedule sheets (time slots × vehicle types)

use serde::Serialize;

use crate::model::{CountMatrix, Site, TimeSlot};
use crate::service::sheet_resolver::{resolve_direction, ResolveContext};

pub const TIME_COLUMN: &str = "시간대";
pub const PLACEHOLDER_COLUMNS: [&str; 2] = ["차종1", "차종2"];

/// Where a pane's columns came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnSource {
    Sheet { catalog_index: usize, sheet_name: String },
    CatalogVehicleTypes { catalog_index: usize },
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRow {
    /// "{start}~{end}"
    pub label: String,
    pub counts: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectionPane {
    pub direction: u32,
    /// "{direction}번 방향"
    pub title: String,
    pub columns: Vec<String>,
    pub source: ColumnSource,
    pub rows: Vec<ScheduleRow>,
}

impl DirectionPane {
    pub fn header(&self) -> Vec<String> {
        std::iter::once(TIME_COLUMN.to_string())
            .chain(self.columns.iter().cloned())
            .collect()
    }

    /// Rows of `1 + columns` text cells, label first
    pub fn cells(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                std::iter::once(row.label.clone())
                    .chain(row.counts.iter().map(i64::to_string))
                    .collect()
            })
            .collect()
    }

    /// The counts alone, as written to a task file section
    pub fn count_matrix(&self) -> CountMatrix {
        CountMatrix {
            rows: self.rows.iter().map(|r| r.counts.clone()).collect(),
        }
    }
}

/// Build one zero-filled pane per realized direction of `site`
pub fn build_schedule(ctx: &ResolveContext<'_>, site: &Site, slots: &[TimeSlot]) -> Vec<DirectionPane> {
    site.realized_directions()
        .into_iter()
        .map(|direction| {
            let (columns, source) = columns_for(ctx, site, direction);
            let rows = slots
                .iter()
                .map(|slot| ScheduleRow {
                    label: slot.label(),
                    counts: vec![0; columns.len()],
                })
                .collect();
            DirectionPane {
                direction,
                title: format!("{}번 방향", direction),
                columns,
                source,
                rows,
            }
        })
        .collect()
}

fn columns_for(ctx: &ResolveContext<'_>, site: &Site, direction: u32) -> (Vec<String>, ColumnSource) {
    if let Some(hit) = resolve_direction(ctx, site, direction) {
        let columns = hit.sheet.vehicle_type_names();
        if !columns.is_empty() {
            return (
                columns,
                ColumnSource::Sheet {
                    catalog_index: hit.catalog_index,
                    sheet_name: hit.sheet.name.clone(),
                },
            );
        }
    }
    if let Some(catalog_index) = ctx.catalog_for(site, direction) {
        let columns = ctx.catalogs[catalog_index].vehicle_type_names();
        if !columns.is_empty() {
            return (columns, ColumnSource::CatalogVehicleTypes { catalog_index });
        }
    }
    (
        PLACEHOLDER_COLUMNS.iter().map(|c| c.to_string()).collect(),
        ColumnSource::Placeholder,
    )
}
