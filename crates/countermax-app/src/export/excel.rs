//! Excel export of schedule panes

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use countermax_domain::service::DirectionPane;
use countermax_types::{Error, Result};

/// One worksheet per direction pane, named after the pane title
pub fn export_schedule_xlsx(panes: &[DirectionPane], output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    for pane in panes {
        let sheet = workbook.add_worksheet();
        write_pane(sheet, pane)?;
    }
    if panes.is_empty() {
        // a workbook needs at least one sheet
        workbook.add_worksheet();
    }

    workbook
        .save(output_path)
        .map_err(|e| Error::Export(e.to_string()))?;

    Ok(())
}

fn write_pane(sheet: &mut Worksheet, pane: &DirectionPane) -> Result<()> {
    sheet
        .set_name(&pane.title)
        .map_err(|e| Error::Export(e.to_string()))?;

    let header_format = Format::new().set_bold();

    for (col, header) in pane.header().iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, header, &header_format)
            .map_err(|e| Error::Export(e.to_string()))?;
    }

    for (row_idx, row) in pane.rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        sheet
            .write_string(row_num, 0, &row.label)
            .map_err(|e| Error::Export(e.to_string()))?;
        for (col, count) in row.counts.iter().enumerate() {
            sheet
                .write_number(row_num, (col + 1) as u16, *count as f64)
                .map_err(|e| Error::Export(e.to_string()))?;
        }
    }

    sheet
        .set_column_width(0, 14)
        .map_err(|e| Error::Export(e.to_string()))?;

    Ok(())
}
