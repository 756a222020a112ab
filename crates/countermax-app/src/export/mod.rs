//! Preview export

mod csv;
mod excel;

pub use self::csv::{export_schedule_csv, write_schedule_csv};
pub use self::excel::export_schedule_xlsx;

use std::path::Path;

use countermax_domain::service::DirectionPane;
use countermax_types::{Error, Result};

/// Export by file extension: `.xlsx` or `.csv`
pub fn export_schedule(panes: &[DirectionPane], output_path: &Path) -> Result<()> {
    let ext = output_path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("xlsx") => export_schedule_xlsx(panes, output_path),
        Some("csv") => export_schedule_csv(panes, output_path),
        _ => Err(Error::Export(format!(
            "unsupported export format: {}",
            output_path.display()
        ))),
    }
}
