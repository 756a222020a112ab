//! CSV export of schedule panes
//!
//! Panes are written one after another: a title record, the header, the
//! rows, then an empty record.

use std::io::Write;
use std::path::Path;

use countermax_domain::service::DirectionPane;
use countermax_types::{Error, Result};

pub fn export_schedule_csv(panes: &[DirectionPane], output_path: &Path) -> Result<()> {
    let file = std::fs::File::create(output_path)?;
    write_schedule_csv(panes, file)
}

pub fn write_schedule_csv<W: Write>(panes: &[DirectionPane], out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(out);

    for pane in panes {
        writer.write_record([pane.title.as_str()]).map_err(csv_error)?;
        writer.write_record(pane.header()).map_err(csv_error)?;
        for row in pane.cells() {
            writer.write_record(&row).map_err(csv_error)?;
        }
        writer.write_record([""]).map_err(csv_error)?;
    }
    writer.flush()?;
    Ok(())
}

fn csv_error(e: csv::Error) -> Error {
    Error::Export(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use countermax_domain::service::{ColumnSource, ScheduleRow};

    #[test]
    fn test_blocks_per_pane() {
        let pane = DirectionPane {
            direction: 1,
            title: "1번 방향".into(),
            columns: vec!["승용".into(), "버스".into()],
            source: ColumnSource::Placeholder,
            rows: vec![ScheduleRow {
                label: "07:00~07:15".into(),
                counts: vec![0, 0],
            }],
        };
        let mut out = Vec::new();
        write_schedule_csv(&[pane.clone(), pane], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "1번 방향");
        assert_eq!(lines[1], "시간대,승용,버스");
        assert_eq!(lines[2], "07:00~07:15,0,0");
        assert_eq!(lines[4], "1번 방향");
        assert_eq!(lines.len(), 8);
    }
}
