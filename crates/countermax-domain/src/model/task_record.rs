//! Count data for one work order (the contents of a `.dat` task file)

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

/// Parse a count cell; anything that is not an integer counts as 0
pub fn coerce_count(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}

/// Row-major time-slot × vehicle-type counts for one direction
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CountMatrix {
    pub rows: Vec<Vec<i64>>,
}

impl CountMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows: vec![vec![0; cols]; rows],
        }
    }

    /// Build from raw cell text, coercing every cell
    pub fn from_raw<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|c| coerce_count(c.as_ref())).collect())
                .collect(),
        }
    }

    /// Rebuild from sparse `(row, col) -> value` cells; gaps become 0
    pub fn from_cells(cells: &BTreeMap<(usize, usize), i64>) -> Self {
        let rows = cells.keys().map(|(r, _)| r + 1).max().unwrap_or(0);
        let cols = cells.keys().map(|(_, c)| c + 1).max().unwrap_or(0);
        let mut matrix = Self::zeros(rows, cols);
        for (&(r, c), &value) in cells {
            matrix.rows[r][c] = value;
        }
        matrix
    }

    /// `(row, col, value)` in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, i64)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, v)| (r, c, *v)))
    }

    pub fn total(&self) -> i64 {
        self.rows.iter().flatten().sum()
    }
}

/// One operator's counts for one site on one date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub survey_no: String,
    pub work_no: String,
    pub user_id: String,
    pub user_name: String,
    pub rec_date: NaiveDate,
    pub seq_no: i64,
    pub start_time: NaiveDateTime,
    pub last_time: NaiveDateTime,
    pub state: i64,
    pub deleted: bool,
    /// One matrix per direction, written as sections `[0]`, `[1]`, ...
    pub matrices: Vec<CountMatrix>,
}

impl TaskRecord {
    pub fn new(
        survey_no: impl Into<String>,
        work_no: impl Into<String>,
        user_id: impl Into<String>,
        rec_date: NaiveDate,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            survey_no: survey_no.into(),
            work_no: work_no.into(),
            user_id: user_id.into(),
            user_name: String::new(),
            rec_date,
            seq_no: 0,
            start_time: now,
            last_time: now,
            state: 1,
            deleted: false,
            matrices: Vec::new(),
        }
    }

    /// `<WN>_<YYYYMMDD>_<USER>`
    pub fn doc_no(&self) -> String {
        format!(
            "{}_{}_{}",
            self.work_no,
            self.rec_date.format("%Y%m%d"),
            self.user_id
        )
    }

    pub fn file_name(&self) -> String {
        format!("{}.dat", self.doc_no())
    }
}

/// A task file as read back: header pairs in file order plus sparse sections
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDocument {
    pub info: Vec<(String, String)>,
    pub sections: BTreeMap<usize, BTreeMap<(usize, usize), i64>>,
}

impl TaskDocument {
    pub fn info_value(&self, key: &str) -> Option<&str> {
        self.info
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn section(&self, index: usize) -> Option<&BTreeMap<(usize, usize), i64>> {
        self.sections.get(&index)
    }

    pub fn matrices(&self) -> Vec<CountMatrix> {
        self.sections.values().map(CountMatrix::from_cells).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_count() {
        assert_eq!(coerce_count(" 12 "), 12);
        assert_eq!(coerce_count("-3"), -3);
        assert_eq!(coerce_count("1.5"), 0);
        assert_eq!(coerce_count(""), 0);
    }

    #[test]
    fn test_from_raw_coerces_cells() {
        let m = CountMatrix::from_raw(vec![vec!["1", "x"], vec!["", "4"]]);
        assert_eq!(m.rows, vec![vec![1, 0], vec![0, 4]]);
        assert_eq!(m.total(), 5);
    }

    #[test]
    fn test_doc_no() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 5).unwrap();
        let now = date.and_hms_opt(9, 0, 0).unwrap();
        let record = TaskRecord::new("SN_1", "WN_25120509000000", "hkw", date, now);
        assert_eq!(record.doc_no(), "WN_25120509000000_20251205_hkw");
        assert_eq!(record.file_name(), "WN_25120509000000_20251205_hkw.dat");
    }

    #[test]
    fn test_from_cells_fills_gaps() {
        let mut cells = BTreeMap::new();
        cells.insert((1, 2), 7);
        let m = CountMatrix::from_cells(&cells);
        assert_eq!(m.rows, vec![vec![0, 0, 0], vec![0, 0, 7]]);
    }
}
