//! Survey tasks (과업) and their time tables

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::catalog::HotkeyItem;
use super::lenient;
use super::site::Site;

/// Progress state shared by surveys and their sites
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SurveyState {
    #[default]
    Waiting,
    InProgress,
    Done,
}

impl SurveyState {
    /// Stored/displayed label
    pub fn label(&self) -> &'static str {
        match self {
            SurveyState::Waiting => "대기",
            SurveyState::InProgress => "진행",
            SurveyState::Done => "완료",
        }
    }

    /// Numeric STATE written to task files
    pub fn code(&self) -> i64 {
        match self {
            SurveyState::Waiting => 0,
            SurveyState::InProgress => 1,
            SurveyState::Done => 2,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "대기" => Some(SurveyState::Waiting),
            "진행" => Some(SurveyState::InProgress),
            "완료" => Some(SurveyState::Done),
            _ => None,
        }
    }
}

impl std::fmt::Display for SurveyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for SurveyState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for SurveyState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = lenient::string(deserializer)?;
        Ok(SurveyState::from_label(&raw).unwrap_or_default())
    }
}

pub const PURPOSE_GENERAL: &str = "일반 조사용(모든작업자 노출)";
pub const PURPOSE_ADMIN: &str = "관리자용(관리자만 노출)";

fn default_purpose() -> String {
    PURPOSE_GENERAL.to_string()
}

/// 조사 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyInfo {
    #[serde(default = "default_purpose", deserialize_with = "lenient::string")]
    pub purpose: String,
    #[serde(default)]
    pub state: SurveyState,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    /// Survey task identifier (SN_...)
    #[serde(default, deserialize_with = "lenient::string")]
    pub sn: String,
    #[serde(
        default,
        deserialize_with = "lenient::optional_date",
        serialize_with = "lenient::serialize_optional_date"
    )]
    pub reg_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub client: String,
    #[serde(
        default,
        deserialize_with = "lenient::optional_period",
        serialize_with = "lenient::serialize_optional_period"
    )]
    pub period: Option<(NaiveDate, NaiveDate)>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub desc: String,
}

impl SurveyInfo {
    pub fn new(name: impl Into<String>, sn: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            purpose: default_purpose(),
            state: SurveyState::Waiting,
            name: name.into(),
            sn: sn.into(),
            reg_date: Some(today),
            client: String::new(),
            period: Some((today, today)),
            desc: String::new(),
        }
    }
}

/// 조사차종 설정: which catalog the survey counts with
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SurveyVehicle {
    /// Catalog referenced by name
    #[serde(rename = "작업참조", default, deserialize_with = "lenient::string")]
    pub project_ref: String,
    /// Rows edited locally instead of following the catalog
    #[serde(rename = "로컬편집", default, deserialize_with = "lenient::flag")]
    pub local_edit: bool,
    #[serde(rename = "차종목록", default)]
    pub rows: Vec<HotkeyItem>,
}

/// One counting interval of the survey day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    #[serde(rename = "번호")]
    pub sequence: u32,
    #[serde(rename = "시작", with = "lenient::hhmm")]
    pub start: NaiveTime,
    #[serde(rename = "종료", with = "lenient::hhmm")]
    pub end: NaiveTime,
}

impl TimeSlot {
    /// Row label used by the preview sheet
    pub fn label(&self) -> String {
        format!("{}~{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

#[derive(Deserialize)]
struct TimeSlotRecord {
    #[serde(rename = "번호", default, deserialize_with = "lenient::u32_or_zero")]
    sequence: u32,
    #[serde(rename = "시작", default, deserialize_with = "lenient::string")]
    start: String,
    #[serde(rename = "종료", default, deserialize_with = "lenient::string")]
    end: String,
}

/// Rows with unreadable or inverted times are dropped
fn time_slots<'de, D>(deserializer: D) -> Result<Vec<TimeSlot>, D::Error>
where
    D: Deserializer<'de>,
{
    let records: Vec<TimeSlotRecord> = Vec::deserialize(deserializer)?;
    Ok(records
        .into_iter()
        .filter_map(|r| {
            let start = lenient::parse_time(&r.start)?;
            let end = lenient::parse_time(&r.end)?;
            (start < end).then_some(TimeSlot {
                sequence: r.sequence,
                start,
                end,
            })
        })
        .collect())
}

/// A (start, end, step) request remembered by the time table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(with = "lenient::hhmm")]
    pub start: NaiveTime,
    #[serde(with = "lenient::hhmm")]
    pub end: NaiveTime,
    pub step_minutes: u32,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime, step_minutes: u32) -> Self {
        Self {
            start,
            end,
            step_minutes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Survey {
    pub info: SurveyInfo,
    #[serde(default, deserialize_with = "time_slots")]
    pub times: Vec<TimeSlot>,
    /// Ranges accepted by the time table, used for duplicate detection
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub time_ranges: Vec<TimeRange>,
    #[serde(default)]
    pub vehicle: SurveyVehicle,
    #[serde(default)]
    pub sites: Vec<Site>,
}

impl Survey {
    pub fn new(info: SurveyInfo) -> Self {
        Self {
            info,
            times: Vec::new(),
            time_ranges: Vec::new(),
            vehicle: SurveyVehicle::default(),
            sites: Vec::new(),
        }
    }

    /// Append a site and return its index
    pub fn push_site(&mut self, mut site: Site) -> usize {
        site.sequence = self.sites.len() as u32 + 1;
        self.sites.push(site);
        self.sites.len() - 1
    }

    /// Remove the given site rows (any order, duplicates ignored)
    pub fn remove_sites(&mut self, indices: &[usize]) -> usize {
        let mut indices: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.sites.len())
            .collect();
        indices.sort_unstable();
        indices.dedup();
        for &i in indices.iter().rev() {
            self.sites.remove(i);
        }
        self.renumber_sites();
        indices.len()
    }

    /// Move a site by `delta` rows; returns the new index, or `None` if out of range
    pub fn move_site(&mut self, index: usize, delta: isize) -> Option<usize> {
        let target = index.checked_add_signed(delta)?;
        if index >= self.sites.len() || target >= self.sites.len() {
            return None;
        }
        self.sites.swap(index, target);
        self.renumber_sites();
        Some(target)
    }

    pub fn move_site_top(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.sites.len() {
            return false;
        }
        let site = self.sites.remove(index);
        self.sites.insert(0, site);
        self.renumber_sites();
        true
    }

    fn renumber_sites(&mut self) {
        for (i, site) in self.sites.iter_mut().enumerate() {
            site.sequence = i as u32 + 1;
        }
    }
}
