//! Survey time table: fixed-step segments between a start and end time

use chrono::{NaiveTime, Timelike};
use tracing::debug;

use crate::model::{Survey, TimeRange, TimeSlot};

/// Split `[start, end)` into back-to-back segments of `step_minutes`.
///
/// A trailing segment that would run past `end` is dropped. `start >= end`
/// or a zero step yields nothing.
pub fn segment(start: NaiveTime, end: NaiveTime, step_minutes: u32) -> Vec<(NaiveTime, NaiveTime)> {
    let mut out = Vec::new();
    if step_minutes == 0 || start >= end {
        return out;
    }
    // minutes of day, so the loop never wraps past midnight
    let end_min = minute_of_day(end);
    let mut t = minute_of_day(start);
    while t < end_min {
        let next = t + step_minutes;
        if next > end_min {
            break;
        }
        if let (Some(a), Some(b)) = (from_minute(t), from_minute(next)) {
            out.push((a, b));
        }
        t = next;
    }
    out
}

fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

fn from_minute(minute: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minute / 60, minute % 60, 0)
}

/// What happened to an interactive range request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// Range stored; this many slots were appended
    Added(usize),
    /// Same (start, end, step) already stored; nothing changed
    Duplicate,
    /// start >= end; nothing changed
    EmptyRange,
}

/// Editing view over a survey's `times` and `time_ranges`
pub struct TimeTable<'a> {
    survey: &'a mut Survey,
}

impl<'a> TimeTable<'a> {
    pub fn new(survey: &'a mut Survey) -> Self {
        Self { survey }
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.survey.times
    }

    pub fn ranges(&self) -> &[TimeRange] {
        &self.survey.time_ranges
    }

    /// Interactive "add range": rejects a range that is already stored
    pub fn add_range(&mut self, range: TimeRange) -> RangeOutcome {
        if range.start >= range.end {
            return RangeOutcome::EmptyRange;
        }
        if self.survey.time_ranges.contains(&range) {
            debug!(start = %range.start, end = %range.end, step = range.step_minutes, "duplicate time range");
            return RangeOutcome::Duplicate;
        }
        self.survey.time_ranges.push(range);
        RangeOutcome::Added(self.append_segments(&range))
    }

    /// "Auto-generate": always appends, even when the same range was
    /// generated before. Only `add_range` records ranges, so generated
    /// slots never make a later `add_range` a duplicate. Returns the number
    /// of slots appended.
    pub fn generate(&mut self, range: TimeRange) -> usize {
        self.append_segments(&range)
    }

    /// Manually curated slot
    pub fn add_slot(&mut self, start: NaiveTime, end: NaiveTime) -> bool {
        if start >= end {
            return false;
        }
        let sequence = self.survey.times.len() as u32 + 1;
        self.survey.times.push(TimeSlot { sequence, start, end });
        true
    }

    /// Delete slot rows by index and renumber the rest
    pub fn remove_rows(&mut self, indices: &[usize]) -> usize {
        let before = self.survey.times.len();
        let mut i = 0;
        self.survey.times.retain(|_| {
            let keep = !indices.contains(&i);
            i += 1;
            keep
        });
        self.renumber();
        before - self.survey.times.len()
    }

    /// Clear both the slots and the remembered ranges
    pub fn reset(&mut self) {
        self.survey.times.clear();
        self.survey.time_ranges.clear();
    }

    fn append_segments(&mut self, range: &TimeRange) -> usize {
        let segments = segment(range.start, range.end, range.step_minutes);
        let count = segments.len();
        for (start, end) in segments {
            let sequence = self.survey.times.len() as u32 + 1;
            self.survey.times.push(TimeSlot { sequence, start, end });
        }
        count
    }

    fn renumber(&mut self) {
        for (i, slot) in self.survey.times.iter_mut().enumerate() {
            slot.sequence = i as u32 + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SurveyInfo;
    use chrono::NaiveDate;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn survey() -> Survey {
        Survey::new(SurveyInfo::new("s", "SN_1", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()))
    }

    #[test]
    fn test_segment_two_hours_by_fifteen() {
        let segs = segment(t(7, 0), t(9, 0), 15);
        assert_eq!(segs.len(), 8);
        assert_eq!(segs[0], (t(7, 0), t(7, 15)));
        assert_eq!(segs[7], (t(8, 45), t(9, 0)));
        for pair in segs.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
    }

    #[test]
    fn test_segment_step_exceeds_range() {
        assert!(segment(t(9, 0), t(9, 10), 15).is_empty());
    }

    #[test]
    fn test_segment_drops_partial_tail() {
        let segs = segment(t(7, 0), t(7, 40), 15);
        assert_eq!(segs, vec![(t(7, 0), t(7, 15)), (t(7, 15), t(7, 30))]);
    }

    #[test]
    fn test_segment_inverted_or_zero_step() {
        assert!(segment(t(9, 0), t(7, 0), 15).is_empty());
        assert!(segment(t(7, 0), t(9, 0), 0).is_empty());
    }

    #[test]
    fn test_segment_up_to_end_of_day() {
        let segs = segment(t(23, 0), t(23, 59), 30);
        assert_eq!(segs, vec![(t(23, 0), t(23, 30))]);
    }

    #[test]
    fn test_add_range_deduplicates() {
        let mut s = survey();
        let mut table = TimeTable::new(&mut s);
        let range = TimeRange::new(t(7, 0), t(9, 0), 15);
        assert_eq!(table.add_range(range), RangeOutcome::Added(8));
        assert_eq!(table.add_range(range), RangeOutcome::Duplicate);
        assert_eq!(table.ranges().len(), 1);
        assert_eq!(table.slots().len(), 8);
    }

    #[test]
    fn test_generate_always_appends() {
        let mut s = survey();
        let mut table = TimeTable::new(&mut s);
        let range = TimeRange::new(t(7, 0), t(9, 0), 15);
        assert_eq!(table.generate(range), 8);
        assert_eq!(table.generate(range), 8);
        assert!(table.ranges().is_empty());
        assert_eq!(table.slots().len(), 16);
        assert_eq!(table.slots()[15].sequence, 16);
    }

    #[test]
    fn test_generate_does_not_block_add_range() {
        let mut s = survey();
        let mut table = TimeTable::new(&mut s);
        let range = TimeRange::new(t(7, 0), t(9, 0), 15);
        assert_eq!(table.generate(range), 8);
        assert_eq!(table.add_range(range), RangeOutcome::Added(8));
        assert_eq!(table.add_range(range), RangeOutcome::Duplicate);
        assert_eq!(table.ranges(), &[range]);
        assert_eq!(table.slots().len(), 16);
    }

    #[test]
    fn test_add_range_rejects_empty() {
        let mut s = survey();
        let mut table = TimeTable::new(&mut s);
        assert_eq!(
            table.add_range(TimeRange::new(t(9, 0), t(9, 0), 15)),
            RangeOutcome::EmptyRange
        );
        assert!(table.ranges().is_empty());
    }

    #[test]
    fn test_remove_rows_renumbers() {
        let mut s = survey();
        let mut table = TimeTable::new(&mut s);
        table.generate(TimeRange::new(t(7, 0), t(8, 0), 15));
        assert_eq!(table.remove_rows(&[0, 2]), 2);
        let seqs: Vec<u32> = table.slots().iter().map(|s| s.sequence).collect();
        assert_eq!(seqs, vec![1, 2]);
        assert_eq!(table.slots()[0].start, t(7, 15));

        table.reset();
        assert!(table.slots().is_empty());
        assert!(table.ranges().is_empty());
    }
}
