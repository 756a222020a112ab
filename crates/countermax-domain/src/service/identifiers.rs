//! Time-derived identifiers
//!
//! Work orders: `WN_` + yyMMdd + HHmmss + hundredths.
//! Survey tasks: `SN_` + yyyyMMdd + HHmmss + hundredths.
//!
//! Both have 10 ms resolution. [`IdGenerator`] keeps the last tick it handed
//! out and never goes backwards, and skips ticks whose id is already taken.

use std::collections::HashSet;

use chrono::{Duration, NaiveDateTime, Timelike};

const TICK_MS: i64 = 10;

#[derive(Debug, Default)]
pub struct IdGenerator {
    last_tick: Option<NaiveDateTime>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_work_order_id(&mut self, now: NaiveDateTime, taken: &HashSet<String>) -> String {
        self.next_with(now, taken, format_work_order_id)
    }

    pub fn next_survey_id(&mut self, now: NaiveDateTime, taken: &HashSet<String>) -> String {
        self.next_with(now, taken, format_survey_id)
    }

    fn next_with(
        &mut self,
        now: NaiveDateTime,
        taken: &HashSet<String>,
        format: fn(NaiveDateTime) -> String,
    ) -> String {
        let step = Duration::milliseconds(TICK_MS);
        let mut tick = truncate_to_tick(now);
        if let Some(last) = self.last_tick {
            if tick <= last {
                tick = last + step;
            }
        }
        let mut id = format(tick);
        while taken.contains(&id) {
            tick += step;
            id = format(tick);
        }
        self.last_tick = Some(tick);
        id
    }
}

fn truncate_to_tick(t: NaiveDateTime) -> NaiveDateTime {
    let hundredths = t.nanosecond() / 10_000_000;
    t.with_nanosecond(hundredths * 10_000_000).unwrap_or(t)
}

fn hundredths(t: NaiveDateTime) -> u32 {
    // leap-second nanos can exceed 1e9
    (t.nanosecond() % 1_000_000_000) / 10_000_000
}

pub fn format_work_order_id(t: NaiveDateTime) -> String {
    format!("WN_{}{:02}", t.format("%y%m%d%H%M%S"), hundredths(t))
}

pub fn format_survey_id(t: NaiveDateTime) -> String {
    format!("SN_{}{:02}", t.format("%Y%m%d%H%M%S"), hundredths(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, 4)
            .unwrap()
            .and_hms_milli_opt(14, 4, 30, ms)
            .unwrap()
    }

    #[test]
    fn test_formats() {
        assert_eq!(format_work_order_id(at(130)), "WN_25120414043013");
        assert_eq!(format_survey_id(at(130)), "SN_2025120414043013");
        assert_eq!("WN_25120414043013".len(), 17);
    }

    #[test]
    fn test_same_tick_yields_distinct_ids() {
        let mut gen = IdGenerator::new();
        let taken = HashSet::new();
        let ids: HashSet<String> = (0..500)
            .map(|_| gen.next_work_order_id(at(0), &taken))
            .collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn test_skips_taken_ids() {
        let mut gen = IdGenerator::new();
        let taken: HashSet<String> = ["WN_25120414043000", "WN_25120414043001"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(gen.next_work_order_id(at(5), &taken), "WN_25120414043002");
    }

    #[test]
    fn test_clock_going_backwards_stays_monotonic() {
        let mut gen = IdGenerator::new();
        let taken = HashSet::new();
        let first = gen.next_survey_id(at(500), &taken);
        let second = gen.next_survey_id(at(100), &taken);
        assert!(second > first);
    }
}
