use crate::calc::workday::is_weekend;
use crate::data::WeekStart;
use anyhow::{bail, Context, Result};
use chrono::{Datelike, Days, NaiveDate};

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthRef {
    year: i32,
    month: u32,
}

impl MonthRef {
    /// Rejects months whose padded week grid runs past chrono's date range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let last = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))?;
        first.checked_sub_days(Days::new(6))?;
        last.checked_add_days(Days::new(6))?;
        Some(MonthRef { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        MonthRef {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(self) -> NaiveDate {
        let days = days_in_month(self.year, self.month);
        NaiveDate::from_ymd_opt(self.year, self.month, days).unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::fmt::Display for MonthRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", month_name(self.month), self.year)
    }
}

impl std::str::FromStr for MonthRef {
    type Err = anyhow::Error;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self> {
        let (y, m) = s
            .trim()
            .split_once('-')
            .with_context(|| format!("expected YYYY-MM, got '{s}'"))?;
        let year: i32 = y.parse().with_context(|| format!("bad year in '{s}'"))?;
        let month: u32 = m.parse().with_context(|| format!("bad month in '{s}'"))?;
        match MonthRef::new(year, month) {
            Some(m) => Ok(m),
            None => bail!("month out of range in '{s}'"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_weekend: bool,
}

/// Day cells for `month`, padded with days of the neighbouring months so the
/// grid is made of whole weeks starting on `week_start`.
pub fn grid(month: MonthRef, week_start: WeekStart) -> Vec<CalendarDay> {
    let first = month.first_day();
    let last = month.last_day();
    let lead = days_before(first, week_start);
    let trail = 6 - days_before(last, week_start);
    // at the ends of chrono's range the padding that does not exist is dropped
    let start = first.checked_sub_days(Days::new(lead)).unwrap_or(first);
    let end = last.checked_add_days(Days::new(trail)).unwrap_or(last);
    cells(month, start, end)
}

/// How many grid columns precede `date` in its week row.
fn days_before(date: NaiveDate, week_start: WeekStart) -> u64 {
    let idx = match week_start {
        WeekStart::Monday => date.weekday().num_days_from_monday(),
        WeekStart::Sunday => date.weekday().num_days_from_sunday(),
    };
    u64::from(idx)
}

fn cells(month: MonthRef, start: NaiveDate, end: NaiveDate) -> Vec<CalendarDay> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|date| CalendarDay {
            date,
            is_current_month: month.contains(date),
            is_weekend: is_weekend(date),
        })
        .collect()
}

pub(crate) fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    match (
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
        NaiveDate::from_ymd_opt(year, month, 1),
    ) {
        (Some(next), Some(this)) => next.signed_duration_since(this).num_days() as u32,
        _ => 31,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn month(y: i32, m: u32) -> MonthRef {
        MonthRef::new(y, m).unwrap()
    }

    #[test]
    fn test_grid_is_whole_weeks_covering_month_for_many_months() {
        for year in [1999, 2000, 2023, 2024, 2100] {
            for m in 1..=12 {
                for ws in [WeekStart::Monday, WeekStart::Sunday] {
                    let g = grid(month(year, m), ws);
                    assert_eq!(g.len() % 7, 0, "{year}-{m} {ws:?}");
                    assert_eq!(g[0].date.weekday(), ws.first_day());
                    let in_month: Vec<_> = g.iter().filter(|c| c.is_current_month).collect();
                    assert_eq!(in_month.len() as u32, days_in_month(year, m));
                    // consecutive days, no gaps
                    for pair in g.windows(2) {
                        assert_eq!(pair[1].date, pair[0].date.succ_opt().unwrap());
                    }
                }
            }
        }
    }

    #[test]
    fn test_grid_march_2024_monday_first() {
        // 2024-03-01 is a Friday
        let g = grid(month(2024, 3), WeekStart::Monday);
        assert_eq!(g.len(), 35);
        assert_eq!(g[0].date, d(2024, 2, 26));
        assert!(!g[0].is_current_month);
        assert_eq!(g[4].date, d(2024, 3, 1));
        assert!(g[4].is_current_month);
        assert_eq!(g.last().unwrap().date, d(2024, 3, 31));
    }

    #[test]
    fn test_grid_sunday_first_pads_differently() {
        let g = grid(month(2024, 3), WeekStart::Sunday);
        assert_eq!(g[0].date, d(2024, 2, 25));
        assert_eq!(g.last().unwrap().date, d(2024, 4, 6));
        assert_eq!(g.len(), 42);
    }

    #[test]
    fn test_grid_february_exact_four_weeks() {
        // 2021-02-01 is a Monday and February 2021 has 28 days
        let g = grid(month(2021, 2), WeekStart::Monday);
        assert_eq!(g.len(), 28);
        assert!(g.iter().all(|c| c.is_current_month));
    }

    #[test]
    fn test_grid_leap_february() {
        let g = grid(month(2024, 2), WeekStart::Monday);
        assert!(g.iter().any(|c| c.date == d(2024, 2, 29) && c.is_current_month));
    }

    #[test]
    fn test_grid_crosses_year_boundaries() {
        let dec = grid(month(2024, 12), WeekStart::Monday);
        assert_eq!(dec.last().unwrap().date, d(2025, 1, 5));
        let jan = grid(month(2025, 1), WeekStart::Monday);
        assert_eq!(jan[0].date, d(2024, 12, 30));
        assert!(!jan[0].is_current_month);
    }

    #[test]
    fn test_grid_marks_weekends() {
        let g = grid(month(2024, 3), WeekStart::Monday);
        for c in &g {
            let weekend = matches!(c.date.weekday(), Weekday::Sat | Weekday::Sun);
            assert_eq!(c.is_weekend, weekend);
        }
    }

    #[test]
    fn test_month_ref_rejects_bad_month() {
        assert!(MonthRef::new(2024, 0).is_none());
        assert!(MonthRef::new(2024, 13).is_none());
    }

    #[test]
    fn test_month_ref_rejects_months_at_range_edge() {
        assert!(MonthRef::new(NaiveDate::MIN.year(), 1).is_none());
        assert!(MonthRef::new(NaiveDate::MAX.year(), 12).is_none());
        assert!(MonthRef::new(NaiveDate::MIN.year(), 2).is_some());
    }

    #[test]
    fn test_grid_at_range_edge_does_not_panic() {
        for date in [NaiveDate::MIN, NaiveDate::MAX] {
            for ws in [WeekStart::Monday, WeekStart::Sunday] {
                let g = grid(MonthRef::of(date), ws);
                assert_eq!(g.iter().filter(|c| c.is_current_month).count(), 31);
                for pair in g.windows(2) {
                    assert_eq!(pair[1].date, pair[0].date.succ_opt().unwrap());
                }
            }
        }
    }

    #[test]
    fn test_month_ref_parse() {
        assert_eq!("2024-03".parse::<MonthRef>().unwrap(), month(2024, 3));
        assert!("2024-13".parse::<MonthRef>().is_err());
        assert!("March".parse::<MonthRef>().is_err());
    }

    #[test]
    fn test_month_ref_display() {
        assert_eq!(month(2024, 3).to_string(), "March 2024");
    }

    #[test]
    fn test_days_in_month_values() {
        assert_eq!(days_in_month(2025, 1), 31);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 12), 31);
    }

    #[test]
    fn test_month_name_known_values() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(13), "Unknown");
    }
}
