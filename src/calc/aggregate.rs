use crate::calc::calendar::{grid, MonthRef};
use crate::calc::time_convert::DecimalHours;
use crate::data::{LeaveLedger, LeaveTypeId, TogLedger, WeekStart};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Weekday visibility mask, Monday first. Hidden days do not count.
pub type VisibleDays = [bool; 7];

pub const ALL_DAYS: VisibleDays = [true; 7];

fn is_visible(visible: &VisibleDays, date: NaiveDate) -> bool {
    visible[date.weekday().num_days_from_monday() as usize]
}

/// Average over days that hold a main entry; 0 when there are none.
fn average(total: f64, active_days: u32) -> f64 {
    if active_days > 0 {
        total / active_days as f64
    } else {
        0.0
    }
}

/// Two decimal places, ties rounded up, the way totals are displayed.
pub fn format_hours(value: f64) -> String {
    DecimalHours::from_hundredths((value * 100.0).round() as i64).to_string()
}

/// Sum of TOG hours (main plus bonus) for every day of `month`.
pub fn tog_total(tog: &TogLedger, month: MonthRef) -> f64 {
    tog_total_visible(tog, month, &ALL_DAYS)
}

pub fn tog_total_visible(tog: &TogLedger, month: MonthRef, visible: &VisibleDays) -> f64 {
    month
        .first_day()
        .iter_days()
        .take_while(|d| *d <= month.last_day())
        .filter(|d| is_visible(visible, *d))
        .map(|d| tog.day_total(d))
        .sum()
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekSummary {
    /// Monday of the week row.
    pub start: NaiveDate,
    pub total: f64,
    pub active_days: u32,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TogMonthSummary {
    pub month: MonthRef,
    pub total: f64,
    pub active_days: u32,
    pub average: f64,
    pub weeks: Vec<WeekSummary>,
}

/// Month and per-week figures for the TOG view. Week rows run Monday to
/// Sunday and include the spill-over days of neighbouring months; the month
/// figures only count days inside `month`.
pub fn tog_month_summary(tog: &TogLedger, month: MonthRef, visible: &VisibleDays) -> TogMonthSummary {
    let cells = grid(month, WeekStart::Monday);
    let mut weeks = Vec::with_capacity(cells.len() / 7);
    let mut month_total = 0.0;
    let mut month_active = 0u32;

    for row in cells.chunks(7) {
        let mut week_total = 0.0;
        let mut week_active = 0u32;
        for cell in row.iter().filter(|c| is_visible(visible, c.date)) {
            let day_total = tog.day_total(cell.date);
            let active = tog.has_entry(cell.date);
            week_total += day_total;
            week_active += u32::from(active);
            if cell.is_current_month {
                month_total += day_total;
                month_active += u32::from(active);
            }
        }
        weeks.push(WeekSummary {
            start: row[0].date,
            total: week_total,
            active_days: week_active,
            average: average(week_total, week_active),
        });
    }

    TogMonthSummary {
        month,
        total: month_total,
        active_days: month_active,
        average: average(month_total, month_active),
        weeks,
    }
}

/// Entries of `id`, optionally limited to one calendar year.
pub fn leave_used_days(ledger: &LeaveLedger, id: LeaveTypeId, year: Option<i32>) -> usize {
    match year {
        Some(y) => ledger.used_days_in_year(id, y),
        None => ledger.used_days(id),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaveUsage {
    pub id: LeaveTypeId,
    pub name: String,
    pub color: String,
    pub quota: f64,
    pub used_days: usize,
    pub used_amount: f64,
    pub balance: f64,
}

/// One row per leave type visible in `year`.
pub fn leave_usage(ledger: &LeaveLedger, year: i32) -> Vec<LeaveUsage> {
    ledger
        .visible_types(year)
        .into_iter()
        .map(|t| {
            let used_amount = ledger.used_amount(t.id, Some(year));
            LeaveUsage {
                id: t.id,
                name: t.name.clone(),
                color: t.color.clone(),
                quota: t.annual_quota,
                used_days: leave_used_days(ledger, t.id, Some(year)),
                used_amount,
                balance: t.annual_quota - used_amount,
            }
        })
        .collect()
}

/// Leave days per type inside `month`.
pub fn leave_days_in_month(ledger: &LeaveLedger, month: MonthRef) -> BTreeMap<LeaveTypeId, usize> {
    let mut counts = BTreeMap::new();
    for e in ledger.entries_between(month.first_day(), month.last_day()) {
        *counts.entry(e.leave_type).or_insert(0) += 1;
    }
    counts
}
