use crate::calc::aggregate::leave_days_in_month;
use crate::calc::{grid, MonthRef};
use crate::cmd::{today, Env};
use crate::data::{DayType, LeaveLedger, SnapshotStore, WeekStart};
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use std::io::Write;

pub fn run(month: Option<MonthRef>) -> Result<()> {
    let env = Env::open()?;
    let snapshot = env.store.load()?;
    let month = month.unwrap_or_else(|| MonthRef::of(today()));
    write_calendar(&snapshot.leave, month, env.settings.week_start, &mut std::io::stdout())
}

fn marker(ledger: &LeaveLedger, date: NaiveDate) -> char {
    match ledger.entry(date).map(|e| e.day_type) {
        Some(DayType::Full) => '*',
        Some(DayType::Half) => '/',
        None => ' ',
    }
}

/// Month grid with `*` on full leave days and `/` on half days, followed by
/// the month's entries.
pub(crate) fn write_calendar<W: Write>(
    ledger: &LeaveLedger,
    month: MonthRef,
    week_start: WeekStart,
    out: &mut W,
) -> Result<()> {
    let cells = grid(month, week_start);
    writeln!(out, "{month}")?;
    let header: Vec<String> = cells[..7]
        .iter()
        .map(|c| format!("{:>3} ", &c.date.format("%a").to_string()[..2]))
        .collect();
    writeln!(out, "{}", header.concat().trim_end())?;
    for row in cells.chunks(7) {
        let line: String = row
            .iter()
            .map(|c| {
                if c.is_current_month {
                    format!("{:>3}{}", c.date.day(), marker(ledger, c.date))
                } else {
                    "    ".to_string()
                }
            })
            .collect();
        writeln!(out, "{}", line.trim_end())?;
    }

    writeln!(out, "---")?;
    let entries: Vec<_> = ledger.entries_between(month.first_day(), month.last_day()).collect();
    for e in &entries {
        let name = ledger.get_type(e.leave_type).map(|t| t.name.as_str()).unwrap_or("?");
        let half = if e.day_type == DayType::Half { " (half day)" } else { "" };
        writeln!(out, "  {}  {}{}", e.date.format("%Y-%m-%d"), name, half)?;
    }
    let per_type = leave_days_in_month(ledger, month);
    let summary: Vec<String> = per_type
        .iter()
        .filter_map(|(id, n)| ledger.get_type(*id).ok().map(|t| format!("{} {}", t.name, n)))
        .collect();
    write!(out, "Total: {} leave day(s)", entries.len())?;
    if !summary.is_empty() {
        write!(out, " ({})", summary.join(", "))?;
    }
    writeln!(out)?;
    Ok(())
}
