use crate::calc::{format_hours, leave_usage, LeaveUsage};
use crate::cmd::{today, Env};
use crate::data::{LeaveTypeId, SnapshotStore};
use anyhow::Result;
use chrono::Datelike;

pub fn run(year: Option<i32>) -> Result<()> {
    let env = Env::open()?;
    let snapshot = env.store.load()?;
    let year = year.unwrap_or_else(|| today().year());
    let rows = leave_usage(&snapshot.leave, year);
    write_stats(&rows, year, env.settings.active_leave_type, &mut std::io::stdout())
}

pub(crate) fn write_stats<W: std::io::Write>(
    rows: &[LeaveUsage],
    year: i32,
    active: Option<LeaveTypeId>,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "Leave Stats for {year}")?;
    writeln!(out, "---")?;
    if rows.is_empty() {
        writeln!(out, "No leave types yet. Add one with `leavecal types add`.")?;
        return Ok(());
    }
    writeln!(
        out,
        "  {:<24} {:>6} {:>8} {:>8} {:>9}",
        "Type", "Days", "Used", "Quota", "Balance"
    )?;
    for r in rows {
        let mark = if active == Some(r.id) { "*" } else { " " };
        let balance = if r.balance < 0.0 {
            format!("{} over", format_hours(-r.balance))
        } else {
            format_hours(r.balance)
        };
        writeln!(
            out,
            "{} {:<24} {:>6} {:>8} {:>8} {:>9}",
            mark,
            r.name,
            r.used_days,
            format_hours(r.used_amount),
            format_hours(r.quota),
            balance
        )?;
    }
    writeln!(out, "---")?;
    let used: f64 = rows.iter().map(|r| r.used_amount).sum();
    let quota: f64 = rows.iter().map(|r| r.quota).sum();
    writeln!(out, "{:<26} {}", "Total Used:", format_hours(used))?;
    writeln!(out, "{:<26} {}", "Total Quota:", format_hours(quota))?;
    writeln!(out, "{:<26} {}", "Remaining:", format_hours(quota - used))?;
    Ok(())
}
