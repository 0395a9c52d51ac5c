use crate::calc::aggregate::{tog_total, VisibleDays, ALL_DAYS};
use crate::calc::{format_hours, grid, to_decimal, tog_month_summary, HoursMinutes, MonthRef};
use crate::cmd::{today, with_snapshot, Env};
use crate::data::{TogLedger, TogRecord, WeekStart};
use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Weekday};
use clap::Subcommand;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

#[derive(Subcommand, Debug, Clone)]
pub enum TogCommand {
    /// Set the main hours for a day (0 removes them)
    Set {
        date: NaiveDate,
        #[arg(required_unless_present = "from_time")]
        hours: Option<f64>,
        /// Convert clock time instead of giving decimal hours
        #[arg(long, value_name = "H:MM", conflicts_with = "hours")]
        from_time: Option<HoursMinutes>,
    },
    /// Set the bonus hours for a day (0 removes them)
    Bonus { date: NaiveDate, hours: f64 },
    /// Remove main and bonus hours for a day
    Clear { date: NaiveDate },
    /// Print a month with week totals and averages
    Show {
        /// Month as YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<MonthRef>,
    },
    /// Write every record as JSON to FILE, or stdout
    Export { file: Option<PathBuf> },
    /// Merge records from a JSON file; imported days win
    Import { file: PathBuf },
    /// Delete every TOG record
    Reset {
        #[arg(long)]
        yes: bool,
    },
    /// Show or hide a weekday in totals
    ToggleDay { day: Weekday },
}

pub fn run(command: TogCommand) -> Result<()> {
    let mut env = Env::open()?;
    if let TogCommand::ToggleDay { day } = command {
        env.settings.toggle_tog_day(day);
        env.save_settings()?;
        let shown = env.settings.tog_visible_days[day.num_days_from_monday() as usize];
        println!("{day} is now {}.", if shown { "shown" } else { "hidden" });
        return Ok(());
    }
    let visible = env.settings.tog_visible_days;
    let mut out = std::io::stdout();
    with_snapshot(&env.store, |snapshot| execute(command, &mut snapshot.tog, &visible, &mut out))
}

pub(crate) fn execute<W: Write>(
    command: TogCommand,
    tog: &mut TogLedger,
    visible: &VisibleDays,
    out: &mut W,
) -> Result<bool> {
    match command {
        TogCommand::Set {
            date,
            hours,
            from_time,
        } => {
            let value = match (hours, from_time) {
                (_, Some(hm)) => to_decimal(hm.hours, hm.minutes)?.as_f64(),
                (Some(h), None) => h,
                (None, None) => bail!("give HOURS or --from-time"),
            };
            tog.set_hours(date, value)?;
            writeln!(out, "{date}: {} h", format_hours(value))?;
            Ok(true)
        }
        TogCommand::Bonus { date, hours } => {
            tog.set_bonus(date, hours)?;
            writeln!(out, "{date}: bonus {} h", format_hours(hours))?;
            Ok(true)
        }
        TogCommand::Clear { date } => {
            let removed = tog.clear(date);
            if !removed {
                writeln!(out, "Nothing logged on {date}.")?;
            }
            Ok(removed)
        }
        TogCommand::Show { month } => {
            write_month(tog, month.unwrap_or_else(|| MonthRef::of(today())), visible, out)?;
            Ok(false)
        }
        TogCommand::Export { file } => {
            let json = serde_json::to_string_pretty(&tog.export()).context("failed to serialize JSON")?;
            match file {
                Some(path) => {
                    fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
                    writeln!(out, "Exported {} record(s) to {}.", tog.export().len(), path.display())?;
                }
                None => writeln!(out, "{json}")?,
            }
            Ok(false)
        }
        TogCommand::Import { file } => {
            let contents =
                fs::read_to_string(&file).with_context(|| format!("failed to read {}", file.display()))?;
            let records = parse_records(&contents, tog)
                .with_context(|| format!("failed to import {}", file.display()))?;
            let count = tog.bulk_import(records)?;
            writeln!(out, "Imported {count} record(s).")?;
            Ok(count > 0)
        }
        TogCommand::Reset { yes } => {
            if !yes {
                bail!("reset deletes every TOG record; pass --yes to confirm");
            }
            tog.reset();
            writeln!(out, "TOG data cleared.")?;
            Ok(true)
        }
        TogCommand::ToggleDay { .. } => bail!("toggle-day changes settings, not the ledger"),
    }
}

/// Reads either a JSON array of records or the older flat object keyed by
/// `YYYY-MM-DD` and `bonus_YYYY-MM-DD`. In the flat form a date that only
/// carries one of the two values keeps the other from `current`; keys that
/// are not dates are skipped.
pub(crate) fn parse_records(contents: &str, current: &TogLedger) -> Result<Vec<TogRecord>> {
    let value: Value = serde_json::from_str(contents).context("not valid JSON")?;
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(map) => {
            let mut days: BTreeMap<NaiveDate, (Option<f64>, Option<f64>)> = BTreeMap::new();
            for (key, v) in map {
                let (date_str, is_bonus) = match key.strip_prefix("bonus_") {
                    Some(rest) => (rest, true),
                    None => (key.as_str(), false),
                };
                let Ok(date) = date_str.parse::<NaiveDate>() else {
                    debug!(key = %key, "skipping non-date key");
                    continue;
                };
                let number = legacy_number(&v).with_context(|| format!("bad value for '{key}'"))?;
                let slot = days.entry(date).or_default();
                if is_bonus {
                    slot.1 = Some(number);
                } else {
                    slot.0 = Some(number);
                }
            }
            Ok(days
                .into_iter()
                .map(|(date, (hours, bonus))| TogRecord {
                    date,
                    hours: hours.or(current.get_hours(date)).unwrap_or(0.0),
                    bonus: bonus.or(current.get_bonus(date)).unwrap_or(0.0),
                })
                .collect())
        }
        _ => bail!("expected a JSON array or object"),
    }
}

/// Numbers may be stored as JSON numbers or numeric strings; blanks are 0.
fn legacy_number(v: &Value) -> Result<f64> {
    match v {
        Value::Number(n) => n.as_f64().context("number out of range"),
        Value::String(s) if s.trim().is_empty() => Ok(0.0),
        Value::String(s) => s.trim().parse().context("not a number"),
        Value::Null => Ok(0.0),
        _ => bail!("not a number"),
    }
}

fn cell(value: f64) -> String {
    if value == 0.0 {
        "-".to_string()
    } else {
        format_hours(value)
    }
}

/// Week rows (Monday first) with per-day totals, then the month figures.
/// Hidden weekdays are left out of the table and the sums.
pub(crate) fn write_month<W: Write>(
    tog: &TogLedger,
    month: MonthRef,
    visible: &VisibleDays,
    out: &mut W,
) -> Result<()> {
    let summary = tog_month_summary(tog, month, visible);
    let cells = grid(month, WeekStart::Monday);
    let columns: Vec<usize> = (0..7).filter(|i| visible[*i]).collect();

    writeln!(out, "TOG {month}")?;
    writeln!(out, "---")?;
    let mut header = format!("  {:<11}", "Week of");
    for &i in &columns {
        header.push_str(&format!("{:>7}", &cells[i].date.format("%a").to_string()[..2]));
    }
    header.push_str(&format!("{:>8}{:>7}", "Total", "Avg"));
    writeln!(out, "{header}")?;

    for (row, week) in cells.chunks(7).zip(&summary.weeks) {
        let mut line = format!("  {:<11}", week.start.format("%Y-%m-%d"));
        for &i in &columns {
            let c = &row[i];
            let text = if c.is_current_month {
                cell(tog.day_total(c.date))
            } else {
                String::new()
            };
            line.push_str(&format!("{text:>7}"));
        }
        line.push_str(&format!("{:>8}{:>7}", format_hours(week.total), format_hours(week.average)));
        writeln!(out, "{line}")?;
    }

    writeln!(out, "---")?;
    writeln!(out, "{:<26} {} h", "Month Total:", format_hours(summary.total))?;
    if visible != &ALL_DAYS {
        writeln!(out, "{:<26} {} h", "Incl. Hidden Days:", format_hours(tog_total(tog, month)))?;
    }
    writeln!(out, "{:<26} {}", "Days Logged:", summary.active_days)?;
    writeln!(out, "{:<26} {} h", "Daily Average:", format_hours(summary.average))?;
    Ok(())
}
