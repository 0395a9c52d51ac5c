use crate::cmd::{today, with_snapshot, write_guidance, Env};
use crate::data::{AppSettings, LeaveLedger, LeaveTypeId};
use crate::errors::{CoreError, CoreResult};
use crate::locale::Catalog;
use crate::selection::Guidance;
use anyhow::{bail, Result};
use chrono::Datelike;
use clap::Subcommand;
use std::io::Write;

#[derive(Subcommand, Debug, Clone)]
pub enum TypesCommand {
    /// List leave types visible in a year
    List {
        /// Year to list for (default: current year)
        #[arg(long)]
        year: Option<i32>,
    },
    /// Add a leave type
    Add {
        name: String,
        #[arg(long, default_value = "#3b82f6")]
        color: String,
        /// Days per calendar year
        #[arg(long, default_value_t = 0.0)]
        quota: f64,
        /// Only show this type in the given year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Change a leave type; unspecified fields keep their value
    Edit {
        id: LeaveTypeId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        quota: Option<f64>,
        #[arg(long, conflicts_with = "no_year")]
        year: Option<i32>,
        /// Make the type visible in every year again
        #[arg(long)]
        no_year: bool,
    },
    /// Remove a leave type and all of its leave days
    Remove { id: LeaveTypeId },
    /// Select the leave type used for new leave days
    Use { id: LeaveTypeId },
}

pub fn run(command: TypesCommand) -> Result<()> {
    let mut env = Env::open()?;
    let before = env.settings.clone();
    let year = today().year();
    let mut out = std::io::stdout();
    with_snapshot(&env.store, |snapshot| {
        execute(command, &mut snapshot.leave, &mut env.settings, &env.catalog, year, &mut out)
    })?;
    if env.settings != before {
        env.save_settings()?;
    }
    Ok(())
}

/// Runs one subcommand against the ledger. Returns whether the ledger changed.
pub(crate) fn execute<W: Write>(
    command: TypesCommand,
    ledger: &mut LeaveLedger,
    settings: &mut AppSettings,
    catalog: &Catalog,
    year: i32,
    out: &mut W,
) -> Result<bool> {
    match command {
        TypesCommand::List { year: y } => {
            write_types(ledger, settings.active_leave_type, y.unwrap_or(year), out)?;
            Ok(false)
        }
        TypesCommand::Add {
            name,
            color,
            quota,
            year: limit,
        } => {
            let added = report(ledger.add_type(&name, &color, quota), catalog, out)?;
            if limit.is_some() {
                ledger.set_limit_year(added.id, limit)?;
            }
            if settings.active_leave_type.is_none() {
                settings.active_leave_type = Some(added.id);
            }
            writeln!(out, "Added leave type {} ({}).", added.id, added.name)?;
            Ok(true)
        }
        TypesCommand::Edit {
            id,
            name,
            color,
            quota,
            year: limit,
            no_year,
        } => {
            let current = ledger.get_type(id)?.clone();
            let updated = ledger.update_type(
                id,
                name.as_deref().unwrap_or(&current.name),
                color.as_deref().unwrap_or(&current.color),
                quota.unwrap_or(current.annual_quota),
            );
            report(updated, catalog, out)?;
            if no_year {
                ledger.set_limit_year(id, None)?;
            } else if limit.is_some() {
                ledger.set_limit_year(id, limit)?;
            }
            writeln!(out, "Updated leave type {id}.")?;
            Ok(true)
        }
        TypesCommand::Remove { id } => {
            let removed = ledger.remove_type(id)?;
            if settings.active_leave_type == Some(id) {
                settings.active_leave_type = ledger.types().first().map(|t| t.id);
            }
            writeln!(out, "Removed leave type {id} and {removed} leave day(s).")?;
            Ok(true)
        }
        TypesCommand::Use { id } => {
            let name = ledger.get_type(id)?.name.clone();
            if !ledger.get_type(id)?.is_visible_in(year) {
                bail!("leave type '{name}' is not available in {year}");
            }
            settings.active_leave_type = Some(id);
            writeln!(out, "Active leave type: {name}.")?;
            Ok(false)
        }
    }
}

/// Shows a rejected field through the catalog, then hands the error on.
fn report<T, W: Write>(result: CoreResult<T>, catalog: &Catalog, out: &mut W) -> Result<T> {
    if let Err(CoreError::Validation(kind)) = &result {
        write_guidance(catalog, &[Guidance::Validation(*kind)], out)?;
    }
    Ok(result?)
}

pub(crate) fn write_types<W: Write>(
    ledger: &LeaveLedger,
    active: Option<LeaveTypeId>,
    year: i32,
    out: &mut W,
) -> Result<()> {
    let types = ledger.visible_types(year);
    writeln!(out, "Leave Types ({year})")?;
    writeln!(out, "---")?;
    writeln!(
        out,
        "  {:<4} {:<24} {:<10} {:<8} {}",
        "ID", "Name", "Color", "Quota", "Year"
    )?;
    for t in &types {
        let mark = if active == Some(t.id) { "*" } else { " " };
        let limit = t.limit_year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "{} {:<4} {:<24} {:<10} {:<8} {}",
            mark, t.id, t.name, t.color, t.annual_quota, limit
        )?;
    }
    writeln!(out, "---")?;
    writeln!(out, "Total: {} leave type(s)", types.len())?;
    Ok(())
}
