use crate::cmd::{with_snapshot, write_guidance, Env};
use crate::data::{AppSettings, DayType, LeaveLedger, LeaveTypeId};
use crate::locale::Catalog;
use crate::selection::{Guidance, SelectionSession};
use anyhow::Result;
use chrono::{NaiveDate, Weekday};
use clap::Args;
use std::io::Write;
use tracing::{debug, warn};

#[derive(Args, Debug, Clone)]
pub struct RangeArgs {
    /// First day of the range
    pub start: NaiveDate,
    /// Last day of the range (may be before START or equal to it)
    pub end: NaiveDate,
    /// Leave out Saturdays and Sundays
    #[arg(long)]
    pub no_weekends: bool,
    #[arg(long)]
    pub exclude_sat: bool,
    #[arg(long)]
    pub exclude_sun: bool,
    /// Leave out a single day; repeatable
    #[arg(long = "skip", value_name = "DATE")]
    pub skip: Vec<NaiveDate>,
    /// Log every day as a half day
    #[arg(long)]
    pub half: bool,
    /// Leave type id (default: the active type)
    #[arg(long = "type")]
    pub leave_type: Option<LeaveTypeId>,
    /// Show the days that would be logged without saving
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: RangeArgs) -> Result<()> {
    let env = Env::open()?;
    let mut out = std::io::stdout();
    with_snapshot(&env.store, |snapshot| {
        execute(&args, &mut snapshot.leave, &env.settings, &env.catalog, &mut out)
    })
}

/// Drives a selection session from toggle-on to commit. Returns whether the
/// ledger changed.
pub(crate) fn execute<W: Write>(
    args: &RangeArgs,
    ledger: &mut LeaveLedger,
    settings: &AppSettings,
    catalog: &Catalog,
    out: &mut W,
) -> Result<bool> {
    let mut session = SelectionSession::new(args.leave_type.or(settings.active_leave_type));
    if args.half {
        session.day_type = DayType::Half;
    }
    let mut events = Vec::new();
    session.toggle_range_mode(&mut events);
    session.select_day(args.start, ledger, &mut events)?;
    session.select_day(args.end, ledger, &mut events)?;

    if let Some(pending) = session.pending_mut() {
        pending.include_weekends(!args.no_weekends);
        if args.exclude_sat {
            pending.set_weekday_included(Weekday::Sat, false);
        }
        if args.exclude_sun {
            pending.set_weekday_included(Weekday::Sun, false);
        }
        for &date in &args.skip {
            if !pending.exclude_date(date) {
                warn!(%date, "skip date outside the range, ignored");
            }
        }
    }
    write_guidance(catalog, &events, out)?;
    events.clear();

    if let Some(pending) = session.pending() {
        let days: Vec<String> = pending
            .selected()
            .iter()
            .map(|d| d.format("%a %Y-%m-%d").to_string())
            .collect();
        writeln!(out, "Range: {} to {}", pending.start(), pending.end())?;
        writeln!(out, "Selected: {} day(s)", days.len())?;
        for d in &days {
            writeln!(out, "  {d}")?;
        }
    }

    if args.dry_run {
        // first cancel drops the pending range, the second leaves range mode
        let mut dropped: Vec<Guidance> = Vec::new();
        session.cancel(&mut dropped);
        session.cancel(&mut events);
        write_guidance(catalog, &events, out)?;
        return Ok(false);
    }

    let result = session.apply(ledger, &mut events);
    if result.is_err() {
        // nothing else will be clicked in this run
        session.reset();
    }
    debug!(state = ?session.state(), "range command done");
    write_guidance(catalog, &events, out)?;
    Ok(result? > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{CoreError, ValidationKind};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn args(start: NaiveDate, end: NaiveDate) -> RangeArgs {
        RangeArgs {
            start,
            end,
            no_weekends: false,
            exclude_sat: false,
            exclude_sun: false,
            skip: Vec::new(),
            half: false,
            leave_type: None,
            dry_run: false,
        }
    }

    fn setup() -> (LeaveLedger, AppSettings) {
        let mut ledger = LeaveLedger::default();
        let id = ledger.add_type("Annual", "#22c55e", 20.0).unwrap().id;
        let settings = AppSettings {
            active_leave_type: Some(id),
            ..AppSettings::default()
        };
        (ledger, settings)
    }

    fn run_cmd(a: &RangeArgs, ledger: &mut LeaveLedger, settings: &AppSettings) -> (Result<bool>, String) {
        let mut buf = Vec::new();
        let result = execute(a, ledger, settings, &Catalog::builtin("en"), &mut buf);
        (result, String::from_utf8(buf).unwrap())
    }

    #[test]
    fn test_range_without_weekends() {
        let (mut ledger, settings) = setup();
        let a = RangeArgs {
            no_weekends: true,
            ..args(d(2024, 3, 1), d(2024, 3, 5))
        };
        let (result, out) = run_cmd(&a, &mut ledger, &settings);
        assert!(result.unwrap());
        let dates: Vec<_> = ledger.entries().map(|e| e.date).collect();
        assert_eq!(dates, vec![d(2024, 3, 1), d(2024, 3, 4), d(2024, 3, 5)]);
        assert!(out.contains("5 days selected, 2 on weekends"));
        assert!(out.contains("Selected: 3 day(s)"));
        assert!(out.contains("Logged 3 day(s) of leave."));
        assert!(out.contains("Range mode off."));
    }

    #[test]
    fn test_range_with_weekends_and_skip() {
        let (mut ledger, settings) = setup();
        let a = RangeArgs {
            skip: vec![d(2024, 3, 4), d(2024, 4, 1)],
            ..args(d(2024, 3, 5), d(2024, 3, 1))
        };
        let (result, out) = run_cmd(&a, &mut ledger, &settings);
        result.unwrap();
        assert!(out.contains("Range: 2024-03-01 to 2024-03-05"));
        assert_eq!(ledger.entries().count(), 4);
        assert!(ledger.entry(d(2024, 3, 4)).is_none());
        assert!(ledger.entry(d(2024, 3, 2)).is_some());
    }

    #[test]
    fn test_range_exclude_sunday_only() {
        let (mut ledger, settings) = setup();
        let a = RangeArgs {
            exclude_sun: true,
            ..args(d(2024, 3, 1), d(2024, 3, 5))
        };
        run_cmd(&a, &mut ledger, &settings).0.unwrap();
        assert!(ledger.entry(d(2024, 3, 2)).is_some());
        assert!(ledger.entry(d(2024, 3, 3)).is_none());
    }

    #[test]
    fn test_dry_run_leaves_ledger_alone() {
        let (mut ledger, settings) = setup();
        let a = RangeArgs {
            dry_run: true,
            ..args(d(2024, 3, 4), d(2024, 3, 6))
        };
        let (result, out) = run_cmd(&a, &mut ledger, &settings);
        assert!(!result.unwrap());
        assert_eq!(ledger.entries().count(), 0);
        assert!(out.contains("Selected: 3 day(s)"));
        assert!(out.contains("Range mode off."));
    }

    #[test]
    fn test_weekend_only_range_without_weekends_fails() {
        let (mut ledger, settings) = setup();
        let a = RangeArgs {
            no_weekends: true,
            ..args(d(2024, 3, 2), d(2024, 3, 3))
        };
        let (result, out) = run_cmd(&a, &mut ledger, &settings);
        assert_eq!(
            result.unwrap_err().downcast_ref::<CoreError>(),
            Some(&CoreError::Validation(ValidationKind::EmptySelection))
        );
        assert!(out.contains("No days left to log in this range."));
        assert_eq!(ledger.entries().count(), 0);
    }

    #[test]
    fn test_range_without_leave_types_fails() {
        let mut ledger = LeaveLedger::default();
        let (result, out) = run_cmd(&args(d(2024, 3, 4), d(2024, 3, 6)), &mut ledger, &AppSettings::default());
        assert!(result.is_err());
        assert!(out.contains("Add a leave type first."));
        assert_eq!(ledger, LeaveLedger::default());
    }
}
