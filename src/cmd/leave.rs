use crate::cmd::{with_snapshot, write_guidance, Env};
use crate::data::{AppSettings, DayType, LeaveLedger, LeaveTypeId};
use crate::locale::Catalog;
use crate::selection::{Guidance, SelectionSession};
use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;
use std::io::Write;

#[derive(Subcommand, Debug, Clone)]
pub enum LeaveCommand {
    /// Toggle a day: set it to the leave type, or clear it if it already holds it
    Set {
        date: NaiveDate,
        /// Log half a day
        #[arg(long)]
        half: bool,
        /// Leave type id (default: the active type)
        #[arg(long = "type")]
        leave_type: Option<LeaveTypeId>,
    },
    /// Remove whatever leave a day holds
    Clear { date: NaiveDate },
}

pub fn run(command: LeaveCommand) -> Result<()> {
    let env = Env::open()?;
    let mut out = std::io::stdout();
    with_snapshot(&env.store, |snapshot| {
        execute(command, &mut snapshot.leave, &env.settings, &env.catalog, &mut out)
    })
}

pub(crate) fn execute<W: Write>(
    command: LeaveCommand,
    ledger: &mut LeaveLedger,
    settings: &AppSettings,
    catalog: &Catalog,
    out: &mut W,
) -> Result<bool> {
    match command {
        LeaveCommand::Set {
            date,
            half,
            leave_type,
        } => {
            let mut session = SelectionSession::new(leave_type.or(settings.active_leave_type));
            if half {
                session.day_type = DayType::Half;
            }
            let mut events = Vec::new();
            let result = session.select_day(date, ledger, &mut events);
            write_guidance(catalog, &events, out)?;
            result?;
            Ok(true)
        }
        LeaveCommand::Clear { date } => {
            if ledger.clear_entry(date).is_some() {
                write_guidance(catalog, &[Guidance::LeaveCleared], out)?;
                Ok(true)
            } else {
                writeln!(out, "No leave on {date}.")?;
                Ok(false)
            }
        }
    }
}
