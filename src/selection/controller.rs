use crate::data::{DayType, LeaveLedger, LeaveTypeId};
use crate::errors::{CoreError, CoreResult, ValidationKind};
use crate::selection::guidance::{Guidance, GuidanceSink};
use crate::selection::pending::PendingRange;
use chrono::NaiveDate;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionState {
    /// Day clicks toggle single days.
    #[default]
    Off,
    AwaitingStart,
    AwaitingEnd { anchor: NaiveDate },
    /// Both ends picked; waiting for the weekend answer.
    ResolvingWeekends(PendingRange),
}

impl SelectionState {
    fn name(&self) -> &'static str {
        match self {
            SelectionState::Off => "off",
            SelectionState::AwaitingStart => "awaiting-start",
            SelectionState::AwaitingEnd { .. } => "awaiting-end",
            SelectionState::ResolvingWeekends(_) => "resolving-weekends",
        }
    }
}

/// Per-user selection context. Passed into every controller call instead
/// of living in a global; a fresh value is the initial state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSession {
    pub active_leave_type: Option<LeaveTypeId>,
    pub day_type: DayType,
    state: SelectionState,
}

impl SelectionSession {
    pub fn new(active_leave_type: Option<LeaveTypeId>) -> Self {
        SelectionSession {
            active_leave_type,
            ..Default::default()
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn is_range_mode(&self) -> bool {
        self.state != SelectionState::Off
    }

    pub fn pending(&self) -> Option<&PendingRange> {
        match &self.state {
            SelectionState::ResolvingWeekends(range) => Some(range),
            _ => None,
        }
    }

    /// Mutable access for the weekend and per-date toggles.
    pub fn pending_mut(&mut self) -> Option<&mut PendingRange> {
        match &mut self.state {
            SelectionState::ResolvingWeekends(range) => Some(range),
            _ => None,
        }
    }

    fn transition(&mut self, next: SelectionState) {
        debug!(from = self.state.name(), to = next.name(), "selection state");
        self.state = next;
    }

    /// Drops any in-progress selection without guidance, e.g. when the
    /// user navigates away.
    pub fn reset(&mut self) {
        if self.state != SelectionState::Off {
            self.transition(SelectionState::Off);
        }
    }

    pub fn toggle_on(&mut self, sink: &mut impl GuidanceSink) {
        if self.state == SelectionState::Off {
            self.transition(SelectionState::AwaitingStart);
            sink.emit(Guidance::SelectStart);
        }
    }

    /// Leaves range mode from any state. Never touches a ledger.
    pub fn toggle_off(&mut self, sink: &mut impl GuidanceSink) {
        if self.state != SelectionState::Off {
            self.transition(SelectionState::Off);
            sink.emit(Guidance::RangeOff);
        }
    }

    pub fn toggle_range_mode(&mut self, sink: &mut impl GuidanceSink) {
        if self.is_range_mode() {
            self.toggle_off(sink);
        } else {
            self.toggle_on(sink);
        }
    }

    /// Feeds one calendar click into the state machine.
    ///
    /// Outside range mode the click sets the day to the active leave type,
    /// or clears it when it already holds that type. In range mode it picks
    /// the start, then the end; both picks may be the same day. While the
    /// weekend choice is open clicks are ignored.
    pub fn select_day(
        &mut self,
        date: NaiveDate,
        ledger: &mut LeaveLedger,
        sink: &mut impl GuidanceSink,
    ) -> CoreResult<()> {
        match &self.state {
            SelectionState::Off => self.toggle_single_day(date, ledger, sink),
            SelectionState::AwaitingStart => {
                self.transition(SelectionState::AwaitingEnd { anchor: date });
                sink.emit(Guidance::SelectEnd);
                Ok(())
            }
            SelectionState::AwaitingEnd { anchor } => {
                let range = PendingRange::new(*anchor, date);
                let guidance = Guidance::ChooseWeekends {
                    days: range.len(),
                    weekend_days: range.weekend_days().len(),
                };
                self.transition(SelectionState::ResolvingWeekends(range));
                sink.emit(guidance);
                Ok(())
            }
            SelectionState::ResolvingWeekends(_) => {
                debug!(%date, "click ignored while weekend choice is open");
                Ok(())
            }
        }
    }

    /// Resolves the leave type a write would use, emitting the matching
    /// guidance when there is none.
    fn writable_type(&self, ledger: &LeaveLedger, sink: &mut impl GuidanceSink) -> CoreResult<LeaveTypeId> {
        if !ledger.has_types() {
            sink.emit(Guidance::NoLeaveType);
            return Err(CoreError::NoLeaveType);
        }
        let Some(id) = self.active_leave_type else {
            sink.emit(Guidance::SelectLeaveType);
            return Err(CoreError::NoActiveLeaveType);
        };
        if let Err(e) = ledger.get_type(id) {
            sink.emit(Guidance::SelectLeaveType);
            return Err(e);
        }
        Ok(id)
    }

    fn toggle_single_day(
        &mut self,
        date: NaiveDate,
        ledger: &mut LeaveLedger,
        sink: &mut impl GuidanceSink,
    ) -> CoreResult<()> {
        let id = self.writable_type(ledger, sink)?;
        let same = ledger
            .entry(date)
            .is_some_and(|e| e.leave_type == id && e.day_type == self.day_type);
        if same {
            ledger.clear_entry(date);
            sink.emit(Guidance::LeaveCleared);
        } else {
            ledger.set_entry_with(date, id, self.day_type)?;
            sink.emit(Guidance::LeaveLogged { days: 1 });
        }
        Ok(())
    }

    /// Commits the pending range with the active leave type.
    ///
    /// Returns the number of days written. With nothing pending this is a
    /// no-op returning 0. If every date has been excluded the state stays
    /// put so the user can adjust the toggles. Any other failure drops the
    /// pending range and leaves the ledger as it was.
    pub fn apply(&mut self, ledger: &mut LeaveLedger, sink: &mut impl GuidanceSink) -> CoreResult<usize> {
        let Some(range) = self.pending() else {
            debug!(state = self.state.name(), "apply with nothing pending");
            return Ok(0);
        };
        let dates = range.selected();
        if dates.is_empty() {
            sink.emit(Guidance::Validation(ValidationKind::EmptySelection));
            return Err(CoreError::Validation(ValidationKind::EmptySelection));
        }
        let result = self
            .writable_type(ledger, sink)
            .and_then(|id| ledger.set_entries(&dates, id, self.day_type));
        self.transition(SelectionState::Off);
        let count = result?;
        sink.emit(Guidance::LeaveLogged { days: count });
        sink.emit(Guidance::RangeOff);
        Ok(count)
    }

    /// Backs out one step: a pending range or a picked start returns to
    /// picking a start; waiting for a start leaves range mode.
    pub fn cancel(&mut self, sink: &mut impl GuidanceSink) {
        match self.state {
            SelectionState::Off => {}
            SelectionState::AwaitingStart => self.toggle_off(sink),
            SelectionState::AwaitingEnd { .. } | SelectionState::ResolvingWeekends(_) => {
                self.transition(SelectionState::AwaitingStart);
                sink.emit(Guidance::SelectStart);
            }
        }
    }
}
