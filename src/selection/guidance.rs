use crate::errors::ValidationKind;

/// Language-neutral prompts for the UI. The locale catalog turns them into
/// text; the core never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guidance {
    SelectStart,
    SelectEnd,
    /// The weekend choice is open for a range of `days` days, `weekend_days`
    /// of them on Saturday or Sunday.
    ChooseWeekends { days: usize, weekend_days: usize },
    RangeOff,
    LeaveLogged { days: usize },
    LeaveCleared,
    NoLeaveType,
    SelectLeaveType,
    Validation(ValidationKind),
}

impl Guidance {
    /// Catalog key.
    pub fn key(self) -> &'static str {
        match self {
            Guidance::SelectStart => "msgSelectStartDate",
            Guidance::SelectEnd => "msgSelectEndDate",
            Guidance::ChooseWeekends { .. } => "msgIncludeWeekends",
            Guidance::RangeOff => "msgRangeModeOff",
            Guidance::LeaveLogged { .. } => "msgLeaveLogged",
            Guidance::LeaveCleared => "msgLeaveCleared",
            Guidance::NoLeaveType => "msgAddLeaveTypeFirst",
            Guidance::SelectLeaveType => "msgSelectLeaveType",
            Guidance::Validation(kind) => kind.key(),
        }
    }

    /// Placeholder values for the catalog text.
    pub fn params(self) -> Vec<(&'static str, String)> {
        match self {
            Guidance::ChooseWeekends { days, weekend_days } => vec![
                ("days", days.to_string()),
                ("weekendDays", weekend_days.to_string()),
            ],
            Guidance::LeaveLogged { days } => vec![("days", days.to_string())],
            _ => Vec::new(),
        }
    }
}

/// Receives guidance as the controller runs.
pub trait GuidanceSink {
    fn emit(&mut self, guidance: Guidance);
}

impl GuidanceSink for Vec<Guidance> {
    fn emit(&mut self, guidance: Guidance) {
        self.push(guidance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_collects_in_order() {
        let mut sink = Vec::new();
        sink.emit(Guidance::SelectStart);
        sink.emit(Guidance::RangeOff);
        assert_eq!(sink, vec![Guidance::SelectStart, Guidance::RangeOff]);
    }

    #[test]
    fn test_validation_uses_kind_key() {
        let g = Guidance::Validation(ValidationKind::EmptySelection);
        assert_eq!(g.key(), "errEmptySelection");
    }

    #[test]
    fn test_params_for_logged() {
        let params = Guidance::LeaveLogged { days: 3 }.params();
        assert_eq!(params, vec![("days", "3".to_string())]);
        assert!(Guidance::RangeOff.params().is_empty());
    }
}
