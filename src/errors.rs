use crate::data::leave_type::LeaveTypeId;
use thiserror::Error;

/// Which piece of input was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    EmptyName,
    NegativeQuota,
    NegativeHours,
    NonFiniteNumber,
    MinutesOutOfRange,
    EmptySelection,
}

impl ValidationKind {
    /// Stable key used by the message catalog.
    pub fn key(self) -> &'static str {
        match self {
            ValidationKind::EmptyName => "errEmptyName",
            ValidationKind::NegativeQuota => "errNegativeQuota",
            ValidationKind::NegativeHours => "errNegativeHours",
            ValidationKind::NonFiniteNumber => "errNotANumber",
            ValidationKind::MinutesOutOfRange => "errMinutesOutOfRange",
            ValidationKind::EmptySelection => "errEmptySelection",
        }
    }
}

impl std::fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            ValidationKind::EmptyName => "name must not be empty",
            ValidationKind::NegativeQuota => "quota must not be negative",
            ValidationKind::NegativeHours => "hours must not be negative",
            ValidationKind::NonFiniteNumber => "value is not a finite number",
            ValidationKind::MinutesOutOfRange => "minutes must be between 0 and 59",
            ValidationKind::EmptySelection => "no dates left in the selected range",
        };
        f.write_str(text)
    }
}

/// Failures reported by the leave and TOG ledgers and the selection controller.
///
/// Every variant is recoverable: the operation that returned it left all
/// ledgers untouched.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    Validation(ValidationKind),
    #[error("no leave type exists yet; add a leave type first")]
    NoLeaveType,
    #[error("no leave type is selected")]
    NoActiveLeaveType,
    #[error("leave type {0} not found")]
    LeaveTypeNotFound(LeaveTypeId),
    #[error("no leave type ids left")]
    IdsExhausted,
}

pub type CoreResult<T> = Result<T, CoreError>;
