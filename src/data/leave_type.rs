use crate::errors::{CoreError, CoreResult, ValidationKind};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct LeaveTypeId(pub u32);

impl std::fmt::Display for LeaveTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::str::FromStr for LeaveTypeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(LeaveTypeId)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LeaveType {
    pub id: LeaveTypeId,
    pub name: String,
    pub color: String,
    /// Days per calendar year. Advisory only.
    pub annual_quota: f64,
    /// When set, the type only shows up in this year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_year: Option<i32>,
}

impl LeaveType {
    pub fn is_visible_in(&self, year: i32) -> bool {
        self.limit_year.is_none_or(|y| y == year)
    }
}

/// Trims the name and checks both fields; returns the trimmed name.
pub(crate) fn validate_fields(name: &str, quota: f64) -> CoreResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation(ValidationKind::EmptyName));
    }
    if !quota.is_finite() {
        return Err(CoreError::Validation(ValidationKind::NonFiniteNumber));
    }
    if quota < 0.0 {
        return Err(CoreError::Validation(ValidationKind::NegativeQuota));
    }
    Ok(name.to_string())
}
