use crate::data::leave_type::{validate_fields, LeaveType, LeaveTypeId};
use crate::data::persistence::Persistable;
use crate::errors::{CoreError, CoreResult};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    #[default]
    Full,
    Half,
}

impl DayType {
    /// Days of quota one entry consumes.
    pub fn amount(self) -> f64 {
        match self {
            DayType::Full => 1.0,
            DayType::Half => 0.5,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeaveEntry {
    pub date: NaiveDate,
    pub leave_type: LeaveTypeId,
    #[serde(default)]
    pub day_type: DayType,
}

/// Leave types plus the committed leave days, at most one per date.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(try_from = "LeaveLedgerFile", into = "LeaveLedgerFile")]
pub struct LeaveLedger {
    next_id: u32,
    types: Vec<LeaveType>,
    entries: BTreeMap<NaiveDate, LeaveEntry>,
}

/// On-disk shape: entries as a date-sorted list.
#[derive(Serialize, Deserialize, Default)]
struct LeaveLedgerFile {
    /// Kept so ids of deleted types are not handed out again.
    #[serde(default)]
    next_id: u32,
    #[serde(default)]
    leave_types: Vec<LeaveType>,
    #[serde(default)]
    entries: Vec<LeaveEntry>,
}

impl TryFrom<LeaveLedgerFile> for LeaveLedger {
    type Error = CoreError;

    fn try_from(file: LeaveLedgerFile) -> CoreResult<Self> {
        let mut next_id = file.next_id.max(1);
        for t in &file.leave_types {
            next_id = next_id.max(t.id.0.checked_add(1).ok_or(CoreError::IdsExhausted)?);
        }
        let mut ledger = LeaveLedger {
            next_id,
            types: file.leave_types,
            entries: BTreeMap::new(),
        };
        for entry in file.entries {
            if ledger.find_type(entry.leave_type).is_none() {
                warn!(date = %entry.date, leave_type = %entry.leave_type, "dropping entry with unknown leave type");
                continue;
            }
            // later duplicates win, same as a replayed set_entry
            ledger.entries.insert(entry.date, entry);
        }
        Ok(ledger)
    }
}

impl From<LeaveLedger> for LeaveLedgerFile {
    fn from(ledger: LeaveLedger) -> Self {
        LeaveLedgerFile {
            next_id: ledger.next_id,
            leave_types: ledger.types,
            entries: ledger.entries.into_values().collect(),
        }
    }
}

impl Persistable for LeaveLedger {
    fn filename() -> &'static str {
        "leave.json"
    }
    fn is_json() -> bool {
        true
    }
}

impl LeaveLedger {
    pub fn types(&self) -> &[LeaveType] {
        &self.types
    }

    pub fn has_types(&self) -> bool {
        !self.types.is_empty()
    }

    /// Types shown when viewing `year`.
    pub fn visible_types(&self, year: i32) -> Vec<&LeaveType> {
        self.types.iter().filter(|t| t.is_visible_in(year)).collect()
    }

    fn find_type(&self, id: LeaveTypeId) -> Option<&LeaveType> {
        self.types.iter().find(|t| t.id == id)
    }

    pub fn get_type(&self, id: LeaveTypeId) -> CoreResult<&LeaveType> {
        self.find_type(id).ok_or(CoreError::LeaveTypeNotFound(id))
    }

    pub fn add_type(&mut self, name: &str, color: &str, quota: f64) -> CoreResult<LeaveType> {
        let name = validate_fields(name, quota)?;
        let id = LeaveTypeId(self.next_id.max(1));
        self.next_id = id.0.checked_add(1).ok_or(CoreError::IdsExhausted)?;
        let leave_type = LeaveType {
            id,
            name,
            color: color.trim().to_string(),
            annual_quota: quota,
            limit_year: None,
        };
        debug!(id = %id, name = %leave_type.name, quota, "leave type added");
        self.types.push(leave_type.clone());
        Ok(leave_type)
    }

    /// Rewrites name, color and quota; the id and existing entries are kept.
    pub fn update_type(
        &mut self,
        id: LeaveTypeId,
        name: &str,
        color: &str,
        quota: f64,
    ) -> CoreResult<()> {
        let name = validate_fields(name, quota)?;
        let leave_type = self
            .types
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(CoreError::LeaveTypeNotFound(id))?;
        leave_type.name = name;
        leave_type.color = color.trim().to_string();
        leave_type.annual_quota = quota;
        debug!(id = %id, "leave type updated");
        Ok(())
    }

    pub fn set_limit_year(&mut self, id: LeaveTypeId, year: Option<i32>) -> CoreResult<()> {
        let leave_type = self
            .types
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(CoreError::LeaveTypeNotFound(id))?;
        leave_type.limit_year = year;
        Ok(())
    }

    /// Deletes the type and every entry that references it. Returns the
    /// number of entries removed.
    pub fn remove_type(&mut self, id: LeaveTypeId) -> CoreResult<usize> {
        let idx = self
            .types
            .iter()
            .position(|t| t.id == id)
            .ok_or(CoreError::LeaveTypeNotFound(id))?;
        self.types.remove(idx);
        let before = self.entries.len();
        self.entries.retain(|_, e| e.leave_type != id);
        let removed = before - self.entries.len();
        debug!(id = %id, removed, "leave type removed");
        Ok(removed)
    }

    fn check_writable(&self, id: LeaveTypeId) -> CoreResult<()> {
        if self.types.is_empty() {
            return Err(CoreError::NoLeaveType);
        }
        self.get_type(id).map(|_| ())
    }

    /// Writes a full-day entry, replacing whatever the date held before.
    pub fn set_entry(&mut self, date: NaiveDate, id: LeaveTypeId) -> CoreResult<Option<LeaveEntry>> {
        self.set_entry_with(date, id, DayType::Full)
    }

    pub fn set_entry_with(
        &mut self,
        date: NaiveDate,
        id: LeaveTypeId,
        day_type: DayType,
    ) -> CoreResult<Option<LeaveEntry>> {
        self.check_writable(id)?;
        let previous = self.entries.insert(
            date,
            LeaveEntry {
                date,
                leave_type: id,
                day_type,
            },
        );
        debug!(%date, leave_type = %id, replaced = previous.is_some(), "leave entry set");
        Ok(previous)
    }

    /// Writes every date or none of them.
    pub fn set_entries(&mut self, dates: &[NaiveDate], id: LeaveTypeId, day_type: DayType) -> CoreResult<usize> {
        assert!(!dates.is_empty(), "committing an empty batch of leave dates");
        self.check_writable(id)?;
        for &date in dates {
            self.entries.insert(
                date,
                LeaveEntry {
                    date,
                    leave_type: id,
                    day_type,
                },
            );
        }
        debug!(count = dates.len(), leave_type = %id, "leave entries committed");
        Ok(dates.len())
    }

    pub fn clear_entry(&mut self, date: NaiveDate) -> Option<LeaveEntry> {
        let removed = self.entries.remove(&date);
        if removed.is_some() {
            debug!(%date, "leave entry cleared");
        }
        removed
    }

    pub fn entry(&self, date: NaiveDate) -> Option<&LeaveEntry> {
        self.entries.get(&date)
    }

    pub fn entries(&self) -> impl Iterator<Item = &LeaveEntry> {
        self.entries.values()
    }

    pub fn entries_between(&self, start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = &LeaveEntry> {
        self.entries.range(start..=end).map(|(_, e)| e)
    }

    /// Number of entries referencing `id`, across all years.
    pub fn used_days(&self, id: LeaveTypeId) -> usize {
        self.entries.values().filter(|e| e.leave_type == id).count()
    }

    pub fn used_days_in_year(&self, id: LeaveTypeId, year: i32) -> usize {
        self.entries
            .values()
            .filter(|e| e.leave_type == id && e.date.year() == year)
            .count()
    }

    /// Quota consumed, counting half days as 0.5.
    pub fn used_amount(&self, id: LeaveTypeId, year: Option<i32>) -> f64 {
        self.entries
            .values()
            .filter(|e| e.leave_type == id)
            .filter(|e| year.is_none_or(|y| e.date.year() == y))
            .map(|e| e.day_type.amount())
            .sum()
    }

    /// Remaining quota for `year`. Negative when over-allocated.
    pub fn balance(&self, id: LeaveTypeId, year: i32) -> CoreResult<f64> {
        let leave_type = self.get_type(id)?;
        Ok(leave_type.annual_quota - self.used_amount(id, Some(year)))
    }
}
