use crate::calc::workday::{dates_between, partition_weekends};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;

/// A range waiting for the weekend decision. Nothing here touches a ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRange {
    start: NaiveDate,
    end: NaiveDate,
    excluded: BTreeSet<NaiveDate>,
}

impl PendingRange {
    /// Orders the two picks; every day in between starts out included.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        PendingRange {
            start: a.min(b),
            end: a.max(b),
            excluded: BTreeSet::new(),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        dates_between(self.start, self.end)
    }

    pub fn len(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    pub fn weekend_days(&self) -> Vec<NaiveDate> {
        partition_weekends(&self.dates()).1
    }

    /// Yes/no answer to "include weekends": sets both Saturday and Sunday.
    pub fn include_weekends(&mut self, include: bool) {
        self.set_weekday_included(Weekday::Sat, include);
        self.set_weekday_included(Weekday::Sun, include);
    }

    pub fn set_weekday_included(&mut self, day: Weekday, include: bool) {
        for date in self.dates().into_iter().filter(|d| d.weekday() == day) {
            if include {
                self.excluded.remove(&date);
            } else {
                self.excluded.insert(date);
            }
        }
    }

    /// Returns false when the date is outside the range.
    pub fn exclude_date(&mut self, date: NaiveDate) -> bool {
        if !self.contains(date) {
            return false;
        }
        self.excluded.insert(date);
        true
    }

    /// Dates that a commit would write, ascending.
    pub fn selected(&self) -> Vec<NaiveDate> {
        self.dates()
            .into_iter()
            .filter(|d| !self.excluded.contains(d))
            .collect()
    }
}
