use crate::data::persistence::Persistable;
use crate::errors::{CoreError, CoreResult, ValidationKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// One exported/imported TOG day.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct TogRecord {
    pub date: NaiveDate,
    pub hours: f64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub bonus: f64,
}

fn is_zero(v: &f64) -> bool {
    *v == 0.0
}

impl TogRecord {
    pub fn new(date: NaiveDate, hours: f64) -> Self {
        TogRecord {
            date,
            hours,
            bonus: 0.0,
        }
    }
}

fn check_hours(value: f64) -> CoreResult<()> {
    if !value.is_finite() {
        return Err(CoreError::Validation(ValidationKind::NonFiniteNumber));
    }
    if value < 0.0 {
        return Err(CoreError::Validation(ValidationKind::NegativeHours));
    }
    Ok(())
}

/// Fractional hours logged per day. A day holds main hours and optional
/// bonus hours; zero means "no entry".
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TogLedger {
    #[serde(default)]
    hours: BTreeMap<NaiveDate, f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    bonus: BTreeMap<NaiveDate, f64>,
}

impl Persistable for TogLedger {
    fn filename() -> &'static str {
        "tog.json"
    }
    fn is_json() -> bool {
        true
    }
}

fn put(map: &mut BTreeMap<NaiveDate, f64>, date: NaiveDate, value: f64) -> Option<f64> {
    if value == 0.0 {
        map.remove(&date)
    } else {
        map.insert(date, value)
    }
}

impl TogLedger {
    /// Overwrites the day's main hours. Zero deletes the entry.
    pub fn set_hours(&mut self, date: NaiveDate, value: f64) -> CoreResult<Option<f64>> {
        check_hours(value)?;
        let previous = put(&mut self.hours, date, value);
        debug!(%date, hours = value, "tog hours set");
        Ok(previous)
    }

    pub fn get_hours(&self, date: NaiveDate) -> Option<f64> {
        self.hours.get(&date).copied()
    }

    pub fn set_bonus(&mut self, date: NaiveDate, value: f64) -> CoreResult<Option<f64>> {
        check_hours(value)?;
        let previous = put(&mut self.bonus, date, value);
        debug!(%date, bonus = value, "tog bonus set");
        Ok(previous)
    }

    pub fn get_bonus(&self, date: NaiveDate) -> Option<f64> {
        self.bonus.get(&date).copied()
    }

    /// Removes both main and bonus hours for the day.
    pub fn clear(&mut self, date: NaiveDate) -> bool {
        let main = self.hours.remove(&date).is_some();
        let bonus = self.bonus.remove(&date).is_some();
        main || bonus
    }

    /// Main plus bonus hours.
    pub fn day_total(&self, date: NaiveDate) -> f64 {
        self.get_hours(date).unwrap_or(0.0) + self.get_bonus(date).unwrap_or(0.0)
    }

    pub fn has_entry(&self, date: NaiveDate) -> bool {
        self.hours.contains_key(&date)
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty() && self.bonus.is_empty()
    }

    /// Merges records by date, later records winning. Every record is
    /// validated before anything is written.
    pub fn bulk_import<I>(&mut self, records: I) -> CoreResult<usize>
    where
        I: IntoIterator<Item = TogRecord>,
    {
        let records: Vec<TogRecord> = records.into_iter().collect();
        for r in &records {
            check_hours(r.hours)?;
            check_hours(r.bonus)?;
        }
        for r in &records {
            put(&mut self.hours, r.date, r.hours);
            put(&mut self.bonus, r.date, r.bonus);
        }
        debug!(count = records.len(), "tog records imported");
        Ok(records.len())
    }

    pub fn reset(&mut self) {
        self.hours.clear();
        self.bonus.clear();
        debug!("tog ledger reset");
    }

    /// Every day with main or bonus hours, ascending by date.
    pub fn export(&self) -> Vec<TogRecord> {
        let mut out: BTreeMap<NaiveDate, TogRecord> = BTreeMap::new();
        for (&date, &hours) in &self.hours {
            out.insert(date, TogRecord::new(date, hours));
        }
        for (&date, &bonus) in &self.bonus {
            out.entry(date)
                .or_insert_with(|| TogRecord::new(date, 0.0))
                .bonus = bonus;
        }
        out.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_set_and_get_hours() {
        let mut tog = TogLedger::default();
        tog.set_hours(d(2024, 3, 1), 2.5).unwrap();
        assert_eq!(tog.get_hours(d(2024, 3, 1)), Some(2.5));
        assert_eq!(tog.get_hours(d(2024, 3, 2)), None);
    }

    #[test]
    fn test_set_hours_overwrites() {
        let mut tog = TogLedger::default();
        tog.set_hours(d(2024, 3, 1), 2.5).unwrap();
        let previous = tog.set_hours(d(2024, 3, 1), 4.0).unwrap();
        assert_eq!(previous, Some(2.5));
        assert_eq!(tog.get_hours(d(2024, 3, 1)), Some(4.0));
    }

    #[test]
    fn test_set_hours_zero_deletes() {
        let mut tog = TogLedger::default();
        tog.set_hours(d(2024, 3, 1), 2.5).unwrap();
        tog.set_hours(d(2024, 3, 1), 0.0).unwrap();
        assert_eq!(tog.get_hours(d(2024, 3, 1)), None);
        assert!(tog.is_empty());
    }

    #[test]
    fn test_set_hours_rejects_negative() {
        let mut tog = TogLedger::default();
        tog.set_hours(d(2024, 3, 1), 1.0).unwrap();
        let err = tog.set_hours(d(2024, 3, 1), -1.0).unwrap_err();
        assert_eq!(err, CoreError::Validation(ValidationKind::NegativeHours));
        assert_eq!(tog.get_hours(d(2024, 3, 1)), Some(1.0));
    }

    #[test]
    fn test_set_hours_rejects_infinite() {
        let mut tog = TogLedger::default();
        let err = tog.set_hours(d(2024, 3, 1), f64::INFINITY).unwrap_err();
        assert_eq!(err, CoreError::Validation(ValidationKind::NonFiniteNumber));
    }

    #[test]
    fn test_day_total_adds_bonus() {
        let mut tog = TogLedger::default();
        tog.set_hours(d(2024, 3, 1), 7.5).unwrap();
        tog.set_bonus(d(2024, 3, 1), 1.25).unwrap();
        assert_eq!(tog.day_total(d(2024, 3, 1)), 8.75);
        assert_eq!(tog.day_total(d(2024, 3, 2)), 0.0);
    }

    #[test]
    fn test_clear_removes_main_and_bonus() {
        let mut tog = TogLedger::default();
        tog.set_hours(d(2024, 3, 1), 7.5).unwrap();
        tog.set_bonus(d(2024, 3, 1), 1.0).unwrap();
        assert!(tog.clear(d(2024, 3, 1)));
        assert!(!tog.clear(d(2024, 3, 1)));
        assert!(tog.is_empty());
    }

    #[test]
    fn test_bulk_import_later_record_wins() {
        let mut tog = TogLedger::default();
        tog.set_hours(d(2024, 3, 1), 1.0).unwrap();
        tog.set_hours(d(2024, 3, 9), 9.0).unwrap();
        tog.bulk_import(vec![
            TogRecord::new(d(2024, 3, 1), 2.0),
            TogRecord::new(d(2024, 3, 2), 3.0),
            TogRecord::new(d(2024, 3, 1), 4.0),
        ])
        .unwrap();
        assert_eq!(tog.get_hours(d(2024, 3, 1)), Some(4.0));
        assert_eq!(tog.get_hours(d(2024, 3, 2)), Some(3.0));
        // untouched dates survive the merge
        assert_eq!(tog.get_hours(d(2024, 3, 9)), Some(9.0));
    }

    #[test]
    fn test_bulk_import_rejects_whole_batch_on_bad_record() {
        let mut tog = TogLedger::default();
        let err = tog
            .bulk_import(vec![
                TogRecord::new(d(2024, 3, 1), 2.0),
                TogRecord::new(d(2024, 3, 2), -3.0),
            ])
            .unwrap_err();
        assert_eq!(err, CoreError::Validation(ValidationKind::NegativeHours));
        assert!(tog.is_empty());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut tog = TogLedger::default();
        tog.set_hours(d(2024, 3, 1), 1.0).unwrap();
        tog.set_bonus(d(2024, 3, 2), 1.0).unwrap();
        tog.reset();
        assert!(tog.is_empty());
        assert!(tog.export().is_empty());
    }

    #[test]
    fn test_export_sorted_ascending_with_bonus_only_days() {
        let mut tog = TogLedger::default();
        tog.set_hours(d(2024, 3, 5), 1.0).unwrap();
        tog.set_hours(d(2024, 2, 29), 2.0).unwrap();
        tog.set_bonus(d(2024, 3, 1), 0.5).unwrap();
        let out = tog.export();
        let dates: Vec<_> = out.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![d(2024, 2, 29), d(2024, 3, 1), d(2024, 3, 5)]);
        assert_eq!(out[1].hours, 0.0);
        assert_eq!(out[1].bonus, 0.5);
    }

    #[test]
    fn test_export_then_import_into_empty_ledger_matches() {
        let mut tog = TogLedger::default();
        tog.set_hours(d(2024, 3, 1), 7.5).unwrap();
        tog.set_bonus(d(2024, 3, 1), 0.25).unwrap();
        tog.set_hours(d(2024, 3, 4), 6.0).unwrap();
        let mut copy = TogLedger::default();
        copy.bulk_import(tog.export()).unwrap();
        assert_eq!(copy, tog);
    }

    #[test]
    fn test_record_omits_zero_bonus_in_json() {
        let json = serde_json::to_string(&TogRecord::new(d(2024, 3, 1), 2.5)).unwrap();
        assert_eq!(json, r#"{"date":"2024-03-01","hours":2.5}"#);
    }
}
