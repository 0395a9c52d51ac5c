use crate::data::leave_type::LeaveTypeId;
use crate::data::persistence::Persistable;
use anyhow::Result;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn first_day(self) -> Weekday {
        match self {
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Sunday => Weekday::Sun,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppSettings {
    #[serde(default)]
    pub week_start: WeekStart,
    /// Language code saved by the user, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Leave type applied when committing a selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_leave_type: Option<LeaveTypeId>,
    /// TOG weekday visibility, Monday first.
    #[serde(default = "all_days_visible")]
    pub tog_visible_days: [bool; 7],
}

fn all_days_visible() -> [bool; 7] {
    [true; 7]
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            week_start: WeekStart::Monday,
            language: None,
            active_leave_type: None,
            tog_visible_days: all_days_visible(),
        }
    }
}

/// Wrapper that reads the `settings` key from config.yaml.
#[derive(Serialize, Deserialize, Default, Debug)]
struct SettingsWrapper {
    #[serde(default)]
    settings: AppSettings,
}

impl Persistable for SettingsWrapper {
    fn filename() -> &'static str {
        "config.yaml"
    }
    fn is_json() -> bool {
        false
    }
}

impl AppSettings {
    pub fn load_from(dir: &Path) -> Result<Self> {
        Ok(SettingsWrapper::load_from(dir)?.settings)
    }

    pub fn save_to(&self, dir: &Path) -> Result<()> {
        let wrapper = SettingsWrapper {
            settings: self.clone(),
        };
        wrapper.save_to(dir)
    }

    /// Flips one TOG weekday; `Weekday::Mon` is index 0.
    pub fn toggle_tog_day(&mut self, day: Weekday) {
        let idx = day.num_days_from_monday() as usize;
        self.tog_visible_days[idx] = !self.tog_visible_days[idx];
    }
}
