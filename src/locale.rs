//! Message catalogs for guidance and errors.
//!
//! Lookup order is the active language, then English, then the key itself.
//! Built-in tables cover English and German; any supported language can be
//! added or overridden with `<data-dir>/locales/<code>.yaml`, a flat map of
//! key to text.

use crate::selection::Guidance;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub const FALLBACK_LANGUAGE: &str = "en";

/// Language codes the app can be switched to, with their native names.
pub const SUPPORTED: &[(&str, &str)] = &[
    ("id", "Bahasa Indonesia"),
    ("ms", "Bahasa Melayu"),
    ("de", "Deutsch"),
    ("en", "English"),
    ("es", "Español"),
    ("fr", "Français"),
    ("it", "Italiano"),
    ("nl", "Nederlands"),
    ("pl", "Polski"),
    ("pt", "Português"),
    ("vi", "Tiếng Việt"),
    ("ru", "Русский"),
    ("ar", "العربية"),
    ("hi", "हिन्दी"),
    ("ta", "தமிழ்"),
    ("te", "తెలుగు"),
    ("ml", "മലയാളം"),
    ("th", "ไทย"),
    ("zh", "中文"),
    ("ja", "日本語"),
    ("ko", "한국어"),
];

const EN: &[(&str, &str)] = &[
    ("msgSelectStartDate", "Range mode on. Select the start date."),
    ("msgSelectEndDate", "Now select the end date."),
    (
        "msgIncludeWeekends",
        "{days} days selected, {weekendDays} on weekends. Include weekends?",
    ),
    ("msgRangeModeOff", "Range mode off."),
    ("msgLeaveLogged", "Logged {days} day(s) of leave."),
    ("msgLeaveCleared", "Leave entry removed."),
    ("msgAddLeaveTypeFirst", "Add a leave type first."),
    ("msgSelectLeaveType", "Select a leave type first."),
    ("errEmptyName", "Name must not be empty."),
    ("errNegativeQuota", "Quota must not be negative."),
    ("errNegativeHours", "Hours must not be negative."),
    ("errNotANumber", "Please enter a valid number."),
    ("errMinutesOutOfRange", "Minutes must be between 0 and 59."),
    ("errEmptySelection", "No days left to log in this range."),
];

const DE: &[(&str, &str)] = &[
    ("msgSelectStartDate", "Bereichsmodus an. Startdatum wählen."),
    ("msgSelectEndDate", "Jetzt das Enddatum wählen."),
    (
        "msgIncludeWeekends",
        "{days} Tage gewählt, davon {weekendDays} am Wochenende. Wochenenden einschließen?",
    ),
    ("msgRangeModeOff", "Bereichsmodus aus."),
    ("msgLeaveLogged", "{days} Urlaubstag(e) eingetragen."),
    ("msgLeaveCleared", "Eintrag entfernt."),
    ("msgAddLeaveTypeFirst", "Bitte zuerst eine Abwesenheitsart anlegen."),
    ("msgSelectLeaveType", "Bitte zuerst eine Abwesenheitsart wählen."),
    ("errEmptySelection", "In diesem Bereich bleiben keine Tage übrig."),
];

fn builtin(code: &str) -> &'static [(&'static str, &'static str)] {
    match code {
        "en" => EN,
        "de" => DE,
        _ => &[],
    }
}

pub fn is_supported(code: &str) -> bool {
    SUPPORTED.iter().any(|(c, _)| *c == code)
}

/// Saved choice if supported, else the primary subtag of the system locale
/// (`pt-BR` -> `pt`, `de_DE.UTF-8` -> `de`) if supported, else English.
pub fn resolve_language(saved: Option<&str>, system: Option<&str>) -> String {
    if let Some(code) = saved.filter(|c| is_supported(c)) {
        return code.to_string();
    }
    let primary = system
        .and_then(|s| s.split(['-', '_', '.']).next())
        .map(|s| s.to_ascii_lowercase());
    match primary {
        Some(code) if is_supported(&code) => code,
        _ => FALLBACK_LANGUAGE.to_string(),
    }
}

/// System locale from the usual environment variables.
pub fn system_language() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|v| !v.is_empty() && v != "C" && v != "POSIX")
}

fn table(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub struct Catalog {
    language: String,
    active: HashMap<String, String>,
    fallback: HashMap<String, String>,
}

impl Catalog {
    /// Built-in tables only.
    pub fn builtin(language: &str) -> Self {
        Catalog {
            language: language.to_string(),
            active: table(builtin(language)),
            fallback: table(EN),
        }
    }

    /// Built-in tables overlaid with `<dir>/locales/<code>.yaml` for both the
    /// active language and English, when those files exist.
    pub fn load(language: &str, dir: &Path) -> Result<Self> {
        let mut catalog = Catalog::builtin(language);
        if let Some(extra) = read_overlay(dir, language)? {
            catalog.active.extend(extra);
        }
        if language != FALLBACK_LANGUAGE {
            if let Some(extra) = read_overlay(dir, FALLBACK_LANGUAGE)? {
                catalog.fallback.extend(extra);
            }
        }
        Ok(catalog)
    }

    /// Text for `key` with `{name}` placeholders replaced.
    pub fn text(&self, key: &str, params: &[(&str, String)]) -> String {
        let mut text = match self.active.get(key).or_else(|| self.fallback.get(key)) {
            Some(t) => t.clone(),
            None => {
                debug!(key, language = %self.language, "missing translation");
                key.to_string()
            }
        };
        for (name, value) in params {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }

    pub fn guidance(&self, guidance: Guidance) -> String {
        self.text(guidance.key(), &guidance.params())
    }
}

fn read_overlay(dir: &Path, code: &str) -> Result<Option<HashMap<String, String>>> {
    if !is_supported(code) {
        warn!(code, "unsupported language, overlay ignored");
        return Ok(None);
    }
    let path = dir.join("locales").join(format!("{code}.yaml"));
    if !path.exists() {
        return Ok(None);
    }
    let contents =
        fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
    let map: HashMap<String, String> = serde_norway::from_str(&contents)
        .with_context(|| format!("failed to parse YAML from {}", path.display()))?;
    debug!(path = %path.display(), entries = map.len(), "locale overlay loaded");
    Ok(Some(map))
}
