use crate::data::{AppSettings, LeaveLedger, Persistable, TogLedger};
use anyhow::Result;
use std::fs;
use std::path::Path;

pub fn run() -> Result<()> {
    let dir = crate::data::persistence::get_data_dir()?;
    fs::create_dir_all(&dir)?;
    run_in_dir(&dir)?;
    println!("Data files initialized successfully.");
    Ok(())
}

/// Writes all default data files into `dir`. Exposed for unit testing.
pub(crate) fn run_in_dir(dir: &Path) -> Result<()> {
    let leave = default_leave()?;
    write_config(dir, &leave)?;
    leave.save_to(dir)?;
    TogLedger::default().save_to(dir)?;
    Ok(())
}

fn write_config(dir: &Path, leave: &LeaveLedger) -> Result<()> {
    let settings = AppSettings {
        active_leave_type: leave.types().first().map(|t| t.id),
        ..AppSettings::default()
    };
    settings.save_to(dir)
}

fn default_leave() -> Result<LeaveLedger> {
    let mut ledger = LeaveLedger::default();
    ledger.add_type("Annual Leave", "#3b82f6", 20.0)?;
    ledger.add_type("Sick Leave", "#ef4444", 10.0)?;
    ledger.add_type("Personal", "#a855f7", 3.0)?;
    Ok(ledger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LeaveTypeId;
    use tempfile::TempDir;

    #[test]
    fn test_run_in_dir_creates_all_files() {
        let tmp = TempDir::new().unwrap();
        run_in_dir(tmp.path()).unwrap();
        assert!(tmp.path().join("config.yaml").exists(), "config.yaml missing");
        assert!(tmp.path().join("leave.json").exists(), "leave.json missing");
        assert!(tmp.path().join("tog.json").exists(), "tog.json missing");
    }

    #[test]
    fn test_default_leave_types() {
        let tmp = TempDir::new().unwrap();
        run_in_dir(tmp.path()).unwrap();
        let ledger = LeaveLedger::load_from(tmp.path()).unwrap();
        let names: Vec<_> = ledger.types().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Annual Leave", "Sick Leave", "Personal"]);
        assert_eq!(ledger.entries().count(), 0);
    }

    #[test]
    fn test_config_selects_first_type() {
        let tmp = TempDir::new().unwrap();
        run_in_dir(tmp.path()).unwrap();
        let settings = AppSettings::load_from(tmp.path()).unwrap();
        assert_eq!(settings.active_leave_type, Some(LeaveTypeId(1)));
        let content = fs::read_to_string(tmp.path().join("config.yaml")).unwrap();
        assert!(content.contains("settings"), "config.yaml missing 'settings' key");
    }

    #[test]
    fn test_tog_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        run_in_dir(tmp.path()).unwrap();
        assert!(TogLedger::load_from(tmp.path()).unwrap().is_empty());
    }
}
