pub mod calendar;
pub mod convert;
pub mod init;
pub mod leave;
pub mod range;
pub mod stats;
pub mod tog;
pub mod types;

use crate::data::persistence::get_data_dir;
use crate::data::{AppSettings, DirStore, Snapshot, SnapshotStore};
use crate::locale::{resolve_language, system_language, Catalog};
use crate::selection::Guidance;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::io::Write;
use std::path::PathBuf;

/// What every command needs from the data directory.
pub(crate) struct Env {
    pub dir: PathBuf,
    pub settings: AppSettings,
    pub catalog: Catalog,
    pub store: DirStore,
}

impl Env {
    pub fn open() -> Result<Self> {
        Self::open_in(get_data_dir()?)
    }

    pub fn open_in(dir: PathBuf) -> Result<Self> {
        let settings = AppSettings::load_from(&dir)?;
        let language = resolve_language(settings.language.as_deref(), system_language().as_deref());
        let catalog = Catalog::load(&language, &dir)?;
        Ok(Env {
            store: DirStore::new(&dir),
            dir,
            settings,
            catalog,
        })
    }

    pub fn save_settings(&self) -> Result<()> {
        self.settings.save_to(&self.dir)
    }
}

/// Loads the snapshot, runs `f`, and saves only when `f` returns `Ok(true)`.
pub(crate) fn with_snapshot<S, F>(store: &S, f: F) -> Result<()>
where
    S: SnapshotStore,
    F: FnOnce(&mut Snapshot) -> Result<bool>,
{
    let mut snapshot = store.load()?;
    if f(&mut snapshot)? {
        store.save(&snapshot)?;
    }
    Ok(())
}

pub(crate) fn write_guidance<W: Write>(catalog: &Catalog, events: &[Guidance], out: &mut W) -> Result<()> {
    for g in events {
        writeln!(out, "{}", catalog.guidance(*g))?;
    }
    Ok(())
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::persistence::MemoryStore;
    use anyhow::bail;

    #[test]
    fn test_with_snapshot_saves_on_change() {
        let store = MemoryStore::default();
        with_snapshot(&store, |s| {
            s.leave.add_type("Annual", "#22c55e", 20.0)?;
            Ok(true)
        })
        .unwrap();
        assert_eq!(store.load().unwrap().leave.types().len(), 1);
    }

    #[test]
    fn test_with_snapshot_skips_save_without_change() {
        let store = MemoryStore::default();
        with_snapshot(&store, |s| {
            s.leave.add_type("Annual", "#22c55e", 20.0)?;
            Ok(false)
        })
        .unwrap();
        assert!(store.load().unwrap().leave.types().is_empty());
    }

    #[test]
    fn test_with_snapshot_skips_save_on_error() {
        let store = MemoryStore::default();
        let result = with_snapshot(&store, |s| {
            s.leave.add_type("Annual", "#22c55e", 20.0)?;
            bail!("boom")
        });
        assert!(result.is_err());
        assert!(store.load().unwrap().leave.types().is_empty());
    }

    #[test]
    fn test_write_guidance_one_line_each() {
        let catalog = Catalog::builtin("en");
        let mut buf = Vec::new();
        write_guidance(&catalog, &[Guidance::SelectStart, Guidance::RangeOff], &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out.lines().count(), 2);
        assert!(out.contains("Range mode off."));
    }

    #[test]
    fn test_env_open_in_empty_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let env = Env::open_in(tmp.path().to_path_buf()).unwrap();
        assert_eq!(env.settings, AppSettings::default());
        assert!(env.store.load().unwrap().leave.types().is_empty());
    }
}
