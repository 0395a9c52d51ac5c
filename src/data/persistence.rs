use crate::data::{LeaveLedger, TogLedger};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Set once at startup by main() from the --data-dir argument.
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Call this from main() before any load/save operations.
pub fn set_data_dir(path: PathBuf) {
    let _ = DATA_DIR.set(path);
}

pub fn get_data_dir() -> Result<PathBuf> {
    if let Some(dir) = DATA_DIR.get() {
        return Ok(dir.clone());
    }
    // Fallback when running tests or if set_data_dir was not called
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    Ok(cwd.join("config"))
}

fn parse<T: for<'de> Deserialize<'de>>(contents: &str, json: bool, path: &Path) -> Result<T> {
    if json {
        serde_json::from_str(contents)
            .with_context(|| format!("failed to parse JSON from {}", path.display()))
    } else {
        serde_norway::from_str(contents)
            .with_context(|| format!("failed to parse YAML from {}", path.display()))
    }
}

fn render<T: Serialize>(value: &T, json: bool) -> Result<String> {
    if json {
        serde_json::to_string_pretty(value).context("failed to serialize JSON")
    } else {
        serde_norway::to_string(value).context("failed to serialize YAML")
    }
}

/// A value stored as one JSON or YAML file inside the data directory.
pub trait Persistable: Sized + Default + Serialize + for<'de> Deserialize<'de> {
    fn filename() -> &'static str;
    fn is_json() -> bool;

    /// Missing files load as the default value.
    fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join(Self::filename());
        if !path.exists() {
            debug!(path = %path.display(), "no file yet, using defaults");
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        parse(&contents, Self::is_json(), &path)
    }

    /// Creates `dir` when needed.
    fn save_to(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create dir {}", dir.display()))?;
        let path = dir.join(Self::filename());
        let contents = render(self, Self::is_json())?;
        fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!(path = %path.display(), "saved");
        Ok(())
    }
}

/// Everything the ledgers persist.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub leave: LeaveLedger,
    pub tog: TogLedger,
}

/// Where snapshots live. Each call is a complete transaction; there is no
/// retry.
pub trait SnapshotStore {
    fn load(&self) -> Result<Snapshot>;
    fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

/// One file per ledger inside a directory.
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirStore { dir: dir.into() }
    }
}

impl SnapshotStore for DirStore {
    fn load(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            leave: LeaveLedger::load_from(&self.dir)?,
            tog: TogLedger::load_from(&self.dir)?,
        })
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        snapshot.leave.save_to(&self.dir)?;
        snapshot.tog.save_to(&self.dir)
    }
}

/// In-memory store used by tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    saved: std::cell::RefCell<Option<Snapshot>>,
}

#[cfg(test)]
impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Snapshot> {
        Ok(self.saved.borrow().clone().unwrap_or_default())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        *self.saved.borrow_mut() = Some(snapshot.clone());
        Ok(())
    }
}
