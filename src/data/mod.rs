pub mod app_settings;
pub mod leave_ledger;
pub mod leave_type;
pub mod persistence;
pub mod tog_ledger;

pub use app_settings::{AppSettings, WeekStart};
pub use leave_ledger::{DayType, LeaveLedger};
pub use leave_type::LeaveTypeId;
pub use persistence::{DirStore, Persistable, Snapshot, SnapshotStore};
pub use tog_ledger::{TogLedger, TogRecord};
