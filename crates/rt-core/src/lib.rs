//! RollerTap core: the upgrade event log and the statistics engine over it.
//!
//! Everything here is synchronous and single-threaded. Derived views
//! (fits, outliers, conflicts, summary) are pure functions of the current
//! event slice and are recomputed on every read.

pub mod conflicts;
pub mod event;
pub mod export;
pub mod fits;
pub mod group;
pub mod import;
pub mod log;
pub mod logging;
pub mod outliers;
pub mod parse;
pub mod store;
pub mod summary;
pub mod tracker;

pub use conflicts::{detect_conflicts, ConflictSet, Signature};
pub use event::{EventDraft, TotalsMismatch, UpgradeEvent};
pub use fits::{build_entity_fits, ConfidenceBand, EntityFit};
pub use import::{import_json, reconcile, ImportReport};
pub use log::EventLog;
pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
pub use outliers::{detect_outliers, rolling_z_scores, OutlierInfo};
pub use store::{FileStore, KeyValueStore, MemoryStore, Snapshot};
pub use summary::DatasetSummary;
pub use tracker::{Submission, Tracker};
