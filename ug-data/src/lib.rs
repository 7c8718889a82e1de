//! File input and output around the `ug-core` planning engine.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`loader`] | TOML plan files and CSV rosters |
//! | [`report`] | plain-text reports for the terminal |
//! | [`export`] | CSV and JSON export of results |
//! | [`logging`] | tracing subscriber of the `ug-plan` binary |

pub mod export;
pub mod loader;
pub mod logging;
pub mod report;

pub use export::{ExportError, PlanExport};
pub use loader::{PlanLoadError, PlanSources, load_plan};
pub use report::ReportKind;
