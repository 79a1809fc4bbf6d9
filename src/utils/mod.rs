//! Ambient utilities shared across the engine: logging setup only.
//!
//! File-dialog plumbing and a UI-framework-specific error enum have no
//! counterpart in this library (spec.md §1 excludes file I/O and
//! persistence), so only `logging` lives here.

pub mod logging;

pub use logging::{init_logging, log_info};
