//! Statistical analysis engine for industrial quality control.
//!
//! Two analysis families, each a pure function over a row-oriented input
//! [`Table`]: [`analyze_msa`] for Measurement System Analysis (Gauge
//! R&R) and [`analyze_capacidad_proceso`] for Process Capability. Both
//! return a structured validation error instead of panicking on bad
//! input; genuine statistical degeneracies (zero variance, a failed
//! distribution fit, an undefined capability index) are encoded in the
//! result type itself — `None` fields, `+∞` sentinels, empty violation
//! lists — never raised.
//!
//! The engine carries no state across calls and installs no logging
//! subscriber of its own; call [`utils::init_logging`] once at the host
//! application's startup to see its `tracing` events.

mod config;
mod constants;
pub mod primitives;
mod stats;
mod table;

pub mod validators;

pub mod msa;

pub mod capability;
pub mod distributions;
pub mod normality;
pub mod stability;

pub mod capacidad;

pub mod error;
pub mod report;
pub mod utils;

pub use capacidad::analyze_capacidad_proceso;
pub use config::EngineLimits;
pub use error::{AnalysisError, CapacidadValidationError, MsaValidationError};
pub use msa::analyze_msa;
pub use report::{CapacidadDocument, MsaDocument};
pub use table::Table;
