//! HP Takeout - survey vs. design home-pass reconciliation
//!
//! This library provides the reconciliation engine, the KML/KMZ loaders and
//! the export helpers used by the `takeout` binary.

pub mod config;
pub mod error;
pub mod export;
pub mod kml;
pub mod models;
pub mod reconcile;
pub mod report;
pub mod session;

pub use config::ReconcileConfig;
pub use error::{Error, FormatError, InputRole, Result};
pub use models::{FatEntity, GeoPoint, HpEntity, RunResult, RunStats, TakeoutRow};
pub use reconcile::{reconcile, ClassifierPolicy};
pub use session::{RunStatus, Session};
