//! Core data models for survey/design reconciliation.

pub mod point;
pub mod takeout;

pub use point::{FatEntity, GeoPoint, HpEntity, Identified, Located, NO_NAME};
pub use takeout::{RunResult, RunStats, TakeoutRow, TAKEOUT_REASON};
