//! Survey/design reconciliation engine.
//!
//! Classifies placemarks, indexes the design home-passes by identifier,
//! matches survey home-passes by identifier or proximity and looks up the
//! nearest termination point for every takeout.

mod classify;
mod distance;
mod extract;
mod index;
mod matcher;
mod nearest;
mod pipeline;

pub use classify::{classify, Classification, ClassifierPolicy};
pub use distance::{distance_m, haversine_m, EARTH_RADIUS_M};
pub use extract::{extract_fat, extract_hp};
pub use index::{DesignIndex, IdIndex};
pub use matcher::{match_survey_to_design, MatchOutcome, MatchedBy, Matcher};
pub use nearest::{nearest_fat, NearestFat};
pub use pipeline::reconcile;
