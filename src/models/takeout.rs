//! Reconciliation output: takeout rows, run statistics and the run result.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::point::HpEntity;
use crate::reconcile::{ClassifierPolicy, NearestFat};

/// Reason recorded on every takeout row.
pub const TAKEOUT_REASON: &str = "TAKEOUT";

/// A survey home-pass with no counterpart in the design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeoutRow {
    pub hp_id: String,
    pub lat: f64,
    pub lon: f64,
    pub group_label: String,
    /// Closest design FAT, absent when the design holds none
    pub nearest_fat_id: Option<String>,
    pub distance_to_fat_m: Option<f64>,
    pub reason: String,
}

impl TakeoutRow {
    pub fn new(hp: &HpEntity, nearest: Option<NearestFat>) -> Self {
        let (nearest_fat_id, distance_to_fat_m) = match nearest {
            Some(n) => (Some(n.fat_id), Some(n.distance_m)),
            None => (None, None),
        };

        Self {
            hp_id: hp.hp_id.clone(),
            lat: hp.lat,
            lon: hp.lon,
            group_label: hp.group_label.clone(),
            nearest_fat_id,
            distance_to_fat_m,
            reason: TAKEOUT_REASON.to_string(),
        }
    }
}

/// Counts reported for one reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub survey_hp_count: usize,
    pub design_hp_count: usize,
    pub matched_by_id_count: usize,
    pub matched_by_distance_count: usize,
    pub takeout_count: usize,
    pub fat_count: usize,
}

impl RunStats {
    pub fn matched_count(&self) -> usize {
        self.matched_by_id_count + self.matched_by_distance_count
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Survey HP: {} | Design HP: {} | Matched: {} (id {}, distance {}) | TAKEOUT: {} | FAT found: {}",
            self.survey_hp_count,
            self.design_hp_count,
            self.matched_count(),
            self.matched_by_id_count,
            self.matched_by_distance_count,
            self.takeout_count,
            self.fat_count
        )
    }
}

/// Everything a single run produces. Owned by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub stats: RunStats,
    pub rows: Vec<TakeoutRow>,
    pub radius_m: f64,
    pub policy: ClassifierPolicy,
    pub completed_at: DateTime<Utc>,
}

impl RunResult {
    /// Export is only offered when there is at least one takeout row
    pub fn can_export(&self) -> bool {
        !self.rows.is_empty()
    }
}
