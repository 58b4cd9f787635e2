//! One reconciliation run over already-decoded survey and design points.

use chrono::Utc;
use tracing::info;

use super::extract::{extract_fat, extract_hp};
use super::index::DesignIndex;
use super::matcher::{MatchOutcome, MatchedBy, Matcher};
use super::nearest::nearest_fat;
use crate::config::ReconcileConfig;
use crate::models::{GeoPoint, RunResult, RunStats, TakeoutRow};

/// Reconcile survey points against design points.
///
/// Home-passes are extracted from both sets, termination points from the
/// design set only. Each survey home-pass matching nothing becomes a
/// [`TakeoutRow`] annotated with its nearest design FAT.
pub fn reconcile(
    survey_points: &[GeoPoint],
    design_points: &[GeoPoint],
    config: &ReconcileConfig,
) -> RunResult {
    let policy = config.policy;
    info!(
        "Reconciling with {} classifier, radius {} m",
        policy, config.radius_meters
    );

    let survey_hp = extract_hp(survey_points, policy);
    let design_hp = extract_hp(design_points, policy);
    let fats = extract_fat(design_points, policy);

    let index = DesignIndex::build(&design_hp);
    let matcher = Matcher::new(&design_hp, &index, config.radius_meters)
        .match_unnamed_by_id(config.match_unnamed_by_id);

    if !matcher.proximity_enabled() {
        info!("Proximity fallback disabled, matching by identifier only");
    }

    let mut stats = RunStats {
        survey_hp_count: survey_hp.len(),
        design_hp_count: design_hp.len(),
        fat_count: fats.len(),
        ..RunStats::default()
    };
    let mut rows = Vec::new();

    for (hp, outcome) in survey_hp.iter().zip(matcher.match_all(&survey_hp)) {
        match outcome {
            MatchOutcome::Matched(MatchedBy::Identifier) => stats.matched_by_id_count += 1,
            MatchOutcome::Matched(MatchedBy::Proximity) => stats.matched_by_distance_count += 1,
            MatchOutcome::Unmatched => rows.push(TakeoutRow::new(hp, nearest_fat(hp, &fats))),
        }
    }
    stats.takeout_count = rows.len();

    info!("{}", stats);

    RunResult {
        stats,
        rows,
        radius_m: config.radius_meters,
        policy,
        completed_at: Utc::now(),
    }
}
