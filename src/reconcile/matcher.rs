//! Survey-to-design matching: identifier first, then radius-bounded proximity.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::distance::distance_m;
use super::index::DesignIndex;
use crate::models::{HpEntity, NO_NAME};

/// How a survey home-pass found its design counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedBy {
    Identifier,
    Proximity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchOutcome {
    Matched(MatchedBy),
    Unmatched,
}

impl MatchOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchOutcome::Matched(_))
    }
}

/// Matches survey home-passes against one design set.
///
/// The design list and its index are borrowed read-only for the whole run.
pub struct Matcher<'a> {
    design: &'a [HpEntity],
    index: &'a DesignIndex<'a>,
    radius_m: f64,
    match_unnamed_by_id: bool,
}

impl<'a> Matcher<'a> {
    pub fn new(design: &'a [HpEntity], index: &'a DesignIndex<'a>, radius_m: f64) -> Self {
        Self {
            design,
            index,
            radius_m,
            match_unnamed_by_id: true,
        }
    }

    /// Whether unnamed survey points (empty or `(NO_NAME)`) may match by identifier
    pub fn match_unnamed_by_id(mut self, allow: bool) -> Self {
        self.match_unnamed_by_id = allow;
        self
    }

    /// Proximity fallback runs only for a positive radius (NaN never is)
    pub fn proximity_enabled(&self) -> bool {
        self.radius_m > 0.0
    }

    pub fn match_one(&self, hp: &HpEntity) -> MatchOutcome {
        if self.identifier_eligible(&hp.hp_id) && !self.index.get(&hp.hp_id).is_empty() {
            return MatchOutcome::Matched(MatchedBy::Identifier);
        }

        if self.proximity_enabled()
            && self
                .design
                .iter()
                .any(|d| distance_m(hp, d) <= self.radius_m)
        {
            return MatchOutcome::Matched(MatchedBy::Proximity);
        }

        MatchOutcome::Unmatched
    }

    /// One outcome per survey entity, aligned with `survey`
    pub fn match_all(&self, survey: &[HpEntity]) -> Vec<MatchOutcome> {
        let outcomes: Vec<MatchOutcome> = survey.iter().map(|hp| self.match_one(hp)).collect();

        debug!(
            "Matched {} survey HP against {} design HP (radius {} m)",
            survey.len(),
            self.index.len(),
            self.radius_m
        );

        outcomes
    }

    fn identifier_eligible(&self, id: &str) -> bool {
        self.match_unnamed_by_id || !(id.is_empty() || id == NO_NAME)
    }
}

/// Match every survey home-pass against the design set.
pub fn match_survey_to_design(
    survey: &[HpEntity],
    design: &[HpEntity],
    index: &DesignIndex<'_>,
    radius_m: f64,
) -> Vec<MatchOutcome> {
    Matcher::new(design, index, radius_m).match_all(survey)
}
