//! Holds the most recent run result between a run and its export.

use std::io::Write;
use std::path::Path;

use tracing::{info, warn};

use crate::config::ReconcileConfig;
use crate::error::{Error, Result};
use crate::export::write_csv;
use crate::kml::load_pair;
use crate::models::RunResult;
use crate::reconcile::reconcile;

/// State of the last attempted run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Done,
    Failed(String),
}

/// One user-facing session: at most one result is held at a time.
#[derive(Debug, Default)]
pub struct Session {
    last: Option<RunResult>,
    status: RunStatus,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &RunStatus {
        &self.status
    }

    pub fn last_result(&self) -> Option<&RunResult> {
        self.last.as_ref()
    }

    /// Load both documents and reconcile them.
    ///
    /// Any previous result is dropped before work starts, so a failed run
    /// leaves nothing to export.
    pub async fn run(
        &mut self,
        survey: Option<&Path>,
        design: Option<&Path>,
        config: &ReconcileConfig,
    ) -> Result<&RunResult> {
        self.last = None;
        self.status = RunStatus::Running;

        let (survey_points, design_points) = match load_pair(survey, design).await {
            Ok(pair) => pair,
            Err(e) => {
                warn!("Run failed: {}", e);
                self.status = RunStatus::Failed(e.to_string());
                return Err(e);
            }
        };

        let result = reconcile(&survey_points, &design_points, config);
        self.status = RunStatus::Done;
        Ok(self.last.insert(result))
    }

    /// Whether the held result has anything to export
    pub fn can_export(&self) -> bool {
        self.last.as_ref().is_some_and(RunResult::can_export)
    }

    /// Write the held takeout rows as CSV.
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let result = match &self.last {
            Some(result) if result.can_export() => result,
            _ => return Err(Error::ExportDisabled),
        };

        write_csv(&result.rows, writer)?;
        info!("Exported {} takeout rows", result.rows.len());
        Ok(result.rows.len())
    }
}
