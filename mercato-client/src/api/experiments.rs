use super::{EXPERIMENT_ASSIGNMENTS, EXPERIMENTS, ensure_row, require_id};
use crate::{BackendClient, ClientResult, DegradeExt, Query};
use shared::models::{Experiment, ExperimentAssignment};

impl BackendClient {
    pub async fn active_experiments(&self) -> ClientResult<Vec<Experiment>> {
        let rows: Vec<Experiment> = self
            .select(EXPERIMENTS, &Query::new().eq("is_active", true))
            .await
            .or_empty_if_unprovisioned()?;

        for exp in &rows {
            ensure_row(!exp.id.trim().is_empty(), EXPERIMENTS, || "row without id".to_string())?;
            ensure_row(
                exp.variants.iter().all(|v| !v.name.trim().is_empty()),
                EXPERIMENTS,
                || format!("unnamed variant in {}", exp.id),
            )?;
        }
        Ok(rows)
    }

    /// Store the variant a user was assigned; re-recording overwrites
    pub async fn record_assignment(&self, assignment: &ExperimentAssignment) -> ClientResult<()> {
        require_id("experiment id", &assignment.experiment_id)?;
        require_id("user id", &assignment.user_id)?;
        require_id("variant", &assignment.variant)?;

        let _: Vec<ExperimentAssignment> = self
            .upsert(EXPERIMENT_ASSIGNMENTS, assignment, "experiment_id,user_id")
            .await?;
        Ok(())
    }
}
