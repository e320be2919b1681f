//! Builds the stage status payload from a stage and its lookups.

use super::message::{JobEntry, PipelineEntry, StageEntry, StageStatusMessage};
use super::revision::assemble_build_cause;
use crate::domain::{BuildCause, JobInstance, JobState, Stage};
use crate::errors::{MaterialError, NotifyError};
use crate::materials::MaterialSerializerRegistry;
use crate::ports::{BuildCauseResolver, PipelineGroupResolver};
use crate::utils::format_notification_time;
use std::sync::Arc;
use tracing::debug;

/// Walks a stage and its lookups into a [`StageStatusMessage`].
#[derive(Clone)]
pub struct StageSnapshotter {
    groups: Arc<dyn PipelineGroupResolver>,
    build_causes: Arc<dyn BuildCauseResolver>,
    materials: Arc<MaterialSerializerRegistry>,
}

impl std::fmt::Debug for StageSnapshotter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageSnapshotter")
            .field("materials", &self.materials)
            .finish_non_exhaustive()
    }
}

impl StageSnapshotter {
    /// Creates a snapshotter.
    #[must_use]
    pub fn new(
        groups: Arc<dyn PipelineGroupResolver>,
        build_causes: Arc<dyn BuildCauseResolver>,
        materials: Arc<MaterialSerializerRegistry>,
    ) -> Self {
        Self {
            groups,
            build_causes,
            materials,
        }
    }

    /// Resolves the pipeline group and build-cause, then builds the payload.
    ///
    /// Lookups are made once each. Their errors are returned as is, without
    /// retry.
    pub async fn snapshot(&self, stage: &Stage) -> Result<StageStatusMessage, NotifyError> {
        let pipeline_name = stage.pipeline_name();
        let pipeline_counter = stage.pipeline_counter();

        let group = self
            .groups
            .find_group_name_by_pipeline(pipeline_name)
            .await
            .map_err(|e| NotifyError::group_lookup(pipeline_name, e))?;

        if group.is_none() {
            debug!(pipeline_name, "No pipeline group found");
        }

        let build_cause = self
            .build_causes
            .find_build_cause_of_pipeline_by_name_and_counter(pipeline_name, pipeline_counter)
            .await
            .map_err(|e| NotifyError::build_cause_lookup(pipeline_name, pipeline_counter, e))?;

        Ok(build_stage_status_message(
            stage,
            group,
            &build_cause,
            &self.materials,
        )?)
    }
}

/// Builds the payload from already resolved inputs.
pub fn build_stage_status_message(
    stage: &Stage,
    group: Option<String>,
    build_cause: &BuildCause,
    materials: &MaterialSerializerRegistry,
) -> Result<StageStatusMessage, MaterialError> {
    let id = &stage.identifier;
    let build_cause = assemble_build_cause(materials, &build_cause.material_revisions)?;
    let stage_entry = stage_entry(stage);

    Ok(StageStatusMessage {
        pipeline_group: group.clone(),
        pipeline_name: id.pipeline_name.clone(),
        pipeline_counter: id.pipeline_counter.to_string(),
        stage_name: id.stage_name.clone(),
        stage_counter: id.stage_counter.to_string(),
        stage_state: stage.state.display_name().to_string(),
        stage_result: stage.result.display_name().to_string(),
        create_time: stage_entry.create_time.clone(),
        last_transition_time: stage_entry.last_transition_time.clone(),
        pipeline: PipelineEntry {
            name: id.pipeline_name.clone(),
            counter: id.pipeline_counter.to_string(),
            group,
            build_cause,
            stage: stage_entry,
        },
    })
}

fn stage_entry(stage: &Stage) -> StageEntry {
    StageEntry {
        name: stage.identifier.stage_name.clone(),
        counter: stage.identifier.stage_counter.to_string(),
        approval_type: stage.approval_type.to_string(),
        approved_by: stage.approved_by.clone(),
        state: stage.state.display_name().to_string(),
        result: stage.result.display_name().to_string(),
        create_time: format_notification_time(&stage.created_time),
        last_transition_time: format_notification_time(&stage.last_transitioned_time),
        jobs: stage.jobs.iter().map(job_entry).collect(),
    }
}

fn job_entry(job: &JobInstance) -> JobEntry {
    JobEntry {
        name: job.name.clone(),
        schedule_time: format_notification_time(&job.scheduled_date),
        complete_time: job
            .transition(JobState::Completed)
            .map(|t| format_notification_time(&t.state_change_time))
            .unwrap_or_default(),
        state: job.state.display_name().to_string(),
        result: job.result.display_name().to_string(),
        agent_uuid: job.agent_uuid.clone().unwrap_or_default(),
    }
}
