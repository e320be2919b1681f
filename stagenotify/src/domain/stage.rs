//! Read-only snapshots of a stage run and its jobs.

use super::status::{ApprovalType, JobResult, JobState, StageResult, StageState};
use crate::utils::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Locates a stage run within a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StageIdentifier {
    /// The pipeline name.
    pub pipeline_name: String,
    /// The pipeline run counter.
    pub pipeline_counter: u64,
    /// The stage name.
    pub stage_name: String,
    /// The stage run counter within the pipeline run.
    pub stage_counter: u64,
}

impl StageIdentifier {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(
        pipeline_name: impl Into<String>,
        pipeline_counter: u64,
        stage_name: impl Into<String>,
        stage_counter: u64,
    ) -> Self {
        Self {
            pipeline_name: pipeline_name.into(),
            pipeline_counter,
            stage_name: stage_name.into(),
            stage_counter,
        }
    }
}

impl fmt::Display for StageIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.pipeline_name, self.pipeline_counter, self.stage_name, self.stage_counter
        )
    }
}

/// A recorded change of a job's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStateTransition {
    /// The state entered.
    pub state: JobState,
    /// When the state was entered.
    pub state_change_time: Timestamp,
}

impl JobStateTransition {
    /// Creates a new transition.
    #[must_use]
    pub fn new(state: JobState, state_change_time: Timestamp) -> Self {
        Self {
            state,
            state_change_time,
        }
    }
}

/// A job run belonging to a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobInstance {
    /// The job name.
    pub name: String,
    /// When the job was scheduled.
    pub scheduled_date: Timestamp,
    /// The current state.
    pub state: JobState,
    /// The current result.
    pub result: JobResult,
    /// The agent the job is assigned to, if any.
    pub agent_uuid: Option<String>,
    /// State transitions in the order they happened.
    #[serde(default)]
    pub transitions: Vec<JobStateTransition>,
}

impl JobInstance {
    /// Creates a scheduled job.
    #[must_use]
    pub fn new(name: impl Into<String>, scheduled_date: Timestamp) -> Self {
        Self {
            name: name.into(),
            scheduled_date,
            state: JobState::Scheduled,
            result: JobResult::Unknown,
            agent_uuid: None,
            transitions: vec![JobStateTransition::new(JobState::Scheduled, scheduled_date)],
        }
    }

    /// Assigns the job to an agent.
    #[must_use]
    pub fn with_agent(mut self, agent_uuid: impl Into<String>) -> Self {
        self.agent_uuid = Some(agent_uuid.into());
        self
    }

    /// Sets the result.
    #[must_use]
    pub fn with_result(mut self, result: JobResult) -> Self {
        self.result = result;
        self
    }

    /// Moves the job into `state` at `at`, recording the transition.
    #[must_use]
    pub fn transition_to(mut self, state: JobState, at: Timestamp) -> Self {
        self.state = state;
        self.transitions.push(JobStateTransition::new(state, at));
        self
    }

    /// Marks the job completed with `result`.
    #[must_use]
    pub fn completed(self, result: JobResult, at: Timestamp) -> Self {
        self.transition_to(JobState::Completed, at).with_result(result)
    }

    /// Returns the most recent transition into `state`.
    #[must_use]
    pub fn transition(&self, state: JobState) -> Option<&JobStateTransition> {
        self.transitions.iter().rev().find(|t| t.state == state)
    }
}

/// A stage run as seen when its status changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// Where this stage run lives.
    pub identifier: StageIdentifier,
    /// How the stage was approved.
    pub approval_type: ApprovalType,
    /// Who approved the stage.
    pub approved_by: String,
    /// The current state.
    pub state: StageState,
    /// The current result.
    pub result: StageResult,
    /// When the stage run was created.
    pub created_time: Timestamp,
    /// When the stage last changed state.
    pub last_transitioned_time: Timestamp,
    /// Jobs in configuration order.
    #[serde(default)]
    pub jobs: Vec<JobInstance>,
}

impl Stage {
    /// Creates a building stage with no jobs.
    #[must_use]
    pub fn new(identifier: StageIdentifier, created_time: Timestamp) -> Self {
        Self {
            identifier,
            approval_type: ApprovalType::Success,
            approved_by: String::new(),
            state: StageState::Building,
            result: StageResult::Unknown,
            created_time,
            last_transitioned_time: created_time,
            jobs: Vec::new(),
        }
    }

    /// Sets the approval type and approver.
    #[must_use]
    pub fn with_approval(mut self, approval_type: ApprovalType, approved_by: impl Into<String>) -> Self {
        self.approval_type = approval_type;
        self.approved_by = approved_by.into();
        self
    }

    /// Sets state and result, and the time of the transition.
    #[must_use]
    pub fn with_status(mut self, state: StageState, result: StageResult, at: Timestamp) -> Self {
        self.state = state;
        self.result = result;
        self.last_transitioned_time = at;
        self
    }

    /// Appends a job.
    #[must_use]
    pub fn with_job(mut self, job: JobInstance) -> Self {
        self.jobs.push(job);
        self
    }

    /// Returns the owning pipeline's name.
    #[must_use]
    pub fn pipeline_name(&self) -> &str {
        &self.identifier.pipeline_name
    }

    /// Returns the owning pipeline's run counter.
    #[must_use]
    pub fn pipeline_counter(&self) -> u64 {
        self.identifier.pipeline_counter
    }
}
