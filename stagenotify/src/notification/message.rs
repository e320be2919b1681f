//! Message types posted to the notification queue.
//!
//! Field names are part of the plugin contract. Counters are strings and
//! times use the shared notification format.

use super::kind::NotificationKind;
use super::revision::RevisionEntry;
use serde::Serialize;

/// The envelope handed to the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationMessage {
    /// Which notification this is.
    #[serde(rename = "requestName")]
    pub request_name: NotificationKind,
    /// The payload.
    #[serde(rename = "requestData")]
    pub request_data: RequestData,
}

impl NotificationMessage {
    /// Creates an envelope.
    #[must_use]
    pub fn new(request_name: NotificationKind, request_data: impl Into<RequestData>) -> Self {
        Self {
            request_name,
            request_data: request_data.into(),
        }
    }

    /// Renders the message as JSON.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// Payload of a notification, one variant per notification kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequestData {
    /// Payload of a stage status change.
    StageStatus(Box<StageStatusMessage>),
}

impl RequestData {
    /// Returns the stage status payload.
    #[must_use]
    pub fn as_stage_status(&self) -> Option<&StageStatusMessage> {
        match self {
            Self::StageStatus(message) => Some(message),
        }
    }
}

impl From<StageStatusMessage> for RequestData {
    fn from(message: StageStatusMessage) -> Self {
        Self::StageStatus(Box::new(message))
    }
}

/// Payload of a stage status change notification.
///
/// The top-level `pipeline-*` and `stage-*` fields duplicate values nested
/// under `pipeline` for consumers that only need a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StageStatusMessage {
    /// Group of the pipeline; `null` if the lookup found none.
    pub pipeline_group: Option<String>,
    /// Pipeline name.
    pub pipeline_name: String,
    /// Pipeline counter.
    pub pipeline_counter: String,
    /// Stage name.
    pub stage_name: String,
    /// Stage counter.
    pub stage_counter: String,
    /// Stage state display name.
    pub stage_state: String,
    /// Stage result display name.
    pub stage_result: String,
    /// Stage creation time.
    pub create_time: String,
    /// Stage last transition time.
    pub last_transition_time: String,
    /// Full pipeline snapshot.
    pub pipeline: PipelineEntry,
}

/// The `pipeline` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PipelineEntry {
    /// Pipeline name.
    pub name: String,
    /// Pipeline counter.
    pub counter: String,
    /// Pipeline group.
    pub group: Option<String>,
    /// Material revisions that triggered the run.
    pub build_cause: Vec<RevisionEntry>,
    /// The stage that changed.
    pub stage: StageEntry,
}

/// The `pipeline.stage` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StageEntry {
    /// Stage name.
    pub name: String,
    /// Stage counter.
    pub counter: String,
    /// `success` or `manual`.
    pub approval_type: String,
    /// Approver.
    pub approved_by: String,
    /// State display name.
    pub state: String,
    /// Result display name.
    pub result: String,
    /// Creation time.
    pub create_time: String,
    /// Last transition time.
    pub last_transition_time: String,
    /// Jobs in stage order.
    pub jobs: Vec<JobEntry>,
}

/// One element of `pipeline.stage.jobs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct JobEntry {
    /// Job name.
    pub name: String,
    /// Schedule time.
    pub schedule_time: String,
    /// Time the job completed, `""` if it has not.
    pub complete_time: String,
    /// State display name.
    pub state: String,
    /// Result display name.
    pub result: String,
    /// Assigned agent, `""` if none.
    pub agent_uuid: String,
}
