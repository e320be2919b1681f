//! Stage and job lifecycle enums.
//!
//! Notification payloads carry the display name of each value (`"Passed"`,
//! `"Completed"`), which is also what `Display` renders.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a stage run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StageState {
    /// Jobs are still running and nothing has failed yet.
    Building,
    /// Jobs are still running and at least one has failed.
    Failing,
    /// Every job passed.
    Passed,
    /// At least one job failed.
    Failed,
    /// The stage was cancelled.
    Cancelled,
    /// The state could not be determined.
    #[default]
    Unknown,
}

impl StageState {
    /// Returns the display name used on the wire.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Building => "Building",
            Self::Failing => "Failing",
            Self::Passed => "Passed",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for StageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Outcome of a stage run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StageResult {
    /// The stage passed.
    Passed,
    /// The stage failed.
    Failed,
    /// The stage was cancelled.
    Cancelled,
    /// No result yet.
    #[default]
    Unknown,
}

impl StageResult {
    /// Returns the display name used on the wire.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Passed => "Passed",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for StageResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Lifecycle state of a job instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum JobState {
    /// Not yet known.
    #[default]
    Unknown,
    /// Waiting for an agent.
    Scheduled,
    /// Assigned to an agent.
    Assigned,
    /// The agent is preparing the working directory.
    Preparing,
    /// Tasks are running.
    Building,
    /// Artifacts are being uploaded.
    Completing,
    /// The job finished.
    Completed,
    /// The job was discontinued.
    Discontinued,
    /// The job is paused.
    Paused,
    /// The job is waiting.
    Waiting,
    /// The job was rescheduled onto another agent.
    Rescheduled,
}

impl JobState {
    /// Returns the display name used on the wire.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Scheduled => "Scheduled",
            Self::Assigned => "Assigned",
            Self::Preparing => "Preparing",
            Self::Building => "Building",
            Self::Completing => "Completing",
            Self::Completed => "Completed",
            Self::Discontinued => "Discontinued",
            Self::Paused => "Paused",
            Self::Waiting => "Waiting",
            Self::Rescheduled => "Rescheduled",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Outcome of a job instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum JobResult {
    /// The job passed.
    Passed,
    /// The job failed.
    Failed,
    /// The job was cancelled.
    Cancelled,
    /// No result yet.
    #[default]
    Unknown,
}

impl JobResult {
    /// Returns the display name used on the wire.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Passed => "Passed",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for JobResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// How a stage run was approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalType {
    /// Triggered automatically when the previous stage passed.
    #[default]
    Success,
    /// Triggered by a user.
    Manual,
}

impl fmt::Display for ApprovalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Manual => write!(f, "manual"),
        }
    }
}
