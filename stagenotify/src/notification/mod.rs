//! Stage status notifications.
//!
//! - [`kind`]: notification kind identifiers
//! - [`revision`]: build-cause entries built from material revisions
//! - [`snapshot`]: the stage status payload
//! - [`dispatcher`]: interest check and posting

pub mod dispatcher;
#[cfg(test)]
mod integration_tests;
pub mod kind;
mod message;
pub mod revision;
pub mod snapshot;

pub use dispatcher::{DispatchOutcome, StageStatusListener, StageStatusNotifier};
pub use kind::{NotificationKind, NotificationKinds, STAGE_STATUS_CHANGE_NOTIFICATION};
pub use message::{
    JobEntry, NotificationMessage, PipelineEntry, RequestData, StageEntry, StageStatusMessage,
};
pub use revision::{assemble, ModificationEntry, RevisionEntry};
pub use snapshot::{build_stage_status_message, StageSnapshotter};
