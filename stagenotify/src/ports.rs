//! Collaborators the notifier depends on.
//!
//! The notifier owns none of these. The host injects them through
//! [`NotifierPorts`].

use crate::domain::BuildCause;
use crate::notification::{NotificationKind, NotificationMessage};
use async_trait::async_trait;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

/// Answers whether any plugin subscribed to a notification kind.
#[cfg_attr(test, automock)]
pub trait PluginInterestRegistry: Send + Sync {
    /// Returns true if at least one plugin wants notifications of `kind`.
    fn is_any_plugin_interested_in(&self, kind: &NotificationKind) -> bool;
}

/// Resolves the group a pipeline is configured in.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PipelineGroupResolver: Send + Sync {
    /// Returns the group name, or `None` if the pipeline is not in any group.
    async fn find_group_name_by_pipeline(&self, pipeline_name: &str) -> anyhow::Result<Option<String>>;
}

/// Loads the build-cause of a historical pipeline run.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BuildCauseResolver: Send + Sync {
    /// Returns the build-cause of run `pipeline_counter` of `pipeline_name`.
    async fn find_build_cause_of_pipeline_by_name_and_counter(
        &self,
        pipeline_name: &str,
        pipeline_counter: u64,
    ) -> anyhow::Result<BuildCause>;
}

/// Outbound queue delivering messages to plugins.
///
/// `post` hands the message off and returns; delivery happens elsewhere and
/// is never acknowledged to the caller.
#[cfg_attr(test, automock)]
pub trait NotificationQueue: Send + Sync {
    /// Hands a message to the queue.
    fn post(&self, message: NotificationMessage);
}

/// The collaborators a notifier is wired with.
#[derive(Clone)]
pub struct NotifierPorts {
    /// Plugin interest lookup.
    pub interest: Arc<dyn PluginInterestRegistry>,
    /// Pipeline group lookup.
    pub groups: Arc<dyn PipelineGroupResolver>,
    /// Build-cause lookup.
    pub build_causes: Arc<dyn BuildCauseResolver>,
    /// Outbound queue.
    pub queue: Arc<dyn NotificationQueue>,
}

impl std::fmt::Debug for NotifierPorts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifierPorts").finish_non_exhaustive()
    }
}

impl NotifierPorts {
    /// Bundles the collaborators.
    #[must_use]
    pub fn new(
        interest: Arc<dyn PluginInterestRegistry>,
        groups: Arc<dyn PipelineGroupResolver>,
        build_causes: Arc<dyn BuildCauseResolver>,
        queue: Arc<dyn NotificationQueue>,
    ) -> Self {
        Self {
            interest,
            groups,
            build_causes,
            queue,
        }
    }
}
