//! Canned collaborators for wiring a notifier in tests and demos.

use async_trait::async_trait;

use crate::domain::BuildCause;
use crate::ports::{BuildCauseResolver, PipelineGroupResolver, PluginInterestRegistry};
use crate::notification::NotificationKind;

/// Interest registry with a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedInterest(pub bool);

impl PluginInterestRegistry for FixedInterest {
    fn is_any_plugin_interested_in(&self, _kind: &NotificationKind) -> bool {
        self.0
    }
}

/// Group resolver returning the same group for every pipeline.
#[derive(Debug, Clone, Default)]
pub struct StaticGroupResolver {
    group: Option<String>,
}

impl StaticGroupResolver {
    /// Creates a resolver that answers `group`.
    #[must_use]
    pub fn new(group: Option<&str>) -> Self {
        Self {
            group: group.map(str::to_string),
        }
    }
}

#[async_trait]
impl PipelineGroupResolver for StaticGroupResolver {
    async fn find_group_name_by_pipeline(&self, _pipeline_name: &str) -> anyhow::Result<Option<String>> {
        Ok(self.group.clone())
    }
}

/// Build-cause resolver returning the same build-cause for every run.
#[derive(Debug, Clone, Default)]
pub struct StaticBuildCauseResolver {
    build_cause: BuildCause,
}

impl StaticBuildCauseResolver {
    /// Creates a resolver that answers `build_cause`.
    #[must_use]
    pub fn new(build_cause: BuildCause) -> Self {
        Self { build_cause }
    }
}

#[async_trait]
impl BuildCauseResolver for StaticBuildCauseResolver {
    async fn find_build_cause_of_pipeline_by_name_and_counter(
        &self,
        _pipeline_name: &str,
        _pipeline_counter: u64,
    ) -> anyhow::Result<BuildCause> {
        Ok(self.build_cause.clone())
    }
}
