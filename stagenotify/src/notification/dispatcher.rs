//! Decides whether a stage status change is worth a notification and posts it.

use super::kind::{NotificationKind, NotificationKinds};
use super::message::NotificationMessage;
use super::snapshot::StageSnapshotter;
use crate::config::NotifierConfig;
use crate::domain::Stage;
use crate::errors::NotifyError;
use crate::materials::MaterialSerializerRegistry;
use crate::ports::NotifierPorts;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info};

/// What happened to a stage event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No plugin was interested; nothing was built or posted.
    Skipped,
    /// One message was posted.
    Dispatched,
}

/// Receives stage status changes from the pipeline engine.
///
/// Implementations must not fail the caller: stage execution does not depend
/// on notifications being delivered.
#[async_trait]
pub trait StageStatusListener: Send + Sync {
    /// Called after a stage changes status.
    async fn on_stage_status_changed(&self, stage: &Stage);
}

/// Posts stage status change notifications to interested plugins.
///
/// Holds no per-dispatch state and can be shared across tasks.
#[derive(Debug, Clone)]
pub struct StageStatusNotifier {
    ports: NotifierPorts,
    snapshotter: StageSnapshotter,
    kinds: Arc<NotificationKinds>,
    enabled: bool,
}

impl StageStatusNotifier {
    /// Creates a notifier.
    #[must_use]
    pub fn new(
        ports: NotifierPorts,
        materials: Arc<MaterialSerializerRegistry>,
        kinds: Arc<NotificationKinds>,
    ) -> Self {
        let snapshotter = StageSnapshotter::new(
            Arc::clone(&ports.groups),
            Arc::clone(&ports.build_causes),
            materials,
        );
        Self {
            ports,
            snapshotter,
            kinds,
            enabled: true,
        }
    }

    /// Creates a notifier from configuration.
    pub fn from_config(
        ports: NotifierPorts,
        materials: Arc<MaterialSerializerRegistry>,
        config: &NotifierConfig,
    ) -> Result<Self, NotifyError> {
        let kind = NotificationKind::new(config.stage_status_kind.clone())?;
        let mut notifier = Self::new(ports, materials, Arc::new(NotificationKinds::new(kind)));
        notifier.enabled = config.enabled;
        Ok(notifier)
    }

    /// The kind this notifier posts under.
    #[must_use]
    pub fn notification_kind(&self) -> &NotificationKind {
        self.kinds.stage_status_change()
    }

    /// Handles one stage status change.
    ///
    /// When no plugin is interested this returns [`DispatchOutcome::Skipped`]
    /// without any lookup or queue interaction. Otherwise the payload is
    /// built and posted exactly once. Any error aborts the dispatch before
    /// anything is posted.
    pub async fn stage_status_changed(&self, stage: &Stage) -> Result<DispatchOutcome, NotifyError> {
        let kind = self.kinds.stage_status_change();

        if !self.enabled || !self.ports.interest.is_any_plugin_interested_in(kind) {
            debug!(
                notification_kind = %kind,
                stage = %stage.identifier,
                "No plugin interested, skipping notification"
            );
            return Ok(DispatchOutcome::Skipped);
        }

        let request_data = self.snapshotter.snapshot(stage).await?;
        let message = NotificationMessage::new(kind.clone(), request_data);
        self.ports.queue.post(message);

        info!(
            notification_kind = %kind,
            pipeline_name = %stage.identifier.pipeline_name,
            pipeline_counter = stage.identifier.pipeline_counter,
            stage_name = %stage.identifier.stage_name,
            stage_counter = stage.identifier.stage_counter,
            "Posted stage status notification"
        );
        Ok(DispatchOutcome::Dispatched)
    }

    /// Runs [`Self::stage_status_changed`] on a separate task.
    ///
    /// Failures are logged; the returned handle resolves to `None` for a
    /// failed dispatch.
    pub fn spawn(self: &Arc<Self>, stage: Stage) -> tokio::task::JoinHandle<Option<DispatchOutcome>> {
        let notifier = Arc::clone(self);
        tokio::spawn(async move {
            match notifier.stage_status_changed(&stage).await {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    log_failure(&stage, &e);
                    None
                }
            }
        })
    }
}

fn log_failure(stage: &Stage, e: &NotifyError) {
    error!(
        stage = %stage.identifier,
        error = %e,
        lookup_failure = e.is_lookup_failure(),
        "Stage status notification failed"
    );
}

#[async_trait]
impl StageStatusListener for StageStatusNotifier {
    async fn on_stage_status_changed(&self, stage: &Stage) {
        if let Err(e) = self.stage_status_changed(stage).await {
            log_failure(stage, &e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BuildCause;
    use crate::ports::{
        MockBuildCauseResolver, MockNotificationQueue, MockPipelineGroupResolver,
        MockPluginInterestRegistry,
    };
    use crate::queue::CollectingNotificationQueue;
    use crate::testing::{simple_stage, StaticBuildCauseResolver, StaticGroupResolver};

    fn uninterested() -> MockPluginInterestRegistry {
        let mut interest = MockPluginInterestRegistry::new();
        interest
            .expect_is_any_plugin_interested_in()
            .withf(|kind| kind.as_str() == "stage-status")
            .times(1)
            .return_const(false);
        interest
    }

    fn interested() -> MockPluginInterestRegistry {
        let mut interest = MockPluginInterestRegistry::new();
        interest
            .expect_is_any_plugin_interested_in()
            .return_const(true);
        interest
    }

    fn untouched_lookups() -> (MockPipelineGroupResolver, MockBuildCauseResolver) {
        let mut groups = MockPipelineGroupResolver::new();
        groups.expect_find_group_name_by_pipeline().never();
        let mut build_causes = MockBuildCauseResolver::new();
        build_causes
            .expect_find_build_cause_of_pipeline_by_name_and_counter()
            .never();
        (groups, build_causes)
    }

    fn notifier(
        interest: MockPluginInterestRegistry,
        groups: Arc<dyn crate::ports::PipelineGroupResolver>,
        build_causes: Arc<dyn crate::ports::BuildCauseResolver>,
        queue: Arc<dyn crate::ports::NotificationQueue>,
    ) -> StageStatusNotifier {
        StageStatusNotifier::new(
            NotifierPorts::new(Arc::new(interest), groups, build_causes, queue),
            Arc::new(MaterialSerializerRegistry::new()),
            Arc::new(NotificationKinds::default()),
        )
    }

    #[tokio::test]
    async fn test_skips_when_no_plugin_is_interested() {
        let (groups, build_causes) = untouched_lookups();
        let mut queue = MockNotificationQueue::new();
        queue.expect_post().never();

        let notifier = notifier(
            uninterested(),
            Arc::new(groups),
            Arc::new(build_causes),
            Arc::new(queue),
        );

        let outcome = notifier.stage_status_changed(&simple_stage()).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_posts_once_when_interested() {
        let mut queue = MockNotificationQueue::new();
        queue
            .expect_post()
            .withf(|message| message.request_name.as_str() == "stage-status")
            .times(1)
            .return_const(());

        let notifier = notifier(
            interested(),
            Arc::new(StaticGroupResolver::new(Some("pipeline-group"))),
            Arc::new(StaticBuildCauseResolver::new(BuildCause::default())),
            Arc::new(queue),
        );

        let outcome = notifier.stage_status_changed(&simple_stage()).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::Dispatched);
    }

    #[tokio::test]
    async fn test_posted_message_carries_snapshot() {
        let queue = Arc::new(CollectingNotificationQueue::new());
        let notifier = notifier(
            interested(),
            Arc::new(StaticGroupResolver::new(Some("pipeline-group"))),
            Arc::new(StaticBuildCauseResolver::new(BuildCause::default())),
            queue.clone(),
        );

        notifier.stage_status_changed(&simple_stage()).await.unwrap();

        let messages = queue.messages();
        assert_eq!(messages.len(), 1);
        let data = messages[0].request_data.as_stage_status().unwrap();
        assert_eq!(data.pipeline_group.as_deref(), Some("pipeline-group"));
        assert_eq!(data.stage_name, "stage-name");
    }

    #[tokio::test]
    async fn test_lookup_failure_posts_nothing() {
        let mut groups = MockPipelineGroupResolver::new();
        groups
            .expect_find_group_name_by_pipeline()
            .returning(|_| Err(anyhow::anyhow!("config repo offline")));
        let mut queue = MockNotificationQueue::new();
        queue.expect_post().never();

        let notifier = notifier(
            interested(),
            Arc::new(groups),
            Arc::new(StaticBuildCauseResolver::new(BuildCause::default())),
            Arc::new(queue),
        );

        let err = notifier.stage_status_changed(&simple_stage()).await.unwrap_err();
        assert!(err.is_lookup_failure());
    }

    #[tokio::test]
    async fn test_disabled_notifier_does_not_consult_plugins() {
        let mut interest = MockPluginInterestRegistry::new();
        interest.expect_is_any_plugin_interested_in().never();
        let (groups, build_causes) = untouched_lookups();
        let mut queue = MockNotificationQueue::new();
        queue.expect_post().never();

        let ports = NotifierPorts::new(
            Arc::new(interest),
            Arc::new(groups),
            Arc::new(build_causes),
            Arc::new(queue),
        );
        let notifier = StageStatusNotifier::from_config(
            ports,
            Arc::new(MaterialSerializerRegistry::new()),
            &NotifierConfig::default().with_enabled(false),
        )
        .unwrap();

        let outcome = notifier.stage_status_changed(&simple_stage()).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_from_config_uses_configured_kind() {
        let mut interest = MockPluginInterestRegistry::new();
        interest
            .expect_is_any_plugin_interested_in()
            .withf(|kind| kind.as_str() == "stage-status-v2")
            .return_const(false);
        let (groups, build_causes) = untouched_lookups();

        let ports = NotifierPorts::new(
            Arc::new(interest),
            Arc::new(groups),
            Arc::new(build_causes),
            Arc::new(MockNotificationQueue::new()),
        );
        let notifier = StageStatusNotifier::from_config(
            ports,
            Arc::new(MaterialSerializerRegistry::new()),
            &NotifierConfig::default().with_stage_status_kind("stage-status-v2"),
        )
        .unwrap();

        assert_eq!(notifier.notification_kind().as_str(), "stage-status-v2");
        notifier.stage_status_changed(&simple_stage()).await.unwrap();
    }

    #[test]
    fn test_from_config_rejects_bad_kind() {
        let (groups, build_causes) = untouched_lookups();
        let ports = NotifierPorts::new(
            Arc::new(MockPluginInterestRegistry::new()),
            Arc::new(groups),
            Arc::new(build_causes),
            Arc::new(MockNotificationQueue::new()),
        );
        let err = StageStatusNotifier::from_config(
            ports,
            Arc::new(MaterialSerializerRegistry::new()),
            &NotifierConfig::default().with_stage_status_kind("Stage Status"),
        )
        .unwrap_err();
        assert!(matches!(err, NotifyError::NotificationKind(_)));
    }

    #[tokio::test]
    async fn test_listener_swallows_failures() {
        let mut build_causes = MockBuildCauseResolver::new();
        build_causes
            .expect_find_build_cause_of_pipeline_by_name_and_counter()
            .returning(|_, _| Err(anyhow::anyhow!("db down")));
        let queue = Arc::new(CollectingNotificationQueue::new());

        let notifier = notifier(
            interested(),
            Arc::new(StaticGroupResolver::new(Some("g"))),
            Arc::new(build_causes),
            queue.clone(),
        );

        let listener: &dyn StageStatusListener = &notifier;
        listener.on_stage_status_changed(&simple_stage()).await;
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_spawn_runs_on_separate_task() {
        let queue = Arc::new(CollectingNotificationQueue::new());
        let notifier = Arc::new(notifier(
            interested(),
            Arc::new(StaticGroupResolver::new(Some("g"))),
            Arc::new(StaticBuildCauseResolver::new(BuildCause::default())),
            queue.clone(),
        ));

        let outcome = notifier.spawn(simple_stage()).await.unwrap();
        assert_eq!(outcome, Some(DispatchOutcome::Dispatched));
        assert_eq!(queue.len(), 1);
    }
}
