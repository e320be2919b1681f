//! End-to-end tests for stage status notifications.

#[cfg(test)]
mod tests {
    use crate::domain::{
        BuildCause, CustomMaterial, DependencyMaterial, DependencyRevision, GitMaterial, Material,
        MaterialRevision, Modification,
    };
    use crate::errors::{MaterialError, NotifyError};
    use crate::materials::{ConfigurationSection, MaterialDescriptor, MaterialSerializerRegistry};
    use crate::notification::{
        DispatchOutcome, NotificationKind, NotificationKinds, NotificationMessage,
        StageStatusNotifier,
    };
    use crate::plugins::NotificationPluginRegistry;
    use crate::ports::NotifierPorts;
    use crate::queue::CollectingNotificationQueue;
    use crate::testing::{
        fixed_date, pipeline_with_all_types_of_materials, simple_stage, stage_with_job,
        FixedInterest, StaticBuildCauseResolver, StaticGroupResolver,
    };
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::Arc;

    const FIXED: &str = "2011-07-13T19:43:37.100Z";

    struct Harness {
        notifier: StageStatusNotifier,
        queue: Arc<CollectingNotificationQueue>,
    }

    fn harness(build_cause: BuildCause, materials: MaterialSerializerRegistry) -> Harness {
        let queue = Arc::new(CollectingNotificationQueue::new());
        let ports = NotifierPorts::new(
            Arc::new(FixedInterest(true)),
            Arc::new(StaticGroupResolver::new(Some("pipeline-group"))),
            Arc::new(StaticBuildCauseResolver::new(build_cause)),
            queue.clone(),
        );
        Harness {
            notifier: StageStatusNotifier::new(
                ports,
                Arc::new(materials),
                Arc::new(NotificationKinds::default()),
            ),
            queue,
        }
    }

    fn single_message(queue: &CollectingNotificationQueue) -> NotificationMessage {
        let mut messages = queue.messages();
        assert_eq!(messages.len(), 1, "expected exactly one posted message");
        messages.remove(0)
    }

    fn assert_modification(revision: &Value, expected: &str) {
        assert_eq!(revision["changed"], json!(true));
        let modification = &revision["modifications"][0];
        assert_eq!(modification["revision"], json!(expected));
        assert_eq!(modification["modified-time"], json!(FIXED));
        assert!(!modification["data"].is_null());
    }

    #[tokio::test]
    async fn test_notifies_with_every_material_kind() {
        let (stage, build_cause) =
            pipeline_with_all_types_of_materials("pipeline-name", "stage-name", "job-name");
        let h = harness(build_cause, MaterialSerializerRegistry::new());

        let outcome = h.notifier.stage_status_changed(&stage).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::Dispatched);

        let message = single_message(&h.queue).to_json().unwrap();
        assert_eq!(message["requestName"], json!("stage-status"));

        let data = &message["requestData"];
        assert_eq!(data["pipeline-group"], json!("pipeline-group"));
        assert_eq!(data["pipeline-name"], json!("pipeline-name"));
        assert_eq!(data["pipeline-counter"], json!("1"));
        assert_eq!(data["stage-name"], json!("stage-name"));
        assert_eq!(data["stage-counter"], json!("1"));
        assert_eq!(data["stage-state"], json!("Passed"));
        assert_eq!(data["stage-result"], json!("Passed"));

        let pipeline = &data["pipeline"];
        assert_eq!(pipeline["name"], json!("pipeline-name"));
        assert_eq!(pipeline["counter"], json!("1"));
        assert_eq!(pipeline["group"], json!("pipeline-group"));

        let revisions = pipeline["build-cause"].as_array().unwrap();
        assert_eq!(revisions.len(), 8);

        let git = &revisions[0];
        assert_eq!(git["material"]["type"], json!("git"));
        assert_eq!(git["material"]["git-configuration"]["url"], json!("url"));
        assert_eq!(git["material"]["git-configuration"]["branch"], json!("branch"));
        assert_modification(git, "1");

        let hg = &revisions[1];
        assert_eq!(hg["material"]["type"], json!("mercurial"));
        assert_eq!(hg["material"]["mercurial-configuration"]["url"], json!("url"));
        assert_modification(hg, "1");

        let svn = &revisions[2];
        assert_eq!(svn["material"]["type"], json!("svn"));
        let svn_config = &svn["material"]["svn-configuration"];
        assert_eq!(svn_config["url"], json!("url"));
        assert_eq!(svn_config["username"], json!("username"));
        assert_eq!(svn_config["password"], json!("password"));
        assert_eq!(svn_config["check-externals"], json!(false));
        assert_modification(svn, "1");

        let tfs = &revisions[3];
        assert_eq!(tfs["material"]["type"], json!("tfs"));
        let tfs_config = &tfs["material"]["tfs-configuration"];
        assert_eq!(tfs_config["url"], json!("url"));
        assert_eq!(tfs_config["domain"], json!("domain"));
        assert_eq!(tfs_config["username"], json!("username"));
        assert_eq!(tfs_config["password"], json!("password"));
        assert_eq!(tfs_config["project-path"], json!("project-path"));
        assert_modification(tfs, "1");

        let p4 = &revisions[4];
        assert_eq!(p4["material"]["type"], json!("perforce"));
        let p4_config = &p4["material"]["perforce-configuration"];
        assert_eq!(p4_config["url"], json!("url"));
        assert_eq!(p4_config["username"], json!("username"));
        assert_eq!(p4_config["password"], json!("password"));
        assert_eq!(p4_config["view"], json!("view"));
        assert_eq!(p4_config["use-tickets"], json!(false));
        assert_modification(p4, "1");

        let dependency = &revisions[5];
        assert_eq!(dependency["material"]["type"], json!("pipeline"));
        let dependency_config = &dependency["material"]["pipeline-configuration"];
        assert_eq!(dependency_config["pipeline-name"], json!("pipeline-name"));
        assert_eq!(dependency_config["stage-name"], json!("stage-name"));
        assert_modification(dependency, "pipeline-name/1/stage-name/1");

        let package = &revisions[6];
        assert_eq!(package["material"]["type"], json!("package"));
        assert_eq!(package["material"]["plugin-id"], json!("pluginid"));
        assert_eq!(
            package["material"]["package-configuration"],
            json!({"k3": "package-v1"})
        );
        assert_eq!(
            package["material"]["repository-configuration"],
            json!({"k1": "repo-v1", "k2": "repo-v2"})
        );
        assert_modification(package, "1");

        let scm = &revisions[7];
        assert_eq!(scm["material"]["type"], json!("scm"));
        assert_eq!(scm["material"]["plugin-id"], json!("pluginid"));
        assert_eq!(scm["material"]["scm-configuration"], json!({"k1": "v1", "k2": "v2"}));
        assert_modification(scm, "1");

        let stage_map = &pipeline["stage"];
        assert_eq!(stage_map["name"], json!("stage-name"));
        assert_eq!(stage_map["counter"], json!("1"));
        assert_eq!(stage_map["approval-type"], json!("success"));
        assert_eq!(stage_map["state"], json!("Passed"));
        assert_eq!(stage_map["result"], json!("Passed"));
        assert_eq!(stage_map["create-time"], json!(FIXED));
        assert_eq!(stage_map["last-transition-time"], json!(FIXED));

        let job = &stage_map["jobs"][0];
        assert_eq!(job["name"], json!("job-name"));
        assert_eq!(job["schedule-time"], json!(FIXED));
        assert_eq!(job["complete-time"], json!(FIXED));
        assert_eq!(job["state"], json!("Completed"));
        assert_eq!(job["result"], json!("Passed"));
        assert_eq!(job["agent-uuid"], json!("uuid"));
    }

    #[tokio::test]
    async fn test_git_and_upstream_pipeline_build_cause() {
        let build_cause = BuildCause::default()
            .with_revision(MaterialRevision::new(
                Material::Git(GitMaterial::new("url", "branch")),
                true,
                vec![Modification::new("1", fixed_date())],
            ))
            .with_revision(MaterialRevision::new(
                Material::Dependency(DependencyMaterial::new("pipeline-name", "stage-name")),
                true,
                vec![Modification::dependency(
                    &DependencyRevision::new("pipeline-name", 1, "stage-name", 1),
                    fixed_date(),
                )],
            ));
        let h = harness(build_cause, MaterialSerializerRegistry::new());

        h.notifier
            .stage_status_changed(&stage_with_job("downstream", "stage-name", "job-name"))
            .await
            .unwrap();

        let message = single_message(&h.queue).to_json().unwrap();
        let revisions = message["requestData"]["pipeline"]["build-cause"].as_array().unwrap();
        assert_eq!(revisions.len(), 2);
        assert_eq!(revisions[0]["material"]["type"], json!("git"));
        assert_eq!(revisions[0]["modifications"][0]["revision"], json!("1"));
        assert_eq!(revisions[1]["material"]["type"], json!("pipeline"));
        assert_eq!(
            revisions[1]["modifications"][0]["revision"],
            json!("pipeline-name/1/stage-name/1")
        );
    }

    fn collect_strings_at(value: &Value, key: &str, out: &mut Vec<Value>) {
        match value {
            Value::Object(map) => {
                for (k, v) in map {
                    if k == key {
                        out.push(v.clone());
                    }
                    collect_strings_at(v, key, out);
                }
            }
            Value::Array(items) => items.iter().for_each(|v| collect_strings_at(v, key, out)),
            _ => {}
        }
    }

    #[tokio::test]
    async fn test_every_time_field_uses_the_shared_format() {
        let (stage, build_cause) =
            pipeline_with_all_types_of_materials("pipeline-name", "stage-name", "job-name");
        let h = harness(build_cause, MaterialSerializerRegistry::new());
        h.notifier.stage_status_changed(&stage).await.unwrap();
        let message = single_message(&h.queue).to_json().unwrap();

        let mut times = Vec::new();
        for key in [
            "create-time",
            "last-transition-time",
            "schedule-time",
            "complete-time",
            "modified-time",
        ] {
            collect_strings_at(&message, key, &mut times);
        }

        // 2 top-level + 2 stage + 2 job + 8 modifications.
        assert_eq!(times.len(), 14);
        assert!(times.iter().all(|t| *t == json!(FIXED)), "{times:?}");
    }

    #[tokio::test]
    async fn test_counters_are_strings() {
        let h = harness(BuildCause::default(), MaterialSerializerRegistry::new());
        h.notifier.stage_status_changed(&simple_stage()).await.unwrap();
        let data = single_message(&h.queue).to_json().unwrap()["requestData"].clone();

        for counter in [
            &data["pipeline-counter"],
            &data["stage-counter"],
            &data["pipeline"]["counter"],
            &data["pipeline"]["stage"]["counter"],
        ] {
            assert_eq!(*counter, json!("1"));
        }
    }

    #[tokio::test]
    async fn test_modifications_keep_supplied_order() {
        let modifications: Vec<_> = ["e5", "a1", "c3", "b2", "d4"]
            .iter()
            .map(|r| Modification::new(*r, fixed_date()))
            .collect();
        let build_cause = BuildCause::new(vec![MaterialRevision::new(
            Material::Git(GitMaterial::new("url", "main")),
            false,
            modifications.clone(),
        )]);
        let h = harness(build_cause, MaterialSerializerRegistry::new());
        h.notifier.stage_status_changed(&simple_stage()).await.unwrap();

        let message = single_message(&h.queue).to_json().unwrap();
        let entry = &message["requestData"]["pipeline"]["build-cause"][0];
        assert_eq!(entry["changed"], json!(false));

        let posted: Vec<_> = entry["modifications"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["revision"].as_str().unwrap().to_string())
            .collect();
        let supplied: Vec<_> = modifications.iter().map(|m| m.revision.clone()).collect();
        assert_eq!(posted, supplied);
    }

    #[tokio::test]
    async fn test_repeated_dispatch_is_identical() {
        let (stage, build_cause) =
            pipeline_with_all_types_of_materials("pipeline-name", "stage-name", "job-name");
        let h = harness(build_cause, MaterialSerializerRegistry::new());

        h.notifier.stage_status_changed(&stage).await.unwrap();
        h.notifier.stage_status_changed(&stage).await.unwrap();

        let messages = h.queue.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], messages[1]);
        assert_eq!(
            serde_json::to_string(&messages[0]).unwrap(),
            serde_json::to_string(&messages[1]).unwrap()
        );
    }

    #[tokio::test]
    async fn test_unknown_material_kind_posts_nothing() {
        let build_cause = BuildCause::new(vec![
            MaterialRevision::new(Material::Git(GitMaterial::new("url", "main")), true, vec![]),
            MaterialRevision::new(Material::Custom(CustomMaterial::new("clearcase")), true, vec![]),
        ]);
        let h = harness(build_cause, MaterialSerializerRegistry::new());

        let err = h.notifier.stage_status_changed(&simple_stage()).await.unwrap_err();
        assert!(matches!(
            err,
            NotifyError::Material(MaterialError::UnknownKind { ref kind }) if kind == "clearcase"
        ));
        assert!(h.queue.is_empty());
    }

    #[tokio::test]
    async fn test_registered_custom_material_is_serialized() {
        let materials = MaterialSerializerRegistry::new().with_serializer(
            "clearcase",
            |material: &CustomMaterial| -> Result<MaterialDescriptor, MaterialError> {
                let vob = material
                    .attributes
                    .get("vob")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                Ok(MaterialDescriptor::new("clearcase")
                    .with_configuration(ConfigurationSection::new().text("vob", vob)))
            },
        );
        let build_cause = BuildCause::new(vec![MaterialRevision::new(
            Material::Custom(CustomMaterial::new("clearcase").with_attribute("vob", json!("/vobs/core"))),
            true,
            vec![Modification::new("main/42", fixed_date())],
        )]);
        let h = harness(build_cause, materials);

        h.notifier.stage_status_changed(&simple_stage()).await.unwrap();

        let message = single_message(&h.queue).to_json().unwrap();
        let entry = &message["requestData"]["pipeline"]["build-cause"][0];
        assert_eq!(
            entry["material"],
            json!({"type": "clearcase", "clearcase-configuration": {"vob": "/vobs/core"}})
        );
        assert_eq!(entry["modifications"][0]["revision"], json!("main/42"));
    }

    #[tokio::test]
    async fn test_plugin_registry_drives_interest() {
        let registry = Arc::new(NotificationPluginRegistry::new());
        let queue = Arc::new(CollectingNotificationQueue::new());
        let notifier = StageStatusNotifier::new(
            NotifierPorts::new(
                registry.clone(),
                Arc::new(StaticGroupResolver::new(Some("g"))),
                Arc::new(StaticBuildCauseResolver::default()),
                queue.clone(),
            ),
            Arc::new(MaterialSerializerRegistry::new()),
            Arc::new(NotificationKinds::default()),
        );

        let outcome = notifier.stage_status_changed(&simple_stage()).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::Skipped);

        registry.register_plugin_interests("slack", [NotificationKind::stage_status_change()]);
        let outcome = notifier.stage_status_changed(&simple_stage()).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::Dispatched);

        registry.remove_plugin_interests("slack");
        let outcome = notifier.stage_status_changed(&simple_stage()).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::Skipped);

        assert_eq!(queue.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_dispatch_for_unrelated_stages() {
        let h = harness(BuildCause::default(), MaterialSerializerRegistry::new());
        let notifier = Arc::new(h.notifier);

        let stages: Vec<_> = (0..16)
            .map(|i| stage_with_job(&format!("pipeline-{i}"), "stage", "job"))
            .collect();
        let outcomes = futures::future::join_all(
            stages.into_iter().map(|stage| notifier.spawn(stage)),
        )
        .await;

        assert!(outcomes
            .into_iter()
            .all(|o| matches!(o, Ok(Some(DispatchOutcome::Dispatched)))));

        let mut names: Vec<_> = h
            .queue
            .messages()
            .iter()
            .map(|m| m.request_data.as_stage_status().unwrap().pipeline_name.clone())
            .collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 16);
    }
}
