//! Test fixtures for stage notifications.

use chrono::{Duration, TimeZone, Utc};

use crate::domain::{
    BuildCause, DependencyMaterial, DependencyRevision, GitMaterial, JobInstance, JobResult,
    Material, MaterialRevision, MercurialMaterial, Modification, ModificationData, P4Material,
    PackageMaterial, PluggableScmMaterial, PluginConfiguration, Stage, StageIdentifier,
    StageResult, StageState, SvnMaterial, TfsMaterial,
};
use crate::utils::Timestamp;

/// `2011-07-13T19:43:37.100Z`, the instant every fixture uses.
#[must_use]
pub fn fixed_date() -> Timestamp {
    Utc.with_ymd_and_hms(2011, 7, 13, 19, 43, 37)
        .single()
        .map(|dt| dt + Duration::milliseconds(100))
        .unwrap_or_default()
}

/// A passed stage with one completed job, all times at [`fixed_date`].
///
/// Pipeline `pipeline-name` run 1, stage `stage-name` run 1, job `job-name`
/// on agent `uuid`.
#[must_use]
pub fn simple_stage() -> Stage {
    stage_with_job("pipeline-name", "stage-name", "job-name")
}

/// Like [`simple_stage`] with custom names.
#[must_use]
pub fn stage_with_job(pipeline_name: &str, stage_name: &str, job_name: &str) -> Stage {
    Stage::new(StageIdentifier::new(pipeline_name, 1, stage_name, 1), fixed_date())
        .with_status(StageState::Passed, StageResult::Passed, fixed_date())
        .with_job(
            JobInstance::new(job_name, fixed_date())
                .with_agent("uuid")
                .completed(JobResult::Passed, fixed_date()),
        )
}

fn plugin_config(pairs: &[(&str, &str)]) -> PluginConfiguration {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn changed(material: Material, revision: impl Into<String>) -> MaterialRevision {
    let modification = Modification::new(revision, fixed_date())
        .with_data(
            ModificationData::from_json(r#"{"comment":"fixture change","user":"dev"}"#)
                .unwrap_or_default(),
        );
    MaterialRevision::new(material, true, vec![modification])
}

/// Material revisions of every built-in kind, in this order: git, mercurial,
/// svn, tfs, perforce, pipeline, package, scm.
///
/// The pipeline material points at `upstream_pipeline`/`upstream_stage` run
/// 1/1; all other modifications have revision `"1"`.
#[must_use]
pub fn all_material_revisions(upstream_pipeline: &str, upstream_stage: &str) -> Vec<MaterialRevision> {
    vec![
        changed(Material::Git(GitMaterial::new("url", "branch")), "1"),
        changed(Material::Mercurial(MercurialMaterial::new("url")), "1"),
        changed(
            Material::Svn(SvnMaterial::new("url", "username", "password", false)),
            "1",
        ),
        changed(
            Material::Tfs(TfsMaterial {
                url: "url".into(),
                domain: "domain".into(),
                username: "username".into(),
                password: "password".into(),
                project_path: "project-path".into(),
            }),
            "1",
        ),
        changed(
            Material::Perforce(P4Material {
                server_and_port: "url".into(),
                username: "username".into(),
                password: "password".into(),
                view: "view".into(),
                use_tickets: false,
            }),
            "1",
        ),
        changed(
            Material::Dependency(DependencyMaterial::new(upstream_pipeline, upstream_stage)),
            DependencyRevision::new(upstream_pipeline, 1, upstream_stage, 1).to_string(),
        ),
        changed(
            Material::Package(PackageMaterial {
                plugin_id: "pluginid".into(),
                repository_configuration: plugin_config(&[("k1", "repo-v1"), ("k2", "repo-v2")]),
                package_configuration: plugin_config(&[("k3", "package-v1")]),
            }),
            "1",
        ),
        changed(
            Material::PluggableScm(PluggableScmMaterial {
                plugin_id: "pluginid".into(),
                scm_configuration: plugin_config(&[("k1", "v1"), ("k2", "v2")]),
                material_configuration: PluginConfiguration::new(),
            }),
            "1",
        ),
    ]
}

/// A stage of `pipeline_name` together with a build-cause holding every
/// built-in material kind.
#[must_use]
pub fn pipeline_with_all_types_of_materials(
    pipeline_name: &str,
    stage_name: &str,
    job_name: &str,
) -> (Stage, BuildCause) {
    (
        stage_with_job(pipeline_name, stage_name, job_name),
        BuildCause::new(all_material_revisions(pipeline_name, stage_name)),
    )
}
