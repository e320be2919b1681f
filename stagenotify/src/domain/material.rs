//! Materials, their revisions, and the build-cause that groups them.

use crate::utils::Timestamp;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use std::collections::BTreeMap;
use std::fmt;

/// Key/value configuration owned by a plugin-backed material.
pub type PluginConfiguration = BTreeMap<String, String>;

/// A git repository material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GitMaterial {
    /// Repository URL.
    pub url: String,
    /// Tracked branch.
    pub branch: String,
}

impl GitMaterial {
    /// Creates a git material.
    #[must_use]
    pub fn new(url: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            branch: branch.into(),
        }
    }
}

/// A mercurial repository material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MercurialMaterial {
    /// Repository URL.
    pub url: String,
}

impl MercurialMaterial {
    /// Creates a mercurial material.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// A subversion repository material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SvnMaterial {
    /// Repository URL.
    pub url: String,
    /// Login name.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Whether externals are checked out too.
    pub check_externals: bool,
}

impl SvnMaterial {
    /// Creates a subversion material.
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        check_externals: bool,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
            check_externals,
        }
    }
}

/// A Team Foundation Server material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TfsMaterial {
    /// Collection URL.
    pub url: String,
    /// Windows domain.
    pub domain: String,
    /// Login name.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Project path within the collection.
    pub project_path: String,
}

/// A perforce depot material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct P4Material {
    /// `host:port` of the perforce server.
    pub server_and_port: String,
    /// Login name.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Client view specification.
    pub view: String,
    /// Whether ticket based authentication is used.
    pub use_tickets: bool,
}

/// An upstream pipeline stage used as a material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DependencyMaterial {
    /// Upstream pipeline name.
    pub pipeline_name: String,
    /// Upstream stage name.
    pub stage_name: String,
}

impl DependencyMaterial {
    /// Creates a dependency material.
    #[must_use]
    pub fn new(pipeline_name: impl Into<String>, stage_name: impl Into<String>) -> Self {
        Self {
            pipeline_name: pipeline_name.into(),
            stage_name: stage_name.into(),
        }
    }
}

/// A package repository material served by a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PackageMaterial {
    /// The plugin serving the repository.
    pub plugin_id: String,
    /// Repository-level configuration.
    #[serde(default)]
    pub repository_configuration: PluginConfiguration,
    /// Package-level configuration.
    #[serde(default)]
    pub package_configuration: PluginConfiguration,
}

/// A source control material implemented by a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PluggableScmMaterial {
    /// The plugin implementing the SCM.
    pub plugin_id: String,
    /// Configuration of the shared SCM definition.
    #[serde(default)]
    pub scm_configuration: PluginConfiguration,
    /// Configuration of this material instance in the pipeline.
    #[serde(default)]
    pub material_configuration: PluginConfiguration,
}

/// A material of a kind registered at runtime.
///
/// Only a serializer registered for [`CustomMaterial::kind`] knows how to
/// describe it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CustomMaterial {
    /// Kind identifier used to look up the serializer.
    pub kind: String,
    /// Free-form attributes interpreted by the serializer.
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl CustomMaterial {
    /// Creates a custom material with no attributes.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: serde_json::Map::new(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// A configured input of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "attributes", rename_all = "snake_case")]
pub enum Material {
    /// Git repository.
    Git(GitMaterial),
    /// Mercurial repository.
    Mercurial(MercurialMaterial),
    /// Subversion repository.
    Svn(SvnMaterial),
    /// Team Foundation Server.
    Tfs(TfsMaterial),
    /// Perforce depot.
    Perforce(P4Material),
    /// Upstream pipeline stage.
    Dependency(DependencyMaterial),
    /// Package repository plugin.
    Package(PackageMaterial),
    /// SCM plugin.
    PluggableScm(PluggableScmMaterial),
    /// Kind registered at runtime.
    Custom(CustomMaterial),
}

impl Material {
    /// Returns the kind identifier, as written to the `type` field.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Git(_) => "git",
            Self::Mercurial(_) => "mercurial",
            Self::Svn(_) => "svn",
            Self::Tfs(_) => "tfs",
            Self::Perforce(_) => "perforce",
            Self::Dependency(_) => "pipeline",
            Self::Package(_) => "package",
            Self::PluggableScm(_) => "scm",
            Self::Custom(custom) => &custom.kind,
        }
    }
}

/// A single change observed on a material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modification {
    /// Material specific revision identifier.
    pub revision: String,
    /// When the change was made.
    pub modified_time: Timestamp,
    /// Opaque, material specific metadata.
    #[serde(default)]
    pub data: ModificationData,
}

/// Opaque modification metadata, kept as the exact JSON text it arrived as.
///
/// Key order and number precision survive serialization unchanged. An empty
/// payload renders as `{}`.
#[derive(Debug, Clone, Default)]
pub struct ModificationData(Option<Box<RawValue>>);

impl ModificationData {
    /// Wraps JSON text, validating it.
    pub fn from_json(json: impl Into<String>) -> serde_json::Result<Self> {
        RawValue::from_string(json.into()).map(|raw| Self(Some(raw)))
    }

    /// Renders a JSON value.
    pub fn from_value(value: &serde_json::Value) -> serde_json::Result<Self> {
        serde_json::value::to_raw_value(value).map(|raw| Self(Some(raw)))
    }

    /// The JSON text of the payload.
    #[must_use]
    pub fn as_json(&self) -> &str {
        self.0.as_deref().map_or("{}", RawValue::get)
    }
}

impl PartialEq for ModificationData {
    fn eq(&self, other: &Self) -> bool {
        self.as_json() == other.as_json()
    }
}

impl Eq for ModificationData {}

impl Serialize for ModificationData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Some(raw) => raw.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

impl<'de> Deserialize<'de> for ModificationData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Box::<RawValue>::deserialize(deserializer).map(|raw| Self(Some(raw)))
    }
}

impl Modification {
    /// Creates a modification with no additional data.
    #[must_use]
    pub fn new(revision: impl Into<String>, modified_time: Timestamp) -> Self {
        Self {
            revision: revision.into(),
            modified_time,
            data: ModificationData::default(),
        }
    }

    /// Creates a modification of a dependency material.
    #[must_use]
    pub fn dependency(revision: &DependencyRevision, modified_time: Timestamp) -> Self {
        Self::new(revision.to_string(), modified_time)
    }

    /// Attaches opaque data.
    #[must_use]
    pub fn with_data(mut self, data: ModificationData) -> Self {
        self.data = data;
        self
    }
}

/// Revision of an upstream stage run, rendered as
/// `<pipeline>/<counter>/<stage>/<stageCounter>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyRevision {
    /// Upstream pipeline name.
    pub pipeline_name: String,
    /// Upstream pipeline counter.
    pub pipeline_counter: u64,
    /// Upstream stage name.
    pub stage_name: String,
    /// Upstream stage counter.
    pub stage_counter: u64,
}

impl DependencyRevision {
    /// Creates a dependency revision.
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

impl fmt::Display for DependencyRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.pipeline_name, self.pipeline_counter, self.stage_name, self.stage_counter
        )
    }
}

/// A material together with the modifications a build picked up from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialRevision {
    /// The material.
    pub material: Material,
    /// Whether the material changed since the previous run.
    pub changed: bool,
    /// Modifications, most recent first.
    #[serde(default)]
    pub modifications: Vec<Modification>,
}

impl MaterialRevision {
    /// Creates a material revision.
    #[must_use]
    pub fn new(material: Material, changed: bool, modifications: Vec<Modification>) -> Self {
        Self {
            material,
            changed,
            modifications,
        }
    }
}

/// The material revisions that triggered a pipeline run, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BuildCause {
    /// Material revisions in the order the pipeline declares its materials.
    #[serde(default)]
    pub material_revisions: Vec<MaterialRevision>,
}

impl BuildCause {
    /// Creates a build-cause from revisions.
    #[must_use]
    pub fn new(material_revisions: Vec<MaterialRevision>) -> Self {
        Self { material_revisions }
    }

    /// Appends a revision.
    #[must_use]
    pub fn with_revision(mut self, revision: MaterialRevision) -> Self {
        self.material_revisions.push(revision);
        self
    }
}
