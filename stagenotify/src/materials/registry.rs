//! Serializer lookup for all material kinds.

use super::descriptor::MaterialDescriptor;
use super::serializers;
use crate::domain::{CustomMaterial, Material};
use crate::errors::MaterialError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Describes materials of a kind registered at runtime.
pub trait MaterialSerializer: Send + Sync {
    /// Produces the descriptor for `material`.
    fn describe(&self, material: &CustomMaterial) -> Result<MaterialDescriptor, MaterialError>;
}

impl<F> MaterialSerializer for F
where
    F: Fn(&CustomMaterial) -> Result<MaterialDescriptor, MaterialError> + Send + Sync,
{
    fn describe(&self, material: &CustomMaterial) -> Result<MaterialDescriptor, MaterialError> {
        self(material)
    }
}

/// Maps materials to their descriptors.
///
/// Built-in kinds are handled directly. Custom kinds need a serializer
/// registered under their kind identifier; an unregistered kind is an error.
/// The registry is assembled at startup and read-only afterwards.
#[derive(Clone, Default)]
pub struct MaterialSerializerRegistry {
    custom: HashMap<String, Arc<dyn MaterialSerializer>>,
}

impl MaterialSerializerRegistry {
    /// Creates a registry that only knows the built-in kinds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a serializer for a custom kind.
    #[must_use]
    pub fn with_serializer(
        mut self,
        kind: impl Into<String>,
        serializer: impl MaterialSerializer + 'static,
    ) -> Self {
        self.custom.insert(kind.into(), Arc::new(serializer));
        self
    }

    /// Returns true if a custom serializer is registered for `kind`.
    #[must_use]
    pub fn is_registered(&self, kind: &str) -> bool {
        self.custom.contains_key(kind)
    }

    /// Lists the registered custom kinds.
    #[must_use]
    pub fn custom_kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.custom.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Describes a material.
    pub fn describe(&self, material: &Material) -> Result<MaterialDescriptor, MaterialError> {
        match material {
            Material::Git(m) => Ok(serializers::describe_git(m)),
            Material::Mercurial(m) => Ok(serializers::describe_mercurial(m)),
            Material::Svn(m) => Ok(serializers::describe_svn(m)),
            Material::Tfs(m) => Ok(serializers::describe_tfs(m)),
            Material::Perforce(m) => Ok(serializers::describe_perforce(m)),
            Material::Dependency(m) => Ok(serializers::describe_dependency(m)),
            Material::Package(m) => Ok(serializers::describe_package(m)),
            Material::PluggableScm(m) => Ok(serializers::describe_pluggable_scm(m)),
            Material::Custom(m) => self
                .custom
                .get(&m.kind)
                .ok_or_else(|| MaterialError::unknown_kind(&m.kind))?
                .describe(m),
        }
    }
}

impl fmt::Debug for MaterialSerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterialSerializerRegistry")
            .field("custom_kinds", &self.custom_kinds())
            .finish()
    }
}
