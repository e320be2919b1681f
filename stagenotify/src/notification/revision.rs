//! Build-cause entries: a material descriptor with its modifications.

use crate::domain::{MaterialRevision, Modification, ModificationData};
use crate::errors::MaterialError;
use crate::materials::{MaterialDescriptor, MaterialSerializerRegistry};
use crate::utils::format_notification_time;
use serde::Serialize;

/// One modification as sent to plugins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModificationEntry {
    /// Material specific revision identifier.
    pub revision: String,
    /// Formatted modification time.
    pub modified_time: String,
    /// Opaque data, passed through unchanged.
    pub data: ModificationData,
}

impl From<&Modification> for ModificationEntry {
    fn from(modification: &Modification) -> Self {
        Self {
            revision: modification.revision.clone(),
            modified_time: format_notification_time(&modification.modified_time),
            data: modification.data.clone(),
        }
    }
}

/// One element of the `build-cause` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevisionEntry {
    /// The material description.
    pub material: MaterialDescriptor,
    /// Whether the material changed since the previous run.
    pub changed: bool,
    /// Modifications in the order supplied.
    pub modifications: Vec<ModificationEntry>,
}

/// Wraps a descriptor with its change flag and modifications.
///
/// `changed` is taken as given and modifications keep their order.
#[must_use]
pub fn assemble(
    material: MaterialDescriptor,
    modifications: &[Modification],
    changed: bool,
) -> RevisionEntry {
    RevisionEntry {
        material,
        changed,
        modifications: modifications.iter().map(ModificationEntry::from).collect(),
    }
}

/// Describes a material revision using `registry`.
pub fn assemble_revision(
    registry: &MaterialSerializerRegistry,
    revision: &MaterialRevision,
) -> Result<RevisionEntry, MaterialError> {
    let descriptor = registry.describe(&revision.material)?;
    Ok(assemble(descriptor, &revision.modifications, revision.changed))
}

/// Describes every revision of a build-cause, keeping declaration order.
///
/// Fails on the first material that cannot be described.
pub fn assemble_build_cause(
    registry: &MaterialSerializerRegistry,
    revisions: &[MaterialRevision],
) -> Result<Vec<RevisionEntry>, MaterialError> {
    revisions
        .iter()
        .map(|revision| assemble_revision(registry, revision))
        .collect()
}
