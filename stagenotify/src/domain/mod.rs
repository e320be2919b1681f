//! Domain snapshots read by the notifier.
//!
//! These types are immutable views handed in by the pipeline engine or
//! returned by lookup collaborators. The notifier never mutates them.

mod material;
mod stage;
mod status;

pub use material::{
    BuildCause, CustomMaterial, DependencyMaterial, DependencyRevision, GitMaterial, Material,
    MaterialRevision, MercurialMaterial, Modification, ModificationData, P4Material,
    PackageMaterial, PluggableScmMaterial, PluginConfiguration, SvnMaterial, TfsMaterial,
};
pub use stage::{JobInstance, JobStateTransition, Stage, StageIdentifier};
pub use status::{ApprovalType, JobResult, JobState, StageResult, StageState};
