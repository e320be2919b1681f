//! Testing utilities for stage notifications.
//!
//! This module provides:
//! - Fixture stages and build-causes covering every material kind
//! - Canned collaborators for wiring a notifier without a server

mod collaborators;
mod fixtures;

pub use collaborators::{FixedInterest, StaticBuildCauseResolver, StaticGroupResolver};
pub use fixtures::{
    all_material_revisions, fixed_date, pipeline_with_all_types_of_materials, simple_stage,
    stage_with_job,
};
