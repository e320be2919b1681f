//! # Stagenotify
//!
//! Stage status change notifications for pipeline plugins.
//!
//! When a stage changes status, the notifier asks whether any plugin wants
//! stage status notifications. If one does, it snapshots the pipeline run
//! (stage, jobs, and the build-cause with every material revision) into a
//! message and posts it to an outbound queue.
//!
//! - **Materials**: each material kind normalizes into a stable
//!   `{type, <type>-configuration}` map; runtime kinds plug in through a
//!   registry
//! - **Snapshots**: typed message sections with kebab-case keys, string
//!   counters and millisecond UTC timestamps
//! - **Dispatch**: interest check first, no work when nobody listens
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stagenotify::prelude::*;
//!
//! let notifier = StageStatusNotifier::new(
//!     NotifierPorts::new(interest, groups, build_causes, queue),
//!     Arc::new(MaterialSerializerRegistry::new()),
//!     Arc::new(NotificationKinds::default()),
//! );
//!
//! // Called by the pipeline engine after a stage transition.
//! notifier.stage_status_changed(&stage).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod domain;
pub mod errors;
pub mod materials;
pub mod notification;
pub mod observability;
pub mod plugins;
pub mod ports;
pub mod queue;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{LoggingConfig, NotifierConfig};
    pub use crate::domain::{
        BuildCause, JobInstance, Material, MaterialRevision, Modification, ModificationData,
        Stage, StageIdentifier,
    };
    pub use crate::errors::{MaterialError, NotifyError};
    pub use crate::materials::{MaterialDescriptor, MaterialSerializer, MaterialSerializerRegistry};
    pub use crate::notification::{
        DispatchOutcome, NotificationKind, NotificationKinds, NotificationMessage,
        StageStatusListener, StageStatusNotifier,
    };
    pub use crate::plugins::NotificationPluginRegistry;
    pub use crate::ports::{
        BuildCauseResolver, NotificationQueue, NotifierPorts, PipelineGroupResolver,
        PluginInterestRegistry,
    };
    pub use crate::queue::{CollectingNotificationQueue, LoggingNotificationQueue};
    pub use crate::utils::{format_notification_time, Timestamp};
}
