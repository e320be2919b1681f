//! Notification kind identifiers.
//!
//! Kinds are plain kebab-case strings that plugins subscribe to. The set the
//! host knows about is collected once at startup into [`NotificationKinds`]
//! and passed explicitly to the components that need it.

use crate::errors::NotificationKindError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

/// Identifier of the "stage status changed" notification.
pub const STAGE_STATUS_CHANGE_NOTIFICATION: &str = "stage-status";

fn kind_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$").expect("valid regex"))
}

/// A validated notification kind identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NotificationKind(String);

impl NotificationKind {
    /// Validates and wraps an identifier.
    pub fn new(name: impl Into<String>) -> Result<Self, NotificationKindError> {
        let name = name.into();
        if kind_pattern().is_match(&name) {
            Ok(Self(name))
        } else {
            Err(NotificationKindError::new(name))
        }
    }

    /// The stage status change kind.
    #[must_use]
    pub fn stage_status_change() -> Self {
        Self(STAGE_STATUS_CHANGE_NOTIFICATION.to_string())
    }

    /// Returns the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for NotificationKind {
    type Error = NotificationKindError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NotificationKind> for String {
    fn from(kind: NotificationKind) -> Self {
        kind.0
    }
}

impl AsRef<str> for NotificationKind {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The notification kinds known to this host.
///
/// Built once, then shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationKinds {
    stage_status_change: NotificationKind,
    all: BTreeSet<NotificationKind>,
}

impl Default for NotificationKinds {
    fn default() -> Self {
        Self::new(NotificationKind::stage_status_change())
    }
}

impl NotificationKinds {
    /// Creates a registry with the given stage status change kind.
    #[must_use]
    pub fn new(stage_status_change: NotificationKind) -> Self {
        let mut all = BTreeSet::new();
        all.insert(stage_status_change.clone());
        Self {
            stage_status_change,
            all,
        }
    }

    /// Registers an additional kind.
    #[must_use]
    pub fn with_kind(mut self, kind: NotificationKind) -> Self {
        self.all.insert(kind);
        self
    }

    /// Returns the kind used for stage status change notifications.
    #[must_use]
    pub fn stage_status_change(&self) -> &NotificationKind {
        &self.stage_status_change
    }

    /// Returns true if `name` is a known kind.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.all.iter().any(|k| k.as_str() == name)
    }

    /// Iterates over all known kinds in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &NotificationKind> {
        self.all.iter()
    }
}
