//! In-memory record of which plugins want which notifications.

use crate::notification::NotificationKind;
use crate::ports::PluginInterestRegistry;
use dashmap::DashMap;
use std::collections::BTreeSet;

/// Tracks the notification kinds each loaded plugin subscribed to.
///
/// Plugins register their interests when they load and are removed when they
/// unload. Lookups are lock-free for readers of other plugins.
#[derive(Debug, Default)]
pub struct NotificationPluginRegistry {
    interests: DashMap<String, BTreeSet<NotificationKind>>,
}

impl NotificationPluginRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the kinds `plugin_id` wants, replacing any earlier registration.
    pub fn register_plugin_interests(
        &self,
        plugin_id: impl Into<String>,
        kinds: impl IntoIterator<Item = NotificationKind>,
    ) {
        self.interests
            .insert(plugin_id.into(), kinds.into_iter().collect());
    }

    /// Forgets everything `plugin_id` registered.
    pub fn remove_plugin_interests(&self, plugin_id: &str) {
        self.interests.remove(plugin_id);
    }

    /// Lists plugins interested in `kind`, sorted by id.
    #[must_use]
    pub fn plugins_interested_in(&self, kind: &NotificationKind) -> Vec<String> {
        let mut plugins: Vec<String> = self
            .interests
            .iter()
            .filter(|entry| entry.value().contains(kind))
            .map(|entry| entry.key().clone())
            .collect();
        plugins.sort();
        plugins
    }

    /// Returns true if `plugin_id` is registered.
    #[must_use]
    pub fn is_registered(&self, plugin_id: &str) -> bool {
        self.interests.contains_key(plugin_id)
    }

    /// Removes every registration.
    pub fn clear(&self) {
        self.interests.clear();
    }
}

impl PluginInterestRegistry for NotificationPluginRegistry {
    fn is_any_plugin_interested_in(&self, kind: &NotificationKind) -> bool {
        self.interests.iter().any(|entry| entry.value().contains(kind))
    }
}
