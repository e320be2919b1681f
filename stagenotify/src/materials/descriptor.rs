//! Wire representation of a material.

use crate::domain::PluginConfiguration;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// A configuration value. Only a few flags are booleans; everything else,
/// counters included, travels as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// A string value.
    Text(String),
    /// A boolean flag.
    Flag(bool),
}

impl ConfigValue {
    /// Returns the string value, if this is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Flag(_) => None,
        }
    }
}

/// One named configuration map of a material.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ConfigurationSection(BTreeMap<String, ConfigValue>);

impl ConfigurationSection {
    /// Creates an empty section.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a string entry. Blank values are kept as `""`.
    #[must_use]
    pub fn text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), ConfigValue::Text(value.into()));
        self
    }

    /// Adds a boolean entry.
    #[must_use]
    pub fn flag(mut self, key: impl Into<String>, value: bool) -> Self {
        self.0.insert(key.into(), ConfigValue::Flag(value));
        self
    }

    /// Copies a plugin's key/value configuration.
    #[must_use]
    pub fn from_plugin(configuration: &PluginConfiguration) -> Self {
        Self(
            configuration
                .iter()
                .map(|(k, v)| (k.clone(), ConfigValue::Text(v.clone())))
                .collect(),
        )
    }

    /// Looks up an entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the section has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Normalized description of a material: its `type`, an optional
/// `plugin-id`, and one or more named configuration sections.
///
/// Serializes as a flat map, e.g.
/// `{"type": "git", "git-configuration": {"url": "...", "branch": "..."}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialDescriptor {
    kind: String,
    plugin_id: Option<String>,
    sections: Vec<(String, ConfigurationSection)>,
}

impl MaterialDescriptor {
    /// Creates a descriptor with no sections.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            plugin_id: None,
            sections: Vec::new(),
        }
    }

    /// Sets the plugin that backs this material.
    #[must_use]
    pub fn with_plugin_id(mut self, plugin_id: impl Into<String>) -> Self {
        self.plugin_id = Some(plugin_id.into());
        self
    }

    /// Adds the `<type>-configuration` section.
    #[must_use]
    pub fn with_configuration(self, section: ConfigurationSection) -> Self {
        let key = format!("{}-configuration", self.kind);
        self.with_section(key, section)
    }

    /// Adds a named section, replacing any section with the same name.
    #[must_use]
    pub fn with_section(mut self, name: impl Into<String>, section: ConfigurationSection) -> Self {
        let name = name.into();
        self.sections.retain(|(existing, _)| *existing != name);
        self.sections.push((name, section));
        self
    }

    /// The material kind.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The backing plugin, for plugin materials.
    #[must_use]
    pub fn plugin_id(&self) -> Option<&str> {
        self.plugin_id.as_deref()
    }

    /// Looks up a section by its wire name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&ConfigurationSection> {
        self.sections
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, section)| section)
    }
}

impl Serialize for MaterialDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 1 + usize::from(self.plugin_id.is_some()) + self.sections.len();
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("type", &self.kind)?;
        if let Some(plugin_id) = &self.plugin_id {
            map.serialize_entry("plugin-id", plugin_id)?;
        }
        for (name, section) in &self.sections {
            map.serialize_entry(name, section)?;
        }
        map.end()
    }
}
