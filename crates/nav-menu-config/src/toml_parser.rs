//! TOML configuration parser for menu.toml.

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::str::FromStr;

use nav_menu::{
    join_segments, split_path, Menu, Registration, RouteTable, Target, RESERVED_ATTRIBUTES,
};

use crate::ConfigError;

/// Parsed menu configuration.
#[derive(Debug, Clone)]
pub struct MenuConfig {
    routes: RouteTable,
    entries: Vec<EntryConfig>,
}

/// A single menu entry, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryConfig {
    /// Dotted path relative to the menu root, normalized (no leading `.`).
    pub path: String,
    pub text: String,
    pub target: Target,
    pub order: Option<i32>,
    /// Hide the entry for every request once applied.
    pub hidden: bool,
    /// Extra string attributes.
    pub attributes: BTreeMap<String, String>,
}

/// Raw TOML structure.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMenuConfig {
    /// Endpoint → URL rule
    #[serde(default)]
    routes: BTreeMap<String, String>,
    #[serde(default)]
    entries: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEntry {
    path: String,
    text: String,
    endpoint: Option<String>,
    external_url: Option<String>,
    order: Option<i32>,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    attributes: BTreeMap<String, String>,
}

impl MenuConfig {
    /// Parse from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: RawMenuConfig = toml::from_str(content)?;

        let mut routes = RouteTable::new();
        for (endpoint, rule) in &raw.routes {
            routes
                .add(endpoint.as_str(), rule)
                .map_err(|source| ConfigError::Route {
                    endpoint: endpoint.clone(),
                    source,
                })?;
        }

        let entries = Self::validate_entries(raw.entries)?;
        Ok(Self { routes, entries })
    }

    /// Route table built from the `[routes]` section.
    #[inline]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Get all entries, in file order.
    pub fn entries(&self) -> impl Iterator<Item = &EntryConfig> {
        self.entries.iter()
    }

    /// Get entry count.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register every entry on `menu`, in file order.
    pub fn apply(&self, menu: &Menu) -> Result<(), ConfigError> {
        for entry in &self.entries {
            let node = menu.submenu(&entry.path)?;
            node.register(entry.registration())?;
            if entry.hidden {
                node.hide();
            }
        }
        tracing::debug!("Applied {} menu entries from configuration", self.entries.len());
        Ok(())
    }

    fn validate_entries(raw: Vec<RawEntry>) -> Result<Vec<EntryConfig>, ConfigError> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut entries = Vec::with_capacity(raw.len());

        for entry in raw {
            let segments = split_path(&entry.path)
                .map_err(|e| ConfigError::Validation(e.to_string()))?;
            let path = join_segments(&segments);

            if !seen.insert(path.clone()) {
                return Err(ConfigError::Validation(format!(
                    "Duplicate menu entry '{}'",
                    entry.path
                )));
            }

            let target = match (entry.endpoint, entry.external_url) {
                (Some(_), Some(_)) => {
                    return Err(ConfigError::Validation(format!(
                        "Menu entry '{}' sets both endpoint and external_url",
                        entry.path
                    )));
                }
                (Some(endpoint), None) => Target::Endpoint(endpoint),
                (None, Some(url)) => Target::External(url),
                (None, None) => Target::None,
            };

            if let Some(name) = entry
                .attributes
                .keys()
                .find(|k| RESERVED_ATTRIBUTES.contains(&k.as_str()))
            {
                return Err(ConfigError::Validation(format!(
                    "Menu entry '{}': attribute '{}' is reserved",
                    entry.path, name
                )));
            }

            entries.push(EntryConfig {
                path,
                text: entry.text,
                target,
                order: entry.order,
                hidden: entry.hidden,
                attributes: entry.attributes,
            });
        }

        Ok(entries)
    }
}

impl FromStr for MenuConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl EntryConfig {
    /// Registration equivalent to this entry.
    pub fn registration(&self) -> Registration {
        let mut registration = match &self.target {
            Target::Endpoint(endpoint) => Registration::new(endpoint.as_str(), self.text.as_str()),
            Target::External(url) => Registration::external(self.text.as_str(), url.as_str()),
            Target::None => Registration::label(self.text.as_str()),
        };
        if let Some(order) = self.order {
            registration = registration.order(order);
        }
        for (key, value) in &self.attributes {
            registration = registration.attr(key.as_str(), value.as_str());
        }
        registration
    }
}
