//! Resource catalog: the configured path table.
//!
//! Maps structural path prefixes (`/users`, `/roles`, ...) to a
//! [`ResourceType`], and lists the actions each resource type supports.
//! The catalog is an explicit value handed to whoever resolves paths; there
//! is no process-wide table.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Action, ResourceType};

/// Error returned by [`ResourceCatalog::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// An entry has an empty (or root-only) path.
    #[error("catalog entry for `{resource_type}` has an empty path")]
    EmptyPath { resource_type: ResourceType },

    /// Two entries normalize to the same path.
    #[error("catalog path `{path}` is declared more than once")]
    DuplicatePath { path: String },
}

/// One row of the path table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Path prefix, e.g. `/users`.
    pub path: String,

    /// Resource type the prefix resolves to.
    pub resource_type: ResourceType,

    /// Every action this resource type supports.
    ///
    /// Only consulted when `manage` expansion is enabled.
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl CatalogEntry {
    pub fn new<I, A>(path: impl Into<String>, resource_type: ResourceType, actions: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Action>,
    {
        Self {
            path: path.into(),
            resource_type,
            actions: actions.into_iter().map(Into::into).collect(),
        }
    }
}

/// The path table plus build-time expansion settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceCatalog {
    /// Expand a `manage` grant into every action of its resource type.
    ///
    /// The explicit `manage` rule is kept either way.
    pub expand_manage: bool,

    /// Path table entries.
    pub resources: Vec<CatalogEntry>,
}

impl Default for ResourceCatalog {
    /// The admin system's standard menu prefixes.
    fn default() -> Self {
        const CRUD: [&str; 5] = ["read", "create", "update", "delete", "manage"];

        Self {
            expand_manage: false,
            resources: vec![
                CatalogEntry::new("/users", ResourceType::User, CRUD),
                CatalogEntry::new("/roles", ResourceType::Role, CRUD),
                CatalogEntry::new("/menus", ResourceType::Menu, CRUD),
                CatalogEntry::new("/logs", ResourceType::Log, ["read", "delete", "manage"]),
                CatalogEntry::new("/auth", ResourceType::Auth, ["read", "manage"]),
            ],
        }
    }
}

impl ResourceCatalog {
    /// Creates an empty catalog. Every path lookup against it fails.
    pub fn empty() -> Self {
        Self {
            expand_manage: false,
            resources: Vec::new(),
        }
    }

    /// Adds an entry.
    pub fn with_entry(mut self, entry: CatalogEntry) -> Self {
        self.resources.push(entry);
        self
    }

    /// Enables or disables `manage` expansion.
    pub fn with_expand_manage(mut self, expand: bool) -> Self {
        self.expand_manage = expand;
        self
    }

    /// Returns the supported actions of a resource type.
    ///
    /// Several paths may map to one type; their action lists are merged.
    pub fn actions_for(&self, resource_type: ResourceType) -> BTreeSet<&Action> {
        self.resources
            .iter()
            .filter(|e| e.resource_type == resource_type)
            .flat_map(|e| e.actions.iter())
            .collect()
    }

    /// Checks the table for empty and duplicate paths.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen: HashMap<String, ResourceType> = HashMap::new();

        for entry in &self.resources {
            let path = normalize_path(&entry.path);
            if path == "/" {
                return Err(CatalogError::EmptyPath {
                    resource_type: entry.resource_type,
                });
            }
            if seen.insert(path.clone(), entry.resource_type).is_some() {
                return Err(CatalogError::DuplicatePath { path });
            }
        }

        Ok(())
    }
}

/// Normalizes a structural path for lookup.
///
/// Trims whitespace, drops any query string or fragment, ensures a leading
/// `/` and strips trailing `/`. An empty input becomes `/`.
///
/// ```
/// use portcullis_types::normalize_path;
///
/// assert_eq!(normalize_path("users/"), "/users");
/// assert_eq!(normalize_path(" /logs?page=2 "), "/logs");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> String {
    let path = path.trim();
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_matches('/');

    let mut normalized = String::with_capacity(trimmed.len() + 1);
    normalized.push('/');
    normalized.push_str(trimmed);
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("/users", "/users" ; "already normalized")]
    #[test_case("users", "/users" ; "leading slash added")]
    #[test_case("/users/", "/users" ; "trailing slash stripped")]
    #[test_case("//users//", "/users" ; "repeated slashes stripped")]
    #[test_case("/users/profile", "/users/profile" ; "nested kept")]
    #[test_case("/users?id=1", "/users" ; "query dropped")]
    #[test_case("/users#top", "/users" ; "fragment dropped")]
    #[test_case("  /roles  ", "/roles" ; "whitespace trimmed")]
    #[test_case("", "/" ; "empty is root")]
    #[test_case("/", "/" ; "root stays root")]
    fn normalizes_paths(input: &str, expected: &str) {
        assert_eq!(normalize_path(input), expected);
    }

    #[test]
    fn default_catalog_is_valid() {
        let catalog = ResourceCatalog::default();
        assert!(catalog.validate().is_ok());
        assert!(!catalog.expand_manage);
        assert_eq!(catalog.resources.len(), 5);
    }

    #[test]
    fn default_catalog_covers_every_type() {
        let catalog = ResourceCatalog::default();
        for ty in ResourceType::ALL {
            assert!(
                catalog.resources.iter().any(|e| e.resource_type == ty),
                "no default path for {ty}"
            );
        }
    }

    #[test]
    fn validate_rejects_duplicate_normalized_paths() {
        let catalog = ResourceCatalog::empty()
            .with_entry(CatalogEntry::new("/users", ResourceType::User, ["read"]))
            .with_entry(CatalogEntry::new("users/", ResourceType::Role, ["read"]));

        assert_eq!(
            catalog.validate(),
            Err(CatalogError::DuplicatePath {
                path: "/users".to_string()
            })
        );
    }

    #[test]
    fn validate_rejects_empty_paths() {
        let catalog = ResourceCatalog::empty().with_entry(CatalogEntry::new(
            " / ",
            ResourceType::Auth,
            ["read"],
        ));

        assert_eq!(
            catalog.validate(),
            Err(CatalogError::EmptyPath {
                resource_type: ResourceType::Auth
            })
        );
    }

    #[test]
    fn actions_for_merges_entries_of_one_type() {
        let catalog = ResourceCatalog::empty()
            .with_entry(CatalogEntry::new("/users", ResourceType::User, ["read", "create"]))
            .with_entry(CatalogEntry::new("/profile", ResourceType::User, ["read", "update"]));

        let actions: Vec<&str> = catalog
            .actions_for(ResourceType::User)
            .into_iter()
            .map(Action::as_str)
            .collect();

        assert_eq!(actions, vec!["create", "read", "update"]);
        assert!(catalog.actions_for(ResourceType::Log).is_empty());
    }

    #[test]
    fn catalog_deserializes_from_toml() {
        let toml = r#"
expand_manage = true

[[resources]]
path = "/users"
resource_type = "user"
actions = ["read", "manage"]
"#;
        let catalog: ResourceCatalog = toml::from_str(toml).unwrap();

        assert!(catalog.expand_manage);
        assert_eq!(catalog.resources.len(), 1);
        assert_eq!(catalog.resources[0].resource_type, ResourceType::User);
    }
}
