//! Resource-path resolution.
//!
//! Turns a structural path (`/users`, `/logs/export`) into the
//! [`ResourceType`] it protects, using the configured [`ResourceCatalog`].

use std::collections::HashMap;

use portcullis_types::{ResourceCatalog, ResourceType, normalize_path};
use thiserror::Error;

/// Error type for path resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The path is not covered by any catalog entry.
    #[error("no resource type is registered for path `{path}`")]
    UnknownResourceType { path: String },
}

/// Compiled path table.
///
/// Resolution is exact match first, then the longest catalog path that is a
/// whole-segment prefix of the input: `/users/profile` resolves through
/// `/users`, `/usersettings` does not. Paths containing `.` or `..`
/// segments are refused rather than collapsed. There is no fallback type;
/// anything else is a [`ResolveError`].
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    /// Normalized path -> type.
    exact: HashMap<String, ResourceType>,

    /// Same entries, longest path first.
    prefixes: Vec<(String, ResourceType)>,
}

impl PathResolver {
    /// Compiles the catalog's path table.
    ///
    /// If two entries normalize to the same path the first one wins;
    /// [`ResourceCatalog::validate`] rejects such catalogs up front.
    pub fn new(catalog: &ResourceCatalog) -> Self {
        let mut exact = HashMap::with_capacity(catalog.resources.len());
        for entry in &catalog.resources {
            exact
                .entry(normalize_path(&entry.path))
                .or_insert(entry.resource_type);
        }

        let mut prefixes: Vec<(String, ResourceType)> =
            exact.iter().map(|(p, t)| (p.clone(), *t)).collect();
        prefixes.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Self { exact, prefixes }
    }

    /// Resolves a path to its resource type.
    ///
    /// # Examples
    ///
    /// ```
    /// use portcullis_rbac::PathResolver;
    /// use portcullis_types::{ResourceCatalog, ResourceType};
    ///
    /// let resolver = PathResolver::new(&ResourceCatalog::default());
    ///
    /// assert_eq!(resolver.resolve("/users").unwrap(), ResourceType::User);
    /// assert_eq!(resolver.resolve("roles/").unwrap(), ResourceType::Role);
    /// assert_eq!(resolver.resolve("/logs/export").unwrap(), ResourceType::Log);
    /// assert!(resolver.resolve("/billing").is_err());
    /// ```
    pub fn resolve(&self, path: &str) -> Result<ResourceType, ResolveError> {
        let normalized = normalize_path(path);

        if normalized.split('/').any(|segment| matches!(segment, "." | "..")) {
            return Err(ResolveError::UnknownResourceType { path: normalized });
        }

        if let Some(resource_type) = self.exact.get(&normalized) {
            return Ok(*resource_type);
        }

        self.prefixes
            .iter()
            .find(|(prefix, _)| is_segment_prefix(prefix, &normalized))
            .map(|(_, resource_type)| *resource_type)
            .ok_or(ResolveError::UnknownResourceType { path: normalized })
    }

    /// Number of distinct paths in the table.
    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}

/// `/users` is a segment prefix of `/users/42`, not of `/users42`.
fn is_segment_prefix(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return false;
    }
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('/'))
}
