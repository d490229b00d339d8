//! # portcullis-types: Core types for `Portcullis`
//!
//! This crate contains the data model shared across the `Portcullis` crates:
//! - Entity IDs ([`PrincipalId`], [`RoleId`], [`ResourceId`])
//! - Permission vocabulary ([`Action`], [`ResourceType`])
//! - The role/menu graph ([`Principal`], [`Role`], [`Resource`])
//! - The path table ([`ResourceCatalog`], [`CatalogEntry`])
//!
//! Principals, roles and resources are owned by an external identity store.
//! Portcullis only reads them; nothing in this crate mutates persisted state.

use std::{borrow::Borrow, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

pub mod catalog;

pub use catalog::{CatalogEntry, CatalogError, ResourceCatalog, normalize_path};

// ============================================================================
// Entity IDs
// ============================================================================

/// Unique identifier for a principal (the login name of a user).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PrincipalId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PrincipalId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Unique identifier for a role.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct RoleId(u64);

impl RoleId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RoleId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<RoleId> for u64 {
    fn from(id: RoleId) -> Self {
        id.0
    }
}

/// Unique identifier for a resource (an admin menu entry).
///
/// Resource identity is by id, never by value: two roles referencing the
/// same id reference the same resource.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct ResourceId(u64);

impl ResourceId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ResourceId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<ResourceId> for u64 {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

// ============================================================================
// Permission vocabulary
// ============================================================================

/// An action name such as `read`, `create` or `manage`.
///
/// Actions are open-ended strings: the set of actions a resource grants is
/// data, not code. [`Action::MANAGE`] is the reserved catch-all name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(String);

impl Action {
    /// The reserved catch-all action.
    pub const MANAGE: &'static str = "manage";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn manage() -> Self {
        Self::new(Self::MANAGE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns whether this is the reserved `manage` action.
    pub fn is_manage(&self) -> bool {
        self.0 == Self::MANAGE
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Action {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Action {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Action {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The abstract category a resource path resolves to.
///
/// This is the subject dimension of a permission check. The set is closed:
/// adding an entity kind means adding a variant, and every exhaustive match
/// over it has to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// User accounts (`/users`).
    User,
    /// Roles and their menu assignments (`/roles`).
    Role,
    /// Admin menu entries (`/menus`).
    Menu,
    /// Request/operation logs (`/logs`).
    Log,
    /// Authentication endpoints (`/auth`).
    Auth,
}

impl ResourceType {
    /// Every resource type, in declaration order.
    pub const ALL: [ResourceType; 5] = [
        ResourceType::User,
        ResourceType::Role,
        ResourceType::Menu,
        ResourceType::Log,
        ResourceType::Auth,
    ];

    /// Returns the lowercase wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::User => "user",
            ResourceType::Role => "role",
            ResourceType::Menu => "menu",
            ResourceType::Log => "log",
            ResourceType::Auth => "auth",
        }
    }
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown resource type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource type name: {0:?}")]
pub struct ParseResourceTypeError(String);

impl FromStr for ResourceType {
    type Err = ParseResourceTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseResourceTypeError(s.to_string()))
    }
}

// ============================================================================
// Role/menu graph
// ============================================================================

/// A protected admin section ("menu") and the actions it grants when held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    #[serde(default)]
    pub name: String,
    /// Structural path, e.g. `/users`.
    pub path: String,
    /// Ordered action names granted by this resource.
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl Resource {
    pub fn new(id: u64, path: impl Into<String>) -> Self {
        Self {
            id: ResourceId::new(id),
            name: String::new(),
            path: path.into(),
            actions: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_actions<I, A>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Action>,
    {
        self.actions = actions.into_iter().map(Into::into).collect();
        self
    }

    /// Returns whether two resources carry the same grant payload.
    ///
    /// Names are display-only and do not take part in the comparison.
    pub fn same_grants(&self, other: &Resource) -> bool {
        self.path == other.path && self.actions == other.actions
    }
}

/// A named bundle of resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl Role {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: RoleId::new(id),
            name: name.into(),
            resources: Vec::new(),
        }
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }
}

/// An authenticated identity with its fully hydrated roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn new(id: impl Into<PrincipalId>) -> Self {
        Self {
            id: id.into(),
            roles: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    /// Iterates every resource reachable through any role, duplicates included.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.roles.iter().flat_map(|role| role.resources.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("user", ResourceType::User ; "lowercase")]
    #[test_case("Role", ResourceType::Role ; "capitalized")]
    #[test_case(" menu ", ResourceType::Menu ; "padded")]
    #[test_case("LOG", ResourceType::Log ; "uppercase")]
    #[test_case("auth", ResourceType::Auth ; "auth")]
    fn resource_type_parses_case_insensitively(input: &str, expected: ResourceType) {
        assert_eq!(input.parse::<ResourceType>().unwrap(), expected);
    }

    #[test]
    fn resource_type_rejects_unknown_names() {
        assert!("users".parse::<ResourceType>().is_err());
        assert!("".parse::<ResourceType>().is_err());
    }

    #[test]
    fn resource_type_display_matches_serde() {
        for ty in ResourceType::ALL {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{ty}\""));
        }
    }

    #[test]
    fn action_manage_is_reserved() {
        assert!(Action::manage().is_manage());
        assert!(Action::from("manage").is_manage());
        assert!(!Action::from("Manage").is_manage());
        assert!(!Action::from("read").is_manage());
    }

    #[test]
    fn same_grants_ignores_name() {
        let a = Resource::new(1, "/users")
            .with_name("Users")
            .with_actions(["read"]);
        let b = Resource::new(1, "/users")
            .with_name("User management")
            .with_actions(["read"]);
        let c = Resource::new(1, "/users").with_actions(["read", "create"]);

        assert!(a.same_grants(&b));
        assert!(!a.same_grants(&c));
    }

    #[test]
    fn principal_resources_flattens_roles() {
        let menu = Resource::new(1, "/users").with_actions(["read"]);
        let principal = Principal::new("alice")
            .with_role(Role::new(1, "admin").with_resource(menu.clone()))
            .with_role(Role::new(2, "ops").with_resource(menu));

        assert_eq!(principal.resources().count(), 2);
    }

    #[test]
    fn principal_deserializes_with_defaults() {
        let json = r#"{"id": "bob", "roles": [{"id": 3, "name": "viewer"}]}"#;
        let principal: Principal = serde_json::from_str(json).unwrap();

        assert_eq!(principal.id, PrincipalId::from("bob"));
        assert_eq!(principal.roles[0].id, RoleId::new(3));
        assert!(principal.roles[0].resources.is_empty());
    }
}
