//! Role/menu store access.
//!
//! The engine reads principals through [`PrincipalStore`], which must return
//! a fully hydrated graph (roles, their resources, paths and actions) in one
//! call. The builder never issues follow-up queries.
//!
//! [`MemoryStore`] is the in-process implementation. It is filled either
//! with hydrated principals directly or from a [`DirectorySnapshot`], the
//! normalized users/roles/menus form a relational store exports.

use std::collections::{HashMap, hash_map::Entry};

use portcullis_types::{Principal, PrincipalId, Resource, ResourceId, Role, RoleId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Error type for store access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No principal with this id exists.
    #[error("principal `{0}` not found")]
    NotFound(PrincipalId),

    /// A snapshot record references something the snapshot does not contain.
    #[error("{owner} references unknown {missing}")]
    DanglingReference { owner: String, missing: String },

    /// The same id appears twice in a snapshot with different contents.
    #[error("{owner} appears more than once with different contents")]
    ConflictingRecord { owner: String },

    /// The backing store could not be read.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Read-only access to hydrated principals.
pub trait PrincipalStore {
    /// Loads a principal with all roles and each role's resources.
    fn load_principal(&self, id: &PrincipalId) -> Result<Principal, StoreError>;
}

impl<T: PrincipalStore + ?Sized> PrincipalStore for &T {
    fn load_principal(&self, id: &PrincipalId) -> Result<Principal, StoreError> {
        (**self).load_principal(id)
    }
}

impl<T: PrincipalStore + ?Sized> PrincipalStore for std::sync::Arc<T> {
    fn load_principal(&self, id: &PrincipalId) -> Result<Principal, StoreError> {
        (**self).load_principal(id)
    }
}

// ============================================================================
// Snapshot format
// ============================================================================

/// A role row with the ids of its menus (`roles_menus` join table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub id: RoleId,
    pub name: String,
    #[serde(default)]
    pub menus: Vec<ResourceId>,
}

/// A user row with the ids of its roles (`users_roles` join table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: PrincipalId,
    #[serde(default)]
    pub roles: Vec<RoleId>,
}

/// Normalized export of the identity store.
///
/// ```json
/// {
///   "menus": [{ "id": 1, "name": "Users", "path": "/users", "actions": ["read"] }],
///   "roles": [{ "id": 1, "name": "admin", "menus": [1] }],
///   "users": [{ "username": "alice", "roles": [1] }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorySnapshot {
    pub menus: Vec<Resource>,
    pub roles: Vec<RoleRecord>,
    pub users: Vec<UserRecord>,
}

// ============================================================================
// In-memory store
// ============================================================================

/// Principals held in memory, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    principals: HashMap<PrincipalId, Principal>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from hydrated principals. Later duplicates replace
    /// earlier ones.
    pub fn from_principals(principals: impl IntoIterator<Item = Principal>) -> Self {
        let mut store = Self::new();
        for principal in principals {
            store.insert(principal);
        }
        store
    }

    /// Hydrates every user of a snapshot.
    ///
    /// # Errors
    ///
    /// [`StoreError::DanglingReference`] if a role lists an unknown menu id
    /// or a user lists an unknown role id.
    ///
    /// [`StoreError::ConflictingRecord`] if a menu id, role id or username
    /// repeats with different contents. Exact repeats are dropped. For menus
    /// only the path and actions count; the display name may differ.
    pub fn from_snapshot(snapshot: &DirectorySnapshot) -> Result<Self, StoreError> {
        let mut menus: HashMap<ResourceId, &Resource> =
            HashMap::with_capacity(snapshot.menus.len());
        for menu in &snapshot.menus {
            match menus.entry(menu.id) {
                Entry::Vacant(slot) => {
                    slot.insert(menu);
                }
                Entry::Occupied(existing) if existing.get().same_grants(menu) => {
                    debug!(menu = %menu.id, "Repeated menu row in snapshot");
                }
                Entry::Occupied(_) => {
                    return Err(StoreError::ConflictingRecord {
                        owner: format!("menu {}", menu.id),
                    });
                }
            }
        }

        let mut seen_roles: HashMap<RoleId, &RoleRecord> =
            HashMap::with_capacity(snapshot.roles.len());
        let mut roles: HashMap<RoleId, Role> = HashMap::with_capacity(snapshot.roles.len());
        for record in &snapshot.roles {
            if let Some(previous) = seen_roles.insert(record.id, record) {
                if previous != record {
                    return Err(StoreError::ConflictingRecord {
                        owner: format!("role {}", record.id),
                    });
                }
                debug!(role = %record.id, "Repeated role row in snapshot");
                continue;
            }

            let resources = record
                .menus
                .iter()
                .map(|menu_id| {
                    menus
                        .get(menu_id)
                        .map(|menu| (*menu).clone())
                        .ok_or_else(|| StoreError::DanglingReference {
                            owner: format!("role {}", record.id),
                            missing: format!("menu {menu_id}"),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            roles.insert(
                record.id,
                Role {
                    id: record.id,
                    name: record.name.clone(),
                    resources,
                },
            );
        }

        let mut seen_users: HashMap<&PrincipalId, &UserRecord> =
            HashMap::with_capacity(snapshot.users.len());
        let mut store = Self::new();
        for user in &snapshot.users {
            if let Some(previous) = seen_users.insert(&user.username, user) {
                if previous != user {
                    return Err(StoreError::ConflictingRecord {
                        owner: format!("user {}", user.username),
                    });
                }
                debug!(user = %user.username, "Repeated user row in snapshot");
                continue;
            }

            let held = user
                .roles
                .iter()
                .map(|role_id| {
                    roles
                        .get(role_id)
                        .cloned()
                        .ok_or_else(|| StoreError::DanglingReference {
                            owner: format!("user {}", user.username),
                            missing: format!("role {role_id}"),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            store.insert(Principal {
                id: user.username.clone(),
                roles: held,
            });
        }

        debug!(
            users = store.len(),
            roles = roles.len(),
            menus = menus.len(),
            "Directory snapshot loaded"
        );

        Ok(store)
    }

    /// Adds or replaces a principal.
    pub fn insert(&mut self, principal: Principal) {
        self.principals.insert(principal.id.clone(), principal);
    }

    /// Returns all principal ids, sorted.
    pub fn principal_ids(&self) -> Vec<&PrincipalId> {
        let mut ids: Vec<&PrincipalId> = self.principals.keys().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.principals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }
}

impl PrincipalStore for MemoryStore {
    fn load_principal(&self, id: &PrincipalId) -> Result<Principal, StoreError> {
        self.principals
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }
}
