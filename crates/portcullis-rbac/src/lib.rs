//! # portcullis-rbac: Menu-driven Role-Based Access Control
//!
//! Derives, at request time, everything a principal may do from the
//! role/menu/action graph held by the identity store, and enforces it before
//! privileged operations run.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  PrincipalStore::load_principal              │
//! │  principal -> roles -> menus (hydrated)      │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  AbilityBuilder                              │
//! │  ├─ Dedupe menus by id                       │
//! │  ├─ Resolve path -> resource type            │
//! │  └─ One rule per (action, resource type)     │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Ability (immutable rule set)                │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Guard::enforce -> Ok | AuthorizationDenied  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Examples
//!
//! ```
//! use portcullis_rbac::{AbilityBuilder, Guard};
//! use portcullis_types::{Principal, Resource, ResourceCatalog, ResourceType, Role};
//!
//! let users_menu = Resource::new(1, "/users").with_actions(["read", "create"]);
//! let alice = Principal::new("alice")
//!     .with_role(Role::new(1, "operator").with_resource(users_menu));
//!
//! let catalog = ResourceCatalog::default();
//! let ability = AbilityBuilder::new(&catalog).build_for(&alice)?;
//!
//! assert!(ability.allows("read", &ResourceType::User));
//! assert!(!ability.allows("delete", &ResourceType::User));
//!
//! // Instances report their own resource type.
//! assert!(ability.allows("create", &alice));
//!
//! let guard = Guard::new(alice.id.clone(), ability).without_audit();
//! assert!(guard.enforce("read", &ResourceType::User).is_ok());
//! assert!(guard.enforce("read", &ResourceType::Log).is_err());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Concurrency
//!
//! Building and checking are synchronous and pure. [`Ability`], [`Guard`],
//! [`PathResolver`] and [`AbilityBuilder`] hold no interior mutability and are
//! `Send + Sync`. Nothing is cached across requests: an [`Ability`] is built
//! from a fresh snapshot and dropped after use.

pub mod ability;
pub mod builder;
pub mod enforcement;
pub mod error;
pub mod report;
pub mod resolver;
pub mod service;
pub mod store;
pub mod subject;

// Re-export commonly used types
pub use ability::{Ability, AbilityRule};
pub use builder::{AbilityBuilder, PolicyBuildError};
pub use enforcement::{AuthorizationDenied, Guard, Requirement};
pub use error::AuthzError;
pub use report::DenialReport;
pub use resolver::{PathResolver, ResolveError};
pub use service::Authorizer;
pub use store::{DirectorySnapshot, MemoryStore, PrincipalStore, StoreError};
pub use subject::Subject;

#[cfg(test)]
mod tests;
