//! Subject detection.
//!
//! A permission check names its subject either as a [`ResourceType`] or as a
//! domain entity. Entities report their resource type through [`Subject`],
//! so a check against `&dyn Subject` picks the tag of the concrete type the
//! value actually is, not of whatever it was passed as.

use portcullis_types::{Principal, Resource, ResourceType, Role};

/// Anything a permission can be checked against.
///
/// Implemented by [`ResourceType`] itself (a static check) and by every
/// domain entity the admin system protects.
pub trait Subject {
    /// Returns the resource type this subject belongs to.
    fn resource_type(&self) -> ResourceType;
}

impl Subject for ResourceType {
    fn resource_type(&self) -> ResourceType {
        *self
    }
}

/// Principals are user accounts.
impl Subject for Principal {
    fn resource_type(&self) -> ResourceType {
        ResourceType::User
    }
}

impl Subject for Role {
    fn resource_type(&self) -> ResourceType {
        ResourceType::Role
    }
}

/// Resources are the admin menu entries.
impl Subject for Resource {
    fn resource_type(&self) -> ResourceType {
        ResourceType::Menu
    }
}
