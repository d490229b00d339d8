//! Authorization guard.
//!
//! Consults an already-built [`Ability`] immediately before a privileged
//! operation runs. The guard never touches the store, so it is safe on hot
//! paths.

use portcullis_types::{Action, PrincipalId, ResourceType};
use thiserror::Error;
use tracing::{info, warn};

use crate::ability::Ability;
use crate::subject::Subject;

/// A permission check failed. The operation was not executed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Access denied: `{principal}` may not {action} {resource_type}")]
pub struct AuthorizationDenied {
    pub principal: PrincipalId,
    pub action: Action,
    pub resource_type: ResourceType,
}

/// One (action, subject) pair an operation needs.
///
/// Handlers declare their requirements up front and hand them to
/// [`Guard::enforce_all`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Requirement {
    pub action: Action,
    pub resource_type: ResourceType,
}

impl Requirement {
    pub fn new<S>(action: impl Into<Action>, subject: &S) -> Self
    where
        S: Subject + ?Sized,
    {
        Self {
            action: action.into(),
            resource_type: subject.resource_type(),
        }
    }
}

/// Policy enforcement point for one principal.
///
/// Wraps the principal's [`Ability`]:
/// - Single checks ([`Guard::enforce`])
/// - Handler requirement lists ([`Guard::enforce_all`])
/// - Guarded execution ([`Guard::guarded`])
/// - Audit logging of every decision
#[derive(Debug, Clone)]
pub struct Guard {
    principal: PrincipalId,
    ability: Ability,

    /// Whether to log decisions.
    audit_enabled: bool,
}

impl Guard {
    /// Creates a guard over a built ability.
    pub fn new(principal: PrincipalId, ability: Ability) -> Self {
        Self {
            principal,
            ability,
            audit_enabled: true,
        }
    }

    /// Disables audit logging (for testing).
    pub fn without_audit(mut self) -> Self {
        self.audit_enabled = false;
        self
    }

    /// Checks a single permission.
    ///
    /// Returns `Ok(())` if allowed, [`AuthorizationDenied`] otherwise.
    ///
    /// **Audit:** Logs every decision.
    pub fn enforce<S>(&self, action: &str, subject: &S) -> Result<(), AuthorizationDenied>
    where
        S: Subject + ?Sized,
    {
        let resource_type = subject.resource_type();
        let allowed = self.ability.allows(action, &resource_type);

        if self.audit_enabled {
            if allowed {
                info!(
                    principal = %self.principal,
                    action = %action,
                    subject = %resource_type,
                    "Access granted"
                );
            } else {
                warn!(
                    principal = %self.principal,
                    action = %action,
                    subject = %resource_type,
                    "Access denied"
                );
            }
        }

        if allowed {
            Ok(())
        } else {
            Err(AuthorizationDenied {
                principal: self.principal.clone(),
                action: Action::from(action),
                resource_type,
            })
        }
    }

    /// Checks every requirement, failing on the first unmet one.
    ///
    /// An empty list is trivially satisfied.
    pub fn enforce_all(&self, requirements: &[Requirement]) -> Result<(), AuthorizationDenied> {
        for requirement in requirements {
            self.enforce(requirement.action.as_str(), &requirement.resource_type)?;
        }
        Ok(())
    }

    /// Runs `operation` only if `action` on `subject` is allowed.
    ///
    /// # Examples
    ///
    /// ```
    /// use portcullis_rbac::{Ability, AbilityRule, Guard};
    /// use portcullis_types::{PrincipalId, ResourceType};
    ///
    /// let ability: Ability = [AbilityRule::new("delete", ResourceType::Log)]
    ///     .into_iter()
    ///     .collect();
    /// let guard = Guard::new(PrincipalId::from("ops"), ability).without_audit();
    ///
    /// let purged = guard.guarded("delete", &ResourceType::Log, || 42).unwrap();
    /// assert_eq!(purged, 42);
    ///
    /// let mut ran = false;
    /// let denied = guard.guarded("delete", &ResourceType::User, || ran = true);
    /// assert!(denied.is_err());
    /// assert!(!ran);
    /// ```
    pub fn guarded<S, T, F>(
        &self,
        action: &str,
        subject: &S,
        operation: F,
    ) -> Result<T, AuthorizationDenied>
    where
        S: Subject + ?Sized,
        F: FnOnce() -> T,
    {
        self.enforce(action, subject)?;
        Ok(operation())
    }

    /// Returns the principal this guard decides for.
    pub fn principal(&self) -> &PrincipalId {
        &self.principal
    }

    /// Returns the ability this guard consults.
    pub fn ability(&self) -> &Ability {
        &self.ability
    }
}
