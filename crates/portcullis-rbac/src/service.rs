//! Request-scoped authorization.
//!
//! [`Authorizer`] ties a [`PrincipalStore`] to an [`AbilityBuilder`]. Every
//! call loads a fresh principal snapshot, so role or menu edits take effect
//! on the next request.

use portcullis_types::{PrincipalId, ResourceCatalog};
use tracing::{debug, instrument};

use crate::ability::Ability;
use crate::builder::AbilityBuilder;
use crate::enforcement::Guard;
use crate::error::AuthzError;
use crate::store::PrincipalStore;
use crate::subject::Subject;

/// Authorization service over a principal store.
#[derive(Debug, Clone)]
pub struct Authorizer<S> {
    store: S,
    builder: AbilityBuilder,
}

impl<S: PrincipalStore> Authorizer<S> {
    /// Creates an authorizer reading from `store` and resolving paths
    /// against `catalog`.
    pub fn new(store: S, catalog: &ResourceCatalog) -> Self {
        Self {
            store,
            builder: AbilityBuilder::new(catalog),
        }
    }

    /// Loads the principal and builds their ability.
    ///
    /// # Errors
    ///
    /// [`AuthzError::NotFound`], [`AuthzError::Store`] or
    /// [`AuthzError::PolicyBuild`].
    #[instrument(skip_all, fields(principal = %principal))]
    pub fn ability_for(&self, principal: &PrincipalId) -> Result<Ability, AuthzError> {
        let loaded = self.store.load_principal(principal)?;
        let ability = self.builder.build_for(&loaded)?;
        Ok(ability)
    }

    /// Builds a [`Guard`] for the principal, for handlers that check more
    /// than once per request.
    pub fn guard_for(&self, principal: &PrincipalId) -> Result<Guard, AuthzError> {
        let ability = self.ability_for(principal)?;
        Ok(Guard::new(principal.clone(), ability))
    }

    /// One-shot check: load, build, enforce.
    pub fn authorize<T>(
        &self,
        principal: &PrincipalId,
        action: &str,
        subject: &T,
    ) -> Result<(), AuthzError>
    where
        T: Subject + ?Sized,
    {
        let guard = self.guard_for(principal)?;
        guard.enforce(action, subject)?;
        debug!(principal = %principal, action, "Request authorized");
        Ok(())
    }

    pub fn builder(&self) -> &AbilityBuilder {
        &self.builder
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
