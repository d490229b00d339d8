//! Umbrella error for the authorize-a-request path.

use portcullis_types::PrincipalId;
use thiserror::Error;

use crate::builder::PolicyBuildError;
use crate::enforcement::AuthorizationDenied;
use crate::store::StoreError;

/// Everything that can stop a request between "who is this" and "go ahead".
///
/// None of these are retried. `Denied` is a routine outcome; `PolicyBuild`
/// means the role/menu data and the catalog disagree and needs an operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    /// The principal does not exist.
    #[error("principal `{0}` not found")]
    NotFound(PrincipalId),

    /// The store failed for another reason.
    #[error(transparent)]
    Store(StoreError),

    /// The principal's ability could not be built.
    #[error(transparent)]
    PolicyBuild(#[from] PolicyBuildError),

    /// The permission check failed.
    #[error(transparent)]
    Denied(#[from] AuthorizationDenied),
}

impl From<StoreError> for AuthzError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => AuthzError::NotFound(id),
            other => AuthzError::Store(other),
        }
    }
}

impl AuthzError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AuthzError::NotFound(_) => "PRINCIPAL_NOT_FOUND",
            AuthzError::Store(_) => "STORE_UNAVAILABLE",
            AuthzError::PolicyBuild(_) => "POLICY_BUILD_FAILED",
            AuthzError::Denied(_) => "AUTHORIZATION_DENIED",
        }
    }

    /// HTTP status the transport layer should answer with.
    pub fn status(&self) -> u16 {
        match self {
            AuthzError::NotFound(_) => 404,
            AuthzError::Store(_) => 503,
            AuthzError::PolicyBuild(_) => 500,
            AuthzError::Denied(_) => 403,
        }
    }

    /// Returns whether this is a routine permission denial.
    pub fn is_denied(&self) -> bool {
        matches!(self, AuthzError::Denied(_))
    }
}
