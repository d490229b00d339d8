//! Error response bodies.
//!
//! The transport layer turns an [`AuthzError`] into a response; this is the
//! body it sends: a machine-readable code, the status, an ISO-8601 timestamp
//! and a message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AuthzError;

/// Serializable description of a refused request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenialReport {
    pub code: String,
    pub status: u16,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl DenialReport {
    /// Builds a report stamped with the current time.
    pub fn from_error(err: &AuthzError) -> Self {
        Self::at(err, Utc::now())
    }

    /// Builds a report stamped with `timestamp`.
    pub fn at(err: &AuthzError, timestamp: DateTime<Utc>) -> Self {
        Self {
            code: err.code().to_string(),
            status: err.status(),
            timestamp,
            message: err.to_string(),
        }
    }
}

impl From<&AuthzError> for DenialReport {
    fn from(err: &AuthzError) -> Self {
        Self::from_error(err)
    }
}
