//! One-shot permission check.

use std::str::FromStr;

use anyhow::{Context, Result, bail};
use portcullis_config::PortcullisConfig;
use portcullis_rbac::DenialReport;
use portcullis_types::{PrincipalId, ResourceType};

use crate::style::{print_error, print_success};

/// Checks `action` on `subject` for `principal`.
///
/// `subject` is a resource type name (`user`) or a structural path
/// (`/users/42`). On refusal the JSON denial report goes to stdout and the
/// command fails.
pub fn run(config: &PortcullisConfig, principal: &str, action: &str, subject: &str) -> Result<()> {
    let authz = super::authorizer(config)?;

    let resource_type = if subject.trim_start().starts_with('/') {
        authz.builder().resolver().resolve(subject)?
    } else {
        ResourceType::from_str(subject).with_context(|| {
            format!("`{subject}` is neither a resource type nor a path starting with `/`")
        })?
    };

    let principal = PrincipalId::from(principal);
    match authz.authorize(&principal, action, &resource_type) {
        Ok(()) => {
            print_success("allowed");
            Ok(())
        }
        Err(err) => {
            let report = DenialReport::from_error(&err);
            println!("{}", serde_json::to_string_pretty(&report)?);
            print_error(&err.to_string());
            bail!("{} ({})", report.code, report.status)
        }
    }
}
