//! Path resolution command.

use anyhow::Result;
use portcullis_config::PortcullisConfig;
use portcullis_rbac::PathResolver;

/// Prints the resource type a structural path resolves to.
pub fn run(config: &PortcullisConfig, path: &str) -> Result<()> {
    let resolver = PathResolver::new(&config.catalog);
    let resource_type = resolver.resolve(path)?;
    println!("{resource_type}");
    Ok(())
}
