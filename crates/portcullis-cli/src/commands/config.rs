//! Configuration display command.

use std::path::Path;

use anyhow::Result;
use portcullis_config::{ConfigLoader, PortcullisConfig};

use crate::ConfigFormat;
use crate::style::{print_header, print_labeled, print_spacer, styled_table};

/// Show the effective configuration.
pub fn show(config: &PortcullisConfig, project_dir: &Path, format: ConfigFormat) -> Result<()> {
    match format {
        ConfigFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        ConfigFormat::Toml => {
            println!("{}", config.to_toml()?);
        }
        ConfigFormat::Text => {
            print_header("Portcullis Configuration");
            print_spacer();

            println!("Project:");
            print_labeled("Directory", &project_dir.display().to_string());
            print_labeled(
                "portcullis.toml",
                if ConfigLoader::new()
                    .with_project_dir(project_dir)
                    .is_initialized()
                {
                    "found"
                } else {
                    "not found (using defaults)"
                },
            );
            print_spacer();

            println!("Catalog:");
            print_labeled("Expand manage", &config.catalog.expand_manage.to_string());
            let rows: Vec<Vec<String>> = config
                .catalog
                .resources
                .iter()
                .map(|entry| {
                    let actions: Vec<&str> =
                        entry.actions.iter().map(|action| action.as_str()).collect();
                    vec![
                        entry.path.clone(),
                        entry.resource_type.to_string(),
                        actions.join(", "),
                    ]
                })
                .collect();
            println!("{}", styled_table(&["Path", "Subject", "Actions"], &rows));
            print_spacer();

            println!("Logging:");
            print_labeled("Level", &config.logging.level);
            print_labeled("Format", &config.logging.format.to_string());
            print_spacer();

            println!("Directory:");
            print_labeled("Snapshot", &config.directory.snapshot.display().to_string());
        }
    }

    Ok(())
}
