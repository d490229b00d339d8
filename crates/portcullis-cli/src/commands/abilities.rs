//! Lists what a principal may do.

use anyhow::Result;
use portcullis_config::PortcullisConfig;
use portcullis_rbac::Ability;
use portcullis_types::PrincipalId;
use serde::Serialize;

use crate::OutputFormat;
use crate::style::colors::SemanticStyle;
use crate::style::{print_counted_table, print_header, print_spacer};

#[derive(Serialize)]
struct AbilitiesOutput<'a> {
    principal: &'a PrincipalId,
    rules: &'a Ability,
}

pub fn run(config: &PortcullisConfig, principal: &str, format: OutputFormat) -> Result<()> {
    let principal = PrincipalId::from(principal);
    let ability = super::authorizer(config)?.ability_for(&principal)?;

    match format {
        OutputFormat::Json => {
            let output = AbilitiesOutput {
                principal: &principal,
                rules: &ability,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            if ability.is_empty() {
                println!("{}", format!("{principal} has no abilities.").muted());
                return Ok(());
            }

            print_header(&format!("Abilities for {principal}"));
            print_spacer();

            let rows: Vec<Vec<String>> = ability
                .resource_types()
                .into_iter()
                .map(|resource_type| {
                    let actions: Vec<&str> = ability
                        .actions_for(resource_type)
                        .into_iter()
                        .map(|action| action.as_str())
                        .collect();
                    vec![resource_type.to_string(), actions.join(", ")]
                })
                .collect();

            print_counted_table(&["Subject", "Actions"], &rows, "rule", ability.len());
        }
    }

    Ok(())
}
