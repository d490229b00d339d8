//! Ability construction.
//!
//! Flattens a principal's roles into their distinct resources, resolves each
//! resource's path to a resource type, and registers one rule per
//! (action, resource type) pair.

use std::collections::{BTreeMap, HashMap, btree_map::Entry};

use portcullis_types::{Action, Principal, ResourceCatalog, ResourceId, ResourceType, Role};
use thiserror::Error;
use tracing::debug;

use crate::ability::Ability;
use crate::resolver::{PathResolver, ResolveError};

/// Error type for ability construction.
///
/// A failed build never yields a partial ability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyBuildError {
    /// A resource's path is not in the catalog.
    #[error("resource {resource} has path `{path}` which maps to no resource type")]
    UnknownResourceType { resource: ResourceId, path: String },

    /// One resource id appears with two different paths or action lists.
    #[error("resource {resource} appears with conflicting paths or actions")]
    ConflictingResource { resource: ResourceId },
}

/// Builds [`Ability`] values against one catalog.
///
/// The builder is immutable and can be shared between threads; each call to
/// [`AbilityBuilder::build`] works on its own input.
#[derive(Debug, Clone)]
pub struct AbilityBuilder {
    resolver: PathResolver,

    /// Present only when `manage` expansion is enabled.
    expansions: Option<HashMap<ResourceType, Vec<Action>>>,
}

impl AbilityBuilder {
    /// Creates a builder for the given catalog.
    pub fn new(catalog: &ResourceCatalog) -> Self {
        let expansions = catalog.expand_manage.then(|| {
            ResourceType::ALL
                .into_iter()
                .map(|ty| {
                    let actions: Vec<Action> =
                        catalog.actions_for(ty).into_iter().cloned().collect();
                    (ty, actions)
                })
                .collect()
        });

        Self {
            resolver: PathResolver::new(catalog),
            expansions,
        }
    }

    /// Returns the path resolver this builder uses.
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Builds the ability of a hydrated principal.
    pub fn build_for(&self, principal: &Principal) -> Result<Ability, PolicyBuildError> {
        let ability = self.build(&principal.roles)?;
        debug!(
            principal = %principal.id,
            rules = ability.len(),
            "Ability built for principal"
        );
        Ok(ability)
    }

    /// Builds an ability from a set of roles.
    ///
    /// 1. Resources are deduplicated by id across all roles.
    /// 2. Each distinct resource's path is resolved.
    /// 3. Each of its actions becomes a rule on the resolved type.
    ///
    /// Zero roles, or roles whose resources grant no actions, give an empty
    /// ability.
    ///
    /// # Errors
    ///
    /// - [`PolicyBuildError::ConflictingResource`] if one id is seen with two
    ///   different grant payloads.
    /// - [`PolicyBuildError::UnknownResourceType`] if a path does not resolve.
    pub fn build(&self, roles: &[Role]) -> Result<Ability, PolicyBuildError> {
        let mut distinct = BTreeMap::new();
        for resource in roles.iter().flat_map(|role| role.resources.iter()) {
            match distinct.entry(resource.id) {
                Entry::Vacant(slot) => {
                    slot.insert(resource);
                }
                Entry::Occupied(seen) => {
                    if !seen.get().same_grants(resource) {
                        return Err(PolicyBuildError::ConflictingResource {
                            resource: resource.id,
                        });
                    }
                }
            }
        }

        let mut ability = Ability::empty();
        for resource in distinct.values() {
            let resource_type = self.resolver.resolve(&resource.path).map_err(
                |ResolveError::UnknownResourceType { path }| {
                    PolicyBuildError::UnknownResourceType {
                        resource: resource.id,
                        path,
                    }
                },
            )?;

            for action in &resource.actions {
                ability.insert(action.clone(), resource_type);

                if action.is_manage() {
                    if let Some(expanded) = self.expanded(resource_type) {
                        for implied in expanded {
                            ability.insert(implied.clone(), resource_type);
                        }
                    }
                }
            }
        }

        debug!(
            roles = roles.len(),
            resources = distinct.len(),
            rules = ability.len(),
            "Ability built"
        );

        Ok(ability)
    }

    fn expanded(&self, resource_type: ResourceType) -> Option<&[Action]> {
        self.expansions
            .as_ref()
            .and_then(|table| table.get(&resource_type))
            .map(Vec::as_slice)
    }
}
