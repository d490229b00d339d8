//! Property-based tests using proptest.
//!
//! Random role/menu graphs over the default catalog, checked against a
//! brute-force model of what the principal should be able to do.

use std::collections::HashSet;

use portcullis_types::{Principal, Resource, ResourceCatalog, ResourceType, Role, RoleId};
use proptest::prelude::*;
use proptest::sample::Index;

use super::{ACTIONS, CATALOG_PATHS};
use crate::{Ability, AbilityBuilder};

/// A pool of menus with distinct ids. Menu `i` has id `i`, so every copy of
/// a menu carries the same path and actions.
fn menu_pool() -> impl Strategy<Value = Vec<Resource>> {
    prop::collection::vec((0..CATALOG_PATHS.len(), 0u8..32), 1..8).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(id, (path, mask))| {
                let actions = ACTIONS
                    .iter()
                    .enumerate()
                    .filter(|(bit, _)| mask & (1 << bit) != 0)
                    .map(|(_, action)| *action);
                Resource::new(id as u64, CATALOG_PATHS[path].0).with_actions(actions)
            })
            .collect()
    })
}

/// Roles drawing menus from a shared pool, so overlaps are common.
fn roles() -> impl Strategy<Value = Vec<Role>> {
    menu_pool().prop_flat_map(|pool| {
        prop::collection::vec(prop::collection::vec(any::<Index>(), 0..6), 0..5).prop_map(
            move |picks| {
                picks
                    .into_iter()
                    .enumerate()
                    .map(|(id, indices)| {
                        indices.into_iter().fold(
                            Role::new(id as u64, format!("role-{id}")),
                            |role, index| role.with_resource(pool[index.index(pool.len())].clone()),
                        )
                    })
                    .collect()
            },
        )
    })
}

fn resolve(path: &str) -> ResourceType {
    CATALOG_PATHS
        .iter()
        .find(|(p, _)| *p == path)
        .map(|(_, ty)| *ty)
        .unwrap()
}

/// Every (action, type) pair some role's menu grants.
fn expected_pairs(roles: &[Role]) -> HashSet<(String, ResourceType)> {
    roles
        .iter()
        .flat_map(|role| role.resources.iter())
        .flat_map(|resource| {
            let ty = resolve(&resource.path);
            resource
                .actions
                .iter()
                .map(move |action| (action.as_str().to_string(), ty))
        })
        .collect()
}

fn build(roles: &[Role]) -> Ability {
    AbilityBuilder::new(&ResourceCatalog::default())
        .build(roles)
        .unwrap()
}

proptest! {
    // ========================================================================
    // Rule Derivation
    // ========================================================================

    /// An ability allows exactly the pairs granted by the principal's menus.
    #[test]
    fn ability_matches_granted_pairs(roles in roles()) {
        let ability = build(&roles);
        let expected = expected_pairs(&roles);

        for (_, ty) in CATALOG_PATHS {
            for action in ACTIONS {
                prop_assert_eq!(
                    ability.allows(action, &ty),
                    expected.contains(&(action.to_string(), ty))
                );
            }
        }
        prop_assert_eq!(ability.len(), expected.len());
    }

    /// Role order and resource order do not change the result.
    #[test]
    fn build_is_order_independent(roles in roles()) {
        let reversed: Vec<Role> = roles
            .iter()
            .rev()
            .cloned()
            .map(|mut role| {
                role.resources.reverse();
                role
            })
            .collect();

        prop_assert_eq!(build(&roles), build(&reversed));
    }

    /// Holding a role twice grants nothing extra.
    #[test]
    fn duplicate_roles_are_idempotent(roles in roles()) {
        let doubled: Vec<Role> = roles.iter().chain(roles.iter()).cloned().collect();
        prop_assert_eq!(build(&roles), build(&doubled));
    }

    /// Dropping a role whose menus are all held through other roles grants
    /// nothing less.
    #[test]
    fn redundant_role_can_be_removed(roles in roles()) {
        prop_assume!(!roles.is_empty());

        let mut with_copy = roles.clone();
        let mut copy = roles[0].clone();
        copy.id = RoleId::new(999);
        with_copy.push(copy);

        prop_assert_eq!(build(&with_copy), build(&roles));
    }

    // ========================================================================
    // Checks
    // ========================================================================

    /// An empty ability denies every action on every type.
    #[test]
    fn empty_ability_denies_everything(action in "[a-z]{1,10}") {
        let ability = build(&[]);
        for ty in ResourceType::ALL {
            prop_assert!(!ability.allows(&action, &ty));
        }
    }

    /// Checking an instance is the same as checking its type.
    #[test]
    fn instance_checks_match_type_checks(roles in roles(), action in prop::sample::select(ACTIONS.to_vec())) {
        let ability = build(&roles);

        prop_assert_eq!(
            ability.allows(action, &Principal::new("anyone")),
            ability.allows(action, &ResourceType::User)
        );
        prop_assert_eq!(
            ability.allows(action, &Role::new(1, "any")),
            ability.allows(action, &ResourceType::Role)
        );
        prop_assert_eq!(
            ability.allows(action, &Resource::new(1, "/users")),
            ability.allows(action, &ResourceType::Menu)
        );
    }

    /// Building twice from the same input gives equal abilities.
    #[test]
    fn build_is_deterministic(roles in roles()) {
        prop_assert_eq!(build(&roles).sorted_rules(), build(&roles).sorted_rules());
    }
}
