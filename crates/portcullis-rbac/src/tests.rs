//! Cross-module tests for portcullis-rbac.

#![allow(clippy::unwrap_used)] // Tests use unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Test functions don't document panics

mod property_tests;

use portcullis_types::{Principal, PrincipalId, Resource, ResourceCatalog, ResourceType, Role};

use crate::{
    Ability, AbilityBuilder, Authorizer, DenialReport, Guard, MemoryStore, PathResolver,
    Requirement, Subject,
};

/// Paths of the default catalog paired with the type each resolves to.
pub(crate) const CATALOG_PATHS: [(&str, ResourceType); 5] = [
    ("/users", ResourceType::User),
    ("/roles", ResourceType::Role),
    ("/menus", ResourceType::Menu),
    ("/logs", ResourceType::Log),
    ("/auth", ResourceType::Auth),
];

pub(crate) const ACTIONS: [&str; 5] = ["read", "create", "update", "delete", "manage"];

fn alice() -> Principal {
    Principal::new("alice")
        .with_role(
            Role::new(1, "R1")
                .with_resource(Resource::new(1, "/users").with_actions(["read", "create"])),
        )
        .with_role(
            Role::new(2, "R2")
                .with_resource(Resource::new(1, "/users").with_actions(["read", "create"]))
                .with_resource(Resource::new(2, "/roles").with_actions(["manage"])),
        )
}

#[test]
fn test_engine_types_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Ability>();
    assert_send_sync::<Guard>();
    assert_send_sync::<PathResolver>();
    assert_send_sync::<AbilityBuilder>();
    assert_send_sync::<Authorizer<MemoryStore>>();
}

#[test]
fn test_builder_and_guard_agree() {
    let ability = AbilityBuilder::new(&ResourceCatalog::default())
        .build_for(&alice())
        .unwrap();
    let guard = Guard::new(PrincipalId::from("alice"), ability.clone()).without_audit();

    for (_, resource_type) in CATALOG_PATHS {
        for action in ACTIONS {
            assert_eq!(
                guard.enforce(action, &resource_type).is_ok(),
                ability.allows(action, &resource_type),
                "{action} {resource_type}"
            );
        }
    }
}

#[test]
fn test_erased_subjects_in_requirements() {
    let subjects: Vec<Box<dyn Subject>> = vec![
        Box::new(Principal::new("bob")),
        Box::new(Role::new(9, "ops")),
    ];
    let requirements: Vec<Requirement> = subjects
        .iter()
        .map(|subject| Requirement::new("read", subject.as_ref()))
        .collect();

    let ability = AbilityBuilder::new(&ResourceCatalog::default())
        .build_for(&alice())
        .unwrap();
    let guard = Guard::new(PrincipalId::from("alice"), ability).without_audit();

    let err = guard.enforce_all(&requirements).unwrap_err();
    assert_eq!(err.resource_type, ResourceType::Role);
}

#[test]
fn test_denial_report_from_authorizer() {
    let authz = Authorizer::new(
        MemoryStore::from_principals([alice()]),
        &ResourceCatalog::default(),
    );

    let err = authz
        .authorize(&PrincipalId::from("alice"), "delete", &ResourceType::Log)
        .unwrap_err();
    let report = DenialReport::from_error(&err);

    assert_eq!(report.code, "AUTHORIZATION_DENIED");
    assert_eq!(report.status, 403);
    assert!(report.message.contains("delete log"));
}
