//! Catalog rules enforced by the feature service.

use dockcat_cli::core::{CatalogError, FeatureUpdate, NewFeature};
use dockcat_cli::service::FeatureService;
use dockcat_cli::store::MemoryCatalog;
use dockcat_cli::test_utils::{CatalogFixture, init_test_logging};

fn service(fixture: CatalogFixture) -> FeatureService<MemoryCatalog> {
    init_test_logging(None);
    FeatureService::new(fixture.memory_catalog())
}

fn chain() -> CatalogFixture {
    CatalogFixture::new()
        .feature("base", "RUN base", &[])
        .feature("java", "RUN java", &["base"])
        .feature("maven", "RUN maven", &["java"])
}

fn depend_on(names: &[&str]) -> FeatureUpdate {
    FeatureUpdate {
        dependencies: Some(names.iter().map(ToString::to_string).collect()),
        ..FeatureUpdate::default()
    }
}

#[test]
fn blank_names_are_rejected() {
    let service = service(CatalogFixture::new());
    for name in ["", " ", "\t\n"] {
        assert!(matches!(service.create(NewFeature::named(name)), Err(CatalogError::EmptyName)));
    }
    assert!(service.list("").unwrap().is_empty());
}

#[test]
fn duplicate_names_are_case_sensitive() {
    let service = service(chain());
    assert!(matches!(
        service.create(NewFeature::named("java")),
        Err(CatalogError::DuplicateName { ref name }) if name == "java"
    ));
    assert!(service.create(NewFeature::named("Java")).is_ok());
}

#[test]
fn unknown_dependencies_are_listed_exactly() {
    let service = service(chain());
    let err = service.update("maven", depend_on(&["java", "node", "base", "ruby"])).unwrap_err();

    match err {
        CatalogError::UnresolvedNames {
            missing,
        } => assert_eq!(missing, vec!["node", "ruby"]),
        other => panic!("unexpected error: {other:?}"),
    }

    // Nothing changed
    let maven = service.get("maven").unwrap();
    let java = service.get("java").unwrap();
    assert_eq!(maven.dependencies.len(), 1);
    assert!(maven.depends_on(&java));
}

#[test]
fn transitive_cycles_name_the_offender() {
    let service = service(chain());
    let err = service.update("base", depend_on(&["maven"])).unwrap_err();

    match err {
        CatalogError::CyclicDependency {
            feature,
            offenders,
        } => {
            assert_eq!(feature, "base");
            assert_eq!(offenders, vec!["maven"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn every_offending_candidate_is_reported() {
    let service = service(chain().feature("tools", "RUN tools", &[]));
    let err = service.update("base", depend_on(&["maven", "tools", "java"])).unwrap_err();

    match err {
        CatalogError::CyclicDependency {
            offenders,
            ..
        } => assert_eq!(offenders, vec!["java", "maven"]),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn acyclic_updates_succeed() {
    let service = service(chain().feature("tools", "RUN tools", &[]));
    let updated = service.update("maven", depend_on(&["java", "tools"])).unwrap();
    assert_eq!(updated.dependencies.len(), 2);

    let cleared = service.update("maven", depend_on(&[])).unwrap();
    assert!(cleared.dependencies.is_empty());
}

#[test]
fn delete_is_blocked_by_every_kind_of_referencer() {
    let service = service(
        chain()
            .feature("gradle", "RUN gradle", &["java"])
            .container("backend", &["java"])
            .container("builder", &["java", "maven"]),
    );

    match service.delete("java").unwrap_err() {
        CatalogError::InUse {
            name,
            by_features,
            by_containers,
        } => {
            assert_eq!(name, "java");
            assert_eq!(by_features, vec!["gradle", "maven"]);
            assert_eq!(by_containers, vec!["backend", "builder"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(service.get("java").is_ok());
}

#[test]
fn unreferenced_features_delete_and_missing_ones_are_a_no_op() {
    let service = service(chain());
    let before = service.names().unwrap();

    assert!(!service.delete("python").unwrap());
    assert_eq!(service.names().unwrap(), before);

    assert!(service.delete("maven").unwrap());
    assert!(!service.delete("maven").unwrap());
    assert_eq!(service.names().unwrap(), vec!["base", "java"]);
}

#[test]
fn check_reports_hand_made_cycles() {
    let service = service(chain().raw_dependency("base", "maven"));
    let audit = service.check().unwrap();
    assert_eq!(audit.issues.len(), 1);
    assert_eq!(audit.feature_count, 3);
    assert!(audit.issues[0].to_string().contains("base"));
}
