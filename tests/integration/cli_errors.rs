//! Validation failures surface as non-zero exits with an `error:` line.

use predicates::prelude::*;

use crate::common::TestProject;

fn seeded() -> TestProject {
    let project = TestProject::new();
    project.run_ok(&["create", "java", "--docker-data", "RUN java"]);
    project.run_ok(&["create", "maven", "--docker-data", "RUN maven", "--depends-on", "java"]);
    project
}

#[test]
fn test_blank_name() {
    let project = TestProject::new();
    project
        .dockcat()
        .args(["create", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("Feature name is empty"));
    assert!(!project.catalog_path().exists());
}

#[test]
fn test_duplicate_name() {
    let project = seeded();
    project
        .dockcat()
        .args(["create", "java"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Feature with name 'java' already exists"));
}

#[test]
fn test_unknown_dependencies_are_all_listed_with_hints() {
    let project = seeded();
    let before = project.read_catalog();

    project
        .dockcat()
        .args(["create", "gradle", "--depends-on", "jav,kotlin,java"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to find features with names: jav, kotlin"))
        .stderr(predicate::str::contains("Did you mean: 'jav' -> java"));

    assert_eq!(project.read_catalog(), before);
}

#[test]
fn test_blank_dependency_names_are_rejected() {
    let project = seeded();
    let before = project.read_catalog();

    project
        .dockcat()
        .args(["create", "gradle", "--depends-on", "java,"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Empty feature name in --depends-on 'java,'"));
    project
        .dockcat()
        .args(["update", "maven", "--depends-on", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Empty feature name in --depends-on"));

    assert_eq!(project.read_catalog(), before);
}

#[test]
fn test_delete_of_missing_feature_creates_no_catalog() {
    let project = TestProject::new();
    project
        .dockcat()
        .args(["delete", "ghost"])
        .assert()
        .success()
        .stdout(predicate::str::contains("does not exist"));
    assert!(!project.catalog_path().exists());
}

#[test]
fn test_cycle_is_rejected_and_catalog_untouched() {
    let project = seeded();
    let before = project.read_catalog();

    project
        .dockcat()
        .args(["update", "java", "--depends-on", "maven"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Recursive dependencies found for 'java': maven"));

    assert_eq!(project.read_catalog(), before);
}

#[test]
fn test_delete_in_use() {
    let project = seeded();
    project
        .dockcat()
        .args(["delete", "java"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("references found: maven"));
}

#[test]
fn test_delete_blocked_by_hand_written_container() {
    let project = TestProject::new();
    std::fs::write(
        project.catalog_path(),
        r#"
[[features]]
id = 1
name = "java"
updated_at = "2026-01-01T00:00:00Z"

[[containers]]
id = 1
name = "ci-runner"
features = [1]
"#,
    )
    .unwrap();

    project
        .dockcat()
        .args(["delete", "java"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("references from containers found: ci-runner"));
}

#[test]
fn test_compose_unknown_feature() {
    let project = seeded();
    project
        .dockcat()
        .args(["compose", "maven", "python"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("python"));
}

#[test]
fn test_show_missing_suggests_close_name() {
    let project = seeded();
    project
        .dockcat()
        .args(["show", "mavn"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Feature with name 'mavn' is not found"))
        .stderr(predicate::str::contains("maven"));
}

#[test]
fn test_update_without_changes() {
    let project = seeded();
    project
        .dockcat()
        .args(["update", "java"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to update"));
}

#[test]
fn test_check_reports_hand_edited_cycle() {
    let project = TestProject::new();
    std::fs::write(
        project.catalog_path(),
        r#"
[[features]]
id = 1
name = "a"
dependencies = [2]

[[features]]
id = 2
name = "b"
dependencies = [1]

[[features]]
id = 3
name = "c"
dependencies = [9]
"#,
    )
    .unwrap();

    project
        .dockcat()
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains("circular dependency"))
        .stdout(predicate::str::contains("depends on missing feature #9"))
        .stderr(predicate::str::contains("2 integrity problem(s)"));

    project
        .dockcat()
        .args(["compose", "a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Recursive dependencies"));
}

#[test]
fn test_invalid_catalog_file() {
    let project = TestProject::new();
    std::fs::write(project.catalog_path(), "[[features]\nname =").unwrap();

    project
        .dockcat()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid catalog file syntax"));
}
