//! Configuration file and catalog location.

use assert_cmd::Command;
use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_config_supplies_base_image_and_author() {
    let project = TestProject::new();
    project.write_config("base_image = \"debian:bookworm-slim\"\nauthor = \"platform\"\n");

    project.run_ok(&["create", "curl", "--docker-data", "RUN apt-get install -y curl"]);
    project
        .dockcat()
        .args(["compose", "curl"])
        .assert()
        .success()
        .stdout("FROM debian:bookworm-slim\nRUN apt-get install -y curl\n");

    project
        .dockcat()
        .args(["compose", "curl", "--base-image", "alpine:3"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("FROM alpine:3\n"));

    let shown = project.run_ok(&["show", "curl", "--format", "json"]);
    assert!(shown.contains("\"author\": \"platform\""));
}

#[test]
fn test_invalid_config_is_reported() {
    let project = TestProject::new();
    project.write_config("base_image = [");

    project
        .dockcat()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn test_catalog_from_environment_and_config() {
    let project = TestProject::new();
    let env_catalog = project.dir().join("from-env.toml");
    let config_catalog = project.dir().join("from-config.toml");
    let config = project.write_file(
        "config.toml",
        &format!("catalog_path = {:?}\n", config_catalog.display().to_string()),
    );

    let mut cmd = Command::cargo_bin("dockcat").unwrap();
    cmd.current_dir(project.dir())
        .env("DOCKCAT_CONFIG", &config)
        .env_remove("DOCKCAT_CATALOG")
        .args(["create", "from-config"])
        .assert()
        .success();
    assert!(config_catalog.exists());

    let mut cmd = Command::cargo_bin("dockcat").unwrap();
    cmd.current_dir(project.dir())
        .env("DOCKCAT_CONFIG", &config)
        .env("DOCKCAT_CATALOG", &env_catalog)
        .args(["create", "from-env"])
        .assert()
        .success();
    assert!(env_catalog.exists());
    assert!(!std::fs::read_to_string(&config_catalog).unwrap().contains("from-env"));
}

#[test]
fn test_default_catalog_in_working_directory() {
    let project = TestProject::new();

    let mut cmd = Command::cargo_bin("dockcat").unwrap();
    cmd.current_dir(project.dir())
        .env("DOCKCAT_CONFIG", project.dir().join("missing-config.toml"))
        .env_remove("DOCKCAT_CATALOG")
        .args(["create", "local"])
        .assert()
        .success();

    assert!(project.dir().join("dockcat.toml").exists());
}
