//! Common test utilities for dockcat integration tests

// Not every suite uses every helper
#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding a catalog file and a config file.
///
/// Commands built with [`TestProject::dockcat`] always pass `--catalog` and
/// `--config` so tests never read the user's real configuration.
pub struct TestProject {
    temp: TempDir,
    catalog: PathBuf,
    config: PathBuf,
}

impl TestProject {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let catalog = temp.path().join("dockcat.toml");
        let config = temp.path().join("config.toml");
        Self {
            temp,
            catalog,
            config,
        }
    }

    pub fn dir(&self) -> &Path {
        self.temp.path()
    }

    pub fn catalog_path(&self) -> &Path {
        &self.catalog
    }

    pub fn write_config(&self, content: &str) {
        std::fs::write(&self.config, content).unwrap();
    }

    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn read_catalog(&self) -> String {
        std::fs::read_to_string(&self.catalog).unwrap()
    }

    /// `dockcat` bound to this project's catalog and config.
    pub fn dockcat(&self) -> Command {
        let mut cmd = Command::cargo_bin("dockcat").unwrap();
        cmd.current_dir(self.temp.path())
            .env_remove("DOCKCAT_CATALOG")
            .env_remove("DOCKCAT_CONFIG")
            .env_remove("RUST_LOG")
            .arg("--catalog")
            .arg(&self.catalog)
            .arg("--config")
            .arg(&self.config);
        cmd
    }

    /// Run `dockcat` with `args` and assert success.
    pub fn run_ok(&self, args: &[&str]) -> String {
        let output = self.dockcat().args(args).output().unwrap();
        assert!(
            output.status.success(),
            "dockcat {args:?} failed:\n{}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    }
}
