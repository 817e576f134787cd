//! Composition determinism and ordering.

use dockcat_cli::compose::{ComposeOptions, compose};
use dockcat_cli::test_utils::CatalogFixture;

fn web_stack() -> dockcat_cli::store::CatalogData {
    CatalogFixture::new()
        .feature("os-packages", "RUN apt-get update", &[])
        .feature("java", "RUN apt-get install -y openjdk-17-jdk", &["os-packages"])
        .feature("node", "RUN apt-get install -y nodejs", &["os-packages"])
        .feature("maven", "RUN apt-get install -y maven", &["java"])
        .feature("gradle", "RUN install-gradle", &["java"])
        .feature("frontend", "RUN npm install -g pnpm", &["node"])
        .feature("fullstack", "", &["maven", "frontend"])
        .test_snippet("java", "java -version")
        .test_snippet("node", "node --version")
        .build()
}

fn permutations(items: &[&str]) -> Vec<Vec<String>> {
    if items.len() <= 1 {
        return vec![items.iter().map(ToString::to_string).collect()];
    }
    let mut result = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head.to_string());
            result.push(tail);
        }
    }
    result
}

#[test]
fn every_request_order_gives_identical_output() {
    let data = web_stack();
    let options = ComposeOptions {
        base_image: Some("ubuntu:24.04".to_string()),
    };

    let requests = permutations(&["gradle", "frontend", "maven", "node"]);
    let first = compose(&data, &requests[0], &options).unwrap();
    for request in &requests[1..] {
        let artifact = compose(&data, request, &options).unwrap();
        assert_eq!(artifact.dockerfile.as_bytes(), first.dockerfile.as_bytes());
        assert_eq!(artifact.test_script, first.test_script);
    }
}

#[test]
fn dependencies_come_first_and_nothing_repeats() {
    let data = web_stack();
    let artifact = compose(&data, ["fullstack", "gradle"], &ComposeOptions::default()).unwrap();

    assert_eq!(
        artifact.features,
        vec!["os-packages", "java", "gradle", "maven", "node", "frontend", "fullstack"]
    );
    assert_eq!(artifact.dockerfile.matches("RUN apt-get update").count(), 1);
    // fullstack has an empty fragment and contributes no block
    assert_eq!(artifact.dockerfile.lines().count(), 6);
    assert_eq!(artifact.test_script.as_deref(), Some("java -version\nnode --version\n"));
}

#[test]
fn composing_a_leaf_includes_only_the_leaf() {
    let data = web_stack();
    let artifact = compose(&data, ["os-packages"], &ComposeOptions::default()).unwrap();
    assert_eq!(artifact.features, vec!["os-packages"]);
    assert_eq!(artifact.dockerfile, "RUN apt-get update\n");
    assert!(artifact.test_script.is_none());
}

#[test]
fn independent_features_render_in_name_order() {
    let data = CatalogFixture::new()
        .feature("zsh", "RUN zsh", &[])
        .feature("curl", "RUN curl", &[])
        .feature("make", "RUN make", &[])
        .build();

    let artifact = compose(&data, ["zsh", "make", "curl"], &ComposeOptions::default()).unwrap();
    assert_eq!(artifact.dockerfile, "RUN curl\nRUN make\nRUN zsh\n");
}
