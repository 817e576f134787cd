//! Graph algorithms over generated DAGs.
//!
//! Graphs come from a fixed-seed generator, so every run checks the same
//! few hundred shapes.

use std::collections::{BTreeSet, HashSet};

use dockcat_cli::core::{Feature, FeatureId};
use dockcat_cli::graph::{FeatureGraph, check_acyclic};

/// Linear congruential generator; enough to vary graph shapes.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    fn chance(&mut self, percent: u64) -> bool {
        self.next() % 100 < percent
    }
}

/// A DAG where edges only point from higher to lower ids.
fn random_dag(rng: &mut Lcg, size: u64) -> Vec<Feature> {
    (1..=size)
        .map(|id| {
            let mut feature = Feature::new(format!("f{:02}", rng.next() % 100));
            feature.name = format!("{}-{id}", feature.name);
            feature.id = Some(FeatureId(id));
            for dep in 1..id {
                if rng.chance(30) {
                    feature.dependencies.insert(FeatureId(dep));
                }
            }
            feature
        })
        .collect()
}

/// Reference reachability by plain DFS over the feature list.
fn reachable(features: &[Feature], from: FeatureId, target: FeatureId) -> bool {
    let mut stack = vec![from];
    let mut seen = HashSet::new();
    while let Some(id) = stack.pop() {
        if id == target {
            return true;
        }
        if !seen.insert(id) {
            continue;
        }
        if let Some(feature) = features.iter().find(|f| f.id == Some(id)) {
            stack.extend(feature.dependencies.iter().copied());
        }
    }
    false
}

#[test]
fn topological_order_respects_every_edge() {
    let mut rng = Lcg(7);
    for _ in 0..100 {
        let size = 1 + rng.next() % 12;
        let features = random_dag(&mut rng, size);
        let graph = FeatureGraph::from_features(&features);
        let all: BTreeSet<FeatureId> = features.iter().filter_map(|f| f.id).collect();

        let order = graph.topological_order(&all).unwrap();
        assert_eq!(order.len(), features.len());

        let position = |id: &FeatureId| order.iter().position(|o| o == id).unwrap();
        for feature in &features {
            let me = position(&feature.id.unwrap());
            for dep in &feature.dependencies {
                assert!(position(dep) < me, "{} must follow its dependencies", feature.name);
            }
        }
    }
}

#[test]
fn closure_matches_reference_reachability() {
    let mut rng = Lcg(11);
    for _ in 0..100 {
        let size = 1 + rng.next() % 10;
        let features = random_dag(&mut rng, size);
        let graph = FeatureGraph::from_features(&features);

        let root = FeatureId(1 + rng.next() % size);
        let closure = graph.closure([root]);
        for feature in &features {
            let id = feature.id.unwrap();
            assert_eq!(closure.contains(&id), reachable(&features, root, id));
        }
    }
}

#[test]
fn check_acyclic_fails_exactly_when_a_path_leads_back() {
    let mut rng = Lcg(23);
    for _ in 0..150 {
        let size = 2 + rng.next() % 8;
        let features = random_dag(&mut rng, size);
        let graph = FeatureGraph::from_features(&features);

        let subject = &features[(rng.next() % size) as usize];
        let candidates: Vec<Feature> =
            features.iter().filter(|_| rng.chance(40)).cloned().collect();

        let expected: BTreeSet<String> = candidates
            .iter()
            .filter(|c| reachable(&features, c.id.unwrap(), subject.id.unwrap()))
            .map(|c| c.name.clone())
            .collect();

        match check_acyclic(subject, &candidates, &graph) {
            Ok(()) => assert!(expected.is_empty()),
            Err(dockcat_cli::core::CatalogError::CyclicDependency {
                offenders,
                ..
            }) => assert_eq!(offenders, expected.into_iter().collect::<Vec<_>>()),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn generated_dags_have_no_cycles_until_one_is_added() {
    let mut rng = Lcg(31);
    for _ in 0..50 {
        let size = 2 + rng.next() % 8;
        let mut features = random_dag(&mut rng, size);
        assert!(FeatureGraph::from_features(&features).detect_cycles().is_none());

        // Lowest feature now depends on the highest: a cycle when a path exists
        let top = features[features.len() - 1].id.unwrap();
        let bottom = features[0].id.unwrap();
        let closes = reachable(&features, top, bottom);
        features[0].dependencies.insert(top);

        let detected = FeatureGraph::from_features(&features).detect_cycles().is_some();
        assert_eq!(detected, closes);
    }
}
