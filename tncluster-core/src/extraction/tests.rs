//! Unit and property tests for threshold extraction.

use std::collections::BTreeSet;

use proptest::prelude::*;
use rstest::rstest;
use tncluster_test_support::tracing::capture;
use tracing::Level;

use super::cut::cut_forest;
use crate::{
    ClusterAssignment, ClusterId, ExtractionError, MergeForest, MergeTreeBuilder,
    ThresholdClusterer, parse_newick,
    test_utils::{sorted_triples_strategy, suite_proptest_config, triples},
};

fn build(
    records: &[(f64, &'static str, &'static str)],
    missing: Option<f64>,
) -> MergeForest<&'static str> {
    let builder = missing.map_or_else(MergeTreeBuilder::new, |distance| {
        MergeTreeBuilder::new().with_missing_distance(distance)
    });
    builder.build(&triples(records)).expect("fixture builds")
}

fn chain() -> MergeForest<&'static str> {
    build(&[(1.0, "A", "B"), (2.0, "B", "C"), (5.0, "C", "D")], None)
}

fn non_singletons<K>(clusters: &[Vec<K>]) -> usize {
    clusters.iter().filter(|cluster| cluster.len() > 1).count()
}

#[rstest]
#[case::below_first_merge(0.5, vec![vec!["D"], vec!["C"], vec!["A"], vec!["B"]])]
#[case::at_first_merge(1.0, vec![vec!["D"], vec!["A", "B"], vec!["C"]])]
#[case::at_second_merge(2.0, vec![vec!["A", "B", "C"], vec!["D"]])]
#[case::at_root(5.0, vec![vec!["A", "B", "C", "D"]])]
fn cut_splits_merges_above_threshold(
    #[case] threshold: f64,
    #[case] expected: Vec<Vec<&'static str>>,
) {
    assert_eq!(cut_forest(&chain(), Some(threshold)), expected);
}

#[test]
fn chain_picks_first_merge_and_reports_singletons() {
    let result = ThresholdClusterer::new()
        .extract(&chain())
        .expect("chain is bifurcating");
    assert_eq!(result.threshold(), Some(1.0));
    assert_eq!(result.non_singleton_count(), 1);

    let assignments: Vec<_> = result
        .assignments()
        .map(|(entity, assignment)| (*entity, assignment))
        .collect();
    assert_eq!(
        assignments,
        [
            ("D", ClusterAssignment::Singleton),
            ("A", ClusterAssignment::Cluster(ClusterId::new(1))),
            ("B", ClusterAssignment::Cluster(ClusterId::new(1))),
            ("C", ClusterAssignment::Singleton),
        ]
    );
}

#[rstest]
#[case::joined(vec![(1.0, "A", "B"), (1.5, "C", "D"), (4.0, "B", "C")], None, 1.5)]
#[case::disconnected(vec![(1.0, "A", "B"), (1.0, "C", "D")], None, 1.0)]
#[case::synthetic_root(vec![(1.0, "A", "B"), (1.0, "C", "D")], Some(10.0), 1.0)]
fn two_pairs_become_two_clusters(
    #[case] records: Vec<(f64, &'static str, &'static str)>,
    #[case] missing: Option<f64>,
    #[case] threshold: f64,
) {
    let result = ThresholdClusterer::new()
        .extract(&build(&records, missing))
        .expect("fixture is bifurcating");
    assert_eq!(result.threshold(), Some(threshold));
    assert_eq!(result.clusters(), [vec!["A", "B"], vec!["C", "D"]]);
}

#[test]
fn tied_counts_keep_the_lowest_threshold() {
    let forest = build(
        &[(1.0, "A", "B"), (2.0, "C", "D"), (3.0, "B", "C"), (4.0, "E", "F")],
        None,
    );
    let result = ThresholdClusterer::new()
        .extract(&forest)
        .expect("fixture is bifurcating");
    assert_eq!(result.threshold(), Some(2.0));
    assert_eq!(
        result.clusters(),
        [vec!["A", "B"], vec!["C", "D"], vec!["E"], vec!["F"]]
    );
}

#[test]
fn lone_leaf_roots_are_reported_as_singletons() {
    let forest = build(&[(0.0, "E", "E"), (1.0, "A", "B")], None);
    let result = ThresholdClusterer::new()
        .extract(&forest)
        .expect("fixture is bifurcating");
    assert_eq!(result.clusters(), [vec!["E"], vec!["A", "B"]]);
}

#[rstest]
#[case::empty(build(&[], None), 0)]
#[case::single_leaf(build(&[(0.0, "A", "A")], None), 1)]
fn forests_without_merges_have_no_threshold(
    #[case] forest: MergeForest<&'static str>,
    #[case] entities: usize,
) {
    let result = ThresholdClusterer::new()
        .extract(&forest)
        .expect("nothing to validate");
    assert_eq!(result.threshold(), None);
    assert_eq!(result.non_singleton_count(), 0);
    assert_eq!(result.entity_count(), entities);
}

#[rstest]
#[case::inner_polytomy("((A,B,C):1,D);", 3)]
#[case::unary_root("(A);", 1)]
#[case::unary_inner("((A):1,B);", 1)]
fn rejects_non_bifurcating_merges(#[case] newick: &str, #[case] children: usize) {
    let forest = parse_newick(newick).expect("valid Newick");
    let err = ThresholdClusterer::new()
        .extract(&forest)
        .expect_err("shape is invalid");
    assert!(matches!(
        err,
        ExtractionError::StructuralInvariantViolation { children: found, .. } if found == children
    ));
    assert_eq!(
        err.code().as_str(),
        "EXTRACTION_STRUCTURAL_INVARIANT_VIOLATION"
    );
}

#[test]
fn accepts_polytomy_at_the_root() {
    let forest = parse_newick("(A,B,C);").expect("valid Newick");
    let result = ThresholdClusterer::new()
        .extract(&forest)
        .expect("root polytomy is allowed");
    assert_eq!(result.threshold(), Some(0.0));
    assert_eq!(result.clusters(), [vec!["A", "B", "C"]]);
}

#[test]
fn extracts_from_parsed_newick_heights() {
    let forest =
        parse_newick("((A:1,B:1)1:2,(C:1.5,D:1.5)1.5:1.5)3;").expect("valid Newick");
    let result = ThresholdClusterer::new()
        .extract(&forest)
        .expect("parsed tree is bifurcating");
    assert_eq!(result.threshold(), Some(1.5));
    assert_eq!(result.clusters(), [vec!["A", "B"], vec!["C", "D"]]);
}

#[rstest]
#[case::verbose(true, Level::INFO)]
#[case::quiet(false, Level::DEBUG)]
fn reports_threshold_event_at_verbosity_level(#[case] verbose: bool, #[case] level: Level) {
    let forest = build(&[(1.0, "A", "B"), (1.5, "C", "D"), (4.0, "B", "C")], None);
    let (result, recording) = capture(|| {
        ThresholdClusterer::new()
            .with_verbose(verbose)
            .extract(&forest)
    });
    result.expect("fixture is bifurcating");

    let event = recording
        .event("optimal threshold selected")
        .expect("summary event emitted");
    assert_eq!(event.level, level);
    assert_eq!(event.field("threshold"), Some("Some(1.5)"));
    assert_eq!(event.field("non_singleton_clusters"), Some("2"));

    let span = recording.span("clusters.extract").expect("span closed");
    assert_eq!(span.field("threshold"), Some("1.5"));
    assert_eq!(span.field("mode"), Some("max_non_singleton"));
}

fn merge_heights<K>(forest: &MergeForest<K>) -> Vec<f64> {
    forest
        .nodes()
        .filter(|(_, node)| !node.is_leaf())
        .map(|(_, node)| node.height())
        .collect()
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn clusters_partition_every_entity(
        input in sorted_triples_strategy(16, 48),
        rooted in any::<bool>(),
    ) {
        let builder = if rooted {
            MergeTreeBuilder::new().with_missing_distance(50.0)
        } else {
            MergeTreeBuilder::new()
        };
        let forest = builder.build(&input).expect("generated input is valid");
        let result = ThresholdClusterer::new()
            .extract(&forest)
            .expect("built forests are bifurcating");

        let expected: BTreeSet<u32> = input
            .iter()
            .flat_map(|triple| [*triple.source(), *triple.target()])
            .collect();
        let mut seen = BTreeSet::new();
        for (entity, _) in result.assignments() {
            prop_assert!(seen.insert(*entity), "entity {} assigned twice", entity);
        }
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn chosen_threshold_is_optimal_over_merge_heights(
        input in sorted_triples_strategy(16, 48),
        rooted in any::<bool>(),
    ) {
        let builder = if rooted {
            MergeTreeBuilder::new().with_missing_distance(50.0)
        } else {
            MergeTreeBuilder::new()
        };
        let forest = builder.build(&input).expect("generated input is valid");
        let result = ThresholdClusterer::new()
            .extract(&forest)
            .expect("built forests are bifurcating");

        let best = result.non_singleton_count();
        for height in merge_heights(&forest) {
            let count = non_singletons(&cut_forest(&forest, Some(height)));
            prop_assert!(count <= best, "cut at {} gives {} > {}", height, count, best);
            if count == best {
                let chosen = result.threshold().expect("merges exist");
                prop_assert!(chosen <= height);
            }
        }
    }
}
