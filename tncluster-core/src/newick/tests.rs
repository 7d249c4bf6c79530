//! Tests for Newick reading and writing.

use proptest::prelude::*;
use rstest::rstest;

use super::{parse_newick, write_newick};
use crate::{
    MergeForest, MergeTreeBuilder, NodeLabel, ParseError, ThresholdClusterer,
    test_utils::{scaled_triples_strategy, sorted_triples_strategy, suite_proptest_config, triples},
};

fn leaf_labels(forest: &MergeForest<String>) -> Vec<&str> {
    forest
        .roots()
        .iter()
        .flat_map(|&root| forest.leaves(root))
        .map(String::as_str)
        .collect()
}

#[test]
fn writes_one_line_per_root() {
    let forest = MergeTreeBuilder::new()
        .build(&triples(&[(1.0, "A", "B"), (2.0, "C", "D")]))
        .expect("fixture builds");
    assert_eq!(forest.to_newick_lines(), ["(A:1,B:1)1;", "(C:2,D:2)2;"]);
}

#[test]
fn writes_synthetic_root_with_every_component() {
    let forest = MergeTreeBuilder::new()
        .with_missing_distance(10.0)
        .build(&triples(&[(1.0, "A", "B"), (2.0, "C", "C")]))
        .expect("fixture builds");
    assert_eq!(forest.to_newick_lines(), ["((A:1,B:1)1:9,C:10)10;"]);
}

#[test]
fn writes_single_leaf_tree() {
    let forest = MergeTreeBuilder::new()
        .build(&triples(&[(0.0, "A", "A")]))
        .expect("fixture builds");
    assert_eq!(forest.to_newick_lines(), ["A;"]);
}

#[rstest]
#[case::space("has space", "'has space'")]
#[case::colon("a:b", "'a:b'")]
#[case::quote("o'neil", "'o''neil'")]
#[case::brackets("x[1]", "'x[1]'")]
#[case::plain("EPI_ISL_1.2", "EPI_ISL_1.2")]
fn quotes_labels_with_metacharacters(#[case] label: &'static str, #[case] rendered: &str) {
    let forest = MergeTreeBuilder::new()
        .build(&triples(&[(0.0, label, label)]))
        .expect("fixture builds");
    let newick = write_newick(&forest, forest.roots()[0]).expect("root exists");
    assert_eq!(newick, format!("{rendered};"));

    let parsed = parse_newick(&newick).expect("rendered Newick parses");
    assert_eq!(leaf_labels(&parsed), [label]);
}

#[test]
fn parses_heights_from_first_child() {
    let forest = parse_newick("((A:1,B:3)x:2,C:0.5)root;").expect("valid Newick");
    let root = forest.node(forest.roots()[0]).expect("root exists");
    assert_eq!(root.height(), 3.0);
    assert_eq!(root.edge_length(), None);

    let inner = forest.node(root.children()[0]).expect("inner exists");
    assert_eq!(inner.height(), 1.0);
    assert_eq!(inner.edge_length(), Some(2.0));
    assert_eq!(inner.label(), &NodeLabel::Merge(1.0));
    assert_eq!(leaf_labels(&forest), ["A", "B", "C"]);
}

#[test]
fn numeric_internal_labels_are_exact_heights() {
    // 0.0274 + 0.0685 lands just above 0.0959 in binary floating point, which
    // would split the first root off the tied merge height of the second.
    let text = "((A:0.0274,B:0.0274)0.0274:0.0685,C:0.0959)0.0959;\n(D:0.0959,E:0.0959)0.0959;";
    let forest = parse_newick(text).expect("valid Newick");
    let root = forest.node(forest.roots()[0]).expect("root exists");
    assert_eq!(root.height(), 0.0959);
    assert_eq!(root.label(), &NodeLabel::Merge(0.0959));

    let result = ThresholdClusterer::new()
        .extract(&forest)
        .expect("bifurcating trees");
    assert_eq!(result.threshold(), Some(0.0959));
    assert_eq!(result.clusters(), [vec!["A", "B", "C"], vec!["D", "E"]]);
}

#[rstest]
#[case::numeric("((A:1,B:1)4:2,C:3);", 4.0, 6.0)]
#[case::named("((A:1,B:1)x:2,C:3);", 1.0, 3.0)]
#[case::negative("((A:1,B:1)-4:2,C:3);", 1.0, 3.0)]
#[case::quoted_number("((A:1,B:1)'2.5':2,C:3);", 2.5, 4.5)]
fn internal_labels_fall_back_to_edge_sums(
    #[case] text: &str,
    #[case] inner_height: f64,
    #[case] root_height: f64,
) {
    let forest = parse_newick(text).expect("valid Newick");
    let root = forest.node(forest.roots()[0]).expect("root exists");
    let inner = forest.node(root.children()[0]).expect("inner exists");
    assert_eq!(inner.height(), inner_height);
    assert_eq!(root.height(), root_height);
}

#[test]
fn missing_edge_lengths_count_as_zero() {
    let forest = parse_newick("((A,B),C);").expect("valid Newick");
    let root = forest.node(forest.roots()[0]).expect("root exists");
    assert_eq!(root.height(), 0.0);
}

#[test]
fn parses_several_trees_with_comments_and_whitespace() {
    let forest = parse_newick("[first] (A:1, B:1)1;\n\n(C:2,\n D:2) [second];\n")
        .expect("valid Newick");
    assert_eq!(forest.roots().len(), 2);
    assert_eq!(leaf_labels(&forest), ["A", "B", "C", "D"]);
}

#[test]
fn parses_deep_caterpillar_without_recursion() {
    let depth = 20_000;
    let mut text = "(".repeat(depth);
    text.push_str("L0:1");
    for index in 1..=depth {
        text.push_str(&format!(",L{index}:1):1"));
    }
    text.push(';');
    let forest = parse_newick(&text).expect("deep tree parses");
    assert_eq!(forest.leaf_count(), depth + 1);
    let lines = forest.to_newick_lines();
    assert_eq!(lines.len(), 1);
}

#[rstest]
#[case::empty("", "no tree found")]
#[case::only_comment("[nothing]", "no tree found")]
#[case::missing_terminator("(A,B)", "unexpected end of input")]
#[case::unclosed("((A,B);", "unbalanced parentheses")]
#[case::extra_close("(A,B));", "unbalanced parentheses")]
#[case::top_level_comma("A,B;", "sibling outside parentheses")]
#[case::bad_length("(A:x,B);", "invalid edge length")]
#[case::infinite_length("(A:1e999,B);", "invalid edge length")]
#[case::open_quote("('A,B);", "unterminated quoted label")]
#[case::open_comment("(A,B)[;", "unterminated comment")]
fn rejects_malformed_newick(#[case] text: &str, #[case] expected: &str) {
    let err = parse_newick(text).expect_err("text is malformed");
    assert!(matches!(err, ParseError::Newick { reason, .. } if reason == expected));
    assert_eq!(err.code().as_str(), "PARSE_NEWICK");
}

proptest! {
    #![proptest_config(suite_proptest_config(64))]

    #[test]
    fn built_forests_survive_a_newick_round_trip(input in sorted_triples_strategy(12, 32)) {
        let forest = MergeTreeBuilder::new()
            .build(&input)
            .expect("generated input is valid");
        let text = forest.to_newick_lines().join("\n");
        prop_assume!(!text.is_empty());
        let parsed = parse_newick(&text).expect("rendered Newick parses");

        prop_assert_eq!(parsed.roots().len(), forest.roots().len());
        prop_assert_eq!(parsed.len(), forest.len());
        for (&original, &reparsed) in forest.roots().iter().zip(parsed.roots()) {
            let original = forest.node(original).expect("root exists");
            let reparsed = parsed.node(reparsed).expect("root exists");
            prop_assert!((original.height() - reparsed.height()).abs() < 1e-9);
        }
        prop_assert_eq!(parsed.to_newick_lines(), forest.to_newick_lines());
    }

    #[test]
    fn extraction_is_unchanged_by_a_newick_round_trip(
        input in scaled_triples_strategy(12, 32, 0.0137),
    ) {
        let forest = MergeTreeBuilder::new()
            .build(&input)
            .expect("generated input is valid");
        let text = forest.to_newick_lines().join("\n");
        prop_assume!(!text.is_empty());
        let parsed = parse_newick(&text).expect("rendered Newick parses");

        let clusterer = ThresholdClusterer::new();
        let direct = clusterer.extract(&forest).expect("built forests are binary");
        let reread = clusterer.extract(&parsed).expect("parsed forests are binary");

        let direct_clusters: Vec<Vec<String>> = direct
            .clusters()
            .iter()
            .map(|cluster| cluster.iter().map(ToString::to_string).collect())
            .collect();
        prop_assert_eq!(reread.threshold(), direct.threshold());
        prop_assert_eq!(reread.clusters(), direct_clusters.as_slice());
    }
}
