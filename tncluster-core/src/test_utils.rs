//! Shared test utilities for `tncluster-core`.

use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use tncluster_test_support::ci::property_test_profile::ProptestRunProfile;

use crate::DistanceTriple;

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PROGTEST_CASES` and
/// `TNCLUSTER_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Builds triples from `(distance, source, target)` tuples without sorting.
#[must_use]
pub(crate) fn triples(
    records: &[(f64, &'static str, &'static str)],
) -> Vec<DistanceTriple<&'static str>> {
    records
        .iter()
        .map(|&(distance, source, target)| DistanceTriple::new(distance, source, target))
        .collect()
}

/// Generates sorted triples over a small entity pool.
///
/// Distances are drawn from a coarse grid so equal distances are common,
/// and self-pairs or repeated pairs appear often enough to exercise the
/// paths that ignore them.
pub(crate) fn sorted_triples_strategy(
    max_entities: u32,
    max_triples: usize,
) -> impl Strategy<Value = Vec<DistanceTriple<u32>>> {
    scaled_triples_strategy(max_entities, max_triples, 0.25)
}

/// Like [`sorted_triples_strategy`], with distances on a grid of `unit`.
///
/// A unit with no exact binary form (such as `0.0137`) makes sums of edge
/// lengths drift away from the merge heights they should reproduce.
pub(crate) fn scaled_triples_strategy(
    max_entities: u32,
    max_triples: usize,
    unit: f64,
) -> impl Strategy<Value = Vec<DistanceTriple<u32>>> {
    prop::collection::vec(
        (0..max_entities, 0..max_entities, 0u32..12),
        0..=max_triples,
    )
    .prop_map(move |records| {
        let mut triples: Vec<_> = records
            .into_iter()
            .map(|(source, target, step)| {
                DistanceTriple::new(f64::from(step) * unit, source, target)
            })
            .collect();
        triples.sort_by(|left, right| left.distance().total_cmp(&right.distance()));
        triples
    })
}
