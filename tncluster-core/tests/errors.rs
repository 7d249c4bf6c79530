use tncluster_core::{
    DisjointSetError, DisjointSetErrorCode, ExtractionError, ExtractionErrorCode, ParseError,
    ParseErrorCode, TreeError, TreeErrorCode,
};
use rstest::rstest;

#[rstest]
#[case(
    DisjointSetError::DuplicateKey { key: "a".to_owned() },
    DisjointSetErrorCode::DuplicateKey,
    "DISJOINT_SET_DUPLICATE_KEY",
)]
#[case(
    DisjointSetError::NotFound { key: "a".to_owned() },
    DisjointSetErrorCode::NotFound,
    "DISJOINT_SET_NOT_FOUND",
)]
fn returns_expected_disjoint_set_code(
    #[case] error: DisjointSetError,
    #[case] expected: DisjointSetErrorCode,
    #[case] rendered: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), rendered);
    assert_eq!(expected.to_string(), rendered);
}

#[rstest]
#[case(
    TreeError::InvalidDistance { index: 0, distance: -1.0 },
    TreeErrorCode::InvalidDistance,
    None,
    true,
)]
#[case(
    TreeError::UnsortedInput { index: 1, distance: 0.5, previous: 1.0 },
    TreeErrorCode::UnsortedInput,
    None,
    true,
)]
#[case(
    TreeError::InvalidMissingDistance { missing_distance: 1.0, max_distance: 2.0 },
    TreeErrorCode::InvalidMissingDistance,
    None,
    true,
)]
#[case(
    TreeError::from(DisjointSetError::NotFound { key: "z".to_owned() }),
    TreeErrorCode::DisjointSetFailure,
    Some(DisjointSetErrorCode::NotFound),
    false,
)]
#[case(
    TreeError::InvariantViolation { invariant: "roots" },
    TreeErrorCode::InvariantViolation,
    None,
    false,
)]
fn returns_expected_tree_code(
    #[case] error: TreeError,
    #[case] expected: TreeErrorCode,
    #[case] inner: Option<DisjointSetErrorCode>,
    #[case] invalid_configuration: bool,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.disjoint_set_code(), inner);
    assert_eq!(error.is_invalid_configuration(), invalid_configuration);
}

#[test]
fn wrapped_disjoint_set_error_keeps_its_message() {
    let error = TreeError::from(DisjointSetError::DuplicateKey { key: "a".to_owned() });
    assert_eq!(
        error.to_string(),
        "entity `a` is already present in the disjoint set"
    );
}

#[test]
fn extraction_code_is_stable() {
    let error = ExtractionError::StructuralInvariantViolation { node: 4, children: 3 };
    assert_eq!(error.code(), ExtractionErrorCode::StructuralInvariantViolation);
    assert_eq!(
        error.code().as_str(),
        "EXTRACTION_STRUCTURAL_INVARIANT_VIOLATION"
    );
}

#[rstest]
#[case(
    ParseError::MalformedLine { line: 3, content: "x".to_owned() },
    ParseErrorCode::MalformedLine,
)]
#[case(
    ParseError::InvalidDistance { line: 1, raw: "x".to_owned() },
    ParseErrorCode::InvalidDistance,
)]
#[case(
    ParseError::Newick { position: 0, reason: "no tree found" },
    ParseErrorCode::Newick,
)]
#[case(
    ParseError::Io { line: 1, source: std::io::Error::other("boom") },
    ParseErrorCode::Io,
)]
fn returns_expected_parse_code(#[case] error: ParseError, #[case] expected: ParseErrorCode) {
    assert_eq!(error.code(), expected);
}
