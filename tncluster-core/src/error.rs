//! Error types for the tncluster core library.
//!
//! Each public error enum is paired with a stable, machine-readable code enum
//! so callers (and the CLI's structured logs) can match on failures without
//! parsing messages.

use std::{fmt, io};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced by [`crate::DisjointSet`] operations.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DisjointSetError {
    /// The entity was already present when [`crate::DisjointSet::add`] ran.
    #[error("entity `{key}` is already present in the disjoint set")]
    DuplicateKey {
        /// Rendered form of the offending entity.
        key: String,
    },
    /// The entity is not present in the disjoint set.
    #[error("entity `{key}` is not present in the disjoint set")]
    NotFound {
        /// Rendered form of the missing entity.
        key: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`DisjointSetError`] variants.
    enum DisjointSetErrorCode for DisjointSetError {
        /// The entity was already present.
        DuplicateKey => DuplicateKey { .. } => "DISJOINT_SET_DUPLICATE_KEY",
        /// The entity is not present.
        NotFound => NotFound { .. } => "DISJOINT_SET_NOT_FOUND",
    }
}

/// Error type produced while building a merge tree from distance triples.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TreeError {
    /// A triple carried a negative, NaN or infinite distance.
    #[error("distance {distance} at triple {index} must be finite and non-negative")]
    InvalidDistance {
        /// Zero-based position of the offending triple.
        index: usize,
        /// The rejected distance.
        distance: f64,
    },
    /// The triples were not sorted ascending by distance.
    #[error("triple {index} has distance {distance} below its predecessor {previous}")]
    UnsortedInput {
        /// Zero-based position of the first out-of-order triple.
        index: usize,
        /// Distance of the out-of-order triple.
        distance: f64,
        /// Distance of the triple preceding it.
        previous: f64,
    },
    /// The configured missing distance cannot root the forest.
    #[error(
        "missing distance {missing_distance} must be finite and exceed the maximum input distance {max_distance}"
    )]
    InvalidMissingDistance {
        /// Missing distance supplied by the caller.
        missing_distance: f64,
        /// Largest distance observed in the input.
        max_distance: f64,
    },
    /// Disjoint-set bookkeeping failed while merging clusters.
    #[error(transparent)]
    DisjointSet {
        /// Underlying disjoint-set failure.
        #[from]
        source: DisjointSetError,
    },
    /// Internal bookkeeping fell out of sync with the disjoint set.
    #[error("tree construction invariant violated: {invariant}")]
    InvariantViolation {
        /// Description of the violated invariant.
        invariant: &'static str,
    },
}

define_error_codes! {
    /// Stable codes describing [`TreeError`] variants.
    enum TreeErrorCode for TreeError {
        /// A triple carried an invalid distance.
        InvalidDistance => InvalidDistance { .. } => "TREE_INVALID_DISTANCE",
        /// The triples were not sorted ascending.
        UnsortedInput => UnsortedInput { .. } => "TREE_UNSORTED_INPUT",
        /// The missing distance cannot root the forest.
        InvalidMissingDistance => InvalidMissingDistance { .. } => "TREE_INVALID_MISSING_DISTANCE",
        /// Disjoint-set bookkeeping failed.
        DisjointSetFailure => DisjointSet { .. } => "TREE_DISJOINT_SET_FAILURE",
        /// Internal bookkeeping fell out of sync.
        InvariantViolation => InvariantViolation { .. } => "TREE_INVARIANT_VIOLATION",
    }
}

impl TreeError {
    /// Retrieve the inner [`DisjointSetErrorCode`] when the error originated in
    /// the disjoint set.
    pub const fn disjoint_set_code(&self) -> Option<DisjointSetErrorCode> {
        match self {
            Self::DisjointSet { source } => Some(source.code()),
            _ => None,
        }
    }

    /// Returns `true` when the error reports bad caller input or configuration
    /// rather than an internal defect.
    #[must_use]
    pub const fn is_invalid_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidDistance { .. }
                | Self::UnsortedInput { .. }
                | Self::InvalidMissingDistance { .. }
        )
    }
}

/// Error type produced while extracting clusters from a merge forest.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ExtractionError {
    /// A merge node was not bifurcating. Roots may have more than two
    /// children; every other merge node must have exactly two.
    #[error("merge node {node} has {children} children, which the threshold scan cannot resolve")]
    StructuralInvariantViolation {
        /// Arena index of the malformed node.
        node: usize,
        /// Number of children the node actually has.
        children: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`ExtractionError`] variants.
    enum ExtractionErrorCode for ExtractionError {
        /// An internal node was not bifurcating.
        StructuralInvariantViolation => StructuralInvariantViolation { .. } => "EXTRACTION_STRUCTURAL_INVARIANT_VIOLATION",
    }
}

/// Error type produced while parsing TN93 distance lists or Newick text.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ParseError {
    /// Reading the underlying stream failed.
    #[error("failed to read line {line}: {source}")]
    Io {
        /// One-based line number being read.
        line: usize,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A distance record did not have exactly three comma-separated columns.
    #[error("line {line} is not a `ID1,ID2,Distance` record: `{content}`")]
    MalformedLine {
        /// One-based line number of the record.
        line: usize,
        /// Trimmed content of the record.
        content: String,
    },
    /// A distance column was not a finite, non-negative number.
    #[error("line {line} has invalid distance `{raw}`")]
    InvalidDistance {
        /// One-based line number of the record.
        line: usize,
        /// Raw distance column.
        raw: String,
    },
    /// Newick text was malformed.
    #[error("malformed Newick at byte {position}: {reason}")]
    Newick {
        /// Byte offset where parsing failed.
        position: usize,
        /// Short description of the syntax problem.
        reason: &'static str,
    },
}

define_error_codes! {
    /// Stable codes describing [`ParseError`] variants.
    enum ParseErrorCode for ParseError {
        /// Reading the underlying stream failed.
        Io => Io { .. } => "PARSE_IO",
        /// A distance record was malformed.
        MalformedLine => MalformedLine { .. } => "PARSE_MALFORMED_LINE",
        /// A distance column was invalid.
        InvalidDistance => InvalidDistance { .. } => "PARSE_INVALID_DISTANCE",
        /// Newick text was malformed.
        Newick => Newick { .. } => "PARSE_NEWICK",
    }
}
