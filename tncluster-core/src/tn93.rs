//! Reader for TN93 pairwise distance lists.
//!
//! Each record is one `ID1,ID2,Distance` line. A record whose distance column
//! reads `Distance` is the header and is skipped, as are blank lines.

use std::io::BufRead;

use tracing::{Span, debug, field, instrument};

use crate::{
    error::ParseError,
    triple::{DistanceList, DistanceTriple},
};

const HEADER_DISTANCE: &str = "Distance";

/// Parses a TN93 distance list and sorts it ascending by distance.
///
/// Sorting is stable, so records with equal distances keep their file order.
///
/// # Errors
/// Returns [`ParseError::Io`] when reading fails,
/// [`ParseError::MalformedLine`] for records without exactly three columns,
/// and [`ParseError::InvalidDistance`] for distances that are not finite,
/// non-negative numbers. Line numbers are one-based.
///
/// # Examples
/// ```
/// use tncluster_core::parse_tn93;
///
/// let input = "ID1,ID2,Distance\nB,C,0.02\nA,B,0.01\n";
/// let list = parse_tn93(input.as_bytes())?;
/// assert_eq!(list.len(), 2);
/// assert_eq!(list.iter().next().map(|t| t.source().as_str()), Some("A"));
/// # Ok::<(), tncluster_core::ParseError>(())
/// ```
#[instrument(name = "tn93.parse", err, skip(reader), fields(records = field::Empty))]
pub fn parse_tn93<R: BufRead>(reader: R) -> Result<DistanceList<String>, ParseError> {
    let mut triples = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let line = line.map_err(|source| ParseError::Io {
            line: number,
            source,
        })?;
        if let Some(triple) = parse_record(number, &line)? {
            triples.push(triple);
        }
    }

    Span::current().record("records", triples.len());
    debug!(records = triples.len(), "distance list parsed");
    Ok(DistanceList::from_unsorted(triples))
}

fn parse_record(line: usize, raw: &str) -> Result<Option<DistanceTriple<String>>, ParseError> {
    let content = raw.trim();
    if content.is_empty() {
        return Ok(None);
    }
    let columns: Vec<&str> = content.split(',').map(str::trim).collect();
    let [source, target, distance] = columns.as_slice() else {
        return Err(ParseError::MalformedLine {
            line,
            content: content.to_owned(),
        });
    };
    if *distance == HEADER_DISTANCE {
        return Ok(None);
    }

    let value = distance
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .ok_or_else(|| ParseError::InvalidDistance {
            line,
            raw: (*distance).to_owned(),
        })?;
    Ok(Some(DistanceTriple::new(
        value,
        (*source).to_owned(),
        (*target).to_owned(),
    )))
}
