//! Seeded synthetic TN93-style distance lists.
//!
//! Entities are numbered `0..entity_count`. Each entity contributes `degree`
//! records to uniformly chosen partners, with distances quantised to
//! [`DISTANCE_STEPS`] levels so that equal merge heights occur often.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use thiserror::Error;
use tncluster_core::{DistanceList, DistanceTriple};

/// Number of distinct distance levels drawn by [`SyntheticDistances`].
pub const DISTANCE_STEPS: u32 = 1_024;

/// Configuration for [`SyntheticDistances::generate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyntheticConfig {
    /// Number of distinct entities.
    pub entity_count: u32,
    /// Number of records emitted per entity.
    pub degree: u32,
    /// Seed for the deterministic generator.
    pub seed: u64,
}

/// Errors raised while generating synthetic distances.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticError {
    /// Fewer than two entities were requested.
    #[error("at least two entities are required, got {entity_count}")]
    TooFewEntities {
        /// The requested entity count.
        entity_count: u32,
    },
    /// The requested record count does not fit in memory addressing.
    #[error("{entity_count} entities with degree {degree} overflow the record count")]
    RecordCountOverflow {
        /// The requested entity count.
        entity_count: u32,
        /// The requested degree.
        degree: u32,
    },
}

/// Generator for sorted synthetic distance lists.
#[derive(Clone, Debug)]
pub struct SyntheticDistances {
    list: DistanceList<u32>,
}

impl SyntheticDistances {
    /// Generates a distance list sorted ascending by distance.
    ///
    /// # Errors
    /// Returns [`SyntheticError`] when fewer than two entities are requested
    /// or the record count overflows `usize`.
    pub fn generate(config: &SyntheticConfig) -> Result<Self, SyntheticError> {
        if config.entity_count < 2 {
            return Err(SyntheticError::TooFewEntities {
                entity_count: config.entity_count,
            });
        }
        let capacity = usize::try_from(config.entity_count)
            .ok()
            .zip(usize::try_from(config.degree).ok())
            .and_then(|(entities, degree)| entities.checked_mul(degree))
            .ok_or(SyntheticError::RecordCountOverflow {
                entity_count: config.entity_count,
                degree: config.degree,
            })?;

        let mut rng = SmallRng::seed_from_u64(config.seed);
        let mut triples = Vec::with_capacity(capacity);
        for source in 0..config.entity_count {
            for _ in 0..config.degree {
                let target = rng.gen_range(0..config.entity_count);
                triples.push(DistanceTriple::new(quantised_distance(&mut rng), source, target));
            }
        }
        Ok(Self {
            list: DistanceList::from_unsorted(triples),
        })
    }

    /// Borrows the sorted list.
    #[must_use]
    pub const fn list(&self) -> &DistanceList<u32> {
        &self.list
    }

    /// Largest generated distance, or `None` when no records were drawn.
    #[must_use]
    pub fn max_distance(&self) -> Option<f64> {
        self.list.max_distance()
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "distances are integer steps scaled into the unit interval"
)]
fn quantised_distance(rng: &mut SmallRng) -> f64 {
    f64::from(rng.gen_range(0..DISTANCE_STEPS)) / f64::from(DISTANCE_STEPS)
}
