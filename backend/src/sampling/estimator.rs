//! Monte Carlo search for the worst-represented coalition
//!
//! For a subset `T` of entities
//!
//! ```text
//! alpha(T) = (seats(T) / S) / (population(T) / P)
//! ```
//!
//! Enumerating all `2^n - 2` proper subsets is out of reach beyond ~30
//! entities, so the estimator draws random subsets and keeps the smallest
//! alpha it sees.
//!
//! # Approximation
//!
//! The result is an upper bound on the true minimum: a worse coalition may
//! exist that was never drawn. More samples can only lower (never raise) the
//! estimate for a fixed seed.
//!
//! # Filtering
//!
//! A drawn subset is skipped when it is empty, when it contains every entity,
//! or when its population share is at most `MIN_POPULATION_SHARE`.
//!
//! # Parallelism
//!
//! The sample budget is cut into fixed-size chunks. Chunk `i` draws from its
//! own `RngManager` seeded with `derive_seed(seed, i)` and the chunk minima
//! are reduced on the rayon pool (ties go to the lower chunk). The estimate
//! therefore depends only on the configuration, never on the thread count.

use super::config::{InclusionMode, SamplerConfig};
use crate::models::EntityTable;
use crate::rng::{derive_seed, RngManager};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Subsets whose population share is at or below this are skipped
pub const MIN_POPULATION_SHARE: f64 = 0.0001;

/// Draws between two deadline checks
const DEADLINE_CHECK_INTERVAL: u64 = 4096;

/// Errors that can occur before sampling starts
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SamplingError {
    #[error("Cannot sample an empty entity table")]
    EmptyTable,

    #[error("Total seats must be positive")]
    NonPositiveSeats,

    #[error("Total population is zero")]
    ZeroPopulation,

    #[error("Total population does not fit in 64 bits")]
    PopulationOverflow,

    #[error("Table is not apportioned: {assigned} seats assigned, expected {expected}")]
    Unapportioned { assigned: u64, expected: u64 },

    #[error("Inclusion threshold {0} is outside [0, 1]")]
    InvalidThreshold(f64),

    #[error("Sample count must be positive")]
    ZeroSamples,
}

/// The worst coalition found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coalition {
    /// Member IDs in table order
    pub members: Vec<String>,

    /// Fraction of total population held by the members
    pub population_share: f64,

    /// Fraction of total seats held by the members
    pub seat_share: f64,
}

impl Coalition {
    /// seat_share / population_share
    pub fn alpha(&self) -> f64 {
        self.seat_share / self.population_share
    }
}

/// Result of a sampling run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistortionEstimate {
    /// Smallest alpha observed, starting from 1.0
    pub alpha: f64,

    /// Coalition achieving `alpha`; `None` if no subset beat 1.0
    pub worst: Option<Coalition>,

    /// Subsets drawn (below the request if a time budget ran out)
    pub samples_drawn: u64,

    /// Subsets that passed filtering
    pub samples_accepted: u64,

    /// Inclusion rule used
    pub mode: InclusionMode,
}

/// Column view of an apportioned table, validated once for many draws
#[derive(Debug, Clone)]
pub struct SubsetSampler {
    ids: Vec<String>,
    populations: Vec<u64>,
    seats: Vec<u64>,
    total_population: u64,
    total_seats: u64,
}

/// Best result of one sequential run
#[derive(Debug, Clone)]
struct ChunkOutcome {
    chunk: u64,
    alpha: f64,
    members: Vec<usize>,
    population_share: f64,
    seat_share: f64,
    drawn: u64,
    accepted: u64,
}

impl ChunkOutcome {
    fn empty(chunk: u64) -> Self {
        Self {
            chunk,
            alpha: 1.0,
            members: Vec::new(),
            population_share: 0.0,
            seat_share: 0.0,
            drawn: 0,
            accepted: 0,
        }
    }

    /// Combine two outcomes: lower alpha wins, ties go to the lower chunk
    fn merge(self, other: Self) -> Self {
        let drawn = self.drawn + other.drawn;
        let accepted = self.accepted + other.accepted;
        let self_wins = match self.alpha.total_cmp(&other.alpha) {
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Greater => false,
            std::cmp::Ordering::Equal => self.chunk <= other.chunk,
        };
        let mut best = if self_wins { self } else { other };
        best.drawn = drawn;
        best.accepted = accepted;
        best
    }
}

impl SubsetSampler {
    /// Validate `table` against `total_seats` and capture its columns
    pub fn new(table: &EntityTable, total_seats: u64) -> Result<Self, SamplingError> {
        if table.is_empty() {
            return Err(SamplingError::EmptyTable);
        }
        if total_seats == 0 {
            return Err(SamplingError::NonPositiveSeats);
        }
        let total_population = match table.total_population() {
            None => return Err(SamplingError::PopulationOverflow),
            Some(0) => return Err(SamplingError::ZeroPopulation),
            Some(p) => p,
        };
        let assigned = table.total_seats();
        if assigned != total_seats {
            return Err(SamplingError::Unapportioned {
                assigned,
                expected: total_seats,
            });
        }

        Ok(Self {
            ids: table.ids().into_iter().map(str::to_string).collect(),
            populations: table.populations(),
            seats: table.seats(),
            total_population,
            total_seats,
        })
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always false: construction rejects empty tables
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Alpha of an explicit subset given by table indices
    ///
    /// Returns `None` for subsets the sampler would skip.
    pub fn alpha_of(&self, members: &[usize]) -> Option<f64> {
        if members.is_empty() || members.len() >= self.len() {
            return None;
        }
        let population: u64 = members.iter().map(|&i| self.populations[i]).sum();
        let seats: u64 = members.iter().map(|&i| self.seats[i]).sum();
        let population_share = population as f64 / self.total_population as f64;
        if population_share <= MIN_POPULATION_SHARE {
            return None;
        }
        Some((seats as f64 / self.total_seats as f64) / population_share)
    }

    /// Draw `samples` subsets from `rng` on the current thread
    pub fn sample(
        &self,
        mode: InclusionMode,
        samples: u64,
        rng: &mut RngManager,
    ) -> Result<DistortionEstimate, SamplingError> {
        check_request(mode, samples)?;
        let outcome = self.run_chunk(0, mode, samples, rng, None, None);
        Ok(self.finish(outcome, mode))
    }

    /// Draw `config.num_samples` subsets across the rayon pool
    pub fn estimate(&self, config: &SamplerConfig) -> Result<DistortionEstimate, SamplingError> {
        check_request(config.mode, config.num_samples)?;

        let chunk_size = config.chunk_size.max(1);
        let num_chunks = config.num_samples.div_ceil(chunk_size);
        let deadline = config
            .time_budget_ms
            .map(|ms| Instant::now() + Duration::from_millis(ms));
        let progress = Progress::new(num_chunks);

        info!(
            "sampling {} random subsets (p = {}) out of {:.3e} total, {} chunk(s)",
            config.num_samples,
            config.mode.probability(),
            2f64.powi(self.len() as i32) - 2.0,
            num_chunks
        );
        let started = Instant::now();

        let outcome = (0..num_chunks)
            .into_par_iter()
            .map(|chunk| {
                let start = chunk * chunk_size;
                let len = chunk_size.min(config.num_samples - start);
                let mut rng = RngManager::new(derive_seed(config.seed, chunk));
                self.run_chunk(chunk, config.mode, len, &mut rng, deadline, Some(&progress))
            })
            .reduce(|| ChunkOutcome::empty(u64::MAX), ChunkOutcome::merge);

        if outcome.drawn < config.num_samples {
            warn!(
                "time budget exhausted: drew {} of {} requested samples",
                outcome.drawn, config.num_samples
            );
        }
        let estimate = self.finish(outcome, config.mode);
        info!(
            "[APPROXIMATE] alpha <= {:.6} (sampled) after {} samples ({} accepted) in {:.2?}",
            estimate.alpha,
            estimate.samples_drawn,
            estimate.samples_accepted,
            started.elapsed()
        );
        Ok(estimate)
    }

    fn run_chunk(
        &self,
        chunk: u64,
        mode: InclusionMode,
        samples: u64,
        rng: &mut RngManager,
        deadline: Option<Instant>,
        progress: Option<&Progress>,
    ) -> ChunkOutcome {
        let n = self.len();
        let mut best = ChunkOutcome::empty(chunk);
        let mut members: Vec<usize> = Vec::with_capacity(n);

        for drawn in 0..samples {
            if let Some(deadline) = deadline {
                if drawn % DEADLINE_CHECK_INTERVAL == 0 && drawn > 0 && Instant::now() >= deadline {
                    debug!("chunk {} stopped at deadline after {} draws", chunk, drawn);
                    break;
                }
            }

            members.clear();
            // A subset never outweighs the whole table, whose total is checked in `new`
            let mut population = 0u64;
            let mut seats = 0u64;
            for i in 0..n {
                if mode.include(rng) {
                    members.push(i);
                    population += self.populations[i];
                    seats += self.seats[i];
                }
            }
            best.drawn += 1;

            if members.is_empty() || members.len() == n {
                continue;
            }
            let population_share = population as f64 / self.total_population as f64;
            if population_share <= MIN_POPULATION_SHARE {
                continue;
            }
            best.accepted += 1;

            let seat_share = seats as f64 / self.total_seats as f64;
            let alpha = seat_share / population_share;
            if alpha < best.alpha {
                best.alpha = alpha;
                best.members.clone_from(&members);
                best.population_share = population_share;
                best.seat_share = seat_share;
            }
        }

        if let Some(progress) = progress {
            progress.chunk_done();
        }
        best
    }

    fn finish(&self, outcome: ChunkOutcome, mode: InclusionMode) -> DistortionEstimate {
        let worst = if outcome.members.is_empty() {
            None
        } else {
            Some(Coalition {
                members: outcome
                    .members
                    .iter()
                    .map(|&i| self.ids[i].clone())
                    .collect(),
                population_share: outcome.population_share,
                seat_share: outcome.seat_share,
            })
        };

        DistortionEstimate {
            alpha: outcome.alpha,
            worst,
            samples_drawn: outcome.drawn,
            samples_accepted: outcome.accepted,
            mode,
        }
    }
}

/// Logs every completed tenth of the chunk budget
struct Progress {
    total: u64,
    done: AtomicU64,
}

impl Progress {
    fn new(total: u64) -> Self {
        Self {
            total,
            done: AtomicU64::new(0),
        }
    }

    fn chunk_done(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        let tenth = (self.total / 10).max(1);
        if done % tenth == 0 && done < self.total {
            info!(
                "checked {} / {} chunks ({:.0}%)...",
                done,
                self.total,
                100.0 * done as f64 / self.total as f64
            );
        }
    }
}

fn check_request(mode: InclusionMode, samples: u64) -> Result<(), SamplingError> {
    if samples == 0 {
        return Err(SamplingError::ZeroSamples);
    }
    if let InclusionMode::Threshold { probability } = mode {
        if !(0.0..=1.0).contains(&probability) {
            return Err(SamplingError::InvalidThreshold(probability));
        }
    }
    Ok(())
}

/// Estimate the minimum alpha of an apportioned table on the rayon pool
///
/// # Example
///
/// ```
/// use apportionment_core_rs::sampling::{estimate_alpha, SamplerConfig};
/// use apportionment_core_rs::{EntityTable, Method};
///
/// let mut table: EntityTable = vec![
///     ("A".to_string(), 5_000),
///     ("B".to_string(), 3_000),
///     ("C".to_string(), 2_000),
/// ]
/// .into_iter()
/// .collect();
/// Method::Jefferson.apportion(&mut table, 4).unwrap();
///
/// let config = SamplerConfig { num_samples: 10_000, seed: 7, ..SamplerConfig::default() };
/// let estimate = estimate_alpha(&table, 4, &config).unwrap();
/// assert!(estimate.alpha >= 0.0 && estimate.alpha <= 1.0);
/// ```
pub fn estimate_alpha(
    table: &EntityTable,
    total_seats: u64,
    config: &SamplerConfig,
) -> Result<DistortionEstimate, SamplingError> {
    SubsetSampler::new(table, total_seats)?.estimate(config)
}

/// Estimate the minimum alpha on the current thread with a caller-owned RNG
pub fn sample_with_rng(
    table: &EntityTable,
    total_seats: u64,
    mode: InclusionMode,
    samples: u64,
    rng: &mut RngManager,
) -> Result<DistortionEstimate, SamplingError> {
    SubsetSampler::new(table, total_seats)?.sample(mode, samples, rng)
}
