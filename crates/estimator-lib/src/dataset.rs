//! Synthetic training data generation
//!
//! Builds a labeled dataset from the standard feed curve plus three
//! independent noise bands modeling environmental variance, imprecise
//! feeding, and uneven consumption. All randomness comes from a single
//! seeded generator, so a run is fully reproducible from its seed.

use crate::curve::intake_for_age;
use crate::models::{FlockObservation, LabeledSample, TrainingDataset};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default dataset size per training run.
pub const DEFAULT_SAMPLE_COUNT: usize = 2000;

/// Default seed for reproducible training runs.
pub const DEFAULT_SEED: u64 = 42;

/// Flock sizes drawn for synthetic samples.
const POPULATION_RANGE: std::ops::Range<u32> = 1000..10_000;

/// Ages drawn for synthetic samples; covers the full curve out to ~70 weeks.
const AGE_RANGE: std::ops::Range<u32> = 1..490;

/// Environmental/health variance on per-bird intake.
const INTAKE_BAND: (f64, f64) = (0.85, 1.15);

/// Operators do not feed the exact optimal amount.
const GIVEN_BAND: (f64, f64) = (0.90, 1.10);

/// Consumption variance used to derive leftover.
const CONSUMED_BAND: (f64, f64) = (0.95, 1.05);

/// Generate `sample_count` labeled samples under the given seed.
///
/// Output order is draw order. Every sample satisfies
/// `0 <= leftover <= given` and `feed_needed_today_kg > 0`.
pub fn generate(sample_count: usize, seed: u64) -> TrainingDataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut samples = Vec::with_capacity(sample_count);

    for _ in 0..sample_count {
        let population = rng.gen_range(POPULATION_RANGE);
        let age_days = rng.gen_range(AGE_RANGE);

        let base_intake_g = intake_for_age(age_days);
        let real_intake_g = base_intake_g * rng.gen_range(INTAKE_BAND.0..INTAKE_BAND.1);
        let feed_needed_kg = f64::from(population) * real_intake_g / 1000.0;

        let given_kg = feed_needed_kg * rng.gen_range(GIVEN_BAND.0..GIVEN_BAND.1);
        let consumed_kg = feed_needed_kg * rng.gen_range(CONSUMED_BAND.0..CONSUMED_BAND.1);
        let leftover_kg = (given_kg - consumed_kg).max(0.0);

        samples.push(LabeledSample {
            observation: FlockObservation {
                population: f64::from(population),
                age_days: f64::from(age_days),
                feed_given_yesterday_kg: given_kg,
                feed_leftover_yesterday_kg: leftover_kg,
            },
            feed_needed_today_kg: feed_needed_kg,
        });
    }

    TrainingDataset { samples }
}
