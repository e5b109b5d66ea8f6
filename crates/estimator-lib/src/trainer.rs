//! Linear model training and evaluation
//!
//! Fits an ordinary least-squares model on the four flock features against
//! total feed needed, holding out a test split for an R² score. The score
//! is informational only; training never fails because of a low score.

use crate::error::EstimatorError;
use crate::models::{TrainingDataset, NUM_FEATURES};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

/// Fraction of the dataset held out for evaluation.
pub const TEST_FRACTION: f64 = 0.2;

/// Fitted linear regression over the canonical feature order.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    pub coefficients: [f64; NUM_FEATURES],
    pub intercept: f64,
}

impl LinearModel {
    /// Predict total feed needed in kilograms for one feature vector.
    pub fn predict(&self, features: &[f64; NUM_FEATURES]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }
}

/// Result of a training run.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub model: LinearModel,
    /// Coefficient of determination on the held-out split.
    pub r_squared: f64,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Fit a model on an 80/20 split of the dataset, shuffled under `seed`.
///
/// Deterministic for a fixed dataset and seed. Errs only if the design
/// matrix is degenerate, which generator output never is.
pub fn train(dataset: &TrainingDataset, seed: u64) -> Result<TrainingOutcome, EstimatorError> {
    let n = dataset.len();
    let test_rows = ((n as f64) * TEST_FRACTION).ceil() as usize;
    let train_rows = n - test_rows;
    if train_rows <= NUM_FEATURES {
        return Err(EstimatorError::Training(format!(
            "{} training rows cannot determine {} coefficients",
            train_rows,
            NUM_FEATURES + 1
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let (train_idx, test_idx) = indices.split_at(train_rows);

    let model = fit_least_squares(dataset, train_idx)?;
    let r_squared = r_squared(&model, dataset, test_idx);

    debug!(
        train_rows,
        test_rows, r_squared, "Fitted linear model on held-out split"
    );

    Ok(TrainingOutcome {
        model,
        r_squared,
        train_rows,
        test_rows,
    })
}

/// Solve the normal equations for intercept + coefficients.
fn fit_least_squares(
    dataset: &TrainingDataset,
    rows: &[usize],
) -> Result<LinearModel, EstimatorError> {
    const K: usize = NUM_FEATURES + 1;

    // Accumulate X'X and X'y with a leading all-ones intercept column.
    let mut xtx = [[0.0f64; K]; K];
    let mut xty = [0.0f64; K];
    for &row in rows {
        let sample = &dataset.samples[row];
        let features = sample.observation.feature_vector();
        let mut x = [1.0f64; K];
        x[1..].copy_from_slice(&features);
        for i in 0..K {
            xty[i] += x[i] * sample.feed_needed_today_kg;
            for j in 0..K {
                xtx[i][j] += x[i] * x[j];
            }
        }
    }

    let beta = solve(&mut xtx, &mut xty)
        .ok_or_else(|| EstimatorError::Training("design matrix is singular".to_string()))?;

    let mut coefficients = [0.0f64; NUM_FEATURES];
    coefficients.copy_from_slice(&beta[1..]);
    Ok(LinearModel {
        coefficients,
        intercept: beta[0],
    })
}

/// Gauss-Jordan elimination with partial pivoting on `a`x = `b`.
fn solve<const K: usize>(a: &mut [[f64; K]; K], b: &mut [f64; K]) -> Option<[f64; K]> {
    for col in 0..K {
        let pivot = (col..K)
            .max_by(|&r, &s| a[r][col].abs().total_cmp(&a[s][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < f64::EPSILON {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in 0..K {
            if row == col {
                continue;
            }
            let factor = a[row][col] / a[col][col];
            for c in col..K {
                a[row][c] -= factor * a[col][c];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut solution = [0.0f64; K];
    for i in 0..K {
        solution[i] = b[i] / a[i][i];
    }
    Some(solution)
}

/// Coefficient of determination on the given rows.
fn r_squared(model: &LinearModel, dataset: &TrainingDataset, rows: &[usize]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    let mean = rows
        .iter()
        .map(|&r| dataset.samples[r].feed_needed_today_kg)
        .sum::<f64>()
        / rows.len() as f64;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for &row in rows {
        let sample = &dataset.samples[row];
        let predicted = model.predict(&sample.observation.feature_vector());
        ss_res += (sample.feed_needed_today_kg - predicted).powi(2);
        ss_tot += (sample.feed_needed_today_kg - mean).powi(2);
    }
    if ss_tot < f64::EPSILON {
        return 0.0;
    }
    1.0 - ss_res / ss_tot
}
