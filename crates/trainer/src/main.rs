//! Feed Trainer - offline model training run
//!
//! Zero-argument batch job: regenerates the synthetic dataset under the
//! fixed seed, fits the regression, reports the held-out score, and writes
//! the model artifact to the fixed path in the working directory. The
//! server reads that artifact at its next startup; the two never run
//! concurrently against it.

use anyhow::{Context, Result};
use estimator_lib::{
    dataset::{generate, DEFAULT_SAMPLE_COUNT, DEFAULT_SEED},
    trainer::train,
    ModelArtifact, DEFAULT_ARTIFACT_PATH,
};
use std::path::Path;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    info!(
        samples = DEFAULT_SAMPLE_COUNT,
        seed = DEFAULT_SEED,
        "Generating synthetic training data"
    );
    let dataset = generate(DEFAULT_SAMPLE_COUNT, DEFAULT_SEED);

    let outcome = train(&dataset, DEFAULT_SEED).context("model fit failed")?;
    // The score is informational; a poor fit still ships.
    info!(
        r_squared = outcome.r_squared,
        train_rows = outcome.train_rows,
        test_rows = outcome.test_rows,
        "Training complete"
    );

    let artifact = ModelArtifact::from_outcome(&outcome);
    let path = Path::new(DEFAULT_ARTIFACT_PATH);
    artifact
        .save(path)
        .context("failed to write model artifact")?;
    info!(path = %path.display(), model_version = %artifact.model_version, "Model artifact saved");

    Ok(())
}
