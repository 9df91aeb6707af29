use std::path::Path;

use super::archive::{read_archive, ArrayArchive};
use super::model::{ArrayValue, LatentSampleSet, ObservationSet};
use crate::error::{Error, Result};

/// Key under which the upstream stage stores its draws of z.
pub const SAMPLES_Z_KEY: &str = "samples_z";

pub const SAMPLES_Y_KEY: &str = "samples_y";
pub const MEAN_Y_KEY: &str = "mean_y";
pub const COV_Y_KEY: &str = "cov_y";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the latent samples (`count × 2`) stored under [`SAMPLES_Z_KEY`].
///
/// Other keys the upstream stage may have written (its own mean and
/// covariance) are ignored.
pub fn load_latent_samples(path: &Path) -> Result<LatentSampleSet> {
    let archive = read_archive(path)?;
    let samples = require(&archive, path, SAMPLES_Z_KEY)?
        .to_points()
        .ok_or_else(|| shape_error(&archive, path, SAMPLES_Z_KEY, "(count, 2)"))?;

    log::info!(
        "Loaded {} latent samples from {}",
        samples.len(),
        path.display()
    );
    Ok(LatentSampleSet::new(samples))
}

/// Reload an observation archive written by
/// [`write_observation_archive`](super::persist::write_observation_archive).
pub fn read_observation_archive(path: &Path) -> Result<ObservationSet> {
    let archive = read_archive(path)?;

    let samples = require(&archive, path, SAMPLES_Y_KEY)?
        .to_points()
        .ok_or_else(|| shape_error(&archive, path, SAMPLES_Y_KEY, "(N, 2)"))?;
    let mean = require(&archive, path, MEAN_Y_KEY)?
        .to_point()
        .ok_or_else(|| shape_error(&archive, path, MEAN_Y_KEY, "(2,)"))?;
    let cov = require(&archive, path, COV_Y_KEY)?
        .to_matrix2()
        .ok_or_else(|| shape_error(&archive, path, COV_Y_KEY, "(2, 2)"))?;

    Ok(ObservationSet {
        samples,
        mean,
        cov,
        source_index: None,
    })
}

// -- helpers --

fn require<'a>(archive: &'a ArrayArchive, path: &Path, key: &str) -> Result<&'a ArrayValue> {
    archive.get(key).ok_or_else(|| {
        Error::format(
            path,
            format!(
                "missing key '{key}' (found {:?})",
                archive.keys().collect::<Vec<_>>()
            ),
        )
    })
}

fn shape_error(archive: &ArrayArchive, path: &Path, key: &str, expected: &str) -> Error {
    let found = archive
        .get(key)
        .map(|v| v.shape())
        .unwrap_or_else(|| "nothing".to_string());
    Error::format(
        path,
        format!("key '{key}' has shape {found}, expected {expected}"),
    )
}
