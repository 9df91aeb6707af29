use std::path::PathBuf;

use rand::Rng;

use crate::config::RunConfig;
use crate::data::loader::load_latent_samples;
use crate::data::model::ObservationSet;
use crate::data::persist::{write_metadata, write_observation_archive};
use crate::ellipse::{check_args, quantile_ellipse, ConfidenceEllipse};
use crate::error::Result;
use crate::sampler::sample_observations;

/// What one run produced, ready for an optional display layer.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub observations: ObservationSet,
    pub ellipse: ConfidenceEllipse,
    pub z_info_path: PathBuf,
    pub y_info_path: PathBuf,
    pub y_metadata_path: PathBuf,
}

/// Load → sample → persist → compute ellipse.
///
/// Aborts on the first error. Ellipse arguments are checked before anything
/// is written. The two output files are written in order, so a failing
/// metadata write leaves the observation archive behind.
pub fn run<R: Rng>(config: &RunConfig, rng: &mut R) -> Result<RunOutput> {
    check_args(config.ellipse_quantile, config.n_points_ellipse)?;

    let latent = load_latent_samples(&config.z_info_path)?;
    let observations = sample_observations(rng, &latent, config.n_samples, &config.noise)?;

    write_observation_archive(&config.y_info_path, &observations)?;
    write_metadata(&config.y_metadata_path, &config.z_info_path)?;

    let ellipse = quantile_ellipse(
        &observations.mean,
        &observations.cov,
        config.ellipse_quantile,
        config.n_points_ellipse,
    )?;

    Ok(RunOutput {
        observations,
        ellipse,
        z_info_path: config.z_info_path.clone(),
        y_info_path: config.y_info_path.clone(),
        y_metadata_path: config.y_metadata_path.clone(),
    })
}
