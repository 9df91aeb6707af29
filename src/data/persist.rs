use std::path::Path;

use super::archive::{write_archive, ArrayArchive};
use super::loader::{COV_Y_KEY, MEAN_Y_KEY, SAMPLES_Y_KEY};
use super::model::{ArrayValue, Metadata, ObservationSet};
use crate::error::{Error, Result};

/// Write samples, mean and covariance of `obs` to one archive.
pub fn write_observation_archive(path: &Path, obs: &ObservationSet) -> Result<()> {
    let mut archive = ArrayArchive::new();
    archive.insert(SAMPLES_Y_KEY, ArrayValue::from_points(&obs.samples));
    archive.insert(MEAN_Y_KEY, ArrayValue::from_point(&obs.mean));
    archive.insert(COV_Y_KEY, ArrayValue::from_matrix2(&obs.cov));
    write_archive(path, &archive)?;

    log::info!(
        "Saved {} observation samples to {}",
        obs.len(),
        path.display()
    );
    Ok(())
}

/// Record which latent archive the observations were generated from.
///
/// The file is TOML; `source` must be valid UTF-8 so it is stored verbatim.
pub fn write_metadata(path: &Path, source: &Path) -> Result<()> {
    let source = source.to_str().ok_or_else(|| {
        Error::invalid(
            "z_info_filename",
            format!("path is not valid UTF-8: {}", source.display()),
        )
    })?;
    let metadata = Metadata::for_source(source);
    let text = toml::to_string(&metadata)
        .map_err(|e| Error::format(path, format!("serializing metadata: {e}")))?;
    std::fs::write(path, text).map_err(|e| Error::io(path, e))?;

    log::info!("Saved metadata to {}", path.display());
    Ok(())
}

pub fn read_metadata(path: &Path) -> Result<Metadata> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound {
            path: path.to_path_buf(),
        },
        _ => Error::io(path, e),
    })?;
    toml::from_str(&text).map_err(|e| Error::format(path, format!("parsing metadata: {e}")))
}
