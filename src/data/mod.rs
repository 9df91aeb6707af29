/// Data layer: core types, array archives, loading and persisting.
///
/// Architecture:
/// ```text
///  z_info.parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  samples_z → LatentSampleSet
///   └──────────┘
///        │   (sampler)
///        ▼
///   ┌────────────────┐
///   │ ObservationSet  │  samples_y, mean_y, cov_y
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ persist   │  y_info.parquet + y_metadata.toml
///   └──────────┘
/// ```

pub mod archive;
pub mod loader;
pub mod model;
pub mod persist;
