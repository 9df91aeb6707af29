use clap::Parser;

/// Draw noisy observations around a latent sample and plot their confidence ellipse.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Number of observation samples to generate
    #[arg(long, default_value_t = 5)]
    pub n_samples: usize,

    /// Number of points used to draw the confidence ellipse
    #[arg(long, default_value_t = 100)]
    pub n_points_ellipse: usize,

    /// Probability mass enclosed by the ellipse
    #[arg(long, default_value_t = 0.95)]
    pub ellipse_quantile: f64,

    /// Measurement noise standard deviation along the x axis
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub sigma_yx: f64,

    /// Measurement noise standard deviation along the y axis
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub sigma_yy: f64,

    /// Measurement noise correlation coefficient
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub rho_y: f64,

    /// Archive holding the latent samples under `samples_z`
    #[arg(long, default_value = "results/z_info.parquet")]
    pub z_info_filename: String,

    /// Pattern of the archive receiving samples, mean and covariance of y
    #[arg(long, default_value = "results/y_info_nSamples{:05d}.parquet")]
    pub y_info_filename_pattern: String,

    /// Pattern of the metadata file for y (TOML)
    #[arg(long, default_value = "results/y_metadata_nSamples{:05d}.toml")]
    pub y_metadata_filename_pattern: String,

    /// Seed for the random number generator (entropy when absent)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run without GUI (headless)
    #[arg(long, default_value_t = false)]
    pub nogui: bool,
}
