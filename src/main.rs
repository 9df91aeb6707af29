use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use linear_gaussian::cli::Args;
use linear_gaussian::config::RunConfig;
use linear_gaussian::{app, pipeline};

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = RunConfig::from_args(&args).context("invalid arguments")?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let output = pipeline::run(&config, &mut rng).context("sampling observations")?;
    log::info!(
        "Drew {} observations around latent sample {:?}",
        output.observations.len(),
        output.observations.source_index
    );

    if args.nogui {
        return Ok(());
    }

    app::show(output).map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}
