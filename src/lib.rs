//! Inference in the linear-Gaussian model: draw noisy 2-D observations
//! around a randomly chosen latent sample, persist them with their
//! generating parameters, and visualize them with a quantile ellipse.
//!
//! The pipeline ([`pipeline::run`]) is headless; [`app`] is an optional
//! egui viewer for its output.

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod ellipse;
pub mod error;
pub mod pipeline;
pub mod sampler;
pub mod state;
pub mod ui;

pub use error::{Error, Result};
