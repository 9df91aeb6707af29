use std::path::PathBuf;

use crate::cli::Args;
use crate::data::model::NoiseModel;
use crate::ellipse;
use crate::error::{Error, Result};

/// Everything one pipeline run needs, resolved and validated from [`Args`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub n_samples: usize,
    pub n_points_ellipse: usize,
    pub ellipse_quantile: f64,
    pub noise: NoiseModel,
    pub z_info_path: PathBuf,
    pub y_info_path: PathBuf,
    pub y_metadata_path: PathBuf,
    pub seed: Option<u64>,
}

impl RunConfig {
    pub fn from_args(args: &Args) -> Result<Self> {
        let noise = NoiseModel::new(args.sigma_yx, args.sigma_yy, args.rho_y)?;
        ellipse::check_args(args.ellipse_quantile, args.n_points_ellipse)?;
        Ok(Self {
            n_samples: args.n_samples,
            n_points_ellipse: args.n_points_ellipse,
            ellipse_quantile: args.ellipse_quantile,
            noise,
            z_info_path: PathBuf::from(&args.z_info_filename),
            y_info_path: PathBuf::from(expand_pattern(
                &args.y_info_filename_pattern,
                args.n_samples,
            )?),
            y_metadata_path: PathBuf::from(expand_pattern(
                &args.y_metadata_filename_pattern,
                args.n_samples,
            )?),
            seed: args.seed,
        })
    }
}

/// Substitute `value` into every placeholder of `pattern`.
///
/// Accepted placeholders: `{}`, `{:d}`, `{:Wd}` and `{:0Wd}` (width `W`,
/// zero padded with the leading `0`). `{{` and `}}` are literal braces.
pub fn expand_pattern(pattern: &str, value: usize) -> Result<String> {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut spec = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => spec.push(ch),
                        None => return Err(pattern_error(pattern, "unclosed '{'")),
                    }
                }
                out.push_str(&format_placeholder(pattern, &spec, value)?);
            }
            '}' => return Err(pattern_error(pattern, "unmatched '}'")),
            other => out.push(other),
        }
    }
    Ok(out)
}

fn format_placeholder(pattern: &str, spec: &str, value: usize) -> Result<String> {
    if spec.is_empty() {
        return Ok(value.to_string());
    }
    let body = spec
        .strip_prefix(':')
        .and_then(|s| s.strip_suffix('d'))
        .ok_or_else(|| pattern_error(pattern, &format!("unsupported placeholder '{{{spec}}}'")))?;

    if body.is_empty() {
        return Ok(value.to_string());
    }
    let width: usize = body
        .parse()
        .map_err(|_| pattern_error(pattern, &format!("bad width in '{{{spec}}}'")))?;
    if body.starts_with('0') {
        Ok(format!("{value:0width$}"))
    } else {
        Ok(format!("{value:>width$}"))
    }
}

fn pattern_error(pattern: &str, message: &str) -> Error {
    Error::invalid("filename pattern", format!("{message} in \"{pattern}\""))
}
