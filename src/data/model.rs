use std::fmt;

use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A point in the observation / latent plane.
pub type Point2 = Vector2<f64>;

// ---------------------------------------------------------------------------
// ArrayValue – one named entry of an array archive
// ---------------------------------------------------------------------------

/// A floating-point array as stored under a key in an archive.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayValue {
    /// 1-D array, e.g. a mean vector.
    Vector(Vec<f64>),
    /// 2-D array stored row by row, e.g. samples (N × 2) or a covariance.
    Matrix(Vec<Vec<f64>>),
}

impl ArrayValue {
    /// Human-readable shape, numpy style.
    pub fn shape(&self) -> String {
        match self {
            ArrayValue::Vector(v) => format!("({},)", v.len()),
            ArrayValue::Matrix(rows) => {
                let cols = rows.first().map(|r| r.len()).unwrap_or(0);
                format!("({}, {})", rows.len(), cols)
            }
        }
    }

    pub fn from_points(points: &[Point2]) -> Self {
        ArrayValue::Matrix(points.iter().map(|p| vec![p.x, p.y]).collect())
    }

    pub fn from_point(point: &Point2) -> Self {
        ArrayValue::Vector(vec![point.x, point.y])
    }

    pub fn from_matrix2(m: &Matrix2<f64>) -> Self {
        ArrayValue::Matrix(vec![vec![m[(0, 0)], m[(0, 1)]], vec![m[(1, 0)], m[(1, 1)]]])
    }

    /// Interpret as an `n × 2` array of points.
    pub fn to_points(&self) -> Option<Vec<Point2>> {
        match self {
            ArrayValue::Matrix(rows) => rows
                .iter()
                .map(|r| match r.as_slice() {
                    [x, y] => Some(Point2::new(*x, *y)),
                    _ => None,
                })
                .collect(),
            ArrayValue::Vector(_) => None,
        }
    }

    /// Interpret as a single 2-vector.
    pub fn to_point(&self) -> Option<Point2> {
        match self {
            ArrayValue::Vector(v) => match v.as_slice() {
                [x, y] => Some(Point2::new(*x, *y)),
                _ => None,
            },
            ArrayValue::Matrix(_) => None,
        }
    }

    /// Interpret as a 2 × 2 matrix.
    pub fn to_matrix2(&self) -> Option<Matrix2<f64>> {
        let points = self.to_points()?;
        match points.as_slice() {
            [r0, r1] => Some(Matrix2::new(r0.x, r0.y, r1.x, r1.y)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// LatentSampleSet – draws of z produced by an earlier stage
// ---------------------------------------------------------------------------

/// Previously generated latent-variable samples. Read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct LatentSampleSet {
    pub samples: Vec<Point2>,
}

impl LatentSampleSet {
    pub fn new(samples: Vec<Point2>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Point2> {
        self.samples.get(index)
    }
}

// ---------------------------------------------------------------------------
// NoiseModel – correlated 2-D measurement noise
// ---------------------------------------------------------------------------

/// Standard deviations along each axis plus their correlation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseModel {
    sigma_x: f64,
    sigma_y: f64,
    rho: f64,
}

impl NoiseModel {
    /// Validates `sigma_x, sigma_y >= 0` and `rho` in `[-1, 1]`.
    pub fn new(sigma_x: f64, sigma_y: f64, rho: f64) -> Result<Self> {
        check_sigma("sigma_x", sigma_x)?;
        check_sigma("sigma_y", sigma_y)?;
        if !rho.is_finite() || !(-1.0..=1.0).contains(&rho) {
            return Err(Error::invalid(
                "rho",
                format!("correlation must lie in [-1, 1], got {rho}"),
            ));
        }
        Ok(Self {
            sigma_x,
            sigma_y,
            rho,
        })
    }

    pub fn sigma_x(&self) -> f64 {
        self.sigma_x
    }

    pub fn sigma_y(&self) -> f64 {
        self.sigma_y
    }

    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// `[[σx², ρσxσy], [ρσxσy, σy²]]`
    pub fn covariance(&self) -> Matrix2<f64> {
        let off = self.rho * self.sigma_x * self.sigma_y;
        Matrix2::new(self.sigma_x.powi(2), off, off, self.sigma_y.powi(2))
    }
}

fn check_sigma(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::invalid(
            name,
            format!("standard deviation must be finite and non-negative, got {value}"),
        ));
    }
    Ok(())
}

impl fmt::Display for NoiseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "σx={:.4}, σy={:.4}, ρ={:.4}",
            self.sigma_x, self.sigma_y, self.rho
        )
    }
}

// ---------------------------------------------------------------------------
// ObservationSet – the noisy draws of y and their generating parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSet {
    /// Draws from Normal(mean, cov).
    pub samples: Vec<Point2>,
    /// The latent sample chosen as the noise mean.
    pub mean: Point2,
    pub cov: Matrix2<f64>,
    /// Index into the latent set, `None` when reloaded from an archive.
    pub source_index: Option<usize>,
}

impl ObservationSet {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Metadata – provenance of an observation archive
// ---------------------------------------------------------------------------

/// Serialized as TOML
///
/// ```text
/// [z_info]
/// filename = "results/z_info.parquet"
/// ```
///
/// String values are quoted and escaped, so read it with a TOML parser
/// rather than an INI one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub z_info: SourceInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub filename: String,
}

impl Metadata {
    pub fn for_source(filename: impl Into<String>) -> Self {
        Self {
            z_info: SourceInfo {
                filename: filename.into(),
            },
        }
    }
}
