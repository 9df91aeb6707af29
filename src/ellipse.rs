use std::f64::consts::TAU;

use nalgebra::{Matrix2, SymmetricEigen, Vector2};

use crate::data::model::Point2;
use crate::error::{Error, Result};
use crate::sampler::clamped_eigenvalues;

// ---------------------------------------------------------------------------
// Quantile (confidence) ellipse of a 2-D Gaussian
// ---------------------------------------------------------------------------

/// Boundary of the region holding `quantile` of the mass of Normal(center, cov).
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceEllipse {
    pub center: Point2,
    /// Semi-axis lengths, one per column of `axes`.
    pub semi_axes: Vector2<f64>,
    /// Orthonormal principal directions (eigenvectors of cov) as columns.
    pub axes: Matrix2<f64>,
    pub quantile: f64,
    /// Closed polyline: the last point repeats the first.
    pub points: Vec<Point2>,
}

impl ConfidenceEllipse {
    /// Whether `p` lies inside or on the ellipse.
    ///
    /// A collapsed axis (zero length) only admits points on the remaining
    /// principal line.
    pub fn contains(&self, p: &Point2) -> bool {
        let local = self.axes.transpose() * (p - self.center);
        let scale = self.semi_axes.amax().max(1.0);
        let mut r2 = 0.0;
        for i in 0..2 {
            let a = self.semi_axes[i];
            if a > 0.0 {
                r2 += (local[i] / a).powi(2);
            } else if local[i].abs() > 1e-12 * scale {
                return false;
            }
        }
        r2 <= 1.0
    }

    /// Legend label, e.g. `95% quantile`.
    pub fn label(&self) -> String {
        format!("{:.0}% quantile", self.quantile * 100.0)
    }
}

/// Inverse CDF of the chi-squared distribution with two degrees of freedom.
///
/// With k = 2 the CDF is `1 - exp(-x/2)`, so the quantile has a closed form.
pub fn chi2_2dof_inverse_cdf(quantile: f64) -> f64 {
    -2.0 * (-quantile).ln_1p()
}

/// `quantile` must lie in (0, 1) and `n_points` must be at least 3.
pub fn check_args(quantile: f64, n_points: usize) -> Result<()> {
    if !(quantile > 0.0 && quantile < 1.0) {
        return Err(Error::invalid(
            "quantile",
            format!("must lie strictly between 0 and 1, got {quantile}"),
        ));
    }
    if n_points < 3 {
        return Err(Error::invalid(
            "n_points",
            format!("need at least 3 points to draw an ellipse, got {n_points}"),
        ));
    }
    Ok(())
}

/// Trace `n_points` around the `quantile` ellipse of Normal(`mean`, `cov`).
///
/// Arguments are validated by [`check_args`].
pub fn quantile_ellipse(
    mean: &Point2,
    cov: &Matrix2<f64>,
    quantile: f64,
    n_points: usize,
) -> Result<ConfidenceEllipse> {
    check_args(quantile, n_points)?;

    let r2 = chi2_2dof_inverse_cdf(quantile);
    let eigen = SymmetricEigen::new(*cov);
    let semi_axes = clamped_eigenvalues(&eigen.eigenvalues).map(|l| (r2 * l).sqrt());
    let axes = eigen.eigenvectors;
    log::debug!(
        "Ellipse r²={r2:.4}, semi-axes ({:.4}, {:.4})",
        semi_axes[0],
        semi_axes[1]
    );

    let step = TAU / (n_points - 1) as f64;
    let mut points: Vec<Point2> = (0..n_points - 1)
        .map(|k| {
            let theta = k as f64 * step;
            let local = Vector2::new(semi_axes[0] * theta.cos(), semi_axes[1] * theta.sin());
            mean + axes * local
        })
        .collect();
    points.push(points[0]);

    Ok(ConfidenceEllipse {
        center: *mean,
        semi_axes,
        axes,
        quantile,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::sample_mvn;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn chi2_quantiles_match_tables() {
        assert_relative_eq!(chi2_2dof_inverse_cdf(0.95), 5.991464547107979, epsilon = 1e-12);
        assert_relative_eq!(chi2_2dof_inverse_cdf(0.5), 1.3862943611198906, epsilon = 1e-12);
    }

    #[test]
    fn isotropic_covariance_gives_closed_circle() {
        let mean = Point2::new(1.5, -2.0);
        let ellipse = quantile_ellipse(&mean, &Matrix2::identity(), 0.95, 100).unwrap();

        assert_eq!(ellipse.points.len(), 100);
        assert_eq!(ellipse.points.first(), ellipse.points.last());
        assert_eq!(ellipse.center, mean);

        let radius = 5.991464547107979f64.sqrt();
        assert_relative_eq!(ellipse.semi_axes[0], radius, epsilon = 1e-12);
        assert_relative_eq!(ellipse.semi_axes[1], radius, epsilon = 1e-12);
        for p in &ellipse.points {
            assert_relative_eq!((p - mean).norm(), radius, epsilon = 1e-9);
        }
        assert_eq!(ellipse.label(), "95% quantile");
    }

    #[test]
    fn encloses_quantile_fraction_of_resample() {
        let mean = Point2::new(-1.0, 4.0);
        let cov = Matrix2::new(2.0, -0.9, -0.9, 0.8);
        let mut rng = StdRng::seed_from_u64(99);

        for quantile in [0.5, 0.95] {
            let ellipse = quantile_ellipse(&mean, &cov, quantile, 64).unwrap();
            let draws = sample_mvn(&mut rng, &mean, &cov, 100_000);
            let inside = draws.iter().filter(|p| ellipse.contains(p)).count();
            let fraction = inside as f64 / draws.len() as f64;
            assert!(
                (fraction - quantile).abs() < 0.01,
                "quantile {quantile}: enclosed fraction {fraction}"
            );
        }
    }

    #[test]
    fn boundary_points_are_on_the_ellipse() {
        let mean = Point2::new(0.0, 0.0);
        let cov = Matrix2::new(3.0, 1.0, 1.0, 2.0);
        let ellipse = quantile_ellipse(&mean, &cov, 0.9, 50).unwrap();
        let precision = cov.try_inverse().unwrap();
        let r2 = chi2_2dof_inverse_cdf(0.9);
        for p in &ellipse.points {
            let d2 = (p.transpose() * precision * p)[(0, 0)];
            assert_relative_eq!(d2, r2, epsilon = 1e-9);
        }
    }

    #[test]
    fn singular_covariance_collapses_to_segment() {
        let mean = Point2::new(2.0, 2.0);
        let cov = Matrix2::new(1.0, 1.0, 1.0, 1.0);
        let ellipse = quantile_ellipse(&mean, &cov, 0.95, 20).unwrap();
        for p in &ellipse.points {
            let d = p - mean;
            assert!((d.x - d.y).abs() < 1e-9);
        }
        assert!(ellipse.contains(&Point2::new(2.5, 2.5)));
        assert!(!ellipse.contains(&Point2::new(2.5, 2.0)));
    }

    #[test]
    fn rejects_bad_arguments() {
        let mean = Point2::zeros();
        let cov = Matrix2::identity();
        for q in [0.0, 1.0, -0.2, f64::NAN] {
            assert!(matches!(
                quantile_ellipse(&mean, &cov, q, 100),
                Err(Error::InvalidParameter { name: "quantile", .. })
            ));
        }
        assert!(matches!(
            quantile_ellipse(&mean, &cov, 0.95, 2),
            Err(Error::InvalidParameter { name: "n_points", .. })
        ));
        assert_eq!(quantile_ellipse(&mean, &cov, 0.95, 3).unwrap().points.len(), 3);
    }
}
