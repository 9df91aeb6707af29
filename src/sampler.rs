use nalgebra::{Cholesky, Matrix2, SymmetricEigen, Vector2};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::data::model::{LatentSampleSet, NoiseModel, ObservationSet, Point2};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Covariance factor: cov = A·Aᵀ
// ---------------------------------------------------------------------------

/// Square root of a positive semi-definite 2 × 2 covariance.
///
/// Uses the Cholesky factor when `cov` is positive definite. Singular
/// covariances (a zero standard deviation or |ρ| = 1) fall back to
/// `V·diag(√λ)` from the symmetric eigendecomposition, with tiny negative
/// eigenvalues from round-off clamped to zero.
pub fn covariance_factor(cov: &Matrix2<f64>) -> Matrix2<f64> {
    // A zero pivot makes the Cholesky factor NaN.
    if cov[(0, 0)] > 0.0 && cov.determinant() > 0.0 {
        if let Some(chol) = Cholesky::new(*cov) {
            return chol.l();
        }
    }

    log::debug!("covariance is not positive definite, factoring through its eigenvectors");
    let eigen = SymmetricEigen::new(*cov);
    let sqrt_vals = clamped_eigenvalues(&eigen.eigenvalues).map(f64::sqrt);
    eigen.eigenvectors * Matrix2::from_diagonal(&sqrt_vals)
}

/// Eigenvalues with round-off noise around zero flushed to exactly zero.
pub(crate) fn clamped_eigenvalues(values: &Vector2<f64>) -> Vector2<f64> {
    let tol = 4.0 * f64::EPSILON * values.amax();
    values.map(|l| if l <= tol { 0.0 } else { l })
}

/// Draw `n` i.i.d. points from Normal(`mean`, `cov`).
pub fn sample_mvn<R: Rng>(
    rng: &mut R,
    mean: &Point2,
    cov: &Matrix2<f64>,
    n: usize,
) -> Vec<Point2> {
    let factor = covariance_factor(cov);
    (0..n)
        .map(|_| {
            let xi = Point2::new(rng.sample(StandardNormal), rng.sample(StandardNormal));
            mean + factor * xi
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Observation sampling
// ---------------------------------------------------------------------------

/// Pick a latent sample uniformly at random as the noise mean and draw `n`
/// observations around it.
pub fn sample_observations<R: Rng>(
    rng: &mut R,
    latent: &LatentSampleSet,
    n: usize,
    noise: &NoiseModel,
) -> Result<ObservationSet> {
    if latent.is_empty() {
        return Err(Error::EmptyLatentSet);
    }

    let index = rng.gen_range(0..latent.len());
    let mean = latent.samples[index];
    let cov = noise.covariance();
    log::info!(
        "Using latent sample {index} of {} as mean ({:.4}, {:.4}), noise {noise}",
        latent.len(),
        mean.x,
        mean.y
    );

    let samples = sample_mvn(rng, &mean, &cov, n);
    Ok(ObservationSet {
        samples,
        mean,
        cov,
        source_index: Some(index),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn latent() -> LatentSampleSet {
        LatentSampleSet::new(vec![
            Point2::new(-3.0, 1.0),
            Point2::new(0.5, 0.5),
            Point2::new(10.0, -4.0),
        ])
    }

    fn sample_mean(points: &[Point2]) -> Point2 {
        points.iter().fold(Point2::zeros(), |acc, p| acc + p) / points.len() as f64
    }

    fn sample_covariance(points: &[Point2]) -> Matrix2<f64> {
        let mu = sample_mean(points);
        let sum = points.iter().fold(Matrix2::zeros(), |acc, p| {
            let d = p - mu;
            acc + d * d.transpose()
        });
        sum / (points.len() as f64 - 1.0)
    }

    #[test]
    fn returns_exactly_n_points() {
        let mut rng = StdRng::seed_from_u64(1);
        let noise = NoiseModel::new(1.0, 2.0, -0.3).unwrap();
        for n in [0, 1, 5, 257] {
            let obs = sample_observations(&mut rng, &latent(), n, &noise).unwrap();
            assert_eq!(obs.len(), n);
        }
    }

    #[test]
    fn mean_comes_from_latent_set() {
        let mut rng = StdRng::seed_from_u64(7);
        let noise = NoiseModel::new(1.0, 1.0, 0.0).unwrap();
        let latent = latent();
        for _ in 0..20 {
            let obs = sample_observations(&mut rng, &latent, 3, &noise).unwrap();
            let idx = obs.source_index.unwrap();
            assert_eq!(obs.mean, latent.samples[idx]);
            assert_eq!(obs.cov, noise.covariance());
        }
    }

    #[test]
    fn mean_index_is_uniform() {
        let mut rng = StdRng::seed_from_u64(31);
        let noise = NoiseModel::new(1.0, 1.0, 0.0).unwrap();
        let latent = LatentSampleSet::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
        ]);

        let draws = 8000;
        let mut counts = [0usize; 4];
        for _ in 0..draws {
            let obs = sample_observations(&mut rng, &latent, 0, &noise).unwrap();
            counts[obs.source_index.unwrap()] += 1;
        }

        let k = counts.len() as f64;
        let expected = draws as f64 / k;
        let sd = (draws as f64 * (1.0 / k) * (1.0 - 1.0 / k)).sqrt();
        for (idx, &count) in counts.iter().enumerate() {
            assert!(
                (count as f64 - expected).abs() <= 5.0 * sd,
                "index {idx} drawn {count} times, expected about {expected}"
            );
        }
    }

    #[test]
    fn zero_samples_is_empty_not_an_error() {
        let mut rng = StdRng::seed_from_u64(3);
        let noise = NoiseModel::new(1.0, 1.0, 0.0).unwrap();
        let obs = sample_observations(&mut rng, &latent(), 0, &noise).unwrap();
        assert!(obs.is_empty());
    }

    #[test]
    fn empty_latent_set_is_rejected() {
        let mut rng = StdRng::seed_from_u64(3);
        let noise = NoiseModel::new(1.0, 1.0, 0.0).unwrap();
        let empty = LatentSampleSet::new(Vec::new());
        assert!(matches!(
            sample_observations(&mut rng, &empty, 5, &noise),
            Err(Error::EmptyLatentSet)
        ));
    }

    #[test]
    fn same_seed_same_draws() {
        let noise = NoiseModel::new(0.7, 1.3, 0.4).unwrap();
        let a = sample_observations(&mut StdRng::seed_from_u64(42), &latent(), 10, &noise).unwrap();
        let b = sample_observations(&mut StdRng::seed_from_u64(42), &latent(), 10, &noise).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn factor_reproduces_covariance() {
        for cov in [
            Matrix2::new(4.0, 1.2, 1.2, 1.0),
            Matrix2::new(1.0, 1.0, 1.0, 1.0),
            Matrix2::new(0.0, 0.0, 0.0, 2.0),
        ] {
            let a = covariance_factor(&cov);
            assert_relative_eq!(a * a.transpose(), cov, epsilon = 1e-12);
        }
    }

    #[test]
    fn large_sample_moments_converge() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mean = Point2::new(2.0, -1.0);
        let cov = NoiseModel::new(1.5, 0.5, 0.6).unwrap().covariance();
        let points = sample_mvn(&mut rng, &mean, &cov, 200_000);

        assert_relative_eq!(sample_mean(&points), mean, epsilon = 0.02);
        assert_relative_eq!(sample_covariance(&points), cov, epsilon = 0.03);
    }

    #[test]
    fn perfectly_correlated_noise_lies_on_diagonal() {
        let mut rng = StdRng::seed_from_u64(11);
        let noise = NoiseModel::new(1.0, 1.0, 1.0).unwrap();
        let obs = sample_observations(&mut rng, &latent(), 500, &noise).unwrap();
        assert_eq!(obs.len(), 500);
        for p in &obs.samples {
            let d = p - obs.mean;
            assert!(d.x.is_finite() && d.y.is_finite());
            assert!((d.x - d.y).abs() < 1e-9, "point {p:?} off the line");
        }
    }

    #[test]
    fn zero_sigma_collapses_axis() {
        let mut rng = StdRng::seed_from_u64(5);
        let noise = NoiseModel::new(0.0, 2.0, 0.5).unwrap();
        let obs = sample_observations(&mut rng, &latent(), 100, &noise).unwrap();
        for p in &obs.samples {
            assert_relative_eq!(p.x, obs.mean.x, epsilon = 1e-12);
        }
    }
}
