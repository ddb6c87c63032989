use serde::{Deserialize, Serialize};

use flypeak_core::{DetectError, Heatmap, Result, Scorer};

/// Parameters for the built-in difference-of-Gaussians blob scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobScorerConfig {
    /// Standard deviation of the fine (center) Gaussian, in pixels.
    pub sigma_fine: f32,
    /// Standard deviation of the coarse (surround) Gaussian. Must be
    /// larger than `sigma_fine`.
    pub sigma_coarse: f32,
    /// Invert intensities before scoring, so dark flies on a light
    /// background produce positive responses.
    pub invert: bool,
}

impl Default for BlobScorerConfig {
    fn default() -> Self {
        Self {
            sigma_fine: 1.5,
            sigma_coarse: 4.0,
            invert: true,
        }
    }
}

/// CPU blob scorer: band-pass difference-of-Gaussians response.
///
/// The default backend when no learned model is wired in. Separable
/// blur passes; deterministic and stateless, so it satisfies the
/// [`Scorer`] contract. Output resolution equals input resolution.
pub struct BlobScorer {
    fine: Vec<f32>,
    coarse: Vec<f32>,
    invert: bool,
}

impl BlobScorer {
    /// Validate the configuration and precompute both kernels.
    pub fn new(config: &BlobScorerConfig) -> Result<Self> {
        if !(config.sigma_fine > 0.0) || !(config.sigma_coarse > config.sigma_fine) {
            return Err(DetectError::ScoringUnavailable(format!(
                "blob scorer requires 0 < sigma_fine < sigma_coarse, got {} and {}",
                config.sigma_fine, config.sigma_coarse
            )));
        }
        Ok(Self {
            fine: gaussian_kernel(config.sigma_fine),
            coarse: gaussian_kernel(config.sigma_coarse),
            invert: config.invert,
        })
    }
}

impl Scorer for BlobScorer {
    fn name(&self) -> &str {
        "blob-dog"
    }

    fn score(&self, input: &Heatmap) -> Result<Heatmap> {
        let rows = input.rows as usize;
        let cols = input.cols as usize;

        let base: Vec<f32> = if self.invert {
            input.data.iter().map(|v| 1.0 - v).collect()
        } else {
            input.data.clone()
        };

        let fine = blur_separable(&base, cols, rows, &self.fine);
        let coarse = blur_separable(&base, cols, rows, &self.coarse);

        let data = fine
            .iter()
            .zip(coarse.iter())
            .map(|(f, c)| f - c)
            .collect();
        Ok(Heatmap::new(input.rows, input.cols, data))
    }
}

/// Normalized 1-D Gaussian kernel truncated at three sigma.
fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (3.0 * sigma).ceil() as i32;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|i| (-(i * i) as f32 / denom).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }
    kernel
}

/// Two edge-clamped 1-D convolution passes (rows, then columns).
fn blur_separable(input: &[f32], w: usize, h: usize, kernel: &[f32]) -> Vec<f32> {
    let radius = (kernel.len() / 2) as i64;

    let mut horizontal = vec![0.0f32; w * h];
    for y in 0..h {
        let row = y * w;
        for x in 0..w {
            let mut acc = 0.0;
            for (ki, kv) in kernel.iter().enumerate() {
                let sx = (x as i64 + ki as i64 - radius).clamp(0, w as i64 - 1) as usize;
                acc += input[row + sx] * kv;
            }
            horizontal[row + x] = acc;
        }
    }

    let mut out = vec![0.0f32; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (ki, kv) in kernel.iter().enumerate() {
                let sy = (y as i64 + ki as i64 - radius).clamp(0, h as i64 - 1) as usize;
                acc += horizontal[sy * w + x] * kv;
            }
            out[y * w + x] = acc;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_bandpass_sigmas() {
        let bad = BlobScorerConfig {
            sigma_fine: 4.0,
            sigma_coarse: 1.0,
            invert: true,
        };
        assert!(matches!(
            BlobScorer::new(&bad),
            Err(DetectError::ScoringUnavailable(_))
        ));
        let zero = BlobScorerConfig {
            sigma_fine: 0.0,
            ..BlobScorerConfig::default()
        };
        assert!(BlobScorer::new(&zero).is_err());
    }

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        let k = gaussian_kernel(2.0);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert_eq!(k.len() % 2, 1);
        assert!((k[0] - k[k.len() - 1]).abs() < 1e-7);
    }

    #[test]
    fn dark_spot_scores_highest_at_its_center() {
        // Light field with one dark dot at (10, 20) of a 32x32 frame.
        let mut data = vec![1.0f32; 32 * 32];
        data[10 * 32 + 20] = 0.0;
        let input = Heatmap::new(32, 32, data);

        let scorer = BlobScorer::new(&BlobScorerConfig::default()).unwrap();
        let out = scorer.score(&input).unwrap();

        let (mut best_idx, mut best) = (0usize, f32::NEG_INFINITY);
        for (i, &v) in out.data.iter().enumerate() {
            if v > best {
                best = v;
                best_idx = i;
            }
        }
        assert_eq!((best_idx / 32, best_idx % 32), (10, 20));
    }

    #[test]
    fn scoring_is_deterministic() {
        let input = Heatmap::new(8, 8, (0..64).map(|v| v as f32 / 64.0).collect());
        let scorer = BlobScorer::new(&BlobScorerConfig::default()).unwrap();
        assert_eq!(
            scorer.score(&input).unwrap(),
            scorer.score(&input).unwrap()
        );
    }
}
