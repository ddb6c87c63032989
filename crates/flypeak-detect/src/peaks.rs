use flypeak_core::{Heatmap, Peak};

/// Non-maximum-suppression peak extractor.
///
/// Algorithm:
/// 1. Square sliding-window maximum filter (edge-clamped, same-size
///    output, separable row/column passes)
/// 2. Cells equal to their windowed max survive; all others are zeroed
/// 3. Global max `M` over the suppressed map; `M <= 0` yields nothing
/// 4. Keep cells with value strictly above `threshold * M`
/// 5. Emit normalized `(x, y)` points in row-major scan order
#[derive(Debug, Clone)]
pub struct PeakExtractor {
    /// Side length of the square suppression window. Must be odd.
    window: usize,
    /// Fraction of the global maximum a peak must exceed, in (0, 1).
    threshold: f32,
}

impl Default for PeakExtractor {
    fn default() -> Self {
        Self {
            window: 3,
            threshold: 0.5,
        }
    }
}

impl PeakExtractor {
    pub fn with_window(mut self, window: usize) -> Self {
        debug_assert!(window % 2 == 1, "suppression window must be odd");
        self.window = window;
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Extract peaks from a heatmap.
    ///
    /// Ties are not broken: every cell that equals its windowed max and
    /// clears the threshold is reported.
    pub fn extract(&self, map: &Heatmap) -> Vec<Peak> {
        let rows = map.rows as usize;
        let cols = map.cols as usize;
        if rows == 0 || cols == 0 {
            return Vec::new();
        }

        // Separable sliding-window maximum: rows, then columns.
        let mut tmp = vec![f32::NEG_INFINITY; rows * cols];
        max_filter_rows(&map.data, &mut tmp, cols, rows, self.window);
        let mut windowed = vec![f32::NEG_INFINITY; rows * cols];
        max_filter_cols(&tmp, &mut windowed, cols, rows, self.window);

        // Suppress everything that is not a local maximum, then find
        // the global maximum over what survives.
        let mut global_max = f32::NEG_INFINITY;
        for (i, &v) in map.data.iter().enumerate() {
            if v == windowed[i] && v > global_max {
                global_max = v;
            }
        }

        // Flat or non-positive maps produce no peaks; this also keeps
        // the threshold well-defined without dividing by zero.
        if !(global_max > 0.0) {
            tracing::debug!(global_max, "degenerate heatmap, no peaks");
            return Vec::new();
        }

        let cutoff = self.threshold * global_max;
        let mut peaks = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                let i = r * cols + c;
                let v = map.data[i];
                if v == windowed[i] && v > cutoff {
                    peaks.push(Peak {
                        x: c as f32 / cols as f32,
                        y: r as f32 / rows as f32,
                    });
                }
            }
        }

        tracing::debug!(peaks = peaks.len(), global_max, cutoff, "peak extraction");
        peaks
    }
}

/// Horizontal sliding-window maximum with edge clamping.
///
/// For an odd window `k`, each output cell is the maximum of the input
/// over `[x - (k-1)/2, x + k/2]`, intersected with the row.
fn max_filter_rows(input: &[f32], output: &mut [f32], w: usize, h: usize, k: usize) {
    let r_left = (k - 1) / 2;
    let r_right = k / 2;
    for y in 0..h {
        let row = y * w;
        for x in 0..w {
            let lo = x.saturating_sub(r_left);
            let hi = (x + r_right).min(w - 1);
            let mut m = f32::NEG_INFINITY;
            for i in lo..=hi {
                m = m.max(input[row + i]);
            }
            output[row + x] = m;
        }
    }
}

/// Vertical sliding-window maximum with edge clamping.
fn max_filter_cols(input: &[f32], output: &mut [f32], w: usize, h: usize, k: usize) {
    let r_top = (k - 1) / 2;
    let r_bot = k / 2;
    for x in 0..w {
        for y in 0..h {
            let lo = y.saturating_sub(r_top);
            let hi = (y + r_bot).min(h - 1);
            let mut m = f32::NEG_INFINITY;
            for i in lo..=hi {
                m = m.max(input[i * w + x]);
            }
            output[y * w + x] = m;
        }
    }
}
