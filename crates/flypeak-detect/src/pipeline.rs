use serde::{Deserialize, Serialize};

use flypeak_core::{DetectError, DetectionRequest, DetectionResponse, Heatmap, Result, Scorer};

use crate::peaks::PeakExtractor;
use crate::resize::resize_heatmap;

/// Runtime configuration for the detection pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Scoring function input height, independent of source image size.
    pub input_rows: u32,
    /// Scoring function input width.
    pub input_cols: u32,
    /// Non-maximum-suppression window side length (odd).
    pub nms_window: usize,
    /// Peak threshold coefficient in (0, 1), applied to the global max.
    pub peak_threshold: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            input_rows: 512,
            input_cols: 512,
            nms_window: 3,
            peak_threshold: 0.5,
        }
    }
}

/// Turns a `DetectionRequest` into a `DetectionResponse`.
///
/// Stages: shape validation → first-channel extraction → scale to
/// `[0, 1]` → resize to the scoring resolution → score → optional
/// upsample → optional peak extraction → response assembly. No state
/// is kept across calls.
pub struct Detector {
    scorer: Box<dyn Scorer>,
    extractor: PeakExtractor,
    config: DetectorConfig,
}

impl Detector {
    pub fn new(scorer: Box<dyn Scorer>, config: DetectorConfig) -> Self {
        let extractor = PeakExtractor::default()
            .with_window(config.nms_window)
            .with_threshold(config.peak_threshold);
        tracing::info!(
            scorer = scorer.name(),
            input_rows = config.input_rows,
            input_cols = config.input_cols,
            "detector ready"
        );
        Self {
            scorer,
            extractor,
            config,
        }
    }

    /// Run the full pipeline for one request.
    pub fn handle(&self, req: &DetectionRequest) -> Result<DetectionResponse> {
        let image = &req.image;
        let expected = image.expected_len();
        if image.rows == 0 || image.cols == 0 || image.channels == 0 || image.data.len() != expected
        {
            return Err(DetectError::InvalidImageShape {
                rows: image.rows,
                cols: image.cols,
                channels: image.channels,
                expected,
                actual: image.data.len(),
            });
        }

        // First channel only, scaled to unit range.
        let step = image.channels as usize;
        let gray: Vec<f32> = image
            .data
            .iter()
            .step_by(step)
            .map(|&b| b as f32 / 255.0)
            .collect();
        let unit = Heatmap::new(image.rows, image.cols, gray);

        // Normalize to the scoring function's fixed resolution.
        let input = resize_heatmap(&unit, self.config.input_rows, self.config.input_cols);

        let mut heatmap = self.scorer.score(&input)?;
        tracing::debug!(
            rows = heatmap.rows,
            cols = heatmap.cols,
            "scored frame"
        );

        if req.upsample_heatmap {
            heatmap = resize_heatmap(&heatmap, image.rows, image.cols);
        }

        // Peaks come from the same map a caller would receive, so the
        // coordinates line up with any returned heatmap.
        let peaks = if req.return_peaks {
            self.extractor.extract(&heatmap)
        } else {
            Vec::new()
        };

        Ok(DetectionResponse {
            heatmap: req.return_heatmap.then_some(heatmap),
            peaks,
        })
    }

    /// Push one dummy frame through the pipeline so one-time costs and
    /// scorer failures surface at startup instead of on the first
    /// request.
    pub fn warmup(&self) -> Result<()> {
        tracing::info!("warming up detector");
        let req = DetectionRequest {
            image: flypeak_core::Image::gray(64, 64, vec![128; 64 * 64]),
            return_heatmap: false,
            return_peaks: true,
            upsample_heatmap: false,
        };
        self.handle(&req)?;
        tracing::info!("warmup complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flypeak_core::Image;

    /// Scorer that hands its input straight back.
    struct EchoScorer;

    impl Scorer for EchoScorer {
        fn name(&self) -> &str {
            "echo"
        }
        fn score(&self, input: &Heatmap) -> Result<Heatmap> {
            Ok(input.clone())
        }
    }

    /// Scorer that always emits a fixed 4x4 map with maxima at (1,1)
    /// and (3,3).
    struct FixedScorer;

    impl Scorer for FixedScorer {
        fn name(&self) -> &str {
            "fixed"
        }
        fn score(&self, _input: &Heatmap) -> Result<Heatmap> {
            #[rustfmt::skip]
            let data = vec![
                0.0, 0.0, 0.0, 0.0,
                0.0, 5.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 9.0,
            ];
            Ok(Heatmap::new(4, 4, data))
        }
    }

    fn small_config(rows: u32, cols: u32) -> DetectorConfig {
        DetectorConfig {
            input_rows: rows,
            input_cols: cols,
            ..DetectorConfig::default()
        }
    }

    fn request(image: Image) -> DetectionRequest {
        DetectionRequest {
            image,
            return_heatmap: true,
            return_peaks: true,
            upsample_heatmap: false,
        }
    }

    #[test]
    fn rejects_buffer_shape_mismatch() {
        let det = Detector::new(Box::new(EchoScorer), small_config(4, 4));
        let req = request(Image::gray(4, 4, vec![0; 15]));
        match det.handle(&req) {
            Err(DetectError::InvalidImageShape {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 15);
            }
            other => panic!("expected shape error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_dimensions() {
        let det = Detector::new(Box::new(EchoScorer), small_config(4, 4));
        let req = request(Image::gray(0, 4, Vec::new()));
        assert!(matches!(
            det.handle(&req),
            Err(DetectError::InvalidImageShape { .. })
        ));
    }

    #[test]
    fn keeps_only_first_channel() {
        // Two-channel image: channel 0 is the pattern, channel 1 noise.
        let mut data = Vec::new();
        for &v in &[0u8, 255, 255, 0] {
            data.push(v);
            data.push(77);
        }
        let image = Image {
            rows: 2,
            cols: 2,
            channels: 2,
            data,
        };
        let det = Detector::new(Box::new(EchoScorer), small_config(2, 2));
        let rep = det.handle(&request(image)).unwrap();
        let map = rep.heatmap.unwrap();
        assert_eq!(map.data, vec![0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn heatmap_present_iff_requested() {
        let det = Detector::new(Box::new(FixedScorer), small_config(4, 4));
        let image = Image::gray(4, 4, vec![0; 16]);

        let mut req = request(image.clone());
        req.return_heatmap = false;
        assert!(det.handle(&req).unwrap().heatmap.is_none());

        let req = request(image);
        assert!(det.handle(&req).unwrap().heatmap.is_some());
    }

    #[test]
    fn peaks_empty_unless_requested() {
        let det = Detector::new(Box::new(FixedScorer), small_config(4, 4));
        let mut req = request(Image::gray(4, 4, vec![0; 16]));
        req.return_peaks = false;
        assert!(det.handle(&req).unwrap().peaks.is_empty());
    }

    #[test]
    fn fixed_map_yields_the_single_surviving_peak() {
        let det = Detector::new(Box::new(FixedScorer), small_config(4, 4));
        let rep = det.handle(&request(Image::gray(4, 4, vec![0; 16]))).unwrap();
        assert_eq!(rep.peaks.len(), 1);
        assert_eq!(rep.peaks[0].x, 0.75);
        assert_eq!(rep.peaks[0].y, 0.75);
    }

    #[test]
    fn upsampled_heatmap_matches_source_dimensions() {
        let det = Detector::new(Box::new(FixedScorer), small_config(4, 4));
        let mut req = request(Image::gray(8, 8, vec![0; 64]));
        req.upsample_heatmap = true;
        let rep = det.handle(&req).unwrap();

        let map = rep.heatmap.unwrap();
        assert_eq!((map.rows, map.cols), (8, 8));

        // The 9 at source (3, 3) lands exactly on upsampled (7, 7);
        // peaks are extracted from the upsampled map.
        assert_eq!(rep.peaks, vec![flypeak_core::Peak { x: 0.875, y: 0.875 }]);
    }

    #[test]
    fn warmup_succeeds_with_real_backend() {
        let scorer = crate::scorer::BlobScorer::new(&crate::scorer::BlobScorerConfig::default())
            .unwrap();
        let det = Detector::new(Box::new(scorer), DetectorConfig::default());
        det.warmup().unwrap();
    }
}
