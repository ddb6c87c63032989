//! Detection pipeline for the flypeak service: channel normalization,
//! unit scaling, bilinear resize, scoring, and non-maximum-suppression
//! peak extraction.

pub mod peaks;
pub mod pipeline;
pub mod resize;
pub mod scorer;

pub use peaks::PeakExtractor;
pub use pipeline::{Detector, DetectorConfig};
pub use scorer::{BlobScorer, BlobScorerConfig};
