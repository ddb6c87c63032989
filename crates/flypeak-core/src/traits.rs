use crate::error::Result;
use crate::types::Heatmap;

/// The scoring function boundary: fixed-resolution unit-range input
/// tensor in, response heatmap out.
///
/// Implementations must be deterministic, side-effect-free, and keep
/// no state across calls — the pipeline relies on identical bytes
/// producing identical heatmaps. `Send + Sync` so a detector can be
/// moved into a serving thread.
pub trait Scorer: Send + Sync {
    /// Human-readable backend name for logging.
    fn name(&self) -> &str;

    /// Score one frame. `input` values are in `[0, 1]`.
    fn score(&self, input: &Heatmap) -> Result<Heatmap>;
}
