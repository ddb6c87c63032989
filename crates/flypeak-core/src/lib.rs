pub mod error;
pub mod traits;
pub mod types;

pub use error::{DetectError, Result};
pub use traits::Scorer;
pub use types::{
    DetectionRequest, DetectionResponse, ErrorKind, ErrorReply, Heatmap, Image, Peak, Reply,
    Request, TrackingRequest,
};
