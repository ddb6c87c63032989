use serde::{Deserialize, Serialize};

/// Single- or multi-channel byte image, row-major, interleaved channels.
///
/// The detection pipeline only ever looks at the first channel; extra
/// channels are legal on the wire and dropped during preprocessing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub rows: u32,
    pub cols: u32,
    pub channels: u32,
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
}

impl Image {
    /// Wrap a single-channel grayscale buffer.
    pub fn gray(rows: u32, cols: u32, data: Vec<u8>) -> Self {
        Self {
            rows,
            cols,
            channels: 1,
            data,
        }
    }

    /// Number of bytes the declared shape requires.
    pub fn expected_len(&self) -> usize {
        self.rows as usize * self.cols as usize * self.channels as usize
    }
}

/// Dense f32 score field, row-major, single channel.
///
/// Doubles as the scorer's input tensor (values in `[0, 1]` there);
/// as a scorer output the value range is model-dependent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    pub rows: u32,
    pub cols: u32,
    pub data: Vec<f32>,
}

impl Heatmap {
    pub fn new(rows: u32, cols: u32, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), rows as usize * cols as usize);
        Self { rows, cols, data }
    }

    pub fn zeros(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows as usize * cols as usize],
        }
    }

    /// Value at (row, col). Callers guarantee in-range indices.
    #[inline]
    pub fn at(&self, row: u32, col: u32) -> f32 {
        self.data[row as usize * self.cols as usize + col as usize]
    }
}

/// A single detection, normalized to `[0, 1)` per axis.
///
/// `x` runs along columns, `y` along rows — the display convention,
/// not the tensor's (row, col) order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub x: f32,
    pub y: f32,
}

/// Ask the server to locate fly centroids in one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRequest {
    pub image: Image,
    /// Include the response heatmap in the reply.
    pub return_heatmap: bool,
    /// Run peak extraction and include the peaks in the reply.
    pub return_peaks: bool,
    /// Resize the heatmap back to the input image's dimensions.
    pub upsample_heatmap: bool,
}

/// Declared tracking request. The serving side currently rejects these
/// with an explicit error rather than leaving the caller waiting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingRequest {
    /// Opaque tracker state carried across calls, if any.
    #[serde(default)]
    pub context: Option<serde_bytes::ByteBuf>,
}

/// Every message a client can send.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Detect(DetectionRequest),
    Track(TrackingRequest),
}

/// Successful detection reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResponse {
    /// Present iff `return_heatmap` was set on the request.
    pub heatmap: Option<Heatmap>,
    /// Empty unless `return_peaks` was set on the request.
    pub peaks: Vec<Peak>,
}

/// Closed set of failure categories a server can report on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Request bytes could not be decoded.
    Malformed,
    /// Request tag did not name a known variant.
    UnknownRequest,
    /// Image buffer length disagreed with the declared shape.
    InvalidImageShape,
    /// Scoring function construction or invocation failed.
    Scoring,
    /// Tracking requests are not implemented.
    TrackingNotImplemented,
    /// Anything else that went wrong while handling the request.
    Internal,
}

/// Error reply: a distinct wire shape so clients can never confuse a
/// failure with detection data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReply {
    pub kind: ErrorKind,
    pub message: String,
}

/// Every message a server can send back.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Detections(DetectionResponse),
    Error(ErrorReply),
}
