use thiserror::Error;

use crate::types::{ErrorKind, ErrorReply};

/// Top-level error type for the flypeak service.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error(
        "invalid image shape: {rows}x{cols}x{channels} requires {expected} bytes, got {actual}"
    )]
    InvalidImageShape {
        rows: u32,
        cols: u32,
        channels: u32,
        expected: usize,
        actual: usize,
    },

    #[error("unknown request variant: tag {0}")]
    UnknownRequestVariant(u8),

    #[error("scoring unavailable: {0}")]
    ScoringUnavailable(String),

    #[error("tracking is not implemented")]
    TrackingNotImplemented,

    #[error("frame of {size} bytes exceeds maximum {max}")]
    FrameTooLarge { size: u32, max: u32 },

    #[error("connection closed")]
    ConnectionClosed,

    /// An error reply received from the server, surfaced client-side.
    #[error("server error ({kind:?}): {message}")]
    Remote { kind: ErrorKind, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DetectError>;

impl From<&DetectError> for ErrorReply {
    /// Collapse an internal error onto the closed wire error set.
    fn from(err: &DetectError) -> Self {
        let kind = match err {
            DetectError::Decode(_) => ErrorKind::Malformed,
            DetectError::UnknownRequestVariant(_) => ErrorKind::UnknownRequest,
            DetectError::InvalidImageShape { .. } => ErrorKind::InvalidImageShape,
            DetectError::ScoringUnavailable(_) => ErrorKind::Scoring,
            DetectError::TrackingNotImplemented => ErrorKind::TrackingNotImplemented,
            _ => ErrorKind::Internal,
        };
        ErrorReply {
            kind,
            message: err.to_string(),
        }
    }
}

impl From<ErrorReply> for DetectError {
    fn from(reply: ErrorReply) -> Self {
        DetectError::Remote {
            kind: reply.kind,
            message: reply.message,
        }
    }
}
