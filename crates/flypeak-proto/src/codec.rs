//! Tag-dispatched MessagePack codec for requests and replies.

use serde::de::DeserializeOwned;
use serde::Serialize;

use flypeak_core::{
    DetectError, DetectionRequest, DetectionResponse, ErrorReply, Reply, Request, Result,
    TrackingRequest,
};

/// Request payload tags.
const TAG_DETECT: u8 = 1;
const TAG_TRACK: u8 = 2;

/// Reply payload tags.
const TAG_DETECTIONS: u8 = 1;
const TAG_ERROR: u8 = 2;

fn encode_body<T: Serialize>(tag: u8, body: &T) -> Result<Vec<u8>> {
    // Named fields keep the schema self-describing across versions.
    let encoded =
        rmp_serde::to_vec_named(body).map_err(|e| DetectError::Encode(e.to_string()))?;
    let mut payload = Vec::with_capacity(1 + encoded.len());
    payload.push(tag);
    payload.extend_from_slice(&encoded);
    Ok(payload)
}

fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    rmp_serde::from_slice(body).map_err(|e| DetectError::Decode(e.to_string()))
}

pub fn encode_request(request: &Request) -> Result<Vec<u8>> {
    match request {
        Request::Detect(body) => encode_body(TAG_DETECT, body),
        Request::Track(body) => encode_body(TAG_TRACK, body),
    }
}

/// Decode a request payload. Never panics on malformed input: an empty
/// payload or garbage body is a `Decode` error, and an unrecognized
/// tag is reported distinctly as `UnknownRequestVariant`.
pub fn decode_request(payload: &[u8]) -> Result<Request> {
    let (&tag, body) = payload
        .split_first()
        .ok_or_else(|| DetectError::Decode("empty request payload".into()))?;
    match tag {
        TAG_DETECT => Ok(Request::Detect(decode_body::<DetectionRequest>(body)?)),
        TAG_TRACK => Ok(Request::Track(decode_body::<TrackingRequest>(body)?)),
        other => Err(DetectError::UnknownRequestVariant(other)),
    }
}

pub fn encode_reply(reply: &Reply) -> Result<Vec<u8>> {
    match reply {
        Reply::Detections(body) => encode_body(TAG_DETECTIONS, body),
        Reply::Error(body) => encode_body(TAG_ERROR, body),
    }
}

pub fn decode_reply(payload: &[u8]) -> Result<Reply> {
    let (&tag, body) = payload
        .split_first()
        .ok_or_else(|| DetectError::Decode("empty reply payload".into()))?;
    match tag {
        TAG_DETECTIONS => Ok(Reply::Detections(decode_body::<DetectionResponse>(body)?)),
        TAG_ERROR => Ok(Reply::Error(decode_body::<ErrorReply>(body)?)),
        other => Err(DetectError::Decode(format!("unknown reply tag {other}"))),
    }
}
