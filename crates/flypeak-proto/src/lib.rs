//! Wire protocol for the flypeak detection service.
//!
//! A message is one frame on a reliable byte stream:
//!
//! ```text
//! ┌────────────┬─────┬──────────────────┐
//! │ Length     │ Tag │ Body             │
//! │ 4 bytes BE │ 1 B │ MessagePack      │
//! └────────────┴─────┴──────────────────┘
//! ```
//!
//! The length prefix restores message boundaries on TCP; the tag byte
//! selects the message variant so an unrecognized request stays
//! distinguishable from a parse failure; the body is MessagePack with
//! named fields.

pub mod codec;
pub mod frame;

pub use codec::{decode_reply, decode_request, encode_reply, encode_request};
pub use frame::{read_frame, write_frame, DEFAULT_MAX_FRAME};
