//! Length-delimited framing over any `Read`/`Write` byte stream.

use std::io::{Read, Write};

use flypeak_core::{DetectError, Result};

/// Length prefix size in bytes (u32, big endian).
pub const LEN_PREFIX_SIZE: usize = 4;

/// Default maximum frame size (64 MB) — comfortably above any
/// realistic camera frame, well below an allocation attack.
pub const DEFAULT_MAX_FRAME: u32 = 64 * 1024 * 1024;

/// Write one frame: length prefix followed by the payload.
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<()> {
    let len = u32::try_from(payload.len()).map_err(|_| DetectError::FrameTooLarge {
        size: u32::MAX,
        max: DEFAULT_MAX_FRAME,
    })?;
    if len > DEFAULT_MAX_FRAME {
        return Err(DetectError::FrameTooLarge {
            size: len,
            max: DEFAULT_MAX_FRAME,
        });
    }
    writer.write_all(&len.to_be_bytes())?;
    writer.write_all(payload)?;
    writer.flush()?;
    Ok(())
}

/// Read one frame, blocking until it is complete.
///
/// A clean end-of-stream at a frame boundary is `ConnectionClosed`;
/// EOF mid-frame is an I/O error. A declared length above the maximum
/// is rejected before any payload allocation.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut prefix = [0u8; LEN_PREFIX_SIZE];
    read_exact_or_closed(reader, &mut prefix)?;

    let len = u32::from_be_bytes(prefix);
    if len > DEFAULT_MAX_FRAME {
        return Err(DetectError::FrameTooLarge {
            size: len,
            max: DEFAULT_MAX_FRAME,
        });
    }

    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload)?;
    Ok(payload)
}

/// Like `read_exact`, but EOF before the first byte maps to
/// `ConnectionClosed` so callers can tell a hangup from a torn frame.
fn read_exact_or_closed<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Err(DetectError::ConnectionClosed),
            Ok(0) => {
                return Err(DetectError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "stream ended inside a frame header",
                )))
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(DetectError::Io(e)),
        }
    }
    Ok(())
}
