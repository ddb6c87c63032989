//! Blocking detection client.
//!
//! One request, one reply, in strict alternation: [`Client::detect`]
//! sends a single frame and blocks until the matching reply arrives.
//! Issuing a second request before the first reply has been read is
//! not possible through this API — `detect` takes `&mut self` and
//! always consumes the reply before returning.

use std::net::{TcpStream, ToSocketAddrs};

use flypeak_core::{
    DetectError, DetectionRequest, Heatmap, Image, Peak, Reply, Request, Result,
};
use flypeak_proto::{decode_reply, encode_request, read_frame, write_frame};

/// Which parts of the detection response the client asks for.
#[derive(Debug, Clone, Copy)]
pub struct ClientConfig {
    pub return_heatmap: bool,
    pub return_peaks: bool,
    pub upsample_heatmap: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            return_heatmap: true,
            return_peaks: true,
            upsample_heatmap: true,
        }
    }
}

/// A connected detection client.
pub struct Client {
    stream: TcpStream,
    config: ClientConfig,
}

impl Client {
    /// Connect with default flags (heatmap, peaks, and upsampling on).
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        Self::connect_with(addr, ClientConfig::default())
    }

    pub fn connect_with<A: ToSocketAddrs>(addr: A, config: ClientConfig) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        tracing::debug!(peer = %stream.peer_addr()?, "connected to detection server");
        Ok(Self { stream, config })
    }

    /// Detect fly centroids in one frame.
    ///
    /// Returns the heatmap (when configured) and the peak list. An
    /// error reply from the server is surfaced as
    /// [`DetectError::Remote`], never parsed as detection data.
    pub fn detect(&mut self, image: &Image) -> Result<(Option<Heatmap>, Vec<Peak>)> {
        let request = Request::Detect(DetectionRequest {
            image: image.clone(),
            return_heatmap: self.config.return_heatmap,
            return_peaks: self.config.return_peaks,
            upsample_heatmap: self.config.upsample_heatmap,
        });

        write_frame(&mut self.stream, &encode_request(&request)?)?;
        let payload = read_frame(&mut self.stream)?;

        match decode_reply(&payload)? {
            Reply::Detections(rep) => {
                tracing::debug!(peaks = rep.peaks.len(), "detection reply");
                Ok((rep.heatmap, rep.peaks))
            }
            Reply::Error(err) => Err(DetectError::from(err)),
        }
    }
}
