use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};

use flypeak_core::{DetectError, ErrorReply, Reply, Request, Result};
use flypeak_detect::Detector;
use flypeak_proto::{decode_request, encode_reply, read_frame, write_frame};

/// Single-threaded, blocking request/reply detection server.
///
/// State machine per connection: await one frame → dispatch → write
/// exactly one reply → await the next frame. One connection is served
/// at a time; a disconnect returns the loop to `accept`. A bad request
/// produces an error reply, never a process exit.
pub struct DetectionServer {
    listener: TcpListener,
    detector: Detector,
}

impl DetectionServer {
    /// Bind the serving endpoint.
    pub fn bind<A: ToSocketAddrs>(addr: A, detector: Detector) -> Result<Self> {
        let listener = TcpListener::bind(addr)?;
        tracing::info!(addr = %listener.local_addr()?, "detection server bound");
        Ok(Self { listener, detector })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve forever. Only a listener-level I/O failure returns.
    pub fn run(&self) -> Result<()> {
        loop {
            let (mut stream, peer) = self.listener.accept()?;
            tracing::info!(%peer, "client connected");
            match self.serve_connection(&mut stream) {
                Ok(()) => tracing::info!(%peer, "client disconnected"),
                // A torn frame or write failure only ends this
                // connection; the next accept proceeds.
                Err(e) => tracing::warn!(%peer, error = %e, "connection aborted"),
            }
        }
    }

    /// Strict request/reply alternation until the peer hangs up.
    fn serve_connection(&self, stream: &mut TcpStream) -> Result<()> {
        stream.set_nodelay(true)?;
        loop {
            let payload = match read_frame(stream) {
                Ok(payload) => payload,
                Err(DetectError::ConnectionClosed) => return Ok(()),
                Err(e) => return Err(e),
            };

            let reply = self.dispatch(&payload);
            write_frame(stream, &encode_reply(&reply)?)?;
        }
    }

    /// Decode and handle one request; every failure becomes an error
    /// reply so the client is never left waiting.
    fn dispatch(&self, payload: &[u8]) -> Reply {
        let request = match decode_request(payload) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "rejecting undecodable request");
                return Reply::Error(ErrorReply::from(&e));
            }
        };

        match request {
            Request::Detect(req) => match self.detector.handle(&req) {
                Ok(rep) => Reply::Detections(rep),
                Err(e) => {
                    tracing::warn!(error = %e, "detection failed");
                    Reply::Error(ErrorReply::from(&e))
                }
            },
            Request::Track(_) => {
                // Declared in the protocol, deliberately not silent:
                // the client gets a typed error instead of a hang.
                Reply::Error(ErrorReply::from(&DetectError::TrackingNotImplemented))
            }
        }
    }
}
