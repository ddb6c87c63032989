//! The flypeak serving side: configuration and the single-threaded
//! TCP request/reply loop. The `flypeak` binary wires a scorer and a
//! detector into [`server::DetectionServer`].

pub mod config;
pub mod server;

pub use config::ServerConfig;
pub use server::DetectionServer;
