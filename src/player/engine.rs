//! The boundary between the playback controller and whatever renders audio.

use std::{fmt, time::Duration};
use thiserror::Error;

/// Opaque id of a resource acquired from a [`MediaEngine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaHandle(pub u64);

impl fmt::Display for MediaHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Notices pushed by the engine into the player's inbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// A local resource reached its end. Streams never finish.
    Finished(MediaHandle),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("could not decode {0}")]
    Decode(String),

    #[error("{0}")]
    Seek(String),
}

/// Audio backend driven by the playback controller.
///
/// Acquired resources start paused; nothing renders until `play` is called.
/// Calls made with a handle the engine no longer holds are ignored.
pub trait MediaEngine {
    fn acquire_local(&mut self, resource: &str) -> Result<MediaHandle, EngineError>;
    fn acquire_stream(&mut self, url: &str) -> Result<MediaHandle, EngineError>;

    fn play(&mut self, handle: MediaHandle);
    fn pause(&mut self, handle: MediaHandle);
    /// Stops and releases the resource
    fn stop(&mut self, handle: MediaHandle);
    fn seek(&mut self, handle: MediaHandle, position: Duration) -> Result<(), EngineError>;
    fn set_volume(&mut self, handle: MediaHandle, level: f32);

    fn position(&self, handle: MediaHandle) -> Duration;
    fn duration(&self, handle: MediaHandle) -> Option<Duration>;
}
