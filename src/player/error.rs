use thiserror::Error;

/// Everything the playback core reports back to the presentation layer.
/// None of these are fatal, and none are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayerError {
    #[error("The playlist is empty")]
    EmptyPlaylist,

    #[error("Track unavailable: {0}")]
    TrackUnavailable(String),

    #[error("Could not connect to stream: {0}")]
    StreamConnectionError(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Seek failed: {0}")]
    SeekFailed(String),

    #[error("No radio stations configured")]
    NoStations,
}
