use super::Track;
use crate::player::PlayerError;
use std::sync::Arc;

/// Ordered, session-immutable track list with a wrapping cursor.
///
/// Cloning is cheap: clones share the same track sequence and only copy the cursor.
#[derive(Clone)]
pub struct Playlist {
    tracks: Arc<[Arc<Track>]>,
    cursor: usize,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>, cursor: usize) -> Self {
        let tracks: Arc<[Arc<Track>]> = tracks.into_iter().map(Arc::new).collect();
        let cursor = match cursor < tracks.len() {
            true => cursor,
            false => 0,
        };

        Playlist { tracks, cursor }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn tracks(&self) -> &[Arc<Track>] {
        &self.tracks
    }

    pub fn get(&self, idx: usize) -> Option<Arc<Track>> {
        self.tracks.get(idx).cloned()
    }

    pub fn current_track(&self) -> Option<Arc<Track>> {
        self.get(self.cursor)
    }

    pub fn advance(&mut self) -> Result<Arc<Track>, PlayerError> {
        let len = self.non_empty_len()?;
        self.cursor = (self.cursor + 1) % len;
        self.current_track().ok_or(PlayerError::EmptyPlaylist)
    }

    pub fn retreat(&mut self) -> Result<Arc<Track>, PlayerError> {
        let len = self.non_empty_len()?;
        self.cursor = (self.cursor + len - 1) % len;
        self.current_track().ok_or(PlayerError::EmptyPlaylist)
    }

    /// Moves the cursor to `idx`. Out of range indices leave the cursor untouched.
    pub fn select(&mut self, idx: usize) -> Option<Arc<Track>> {
        let track = self.get(idx)?;
        self.cursor = idx;
        Some(track)
    }

    /// Position of `track`, preferring the cursor when it already points at an equal track
    pub fn position_of(&self, track: &Track) -> Option<usize> {
        if self.current_track().is_some_and(|t| *t == *track) {
            return Some(self.cursor);
        }
        self.tracks.iter().position(|t| **t == *track)
    }

    fn non_empty_len(&self) -> Result<usize, PlayerError> {
        match self.tracks.len() {
            0 => Err(PlayerError::EmptyPlaylist),
            len => Ok(len),
        }
    }
}
