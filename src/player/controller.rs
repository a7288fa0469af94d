use crate::{
    domain::{MediaInfo, Playlist, RadioStation, Track},
    player::{MediaEngine, MediaHandle, PlaybackState, PlayerError, PlayerEvent},
};
use crossbeam_channel::Sender;
use std::{sync::Arc, time::Duration};
use tracing::{debug, info};

/// The single mutable playback entity: what is loaded, how loud, and which
/// engine resource backs it.
pub struct PlaybackSession {
    state: PlaybackState,
    volume: f32,
    handle: Option<MediaHandle>,
}

impl PlaybackSession {
    fn new(volume: f32) -> Self {
        PlaybackSession {
            state: PlaybackState::Idle,
            volume: volume.clamp(0.0, 1.0),
            handle: None,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn handle(&self) -> Option<MediaHandle> {
        self.handle
    }
}

/// Playback state machine. Not thread aware: every call is expected to come
/// from the one context that owns it (see `PlayerCore`).
pub struct PlaybackController<E> {
    engine: E,
    playlist: Playlist,
    stations: Arc<[Arc<RadioStation>]>,
    station_cursor: Option<usize>,
    session: PlaybackSession,
    events: Sender<PlayerEvent>,
}

impl<E: MediaEngine> PlaybackController<E> {
    pub fn new(
        engine: E,
        playlist: Playlist,
        stations: Vec<RadioStation>,
        volume: f32,
        events: Sender<PlayerEvent>,
    ) -> Self {
        PlaybackController {
            engine,
            playlist,
            stations: stations.into_iter().map(Arc::new).collect(),
            station_cursor: None,
            session: PlaybackSession::new(volume),
            events,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.session.state
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn station_cursor(&self) -> Option<usize> {
        self.station_cursor
    }

    /// Acquire `track` and start it from the beginning.
    ///
    /// The new resource is acquired before the held one is released, so a
    /// missing file leaves whatever was playing untouched.
    pub fn load_track(&mut self, track: Arc<Track>) -> Result<(), PlayerError> {
        let handle = self
            .engine
            .acquire_local(track.get_resource())
            .map_err(|e| PlayerError::TrackUnavailable(e.to_string()))?;

        if let Some(pos) = self.playlist.position_of(&track) {
            self.playlist.select(pos);
        }

        self.swap_in(handle);
        info!(title = track.get_title(), %handle, "track loaded");

        self.session.state = PlaybackState::PlayingLocal(Arc::clone(&track));
        self.emit(PlayerEvent::TrackStarted(track));
        self.emit_transport();

        Ok(())
    }

    pub fn next(&mut self) -> Result<(), PlayerError> {
        self.navigate(Playlist::advance)
    }

    pub fn previous(&mut self) -> Result<(), PlayerError> {
        self.navigate(Playlist::retreat)
    }

    pub fn toggle_play_pause(&mut self) -> Result<(), PlayerError> {
        let (next, resume) = match &self.session.state {
            PlaybackState::Idle => return Ok(()),
            PlaybackState::PlayingLocal(t) => (PlaybackState::PausedLocal(Arc::clone(t)), false),
            PlaybackState::PausedLocal(t) => (PlaybackState::PlayingLocal(Arc::clone(t)), true),
            PlaybackState::PlayingRadio(s) => (PlaybackState::PausedRadio(Arc::clone(s)), false),
            PlaybackState::PausedRadio(s) => (PlaybackState::PlayingRadio(Arc::clone(s)), true),
        };

        if let Some(handle) = self.session.handle {
            match resume {
                true => self.engine.play(handle),
                false => self.engine.pause(handle),
            }
        }

        debug!(from = ?self.session.state.transport(), to = ?next.transport(), "toggled playback");
        self.session.state = next;
        self.emit_transport();

        Ok(())
    }

    /// Switch to the next radio station, wrapping after the last one.
    ///
    /// The station cursor moves even when the stream cannot be opened so that
    /// a dead station never blocks the rotation.
    pub fn cycle_radio_station(&mut self) -> Result<(), PlayerError> {
        let len = self.stations.len();
        if len == 0 {
            return Err(PlayerError::NoStations);
        }

        let idx = self.station_cursor.map_or(0, |i| (i + 1) % len);
        let station = Arc::clone(&self.stations[idx]);
        self.station_cursor = Some(idx);

        let handle = self
            .engine
            .acquire_stream(station.get_url())
            .map_err(|e| {
                PlayerError::StreamConnectionError(format!("{}: {e}", station.get_title()))
            })?;

        self.swap_in(handle);
        info!(station = station.get_title(), %handle, "station tuned");

        self.session.state = PlaybackState::PlayingRadio(Arc::clone(&station));
        self.emit(PlayerEvent::StationStarted(station));
        self.emit_transport();

        Ok(())
    }

    pub fn seek(&mut self, position: Duration) -> Result<(), PlayerError> {
        let handle = match (&self.session.state, self.session.handle) {
            (state, Some(handle)) if state.is_local() => handle,
            (state, _) if state.is_radio() => {
                return Err(PlayerError::InvalidCommand(
                    "radio streams cannot seek".to_string(),
                ));
            }
            _ => {
                return Err(PlayerError::InvalidCommand(
                    "nothing is loaded".to_string(),
                ));
            }
        };

        let duration = self.engine.duration(handle);
        let target = match duration {
            Some(d) => position.min(d),
            None => position,
        };

        self.engine
            .seek(handle, target)
            .map_err(|e| PlayerError::SeekFailed(e.to_string()))?;

        self.emit(PlayerEvent::PositionChanged {
            position: target,
            duration,
        });

        Ok(())
    }

    pub fn set_volume(&mut self, level: f32) -> Result<(), PlayerError> {
        if level.is_nan() {
            return Err(PlayerError::InvalidCommand(
                "volume must be a number".to_string(),
            ));
        }

        let level = level.clamp(0.0, 1.0);
        self.session.volume = level;

        if let Some(handle) = self.session.handle {
            self.engine.set_volume(handle, level);
        }
        self.emit(PlayerEvent::VolumeChanged(level));

        Ok(())
    }

    /// The engine finished rendering `handle`. Behaves like `next()` when the
    /// handle is the one currently playing; anything else is a stale notice.
    pub fn on_finished(&mut self, handle: MediaHandle) -> Result<(), PlayerError> {
        let current = matches!(self.session.state, PlaybackState::PlayingLocal(_))
            && self.session.handle == Some(handle);

        match current {
            true => self.next(),
            false => {
                debug!(%handle, "ignoring stale finish notice");
                Ok(())
            }
        }
    }

    /// Periodic refresh, only meaningful for local tracks
    pub fn on_tick(&mut self) {
        if !self.session.state.is_local() {
            return;
        }

        if let Some(handle) = self.session.handle {
            self.emit(PlayerEvent::PositionChanged {
                position: self.engine.position(handle),
                duration: self.engine.duration(handle),
            });
        }
    }

    /// Release the held resource and return to `Idle`
    pub fn teardown(&mut self) {
        let was_active = self.session.handle.is_some() || self.session.state != PlaybackState::Idle;

        self.release();
        self.session.state = PlaybackState::Idle;

        if was_active {
            info!("playback session torn down");
            self.emit(PlayerEvent::Stopped);
            self.emit_transport();
        }
    }

    fn navigate(
        &mut self,
        step: fn(&mut Playlist) -> Result<Arc<Track>, PlayerError>,
    ) -> Result<(), PlayerError> {
        if !self.session.state.is_local() {
            debug!("track navigation ignored outside local playback");
            return Ok(());
        }

        let origin = self.playlist.cursor();
        let track = step(&mut self.playlist)?;

        if let Err(e) = self.load_track(track) {
            self.playlist.select(origin);
            return Err(e);
        }
        Ok(())
    }

    fn swap_in(&mut self, handle: MediaHandle) {
        self.release();

        self.engine.set_volume(handle, self.session.volume);
        self.engine.play(handle);
        self.session.handle = Some(handle);
    }

    fn release(&mut self) {
        if let Some(handle) = self.session.handle.take() {
            debug!(%handle, "releasing resource");
            self.engine.stop(handle);
        }
    }

    fn emit_transport(&self) {
        self.emit(PlayerEvent::TransportChanged(self.session.state.transport()));
    }

    fn emit(&self, event: PlayerEvent) {
        let _ = self.events.send(event);
    }

    #[cfg(test)]
    fn engine(&self) -> &E {
        &self.engine
    }
}
