use crate::{
    domain::{Playlist, RadioStation, Track},
    player::{
        DEFAULT_TICK, DEFAULT_VOLUME, EngineEvent, MediaEngine, PlayerCommand, PlayerEvent,
        core::PlayerCore,
    },
};
use anyhow::Result;
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::{sync::Arc, thread::JoinHandle, time::Duration};

#[derive(Debug, Clone, Copy)]
pub struct PlayerOptions {
    pub volume: f32,
    pub tick_interval: Duration,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        PlayerOptions {
            volume: DEFAULT_VOLUME,
            tick_interval: DEFAULT_TICK,
        }
    }
}

/// Front door to the player thread. Every command is queued and returns
/// immediately; outcomes arrive later as [`PlayerEvent`]s.
pub struct PlayerHandle {
    commands: Sender<PlayerCommand>,
    events: Receiver<PlayerEvent>,
    thread_handle: Option<JoinHandle<()>>,
}

impl PlayerHandle {
    pub fn spawn<E, F>(
        factory: F,
        playlist: Playlist,
        stations: Vec<RadioStation>,
        options: PlayerOptions,
    ) -> Result<Self>
    where
        E: MediaEngine + 'static,
        F: FnOnce(Sender<EngineEvent>) -> Result<E> + Send + 'static,
    {
        let (cmd_tx, cmd_rx) = unbounded();
        let (evt_tx, evt_rx) = unbounded();

        let thread_handle = PlayerCore::spawn(factory, playlist, stations, options, cmd_rx, evt_tx)?;

        Ok(Self {
            commands: cmd_tx,
            events: evt_rx,
            thread_handle: Some(thread_handle),
        })
    }
}

// =====================
//    COMMAND HANDLER
// =====================
impl PlayerHandle {
    pub fn load_track(&self, track: Arc<Track>) -> Result<()> {
        self.commands.send(PlayerCommand::LoadTrack(track))?;
        Ok(())
    }

    pub fn next(&self) -> Result<()> {
        self.commands.send(PlayerCommand::Next)?;
        Ok(())
    }

    pub fn previous(&self) -> Result<()> {
        self.commands.send(PlayerCommand::Previous)?;
        Ok(())
    }

    pub fn toggle_playback(&self) -> Result<()> {
        self.commands.send(PlayerCommand::TogglePlayback)?;
        Ok(())
    }

    pub fn cycle_station(&self) -> Result<()> {
        self.commands.send(PlayerCommand::CycleStation)?;
        Ok(())
    }

    pub fn seek(&self, position: Duration) -> Result<()> {
        self.commands.send(PlayerCommand::Seek(position))?;
        Ok(())
    }

    pub fn set_volume(&self, level: f32) -> Result<()> {
        self.commands.send(PlayerCommand::SetVolume(level))?;
        Ok(())
    }

    /// End the playback session; the player thread stays up for the next one
    pub fn stop(&self) -> Result<()> {
        self.commands.send(PlayerCommand::Stop)?;
        Ok(())
    }
}

// ===============
//    ACCESSORS
// ===============
impl PlayerHandle {
    pub fn poll_events(&self) -> Vec<PlayerEvent> {
        std::iter::from_fn(|| self.events.try_recv().ok()).collect()
    }

    /// Wait up to `timeout` for the next event
    pub fn next_event(&self, timeout: Duration) -> Option<PlayerEvent> {
        self.events.recv_timeout(timeout).ok()
    }
}

impl Drop for PlayerHandle {
    fn drop(&mut self) {
        let _ = self.commands.send(PlayerCommand::Shutdown);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}
