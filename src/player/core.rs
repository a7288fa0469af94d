use crate::{
    domain::{Playlist, RadioStation},
    player::{
        EngineEvent, MediaEngine, PlaybackController, PlayerCommand, PlayerError, PlayerEvent,
        PlayerOptions,
    },
};
use anyhow::{Result, anyhow};
use crossbeam_channel::{Receiver, Sender, bounded, never, select, tick, unbounded};
use std::{
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};
use tracing::{debug, warn};

enum Inbox {
    Command(Option<PlayerCommand>),
    Notice(Option<EngineEvent>),
    Tick,
}

/// Owns the controller on a dedicated thread. User commands, engine notices
/// and the refresh tick are all handled here, one at a time.
pub struct PlayerCore<E> {
    controller: PlaybackController<E>,
    commands: Receiver<PlayerCommand>,
    notices: Receiver<EngineEvent>,
    events: Sender<PlayerEvent>,

    tick_interval: Duration,
    ticker: Option<Receiver<Instant>>,
}

impl<E: MediaEngine + 'static> PlayerCore<E> {
    /// Start the core thread. The engine is built on that thread by `factory`,
    /// which receives the sender for the engine's finish notices.
    pub fn spawn<F>(
        factory: F,
        playlist: Playlist,
        stations: Vec<RadioStation>,
        options: PlayerOptions,
        commands: Receiver<PlayerCommand>,
        events: Sender<PlayerEvent>,
    ) -> Result<JoinHandle<()>>
    where
        F: FnOnce(Sender<EngineEvent>) -> Result<E> + Send + 'static,
    {
        let (ready_tx, ready_rx) = bounded::<Result<()>>(1);

        let thread_handle = thread::Builder::new()
            .name("player-core".to_string())
            .spawn(move || {
                let (notice_tx, notice_rx) = unbounded();

                let engine = match factory(notice_tx) {
                    Ok(engine) => engine,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));

                let controller = PlaybackController::new(
                    engine,
                    playlist,
                    stations,
                    options.volume,
                    events.clone(),
                );

                let mut core = PlayerCore {
                    controller,
                    commands,
                    notices: notice_rx,
                    events,

                    tick_interval: options.tick_interval,
                    ticker: None,
                };

                core.run();
            })?;

        ready_rx
            .recv()
            .map_err(|_| anyhow!("Player thread exited during startup"))??;

        Ok(thread_handle)
    }

    fn run(&mut self) {
        loop {
            let ticker = self.ticker.clone().unwrap_or_else(never);

            let message = select! {
                recv(self.commands) -> cmd => Inbox::Command(cmd.ok()),
                recv(self.notices) -> notice => Inbox::Notice(notice.ok()),
                recv(ticker) -> _ => Inbox::Tick,
            };

            match message {
                Inbox::Command(None | Some(PlayerCommand::Shutdown)) => break,
                Inbox::Command(Some(cmd)) => self.process_command(cmd),
                Inbox::Notice(Some(EngineEvent::Finished(handle))) => {
                    let result = self.controller.on_finished(handle);
                    self.report(result);
                }
                // Engine dropped its sender; it will never finish anything again
                Inbox::Notice(None) => self.notices = never(),
                Inbox::Tick => self.controller.on_tick(),
            }

            self.sync_ticker();
        }

        self.teardown();
        debug!("player core stopped");
    }

    fn process_command(&mut self, cmd: PlayerCommand) {
        let result = match cmd {
            PlayerCommand::LoadTrack(track) => self.controller.load_track(track),
            PlayerCommand::Next => self.controller.next(),
            PlayerCommand::Previous => self.controller.previous(),
            PlayerCommand::TogglePlayback => self.controller.toggle_play_pause(),
            PlayerCommand::CycleStation => self.controller.cycle_radio_station(),
            PlayerCommand::Seek(pos) => self.controller.seek(pos),
            PlayerCommand::SetVolume(level) => self.controller.set_volume(level),
            PlayerCommand::Stop => {
                self.teardown();
                Ok(())
            }
            PlayerCommand::Shutdown => Ok(()),
        };
        self.report(result);
    }

    /// Register the refresh tick while a local track is loaded, drop it otherwise
    fn sync_ticker(&mut self) {
        match (self.controller.state().is_local(), self.ticker.is_some()) {
            (true, false) => self.ticker = Some(tick(self.tick_interval)),
            (false, true) => self.ticker = None,
            _ => (),
        }
    }

    // Tick goes first so it can never fire against a released handle
    fn teardown(&mut self) {
        self.ticker = None;
        self.controller.teardown();
    }

    fn report(&self, result: Result<(), PlayerError>) {
        if let Err(e) = result {
            warn!(error = %e, "player command failed");
            let _ = self.events.send(PlayerEvent::Error(e));
        }
    }
}
