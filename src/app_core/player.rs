use crate::{
    app_core::{AllMusic, Screen},
    domain::MediaInfo,
    player::{PlayerEvent, TransportState},
    presenter::{Presenter, TransportView},
};
use anyhow::Result;
use std::time::Duration;

impl<P: Presenter> AllMusic<P> {
    /// Fold a player event into the view and hand it to the presenter
    pub fn handle_player_event(&mut self, event: PlayerEvent) -> Result<()> {
        match event {
            PlayerEvent::TrackStarted(track) => {
                self.selected = self.playlist.position_of(&track).unwrap_or(self.selected);
                self.view.live = false;
                self.view.position = Some(Duration::ZERO);
                self.view.duration = None;

                self.render_now_playing(track.as_ref())
            }
            PlayerEvent::StationStarted(station) => {
                self.view.live = true;
                self.view.position = None;
                self.view.duration = None;

                self.render_now_playing(station.as_ref())
            }
            PlayerEvent::TransportChanged(state) => {
                self.view.state = state;
                match state {
                    TransportState::Idle => Ok(()),
                    _ => self.render_transport(),
                }
            }
            PlayerEvent::PositionChanged { position, duration } => {
                self.view.position = Some(position);
                self.view.duration = duration;
                self.render_transport()
            }
            PlayerEvent::VolumeChanged(level) => {
                self.view.volume = level;
                self.render_transport()
            }
            PlayerEvent::Stopped => {
                self.view = TransportView::new(self.view.volume);
                Ok(())
            }
            PlayerEvent::Error(e) => self.presenter.render_error(&e.to_string()),
        }
    }

    // Playback output belongs to the player screen only
    fn render_now_playing(&mut self, now: &dyn MediaInfo) -> Result<()> {
        if self.screen != Screen::Player {
            return Ok(());
        }
        self.presenter.render_now_playing(now)?;
        self.presenter.render_transport_state(&self.view)
    }

    fn render_transport(&mut self) -> Result<()> {
        match self.screen {
            Screen::Player => self.presenter.render_transport_state(&self.view),
            Screen::List => Ok(()),
        }
    }
}
