mod console;

pub use console::ConsolePresenter;

use crate::{
    domain::{MediaInfo, Track},
    get_readable_duration,
    player::TransportState,
};
use anyhow::Result;
use std::{sync::Arc, time::Duration};

const UNKNOWN_TIME: &str = "--:--";

/// What the player screen shows under the now-playing block
#[derive(Debug, Clone, PartialEq)]
pub struct TransportView {
    pub state: TransportState,
    pub position: Option<Duration>,
    pub duration: Option<Duration>,
    pub volume: f32,
    pub live: bool,
}

impl TransportView {
    pub fn new(volume: f32) -> Self {
        TransportView {
            state: TransportState::Idle,
            position: None,
            duration: None,
            volume,
            live: false,
        }
    }

    /// Single status line, e.g. `|| 1:05 / 3:20  vol 50%`
    pub fn status_line(&self) -> String {
        let icon = match self.state {
            TransportState::Idle => "[]",
            TransportState::Playing => "|>",
            TransportState::Paused => "||",
        };

        let (elapsed, total) = match self.live {
            true => (UNKNOWN_TIME.to_string(), UNKNOWN_TIME.to_string()),
            false => (
                self.position
                    .map_or(UNKNOWN_TIME.to_string(), get_readable_duration),
                self.duration
                    .map_or(UNKNOWN_TIME.to_string(), get_readable_duration),
            ),
        };

        let volume = (self.volume * 100.0).round() as u32;
        format!("{icon} {elapsed} / {total}  vol {volume}%")
    }
}

/// Everything the presentation layer must be able to draw. The playback core
/// never talks to a presenter directly; the app forwards player events here.
pub trait Presenter {
    fn render_list(&mut self, tracks: &[Arc<Track>], selected: usize) -> Result<()>;
    fn render_now_playing(&mut self, now: &dyn MediaInfo) -> Result<()>;
    fn render_transport_state(&mut self, view: &TransportView) -> Result<()>;
    fn render_error(&mut self, message: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_for_local_track() {
        let view = TransportView {
            state: TransportState::Playing,
            position: Some(Duration::from_secs(65)),
            duration: Some(Duration::from_secs(200)),
            volume: 0.5,
            live: false,
        };
        assert_eq!(view.status_line(), "|> 1:05 / 3:20  vol 50%");
    }

    #[test]
    fn status_line_for_radio_hides_times() {
        let view = TransportView {
            state: TransportState::Paused,
            position: Some(Duration::from_secs(65)),
            live: true,
            ..TransportView::new(1.0)
        };
        assert_eq!(view.status_line(), "|| --:-- / --:--  vol 100%");
    }

    #[test]
    fn idle_view_has_no_times() {
        assert_eq!(TransportView::new(0.0).status_line(), "[] --:-- / --:--  vol 0%");
    }
}
