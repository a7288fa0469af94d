use crate::{
    Settings,
    app_core::Screen,
    domain::Playlist,
    key_handler::{self, Action},
    player::PlayerHandle,
    presenter::{Presenter, TransportView},
};
use anyhow::Result;
use ratatui::crossterm::{
    event::{Event, KeyEventKind},
    terminal,
};

pub struct AllMusic<P: Presenter> {
    pub(super) settings: Settings,
    pub(super) playlist: Playlist,
    pub(super) player: PlayerHandle,
    pub(super) presenter: P,

    pub(super) screen: Screen,
    pub(super) selected: usize,
    pub(super) view: TransportView,
    quit: bool,
}

impl<P: Presenter> AllMusic<P> {
    pub fn new(settings: Settings, playlist: Playlist, player: PlayerHandle, presenter: P) -> Self {
        let view = TransportView::new(settings.player_options().volume);
        let selected = playlist.cursor();

        AllMusic {
            settings,
            playlist,
            player,
            presenter,

            screen: Screen::List,
            selected,
            view,
            quit: false,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        let result = self.main_loop();
        terminal::disable_raw_mode()?;
        result
    }

    fn main_loop(&mut self) -> Result<()> {
        self.presenter
            .render_list(self.playlist.tracks(), self.selected)?;

        // MAIN ROUTINE
        while !self.quit {
            match key_handler::next_event()? {
                Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if let Some(action) = key_handler::handle_key_event(key, self.screen) {
                        if let Err(e) = self.handle_action(action) {
                            self.presenter.render_error(&e.to_string())?;
                        }
                    }
                }
                _ => (),
            }

            for event in self.player.poll_events() {
                self.handle_player_event(event)?;
            }
        }

        self.player.stop()?;
        Ok(())
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_quitting(&self) -> bool {
        self.quit
    }
}

impl<P: Presenter> AllMusic<P> {
    #[rustfmt::skip]
    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            // List
            Action::SelectUp        => self.move_selection(false)?,
            Action::SelectDown      => self.move_selection(true)?,
            Action::OpenPlayer      => self.open_player()?,

            // Player
            Action::TogglePause     => self.player.toggle_playback()?,
            Action::PlayNext        => self.player.next()?,
            Action::PlayPrev        => self.player.previous()?,
            Action::CycleStation    => self.player.cycle_station()?,
            Action::SeekForward     => self.seek(true)?,
            Action::SeekBack        => self.seek(false)?,
            Action::VolumeUp        => self.nudge_volume(true)?,
            Action::VolumeDown      => self.nudge_volume(false)?,
            Action::Back            => self.close_player()?,

            Action::Quit            => self.quit = true,
        }
        Ok(())
    }

    fn move_selection(&mut self, down: bool) -> Result<()> {
        let len = self.playlist.len();
        if len == 0 {
            return Ok(());
        }

        self.selected = match down {
            true => (self.selected + 1) % len,
            false => (self.selected + len - 1) % len,
        };
        self.presenter
            .render_list(self.playlist.tracks(), self.selected)
    }

    fn open_player(&mut self) -> Result<()> {
        let Some(track) = self.playlist.select(self.selected) else {
            return Ok(());
        };

        self.screen = Screen::Player;
        self.player.load_track(track)
    }

    fn close_player(&mut self) -> Result<()> {
        self.player.stop()?;
        self.screen = Screen::List;
        self.presenter
            .render_list(self.playlist.tracks(), self.selected)
    }

    /// Seeks relative to the last position the player reported
    fn seek(&mut self, forward: bool) -> Result<()> {
        let current = self.view.position.unwrap_or_default();
        let step = self.settings.seek_step();

        let target = match forward {
            true => current + step,
            false => current.saturating_sub(step),
        };
        self.player.seek(target)
    }

    fn nudge_volume(&mut self, up: bool) -> Result<()> {
        let step = self.settings.volume_step;
        let level = match up {
            true => self.view.volume + step,
            false => self.view.volume - step,
        };
        self.player.set_volume(level)
    }
}
