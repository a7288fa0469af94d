use crate::{
    domain::{MediaInfo, Track},
    overwrite_line,
    presenter::{Presenter, TransportView},
};
use anyhow::Result;
use ratatui::crossterm::{
    QueueableCommand,
    cursor::MoveTo,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::{io::Write, sync::Arc};

// Raw mode needs explicit carriage returns
const NEWLINE: &str = "\r\n";

/// Plain line-based presenter for a raw-mode terminal
pub struct ConsolePresenter<W: Write> {
    out: W,
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(out: W) -> Self {
        ConsolePresenter { out }
    }

    fn clear(&mut self) -> Result<()> {
        self.out.queue(Clear(ClearType::All))?.queue(MoveTo(0, 0))?;
        Ok(())
    }

    fn line(&mut self, text: &str) -> Result<()> {
        self.out.queue(Print(text))?.queue(Print(NEWLINE))?;
        Ok(())
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn render_list(&mut self, tracks: &[Arc<Track>], selected: usize) -> Result<()> {
        self.clear()?;
        self.line("All Music")?;
        self.line("")?;

        for (idx, track) in tracks.iter().enumerate() {
            let marker = if idx == selected { '>' } else { ' ' };
            let row = format!(
                "{marker} {}. {} - {}",
                idx + 1,
                track.get_title(),
                track.get_album()
            );
            self.line(&row)?;
        }

        self.line("")?;
        self.line("[up/down] select  [enter] play  [q] quit")?;
        self.out.flush()?;
        Ok(())
    }

    fn render_now_playing(&mut self, now: &dyn MediaInfo) -> Result<()> {
        self.clear()?;
        self.line(now.get_title())?;
        self.line(now.get_album())?;
        self.line(now.get_artist())?;
        self.line("")?;
        self.line("[space] play/pause  [n/p] next/prev  [r] radio  [<-/->] seek  [+/-] volume  [esc] back")?;
        self.line("")?;
        self.out.flush()?;
        Ok(())
    }

    fn render_transport_state(&mut self, view: &TransportView) -> Result<()> {
        overwrite_line(&mut self.out, &view.status_line())?;
        Ok(())
    }

    fn render_error(&mut self, message: &str) -> Result<()> {
        self.out.queue(Print(NEWLINE))?;
        overwrite_line(&mut self.out, &format!("! {message}"))?;
        self.out.queue(Print(NEWLINE))?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RadioStation, default_tracks};
    use crate::player::TransportState;

    fn rendered(presenter: ConsolePresenter<Vec<u8>>) -> String {
        String::from_utf8_lossy(&presenter.into_inner()).into_owned()
    }

    #[test]
    fn list_marks_selection() {
        let tracks: Vec<_> = default_tracks().into_iter().map(Arc::new).collect();
        let mut presenter = ConsolePresenter::new(Vec::new());

        presenter.render_list(&tracks, 1).unwrap();

        let out = rendered(presenter);
        assert!(out.contains("  1. Background music - 321 Boom day"));
        assert!(out.contains("> 2. Havana - Havana album"));
    }

    #[test]
    fn radio_now_playing_says_live() {
        let station = RadioStation::new("Jazz Radio", "https://example.org/jazz");
        let mut presenter = ConsolePresenter::new(Vec::new());

        presenter.render_now_playing(&station).unwrap();

        let out = rendered(presenter);
        assert!(out.contains("Jazz Radio"));
        assert!(out.contains("Streaming Live"));
    }

    #[test]
    fn transport_and_errors_are_written() {
        let mut presenter = ConsolePresenter::new(Vec::new());
        let mut view = TransportView::new(0.5);
        view.state = TransportState::Paused;

        presenter.render_transport_state(&view).unwrap();
        presenter.render_error("Track unavailable: x").unwrap();

        let out = rendered(presenter);
        assert!(out.contains("|| --:-- / --:--  vol 50%"));
        assert!(out.contains("! Track unavailable: x"));
    }
}
