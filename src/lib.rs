use anyhow::{Result, anyhow};
use ratatui::crossterm::{
    QueueableCommand,
    cursor::MoveToColumn,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::{
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

pub mod app_core;
pub mod domain;
pub mod key_handler;
pub mod logging;
pub mod player;
pub mod presenter;
pub mod settings;

pub use player::PlayerHandle;
pub use settings::Settings;

// ~30fps
pub const REFRESH_RATE: Duration = Duration::from_millis(33);

pub const CONFIG_DIRECTORY: &str = "allmusic";
pub const CONFIG_FILE: &str = "config.toml";
pub const LOG_DIRECTORY: &str = "logs";
pub const MEDIA_DIRECTORY: &str = "media";

/// `m:ss`, minutes unpadded
pub fn get_readable_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Replace the current terminal line with `message`
pub fn overwrite_line<W: Write>(out: &mut W, message: &str) -> std::io::Result<()> {
    out.queue(MoveToColumn(0))?
        .queue(Clear(ClearType::CurrentLine))?
        .queue(Print(message))?;
    out.flush()
}

pub fn expand_tilde<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    if !path_str.starts_with('~') {
        return Ok(path.to_path_buf());
    }

    if path_str == "~" {
        return Err(anyhow!(
            "Refusing to use the home directory itself as a media folder. Please provide a more specific path!"
        ));
    }

    if path_str.starts_with("~/") || path_str.starts_with("~\\") {
        let home =
            dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory!"))?;
        return Ok(home.join(&path_str[2..]));
    }

    Err(anyhow!("Error reading directory with tilde (~)"))
}
