use crate::{
    CONFIG_DIRECTORY, CONFIG_FILE, MEDIA_DIRECTORY,
    domain::{RadioStation, Track, default_stations, default_tracks},
    expand_tilde,
    player::{DEFAULT_TICK, DEFAULT_VOLUME, PlayerOptions},
};
use anyhow::{Result, anyhow, bail};
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

const MIN_TICK_MS: u64 = 50;

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub volume: f32,
    pub tick_interval_ms: u64,
    pub seek_step_secs: u64,
    pub volume_step: f32,
    pub media_dir: Option<PathBuf>,
    pub connect_timeout_secs: u64,
    pub log_level: String,

    pub tracks: Vec<Track>,
    pub stations: Vec<RadioStation>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            volume: DEFAULT_VOLUME,
            tick_interval_ms: DEFAULT_TICK.as_millis() as u64,
            seek_step_secs: 5,
            volume_step: 0.05,
            media_dir: None,
            connect_timeout_secs: 10,
            log_level: String::from("info"),

            tracks: default_tracks(),
            stations: default_stations(),
        }
    }
}

impl Settings {
    /// Read the user's config file, falling back to defaults when there is none
    pub fn load() -> Result<Self> {
        Self::load_from_dir(config_dir()?)
    }

    /// `<dir>/config.toml`, or defaults when that file does not exist
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILE);

        match path.exists() {
            true => Self::load_from_file(&path),
            false => Ok(Self::default()),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_str = std::fs::read_to_string(path.as_ref())?;
        let settings = toml::from_str::<Settings>(&file_str)
            .map_err(|e| anyhow!("Invalid config {}: {e}", path.as_ref().display()))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tracks.is_empty() {
            bail!("Config must list at least one track");
        }
        if self.stations.is_empty() {
            bail!("Config must list at least one radio station");
        }
        if let Some(bad) = self
            .stations
            .iter()
            .find(|s| !(s.url.starts_with("http://") || s.url.starts_with("https://")))
        {
            bail!("Station '{}' has a non-http url: {}", bad.name, bad.url);
        }
        Ok(())
    }

    pub fn player_options(&self) -> PlayerOptions {
        let volume = match self.volume.is_nan() {
            true => DEFAULT_VOLUME,
            false => self.volume.clamp(0.0, 1.0),
        };

        PlayerOptions {
            volume,
            tick_interval: Duration::from_millis(self.tick_interval_ms.max(MIN_TICK_MS)),
        }
    }

    pub fn media_dir(&self) -> Result<PathBuf> {
        match &self.media_dir {
            Some(dir) => expand_tilde(dir),
            None => Ok(config_dir()?.join(MEDIA_DIRECTORY)),
        }
    }

    pub fn seek_step(&self) -> Duration {
        Duration::from_secs(self.seek_step_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIRECTORY))
        .ok_or_else(|| anyhow!("Could not determine config directory!"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MediaInfo;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_match_builtin_catalog() {
        let settings = Settings::default();

        assert_eq!(settings.volume, 0.5);
        assert_eq!(settings.tracks.len(), 3);
        assert_eq!(settings.stations.len(), 10);
        assert_eq!(
            settings.player_options().tick_interval,
            Duration::from_millis(500)
        );
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from_dir(dir.path()).unwrap();

        assert_eq!(settings.volume, DEFAULT_VOLUME);
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.tracks, default_tracks());
        assert_eq!(settings.stations, default_stations());
    }

    #[test]
    fn config_file_in_dir_is_read() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "volume_step = 0.1\n").unwrap();

        let settings = Settings::load_from_dir(dir.path()).unwrap();

        assert_eq!(settings.volume_step, 0.1);
        assert_eq!(settings.seek_step_secs, 5);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = write_config("volume = 0.8\nseek_step_secs = 10\n");
        let settings = Settings::load_from_file(file.path()).unwrap();

        assert_eq!(settings.volume, 0.8);
        assert_eq!(settings.seek_step(), Duration::from_secs(10));
        assert_eq!(settings.connect_timeout(), Duration::from_secs(10));
        assert_eq!(settings.tracks.len(), 3);
    }

    #[test]
    fn catalog_can_be_replaced() {
        let file = write_config(
            r#"
            [[tracks]]
            name = "Song"
            album = "Record"
            artist = "Band"
            artwork = "cover"
            resource = "song.flac"

            [[stations]]
            name = "Local"
            url = "http://127.0.0.1:8000/live"
            "#,
        );
        let settings = Settings::load_from_file(file.path()).unwrap();

        assert_eq!(settings.tracks.len(), 1);
        assert_eq!(settings.tracks[0].get_resource(), "song.flac");
        assert_eq!(settings.stations[0].get_title(), "Local");
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let file = write_config("tracks = []\n");
        assert!(Settings::load_from_file(file.path()).is_err());

        let file = write_config("stations = []\n");
        assert!(Settings::load_from_file(file.path()).is_err());
    }

    #[test]
    fn non_http_station_is_rejected() {
        let file = write_config(
            r#"
            [[stations]]
            name = "Pipe"
            url = "file:///dev/audio"
            "#,
        );
        let err = Settings::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Pipe"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let file = write_config("volume = \"loud\"\n");
        assert!(Settings::load_from_file(file.path()).is_err());
    }

    #[test]
    fn player_options_are_sanitized() {
        let settings = Settings {
            volume: 3.0,
            tick_interval_ms: 1,
            ..Settings::default()
        };
        let options = settings.player_options();

        assert_eq!(options.volume, 1.0);
        assert_eq!(options.tick_interval, Duration::from_millis(MIN_TICK_MS));
    }

    #[test]
    fn explicit_media_dir_is_used() {
        let settings = Settings {
            media_dir: Some(PathBuf::from("/srv/music")),
            ..Settings::default()
        };
        assert_eq!(settings.media_dir().unwrap(), PathBuf::from("/srv/music"));
    }
}
