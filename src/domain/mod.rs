mod catalog;
mod playlist;
mod station;
mod track;

pub use catalog::{default_stations, default_tracks};
pub use playlist::Playlist;
pub use station::RadioStation;
pub use track::Track;

/// Display lines shared by anything that can be "now playing"
pub trait MediaInfo {
    fn get_title(&self) -> &str;
    fn get_artist(&self) -> &str;
    fn get_album(&self) -> &str;
}
