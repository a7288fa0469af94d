use super::MediaInfo;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Track {
    pub(crate) name: String,
    pub(crate) album: String,
    pub(crate) artist: String,
    pub(crate) artwork: String,
    pub(crate) resource: String,
}

impl Track {
    pub fn new(name: &str, album: &str, artist: &str, artwork: &str, resource: &str) -> Self {
        Track {
            name: name.to_string(),
            album: album.to_string(),
            artist: artist.to_string(),
            artwork: artwork.to_string(),
            resource: resource.to_string(),
        }
    }

    pub fn get_artwork(&self) -> &str {
        &self.artwork
    }

    /// Identifier handed to the media engine when acquiring this track
    pub fn get_resource(&self) -> &str {
        &self.resource
    }
}

impl MediaInfo for Track {
    fn get_title(&self) -> &str {
        &self.name
    }

    fn get_artist(&self) -> &str {
        &self.artist
    }

    fn get_album(&self) -> &str {
        &self.album
    }
}
