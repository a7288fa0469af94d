use super::MediaInfo;
use serde::Deserialize;

pub(crate) const LIVE_LABEL: &str = "Streaming Live";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RadioStation {
    pub(crate) name: String,
    pub(crate) url: String,
}

impl RadioStation {
    pub fn new(name: &str, url: &str) -> Self {
        RadioStation {
            name: name.to_string(),
            url: url.to_string(),
        }
    }

    pub fn get_url(&self) -> &str {
        &self.url
    }
}

impl MediaInfo for RadioStation {
    fn get_title(&self) -> &str {
        &self.name
    }

    fn get_artist(&self) -> &str {
        LIVE_LABEL
    }

    fn get_album(&self) -> &str {
        ""
    }
}
