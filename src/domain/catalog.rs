use super::{RadioStation, Track};

#[rustfmt::skip]
const TRACKS: [(&str, &str, &str, &str, &str); 3] = [
    ("Background music", "321 Boom day",  "Rnado",           "cover1", "10 Helvetica"),
    ("Havana",           "Havana album",  "Camilla Cabello", "cover2", "11 Brooklyn"),
    ("Viva la Vida",     "123 Something", "Goldplay",        "cover3", "12 Deep Blue"),
];

#[rustfmt::skip]
const STATIONS: [(&str, &str); 10] = [
    ("Relax FM",       "https://stream.relax-fm.ru/relaxfm"),
    ("Nashe Radio",    "https://nashe1.hostingradio.ru:80/nashe-256"),
    ("Mayak FM",       "https://icecast-vgtrk.cdnvideo.ru/mayakfm_mp3_192kbps"),
    ("Vesti FM",       "https://icecast-vgtrk.cdnvideo.ru/vesti-fm_mp3_192kbps"),
    ("Jazz Radio",     "https://streaming.radionomy.com/JazzRadio"),
    ("Oldie Radio",    "https://stream.laut.fm/oldieradio"),
    ("Radio Art Jazz", "https://live.radioart.com/fJazz.mp3"),
    ("Sky Plus",       "https://radio.skyplus.ee/skyplus.mp3"),
    ("Radio 1",        "https://icecast.omroep.nl/radio1-bb-mp3"),
    ("Radio Paradise", "https://stream.radioparadise.com/mp3-192"),
];

/// The playlist shipped with the app, used when the config file has no `[[tracks]]`
pub fn default_tracks() -> Vec<Track> {
    TRACKS
        .iter()
        .map(|(name, album, artist, artwork, resource)| {
            Track::new(name, album, artist, artwork, resource)
        })
        .collect()
}

pub fn default_stations() -> Vec<RadioStation> {
    STATIONS
        .iter()
        .map(|(name, url)| RadioStation::new(name, url))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MediaInfo;

    #[test]
    fn builtin_playlist_keeps_order() {
        let tracks = default_tracks();
        let titles: Vec<_> = tracks.iter().map(|t| t.get_title()).collect();

        assert_eq!(titles, ["Background music", "Havana", "Viva la Vida"]);
        assert_eq!(tracks[1].get_resource(), "11 Brooklyn");
        assert_eq!(tracks[2].get_artwork(), "cover3");
    }

    #[test]
    fn builtin_stations_are_ten_https_streams() {
        let stations = default_stations();

        assert_eq!(stations.len(), 10);
        assert_eq!(stations[0].get_title(), "Relax FM");
        assert_eq!(stations[9].get_title(), "Radio Paradise");
        assert!(stations.iter().all(|s| s.get_url().starts_with("https://")));
    }

    #[test]
    fn stations_report_live_metadata() {
        let station = &default_stations()[3];

        assert_eq!(station.get_artist(), "Streaming Live");
        assert_eq!(station.get_album(), "");
    }
}
