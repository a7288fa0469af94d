use allmusic::{
    PlayerHandle, Settings, app_core::AllMusic, domain::Playlist, logging,
    player::RodioEngine, presenter::ConsolePresenter,
};

fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    let _log_guard = logging::init(&settings)?;

    let playlist = Playlist::new(settings.tracks.clone(), 0);
    let media_dir = settings.media_dir()?;
    let connect_timeout = settings.connect_timeout();

    let player = PlayerHandle::spawn(
        move |notices| RodioEngine::new(media_dir, connect_timeout, notices),
        playlist.clone(),
        settings.stations.clone(),
        settings.player_options(),
    )?;

    let presenter = ConsolePresenter::new(std::io::stdout());
    AllMusic::new(settings, playlist, player, presenter).run()
}
