mod app;
mod player;

pub use app::AllMusic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    List,
    Player,
}
