#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    Menu,
    Playing,
    Paused,
    GameOver,
}

impl GameState {
    pub fn is_running(&self) -> bool {
        *self == GameState::Playing
    }
}
