use crate::entities::PowerUpKind;
use crate::resources::SoundKey;
use crate::state::GameState;

/// Things the host reacts to: sounds to play, HUD changes.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(SoundKey),
    AsteroidDestroyed {
        x: f32,
        y: f32,
        tier: u8,
        fragments: usize,
    },
    PlayerHit {
        lives_left: u32,
    },
    PowerUpCollected(PowerUpKind),
    StateChanged(GameState),
    GameOver {
        score: u32,
        new_high_score: bool,
    },
}

/// Transient overlay text the host shows for a few frames.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Banner {
    PowerUp(PowerUpKind),
    LifeLost,
}
