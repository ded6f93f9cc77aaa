pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod highscore;
pub mod input;
pub mod resources;
pub mod simulation;
pub mod state;

pub use config::{ConfigError, GameConfig};
pub use error::GameError;
pub use events::{Banner, GameEvent};
pub use highscore::{FileHighScoreStore, HighScoreError, HighScoreStore, MemoryHighScoreStore};
pub use input::{InputEvent, InputState, MovementKeys, WeaponKind};
pub use resources::{ResourceError, ResourceLoader, ResourceRegistry, Sound, SoundKey, SpriteKey};
pub use simulation::{GameTask, Simulation, SpriteView, TaskArgs};
pub use state::GameState;
