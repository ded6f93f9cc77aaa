/// Held movement keys, W/A/S/D on a keyboard.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct MovementKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Everything the host samples once per tick.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct InputState {
    pub pointer_x: f32,
    pub pointer_y: f32,
    pub held: MovementKeys,
    pub firing: bool,
}

impl InputState {
    pub fn pointing_at(x: f32, y: f32) -> Self {
        InputState {
            pointer_x: x,
            pointer_y: y,
            ..Default::default()
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum WeaponKind {
    #[default]
    Laser,
    TrackingMissile,
}

/// One-shot commands, delivered outside the per-tick input sample.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Begin a new game from the menu or the game-over screen; resume when
    /// paused.
    Start,
    TogglePause,
    SelectWeapon(WeaponKind),
}
