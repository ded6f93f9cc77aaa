use collisions::{ImageId, SpritePose};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

pub const POWERUP_SCALE: f32 = 0.15;
pub const FALL_SPEED: f32 = 100.0;
pub const DESPAWN_Y: f32 = -50.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    Life,
    Score,
    Speed,
    FastFire,
    TripleShot,
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::Life,
        PowerUpKind::Score,
        PowerUpKind::Speed,
        PowerUpKind::FastFire,
        PowerUpKind::TripleShot,
        PowerUpKind::Shield,
    ];

    /// Relative drop weights, in [`PowerUpKind::ALL`] order.
    pub const WEIGHTS: [u32; 6] = [10, 50, 20, 30, 15, 15];

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        match WeightedIndex::new(Self::WEIGHTS) {
            Ok(weights) => Self::ALL[weights.sample(rng)],
            Err(_) => PowerUpKind::Score,
        }
    }

    pub fn effect(&self) -> PowerUpEffect {
        match self {
            PowerUpKind::Life => PowerUpEffect::ExtraLife { lives: 1 },
            PowerUpKind::Score => PowerUpEffect::Score { points: 500 },
            PowerUpKind::Speed => PowerUpEffect::SpeedBoost {
                multiplier: 1.5,
                duration_ticks: 300,
            },
            PowerUpKind::FastFire => PowerUpEffect::FastFire {
                fire_interval: 0.05,
                duration_ticks: 600,
            },
            PowerUpKind::TripleShot => PowerUpEffect::TripleShot {
                spread_degrees: 15.0,
                duration_ticks: 300,
            },
            PowerUpKind::Shield => PowerUpEffect::Shield {
                duration_ticks: 300,
            },
        }
    }
}

/// What collecting a power-up does. Timed effects last `duration_ticks`
/// simulation ticks.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PowerUpEffect {
    ExtraLife { lives: u32 },
    Score { points: u32 },
    SpeedBoost { multiplier: f32, duration_ticks: u32 },
    FastFire { fire_interval: f32, duration_ticks: u32 },
    TripleShot { spread_degrees: f32, duration_ticks: u32 },
    Shield { duration_ticks: u32 },
}

#[derive(Debug, Clone)]
pub struct PowerUp {
    pub pose: SpritePose,
    pub image: ImageId,
    pub kind: PowerUpKind,
    pub active: bool,
    consumed: bool,
}

impl PowerUp {
    pub fn new(image: ImageId, x: f32, y: f32, kind: PowerUpKind) -> Self {
        PowerUp {
            pose: SpritePose::new(x, y).with_scale(POWERUP_SCALE),
            image,
            kind,
            active: true,
            consumed: false,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.pose.y -= FALL_SPEED * dt;
        if self.pose.y < DESPAWN_Y {
            self.active = false;
        }
    }

    /// Hand out the effect. Only the first call returns anything.
    pub fn apply(&mut self) -> Option<PowerUpEffect> {
        if self.consumed {
            return None;
        }
        self.consumed = true;
        self.active = false;
        Some(self.kind.effect())
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}
