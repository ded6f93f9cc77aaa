pub mod asteroid;
pub mod explosion;
pub mod player;
pub mod powerup;
pub mod projectile;

pub use asteroid::{Asteroid, AsteroidHandle};
pub use explosion::Explosion;
pub use player::{Player, SteeringMode};
pub use powerup::{PowerUp, PowerUpEffect, PowerUpKind};
pub use projectile::{Laser, Projectile, TrackingMissile};
