pub mod engine;
pub mod image;
pub mod mask;

pub use engine::{collide, collide_with, narrow_phase, BroadPhase, CollisionEngine, SpriteBody, SpritePose};
pub use image::{Image, ImageDataError, ImageId};
pub use mask::{AlphaMask, MaskCache};
