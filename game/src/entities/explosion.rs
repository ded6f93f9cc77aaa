use collisions::{ImageId, SpritePose};
use rand::Rng;

pub const LIFETIME: f32 = 0.1;
pub const EXPLOSION_SCALE: f32 = 5.0;

/// Short-lived flash left where an asteroid died. Purely visual.
#[derive(Debug, Clone)]
pub struct Explosion {
    pub pose: SpritePose,
    pub image: ImageId,
    elapsed: f32,
}

impl Explosion {
    pub fn new<R: Rng>(image: ImageId, x: f32, y: f32, rng: &mut R) -> Self {
        Explosion {
            pose: SpritePose::new(x, y)
                .with_rotation(rng.gen_range(0.0..360.0))
                .with_scale(EXPLOSION_SCALE),
            image,
            elapsed: 0.0,
        }
    }

    /// Returns false once the explosion has run its course.
    pub fn update(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.elapsed < LIFETIME
    }
}
