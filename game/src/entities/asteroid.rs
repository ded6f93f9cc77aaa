use collisions::{ImageId, SpritePose};
use common::angles::{direction, heading_of, wrap_degrees};
use common::arena::Handle;
use common::shapes::Rectangle;
use rand::Rng;

/// Generation-checked reference into the simulation's asteroid arena.
pub type AsteroidHandle = Handle;

pub const SPAWN_SCALE: f32 = 0.35;
pub const SPAWN_TIER: u8 = 3;
pub const FRAGMENT_SCALE: f32 = 0.6;
/// How far past the window an asteroid may drift before it is dropped.
pub const OFFSCREEN_MARGIN: f32 = 50.0;

#[derive(Debug, Clone)]
pub struct Asteroid {
    pub pose: SpritePose,
    pub image: ImageId,
    pub velocity_x: f32,
    pub velocity_y: f32,
    /// Degrees per second.
    pub rotation_speed: f32,
    /// Fragmentation tier; tier 1 leaves nothing behind.
    pub tier: u8,
    pub active: bool,
}

impl Asteroid {
    pub fn new(
        image: ImageId,
        pose: SpritePose,
        velocity_x: f32,
        velocity_y: f32,
        rotation_speed: f32,
        tier: u8,
    ) -> Self {
        Asteroid {
            pose,
            image,
            velocity_x,
            velocity_y,
            rotation_speed,
            tier: tier.max(1),
            active: true,
        }
    }

    /// A full-size asteroid entering from the top, left or right edge.
    pub fn spawn_at_edge<R: Rng>(image: ImageId, window: &Rectangle, rng: &mut R) -> Self {
        let (x, y, vx, vy) = match rng.gen_range(0..3) {
            0 => (
                rng.gen_range(window.x..=window.max_x()),
                window.max_y() + OFFSCREEN_MARGIN,
                rng.gen_range(-100.0..=100.0),
                rng.gen_range(-200.0..=-100.0),
            ),
            1 => (
                window.x - OFFSCREEN_MARGIN,
                rng.gen_range(window.y..=window.max_y()),
                rng.gen_range(100.0..=200.0),
                rng.gen_range(-50.0..=50.0),
            ),
            _ => (
                window.max_x() + OFFSCREEN_MARGIN,
                rng.gen_range(window.y..=window.max_y()),
                rng.gen_range(-200.0..=-100.0),
                rng.gen_range(-50.0..=50.0),
            ),
        };
        let pose = SpritePose::new(x, y)
            .with_rotation(rng.gen_range(0.0..360.0))
            .with_scale(SPAWN_SCALE);
        let rotation_speed = rng.gen_range(-50.0..=50.0);
        Asteroid::new(image, pose, vx, vy, rotation_speed, SPAWN_TIER)
    }

    pub fn speed(&self) -> f32 {
        self.velocity_x.hypot(self.velocity_y)
    }

    pub fn update(&mut self, dt: f32, window: &Rectangle) {
        self.pose.x += self.velocity_x * dt;
        self.pose.y += self.velocity_y * dt;
        self.pose.rotation = wrap_degrees(self.pose.rotation + self.rotation_speed * dt);
        if !window
            .expanded(OFFSCREEN_MARGIN)
            .contains_point_inclusive(self.pose.x, self.pose.y)
        {
            self.active = false;
        }
    }

    /// Deactivate and break into 2 to 4 smaller, faster pieces one tier down.
    /// Tier 1 asteroids just disappear.
    pub fn explode<R: Rng>(&mut self, rng: &mut R) -> Vec<Asteroid> {
        self.active = false;
        if self.tier <= 1 {
            return Vec::new();
        }

        let count = rng.gen_range(2..=4);
        let heading = heading_of(self.velocity_x, self.velocity_y);
        let speed = self.speed();
        (0..count)
            .map(|_| {
                let child_heading = wrap_degrees(heading + rng.gen_range(-90.0..=90.0));
                let child_speed = speed * rng.gen_range(1.0..=2.0);
                let (dx, dy) = direction(child_heading);
                let pose = SpritePose::new(self.pose.x, self.pose.y)
                    .with_rotation(child_heading)
                    .with_scale_xy(
                        self.pose.scale_x * FRAGMENT_SCALE,
                        self.pose.scale_y * FRAGMENT_SCALE,
                    );
                Asteroid::new(
                    self.image,
                    pose,
                    dx * child_speed,
                    dy * child_speed,
                    self.rotation_speed + rng.gen_range(-10.0..=10.0),
                    self.tier - 1,
                )
            })
            .collect()
    }

    /// Points awarded for shooting this asteroid down.
    pub fn score_value(&self) -> u32 {
        (100.0 * self.pose.scale_x).max(0.0) as u32
    }
}
