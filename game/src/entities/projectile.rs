use super::asteroid::{Asteroid, AsteroidHandle, OFFSCREEN_MARGIN};
use collisions::{ImageId, SpritePose};
use common::angles::{direction, ease_towards, heading_towards, shortest_difference};
use common::arena::Arena;
use common::shapes::Rectangle;
use rand::seq::SliceRandom;
use rand::Rng;

pub const LASER_SPEED: f32 = 600.0;
pub const MISSILE_SPEED: f32 = 400.0;
/// Full cone width, in degrees, a missile scans for targets.
pub const MISSILE_FOV: f32 = 40.0;
pub const MISSILE_TURN_SPEED: f32 = 7.0;

#[derive(Debug, Clone)]
pub struct Laser {
    pub pose: SpritePose,
    pub image: ImageId,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub active: bool,
}

impl Laser {
    pub fn new(image: ImageId, x: f32, y: f32, heading: f32) -> Self {
        let (dx, dy) = direction(heading);
        Laser {
            pose: SpritePose::new(x, y).with_rotation(heading),
            image,
            velocity_x: dx * LASER_SPEED,
            velocity_y: dy * LASER_SPEED,
            active: true,
        }
    }

    pub fn update(&mut self, dt: f32, window: &Rectangle) {
        self.pose.x += self.velocity_x * dt;
        self.pose.y += self.velocity_y * dt;
        if !window.contains_point_inclusive(self.pose.x, self.pose.y) {
            self.active = false;
        }
    }
}

/// Flies straight ahead and bends toward a target picked from its view cone.
#[derive(Debug, Clone)]
pub struct TrackingMissile {
    pub pose: SpritePose,
    pub image: ImageId,
    pub target: Option<AsteroidHandle>,
    pub active: bool,
}

impl TrackingMissile {
    pub fn new<R: Rng>(
        image: ImageId,
        x: f32,
        y: f32,
        heading: f32,
        asteroids: &Arena<Asteroid>,
        rng: &mut R,
    ) -> Self {
        let mut missile = TrackingMissile {
            pose: SpritePose::new(x, y).with_rotation(heading),
            image,
            target: None,
            active: true,
        };
        missile.target = missile.find_target_in_fov(asteroids, rng);
        missile
    }

    /// A random live asteroid within half the field of view of the current
    /// heading.
    pub fn find_target_in_fov<R: Rng>(
        &self,
        asteroids: &Arena<Asteroid>,
        rng: &mut R,
    ) -> Option<AsteroidHandle> {
        let half_fov = MISSILE_FOV / 2.0;
        let candidates: Vec<AsteroidHandle> = asteroids
            .iter()
            .filter(|(_, asteroid)| asteroid.active)
            .filter(|(_, asteroid)| {
                let bearing =
                    heading_towards(self.pose.x, self.pose.y, asteroid.pose.x, asteroid.pose.y);
                shortest_difference(self.pose.rotation, bearing).abs() <= half_fov
            })
            .map(|(handle, _)| handle)
            .collect();
        candidates.choose(rng).copied()
    }

    /// The target if it is still alive.
    pub fn live_target<'a>(&self, asteroids: &'a Arena<Asteroid>) -> Option<&'a Asteroid> {
        self.target
            .and_then(|handle| asteroids.get(handle))
            .filter(|asteroid| asteroid.active)
    }

    pub fn track_target<R: Rng>(&mut self, dt: f32, asteroids: &Arena<Asteroid>, rng: &mut R) {
        if self.live_target(asteroids).is_none() {
            self.target = self.find_target_in_fov(asteroids, rng);
        }
        let Some(target) = self.live_target(asteroids) else {
            return;
        };
        let bearing = heading_towards(self.pose.x, self.pose.y, target.pose.x, target.pose.y);
        self.pose.rotation = ease_towards(self.pose.rotation, bearing, MISSILE_TURN_SPEED, dt);
    }

    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        window: &Rectangle,
        asteroids: &Arena<Asteroid>,
        rng: &mut R,
    ) {
        self.track_target(dt, asteroids, rng);
        let (dx, dy) = direction(self.pose.rotation);
        self.pose.x += dx * MISSILE_SPEED * dt;
        self.pose.y += dy * MISSILE_SPEED * dt;
        if !window
            .expanded(OFFSCREEN_MARGIN)
            .contains_point_inclusive(self.pose.x, self.pose.y)
        {
            self.active = false;
        }
    }
}

#[derive(Debug, Clone)]
pub enum Projectile {
    Laser(Laser),
    Missile(TrackingMissile),
}

impl Projectile {
    pub fn pose(&self) -> SpritePose {
        match self {
            Projectile::Laser(laser) => laser.pose,
            Projectile::Missile(missile) => missile.pose,
        }
    }

    pub fn image(&self) -> ImageId {
        match self {
            Projectile::Laser(laser) => laser.image,
            Projectile::Missile(missile) => missile.image,
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            Projectile::Laser(laser) => laser.active,
            Projectile::Missile(missile) => missile.active,
        }
    }

    pub fn deactivate(&mut self) {
        match self {
            Projectile::Laser(laser) => laser.active = false,
            Projectile::Missile(missile) => missile.active = false,
        }
    }

    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        window: &Rectangle,
        asteroids: &Arena<Asteroid>,
        rng: &mut R,
    ) {
        match self {
            Projectile::Laser(laser) => laser.update(dt, window),
            Projectile::Missile(missile) => missile.update(dt, window, asteroids, rng),
        }
    }
}
