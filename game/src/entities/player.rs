use crate::input::InputState;
use collisions::{ImageId, SpritePose};
use common::angles::{ease_towards, heading_towards, wrap_degrees};
use common::shapes::Rectangle;
use serde::{Deserialize, Serialize};

pub const PLAYER_SCALE: f32 = 0.1;
pub const DRAG: f32 = 0.95;
pub const ACCELERATION: f32 = 20.0;
/// Distance kept between the ship's center and the window edges.
pub const EDGE_INSET: f32 = 20.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SteeringMode {
    /// Face the pointer immediately.
    Snap,
    /// Turn a fraction of the remaining arc each tick.
    #[default]
    Eased,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub pose: SpritePose,
    pub image: ImageId,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub accel: f32,
    pub speed_multiplier: f32,
    pub is_vulnerable: bool,
    pub shielded: bool,
    steering: SteeringMode,
    turn_speed: f32,
}

impl Player {
    pub fn new(image: ImageId, x: f32, y: f32, steering: SteeringMode, turn_speed: f32) -> Self {
        Player {
            pose: SpritePose::new(x, y).with_scale(PLAYER_SCALE),
            image,
            velocity_x: 0.0,
            velocity_y: 0.0,
            accel: ACCELERATION,
            speed_multiplier: 1.0,
            is_vulnerable: true,
            shielded: false,
            steering,
            turn_speed,
        }
    }

    /// Whether a hit right now would cost a life.
    pub fn can_be_hurt(&self) -> bool {
        self.is_vulnerable && !self.shielded
    }

    pub fn update(&mut self, dt: f32, input: &InputState, bounds: &Rectangle) {
        let target = heading_towards(self.pose.x, self.pose.y, input.pointer_x, input.pointer_y);
        self.pose.rotation = match self.steering {
            SteeringMode::Snap => wrap_degrees(target),
            SteeringMode::Eased => ease_towards(self.pose.rotation, target, self.turn_speed, dt),
        };

        let thrust = self.accel * self.speed_multiplier;
        let keys = &input.held;
        if keys.up {
            self.velocity_y += thrust;
        }
        if keys.down {
            self.velocity_y -= thrust;
        }
        if keys.left {
            self.velocity_x -= thrust;
        }
        if keys.right {
            self.velocity_x += thrust;
        }

        self.velocity_x *= DRAG;
        self.velocity_y *= DRAG;
        self.pose.x += self.velocity_x * dt;
        self.pose.y += self.velocity_y * dt;

        self.pose.x = self
            .pose
            .x
            .max(bounds.x + EDGE_INSET)
            .min(bounds.max_x() - EDGE_INSET);
        self.pose.y = self
            .pose
            .y
            .max(bounds.y + EDGE_INSET)
            .min(bounds.max_y() - EDGE_INSET);
    }
}
