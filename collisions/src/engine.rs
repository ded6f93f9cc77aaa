use crate::image::Image;
use crate::mask::{AlphaMask, MaskCache};
use nalgebra::{Isometry2, Rotation2, Vector2};
use parry2d::query;
use parry2d::shape::Ball;

/// Where a sprite sits in the world.
///
/// Rotation is in degrees and clockwise-positive.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpritePose {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl SpritePose {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale_x = scale;
        self.scale_y = scale;
        self
    }

    pub fn with_scale_xy(mut self, scale_x: f32, scale_y: f32) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }
}

impl Default for SpritePose {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

#[derive(Debug, Copy, Clone)]
pub struct SpriteBody<'a> {
    pub pose: SpritePose,
    pub image: &'a Image,
}

impl<'a> SpriteBody<'a> {
    pub fn new(pose: SpritePose, image: &'a Image) -> Self {
        Self { pose, image }
    }

    /// Half the larger image side, times the larger scale factor.
    ///
    /// Covers the sprite at any rotation around its center anchor.
    pub fn bounding_radius(&self) -> f32 {
        let size = self.image.width().max(self.image.height()) as f32;
        let scale = self.pose.scale_x.abs().max(self.pose.scale_y.abs());
        size / 2.0 * scale
    }
}

/// Cheap pre-check run before the pixel test.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BroadPhase {
    /// Each sprite is bounded by [`SpriteBody::bounding_radius`]; sprites pass
    /// when their circles overlap or touch.
    BoundingCircle,
    /// Centers closer than a fixed distance pass, whatever the sprite sizes.
    /// An approximation that skips the radius computation.
    FixedDistance(f32),
}

impl Default for BroadPhase {
    fn default() -> Self {
        BroadPhase::BoundingCircle
    }
}

impl BroadPhase {
    pub fn passes(&self, a: &SpriteBody<'_>, b: &SpriteBody<'_>) -> bool {
        match *self {
            BroadPhase::BoundingCircle => {
                let pos_a = Isometry2::translation(a.pose.x, a.pose.y);
                let pos_b = Isometry2::translation(b.pose.x, b.pose.y);
                let ball_a = Ball::new(a.bounding_radius());
                let ball_b = Ball::new(b.bounding_radius());
                // Ball-ball is always supported; treat an error as a miss.
                query::intersection_test(&pos_a, &ball_a, &pos_b, &ball_b).unwrap_or(false)
            }
            BroadPhase::FixedDistance(distance) => {
                let dx = a.pose.x - b.pose.x;
                let dy = a.pose.y - b.pose.y;
                dx * dx + dy * dy < distance * distance
            }
        }
    }
}

/// Pixel-exact test: does any opaque pixel of either sprite land on an opaque
/// pixel of the other?
///
/// Both directions are checked, so the result does not depend on argument
/// order even where rounding at the contact edge differs between them.
pub fn narrow_phase(
    mask_a: &AlphaMask,
    a: &SpriteBody<'_>,
    mask_b: &AlphaMask,
    b: &SpriteBody<'_>,
) -> bool {
    if mask_a.opaque_count() == 0 || mask_b.opaque_count() == 0 {
        return false;
    }
    lands_on(mask_a, a, mask_b, b) || lands_on(mask_b, b, mask_a, a)
}

/// Each opaque pixel of `from` goes local -> world through its pose, then
/// world -> local through the inverse of `onto`'s pose, and is rounded (ties
/// to even) to the nearest pixel of `onto`.
fn lands_on(
    from_mask: &AlphaMask,
    from: &SpriteBody<'_>,
    onto_mask: &AlphaMask,
    onto: &SpriteBody<'_>,
) -> bool {
    // Clockwise sprite rotation is a counter-clockwise rotation by the negated
    // angle on the way out, and by the raw angle on the way back.
    let to_world = Rotation2::new(-from.pose.rotation.to_radians());
    let to_onto = Rotation2::new(onto.pose.rotation.to_radians());
    let from_position = Vector2::new(from.pose.x, from.pose.y);
    let onto_position = Vector2::new(onto.pose.x, onto.pose.y);
    let from_anchor = Vector2::new(from.image.anchor_x(), from.image.anchor_y());
    let from_scale = Vector2::new(from.pose.scale_x, from.pose.scale_y);
    let onto_anchor = Vector2::new(onto.image.anchor_x(), onto.image.anchor_y());
    let onto_scale = Vector2::new(
        non_zero_or_one(onto.pose.scale_x),
        non_zero_or_one(onto.pose.scale_y),
    );

    from_mask.opaque_pixels().iter().any(|&(col, row)| {
        let local = (Vector2::new(col as f32, row as f32) - from_anchor).component_mul(&from_scale);
        let world = to_world * local + from_position;
        let target = (to_onto * (world - onto_position)).component_div(&onto_scale) + onto_anchor;
        let x = target.x.round_ties_even() as i64;
        let y = target.y.round_ties_even() as i64;
        onto_mask.is_opaque(x, y)
    })
}

fn non_zero_or_one(scale: f32) -> f32 {
    if scale == 0.0 {
        1.0
    } else {
        scale
    }
}

/// Two-phase sprite collision using the bounding-circle broad phase.
pub fn collide(masks: &MaskCache, a: &SpriteBody<'_>, b: &SpriteBody<'_>) -> bool {
    collide_with(BroadPhase::BoundingCircle, masks, a, b)
}

pub fn collide_with(
    broad_phase: BroadPhase,
    masks: &MaskCache,
    a: &SpriteBody<'_>,
    b: &SpriteBody<'_>,
) -> bool {
    if !broad_phase.passes(a, b) {
        return false;
    }
    let mask_a = masks.get_mask(a.image);
    let mask_b = masks.get_mask(b.image);
    narrow_phase(&mask_a, a, &mask_b, b)
}

/// Mask cache plus broad-phase policy, shared by every collision query of a
/// simulation.
#[derive(Default)]
pub struct CollisionEngine {
    masks: MaskCache,
    broad_phase: BroadPhase,
}

impl CollisionEngine {
    pub fn new(broad_phase: BroadPhase) -> Self {
        Self {
            masks: MaskCache::new(),
            broad_phase,
        }
    }

    pub fn masks(&self) -> &MaskCache {
        &self.masks
    }

    pub fn broad_phase(&self) -> BroadPhase {
        self.broad_phase
    }

    pub fn collide(&self, a: &SpriteBody<'_>, b: &SpriteBody<'_>) -> bool {
        collide_with(self.broad_phase, &self.masks, a, b)
    }
}
