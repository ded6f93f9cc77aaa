use rand::Rng;

/// Axis-aligned rectangle anchored at its minimum corner.
///
/// World space is y-up, so `(x, y)` is the bottom-left corner and
/// `(max_x(), max_y())` the top-right one.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of side `2 * half_size` centered on `(cx, cy)`.
    pub fn around(cx: f32, cy: f32, half_size: f32) -> Self {
        Self {
            x: cx - half_size,
            y: cy - half_size,
            width: half_size * 2.0,
            height: half_size * 2.0,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn expanded(&self, margin: f32) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }

    /// Half-open containment: the min edges are inside, the max edges are not.
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.max_x() && y >= self.y && y < self.max_y()
    }

    /// Closed containment, both edges inside.
    pub fn contains_point_inclusive(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.max_x() && y >= self.y && y <= self.max_y()
    }

    /// Overlap test where rectangles that only touch along an edge still count.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        !(self.x > other.max_x()
            || self.max_x() < other.x
            || self.y > other.max_y()
            || self.max_y() < other.y)
    }

    /// Split into the four equal quadrants, ordered NE, NW, SE, SW.
    pub fn quadrants(&self) -> [Rectangle; 4] {
        let half_width = self.width / 2.0;
        let half_height = self.height / 2.0;
        let mid_x = self.x + half_width;
        let mid_y = self.y + half_height;
        [
            Rectangle::new(mid_x, mid_y, half_width, half_height),
            Rectangle::new(self.x, mid_y, half_width, half_height),
            Rectangle::new(mid_x, self.y, half_width, half_height),
            Rectangle::new(self.x, self.y, half_width, half_height),
        ]
    }

    pub fn get_random_point_inside<R: Rng>(&self, rng: &mut R) -> (f32, f32) {
        (
            safe_randf32(rng, self.x, self.max_x()),
            safe_randf32(rng, self.y, self.max_y()),
        )
    }
}

fn safe_randf32<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..max)
}

impl Default for Rectangle {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }
}
