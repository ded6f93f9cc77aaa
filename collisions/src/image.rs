use std::fmt;

/// Stable identity of a loaded image. Masks are cached under this key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDataError {
    pub width: u32,
    pub height: u32,
    pub len: usize,
}

impl fmt::Display for ImageDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RGBA buffer must hold width * height * 4 bytes (width: {}, height: {}, len: {})",
            self.width, self.height, self.len
        )
    }
}

impl std::error::Error for ImageDataError {}

/// Immutable RGBA image.
///
/// Rows are stored bottom-up: row 0 is the bottom of the image, matching the
/// y-up world. The anchor is the pixel that sits on the sprite's position.
#[derive(Debug, Clone)]
pub struct Image {
    id: ImageId,
    width: u32,
    height: u32,
    anchor_x: f32,
    anchor_y: f32,
    pixels: Vec<u8>,
}

impl Image {
    pub fn from_rgba(
        id: ImageId,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<Self, ImageDataError> {
        if pixels.len() != width as usize * height as usize * 4 {
            return Err(ImageDataError {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            id,
            width,
            height,
            anchor_x: 0.0,
            anchor_y: 0.0,
            pixels,
        })
    }

    /// Build an image from an alpha-only generator, `alpha(col, row)`.
    pub fn from_alpha_fn<F>(id: ImageId, width: u32, height: u32, mut alpha: F) -> Self
    where
        F: FnMut(u32, u32) -> u8,
    {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for row in 0..height {
            for col in 0..width {
                pixels.extend_from_slice(&[255, 255, 255, alpha(col, row)]);
            }
        }
        Self {
            id,
            width,
            height,
            anchor_x: 0.0,
            anchor_y: 0.0,
            pixels,
        }
    }

    pub fn solid(id: ImageId, width: u32, height: u32) -> Self {
        Self::from_alpha_fn(id, width, height, |_, _| 255)
    }

    pub fn transparent(id: ImageId, width: u32, height: u32) -> Self {
        Self::from_alpha_fn(id, width, height, |_, _| 0)
    }

    /// Opaque disc of the given radius inside a `2r x 2r` square, centered.
    pub fn disc(id: ImageId, radius: u32) -> Self {
        let size = radius * 2;
        let r = radius as f32;
        Self::from_alpha_fn(id, size, size, |col, row| {
            let dx = col as f32 + 0.5 - r;
            let dy = row as f32 + 0.5 - r;
            if dx * dx + dy * dy <= r * r {
                255
            } else {
                0
            }
        })
        .centered()
    }

    pub fn with_anchor(mut self, anchor_x: f32, anchor_y: f32) -> Self {
        self.anchor_x = anchor_x;
        self.anchor_y = anchor_y;
        self
    }

    /// Anchor on the center pixel, rounding down like integer division.
    pub fn centered(self) -> Self {
        let anchor_x = (self.width / 2) as f32;
        let anchor_y = (self.height / 2) as f32;
        self.with_anchor(anchor_x, anchor_y)
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn anchor_x(&self) -> f32 {
        self.anchor_x
    }

    pub fn anchor_y(&self) -> f32 {
        self.anchor_y
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn alpha_at(&self, col: u32, row: u32) -> Option<u8> {
        if col >= self.width || row >= self.height {
            return None;
        }
        let offset = (row as usize * self.width as usize + col as usize) * 4 + 3;
        self.pixels.get(offset).copied()
    }
}
