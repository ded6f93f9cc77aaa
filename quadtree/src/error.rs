use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuadtreeError {
    InvalidRectangleDims { width: f32, height: f32 },
    InvalidRectanglePosition { x: f32, y: f32 },
    InvalidNodeCapacity { node_capacity: usize },
}

pub type QuadtreeResult<T> = Result<T, QuadtreeError>;

impl fmt::Display for QuadtreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuadtreeError::InvalidRectangleDims { width, height } => {
                write!(
                    f,
                    "rectangle width/height must be finite and positive (width: {}, height: {})",
                    width, height
                )
            }
            QuadtreeError::InvalidRectanglePosition { x, y } => {
                write!(
                    f,
                    "rectangle position must be finite (x: {}, y: {})",
                    x, y
                )
            }
            QuadtreeError::InvalidNodeCapacity { node_capacity } => {
                write!(
                    f,
                    "node capacity must be at least 1 (node_capacity: {})",
                    node_capacity
                )
            }
        }
    }
}

impl std::error::Error for QuadtreeError {}

pub(crate) fn validate_boundary(x: f32, y: f32, width: f32, height: f32) -> QuadtreeResult<()> {
    if !x.is_finite() || !y.is_finite() {
        return Err(QuadtreeError::InvalidRectanglePosition { x, y });
    }
    if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
        return Err(QuadtreeError::InvalidRectangleDims { width, height });
    }
    Ok(())
}
