pub mod angles;
pub mod arena;
pub mod shapes;
