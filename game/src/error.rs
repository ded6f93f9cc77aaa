use crate::config::ConfigError;
use crate::resources::ResourceError;
use quadtree::QuadtreeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error("could not build the spatial index: {0}")]
    Quadtree(#[from] QuadtreeError),
}
