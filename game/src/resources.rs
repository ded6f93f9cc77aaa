use collisions::{Image, ImageDataError, ImageId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    Player,
    Laser,
    Asteroid,
    Explosion,
    PowerUp,
    Cursor,
    Missile,
}

impl SpriteKey {
    pub const ALL: [SpriteKey; 7] = [
        SpriteKey::Player,
        SpriteKey::Laser,
        SpriteKey::Asteroid,
        SpriteKey::Explosion,
        SpriteKey::PowerUp,
        SpriteKey::Cursor,
        SpriteKey::Missile,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            SpriteKey::Player => "player.png",
            SpriteKey::Laser => "lazer.png",
            SpriteKey::Asteroid => "astrode.png",
            SpriteKey::Explosion => "explosion.png",
            SpriteKey::PowerUp => "powerup.png",
            SpriteKey::Cursor => "pointer.png",
            SpriteKey::Missile => "missile.png",
        }
    }

    /// The cursor hangs off its bottom-left pixel; everything else is anchored
    /// on its center.
    pub fn is_centered(&self) -> bool {
        !matches!(self, SpriteKey::Cursor)
    }

    pub fn image_id(&self) -> ImageId {
        let index = SpriteKey::ALL
            .iter()
            .position(|key| key == self)
            .unwrap_or_default();
        ImageId(index as u32)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SoundKey {
    Laser,
    Explosion,
    PowerUp,
    Music,
    Missile,
}

impl SoundKey {
    pub const ALL: [SoundKey; 5] = [
        SoundKey::Laser,
        SoundKey::Explosion,
        SoundKey::PowerUp,
        SoundKey::Music,
        SoundKey::Missile,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            SoundKey::Laser => "laserShoot.wav",
            SoundKey::Explosion => "explosion.wav",
            SoundKey::PowerUp => "powerUp.wav",
            SoundKey::Music => "background.wav",
            SoundKey::Missile => "missile.wav",
        }
    }

    /// Long tracks are streamed by the host instead of decoded up front.
    pub fn is_streaming(&self) -> bool {
        matches!(self, SoundKey::Music)
    }
}

/// Encoded sound bytes. Playback belongs to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sound {
    pub key: SoundKey,
    pub bytes: Vec<u8>,
}

impl Sound {
    pub fn silent(key: SoundKey) -> Self {
        Sound {
            key,
            bytes: Vec::new(),
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.key.is_streaming()
    }
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("missing asset {}", path.display())]
    Missing { path: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    ImageData(#[from] ImageDataError),
    #[error("no image registered for sprite {0:?}")]
    MissingSprite(SpriteKey),
    #[error("no sound registered for {0:?}")]
    MissingSound(SoundKey),
}

/// Every image and sound the game uses, indexed by key.
///
/// Images are stored in [`SpriteKey::ALL`] order, so a sprite's [`ImageId`] is
/// its position in that list.
#[derive(Debug, Clone)]
pub struct ResourceRegistry {
    images: Vec<Image>,
    sounds: HashMap<SoundKey, Sound>,
}

impl ResourceRegistry {
    /// Build a registry from already decoded parts. The image for each key is
    /// re-stamped with that key's [`ImageId`]; every sprite and sound key must
    /// be present.
    pub fn from_parts<I, S>(sprites: I, sounds: S) -> Result<Self, ResourceError>
    where
        I: IntoIterator<Item = (SpriteKey, Image)>,
        S: IntoIterator<Item = Sound>,
    {
        let mut by_key: HashMap<SpriteKey, Image> = sprites.into_iter().collect();
        let mut images = Vec::with_capacity(SpriteKey::ALL.len());
        for key in SpriteKey::ALL {
            let image = by_key
                .remove(&key)
                .ok_or(ResourceError::MissingSprite(key))?;
            images.push(restamp(key, image));
        }

        let sounds: HashMap<SoundKey, Sound> =
            sounds.into_iter().map(|sound| (sound.key, sound)).collect();
        if let Some(key) = SoundKey::ALL.iter().find(|key| !sounds.contains_key(*key)) {
            return Err(ResourceError::MissingSound(*key));
        }

        Ok(ResourceRegistry { images, sounds })
    }

    /// Procedural stand-ins sized like the shipped art, with silent sounds.
    /// Used when no asset directory is available.
    pub fn placeholder() -> Self {
        let images = SpriteKey::ALL
            .iter()
            .map(|key| placeholder_image(*key))
            .collect();
        let sounds = SoundKey::ALL
            .iter()
            .map(|key| (*key, Sound::silent(*key)))
            .collect();
        ResourceRegistry { images, sounds }
    }

    pub fn image(&self, id: ImageId) -> Option<&Image> {
        self.images.get(id.0 as usize)
    }

    pub fn sprite(&self, key: SpriteKey) -> &Image {
        // from_parts and placeholder fill every key, in order.
        &self.images[key.image_id().0 as usize]
    }

    pub fn sound(&self, key: SoundKey) -> Option<&Sound> {
        self.sounds.get(&key)
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }
}

fn restamp(key: SpriteKey, image: Image) -> Image {
    let (anchor_x, anchor_y) = if key.is_centered() {
        ((image.width() / 2) as f32, (image.height() / 2) as f32)
    } else {
        (0.0, 0.0)
    };
    let id = key.image_id();
    let width = image.width();
    let height = image.height();
    // Rebuilding from the same bytes cannot fail the length check.
    match Image::from_rgba(id, width, height, image.pixels().to_vec()) {
        Ok(stamped) => stamped.with_anchor(anchor_x, anchor_y),
        Err(_) => image.with_anchor(anchor_x, anchor_y),
    }
}

fn placeholder_image(key: SpriteKey) -> Image {
    let id = key.image_id();
    match key {
        SpriteKey::Player => Image::disc(id, 200),
        SpriteKey::Laser => Image::solid(id, 4, 16).centered(),
        SpriteKey::Asteroid => Image::disc(id, 120),
        SpriteKey::Explosion => Image::disc(id, 8),
        SpriteKey::PowerUp => Image::disc(id, 150),
        SpriteKey::Cursor => Image::solid(id, 16, 16),
        SpriteKey::Missile => Image::solid(id, 8, 24).centered(),
    }
}

/// Reads the shipped asset layout: `sprites/*.png` and `sounds/*.wav` under a
/// base directory.
pub struct ResourceLoader {
    base_dir: PathBuf,
}

impl ResourceLoader {
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        ResourceLoader {
            base_dir: base_dir.into(),
        }
    }

    pub fn load(&self) -> Result<ResourceRegistry, ResourceError> {
        let mut sprites = Vec::with_capacity(SpriteKey::ALL.len());
        for key in SpriteKey::ALL {
            let path = self.base_dir.join("sprites").join(key.file_name());
            sprites.push((key, load_png(key.image_id(), &path)?));
        }

        let mut sounds = Vec::with_capacity(SoundKey::ALL.len());
        for key in SoundKey::ALL {
            let path = self.base_dir.join("sounds").join(key.file_name());
            let bytes = read_asset(&path)?;
            debug!(sound = ?key, bytes = bytes.len(), "loaded sound");
            sounds.push(Sound { key, bytes });
        }

        let registry = ResourceRegistry::from_parts(sprites, sounds)?;
        info!(base_dir = %self.base_dir.display(), "loaded game resources");
        Ok(registry)
    }
}

fn read_asset(path: &Path) -> Result<Vec<u8>, ResourceError> {
    std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ResourceError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            ResourceError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

fn load_png(id: ImageId, path: &Path) -> Result<Image, ResourceError> {
    let bytes = read_asset(path)?;
    let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png)
        .map_err(|source| ResourceError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    let mut rgba = decoded.into_rgba8();
    // PNG rows run top-down; the world is y-up.
    image::imageops::flip_vertical_in_place(&mut rgba);
    let (width, height) = rgba.dimensions();
    debug!(path = %path.display(), width, height, "decoded sprite");
    Ok(Image::from_rgba(id, width, height, rgba.into_raw())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_ids_follow_key_order() {
        for (index, key) in SpriteKey::ALL.iter().enumerate() {
            assert_eq!(key.image_id(), ImageId(index as u32));
        }
    }

    #[test]
    fn placeholder_is_complete() {
        let registry = ResourceRegistry::placeholder();
        for key in SpriteKey::ALL {
            assert_eq!(registry.sprite(key).id(), key.image_id());
        }
        for key in SoundKey::ALL {
            assert!(registry.sound(key).is_some());
        }
        assert_eq!(registry.sprite(SpriteKey::Cursor).anchor_x(), 0.0);
    }
}
