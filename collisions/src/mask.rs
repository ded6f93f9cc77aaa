use crate::image::{Image, ImageId};
use fxhash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Per-image opacity grid: a cell is set where the pixel's alpha is non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    cells: Vec<bool>,
    // (col, row) of every opaque cell, row-major
    opaque: Vec<(u32, u32)>,
}

impl AlphaMask {
    pub fn from_image(image: &Image) -> Self {
        let width = image.width();
        let height = image.height();
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        let mut opaque = Vec::new();
        for (index, pixel) in image.pixels().chunks_exact(4).enumerate() {
            let is_opaque = pixel[3] > 0;
            cells.push(is_opaque);
            if is_opaque {
                let col = (index % width as usize) as u32;
                let row = (index / width as usize) as u32;
                opaque.push((col, row));
            }
        }
        Self {
            width,
            height,
            cells,
            opaque,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Out-of-range coordinates read as transparent.
    pub fn is_opaque(&self, col: i64, row: i64) -> bool {
        if col < 0 || row < 0 || col >= self.width as i64 || row >= self.height as i64 {
            return false;
        }
        self.cells[row as usize * self.width as usize + col as usize]
    }

    pub fn opaque_pixels(&self) -> &[(u32, u32)] {
        &self.opaque
    }

    pub fn opaque_count(&self) -> usize {
        self.opaque.len()
    }
}

/// Lazily built masks keyed by image identity.
///
/// Images never change after loading, so entries are never evicted.
#[derive(Default)]
pub struct MaskCache {
    masks: RefCell<FxHashMap<ImageId, Rc<AlphaMask>>>,
}

impl MaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_mask(&self, image: &Image) -> Rc<AlphaMask> {
        if let Some(mask) = self.masks.borrow().get(&image.id()) {
            return Rc::clone(mask);
        }
        let mask = Rc::new(AlphaMask::from_image(image));
        self.masks
            .borrow_mut()
            .insert(image.id(), Rc::clone(&mask));
        mask
    }

    /// Build masks up front so the first collision tick pays nothing.
    pub fn warm<'a, I>(&self, images: I)
    where
        I: IntoIterator<Item = &'a Image>,
    {
        for image in images {
            self.get_mask(image);
        }
    }

    pub fn contains(&self, id: ImageId) -> bool {
        self.masks.borrow().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.masks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.borrow().is_empty()
    }
}
