//! Layer stores: where the executor reads and writes layer images.
//!
//! The executor writes distinct target layers from several worker threads at
//! once, so [`LayerStore::set_image`] takes `&self` and implementations use
//! interior mutability per layer.

use crate::{ArithError, ArithResult};
use std::sync::{PoisonError, RwLock};
use strata_core::LayerImage;

/// Indexable, mutable collection of layer images.
///
/// Implementations must allow concurrent reads of any layers and
/// concurrent writes to distinct layers.
pub trait LayerStore: Sync {
    /// Index of the last layer.
    fn last_layer_index(&self) -> u32;

    /// Returns an owned copy of layer `index`.
    fn get_image(&self, index: u32) -> ArithResult<LayerImage>;

    /// Replaces layer `index`.
    fn set_image(&self, index: u32, image: LayerImage) -> ArithResult<()>;
}

/// In-memory store, one lock per layer.
///
/// ```rust
/// use strata_arith::{LayerStore, MemoryLayerStore};
/// use strata_core::LayerImage;
///
/// let store = MemoryLayerStore::new(vec![LayerImage::new(4, 4); 3]);
/// assert_eq!(store.last_layer_index(), 2);
///
/// store.set_image(1, LayerImage::filled(4, 4, 255)).unwrap();
/// assert_eq!(store.get_image(1).unwrap().pixel(0, 0), 255);
/// ```
#[derive(Debug, Default)]
pub struct MemoryLayerStore {
    layers: Vec<RwLock<LayerImage>>,
}

impl MemoryLayerStore {
    /// Wraps `layers`; layer `i` is `layers[i]`.
    pub fn new(layers: Vec<LayerImage>) -> Self {
        Self {
            layers: layers.into_iter().map(RwLock::new).collect(),
        }
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if the store holds no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Copies of every layer, in order.
    pub fn snapshot(&self) -> Vec<LayerImage> {
        self.layers
            .iter()
            .map(|l| l.read().unwrap_or_else(PoisonError::into_inner).clone())
            .collect()
    }

    /// Consumes the store and returns its layers.
    pub fn into_layers(self) -> Vec<LayerImage> {
        self.layers
            .into_iter()
            .map(|l| l.into_inner().unwrap_or_else(PoisonError::into_inner))
            .collect()
    }

    fn slot(&self, index: u32) -> ArithResult<&RwLock<LayerImage>> {
        self.layers
            .get(index as usize)
            .ok_or(ArithError::LayerOutOfRange {
                index,
                last: self.last_layer_index(),
            })
    }
}

impl LayerStore for MemoryLayerStore {
    fn last_layer_index(&self) -> u32 {
        self.layers.len().saturating_sub(1) as u32
    }

    fn get_image(&self, index: u32) -> ArithResult<LayerImage> {
        let slot = self.slot(index)?;
        Ok(slot.read().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn set_image(&self, index: u32, image: LayerImage) -> ArithResult<()> {
        let slot = self.slot(index)?;
        *slot.write().unwrap_or_else(PoisonError::into_inner) = image;
        Ok(())
    }
}

impl From<Vec<LayerImage>> for MemoryLayerStore {
    fn from(layers: Vec<LayerImage>) -> Self {
        Self::new(layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range() {
        let store = MemoryLayerStore::new(vec![LayerImage::new(2, 2); 2]);
        assert!(matches!(
            store.get_image(2),
            Err(ArithError::LayerOutOfRange { index: 2, last: 1 })
        ));
        assert!(store.set_image(5, LayerImage::new(2, 2)).is_err());
    }

    #[test]
    fn test_get_returns_independent_copy() {
        let store = MemoryLayerStore::new(vec![LayerImage::filled(2, 2, 1)]);
        let mut copy = store.get_image(0).unwrap();
        copy.data_mut().fill(9);
        assert_eq!(store.get_image(0).unwrap().pixel(0, 0), 1);
    }

    #[test]
    fn test_concurrent_disjoint_writes() {
        use rayon::prelude::*;

        let store = MemoryLayerStore::new(vec![LayerImage::new(4, 4); 16]);
        (0..16u32).into_par_iter().for_each(|i| {
            store.set_image(i, LayerImage::filled(4, 4, i as u8)).unwrap();
        });

        for (i, layer) in store.into_layers().into_iter().enumerate() {
            assert_eq!(layer.pixel(3, 3), i as u8);
        }
    }

    #[test]
    fn test_empty_store() {
        let store = MemoryLayerStore::default();
        assert!(store.is_empty());
        assert_eq!(store.last_layer_index(), 0);
        assert!(store.get_image(0).is_err());
    }
}
