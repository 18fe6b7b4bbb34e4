//! Opaque asset handles
//!
//! Loading files and choosing a resolution belong to the host. The core only
//! asks for a handle by key and draws a placeholder when there is none.

use std::collections::HashMap;

use crate::sim::difficulty::AsteroidClass;
use crate::sim::state::PowerUpKind;

/// Images the core knows how to ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKey {
    Player,
    Asteroid(AsteroidClass),
    PowerUp(PowerUpKind),
    Logo,
}

/// Host-assigned image id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(pub u32);

impl Handle {
    /// Drawn in place of anything the host could not provide
    pub const PLACEHOLDER: Handle = Handle(u32::MAX);

    pub fn is_placeholder(self) -> bool {
        self == Self::PLACEHOLDER
    }
}

/// Source of image handles
pub trait AssetProvider {
    /// Look up a handle; `None` when the host has nothing for this key
    fn get(&self, key: ImageKey) -> Option<Handle>;

    /// Look up a handle, substituting the placeholder when missing
    fn resolve(&self, key: ImageKey) -> Handle {
        match self.get(key) {
            Some(handle) => handle,
            None => {
                log::warn!("Missing image for {:?}, using placeholder", key);
                Handle::PLACEHOLDER
            }
        }
    }
}

/// Simple key -> handle table
#[derive(Debug, Clone, Default)]
pub struct AssetTable {
    handles: HashMap<ImageKey, Handle>,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table with a distinct handle for every key the game uses
    pub fn with_all_images() -> Self {
        let mut table = Self::new();
        let mut next = 0;
        let mut add = |table: &mut Self, key| {
            table.insert(key, Handle(next));
            next += 1;
        };
        add(&mut table, ImageKey::Player);
        add(&mut table, ImageKey::Logo);
        for class in AsteroidClass::ALL {
            add(&mut table, ImageKey::Asteroid(class));
        }
        for kind in PowerUpKind::ALL {
            add(&mut table, ImageKey::PowerUp(kind));
        }
        table
    }

    pub fn insert(&mut self, key: ImageKey, handle: Handle) {
        self.handles.insert(key, handle);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl AssetProvider for AssetTable {
    fn get(&self, key: ImageKey) -> Option<Handle> {
        self.handles.get(&key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_resolves_to_placeholder() {
        let mut table = AssetTable::new();
        table.insert(ImageKey::Player, Handle(7));
        assert_eq!(table.resolve(ImageKey::Player), Handle(7));
        assert!(table.resolve(ImageKey::Logo).is_placeholder());
    }

    #[test]
    fn test_full_table_has_distinct_handles() {
        let table = AssetTable::with_all_images();
        assert_eq!(table.len(), 2 + AsteroidClass::ALL.len() + PowerUpKind::ALL.len());
        let heal = table.resolve(ImageKey::PowerUp(PowerUpKind::Heal50));
        let boom = table.resolve(ImageKey::PowerUp(PowerUpKind::Boom));
        assert_ne!(heal, boom);
        assert!(!heal.is_placeholder());
    }
}
