use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Real;

/// Side length (metres) assumed for markers with no configured size.
pub const DEFAULT_MARKER_SIDE: Real = 0.25;

/// Physical size of a marker in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerSize {
    pub width: Real,
    pub height: Real,
}

impl MarkerSize {
    pub fn new(width: Real, height: Real) -> Self {
        Self { width, height }
    }

    pub fn square(side: Real) -> Self {
        Self::new(side, side)
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

impl Default for MarkerSize {
    fn default() -> Self {
        Self::square(DEFAULT_MARKER_SIDE)
    }
}

/// Per-id marker sizes with a fallback for unlisted ids.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarkerSizeTable {
    /// Size used for any id without an explicit entry.
    #[serde(default)]
    pub default: MarkerSize,
    #[serde(default)]
    pub sizes: BTreeMap<u32, MarkerSize>,
}

impl MarkerSizeTable {
    pub fn new(default: MarkerSize) -> Self {
        Self {
            default,
            sizes: BTreeMap::new(),
        }
    }

    pub fn with_size(mut self, id: u32, size: MarkerSize) -> Self {
        self.sizes.insert(id, size);
        self
    }

    pub fn insert(&mut self, id: u32, size: MarkerSize) -> Option<MarkerSize> {
        self.sizes.insert(id, size)
    }

    /// Configured size for `id`, or the table default.
    pub fn size_of(&self, id: u32) -> MarkerSize {
        self.sizes.get(&id).copied().unwrap_or(self.default)
    }

    /// Whether `id` has an explicit entry.
    pub fn contains(&self, id: u32) -> bool {
        self.sizes.contains_key(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ids_fall_back_to_default() {
        let table = MarkerSizeTable::default().with_size(44, MarkerSize::square(0.1));
        assert_eq!(table.size_of(44), MarkerSize::square(0.1));
        assert_eq!(table.size_of(23), MarkerSize::square(DEFAULT_MARKER_SIDE));
        assert!(table.contains(44));
        assert!(!table.contains(23));
    }

    #[test]
    fn squareness() {
        assert!(MarkerSize::square(0.2).is_square());
        assert!(!MarkerSize::new(0.2, 0.1).is_square());
    }

    #[test]
    fn table_deserializes_with_defaults() {
        let table: MarkerSizeTable =
            serde_json::from_str(r#"{ "sizes": { "7": { "width": 0.1, "height": 0.1 } } }"#)
                .unwrap();
        assert_eq!(table.default, MarkerSize::default());
        assert_eq!(table.size_of(7), MarkerSize::square(0.1));
    }
}
