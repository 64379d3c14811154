//! Block materials and attribute flags.

use bitflags::bitflags;

/// Material stored in a voxel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum BlockType {
    /// Empty space.
    #[default]
    Air = 0,
    /// Immutable floor of the world at y = 0.
    Boundary = 1,
    /// Stone.
    Stone = 2,
    /// Dirt.
    Dirt = 3,
    /// Grass-topped dirt.
    Grass = 4,
    /// Sand.
    Sand = 5,
    /// Snow cap.
    Snow = 6,
    /// Still water.
    Water = 7,
}

impl BlockType {
    /// Every material, in id order.
    pub const ALL: [Self; 8] = [
        Self::Air,
        Self::Boundary,
        Self::Stone,
        Self::Dirt,
        Self::Grass,
        Self::Sand,
        Self::Snow,
        Self::Water,
    ];

    /// Returns the material for a raw id, or `None` if unknown.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Air),
            1 => Some(Self::Boundary),
            2 => Some(Self::Stone),
            3 => Some(Self::Dirt),
            4 => Some(Self::Grass),
            5 => Some(Self::Sand),
            6 => Some(Self::Snow),
            7 => Some(Self::Water),
            _ => None,
        }
    }

    /// Raw id.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// True for any non-air block. Selectable blocks define column height.
    #[inline]
    #[must_use]
    pub const fn is_selectable(self) -> bool {
        !matches!(self, Self::Air)
    }

    /// Attributes given to freshly generated blocks of this material.
    #[must_use]
    pub const fn default_attributes(self) -> BlockAttributes {
        match self {
            Self::Air => BlockAttributes::empty(),
            Self::Boundary => BlockAttributes::STATIC,
            _ => BlockAttributes::BREAKABLE,
        }
    }
}

bitflags! {
    /// Per-voxel attribute bitmask.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct BlockAttributes: u8 {
        /// Never moves or changes.
        const STATIC = 1 << 0;
        /// May be removed by the player.
        const BREAKABLE = 1 << 1;
    }
}

impl Default for BlockAttributes {
    fn default() -> Self {
        Self::empty()
    }
}
