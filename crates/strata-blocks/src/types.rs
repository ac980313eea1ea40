use serde::{Deserialize, Serialize};

/// Block type code. Code 0 is the empty ("air") type: never rendered, never opaque.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockType(pub u16);

impl BlockType {
    pub const EMPTY: BlockType = BlockType(0);

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn code(self) -> u16 {
        self.0
    }
}

impl From<u16> for BlockType {
    fn from(code: u16) -> Self {
        BlockType(code)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u16);

/// Coarse face classification used by per-face material overrides.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FaceRole {
    Top,
    Bottom,
    Side,
}

/// The six axis-aligned faces of a cell. ±X is east/west, ±Z is north/south.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Face {
    PosY = 0,
    NegY = 1,
    PosX = 2,
    NegX = 3,
    PosZ = 4,
    NegZ = 5,
}

impl Face {
    /// Fixed iteration order used by the mesher; changing it changes vertex order.
    pub const ALL: [Face; 6] = [
        Face::PosY,
        Face::NegY,
        Face::PosX,
        Face::NegX,
        Face::PosZ,
        Face::NegZ,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts a face index `[0..6)` back into a `Face`.
    #[inline]
    pub fn from_index(i: usize) -> Option<Face> {
        Face::ALL.get(i).copied()
    }

    /// Integer grid step `(dx,dy,dz)` when leaving the cell through this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    #[inline]
    pub fn role(self) -> FaceRole {
        match self {
            Face::PosY => FaceRole::Top,
            Face::NegY => FaceRole::Bottom,
            _ => FaceRole::Side,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_index_roundtrip_and_unit_deltas() {
        for (i, f) in Face::ALL.iter().enumerate() {
            assert_eq!(f.index(), i);
            assert_eq!(Face::from_index(i), Some(*f));
            let (dx, dy, dz) = f.delta();
            assert_eq!(dx.abs() + dy.abs() + dz.abs(), 1);
        }
        assert_eq!(Face::from_index(6), None);
    }

    #[test]
    fn empty_type_is_code_zero() {
        assert!(BlockType::EMPTY.is_empty());
        assert!(BlockType::default().is_empty());
        assert!(!BlockType(3).is_empty());
        assert_eq!(BlockType::from(7).code(), 7);
    }
}
