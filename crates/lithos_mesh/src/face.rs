//! Cube faces and their fixed quad templates.

/// One of the six axis-aligned faces of a voxel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Face {
    /// +X.
    Right = 0,
    /// -X.
    Left = 1,
    /// +Y.
    Top = 2,
    /// -Y.
    Bottom = 3,
    /// +Z.
    Back = 4,
    /// -Z.
    Front = 5,
}

/// Texture coordinates of a quad's four corners.
pub const QUAD_TEX_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Corner order of the two triangles forming a quad.
pub const QUAD_TRIANGLES: [usize; 6] = [0, 1, 2, 0, 2, 3];

impl Face {
    /// Every face, in normal-index order.
    pub const ALL: [Self; 6] = [
        Self::Right,
        Self::Left,
        Self::Top,
        Self::Bottom,
        Self::Back,
        Self::Front,
    ];

    /// Offset to the voxel across this face.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> [i32; 3] {
        match self {
            Self::Right => [1, 0, 0],
            Self::Left => [-1, 0, 0],
            Self::Top => [0, 1, 0],
            Self::Bottom => [0, -1, 0],
            Self::Back => [0, 0, 1],
            Self::Front => [0, 0, -1],
        }
    }

    /// Unit-cube corners, counter-clockwise seen from outside.
    #[must_use]
    pub const fn corners(self) -> [[f32; 3]; 4] {
        match self {
            Self::Right => [[1.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]],
            Self::Left => [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
            Self::Top => [[0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            Self::Bottom => [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
            Self::Back => [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
            Self::Front => [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
        }
    }

    /// Directional light factor baked into vertex colors.
    #[inline]
    #[must_use]
    pub const fn shade(self) -> f32 {
        match self {
            Self::Top => 1.0,
            Self::Right | Self::Left => 0.8,
            Self::Back | Self::Front => 0.65,
            Self::Bottom => 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    #[test]
    fn test_winding_matches_offset() {
        for face in Face::ALL {
            let c = face.corners();
            let normal = cross(sub(c[1], c[0]), sub(c[2], c[0]));
            #[allow(clippy::cast_precision_loss)]
            let expected = face.offset().map(|v| v as f32);
            assert_eq!(normal, expected, "{face:?} winds the wrong way");
        }
    }

    #[test]
    fn test_corners_lie_on_face_plane() {
        for face in Face::ALL {
            let axis = face.offset().iter().position(|v| *v != 0).unwrap();
            let plane = if face.offset()[axis] > 0 { 1.0 } else { 0.0 };
            for corner in face.corners() {
                assert!((corner[axis] - plane).abs() < f32::EPSILON);
            }
        }
    }
}
