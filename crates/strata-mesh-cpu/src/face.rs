use strata_blocks::Face;
use strata_geom::Vec3;

/// Unit-cube corners for each face, indexed by `Face::index()`.
/// Corners run counter-clockwise seen from outside, starting at UV `(0,0)`.
pub const FACE_CORNERS: [[[f32; 3]; 4]; 6] = [
    // PosY
    [[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]],
    // NegY
    [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
    // PosX
    [[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0]],
    // NegX
    [[0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]],
    // PosZ
    [[1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0], [0.0, 0.0, 1.0]],
    // NegZ
    [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
];

/// Returns the unit-normal vector for this face.
#[inline]
pub fn face_normal(face: Face) -> Vec3 {
    let (dx, dy, dz) = face.delta();
    Vec3::new(dx as f32, dy as f32, dz as f32)
}

/// Face corners of the unit cell whose minimum corner is `origin`.
#[inline]
pub fn face_corners(face: Face, origin: Vec3) -> [Vec3; 4] {
    FACE_CORNERS[face.index()].map(|[x, y, z]| origin + Vec3::new(x, y, z))
}
