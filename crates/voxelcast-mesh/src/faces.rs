//! Face directions and their fixed per-direction tables.

use glam::{IVec2, IVec3, Vec3};
use serde::{Deserialize, Serialize};

/// One of the six axis-aligned faces of a voxel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceDirection {
    /// Facing -Z
    Front,
    /// Facing +Z
    Back,
    /// Facing -X
    Left,
    /// Facing +X
    Right,
    /// Facing +Y
    Top,
    /// Facing -Y
    Bottom,
}

impl FaceDirection {
    /// Faces visible when the grid is viewed from above and the front.
    pub const CANONICAL: [Self; 4] = [Self::Front, Self::Left, Self::Right, Self::Top];

    /// All six faces.
    pub const ALL: [Self; 6] = [
        Self::Front,
        Self::Back,
        Self::Left,
        Self::Right,
        Self::Top,
        Self::Bottom,
    ];

    /// Offset to the neighbor this face looks at.
    #[inline]
    pub const fn normal(self) -> IVec3 {
        match self {
            Self::Front => IVec3::NEG_Z,
            Self::Back => IVec3::Z,
            Self::Left => IVec3::NEG_X,
            Self::Right => IVec3::X,
            Self::Top => IVec3::Y,
            Self::Bottom => IVec3::NEG_Y,
        }
    }

    /// Unit-cube corners of the face quad, counter-clockwise seen from outside.
    ///
    /// The voxel at `(x, y, z)` occupies `[x, x + 1]` on every axis.
    #[inline]
    pub const fn corners(self) -> [Vec3; 4] {
        match self {
            Self::Front => [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
            ],
            Self::Back => [
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(0.0, 1.0, 1.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
            Self::Left => [
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(0.0, 1.0, 1.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 0.0),
            ],
            Self::Right => [
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(1.0, 0.0, 1.0),
            ],
            Self::Top => [
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 1.0),
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(1.0, 1.0, 0.0),
            ],
            Self::Bottom => [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
        }
    }

    /// Directional light scalar applied to the face color.
    #[inline]
    pub const fn shade(self) -> f32 {
        match self {
            Self::Top => 1.0,
            Self::Front | Self::Back => 0.85,
            Self::Left | Self::Right => 0.75,
            Self::Bottom => 0.5,
        }
    }

    /// XZ step to the column scanned by the shadow test.
    #[inline]
    pub const fn shadow_offset(self) -> IVec2 {
        match self {
            Self::Front => IVec2::new(0, -1),
            Self::Back => IVec2::new(0, 1),
            Self::Left => IVec2::new(-1, 0),
            Self::Right => IVec2::new(1, 0),
            Self::Top | Self::Bottom => IVec2::ZERO,
        }
    }
}

/// Which face directions the kernel tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceSet {
    /// Front, left, right and top; back and bottom are never emitted.
    #[default]
    Canonical,
    /// All six directions.
    All,
}

impl FaceSet {
    /// Directions in the fixed order faces are emitted.
    #[inline]
    pub const fn directions(self) -> &'static [FaceDirection] {
        match self {
            Self::Canonical => &FaceDirection::CANONICAL,
            Self::All => &FaceDirection::ALL,
        }
    }

    /// Upper bound on faces a single voxel can emit.
    #[inline]
    pub const fn max_faces_per_voxel(self) -> u32 {
        self.directions().len() as u32
    }
}
