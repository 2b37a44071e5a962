//! Grid dimensions and voxel coordinates.
//!
//! Voxels are stored row-major with Y as the slowest axis:
//! `index = y * (dim_x * dim_z) + z * dim_x + x`.

use bytemuck::{Pod, Zeroable};
use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

/// Extent of a dense voxel grid, one entry per axis.
///
/// Every kernel receives this explicitly as its dispatch geometry; nothing
/// in the crate assumes a fixed grid size.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct GridDims {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl GridDims {
    /// Create new grid dimensions
    #[inline]
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Create a cube-shaped grid
    #[inline]
    pub const fn cubic(side: u32) -> Self {
        Self::new(side, side, side)
    }

    /// Total number of voxels in the grid
    #[inline]
    pub const fn voxel_count(self) -> usize {
        self.x as usize * self.y as usize * self.z as usize
    }

    /// Number of voxels in one horizontal (XZ) layer
    #[inline]
    pub const fn layer_size(self) -> usize {
        self.x as usize * self.z as usize
    }

    /// Returns true if any axis has zero extent
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.x == 0 || self.y == 0 || self.z == 0
    }

    /// Returns true if all three axes share one power-of-two extent
    #[inline]
    pub const fn is_cubic_power_of_two(self) -> bool {
        self.x == self.y && self.y == self.z && self.x.is_power_of_two()
    }

    /// Check whether a signed position lies inside the grid
    #[inline]
    pub const fn contains(self, pos: IVec3) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.z >= 0
            && (pos.x as u32) < self.x
            && (pos.y as u32) < self.y
            && (pos.z as u32) < self.z
    }

    /// Convert a coordinate to its linear index
    #[inline]
    pub const fn index_of(self, coord: VoxelCoord) -> usize {
        coord.y as usize * self.layer_size() + coord.z as usize * self.x as usize + coord.x as usize
    }

    /// Recover the coordinate of a linear index
    #[inline]
    pub const fn coord_of(self, index: usize) -> VoxelCoord {
        let layer = self.layer_size();
        let y = index / layer;
        let rem = index % layer;
        let z = rem / self.x as usize;
        let x = rem % self.x as usize;
        VoxelCoord::new(x as u32, y as u32, z as u32)
    }

    /// Convert a signed position to a coordinate, or `None` outside the grid
    #[inline]
    pub fn checked_coord(self, pos: IVec3) -> Option<VoxelCoord> {
        self.contains(pos)
            .then(|| VoxelCoord::new(pos.x as u32, pos.y as u32, pos.z as u32))
    }

    /// Convert to floating point Vec3
    #[inline]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

/// Position of a voxel inside a grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct VoxelCoord {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl VoxelCoord {
    /// Create a new voxel coordinate
    #[inline]
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Convert to glam IVec3
    #[inline]
    pub const fn to_ivec3(self) -> IVec3 {
        IVec3::new(self.x as i32, self.y as i32, self.z as i32)
    }

    /// Convert to floating point Vec3
    #[inline]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }

    /// Step by `delta`, returning `None` when the result leaves the grid.
    ///
    /// There is no wraparound: stepping off any face of the grid yields `None`.
    #[inline]
    pub fn offset(self, delta: IVec3, dims: GridDims) -> Option<Self> {
        dims.checked_coord(self.to_ivec3() + delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_row_major_formula() {
        let dims = GridDims::new(4, 3, 5);
        let coord = VoxelCoord::new(2, 1, 3);
        assert_eq!(dims.index_of(coord), (4 * 5) + 3 * 4 + 2);
    }

    #[test]
    fn index_roundtrip() {
        let dims = GridDims::new(3, 4, 5);
        for index in 0..dims.voxel_count() {
            let coord = dims.coord_of(index);
            assert_eq!(dims.index_of(coord), index);
        }
    }

    #[test]
    fn offset_never_wraps() {
        let dims = GridDims::new(4, 4, 4);
        let corner = VoxelCoord::new(0, 0, 0);
        assert_eq!(corner.offset(IVec3::NEG_X, dims), None);
        assert_eq!(corner.offset(IVec3::NEG_Y, dims), None);
        assert_eq!(corner.offset(IVec3::NEG_Z, dims), None);

        let far = VoxelCoord::new(3, 3, 3);
        assert_eq!(far.offset(IVec3::X, dims), None);
        assert_eq!(far.offset(IVec3::Y, dims), None);
        assert_eq!(far.offset(IVec3::Z, dims), None);

        assert_eq!(
            corner.offset(IVec3::X, dims),
            Some(VoxelCoord::new(1, 0, 0))
        );
    }

    #[test]
    fn cubic_power_of_two() {
        assert!(GridDims::cubic(8).is_cubic_power_of_two());
        assert!(!GridDims::cubic(6).is_cubic_power_of_two());
        assert!(!GridDims::new(128, 64, 128).is_cubic_power_of_two());
    }
}
