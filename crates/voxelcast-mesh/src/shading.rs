//! Per-face color: directional shade and the column shadow test.

use glam::IVec3;
use voxelcast_core::{OccupancyGrid, PackedVoxel, VoxelCoord, VoxelFlags};

use crate::faces::FaceDirection;

/// Light scalar for a face with nothing casting over it.
pub const FULL_LIGHT: f32 = 1.0;
/// Light scalar for a face under a shadow caster.
pub const SHADOWED: f32 = 0.5;

/// Scan the column next to `coord` in `dir`'s shadow offset for a caster.
///
/// The scan covers every height strictly above the voxel up to the top of the
/// grid. A column that falls outside the grid gets full light. Voxels without
/// the receive flag, or grids without meta bits, are never shadowed.
pub fn shadow_scalar(grid: &OccupancyGrid, coord: VoxelCoord, dir: FaceDirection) -> f32 {
    let Some(meta) = grid.meta() else {
        return FULL_LIGHT;
    };
    let dims = grid.dims();
    if !meta
        .flags(dims.index_of(coord))
        .contains(VoxelFlags::RECEIVES_SHADOW)
    {
        return FULL_LIGHT;
    }

    let offset = dir.shadow_offset();
    let column = coord.to_ivec3() + IVec3::new(offset.x, 0, offset.y);
    let Some(base) = dims.checked_coord(column) else {
        return FULL_LIGHT;
    };

    for y in (coord.y + 1)..dims.y {
        let index = dims.index_of(VoxelCoord::new(base.x, y, base.z));
        if grid.voxel(index).is_solid() && meta.flags(index).contains(VoxelFlags::CASTS_SHADOW) {
            return SHADOWED;
        }
    }

    FULL_LIGHT
}

/// Final packed color of a face.
#[inline]
pub fn face_color(voxel: PackedVoxel, dir: FaceDirection, shadow: f32) -> PackedVoxel {
    voxel.scale_rgb(dir.shade() * shadow)
}
