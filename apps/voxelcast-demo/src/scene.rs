//! Procedural demo scene.

use voxelcast_core::{GridDims, OccupancyGrid, PackedVoxel, VoxelCoord, VoxelFlags};

const GRASS: PackedVoxel = PackedVoxel::from_rgb(96, 168, 72);
const DIRT: PackedVoxel = PackedVoxel::from_rgb(134, 96, 67);
const STONE: PackedVoxel = PackedVoxel::from_rgb(128, 128, 136);
const CANOPY: PackedVoxel = PackedVoxel::from_rgb(220, 220, 230);

/// Rolling terrain under a floating canopy.
///
/// Terrain voxels receive shadows; the canopy casts them.
pub fn build(dims: GridDims) -> OccupancyGrid {
    let mut grid = OccupancyGrid::new(dims).with_empty_meta();
    let max_height = (dims.y / 2).max(1);

    for z in 0..dims.z {
        for x in 0..dims.x {
            let wave = ((x as f32 * 0.35).sin() + (z as f32 * 0.25).cos() + 2.0) * 0.25;
            let height = 1 + (wave * max_height as f32) as u32;
            for y in 0..height.min(dims.y) {
                let color = match height - y {
                    1 => GRASS,
                    2 | 3 => DIRT,
                    _ => STONE,
                };
                let coord = VoxelCoord::new(x, y, z);
                grid.set(coord, color);
                grid.set_flags(coord, VoxelFlags::RECEIVES_SHADOW);
            }
        }
    }

    // Canopy over the middle of the grid, near the top
    let quarter_x = dims.x / 4;
    let quarter_z = dims.z / 4;
    let canopy_y = dims.y.saturating_sub(2);
    for z in quarter_z..dims.z - quarter_z {
        for x in quarter_x..dims.x - quarter_x {
            let coord = VoxelCoord::new(x, canopy_y, z);
            grid.set(coord, CANOPY);
            grid.set_flags(coord, VoxelFlags::CASTS_SHADOW);
        }
    }

    grid
}
