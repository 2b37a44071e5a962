//! Core types, math, and grid storage for voxelcast.
//!
//! This crate provides the data model shared by the meshing and ray
//! traversal pipelines:
//! - Grid dimensions and row-major voxel coordinates
//! - Packed RGBA voxel values and per-voxel shadow flags
//! - The occupancy grid and its optional meta bits buffer
//! - Rays, bounding boxes and the slab intersection test

pub mod coords;
pub mod error;
pub mod grid;
pub mod math;
pub mod types;

pub use coords::{GridDims, VoxelCoord};
pub use error::{Error, Result};
pub use grid::{MetaBits, OccupancyGrid};
pub use math::{Aabb, Ray};
pub use types::{PackedVoxel, VoxelFlags};

/// Engine-wide constants
pub mod constants {
    /// Voxels whose flags share one 32-bit meta word
    pub const VOXELS_PER_META_WORD: usize = 4;
    /// Bit stride of one voxel slot inside a meta word
    pub const META_SLOT_BITS: u32 = 8;
    /// Mask of the flag bits actually used inside a slot
    pub const META_SLOT_MASK: u32 = 0b11;
}
