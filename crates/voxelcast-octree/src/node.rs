//! Octree node layout and implicit index arithmetic.
//!
//! Nodes live in one flat array. Node 0 is the root; the children of node
//! `n` occupy `8n + 1 ..= 8n + 8`, so parent and octant are computed from the
//! index and never stored.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use voxelcast_core::{GridDims, PackedVoxel};

/// Index of the root node.
pub const ROOT: u32 = 0;

/// Deepest supported level (a 512^3 grid).
pub const MAX_DEPTH: u32 = 9;

/// Box-minimum offset of each octant in units of the child extent.
///
/// Octant bit 0 selects high x, bit 1 high y, bit 2 high z.
pub const OCTANT_OFFSETS: [Vec3; 8] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(1.0, 0.0, 1.0),
    Vec3::new(0.0, 1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
];

/// A single octree node as stored in the node buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct OctreeNode {
    /// Color used when the node is final.
    pub color: PackedVoxel,
    /// Bit `i` set means octant `i` has a child worth descending into.
    pub child_mask: u8,
    _pad: [u8; 3],
}

impl OctreeNode {
    /// Node with no children and no color.
    pub const EMPTY: Self = Self::new(PackedVoxel::EMPTY, 0);

    #[inline]
    pub const fn new(color: PackedVoxel, child_mask: u8) -> Self {
        Self {
            color,
            child_mask,
            _pad: [0; 3],
        }
    }

    /// Check if a child octant is present.
    #[inline]
    pub const fn has_child(&self, octant: usize) -> bool {
        (self.child_mask & (1 << octant)) != 0
    }

    /// Number of present children.
    #[inline]
    pub const fn child_count(&self) -> u32 {
        self.child_mask.count_ones()
    }
}

/// Buffer header preceding the node array.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct OctreeHeader {
    /// Grid extent per axis.
    pub dims: [u32; 3],
}

impl OctreeHeader {
    #[inline]
    pub const fn new(dims: GridDims) -> Self {
        Self {
            dims: [dims.x, dims.y, dims.z],
        }
    }

    #[inline]
    pub const fn grid_dims(&self) -> GridDims {
        GridDims::new(self.dims[0], self.dims[1], self.dims[2])
    }
}

/// Parent of a node, or `None` for the root.
#[inline]
pub const fn parent_of(node_id: u32) -> Option<u32> {
    match node_id {
        ROOT => None,
        id => Some((id - 1) / 8),
    }
}

/// Octant of a non-root node among its siblings.
#[inline]
pub const fn octant_of(node_id: u32) -> usize {
    let parent = (node_id - 1) / 8;
    (node_id - (8 * parent + 1)) as usize
}

/// Index of child `octant` of `parent`.
#[inline]
pub const fn child_id(parent: u32, octant: usize) -> u32 {
    8 * parent + 1 + octant as u32
}

/// Index of the first node on `level`.
#[inline]
pub const fn level_start(level: u32) -> u32 {
    (8u32.pow(level) - 1) / 7
}
