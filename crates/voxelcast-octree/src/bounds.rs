//! Node bounding boxes recovered from the node index.

use glam::Vec3;
use voxelcast_core::Aabb;

use crate::node::{octant_of, parent_of, MAX_DEPTH, OCTANT_OFFSETS};

/// Bounding box of node `node_id` sitting on `level` of an octree spanning
/// `[0, extent]`.
///
/// The ancestor chain is rebuilt by walking parents up to the root, then
/// replayed root to leaf, halving the box and shifting its minimum by the
/// octant offset at every step. Level 0 is always the full box. `level` must
/// match the depth of `node_id` and is capped at [`MAX_DEPTH`].
pub fn node_bounds(extent: Vec3, level: u32, node_id: u32) -> Aabb {
    let level = level.min(MAX_DEPTH) as usize;

    // chain[l] is the octant of the ancestor on level l + 1
    let mut chain = [0usize; MAX_DEPTH as usize];
    let mut id = node_id;
    for slot in chain[..level].iter_mut().rev() {
        let Some(parent) = parent_of(id) else {
            break;
        };
        *slot = octant_of(id);
        id = parent;
    }

    let mut min = Vec3::ZERO;
    let mut size = extent;
    for &octant in &chain[..level] {
        size *= 0.5;
        min += OCTANT_OFFSETS[octant] * size;
    }

    Aabb::new(min, min + size)
}
