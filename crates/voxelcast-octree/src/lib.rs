//! Linearized 8-ary voxel octree for voxelcast.
//!
//! Nodes are stored in a single array with parent/child relations computed
//! from the index. Node bounds are rebuilt from the index on demand, so nodes
//! carry only a color and a child-presence mask.

pub mod bounds;
pub mod node;
pub mod octree;

pub use bounds::node_bounds;
pub use node::{
    child_id, level_start, octant_of, parent_of, OctreeHeader, OctreeNode, MAX_DEPTH,
    OCTANT_OFFSETS, ROOT,
};
pub use octree::LinearOctree;
