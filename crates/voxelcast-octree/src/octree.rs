//! Linearized octree: a header followed by a flat node array.

use glam::Vec3;
use tracing::{debug, warn};
use voxelcast_core::{Aabb, Error, GridDims, OccupancyGrid, PackedVoxel, Result, VoxelCoord};

use crate::bounds::node_bounds;
use crate::node::{child_id, OctreeHeader, OctreeNode, MAX_DEPTH, ROOT};

/// Octree over a cubic power-of-two grid, stored as one contiguous array.
///
/// Node indices beyond the stored array are treated as empty, so a sparse
/// tree only needs to store nodes up to the highest index it touches.
#[derive(Clone, Debug)]
pub struct LinearOctree {
    header: OctreeHeader,
    nodes: Vec<OctreeNode>,
}

impl LinearOctree {
    /// Create an octree holding only an empty root.
    pub fn new(dims: GridDims) -> Result<Self> {
        let header = OctreeHeader::new(dims);
        validate_header(&header)?;
        Ok(Self {
            header,
            nodes: vec![OctreeNode::EMPTY],
        })
    }

    /// Wrap a host-provided header and node buffer.
    pub fn from_parts(header: OctreeHeader, nodes: Vec<OctreeNode>) -> Result<Self> {
        validate_header(&header)?;
        if nodes.is_empty() {
            return Err(Error::InvalidData("octree node buffer has no root".into()));
        }
        Ok(Self { header, nodes })
    }

    /// Build the tree from every solid voxel of a grid.
    pub fn from_grid(grid: &OccupancyGrid) -> Result<Self> {
        let dims = grid.dims();
        let mut octree = Self::new(dims)?;
        let mut leaves = 0usize;
        for (index, &voxel) in grid.voxels().iter().enumerate() {
            if voxel.is_solid() {
                octree.insert(dims.coord_of(index), voxel)?;
                leaves += 1;
            }
        }
        debug!(
            side = dims.x,
            depth = octree.depth(),
            leaves,
            nodes = octree.nodes.len(),
            "octree filled from grid"
        );
        Ok(octree)
    }

    pub const fn header(&self) -> &OctreeHeader {
        &self.header
    }

    pub const fn dims(&self) -> GridDims {
        self.header.grid_dims()
    }

    /// Side length of the cubic grid.
    pub const fn side(&self) -> u32 {
        self.header.dims[0]
    }

    /// Extent of the root box.
    pub fn extent(&self) -> Vec3 {
        self.dims().to_vec3()
    }

    /// Number of levels below the root.
    pub const fn depth(&self) -> u32 {
        self.side().trailing_zeros()
    }

    /// Returns true if nodes on `level` are unit voxels.
    #[inline]
    pub const fn is_final_level(&self, level: u32) -> bool {
        level <= MAX_DEPTH && (1u32 << level) == self.side()
    }

    /// Node at `node_id`, or `None` past the end of the array.
    #[inline]
    pub fn node(&self, node_id: u32) -> Option<&OctreeNode> {
        self.nodes.get(node_id as usize)
    }

    pub fn nodes(&self) -> &[OctreeNode] {
        &self.nodes
    }

    /// Bounding box of a node.
    #[inline]
    pub fn bounds(&self, level: u32, node_id: u32) -> Aabb {
        node_bounds(self.extent(), level, node_id)
    }

    /// Node array as raw bytes for upload.
    pub fn node_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.nodes)
    }

    /// Mark the path to `coord` and store `color` at its leaf.
    ///
    /// Every ancestor gets the presence bit of the octant leading toward the
    /// voxel. Empty colors are ignored; nothing is ever removed.
    pub fn insert(&mut self, coord: VoxelCoord, color: PackedVoxel) -> Result<()> {
        let dims = self.dims();
        if !dims.contains(coord.to_ivec3()) {
            warn!(?coord, ?dims, "octree insert outside grid");
            return Err(Error::OutOfBounds(format!(
                "voxel {coord:?} outside octree of side {}",
                self.side()
            )));
        }
        if color.is_empty() {
            return Ok(());
        }

        let mut id = ROOT;
        for level in 0..self.depth() {
            let half = self.side() >> (level + 1);
            let octant = usize::from(coord.x & half != 0)
                | usize::from(coord.y & half != 0) << 1
                | usize::from(coord.z & half != 0) << 2;
            self.node_mut(id).child_mask |= 1 << octant;
            id = child_id(id, octant);
        }
        self.node_mut(id).color = color;
        Ok(())
    }

    fn node_mut(&mut self, node_id: u32) -> &mut OctreeNode {
        let index = node_id as usize;
        if index >= self.nodes.len() {
            self.nodes.resize(index + 1, OctreeNode::EMPTY);
        }
        &mut self.nodes[index]
    }
}

fn validate_header(header: &OctreeHeader) -> Result<()> {
    let dims = header.grid_dims();
    if !dims.is_cubic_power_of_two() {
        return Err(Error::InvalidData(format!(
            "octree grid must be a power-of-two cube, got {}x{}x{}",
            dims.x, dims.y, dims.z
        )));
    }
    let depth = dims.x.trailing_zeros();
    if depth > MAX_DEPTH {
        return Err(Error::InvalidData(format!(
            "octree depth {depth} exceeds the maximum of {MAX_DEPTH}"
        )));
    }
    Ok(())
}
