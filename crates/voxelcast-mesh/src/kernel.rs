//! Mesh extraction kernel.
//!
//! One invocation runs per voxel of the dispatch grid. Each invocation culls
//! its faces against the neighbors, reserves output space with a single
//! atomic add, and writes its quads into the reserved slots.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use voxelcast_core::{GridDims, OccupancyGrid, VoxelCoord};

use crate::buffers::{MeshBuffers, INDICES_PER_FACE, MAX_FACE_CAPACITY, VERTICES_PER_FACE};
use crate::error::{MeshError, Result};
use crate::faces::{FaceDirection, FaceSet};
use crate::shading::{face_color, shadow_scalar, FULL_LIGHT};

/// Mesh extraction settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshConfig {
    /// Face directions tested per voxel.
    pub faces: FaceSet,
    /// Run the column shadow test for voxels flagged as receivers.
    pub shadows: bool,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            faces: FaceSet::Canonical,
            shadows: true,
        }
    }
}

impl MeshConfig {
    /// Select the face directions to test.
    #[must_use]
    pub const fn with_faces(mut self, faces: FaceSet) -> Self {
        self.faces = faces;
        self
    }

    /// Enable or disable the shadow test.
    #[must_use]
    pub const fn with_shadows(mut self, shadows: bool) -> Self {
        self.shadows = shadows;
        self
    }
}

/// Summary of one extraction dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshStats {
    /// Invocations launched (one per voxel).
    pub voxels: usize,
    /// Faces appended by this dispatch.
    pub faces: u32,
    /// Write head value after the dispatch.
    pub write_head: u64,
}

impl MeshStats {
    pub const fn vertex_count(&self) -> usize {
        self.faces as usize * VERTICES_PER_FACE
    }

    pub const fn index_count(&self) -> usize {
        self.faces as usize * INDICES_PER_FACE
    }
}

/// Returns true if the neighbor of `coord` in `dir` is empty or off the grid.
#[inline]
pub fn is_neighbor_empty(grid: &OccupancyGrid, coord: VoxelCoord, dir: FaceDirection) -> bool {
    !grid.is_solid_at(coord.to_ivec3() + dir.normal())
}

/// Run a single invocation for the voxel at `coord`.
///
/// Returns the number of faces this invocation appended.
pub fn mesh_voxel(
    grid: &OccupancyGrid,
    buffers: &MeshBuffers,
    config: &MeshConfig,
    coord: VoxelCoord,
) -> u32 {
    let voxel = grid.get(coord);
    if voxel.is_empty() {
        return 0;
    }

    let directions = config.faces.directions();
    let mut exposed = [false; 6];
    let mut count = 0;
    for (flag, &dir) in exposed.iter_mut().zip(directions) {
        *flag = is_neighbor_empty(grid, coord, dir);
        count += u32::from(*flag);
    }
    if count == 0 {
        return 0;
    }

    let mut slots = buffers.reserve_faces(count);
    let origin = coord.to_vec3();

    for (&dir, _) in directions.iter().zip(exposed).filter(|(_, flag)| *flag) {
        let shadow = if config.shadows {
            shadow_scalar(grid, coord, dir)
        } else {
            FULL_LIGHT
        };
        let corners = dir.corners().map(|corner| origin + corner);
        slots.write_face(corners, face_color(voxel, dir, shadow));
    }

    debug_assert_eq!(slots.remaining(), 0);
    count
}

/// Dispatch the kernel over every voxel of `grid`, appending to `buffers`.
///
/// The grid's dimensions are the dispatch geometry: one invocation per voxel,
/// each recovering its coordinate from its linear invocation index. Faces are
/// appended after the current write head; call [`MeshBuffers::reset`] first
/// to start from an empty mesh.
pub fn extract_mesh(
    grid: &OccupancyGrid,
    buffers: &MeshBuffers,
    config: &MeshConfig,
) -> Result<MeshStats> {
    let dims: GridDims = grid.dims();
    let head = buffers.face_count();

    let worst_case = MeshBuffers::worst_case_faces(dims);
    let required = head + worst_case;
    if required > u64::from(MAX_FACE_CAPACITY) {
        warn!(?dims, head, "mesh dispatch would overflow 32-bit vertex indices");
        return Err(MeshError::GridTooLarge { dims, faces: required });
    }
    if required > u64::from(buffers.face_capacity()) {
        warn!(
            required,
            capacity = buffers.face_capacity(),
            "mesh buffers too small for dispatch"
        );
        return Err(MeshError::CapacityExceeded {
            required,
            capacity: buffers.face_capacity(),
        });
    }

    let voxels = dims.voxel_count();
    let faces: u32 = (0..voxels)
        .into_par_iter()
        .map(|index| mesh_voxel(grid, buffers, config, dims.coord_of(index)))
        .sum();

    let stats = MeshStats {
        voxels,
        faces,
        write_head: buffers.face_count(),
    };
    debug!(
        voxels,
        faces,
        write_head = stats.write_head,
        "mesh extraction complete"
    );
    Ok(stats)
}
