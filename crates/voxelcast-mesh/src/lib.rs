//! Face-culling mesh extraction for voxelcast.
//!
//! Runs one invocation per voxel of an [`OccupancyGrid`](voxelcast_core::OccupancyGrid)
//! across the rayon pool. Invocations append quads to shared [`MeshBuffers`]
//! through a single atomic write head, so the output order is unspecified
//! but every face lands in exactly one slot.

pub mod buffers;
pub mod error;
pub mod faces;
pub mod kernel;
pub mod shading;

pub use buffers::{FaceSlots, Mesh, MeshBuffers, Vertex, MAX_FACE_CAPACITY};
pub use error::{MeshError, Result};
pub use faces::{FaceDirection, FaceSet};
pub use kernel::{extract_mesh, is_neighbor_empty, mesh_voxel, MeshConfig, MeshStats};
pub use shading::{face_color, shadow_scalar};
