//! Mesh dispatch errors.

use thiserror::Error;
use voxelcast_core::GridDims;

/// Reasons a mesh dispatch is rejected before any invocation runs.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The buffers cannot hold the worst case of this dispatch
    #[error("mesh buffers hold {capacity} faces but the dispatch may need {required}")]
    CapacityExceeded { required: u64, capacity: u32 },

    /// The worst-case vertex count does not fit 32-bit indices
    #[error("grid {dims:?} may emit {faces} faces, more than 32-bit vertex indices can address")]
    GridTooLarge { dims: GridDims, faces: u64 },
}

/// Result type alias for mesh dispatches.
pub type Result<T> = std::result::Result<T, MeshError>;
