//! Ray traversal of voxelcast octrees.
//!
//! Renders a [`LinearOctree`](voxelcast_octree::LinearOctree) by tracing one
//! primary ray per pixel across the rayon pool. Each ray descends the tree
//! nearest child first and stops at the first final node it reaches.

pub mod camera;
pub mod screenshot;
pub mod trace;

pub use camera::{Camera, CameraUniforms};
pub use screenshot::{save_image, ScreenshotError};
pub use trace::{
    pick, primary_ray, render_octree, trace_ray, StackEntry, TraceConfig, TraceHit,
    TraversalStack, STACK_CAPACITY,
};
