//! Octree ray traversal.
//!
//! Each pixel walks the octree depth first with an explicit stack. Children
//! the ray touches are sorted by entry distance and pushed farthest first, so
//! the nearest child is always popped next and the first final node reached
//! is the closest hit.

use glam::{UVec2, Vec2, Vec3};
use image::RgbaImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;
use voxelcast_core::{PackedVoxel, Ray};
use voxelcast_octree::{child_id, node_bounds, LinearOctree, MAX_DEPTH, ROOT};

use crate::camera::CameraUniforms;

/// Pending nodes the stack can hold: seven deferred siblings per level plus
/// the eight children of the deepest expanded node.
pub const STACK_CAPACITY: usize = 7 * MAX_DEPTH as usize + 1;

/// A node waiting to be visited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StackEntry {
    pub node_id: u32,
    pub level: u32,
}

impl StackEntry {
    #[inline]
    pub const fn new(node_id: u32, level: u32) -> Self {
        Self { node_id, level }
    }
}

/// Fixed-capacity LIFO of pending nodes.
#[derive(Clone, Debug)]
pub struct TraversalStack {
    entries: [StackEntry; STACK_CAPACITY],
    len: usize,
}

impl Default for TraversalStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TraversalStack {
    pub const fn new() -> Self {
        Self {
            entries: [StackEntry::new(ROOT, 0); STACK_CAPACITY],
            len: 0,
        }
    }

    /// Push an entry. Panics if the stack is full.
    #[inline]
    pub fn push(&mut self, entry: StackEntry) {
        self.entries[self.len] = entry;
        self.len += 1;
    }

    #[inline]
    pub fn pop(&mut self) -> Option<StackEntry> {
        self.len = self.len.checked_sub(1)?;
        Some(self.entries[self.len])
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// The closest final node along a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceHit {
    pub node_id: u32,
    pub level: u32,
    /// Entry distance along the ray.
    pub t: f32,
    pub color: PackedVoxel,
}

impl TraceHit {
    /// World-space entry point.
    pub fn position(&self, ray: &Ray) -> Vec3 {
        ray.at(self.t)
    }
}

/// Settings for the image dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Color written where no final node is hit.
    pub background: PackedVoxel,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            background: PackedVoxel::BLACK,
        }
    }
}

impl TraceConfig {
    #[must_use]
    pub const fn with_background(mut self, background: PackedVoxel) -> Self {
        self.background = background;
        self
    }
}

/// World-space ray through the center of `pixel` on a `size` surface.
///
/// The far-plane point under the inverse view-projection gives the direction
/// from the camera position. Pixel rows run top to bottom.
pub fn primary_ray(camera: &CameraUniforms, pixel: UVec2, size: UVec2) -> Ray {
    let uv = (pixel.as_vec2() + 0.5) / size.as_vec2();
    let ndc = Vec2::new(uv.x * 2.0 - 1.0, 1.0 - uv.y * 2.0);
    let far = camera
        .inverse_view_projection()
        .project_point3(ndc.extend(1.0));
    let origin = camera.position();
    Ray::new(origin, far - origin)
}

/// Find the nearest final node hit by `ray`.
pub fn trace_ray(octree: &LinearOctree, ray: &Ray) -> Option<TraceHit> {
    let extent = octree.extent();
    let mut stack = TraversalStack::new();
    stack.push(StackEntry::new(ROOT, 0));

    while let Some(entry) = stack.pop() {
        let Some(t) = node_bounds(extent, entry.level, entry.node_id).intersect_ray(ray) else {
            continue;
        };
        let Some(node) = octree.node(entry.node_id) else {
            continue;
        };

        if octree.is_final_level(entry.level) {
            return Some(TraceHit {
                node_id: entry.node_id,
                level: entry.level,
                t,
                color: node.color,
            });
        }

        let child_level = entry.level + 1;
        let mut hits = [(0.0_f32, 0_u32); 8];
        let mut count = 0;
        for octant in (0..8).filter(|&octant| node.has_child(octant)) {
            let child = child_id(entry.node_id, octant);
            if let Some(t) = node_bounds(extent, child_level, child).intersect_ray(ray) {
                hits[count] = (t, child);
                count += 1;
            }
        }

        let hits = &mut hits[..count];
        hits.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));
        for &(_, child) in hits.iter().rev() {
            stack.push(StackEntry::new(child, child_level));
        }
    }

    None
}

/// Trace the pixel at `pixel`, for picking.
pub fn pick(
    octree: &LinearOctree,
    camera: &CameraUniforms,
    pixel: UVec2,
    size: UVec2,
) -> Option<TraceHit> {
    trace_ray(octree, &primary_ray(camera, pixel, size))
}

/// Dispatch one traversal per pixel and collect the output image.
pub fn render_octree(
    octree: &LinearOctree,
    camera: &CameraUniforms,
    width: u32,
    height: u32,
    config: &TraceConfig,
) -> RgbaImage {
    let mut image = RgbaImage::new(width, height);
    let size = UVec2::new(width, height);
    let row = width as usize;

    let hits = image
        .par_chunks_exact_mut(4)
        .enumerate()
        .map(|(index, pixel)| {
            let coord = UVec2::new((index % row) as u32, (index / row) as u32);
            let hit = pick(octree, camera, coord, size);
            let color = hit.map_or(config.background, |hit| hit.color);
            pixel.copy_from_slice(&color.to_rgba8());
            usize::from(hit.is_some())
        })
        .sum::<usize>();

    debug!(
        pixels = row * height as usize,
        hits,
        "octree trace complete"
    );
    image
}
