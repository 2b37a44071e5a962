//! voxelcast demo host
//!
//! Builds a small procedural scene, extracts its surface mesh, then traces
//! the same voxels through a linearized octree and saves the image.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p voxelcast-demo -- [OPTIONS]
//! ```
//!
//! ## Examples
//!
//! ```bash
//! # Default 32^3 scene to voxelcast.png
//! cargo run --release -p voxelcast-demo
//!
//! # Larger scene, all six face directions, debug logging
//! RUST_LOG=debug cargo run --release -p voxelcast-demo -- --size 128 --all-faces
//! ```

mod config;
mod scene;

use std::time::Instant;

use anyhow::Context;
use glam::Vec3;
use tracing::info;
use tracing_subscriber::EnvFilter;
use voxelcast_core::GridDims;
use voxelcast_mesh::{extract_mesh, MeshBuffers};
use voxelcast_octree::LinearOctree;
use voxelcast_render::{render_octree, save_image, Camera, TraceConfig};

use crate::config::{print_help, DemoConfig};

fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "-h" || arg == "--help") {
        print_help();
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = DemoConfig::from_args();
    let dims = GridDims::cubic(config.size);
    let grid = scene::build(dims);
    info!(
        size = config.size,
        solid = grid.solid_count(),
        "scene built"
    );

    // Mesh extraction
    let buffers = MeshBuffers::for_grid(dims)
        .with_context(|| format!("grid of side {} is too large to mesh", config.size))?;
    let start = Instant::now();
    let stats = extract_mesh(&grid, &buffers, &config.mesh)?;
    info!(
        faces = stats.faces,
        vertices = stats.vertex_count(),
        indices = stats.index_count(),
        capacity = buffers.face_capacity(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "mesh extracted"
    );
    let mesh = buffers.into_mesh();
    debug_assert_eq!(mesh.face_count(), stats.faces as usize);

    // Octree traversal
    let octree = LinearOctree::from_grid(&grid).context("scene cannot be stored as an octree")?;
    let side = config.size as f32;
    let center = Vec3::splat(side * 0.5);
    let camera = Camera::looking_at(center + Vec3::new(0.9, 0.8, -1.3) * side, center)
        .with_viewport(config.width, config.height);

    let start = Instant::now();
    let image = render_octree(
        &octree,
        &camera.uniforms(),
        config.width,
        config.height,
        &TraceConfig::default(),
    );
    info!(
        nodes = octree.nodes().len(),
        width = config.width,
        height = config.height,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "octree traced"
    );

    save_image(&image, &config.output)?;
    Ok(())
}
