//! Command line configuration for the demo.

use std::path::PathBuf;

use voxelcast_mesh::{FaceSet, MeshConfig};

/// Demo settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DemoConfig {
    /// Grid side length; must be a power of two for the octree.
    pub size: u32,
    /// Traced image width in pixels.
    pub width: u32,
    /// Traced image height in pixels.
    pub height: u32,
    /// Where the traced image is written.
    pub output: PathBuf,
    /// Mesh extraction settings.
    pub mesh: MeshConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            size: 32,
            width: 640,
            height: 360,
            output: PathBuf::from("voxelcast.png"),
            mesh: MeshConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Parse from command line arguments.
    pub fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self::parse_args(&args)
    }

    /// Parse from a slice of arguments.
    ///
    /// Unknown flags and unparsable values are ignored.
    pub fn parse_args(args: &[String]) -> Self {
        let mut config = Self::default();

        let mut i = 1;
        while i < args.len() {
            let value = args.get(i + 1);
            match args[i].as_str() {
                "-s" | "--size" => {
                    if let Some(size) = value.and_then(|v| v.parse().ok()) {
                        config.size = size;
                    }
                    i += 1;
                }
                "-W" | "--width" => {
                    if let Some(width) = value.and_then(|v| v.parse().ok()) {
                        config.width = width;
                    }
                    i += 1;
                }
                "-H" | "--height" => {
                    if let Some(height) = value.and_then(|v| v.parse().ok()) {
                        config.height = height;
                    }
                    i += 1;
                }
                "-o" | "--output" => {
                    if let Some(path) = value {
                        config.output = PathBuf::from(path);
                    }
                    i += 1;
                }
                "--all-faces" => {
                    config.mesh = config.mesh.with_faces(FaceSet::All);
                }
                "--no-shadows" => {
                    config.mesh = config.mesh.with_shadows(false);
                }
                _ => {}
            }
            i += 1;
        }

        config
    }
}

pub fn print_help() {
    eprintln!(
        "voxelcast demo: mesh extraction and octree ray traversal

USAGE:
    cargo run -p voxelcast-demo -- [OPTIONS]

SCENE OPTIONS:
    -s, --size <N>          Grid side length, a power of two up to 512 (default: 32)

MESH OPTIONS:
    --all-faces             Test all six face directions instead of front/left/right/top
    --no-shadows            Skip the column shadow test

TRACE OPTIONS:
    -W, --width <N>         Image width in pixels (default: 640)
    -H, --height <N>        Image height in pixels (default: 360)
    -o, --output <PATH>     Output image path (default: voxelcast.png)

OTHER:
    -h, --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG                Set log level (e.g., info, debug, trace)"
    );
}
