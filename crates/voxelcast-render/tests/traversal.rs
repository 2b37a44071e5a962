//! End-to-end traversal behavior over small octrees.

use glam::{UVec2, Vec3};
use voxelcast_core::{Aabb, GridDims, PackedVoxel, Ray, VoxelCoord};
use voxelcast_octree::LinearOctree;
use voxelcast_render::{pick, render_octree, trace_ray, Camera, TraceConfig};

const RED: PackedVoxel = PackedVoxel::from_rgb(255, 0, 0);
const GREEN: PackedVoxel = PackedVoxel::from_rgb(0, 255, 0);
const BLUE: PackedVoxel = PackedVoxel::from_rgb(0, 0, 255);

fn octree_with(side: u32, voxels: &[(VoxelCoord, PackedVoxel)]) -> LinearOctree {
    let mut octree = LinearOctree::new(GridDims::cubic(side)).unwrap();
    for &(coord, color) in voxels {
        octree.insert(coord, color).unwrap();
    }
    octree
}

fn traced_color(octree: &LinearOctree, origin: Vec3, direction: Vec3) -> Option<PackedVoxel> {
    trace_ray(octree, &Ray::new(origin, direction)).map(|hit| hit.color)
}

#[test]
fn centered_voxel_resolves_to_its_color() {
    let color = PackedVoxel::from_rgb(200, 120, 40);
    let octree = octree_with(8, &[(VoxelCoord::new(4, 4, 4), color)]);
    assert_eq!(octree.depth(), 3);

    let camera = Camera::looking_at(Vec3::new(4.5, 4.5, -12.0), Vec3::splat(4.5))
        .with_viewport(9, 9);
    let uniforms = camera.uniforms();
    let size = UVec2::new(9, 9);

    let hit = pick(&octree, &uniforms, UVec2::new(4, 4), size).unwrap();
    assert_eq!(hit.color, color);
    assert_eq!(hit.level, 3);
    assert_eq!(
        octree.bounds(hit.level, hit.node_id),
        Aabb::unit_cube(Vec3::splat(4.0))
    );

    let image = render_octree(&octree, &uniforms, 9, 9, &TraceConfig::default());
    assert_eq!(image.get_pixel(4, 4).0, color.to_rgba8());
    assert_eq!(image.get_pixel(0, 0).0, PackedVoxel::BLACK.to_rgba8());
}

#[test]
fn ray_aimed_away_gets_background() {
    let octree = octree_with(8, &[(VoxelCoord::new(4, 4, 4), RED)]);
    assert_eq!(traced_color(&octree, Vec3::new(4.5, 4.5, -12.0), Vec3::NEG_Z), None);

    let camera = Camera::looking_at(Vec3::new(4.5, 4.5, -12.0), Vec3::new(4.5, 4.5, -30.0))
        .with_viewport(5, 5);
    let background = PackedVoxel::from_rgb(10, 20, 30);
    let image = render_octree(
        &octree,
        &camera.uniforms(),
        5,
        5,
        &TraceConfig::default().with_background(background),
    );
    assert!(image.pixels().all(|p| p.0 == background.to_rgba8()));
}

#[test]
fn nearest_first_across_root_children() {
    // x = 1 sits in octant 0 and x = 6 in octant 1 of the root
    let octree = octree_with(
        8,
        &[(VoxelCoord::new(1, 0, 0), RED), (VoxelCoord::new(6, 0, 0), BLUE)],
    );
    let row = Vec3::new(0.0, 0.5, 0.5);
    assert_eq!(traced_color(&octree, row + Vec3::X * 20.0, Vec3::NEG_X), Some(BLUE));
    assert_eq!(traced_color(&octree, row - Vec3::X * 20.0, Vec3::X), Some(RED));
}

#[test]
fn nearest_first_across_deeper_branches() {
    // All three share root octant 0; they split at levels 2 and 3
    let octree = octree_with(
        8,
        &[
            (VoxelCoord::new(1, 1, 1), RED),
            (VoxelCoord::new(2, 1, 1), GREEN),
            (VoxelCoord::new(3, 1, 1), BLUE),
        ],
    );
    let row = Vec3::new(0.0, 1.5, 1.5);
    assert_eq!(traced_color(&octree, row + Vec3::X * 20.0, Vec3::NEG_X), Some(BLUE));
    assert_eq!(traced_color(&octree, row - Vec3::X * 20.0, Vec3::X), Some(RED));

    // Along z the level-2 split is in a different octant bit
    let octree = octree_with(
        8,
        &[(VoxelCoord::new(1, 1, 1), RED), (VoxelCoord::new(1, 1, 2), GREEN)],
    );
    let column = Vec3::new(1.5, 1.5, 0.0);
    assert_eq!(traced_color(&octree, column + Vec3::Z * 20.0, Vec3::NEG_Z), Some(GREEN));
    assert_eq!(traced_color(&octree, column - Vec3::Z * 20.0, Vec3::Z), Some(RED));
}

#[test]
fn farther_branch_not_taken_when_nearer_leaf_exists() {
    // Diagonal through both corner branches; octant order would visit the
    // low corner first from either side
    let octree = octree_with(
        8,
        &[(VoxelCoord::new(0, 0, 0), RED), (VoxelCoord::new(7, 7, 7), BLUE)],
    );
    let origin = Vec3::splat(12.0);
    let direction = Vec3::splat(-1.0);
    assert_eq!(traced_color(&octree, origin, direction), Some(BLUE));
    assert_eq!(traced_color(&octree, -origin, -direction), Some(RED));
}

/// Small deterministic generator so the scene is reproducible.
struct Lcg(u64);

impl Lcg {
    fn next_f32(&mut self) -> f32 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 40) as f32 / (1u64 << 24) as f32
    }
}

#[test]
fn matches_brute_force_nearest_voxel() {
    let side = 16;
    let mut rng = Lcg(7);
    let mut voxels = Vec::new();
    for index in 0..GridDims::cubic(side).voxel_count() {
        if rng.next_f32() < 0.04 {
            let coord = GridDims::cubic(side).coord_of(index);
            let color = PackedVoxel::from_rgb(
                (index % 251) as u8,
                (index / 251 % 251) as u8,
                (index / 63_001) as u8,
            );
            voxels.push((coord, color));
        }
    }
    let octree = octree_with(side, &voxels);

    for _ in 0..300 {
        let origin = Vec3::new(
            rng.next_f32() * 40.0 - 12.0,
            rng.next_f32() * 40.0 - 12.0,
            -7.3 - rng.next_f32() * 10.0,
        );
        let target = Vec3::new(
            rng.next_f32() * 16.0,
            rng.next_f32() * 16.0,
            rng.next_f32() * 16.0,
        );
        let ray = Ray::new(origin, target - origin);

        let expected = voxels
            .iter()
            .filter_map(|&(coord, color)| {
                Aabb::unit_cube(coord.to_vec3())
                    .intersect_ray(&ray)
                    .map(|t| (t, color))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0));

        let hit = trace_ray(&octree, &ray);
        match (expected, hit) {
            (None, None) => {}
            (Some((t, color)), Some(hit)) => {
                assert_eq!(hit.color, color, "ray {ray:?}");
                assert!((hit.t - t).abs() < 1e-4, "ray {ray:?}");
            }
            (expected, hit) => panic!("ray {ray:?}: expected {expected:?}, got {hit:?}"),
        }
    }
}
