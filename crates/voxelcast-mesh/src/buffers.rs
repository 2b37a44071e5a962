//! Shared output buffers filled concurrently by the mesh kernel.
//!
//! The vertex and index arrays are preallocated to a fixed face capacity. A
//! single atomic write head, counted in faces, hands out disjoint slot
//! ranges; a range is the only handle that can write, so each invocation
//! writes only the slots it reserved.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicU64, Ordering};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use voxelcast_core::{GridDims, PackedVoxel};

/// Vertices emitted per face.
pub const VERTICES_PER_FACE: usize = 4;
/// Indices emitted per face.
pub const INDICES_PER_FACE: usize = 6;
/// Most faces a single voxel can emit.
pub const MAX_FACES_PER_VOXEL: u64 = 6;
/// Triangle pattern of a quad, relative to its first vertex.
pub const QUAD_INDICES: [u32; INDICES_PER_FACE] = [0, 1, 2, 0, 2, 3];

/// Mesh vertex in grid-local coordinates.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: PackedVoxel,
}

impl Vertex {
    #[inline]
    pub fn new(position: Vec3, color: PackedVoxel) -> Self {
        Self {
            position: position.to_array(),
            color,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Most faces a [`MeshBuffers`] can hold so every vertex stays addressable by
/// a 32-bit index.
pub const MAX_FACE_CAPACITY: u32 = u32::MAX / VERTICES_PER_FACE as u32;

/// Write head value past which new reservations abort the process.
///
/// Each reservation adds at most `u32::MAX`, so the head cannot wrap back
/// into live ranges before some reservation observes the limit.
const WRITE_HEAD_LIMIT: u64 = u64::MAX / 2;

/// Exclusive range of face slots handed out by [`MeshBuffers::reserve_faces`].
///
/// The range is the only way to write into the buffers. Each slot is
/// written at most once, in order, through [`FaceSlots::write_face`].
#[derive(Debug)]
pub struct FaceSlots<'a> {
    buffers: &'a MeshBuffers,
    start: u64,
    next: u64,
    end: u64,
}

impl FaceSlots<'_> {
    /// First reserved slot.
    #[inline]
    pub const fn start(&self) -> u64 {
        self.start
    }

    /// Number of reserved slots.
    #[inline]
    pub const fn count(&self) -> u64 {
        self.end - self.start
    }

    /// One past the last reserved slot.
    #[inline]
    pub const fn end(&self) -> u64 {
        self.end
    }

    /// Slots not yet written.
    #[inline]
    pub const fn remaining(&self) -> u64 {
        self.end - self.next
    }

    /// Write one quad into the next unwritten slot and return that slot.
    ///
    /// Indices are absolute into the vertex array.
    ///
    /// # Panics
    ///
    /// Panics if every reserved slot has been written, or if the slot lies
    /// past the buffer capacity.
    pub fn write_face(&mut self, corners: [Vec3; 4], color: PackedVoxel) -> u32 {
        assert!(
            self.next < self.end,
            "face reservation of {} slots already written",
            self.count()
        );
        let capacity = self.buffers.face_capacity;
        let slot = match u32::try_from(self.next) {
            Ok(slot) if slot < capacity => slot,
            _ => panic!("face slot {} exceeds capacity {capacity}", self.next),
        };
        self.next += 1;

        let base_vertex = slot as usize * VERTICES_PER_FACE;
        let base_index = slot as usize * INDICES_PER_FACE;
        // Capacity is at most MAX_FACE_CAPACITY, so this cannot wrap
        let first_vertex = slot * VERTICES_PER_FACE as u32;

        for (i, corner) in corners.into_iter().enumerate() {
            // SAFETY: `slot` came from this reservation and is written once
            // (see the `Sync` impl); it is below capacity per the check above.
            unsafe {
                *self.buffers.vertices[base_vertex + i].get() = Vertex::new(corner, color);
            }
        }
        for (i, offset) in QUAD_INDICES.into_iter().enumerate() {
            // SAFETY: as above.
            unsafe {
                *self.buffers.indices[base_index + i].get() = first_vertex + offset;
            }
        }
        slot
    }
}

/// Vertex and index arrays with an atomic face counter.
pub struct MeshBuffers {
    vertices: Box<[UnsafeCell<Vertex>]>,
    indices: Box<[UnsafeCell<u32>]>,
    write_head: AtomicU64,
    face_capacity: u32,
}

// SAFETY: Shared access writes slots only through `FaceSlots::write_face`.
// A `FaceSlots` borrows these buffers, is neither `Clone` nor `Copy`, and
// writes each slot of its range once. Ranges come from `fetch_add` on a head
// that never wraps (see `WRITE_HEAD_LIMIT`), so no two threads touch the same
// cell. Reads go through `&mut self` or `self`, which excludes live ranges.
unsafe impl Sync for MeshBuffers {}

impl MeshBuffers {
    /// Preallocate room for `face_capacity` faces.
    ///
    /// # Panics
    ///
    /// Panics if `face_capacity` exceeds [`MAX_FACE_CAPACITY`].
    pub fn with_face_capacity(face_capacity: u32) -> Self {
        assert!(
            face_capacity <= MAX_FACE_CAPACITY,
            "face capacity {face_capacity} exceeds {MAX_FACE_CAPACITY}, vertex indices would wrap"
        );
        let faces = face_capacity as usize;
        Self {
            vertices: (0..faces * VERTICES_PER_FACE)
                .map(|_| UnsafeCell::new(Vertex::default()))
                .collect(),
            indices: (0..faces * INDICES_PER_FACE)
                .map(|_| UnsafeCell::new(0))
                .collect(),
            write_head: AtomicU64::new(0),
            face_capacity,
        }
    }

    /// Preallocate for the worst case of a grid: every voxel emitting six faces.
    ///
    /// Returns `None` if that many faces exceed [`MAX_FACE_CAPACITY`].
    pub fn for_grid(dims: GridDims) -> Option<Self> {
        u32::try_from(Self::worst_case_faces(dims))
            .ok()
            .filter(|&faces| faces <= MAX_FACE_CAPACITY)
            .map(Self::with_face_capacity)
    }

    /// Face count a grid can produce at most.
    #[inline]
    pub const fn worst_case_faces(dims: GridDims) -> u64 {
        dims.voxel_count() as u64 * MAX_FACES_PER_VOXEL
    }

    /// Faces the buffers can hold.
    #[inline]
    pub const fn face_capacity(&self) -> u32 {
        self.face_capacity
    }

    /// Current value of the write head.
    ///
    /// While a dispatch is running this is only a lower bound on the slots
    /// that have been reserved; slots below it may still be mid-write.
    #[inline]
    pub fn face_count(&self) -> u64 {
        self.write_head.load(Ordering::Acquire)
    }

    /// Atomically reserve `count` consecutive face slots.
    #[inline]
    pub fn reserve_faces(&self, count: u32) -> FaceSlots<'_> {
        let start = self.write_head.fetch_add(u64::from(count), Ordering::AcqRel);
        if start > WRITE_HEAD_LIMIT {
            std::process::abort();
        }
        FaceSlots {
            buffers: self,
            start,
            next: start,
            end: start + u64::from(count),
        }
    }

    /// Reset the write head to zero before a new dispatch.
    pub fn reset(&mut self) {
        *self.write_head.get_mut() = 0;
    }

    /// Copy out the written range once all writers are done.
    pub fn to_mesh(&mut self) -> Mesh {
        let faces = (*self.write_head.get_mut()).min(u64::from(self.face_capacity)) as usize;
        Mesh {
            vertices: self.vertices[..faces * VERTICES_PER_FACE]
                .iter_mut()
                .map(|cell| *cell.get_mut())
                .collect(),
            indices: self.indices[..faces * INDICES_PER_FACE]
                .iter_mut()
                .map(|cell| *cell.get_mut())
                .collect(),
        }
    }

    /// Consume the buffers, keeping only the written range.
    pub fn into_mesh(mut self) -> Mesh {
        self.to_mesh()
    }
}

impl std::fmt::Debug for MeshBuffers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshBuffers")
            .field("face_capacity", &self.face_capacity)
            .field("write_head", &self.write_head)
            .finish_non_exhaustive()
    }
}

/// Finished mesh ready for upload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Number of quads in the mesh.
    pub fn face_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_FACE
    }

    /// Returns true if no faces were emitted.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The four vertices of face `slot`.
    pub fn face_vertices(&self, slot: usize) -> &[Vertex] {
        &self.vertices[slot * VERTICES_PER_FACE..(slot + 1) * VERTICES_PER_FACE]
    }

    /// The six indices of face `slot`.
    pub fn face_indices(&self, slot: usize) -> &[u32] {
        &self.indices[slot * INDICES_PER_FACE..(slot + 1) * INDICES_PER_FACE]
    }
}
