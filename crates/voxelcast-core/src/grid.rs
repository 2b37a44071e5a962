//! Dense occupancy grid and its companion meta bits buffer.
//!
//! Both buffers are flat arrays indexed by [`GridDims::index_of`]. They are
//! filled by the host and only read by the kernels.

use glam::IVec3;

use crate::constants::{META_SLOT_BITS, META_SLOT_MASK, VOXELS_PER_META_WORD};
use crate::coords::{GridDims, VoxelCoord};
use crate::error::{Error, Result};
use crate::types::{PackedVoxel, VoxelFlags};

/// Shadow flags for every voxel, four voxels packed per 32-bit word.
///
/// A voxel's flags live in word `index / 4`, slot `index % 4`; each slot is
/// eight bits wide with only the low two used.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetaBits {
    words: Vec<u32>,
}

impl MetaBits {
    /// Create a buffer with all flags cleared, sized for `voxel_count` voxels.
    pub fn new(voxel_count: usize) -> Self {
        Self {
            words: vec![0; voxel_count.div_ceil(VOXELS_PER_META_WORD)],
        }
    }

    /// Wrap a host-provided word buffer.
    pub fn from_words(words: Vec<u32>) -> Self {
        Self { words }
    }

    /// Raw word storage.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Number of voxels this buffer can describe.
    pub fn capacity(&self) -> usize {
        self.words.len() * VOXELS_PER_META_WORD
    }

    #[inline]
    const fn slot(index: usize) -> (usize, u32) {
        (
            index / VOXELS_PER_META_WORD,
            (index % VOXELS_PER_META_WORD) as u32 * META_SLOT_BITS,
        )
    }

    /// Flags of the voxel at linear `index`.
    #[inline]
    pub fn flags(&self, index: usize) -> VoxelFlags {
        let (word, shift) = Self::slot(index);
        VoxelFlags::from_bits_truncate(((self.words[word] >> shift) & META_SLOT_MASK) as u8)
    }

    /// Replace the flags of the voxel at linear `index`.
    pub fn set_flags(&mut self, index: usize, flags: VoxelFlags) {
        let (word, shift) = Self::slot(index);
        let cleared = self.words[word] & !(META_SLOT_MASK << shift);
        self.words[word] = cleared | (u32::from(flags.bits()) << shift);
    }
}

/// Dense voxel grid of packed color+occupancy values.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    dims: GridDims,
    voxels: Vec<PackedVoxel>,
    meta: Option<MetaBits>,
}

impl OccupancyGrid {
    /// Create an empty grid.
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims,
            voxels: vec![PackedVoxel::EMPTY; dims.voxel_count()],
            meta: None,
        }
    }

    /// Wrap a host-provided voxel buffer laid out row-major for `dims`.
    pub fn from_voxels(dims: GridDims, voxels: Vec<PackedVoxel>) -> Result<Self> {
        if voxels.len() != dims.voxel_count() {
            return Err(Error::InvalidData(format!(
                "voxel buffer holds {} values, grid {}x{}x{} needs {}",
                voxels.len(),
                dims.x,
                dims.y,
                dims.z,
                dims.voxel_count()
            )));
        }
        Ok(Self {
            dims,
            voxels,
            meta: None,
        })
    }

    /// Attach a meta bits buffer, enabling the shadow test.
    pub fn with_meta(mut self, meta: MetaBits) -> Result<Self> {
        if meta.capacity() < self.dims.voxel_count() {
            return Err(Error::InvalidData(format!(
                "meta buffer covers {} voxels, grid has {}",
                meta.capacity(),
                self.dims.voxel_count()
            )));
        }
        self.meta = Some(meta);
        Ok(self)
    }

    /// Attach a cleared meta bits buffer sized for this grid.
    #[must_use]
    pub fn with_empty_meta(mut self) -> Self {
        self.meta = Some(MetaBits::new(self.dims.voxel_count()));
        self
    }

    /// Grid dimensions.
    #[inline]
    pub const fn dims(&self) -> GridDims {
        self.dims
    }

    /// Raw voxel storage.
    pub fn voxels(&self) -> &[PackedVoxel] {
        &self.voxels
    }

    /// Meta bits, if attached.
    pub const fn meta(&self) -> Option<&MetaBits> {
        self.meta.as_ref()
    }

    /// Voxel at linear `index`.
    #[inline]
    pub fn voxel(&self, index: usize) -> PackedVoxel {
        self.voxels[index]
    }

    /// Voxel at `coord`.
    #[inline]
    pub fn get(&self, coord: VoxelCoord) -> PackedVoxel {
        self.voxels[self.dims.index_of(coord)]
    }

    /// Solidity at a signed position; anything outside the grid is empty.
    #[inline]
    pub fn is_solid_at(&self, pos: IVec3) -> bool {
        self.dims
            .checked_coord(pos)
            .is_some_and(|coord| self.get(coord).is_solid())
    }

    /// Write a voxel.
    pub fn set(&mut self, coord: VoxelCoord, voxel: PackedVoxel) {
        let index = self.dims.index_of(coord);
        self.voxels[index] = voxel;
    }

    /// Flags at `coord`; empty when no meta buffer is attached.
    pub fn flags(&self, coord: VoxelCoord) -> VoxelFlags {
        self.meta
            .as_ref()
            .map_or(VoxelFlags::empty(), |meta| meta.flags(self.dims.index_of(coord)))
    }

    /// Write flags at `coord`, attaching a cleared meta buffer if needed.
    pub fn set_flags(&mut self, coord: VoxelCoord, flags: VoxelFlags) {
        let index = self.dims.index_of(coord);
        let count = self.dims.voxel_count();
        self.meta
            .get_or_insert_with(|| MetaBits::new(count))
            .set_flags(index, flags);
    }

    /// Fill an axis-aligned region `[min, max)` with a voxel value.
    pub fn fill(&mut self, min: VoxelCoord, max: VoxelCoord, voxel: PackedVoxel) {
        for y in min.y..max.y.min(self.dims.y) {
            for z in min.z..max.z.min(self.dims.z) {
                for x in min.x..max.x.min(self.dims.x) {
                    self.set(VoxelCoord::new(x, y, z), voxel);
                }
            }
        }
    }

    /// Number of solid voxels.
    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|v| v.is_solid()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_slot_addressing() {
        let mut meta = MetaBits::new(8);
        assert_eq!(meta.words().len(), 2);

        meta.set_flags(5, VoxelFlags::CASTS_SHADOW | VoxelFlags::RECEIVES_SHADOW);
        // Voxel 5 is word 1, slot 1
        assert_eq!(meta.words()[1], 0b11 << 8);
        assert_eq!(meta.words()[0], 0);
        assert_eq!(meta.flags(5), VoxelFlags::all());
        assert_eq!(meta.flags(4), VoxelFlags::empty());

        meta.set_flags(5, VoxelFlags::RECEIVES_SHADOW);
        assert_eq!(meta.flags(5), VoxelFlags::RECEIVES_SHADOW);
    }

    #[test]
    fn meta_from_host_words() {
        // casts in slot 0, receives in slot 3
        let meta = MetaBits::from_words(vec![0b01 | (0b10 << 24)]);
        assert_eq!(meta.flags(0), VoxelFlags::CASTS_SHADOW);
        assert_eq!(meta.flags(1), VoxelFlags::empty());
        assert_eq!(meta.flags(3), VoxelFlags::RECEIVES_SHADOW);
    }

    #[test]
    fn from_voxels_checks_length() {
        let dims = GridDims::new(2, 2, 2);
        assert!(OccupancyGrid::from_voxels(dims, vec![PackedVoxel::EMPTY; 7]).is_err());
        assert!(OccupancyGrid::from_voxels(dims, vec![PackedVoxel::EMPTY; 8]).is_ok());
    }

    #[test]
    fn short_meta_rejected() {
        let grid = OccupancyGrid::new(GridDims::cubic(4));
        assert!(grid.clone().with_meta(MetaBits::new(10)).is_err());
        assert!(grid.with_meta(MetaBits::new(64)).is_ok());
    }

    #[test]
    fn outside_is_empty() {
        let mut grid = OccupancyGrid::new(GridDims::cubic(2));
        grid.fill(
            VoxelCoord::new(0, 0, 0),
            VoxelCoord::new(2, 2, 2),
            PackedVoxel::WHITE,
        );
        assert_eq!(grid.solid_count(), 8);
        assert!(grid.is_solid_at(IVec3::new(1, 1, 1)));
        assert!(!grid.is_solid_at(IVec3::new(-1, 0, 0)));
        assert!(!grid.is_solid_at(IVec3::new(0, 2, 0)));
    }
}
