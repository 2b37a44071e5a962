//! Core voxel types.

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};
use glam::Vec4;
use serde::{Deserialize, Serialize};

/// A voxel value packed into 32 bits.
///
/// The low 24 bits hold the color (red in the lowest byte, then green, then
/// blue) and the top byte holds occupancy/alpha. A voxel is solid iff the top
/// byte is nonzero.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct PackedVoxel(pub u32);

impl PackedVoxel {
    /// Empty voxel (air)
    pub const EMPTY: Self = Self(0);
    /// Opaque black
    pub const BLACK: Self = Self::from_rgba(0, 0, 0, 255);
    /// Opaque white
    pub const WHITE: Self = Self::from_rgba(255, 255, 255, 255);

    const COLOR_MASK: u32 = 0x00FF_FFFF;
    const ALPHA_SHIFT: u32 = 24;

    /// Pack four 8-bit channels
    #[inline]
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self((r as u32) | ((g as u32) << 8) | ((b as u32) << 16) | ((a as u32) << 24))
    }

    /// Pack an opaque color
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba(r, g, b, 255)
    }

    /// Returns true if the occupancy byte is nonzero
    #[inline]
    pub const fn is_solid(self) -> bool {
        (self.0 >> Self::ALPHA_SHIFT) != 0
    }

    /// Returns true if this voxel is empty
    #[inline]
    pub const fn is_empty(self) -> bool {
        !self.is_solid()
    }

    /// The 24-bit color without the occupancy byte
    #[inline]
    pub const fn rgb(self) -> u32 {
        self.0 & Self::COLOR_MASK
    }

    /// The occupancy/alpha byte
    #[inline]
    pub const fn alpha(self) -> u8 {
        (self.0 >> Self::ALPHA_SHIFT) as u8
    }

    /// Unpack to `[r, g, b, a]` bytes
    #[inline]
    pub const fn to_rgba8(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// Unpack to four normalized channels
    #[inline]
    pub fn to_vec4(self) -> Vec4 {
        let [r, g, b, a] = self.to_rgba8();
        Vec4::new(f32::from(r), f32::from(g), f32::from(b), f32::from(a)) / 255.0
    }

    /// Repack four normalized channels, clamping to `[0, 1]`
    #[inline]
    pub fn from_vec4(color: Vec4) -> Self {
        let c = (color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
        Self::from_rgba(c.x as u8, c.y as u8, c.z as u8, c.w as u8)
    }

    /// Multiply the color channels by `scalar`, leaving occupancy untouched
    #[must_use]
    pub fn scale_rgb(self, scalar: f32) -> Self {
        let mut color = self.to_vec4();
        color.x *= scalar;
        color.y *= scalar;
        color.z *= scalar;
        Self::from_vec4(color)
    }
}

bitflags! {
    /// Per-voxel shadow flags stored in the meta bits buffer.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct VoxelFlags: u8 {
        /// Solid voxels with this flag darken faces below them.
        const CASTS_SHADOW = 0b01;
        /// Faces of voxels with this flag run the shadow test.
        const RECEIVES_SHADOW = 0b10;
    }
}
