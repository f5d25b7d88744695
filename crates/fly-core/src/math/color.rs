// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the `LinearRgba` color type.

use crate::math::vector::Vec4;
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// A color in linear RGBA space with `f32` components.
///
/// Linear space is what lighting math expects. Components above `1.0` are
/// allowed for HDR values. `#[repr(C)]` keeps the layout stable for vertex
/// streams and shader constants.
#[derive(
    Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct LinearRgba {
    /// The red component in linear space.
    pub r: f32,
    /// The green component in linear space.
    pub g: f32,
    /// The blue component in linear space.
    pub b: f32,
    /// The alpha (opacity) component.
    pub a: f32,
}

impl LinearRgba {
    /// Opaque red.
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    /// Opaque yellow.
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
    /// Opaque magenta. Used as the "missing material" color.
    pub const MAGENTA: Self = Self::rgb(1.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a new `LinearRgba` with explicit RGBA values.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a new opaque `LinearRgba` (alpha = 1.0).
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Packs the color into a `0xAABBGGRR` word, the layout used by
    /// immediate-mode vertex colors.
    pub fn to_packed_abgr(&self) -> u32 {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u32;
        (q(self.a) << 24) | (q(self.b) << 16) | (q(self.g) << 8) | q(self.r)
    }
}

impl Default for LinearRgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<LinearRgba> for Vec4 {
    #[inline]
    fn from(c: LinearRgba) -> Self {
        Vec4::new(c.r, c.g, c.b, c.a)
    }
}

impl Mul<f32> for LinearRgba {
    type Output = Self;
    /// Scales the color channels, leaving alpha untouched.
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs, self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_abgr_layout() {
        assert_eq!(LinearRgba::RED.to_packed_abgr(), 0xFF00_00FF);
        assert_eq!(LinearRgba::BLUE.to_packed_abgr(), 0xFFFF_0000);
        assert_eq!(LinearRgba::TRANSPARENT.to_packed_abgr(), 0);
    }

    #[test]
    fn scaling_keeps_alpha() {
        let c = LinearRgba::new(0.5, 0.5, 0.5, 0.25) * 2.0;
        assert_eq!(c, LinearRgba::new(1.0, 1.0, 1.0, 0.25));
    }
}
