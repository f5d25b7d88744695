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

use fly_core::math::{LinearRgba, Vec3, EPSILON};

/// A colored line segment, drawn for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineBatch {
    /// Start point in world space.
    pub start: Vec3,
    /// End point in world space.
    pub end: Vec3,
    /// Line color.
    pub color: LinearRgba,
    /// Width in world units. Lines at or below the renderer's threshold are
    /// drawn as hairlines.
    pub thickness: f32,
}

impl LineBatch {
    /// A hairline from `start` to `end`.
    pub fn new(start: Vec3, end: Vec3, color: LinearRgba) -> Self {
        Self {
            start,
            end,
            color,
            thickness: 0.0,
        }
    }

    /// Sets the width of the line.
    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }

    /// Whether start and end coincide.
    pub fn is_degenerate(&self) -> bool {
        (self.end - self.start).length_squared() <= EPSILON * EPSILON
    }
}
