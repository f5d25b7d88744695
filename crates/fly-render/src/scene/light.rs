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

use fly_core::math::{LinearRgba, Vec3};

/// The shape of a light's emission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Parallel rays, as from the sun.
    Directional {
        /// Direction the light travels in.
        direction: Vec3,
    },
    /// Emits in every direction from a point.
    Point {
        /// World-space position.
        position: Vec3,
        /// Distance at which the light fades out.
        range: f32,
    },
    /// Emits a cone from a point.
    Spot {
        /// World-space position.
        position: Vec3,
        /// Axis of the cone.
        direction: Vec3,
        /// Distance at which the light fades out.
        range: f32,
        /// Half-angle of the full-intensity cone, in radians.
        inner_cone_angle: f32,
        /// Half-angle beyond which there is no light, in radians.
        outer_cone_angle: f32,
    },
}

/// A light in a [`Scene`](super::Scene).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLight {
    /// The shape of the light.
    pub kind: LightKind,
    /// Light color.
    pub color: LinearRgba,
    /// Multiplier applied to `color`.
    pub intensity: f32,
}

impl SceneLight {
    /// A directional light.
    pub fn directional(direction: Vec3, color: LinearRgba, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional { direction },
            color,
            intensity,
        }
    }

    /// A point light.
    pub fn point(position: Vec3, range: f32, color: LinearRgba, intensity: f32) -> Self {
        Self {
            kind: LightKind::Point { position, range },
            color,
            intensity,
        }
    }

    /// A spot light.
    pub fn spot(
        position: Vec3,
        direction: Vec3,
        range: f32,
        inner_cone_angle: f32,
        outer_cone_angle: f32,
        color: LinearRgba,
        intensity: f32,
    ) -> Self {
        Self {
            kind: LightKind::Spot {
                position,
                direction,
                range,
                inner_cone_angle,
                outer_cone_angle,
            },
            color,
            intensity,
        }
    }
}
