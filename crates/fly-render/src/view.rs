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

//! Per-view camera parameters.

use fly_core::math::{Extent2D, Mat4, Vec3, Vec4, Viewport};
use fly_core::renderer::{RhiCommandList, ShaderProgramId};

/// Camera and viewport parameters of one rendered view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewInfo {
    /// World space to view space.
    pub world_to_view: Mat4,
    /// View space to clip space (the projection).
    pub view_to_clip: Mat4,
    /// `view_to_clip * world_to_view`.
    pub world_to_clip: Mat4,
    /// Camera position in world space.
    pub view_position: Vec3,
    /// Region of the render target the view covers.
    pub viewport: Viewport,
}

impl ViewInfo {
    /// Builds a view from its view and projection matrices.
    pub fn new(world_to_view: Mat4, view_to_clip: Mat4, viewport: Viewport) -> Self {
        let view_position = world_to_view
            .affine_inverse()
            .map(|view_to_world| view_to_world.translation())
            .unwrap_or(Vec3::ZERO);
        Self {
            world_to_view,
            view_to_clip,
            world_to_clip: view_to_clip * world_to_view,
            view_position,
            viewport,
        }
    }

    /// A perspective camera at `eye` looking at `target`, covering all of
    /// `size`.
    ///
    /// Returns `None` for a degenerate camera (`eye == target` or `up`
    /// parallel to the view direction).
    pub fn look_at(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y_radians: f32,
        size: Extent2D,
        z_near: f32,
        z_far: f32,
    ) -> Option<Self> {
        let world_to_view = Mat4::look_at_rh(eye, target, up)?;
        let view_to_clip =
            Mat4::perspective_rh_zo(fov_y_radians, size.aspect_ratio(), z_near, z_far);
        Some(Self::new(world_to_view, view_to_clip, Viewport::from_extent(size)))
    }

    /// The camera's right axis in world space.
    pub fn right(&self) -> Vec3 {
        self.world_to_view.row(0).truncate()
    }

    /// The camera's up axis in world space.
    pub fn up(&self) -> Vec3 {
        self.world_to_view.row(1).truncate()
    }

    /// Uploads the view parameters every material program reads.
    pub fn setup_shader(&self, cmd: &mut dyn RhiCommandList, program: ShaderProgramId) {
        cmd.set_shader_matrix(program, "WorldToView", &self.world_to_view);
        cmd.set_shader_matrix(program, "ViewToClip", &self.view_to_clip);
        cmd.set_shader_matrix(program, "WorldToClip", &self.world_to_clip);
        cmd.set_shader_vector(
            program,
            "ViewPosition",
            Vec4::from_vec3(self.view_position, 1.0),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn view_position_is_recovered_from_the_view_matrix() {
        let eye = Vec3::new(3.0, 4.0, 5.0);
        let view = ViewInfo::look_at(
            eye,
            Vec3::ZERO,
            Vec3::Y,
            1.0,
            Extent2D::new(800, 600),
            0.1,
            100.0,
        )
        .unwrap();

        assert_relative_eq!(view.view_position.x, eye.x, epsilon = 1e-4);
        assert_relative_eq!(view.view_position.y, eye.y, epsilon = 1e-4);
        assert_relative_eq!(view.view_position.z, eye.z, epsilon = 1e-4);
        assert_eq!(view.viewport.width, 800.0);
    }

    #[test]
    fn camera_axes_are_orthonormal() {
        let view = ViewInfo::look_at(
            Vec3::new(0.0, 2.0, 10.0),
            Vec3::ZERO,
            Vec3::Y,
            1.0,
            Extent2D::new(64, 64),
            0.1,
            100.0,
        )
        .unwrap();
        assert_relative_eq!(view.right().length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(view.up().length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(view.right().dot(view.up()), 0.0, epsilon = 1e-5);
    }
}
