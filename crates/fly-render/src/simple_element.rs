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

//! Immediate-mode drawing of debug lines.

use crate::context::RenderContext;
use crate::material::{MaterialMaster, ShaderLibrary};
use crate::primitives::LineBatch;
use fly_core::math::Vec3;
use fly_core::renderer::{PrimitiveTopology, RenderError, VertexFactoryType};
use std::sync::Arc;

const SIMPLE_ELEMENT_PASS: &str = "SimpleElement";
const VERTICES_PER_LINE: usize = 2;
const VERTICES_PER_QUAD: usize = 6;

/// The vertex format of simple element draws.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct SimpleElementVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Color packed as ABGR8.
    pub color: u32,
}

impl SimpleElementVertex {
    fn new(position: Vec3, color: u32) -> Self {
        Self {
            position: [position.x, position.y, position.z],
            color,
        }
    }
}

/// Draws [`LineBatch`]es from CPU memory with a dedicated color program.
///
/// Hairlines go out as a line list. Lines thicker than the threshold are
/// expanded into quads facing the camera and go out as a triangle list.
/// Vertex data is split into draws of at most `max_vertices` vertices.
#[derive(Debug)]
pub struct SimpleElementRenderer {
    master: Arc<MaterialMaster>,
    thickness_threshold: f32,
    max_vertices: usize,
}

impl SimpleElementRenderer {
    /// Creates the renderer.
    pub fn new(thickness_threshold: f32, max_vertices: usize) -> Self {
        Self {
            master: MaterialMaster::new("SimpleElement"),
            thickness_threshold,
            max_vertices: max_vertices.max(VERTICES_PER_QUAD),
        }
    }

    /// The master the color program is compiled from.
    pub fn master(&self) -> &Arc<MaterialMaster> {
        &self.master
    }

    /// Draws `lines` in the context's view.
    ///
    /// ## Errors
    /// [`RenderError::NoShaderProgram`] when the color program cannot be
    /// compiled.
    pub fn draw(
        &self,
        ctx: &mut RenderContext<'_>,
        library: &ShaderLibrary,
        lines: &[LineBatch],
    ) -> Result<(), RenderError> {
        let view = *ctx.view();
        let (thin, thick) = self.expand(lines, view.view_position, view.right());
        if thin.is_empty() && thick.is_empty() {
            return Ok(());
        }

        let program = library
            .get_or_compile(&self.master, VertexFactoryType::SimpleElement, SIMPLE_ELEMENT_PASS)
            .ok_or_else(|| RenderError::NoShaderProgram {
                material: self.master.name().to_string(),
            })?;

        let cmd = ctx.command_list();
        cmd.set_shader_program(Some(program.id()));
        cmd.set_shader_matrix(program.id(), "WorldToClip", &view.world_to_clip);

        self.flush(ctx, PrimitiveTopology::LineList, VERTICES_PER_LINE, &thin);
        self.flush(ctx, PrimitiveTopology::TriangleList, VERTICES_PER_QUAD, &thick);
        log::trace!(
            "SimpleElementRenderer: {} hairline and {} quad vertices.",
            thin.len(),
            thick.len()
        );
        Ok(())
    }

    fn flush(
        &self,
        ctx: &mut RenderContext<'_>,
        topology: PrimitiveTopology,
        group: usize,
        vertices: &[SimpleElementVertex],
    ) {
        let chunk_len = self.max_vertices - self.max_vertices % group;
        let stride = std::mem::size_of::<SimpleElementVertex>() as u32;
        for chunk in vertices.chunks(chunk_len) {
            let num_primitives = topology.primitive_count(chunk.len() as u32);
            ctx.draw_primitive_up(topology, num_primitives, bytemuck::cast_slice(chunk), stride);
        }
    }

    /// Splits `lines` into hairline vertices and quad vertices.
    fn expand(
        &self,
        lines: &[LineBatch],
        view_position: Vec3,
        view_right: Vec3,
    ) -> (Vec<SimpleElementVertex>, Vec<SimpleElementVertex>) {
        let mut thin = Vec::new();
        let mut thick = Vec::new();

        for line in lines.iter().filter(|line| !line.is_degenerate()) {
            let color = line.color.to_packed_abgr();
            if line.thickness <= self.thickness_threshold {
                thin.push(SimpleElementVertex::new(line.start, color));
                thin.push(SimpleElementVertex::new(line.end, color));
                continue;
            }

            let direction = line.end - line.start;
            let middle = (line.start + line.end) * 0.5;
            let mut side = direction.cross(view_position - middle).normalize();
            if side == Vec3::ZERO {
                // Looking straight down the line.
                side = view_right;
            }
            let offset = side * (line.thickness * 0.5);

            let a = line.start - offset;
            let b = line.start + offset;
            let c = line.end + offset;
            let d = line.end - offset;
            for corner in [a, b, c, a, c, d] {
                thick.push(SimpleElementVertex::new(corner, color));
            }
        }
        (thin, thick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fly_core::math::LinearRgba;

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<SimpleElementVertex>(), 16);
    }

    #[test]
    fn thin_and_degenerate_lines() {
        let renderer = SimpleElementRenderer::new(0.0, 1024);
        let lines = [
            LineBatch::new(Vec3::ZERO, Vec3::X, LinearRgba::RED),
            LineBatch::new(Vec3::Y, Vec3::Y, LinearRgba::RED),
        ];

        let (thin, thick) = renderer.expand(&lines, Vec3::new(0.0, 0.0, 5.0), Vec3::X);

        assert_eq!(thin.len(), 2);
        assert!(thick.is_empty());
        assert_eq!(thin[1].position, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn thick_lines_face_the_camera() {
        let renderer = SimpleElementRenderer::new(0.0, 1024);
        let line = LineBatch::new(Vec3::ZERO, Vec3::X, LinearRgba::GREEN).with_thickness(0.5);

        let (thin, thick) = renderer.expand(&[line], Vec3::new(0.5, 0.0, 5.0), Vec3::X);

        assert!(thin.is_empty());
        assert_eq!(thick.len(), VERTICES_PER_QUAD);
        // The quad spans the Y axis, so it lies in the plane facing +Z.
        for vertex in &thick {
            assert_relative_eq!(vertex.position[2], 0.0, epsilon = 1e-5);
            assert_relative_eq!(vertex.position[1].abs(), 0.25, epsilon = 1e-5);
        }
    }

    #[test]
    fn line_seen_end_on_uses_camera_right() {
        let renderer = SimpleElementRenderer::new(0.0, 1024);
        let line = LineBatch::new(Vec3::ZERO, Vec3::Z, LinearRgba::BLUE).with_thickness(1.0);

        let (_, thick) = renderer.expand(&[line], Vec3::new(0.0, 0.0, 10.0), Vec3::X);

        assert_relative_eq!(thick[0].position[0], -0.5, epsilon = 1e-5);
        assert_relative_eq!(thick[1].position[0], 0.5, epsilon = 1e-5);
    }
}
