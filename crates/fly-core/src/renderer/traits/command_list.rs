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

use crate::math::{LinearRgba, Mat4, Vec4, Viewport};
use crate::renderer::types::*;

/// Records rendering commands for one thread.
///
/// Commands are recorded synchronously by the calling thread. A command list
/// never reports errors: invalid handles are the backend's to diagnose when
/// the list is executed.
pub trait RhiCommandList {
    /// Binds the color and depth targets for subsequent draws.
    fn set_render_target(&mut self, color: Option<TextureId>, depth: Option<TextureId>);

    /// Sets the viewport rectangle.
    fn set_viewport(&mut self, viewport: &Viewport);

    /// Clears the bound targets. `None` leaves the matching target untouched.
    fn clear(&mut self, color: Option<LinearRgba>, depth: Option<f32>);

    /// Binds a shader program, or returns to the fixed-function pipeline with `None`.
    fn set_shader_program(&mut self, program: Option<ShaderProgramId>);

    /// Loads the fixed-function world-view matrix. Only meaningful while no
    /// shader program is bound.
    fn load_fixed_world_view(&mut self, matrix: &Mat4);

    /// Loads the fixed-function projection matrix.
    fn load_fixed_projection(&mut self, matrix: &Mat4);

    /// Uploads a matrix parameter of `program`.
    fn set_shader_matrix(&mut self, program: ShaderProgramId, name: &str, value: &Mat4);

    /// Uploads a vector parameter of `program`.
    fn set_shader_vector(&mut self, program: ShaderProgramId, name: &str, value: Vec4);

    /// Uploads an array of vectors to `program`.
    fn set_shader_vectors(&mut self, program: ShaderProgramId, name: &str, values: &[Vec4]);

    /// Uploads an integer parameter of `program`.
    fn set_shader_int(&mut self, program: ShaderProgramId, name: &str, value: i32);

    /// Binds a texture to a sampler parameter of `program`.
    fn set_shader_texture(
        &mut self,
        program: ShaderProgramId,
        name: &str,
        texture: Option<TextureId>,
    );

    /// Binds a vertex buffer interpreted through `layout`.
    fn set_input_stream(&mut self, layout: InputLayoutId, vertex_buffer: BufferId);

    /// Binds an index buffer.
    fn set_index_buffer(&mut self, buffer: BufferId, format: IndexFormat);

    /// Draws `num_primitives` primitives from the bound vertex stream.
    fn draw_primitive(&mut self, topology: PrimitiveTopology, first_vertex: u32, num_primitives: u32);

    /// Draws `num_primitives` primitives from the bound index buffer.
    /// `base_vertex` is added to every index read.
    fn draw_indexed_primitive(
        &mut self,
        topology: PrimitiveTopology,
        base_vertex: i32,
        first_index: u32,
        num_primitives: u32,
    );

    /// Draws from vertex data supplied directly by the caller, without a
    /// vertex buffer. `vertex_data` holds `stride`-sized vertices.
    fn draw_primitive_up(
        &mut self,
        topology: PrimitiveTopology,
        num_primitives: u32,
        vertex_data: &[u8],
        stride: u32,
    );
}
