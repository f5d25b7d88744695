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

use fly_core::math::{LinearRgba, Mat4, Vec4, Viewport};
use fly_core::renderer::{
    BufferId, IndexFormat, InputLayoutId, PrimitiveTopology, RhiCommandList, ShaderProgramId,
    TextureId,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// One command captured by a [`RecordingCommandList`].
#[derive(Debug, Clone, PartialEq)]
pub enum RhiCommand {
    /// See [`RhiCommandList::set_render_target`].
    SetRenderTarget {
        /// Bound color target.
        color: Option<TextureId>,
        /// Bound depth target.
        depth: Option<TextureId>,
    },
    /// See [`RhiCommandList::set_viewport`].
    SetViewport(Viewport),
    /// See [`RhiCommandList::clear`].
    Clear {
        /// Clear color, if the color target is cleared.
        color: Option<LinearRgba>,
        /// Clear depth, if the depth target is cleared.
        depth: Option<f32>,
    },
    /// See [`RhiCommandList::set_shader_program`].
    SetShaderProgram(Option<ShaderProgramId>),
    /// See [`RhiCommandList::load_fixed_world_view`].
    LoadFixedWorldView(Mat4),
    /// See [`RhiCommandList::load_fixed_projection`].
    LoadFixedProjection(Mat4),
    /// See [`RhiCommandList::set_shader_matrix`].
    SetShaderMatrix {
        /// Target program.
        program: ShaderProgramId,
        /// Parameter name.
        name: String,
        /// Uploaded value.
        value: Mat4,
    },
    /// See [`RhiCommandList::set_shader_vector`].
    SetShaderVector {
        /// Target program.
        program: ShaderProgramId,
        /// Parameter name.
        name: String,
        /// Uploaded value.
        value: Vec4,
    },
    /// See [`RhiCommandList::set_shader_vectors`].
    SetShaderVectors {
        /// Target program.
        program: ShaderProgramId,
        /// Parameter name.
        name: String,
        /// Uploaded values.
        values: Vec<Vec4>,
    },
    /// See [`RhiCommandList::set_shader_int`].
    SetShaderInt {
        /// Target program.
        program: ShaderProgramId,
        /// Parameter name.
        name: String,
        /// Uploaded value.
        value: i32,
    },
    /// See [`RhiCommandList::set_shader_texture`].
    SetShaderTexture {
        /// Target program.
        program: ShaderProgramId,
        /// Sampler name.
        name: String,
        /// Bound texture.
        texture: Option<TextureId>,
    },
    /// See [`RhiCommandList::set_input_stream`].
    SetInputStream {
        /// Vertex layout.
        layout: InputLayoutId,
        /// Vertex buffer.
        vertex_buffer: BufferId,
    },
    /// See [`RhiCommandList::set_index_buffer`].
    SetIndexBuffer {
        /// Index buffer.
        buffer: BufferId,
        /// Index width.
        format: IndexFormat,
    },
    /// See [`RhiCommandList::draw_primitive`].
    DrawPrimitive {
        /// Primitive assembly mode.
        topology: PrimitiveTopology,
        /// First vertex read.
        first_vertex: u32,
        /// Number of primitives drawn.
        num_primitives: u32,
    },
    /// See [`RhiCommandList::draw_indexed_primitive`].
    DrawIndexedPrimitive {
        /// Primitive assembly mode.
        topology: PrimitiveTopology,
        /// Offset added to every index.
        base_vertex: i32,
        /// First index read.
        first_index: u32,
        /// Number of primitives drawn.
        num_primitives: u32,
    },
    /// See [`RhiCommandList::draw_primitive_up`].
    DrawPrimitiveUp {
        /// Primitive assembly mode.
        topology: PrimitiveTopology,
        /// Number of primitives drawn.
        num_primitives: u32,
        /// Copy of the vertex bytes supplied by the caller.
        vertex_data: Vec<u8>,
        /// Size of one vertex in bytes.
        stride: u32,
    },
}

impl RhiCommand {
    /// Returns `true` for the three draw commands.
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            RhiCommand::DrawPrimitive { .. }
                | RhiCommand::DrawIndexedPrimitive { .. }
                | RhiCommand::DrawPrimitiveUp { .. }
        )
    }

    /// Number of primitives drawn by this command, `0` for state changes.
    pub fn primitive_count(&self) -> u32 {
        match self {
            RhiCommand::DrawPrimitive { num_primitives, .. }
            | RhiCommand::DrawIndexedPrimitive { num_primitives, .. }
            | RhiCommand::DrawPrimitiveUp { num_primitives, .. } => *num_primitives,
            _ => 0,
        }
    }
}

/// Command storage shared between a device and its command lists.
#[derive(Debug, Default)]
pub(crate) struct CommandLog {
    pub(crate) commands: Vec<RhiCommand>,
    pub(crate) draw_calls: u64,
    pub(crate) primitives: u64,
}

impl CommandLog {
    fn push(&mut self, command: RhiCommand) {
        if command.is_draw() {
            self.draw_calls += 1;
            self.primitives += command.primitive_count() as u64;
        }
        self.commands.push(command);
    }
}

/// A command list that appends every call to its device's command log.
#[derive(Debug)]
pub struct RecordingCommandList {
    log: Arc<Mutex<CommandLog>>,
}

impl RecordingCommandList {
    pub(crate) fn new(log: Arc<Mutex<CommandLog>>) -> Self {
        Self { log }
    }

    fn record(&mut self, command: RhiCommand) {
        log::trace!("RecordingCommandList: {command:?}");
        self.log.lock().push(command);
    }
}

impl RhiCommandList for RecordingCommandList {
    fn set_render_target(&mut self, color: Option<TextureId>, depth: Option<TextureId>) {
        self.record(RhiCommand::SetRenderTarget { color, depth });
    }

    fn set_viewport(&mut self, viewport: &Viewport) {
        self.record(RhiCommand::SetViewport(*viewport));
    }

    fn clear(&mut self, color: Option<LinearRgba>, depth: Option<f32>) {
        self.record(RhiCommand::Clear { color, depth });
    }

    fn set_shader_program(&mut self, program: Option<ShaderProgramId>) {
        self.record(RhiCommand::SetShaderProgram(program));
    }

    fn load_fixed_world_view(&mut self, matrix: &Mat4) {
        self.record(RhiCommand::LoadFixedWorldView(*matrix));
    }

    fn load_fixed_projection(&mut self, matrix: &Mat4) {
        self.record(RhiCommand::LoadFixedProjection(*matrix));
    }

    fn set_shader_matrix(&mut self, program: ShaderProgramId, name: &str, value: &Mat4) {
        self.record(RhiCommand::SetShaderMatrix {
            program,
            name: name.to_string(),
            value: *value,
        });
    }

    fn set_shader_vector(&mut self, program: ShaderProgramId, name: &str, value: Vec4) {
        self.record(RhiCommand::SetShaderVector {
            program,
            name: name.to_string(),
            value,
        });
    }

    fn set_shader_vectors(&mut self, program: ShaderProgramId, name: &str, values: &[Vec4]) {
        self.record(RhiCommand::SetShaderVectors {
            program,
            name: name.to_string(),
            values: values.to_vec(),
        });
    }

    fn set_shader_int(&mut self, program: ShaderProgramId, name: &str, value: i32) {
        self.record(RhiCommand::SetShaderInt {
            program,
            name: name.to_string(),
            value,
        });
    }

    fn set_shader_texture(
        &mut self,
        program: ShaderProgramId,
        name: &str,
        texture: Option<TextureId>,
    ) {
        self.record(RhiCommand::SetShaderTexture {
            program,
            name: name.to_string(),
            texture,
        });
    }

    fn set_input_stream(&mut self, layout: InputLayoutId, vertex_buffer: BufferId) {
        self.record(RhiCommand::SetInputStream {
            layout,
            vertex_buffer,
        });
    }

    fn set_index_buffer(&mut self, buffer: BufferId, format: IndexFormat) {
        self.record(RhiCommand::SetIndexBuffer { buffer, format });
    }

    fn draw_primitive(&mut self, topology: PrimitiveTopology, first_vertex: u32, num_primitives: u32) {
        self.record(RhiCommand::DrawPrimitive {
            topology,
            first_vertex,
            num_primitives,
        });
    }

    fn draw_indexed_primitive(
        &mut self,
        topology: PrimitiveTopology,
        base_vertex: i32,
        first_index: u32,
        num_primitives: u32,
    ) {
        self.record(RhiCommand::DrawIndexedPrimitive {
            topology,
            base_vertex,
            first_index,
            num_primitives,
        });
    }

    fn draw_primitive_up(
        &mut self,
        topology: PrimitiveTopology,
        num_primitives: u32,
        vertex_data: &[u8],
        stride: u32,
    ) {
        self.record(RhiCommand::DrawPrimitiveUp {
            topology,
            num_primitives,
            vertex_data: vertex_data.to_vec(),
            stride,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_update_counters() {
        let log = Arc::new(Mutex::new(CommandLog::default()));
        let mut list = RecordingCommandList::new(Arc::clone(&log));

        list.set_shader_program(None);
        list.draw_primitive(PrimitiveTopology::TriangleList, 0, 4);
        list.draw_indexed_primitive(PrimitiveTopology::LineList, 0, 6, 2);

        let log = log.lock();
        assert_eq!(log.commands.len(), 3);
        assert_eq!(log.draw_calls, 2);
        assert_eq!(log.primitives, 6);
    }
}
