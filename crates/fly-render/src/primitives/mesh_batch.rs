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

use crate::context::RenderContext;
use crate::material::Material;
use fly_core::math::Mat4;
use fly_core::renderer::{
    BufferId, IndexFormat, InputLayoutId, PrimitiveTopology, RenderError, VertexFactoryType,
};
use std::sync::Arc;

/// One world-transformed range of a [`MeshBatch`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshBatchElement {
    /// Object-to-world transform.
    pub world: Mat4,
    /// First index (indexed batches) or first vertex (non-indexed batches).
    pub first_element: u32,
    /// Number of indices or vertices drawn.
    pub num_elements: u32,
    /// Added to every index read. Ignored by non-indexed batches.
    pub base_vertex: i32,
}

impl MeshBatchElement {
    /// An element covering `num_elements` indices or vertices from the start.
    pub fn new(world: Mat4, num_elements: u32) -> Self {
        Self {
            world,
            first_element: 0,
            num_elements,
            base_vertex: 0,
        }
    }

    /// Sets the first index or vertex.
    pub fn with_first_element(mut self, first_element: u32) -> Self {
        self.first_element = first_element;
        self
    }

    /// Sets the base vertex.
    pub fn with_base_vertex(mut self, base_vertex: i32) -> Self {
        self.base_vertex = base_vertex;
        self
    }
}

/// Draws sharing one vertex stream and material.
///
/// Buffers and the material are referenced, not owned: they must outlive
/// every frame the batch is drawn in.
#[derive(Debug, Clone)]
pub struct MeshBatch {
    /// Vertex buffer the elements read from.
    pub vertex_buffer: BufferId,
    /// Layout of `vertex_buffer`.
    pub input_layout: InputLayoutId,
    /// Index buffer, or `None` for non-indexed draws.
    pub index_buffer: Option<(BufferId, IndexFormat)>,
    /// Material, or `None` for the default material.
    pub material: Option<Arc<dyn Material>>,
    /// The vertex factory the vertex data belongs to.
    pub vertex_factory: VertexFactoryType,
    /// How vertices are assembled.
    pub topology: PrimitiveTopology,
    /// The draws of the batch.
    pub elements: Vec<MeshBatchElement>,
}

impl MeshBatch {
    /// A non-indexed triangle list batch with no elements.
    pub fn new(
        vertex_buffer: BufferId,
        input_layout: InputLayoutId,
        material: Option<Arc<dyn Material>>,
    ) -> Self {
        Self {
            vertex_buffer,
            input_layout,
            index_buffer: None,
            material,
            vertex_factory: VertexFactoryType::Static,
            topology: PrimitiveTopology::TriangleList,
            elements: Vec::new(),
        }
    }

    /// Draws through `buffer`.
    pub fn with_index_buffer(mut self, buffer: BufferId, format: IndexFormat) -> Self {
        self.index_buffer = Some((buffer, format));
        self
    }

    /// Sets the topology.
    pub fn with_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    /// Sets the vertex factory.
    pub fn with_vertex_factory(mut self, vertex_factory: VertexFactoryType) -> Self {
        self.vertex_factory = vertex_factory;
        self
    }

    /// Appends an element.
    pub fn with_element(mut self, element: MeshBatchElement) -> Self {
        self.elements.push(element);
        self
    }

    /// The primitives drawn by all elements.
    pub fn num_primitives(&self) -> u64 {
        self.elements
            .iter()
            .map(|e| self.topology.primitive_count(e.num_elements) as u64)
            .sum()
    }

    /// Binds the material and the streams, then issues one draw per element.
    ///
    /// Elements that assemble no whole primitive are skipped.
    pub fn draw(&self, ctx: &mut RenderContext<'_>) -> Result<(), RenderError> {
        if self.elements.is_empty() {
            return Ok(());
        }

        ctx.set_material(self.material.as_deref(), self.vertex_factory)?;

        let cmd = ctx.command_list();
        cmd.set_input_stream(self.input_layout, self.vertex_buffer);
        if let Some((buffer, format)) = self.index_buffer {
            cmd.set_index_buffer(buffer, format);
        }

        for element in &self.elements {
            let num_primitives = self.topology.primitive_count(element.num_elements);
            if num_primitives == 0 {
                continue;
            }
            ctx.set_world(&element.world);
            if self.index_buffer.is_some() {
                ctx.draw_indexed_primitive(
                    self.topology,
                    element.base_vertex,
                    element.first_element,
                    num_primitives,
                );
            } else {
                ctx.draw_primitive(self.topology, element.first_element, num_primitives);
            }
        }
        Ok(())
    }
}
