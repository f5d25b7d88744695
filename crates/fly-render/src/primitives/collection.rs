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

use super::{LineBatch, MeshBatch};
use crate::context::RenderContext;
use fly_core::renderer::RenderError;

/// The mesh batches and lines a scene draws in one pass.
#[derive(Debug, Clone, Default)]
pub struct PrimitivesCollection {
    /// Mesh batches, drawn in insertion order.
    pub mesh_batches: Vec<MeshBatch>,
    /// Lines, drawn after every mesh batch.
    pub lines: Vec<LineBatch>,
}

impl PrimitivesCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mesh batch.
    pub fn add_mesh_batch(&mut self, batch: MeshBatch) {
        self.mesh_batches.push(batch);
    }

    /// Adds a line.
    pub fn add_line(&mut self, line: LineBatch) {
        self.lines.push(line);
    }

    /// Removes everything, keeping the allocations.
    pub fn clear(&mut self) {
        self.mesh_batches.clear();
        self.lines.clear();
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.mesh_batches.is_empty() && self.lines.is_empty()
    }

    /// The number of draw elements across all mesh batches.
    pub fn num_mesh_elements(&self) -> usize {
        self.mesh_batches.iter().map(|b| b.elements.len()).sum()
    }

    /// Draws the mesh batches, then the lines.
    pub fn draw(&self, ctx: &mut RenderContext<'_>) -> Result<(), RenderError> {
        for batch in &self.mesh_batches {
            batch.draw(ctx)?;
        }
        ctx.draw_lines(&self.lines)
    }
}
