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

//! Per-view render state bridging a technique and a view to a command list.

use crate::device::RenderResources;
use crate::material::{Material, MaterialShaderProgram};
use crate::primitives::LineBatch;
use crate::scene::SceneLight;
use crate::stats::RenderStats;
use crate::technique::RenderTechnique;
use crate::view::ViewInfo;
use fly_core::math::Mat4;
use fly_core::renderer::{PrimitiveTopology, RenderError, RhiCommandList, VertexFactoryType};
use std::sync::Arc;

/// Holds the state of one view while it is being recorded.
///
/// The context resolves materials to shader programs through its
/// [`RenderTechnique`], tracks the currently bound program to skip redundant
/// binds, and pushes world and view state to the command list.
///
/// Draws are only accepted between [`begin_render`](Self::begin_render) and
/// [`end_render`](Self::end_render).
pub struct RenderContext<'a> {
    cmd: &'a mut dyn RhiCommandList,
    view: &'a ViewInfo,
    technique: &'a dyn RenderTechnique,
    resources: &'a RenderResources,
    lights: Vec<SceneLight>,
    bound_program: Option<Arc<MaterialShaderProgram>>,
    in_render: bool,
    stats: RenderStats,
}

impl<'a> RenderContext<'a> {
    /// Creates a context recording into `cmd`.
    pub fn new(
        cmd: &'a mut dyn RhiCommandList,
        view: &'a ViewInfo,
        technique: &'a dyn RenderTechnique,
        resources: &'a RenderResources,
    ) -> Self {
        Self {
            cmd,
            view,
            technique,
            resources,
            lights: Vec::new(),
            bound_program: None,
            in_render: false,
            stats: RenderStats::default(),
        }
    }

    /// Starts recording the view: sets the viewport and the projection, and
    /// forgets any previously bound program.
    pub fn begin_render(&mut self) {
        if self.in_render {
            log::warn!("RenderContext: begin_render called twice without end_render.");
        }
        self.cmd.set_viewport(&self.view.viewport);
        self.cmd.load_fixed_projection(&self.view.view_to_clip);
        self.bound_program = None;
        self.in_render = true;
        log::trace!("RenderContext: Begin render with '{}'.", self.technique.name());
    }

    /// Stops recording the view. The bound shader program is always cleared.
    pub fn end_render(&mut self) {
        self.cmd.set_shader_program(None);
        self.bound_program = None;
        self.in_render = false;
    }

    /// Binds `material` for the following draws.
    ///
    /// The material is resolved through the technique for `vertex_factory`.
    /// When it is `None`, or the technique has no program for it, the default
    /// material is used instead. The program is only bound (and the view and
    /// technique state uploaded) when it differs from the one already bound;
    /// the material's own parameters are uploaded every time.
    ///
    /// With a technique that uses no shader programs, any bound program is
    /// unbound and the material's parameters are not uploaded at all.
    ///
    /// ## Errors
    /// - [`RenderError::NotInitialized`] outside `begin_render`/`end_render`.
    /// - [`RenderError::NoShaderProgram`] when the default material cannot be
    ///   resolved either.
    pub fn set_material(
        &mut self,
        material: Option<&dyn Material>,
        vertex_factory: VertexFactoryType,
    ) -> Result<(), RenderError> {
        if !self.in_render {
            return Err(RenderError::NotInitialized);
        }

        if !self.technique.uses_shader_programs() {
            if self.bound_program.take().is_some() {
                self.cmd.set_shader_program(None);
            }
            return Ok(());
        }

        let technique = self.technique;
        let resolved = material.and_then(|material| {
            technique
                .get_material_shader(material, vertex_factory)
                .map(|program| (material, program))
        });
        let (material, program) = match resolved {
            Some(resolved) => resolved,
            None => {
                let resources = self.resources;
                let default = resources.default_material.as_ref();
                let program = technique
                    .get_material_shader(default, vertex_factory)
                    .ok_or_else(|| RenderError::NoShaderProgram {
                        material: default.master().name().to_string(),
                    })?;
                self.stats.material_fallbacks += 1;
                (default, program)
            }
        };

        let needs_bind = self
            .bound_program
            .as_ref()
            .map_or(true, |bound| !Arc::ptr_eq(bound, &program));
        if needs_bind {
            self.cmd.set_shader_program(Some(program.id()));
            technique.setup_material_shader(&mut *self.cmd, self.view, &self.lights, &program);
            self.stats.program_binds += 1;
            self.bound_program = Some(Arc::clone(&program));
        }

        material.setup_shader(&mut *self.cmd, program.id());
        Ok(())
    }

    /// Sets the object-to-world transform of the following draws.
    pub fn set_world(&mut self, world: &Mat4) {
        self.technique.setup_world(
            &mut *self.cmd,
            self.view,
            self.bound_program.as_deref(),
            world,
        );
    }

    /// Replaces the lights the technique shades with.
    ///
    /// A program that is already bound gets the new lights immediately.
    pub fn set_lights(&mut self, lights: &[SceneLight]) {
        self.lights.clear();
        self.lights.extend_from_slice(lights);
        if let Some(program) = &self.bound_program {
            self.technique
                .setup_material_shader(&mut *self.cmd, self.view, &self.lights, program);
        }
    }

    /// Draws from the bound vertex stream.
    pub fn draw_primitive(
        &mut self,
        topology: PrimitiveTopology,
        first_vertex: u32,
        num_primitives: u32,
    ) {
        self.cmd.draw_primitive(topology, first_vertex, num_primitives);
        self.stats.record_draw(num_primitives);
    }

    /// Draws from the bound index buffer.
    pub fn draw_indexed_primitive(
        &mut self,
        topology: PrimitiveTopology,
        base_vertex: i32,
        first_index: u32,
        num_primitives: u32,
    ) {
        self.cmd
            .draw_indexed_primitive(topology, base_vertex, first_index, num_primitives);
        self.stats.record_draw(num_primitives);
    }

    /// Draws vertex data supplied by the caller.
    pub fn draw_primitive_up(
        &mut self,
        topology: PrimitiveTopology,
        num_primitives: u32,
        vertex_data: &[u8],
        stride: u32,
    ) {
        self.cmd
            .draw_primitive_up(topology, num_primitives, vertex_data, stride);
        self.stats.record_draw(num_primitives);
    }

    /// Draws `lines` with the simple element renderer.
    ///
    /// The simple element program replaces whatever material program was
    /// bound, so the next [`set_material`](Self::set_material) binds again.
    pub fn draw_lines(&mut self, lines: &[LineBatch]) -> Result<(), RenderError> {
        if !self.in_render {
            return Err(RenderError::NotInitialized);
        }
        if lines.is_empty() {
            return Ok(());
        }
        self.bound_program = None;
        let resources = self.resources;
        resources
            .simple_elements
            .draw(self, &resources.shader_library, lines)
    }

    /// The command list being recorded into.
    pub fn command_list(&mut self) -> &mut dyn RhiCommandList {
        &mut *self.cmd
    }

    /// The view being rendered.
    pub fn view(&self) -> &ViewInfo {
        self.view
    }

    /// The technique resolving materials.
    pub fn technique(&self) -> &dyn RenderTechnique {
        self.technique
    }

    /// The lights set with [`set_lights`](Self::set_lights).
    pub fn lights(&self) -> &[SceneLight] {
        &self.lights
    }

    /// The program the last [`set_material`](Self::set_material) bound.
    pub fn bound_program(&self) -> Option<&Arc<MaterialShaderProgram>> {
        self.bound_program.as_ref()
    }

    /// Whether the context is between `begin_render` and `end_render`.
    pub fn is_rendering(&self) -> bool {
        self.in_render
    }

    /// The counters accumulated so far.
    pub fn stats(&self) -> RenderStats {
        self.stats
    }
}

impl std::fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("technique", &self.technique.name())
            .field("bound_program", &self.bound_program.as_ref().map(|p| p.id()))
            .field("lights", &self.lights.len())
            .field("in_render", &self.in_render)
            .field("stats", &self.stats)
            .finish()
    }
}
