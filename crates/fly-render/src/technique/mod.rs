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

//! Render techniques: how a material resolves to a shader program for a
//! given pass, and how per-view and per-object state reaches that program.

mod depth_only;
mod fixed_function;
mod forward;

pub use self::depth_only::DepthOnlyTechnique;
pub use self::fixed_function::FixedFunctionTechnique;
pub use self::forward::{ForwardTechnique, MAX_FORWARD_LIGHTS};

use crate::material::{Material, MaterialShaderProgram};
use crate::scene::SceneLight;
use crate::view::ViewInfo;
use fly_core::math::Mat4;
use fly_core::renderer::{RhiCommandList, VertexFactoryType};
use std::sync::Arc;

/// A strategy for turning materials into bound shader state.
///
/// The [`RenderContext`](crate::RenderContext) asks the technique which
/// program a material resolves to and lets it upload view and world state,
/// so the same scene can be drawn by several passes (forward shading, a
/// depth pre-pass, a fixed-function fallback) without the scene knowing.
pub trait RenderTechnique {
    /// A human-readable name, used in logs.
    fn name(&self) -> &'static str;

    /// Whether draws go through shader programs at all.
    ///
    /// When `false`, the context binds no program and
    /// [`setup_world`](Self::setup_world) always takes the fixed-function path.
    fn uses_shader_programs(&self) -> bool {
        true
    }

    /// Resolves the program `material` should be drawn with for `vertex_factory`.
    ///
    /// ## Returns
    /// `None` when the technique has no program for this combination; the
    /// context then falls back to the default material.
    fn get_material_shader(
        &self,
        material: &dyn Material,
        vertex_factory: VertexFactoryType,
    ) -> Option<Arc<MaterialShaderProgram>>;

    /// Uploads per-view (and per-technique) state to a program that was just
    /// bound.
    fn setup_material_shader(
        &self,
        cmd: &mut dyn RhiCommandList,
        view: &ViewInfo,
        _lights: &[SceneLight],
        program: &MaterialShaderProgram,
    ) {
        view.setup_shader(cmd, program.id());
    }

    /// Uploads the object-to-world transform of the next draw.
    ///
    /// Techniques without shader programs load the world-view matrix into the
    /// fixed-function matrix stack. Otherwise the world matrix and its affine
    /// inverse are uploaded to `program`, the latter for transforming normals.
    /// With no program bound there is nothing to upload to.
    fn setup_world(
        &self,
        cmd: &mut dyn RhiCommandList,
        view: &ViewInfo,
        program: Option<&MaterialShaderProgram>,
        world: &Mat4,
    ) {
        if !self.uses_shader_programs() {
            cmd.load_fixed_world_view(&(view.world_to_view * *world));
            return;
        }

        match program {
            None => log::trace!(
                "{}: World transform set with no program bound, skipped.",
                self.name()
            ),
            Some(program) => {
                let inverse = world.affine_inverse().unwrap_or_else(|| {
                    log::warn!("Singular world matrix, uploading identity as its inverse.");
                    Mat4::IDENTITY
                });
                cmd.set_shader_matrix(program.id(), "World", world);
                cmd.set_shader_matrix(program.id(), "WorldInverse", &inverse);
            }
        }
    }
}
