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

use super::RenderTechnique;
use crate::material::{Material, MaterialShaderProgram, ShaderLibrary};
use crate::scene::{LightKind, SceneLight};
use crate::view::ViewInfo;
use fly_core::math::Vec4;
use fly_core::renderer::{RhiCommandList, VertexFactoryType};
use std::rc::Rc;
use std::sync::Arc;

/// The number of lights a forward program receives.
pub const MAX_FORWARD_LIGHTS: usize = 4;

const FORWARD_PASS: &str = "Forward";

/// Single-pass lit rendering with up to [`MAX_FORWARD_LIGHTS`] lights.
///
/// Lights are uploaded whenever a program is bound, as three arrays:
/// `LightPositions` (xyz plus w = 0 for directional lights, whose xyz is the
/// direction), `LightColors` (premultiplied by intensity, range in w) and
/// `LightSpotParams` (spot direction, cosine of the outer cone in w).
#[derive(Debug, Clone)]
pub struct ForwardTechnique {
    library: Rc<ShaderLibrary>,
}

impl ForwardTechnique {
    /// Creates the technique, compiling through `library`.
    pub fn new(library: Rc<ShaderLibrary>) -> Self {
        Self { library }
    }
}

impl RenderTechnique for ForwardTechnique {
    fn name(&self) -> &'static str {
        "Forward"
    }

    fn get_material_shader(
        &self,
        material: &dyn Material,
        vertex_factory: VertexFactoryType,
    ) -> Option<Arc<MaterialShaderProgram>> {
        self.library
            .get_or_compile(material.master(), vertex_factory, FORWARD_PASS)
    }

    fn setup_material_shader(
        &self,
        cmd: &mut dyn RhiCommandList,
        view: &ViewInfo,
        lights: &[SceneLight],
        program: &MaterialShaderProgram,
    ) {
        let id = program.id();
        view.setup_shader(cmd, id);

        if lights.len() > MAX_FORWARD_LIGHTS {
            log::trace!(
                "ForwardTechnique: {} lights in view, only the first {MAX_FORWARD_LIGHTS} are used.",
                lights.len()
            );
        }
        let lights = &lights[..lights.len().min(MAX_FORWARD_LIGHTS)];

        let mut positions = Vec::with_capacity(lights.len());
        let mut colors = Vec::with_capacity(lights.len());
        let mut spot_params = Vec::with_capacity(lights.len());
        for light in lights {
            let radiance = light.color * light.intensity;
            match light.kind {
                LightKind::Directional { direction } => {
                    positions.push(Vec4::from_vec3(direction.normalize(), 0.0));
                    colors.push(Vec4::new(radiance.r, radiance.g, radiance.b, 0.0));
                    spot_params.push(Vec4::new(0.0, 0.0, 0.0, -1.0));
                }
                LightKind::Point { position, range } => {
                    positions.push(Vec4::from_vec3(position, 1.0));
                    colors.push(Vec4::new(radiance.r, radiance.g, radiance.b, range));
                    spot_params.push(Vec4::new(0.0, 0.0, 0.0, -1.0));
                }
                LightKind::Spot {
                    position,
                    direction,
                    range,
                    outer_cone_angle,
                    ..
                } => {
                    positions.push(Vec4::from_vec3(position, 1.0));
                    colors.push(Vec4::new(radiance.r, radiance.g, radiance.b, range));
                    spot_params.push(Vec4::from_vec3(
                        direction.normalize(),
                        outer_cone_angle.cos(),
                    ));
                }
            }
        }

        cmd.set_shader_int(id, "NumLights", lights.len() as i32);
        cmd.set_shader_vectors(id, "LightPositions", &positions);
        cmd.set_shader_vectors(id, "LightColors", &colors);
        cmd.set_shader_vectors(id, "LightSpotParams", &spot_params);
    }
}
