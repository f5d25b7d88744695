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
use crate::material::{Material, MaterialShaderProgram};
use fly_core::renderer::VertexFactoryType;
use std::sync::Arc;

/// Draws through the fixed-function pipeline, for devices without shader
/// support.
///
/// No program is ever bound; world-view matrices go to the legacy matrix
/// stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedFunctionTechnique;

impl RenderTechnique for FixedFunctionTechnique {
    fn name(&self) -> &'static str {
        "FixedFunction"
    }

    fn uses_shader_programs(&self) -> bool {
        false
    }

    fn get_material_shader(
        &self,
        _material: &dyn Material,
        _vertex_factory: VertexFactoryType,
    ) -> Option<Arc<MaterialShaderProgram>> {
        None
    }
}
