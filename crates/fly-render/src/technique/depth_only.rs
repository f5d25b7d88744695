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
use fly_core::renderer::VertexFactoryType;
use std::rc::Rc;
use std::sync::Arc;

const DEPTH_ONLY_PASS: &str = "DepthOnly";

/// Depth pre-pass: writes depth only, with no lighting.
#[derive(Debug, Clone)]
pub struct DepthOnlyTechnique {
    library: Rc<ShaderLibrary>,
}

impl DepthOnlyTechnique {
    /// Creates the technique, compiling through `library`.
    pub fn new(library: Rc<ShaderLibrary>) -> Self {
        Self { library }
    }
}

impl RenderTechnique for DepthOnlyTechnique {
    fn name(&self) -> &'static str {
        "DepthOnly"
    }

    fn get_material_shader(
        &self,
        material: &dyn Material,
        vertex_factory: VertexFactoryType,
    ) -> Option<Arc<MaterialShaderProgram>> {
        self.library
            .get_or_compile(material.master(), vertex_factory, DEPTH_ONLY_PASS)
    }
}
