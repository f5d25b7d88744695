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

//! Materials and the shader programs they compile to.
//!
//! A [`MaterialMaster`] is the shader template a family of materials shares.
//! The [`ShaderLibrary`] compiles one [`MaterialShaderProgram`] per master,
//! vertex factory and technique pass, and the [`Material`] instance uploads
//! its own parameters onto whichever program was bound for it.

mod shader_library;

pub use self::shader_library::{MaterialShaderProgram, ShaderLibrary};

use fly_core::math::{LinearRgba, Vec4};
use fly_core::renderer::{RhiCommandList, ShaderProgramId, TextureId};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Identifies a [`MaterialMaster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialMasterId(pub usize);

/// The shader template shared by every material instance built from it.
#[derive(Debug)]
pub struct MaterialMaster {
    id: MaterialMasterId,
    name: String,
}

impl MaterialMaster {
    /// Creates a master with a unique id.
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        static NEXT_ID: AtomicUsize = AtomicUsize::new(0);
        Arc::new(Self {
            id: MaterialMasterId(NEXT_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.into(),
        })
    }

    /// The master's unique id.
    pub fn id(&self) -> MaterialMasterId {
        self.id
    }

    /// The master's name, which is also the shader source it is compiled from.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A material instance: a master plus the parameter values to draw with.
pub trait Material: fmt::Debug {
    /// The master this material is an instance of.
    fn master(&self) -> &Arc<MaterialMaster>;

    /// Uploads this material's parameters to `program`.
    ///
    /// Called for every draw that uses the material, even when `program` was
    /// already bound for a previous draw.
    fn setup_shader(&self, cmd: &mut dyn RhiCommandList, program: ShaderProgramId);
}

/// A material with a base color and an optional base texture.
#[derive(Debug, Clone)]
pub struct SimpleMaterial {
    master: Arc<MaterialMaster>,
    /// Color multiplied with the base texture.
    pub base_color: LinearRgba,
    /// Base color texture.
    pub texture: Option<TextureId>,
}

impl SimpleMaterial {
    /// Creates an untextured material.
    pub fn new(master: Arc<MaterialMaster>, base_color: LinearRgba) -> Self {
        Self {
            master,
            base_color,
            texture: None,
        }
    }

    /// Sets the base texture.
    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }
}

impl Material for SimpleMaterial {
    fn master(&self) -> &Arc<MaterialMaster> {
        &self.master
    }

    fn setup_shader(&self, cmd: &mut dyn RhiCommandList, program: ShaderProgramId) {
        cmd.set_shader_vector(program, "BaseColor", Vec4::from(self.base_color));
        cmd.set_shader_texture(program, "BaseTexture", self.texture);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masters_get_distinct_ids() {
        let a = MaterialMaster::new("Lit");
        let b = MaterialMaster::new("Lit");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.name(), b.name());
    }
}
