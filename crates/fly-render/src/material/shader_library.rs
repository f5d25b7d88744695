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

use super::{MaterialMaster, MaterialMasterId};
use fly_core::renderer::{RhiDevice, ShaderProgramDescriptor, ShaderProgramId, VertexFactoryType};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

/// A compiled program for one (material master, vertex factory, pass)
/// permutation.
#[derive(Debug)]
pub struct MaterialShaderProgram {
    id: ShaderProgramId,
    master: Arc<MaterialMaster>,
    vertex_factory: VertexFactoryType,
    pass: &'static str,
}

impl MaterialShaderProgram {
    /// The RHI program handle.
    pub fn id(&self) -> ShaderProgramId {
        self.id
    }

    /// The master the program was generated from.
    pub fn master(&self) -> &Arc<MaterialMaster> {
        &self.master
    }

    /// The vertex factory the program reads from.
    pub fn vertex_factory(&self) -> VertexFactoryType {
        self.vertex_factory
    }

    /// The technique pass the program renders in.
    pub fn pass(&self) -> &'static str {
        self.pass
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ProgramKey {
    master: MaterialMasterId,
    vertex_factory: VertexFactoryType,
    pass: &'static str,
}

/// Lazily compiles and caches [`MaterialShaderProgram`]s.
///
/// Failed compilations are cached too, so a broken permutation is reported
/// once and then resolves to `None` without reaching the device again.
#[derive(Debug)]
pub struct ShaderLibrary {
    device: Arc<dyn RhiDevice>,
    programs: RefCell<HashMap<ProgramKey, Option<Arc<MaterialShaderProgram>>>>,
}

impl ShaderLibrary {
    /// Creates an empty library compiling through `device`.
    pub fn new(device: Arc<dyn RhiDevice>) -> Self {
        Self {
            device,
            programs: RefCell::new(HashMap::new()),
        }
    }

    /// Returns the program for the permutation, compiling it on first use.
    pub fn get_or_compile(
        &self,
        master: &Arc<MaterialMaster>,
        vertex_factory: VertexFactoryType,
        pass: &'static str,
    ) -> Option<Arc<MaterialShaderProgram>> {
        let key = ProgramKey {
            master: master.id(),
            vertex_factory,
            pass,
        };
        if let Some(cached) = self.programs.borrow().get(&key) {
            return cached.clone();
        }

        let descriptor = ShaderProgramDescriptor {
            label: format!("{}/{}/{}", master.name(), vertex_factory, pass),
            master: master.name().to_string(),
            vertex_factory,
            pass: pass.to_string(),
            defines: vec![("VERTEX_FACTORY".to_string(), vertex_factory.name().to_string())],
        };
        let program = match self.device.create_shader_program(&descriptor) {
            Ok(id) => {
                log::debug!("ShaderLibrary: Compiled '{}' as {id:?}", descriptor.label);
                Some(Arc::new(MaterialShaderProgram {
                    id,
                    master: Arc::clone(master),
                    vertex_factory,
                    pass,
                }))
            }
            Err(err) => {
                log::warn!(
                    "ShaderLibrary: '{}' is unavailable, draws will fall back: {err}",
                    descriptor.label
                );
                None
            }
        };
        self.programs.borrow_mut().insert(key, program.clone());
        program
    }

    /// Number of cached permutations, failed ones included.
    pub fn num_cached(&self) -> usize {
        self.programs.borrow().len()
    }

    /// Destroys every compiled program and empties the cache.
    pub fn release_rhi(&self) {
        for program in self.programs.borrow_mut().drain().filter_map(|(_, p)| p) {
            if let Err(err) = self.device.destroy_shader_program(program.id) {
                log::warn!("ShaderLibrary: Failed to destroy {:?}: {err}", program.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fly_infra::RecordingDevice;

    #[test]
    fn programs_are_cached_per_permutation() {
        let device = RecordingDevice::new();
        let library = ShaderLibrary::new(Arc::new(device.clone()));
        let master = MaterialMaster::new("Lit");

        let a = library.get_or_compile(&master, VertexFactoryType::Static, "Forward").unwrap();
        let b = library.get_or_compile(&master, VertexFactoryType::Static, "Forward").unwrap();
        let c = library.get_or_compile(&master, VertexFactoryType::Skinned, "Forward").unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(device.stats().shader_programs_created, 2);
    }

    #[test]
    fn failures_are_cached() {
        let device = RecordingDevice::new();
        device.fail_shader_compilation("Broken");
        let library = ShaderLibrary::new(Arc::new(device.clone()));
        let master = MaterialMaster::new("Broken");

        assert!(library.get_or_compile(&master, VertexFactoryType::Static, "Forward").is_none());
        assert!(library.get_or_compile(&master, VertexFactoryType::Static, "Forward").is_none());
        assert_eq!(library.num_cached(), 1);
    }

    #[test]
    fn release_destroys_programs() {
        let device = RecordingDevice::new();
        let library = ShaderLibrary::new(Arc::new(device.clone()));
        let master = MaterialMaster::new("Lit");
        library.get_or_compile(&master, VertexFactoryType::Static, "Forward");
        library.get_or_compile(&master, VertexFactoryType::Static, "DepthOnly");

        library.release_rhi();

        assert_eq!(library.num_cached(), 0);
        assert_eq!(device.stats().live_shader_programs, 0);
    }
}
