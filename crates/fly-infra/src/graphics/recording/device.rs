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

use super::command::{CommandLog, RecordingCommandList, RhiCommand};
use fly_core::renderer::*;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Resource and submission counters of a [`RecordingDevice`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStats {
    /// Textures currently alive.
    pub live_textures: usize,
    /// Buffers currently alive.
    pub live_buffers: usize,
    /// Input layouts currently alive.
    pub live_input_layouts: usize,
    /// Shader programs currently alive.
    pub live_shader_programs: usize,
    /// Textures created over the device lifetime.
    pub textures_created: usize,
    /// Shader programs compiled over the device lifetime.
    pub shader_programs_created: usize,
    /// Memory held by live textures, in bytes.
    pub texture_bytes: u64,
    /// Draw commands recorded by all command lists.
    pub draw_calls: u64,
    /// Primitives submitted by all draw commands.
    pub primitives: u64,
}

struct BufferEntry {
    descriptor: BufferDescriptor,
    data: Vec<u8>,
}

#[derive(Default)]
struct Registries {
    textures: HashMap<TextureId, TextureDescriptor>,
    buffers: HashMap<BufferId, BufferEntry>,
    input_layouts: HashMap<InputLayoutId, InputLayoutDescriptor>,
    shader_programs: HashMap<ShaderProgramId, ShaderProgramDescriptor>,
    textures_created: usize,
    shader_programs_created: usize,
    texture_bytes: u64,
}

#[derive(Default)]
struct FailureInjection {
    texture_successes_before_failure: usize,
    texture_creations: usize,
    shader_masters: HashSet<String>,
}

struct RecordingDeviceInternal {
    registries: Mutex<Registries>,
    failures: Mutex<FailureInjection>,
    log: Arc<Mutex<CommandLog>>,

    next_texture_id: AtomicUsize,
    next_buffer_id: AtomicUsize,
    next_input_layout_id: AtomicUsize,
    next_shader_program_id: AtomicUsize,
}

/// A clonable handle to a software device that records everything.
///
/// Clones share the same registries and command log.
#[derive(Clone)]
pub struct RecordingDevice {
    internal: Arc<RecordingDeviceInternal>,
}

impl RecordingDevice {
    /// Creates an empty device.
    pub fn new() -> Self {
        Self {
            internal: Arc::new(RecordingDeviceInternal {
                registries: Mutex::new(Registries::default()),
                failures: Mutex::new(FailureInjection::default()),
                log: Arc::new(Mutex::new(CommandLog::default())),
                next_texture_id: AtomicUsize::new(0),
                next_buffer_id: AtomicUsize::new(0),
                next_input_layout_id: AtomicUsize::new(0),
                next_shader_program_id: AtomicUsize::new(0),
            }),
        }
    }

    /// Makes the next `count` texture creations (color or depth) fail.
    pub fn fail_next_texture_creations(&self, count: usize) {
        self.fail_texture_creations_after(0, count);
    }

    /// Lets `successes` texture creations through, then makes the following
    /// `count` fail.
    pub fn fail_texture_creations_after(&self, successes: usize, count: usize) {
        let mut failures = self.internal.failures.lock();
        failures.texture_successes_before_failure = successes;
        failures.texture_creations = count;
    }

    /// Makes every program generated from the material master `master` fail
    /// to compile.
    pub fn fail_shader_compilation(&self, master: &str) {
        self.internal
            .failures
            .lock()
            .shader_masters
            .insert(master.to_string());
    }

    /// A copy of every command recorded so far.
    pub fn commands(&self) -> Vec<RhiCommand> {
        self.internal.log.lock().commands.clone()
    }

    /// Removes and returns every command recorded so far. Counters in
    /// [`DeviceStats`] are not reset.
    pub fn take_commands(&self) -> Vec<RhiCommand> {
        std::mem::take(&mut self.internal.log.lock().commands)
    }

    /// Current resource and submission counters.
    pub fn stats(&self) -> DeviceStats {
        let registries = self.internal.registries.lock();
        let log = self.internal.log.lock();
        DeviceStats {
            live_textures: registries.textures.len(),
            live_buffers: registries.buffers.len(),
            live_input_layouts: registries.input_layouts.len(),
            live_shader_programs: registries.shader_programs.len(),
            textures_created: registries.textures_created,
            shader_programs_created: registries.shader_programs_created,
            texture_bytes: registries.texture_bytes,
            draw_calls: log.draw_calls,
            primitives: log.primitives,
        }
    }

    /// Descriptor of a live texture.
    pub fn texture_descriptor(&self, id: TextureId) -> Option<TextureDescriptor> {
        self.internal.registries.lock().textures.get(&id).cloned()
    }

    /// Descriptor of a live shader program.
    pub fn shader_program_descriptor(&self, id: ShaderProgramId) -> Option<ShaderProgramDescriptor> {
        self.internal
            .registries
            .lock()
            .shader_programs
            .get(&id)
            .cloned()
    }

    /// Contents of a live buffer.
    pub fn buffer_data(&self, id: BufferId) -> Option<Vec<u8>> {
        self.internal
            .registries
            .lock()
            .buffers
            .get(&id)
            .map(|entry| entry.data.clone())
    }

    /// Returns `true` if `id` names a live texture.
    pub fn is_texture_alive(&self, id: TextureId) -> bool {
        self.internal.registries.lock().textures.contains_key(&id)
    }

    /// A recording command list as its concrete type, for callers that want
    /// to avoid the boxed trait object.
    pub fn recording_command_list(&self) -> RecordingCommandList {
        RecordingCommandList::new(Arc::clone(&self.internal.log))
    }

    fn consume_texture_failure(&self) -> bool {
        let mut failures = self.internal.failures.lock();
        if failures.texture_creations == 0 {
            false
        } else if failures.texture_successes_before_failure > 0 {
            failures.texture_successes_before_failure -= 1;
            false
        } else {
            failures.texture_creations -= 1;
            true
        }
    }

    fn register_texture(
        &self,
        descriptor: &TextureDescriptor,
        kind: ResourceKind,
    ) -> Result<TextureId, ResourceError> {
        let label = descriptor.label.clone().unwrap_or_default();
        let valid_format = match kind {
            ResourceKind::DepthTexture => descriptor.format.is_depth_stencil(),
            _ => !descriptor.format.is_depth_stencil(),
        };
        if !valid_format
            || descriptor.size.is_empty()
            || descriptor.sample_count == 0
            || self.consume_texture_failure()
        {
            log::error!("RecordingDevice: Failed to create {kind} '{label}' ({descriptor:?})");
            return Err(ResourceError::CreationFailed { kind, label });
        }

        let id = TextureId(self.internal.next_texture_id.fetch_add(1, Ordering::Relaxed));
        let mut registries = self.internal.registries.lock();
        registries.textures.insert(id, descriptor.clone());
        registries.textures_created += 1;
        registries.texture_bytes += descriptor.byte_size();
        log::debug!("RecordingDevice: Created {kind} '{label}' with ID: {id:?}");
        Ok(id)
    }
}

impl Default for RecordingDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RecordingDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingDevice")
            .field("stats", &self.stats())
            .finish()
    }
}

impl RhiDevice for RecordingDevice {
    fn backend_name(&self) -> &str {
        "Recording"
    }

    fn create_texture_2d(&self, descriptor: &TextureDescriptor) -> Result<TextureId, ResourceError> {
        self.register_texture(descriptor, ResourceKind::Texture)
    }

    fn create_texture_depth(
        &self,
        descriptor: &TextureDescriptor,
    ) -> Result<TextureId, ResourceError> {
        self.register_texture(descriptor, ResourceKind::DepthTexture)
    }

    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError> {
        let mut registries = self.internal.registries.lock();
        match registries.textures.remove(&id) {
            Some(descriptor) => {
                registries.texture_bytes -= descriptor.byte_size();
                log::debug!("RecordingDevice: Destroyed texture with ID: {id:?}");
                Ok(())
            }
            None => Err(ResourceError::InvalidHandle),
        }
    }

    fn create_buffer(
        &self,
        descriptor: &BufferDescriptor,
        data: Option<&[u8]>,
    ) -> Result<BufferId, ResourceError> {
        let data = data.unwrap_or_default();
        if data.len() as u64 > descriptor.size {
            return Err(ResourceError::BackendError(format!(
                "initial data ({} bytes) exceeds buffer size ({} bytes)",
                data.len(),
                descriptor.size
            )));
        }
        let mut contents = vec![0u8; descriptor.size as usize];
        contents[..data.len()].copy_from_slice(data);

        let id = BufferId(self.internal.next_buffer_id.fetch_add(1, Ordering::Relaxed));
        self.internal.registries.lock().buffers.insert(
            id,
            BufferEntry {
                descriptor: descriptor.clone(),
                data: contents,
            },
        );
        log::debug!(
            "RecordingDevice: Created {:?} buffer '{}' with ID: {id:?}",
            descriptor.usage,
            descriptor.label.as_deref().unwrap_or_default()
        );
        Ok(id)
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
        match self.internal.registries.lock().buffers.remove(&id) {
            Some(entry) => {
                log::debug!(
                    "RecordingDevice: Destroyed {:?} buffer with ID: {id:?}",
                    entry.descriptor.usage
                );
                Ok(())
            }
            None => Err(ResourceError::InvalidHandle),
        }
    }

    fn create_input_layout(
        &self,
        descriptor: &InputLayoutDescriptor,
    ) -> Result<InputLayoutId, ResourceError> {
        let end = descriptor
            .attributes
            .iter()
            .map(|a| a.offset + a.format.size())
            .max()
            .unwrap_or(0);
        if end > descriptor.stride {
            return Err(ResourceError::CreationFailed {
                kind: ResourceKind::InputLayout,
                label: descriptor.label.clone().unwrap_or_default(),
            });
        }
        let id = InputLayoutId(
            self.internal
                .next_input_layout_id
                .fetch_add(1, Ordering::Relaxed),
        );
        self.internal
            .registries
            .lock()
            .input_layouts
            .insert(id, descriptor.clone());
        Ok(id)
    }

    fn create_shader_program(
        &self,
        descriptor: &ShaderProgramDescriptor,
    ) -> Result<ShaderProgramId, ResourceError> {
        if self
            .internal
            .failures
            .lock()
            .shader_masters
            .contains(&descriptor.master)
        {
            return Err(ShaderError::CompilationError {
                label: descriptor.label.clone(),
                details: format!("master '{}' is marked as failing", descriptor.master),
            }
            .into());
        }

        let id = ShaderProgramId(
            self.internal
                .next_shader_program_id
                .fetch_add(1, Ordering::Relaxed),
        );
        let mut registries = self.internal.registries.lock();
        registries.shader_programs.insert(id, descriptor.clone());
        registries.shader_programs_created += 1;
        log::debug!(
            "RecordingDevice: Compiled shader program '{}' with ID: {id:?}",
            descriptor.label
        );
        Ok(id)
    }

    fn destroy_shader_program(&self, id: ShaderProgramId) -> Result<(), ResourceError> {
        match self.internal.registries.lock().shader_programs.remove(&id) {
            Some(_) => Ok(()),
            None => Err(ResourceError::InvalidHandle),
        }
    }

    fn create_command_list(&self) -> Box<dyn RhiCommandList> {
        Box::new(self.recording_command_list())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fly_core::math::Extent2D;

    fn color_desc(label: &str) -> TextureDescriptor {
        TextureDescriptor {
            label: Some(label.to_string()),
            size: Extent2D::new(64, 32),
            format: TextureFormat::Rgba8Unorm,
            sample_count: 1,
            mip_level_count: 1,
            flags: TextureCreationFlags::RENDER_TARGET,
        }
    }

    #[test]
    fn depth_path_rejects_color_formats() {
        let device = RecordingDevice::new();
        let err = device.create_texture_depth(&color_desc("Wrong")).unwrap_err();
        assert_eq!(
            err,
            ResourceError::CreationFailed {
                kind: ResourceKind::DepthTexture,
                label: "Wrong".to_string(),
            }
        );
    }

    #[test]
    fn texture_bytes_follow_lifetime() {
        let device = RecordingDevice::new();
        let id = device.create_texture_2d(&color_desc("A")).unwrap();
        assert_eq!(device.stats().texture_bytes, 64 * 32 * 4);
        device.destroy_texture(id).unwrap();
        assert_eq!(device.stats().texture_bytes, 0);
        assert_eq!(device.stats().textures_created, 1);
    }

    #[test]
    fn buffer_contents_are_zero_padded() {
        let device = RecordingDevice::new();
        let desc = BufferDescriptor {
            label: None,
            size: 6,
            usage: BufferUsage::Index,
            dynamic: false,
        };
        let id = device.create_buffer(&desc, Some(&[1, 2, 3])).unwrap();
        assert_eq!(device.buffer_data(id).unwrap(), vec![1, 2, 3, 0, 0, 0]);
        assert!(device.create_buffer(&desc, Some(&[0; 7])).is_err());
    }
}
