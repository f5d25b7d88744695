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

use crate::renderer::error::ResourceError;
use crate::renderer::traits::RhiCommandList;
use crate::renderer::types::*;
use std::fmt::Debug;

/// A graphics device: the factory and owner of every GPU resource.
///
/// One backend implementation is selected when the application starts and is
/// used for the whole process lifetime, so the renderer holds it as a trait
/// object rather than dispatching over an enum of backends.
///
/// Resource creation reports failure through `Result`. Callers that hold a
/// handle are responsible for destroying it; destroying an unknown handle is
/// an error, never a silent no-op.
pub trait RhiDevice: Send + Sync + Debug + 'static {
    /// Human-readable backend name, used in logs.
    fn backend_name(&self) -> &str;

    /// Creates a color texture usable as a render target and/or shader resource.
    /// ## Arguments
    /// * `descriptor` - Size, format, sample count and flags of the texture.
    /// ## Returns
    /// The ID of the created texture.
    /// ## Errors
    /// * `ResourceError::CreationFailed` - If the backend rejects the request.
    fn create_texture_2d(&self, descriptor: &TextureDescriptor) -> Result<TextureId, ResourceError>;

    /// Creates a depth-stencil texture.
    /// ## Arguments
    /// * `descriptor` - A descriptor whose format is a depth format.
    /// ## Returns
    /// The ID of the created texture.
    /// ## Errors
    /// * `ResourceError::CreationFailed` - If the format is not a depth format
    ///   or the backend rejects the request.
    fn create_texture_depth(
        &self,
        descriptor: &TextureDescriptor,
    ) -> Result<TextureId, ResourceError>;

    /// Destroys a texture.
    /// ## Errors
    /// * `ResourceError::InvalidHandle` - If `id` does not name a live texture.
    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError>;

    /// Creates a vertex or index buffer, optionally filled with `data`.
    /// ## Arguments
    /// * `descriptor` - Size and usage of the buffer.
    /// * `data` - Initial contents. Must not be longer than `descriptor.size`.
    fn create_buffer(
        &self,
        descriptor: &BufferDescriptor,
        data: Option<&[u8]>,
    ) -> Result<BufferId, ResourceError>;

    /// Destroys a buffer.
    /// ## Errors
    /// * `ResourceError::InvalidHandle` - If `id` does not name a live buffer.
    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError>;

    /// Creates a vertex input layout.
    fn create_input_layout(
        &self,
        descriptor: &InputLayoutDescriptor,
    ) -> Result<InputLayoutId, ResourceError>;

    /// Compiles and links a shader program.
    /// ## Errors
    /// * `ResourceError::Shader` - If compilation fails.
    fn create_shader_program(
        &self,
        descriptor: &ShaderProgramDescriptor,
    ) -> Result<ShaderProgramId, ResourceError>;

    /// Destroys a shader program.
    fn destroy_shader_program(&self, id: ShaderProgramId) -> Result<(), ResourceError>;

    /// Opens a new command list recording against this device.
    fn create_command_list(&self) -> Box<dyn RhiCommandList>;
}
