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

//! Defines the hierarchy of error types for the rendering subsystem.

use crate::renderer::types::ShaderProgramId;
use std::fmt;

/// An error raised while compiling or looking up a shader program.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderError {
    /// The program source failed to compile or link.
    CompilationError {
        /// A descriptive label for the program.
        label: String,
        /// Detailed messages from the shader compiler.
        details: String,
    },
    /// The requested shader program could not be found.
    NotFound {
        /// The ID of the program that was not found.
        id: ShaderProgramId,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::CompilationError { label, details } => {
                write!(f, "Shader compilation failed for '{label}': {details}")
            }
            ShaderError::NotFound { id } => {
                write!(f, "Shader program not found for ID: {id:?}")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// The kind of GPU resource an operation was acting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// A color texture.
    Texture,
    /// A depth-stencil texture.
    DepthTexture,
    /// A vertex or index buffer.
    Buffer,
    /// A vertex input layout.
    InputLayout,
    /// A shader program.
    ShaderProgram,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Texture => "texture",
            ResourceKind::DepthTexture => "depth texture",
            ResourceKind::Buffer => "buffer",
            ResourceKind::InputLayout => "input layout",
            ResourceKind::ShaderProgram => "shader program",
        };
        f.write_str(name)
    }
}

/// An error related to the creation, destruction or use of a GPU resource.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// A shader-specific error occurred.
    Shader(ShaderError),
    /// A generic resource could not be found.
    NotFound,
    /// The handle or ID used to reference a resource is invalid.
    InvalidHandle,
    /// The backend refused to create the resource.
    CreationFailed {
        /// What was being created.
        kind: ResourceKind,
        /// The debug label of the resource, if any.
        label: String,
    },
    /// An error originating from the specific graphics backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Shader(err) => write!(f, "Shader resource error: {err}"),
            ResourceError::NotFound => write!(f, "Resource not found with ID."),
            ResourceError::InvalidHandle => write!(f, "Invalid resource handle or ID."),
            ResourceError::CreationFailed { kind, label } => {
                write!(f, "Failed to create {kind} '{label}'")
            }
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Shader(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for ResourceError {
    fn from(err: ShaderError) -> Self {
        ResourceError::Shader(err)
    }
}

/// A high-level error raised while recording a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// A draw was attempted outside of a `begin_render`/`end_render` bracket,
    /// or before the render device finished initializing.
    NotInitialized,
    /// An error occurred while managing a GPU resource.
    ResourceError(ResourceError),
    /// Neither the requested material nor the default material produced a
    /// shader program for the active technique.
    NoShaderProgram {
        /// Name of the material master that was being resolved.
        material: String,
    },
    /// An unexpected or internal error occurred.
    Internal(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NotInitialized => {
                write!(f, "The renderer is not initialized.")
            }
            RenderError::ResourceError(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
            RenderError::NoShaderProgram { material } => {
                write!(f, "No shader program available for material '{material}'")
            }
            RenderError::Internal(msg) => {
                write!(f, "An internal or unexpected error occurred: {msg}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::ResourceError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::ResourceError(err)
    }
}
