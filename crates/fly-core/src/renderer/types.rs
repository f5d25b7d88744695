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

//! Descriptors, opaque handles and enums exchanged with an RHI backend.

use crate::math::Extent2D;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque handle to a texture owned by an [`RhiDevice`](super::RhiDevice).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// An opaque handle to a GPU buffer (vertex or index data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub usize);

/// An opaque handle to a vertex input layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputLayoutId(pub usize);

/// An opaque handle to a linked shader program (vertex + pixel stage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderProgramId(pub usize);

/// Pixel formats a texture can be created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureFormat {
    /// 8-bit RGBA, normalized.
    Rgba8Unorm,
    /// 8-bit BGRA, normalized. Typical swap-chain format.
    Bgra8Unorm,
    /// 16-bit float RGBA, for HDR targets.
    Rgba16Float,
    /// Single-channel 32-bit float.
    R32Float,
    /// 24-bit depth with 8-bit stencil.
    Depth24Stencil8,
    /// 32-bit float depth.
    Depth32Float,
}

impl TextureFormat {
    /// Returns `true` for depth or depth-stencil formats.
    ///
    /// Depth formats are created through
    /// [`RhiDevice::create_texture_depth`](super::RhiDevice::create_texture_depth).
    pub fn is_depth_stencil(&self) -> bool {
        matches!(self, Self::Depth24Stencil8 | Self::Depth32Float)
    }

    /// Size of a single texel in bytes.
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            Self::Rgba8Unorm | Self::Bgra8Unorm | Self::R32Float => 4,
            Self::Depth24Stencil8 | Self::Depth32Float => 4,
            Self::Rgba16Float => 8,
        }
    }
}

bitflags! {
    /// Creation flags of a texture.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextureCreationFlags: u32 {
        /// The texture can be bound as a color render target.
        const RENDER_TARGET   = 1 << 0;
        /// The texture can be sampled from shaders.
        const SHADER_RESOURCE = 1 << 1;
        /// The texture can be bound as a depth-stencil target.
        const DEPTH_STENCIL   = 1 << 2;
        /// The texture is read back by the CPU.
        const CPU_ACCESS      = 1 << 3;
        /// Writes are gamma-encoded.
        const SRGB            = 1 << 4;
    }
}

/// Describes a 2D texture to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureDescriptor {
    /// A debug label for the texture.
    pub label: Option<String>,
    /// Size in pixels.
    pub size: Extent2D,
    /// Pixel format.
    pub format: TextureFormat,
    /// Number of samples per pixel. `1` means no multisampling.
    pub sample_count: u32,
    /// Number of mip levels.
    pub mip_level_count: u32,
    /// Creation flags.
    pub flags: TextureCreationFlags,
}

impl TextureDescriptor {
    /// Returns `true` when the texture carries more than one sample per pixel.
    pub fn is_multisampled(&self) -> bool {
        self.sample_count > 1
    }

    /// Estimated memory footprint of the base mip level in bytes.
    pub fn byte_size(&self) -> u64 {
        self.size.width as u64
            * self.size.height as u64
            * self.format.bytes_per_pixel() as u64
            * self.sample_count.max(1) as u64
    }
}

/// What a buffer is bound as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    /// Vertex stream source.
    Vertex,
    /// Index stream source.
    Index,
}

/// Describes a GPU buffer to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferDescriptor {
    /// A debug label for the buffer.
    pub label: Option<String>,
    /// Size of the buffer in bytes.
    pub size: u64,
    /// Binding usage.
    pub usage: BufferUsage,
    /// `true` for buffers rewritten every frame.
    pub dynamic: bool,
}

/// The format of the indices in an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexFormat {
    /// 16-bit unsigned indices.
    Uint16,
    /// 32-bit unsigned indices.
    Uint32,
}

impl IndexFormat {
    /// Size of a single index in bytes.
    pub fn size(&self) -> u32 {
        match self {
            Self::Uint16 => 2,
            Self::Uint32 => 4,
        }
    }
}

/// How vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    /// Each vertex is a point.
    PointList,
    /// Each pair of vertices is a line.
    LineList,
    /// Consecutive vertices form a connected line.
    LineStrip,
    /// Each triple of vertices is a triangle.
    TriangleList,
    /// Consecutive vertices form a strip of triangles.
    TriangleStrip,
}

impl PrimitiveTopology {
    /// Number of primitives produced by `num_elements` vertices (or indices).
    ///
    /// ```
    /// use fly_core::renderer::PrimitiveTopology;
    /// assert_eq!(PrimitiveTopology::TriangleList.primitive_count(6), 2);
    /// assert_eq!(PrimitiveTopology::TriangleStrip.primitive_count(6), 4);
    /// assert_eq!(PrimitiveTopology::LineStrip.primitive_count(1), 0);
    /// ```
    pub fn primitive_count(&self, num_elements: u32) -> u32 {
        match self {
            Self::PointList => num_elements,
            Self::LineList => num_elements / 2,
            Self::LineStrip => num_elements.saturating_sub(1),
            Self::TriangleList => num_elements / 3,
            Self::TriangleStrip => num_elements.saturating_sub(2),
        }
    }
}

/// The family of vertex data a mesh is fed from.
///
/// A material is compiled once per vertex factory it is drawn with, because
/// the vertex stage differs for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFactoryType {
    /// Rigid meshes with position, normal and texture coordinates.
    Static,
    /// Skinned meshes carrying bone indices and weights.
    Skinned,
    /// Immediate-mode position + color vertices (debug lines, gizmos).
    SimpleElement,
}

impl VertexFactoryType {
    /// Stable name used as a shader permutation key.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Static => "StaticMesh",
            Self::Skinned => "SkinnedMesh",
            Self::SimpleElement => "SimpleElement",
        }
    }
}

impl fmt::Display for VertexFactoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Semantic of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexSemantic {
    /// Object-space position.
    Position,
    /// Surface normal.
    Normal,
    /// Texture coordinate set.
    TexCoord(u8),
    /// Vertex color.
    Color,
    /// Skinning bone indices.
    BlendIndices,
    /// Skinning bone weights.
    BlendWeights,
}

/// Storage format of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    /// Two 32-bit floats.
    Float32x2,
    /// Three 32-bit floats.
    Float32x3,
    /// Four 32-bit floats.
    Float32x4,
    /// Four normalized bytes.
    Unorm8x4,
    /// Four unsigned bytes.
    Uint8x4,
}

impl VertexFormat {
    /// Size of the attribute in bytes.
    pub fn size(&self) -> u32 {
        match self {
            Self::Float32x2 => 8,
            Self::Float32x3 => 12,
            Self::Float32x4 => 16,
            Self::Unorm8x4 | Self::Uint8x4 => 4,
        }
    }
}

/// One attribute of a vertex layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// What the attribute means.
    pub semantic: VertexSemantic,
    /// How it is stored.
    pub format: VertexFormat,
    /// Byte offset from the start of the vertex.
    pub offset: u32,
}

/// Describes the layout of one interleaved vertex stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLayoutDescriptor {
    /// A debug label.
    pub label: Option<String>,
    /// Distance in bytes between consecutive vertices.
    pub stride: u32,
    /// Attributes of the stream.
    pub attributes: Vec<VertexAttribute>,
}

/// Describes one shader program permutation to compile.
///
/// Programs are keyed by the material master that authored them, the vertex
/// factory they read from and the technique pass they render in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderProgramDescriptor {
    /// A debug label.
    pub label: String,
    /// Name of the material master the program is generated from.
    pub master: String,
    /// Vertex factory the program consumes.
    pub vertex_factory: VertexFactoryType,
    /// Technique pass name (for example `"Forward"` or `"DepthOnly"`).
    pub pass: String,
    /// Preprocessor definitions.
    pub defines: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_formats_are_detected() {
        assert!(TextureFormat::Depth24Stencil8.is_depth_stencil());
        assert!(TextureFormat::Depth32Float.is_depth_stencil());
        assert!(!TextureFormat::Rgba8Unorm.is_depth_stencil());
    }

    #[test]
    fn byte_size_accounts_for_samples() {
        let desc = TextureDescriptor {
            label: None,
            size: Extent2D::new(256, 256),
            format: TextureFormat::Rgba8Unorm,
            sample_count: 4,
            mip_level_count: 1,
            flags: TextureCreationFlags::RENDER_TARGET,
        };
        assert!(desc.is_multisampled());
        assert_eq!(desc.byte_size(), 256 * 256 * 4 * 4);
    }

    #[test]
    fn flag_bits_can_be_removed() {
        let flags = TextureCreationFlags::RENDER_TARGET | TextureCreationFlags::SHADER_RESOURCE;
        assert_eq!(
            flags - TextureCreationFlags::RENDER_TARGET,
            TextureCreationFlags::SHADER_RESOURCE
        );
    }
}
