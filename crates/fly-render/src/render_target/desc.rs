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

use fly_core::math::Extent2D;
use fly_core::renderer::{TextureCreationFlags, TextureDescriptor, TextureFormat};

/// Describes a render target requested from the [`RenderTargetPool`](super::RenderTargetPool).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTargetDesc {
    /// Size in pixels.
    pub size: Extent2D,
    /// Samples per pixel. Values above `1` allocate a separate resolve texture.
    pub num_samples: u32,
    /// Pixel format. Depth formats take the depth-stencil creation path.
    pub format: TextureFormat,
    /// Creation flags.
    pub flags: TextureCreationFlags,
    /// Name shown in debugging tools. Not part of the match key.
    pub debug_name: String,
}

impl RenderTargetDesc {
    /// A single-sampled target of `size` and `format`.
    ///
    /// Color formats are flagged as render target and shader resource, depth
    /// formats as depth-stencil.
    pub fn new(size: Extent2D, format: TextureFormat) -> Self {
        let flags = if format.is_depth_stencil() {
            TextureCreationFlags::DEPTH_STENCIL
        } else {
            TextureCreationFlags::RENDER_TARGET | TextureCreationFlags::SHADER_RESOURCE
        };
        Self {
            size,
            num_samples: 1,
            format,
            flags,
            debug_name: String::new(),
        }
    }

    /// Sets the sample count.
    pub fn with_samples(mut self, num_samples: u32) -> Self {
        self.num_samples = num_samples;
        self
    }

    /// Replaces the creation flags.
    pub fn with_flags(mut self, flags: TextureCreationFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the debug name.
    pub fn with_debug_name(mut self, name: impl Into<String>) -> Self {
        self.debug_name = name.into();
        self
    }

    /// Returns `true` if a target created for `self` can serve `other`.
    ///
    /// Size, sample count, format and flags must agree. The debug name and
    /// the `RENDER_TARGET` flag bit are ignored.
    pub fn is_match(&self, other: &RenderTargetDesc) -> bool {
        self.size == other.size
            && self.num_samples == other.num_samples
            && self.format == other.format
            && self.flags - TextureCreationFlags::RENDER_TARGET
                == other.flags - TextureCreationFlags::RENDER_TARGET
    }

    pub(crate) fn texture_descriptor(&self) -> TextureDescriptor {
        TextureDescriptor {
            label: Some(self.debug_name.clone()),
            size: self.size,
            format: self.format,
            sample_count: self.num_samples,
            mip_level_count: 1,
            flags: self.flags,
        }
    }

    /// The single-sampled, shader-readable copy a multisampled target
    /// resolves into.
    pub(crate) fn resolve_descriptor(&self) -> TextureDescriptor {
        TextureDescriptor {
            label: Some(format!("{}.Resolve", self.debug_name)),
            size: self.size,
            format: self.format,
            sample_count: 1,
            mip_level_count: 1,
            flags: TextureCreationFlags::SHADER_RESOURCE
                | (self.flags & TextureCreationFlags::SRGB),
        }
    }
}
