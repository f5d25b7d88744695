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

use super::RenderTargetDesc;
use fly_core::renderer::{ResourceError, RhiDevice, TextureId};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A render target texture owned by a [`RenderTargetPool`].
///
/// Handed out as `Rc<PooledRenderTarget>`. The pool keeps its own reference,
/// so the textures outlive every handle and are only destroyed by
/// [`RenderTargetPool::release_rhi`].
pub struct PooledRenderTarget {
    desc: RenderTargetDesc,
    debug_name: RefCell<String>,
    texture: TextureId,
    resolved_texture: Option<TextureId>,
}

impl PooledRenderTarget {
    /// The descriptor the target was created with. Its `debug_name` is the
    /// name at creation time; see [`debug_name`](Self::debug_name) for the
    /// current one.
    pub fn desc(&self) -> &RenderTargetDesc {
        &self.desc
    }

    /// Name given by the most recent fetch. Empty while the target is free.
    pub fn debug_name(&self) -> String {
        self.debug_name.borrow().clone()
    }

    /// The texture to render into.
    pub fn texture(&self) -> TextureId {
        self.texture
    }

    /// The single-sampled resolve texture of a multisampled target.
    pub fn resolved_texture(&self) -> Option<TextureId> {
        self.resolved_texture
    }

    /// The texture shaders should sample: the resolve texture when the
    /// target is multisampled, the render texture otherwise.
    pub fn shader_resource_texture(&self) -> TextureId {
        self.resolved_texture.unwrap_or(self.texture)
    }

    /// Returns `true` when the target has more than one sample per pixel.
    pub fn is_multisampled(&self) -> bool {
        self.desc.num_samples > 1
    }
}

impl fmt::Debug for PooledRenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledRenderTarget")
            .field("debug_name", &*self.debug_name.borrow())
            .field("texture", &self.texture)
            .field("resolved_texture", &self.resolved_texture)
            .field("desc", &self.desc)
            .finish()
    }
}

/// Caches render target textures across frames.
///
/// Targets live in one of two lists. A fetch moves a matching target from
/// the free list to the used list, or creates one when nothing matches.
/// Freeing moves it back. A target in the used list belongs to whoever
/// fetched it until it is freed; the pool never hands it out twice.
///
/// The pool only tracks CPU-side ownership. Callers reusing a target in a
/// later frame must still order the GPU work themselves.
#[derive(Debug, Default)]
pub struct RenderTargetPool {
    free: Vec<Rc<PooledRenderTarget>>,
    used: Vec<Rc<PooledRenderTarget>>,
}

impl RenderTargetPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of targets waiting to be reused.
    pub fn num_free(&self) -> usize {
        self.free.len()
    }

    /// Number of targets currently handed out.
    pub fn num_used(&self) -> usize {
        self.used.len()
    }

    /// Total number of targets the pool owns.
    pub fn num_allocated(&self) -> usize {
        self.free.len() + self.used.len()
    }

    /// Returns a target matching `desc`, reusing a free one when possible.
    ///
    /// ## Errors
    /// Propagates the device error when a new texture cannot be created. A
    /// half-created multisampled target is destroyed before returning.
    pub fn fetch_element(
        &mut self,
        device: &dyn RhiDevice,
        desc: &RenderTargetDesc,
    ) -> Result<Rc<PooledRenderTarget>, ResourceError> {
        if let Some(index) = self.free.iter().position(|t| t.desc.is_match(desc)) {
            let target = self.free.swap_remove(index);
            *target.debug_name.borrow_mut() = desc.debug_name.clone();
            log::trace!(
                "RenderTargetPool: Reusing {:?} for '{}'",
                target.texture,
                desc.debug_name
            );
            self.used.push(Rc::clone(&target));
            return Ok(target);
        }

        let target = Rc::new(Self::create_target(device, desc)?);
        log::debug!(
            "RenderTargetPool: Allocated '{}' {}x{} {:?} x{} ({} targets total)",
            desc.debug_name,
            desc.size.width,
            desc.size.height,
            desc.format,
            desc.num_samples,
            self.num_allocated() + 1
        );
        self.used.push(Rc::clone(&target));
        Ok(target)
    }

    fn create_target(
        device: &dyn RhiDevice,
        desc: &RenderTargetDesc,
    ) -> Result<PooledRenderTarget, ResourceError> {
        let texture_desc = desc.texture_descriptor();
        let (texture, resolved_texture) = if desc.format.is_depth_stencil() {
            (device.create_texture_depth(&texture_desc)?, None)
        } else {
            let texture = device.create_texture_2d(&texture_desc)?;
            let resolved = if desc.num_samples > 1 {
                match device.create_texture_2d(&desc.resolve_descriptor()) {
                    Ok(id) => Some(id),
                    Err(err) => {
                        if let Err(destroy_err) = device.destroy_texture(texture) {
                            log::warn!(
                                "RenderTargetPool: Failed to destroy orphaned {texture:?}: {destroy_err}"
                            );
                        }
                        return Err(err);
                    }
                }
            } else {
                None
            };
            (texture, resolved)
        };

        Ok(PooledRenderTarget {
            desc: desc.clone(),
            debug_name: RefCell::new(desc.debug_name.clone()),
            texture,
            resolved_texture,
        })
    }

    /// Returns one target to the free list.
    ///
    /// Returns `false` if `target` is not currently in use. The target keeps
    /// its debug name until it is fetched again.
    pub fn free_used_element(&mut self, target: &Rc<PooledRenderTarget>) -> bool {
        match self.used.iter().position(|t| Rc::ptr_eq(t, target)) {
            Some(index) => {
                let target = self.used.swap_remove(index);
                self.free.push(target);
                true
            }
            None => false,
        }
    }

    /// Returns every used target to the free list and clears their names.
    pub fn free_all_used_elements(&mut self) {
        for target in self.used.drain(..) {
            target.debug_name.borrow_mut().clear();
            self.free.push(target);
        }
    }

    /// Destroys every texture the pool owns, free or used, and empties it.
    ///
    /// Handles still held by callers stay valid as values but name textures
    /// that no longer exist.
    pub fn release_rhi(&mut self, device: &dyn RhiDevice) {
        let count = self.num_allocated();
        for target in self.free.drain(..).chain(self.used.drain(..)) {
            let textures = std::iter::once(target.texture).chain(target.resolved_texture);
            for texture in textures {
                if let Err(err) = device.destroy_texture(texture) {
                    log::warn!("RenderTargetPool: Failed to destroy {texture:?}: {err}");
                }
            }
        }
        if count > 0 {
            log::debug!("RenderTargetPool: Released {count} render targets.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fly_core::math::Extent2D;
    use fly_core::renderer::TextureFormat;
    use fly_infra::RecordingDevice;

    fn color(name: &str) -> RenderTargetDesc {
        RenderTargetDesc::new(Extent2D::new(64, 64), TextureFormat::Rgba8Unorm).with_debug_name(name)
    }

    #[test]
    fn multisampled_color_target_gets_resolve_texture() {
        let device = RecordingDevice::new();
        let mut pool = RenderTargetPool::new();

        let target = pool.fetch_element(&device, &color("Msaa").with_samples(4)).unwrap();

        let resolved = target.resolved_texture().expect("resolve texture");
        assert_eq!(target.shader_resource_texture(), resolved);
        let resolve_desc = device.texture_descriptor(resolved).unwrap();
        assert_eq!(resolve_desc.sample_count, 1);
        assert_eq!(device.stats().live_textures, 2);
    }

    #[test]
    fn depth_target_uses_depth_path() {
        let device = RecordingDevice::new();
        let mut pool = RenderTargetPool::new();
        let desc = RenderTargetDesc::new(Extent2D::new(64, 64), TextureFormat::Depth24Stencil8)
            .with_samples(4);

        let target = pool.fetch_element(&device, &desc).unwrap();

        assert!(target.resolved_texture().is_none());
        assert_eq!(target.shader_resource_texture(), target.texture());
    }

    #[test]
    fn failed_resolve_destroys_the_render_texture() {
        let device = RecordingDevice::new();
        let mut pool = RenderTargetPool::new();
        // The render texture succeeds, the resolve texture fails.
        device.fail_texture_creations_after(1, 1);

        let result = pool.fetch_element(&device, &color("Msaa").with_samples(4));

        assert!(result.is_err());
        assert_eq!(pool.num_allocated(), 0);
        assert_eq!(device.stats().live_textures, 0);
        assert_eq!(device.stats().textures_created, 1);
    }

    #[test]
    fn release_rhi_destroys_free_and_used_targets() {
        let device = RecordingDevice::new();
        let mut pool = RenderTargetPool::new();
        let a = pool.fetch_element(&device, &color("A").with_samples(2)).unwrap();
        let _b = pool.fetch_element(&device, &color("B")).unwrap();
        assert!(pool.free_used_element(&a));

        pool.release_rhi(&device);

        assert_eq!(pool.num_allocated(), 0);
        assert_eq!(device.stats().live_textures, 0);
    }
}
