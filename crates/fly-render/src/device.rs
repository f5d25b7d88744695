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

//! The render device: owner of the renderer's long-lived resources.

use crate::context::RenderContext;
use crate::material::{Material, MaterialMaster, ShaderLibrary, SimpleMaterial};
use crate::render_target::{PooledRenderTarget, RenderTargetDesc, RenderTargetPool};
use crate::scene::Scene;
use crate::simple_element::SimpleElementRenderer;
use crate::stats::RenderStats;
use crate::technique::{DepthOnlyTechnique, ForwardTechnique, RenderTechnique};
use crate::view::ViewInfo;
use fly_core::math::LinearRgba;
use fly_core::renderer::{RenderError, RhiCommandList, RhiDevice};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::sync::Arc;

/// Settings of a [`RenderDevice`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderDeviceConfig {
    /// Lines thicker than this are drawn as camera-facing quads.
    pub line_thickness_threshold: f32,
    /// Maximum vertices per simple element draw call.
    pub max_dynamic_vertices: usize,
    /// Color of the material drawn when a material cannot be resolved.
    pub default_material_color: LinearRgba,
}

impl Default for RenderDeviceConfig {
    fn default() -> Self {
        Self {
            line_thickness_threshold: 0.0,
            max_dynamic_vertices: 4096,
            default_material_color: LinearRgba::MAGENTA,
        }
    }
}

/// Resources shared by every [`RenderContext`] of a device.
#[derive(Debug)]
pub struct RenderResources {
    /// Drawn in place of materials the technique cannot resolve.
    pub default_material: Arc<dyn Material>,
    /// Draws line batches.
    pub simple_elements: SimpleElementRenderer,
    /// Compiles and caches material programs.
    pub shader_library: Rc<ShaderLibrary>,
}

/// Owns an RHI device and the renderer resources tied to its lifetime.
///
/// Dropping the device destroys every pooled render target and every
/// compiled program.
#[derive(Debug)]
pub struct RenderDevice {
    rhi: Arc<dyn RhiDevice>,
    config: RenderDeviceConfig,
    render_target_pool: RenderTargetPool,
    resources: RenderResources,
}

impl RenderDevice {
    /// Creates the renderer resources for `rhi`.
    pub fn new(rhi: Arc<dyn RhiDevice>, config: RenderDeviceConfig) -> Self {
        let default_material: Arc<dyn Material> = Arc::new(SimpleMaterial::new(
            MaterialMaster::new("DefaultMaterial"),
            config.default_material_color,
        ));
        let resources = RenderResources {
            default_material,
            simple_elements: SimpleElementRenderer::new(
                config.line_thickness_threshold,
                config.max_dynamic_vertices,
            ),
            shader_library: Rc::new(ShaderLibrary::new(Arc::clone(&rhi))),
        };
        log::info!("RenderDevice: Created on the '{}' backend.", rhi.backend_name());
        Self {
            rhi,
            config,
            render_target_pool: RenderTargetPool::new(),
            resources,
        }
    }

    /// The RHI device.
    pub fn rhi(&self) -> &Arc<dyn RhiDevice> {
        &self.rhi
    }

    /// The settings the device was created with.
    pub fn config(&self) -> &RenderDeviceConfig {
        &self.config
    }

    /// The shared renderer resources.
    pub fn resources(&self) -> &RenderResources {
        &self.resources
    }

    /// The render target pool.
    pub fn render_target_pool(&self) -> &RenderTargetPool {
        &self.render_target_pool
    }

    /// The render target pool, mutably.
    pub fn render_target_pool_mut(&mut self) -> &mut RenderTargetPool {
        &mut self.render_target_pool
    }

    /// Fetches a render target from the pool.
    pub fn fetch_render_target(
        &mut self,
        desc: &RenderTargetDesc,
    ) -> Result<Rc<PooledRenderTarget>, RenderError> {
        Ok(self.render_target_pool.fetch_element(&*self.rhi, desc)?)
    }

    /// A forward technique compiling through the device's shader library.
    pub fn forward_technique(&self) -> ForwardTechnique {
        ForwardTechnique::new(Rc::clone(&self.resources.shader_library))
    }

    /// A depth-only technique compiling through the device's shader library.
    pub fn depth_only_technique(&self) -> DepthOnlyTechnique {
        DepthOnlyTechnique::new(Rc::clone(&self.resources.shader_library))
    }

    /// A new command list from the RHI device.
    pub fn create_command_list(&self) -> Box<dyn RhiCommandList> {
        self.rhi.create_command_list()
    }

    /// Records `scene` as seen from `view` into `cmd`.
    ///
    /// The scene must have been prepared for `view` with
    /// [`Scene::prepare_render`]. The bound program is cleared even when
    /// drawing fails.
    pub fn render_scene(
        &self,
        scene: &Scene,
        view: &ViewInfo,
        technique: &dyn RenderTechnique,
        cmd: &mut dyn RhiCommandList,
    ) -> Result<RenderStats, RenderError> {
        let mut ctx = RenderContext::new(cmd, view, technique, &self.resources);
        ctx.begin_render();
        let result = scene.render(&mut ctx);
        ctx.end_render();
        result.map(|()| ctx.stats())
    }
}

impl Drop for RenderDevice {
    fn drop(&mut self) {
        self.render_target_pool.release_rhi(&*self.rhi);
        self.resources.shader_library.release_rhi();
        log::debug!("RenderDevice: Released renderer resources.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fly_core::renderer::VertexFactoryType;
    use fly_infra::RecordingDevice;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: RenderDeviceConfig =
            serde_json::from_str(r#"{ "line_thickness_threshold": 0.05 }"#).unwrap();
        assert_eq!(config.line_thickness_threshold, 0.05);
        assert_eq!(config.max_dynamic_vertices, 4096);
        assert_eq!(config.default_material_color, LinearRgba::MAGENTA);
    }

    #[test]
    fn techniques_share_the_device_library() {
        let rhi = RecordingDevice::new();
        let device = RenderDevice::new(Arc::new(rhi.clone()), RenderDeviceConfig::default());
        let material = SimpleMaterial::new(MaterialMaster::new("Lit"), LinearRgba::WHITE);

        let forward = device.forward_technique();
        let depth = device.depth_only_technique();
        assert!(forward
            .get_material_shader(&material, VertexFactoryType::Static)
            .is_some());
        assert!(depth
            .get_material_shader(&material, VertexFactoryType::Static)
            .is_some());
        assert_eq!(device.resources().shader_library.num_cached(), 2);
        assert_eq!(rhi.stats().live_shader_programs, 2);

        drop(device);
        assert_eq!(rhi.stats().live_shader_programs, 0);
    }
}
