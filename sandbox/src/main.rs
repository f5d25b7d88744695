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

mod config;
mod demo_scene;

use anyhow::{anyhow, Result};
use config::SandboxConfig;
use demo_scene::{Grid, SpinningCube};
use fly_core::math::{Extent2D, LinearRgba, Vec3, FRAC_PI_4};
use fly_core::renderer::TextureFormat;
use fly_core::QueueThreadPool;
use fly_infra::RecordingDevice;
use fly_render::{RenderDevice, RenderTargetDesc, Scene, SceneLight, ViewInfo};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const FRAME_TIME: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    fly_infra::logging::init_logger("info");

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = SandboxConfig::load(config_path.as_deref())?;
    log::info!("Sandbox config: {config:?}");

    run_workers(&config)?;
    run_frames(&config)?;
    Ok(())
}

fn run_workers(config: &SandboxConfig) -> Result<()> {
    let pool = QueueThreadPool::with_config(config.thread_pool.clone())?;
    let sum = Arc::new(AtomicU64::new(0));

    for i in 0..config.work_items as u64 {
        let sum = Arc::clone(&sum);
        pool.add_fn(move || {
            sum.fetch_add(i * i, Ordering::Relaxed);
        });
    }
    pool.wait_all_work_complete();

    log::info!(
        "Worker pool: {} items on {} threads, sum of squares = {}",
        config.work_items,
        pool.num_threads(),
        sum.load(Ordering::Relaxed)
    );
    Ok(())
}

fn run_frames(config: &SandboxConfig) -> Result<()> {
    let rhi = RecordingDevice::new();
    let mut device = RenderDevice::new(Arc::new(rhi.clone()), config.render_device.clone());
    let technique = device.forward_technique();

    let size = Extent2D::new(1280, 720);
    let view = ViewInfo::look_at(
        Vec3::new(4.0, 3.0, 6.0),
        Vec3::ZERO,
        Vec3::Y,
        FRAC_PI_4,
        size,
        0.1,
        100.0,
    )
    .ok_or_else(|| anyhow!("degenerate sandbox camera"))?;

    let mut scene = Scene::new();
    scene.add_object(Rc::new(RefCell::new(SpinningCube::new(&rhi, 1.5)?)))?;
    scene.add_object(Rc::new(RefCell::new(Grid::new(5))))?;
    scene.add_light(SceneLight::directional(
        Vec3::new(-1.0, -2.0, -1.0),
        LinearRgba::WHITE,
        1.0,
    ));
    scene.add_light(SceneLight::point(
        Vec3::new(0.0, 2.0, 0.0),
        8.0,
        LinearRgba::YELLOW,
        2.0,
    ));

    let color_desc = RenderTargetDesc::new(size, TextureFormat::Rgba8Unorm)
        .with_samples(4)
        .with_debug_name("SceneColor");
    let depth_desc = RenderTargetDesc::new(size, TextureFormat::Depth24Stencil8)
        .with_samples(4)
        .with_debug_name("SceneDepth");

    let mut cmd = device.create_command_list();
    for frame in 0..config.frames {
        scene.tick(FRAME_TIME);
        scene.prepare_render(&view);

        let color = device.fetch_render_target(&color_desc)?;
        let depth = device.fetch_render_target(&depth_desc)?;
        cmd.set_render_target(Some(color.texture()), Some(depth.texture()));
        cmd.clear(Some(LinearRgba::BLACK), Some(1.0));

        let stats = device.render_scene(&scene, &view, &technique, cmd.as_mut())?;
        log::info!(
            "Frame {frame}: {} draws, {} primitives, {} program binds",
            stats.draw_calls,
            stats.primitives,
            stats.program_binds
        );
        device.render_target_pool_mut().free_all_used_elements();
    }

    scene.remove_all();
    log::info!(
        "Render targets allocated: {}, device: {:?}",
        device.render_target_pool().num_allocated(),
        rhi.stats()
    );
    Ok(())
}
