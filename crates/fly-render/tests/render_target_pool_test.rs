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

use anyhow::Result;
use fly_core::math::Extent2D;
use fly_core::renderer::{TextureCreationFlags, TextureFormat};
use fly_infra::RecordingDevice;
use fly_render::{RenderDevice, RenderDeviceConfig, RenderTargetDesc, RenderTargetPool};
use std::rc::Rc;
use std::sync::Arc;

fn scene_color() -> RenderTargetDesc {
    RenderTargetDesc::new(Extent2D::new(256, 256), TextureFormat::Rgba8Unorm)
}

#[test]
fn matching_requests_reuse_freed_targets() -> Result<()> {
    // --- ARRANGE ---
    let device = RecordingDevice::new();
    let mut pool = RenderTargetPool::new();

    // --- ACT ---
    let first = pool.fetch_element(&device, &scene_color())?;
    let second = pool.fetch_element(&device, &scene_color())?;
    pool.free_all_used_elements();
    let reused = pool.fetch_element(&device, &scene_color())?;

    // --- ASSERT ---
    assert!(!Rc::ptr_eq(&first, &second));
    assert_ne!(first.texture(), second.texture());
    assert!(Rc::ptr_eq(&reused, &first) || Rc::ptr_eq(&reused, &second));
    assert!(reused.desc().is_match(&scene_color()));
    assert_eq!(pool.num_allocated(), 2);
    assert_eq!(pool.num_used(), 1);
    assert_eq!(device.stats().textures_created, 2);
    Ok(())
}

#[test]
fn debug_names_do_not_prevent_reuse() -> Result<()> {
    // --- ARRANGE ---
    let device = RecordingDevice::new();
    let mut pool = RenderTargetPool::new();
    let target = pool.fetch_element(&device, &scene_color().with_debug_name("SceneColor"))?;
    pool.free_all_used_elements();
    assert_eq!(target.debug_name(), "");

    // --- ACT ---
    let reused = pool.fetch_element(&device, &scene_color().with_debug_name("PostProcess"))?;

    // --- ASSERT ---
    assert!(Rc::ptr_eq(&target, &reused));
    assert_eq!(reused.debug_name(), "PostProcess");
    assert_eq!(device.stats().textures_created, 1);
    Ok(())
}

#[test]
fn freeing_one_target_makes_it_reusable() -> Result<()> {
    // --- ARRANGE ---
    let device = RecordingDevice::new();
    let mut pool = RenderTargetPool::new();
    let target = pool.fetch_element(&device, &scene_color())?;

    // --- ACT ---
    let freed = pool.free_used_element(&target);
    let freed_twice = pool.free_used_element(&target);
    let reused = pool.fetch_element(&device, &scene_color())?;

    // --- ASSERT ---
    assert!(freed);
    assert!(!freed_twice);
    assert!(Rc::ptr_eq(&target, &reused));
    assert_eq!(pool.num_free(), 0);
    assert_eq!(pool.num_used(), 1);
    Ok(())
}

#[test]
fn mismatched_descriptors_allocate_new_targets() -> Result<()> {
    // --- ARRANGE ---
    let device = RecordingDevice::new();
    let mut pool = RenderTargetPool::new();
    let single = pool.fetch_element(&device, &scene_color())?;
    pool.free_all_used_elements();

    // --- ACT ---
    let msaa = pool.fetch_element(&device, &scene_color().with_samples(4))?;
    let float = pool.fetch_element(
        &device,
        &RenderTargetDesc::new(Extent2D::new(256, 256), TextureFormat::Rgba16Float),
    )?;
    let no_rt_bit = pool.fetch_element(
        &device,
        &scene_color().with_flags(TextureCreationFlags::SHADER_RESOURCE),
    )?;

    // --- ASSERT ---
    assert!(!Rc::ptr_eq(&single, &msaa));
    assert!(!Rc::ptr_eq(&single, &float));
    // The render-target bit is not part of the match.
    assert!(Rc::ptr_eq(&single, &no_rt_bit));
    assert!(msaa.is_multisampled());
    assert_ne!(msaa.shader_resource_texture(), msaa.texture());
    assert_eq!(pool.num_allocated(), 3);
    Ok(())
}

#[test]
fn dropping_the_render_device_releases_targets() -> Result<()> {
    // --- ARRANGE ---
    let rhi = RecordingDevice::new();
    let mut device = RenderDevice::new(Arc::new(rhi.clone()), RenderDeviceConfig::default());
    let color = device.fetch_render_target(&scene_color().with_samples(4))?;
    let depth = device.fetch_render_target(&RenderTargetDesc::new(
        Extent2D::new(256, 256),
        TextureFormat::Depth24Stencil8,
    ))?;
    assert_eq!(rhi.stats().live_textures, 3);

    // --- ACT ---
    drop(device);

    // --- ASSERT ---
    assert_eq!(rhi.stats().live_textures, 0);
    assert!(!rhi.is_texture_alive(color.texture()));
    assert!(!rhi.is_texture_alive(depth.texture()));
    Ok(())
}
