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

use anyhow::{anyhow, Result};
use fly_core::math::{Extent2D, LinearRgba, Mat4, Vec3, FRAC_PI_4};
use fly_core::renderer::{BufferId, IndexFormat, InputLayoutId, PrimitiveTopology};
use fly_infra::{RecordingDevice, RhiCommand};
use fly_render::{
    ChannelSceneListener, LineBatch, MeshBatch, MeshBatchElement, PrimitivesCollection,
    RenderDevice, RenderDeviceConfig, Scene, SceneError, SceneEvent, SceneLight, SceneObject,
    SceneObjectHandle, ViewInfo,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

struct Prop {
    name: String,
    world: Mat4,
    num_indices: u32,
    dirty: bool,
    ticks: u32,
    overlay: bool,
}

impl Prop {
    fn new(name: &str, num_indices: u32) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            name: name.to_string(),
            world: Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)),
            num_indices,
            dirty: false,
            ticks: 0,
            overlay: false,
        }))
    }
}

impl SceneObject for Prop {
    fn name(&self) -> &str {
        &self.name
    }

    fn tick(&mut self, _delta_time: f32) {
        self.ticks += 1;
    }

    fn get_primitives(&self, collection: &mut PrimitivesCollection) {
        collection.add_mesh_batch(
            MeshBatch::new(BufferId(1), InputLayoutId(0), None)
                .with_index_buffer(BufferId(2), IndexFormat::Uint16)
                .with_element(MeshBatchElement::new(self.world, self.num_indices)),
        );
    }

    fn get_dynamic_primitives(&self, _view: &ViewInfo, collection: &mut PrimitivesCollection) {
        if self.overlay {
            collection.add_line(LineBatch::new(
                self.world.translation(),
                self.world.translation() + Vec3::Y,
                LinearRgba::YELLOW,
            ));
        }
    }

    fn needs_primitive_update(&self) -> bool {
        self.dirty
    }

    fn mark_primitives_updated(&mut self) {
        self.dirty = false;
    }
}

fn test_view() -> Result<ViewInfo> {
    ViewInfo::look_at(
        Vec3::new(0.0, 0.0, 5.0),
        Vec3::ZERO,
        Vec3::Y,
        FRAC_PI_4,
        Extent2D::new(256, 256),
        0.1,
        100.0,
    )
    .ok_or_else(|| anyhow!("degenerate camera"))
}

#[test]
fn adding_the_same_object_twice_is_rejected() -> Result<()> {
    // --- ARRANGE ---
    let mut scene = Scene::new();
    let crate_prop = Prop::new("crate", 36);

    // --- ACT ---
    scene.add_object(crate_prop.clone())?;
    let second = scene.add_object(crate_prop.clone());

    // --- ASSERT ---
    assert_eq!(second, Err(SceneError::DuplicateObject("crate".to_string())));
    assert_eq!(scene.num_objects(), 1);
    assert_eq!(scene.primitives().mesh_batches.len(), 1);
    Ok(())
}

#[test]
fn remove_all_notifies_objects_then_lights() -> Result<()> {
    // --- ARRANGE ---
    let mut scene = Scene::new();
    let (listener, events) = ChannelSceneListener::new();
    scene.set_listener(Box::new(listener));
    scene.add_object(Prop::new("a", 3))?;
    let sun = SceneLight::directional(-Vec3::Y, LinearRgba::WHITE, 1.0);
    scene.add_light(sun);
    scene.add_object(Prop::new("b", 3))?;
    let lamp = SceneLight::point(Vec3::new(0.0, 2.0, 0.0), 10.0, LinearRgba::YELLOW, 2.0);
    scene.add_light(lamp);

    // --- ACT ---
    scene.remove_all();

    // --- ASSERT ---
    let received: Vec<SceneEvent> = events.try_iter().collect();
    assert_eq!(
        received,
        vec![
            SceneEvent::ObjectRemoved { name: "a".to_string() },
            SceneEvent::ObjectRemoved { name: "b".to_string() },
            SceneEvent::LightRemoved(sun),
            SceneEvent::LightRemoved(lamp),
        ]
    );
    assert_eq!(scene.num_objects(), 0);
    assert!(scene.lights().is_empty());
    assert!(scene.primitives().is_empty());
    Ok(())
}

#[test]
fn primitives_are_rebuilt_only_when_stale() -> Result<()> {
    // --- ARRANGE ---
    let mut scene = Scene::new();
    let first = Prop::new("first", 6);
    let second = Prop::new("second", 12);
    scene.add_object(first.clone())?;
    scene.add_object(second.clone())?;
    let primed = scene.primitives().num_mesh_elements();

    // --- ACT ---
    scene.tick(0.016);
    scene.tick(0.016);
    let rebuilds_while_clean = scene.rebuild_count();

    second.borrow_mut().num_indices = 24;
    second.borrow_mut().dirty = true;
    scene.tick(0.016);

    // --- ASSERT ---
    assert_eq!(rebuilds_while_clean, 0);
    assert_eq!(scene.rebuild_count(), 1);
    assert_eq!(first.borrow().ticks, 3);
    assert_eq!(scene.primitives().num_mesh_elements(), primed);
    let batches = &scene.primitives().mesh_batches;
    assert_eq!(batches[0].elements[0].num_elements, 6);
    assert_eq!(batches[1].elements[0].num_elements, 24);
    assert!(!second.borrow().dirty);
    Ok(())
}

#[test]
fn render_draws_static_batches_then_dynamic_lines() -> Result<()> {
    // --- ARRANGE ---
    let rhi = RecordingDevice::new();
    let device = RenderDevice::new(Arc::new(rhi.clone()), RenderDeviceConfig::default());
    let technique = device.forward_technique();
    let view = test_view()?;

    let mut scene = Scene::new();
    let prop = Prop::new("prop", 36);
    prop.borrow_mut().overlay = true;
    let handle: SceneObjectHandle = prop;
    scene.add_object(handle)?;
    scene.add_debug_line(LineBatch::new(Vec3::ZERO, Vec3::X, LinearRgba::RED).with_thickness(0.1));
    scene.tick(0.016);
    scene.prepare_render(&view);

    // --- ACT ---
    let mut cmd = rhi.recording_command_list();
    let stats = device.render_scene(&scene, &view, &technique, &mut cmd)?;

    // --- ASSERT ---
    let commands = rhi.take_commands();
    let draws: Vec<&RhiCommand> = commands.iter().filter(|c| c.is_draw()).collect();
    assert_eq!(draws.len(), 3);
    assert!(matches!(
        draws[0],
        RhiCommand::DrawIndexedPrimitive {
            topology: PrimitiveTopology::TriangleList,
            num_primitives: 12,
            ..
        }
    ));
    assert!(matches!(
        draws[1],
        RhiCommand::DrawPrimitiveUp {
            topology: PrimitiveTopology::LineList,
            num_primitives: 1,
            stride: 16,
            ..
        }
    ));
    assert!(matches!(
        draws[2],
        RhiCommand::DrawPrimitiveUp {
            topology: PrimitiveTopology::TriangleList,
            num_primitives: 2,
            ..
        }
    ));
    assert_eq!(commands.last(), Some(&RhiCommand::SetShaderProgram(None)));
    assert_eq!(stats.draw_calls, 3);
    assert_eq!(stats.primitives, 15);
    assert_eq!(stats.material_fallbacks, 1);
    Ok(())
}

#[test]
fn removed_object_is_not_drawn_without_a_tick() -> Result<()> {
    // --- ARRANGE ---
    let rhi = RecordingDevice::new();
    let device = RenderDevice::new(Arc::new(rhi.clone()), RenderDeviceConfig::default());
    let technique = device.forward_technique();
    let view = test_view()?;

    let mut scene = Scene::new();
    let a: SceneObjectHandle = Prop::new("a", 36);
    let b: SceneObjectHandle = Prop::new("b", 6);
    scene.add_object(a.clone())?;
    scene.add_object(b)?;

    // --- ACT ---
    scene.remove_object(&a)?;
    scene.prepare_render(&view);
    let mut cmd = rhi.recording_command_list();
    let stats = device.render_scene(&scene, &view, &technique, &mut cmd)?;

    // --- ASSERT ---
    assert_eq!(scene.num_objects(), 1);
    assert_eq!(scene.primitives().mesh_batches.len(), 1);
    let commands = rhi.take_commands();
    let draws: Vec<&RhiCommand> = commands.iter().filter(|c| c.is_draw()).collect();
    assert_eq!(draws.len(), 1);
    assert!(matches!(
        draws[0],
        RhiCommand::DrawIndexedPrimitive {
            num_primitives: 2,
            ..
        }
    ));
    assert_eq!(stats.draw_calls, 1);
    Ok(())
}
