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

//! A flat scene graph producing the draws of a frame.

mod light;
mod listener;
mod object;

pub use self::light::{LightKind, SceneLight};
pub use self::listener::{ChannelSceneListener, SceneEvent, SceneListener};
pub use self::object::{SceneObject, SceneObjectHandle};

use crate::context::RenderContext;
use crate::error::SceneError;
use crate::primitives::{LineBatch, PrimitivesCollection};
use crate::view::ViewInfo;
use fly_core::renderer::RenderError;
use std::rc::Rc;

fn same_object(a: &SceneObjectHandle, b: &SceneObjectHandle) -> bool {
    // Addresses only, vtable pointers are not unique per type.
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

/// Owns the objects and lights of one 3D scene.
///
/// The draws objects report through [`SceneObject::get_primitives`] are
/// cached and only collected again after an object was removed or reported
/// [`SceneObject::needs_primitive_update`] during [`tick`](Self::tick).
/// Per-view draws are collected by [`prepare_render`](Self::prepare_render).
#[derive(Default)]
pub struct Scene {
    objects: Vec<SceneObjectHandle>,
    lights: Vec<SceneLight>,
    primitives: PrimitivesCollection,
    dynamic_primitives: PrimitivesCollection,
    pending_lines: Vec<LineBatch>,
    listener: Option<Box<dyn SceneListener>>,
    needs_primitive_update: bool,
    rebuild_count: usize,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the listener notified of removals, replacing any previous one.
    pub fn set_listener(&mut self, listener: Box<dyn SceneListener>) {
        self.listener = Some(listener);
    }

    /// Adds `object` and appends its primitives to the cache.
    ///
    /// ## Errors
    /// [`SceneError::DuplicateObject`] if the object is already in the scene.
    pub fn add_object(&mut self, object: SceneObjectHandle) -> Result<(), SceneError> {
        if self.objects.iter().any(|o| same_object(o, &object)) {
            return Err(SceneError::DuplicateObject(
                object.borrow().name().to_string(),
            ));
        }

        {
            let mut inner = object.borrow_mut();
            inner.get_primitives(&mut self.primitives);
            inner.mark_primitives_updated();
            log::debug!("Scene: Added object '{}'.", inner.name());
        }
        self.objects.push(object);
        Ok(())
    }

    /// Removes `object`, notifying the listener first. The cached primitives
    /// are rebuilt before returning, so the object is not drawn again.
    ///
    /// ## Returns
    /// The scene's handle to the object.
    ///
    /// ## Errors
    /// [`SceneError::ObjectNotFound`] if the object is not in the scene.
    pub fn remove_object(
        &mut self,
        object: &SceneObjectHandle,
    ) -> Result<SceneObjectHandle, SceneError> {
        let index = self
            .objects
            .iter()
            .position(|o| same_object(o, object))
            .ok_or_else(|| SceneError::ObjectNotFound(object.borrow().name().to_string()))?;

        if let Some(listener) = self.listener.as_mut() {
            listener.on_remove_object(object);
        }
        let removed = self.objects.remove(index);
        log::debug!("Scene: Removed object '{}'.", removed.borrow().name());
        self.rebuild_primitives();
        Ok(removed)
    }

    /// Adds a light.
    pub fn add_light(&mut self, light: SceneLight) {
        self.lights.push(light);
    }

    /// The lights of the scene.
    pub fn lights(&self) -> &[SceneLight] {
        &self.lights
    }

    /// Queues a line for the next [`prepare_render`](Self::prepare_render).
    pub fn add_debug_line(&mut self, line: LineBatch) {
        self.pending_lines.push(line);
    }

    /// The number of objects in the scene.
    pub fn num_objects(&self) -> usize {
        self.objects.len()
    }

    /// The cached primitives.
    pub fn primitives(&self) -> &PrimitivesCollection {
        &self.primitives
    }

    /// The primitives collected by the last [`prepare_render`](Self::prepare_render).
    pub fn dynamic_primitives(&self) -> &PrimitivesCollection {
        &self.dynamic_primitives
    }

    /// How many times the primitive cache was rebuilt from scratch.
    pub fn rebuild_count(&self) -> usize {
        self.rebuild_count
    }

    /// Ticks every object, then rebuilds the primitive cache if it is stale.
    pub fn tick(&mut self, delta_time: f32) {
        for object in &self.objects {
            let mut object = object.borrow_mut();
            object.tick(delta_time);
            if object.needs_primitive_update() {
                self.needs_primitive_update = true;
            }
        }

        if self.needs_primitive_update {
            self.rebuild_primitives();
        }
    }

    fn rebuild_primitives(&mut self) {
        self.primitives.clear();
        for object in &self.objects {
            let mut object = object.borrow_mut();
            object.get_primitives(&mut self.primitives);
            object.mark_primitives_updated();
        }
        self.needs_primitive_update = false;
        self.rebuild_count += 1;
        log::trace!(
            "Scene: Rebuilt {} mesh batches from {} objects.",
            self.primitives.mesh_batches.len(),
            self.objects.len()
        );
    }

    /// Collects the per-view primitives of every object and the queued debug
    /// lines.
    pub fn prepare_render(&mut self, view: &ViewInfo) {
        self.dynamic_primitives.clear();
        for object in &self.objects {
            object
                .borrow()
                .get_dynamic_primitives(view, &mut self.dynamic_primitives);
        }
        self.dynamic_primitives
            .lines
            .extend(self.pending_lines.drain(..));
    }

    /// Draws the cached primitives, then the dynamic ones.
    ///
    /// Must be called between [`RenderContext::begin_render`] and
    /// [`RenderContext::end_render`].
    pub fn render(&self, ctx: &mut RenderContext<'_>) -> Result<(), RenderError> {
        ctx.set_lights(&self.lights);
        self.primitives.draw(ctx)?;
        self.dynamic_primitives.draw(ctx)
    }

    /// Removes every object, then every light, notifying the listener of each.
    pub fn remove_all(&mut self) {
        let objects = std::mem::take(&mut self.objects);
        let lights = std::mem::take(&mut self.lights);
        if let Some(listener) = self.listener.as_mut() {
            for object in &objects {
                listener.on_remove_object(object);
            }
            for light in &lights {
                listener.on_remove_light(light);
            }
        }
        log::debug!(
            "Scene: Removed {} objects and {} lights.",
            objects.len(),
            lights.len()
        );

        self.primitives.clear();
        self.dynamic_primitives.clear();
        self.pending_lines.clear();
        self.needs_primitive_update = false;
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("objects", &self.objects.len())
            .field("lights", &self.lights.len())
            .field("mesh_batches", &self.primitives.mesh_batches.len())
            .field("needs_primitive_update", &self.needs_primitive_update)
            .finish()
    }
}
