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

use crate::primitives::PrimitivesCollection;
use crate::view::ViewInfo;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to an object owned by a [`Scene`](super::Scene).
///
/// The scene holds one handle; the caller may keep another to mutate the
/// object or remove it later.
pub type SceneObjectHandle = Rc<RefCell<dyn SceneObject>>;

/// Something that lives in a scene and contributes draws to it.
pub trait SceneObject {
    /// Name used in logs and listener events.
    fn name(&self) -> &str;

    /// Advances the object by `delta_time` seconds.
    fn tick(&mut self, _delta_time: f32) {}

    /// Appends the draws that stay valid until the object reports
    /// [`needs_primitive_update`](Self::needs_primitive_update).
    fn get_primitives(&self, collection: &mut PrimitivesCollection);

    /// Appends draws regenerated for every view, such as debug overlays.
    fn get_dynamic_primitives(&self, _view: &ViewInfo, _collection: &mut PrimitivesCollection) {}

    /// Whether the draws from [`get_primitives`](Self::get_primitives) are out
    /// of date.
    fn needs_primitive_update(&self) -> bool {
        false
    }

    /// Called after the scene collected fresh primitives from the object.
    fn mark_primitives_updated(&mut self) {}
}
