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

use super::{SceneLight, SceneObjectHandle};

/// Receives removal notifications from a [`Scene`](super::Scene), letting
/// other systems unregister what they tracked for the removed entity.
pub trait SceneListener {
    /// Called before `object` is dropped by the scene.
    fn on_remove_object(&mut self, object: &SceneObjectHandle);

    /// Called before `light` is dropped by the scene.
    fn on_remove_light(&mut self, light: &SceneLight);
}

/// A removal, as published by [`ChannelSceneListener`].
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// An object left the scene.
    ObjectRemoved {
        /// The object's name.
        name: String,
    },
    /// A light left the scene.
    LightRemoved(SceneLight),
}

/// Forwards removals as [`SceneEvent`]s over a channel.
#[derive(Debug, Clone)]
pub struct ChannelSceneListener {
    sender: flume::Sender<SceneEvent>,
}

impl ChannelSceneListener {
    /// Creates the listener and the receiving end of its channel.
    pub fn new() -> (Self, flume::Receiver<SceneEvent>) {
        let (sender, receiver) = flume::unbounded();
        (Self { sender }, receiver)
    }

    fn publish(&self, event: SceneEvent) {
        if self.sender.send(event).is_err() {
            log::trace!("ChannelSceneListener: Receiver dropped, event discarded.");
        }
    }
}

impl SceneListener for ChannelSceneListener {
    fn on_remove_object(&mut self, object: &SceneObjectHandle) {
        let name = object.borrow().name().to_string();
        self.publish(SceneEvent::ObjectRemoved { name });
    }

    fn on_remove_light(&mut self, light: &SceneLight) {
        self.publish(SceneEvent::LightRemoved(*light));
    }
}
