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

//! Per-view rendering statistics.

/// Counters accumulated by a [`RenderContext`](crate::RenderContext) while a
/// view is recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// The number of draw calls recorded.
    pub draw_calls: u32,
    /// The total number of primitives submitted.
    pub primitives: u64,
    /// How many times a shader program was bound.
    pub program_binds: u32,
    /// How many material binds fell back to the default material.
    pub material_fallbacks: u32,
}

impl RenderStats {
    pub(crate) fn record_draw(&mut self, num_primitives: u32) {
        self.draw_calls += 1;
        self.primitives += num_primitives as u64;
    }
}
