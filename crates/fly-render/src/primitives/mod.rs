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

//! Draw submissions produced by scene objects.
//!
//! [`MeshBatch`]es reference GPU buffers and materials owned elsewhere;
//! [`LineBatch`]es are plain values drawn by the simple element renderer.

mod collection;
mod line_batch;
mod mesh_batch;

pub use self::collection::PrimitivesCollection;
pub use self::line_batch::LineBatch;
pub use self::mesh_batch::{MeshBatch, MeshBatchElement};
