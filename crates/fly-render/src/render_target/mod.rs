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

//! Pooled render targets.
//!
//! Render targets are expensive to allocate, and most of them are needed
//! with the same size and format every frame. The [`RenderTargetPool`] keeps
//! the textures alive between uses and hands them back out to any request
//! whose [`RenderTargetDesc`] matches.

mod desc;
mod pool;

pub use self::desc::RenderTargetDesc;
pub use self::pool::{PooledRenderTarget, RenderTargetPool};
