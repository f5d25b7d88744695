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

//! # Fly Render
//!
//! The renderer built on top of the RHI contracts of `fly-core`.
//!
//! A frame goes through the following pieces:
//! - [`RenderDevice`] owns the RHI device and the long-lived renderer
//!   resources: the [`RenderTargetPool`], the [`ShaderLibrary`], the default
//!   material and the [`SimpleElementRenderer`].
//! - A [`Scene`] owns [`SceneObject`]s and [`SceneLight`]s and caches the
//!   static [`PrimitivesCollection`] they produce.
//! - A [`RenderContext`] binds a [`RenderTechnique`] and a [`ViewInfo`] to a
//!   command list and pushes material, world and view state while the scene
//!   draws its [`MeshBatch`]es and [`LineBatch`]es.
//!
//! Everything in this crate is render-thread-only.

#![warn(missing_docs)]

pub mod context;
pub mod device;
pub mod error;
pub mod material;
pub mod primitives;
pub mod render_target;
pub mod scene;
pub mod simple_element;
pub mod stats;
pub mod technique;
pub mod view;

pub use context::RenderContext;
pub use device::{RenderDevice, RenderDeviceConfig, RenderResources};
pub use error::SceneError;
pub use material::{
    Material, MaterialMaster, MaterialShaderProgram, ShaderLibrary, SimpleMaterial,
};
pub use primitives::{LineBatch, MeshBatch, MeshBatchElement, PrimitivesCollection};
pub use render_target::{PooledRenderTarget, RenderTargetDesc, RenderTargetPool};
pub use scene::{
    ChannelSceneListener, LightKind, Scene, SceneEvent, SceneLight, SceneListener, SceneObject,
    SceneObjectHandle,
};
pub use simple_element::{SimpleElementRenderer, SimpleElementVertex};
pub use stats::RenderStats;
pub use technique::{DepthOnlyTechnique, FixedFunctionTechnique, ForwardTechnique, RenderTechnique};
pub use view::ViewInfo;
