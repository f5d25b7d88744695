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

//! Backend-agnostic rendering contracts.
//!
//! This module is the boundary between the renderer and a graphics backend.
//! It contains the RHI traits ([`RhiDevice`], [`RhiCommandList`]), the
//! descriptors and opaque handles they exchange, and the error hierarchy.
//! Concrete backends live in `fly-infra`; the renderer in `fly-render` only
//! ever talks to these traits.

pub mod error;
pub mod traits;
pub mod types;

pub use self::error::{RenderError, ResourceError, ResourceKind, ShaderError};
pub use self::traits::{RhiCommandList, RhiDevice};
pub use self::types::*;
