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

//! # Fly Infra
//!
//! Concrete implementations of the contracts defined in `fly-core`.
//!
//! The only graphics backend shipped here is the recording backend, a
//! software RHI that allocates handles, validates them and records every
//! command instead of driving a GPU. It is what the renderer's test suites
//! and the sandbox run against.

#![warn(missing_docs)]

pub mod graphics;
pub mod logging;

pub use graphics::recording::{DeviceStats, RecordingCommandList, RecordingDevice, RhiCommand};
