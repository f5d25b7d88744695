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

//! Errors raised by the scene graph.

use thiserror::Error;

/// An error raised when the scene's ownership invariants would be violated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The object is already owned by the scene.
    #[error("object '{0}' is already part of the scene")]
    DuplicateObject(String),
    /// The object is not owned by the scene.
    #[error("object '{0}' is not part of the scene")]
    ObjectNotFound(String),
}
