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

use std::fmt;

/// An error raised while setting up a [`QueueThreadPool`](super::QueueThreadPool).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncError {
    /// The pool was asked for zero worker threads.
    InvalidThreadCount,
    /// The operating system refused to spawn a worker thread.
    SpawnFailed(String),
}

impl fmt::Display for AsyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsyncError::InvalidThreadCount => {
                write!(f, "A thread pool needs at least one worker thread.")
            }
            AsyncError::SpawnFailed(msg) => write!(f, "Failed to spawn worker thread: {msg}"),
        }
    }
}

impl std::error::Error for AsyncError {}
