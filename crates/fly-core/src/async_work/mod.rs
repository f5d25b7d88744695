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

//! Queue-based worker pool for fire-and-forget background work.
//!
//! [`QueueThreadPool`] runs [`QueuedWork`] items on a fixed set of persistent
//! threads. Idle workers park on a private condition variable and are handed
//! work directly; when every worker is busy, work waits in a shared FIFO that
//! workers drain as they finish.

mod config;
mod error;
mod pool;
mod work;

pub use self::config::ThreadPoolConfig;
pub use self::error::AsyncError;
pub use self::pool::{QueueThreadPool, MAX_BATCH_DISPATCH};
pub use self::work::{FnWork, QueuedWork, WorkId};
