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

use anyhow::{Context, Result};
use fly_core::ThreadPoolConfig;
use fly_render::RenderDeviceConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings of a sandbox run, read from an optional JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub frames: u32,
    pub work_items: u32,
    pub thread_pool: ThreadPoolConfig,
    pub render_device: RenderDeviceConfig,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            frames: 3,
            work_items: 1000,
            thread_pool: ThreadPoolConfig::default(),
            render_device: RenderDeviceConfig::default(),
        }
    }
}

impl SandboxConfig {
    /// Reads the config at `path`, or returns the defaults when there is none.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() -> Result<()> {
        let config: SandboxConfig =
            serde_json::from_str(r#"{ "frames": 10, "thread_pool": { "num_threads": 2 } }"#)?;
        assert_eq!(config.frames, 10);
        assert_eq!(config.work_items, 1000);
        assert_eq!(config.thread_pool.num_threads, 2);
        assert_eq!(config.render_device, RenderDeviceConfig::default());
        Ok(())
    }
}
