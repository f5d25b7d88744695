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

use anyhow::Result;
use fly_core::math::{Extent2D, Mat4};
use fly_core::renderer::*;
use fly_infra::{RecordingDevice, RhiCommand};

fn depth_desc() -> TextureDescriptor {
    TextureDescriptor {
        label: Some("SceneDepth".to_string()),
        size: Extent2D::new(128, 128),
        format: TextureFormat::Depth24Stencil8,
        sample_count: 1,
        mip_level_count: 1,
        flags: TextureCreationFlags::DEPTH_STENCIL,
    }
}

#[test]
fn destroying_unknown_handles_is_an_error() -> Result<()> {
    let device = RecordingDevice::new();
    let id = device.create_texture_depth(&depth_desc())?;

    device.destroy_texture(id)?;
    assert_eq!(device.destroy_texture(id), Err(ResourceError::InvalidHandle));
    assert_eq!(
        device.destroy_buffer(BufferId(99)),
        Err(ResourceError::InvalidHandle)
    );
    assert_eq!(
        device.destroy_shader_program(ShaderProgramId(3)),
        Err(ResourceError::InvalidHandle)
    );
    Ok(())
}

#[test]
fn injected_texture_failures_are_consumed() -> Result<()> {
    let device = RecordingDevice::new();
    device.fail_next_texture_creations(2);

    assert!(device.create_texture_depth(&depth_desc()).is_err());
    assert!(device.create_texture_depth(&depth_desc()).is_err());
    let id = device.create_texture_depth(&depth_desc())?;

    assert!(device.is_texture_alive(id));
    assert_eq!(device.stats().live_textures, 1);
    Ok(())
}

#[test]
fn shader_failures_are_per_master() -> Result<()> {
    let device = RecordingDevice::new();
    device.fail_shader_compilation("Broken");

    let mut desc = ShaderProgramDescriptor {
        label: "Broken/StaticMesh/Forward".to_string(),
        master: "Broken".to_string(),
        vertex_factory: VertexFactoryType::Static,
        pass: "Forward".to_string(),
        defines: Vec::new(),
    };
    let err = device.create_shader_program(&desc).unwrap_err();
    assert!(matches!(
        err,
        ResourceError::Shader(ShaderError::CompilationError { .. })
    ));

    desc.master = "Lit".to_string();
    let id = device.create_shader_program(&desc)?;
    assert_eq!(
        device.shader_program_descriptor(id).map(|d| d.master),
        Some("Lit".to_string())
    );
    Ok(())
}

#[test]
fn command_lists_share_the_device_log() {
    let device = RecordingDevice::new();
    let mut first = device.create_command_list();
    let mut second = device.create_command_list();

    // ACT
    first.load_fixed_world_view(&Mat4::IDENTITY);
    second.draw_primitive(PrimitiveTopology::TriangleStrip, 0, 2);

    // ASSERT
    assert_eq!(
        device.commands(),
        vec![
            RhiCommand::LoadFixedWorldView(Mat4::IDENTITY),
            RhiCommand::DrawPrimitive {
                topology: PrimitiveTopology::TriangleStrip,
                first_vertex: 0,
                num_primitives: 2,
            },
        ]
    );
    assert_eq!(device.take_commands().len(), 2);
    assert!(device.commands().is_empty());
    assert_eq!(device.stats().draw_calls, 1);
}
