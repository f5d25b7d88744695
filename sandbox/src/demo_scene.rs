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

//! A spinning cube and a ground grid.

use anyhow::Result;
use fly_core::math::{LinearRgba, Mat4, Vec3};
use fly_core::renderer::{
    BufferDescriptor, BufferId, BufferUsage, IndexFormat, InputLayoutDescriptor, InputLayoutId,
    RhiDevice, VertexAttribute, VertexFormat, VertexSemantic,
};
use fly_render::{
    LineBatch, Material, MaterialMaster, MeshBatch, MeshBatchElement, PrimitivesCollection,
    SceneObject, SimpleMaterial, ViewInfo,
};
use std::sync::Arc;

const CUBE_INDICES: u32 = 36;
const CUBE_VERTICES: u64 = 24;
const CUBE_STRIDE: u32 = 24;

pub struct SpinningCube {
    vertex_buffer: BufferId,
    index_buffer: BufferId,
    input_layout: InputLayoutId,
    material: Arc<dyn Material>,
    angle: f32,
    speed: f32,
}

impl SpinningCube {
    pub fn new(device: &dyn RhiDevice, speed: f32) -> Result<Self> {
        let vertex_buffer = device.create_buffer(
            &BufferDescriptor {
                label: Some("CubeVertices".to_string()),
                size: CUBE_VERTICES * CUBE_STRIDE as u64,
                usage: BufferUsage::Vertex,
                dynamic: false,
            },
            None,
        )?;
        let index_buffer = device.create_buffer(
            &BufferDescriptor {
                label: Some("CubeIndices".to_string()),
                size: CUBE_INDICES as u64 * 2,
                usage: BufferUsage::Index,
                dynamic: false,
            },
            None,
        )?;
        let input_layout = device.create_input_layout(&InputLayoutDescriptor {
            label: Some("PositionNormal".to_string()),
            stride: CUBE_STRIDE,
            attributes: vec![
                VertexAttribute {
                    semantic: VertexSemantic::Position,
                    format: VertexFormat::Float32x3,
                    offset: 0,
                },
                VertexAttribute {
                    semantic: VertexSemantic::Normal,
                    format: VertexFormat::Float32x3,
                    offset: 12,
                },
            ],
        })?;

        Ok(Self {
            vertex_buffer,
            index_buffer,
            input_layout,
            material: Arc::new(SimpleMaterial::new(
                MaterialMaster::new("Lit"),
                LinearRgba::rgb(0.8, 0.4, 0.1),
            )),
            angle: 0.0,
            speed,
        })
    }

    fn world(&self) -> Mat4 {
        Mat4::from_rotation_y(self.angle)
    }
}

impl SceneObject for SpinningCube {
    fn name(&self) -> &str {
        "SpinningCube"
    }

    fn tick(&mut self, delta_time: f32) {
        self.angle += self.speed * delta_time;
    }

    fn get_primitives(&self, collection: &mut PrimitivesCollection) {
        collection.add_mesh_batch(
            MeshBatch::new(
                self.vertex_buffer,
                self.input_layout,
                Some(Arc::clone(&self.material)),
            )
            .with_index_buffer(self.index_buffer, IndexFormat::Uint16)
            .with_element(MeshBatchElement::new(self.world(), CUBE_INDICES)),
        );
    }

    fn get_dynamic_primitives(&self, _view: &ViewInfo, collection: &mut PrimitivesCollection) {
        // Local axes.
        let world = self.world();
        let origin = world.transform_point(Vec3::ZERO);
        for (axis, color) in [
            (Vec3::X, LinearRgba::RED),
            (Vec3::Y, LinearRgba::GREEN),
            (Vec3::Z, LinearRgba::BLUE),
        ] {
            collection.add_line(LineBatch::new(origin, world.transform_point(axis), color));
        }
    }

    fn needs_primitive_update(&self) -> bool {
        self.speed != 0.0
    }
}

/// A flat grid of thick lines, static once added.
pub struct Grid {
    half_extent: i32,
}

impl Grid {
    pub fn new(half_extent: i32) -> Self {
        Self { half_extent }
    }
}

impl SceneObject for Grid {
    fn name(&self) -> &str {
        "Grid"
    }

    fn get_primitives(&self, collection: &mut PrimitivesCollection) {
        let n = self.half_extent as f32;
        for i in -self.half_extent..=self.half_extent {
            let t = i as f32;
            let color = if i == 0 { LinearRgba::WHITE } else { LinearRgba::rgb(0.3, 0.3, 0.3) };
            collection.add_line(
                LineBatch::new(Vec3::new(t, 0.0, -n), Vec3::new(t, 0.0, n), color).with_thickness(0.02),
            );
            collection.add_line(
                LineBatch::new(Vec3::new(-n, 0.0, t), Vec3::new(n, 0.0, t), color).with_thickness(0.02),
            );
        }
    }
}
