//! Vertex and instance types for the cube renderer
//!
//! Every visible object (walls, floor, player, exit pad) is the same unit
//! cube, stretched and placed per instance.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::consts::{PLAYER_SIZE, PLAYER_Y};
use crate::sim::{GameState, LevelLayout};

/// Cube vertex with position and face normal
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Per-instance placement of the unit cube
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    pub offset: [f32; 3],
    pub scale: [f32; 3],
    pub color: [f32; 4],
}

impl InstanceData {
    pub fn new(offset: Vec3, scale: Vec3, color: [f32; 4]) -> Self {
        Self {
            offset: offset.to_array(),
            scale: scale.to_array(),
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const WALL: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
    pub const FLOOR: [f32; 4] = [0.12, 0.12, 0.15, 1.0];
    pub const PLAYER: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
    pub const EXIT: [f32; 4] = [0.2, 0.85, 0.35, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
}

/// Unit cube centered at the origin, 36 vertices (no index buffer)
pub fn cube_vertices() -> Vec<Vertex> {
    // (normal, u axis, v axis) per face; u x v = normal keeps CCW winding outward
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut vertices = Vec::with_capacity(36);
    for (n, u, v) in faces {
        let corner = |su: f32, sv: f32| Vertex {
            position: (n * 0.5 + u * (0.5 * su) + v * (0.5 * sv)).to_array(),
            normal: n.to_array(),
        };
        let (a, b, c, d) = (
            corner(-1.0, -1.0),
            corner(1.0, -1.0),
            corner(1.0, 1.0),
            corner(-1.0, 1.0),
        );
        vertices.extend_from_slice(&[a, b, c, a, c, d]);
    }
    vertices
}

/// Static instances of a level: the floor followed by every wall
pub fn level_instances(layout: &LevelLayout) -> Vec<InstanceData> {
    let cell = layout.cell_size;
    let span = layout.dimension() as f32 * cell;
    // Walls are centered on their cells, so the grid spans half a cell beyond offset
    let center = layout.offset + glam::Vec2::splat((span - cell) / 2.0);

    let mut instances = Vec::with_capacity(layout.walls.len() + 1);
    instances.push(InstanceData::new(
        Vec3::new(center.x, -0.05, center.y),
        Vec3::new(span, 0.1, span),
        colors::FLOOR,
    ));
    instances.extend(layout.walls.iter().map(|wall| {
        InstanceData::new(
            Vec3::new(wall.pos.x, cell / 2.0, wall.pos.y),
            Vec3::splat(cell),
            colors::WALL,
        )
    }));
    instances
}

/// Per-frame instances: the exit pad and the player cube
pub fn dynamic_instances(state: &GameState) -> [InstanceData; 2] {
    let exit = state.layout.exit_world();
    let pad = state.layout.cell_size * 0.8;
    [
        InstanceData::new(
            Vec3::new(exit.x, 0.02, exit.y),
            Vec3::new(pad, 0.04, pad),
            colors::EXIT,
        ),
        InstanceData::new(
            Vec3::new(state.player.pos.x, PLAYER_Y, state.player.pos.y),
            Vec3::splat(PLAYER_SIZE),
            colors::PLAYER,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_cube_is_closed_unit_box() {
        let vertices = cube_vertices();
        assert_eq!(vertices.len(), 36);
        for v in &vertices {
            for c in v.position {
                assert!(c.abs() <= 0.5 + 1e-6);
            }
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-6);
            // Vertex lies on the face its normal points out of
            assert!((Vec3::from_array(v.position).dot(n) - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_cube_winding_faces_outward() {
        let vertices = cube_vertices();
        for tri in vertices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|v| Vec3::from_array(v.position));
            let face_normal = (b - a).cross(c - a).normalize();
            assert!(face_normal.dot(Vec3::from_array(tri[0].normal)) > 0.99);
        }
    }

    #[test]
    fn test_level_instances_cover_walls() {
        let state = GameState::new(4, Tuning::default()).unwrap();
        let instances = level_instances(&state.layout);
        assert_eq!(instances.len(), state.layout.walls.len() + 1);

        // Floor spans the whole 5x5 grid, centered on its middle cell
        let floor = instances[0];
        assert_eq!(floor.scale[0], 10.0);
        assert!((floor.offset[0] + 1.0).abs() < 1e-6);

        // Walls sit on the floor
        for wall in &instances[1..] {
            assert_eq!(wall.offset[1], 1.0);
            assert_eq!(wall.scale, [2.0; 3]);
        }
    }

    #[test]
    fn test_dynamic_instances_follow_player() {
        let mut state = GameState::new(4, Tuning::default()).unwrap();
        state.player.pos = glam::Vec2::new(0.5, -2.5);
        let [exit, player] = dynamic_instances(&state);
        assert_eq!(player.offset, [0.5, PLAYER_Y, -2.5]);
        assert_eq!(exit.offset[0], state.layout.exit_world().x);
    }
}
