//! WebGPU rendering module
//!
//! Draws every object as an instance of one lit unit cube.

pub mod camera;
pub mod mesh;
pub mod scene_pipeline;

pub use camera::FollowCamera;
pub use scene_pipeline::SceneRenderState;
