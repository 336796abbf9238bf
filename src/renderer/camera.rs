//! Follow camera and light uniforms

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

use crate::settings::Settings;

/// Directional light position; only its direction matters
pub const LIGHT_POSITION: Vec3 = Vec3::new(5.0, 10.0, 5.0);
/// Fraction of the base color kept in full shadow
pub const AMBIENT: f32 = 0.35;

/// Uniform block shared by the vertex and fragment stages
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Globals {
    pub view_proj: [[f32; 4]; 4], // offset 0
    pub light_dir: [f32; 4],      // offset 64, w unused
    pub ambient: [f32; 4],        // offset 80, x used
}

/// Perspective camera trailing the player at a fixed offset
#[derive(Debug, Clone, Copy)]
pub struct FollowCamera {
    /// Height above the player
    pub height: f32,
    /// Distance behind the player along +z
    pub distance: f32,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            height: 5.0,
            distance: 10.0,
            fov_y: 75f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl FollowCamera {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            height: settings.camera_height,
            distance: settings.camera_distance,
            ..Default::default()
        }
    }

    /// Eye position for a player at `target` (x, z)
    pub fn eye(&self, target: Vec2) -> Vec3 {
        Vec3::new(target.x, self.height, target.y + self.distance)
    }

    pub fn view_proj(&self, target: Vec2, aspect: f32) -> Mat4 {
        let look_at = Vec3::new(target.x, 0.0, target.y);
        let view = Mat4::look_at_rh(self.eye(target), look_at, Vec3::Y);
        let proj = Mat4::perspective_rh(self.fov_y, aspect.max(0.01), self.near, self.far);
        proj * view
    }

    pub fn globals(&self, target: Vec2, aspect: f32) -> Globals {
        let light = LIGHT_POSITION.normalize();
        Globals {
            view_proj: self.view_proj(target, aspect).to_cols_array_2d(),
            light_dir: [light.x, light.y, light.z, 0.0],
            ambient: [AMBIENT, 0.0, 0.0, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn project(m: Mat4, p: Vec3) -> Vec3 {
        let clip = m * Vec4::new(p.x, p.y, p.z, 1.0);
        clip.truncate() / clip.w
    }

    #[test]
    fn test_player_projects_to_screen_center() {
        let cam = FollowCamera::default();
        let target = Vec2::new(-3.0, 7.0);
        let ndc = project(cam.view_proj(target, 16.0 / 9.0), Vec3::new(-3.0, 0.0, 7.0));
        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_forward_is_up_on_screen() {
        // Moving forward (-z) should move the player away from the camera, up the screen
        let cam = FollowCamera::default();
        let m = cam.view_proj(Vec2::ZERO, 1.0);
        let ahead = project(m, Vec3::new(0.0, 0.0, -2.0));
        let right = project(m, Vec3::new(2.0, 0.0, 0.0));
        assert!(ahead.y > 0.0);
        assert!(right.x > 0.0);
    }

    #[test]
    fn test_eye_uses_settings_offset() {
        let settings = Settings {
            camera_height: 8.0,
            camera_distance: 4.0,
            ..Default::default()
        };
        let cam = FollowCamera::from_settings(&settings);
        assert_eq!(cam.eye(Vec2::new(1.0, 2.0)), Vec3::new(1.0, 8.0, 6.0));
    }

    #[test]
    fn test_globals_layout() {
        assert_eq!(std::mem::size_of::<Globals>(), 96);
        let g = FollowCamera::default().globals(Vec2::ZERO, 1.0);
        let l = Vec3::new(g.light_dir[0], g.light_dir[1], g.light_dir[2]);
        assert!((l.length() - 1.0).abs() < 1e-5);
    }
}
