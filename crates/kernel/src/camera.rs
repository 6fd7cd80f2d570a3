use glam::{Mat4, Quat, Vec2, Vec3};
use jellyscape_common::CameraConfig;

use crate::clock::Clock;
use crate::component::SceneComponent;
use crate::viewport::ViewportState;

/// Camera that drifts toward a cursor-driven target with exponential
/// smoothing, looking at a fixed point.
///
/// Smoothing is applied once per frame, not per unit time, so the drift
/// speed follows the frame rate. In diagnostic mode the eye can also be
/// orbited around the look-at point.
pub struct FollowCamera {
    pub position: Vec3,
    target: Vec3,
    base_position: Vec3,
    pub look_at: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub damping: f32,
    pub follow_extent: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub sensitivity: f32,
}

impl FollowCamera {
    pub fn new(config: &CameraConfig, damping: f32, follow_extent: f32) -> Self {
        Self {
            position: config.base_position,
            target: config.base_position,
            base_position: config.base_position,
            look_at: config.look_at,
            fov: config.fov_degrees.to_radians(),
            aspect: 16.0 / 9.0,
            near: config.near,
            far: config.far,
            damping,
            follow_extent,
            yaw: 0.0,
            pitch: 0.0,
            sensitivity: 0.005,
        }
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Aim at the rest position offset by the normalized cursor.
    /// Non-finite cursors (zero-size viewport) leave the target alone.
    pub fn set_cursor_target(&mut self, cursor: Vec2) {
        if !cursor.is_finite() {
            return;
        }
        self.target = self.base_position + cursor.extend(0.0) * self.follow_extent;
    }

    /// One smoothing step: cover `damping` of the remaining distance.
    pub fn follow(&mut self) {
        self.position += (self.target - self.position) * self.damping;
    }

    /// Orbit the eye around the look-at point.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * self.sensitivity;
        self.pitch -= dy * self.sensitivity;
        self.pitch = self.pitch.clamp(-80.0_f32.to_radians(), 80.0_f32.to_radians());
    }

    pub fn reset_orbit(&mut self) {
        self.yaw = 0.0;
        self.pitch = 0.0;
    }

    /// Eye position after applying the orbit around the look-at point.
    pub fn eye(&self) -> Vec3 {
        let orbit = Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch);
        self.look_at + orbit * (self.position - self.look_at)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.look_at, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl SceneComponent for FollowCamera {
    fn resize(&mut self, viewport: &ViewportState) {
        self.aspect = viewport.aspect();
    }

    fn update(&mut self, _clock: &Clock) {
        self.follow();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> FollowCamera {
        FollowCamera::new(&CameraConfig::default(), 0.5, 1.0)
    }

    #[test]
    fn starts_at_rest_position() {
        let cam = camera();
        assert_eq!(cam.position, CameraConfig::default().base_position);
        assert_eq!(cam.target(), cam.position);
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn follow_halves_remaining_distance_without_overshoot() {
        let mut cam = camera();
        cam.set_cursor_target(Vec2::new(1.5, -1.0));
        let target = cam.target();

        let mut remaining = (target - cam.position).length();
        for _ in 0..30 {
            let before = cam.position;
            cam.follow();
            let next = (target - cam.position).length();
            assert!((next - remaining * 0.5).abs() < 1e-5);
            // Each component moves toward the target and never passes it.
            for axis in 0..3 {
                let lo = before[axis].min(target[axis]);
                let hi = before[axis].max(target[axis]);
                assert!(cam.position[axis] >= lo - 1e-6 && cam.position[axis] <= hi + 1e-6);
            }
            remaining = next;
        }
        assert!(remaining < 1e-6);
    }

    #[test]
    fn cursor_offsets_scale_with_follow_extent() {
        let mut cam = FollowCamera::new(&CameraConfig::default(), 0.5, 2.0);
        cam.set_cursor_target(Vec2::new(1.0, 0.5));
        let base = CameraConfig::default().base_position;
        assert_eq!(cam.target(), base + Vec3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn non_finite_cursor_is_ignored() {
        let mut cam = camera();
        cam.set_cursor_target(Vec2::new(0.5, 0.5));
        let before = cam.target();
        cam.set_cursor_target(Vec2::new(f32::NAN, f32::INFINITY));
        assert_eq!(cam.target(), before);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut cam = camera();
        let mut vp = ViewportState::new(2.0);
        vp.recompute(800.0, 400.0, 1.0);
        cam.resize(&vp);
        assert_eq!(cam.aspect, 2.0);
    }

    #[test]
    fn orbit_keeps_distance_to_look_at() {
        let mut cam = camera();
        let dist = (cam.eye() - cam.look_at).length();
        cam.rotate(120.0, -40.0);
        assert!(((cam.eye() - cam.look_at).length() - dist).abs() < 1e-4);
        assert_ne!(cam.eye(), cam.position);
        cam.reset_orbit();
        assert!((cam.eye() - cam.position).length() < 1e-5);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = camera();
        cam.rotate(0.0, -100_000.0);
        assert!(cam.pitch <= 80.0_f32.to_radians() + 1e-6);
    }
}
