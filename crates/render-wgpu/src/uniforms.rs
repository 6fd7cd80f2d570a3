//! GPU-layout mirrors of the kernel state, built fresh every frame.

use bytemuck::{Pod, Zeroable};
use jellyscape_kernel::{FollowCamera, LightRig, Particle, ParticleField, PostEffect, Creature};

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
    pub right: [f32; 4],
    pub up: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &FollowCamera) -> Self {
        let view = camera.view_matrix();
        // Rows of the view rotation are the camera axes in world space.
        let right = view.row(0).truncate();
        let up = view.row(1).truncate();
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            eye: camera.eye().extend(1.0).to_array(),
            right: right.extend(0.0).to_array(),
            up: up.extend(0.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LightsUniform {
    pub ambient: [f32; 4],
    pub key_dir: [f32; 4],
    pub key_color: [f32; 4],
    pub rim_dir: [f32; 4],
    pub rim_color: [f32; 4],
}

impl From<&LightRig> for LightsUniform {
    fn from(rig: &LightRig) -> Self {
        Self {
            ambient: rig.ambient,
            key_dir: rig.key_direction.extend(0.0).to_array(),
            key_color: rig.key_color,
            rim_dir: rig.rim_direction.extend(0.0).to_array(),
            rim_color: rig.rim_color,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MaterialUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub glow: [f32; 4],
    pub params: [f32; 4],
}

impl From<&Creature> for MaterialUniform {
    fn from(creature: &Creature) -> Self {
        Self {
            model: creature.transform.matrix().to_cols_array_2d(),
            color: creature.bell_color,
            glow: creature.glow_color,
            params: [
                creature.phase,
                creature.pulse_amplitude,
                creature.tentacle_length,
                creature.bell_radius,
            ],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SpriteUniform {
    pub color: [f32; 4],
    pub params: [f32; 4],
}

impl SpriteUniform {
    pub fn motes(field: &ParticleField) -> Self {
        Self {
            color: field.mote_color,
            params: [field.phase, field.extent.y, 0.0, 0.0],
        }
    }

    pub fn bubbles(field: &ParticleField) -> Self {
        Self {
            color: field.bubble_color,
            params: [field.phase, field.extent.y, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub center: [f32; 3],
    pub size: f32,
    pub speed: f32,
    pub offset: f32,
}

impl From<&Particle> for SpriteInstance {
    fn from(p: &Particle) -> Self {
        Self {
            center: p.position.to_array(),
            size: p.size,
            speed: p.speed,
            offset: p.offset,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PostUniform {
    pub resolution: [f32; 4],
    pub params: [f32; 4],
    pub tint: [f32; 4],
}

impl From<&PostEffect> for PostUniform {
    fn from(post: &PostEffect) -> Self {
        let [w, h] = post.resolution;
        Self {
            resolution: [w, h, 1.0 / w.max(1.0), 1.0 / h.max(1.0)],
            params: [post.time, post.vignette, post.grain, 0.0],
            tint: [post.tint[0], post.tint[1], post.tint[2], 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jellyscape_common::CameraConfig;
    use jellyscape_kernel::ViewportState;

    #[test]
    fn uniform_sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 112);
        assert_eq!(std::mem::size_of::<LightsUniform>(), 80);
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 112);
        assert_eq!(std::mem::size_of::<SpriteUniform>(), 32);
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 24);
        assert_eq!(std::mem::size_of::<PostUniform>(), 48);
    }

    #[test]
    fn camera_axes_are_orthonormal() {
        let cam = FollowCamera::new(&CameraConfig::default(), 0.5, 1.0);
        let u = CameraUniform::from_camera(&cam);
        let right = glam::Vec4::from_array(u.right).truncate();
        let up = glam::Vec4::from_array(u.up).truncate();
        assert!((right.length() - 1.0).abs() < 1e-5);
        assert!((up.length() - 1.0).abs() < 1e-5);
        assert!(right.dot(up).abs() < 1e-5);
        // Default camera looks down -Z, so right is +X.
        assert!((right.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn material_carries_phase() {
        let mut creature = Creature::new(1500.0);
        creature.phase = 3.25;
        let m = MaterialUniform::from(&creature);
        assert_eq!(m.params[0], 3.25);
        assert_eq!(m.params[3], creature.bell_radius);
    }

    #[test]
    fn post_uniform_inverts_resolution() {
        let mut vp = ViewportState::new(2.0);
        vp.recompute(400.0, 200.0, 1.0);
        let post = PostEffect::new(&vp);
        let u = PostUniform::from(&post);
        assert_eq!(u.resolution, [400.0, 200.0, 1.0 / 400.0, 1.0 / 200.0]);
    }
}
