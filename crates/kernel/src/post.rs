use crate::clock::Clock;
use crate::component::SceneComponent;
use crate::viewport::ViewportState;

/// Fullscreen post pass parameters: vignette, film grain, and a cold tint.
#[derive(Debug, Clone, PartialEq)]
pub struct PostEffect {
    /// Seconds since scene start; drives the grain pattern.
    pub time: f32,
    /// Buffer resolution in physical pixels.
    pub resolution: [f32; 2],
    pub vignette: f32,
    pub grain: f32,
    pub tint: [f32; 3],
}

impl PostEffect {
    pub fn new(viewport: &ViewportState) -> Self {
        let mut post = Self {
            time: 0.0,
            resolution: [1.0, 1.0],
            vignette: 0.45,
            grain: 0.06,
            tint: [0.85, 0.95, 1.1],
        };
        post.resize(viewport);
        post
    }
}

impl SceneComponent for PostEffect {
    fn resize(&mut self, viewport: &ViewportState) {
        let (w, h) = viewport.buffer_size();
        self.resolution = [w as f32, h as f32];
    }

    fn update(&mut self, clock: &Clock) {
        self.time = clock.elapsed_secs();
    }
}
