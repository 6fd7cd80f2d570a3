use crate::component::SceneComponent;
use crate::viewport::ViewportState;

/// Renderer-side sizing state: the drawable buffer size and pixel ratio
/// a backend configures its surface and offscreen targets with.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTarget {
    pub buffer_width: u32,
    pub buffer_height: u32,
    pub pixel_ratio: f32,
    pub clear_color: [f32; 4],
}

impl RenderTarget {
    pub fn new(viewport: &ViewportState) -> Self {
        let mut target = Self {
            buffer_width: 1,
            buffer_height: 1,
            pixel_ratio: 1.0,
            clear_color: [0.005, 0.02, 0.06, 1.0],
        };
        target.resize(viewport);
        target
    }
}

impl SceneComponent for RenderTarget {
    fn resize(&mut self, viewport: &ViewportState) {
        let (w, h) = viewport.buffer_size();
        self.buffer_width = w;
        self.buffer_height = h;
        self.pixel_ratio = viewport.pixel_ratio();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_follow_viewport() {
        let mut vp = ViewportState::new(2.0);
        vp.recompute(800.0, 600.0, 3.0);
        let target = RenderTarget::new(&vp);
        assert_eq!((target.buffer_width, target.buffer_height), (1600, 1200));
        assert_eq!(target.pixel_ratio, 2.0);
    }
}
