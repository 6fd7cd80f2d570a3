use crate::context::GpuContext;
use crate::error::RenderError;
use crate::gpu::SceneRenderer;
use jellyscape_kernel::{RenderStage, Scene};

/// Extra drawing composited over the finished frame, before present.
pub trait Overlay {
    fn draw(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
    );
}

/// Render stage that acquires the next surface texture, draws the scene
/// into it, lets an optional overlay paint on top, and presents.
///
/// Lost or outdated surfaces are reconfigured and the frame skipped. A
/// timeout also skips the frame. Anything else is fatal.
pub struct SurfaceStage<'a> {
    gpu: &'a GpuContext,
    renderer: &'a SceneRenderer,
    overlay: Option<&'a mut dyn Overlay>,
}

impl<'a> SurfaceStage<'a> {
    pub fn new(gpu: &'a GpuContext, renderer: &'a SceneRenderer) -> Self {
        Self {
            gpu,
            renderer,
            overlay: None,
        }
    }

    pub fn with_overlay(mut self, overlay: &'a mut dyn Overlay) -> Self {
        self.overlay = Some(overlay);
        self
    }
}

impl RenderStage for SurfaceStage<'_> {
    type Error = RenderError;

    fn render(&mut self, scene: &Scene) -> Result<(), RenderError> {
        let output = match self.gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost or outdated, reconfiguring");
                self.gpu.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("surface timeout, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer
            .render(&self.gpu.device, &self.gpu.queue, &view, scene);

        if let Some(overlay) = self.overlay.as_deref_mut() {
            let (w, h) = self.gpu.size();
            overlay.draw(&self.gpu.device, &self.gpu.queue, &view, [w, h]);
        }

        output.present();
        Ok(())
    }
}
