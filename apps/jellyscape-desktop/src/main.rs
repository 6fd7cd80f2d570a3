use anyhow::{Context as _, Result};
use clap::Parser;
use egui::Context as EguiContext;
use jellyscape_assets::TextureStore;
use jellyscape_common::{MODE_ENV, RunMode, SceneConfig};
use jellyscape_input::{HostEvent, PointerButton};
use jellyscape_kernel::{SceneInit, SceneSlot, Tuning};
use jellyscape_render_wgpu::{GpuContext, Overlay, SceneRenderer, SurfaceStage};
use jellyscape_tools::{FrameStats, SceneInspector, SceneSummary};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{DeviceEvent, ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "jellyscape-desktop", about = "Jellyfish scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene configuration file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start with the diagnostic panel (also JELLYSCAPE_MODE=diagnostic)
    #[arg(long)]
    diagnostic: bool,
}

/// Paints a tessellated egui frame over the scene.
struct EguiOverlay<'a> {
    renderer: &'a mut egui_wgpu::Renderer,
    paint_jobs: &'a [egui::ClippedPrimitive],
    textures_delta: &'a egui::TexturesDelta,
    pixels_per_point: f32,
}

impl Overlay for EguiOverlay<'_> {
    fn draw(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
    ) {
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: self.pixels_per_point,
        };
        for (id, image_delta) in &self.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        self.renderer.update_buffers(
            device,
            queue,
            &mut encoder,
            self.paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.renderer
                .render(&mut pass, self.paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &self.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

/// Diagnostic side panel: live parameters and frame timing. Returns true when
/// the orbit reset was clicked.
fn draw_diagnostics(
    ctx: &EguiContext,
    tuning: &mut Tuning,
    summary: &SceneSummary,
    stats: &FrameStats,
) -> bool {
    let mut reset_orbit = false;
    egui::SidePanel::left("diagnostics")
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.heading("Jellyscape");
            ui.separator();
            ui.label(format!(
                "Frame {}  t={:.1}s  phase={:.3}",
                summary.frame_index,
                summary.elapsed_ms / 1000.0,
                summary.phase
            ));
            ui.label(format!(
                "Buffer: {}x{} @{:.2}  Sprites: {}",
                summary.buffer_size[0],
                summary.buffer_size[1],
                summary.pixel_ratio,
                summary.sprite_count
            ));
            let [x, y, z] = summary.camera_position;
            ui.label(format!("Camera: ({x:.2}, {y:.2}, {z:.2})"));
            ui.label(format!(
                "FPS: {:.0}  avg {:.2}ms  worst {:.2}ms",
                stats.fps(),
                stats.average_ms(),
                stats.worst_ms()
            ));
            ui.separator();

            ui.heading("Camera");
            ui.add(egui::Slider::new(&mut tuning.damping, 0.01..=1.0).text("damping"));
            ui.add(egui::Slider::new(&mut tuning.follow_extent, 0.0..=3.0).text("follow extent"));
            ui.heading("Creature");
            ui.add(
                egui::Slider::new(&mut tuning.phase_divisor_ms, 100.0..=6000.0)
                    .text("phase divisor (ms)"),
            );
            ui.add(egui::Slider::new(&mut tuning.pulse_amplitude, 0.0..=0.5).text("pulse"));
            ui.heading("Post");
            ui.add(egui::Slider::new(&mut tuning.vignette, 0.0..=1.0).text("vignette"));
            ui.add(egui::Slider::new(&mut tuning.grain, 0.0..=0.3).text("grain"));

            ui.separator();
            ui.horizontal(|ui| {
                ui.small("Right-drag: orbit");
                reset_orbit = ui.button("Reset orbit").clicked();
            });
        });
    reset_orbit
}

/// The one-time yes/no prompt. Returns the answer once one is clicked.
fn draw_prompt(ctx: &EguiContext) -> Option<bool> {
    let mut answer = None;
    egui::Window::new("Diagnostics")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label("Open the diagnostic panel?");
            ui.horizontal(|ui| {
                if ui.button("Yes").clicked() {
                    answer = Some(true);
                }
                if ui.button("No").clicked() {
                    answer = Some(false);
                }
            });
        });
    answer
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

struct Gpu {
    ctx: GpuContext,
    renderer: SceneRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct App {
    config: SceneConfig,
    mode: RunMode,
    textures: TextureStore,
    slot: SceneSlot,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    stats: FrameStats,
    prompt_open: bool,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(config: SceneConfig, mode: RunMode, textures: TextureStore) -> Self {
        Self {
            config,
            mode,
            textures,
            slot: SceneSlot::new(),
            window: None,
            gpu: None,
            egui_ctx: EguiContext::default(),
            stats: FrameStats::default(),
            prompt_open: false,
            failure: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Jellyscape")
            .with_inner_size(LogicalSize::new(1280.0, 720.0));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let scale = window.scale_factor();
        let size = window.inner_size().to_logical::<f32>(scale);
        let scene = self.slot.get_or_init(SceneInit::new(
            self.config.clone(),
            self.mode,
            size.width,
            size.height,
            scale as f32,
        ));

        let physical = window.inner_size();
        let ctx = GpuContext::new(window.clone(), physical.width, physical.height)?;
        let renderer =
            SceneRenderer::new(&ctx.device, &ctx.queue, ctx.format(), scene, &self.textures)?;

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(scale as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.format(), None, 1, false);

        self.gpu = Some(Gpu {
            ctx,
            renderer,
            egui_winit,
            egui_renderer,
        });
        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.failure = Some(err);
        event_loop.exit();
    }

    /// Feed the new window size to the scene, then bring the surface and
    /// offscreen target in line with it.
    fn resize(&mut self) {
        let (Some(window), Some(gpu), Some(scene)) =
            (&self.window, &mut self.gpu, self.slot.get_mut())
        else {
            return;
        };
        let scale = window.scale_factor();
        let physical = window.inner_size();
        let logical = physical.to_logical::<f32>(scale);
        gpu.ctx.resize(physical.width, physical.height);
        scene.handle_event(&HostEvent::Resized {
            width: logical.width,
            height: logical.height,
            pixel_ratio: scale as f32,
        });
        gpu.renderer.resize(&gpu.ctx.device, scene.target());
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(gpu), Some(scene)) =
            (&self.window, &mut self.gpu, self.slot.get_mut())
        else {
            return;
        };

        if scene.poll_prompt(Instant::now()) {
            self.prompt_open = true;
        }

        let diagnostic = scene.mode().is_diagnostic();
        let before = scene.tuning();
        let mut tuning = before;
        let summary = SceneInspector::summary(scene);
        let mut answer = None;
        let mut reset_orbit = false;

        let raw_input = gpu.egui_winit.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if diagnostic {
                reset_orbit = draw_diagnostics(ctx, &mut tuning, &summary, &self.stats);
            }
            if self.prompt_open {
                answer = draw_prompt(ctx);
            }
        });
        gpu.egui_winit
            .handle_platform_output(window, full_output.platform_output);

        if tuning != before {
            scene.apply_tuning(tuning);
        }
        if reset_orbit {
            scene.reset_orbit();
        }
        match answer {
            Some(true) => {
                self.prompt_open = false;
                scene.enter_diagnostic();
            }
            Some(false) => {
                self.prompt_open = false;
                tracing::info!("diagnostic prompt declined");
            }
            None => {}
        }

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let mut overlay = EguiOverlay {
            renderer: &mut gpu.egui_renderer,
            paint_jobs: &paint_jobs,
            textures_delta: &full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        };
        let mut stage = SurfaceStage::new(&gpu.ctx, &gpu.renderer).with_overlay(&mut overlay);

        match scene.frame(&mut stage) {
            Ok(()) => {
                self.stats.record(scene.clock().delta_ms());
                window.request_redraw();
            }
            Err(e) => {
                let err = anyhow::Error::new(e).context("frame loop halted");
                tracing::error!("{err:#}");
                self.failure = Some(err);
                event_loop.exit();
            }
        }
    }

    fn dispatch(&mut self, event: HostEvent) {
        if let Some(scene) = self.slot.get_mut() {
            scene.handle_event(&event);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e.context("startup failed"));
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(window), Some(gpu)) = (&self.window, &mut self.gpu) {
            let response = gpu.egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                self.resize();
            }
            WindowEvent::CursorMoved { position, .. } => {
                let Some(window) = &self.window else {
                    return;
                };
                let logical = position.to_logical::<f32>(window.scale_factor());
                self.dispatch(HostEvent::CursorMoved {
                    x: logical.x,
                    y: logical.y,
                });
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = pointer_button(button) {
                    self.dispatch(HostEvent::Button {
                        button,
                        pressed: state == ElementState::Pressed,
                    });
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.dispatch(HostEvent::Motion {
                dx: delta.0 as f32,
                dy: delta.1 as f32,
            });
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("jellyscape-desktop starting");

    let config = SceneConfig::load_or_default(cli.config.as_deref())?;
    config.validate()?;
    let mode = RunMode::resolve(cli.diagnostic, std::env::var(MODE_ENV).ok().as_deref());
    let textures = TextureStore::load_required(&config.asset_dir)
        .with_context(|| format!("loading textures from {}", config.asset_dir.display()))?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, mode, textures);
    event_loop.run_app(&mut app)?;

    if let Some(scene) = app.slot.get() {
        tracing::info!("{}", SceneInspector::summary(scene));
    }
    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
