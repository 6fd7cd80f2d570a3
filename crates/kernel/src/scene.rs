use jellyscape_common::{RunMode, SceneConfig};
use jellyscape_input::{HostEvent, PointerState};
use std::time::{Duration, Instant};

use crate::camera::FollowCamera;
use crate::clock::Clock;
use crate::component::SceneComponent;
use crate::post::PostEffect;
use crate::prompt::PromptTimer;
use crate::target::RenderTarget;
use crate::viewport::ViewportState;
use crate::world::World;

/// The render step of the frame pipeline.
///
/// Implementations read the scene and draw it; they never mutate it. An
/// error ends the frame loop.
pub trait RenderStage {
    type Error;

    fn render(&mut self, scene: &Scene) -> Result<(), Self::Error>;
}

/// Startup parameters for a [`Scene`].
#[derive(Debug, Clone)]
pub struct SceneInit {
    pub config: SceneConfig,
    pub mode: RunMode,
    /// Logical drawable width in pixels.
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
    pub start: Instant,
}

impl SceneInit {
    pub fn new(
        config: SceneConfig,
        mode: RunMode,
        width: f32,
        height: f32,
        pixel_ratio: f32,
    ) -> Self {
        Self {
            config,
            mode,
            width,
            height,
            pixel_ratio,
            start: Instant::now(),
        }
    }
}

/// Whether the host should keep scheduling frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// A frame failed. No further frames run.
    Halted,
}

/// Live-tweakable subset of the configuration, edited from the
/// diagnostic panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub damping: f32,
    pub phase_divisor_ms: f64,
    pub follow_extent: f32,
    pub pulse_amplitude: f32,
    pub vignette: f32,
    pub grain: f32,
}

/// Composition root: owns the clock, viewport, camera, render target, post
/// effect, and world, and runs resize propagation and the frame pipeline.
pub struct Scene {
    config: SceneConfig,
    mode: RunMode,
    clock: Clock,
    viewport: ViewportState,
    camera: FollowCamera,
    target: RenderTarget,
    post: PostEffect,
    world: World,
    prompt: PromptTimer,
    pointer: PointerState,
    loop_state: LoopState,
    frame_index: u64,
}

impl Scene {
    pub fn new(init: SceneInit) -> Self {
        let SceneInit {
            mut config,
            mode,
            width,
            height,
            pixel_ratio,
            start,
        } = init;

        config.damping = clamp_damping(config.damping);
        config.phase_divisor_ms = clamp_divisor(config.phase_divisor_ms);

        let clock = Clock::starting_at(start);

        let mut viewport = ViewportState::new(config.max_pixel_ratio);
        viewport.recompute(width, height, pixel_ratio);

        let mut camera = FollowCamera::new(&config.camera, config.damping, config.follow_extent);
        camera.resize(&viewport);

        let target = RenderTarget::new(&viewport);
        let post = PostEffect::new(&viewport);
        let world = World::new(&config);
        let prompt = PromptTimer::new(mode, Duration::from_secs(config.prompt_delay_secs), start);

        tracing::info!(
            %mode,
            width,
            height,
            pixel_ratio = viewport.pixel_ratio(),
            particles = world.particles.len(),
            "scene constructed"
        );

        Self {
            config,
            mode,
            clock,
            viewport,
            camera,
            target,
            post,
            world,
            prompt,
            pointer: PointerState::new(),
            loop_state: LoopState::Running,
            frame_index: 0,
        }
    }

    /// Run one frame at the current instant.
    pub fn frame<R: RenderStage>(&mut self, renderer: &mut R) -> Result<(), R::Error> {
        self.frame_at(Instant::now(), renderer)
    }

    /// Run one frame: clock, camera follow, render, post uniforms, world.
    ///
    /// A failed render halts the loop; frames requested afterwards do nothing.
    pub fn frame_at<R: RenderStage>(
        &mut self,
        now: Instant,
        renderer: &mut R,
    ) -> Result<(), R::Error> {
        if self.loop_state == LoopState::Halted {
            return Ok(());
        }
        let _span = tracing::debug_span!("frame", index = self.frame_index).entered();

        self.clock.update_at(now);
        self.camera.update(&self.clock);

        if let Err(e) = renderer.render(self) {
            self.loop_state = LoopState::Halted;
            tracing::error!(frame = self.frame_index, "render failed, halting frame loop");
            return Err(e);
        }

        self.post.update(&self.clock);
        self.world.update(&self.clock);
        self.frame_index += 1;
        Ok(())
    }

    /// Propagate new dimensions: viewport, camera, render target (and the
    /// post pass buffers it owns), then refresh the world once so a static
    /// frame reflects the new size.
    pub fn resize(&mut self, width: f32, height: f32, pixel_ratio: f32) {
        self.viewport.recompute(width, height, pixel_ratio);
        self.camera.resize(&self.viewport);
        self.target.resize(&self.viewport);
        self.post.resize(&self.viewport);
        self.world.update(&self.clock);
        tracing::debug!(
            width,
            height,
            buffer_width = self.target.buffer_width,
            buffer_height = self.target.buffer_height,
            "scene resized"
        );
    }

    /// Track the cursor and retarget the camera.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.viewport.update_cursor(x, y);
        self.camera.set_cursor_target(self.viewport.cursor());
    }

    /// Dispatch a host event. Orbit dragging only responds in diagnostic mode.
    pub fn handle_event(&mut self, event: &HostEvent) {
        self.pointer.apply(event);
        match *event {
            HostEvent::Resized {
                width,
                height,
                pixel_ratio,
            } => self.resize(width, height, pixel_ratio),
            HostEvent::CursorMoved { x, y } => self.pointer_moved(x, y),
            HostEvent::Motion { dx, dy } => {
                if self.mode.is_diagnostic() && self.pointer.dragging() {
                    self.camera.rotate(dx, dy);
                }
            }
            HostEvent::Button { .. } => {}
        }
    }

    /// Return the diagnostic orbit to the unrotated view.
    pub fn reset_orbit(&mut self) {
        self.camera.reset_orbit();
    }

    /// True exactly once, when the diagnostic-mode prompt is due.
    pub fn poll_prompt(&mut self, now: Instant) -> bool {
        self.prompt.poll(now)
    }

    /// One-way switch into diagnostic mode, taken when the prompt is accepted.
    pub fn enter_diagnostic(&mut self) {
        if self.mode == RunMode::Diagnostic {
            return;
        }
        self.mode = RunMode::Diagnostic;
        self.prompt.disarm();
        tracing::info!("switched to diagnostic mode");
    }

    pub fn tuning(&self) -> Tuning {
        Tuning {
            damping: self.camera.damping,
            phase_divisor_ms: self.world.creature.phase_divisor_ms,
            follow_extent: self.camera.follow_extent,
            pulse_amplitude: self.world.creature.pulse_amplitude,
            vignette: self.post.vignette,
            grain: self.post.grain,
        }
    }

    /// Push edited parameters into the owning components. Out-of-range
    /// damping and divisor values are clamped to something usable.
    pub fn apply_tuning(&mut self, tuning: Tuning) {
        self.camera.damping = clamp_damping(tuning.damping);
        self.camera.follow_extent = tuning.follow_extent;
        self.world.set_phase_divisor(clamp_divisor(tuning.phase_divisor_ms));
        self.world.creature.pulse_amplitude = tuning.pulse_amplitude;
        self.post.vignette = tuning.vignette;
        self.post.grain = tuning.grain;
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn camera(&self) -> &FollowCamera {
        &self.camera
    }


    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    pub fn post(&self) -> &PostEffect {
        &self.post
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

fn clamp_damping(damping: f32) -> f32 {
    damping.clamp(0.01, 1.0)
}

fn clamp_divisor(divisor_ms: f64) -> f64 {
    divisor_ms.max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jellyscape_input::PointerButton;
    use std::convert::Infallible;

    /// Records what the scene looked like at render time.
    #[derive(Default)]
    struct Recorder {
        renders: usize,
        seen_phase: Vec<f32>,
        seen_post_time: Vec<f32>,
        fail_on: Option<usize>,
    }

    impl RenderStage for Recorder {
        type Error = String;

        fn render(&mut self, scene: &Scene) -> Result<(), String> {
            self.renders += 1;
            self.seen_phase.push(scene.world().phase());
            self.seen_post_time.push(scene.post().time);
            if self.fail_on == Some(self.renders) {
                return Err("context lost".into());
            }
            Ok(())
        }
    }

    struct Nop;

    impl RenderStage for Nop {
        type Error = Infallible;

        fn render(&mut self, _scene: &Scene) -> Result<(), Infallible> {
            Ok(())
        }
    }

    fn init(mode: RunMode) -> SceneInit {
        SceneInit::new(SceneConfig::default(), mode, 800.0, 600.0, 1.0)
    }

    #[test]
    fn end_to_end_single_frame() {
        let init = init(RunMode::Normal);
        let t0 = init.start;
        let mut scene = Scene::new(init);

        scene
            .frame_at(t0 + Duration::from_millis(16), &mut Nop)
            .unwrap();

        let clock = scene.clock();
        assert!(clock.delta_ms() >= 0.0);
        let expected = (clock.elapsed_ms() / 1500.0) as f32;
        assert_eq!(scene.world().creature.phase, expected);
        assert_eq!(scene.world().particles.phase, expected);
        assert_eq!(scene.frame_index(), 1);
    }

    #[test]
    fn real_time_frame_runs() {
        let mut scene = Scene::new(init(RunMode::Normal));
        scene.frame(&mut Nop).unwrap();
        assert!(scene.clock().delta_ms() >= 0.0);
        assert_eq!(
            scene.world().phase(),
            (scene.clock().elapsed_ms() / 1500.0) as f32
        );
    }

    #[test]
    fn render_sees_previous_frame_uniforms() {
        let init = init(RunMode::Normal);
        let t0 = init.start;
        let mut scene = Scene::new(init);
        let mut recorder = Recorder::default();

        scene.frame_at(t0 + Duration::from_millis(1500), &mut recorder).unwrap();
        scene.frame_at(t0 + Duration::from_millis(3000), &mut recorder).unwrap();

        // Post and world update after the render step.
        assert_eq!(recorder.seen_phase, vec![0.0, 1.0]);
        assert_eq!(recorder.seen_post_time, vec![0.0, 1.5]);
        assert!((scene.world().phase() - 2.0).abs() < 1e-6);
        assert!((scene.post().time - 3.0).abs() < 1e-6);
    }

    #[test]
    fn camera_follows_cursor_each_frame() {
        let init = init(RunMode::Normal);
        let t0 = init.start;
        let mut scene = Scene::new(init);
        let base = scene.camera().position;

        scene.pointer_moved(800.0, 0.0);
        let target = scene.camera().target();
        assert!((target.x - (base.x + 1.5)).abs() < 1e-6);
        assert!((target.y - (base.y + 1.0)).abs() < 1e-6);

        scene.frame_at(t0 + Duration::from_millis(16), &mut Nop).unwrap();
        let halfway = base + (target - base) * 0.5;
        assert!((scene.camera().position - halfway).length() < 1e-6);
    }

    #[test]
    fn failed_render_halts_loop() {
        let init = init(RunMode::Normal);
        let t0 = init.start;
        let mut scene = Scene::new(init);
        let mut recorder = Recorder {
            fail_on: Some(2),
            ..Recorder::default()
        };

        scene.frame_at(t0 + Duration::from_millis(16), &mut recorder).unwrap();
        let err = scene.frame_at(t0 + Duration::from_millis(32), &mut recorder);
        assert_eq!(err, Err("context lost".to_string()));
        assert_eq!(scene.loop_state(), LoopState::Halted);

        let phase = scene.world().phase();
        scene.frame_at(t0 + Duration::from_millis(48), &mut recorder).unwrap();
        assert_eq!(recorder.renders, 2);
        assert_eq!(scene.world().phase(), phase);
        assert_eq!(scene.frame_index(), 1);
    }

    #[test]
    fn resize_is_idempotent() {
        let mut scene = Scene::new(init(RunMode::Normal));

        scene.resize(1024.0, 768.0, 3.0);
        let aspect = scene.camera().aspect;
        let target = scene.target().clone();
        assert_eq!((target.buffer_width, target.buffer_height), (2048, 1536));

        scene.resize(1024.0, 768.0, 3.0);
        assert_eq!(scene.camera().aspect, aspect);
        assert_eq!(scene.target(), &target);
        assert_eq!(scene.post().resolution, [2048.0, 1536.0]);
    }

    #[test]
    fn resize_refreshes_world_from_clock() {
        let init = init(RunMode::Normal);
        let t0 = init.start;
        let mut scene = Scene::new(init);
        scene.frame_at(t0 + Duration::from_millis(3000), &mut Nop).unwrap();
        scene.resize(640.0, 480.0, 1.0);
        assert!((scene.world().phase() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn handle_event_dispatches_resize_and_cursor() {
        let mut scene = Scene::new(init(RunMode::Normal));
        scene.handle_event(&HostEvent::Resized {
            width: 400.0,
            height: 200.0,
            pixel_ratio: 1.0,
        });
        assert_eq!(scene.viewport().width(), 400.0);
        assert_eq!(scene.camera().aspect, 2.0);

        scene.handle_event(&HostEvent::CursorMoved { x: 0.0, y: 100.0 });
        assert_eq!(scene.viewport().cursor().x, -1.5);
    }

    #[test]
    fn orbit_drag_only_in_diagnostic_mode() {
        let drag = [
            HostEvent::Button {
                button: PointerButton::Secondary,
                pressed: true,
            },
            HostEvent::Motion { dx: 50.0, dy: 0.0 },
        ];

        let mut normal = Scene::new(init(RunMode::Normal));
        for e in &drag {
            normal.handle_event(e);
        }
        assert_eq!(normal.camera().yaw, 0.0);

        let mut diagnostic = Scene::new(init(RunMode::Diagnostic));
        for e in &drag {
            diagnostic.handle_event(e);
        }
        assert!(diagnostic.camera().yaw != 0.0);
    }

    #[test]
    fn reset_orbit_undoes_drag() {
        let mut scene = Scene::new(init(RunMode::Diagnostic));
        scene.handle_event(&HostEvent::Button {
            button: PointerButton::Secondary,
            pressed: true,
        });
        scene.handle_event(&HostEvent::Motion { dx: 40.0, dy: 30.0 });
        assert!(scene.camera().yaw != 0.0);

        scene.reset_orbit();
        assert_eq!(scene.camera().yaw, 0.0);
        assert_eq!(scene.camera().pitch, 0.0);
        assert!((scene.camera().eye() - scene.camera().position).length() < 1e-6);
    }

    #[test]
    fn primary_drag_does_not_orbit() {
        let mut scene = Scene::new(init(RunMode::Diagnostic));
        scene.handle_event(&HostEvent::Button {
            button: PointerButton::Primary,
            pressed: true,
        });
        scene.handle_event(&HostEvent::Motion { dx: 50.0, dy: 0.0 });
        assert_eq!(scene.camera().yaw, 0.0);
        assert_eq!(scene.camera().pitch, 0.0);
    }

    #[test]
    fn construction_clamps_damping_and_divisor() {
        let config = SceneConfig {
            damping: 1.5,
            phase_divisor_ms: 0.0,
            ..SceneConfig::default()
        };
        let init = SceneInit::new(config, RunMode::Normal, 800.0, 600.0, 1.0);
        let t0 = init.start;
        let mut scene = Scene::new(init);
        assert_eq!(scene.camera().damping, 1.0);
        assert_eq!(scene.config().damping, 1.0);
        assert_eq!(scene.tuning().phase_divisor_ms, 1.0);

        scene.pointer_moved(800.0, 0.0);
        let target = scene.camera().target();
        scene.frame_at(t0 + Duration::from_millis(16), &mut Nop).unwrap();
        assert!((scene.camera().position - target).length() < 1e-6);
    }

    #[test]
    fn prompt_fires_once_in_normal_mode() {
        let init = init(RunMode::Normal);
        let t0 = init.start;
        let mut scene = Scene::new(init);
        assert!(!scene.poll_prompt(t0 + Duration::from_secs(5)));
        assert!(scene.poll_prompt(t0 + Duration::from_secs(20)));
        assert!(!scene.poll_prompt(t0 + Duration::from_secs(40)));
        // Declining is simply not switching.
        assert_eq!(scene.mode(), RunMode::Normal);
    }

    #[test]
    fn prompt_never_fires_in_diagnostic_mode() {
        let init = init(RunMode::Diagnostic);
        let t0 = init.start;
        let mut scene = Scene::new(init);
        assert!(!scene.poll_prompt(t0 + Duration::from_secs(600)));
    }

    #[test]
    fn entering_diagnostic_disarms_prompt() {
        let init = init(RunMode::Normal);
        let t0 = init.start;
        let mut scene = Scene::new(init);
        scene.enter_diagnostic();
        assert_eq!(scene.mode(), RunMode::Diagnostic);
        assert!(!scene.poll_prompt(t0 + Duration::from_secs(30)));
    }

    #[test]
    fn tuning_round_trips_and_clamps() {
        let mut scene = Scene::new(init(RunMode::Diagnostic));
        let mut tuning = scene.tuning();
        assert_eq!(tuning.damping, 0.5);
        assert_eq!(tuning.phase_divisor_ms, 1500.0);

        tuning.damping = 4.0;
        tuning.phase_divisor_ms = 0.0;
        tuning.grain = 0.2;
        scene.apply_tuning(tuning);

        let applied = scene.tuning();
        assert_eq!(applied.damping, 1.0);
        assert_eq!(applied.phase_divisor_ms, 1.0);
        assert_eq!(applied.grain, 0.2);
    }
}
