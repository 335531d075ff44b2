//! Editor frame loop
//!
//! Single-threaded. Each frame runs the same fixed sequence:
//! events → mode transition → commands → fixed ticks → mouse-look →
//! OBB refresh → picking → draw → statistics.

use super::commands::EditorCommand;
use super::controller::EditorController;
use super::mode::{EditorMode, ModeController, Transition};
use crate::application::AppEvent;
use crate::core::config::EditorConfig;
use crate::foundation::time::{FixedTimestep, Timer};
use crate::input::InputState;
use crate::render::{collect_draw_commands, BackendResult, Camera, RenderBackend};
use crate::scene::Scene;
use crate::systems::{pick_and_select, refresh_bounds, PickHit, PickRequest};
use std::collections::VecDeque;
use std::time::Duration;

/// What happened during one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Mode the frame ran in
    pub mode: EditorMode,
    /// Fixed ticks executed
    pub ticks: u32,
    /// Commands applied successfully
    pub commands_applied: usize,
    /// Result of a click pick, if a click was handled
    pub picked: Option<PickHit>,
    /// Objects whose OBB was recomputed
    pub refreshed: usize,
    /// Draw commands submitted
    pub drawn: usize,
    /// Whether the loop should keep running
    pub running: bool,
}

/// Owns the editor state and drives it one frame at a time
pub struct FrameLoop<B: RenderBackend> {
    modes: ModeController,
    controller: EditorController,
    input: InputState,
    events: VecDeque<AppEvent>,
    timer: Timer,
    timestep: FixedTimestep,
    backend: B,
    running: bool,
}

impl<B: RenderBackend> FrameLoop<B> {
    /// Set up a loop editing `scene`
    pub fn new(config: &EditorConfig, scene: Scene, backend: B) -> Self {
        let camera = Camera::from_config(&config.camera, config.window.aspect_ratio());
        let timestep =
            FixedTimestep::new(config.timing.fixed_step).with_max_frame_time(config.timing.max_frame_time);

        Self {
            modes: ModeController::new(scene, camera),
            controller: EditorController::new(config.controls.clone()),
            input: InputState::new(config.window.width, config.window.height),
            events: VecDeque::new(),
            timer: Timer::new(),
            timestep,
            backend,
            running: true,
        }
    }

    /// Queue an event for the next frame
    pub fn push_event(&mut self, event: AppEvent) {
        self.events.push_back(event);
    }

    /// Queue several events for the next frame
    pub fn push_events(&mut self, events: impl IntoIterator<Item = AppEvent>) {
        self.events.extend(events);
    }

    /// Run one frame that took `frame_time` of wall-clock time
    ///
    /// Only backend failures are returned as errors; rejected commands and
    /// failed picks are logged and the frame continues.
    pub fn run_frame(&mut self, frame_time: Duration) -> BackendResult<FrameReport> {
        let commands = self.poll_events();

        let mut view = self.modes.apply_pending();

        let mut commands_applied = 0;
        for command in commands {
            if view.mode != EditorMode::Editor {
                log::warn!("Ignoring {:?} during playtest", command);
                continue;
            }
            match command.apply(view.scene) {
                Ok(_) => commands_applied += 1,
                Err(e) => log::warn!("Command {:?} failed: {}", command, e),
            }
        }

        let ticks = self.timestep.advance(frame_time.as_secs_f64());
        for _ in 0..ticks {
            self.controller.apply_tick(&self.input, &mut view);
        }
        self.controller.apply_look(&mut self.input, view.camera);

        let refreshed = refresh_bounds(view.scene);

        // Clicks are consumed every frame so a playtest click never fires later.
        let click = self.input.take_left_click();
        let picked = match click {
            Some((x, y)) if view.mode == EditorMode::Editor => {
                let mouse = self.input.mouse();
                let request = PickRequest::new(x, y, (mouse.window_width, mouse.window_height), view.camera);
                pick_and_select(view.scene, &request)
            }
            _ => None,
        };

        let draw_list = collect_draw_commands(view.scene);
        self.backend.begin_frame(view.camera)?;
        for command in &draw_list {
            self.backend.submit(command, view.camera)?;
        }
        self.backend.end_frame()?;

        let mode = view.mode;
        if let Some(fps) = self.timer.advance(frame_time) {
            log::debug!(
                "{:.1} FPS, {} objects, {} drawn ({:?})",
                fps,
                self.modes.active_scene().object_count(),
                draw_list.len(),
                mode
            );
        }

        if self.input.close_requested() && self.running {
            log::info!("Close requested, stopping after frame {}", self.timer.frame_count());
            self.running = false;
        }

        Ok(FrameReport {
            mode,
            ticks,
            commands_applied,
            picked,
            refreshed,
            drawn: draw_list.len(),
            running: self.running,
        })
    }

    /// Drain queued events; returns the editor commands among them
    fn poll_events(&mut self) -> Vec<EditorCommand> {
        let mut commands = Vec::new();
        while let Some(event) = self.events.pop_front() {
            match event {
                AppEvent::Command(command) => commands.push(command),
                AppEvent::RequestMode(mode) => self.modes.request(Transition::from(mode)),
                AppEvent::WindowResized { width, height } => {
                    self.input.handle_event(&event);
                    if width > 0 && height > 0 {
                        #[allow(clippy::cast_precision_loss)]
                        self.modes.set_aspect_ratio(width as f32 / height as f32);
                    }
                }
                other => {
                    self.input.handle_event(&other);
                }
            }
        }
        commands
    }

    /// Whether the loop should keep running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Mode state machine
    pub fn modes(&self) -> &ModeController {
        &self.modes
    }

    /// Mutable mode state machine
    pub fn modes_mut(&mut self) -> &mut ModeController {
        &mut self.modes
    }

    /// Current input state
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Rendering backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Frame timer
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Tear down the loop, keeping the authored scene
    pub fn into_editor_scene(self) -> Scene {
        self.modes.into_editor_scene()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ResourceLibrary;
    use crate::foundation::math::Vec3;
    use crate::input::{KeyCode, MouseButton};
    use crate::render::NullBackend;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn frame_loop() -> FrameLoop<NullBackend> {
        let mut scene = Scene::new(Arc::new(ResourceLibrary::with_builtin_primitives()));
        scene.spawn_object("cube", "cube", "", "");
        let ground = scene.spawn_object("ground", "plane", "", "");
        let transform = &mut scene.object_mut(ground).unwrap().transform;
        transform.set_position(Vec3::new(0.0, -2.0, 0.0));
        transform.set_scale(Vec3::new(100.0, 1.0, 100.0));

        let mut config = EditorConfig::default().with_window_size(600, 600);
        config.camera.position = [0.0, 0.0, 5.0];
        FrameLoop::new(&config, scene, NullBackend::new())
    }

    fn tick() -> Duration {
        Duration::from_millis(17)
    }

    #[test]
    fn frame_draws_every_mesh_and_cleans_bounds() {
        let mut frames = frame_loop();
        let report = frames.run_frame(tick()).unwrap();

        assert_eq!(report.mode, EditorMode::Editor);
        assert_eq!(report.drawn, 2);
        assert_eq!(report.refreshed, 2);
        assert_eq!(frames.backend().last_frame, vec!["cube".to_string(), "ground".to_string()]);

        let report = frames.run_frame(tick()).unwrap();
        assert_eq!(report.refreshed, 0);
        assert_eq!(frames.backend().frames, 2);
    }

    #[test]
    fn click_in_editor_selects_the_nearest_object() {
        let mut frames = frame_loop();
        frames.run_frame(tick()).unwrap();

        frames.push_events([
            AppEvent::MouseMoved { x: 300.0, y: 300.0 },
            AppEvent::MouseButton { button: MouseButton::Left, pressed: true },
            AppEvent::MouseButton { button: MouseButton::Left, pressed: false },
        ]);
        let report = frames.run_frame(tick()).unwrap();
        let hit = report.picked.unwrap();
        assert_eq!(hit.name, "cube");
        assert_relative_eq!(hit.distance, 4.0, epsilon = 1e-3);

        let scene = frames.modes().editor_scene();
        assert_eq!(scene.selected(), scene.find("cube"));
    }

    #[test]
    fn click_tests_bounds_moved_in_the_same_frame() {
        let mut frames = frame_loop();
        frames.run_frame(tick()).unwrap();

        frames.push_events([
            AppEvent::Command(EditorCommand::SelectByName("cube".into())),
            AppEvent::Command(EditorCommand::SetTransform {
                position: Vec3::new(0.0, 10.0, 0.0),
                rotation: Vec3::zeros(),
                scale: Vec3::new(1.0, 1.0, 1.0),
            }),
            AppEvent::MouseMoved { x: 300.0, y: 300.0 },
            AppEvent::MouseButton { button: MouseButton::Left, pressed: true },
            AppEvent::MouseButton { button: MouseButton::Left, pressed: false },
        ]);
        let report = frames.run_frame(tick()).unwrap();
        assert_eq!(report.commands_applied, 2);
        assert!(report.picked.is_none());

        let scene = frames.modes().editor_scene();
        let cube = scene.find("cube").unwrap();
        assert_relative_eq!(scene.object(cube).unwrap().obb().center, Vec3::new(0.0, 10.0, 0.0), epsilon = 1e-5);
        assert_eq!(scene.selected(), None);
    }

    #[test]
    fn commands_and_playtest_round_trip() {
        let mut frames = frame_loop();
        frames.push_event(AppEvent::Command(EditorCommand::NewObject));
        let report = frames.run_frame(tick()).unwrap();
        assert_eq!(report.commands_applied, 1);
        assert_eq!(frames.modes().editor_scene().object_count(), 3);

        frames.push_events([
            AppEvent::RequestMode(EditorMode::Playtest),
            AppEvent::Command(EditorCommand::NewScene),
            AppEvent::KeyPressed(KeyCode::Space),
        ]);
        let report = frames.run_frame(tick()).unwrap();
        assert_eq!(report.mode, EditorMode::Playtest);
        assert_eq!(report.commands_applied, 0);
        assert_eq!(report.drawn, 3);
        assert_eq!(frames.modes().active_scene().selected(), None);
        assert!(frames.modes().active_camera().position.y > 0.0);

        frames.push_events([AppEvent::KeyReleased(KeyCode::Space), AppEvent::RequestMode(EditorMode::Editor)]);
        let report = frames.run_frame(tick()).unwrap();
        assert_eq!(report.mode, EditorMode::Editor);
        assert_relative_eq!(frames.modes().editor_camera().position.y, 0.0);
        assert_eq!(frames.modes().editor_scene().object_count(), 3);
    }

    #[test]
    fn fixed_ticks_follow_frame_time() {
        let mut frames = frame_loop();
        assert_eq!(frames.run_frame(Duration::from_millis(55)).unwrap().ticks, 3);
        assert_eq!(frames.run_frame(Duration::ZERO).unwrap().ticks, 0);
    }

    #[test]
    fn close_request_stops_the_loop() {
        let mut frames = frame_loop();
        frames.push_event(AppEvent::WindowCloseRequested);
        let report = frames.run_frame(tick()).unwrap();
        assert!(!report.running);
        assert!(!frames.is_running());
    }
}
