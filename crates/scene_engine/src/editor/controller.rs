//! Fly-camera controls
//!
//! Held keys are applied once per fixed tick, so movement speed is in world
//! units per tick regardless of the render frame rate. Mouse-look is applied
//! once per frame from the accumulated cursor offset.

use super::mode::{ActiveView, EditorMode};
use crate::core::config::ControlsConfig;
use crate::input::{InputState, KeyCode};
use crate::render::Camera;

/// Translates held input into camera motion
#[derive(Debug, Clone, Default)]
pub struct EditorController {
    controls: ControlsConfig,
}

impl EditorController {
    /// Controller using the given tuning
    pub fn new(controls: ControlsConfig) -> Self {
        Self { controls }
    }

    /// Current tuning
    pub fn controls(&self) -> &ControlsConfig {
        &self.controls
    }

    /// Run one fixed tick of keyboard controls
    ///
    /// Skipped while the GUI overlay owns the keyboard.
    pub fn apply_tick(&self, input: &InputState, view: &mut ActiveView<'_>) {
        if input.gui_captures_keyboard() {
            return;
        }

        if input.is_key_down(KeyCode::Escape) && view.mode == EditorMode::Editor {
            view.scene.clear_selection();
        }

        let speed = if input.is_key_down(KeyCode::LeftControl) {
            self.controls.movement_speed * self.controls.boost_multiplier
        } else {
            self.controls.movement_speed
        };
        self.move_camera(input, view.camera, speed);
        self.zoom_camera(input, view.camera);
    }

    fn move_camera(&self, input: &InputState, camera: &mut Camera, speed: f32) {
        if let Some(forward) = camera.planar_front() {
            if input.is_key_down(KeyCode::W) {
                camera.move_planar(forward, speed);
            }
            if input.is_key_down(KeyCode::S) {
                camera.move_planar(-forward, speed);
            }
        }

        let right = camera.right;
        if input.is_key_down(KeyCode::A) {
            camera.move_planar(-right, speed);
        }
        if input.is_key_down(KeyCode::D) {
            camera.move_planar(right, speed);
        }

        let up = camera.world_up;
        if input.is_key_down(KeyCode::Space) {
            camera.move_vertical(up, speed);
        }
        if input.is_key_down(KeyCode::LeftShift) {
            camera.move_vertical(-up, speed);
        }
    }

    fn zoom_camera(&self, input: &InputState, camera: &mut Camera) {
        let ControlsConfig { fov_step, min_fov, max_fov, .. } = self.controls;
        if input.is_key_down(KeyCode::F1) {
            camera.adjust_fov(fov_step, min_fov, max_fov);
        }
        if input.is_key_down(KeyCode::F2) {
            camera.adjust_fov(-fov_step, min_fov, max_fov);
        }
    }

    /// Consume the frame's mouse-look offset and turn the camera
    pub fn apply_look(&self, input: &mut InputState, camera: &mut Camera) {
        let (dx, dy) = input.take_look_delta();
        if !input.is_looking() {
            return;
        }
        let sensitivity = self.controls.look_sensitivity;
        camera.process_mouse_movement(dx * sensitivity, dy * sensitivity, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AppEvent;
    use crate::assets::ResourceLibrary;
    use crate::foundation::math::Vec3;
    use crate::input::MouseButton;
    use crate::scene::Scene;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn fixture() -> (Scene, Camera) {
        let mut camera = Camera::default();
        camera.position = Vec3::zeros();
        (Scene::new(Arc::new(ResourceLibrary::with_builtin_primitives())), camera)
    }

    fn press(input: &mut InputState, key: KeyCode) {
        input.handle_event(&AppEvent::KeyPressed(key));
    }

    #[test]
    fn forward_and_boost_move_in_the_ground_plane() {
        let (mut scene, mut camera) = fixture();
        camera.process_mouse_movement(0.0, 45.0, true);
        let controller = EditorController::default();
        let mut input = InputState::default();
        press(&mut input, KeyCode::W);

        let mut view = ActiveView { mode: EditorMode::Editor, scene: &mut scene, camera: &mut camera };
        controller.apply_tick(&input, &mut view);
        assert_relative_eq!(camera.position, Vec3::new(0.0, 0.0, -0.1), epsilon = 1e-6);

        press(&mut input, KeyCode::LeftControl);
        let mut view = ActiveView { mode: EditorMode::Editor, scene: &mut scene, camera: &mut camera };
        controller.apply_tick(&input, &mut view);
        assert_relative_eq!(camera.position, Vec3::new(0.0, 0.0, -0.3), epsilon = 1e-6);
    }

    #[test]
    fn vertical_movement_and_fov_keys() {
        let (mut scene, mut camera) = fixture();
        let controller = EditorController::default();
        let mut input = InputState::default();
        press(&mut input, KeyCode::Space);
        press(&mut input, KeyCode::F1);

        let mut view = ActiveView { mode: EditorMode::Editor, scene: &mut scene, camera: &mut camera };
        controller.apply_tick(&input, &mut view);
        assert_relative_eq!(camera.position.y, 0.1, epsilon = 1e-6);
        assert_relative_eq!(camera.fov, 45.1, epsilon = 1e-4);
    }

    #[test]
    fn escape_clears_selection_only_in_editor_mode() {
        let (mut scene, mut camera) = fixture();
        let cube = scene.spawn_object("cube", "cube", "", "");
        scene.select(cube);
        let controller = EditorController::default();
        let mut input = InputState::default();
        press(&mut input, KeyCode::Escape);

        let mut view = ActiveView { mode: EditorMode::Playtest, scene: &mut scene, camera: &mut camera };
        controller.apply_tick(&input, &mut view);
        assert_eq!(scene.selected(), Some(cube));

        let mut view = ActiveView { mode: EditorMode::Editor, scene: &mut scene, camera: &mut camera };
        controller.apply_tick(&input, &mut view);
        assert_eq!(scene.selected(), None);
    }

    #[test]
    fn gui_keyboard_capture_blocks_movement() {
        let (mut scene, mut camera) = fixture();
        let controller = EditorController::default();
        let mut input = InputState::default();
        press(&mut input, KeyCode::D);
        input.handle_event(&AppEvent::GuiCapture { mouse: false, keyboard: true });

        let mut view = ActiveView { mode: EditorMode::Editor, scene: &mut scene, camera: &mut camera };
        controller.apply_tick(&input, &mut view);
        assert_relative_eq!(camera.position, Vec3::zeros());
    }

    #[test]
    fn look_applies_sensitivity() {
        let (_, mut camera) = fixture();
        let controller = EditorController::default();
        let mut input = InputState::default();
        input.handle_event(&AppEvent::MouseButton { button: MouseButton::Right, pressed: true });
        input.handle_event(&AppEvent::MouseMoved { x: 100.0, y: 100.0 });
        input.handle_event(&AppEvent::MouseMoved { x: 150.0, y: 80.0 });

        controller.apply_look(&mut input, &mut camera);
        assert_relative_eq!(camera.yaw, -85.0, epsilon = 1e-4);
        assert_relative_eq!(camera.pitch, 2.0, epsilon = 1e-4);
    }
}
