//! Editor ↔ Playtest state machine
//!
//! Playtest runs on a deep copy of the editor scene with its own camera.
//! Leaving playtest drops the copy; nothing is written back.

use crate::render::Camera;
use crate::scene::Scene;

/// Which scene the frame operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EditorMode {
    /// Editing the authored scene
    #[default]
    Editor,
    /// Running a throwaway copy of the scene
    Playtest,
}

/// Queued mode change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Start playtesting (ignored when already playtesting)
    EnterPlaytest,
    /// Stop playtesting (ignored when already editing)
    ExitPlaytest,
    /// Switch to whichever mode is not active
    Toggle,
}

impl From<EditorMode> for Transition {
    fn from(mode: EditorMode) -> Self {
        match mode {
            EditorMode::Editor => Self::ExitPlaytest,
            EditorMode::Playtest => Self::EnterPlaytest,
        }
    }
}

/// Scene and camera owned by a playtest run
#[derive(Debug)]
pub struct PlaytestSession {
    /// Deep copy of the editor scene
    pub scene: Scene,
    /// Camera placed at the player, or a copy of the editor camera
    pub camera: Camera,
}

/// Scene and camera the current frame should use
#[derive(Debug)]
pub struct ActiveView<'a> {
    /// Mode the view belongs to
    pub mode: EditorMode,
    /// Scene to update, pick in and draw
    pub scene: &'a mut Scene,
    /// Camera to move and render through
    pub camera: &'a mut Camera,
}

/// Owns the editor scene and switches between editing and playtesting
#[derive(Debug)]
pub struct ModeController {
    scene: Scene,
    camera: Camera,
    playtest: Option<PlaytestSession>,
    pending: Option<Transition>,
}

impl ModeController {
    /// Start in editor mode
    pub fn new(scene: Scene, camera: Camera) -> Self {
        Self {
            scene,
            camera,
            playtest: None,
            pending: None,
        }
    }

    /// Current mode
    pub fn mode(&self) -> EditorMode {
        if self.playtest.is_some() {
            EditorMode::Playtest
        } else {
            EditorMode::Editor
        }
    }

    /// Queue a transition for the next [`ModeController::apply_pending`]
    ///
    /// A later request in the same frame replaces an earlier one.
    pub fn request(&mut self, transition: Transition) {
        self.pending = Some(transition);
    }

    /// Apply the queued transition, if any, and return the view for this frame
    pub fn apply_pending(&mut self) -> ActiveView<'_> {
        match self.pending.take() {
            Some(Transition::EnterPlaytest) => self.enter_playtest(),
            Some(Transition::ExitPlaytest) => self.exit_playtest(),
            Some(Transition::Toggle) => match self.mode() {
                EditorMode::Editor => self.enter_playtest(),
                EditorMode::Playtest => self.exit_playtest(),
            },
            None => {}
        }
        self.active_view()
    }

    /// Switch to playtest on a fresh copy of the editor scene
    pub fn enter_playtest(&mut self) {
        if self.playtest.is_some() {
            log::debug!("Already playtesting");
            return;
        }

        let mut scene = self.scene.deep_clone();
        scene.clear_selection();

        let player_pose = scene.player().and_then(|id| scene.world_matrix(id));
        let camera = if let Some(world) = player_pose {
            Camera::from_world_matrix(&world, &self.camera)
        } else {
            log::warn!("No player object; playtest camera starts at the editor camera");
            self.camera.clone()
        };

        log::info!("Entering playtest with {} objects", scene.object_count());
        self.playtest = Some(PlaytestSession { scene, camera });
    }

    /// Return to the editor, discarding the playtest scene
    pub fn exit_playtest(&mut self) {
        if self.playtest.take().is_some() {
            log::info!("Leaving playtest");
        } else {
            log::debug!("Not playtesting");
        }
    }

    /// View for the current mode
    pub fn active_view(&mut self) -> ActiveView<'_> {
        match &mut self.playtest {
            Some(session) => ActiveView {
                mode: EditorMode::Playtest,
                scene: &mut session.scene,
                camera: &mut session.camera,
            },
            None => ActiveView {
                mode: EditorMode::Editor,
                scene: &mut self.scene,
                camera: &mut self.camera,
            },
        }
    }

    /// Scene for the current mode
    pub fn active_scene(&self) -> &Scene {
        self.playtest.as_ref().map_or(&self.scene, |session| &session.scene)
    }

    /// Camera for the current mode
    pub fn active_camera(&self) -> &Camera {
        self.playtest.as_ref().map_or(&self.camera, |session| &session.camera)
    }

    /// The authored scene, regardless of mode
    pub fn editor_scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the authored scene
    pub fn editor_scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The editor camera, regardless of mode
    pub fn editor_camera(&self) -> &Camera {
        &self.camera
    }

    /// Running playtest session
    pub fn playtest(&self) -> Option<&PlaytestSession> {
        self.playtest.as_ref()
    }

    /// Propagate a viewport resize to every camera
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        self.camera.set_aspect_ratio(aspect);
        if let Some(session) = &mut self.playtest {
            session.camera.set_aspect_ratio(aspect);
        }
    }

    /// Give up the authored scene (e.g. for saving on shutdown)
    pub fn into_editor_scene(self) -> Scene {
        self.scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ResourceLibrary;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn controller() -> ModeController {
        let mut scene = Scene::new(Arc::new(ResourceLibrary::with_builtin_primitives()));
        let cube = scene.spawn_object("cube", "cube", "", "");
        scene.select(cube);
        ModeController::new(scene, Camera::default())
    }

    #[test]
    fn playtest_runs_on_a_copy() {
        let mut modes = controller();
        let view = modes.apply_pending();
        assert_eq!(view.mode, EditorMode::Editor);

        modes.request(Transition::EnterPlaytest);
        let view = modes.apply_pending();
        assert_eq!(view.mode, EditorMode::Playtest);
        assert_eq!(view.scene.selected(), None);
        let id = view.scene.find("cube").unwrap();
        view.scene.object_mut(id).unwrap().transform.set_position(Vec3::new(9.0, 0.0, 0.0));

        modes.request(Transition::ExitPlaytest);
        assert_eq!(modes.apply_pending().mode, EditorMode::Editor);
        let scene = modes.editor_scene();
        let original = scene.object(scene.find("cube").unwrap()).unwrap();
        assert_relative_eq!(original.transform.position(), Vec3::zeros());
        assert!(scene.selected().is_some());
    }

    #[test]
    fn player_pose_drives_the_playtest_camera() {
        let mut modes = controller();
        let scene = modes.editor_scene_mut();
        let id = scene.find("cube").unwrap();
        let object = scene.object_mut(id).unwrap();
        object.transform.set_position(Vec3::new(1.0, 2.0, 3.0));
        object.transform.set_rotation(Vec3::new(10.0, 30.0, 0.0));
        scene.set_player(id);

        modes.enter_playtest();
        let camera = &modes.playtest().unwrap().camera;
        assert_relative_eq!(camera.position, Vec3::new(1.0, 2.0, 3.0), epsilon = 1e-5);
        assert_relative_eq!(camera.yaw, -60.0, epsilon = 1e-3);
        assert_relative_eq!(camera.pitch, 10.0, epsilon = 1e-3);
    }

    #[test]
    fn no_player_copies_the_editor_camera() {
        let mut modes = controller();
        modes.enter_playtest();
        assert_eq!(modes.active_camera(), modes.editor_camera());
    }

    #[test]
    fn toggle_and_redundant_requests() {
        let mut modes = controller();
        modes.request(Transition::ExitPlaytest);
        assert_eq!(modes.apply_pending().mode, EditorMode::Editor);

        modes.request(Transition::Toggle);
        assert_eq!(modes.apply_pending().mode, EditorMode::Playtest);
        modes.request(EditorMode::Playtest.into());
        assert_eq!(modes.apply_pending().mode, EditorMode::Playtest);
        modes.request(Transition::Toggle);
        assert_eq!(modes.apply_pending().mode, EditorMode::Editor);
        assert!(modes.playtest().is_none());
    }
}
