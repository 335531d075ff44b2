//! Headless scene editor
//!
//! Loads the editor configuration, discovers resources, opens (or creates)
//! a scene and drives the frame loop for a fixed number of frames against a
//! counting render backend. Useful for validating scene files and assets
//! without a window.
//!
//! ```text
//! scene_editor [--config editor.toml] [--scene level.scene] [--frames 120]
//!              [--playtest] [--save out.scene]
//! ```

use scene_engine::assets::ResourceLibrary;
use scene_engine::foundation::logging;
use scene_engine::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_FRAMES: u64 = 120;

#[derive(Error, Debug)]
enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    App(#[from] AppError),
}

#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    scene: Option<PathBuf>,
    save: Option<PathBuf>,
    frames: Option<u64>,
    playtest: bool,
}

impl Options {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, CliError> {
        let mut options = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => options.config = Some(value_for(&arg, args.next())?.into()),
                "--scene" => options.scene = Some(value_for(&arg, args.next())?.into()),
                "--save" => options.save = Some(value_for(&arg, args.next())?.into()),
                "--frames" => {
                    let value = value_for(&arg, args.next())?;
                    let frames = value
                        .parse()
                        .map_err(|_| CliError::Usage(format!("--frames expects a number, got '{value}'")))?;
                    options.frames = Some(frames);
                }
                "--playtest" => options.playtest = true,
                other => return Err(CliError::Usage(format!("Unknown argument '{other}'"))),
            }
        }
        Ok(options)
    }
}

fn value_for(flag: &str, value: Option<String>) -> Result<String, CliError> {
    value.ok_or_else(|| CliError::Usage(format!("{flag} expects a value")))
}

/// Scene shown when no file is given: a cube above a large ground plane
fn startup_scene(resources: Arc<ResourceLibrary>) -> Scene {
    let mut scene = Scene::new(resources);
    scene.spawn_object("cube", "cube", "default", "default");
    let ground = scene.spawn_object("ground", "plane", "default", "default");
    if let Some(object) = scene.object_mut(ground) {
        object.transform.set_position(Vec3::new(0.0, -2.0, 0.0));
        object.transform.set_scale(Vec3::new(100.0, 100.0, 100.0));
    }
    scene
}

fn run(options: &Options) -> Result<(), CliError> {
    let config = match &options.config {
        Some(path) => EditorConfig::load_validated(path).map_err(AppError::from)?,
        None => EditorConfig::default(),
    };
    logging::init(&config.log_level);
    log::info!("Starting scene editor");

    let resources = Arc::new(ResourceLibrary::discover(&config.assets));
    let scene = match &options.scene {
        Some(path) => load_scene(path, Arc::clone(&resources)).map_err(AppError::from)?,
        None => startup_scene(resources),
    };

    let mut frames = FrameLoop::new(&config, scene, NullBackend::new());
    let frame_time = Duration::from_secs_f64(config.timing.fixed_step);
    let frame_count = options.frames.unwrap_or(DEFAULT_FRAMES);

    if options.playtest {
        frames.push_event(AppEvent::RequestMode(EditorMode::Playtest));
    }

    for frame in 0..frame_count {
        if options.playtest && frame + 1 == frame_count {
            frames.push_event(AppEvent::RequestMode(EditorMode::Editor));
        }
        if frame + 1 == frame_count {
            frames.push_event(AppEvent::WindowCloseRequested);
        }

        let report = frames.run_frame(frame_time).map_err(AppError::from)?;
        log::trace!("Frame {}: {:?}", frame, report);
        if !report.running {
            break;
        }
    }

    let backend = frames.backend();
    log::info!("Ran {} frames, {} draw calls", backend.frames, backend.submitted);

    let scene = frames.into_editor_scene();
    if let Some(path) = &options.save {
        save_scene(&scene, path).map_err(AppError::from)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = Options::parse(std::env::args().skip(1))?;

    match run(&options) {
        Ok(()) => {
            log::info!("Scene editor finished");
            Ok(())
        }
        Err(e) => {
            log::error!("Scene editor failed: {}", e);
            Err(e.into())
        }
    }
}
