use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use show_image::{create_window, event, ImageInfo, ImageView, WindowOptions, WindowProxy};

use phong_renderer::{render_with, Color, FrameBuffer, PixelSink, RenderConfig, Scene, ScenePaths};

/// Where `S` saves the frame shown in the window.
const SNAPSHOT_PATH: &str = "render.png";

pub struct Params {
    pub width: u32,
    pub height: u32,
    pub threads: usize,
    pub paths: ScenePaths,
    pub output: Option<PathBuf>, // Render once and save here instead of opening a window.
}

/// Key presses the window reacts to.
enum Command {
    Reload,
    Save,
    Exit,
}

fn to_command(window_event: event::WindowEvent) -> Option<Command> {
    if let event::WindowEvent::KeyboardInput(event) = window_event {
        if !event.input.state.is_pressed() {
            return None;
        }
        return match event.input.key_code {
            Some(event::VirtualKeyCode::R) => Some(Command::Reload),
            Some(event::VirtualKeyCode::S) => Some(Command::Save),
            Some(event::VirtualKeyCode::Escape) => Some(Command::Exit),
            _ => None,
        };
    }

    return None;
}

/// show-image errors carry platform handles, only their message is kept.
fn window_error(err: impl std::fmt::Display) -> anyhow::Error {
    return anyhow!("window: {}", err);
}

fn show(window: &WindowProxy, frame: &FrameBuffer) -> Result<()> {
    let image = ImageView::new(ImageInfo::rgb8(frame.width(), frame.height()), frame.as_pixel_data());
    window.set_image("image", image).map_err(window_error)?;
    return Ok(());
}

fn render_scene(scene: &Scene, config: &RenderConfig) -> FrameBuffer {
    return render_with(&scene.mesh, &scene.camera, &scene.lighting, config);
}

/// Loads the scene and either saves a single frame or shows it in a window, where `R` reloads
/// the scene files, `S` saves a snapshot and `Escape` exits.
pub fn run(params: Params) -> Result<()> {
    let config = RenderConfig {
        width: params.width,
        height: params.height,
        background: Color::BLACK,
        threads: params.threads,
    };
    let scene = Scene::load(&params.paths)?;
    let mut frame = render_scene(&scene, &config);

    if let Some(output) = &params.output {
        return frame.save(output);
    }

    let window_options = WindowOptions {
        size: Some([params.width, params.height]),
        ..Default::default()
    };
    let window = create_window("phong_renderer", window_options).map_err(window_error)?;
    let event_channel = window.event_channel().map_err(window_error)?;
    show(&window, &frame)?;

    // Channel closes together with the window.
    while let Ok(window_event) = event_channel.recv() {
        match to_command(window_event) {
            Some(Command::Reload) => match Scene::load(&params.paths) {
                Ok(scene) => {
                    frame = render_scene(&scene, &config);
                    show(&window, &frame)?;
                    log::info!("Scene reloaded and redrawn");
                }
                Err(err) => log::error!("Reload failed, keeping the previous scene: {:#}", err),
            },
            Some(Command::Save) => {
                if let Err(err) = frame.save(Path::new(SNAPSHOT_PATH)) {
                    log::error!("{:#}", err);
                }
            }
            Some(Command::Exit) => break,
            None => (),
        }
    }

    return Ok(());
}
