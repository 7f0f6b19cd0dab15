use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext};

pub mod animation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod mesh;
pub mod particles;
pub mod render;
pub mod scene;

pub use animation::TransitionState;
pub use config::SceneConfig;
pub use error::SceneError;
pub use scene::Scene;

use render::RenderPipeline;

/// Install the panic hook and console logger
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // A second init (e.g. hot reload) keeps the first logger
    console_log::init_with_level(log::Level::Info).ok();
}

/// The interactive tree exposed to JavaScript
#[wasm_bindgen]
pub struct ArixTree {
    scene: Scene,
    pipeline: RenderPipeline,
}

#[wasm_bindgen]
impl ArixTree {
    /// Create the scene with the built-in configuration
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<ArixTree, JsValue> {
        Ok(Self::build(canvas, SceneConfig::default())?)
    }

    /// Create the scene with overrides from a YAML document
    #[wasm_bindgen]
    pub fn with_config(canvas: HtmlCanvasElement, yaml: &str) -> Result<ArixTree, JsValue> {
        let config = SceneConfig::from_yaml(yaml)?;
        Ok(Self::build(canvas, config)?)
    }

    fn build(canvas: HtmlCanvasElement, config: SceneConfig) -> Result<ArixTree, SceneError> {
        let width = canvas.width() as i32;
        let height = canvas.height() as i32;

        let gl = canvas
            .get_context("webgl2")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<WebGl2RenderingContext>().ok())
            .ok_or(SceneError::WebGlUnavailable)?;

        let pixel_ratio = web_sys::window()
            .map(|w| w.device_pixel_ratio() as f32)
            .unwrap_or(1.0)
            .clamp(1.0, 2.0);

        log::info!("config: {:?}", config);

        let scene = Scene::new(config);
        let pipeline = RenderPipeline::new(
            gl,
            width,
            height,
            pixel_ratio,
            scene.particles(),
            scene.ornaments(),
            &scene.config().palette,
        )?;

        Ok(Self { scene, pipeline })
    }

    /// Advance and draw one frame
    #[wasm_bindgen]
    pub fn render(&mut self, dt: f32) {
        self.scene.tick(dt);
        self.pipeline.update_instances(self.scene.ornaments().instance_matrices());
        self.pipeline.render(
            self.scene.camera(),
            self.scene.time(),
            self.scene.particles().progress(),
        );
    }

    /// Flip between scattered and tree, returning the new button label
    #[wasm_bindgen]
    pub fn toggle(&mut self) -> String {
        self.scene.toggle();
        self.scene.button_label().to_string()
    }

    #[wasm_bindgen]
    pub fn button_label(&self) -> String {
        self.scene.button_label().to_string()
    }

    #[wasm_bindgen]
    pub fn is_tree_shape(&self) -> bool {
        self.scene.state() == TransitionState::TreeShape
    }

    #[wasm_bindgen]
    pub fn particle_progress(&self) -> f32 {
        self.scene.particles().progress()
    }

    #[wasm_bindgen]
    pub fn ornament_progress(&self) -> f32 {
        self.scene.ornaments().progress()
    }

    /// Resize to a new drawing-buffer size in device pixels
    #[wasm_bindgen]
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), JsValue> {
        self.pipeline.resize(width, height)?;
        log::info!("resized to {}x{}", width, height);
        Ok(())
    }

    /// Device pixel ratio, clamped to [1, 2]
    #[wasm_bindgen]
    pub fn set_pixel_ratio(&mut self, ratio: f32) {
        self.pipeline.set_pixel_ratio(ratio.clamp(1.0, 2.0));
    }

    /// Orbit camera by a pointer drag in pixels
    #[wasm_bindgen]
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        self.scene.camera_mut().orbit(delta_x, delta_y);
    }

    /// Zoom camera
    #[wasm_bindgen]
    pub fn zoom(&mut self, delta: f32) {
        self.scene.camera_mut().zoom(delta);
    }

    /// Turn idle auto-rotation on or off
    #[wasm_bindgen]
    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.scene.camera_mut().auto_rotate = enabled;
    }
}
