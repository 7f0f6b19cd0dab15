//! Error type shared by configuration loading and the WebGL shell.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Everything that can go wrong while setting up the scene.
///
/// Geometry generation and the per-frame update are infallible, so every
/// variant here is raised during start-up.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("YAML parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid colour {0:?}, expected #RRGGBB")]
    InvalidColor(String),

    #[error("WebGL2 is not available on this canvas")]
    WebGlUnavailable,

    #[error("shader compilation failed: {0}")]
    ShaderCompile(String),

    #[error("program linking failed: {0}")]
    ProgramLink(String),

    #[error("failed to create {0}")]
    Resource(&'static str),

    #[error("failed to allocate texture: {0}")]
    Texture(String),

    #[error("framebuffer incomplete: {0}")]
    FramebufferIncomplete(u32),
}

impl From<SceneError> for JsValue {
    fn from(err: SceneError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T, E = SceneError> = std::result::Result<T, E>;
