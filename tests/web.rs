//! Browser smoke tests, run with `wasm-pack test --headless --firefox`

#![cfg(target_arch = "wasm32")]

use arix_tree::{Scene, SceneConfig, SceneError, TransitionState};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn scene_generates_with_browser_entropy() {
    // No seed: exercises getrandom's js backend
    let config = SceneConfig::from_yaml("particle_count: 64\nornament_count: 8\n").unwrap();
    let mut scene = Scene::new(config);

    assert_eq!(scene.particles().len(), 64);
    assert_eq!(scene.ornaments().len(), 8);

    assert_eq!(scene.toggle(), TransitionState::TreeShape);
    scene.tick(0.016);
    assert!(scene.particles().progress() > 0.0);
}

#[wasm_bindgen_test]
fn errors_cross_the_boundary_as_strings() {
    let err = SceneConfig::from_yaml("particle_count: 0").unwrap_err();
    assert!(matches!(err, SceneError::InvalidConfig(_)));

    let js: JsValue = err.into();
    let message = js.as_string().unwrap();
    assert!(message.contains("particle_count"));
}
