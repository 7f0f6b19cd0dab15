mod orbit;

pub use orbit::OrbitCamera;
