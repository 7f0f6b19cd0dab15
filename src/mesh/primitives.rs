//! Unit meshes for instanced ornaments

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::{Mesh, Vertex};

/// Latitude/longitude sphere centred on the origin.
///
/// Seams are duplicated so every ring has `segments + 1` vertices.
pub fn uv_sphere(radius: f32, segments: usize, rings: usize) -> Mesh {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut mesh = Mesh::new();

    for ring in 0..=rings {
        let polar = ring as f32 / rings as f32 * PI;
        let (sin_p, cos_p) = polar.sin_cos();

        mesh.add_vertices((0..=segments).map(|i| {
            let azimuth = i as f32 / segments as f32 * TAU;
            let (sin_a, cos_a) = azimuth.sin_cos();
            let normal = Vec3::new(sin_p * cos_a, cos_p, sin_p * sin_a);
            Vertex::new(normal * radius, normal)
        }));
    }

    let stride = (segments + 1) as u32;
    for ring in 0..rings as u32 {
        for i in 0..segments as u32 {
            let a = ring * stride + i;
            let b = a + stride;
            let c = b + 1;
            let d = a + 1;
            mesh.add_quad(a, b, c, d);
        }
    }

    mesh
}

/// Axis-aligned cube with flat-shaded faces
pub fn cube(size: f32) -> Mesh {
    let h = size * 0.5;
    let mut mesh = Mesh::new();

    // (normal, tangent u, tangent v) with u x v == normal
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    for (normal, u, v) in faces {
        let centre = normal * h;
        let start = mesh.add_vertices([
            Vertex::new(centre - u * h - v * h, normal),
            Vertex::new(centre + u * h - v * h, normal),
            Vertex::new(centre + u * h + v * h, normal),
            Vertex::new(centre - u * h + v * h, normal),
        ]);
        mesh.add_quad(start, start + 1, start + 2, start + 3);
    }

    mesh
}
