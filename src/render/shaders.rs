/// Needle particles: morph between the scattered and tree layouts on the GPU.
///
/// Mirrors `particles::morph_vertex` and `particles::field::point_size`.
pub const PARTICLE_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_scatter_pos;
layout(location = 1) in vec3 a_tree_pos;
layout(location = 2) in float a_random;
layout(location = 3) in float a_size;

uniform mat4 u_view;
uniform mat4 u_projection;
uniform float u_time;
uniform float u_progress;
uniform float u_pixel_ratio;

out float v_alpha;

float ease_in_out_cubic(float t) {
    return t < 0.5 ? 4.0 * t * t * t : 1.0 - pow(-2.0 * t + 2.0, 3.0) / 2.0;
}

void main() {
    float t = ease_in_out_cubic(clamp(u_progress, 0.0, 1.0));
    vec3 pos = mix(a_scatter_pos, a_tree_pos, t);

    float amp = mix(0.5, 0.1, t);
    float speed = mix(0.5, 1.5, t);
    pos.x += cos(u_time * 0.3 + a_random * 5.0) * amp * 0.5;
    pos.y += sin(u_time * speed + a_random * 10.0) * amp;

    v_alpha = 0.6 + 0.4 * sin(u_time * 3.0 + a_random * 20.0);

    vec4 view_pos = u_view * vec4(pos, 1.0);
    gl_Position = u_projection * view_pos;
    gl_PointSize = a_size * u_pixel_ratio * (20.0 / max(-view_pos.z, 0.0001));
}
"#;

/// Soft round sprite fading from the base colour at the rim to the tip colour at the centre
pub const PARTICLE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in float v_alpha;

uniform vec3 u_color_base;
uniform vec3 u_color_tip;

out vec4 fragColor;

void main() {
    float dist = length(gl_PointCoord - vec2(0.5));
    if (dist > 0.5) {
        discard;
    }

    float glow = pow(1.0 - dist * 2.0, 1.5);
    vec3 color = mix(u_color_base, u_color_tip, glow);
    fragColor = vec4(color, v_alpha * glow);
}
"#;

/// Instanced ornaments; the model matrix arrives as four column attributes
pub const ORNAMENT_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec4 a_model_0;
layout(location = 3) in vec4 a_model_1;
layout(location = 4) in vec4 a_model_2;
layout(location = 5) in vec4 a_model_3;
layout(location = 6) in vec3 a_color;

uniform mat4 u_view;
uniform mat4 u_projection;

out vec3 v_world_position;
out vec3 v_normal;
out vec3 v_color;

void main() {
    mat4 model = mat4(a_model_0, a_model_1, a_model_2, a_model_3);
    vec4 world_pos = model * vec4(a_position, 1.0);

    v_world_position = world_pos.xyz;
    v_normal = mat3(model) * a_normal;
    v_color = a_color;

    gl_Position = u_projection * u_view * world_pos;
}
"#;

/// Metallic ornament shading with key, fill and inner point lights
pub const ORNAMENT_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec3 v_world_position;
in vec3 v_normal;
in vec3 v_color;

uniform vec3 u_camera_pos;
uniform vec3 u_key_color;
uniform vec3 u_fill_color;
uniform vec3 u_point_color;
uniform vec3 u_ambient_color;
uniform vec3 u_emissive_color;

out vec4 fragColor;

const vec3 KEY_POS = vec3(10.0, 20.0, 10.0);
const vec3 FILL_POS = vec3(-10.0, 5.0, -10.0);
const float POINT_RANGE = 10.0;
const float EMISSIVE_INTENSITY = 0.2;
const float ROUGHNESS = 0.15;

vec3 shade(vec3 n, vec3 v, vec3 l, vec3 light_color, float intensity) {
    vec3 h = normalize(l + v);
    float ndotl = max(dot(n, l), 0.0);
    float shininess = 2.0 / (ROUGHNESS * ROUGHNESS);
    float spec = pow(max(dot(n, h), 0.0), shininess);

    // Metals tint their reflections and have almost no diffuse term
    vec3 diffuse = v_color * ndotl * 0.1;
    vec3 specular = v_color * spec;
    return (diffuse + specular) * light_color * intensity;
}

void main() {
    vec3 n = normalize(v_normal);
    vec3 v = normalize(u_camera_pos - v_world_position);

    vec3 color = u_ambient_color * v_color;
    color += shade(n, v, normalize(KEY_POS - v_world_position), u_key_color, 2.0);
    color += shade(n, v, normalize(FILL_POS - v_world_position), u_fill_color, 2.0);

    vec3 to_center = -v_world_position;
    float falloff = clamp(1.0 - length(to_center) / POINT_RANGE, 0.0, 1.0);
    color += shade(n, v, normalize(to_center + vec3(0.0001)), u_point_color, 1.5 * falloff * falloff);

    // Environment reflection approximated by a fresnel rim
    float fresnel = pow(1.0 - max(dot(n, v), 0.0), 5.0);
    color += v_color * fresnel * 0.5;

    color += u_emissive_color * EMISSIVE_INTENSITY;

    fragColor = vec4(color, 1.0);
}
"#;

/// Fullscreen triangle for post-processing
pub const FULLSCREEN_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

out vec2 v_uv;

void main() {
    float x = float((gl_VertexID & 1) << 2);
    float y = float((gl_VertexID & 2) << 1);
    v_uv = vec2(x * 0.5, y * 0.5);
    gl_Position = vec4(x - 1.0, y - 1.0, 0.0, 1.0);
}
"#;

pub const BLOOM_EXTRACT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_texture;
uniform float u_threshold;

out vec4 fragColor;

void main() {
    vec3 color = texture(u_texture, v_uv).rgb;
    float luma = dot(color, vec3(0.2126, 0.7152, 0.0722));
    float weight = smoothstep(u_threshold, u_threshold + 0.2, luma);
    fragColor = vec4(color * weight, 1.0);
}
"#;

/// Separable 9-tap Gaussian blur
pub const BLUR_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_texture;
uniform vec2 u_direction;

out vec4 fragColor;

void main() {
    vec2 texel = 1.0 / vec2(textureSize(u_texture, 0));
    float weights[5] = float[](0.227027, 0.1945946, 0.1216216, 0.054054, 0.016216);

    vec3 result = texture(u_texture, v_uv).rgb * weights[0];
    for (int i = 1; i < 5; i++) {
        vec2 offset = u_direction * texel * float(i) * 2.0;
        result += texture(u_texture, v_uv + offset).rgb * weights[i];
        result += texture(u_texture, v_uv - offset).rgb * weights[i];
    }

    fragColor = vec4(result, 1.0);
}
"#;

pub const COMPOSITE_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_scene;
uniform sampler2D u_bloom;
uniform float u_bloom_strength;
uniform float u_vignette_strength;

out vec4 fragColor;

void main() {
    vec3 color = texture(u_scene, v_uv).rgb + texture(u_bloom, v_uv).rgb * u_bloom_strength;

    vec2 uv = v_uv - 0.5;
    color *= clamp(1.0 - dot(uv, uv) * u_vignette_strength, 0.0, 1.0);

    fragColor = vec4(color, 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [&str; 8] = [
        PARTICLE_VERTEX_SHADER,
        PARTICLE_FRAGMENT_SHADER,
        ORNAMENT_VERTEX_SHADER,
        ORNAMENT_FRAGMENT_SHADER,
        FULLSCREEN_VERTEX_SHADER,
        BLOOM_EXTRACT_SHADER,
        BLUR_SHADER,
        COMPOSITE_SHADER,
    ];

    #[test]
    fn test_shader_version() {
        for src in ALL {
            assert!(src.starts_with("#version 300 es"));
        }
    }

    #[test]
    fn test_particle_attribute_layout() {
        // Must match the interleaving of ParticleField::attribute_data
        assert!(PARTICLE_VERTEX_SHADER.contains("location = 0) in vec3 a_scatter_pos"));
        assert!(PARTICLE_VERTEX_SHADER.contains("location = 1) in vec3 a_tree_pos"));
        assert!(PARTICLE_VERTEX_SHADER.contains("location = 2) in float a_random"));
        assert!(PARTICLE_VERTEX_SHADER.contains("location = 3) in float a_size"));
    }

    #[test]
    fn test_ornament_instance_layout() {
        for col in 0..4 {
            let decl = format!("location = {}) in vec4 a_model_{}", col + 2, col);
            assert!(ORNAMENT_VERTEX_SHADER.contains(&decl), "missing {}", decl);
        }
        assert!(ORNAMENT_VERTEX_SHADER.contains("location = 6) in vec3 a_color"));
    }

    #[test]
    fn test_particle_discards_outside_disc() {
        assert!(PARTICLE_FRAGMENT_SHADER.contains("discard"));
        assert!(PARTICLE_FRAGMENT_SHADER.contains("pow(1.0 - dist * 2.0, 1.5)"));
    }
}
