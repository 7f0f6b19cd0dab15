use std::ops::Range;

use web_sys::{
    WebGl2RenderingContext as GL, WebGlBuffer, WebGlFramebuffer, WebGlProgram,
    WebGlRenderbuffer, WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject,
};

use super::shaders::*;
use super::webgl::WebGLContext;
use crate::config::{Palette, Rgb};
use crate::error::Result;
use crate::interaction::OrbitCamera;
use crate::mesh::{self, Mesh};
use crate::particles::{
    OrnamentField, OrnamentShape, ParticleField, COLOR_STRIDE, INSTANCE_STRIDE, PARTICLE_STRIDE,
};

/// Sphere ornaments: unit radius, 32 segments by 32 rings
const SPHERE_SEGMENTS: usize = 32;
/// Edge length of box ornaments, roughly matching the sphere's visual weight
const BOX_SIZE: f32 = 1.6;

const BLOOM_THRESHOLD: f32 = 0.5;
const BLOOM_STRENGTH: f32 = 0.8;
const VIGNETTE_STRENGTH: f32 = 0.4;

/// Warm glow at the heart of the tree
const INNER_LIGHT: u32 = 0xFFAA00;
/// Faint green ambient, already scaled by its intensity
const AMBIENT: [f32; 3] = [0.0, 0.2 * 0x11 as f32 / 255.0, 0.0];

struct ParticleUniforms {
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
    progress: Option<WebGlUniformLocation>,
    pixel_ratio: Option<WebGlUniformLocation>,
    color_base: Option<WebGlUniformLocation>,
    color_tip: Option<WebGlUniformLocation>,
}

struct OrnamentUniforms {
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    camera_pos: Option<WebGlUniformLocation>,
    key_color: Option<WebGlUniformLocation>,
    fill_color: Option<WebGlUniformLocation>,
    point_color: Option<WebGlUniformLocation>,
    ambient_color: Option<WebGlUniformLocation>,
    emissive_color: Option<WebGlUniformLocation>,
}

struct PostUniforms {
    extract_texture: Option<WebGlUniformLocation>,
    threshold: Option<WebGlUniformLocation>,
    blur_texture: Option<WebGlUniformLocation>,
    direction: Option<WebGlUniformLocation>,
    scene: Option<WebGlUniformLocation>,
    bloom: Option<WebGlUniformLocation>,
    bloom_strength: Option<WebGlUniformLocation>,
    vignette_strength: Option<WebGlUniformLocation>,
}

/// One instanced draw: a mesh plus a contiguous range of ornament instances
struct InstancedBatch {
    vao: WebGlVertexArrayObject,
    // Kept alive for the lifetime of the VAO
    _vertex_buffer: WebGlBuffer,
    _index_buffer: WebGlBuffer,
    index_count: i32,
    instance_count: i32,
}

/// Offscreen colour targets for the bloom chain
struct RenderTargets {
    scene_texture: WebGlTexture,
    scene_fbo: WebGlFramebuffer,
    scene_depth: WebGlRenderbuffer,
    bloom_textures: [WebGlTexture; 2],
    bloom_fbos: [WebGlFramebuffer; 2],
}

impl RenderTargets {
    fn new(ctx: &WebGLContext, width: i32, height: i32) -> Result<Self> {
        let scene_texture = ctx.create_texture(width, height)?;
        let scene_depth = ctx.create_depth_renderbuffer(width, height)?;
        let scene_fbo = ctx.create_framebuffer(&scene_texture, Some(&scene_depth))?;

        // Bloom runs at half resolution
        let (bw, bh) = ((width / 2).max(1), (height / 2).max(1));
        let bloom_a = ctx.create_texture(bw, bh)?;
        let bloom_b = ctx.create_texture(bw, bh)?;
        let fbo_a = ctx.create_framebuffer(&bloom_a, None)?;
        let fbo_b = ctx.create_framebuffer(&bloom_b, None)?;

        Ok(Self {
            scene_texture,
            scene_fbo,
            scene_depth,
            bloom_textures: [bloom_a, bloom_b],
            bloom_fbos: [fbo_a, fbo_b],
        })
    }

    fn delete(&self, gl: &GL) {
        gl.delete_framebuffer(Some(&self.scene_fbo));
        gl.delete_texture(Some(&self.scene_texture));
        gl.delete_renderbuffer(Some(&self.scene_depth));
        for (fbo, tex) in self.bloom_fbos.iter().zip(&self.bloom_textures) {
            gl.delete_framebuffer(Some(fbo));
            gl.delete_texture(Some(tex));
        }
    }
}

/// Draws needles, ornaments and bloom for one canvas
pub struct RenderPipeline {
    ctx: WebGLContext,

    particle_program: WebGlProgram,
    ornament_program: WebGlProgram,
    bloom_extract_program: WebGlProgram,
    blur_program: WebGlProgram,
    composite_program: WebGlProgram,

    particle_uniforms: ParticleUniforms,
    ornament_uniforms: OrnamentUniforms,
    post_uniforms: PostUniforms,

    particle_vao: WebGlVertexArrayObject,
    _particle_buffer: WebGlBuffer,
    particle_count: i32,

    instance_buffer: WebGlBuffer,
    _color_buffer: WebGlBuffer,
    spheres: InstancedBatch,
    boxes: InstancedBatch,

    targets: RenderTargets,
    palette: Palette,

    width: i32,
    height: i32,
    pixel_ratio: f32,
}

impl RenderPipeline {
    pub fn new(
        gl: GL,
        width: i32,
        height: i32,
        pixel_ratio: f32,
        particles: &ParticleField,
        ornaments: &OrnamentField,
        palette: &Palette,
    ) -> Result<Self> {
        let ctx = WebGLContext::new(gl);

        let particle_program = ctx.create_program(PARTICLE_VERTEX_SHADER, PARTICLE_FRAGMENT_SHADER)?;
        let ornament_program = ctx.create_program(ORNAMENT_VERTEX_SHADER, ORNAMENT_FRAGMENT_SHADER)?;
        let bloom_extract_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, BLOOM_EXTRACT_SHADER)?;
        let blur_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, BLUR_SHADER)?;
        let composite_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, COMPOSITE_SHADER)?;

        let particle_uniforms = ParticleUniforms {
            view: ctx.get_uniform_location(&particle_program, "u_view"),
            projection: ctx.get_uniform_location(&particle_program, "u_projection"),
            time: ctx.get_uniform_location(&particle_program, "u_time"),
            progress: ctx.get_uniform_location(&particle_program, "u_progress"),
            pixel_ratio: ctx.get_uniform_location(&particle_program, "u_pixel_ratio"),
            color_base: ctx.get_uniform_location(&particle_program, "u_color_base"),
            color_tip: ctx.get_uniform_location(&particle_program, "u_color_tip"),
        };

        let ornament_uniforms = OrnamentUniforms {
            view: ctx.get_uniform_location(&ornament_program, "u_view"),
            projection: ctx.get_uniform_location(&ornament_program, "u_projection"),
            camera_pos: ctx.get_uniform_location(&ornament_program, "u_camera_pos"),
            key_color: ctx.get_uniform_location(&ornament_program, "u_key_color"),
            fill_color: ctx.get_uniform_location(&ornament_program, "u_fill_color"),
            point_color: ctx.get_uniform_location(&ornament_program, "u_point_color"),
            ambient_color: ctx.get_uniform_location(&ornament_program, "u_ambient_color"),
            emissive_color: ctx.get_uniform_location(&ornament_program, "u_emissive_color"),
        };

        let post_uniforms = PostUniforms {
            extract_texture: ctx.get_uniform_location(&bloom_extract_program, "u_texture"),
            threshold: ctx.get_uniform_location(&bloom_extract_program, "u_threshold"),
            blur_texture: ctx.get_uniform_location(&blur_program, "u_texture"),
            direction: ctx.get_uniform_location(&blur_program, "u_direction"),
            scene: ctx.get_uniform_location(&composite_program, "u_scene"),
            bloom: ctx.get_uniform_location(&composite_program, "u_bloom"),
            bloom_strength: ctx.get_uniform_location(&composite_program, "u_bloom_strength"),
            vignette_strength: ctx.get_uniform_location(&composite_program, "u_vignette_strength"),
        };

        // Needles never change after upload; motion happens in the vertex shader
        let particle_vao = ctx.create_vao()?;
        ctx.gl.bind_vertex_array(Some(&particle_vao));
        let particle_buffer = ctx.create_buffer_f32(&particles.attribute_data(), GL::STATIC_DRAW)?;
        ctx.float_attribute(&particle_buffer, 0, 3, PARTICLE_STRIDE, 0, 0);
        ctx.float_attribute(&particle_buffer, 1, 3, PARTICLE_STRIDE, 3, 0);
        ctx.float_attribute(&particle_buffer, 2, 1, PARTICLE_STRIDE, 6, 0);
        ctx.float_attribute(&particle_buffer, 3, 1, PARTICLE_STRIDE, 7, 0);
        ctx.gl.bind_vertex_array(None);

        let instance_buffer = ctx.create_buffer_f32(ornaments.instance_matrices(), GL::DYNAMIC_DRAW)?;
        let color_buffer = ctx.create_buffer_f32(ornaments.instance_colors(), GL::STATIC_DRAW)?;

        let spheres = Self::create_batch(
            &ctx,
            &mesh::uv_sphere(1.0, SPHERE_SEGMENTS, SPHERE_SEGMENTS),
            &instance_buffer,
            &color_buffer,
            ornaments.shape_range(OrnamentShape::Sphere),
        )?;
        let boxes = Self::create_batch(
            &ctx,
            &mesh::cube(BOX_SIZE),
            &instance_buffer,
            &color_buffer,
            ornaments.shape_range(OrnamentShape::Box),
        )?;

        let targets = RenderTargets::new(&ctx, width, height)?;

        log::info!(
            "render pipeline ready: {}x{} @{}, {} needles, {} spheres, {} boxes",
            width,
            height,
            pixel_ratio,
            particles.len(),
            spheres.instance_count,
            boxes.instance_count
        );

        Ok(Self {
            ctx,
            particle_program,
            ornament_program,
            bloom_extract_program,
            blur_program,
            composite_program,
            particle_uniforms,
            ornament_uniforms,
            post_uniforms,
            particle_vao,
            _particle_buffer: particle_buffer,
            particle_count: particles.len() as i32,
            instance_buffer,
            _color_buffer: color_buffer,
            spheres,
            boxes,
            targets,
            palette: palette.clone(),
            width,
            height,
            pixel_ratio,
        })
    }

    /// Build a VAO reading `instances` of the shared per-instance buffers
    fn create_batch(
        ctx: &WebGLContext,
        mesh: &Mesh,
        instance_buffer: &WebGlBuffer,
        color_buffer: &WebGlBuffer,
        instances: Range<usize>,
    ) -> Result<InstancedBatch> {
        let gl = &ctx.gl;
        let vao = ctx.create_vao()?;
        gl.bind_vertex_array(Some(&vao));

        // position(3) + normal(3)
        let vertex_buffer = ctx.create_buffer_f32(&mesh.vertex_data(), GL::STATIC_DRAW)?;
        ctx.float_attribute(&vertex_buffer, 0, 3, 6, 0, 0);
        ctx.float_attribute(&vertex_buffer, 1, 3, 6, 3, 0);

        let base = instances.start * INSTANCE_STRIDE;
        for column in 0..4 {
            ctx.float_attribute(instance_buffer, 2 + column as u32, 4, INSTANCE_STRIDE, base + column * 4, 1);
        }
        ctx.float_attribute(color_buffer, 6, 3, COLOR_STRIDE, instances.start * COLOR_STRIDE, 1);

        let index_buffer = ctx.create_index_buffer(mesh.index_data(), GL::STATIC_DRAW)?;

        gl.bind_vertex_array(None);
        gl.bind_buffer(GL::ARRAY_BUFFER, None);
        gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, None);

        Ok(InstancedBatch {
            vao,
            _vertex_buffer: vertex_buffer,
            _index_buffer: index_buffer,
            index_count: mesh.index_data().len() as i32,
            instance_count: instances.len() as i32,
        })
    }

    /// Upload this frame's ornament transforms
    pub fn update_instances(&self, matrices: &[f32]) {
        self.ctx.update_buffer_f32(&self.instance_buffer, matrices);
    }

    /// Render a frame
    pub fn render(&self, camera: &OrbitCamera, time: f32, particle_progress: f32) {
        let gl = &self.ctx.gl;

        let aspect = self.width as f32 / self.height.max(1) as f32;
        let view = camera.view_matrix().to_cols_array();
        let projection = camera.projection_matrix(aspect).to_cols_array();
        let eye = camera.eye();

        // === Pass 1: scene ===
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&self.targets.scene_fbo));
        self.ctx.viewport(self.width, self.height);
        self.ctx.enable_depth_test();
        gl.depth_mask(true);
        self.ctx.clear(self.palette.background.0, 1.0);

        // Ornaments are opaque and go first so needles depth-test against them
        self.ctx.disable_blending();
        gl.use_program(Some(&self.ornament_program));
        let u = &self.ornament_uniforms;
        self.ctx.uniform_matrix4fv(u.view.as_ref(), &view);
        self.ctx.uniform_matrix4fv(u.projection.as_ref(), &projection);
        self.ctx.uniform_3f(u.camera_pos.as_ref(), eye.to_array());
        self.ctx.uniform_3f(u.key_color.as_ref(), self.palette.gold_light.0);
        self.ctx.uniform_3f(u.fill_color.as_ref(), self.palette.emerald_light.0);
        self.ctx.uniform_3f(u.point_color.as_ref(), Rgb::from_u32(INNER_LIGHT).0);
        self.ctx.uniform_3f(u.ambient_color.as_ref(), AMBIENT);
        self.ctx.uniform_3f(u.emissive_color.as_ref(), self.palette.gold_dark.0);

        for batch in [&self.spheres, &self.boxes] {
            if batch.instance_count == 0 {
                continue;
            }
            gl.bind_vertex_array(Some(&batch.vao));
            gl.draw_elements_instanced_with_i32(
                GL::TRIANGLES,
                batch.index_count,
                GL::UNSIGNED_INT,
                0,
                batch.instance_count,
            );
        }

        // Needles: additive glow, tested against depth but never writing it
        if self.particle_count > 0 {
            gl.use_program(Some(&self.particle_program));
            gl.depth_mask(false);
            self.ctx.enable_additive_blending();

            let u = &self.particle_uniforms;
            self.ctx.uniform_matrix4fv(u.view.as_ref(), &view);
            self.ctx.uniform_matrix4fv(u.projection.as_ref(), &projection);
            self.ctx.uniform_1f(u.time.as_ref(), time);
            self.ctx.uniform_1f(u.progress.as_ref(), particle_progress);
            self.ctx.uniform_1f(u.pixel_ratio.as_ref(), self.pixel_ratio);
            self.ctx.uniform_3f(u.color_base.as_ref(), self.palette.emerald_deep.0);
            self.ctx.uniform_3f(u.color_tip.as_ref(), self.palette.emerald_light.0);

            gl.bind_vertex_array(Some(&self.particle_vao));
            gl.draw_arrays(GL::POINTS, 0, self.particle_count);
            gl.depth_mask(true);
        }

        gl.bind_vertex_array(None);

        // === Pass 2: bloom extract ===
        gl.disable(GL::DEPTH_TEST);
        self.ctx.disable_blending();
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&self.targets.bloom_fbos[0]));
        self.ctx.viewport((self.width / 2).max(1), (self.height / 2).max(1));

        gl.use_program(Some(&self.bloom_extract_program));
        gl.active_texture(GL::TEXTURE0);
        gl.bind_texture(GL::TEXTURE_2D, Some(&self.targets.scene_texture));
        self.ctx.uniform_1i(self.post_uniforms.extract_texture.as_ref(), 0);
        self.ctx.uniform_1f(self.post_uniforms.threshold.as_ref(), BLOOM_THRESHOLD);
        gl.draw_arrays(GL::TRIANGLES, 0, 3);

        // === Pass 3/4: separable blur ===
        gl.use_program(Some(&self.blur_program));
        self.ctx.uniform_1i(self.post_uniforms.blur_texture.as_ref(), 0);
        for (src, dst, dir) in [(0, 1, (1.0, 0.0)), (1, 0, (0.0, 1.0))] {
            gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&self.targets.bloom_fbos[dst]));
            gl.bind_texture(GL::TEXTURE_2D, Some(&self.targets.bloom_textures[src]));
            self.ctx.uniform_2f(self.post_uniforms.direction.as_ref(), dir.0, dir.1);
            gl.draw_arrays(GL::TRIANGLES, 0, 3);
        }

        // === Pass 5: composite ===
        gl.bind_framebuffer(GL::FRAMEBUFFER, None);
        self.ctx.viewport(self.width, self.height);
        gl.use_program(Some(&self.composite_program));

        gl.active_texture(GL::TEXTURE0);
        gl.bind_texture(GL::TEXTURE_2D, Some(&self.targets.scene_texture));
        self.ctx.uniform_1i(self.post_uniforms.scene.as_ref(), 0);

        gl.active_texture(GL::TEXTURE1);
        gl.bind_texture(GL::TEXTURE_2D, Some(&self.targets.bloom_textures[0]));
        self.ctx.uniform_1i(self.post_uniforms.bloom.as_ref(), 1);

        self.ctx.uniform_1f(self.post_uniforms.bloom_strength.as_ref(), BLOOM_STRENGTH);
        self.ctx.uniform_1f(self.post_uniforms.vignette_strength.as_ref(), VIGNETTE_STRENGTH);
        gl.draw_arrays(GL::TRIANGLES, 0, 3);

        gl.active_texture(GL::TEXTURE0);
    }

    /// Recreate the offscreen targets for a new drawing-buffer size
    pub fn resize(&mut self, width: i32, height: i32) -> Result<()> {
        let width = width.max(1);
        let height = height.max(1);
        if width == self.width && height == self.height {
            return Ok(());
        }

        let targets = RenderTargets::new(&self.ctx, width, height)?;
        self.targets.delete(&self.ctx.gl);
        self.targets = targets;
        self.width = width;
        self.height = height;
        log::debug!("resized render targets to {}x{}", width, height);
        Ok(())
    }

    pub fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
        self.pixel_ratio = pixel_ratio;
    }
}
