use web_sys::{
    WebGl2RenderingContext as GL, WebGlBuffer, WebGlFramebuffer, WebGlProgram,
    WebGlRenderbuffer, WebGlShader, WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::error::{Result, SceneError};

/// Thin wrapper around a WebGL2 context with resource helpers
pub struct WebGLContext {
    pub gl: GL,
}

impl WebGLContext {
    pub fn new(gl: GL) -> Self {
        Self { gl }
    }

    pub fn compile_shader(&self, shader_type: u32, source: &str) -> Result<WebGlShader> {
        let gl = &self.gl;
        let shader = gl
            .create_shader(shader_type)
            .ok_or(SceneError::Resource("shader"))?;

        gl.shader_source(&shader, source);
        gl.compile_shader(&shader);

        let compiled = gl
            .get_shader_parameter(&shader, GL::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false);
        if compiled {
            Ok(shader)
        } else {
            let info = gl.get_shader_info_log(&shader).unwrap_or_default();
            gl.delete_shader(Some(&shader));
            Err(SceneError::ShaderCompile(info))
        }
    }

    pub fn create_program(&self, vert_src: &str, frag_src: &str) -> Result<WebGlProgram> {
        let gl = &self.gl;

        let vert = self.compile_shader(GL::VERTEX_SHADER, vert_src)?;
        let frag = self.compile_shader(GL::FRAGMENT_SHADER, frag_src)?;

        let program = gl.create_program().ok_or(SceneError::Resource("program"))?;
        gl.attach_shader(&program, &vert);
        gl.attach_shader(&program, &frag);
        gl.link_program(&program);

        gl.delete_shader(Some(&vert));
        gl.delete_shader(Some(&frag));

        let linked = gl
            .get_program_parameter(&program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        if linked {
            Ok(program)
        } else {
            let info = gl.get_program_info_log(&program).unwrap_or_default();
            gl.delete_program(Some(&program));
            Err(SceneError::ProgramLink(info))
        }
    }

    /// Create an array buffer and upload `data`
    pub fn create_buffer_f32(&self, data: &[f32], usage: u32) -> Result<WebGlBuffer> {
        let gl = &self.gl;
        let buffer = gl.create_buffer().ok_or(SceneError::Resource("buffer"))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));

        // Safety: the view is consumed by buffer_data before any allocation
        unsafe {
            let view = js_sys::Float32Array::view(data);
            gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &view, usage);
        }

        gl.bind_buffer(GL::ARRAY_BUFFER, None);
        Ok(buffer)
    }

    /// Overwrite the start of an existing array buffer
    pub fn update_buffer_f32(&self, buffer: &WebGlBuffer, data: &[f32]) {
        let gl = &self.gl;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));

        unsafe {
            let view = js_sys::Float32Array::view(data);
            gl.buffer_sub_data_with_i32_and_array_buffer_view(GL::ARRAY_BUFFER, 0, &view);
        }

        gl.bind_buffer(GL::ARRAY_BUFFER, None);
    }

    pub fn create_index_buffer(&self, data: &[u32], usage: u32) -> Result<WebGlBuffer> {
        let gl = &self.gl;
        let buffer = gl
            .create_buffer()
            .ok_or(SceneError::Resource("index buffer"))?;
        gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&buffer));

        unsafe {
            let view = js_sys::Uint32Array::view(data);
            gl.buffer_data_with_array_buffer_view(GL::ELEMENT_ARRAY_BUFFER, &view, usage);
        }

        // The element binding is VAO state, so leave it to the caller to unbind the VAO
        Ok(buffer)
    }

    pub fn create_vao(&self) -> Result<WebGlVertexArrayObject> {
        self.gl
            .create_vertex_array()
            .ok_or(SceneError::Resource("vertex array"))
    }

    /// Bind `buffer` and describe a float attribute read from it.
    ///
    /// `stride` and `offset` are in floats. A non-zero `divisor` makes the
    /// attribute per-instance.
    pub fn float_attribute(
        &self,
        buffer: &WebGlBuffer,
        location: u32,
        size: i32,
        stride: usize,
        offset: usize,
        divisor: u32,
    ) {
        let gl = &self.gl;
        let float_bytes = std::mem::size_of::<f32>();

        gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
        gl.enable_vertex_attrib_array(location);
        gl.vertex_attrib_pointer_with_i32(
            location,
            size,
            GL::FLOAT,
            false,
            (stride * float_bytes) as i32,
            (offset * float_bytes) as i32,
        );
        if divisor > 0 {
            gl.vertex_attrib_divisor(location, divisor);
        }
    }

    /// RGBA8 render target texture with linear filtering
    pub fn create_texture(&self, width: i32, height: i32) -> Result<WebGlTexture> {
        let gl = &self.gl;
        let texture = gl.create_texture().ok_or(SceneError::Resource("texture"))?;
        gl.bind_texture(GL::TEXTURE_2D, Some(&texture));

        gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            GL::TEXTURE_2D,
            0,
            GL::RGBA8 as i32,
            width.max(1),
            height.max(1),
            0,
            GL::RGBA,
            GL::UNSIGNED_BYTE,
            None,
        )
        .map_err(|e| SceneError::Texture(format!("{:?}", e)))?;

        for (param, value) in [
            (GL::TEXTURE_MIN_FILTER, GL::LINEAR),
            (GL::TEXTURE_MAG_FILTER, GL::LINEAR),
            (GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE),
            (GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE),
        ] {
            gl.tex_parameteri(GL::TEXTURE_2D, param, value as i32);
        }

        gl.bind_texture(GL::TEXTURE_2D, None);
        Ok(texture)
    }

    /// 24-bit depth storage for an offscreen scene target
    pub fn create_depth_renderbuffer(&self, width: i32, height: i32) -> Result<WebGlRenderbuffer> {
        let gl = &self.gl;
        let rbo = gl
            .create_renderbuffer()
            .ok_or(SceneError::Resource("renderbuffer"))?;
        gl.bind_renderbuffer(GL::RENDERBUFFER, Some(&rbo));
        gl.renderbuffer_storage(GL::RENDERBUFFER, GL::DEPTH_COMPONENT24, width.max(1), height.max(1));
        gl.bind_renderbuffer(GL::RENDERBUFFER, None);
        Ok(rbo)
    }

    /// Framebuffer rendering into `texture`, with an optional depth attachment
    pub fn create_framebuffer(
        &self,
        texture: &WebGlTexture,
        depth: Option<&WebGlRenderbuffer>,
    ) -> Result<WebGlFramebuffer> {
        let gl = &self.gl;
        let fbo = gl
            .create_framebuffer()
            .ok_or(SceneError::Resource("framebuffer"))?;
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&fbo));

        gl.framebuffer_texture_2d(
            GL::FRAMEBUFFER,
            GL::COLOR_ATTACHMENT0,
            GL::TEXTURE_2D,
            Some(texture),
            0,
        );

        if let Some(rbo) = depth {
            gl.framebuffer_renderbuffer(GL::FRAMEBUFFER, GL::DEPTH_ATTACHMENT, GL::RENDERBUFFER, Some(rbo));
        }

        let status = gl.check_framebuffer_status(GL::FRAMEBUFFER);
        gl.bind_framebuffer(GL::FRAMEBUFFER, None);

        if status != GL::FRAMEBUFFER_COMPLETE {
            return Err(SceneError::FramebufferIncomplete(status));
        }
        Ok(fbo)
    }

    pub fn get_uniform_location(&self, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
        self.gl.get_uniform_location(program, name)
    }

    pub fn uniform_1f(&self, location: Option<&WebGlUniformLocation>, value: f32) {
        self.gl.uniform1f(location, value);
    }

    pub fn uniform_2f(&self, location: Option<&WebGlUniformLocation>, x: f32, y: f32) {
        self.gl.uniform2f(location, x, y);
    }

    pub fn uniform_3f(&self, location: Option<&WebGlUniformLocation>, v: [f32; 3]) {
        self.gl.uniform3f(location, v[0], v[1], v[2]);
    }

    pub fn uniform_matrix4fv(&self, location: Option<&WebGlUniformLocation>, data: &[f32; 16]) {
        self.gl.uniform_matrix4fv_with_f32_array(location, false, data);
    }

    pub fn uniform_1i(&self, location: Option<&WebGlUniformLocation>, value: i32) {
        self.gl.uniform1i(location, value);
    }

    pub fn clear(&self, rgb: [f32; 3], a: f32) {
        self.gl.clear_color(rgb[0], rgb[1], rgb[2], a);
        self.gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
    }

    pub fn enable_depth_test(&self) {
        self.gl.enable(GL::DEPTH_TEST);
        self.gl.depth_func(GL::LEQUAL);
    }

    pub fn disable_blending(&self) {
        self.gl.disable(GL::BLEND);
    }

    /// Additive blending for glowing points and bloom composite
    pub fn enable_additive_blending(&self) {
        self.gl.enable(GL::BLEND);
        self.gl.blend_func(GL::SRC_ALPHA, GL::ONE);
    }

    pub fn viewport(&self, width: i32, height: i32) {
        self.gl.viewport(0, 0, width, height);
    }
}
