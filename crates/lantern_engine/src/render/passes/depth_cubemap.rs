//! Point-light shadow depth-cubemap pass
//!
//! Renders the scene six times (one per cubemap face) from the first point
//! light's position, via a geometry shader that fans each triangle out to
//! all six faces. Fragment depth is written as distance from the light,
//! normalized by `farPlane`.
//!
//! The whole pass is skipped when the scene has no point lights.

use crate::render::api::{
    ClearFlags, FramebufferAttachment, FramebufferId, GraphicsApi, ProgramDesc, ProgramId,
    TextureId,
};
use crate::render::context::FrameContext;
use crate::render::{RenderError, RenderPass, RenderResult};
use crate::scene::Scene;

const PROGRAM: ProgramDesc = ProgramDesc {
    name: "point_depth",
    vertex: "shaders/depth_cubemap.vert",
    fragment: "shaders/depth_cubemap.frag",
    geometry: Some("shaders/depth_cubemap.geom"),
};

/// Depth-only pass for the shadow-casting point light's cubemap
#[derive(Debug)]
pub struct PointDepthPass {
    width: u32,
    height: u32,
    far_plane: f32,
    program: Option<ProgramId>,
    depth_cubemap: Option<TextureId>,
    framebuffer: Option<FramebufferId>,
}

impl PointDepthPass {
    /// Pass rendering into `width` x `height` cubemap faces
    pub fn new(width: u32, height: u32, far_plane: f32) -> Self {
        Self {
            width,
            height,
            far_plane,
            program: None,
            depth_cubemap: None,
            framebuffer: None,
        }
    }

    /// The depth cubemap written by this pass
    ///
    /// `None` before `prepare`, and also when the scene has no point
    /// lights (the pass then never acquires resources).
    pub fn depth_cubemap(&self) -> Option<TextureId> {
        self.depth_cubemap
    }

    fn not_prepared() -> RenderError {
        RenderError::RenderingFailed("point depth pass was not prepared".to_string())
    }
}

impl RenderPass for PointDepthPass {
    fn prepare(&mut self, scene: &Scene, gfx: &mut dyn GraphicsApi) -> RenderResult<()> {
        if scene.shadow_point_light_position().is_none() {
            return Ok(());
        }

        let program = gfx.create_program(&PROGRAM)?;
        self.program = Some(program);
        let cubemap = gfx.create_depth_cubemap(self.width, self.height)?;
        self.depth_cubemap = Some(cubemap);
        self.framebuffer =
            Some(gfx.create_framebuffer(FramebufferAttachment::DepthCubemap(cubemap))?);

        gfx.use_program(program);
        gfx.upload_float("farPlane", self.far_plane);
        Ok(())
    }

    fn render(
        &mut self,
        scene: &Scene,
        ctx: &FrameContext,
        gfx: &mut dyn GraphicsApi,
    ) -> RenderResult<()> {
        let Some(faces) = &ctx.point_light_space else {
            return Ok(());
        };
        let program = self.program.ok_or_else(Self::not_prepared)?;
        let framebuffer = self.framebuffer.ok_or_else(Self::not_prepared)?;

        gfx.use_program(program);
        // The light may have moved since the last frame.
        gfx.upload_vec3("lightPos", ctx.point_light_position.coords);
        gfx.set_viewport(self.width, self.height);
        gfx.bind_framebuffer(Some(framebuffer));
        gfx.clear(ClearFlags::DEPTH);

        for (i, face) in faces.iter().enumerate() {
            gfx.upload_mat4(&format!("shadowMatrices[{i}]"), face);
        }

        for root in scene.graph.roots() {
            scene.graph.render_depth_only(*root, gfx)?;
        }

        gfx.bind_framebuffer(None);
        gfx.set_viewport(ctx.viewport.0, ctx.viewport.1);
        Ok(())
    }

    fn teardown(&mut self, gfx: &mut dyn GraphicsApi) {
        if let Some(fbo) = self.framebuffer.take() {
            gfx.destroy_framebuffer(fbo);
        }
        if let Some(tex) = self.depth_cubemap.take() {
            gfx.destroy_texture(tex);
        }
        if let Some(program) = self.program.take() {
            gfx.destroy_program(program);
        }
    }
}
