//! Directional-light shadow depth pass
//!
//! Renders the scene into a depth texture from the directional light's
//! orthographic viewpoint. Front faces are culled while drawing so that
//! shadow depths come from back faces, which avoids the peter-panning
//! artifact of surfaces detaching from their shadows.

use crate::render::api::{
    ClearFlags, CullFace, FramebufferAttachment, FramebufferId, GraphicsApi, ProgramDesc,
    ProgramId, TextureId,
};
use crate::render::context::FrameContext;
use crate::render::{RenderError, RenderPass, RenderResult};
use crate::scene::Scene;

const PROGRAM: ProgramDesc = ProgramDesc {
    name: "dir_depth",
    vertex: "shaders/depth_map.vert",
    fragment: "shaders/depth_map.frag",
    geometry: None,
};

/// Depth-only pass for the directional light's shadow map
#[derive(Debug)]
pub struct DirectionalDepthPass {
    width: u32,
    height: u32,
    program: Option<ProgramId>,
    depth_texture: Option<TextureId>,
    framebuffer: Option<FramebufferId>,
}

impl DirectionalDepthPass {
    /// Pass rendering into a `width` x `height` depth texture
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            program: None,
            depth_texture: None,
            framebuffer: None,
        }
    }

    /// The shadow map written by this pass (available after `prepare`)
    pub fn depth_texture(&self) -> Option<TextureId> {
        self.depth_texture
    }

    fn not_prepared() -> RenderError {
        RenderError::RenderingFailed("directional depth pass was not prepared".to_string())
    }
}

impl RenderPass for DirectionalDepthPass {
    fn prepare(&mut self, _scene: &Scene, gfx: &mut dyn GraphicsApi) -> RenderResult<()> {
        self.program = Some(gfx.create_program(&PROGRAM)?);
        let depth = gfx.create_depth_texture(self.width, self.height)?;
        self.depth_texture = Some(depth);
        self.framebuffer = Some(gfx.create_framebuffer(FramebufferAttachment::Depth(depth))?);
        Ok(())
    }

    fn render(
        &mut self,
        scene: &Scene,
        ctx: &FrameContext,
        gfx: &mut dyn GraphicsApi,
    ) -> RenderResult<()> {
        let program = self.program.ok_or_else(Self::not_prepared)?;
        let framebuffer = self.framebuffer.ok_or_else(Self::not_prepared)?;

        gfx.set_cull_face(CullFace::Front);
        gfx.use_program(program);
        gfx.upload_mat4("lightSpace_m", &ctx.dir_light_space);

        gfx.set_viewport(self.width, self.height);
        gfx.bind_framebuffer(Some(framebuffer));
        gfx.clear(ClearFlags::DEPTH);

        for root in scene.graph.roots() {
            scene.graph.render_depth_only(*root, gfx)?;
        }

        gfx.bind_framebuffer(None);
        gfx.set_viewport(ctx.viewport.0, ctx.viewport.1);
        gfx.set_cull_face(CullFace::Back);
        Ok(())
    }

    fn teardown(&mut self, gfx: &mut dyn GraphicsApi) {
        if let Some(fbo) = self.framebuffer.take() {
            gfx.destroy_framebuffer(fbo);
        }
        if let Some(tex) = self.depth_texture.take() {
            gfx.destroy_texture(tex);
        }
        if let Some(program) = self.program.take() {
            gfx.destroy_program(program);
        }
    }
}
