//! Full-screen composite pass
//!
//! Draws the off-screen colour texture onto the default framebuffer as a
//! screen-sized quad, applying the frame's post-processing effect. Colour
//! remaps are selected by effect id alone; kernel effects additionally
//! upload their 3x3 kernel and share one sentinel id.

use crate::render::api::{
    ClearFlags, GraphicsApi, MeshId, ProgramDesc, ProgramId, TextureId, TextureTarget,
};
use crate::render::context::FrameContext;
use crate::render::{RenderError, RenderPass, RenderResult};
use crate::scene::Scene;
use crate::shapes::ShapeKind;

const PROGRAM: ProgramDesc = ProgramDesc {
    name: "composite",
    vertex: "shaders/composite.vert",
    fragment: "shaders/composite.frag",
    geometry: None,
};

/// Screen-quad pass writing the final image to the default framebuffer
#[derive(Debug)]
pub struct CompositePass {
    source: TextureId,
    program: Option<ProgramId>,
    quad: Option<MeshId>,
}

impl CompositePass {
    /// Composite sampling from `source` (the off-screen colour texture)
    pub fn new(source: TextureId) -> Self {
        Self {
            source,
            program: None,
            quad: None,
        }
    }
}

impl RenderPass for CompositePass {
    fn prepare(&mut self, _scene: &Scene, gfx: &mut dyn GraphicsApi) -> RenderResult<()> {
        let program = gfx.create_program(&PROGRAM)?;
        self.program = Some(program);
        self.quad = Some(gfx.create_mesh(&ShapeKind::ScreenQuad)?);

        gfx.use_program(program);
        gfx.upload_int("screenTexture", 0);
        Ok(())
    }

    fn render(
        &mut self,
        _scene: &Scene,
        ctx: &FrameContext,
        gfx: &mut dyn GraphicsApi,
    ) -> RenderResult<()> {
        let (Some(program), Some(quad)) = (self.program, self.quad) else {
            return Err(RenderError::RenderingFailed(
                "composite pass was not prepared".to_string(),
            ));
        };

        gfx.bind_framebuffer(None);
        // The quad must never be discarded by leftover depth.
        gfx.set_depth_test(false);
        gfx.clear(ClearFlags::COLOR);

        gfx.use_program(program);
        if let Some(kernel) = ctx.effect.kernel() {
            gfx.upload_float_array("kernel3x3", &kernel);
        }
        gfx.upload_int("effectToUse", ctx.effect.wire_id());

        gfx.bind_texture(0, TextureTarget::Texture2d, self.source);
        gfx.draw_mesh(quad)?;

        gfx.set_depth_test(true);
        Ok(())
    }

    fn teardown(&mut self, gfx: &mut dyn GraphicsApi) {
        if let Some(quad) = self.quad.take() {
            gfx.destroy_mesh(quad);
        }
        if let Some(program) = self.program.take() {
            gfx.destroy_program(program);
        }
    }
}
