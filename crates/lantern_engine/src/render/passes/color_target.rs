//! Off-screen colour target
//!
//! Owns the framebuffer the lit, marker and skybox passes render into.
//! Not a pipeline pass itself: the pipeline binds it before those passes
//! and the composite pass samples its colour texture afterwards.

use crate::render::api::{
    FramebufferAttachment, FramebufferId, GraphicsApi, TextureId,
};
use crate::render::{RenderError, RenderResult};

/// Colour texture plus depth-stencil framebuffer at window resolution
#[derive(Debug, Default)]
pub struct ColorTargetPass {
    color_texture: Option<TextureId>,
    framebuffer: Option<FramebufferId>,
}

impl ColorTargetPass {
    /// Target with no resources yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the colour texture and framebuffer at the given size
    pub fn prepare(&mut self, width: u32, height: u32, gfx: &mut dyn GraphicsApi) -> RenderResult<()> {
        let color = gfx.create_color_texture(width, height)?;
        self.color_texture = Some(color);
        self.framebuffer =
            Some(gfx.create_framebuffer(FramebufferAttachment::ColorWithDepthStencil(color))?);
        Ok(())
    }

    /// Make this target the render destination
    pub fn bind(&self, gfx: &mut dyn GraphicsApi) -> RenderResult<()> {
        let framebuffer = self.framebuffer.ok_or_else(|| {
            RenderError::RenderingFailed("colour target was not prepared".to_string())
        })?;
        gfx.bind_framebuffer(Some(framebuffer));
        Ok(())
    }

    /// The texture the scene is rendered into
    pub fn color_texture(&self) -> Option<TextureId> {
        self.color_texture
    }

    /// Release the framebuffer and texture
    pub fn teardown(&mut self, gfx: &mut dyn GraphicsApi) {
        if let Some(fbo) = self.framebuffer.take() {
            gfx.destroy_framebuffer(fbo);
        }
        if let Some(tex) = self.color_texture.take() {
            gfx.destroy_texture(tex);
        }
    }
}
