//! Rendering: collaborator interfaces, passes and the frame pipeline
//!
//! The pipeline runs a fixed pass order per frame: directional shadow
//! depth, point-light depth cubemap, lit geometry into an off-screen
//! colour target, light markers, skybox, then a full-screen composite to
//! the default framebuffer. Each pass implements [`RenderPass`] and talks
//! to the graphics device only through [`api::GraphicsApi`].

pub mod api;
pub mod camera;
pub mod context;
pub mod passes;
pub mod pipeline;
pub mod post;
pub mod registry;

use thiserror::Error;

use crate::scene::Scene;
use api::GraphicsApi;
use context::FrameContext;

/// Errors that can occur during rendering operations
#[derive(Error, Debug)]
pub enum RenderError {
    /// Renderer or pass initialization failed
    #[error("Render initialization failed: {0}")]
    InitializationFailed(String),

    /// Frame rendering failed
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),

    /// Resource creation failed
    #[error("Resource creation failed: {0}")]
    ResourceCreationFailed(String),

    /// Graphics backend rejected a submission
    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

/// One stage of the frame pipeline
///
/// `prepare` acquires GPU resources once, before the first frame; `render`
/// runs every frame in pipeline order; `teardown` releases what `prepare`
/// acquired. A pass must leave global device state (cull face, depth
/// function, bound framebuffer) the way the next pass expects it, which
/// for this pipeline means restoring the defaults it changed.
pub trait RenderPass {
    /// Acquire programs, textures and framebuffers for this pass
    fn prepare(&mut self, scene: &Scene, gfx: &mut dyn GraphicsApi) -> RenderResult<()>;

    /// Record this pass's portion of the frame
    fn render(
        &mut self,
        scene: &Scene,
        ctx: &FrameContext,
        gfx: &mut dyn GraphicsApi,
    ) -> RenderResult<()>;

    /// Release resources acquired in `prepare`
    fn teardown(&mut self, gfx: &mut dyn GraphicsApi);
}
