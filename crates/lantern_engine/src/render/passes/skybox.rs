//! Skybox pass
//!
//! Drawn after the lit geometry with a less-or-equal depth test so it only
//! fills pixels nothing else covered. The view matrix is reduced to its
//! rotation part so the box stays centered on the camera.

use crate::foundation::math::{Mat3, Mat4};
use crate::render::api::{
    DepthFunc, GraphicsApi, MeshId, ProgramDesc, ProgramId, TextureId, TextureTarget,
};
use crate::render::context::FrameContext;
use crate::render::{RenderError, RenderPass, RenderResult};
use crate::scene::Scene;
use crate::shapes::ShapeKind;

const PROGRAM: ProgramDesc = ProgramDesc {
    name: "skybox",
    vertex: "shaders/skybox.vert",
    fragment: "shaders/skybox.frag",
    geometry: None,
};

/// Background cubemap pass (no-op when the scene has no skybox)
#[derive(Debug, Default)]
pub struct SkyboxPass {
    program: Option<ProgramId>,
    cube: Option<MeshId>,
    cubemap: Option<TextureId>,
}

impl SkyboxPass {
    /// Pass with no resources yet
    pub fn new() -> Self {
        Self::default()
    }

    /// The skybox cubemap, for passes that sample the environment
    ///
    /// `None` before `prepare` and when the scene has no skybox.
    pub fn cubemap(&self) -> Option<TextureId> {
        self.cubemap
    }
}

impl RenderPass for SkyboxPass {
    fn prepare(&mut self, scene: &Scene, gfx: &mut dyn GraphicsApi) -> RenderResult<()> {
        let Some(skybox) = &scene.skybox else {
            return Ok(());
        };
        self.program = Some(gfx.create_program(&PROGRAM)?);
        self.cube = Some(gfx.create_mesh(&ShapeKind::SkyboxCube)?);
        self.cubemap = Some(gfx.load_cubemap(&skybox.face_paths)?);
        Ok(())
    }

    fn render(
        &mut self,
        scene: &Scene,
        ctx: &FrameContext,
        gfx: &mut dyn GraphicsApi,
    ) -> RenderResult<()> {
        if scene.skybox.is_none() {
            return Ok(());
        }
        let (Some(program), Some(cube), Some(cubemap)) = (self.program, self.cube, self.cubemap)
        else {
            return Err(RenderError::RenderingFailed(
                "skybox pass was not prepared".to_string(),
            ));
        };

        gfx.set_depth_func(DepthFunc::LessEqual);
        gfx.use_program(program);

        // Strip the translation out of the view matrix.
        let rotation: Mat3 = ctx.view.fixed_view::<3, 3>(0, 0).into_owned();
        let vp = ctx.projection * rotation.to_homogeneous();
        gfx.upload_mat4("viewProjection_m", &vp);

        gfx.bind_texture(0, TextureTarget::CubeMap, cubemap);
        gfx.draw_mesh(cube)?;

        gfx.set_depth_func(DepthFunc::Less);
        Ok(())
    }

    fn teardown(&mut self, gfx: &mut dyn GraphicsApi) {
        if let Some(cubemap) = self.cubemap.take() {
            gfx.destroy_texture(cubemap);
        }
        if let Some(cube) = self.cube.take() {
            gfx.destroy_mesh(cube);
        }
        if let Some(program) = self.program.take() {
            gfx.destroy_program(program);
        }
    }
}
