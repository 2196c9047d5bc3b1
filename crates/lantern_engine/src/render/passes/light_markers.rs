//! Point-light marker pass
//!
//! Draws a small unlit cube at each point light's position, in the light's
//! own colour, so light placement is visible while editing a scene.

use crate::foundation::math::Mat4;
use crate::render::api::{GraphicsApi, MeshId, ProgramDesc, ProgramId};
use crate::render::context::FrameContext;
use crate::render::{RenderError, RenderPass, RenderResult};
use crate::scene::Scene;
use crate::shapes::ShapeKind;

const PROGRAM: ProgramDesc = ProgramDesc {
    name: "light_marker",
    vertex: "shaders/light_marker.vert",
    fragment: "shaders/light_marker.frag",
    geometry: None,
};

const MARKER_SCALE: f32 = 0.2;

/// Unlit cube markers for point lights
#[derive(Debug, Default)]
pub struct LightMarkersPass {
    program: Option<ProgramId>,
    cube: Option<MeshId>,
}

impl LightMarkersPass {
    /// Pass with no resources yet
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderPass for LightMarkersPass {
    fn prepare(&mut self, _scene: &Scene, gfx: &mut dyn GraphicsApi) -> RenderResult<()> {
        self.program = Some(gfx.create_program(&PROGRAM)?);
        self.cube = Some(gfx.create_mesh(&ShapeKind::Cube)?);
        Ok(())
    }

    fn render(
        &mut self,
        scene: &Scene,
        ctx: &FrameContext,
        gfx: &mut dyn GraphicsApi,
    ) -> RenderResult<()> {
        let (Some(program), Some(cube)) = (self.program, self.cube) else {
            return Err(RenderError::RenderingFailed(
                "light marker pass was not prepared".to_string(),
            ));
        };

        gfx.use_program(program);
        for light in &scene.point_lights {
            gfx.upload_vec3("lightColour", light.colour);
            let model = Mat4::new_translation(&light.position.coords)
                * Mat4::new_scaling(MARKER_SCALE);
            let mvp = ctx.projection * ctx.view * model;
            gfx.upload_mat4("mvp_m", &mvp);
            gfx.draw_mesh(cube)?;
        }
        Ok(())
    }

    fn teardown(&mut self, gfx: &mut dyn GraphicsApi) {
        if let Some(cube) = self.cube.take() {
            gfx.destroy_mesh(cube);
        }
        if let Some(program) = self.program.take() {
            gfx.destroy_program(program);
        }
    }
}
