//! Phong-lit geometry pass
//!
//! Uploads the scene's lights, then draws the graph with full materials.
//! In [`LightingMode::Shadowed`] the pass additionally samples the
//! directional shadow map and (when present) the point-light depth
//! cubemap; the shadow samplers sit on the texture units directly after
//! each drawable's material textures, so the sampler unit is re-uploaded
//! per drawable. Drawables with a reflective material also get the skybox
//! cubemap bound, on the unit after the shadow samplers.

use crate::render::api::{GraphicsApi, ProgramDesc, ProgramId, TextureId, TextureTarget};
use crate::render::context::FrameContext;
use crate::render::{RenderError, RenderPass, RenderResult};
use crate::scene::Scene;

const PHONG_PROGRAM: ProgramDesc = ProgramDesc {
    name: "phong",
    vertex: "shaders/phong.vert",
    fragment: "shaders/phong.frag",
    geometry: None,
};

const PHONG_SHADOWED_PROGRAM: ProgramDesc = ProgramDesc {
    name: "phong_shadowed",
    vertex: "shaders/phong_shadowed.vert",
    fragment: "shaders/phong_shadowed.frag",
    geometry: None,
};

/// Whether the lit pass samples shadow maps
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightingMode {
    /// Phong lighting only
    Basic,
    /// Phong lighting plus directional and point-light shadows
    Shadowed {
        /// Directional shadow map from the depth pass
        dir_shadow_map: TextureId,
        /// Point-light depth cubemap, absent when the scene has no point
        /// lights
        point_shadow_cubemap: Option<TextureId>,
        /// Far plane used to un-normalize cubemap depth
        far_plane: f32,
    },
}

/// Main geometry pass
#[derive(Debug)]
pub struct LitPass {
    mode: LightingMode,
    environment: Option<TextureId>,
    program: Option<ProgramId>,
}

impl LitPass {
    /// Lit pass in the given mode
    ///
    /// `environment` is the skybox cubemap, sampled by drawables with a
    /// reflective material; pass `None` when the scene has no skybox.
    pub fn new(mode: LightingMode, environment: Option<TextureId>) -> Self {
        Self {
            mode,
            environment,
            program: None,
        }
    }

    fn upload_scene_lights(scene: &Scene, gfx: &mut dyn GraphicsApi) {
        gfx.upload_vec3("I_a", scene.ambient_intensity);
        scene.dir_light.upload(gfx, "dirLight");
        for (i, light) in scene.point_lights.iter().enumerate() {
            light.upload(gfx, &format!("pointLights[{i}]"));
        }
    }
}

impl RenderPass for LitPass {
    fn prepare(&mut self, scene: &Scene, gfx: &mut dyn GraphicsApi) -> RenderResult<()> {
        let desc = match self.mode {
            LightingMode::Basic => &PHONG_PROGRAM,
            LightingMode::Shadowed { .. } => &PHONG_SHADOWED_PROGRAM,
        };
        let program = gfx.create_program(desc)?;
        self.program = Some(program);

        gfx.use_program(program);
        Self::upload_scene_lights(scene, gfx);
        if let LightingMode::Shadowed { far_plane, .. } = self.mode {
            gfx.upload_float("farPlane", far_plane);
        }
        Ok(())
    }

    fn render(
        &mut self,
        scene: &Scene,
        ctx: &FrameContext,
        gfx: &mut dyn GraphicsApi,
    ) -> RenderResult<()> {
        let program = self.program.ok_or_else(|| {
            RenderError::RenderingFailed("lit pass was not prepared".to_string())
        })?;

        gfx.use_program(program);
        gfx.upload_vec3("wc_cameraPos", ctx.camera_position.coords);
        scene
            .flashlight
            .upload(gfx, "spotLight", ctx.camera_position, ctx.camera_front);
        // Lights may have moved since prepare.
        Self::upload_scene_lights(scene, gfx);
        if let LightingMode::Shadowed { .. } = self.mode {
            gfx.upload_mat4("lightSpace_m", &ctx.dir_light_space);
        }

        let mode = self.mode;
        let environment = self.environment;
        for root in scene.graph.roots() {
            scene.graph.render_with(*root, ctx, gfx, &mut |shape, gfx| {
                // Shadow and reflection samplers go on the units just past
                // the drawable's material textures.
                let mut unit = shape.material.texture_units_used();
                if let LightingMode::Shadowed {
                    dir_shadow_map,
                    point_shadow_cubemap,
                    ..
                } = mode
                {
                    gfx.upload_int("shadowMap", unit as i32);
                    gfx.bind_texture(unit, TextureTarget::Texture2d, dir_shadow_map);
                    unit += 1;
                    if let Some(cubemap) = point_shadow_cubemap {
                        gfx.upload_int("shadowCubeMap", unit as i32);
                        gfx.bind_texture(unit, TextureTarget::CubeMap, cubemap);
                        unit += 1;
                    }
                }
                if shape.material.reflectivity > 0.0 {
                    if let Some(env) = environment {
                        gfx.upload_int("skybox", unit as i32);
                        gfx.bind_texture(unit, TextureTarget::CubeMap, env);
                    }
                }
            })?;
        }
        Ok(())
    }

    fn teardown(&mut self, gfx: &mut dyn GraphicsApi) {
        if let Some(program) = self.program.take() {
            gfx.destroy_program(program);
        }
    }
}
