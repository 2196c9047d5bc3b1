//! Frame pipeline: fixed pass ordering and shared-state plumbing
//!
//! Per frame the pipeline refreshes the light-space matrices in the
//! [`FrameContext`] and then runs, in order: directional depth, point
//! depth, off-screen lit geometry, light markers, skybox, composite. The
//! two depth passes must complete before the lit pass samples their
//! textures, and the composite runs last because it reads the colour
//! target everything else wrote.

use log::{debug, info};

use crate::config::RendererConfig;
use crate::render::api::{ClearFlags, GraphicsApi};
use crate::render::context::{dir_light_space, point_light_space_faces, FrameContext};
use crate::render::passes::{
    ColorTargetPass, CompositePass, DirectionalDepthPass, LightMarkersPass, LightingMode, LitPass,
    PointDepthPass, SkyboxPass,
};
use crate::render::{RenderError, RenderPass, RenderResult};
use crate::scene::Scene;

/// Owns the passes and runs them in order
#[derive(Debug)]
pub struct RenderPipeline {
    config: RendererConfig,
    dir_depth: Option<DirectionalDepthPass>,
    point_depth: Option<PointDepthPass>,
    color_target: ColorTargetPass,
    lit: Option<LitPass>,
    markers: LightMarkersPass,
    skybox: SkyboxPass,
    composite: Option<CompositePass>,
}

impl RenderPipeline {
    /// Pipeline configured but without GPU resources; call
    /// [`RenderPipeline::prepare`] before the first frame
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            config: config.clone(),
            dir_depth: None,
            point_depth: None,
            color_target: ColorTargetPass::new(),
            lit: None,
            markers: LightMarkersPass::new(),
            skybox: SkyboxPass::new(),
            composite: None,
        }
    }

    /// Acquire every pass's GPU resources
    ///
    /// The lit pass is built after the depth passes and the skybox pass
    /// because it needs their depth-texture and cubemap handles.
    pub fn prepare(&mut self, scene: &Scene, gfx: &mut dyn GraphicsApi) -> RenderResult<()> {
        let shadow = &self.config.shadow;

        let mode = if shadow.enabled {
            let mut dir_depth = DirectionalDepthPass::new(shadow.map_width, shadow.map_height);
            dir_depth.prepare(scene, gfx)?;
            let mut point_depth =
                PointDepthPass::new(shadow.map_width, shadow.map_height, shadow.far_plane);
            point_depth.prepare(scene, gfx)?;

            let dir_shadow_map = dir_depth.depth_texture().ok_or_else(|| {
                RenderError::InitializationFailed(
                    "directional depth pass produced no shadow map".to_string(),
                )
            })?;
            let mode = LightingMode::Shadowed {
                dir_shadow_map,
                point_shadow_cubemap: point_depth.depth_cubemap(),
                far_plane: shadow.far_plane,
            };
            self.dir_depth = Some(dir_depth);
            self.point_depth = Some(point_depth);
            mode
        } else {
            LightingMode::Basic
        };

        self.markers.prepare(scene, gfx)?;
        self.skybox.prepare(scene, gfx)?;

        let mut lit = LitPass::new(mode, self.skybox.cubemap());
        lit.prepare(scene, gfx)?;
        self.lit = Some(lit);

        self.color_target
            .prepare(self.config.window.width, self.config.window.height, gfx)?;
        let source = self.color_target.color_texture().ok_or_else(|| {
            RenderError::InitializationFailed("colour target produced no texture".to_string())
        })?;
        let mut composite = CompositePass::new(source);
        composite.prepare(scene, gfx)?;
        self.composite = Some(composite);

        info!(
            "render pipeline prepared (shadows: {}, skybox: {})",
            shadow.enabled,
            scene.skybox.is_some()
        );
        Ok(())
    }

    /// Render one frame
    ///
    /// Refreshes the light-space matrices in `ctx` from the scene's
    /// current lights, then runs the passes in pipeline order.
    pub fn render_frame(
        &mut self,
        scene: &Scene,
        ctx: &mut FrameContext,
        gfx: &mut dyn GraphicsApi,
    ) -> RenderResult<()> {
        ctx.dir_light_space = dir_light_space(&scene.dir_light, &self.config.shadow);
        ctx.far_plane = self.config.shadow.far_plane;
        match scene.shadow_point_light_position() {
            Some(position) => {
                ctx.point_light_position = position;
                ctx.point_light_space = Some(point_light_space_faces(position, &self.config.shadow));
            }
            None => ctx.point_light_space = None,
        }

        if let Some(pass) = &mut self.dir_depth {
            pass.render(scene, ctx, gfx)?;
        }
        if let Some(pass) = &mut self.point_depth {
            pass.render(scene, ctx, gfx)?;
        }

        self.color_target.bind(gfx)?;
        gfx.clear(ClearFlags::COLOR | ClearFlags::DEPTH);

        let lit = self.lit.as_mut().ok_or_else(|| {
            RenderError::RenderingFailed("pipeline was not prepared".to_string())
        })?;
        lit.render(scene, ctx, gfx)?;
        self.markers.render(scene, ctx, gfx)?;
        self.skybox.render(scene, ctx, gfx)?;

        let composite = self.composite.as_mut().ok_or_else(|| {
            RenderError::RenderingFailed("pipeline was not prepared".to_string())
        })?;
        composite.render(scene, ctx, gfx)?;

        debug!("frame rendered with effect {:?}", ctx.effect);
        Ok(())
    }

    /// Release pass resources in reverse acquisition order
    pub fn teardown(&mut self, gfx: &mut dyn GraphicsApi) {
        if let Some(mut composite) = self.composite.take() {
            composite.teardown(gfx);
        }
        self.color_target.teardown(gfx);
        if let Some(mut lit) = self.lit.take() {
            lit.teardown(gfx);
        }
        self.skybox.teardown(gfx);
        self.markers.teardown(gfx);
        if let Some(mut pass) = self.point_depth.take() {
            pass.teardown(gfx);
        }
        if let Some(mut pass) = self.dir_depth.take() {
            pass.teardown(gfx);
        }
    }
}
