//! Engine loop: input, per-frame context assembly and pipeline driving

use log::info;
use thiserror::Error;

use crate::config::{ConfigError, RendererConfig};
use crate::foundation::math::{deg_to_rad, perspective, Mat4, Point3, Vec3};
use crate::foundation::time::Timer;
use crate::input::{EdgeToggle, KeyCode, KeyState};
use crate::render::api::{GraphicsApi, WindowApi};
use crate::render::camera::Camera;
use crate::render::context::FrameContext;
use crate::render::pipeline::RenderPipeline;
use crate::render::post::PostEffect;
use crate::render::registry::MeshRegistry;
use crate::render::RenderError;
use crate::scene::graph::SceneGraphError;
use crate::scene::Scene;

/// Top-level engine failures
#[derive(Error, Debug)]
pub enum EngineError {
    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline setup or frame rendering failed
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Scene construction failed
    #[error("scene graph error: {0}")]
    SceneGraph(#[from] SceneGraphError),
}

/// Owns the scene, camera, pipeline and both collaborators, and runs the
/// frame loop until the window asks to close
pub struct Engine<G: GraphicsApi, W: WindowApi> {
    config: RendererConfig,
    gfx: G,
    window: W,
    registry: MeshRegistry,
    scene: Scene,
    camera: Camera,
    pipeline: RenderPipeline,
    effect: PostEffect,
    flashlight_toggle: EdgeToggle,
    closing: bool,
}

impl<G: GraphicsApi, W: WindowApi> Engine<G, W> {
    /// Validate the configuration and prepare the pipeline
    ///
    /// The registry is handed over so the engine can release scene meshes
    /// at shutdown together with the pipeline's own resources.
    pub fn new(
        config: RendererConfig,
        mut gfx: G,
        window: W,
        registry: MeshRegistry,
        scene: Scene,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let camera = Camera::new(
            Point3::new(0.0, 0.0, 3.0),
            Vec3::new(0.0, 0.0, -1.0),
            &config.camera,
        );
        let mut pipeline = RenderPipeline::new(&config);
        pipeline.prepare(&scene, &mut gfx)?;

        Ok(Self {
            config,
            gfx,
            window,
            registry,
            scene,
            camera,
            pipeline,
            effect: PostEffect::None,
            flashlight_toggle: EdgeToggle::new(),
            closing: false,
        })
    }

    /// Run the frame loop until the window closes, then release resources
    pub fn run(&mut self) -> Result<(), EngineError> {
        let mut timer = Timer::new();
        info!("engine loop starting");

        while !self.window.should_close() && !self.closing {
            let delta = timer.delta_time();
            self.process_input(delta);

            let mut ctx = self.frame_context();
            self.pipeline
                .render_frame(&self.scene, &mut ctx, &mut self.gfx)?;

            self.window.swap_buffers();
            self.window.poll_events();
        }

        self.shutdown();
        Ok(())
    }

    /// Release pipeline resources, then the scene's meshes
    pub fn shutdown(&mut self) {
        self.pipeline.teardown(&mut self.gfx);
        self.registry.teardown(&mut self.gfx);
        info!("engine shut down");
    }

    /// The scene being rendered
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the scene between frames
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The camera driven by keyboard input
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The currently selected post-processing effect
    pub fn effect(&self) -> PostEffect {
        self.effect
    }

    /// The graphics collaborator (tests inspect the recording backend)
    pub fn graphics(&self) -> &G {
        &self.gfx
    }

    /// The windowing collaborator
    pub fn window(&self) -> &W {
        &self.window
    }

    fn frame_context(&self) -> FrameContext {
        let (width, height) = self.window.framebuffer_size();
        let aspect = width as f32 / height.max(1) as f32;
        FrameContext {
            view: self.camera.view_matrix(),
            projection: perspective(
                deg_to_rad(self.camera.fov_deg),
                aspect,
                self.config.camera.near,
                self.config.camera.far,
            ),
            camera_position: self.camera.position,
            camera_front: self.camera.front,
            viewport: (width, height),
            dir_light_space: Mat4::identity(),
            point_light_space: None,
            point_light_position: Point3::origin(),
            far_plane: self.config.shadow.far_plane,
            effect: self.effect,
        }
    }

    fn process_input(&mut self, delta: f32) {
        if self.window.key_state(KeyCode::Escape) == KeyState::Pressed {
            self.closing = true;
        }

        if self.window.key_state(KeyCode::W) == KeyState::Pressed {
            self.camera.advance(delta);
        }
        if self.window.key_state(KeyCode::S) == KeyState::Pressed {
            self.camera.advance(-delta);
        }
        if self.window.key_state(KeyCode::D) == KeyState::Pressed {
            self.camera.strafe(delta);
        }
        if self.window.key_state(KeyCode::A) == KeyState::Pressed {
            self.camera.strafe(-delta);
        }
        if self.window.key_state(KeyCode::LeftShift) == KeyState::Pressed {
            self.camera.ascend(delta);
        }
        if self.window.key_state(KeyCode::LeftControl) == KeyState::Pressed {
            self.camera.ascend(-delta);
        }

        // Flashlight toggles on the press-then-release edge of F.
        if self
            .flashlight_toggle
            .update(self.window.key_state(KeyCode::F))
        {
            self.scene.flashlight.toggle();
        }

        for index in 0..PostEffect::COUNT {
            if let Some(key) = KeyCode::digit(index) {
                if self.window.key_state(key) == KeyState::Pressed {
                    self.effect = PostEffect::from_index(index);
                }
            }
        }
    }
}
