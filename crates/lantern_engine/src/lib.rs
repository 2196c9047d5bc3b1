//! # Lantern Engine
//!
//! A real-time 3D scene renderer built around two pieces of machinery:
//!
//! - A **hierarchical scene graph** of transformable nodes stored in a flat
//!   arena, with synchronous world-matrix propagation under arbitrary
//!   reparenting.
//! - A **multi-pass render pipeline**: shadow-map generation for one
//!   directional light (2D depth texture) and one point light (depth
//!   cubemap), a lit pass that samples both, an off-screen colour pass, and
//!   a full-screen post-processing composite.
//!
//! The graphics API itself is a collaborator behind the [`render::api::GraphicsApi`]
//! trait; the engine only issues named uniform uploads, draw calls and
//! framebuffer management through it. A recording
//! [`render::api::headless::HeadlessGraphics`] implementation backs the test
//! suite and headless runs.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lantern_engine::prelude::*;
//! use lantern_engine::render::api::headless::{HeadlessGraphics, ScriptedWindow};
//!
//! fn main() -> Result<(), EngineError> {
//!     lantern_engine::foundation::logging::init();
//!
//!     let config = RendererConfig::default();
//!     let mut gfx = HeadlessGraphics::new();
//!     let mut registry = MeshRegistry::new();
//!
//!     let mut scene = Scene::new(
//!         DirectionalLight::new(Vec3::new(1.0, 1.0, 1.0), 2.0, Vec3::new(-0.2, -1.0, -0.3)),
//!         Flashlight::default(),
//!         Vec::new(),
//!         Vec3::new(0.7, 0.7, 1.0),
//!     );
//!     let cube = registry.get_or_create(&ShapeKind::Cube, &mut gfx)?;
//!     scene.graph.insert(
//!         None,
//!         Mat4::identity(),
//!         Vec3::new(1.0, 1.0, 1.0),
//!         NodeKind::Drawable(Shape::untextured(cube)),
//!     )?;
//!
//!     let window = ScriptedWindow::with_frames(60);
//!     let mut engine = Engine::new(config, gfx, window, registry, scene)?;
//!     engine.run()
//! }
//! ```

// Foundation layer
pub mod foundation;

// Configuration
pub mod config;

// Input polling utilities
pub mod input;

// Geometry and materials
pub mod shapes;

// Scene graph, lights and scene aggregation
pub mod scene;

// Render passes, pipeline and the graphics-API boundary
pub mod render;

mod engine;

pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::RendererConfig,
        engine::{Engine, EngineError},
        foundation::math::{Mat4, Vec3},
        input::{EdgeToggle, KeyCode, KeyState},
        render::{
            camera::Camera,
            context::FrameContext,
            passes::LightingMode,
            pipeline::RenderPipeline,
            post::PostEffect,
            registry::MeshRegistry,
            RenderError, RenderPass, RenderResult,
        },
        scene::{
            graph::{NodeId, NodeKind, SceneGraph, SceneGraphError},
            lights::{DirectionalLight, Flashlight, PointLight, SpotLight},
            Scene, Skybox,
        },
        shapes::{Material, Shape, ShapeKind},
    };
}
