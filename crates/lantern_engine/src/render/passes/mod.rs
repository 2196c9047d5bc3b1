//! The individual stages of the frame pipeline

pub mod color_target;
pub mod composite;
pub mod depth_cubemap;
pub mod depth_map;
pub mod light_markers;
pub mod lit;
pub mod skybox;

pub use color_target::ColorTargetPass;
pub use composite::CompositePass;
pub use depth_cubemap::PointDepthPass;
pub use depth_map::DirectionalDepthPass;
pub use light_markers::LightMarkersPass;
pub use lit::{LightingMode, LitPass};
pub use skybox::SkyboxPass;
