//! Scene content: the transform graph, lights and the optional skybox

pub mod graph;
pub mod lights;

use crate::foundation::math::{Point3, Vec3};
use graph::SceneGraph;
use lights::{DirectionalLight, Flashlight, PointLight};

/// Skybox described by its six cubemap face image paths
///
/// Face order is +X, -X, +Y, -Y, +Z, -Z (right, left, top, bottom, front,
/// back).
#[derive(Debug, Clone)]
pub struct Skybox {
    /// Image path per cubemap face
    pub face_paths: [String; 6],
}

/// Everything the pipeline draws in one frame
///
/// The first point light, when present, is the one that casts cubemap
/// shadows.
#[derive(Debug)]
pub struct Scene {
    /// Hierarchical drawable content
    pub graph: SceneGraph,
    /// The single directional light
    pub dir_light: DirectionalLight,
    /// Camera-attached spot light
    pub flashlight: Flashlight,
    /// Positional lights, drawn as markers and fed to the lit shader
    pub point_lights: Vec<PointLight>,
    /// Ambient illumination intensity (RGB)
    pub ambient_intensity: Vec3,
    /// Optional background cubemap
    pub skybox: Option<Skybox>,
}

impl Scene {
    /// Scene with the given lights and an empty graph
    pub fn new(
        dir_light: DirectionalLight,
        flashlight: Flashlight,
        point_lights: Vec<PointLight>,
        ambient_intensity: Vec3,
    ) -> Self {
        Self {
            graph: SceneGraph::new(),
            dir_light,
            flashlight,
            point_lights,
            ambient_intensity,
            skybox: None,
        }
    }

    /// Attach a skybox
    pub fn with_skybox(mut self, skybox: Skybox) -> Self {
        self.skybox = Some(skybox);
        self
    }

    /// Position of the shadow-casting point light (the first one), if any
    pub fn shadow_point_light_position(&self) -> Option<Point3> {
        self.point_lights.first().map(|l| l.position)
    }
}
