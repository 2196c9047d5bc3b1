//! Per-frame shared state and light-space matrix construction
//!
//! The pipeline rebuilds a [`FrameContext`] every frame and threads it
//! through the passes by reference, so no pass reaches for globals.

use crate::config::ShadowConfig;
use crate::foundation::math::{look_at, orthographic, perspective, Mat4, Point3, Vec3};
use crate::render::post::PostEffect;
use crate::scene::lights::DirectionalLight;

/// Cubemap face order with the (direction, up) basis each face is rendered
/// with
///
/// Order follows the cubemap face layout +X, -X, +Y, -Y, +Z, -Z. The up
/// vectors are flipped relative to a normal camera so the faces land in
/// the orientation cubemap sampling expects.
pub fn cube_face_axes() -> [(Vec3, Vec3); 6] {
    [
        (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, -1.0, 0.0)),
        (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, -1.0, 0.0)),
        (Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
        (Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 0.0, -1.0)),
        (Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, -1.0, 0.0)),
        (Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, -1.0, 0.0)),
    ]
}

/// Orthographic light-space matrix for the directional shadow pass
///
/// The light "camera" sits opposite the light's travel direction, looking
/// at the origin, with an orthographic box sized by the shadow config.
pub fn dir_light_space(light: &DirectionalLight, shadow: &ShadowConfig) -> Mat4 {
    let extent = shadow.ortho_extent;
    let projection = orthographic(
        -extent,
        extent,
        -extent,
        extent,
        shadow.ortho_near,
        shadow.ortho_far,
    );
    let eye = -light.direction.normalize() * extent * 0.5;
    let view = look_at(eye, Vec3::zeros(), Vec3::y());
    projection * view
}

/// The six light-space matrices for a point-light depth cubemap
///
/// Each face uses a 90 degree perspective with a square aspect so the six
/// frusta tile the full sphere around the light.
pub fn point_light_space_faces(position: Point3, shadow: &ShadowConfig) -> [Mat4; 6] {
    let projection = perspective(90.0_f32.to_radians(), 1.0, shadow.cube_near, shadow.far_plane);
    cube_face_axes().map(|(dir, up)| projection * look_at(position.coords, position.coords + dir, up))
}

/// State shared by every pass during one frame
#[derive(Debug, Clone)]
pub struct FrameContext {
    /// Camera view matrix
    pub view: Mat4,
    /// Camera projection matrix
    pub projection: Mat4,
    /// World-space camera position (for specular terms)
    pub camera_position: Point3,
    /// Camera forward direction; the flashlight is anchored to it
    pub camera_front: Vec3,
    /// Default-framebuffer size, restored after off-screen passes
    pub viewport: (u32, u32),
    /// Directional-light shadow matrix for this frame
    pub dir_light_space: Mat4,
    /// Cubemap face matrices for the shadow-casting point light, if any
    pub point_light_space: Option<[Mat4; 6]>,
    /// Position of the shadow-casting point light
    pub point_light_position: Point3,
    /// Far plane used to normalize cubemap depth
    pub far_plane: f32,
    /// Post-processing effect for the composite pass
    pub effect: PostEffect,
}
