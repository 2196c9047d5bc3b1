//! Free-flying first-person camera

use crate::config::CameraConfig;
use crate::foundation::math::{look_at, Mat4, Point3, Vec3};

/// WASD-style camera with position, view direction and zoomable FOV
#[derive(Debug, Clone)]
pub struct Camera {
    /// World-space eye position
    pub position: Point3,
    /// Unit view direction
    pub front: Vec3,
    /// World up used for the view basis
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_deg: f32,
    /// Travel speed in world units per second
    pub speed: f32,
}

impl Camera {
    /// Camera at `position` looking down `front`
    pub fn new(position: Point3, front: Vec3, config: &CameraConfig) -> Self {
        Self {
            position,
            front: front.normalize(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov_deg: config.fov_deg,
            speed: 2.5,
        }
    }

    /// View matrix for the current pose
    pub fn view_matrix(&self) -> Mat4 {
        look_at(
            self.position.coords,
            self.position.coords + self.front,
            self.up,
        )
    }

    /// Move along the view direction (negative = backward)
    pub fn advance(&mut self, delta: f32) {
        self.position += self.front * (self.speed * delta);
    }

    /// Strafe right along the view/up cross product (negative = left)
    pub fn strafe(&mut self, delta: f32) {
        let right = self.front.cross(&self.up).normalize();
        self.position += right * (self.speed * delta);
    }

    /// Move along world up (negative = down)
    pub fn ascend(&mut self, delta: f32) {
        self.position += self.up * (self.speed * delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_camera() -> Camera {
        Camera::new(
            Point3::new(0.0, 0.0, 3.0),
            Vec3::new(0.0, 0.0, -1.0),
            &CameraConfig::default(),
        )
    }

    #[test]
    fn advance_moves_along_front() {
        let mut camera = test_camera();
        camera.advance(1.0);
        assert_relative_eq!(camera.position.z, 3.0 - camera.speed, epsilon = 1e-6);
    }

    #[test]
    fn strafe_is_perpendicular_to_front_and_up() {
        let mut camera = test_camera();
        let before = camera.position;
        camera.strafe(1.0);
        let moved = camera.position - before;
        assert_relative_eq!(moved.dot(&camera.front), 0.0, epsilon = 1e-6);
        assert_relative_eq!(moved.dot(&camera.up), 0.0, epsilon = 1e-6);
    }
}
