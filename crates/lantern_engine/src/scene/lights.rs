//! Light sources and their uniform upload contracts
//!
//! Each light knows how to push its own fields to the active shader
//! program under a caller-supplied uniform prefix, so the same point-light
//! type serves both standalone lights and array elements
//! (`pointLights[2]`).

use crate::foundation::math::{Vec3, Point3};
use crate::render::api::GraphicsApi;

/// Infinitely distant light with a direction but no position
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    /// RGB colour, components in `[0, 1]`
    pub colour: Vec3,
    /// Scalar intensity multiplier
    pub strength: f32,
    /// Direction the light travels (not toward the light)
    pub direction: Vec3,
}

impl DirectionalLight {
    /// Light of `colour` and `strength` travelling along `direction`
    pub fn new(colour: Vec3, strength: f32, direction: Vec3) -> Self {
        Self {
            colour,
            strength,
            direction,
        }
    }

    /// Upload `<prefix>.colour`, `.strength` and `.direction`
    pub fn upload(&self, gfx: &mut dyn GraphicsApi, prefix: &str) {
        gfx.upload_vec3(&format!("{prefix}.colour"), self.colour);
        gfx.upload_float(&format!("{prefix}.strength"), self.strength);
        gfx.upload_vec3(&format!("{prefix}.direction"), self.direction);
    }
}

/// Positional light with distance attenuation
#[derive(Debug, Clone)]
pub struct PointLight {
    /// RGB colour
    pub colour: Vec3,
    /// Scalar intensity multiplier
    pub strength: f32,
    /// World-space position
    pub position: Point3,
    /// Constant attenuation term
    pub constant: f32,
    /// Linear attenuation term
    pub linear: f32,
    /// Quadratic attenuation term
    pub quadratic: f32,
}

impl PointLight {
    /// Light at `position` with the usual constant/linear/quadratic
    /// attenuation terms
    pub fn new(
        position: Point3,
        colour: Vec3,
        strength: f32,
        constant: f32,
        linear: f32,
        quadratic: f32,
    ) -> Self {
        Self {
            colour,
            strength,
            position,
            constant,
            linear,
            quadratic,
        }
    }

    /// Upload the light's fields under `prefix` (e.g. `pointLights[0]`)
    pub fn upload(&self, gfx: &mut dyn GraphicsApi, prefix: &str) {
        gfx.upload_vec3(&format!("{prefix}.colour"), self.colour);
        gfx.upload_float(&format!("{prefix}.strength"), self.strength);
        gfx.upload_vec3(&format!("{prefix}.position"), self.position.coords);
        gfx.upload_float(&format!("{prefix}.constant"), self.constant);
        gfx.upload_float(&format!("{prefix}.linear"), self.linear);
        gfx.upload_float(&format!("{prefix}.quadratic"), self.quadratic);
    }
}

/// Cone-shaped light with a soft edge between two cutoff angles
#[derive(Debug, Clone)]
pub struct SpotLight {
    /// Positional core (colour, strength, position, attenuation)
    pub point: PointLight,
    /// Axis of the cone
    pub direction: Vec3,
    /// Cosine of the inner (full-intensity) cone angle
    pub cutoff_cosine: f32,
    /// Cosine of the outer (zero-intensity) cone angle
    pub outer_cutoff_cosine: f32,
}

impl SpotLight {
    /// Upload the point-light fields plus the cone parameters
    pub fn upload(&self, gfx: &mut dyn GraphicsApi, prefix: &str) {
        self.point.upload(gfx, prefix);
        gfx.upload_vec3(&format!("{prefix}.direction"), self.direction);
        gfx.upload_float(&format!("{prefix}.cutoffCosine"), self.cutoff_cosine);
        gfx.upload_float(
            &format!("{prefix}.outerCutoffCosine"),
            self.outer_cutoff_cosine,
        );
    }
}

/// Camera-attached spot light with an on/off switch
///
/// The flashlight carries no anchor of its own; the lit pass positions it
/// at the camera from the frame context on every upload.
#[derive(Debug, Clone)]
pub struct Flashlight {
    /// RGB colour
    pub colour: Vec3,
    /// Scalar intensity multiplier
    pub strength: f32,
    /// Constant attenuation term
    pub constant: f32,
    /// Linear attenuation term
    pub linear: f32,
    /// Quadratic attenuation term
    pub quadratic: f32,
    /// Cosine of the inner (full-intensity) cone angle
    pub cutoff_cosine: f32,
    /// Cosine of the outer (zero-intensity) cone angle
    pub outer_cutoff_cosine: f32,
    /// Whether the light currently contributes
    pub enabled: bool,
}

impl Default for Flashlight {
    /// A pale-blue flashlight with a tight 5/7 degree cone, initially on
    fn default() -> Self {
        Self {
            colour: Vec3::new(0.5, 0.5, 1.0),
            strength: 2.5,
            constant: 1.0,
            linear: 0.045,
            quadratic: 0.000_75,
            cutoff_cosine: 5.0_f32.to_radians().cos(),
            outer_cutoff_cosine: 7.0_f32.to_radians().cos(),
            enabled: true,
        }
    }
}

impl Flashlight {
    /// Flip the on/off state
    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Upload the spot-light fields anchored at `position` looking along
    /// `direction`, plus the `flashLightIsON` switch
    pub fn upload(
        &self,
        gfx: &mut dyn GraphicsApi,
        prefix: &str,
        position: Point3,
        direction: Vec3,
    ) {
        let spot = SpotLight {
            point: PointLight::new(
                position,
                self.colour,
                self.strength,
                self.constant,
                self.linear,
                self.quadratic,
            ),
            direction,
            cutoff_cosine: self.cutoff_cosine,
            outer_cutoff_cosine: self.outer_cutoff_cosine,
        };
        spot.upload(gfx, prefix);
        gfx.upload_int("flashLightIsON", i32::from(self.enabled));
    }
}
