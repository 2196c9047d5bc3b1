//! Drawable geometry descriptions and materials
//!
//! Meshes themselves live behind the graphics collaborator; this module only
//! names the built-in shapes (so the registry can cache one GPU mesh per
//! kind) and carries the per-drawable material: a texture list plus the
//! specular coefficient the lit shaders expect.

use crate::render::api::{GraphicsApi, MeshId, TextureId, TextureTarget};

/// Identifies a mesh the graphics collaborator knows how to produce
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Unit cube centred on the origin
    Cube,
    /// Unit square in the XY plane
    Square,
    /// Two-triangle quad covering the screen in normalised device coordinates
    ScreenQuad,
    /// Inward-facing cube, positions double as cubemap sample directions
    SkyboxCube,
    /// Mesh loaded from a Wavefront OBJ file
    Obj(String),
}

/// Material for a drawable node: textures plus a specular coefficient
///
/// Texture description and sampling parameters are the collaborator's
/// concern; the engine only needs to bind them to consecutive texture units
/// and to know how many units they occupy, so the shadow samplers of the lit
/// pass can be offset past them.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Textures bound to units `0..textures.len()` before each draw
    pub textures: Vec<TextureId>,
    /// Specular reflection coefficient uploaded as `material.k_spec`
    pub specular: f32,
    /// Skybox reflection mix factor uploaded as `material.k_refl`; zero
    /// disables environment sampling for this drawable
    pub reflectivity: f32,
}

impl Material {
    /// Material with the given textures and default specular coefficient
    pub fn new(textures: Vec<TextureId>) -> Self {
        Self {
            textures,
            specular: 0.5,
            reflectivity: 0.0,
        }
    }

    /// Material that mirrors the skybox with the given mix factor
    pub fn reflective(textures: Vec<TextureId>, reflectivity: f32) -> Self {
        Self {
            reflectivity,
            ..Self::new(textures)
        }
    }

    /// How many texture units this material consumes
    pub fn texture_units_used(&self) -> u32 {
        self.textures.len() as u32
    }

    /// Bind the material's textures to consecutive units and upload its
    /// scalar parameters to the active program
    pub fn bind(&self, gfx: &mut dyn GraphicsApi) {
        for (unit, texture) in self.textures.iter().enumerate() {
            gfx.bind_texture(unit as u32, TextureTarget::Texture2d, *texture);
        }
        gfx.upload_float("material.k_spec", self.specular);
        gfx.upload_float("material.k_refl", self.reflectivity);
        gfx.upload_int("isReflectiveMaterial", i32::from(self.reflectivity > 0.0));
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// A mesh handle paired with the material it is drawn with
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// GPU mesh handle, owned by the [`crate::render::registry::MeshRegistry`]
    pub mesh: MeshId,
    /// Material bound before each lit draw of this shape
    pub material: Material,
}

impl Shape {
    /// A shape drawn with the given material
    pub fn new(mesh: MeshId, material: Material) -> Self {
        Self { mesh, material }
    }

    /// A shape with no textures (flat-shaded)
    pub fn untextured(mesh: MeshId) -> Self {
        Self {
            mesh,
            material: Material::default(),
        }
    }
}
