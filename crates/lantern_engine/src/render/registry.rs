//! Shape-keyed mesh cache and path-keyed texture cache
//!
//! Geometry is deduplicated by [`ShapeKind`] and textures by file path:
//! the first request uploads through the graphics backend, later requests
//! reuse the handle. The registry owns what it created and releases it in
//! [`MeshRegistry::teardown`].

use std::collections::HashMap;

use crate::render::api::{GraphicsApi, MeshId, TextureId};
use crate::render::RenderResult;
use crate::shapes::ShapeKind;

/// Cache of uploaded meshes and textures
#[derive(Debug, Default)]
pub struct MeshRegistry {
    meshes: HashMap<ShapeKind, MeshId>,
    textures: HashMap<String, TextureId>,
}

impl MeshRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct meshes uploaded so far
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Whether no meshes have been uploaded
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Handle for `kind`, uploading the mesh on first request
    pub fn get_or_create(
        &mut self,
        kind: &ShapeKind,
        gfx: &mut dyn GraphicsApi,
    ) -> RenderResult<MeshId> {
        if let Some(id) = self.meshes.get(kind) {
            return Ok(*id);
        }
        let id = gfx.create_mesh(kind)?;
        self.meshes.insert(kind.clone(), id);
        Ok(id)
    }

    /// Handle for the texture at `path`, loading it on first request
    pub fn load_texture(
        &mut self,
        path: &str,
        gfx: &mut dyn GraphicsApi,
    ) -> RenderResult<TextureId> {
        if let Some(id) = self.textures.get(path) {
            return Ok(*id);
        }
        let id = gfx.load_texture(path)?;
        self.textures.insert(path.to_string(), id);
        Ok(id)
    }

    /// Release every cached mesh and texture
    pub fn teardown(&mut self, gfx: &mut dyn GraphicsApi) {
        for (_, id) in self.meshes.drain() {
            gfx.destroy_mesh(id);
        }
        for (_, id) in self.textures.drain() {
            gfx.destroy_texture(id);
        }
    }
}
