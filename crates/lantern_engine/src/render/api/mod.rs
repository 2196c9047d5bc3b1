//! Collaborator traits at the graphics-API boundary
//!
//! The engine never talks to a graphics API directly. Everything it needs —
//! named uniform uploads, mesh draws, framebuffer and depth-target
//! management, texture-unit binding — goes through [`GraphicsApi`], and the
//! window/input surface goes through [`WindowApi`]. Handles are opaque
//! newtypes; the backend owns the resources they name.
//!
//! [`headless`] provides recording implementations used by tests and
//! headless runs.

pub mod headless;

use crate::foundation::math::{Mat4, Vec3};
use crate::input::{KeyCode, KeyState};
use crate::render::RenderResult;
use crate::shapes::ShapeKind;

/// Handle to a linked shader program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u64);

/// Handle to an uploaded mesh (vertex/index/normal/UV buffers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub u64);

/// Handle to a texture, depth texture or cubemap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Handle to a framebuffer object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramebufferId(pub u64);

/// Shader program description: named stages resolved by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramDesc {
    /// Human-readable name, used in diagnostics
    pub name: &'static str,
    /// Vertex shader source path
    pub vertex: &'static str,
    /// Fragment shader source path
    pub fragment: &'static str,
    /// Optional geometry shader source path
    pub geometry: Option<&'static str>,
}

/// Which attachment a framebuffer is created with
///
/// Depth-only variants disable colour read/write buffers; only depth is
/// produced by the shadow passes that own them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramebufferAttachment {
    /// Single 2D depth texture, no colour buffers
    Depth(TextureId),
    /// Six-face depth cubemap, no colour buffers
    DepthCubemap(TextureId),
    /// Colour texture plus a depth-stencil renderbuffer
    ColorWithDepthStencil(TextureId),
}

/// Texture binding target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureTarget {
    /// Regular 2D texture
    Texture2d,
    /// Cubemap texture
    CubeMap,
}

/// Which faces are culled during rasterization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullFace {
    /// Cull back faces (the steady-state setting)
    Back,
    /// Cull front faces (used by the directional depth pass)
    Front,
}

/// Depth comparison function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthFunc {
    /// Pass when the incoming depth is strictly less
    Less,
    /// Pass on less-or-equal (used by the skybox pass)
    LessEqual,
}

bitflags::bitflags! {
    /// Buffers selected by a clear operation
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearFlags: u32 {
        /// Colour buffer
        const COLOR = 1;
        /// Depth buffer
        const DEPTH = 1 << 1;
        /// Stencil buffer
        const STENCIL = 1 << 2;
    }
}

/// Graphics collaborator: shader/uniform sink, mesh/material provider and
/// framebuffer management
///
/// Resource creation returns `Result`: incomplete framebuffers and shader
/// compile errors abort startup. Per-frame state changes and uniform
/// uploads are infallible; the backend reports no recoverable per-call
/// errors once setup has succeeded.
pub trait GraphicsApi {
    /// Compile and link a shader program
    fn create_program(&mut self, desc: &ProgramDesc) -> RenderResult<ProgramId>;

    /// Make a program the active uniform-upload target
    fn use_program(&mut self, program: ProgramId);

    /// Release a program
    fn destroy_program(&mut self, program: ProgramId);

    /// Upload a named integer uniform to the active program
    fn upload_int(&mut self, name: &str, value: i32);

    /// Upload a named float uniform
    fn upload_float(&mut self, name: &str, value: f32);

    /// Upload a named vec3 uniform
    fn upload_vec3(&mut self, name: &str, value: Vec3);

    /// Upload a named 4x4 matrix uniform
    fn upload_mat4(&mut self, name: &str, value: &Mat4);

    /// Upload a named float-array uniform (e.g. a 3x3 convolution kernel)
    fn upload_float_array(&mut self, name: &str, values: &[f32]);

    /// Produce and upload the mesh for a built-in shape or OBJ file
    fn create_mesh(&mut self, shape: &ShapeKind) -> RenderResult<MeshId>;

    /// Issue the draw call for an uploaded mesh
    fn draw_mesh(&mut self, mesh: MeshId) -> RenderResult<()>;

    /// Release a mesh's GPU buffers
    fn destroy_mesh(&mut self, mesh: MeshId);

    /// Decode and upload a 2D texture from a file
    fn load_texture(&mut self, path: &str) -> RenderResult<TextureId>;

    /// Decode and upload a cubemap from six face image files
    fn load_cubemap(&mut self, face_paths: &[String; 6]) -> RenderResult<TextureId>;

    /// Allocate an uninitialized 2D depth texture
    fn create_depth_texture(&mut self, width: u32, height: u32) -> RenderResult<TextureId>;

    /// Allocate an uninitialized depth cubemap (six faces)
    fn create_depth_cubemap(&mut self, width: u32, height: u32) -> RenderResult<TextureId>;

    /// Allocate an uninitialized RGB colour texture
    fn create_color_texture(&mut self, width: u32, height: u32) -> RenderResult<TextureId>;

    /// Release a texture
    fn destroy_texture(&mut self, texture: TextureId);

    /// Create a framebuffer with the given attachment, verifying completeness
    fn create_framebuffer(&mut self, attachment: FramebufferAttachment) -> RenderResult<FramebufferId>;

    /// Bind a framebuffer as the render target; `None` binds the default
    /// (window) framebuffer
    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferId>);

    /// Release a framebuffer (not its attachments)
    fn destroy_framebuffer(&mut self, framebuffer: FramebufferId);

    /// Bind a texture to a texture unit
    fn bind_texture(&mut self, unit: u32, target: TextureTarget, texture: TextureId);

    /// Resize the viewport
    fn set_viewport(&mut self, width: u32, height: u32);

    /// Clear the selected buffers of the bound framebuffer
    fn clear(&mut self, flags: ClearFlags);

    /// Select which faces are culled
    fn set_cull_face(&mut self, face: CullFace);

    /// Select the depth comparison function
    fn set_depth_func(&mut self, func: DepthFunc);

    /// Enable or disable depth testing
    fn set_depth_test(&mut self, enabled: bool);
}

/// Windowing/input collaborator polled once per frame
pub trait WindowApi {
    /// Current discrete state of a key
    fn key_state(&self, key: KeyCode) -> KeyState;

    /// Whether the window has been asked to close
    fn should_close(&self) -> bool;

    /// Process pending window events
    fn poll_events(&mut self);

    /// Present the frame (blocks on vertical sync where applicable)
    fn swap_buffers(&mut self);

    /// Current framebuffer size in pixels
    fn framebuffer_size(&self) -> (u32, u32);
}
