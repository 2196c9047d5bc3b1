//! Recording graphics backend and scripted window
//!
//! [`HeadlessGraphics`] implements [`GraphicsApi`] without a GPU: every
//! submission is appended to an in-order log, and resource handles are
//! tracked so misuse (drawing a destroyed mesh, binding an unknown
//! framebuffer) surfaces as an error instead of silently passing. The test
//! suite asserts pass ordering and uniform traffic against the log, and
//! the viewer app runs the full pipeline against it.

use std::collections::{HashMap, HashSet};

use super::{
    ClearFlags, CullFace, DepthFunc, FramebufferAttachment, FramebufferId, GraphicsApi, MeshId,
    ProgramDesc, ProgramId, TextureId, TextureTarget, WindowApi,
};
use crate::foundation::math::{Mat4, Vec3};
use crate::input::{KeyCode, KeyState};
use crate::render::{RenderError, RenderResult};
use crate::shapes::ShapeKind;

/// One recorded graphics-API call
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// A program was made active (recorded by name for readable assertions)
    UseProgram(String),
    /// Integer uniform upload
    UploadInt {
        /// Uniform name
        name: String,
        /// Uploaded value
        value: i32,
    },
    /// Float uniform upload
    UploadFloat {
        /// Uniform name
        name: String,
        /// Uploaded value
        value: f32,
    },
    /// Vec3 uniform upload
    UploadVec3 {
        /// Uniform name
        name: String,
        /// Uploaded value
        value: [f32; 3],
    },
    /// Matrix uniform upload (the value itself is rarely asserted on)
    UploadMat4 {
        /// Uniform name
        name: String,
    },
    /// Float-array uniform upload
    UploadFloatArray {
        /// Uniform name
        name: String,
        /// Uploaded values
        values: Vec<f32>,
    },
    /// Framebuffer bind (`None` = default framebuffer)
    BindFramebuffer(Option<FramebufferId>),
    /// Buffer clear
    Clear(ClearFlags),
    /// Viewport resize
    SetViewport {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
    /// Cull-face change
    SetCullFace(CullFace),
    /// Depth-function change
    SetDepthFunc(DepthFunc),
    /// Depth-test toggle
    SetDepthTest(bool),
    /// Texture bound to a unit
    BindTexture {
        /// Texture unit index
        unit: u32,
        /// Bound texture
        texture: TextureId,
    },
    /// Draw call for a mesh
    DrawMesh(MeshId),
}

/// In-memory [`GraphicsApi`] implementation that records all submissions
#[derive(Debug, Default)]
pub struct HeadlessGraphics {
    submissions: Vec<Submission>,
    next_id: u64,
    programs: HashMap<ProgramId, String>,
    meshes: HashSet<MeshId>,
    textures: HashSet<TextureId>,
    framebuffers: HashSet<FramebufferId>,
}

impl HeadlessGraphics {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// The submission log, in call order
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    /// Drop the submission log (live resources are kept)
    pub fn clear_log(&mut self) {
        self.submissions.clear();
    }

    /// Index of the first submission satisfying the predicate
    pub fn position_of(&self, pred: impl FnMut(&Submission) -> bool) -> Option<usize> {
        self.submissions.iter().position(pred)
    }

    /// Index of the first `UseProgram` of the named program
    pub fn first_use_of_program(&self, name: &str) -> Option<usize> {
        self.position_of(|s| matches!(s, Submission::UseProgram(n) if n == name))
    }

    /// Last value uploaded for a named integer uniform
    pub fn last_uploaded_int(&self, uniform: &str) -> Option<i32> {
        self.submissions.iter().rev().find_map(|s| match s {
            Submission::UploadInt { name, value } if name == uniform => Some(*value),
            _ => None,
        })
    }

    /// Last value uploaded for a named vec3 uniform
    pub fn last_uploaded_vec3(&self, uniform: &str) -> Option<[f32; 3]> {
        self.submissions.iter().rev().find_map(|s| match s {
            Submission::UploadVec3 { name, value } if name == uniform => Some(*value),
            _ => None,
        })
    }

    /// Last value uploaded for a named float-array uniform
    pub fn last_uploaded_float_array(&self, uniform: &str) -> Option<&[f32]> {
        self.submissions.iter().rev().find_map(|s| match s {
            Submission::UploadFloatArray { name, values } if name == uniform => {
                Some(values.as_slice())
            }
            _ => None,
        })
    }

    /// Number of resources (programs, meshes, textures, framebuffers) still alive
    pub fn live_resources(&self) -> usize {
        self.programs.len() + self.meshes.len() + self.textures.len() + self.framebuffers.len()
    }

    fn fresh_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn record(&mut self, submission: Submission) {
        self.submissions.push(submission);
    }
}

impl GraphicsApi for HeadlessGraphics {
    fn create_program(&mut self, desc: &ProgramDesc) -> RenderResult<ProgramId> {
        let id = ProgramId(self.fresh_id());
        self.programs.insert(id, desc.name.to_string());
        Ok(id)
    }

    fn use_program(&mut self, program: ProgramId) {
        let name = self
            .programs
            .get(&program)
            .cloned()
            .unwrap_or_else(|| format!("<unknown program {}>", program.0));
        self.record(Submission::UseProgram(name));
    }

    fn destroy_program(&mut self, program: ProgramId) {
        self.programs.remove(&program);
    }

    fn upload_int(&mut self, name: &str, value: i32) {
        self.record(Submission::UploadInt {
            name: name.to_string(),
            value,
        });
    }

    fn upload_float(&mut self, name: &str, value: f32) {
        self.record(Submission::UploadFloat {
            name: name.to_string(),
            value,
        });
    }

    fn upload_vec3(&mut self, name: &str, value: Vec3) {
        self.record(Submission::UploadVec3 {
            name: name.to_string(),
            value: [value.x, value.y, value.z],
        });
    }

    fn upload_mat4(&mut self, name: &str, _value: &Mat4) {
        self.record(Submission::UploadMat4 {
            name: name.to_string(),
        });
    }

    fn upload_float_array(&mut self, name: &str, values: &[f32]) {
        self.record(Submission::UploadFloatArray {
            name: name.to_string(),
            values: values.to_vec(),
        });
    }

    fn create_mesh(&mut self, _shape: &ShapeKind) -> RenderResult<MeshId> {
        let id = MeshId(self.fresh_id());
        self.meshes.insert(id);
        Ok(id)
    }

    fn draw_mesh(&mut self, mesh: MeshId) -> RenderResult<()> {
        if !self.meshes.contains(&mesh) {
            return Err(RenderError::BackendError(format!(
                "draw of unknown mesh handle {}",
                mesh.0
            )));
        }
        self.record(Submission::DrawMesh(mesh));
        Ok(())
    }

    fn destroy_mesh(&mut self, mesh: MeshId) {
        self.meshes.remove(&mesh);
    }

    fn load_texture(&mut self, _path: &str) -> RenderResult<TextureId> {
        let id = TextureId(self.fresh_id());
        self.textures.insert(id);
        Ok(id)
    }

    fn load_cubemap(&mut self, _face_paths: &[String; 6]) -> RenderResult<TextureId> {
        let id = TextureId(self.fresh_id());
        self.textures.insert(id);
        Ok(id)
    }

    fn create_depth_texture(&mut self, _width: u32, _height: u32) -> RenderResult<TextureId> {
        let id = TextureId(self.fresh_id());
        self.textures.insert(id);
        Ok(id)
    }

    fn create_depth_cubemap(&mut self, _width: u32, _height: u32) -> RenderResult<TextureId> {
        let id = TextureId(self.fresh_id());
        self.textures.insert(id);
        Ok(id)
    }

    fn create_color_texture(&mut self, _width: u32, _height: u32) -> RenderResult<TextureId> {
        let id = TextureId(self.fresh_id());
        self.textures.insert(id);
        Ok(id)
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        self.textures.remove(&texture);
    }

    fn create_framebuffer(
        &mut self,
        attachment: FramebufferAttachment,
    ) -> RenderResult<FramebufferId> {
        let texture = match attachment {
            FramebufferAttachment::Depth(t)
            | FramebufferAttachment::DepthCubemap(t)
            | FramebufferAttachment::ColorWithDepthStencil(t) => t,
        };
        if !self.textures.contains(&texture) {
            return Err(RenderError::ResourceCreationFailed(format!(
                "framebuffer attachment references unknown texture {}",
                texture.0
            )));
        }
        let id = FramebufferId(self.fresh_id());
        self.framebuffers.insert(id);
        Ok(id)
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferId>) {
        self.record(Submission::BindFramebuffer(framebuffer));
    }

    fn destroy_framebuffer(&mut self, framebuffer: FramebufferId) {
        self.framebuffers.remove(&framebuffer);
    }

    fn bind_texture(&mut self, unit: u32, _target: TextureTarget, texture: TextureId) {
        self.record(Submission::BindTexture { unit, texture });
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.record(Submission::SetViewport { width, height });
    }

    fn clear(&mut self, flags: ClearFlags) {
        self.record(Submission::Clear(flags));
    }

    fn set_cull_face(&mut self, face: CullFace) {
        self.record(Submission::SetCullFace(face));
    }

    fn set_depth_func(&mut self, func: DepthFunc) {
        self.record(Submission::SetDepthFunc(func));
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.record(Submission::SetDepthTest(enabled));
    }
}

/// A [`WindowApi`] implementation driven by a fixed frame count and a key
/// script, for tests and headless runs
#[derive(Debug)]
pub struct ScriptedWindow {
    total_frames: usize,
    frame: usize,
    size: (u32, u32),
    held_keys: Vec<(KeyCode, std::ops::Range<usize>)>,
    swaps: usize,
}

impl ScriptedWindow {
    /// A window that reports should-close after `total_frames` frames
    pub fn with_frames(total_frames: usize) -> Self {
        Self {
            total_frames,
            frame: 0,
            size: (1280, 720),
            held_keys: Vec::new(),
            swaps: 0,
        }
    }

    /// Override the reported framebuffer size
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Script a key as held down for the given frame range
    pub fn hold_key(mut self, key: KeyCode, frames: std::ops::Range<usize>) -> Self {
        self.held_keys.push((key, frames));
        self
    }

    /// The current frame index (starting at 0)
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// How many frames were presented
    pub fn frames_presented(&self) -> usize {
        self.swaps
    }
}

impl WindowApi for ScriptedWindow {
    fn key_state(&self, key: KeyCode) -> KeyState {
        let held = self
            .held_keys
            .iter()
            .any(|(k, range)| *k == key && range.contains(&self.frame));
        if held {
            KeyState::Pressed
        } else {
            KeyState::Released
        }
    }

    fn should_close(&self) -> bool {
        self.frame >= self.total_frames
    }

    fn poll_events(&mut self) {
        self.frame += 1;
    }

    fn swap_buffers(&mut self) {
        self.swaps += 1;
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawing_an_unknown_mesh_is_an_error() {
        let mut gfx = HeadlessGraphics::new();
        let mesh = gfx.create_mesh(&ShapeKind::Cube).expect("mesh");
        gfx.destroy_mesh(mesh);
        assert!(gfx.draw_mesh(mesh).is_err());
    }

    #[test]
    fn framebuffer_requires_a_live_attachment() {
        let mut gfx = HeadlessGraphics::new();
        let tex = gfx.create_depth_texture(16, 16).expect("texture");
        gfx.destroy_texture(tex);
        let result = gfx.create_framebuffer(FramebufferAttachment::Depth(tex));
        assert!(matches!(result, Err(RenderError::ResourceCreationFailed(_))));
    }

    #[test]
    fn scripted_window_reports_held_keys_per_frame() {
        let mut window = ScriptedWindow::with_frames(10).hold_key(KeyCode::F, 2..4);
        assert_eq!(window.key_state(KeyCode::F), KeyState::Released);
        window.poll_events();
        window.poll_events();
        assert_eq!(window.key_state(KeyCode::F), KeyState::Pressed);
        window.poll_events();
        window.poll_events();
        assert_eq!(window.key_state(KeyCode::F), KeyState::Released);
    }
}
