//! The pluggable rendering backend seam.
//!
//! A backend owns a drawing surface (a GPU swapchain, or a software
//! canvas) and knows how to fill it with textured quads. Everything
//! above this trait is backend-agnostic: the renderer emits the same
//! quad stream whether the surface is DirectX, OpenGL, or an in-memory
//! recording. A backend is selected once, when the host creates its
//! surface, and injected down the call chain, never discovered through
//! a global.

use numbat_doc::Color;
use numbat_geom::Rect;
use thiserror::Error;

/// Failures a backend can produce. The layout side of the toolkit never
/// fails; errors enter the system only at this seam.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Shader source failed to compile or link.
    #[error("shader compilation failed: {reason}")]
    ShaderCompilation {
        /// Compiler/linker output.
        reason: String,
    },
    /// The drawing surface was lost (device reset, window recreated).
    /// The host should notify the backend via
    /// [`RenderBackend::surface_lost`] and retry the frame.
    #[error("render surface lost")]
    SurfaceLost,
    /// A texture upload was rejected.
    #[error("texture upload rejected: {reason}")]
    TextureUpload {
        /// Why the upload was rejected.
        reason: String,
    },
}

/// Handle to a texture previously uploaded with
/// [`RenderBackend::load_texture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct TextureId(pub u32);

/// Pixel data for a texture upload, RGBA8, tightly packed.
#[derive(Debug, Clone, Copy)]
pub struct TextureUpload<'a> {
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes of RGBA data.
    pub rgba: &'a [u8],
}

/// One solid or textured rectangle, in absolute surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Quad {
    /// Destination rectangle.
    pub rect: Rect,
    /// Fill color (modulates the texture when one is bound).
    pub color: Color,
    /// Texture to sample, if any.
    pub texture: Option<TextureId>,
}

/// A rendering backend: the capability set every surface type provides.
///
/// Lifecycle: `create_shaders` once after surface creation (and again
/// after `surface_lost`), then per frame `begin_render`, any number of
/// `draw_quad`/`load_texture` calls, `end_render`.
pub trait RenderBackend {
    /// Compile and link the backend's shader programs.
    fn create_shaders(&mut self) -> Result<(), BackendError>;

    /// Start a frame covering `viewport`.
    fn begin_render(&mut self, viewport: Rect);

    /// Finish the frame and present it.
    fn end_render(&mut self);

    /// Emit one quad.
    fn draw_quad(&mut self, quad: &Quad);

    /// Upload a texture and return its handle.
    fn load_texture(&mut self, upload: &TextureUpload<'_>) -> Result<TextureId, BackendError>;

    /// The host's window system reported the surface lost; drop surface
    /// state and prepare for a `create_shaders` call.
    fn surface_lost(&mut self);
}
