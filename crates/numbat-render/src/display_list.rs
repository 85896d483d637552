//! Display list recording - a backend that captures the quad stream.
//!
//! The recording backend implements [`RenderBackend`] by appending every
//! quad to an in-memory list instead of touching a surface. It serves
//! headless rendering, golden-output tests, and debugging (the list
//! serializes to JSON for inspection).

use numbat_geom::Rect;
use serde::Serialize;

use crate::backend::{BackendError, Quad, RenderBackend, TextureId, TextureUpload};

/// A list of quads in painting order (back to front).
///
/// The renderer emits quads back to front, so executing the list in
/// order on any surface reproduces the frame.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DisplayList {
    quads: Vec<Quad>,
}

impl DisplayList {
    /// Create an empty display list.
    #[must_use]
    pub const fn new() -> Self {
        Self { quads: Vec::new() }
    }

    /// Add a quad to the display list.
    pub fn push(&mut self, quad: Quad) {
        self.quads.push(quad);
    }

    /// Get the quads in painting order.
    #[must_use]
    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    /// Get the number of recorded quads.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.quads.len()
    }

    /// Check if the display list is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }
}

/// A [`RenderBackend`] that records instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    list: DisplayList,
    shaders_ready: bool,
    in_frame: bool,
    frames_presented: u32,
    next_texture: u32,
}

impl RecordingBackend {
    /// Create a backend with an empty recording.
    #[must_use]
    pub fn new() -> Self {
        RecordingBackend::default()
    }

    /// The recording so far.
    #[must_use]
    pub fn list(&self) -> &DisplayList {
        &self.list
    }

    /// Consume the backend, returning the recording.
    #[must_use]
    pub fn into_list(self) -> DisplayList {
        self.list
    }

    /// Number of completed `begin_render`/`end_render` frames.
    #[must_use]
    pub const fn frames_presented(&self) -> u32 {
        self.frames_presented
    }
}

impl RenderBackend for RecordingBackend {
    fn create_shaders(&mut self) -> Result<(), BackendError> {
        self.shaders_ready = true;
        Ok(())
    }

    fn begin_render(&mut self, _viewport: Rect) {
        debug_assert!(self.shaders_ready, "begin_render before create_shaders");
        debug_assert!(!self.in_frame, "begin_render inside an open frame");
        self.in_frame = true;
    }

    fn end_render(&mut self) {
        debug_assert!(self.in_frame, "end_render outside a frame");
        self.in_frame = false;
        self.frames_presented += 1;
    }

    fn draw_quad(&mut self, quad: &Quad) {
        debug_assert!(self.in_frame, "draw_quad outside a frame");
        self.list.push(*quad);
    }

    fn load_texture(&mut self, upload: &TextureUpload<'_>) -> Result<TextureId, BackendError> {
        let expected = upload.width as usize * upload.height as usize * 4;
        if upload.rgba.len() != expected {
            return Err(BackendError::TextureUpload {
                reason: format!(
                    "expected {expected} bytes for {}x{} RGBA, got {}",
                    upload.width,
                    upload.height,
                    upload.rgba.len()
                ),
            });
        }
        let id = TextureId(self.next_texture);
        self.next_texture += 1;
        Ok(id)
    }

    fn surface_lost(&mut self) {
        // A recording has no real surface; just require a new shader
        // pass like a GPU backend would.
        self.shaders_ready = false;
    }
}
