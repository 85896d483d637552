//! Rendering pipeline for the numbat toolkit.
//!
//! # Architecture
//!
//! The renderer is the final stage in the pipeline:
//!
//! ```text
//! Document → Layout → RenderTree → Renderer
//!                                     ↓
//!                            RenderBackend (quads)
//! ```
//!
//! The renderer knows nothing about styles or flow. It walks the
//! frozen [`RenderTree`], translates each nested flow context to
//! absolute coordinates, and emits quads through the pluggable
//! [`RenderBackend`] trait. Backends own all surface state; the
//! in-memory [`RecordingBackend`] serves headless rendering and tests.

/// Backend trait, quad/texture types, and backend errors.
pub mod backend;
/// Display-list recording backend.
pub mod display_list;
/// The render tree frozen from layout output.
pub mod render_tree;
/// The frame renderer and the document pipeline.
pub mod renderer;

pub use backend::{BackendError, Quad, RenderBackend, TextureId, TextureUpload};
pub use display_list::{DisplayList, RecordingBackend};
pub use render_tree::{RenderChar, RenderEl, RenderNode, RenderText, RenderTree, build_render_tree};
pub use renderer::{RenderStats, Renderer, render_document};
