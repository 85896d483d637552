//! The renderer: render tree in, quad stream out.
//!
//! An instance of this is created for each frame. Any state that
//! persists between frames (shaders, textures) belongs to the backend.
//!
//! The walk is where nested flow contexts become absolute coordinates:
//! every node carrying its own context shifts the base point for its
//! children by its placed position plus its content inset. The layout
//! engine deliberately never performs this translation.

use anyhow::Context as _;
use numbat_common::warning::warn_once;
use numbat_doc::Document;
use numbat_geom::{Point, Pos, Rect};
use numbat_layout::{LayoutConfig, LayoutTree, WordMetrics, layout_document};
use serde::Serialize;

use crate::backend::{Quad, RenderBackend};
use crate::render_tree::{RenderEl, RenderNode, RenderText, RenderTree, build_render_tree};

/// Counters for one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    /// Box elements visited.
    pub nodes: u32,
    /// Characters drawn.
    pub glyphs: u32,
    /// Quads emitted to the backend.
    pub quads: u32,
}

/// Per-frame renderer.
#[derive(Debug, Default)]
pub struct Renderer {
    stats: RenderStats,
}

impl Renderer {
    /// Create a renderer for one frame.
    #[must_use]
    pub fn new() -> Renderer {
        Renderer::default()
    }

    /// Walk the render tree and emit one frame to `backend`.
    ///
    /// The backend must have working shaders; the host (or the
    /// [`render_document`] pipeline) is responsible for
    /// `create_shaders` and for `surface_lost` recovery.
    pub fn render(
        mut self,
        tree: &RenderTree,
        backend: &mut dyn RenderBackend,
        viewport: Rect,
    ) -> RenderStats {
        backend.begin_render(viewport);
        self.render_node(Point::default(), &tree.root, backend);
        backend.end_render();
        self.stats
    }

    fn render_node(&mut self, base: Point, node: &RenderNode, backend: &mut dyn RenderBackend) {
        self.stats.nodes += 1;

        if let Some(background) = node.background {
            let rect = node.background_box.offset(base);
            if rect.is_empty() {
                warn_once("Render", "skipped a zero-area background quad");
            } else {
                backend.draw_quad(&Quad {
                    rect,
                    color: background,
                    texture: None,
                });
                self.stats.quads += 1;
            }
        }

        // Children of a context-establishing node live in that node's
        // own coordinate space: shift the base to its content origin.
        let child_base = if node.establishes_context {
            base.offset(node.pos.top_left()).offset(node.content_inset)
        } else {
            base
        };

        for child in &node.children {
            match child {
                RenderEl::Node(child_node) => self.render_node(child_base, child_node, backend),
                RenderEl::Text(text) => self.render_text(child_base, text, backend),
            }
        }
    }

    /// Draw one quad per character cell. With a glyph atlas attached
    /// these quads would sample the glyph texture loaded through
    /// `load_texture`; without one they are solid boxes in the text
    /// color, which is enough for layout inspection and golden tests.
    fn render_text(&mut self, base: Point, text: &RenderText, backend: &mut dyn RenderBackend) {
        for ch in &text.chars {
            if ch.ch == ' ' {
                continue;
            }
            let rect = Rect::new(
                ch.x,
                ch.y - text.ascent,
                ch.x + ch.advance,
                ch.y + text.descent,
            )
            .offset(base);
            backend.draw_quad(&Quad {
                rect,
                color: text.color,
                texture: None,
            });
            self.stats.glyphs += 1;
            self.stats.quads += 1;
        }
    }
}

/// The full pipeline: lay out `doc`, freeze the render tree, and draw
/// one frame through `backend`.
///
/// # Errors
/// Fails when the backend cannot compile its shaders.
pub fn render_document(
    doc: &Document,
    config: &LayoutConfig,
    metrics: &dyn WordMetrics,
    backend: &mut dyn RenderBackend,
) -> anyhow::Result<RenderStats> {
    let layout: LayoutTree = layout_document(doc, config, metrics);
    let tree = build_render_tree(doc, &layout);

    backend
        .create_shaders()
        .context("compiling backend shaders")?;

    let viewport = Rect::new(
        Pos::ZERO,
        Pos::ZERO,
        config.viewport_width,
        config.viewport_height,
    );
    Ok(Renderer::new().render(&tree, backend, viewport))
}
