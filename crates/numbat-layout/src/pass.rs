//! The tree-walking layout pass.
//!
//! The engine itself never walks anything: it consumes a flat event
//! stream. This module is the walker. It drives the engine depth-first
//! over a [`Document`], converts element styles into engine inputs,
//! splits text into measured words, and collects the engine's output
//! boxes into a [`LayoutTree`] the renderer consumes.
//!
//! The pass also owns the restart contract. When the engine signals
//! [`FlowResult::Restart`], the pass finds the scrolling ancestor whose
//! size commitment was broken, reserves scrollbar width from its content
//! box, and redrives the identical event sequence. The engine
//! guarantees bit-identical replay, so only the reservation changes the
//! outcome.

use std::collections::HashSet;

use numbat_common::warning::warn_once;
use numbat_doc::{Document, Element, InternalId, Tag};
use numbat_geom::{Pos, Rect};
use serde::Serialize;

use crate::boxlayout::{BoxLayout3, FlowResult, NodeInput, RestartPolicy, WordInput};
use crate::flow::LineBox;
use crate::metrics::WordMetrics;

/// Configuration for one layout pass, owned by the host and passed in
/// explicitly; there is no ambient global configuration.
#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    /// Viewport width, applied to the root node when its style does not
    /// declare a width.
    pub viewport_width: Pos,
    /// Viewport height, applied like the width.
    pub viewport_height: Pos,
    /// Width reserved from a scrolling node's content box when a
    /// restart decides it needs a scrollbar.
    pub scrollbar_width: Pos,
    /// When the engine signals a restart.
    pub restart_policy: RestartPolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            viewport_width: Pos::from_int(800),
            viewport_height: Pos::from_int(600),
            scrollbar_width: Pos::from_int(16),
            restart_policy: RestartPolicy::OnMajorOverflow,
        }
    }
}

/// One word placed by the pass, in its flow context's coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedWord {
    /// The word's text.
    pub text: String,
    /// The placed box.
    pub rect: Rect,
    /// The baseline the word's glyphs sit on, in the same coordinates.
    pub baseline: Pos,
}

/// One element's layout output.
///
/// Boxes are in the coordinate space of the element's nearest
/// flow-context ancestor; compositing into absolute coordinates is the
/// renderer's translation walk.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedNode {
    /// The element this output belongs to.
    pub id: InternalId,
    /// The element's tag.
    pub tag: Tag,
    /// Final margin box.
    pub margin_box: Rect,
    /// True if the element owned its flow context (the renderer starts
    /// a new coordinate base here).
    pub new_flow_context: bool,
    /// The closed context's first-line baseline, this node's outer
    /// baseline. `None` for shared-flow nodes and baseline-less content.
    pub first_baseline: Option<Pos>,
    /// Line records of the element's own flow context (empty for
    /// shared-flow elements).
    pub lines: Vec<LineBox>,
    /// Words placed for a text element.
    pub words: Vec<PlacedWord>,
    /// Child elements, mirroring the document tree.
    pub children: Vec<InternalId>,
}

impl PlacedNode {
    fn unplaced(el: &Element) -> PlacedNode {
        PlacedNode {
            id: el.id,
            tag: el.tag,
            margin_box: Rect::default(),
            new_flow_context: el.style.new_flow_context,
            first_baseline: None,
            lines: Vec::new(),
            words: Vec::new(),
            children: el.children.clone(),
        }
    }
}

/// The complete output of one layout pass, arena-aligned with the
/// document's element arena.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutTree {
    nodes: Vec<PlacedNode>,
}

impl LayoutTree {
    /// Look up an element's output by id.
    #[must_use]
    pub fn get(&self, id: InternalId) -> Option<&PlacedNode> {
        self.nodes.get(id.index())
    }

    /// The root element's output.
    ///
    /// # Panics
    /// Panics on an empty tree, which a completed pass never produces.
    #[must_use]
    pub fn root(&self) -> &PlacedNode {
        &self.nodes[InternalId::ROOT.index()]
    }

    /// Number of elements laid out.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the tree holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Lay out a whole document and return the placed tree.
///
/// This is the toolkit's main layout entry point; it constructs a fresh
/// engine, so repeated calls are independent passes.
#[must_use]
pub fn layout_document(
    doc: &Document,
    config: &LayoutConfig,
    metrics: &dyn WordMetrics,
) -> LayoutTree {
    LayoutPass::new(doc, config, metrics).run()
}

/// A single document's layout pass: the walker plus its engine.
pub struct LayoutPass<'a> {
    doc: &'a Document,
    config: &'a LayoutConfig,
    metrics: &'a dyn WordMetrics,
    engine: BoxLayout3,
    /// Scroll nodes that already gave up scrollbar width this pass.
    reserved: HashSet<InternalId>,
    /// Set when a restart had no scrolling owner: further signals are
    /// treated as normal so the pass always terminates.
    ignore_restarts: bool,
    nodes: Vec<PlacedNode>,
}

impl<'a> LayoutPass<'a> {
    /// Prepare a pass over `doc`.
    #[must_use]
    pub fn new(doc: &'a Document, config: &'a LayoutConfig, metrics: &'a dyn WordMetrics) -> Self {
        LayoutPass {
            doc,
            config,
            metrics,
            engine: BoxLayout3::new(config.restart_policy),
            reserved: HashSet::new(),
            ignore_restarts: false,
            nodes: Vec::new(),
        }
    }

    /// Run the pass to completion, redriving on restart signals.
    #[must_use]
    pub fn run(mut self) -> LayoutTree {
        self.engine.begin_document();
        loop {
            self.reset_output();
            match self.walk(self.doc.root()) {
                Ok(()) => break,
                Err(at) => {
                    self.engine.restart();
                    match self.scroll_owner(at) {
                        Some(owner) => {
                            let _ = self.reserved.insert(owner);
                        }
                        None => {
                            warn_once(
                                "Layout",
                                "restart requested with no scrolling ancestor to shrink; \
                                 finishing without one",
                            );
                            self.ignore_restarts = true;
                        }
                    }
                }
            }
        }
        self.engine.end_document();
        LayoutTree { nodes: self.nodes }
    }

    fn reset_output(&mut self) {
        let doc = self.doc;
        self.nodes.clear();
        self.nodes.extend((1..=doc.len() as u32).map(|raw| {
            let el = doc.get(InternalId(raw)).expect("dense ids");
            PlacedNode::unplaced(el)
        }));
    }

    /// Walk one element: begin it, flow its text and children, end it,
    /// and record the output. `Err` carries the element at which the
    /// engine signaled a restart.
    fn walk(&mut self, id: InternalId) -> Result<(), InternalId> {
        let doc = self.doc;
        let el = doc.get(id).expect("layout pass: unknown element");
        let input = self.node_input(el);
        self.engine.begin_node(&input);

        let words = if el.tag == Tag::Text {
            match &el.text {
                Some(text) => self.flow_text(el, text)?,
                None => Vec::new(),
            }
        } else {
            Vec::new()
        };

        for &child in &el.children {
            self.walk(child)?;
        }

        let mut margin_box = Rect::default();
        let result = self.engine.end_node(&mut margin_box);

        let (lines, first_baseline) = if el.style.new_flow_context {
            let mut lines = Vec::new();
            while let Some(line) = self.engine.line_from_previous_node(lines.len()) {
                lines.push(*line);
            }
            (lines, self.engine.first_baseline())
        } else {
            (Vec::new(), None)
        };

        let node = &mut self.nodes[id.index()];
        node.margin_box = margin_box;
        node.first_baseline = first_baseline;
        node.lines = lines;
        node.words = words;

        if result == FlowResult::Restart && !self.ignore_restarts {
            return Err(id);
        }
        Ok(())
    }

    /// Build the engine input for an element, applying the viewport to
    /// the root and any scrollbar reservation from earlier restarts.
    fn node_input(&self, el: &Element) -> NodeInput {
        let style = &el.style;
        let is_root = el.id == self.doc.root();

        let mut content_width = style.width;
        let mut content_height = style.height;
        if is_root {
            content_width = content_width.or(Some(self.config.viewport_width));
            content_height = content_height.or(Some(self.config.viewport_height));
        }
        if self.reserved.contains(&el.id) {
            content_width =
                content_width.map(|w| (w - self.config.scrollbar_width).max(Pos::ZERO));
        }

        NodeInput {
            id: el.id,
            tag: el.tag,
            margin_border_padding: style.combined_edges(),
            content_width,
            content_height,
            bump: style.bump,
            new_flow_context: style.new_flow_context,
            // A scroll node that has not yet given up scrollbar width
            // still holds an unrenegotiated size commitment; once
            // reserved, its content is simply expected to scroll.
            restart_on_overflow: style.overflow_scroll && !self.reserved.contains(&el.id),
        }
    }

    /// Flow a text element's words into the current context. Leading
    /// spaces on a line are the caller's business, so this is where
    /// breaking happens: each inter-word space is a break opportunity,
    /// and when the space plus the next word would overflow the line,
    /// the space is consumed by an explicit break instead.
    fn flow_text(&mut self, el: &Element, text: &str) -> Result<Vec<PlacedWord>, InternalId> {
        let font_size = el.style.font_size;
        let line_height = self.metrics.line_height(font_size);
        let ascent = self.metrics.ascent(font_size);
        let space = self.metrics.space_width(font_size);

        let mut words = Vec::new();
        for (line_no, line) in text.split('\n').enumerate() {
            if line_no > 0 {
                self.engine.add_linebreak();
            }
            let mut first_on_line = true;
            for word in line.split_whitespace() {
                let width = self.metrics.word_width(word, font_size);
                if !first_on_line {
                    if self.engine.would_flow(space + width) {
                        self.engine.add_linebreak();
                    } else {
                        self.engine.add_space(space);
                    }
                }

                let mut rect = Rect::default();
                let result = self.engine.add_word(
                    &WordInput {
                        width,
                        height: line_height,
                    },
                    &mut rect,
                );
                let baseline = rect.top + ascent;
                self.engine.set_baseline(baseline, el.id);
                words.push(PlacedWord {
                    text: word.to_string(),
                    rect,
                    baseline,
                });

                if result == FlowResult::Restart && !self.ignore_restarts {
                    return Err(el.id);
                }
                first_on_line = false;
            }
        }
        Ok(words)
    }

    /// The nearest ancestor-or-self that scrolls, has a width to give
    /// up (declared, or the viewport for the root), and has not already
    /// been reserved.
    fn scroll_owner(&self, at: InternalId) -> Option<InternalId> {
        let mut cursor = Some(at);
        while let Some(id) = cursor {
            let el = self.doc.get(id)?;
            let has_width = el.style.width.is_some() || id == self.doc.root();
            if el.style.overflow_scroll && has_width && !self.reserved.contains(&id) {
                return Some(id);
            }
            cursor = el.parent;
        }
        None
    }
}
