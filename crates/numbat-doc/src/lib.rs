//! Document model for the numbat toolkit.
//!
//! This crate holds the retained, pre-styled element tree that the layout
//! pass walks. Style resolution happens upstream of this crate: every
//! element arrives with its box metrics already resolved to fixed-point
//! values, so layout never consults a stylesheet.
//!
//! # Design
//!
//! The tree uses arena allocation with [`InternalId`] indices for all
//! relationships, providing O(1) access and traversal without borrow
//! checker issues. Identifiers are never zero; the root element always
//! has id 1 and ids are handed out densely after that.

use numbat_geom::{Edges, Pos};
use serde::Serialize;
use strum_macros::Display;

pub mod vartable;

pub use vartable::VariableTable;

/// A type-safe identifier for an element in the document.
///
/// Zero is never a valid id, so `Option<InternalId>` packs the "no
/// element" case without a sentinel. The root element is always
/// [`InternalId::ROOT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct InternalId(pub u32);

impl InternalId {
    /// The root element of every document has id 1.
    pub const ROOT: InternalId = InternalId(1);

    /// Arena slot backing this id.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }
}

/// The element vocabulary of the toolkit.
///
/// Deliberately tiny: the toolkit is not an HTML engine, and three tags
/// cover the box-flow model: a document body, generic boxes, and text
/// runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum Tag {
    /// The document root.
    Body,
    /// A generic box container.
    Div,
    /// A run of text, broken into words by the layout pass.
    Text,
}

/// How a placed box nudges the surrounding flow.
///
/// Regular content advances the flow cursor and stretches the line; the
/// other variants let decorative or overlay content participate in
/// placement without (fully) disturbing its neighbors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Bump {
    /// Advance the minor cursor and raise both high-water marks.
    #[default]
    Regular,
    /// Advance the minor cursor only; contribute no height.
    HorzOnly,
    /// Contribute extent without advancing the minor cursor.
    VertOnly,
    /// Place at the cursor with no effect on the flow at all.
    None,
}

/// An RGBA color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Fully transparent.
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// An opaque color from red/green/blue channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 255 }
    }
}

/// Default font size in pixels when an element does not set one.
pub const DEFAULT_FONT_SIZE_PX: f32 = 16.0;

/// Resolved per-element style, produced upstream of this crate.
///
/// All lengths are already fixed-point; there are no unresolved units
/// here. Fields the layout engine consumes directly map one-to-one onto
/// its node input record.
#[derive(Debug, Clone, Serialize)]
pub struct ElementStyle {
    /// Declared content width; `None` lets the flow derive it.
    pub width: Option<Pos>,
    /// Declared content height; `None` lets the flow derive it.
    pub height: Option<Pos>,
    /// Margin thickness per edge.
    pub margin: Edges,
    /// Border thickness per edge.
    pub border: Edges,
    /// Padding thickness per edge.
    pub padding: Edges,
    /// How this element nudges the surrounding flow.
    pub bump: Bump,
    /// True if this element establishes its own flow context (its own
    /// coordinate space and wrap cursor). False shares the nearest
    /// flow-context ancestor.
    pub new_flow_context: bool,
    /// True if overflowing content scrolls instead of growing the box.
    /// A scrolling element is the one that gives up content width for a
    /// scrollbar when a layout pass restarts.
    pub overflow_scroll: bool,
    /// Font size for text children, in pixels.
    pub font_size: f32,
    /// Text color.
    pub color: Color,
    /// Background fill, if any.
    pub background: Option<Color>,
}

impl Default for ElementStyle {
    fn default() -> Self {
        ElementStyle {
            width: None,
            height: None,
            margin: Edges::ZERO,
            border: Edges::ZERO,
            padding: Edges::ZERO,
            bump: Bump::Regular,
            new_flow_context: false,
            overflow_scroll: false,
            font_size: DEFAULT_FONT_SIZE_PX,
            color: Color::BLACK,
            background: None,
        }
    }
}

impl ElementStyle {
    /// Margin, border, and padding summed into the single per-edge
    /// thickness the layout engine consumes.
    #[must_use]
    pub fn combined_edges(&self) -> Edges {
        self.margin.sum_with(&self.border).sum_with(&self.padding)
    }
}

/// One element in the document arena.
#[derive(Debug, Clone, Serialize)]
pub struct Element {
    /// This element's id (redundant with its arena slot, kept for
    /// convenience when handing elements around by reference).
    pub id: InternalId,
    /// The element's tag.
    pub tag: Tag,
    /// Resolved style.
    pub style: ElementStyle,
    /// Text content; present only on [`Tag::Text`] elements.
    pub text: Option<String>,
    /// Parent element, `None` only for the root.
    pub parent: Option<InternalId>,
    /// Child elements in document order.
    pub children: Vec<InternalId>,
}

/// A retained document: the element arena plus document-scoped state.
///
/// The document owns everything a layout/render pass needs as explicit
/// state; there are no process-wide registries. Hosts construct a
/// `Document`, mutate it, and hand references down the call chain.
#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
    /// Document-scoped style variables.
    pub vars: VariableTable,
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}

impl Document {
    /// Create a document containing only the root [`Tag::Body`] element.
    ///
    /// The root establishes the outermost flow context and scrolls by
    /// default: content taller than the viewport costs the root a
    /// scrollbar rather than spilling.
    #[must_use]
    pub fn new() -> Document {
        let root = Element {
            id: InternalId::ROOT,
            tag: Tag::Body,
            style: ElementStyle {
                new_flow_context: true,
                overflow_scroll: true,
                ..ElementStyle::default()
            },
            text: None,
            parent: None,
            children: Vec::new(),
        };
        Document {
            elements: vec![root],
            vars: VariableTable::new(),
        }
    }

    /// The root element's id.
    #[must_use]
    pub const fn root(&self) -> InternalId {
        InternalId::ROOT
    }

    /// Number of elements in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if the document holds only the root element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.len() == 1
    }

    /// Append a new element under `parent` and return its id.
    ///
    /// # Panics
    /// Panics if `parent` is not a valid id in this document.
    pub fn create_element(&mut self, parent: InternalId, tag: Tag, style: ElementStyle) -> InternalId {
        self.insert(parent, tag, style, None)
    }

    /// Append a new text element under `parent` and return its id.
    ///
    /// # Panics
    /// Panics if `parent` is not a valid id in this document.
    pub fn create_text(
        &mut self,
        parent: InternalId,
        text: impl Into<String>,
        style: ElementStyle,
    ) -> InternalId {
        self.insert(parent, Tag::Text, style, Some(text.into()))
    }

    fn insert(
        &mut self,
        parent: InternalId,
        tag: Tag,
        style: ElementStyle,
        text: Option<String>,
    ) -> InternalId {
        let id = InternalId(u32::try_from(self.elements.len()).expect("document too large") + 1);
        self.elements.push(Element {
            id,
            tag,
            style,
            text,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.elements[parent.index()].children.push(id);
        id
    }

    /// Look up an element by id.
    #[must_use]
    pub fn get(&self, id: InternalId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    /// Mutable element lookup.
    #[must_use]
    pub fn get_mut(&mut self, id: InternalId) -> Option<&mut Element> {
        self.elements.get_mut(id.index())
    }

    /// Child ids of an element, in document order. Empty for unknown ids.
    #[must_use]
    pub fn children(&self, id: InternalId) -> &[InternalId] {
        self.get(id).map_or(&[], |el| el.children.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_has_root_body() {
        let doc = Document::new();
        let root = doc.get(doc.root()).unwrap();
        assert_eq!(root.tag, Tag::Body);
        assert!(root.style.new_flow_context);
        assert!(root.parent.is_none());
        assert!(doc.is_empty());
    }

    #[test]
    fn create_element_links_parent_and_child() {
        let mut doc = Document::new();
        let div = doc.create_element(doc.root(), Tag::Div, ElementStyle::default());
        let text = doc.create_text(div, "hello", ElementStyle::default());

        assert_eq!(doc.children(doc.root()), &[div]);
        assert_eq!(doc.children(div), &[text]);
        assert_eq!(doc.get(text).unwrap().parent, Some(div));
        assert_eq!(doc.get(text).unwrap().text.as_deref(), Some("hello"));
    }

    #[test]
    fn ids_are_dense_and_nonzero() {
        let mut doc = Document::new();
        let a = doc.create_element(doc.root(), Tag::Div, ElementStyle::default());
        let b = doc.create_element(a, Tag::Div, ElementStyle::default());
        assert_eq!(a, InternalId(2));
        assert_eq!(b, InternalId(3));
    }

    #[test]
    fn combined_edges_sums_three_layers() {
        let style = ElementStyle {
            margin: Edges::uniform(Pos::from_int(1)),
            border: Edges::uniform(Pos::from_int(2)),
            padding: Edges::uniform(Pos::from_int(4)),
            ..ElementStyle::default()
        };
        let mbp = style.combined_edges();
        assert_eq!(mbp.left, Pos::from_int(7));
        assert_eq!(mbp.horizontal(), Pos::from_int(14));
    }

    #[test]
    fn tag_displays_by_name() {
        assert_eq!(Tag::Div.to_string(), "Div");
        assert_eq!(Tag::Body.to_string(), "Body");
    }
}
