//! The render tree: layout output frozen into drawable form.
//!
//! Layout produces boxes in per-flow-context coordinates; the render
//! tree keeps those coordinates and pairs them with the visual
//! properties (colors, font sizes, per-character positions) the
//! renderer needs. Nothing here is absolute yet; the renderer's walk
//! applies the base-point translation when compositing nested flow
//! contexts.

use numbat_doc::{Color, Document, InternalId, Tag};
use numbat_geom::{Point, Pos, Rect};
use numbat_layout::LayoutTree;
use serde::Serialize;

/// One positioned character of a text run.
///
/// `x`/`y` locate the character's origin on its baseline, in the text's
/// flow-context coordinates. The advance is carried so the renderer can
/// box the character without consulting font data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderChar {
    /// The character.
    pub ch: char,
    /// Baseline origin, minor axis.
    pub x: Pos,
    /// Baseline position, major axis.
    pub y: Pos,
    /// Horizontal advance to the next character.
    pub advance: Pos,
}

/// A text run ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct RenderText {
    /// The text element this run came from.
    pub id: InternalId,
    /// Text color.
    pub color: Color,
    /// Font size in pixels.
    pub font_size: f32,
    /// Distance from character top to the baseline.
    pub ascent: Pos,
    /// Distance from the baseline to character bottom.
    pub descent: Pos,
    /// Every character with its baseline position.
    pub chars: Vec<RenderChar>,
}

/// An element ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub enum RenderEl {
    /// A box element.
    Node(RenderNode),
    /// A text run.
    Text(RenderText),
}

/// A box element ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct RenderNode {
    /// The document element this node came from.
    pub id: InternalId,
    /// The element's tag.
    pub tag: Tag,
    /// Margin box in the nearest flow-context ancestor's coordinates.
    pub pos: Rect,
    /// Border box (margin box inset by the margins): the area the
    /// background fills.
    pub background_box: Rect,
    /// Background fill, if any.
    pub background: Option<Color>,
    /// Offset from the margin box's top-left corner to the content
    /// origin: the coordinate base of this node's own flow context.
    pub content_inset: Point,
    /// True if children are positioned in this node's own context and
    /// the renderer must translate.
    pub establishes_context: bool,
    /// Children in paint order.
    pub children: Vec<RenderEl>,
}

/// A complete drawable frame: the render tree for one document.
#[derive(Debug, Clone, Serialize)]
pub struct RenderTree {
    /// The root node (the document body).
    pub root: RenderNode,
}

/// Freeze a document and its layout output into a render tree.
///
/// # Panics
/// Panics if `layout` was not produced from `doc` (missing elements).
#[must_use]
pub fn build_render_tree(doc: &Document, layout: &LayoutTree) -> RenderTree {
    RenderTree {
        root: build_node(doc, layout, doc.root()),
    }
}

fn build_node(doc: &Document, layout: &LayoutTree, id: InternalId) -> RenderNode {
    let el = doc.get(id).expect("render tree: unknown element");
    let placed = layout.get(id).expect("render tree: element missing from layout");
    let style = &el.style;
    let mbp = style.combined_edges();
    let margin_box = placed.margin_box;

    let children = el
        .children
        .iter()
        .map(|&child_id| {
            let child = doc.get(child_id).expect("render tree: unknown child");
            if child.tag == Tag::Text {
                RenderEl::Text(build_text(doc, layout, child_id))
            } else {
                RenderEl::Node(build_node(doc, layout, child_id))
            }
        })
        .collect();

    RenderNode {
        id,
        tag: el.tag,
        pos: margin_box,
        background_box: Rect::new(
            margin_box.left + style.margin.left,
            margin_box.top + style.margin.top,
            margin_box.right - style.margin.right,
            margin_box.bottom - style.margin.bottom,
        ),
        background: style.background,
        content_inset: Point::new(mbp.left, mbp.top),
        establishes_context: style.new_flow_context,
        children,
    }
}

fn build_text(doc: &Document, layout: &LayoutTree, id: InternalId) -> RenderText {
    let el = doc.get(id).expect("render tree: unknown element");
    let placed = layout.get(id).expect("render tree: element missing from layout");

    let mut chars = Vec::new();
    let mut ascent = Pos::ZERO;
    let mut descent = Pos::ZERO;
    for word in &placed.words {
        let count = i32::try_from(word.text.chars().count().max(1)).expect("word length");
        // Even distribution of the measured width; a shaper would
        // supply true per-glyph advances here.
        let advance = Pos(word.rect.width().raw() / count);
        ascent = ascent.max(word.baseline - word.rect.top);
        descent = descent.max(word.rect.bottom - word.baseline);
        for (i, ch) in word.text.chars().enumerate() {
            let offset = Pos(advance.raw() * i32::try_from(i).expect("word length"));
            chars.push(RenderChar {
                ch,
                x: word.rect.left + offset,
                y: word.baseline,
                advance,
            });
        }
    }

    RenderText {
        id,
        color: el.style.color,
        font_size: el.style.font_size,
        ascent,
        descent,
        chars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numbat_doc::ElementStyle;
    use numbat_layout::{ApproximateWordMetrics, LayoutConfig, layout_document};

    #[test]
    fn text_chars_sit_on_the_word_baseline() {
        let mut doc = Document::new();
        let para = doc.create_element(
            doc.root(),
            Tag::Div,
            ElementStyle {
                width: Some(Pos::from_int(400)),
                new_flow_context: true,
                ..ElementStyle::default()
            },
        );
        let _ = doc.create_text(para, "hi there", ElementStyle::default());

        let layout = layout_document(&doc, &LayoutConfig::default(), &ApproximateWordMetrics);
        let tree = build_render_tree(&doc, &layout);

        let RenderEl::Node(para_node) = &tree.root.children[0] else {
            panic!("expected a node");
        };
        let RenderEl::Text(text) = &para_node.children[0] else {
            panic!("expected a text run");
        };
        assert_eq!(text.chars.len(), 7);
        // All chars on one line share one baseline.
        let y = text.chars[0].y;
        assert!(text.chars.iter().all(|c| c.y == y));
        // Characters advance monotonically.
        for pair in text.chars.windows(2) {
            assert!(pair[1].x > pair[0].x);
        }
        assert!(text.ascent > Pos::ZERO);
        assert!(text.descent > Pos::ZERO);
    }

    #[test]
    fn background_box_is_inset_by_margin() {
        let mut doc = Document::new();
        let div = doc.create_element(
            doc.root(),
            Tag::Div,
            ElementStyle {
                width: Some(Pos::from_int(100)),
                height: Some(Pos::from_int(50)),
                margin: numbat_geom::Edges::uniform(Pos::from_int(10)),
                background: Some(Color::rgb(200, 0, 0)),
                new_flow_context: true,
                ..ElementStyle::default()
            },
        );

        let layout = layout_document(&doc, &LayoutConfig::default(), &ApproximateWordMetrics);
        let tree = build_render_tree(&doc, &layout);
        let RenderEl::Node(node) = &tree.root.children[0] else {
            panic!("expected a node");
        };
        assert_eq!(node.id, div);
        assert_eq!(node.pos.width(), Pos::from_int(120));
        assert_eq!(node.background_box.width(), Pos::from_int(100));
        assert_eq!(node.background_box.left, node.pos.left + Pos::from_int(10));
    }
}
