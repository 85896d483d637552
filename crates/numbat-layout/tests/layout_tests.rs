//! Integration tests for the layout pass: whole documents in, placed
//! trees out.

use numbat_doc::{Bump, Document, ElementStyle, InternalId, Tag};
use numbat_geom::{Edges, Pos, Rect};
use numbat_layout::{LayoutConfig, RestartPolicy, WordMetrics, layout_document};

/// Deterministic metrics with whole-pixel values: every character is
/// 10px wide, lines are 20px tall, baselines sit 16px down.
struct TestMetrics;

impl WordMetrics for TestMetrics {
    fn word_width(&self, word: &str, _font_size: f32) -> Pos {
        Pos::from_int(10 * i32::try_from(word.chars().count()).unwrap())
    }

    fn space_width(&self, _font_size: f32) -> Pos {
        Pos::from_int(10)
    }

    fn line_height(&self, _font_size: f32) -> Pos {
        Pos::from_int(20)
    }

    fn ascent(&self, _font_size: f32) -> Pos {
        Pos::from_int(16)
    }
}

fn config(width: i32, height: i32) -> LayoutConfig {
    LayoutConfig {
        viewport_width: Pos::from_int(width),
        viewport_height: Pos::from_int(height),
        scrollbar_width: Pos::from_int(16),
        restart_policy: RestartPolicy::OnMajorOverflow,
    }
}

/// Helper: a flow-context div with a fixed content size.
fn sized_div(width: i32, height: i32) -> ElementStyle {
    ElementStyle {
        width: Some(Pos::from_int(width)),
        height: Some(Pos::from_int(height)),
        new_flow_context: true,
        ..ElementStyle::default()
    }
}

#[test]
fn words_flow_left_to_right_and_wrap() {
    let mut doc = Document::new();
    let para = doc.create_element(doc.root(), Tag::Div, sized_div(100, 200));
    // Three 4-char words: 40px each. Two fit on a 100px line; the
    // third wraps.
    let text = doc.create_text(para, "aaaa bbbb cccc", ElementStyle::default());

    let tree = layout_document(&doc, &config(800, 600), &TestMetrics);
    let words = &tree.get(text).unwrap().words;
    assert_eq!(words.len(), 3);

    assert_eq!(words[0].rect.left, Pos::ZERO);
    assert_eq!(words[0].rect.right, Pos::from_int(40));
    // Second word sits after a 10px space.
    assert_eq!(words[1].rect.left, Pos::from_int(50));
    assert_eq!(words[1].rect.right, Pos::from_int(90));
    // Third word wraps: back at the origin, one 20px line down.
    assert_eq!(words[2].rect.left, Pos::ZERO);
    assert_eq!(words[2].rect.top, Pos::from_int(20));
}

#[test]
fn paragraph_derives_height_from_lines() {
    let mut doc = Document::new();
    let para = doc.create_element(
        doc.root(),
        Tag::Div,
        ElementStyle {
            width: Some(Pos::from_int(100)),
            new_flow_context: true,
            ..ElementStyle::default()
        },
    );
    let _ = doc.create_text(para, "aaaa bbbb cccc", ElementStyle::default());

    let tree = layout_document(&doc, &config(800, 600), &TestMetrics);
    let node = tree.get(para).unwrap();
    // Two lines of 20px content: the derived margin box is 40px tall.
    assert_eq!(node.margin_box.height(), Pos::from_int(40));
    assert_eq!(node.margin_box.width(), Pos::from_int(100));
    assert_eq!(node.lines.len(), 2);
}

#[test]
fn margin_border_padding_widen_the_placed_box() {
    let mut doc = Document::new();
    let style = ElementStyle {
        width: Some(Pos::from_int(50)),
        height: Some(Pos::from_int(30)),
        margin: Edges::uniform(Pos::from_int(5)),
        border: Edges::uniform(Pos::from_int(1)),
        padding: Edges::uniform(Pos::from_int(4)),
        new_flow_context: true,
        ..ElementStyle::default()
    };
    let div = doc.create_element(doc.root(), Tag::Div, style);

    let tree = layout_document(&doc, &config(800, 600), &TestMetrics);
    let node = tree.get(div).unwrap();
    // 50 + 2*(5+1+4) on each axis.
    assert_eq!(node.margin_box.width(), Pos::from_int(70));
    assert_eq!(node.margin_box.height(), Pos::from_int(50));
}

#[test]
fn sibling_divs_flow_like_words() {
    let mut doc = Document::new();
    let row = doc.create_element(doc.root(), Tag::Div, sized_div(100, 50));
    let a = doc.create_element(row, Tag::Div, sized_div(40, 10));
    let b = doc.create_element(row, Tag::Div, sized_div(40, 10));
    let c = doc.create_element(row, Tag::Div, sized_div(40, 10));

    let tree = layout_document(&doc, &config(800, 600), &TestMetrics);
    assert_eq!(tree.get(a).unwrap().margin_box.left, Pos::ZERO);
    assert_eq!(tree.get(b).unwrap().margin_box.left, Pos::from_int(40));
    // The third sibling exceeds the 100px row and wraps.
    let c_box = tree.get(c).unwrap().margin_box;
    assert_eq!(c_box.left, Pos::ZERO);
    assert_eq!(c_box.top, Pos::from_int(10));
}

#[test]
fn explicit_newline_forces_a_line_break() {
    let mut doc = Document::new();
    let para = doc.create_element(doc.root(), Tag::Div, sized_div(500, 200));
    let text = doc.create_text(para, "aa\nbb", ElementStyle::default());

    let tree = layout_document(&doc, &config(800, 600), &TestMetrics);
    let words = &tree.get(text).unwrap().words;
    assert_eq!(words[0].rect.top, Pos::ZERO);
    assert_eq!(words[1].rect.left, Pos::ZERO);
    assert_eq!(words[1].rect.top, Pos::from_int(20));
    // Both lines are recorded on the paragraph's context.
    assert_eq!(tree.get(para).unwrap().lines.len(), 2);
}

#[test]
fn first_word_sets_the_line_baseline() {
    let mut doc = Document::new();
    let para = doc.create_element(doc.root(), Tag::Div, sized_div(500, 200));
    let text = doc.create_text(para, "hello world", ElementStyle::default());

    let tree = layout_document(&doc, &config(800, 600), &TestMetrics);
    let node = tree.get(para).unwrap();
    assert_eq!(node.lines.len(), 1);
    // Baseline = line top (0) + 16px ascent; defined by the text run.
    assert_eq!(node.lines[0].inner_baseline, Some(Pos::from_int(16)));
    assert_eq!(node.lines[0].inner_baseline_defined_by, Some(text));
    // The paragraph's outer baseline is its first line's baseline.
    assert_eq!(node.first_baseline, Some(Pos::from_int(16)));
}

#[test]
fn overwide_word_is_not_deferred_forever() {
    let mut doc = Document::new();
    let narrow = doc.create_element(doc.root(), Tag::Div, sized_div(30, 100));
    let text = doc.create_text(narrow, "abcdefghij", ElementStyle::default());

    let tree = layout_document(&doc, &config(800, 600), &TestMetrics);
    let words = &tree.get(text).unwrap().words;
    assert_eq!(words.len(), 1);
    // 100px word in a 30px context: placed anyway, on its own line.
    assert_eq!(words[0].rect.left, Pos::ZERO);
    assert_eq!(words[0].rect.right, Pos::from_int(100));
}

#[test]
fn shared_flow_div_is_bounded_by_its_travel() {
    let mut doc = Document::new();
    let para = doc.create_element(doc.root(), Tag::Div, sized_div(500, 200));
    // An injected (shared-flow) span between two text runs.
    let _ = doc.create_text(para, "aa", ElementStyle::default());
    let span = doc.create_element(para, Tag::Div, ElementStyle::default());
    let _ = doc.create_text(span, "bbb", ElementStyle::default());

    let tree = layout_document(&doc, &config(800, 600), &TestMetrics);
    let span_box = tree.get(span).unwrap().margin_box;
    // "aa" ends at 20px; the span's words start after the cursor there.
    assert_eq!(span_box.top, Pos::ZERO);
    assert_eq!(span_box.left, Pos::from_int(20));
    assert_eq!(span_box.bottom, Pos::from_int(20));
    // The span does not own lines; its context is the paragraph's.
    assert!(tree.get(span).unwrap().lines.is_empty());
}

#[test]
fn overflow_restart_reserves_scrollbar_width() {
    let mut doc = Document::new();
    // A scrolling box committed to 100x30: three lines of text violate
    // the height, so the pass restarts and reserves scrollbar width.
    let scroll = doc.create_element(
        doc.root(),
        Tag::Div,
        ElementStyle {
            overflow_scroll: true,
            ..sized_div(100, 30)
        },
    );
    let text = doc.create_text(scroll, "aaaa bbbb cccc dddd", ElementStyle::default());

    let tree = layout_document(&doc, &config(800, 600), &TestMetrics);
    let words = &tree.get(text).unwrap().words;
    assert_eq!(words.len(), 4);
    // After reservation the wrap limit is 100-16 = 84px: only one
    // 40px word (plus a 10px space and part of the next) fits per
    // line, so "bbbb" lands on line two; under the original 100px
    // limit it would have shared line one.
    assert_eq!(words[0].rect.top, Pos::ZERO);
    assert_eq!(words[1].rect.left, Pos::ZERO);
    assert_eq!(words[1].rect.top, Pos::from_int(20));
    // The box itself keeps its declared (shrunken) content width.
    let scroll_box = tree.get(scroll).unwrap().margin_box;
    assert_eq!(scroll_box.width(), Pos::from_int(84));
}

#[test]
fn bump_none_does_not_disturb_the_flow() {
    let mut doc = Document::new();
    let row = doc.create_element(doc.root(), Tag::Div, sized_div(200, 50));
    let a = doc.create_element(row, Tag::Div, sized_div(40, 10));
    let overlay = doc.create_element(
        row,
        Tag::Div,
        ElementStyle {
            bump: Bump::None,
            ..sized_div(40, 10)
        },
    );
    let b = doc.create_element(row, Tag::Div, sized_div(40, 10));

    let tree = layout_document(&doc, &config(800, 600), &TestMetrics);
    // The overlay is placed at the cursor but does not advance it:
    // it overlaps the box that follows.
    assert_eq!(
        tree.get(overlay).unwrap().margin_box.left,
        Pos::from_int(40)
    );
    assert_eq!(tree.get(b).unwrap().margin_box.left, Pos::from_int(40));
    assert_eq!(tree.get(a).unwrap().margin_box.left, Pos::ZERO);
}

#[test]
fn identical_documents_lay_out_identically() {
    let build = || {
        let mut doc = Document::new();
        let para = doc.create_element(doc.root(), Tag::Div, sized_div(120, 300));
        let _ = doc.create_text(para, "one two three four five six", ElementStyle::default());
        doc
    };
    let tree_a = layout_document(&build(), &config(800, 600), &TestMetrics);
    let tree_b = layout_document(&build(), &config(800, 600), &TestMetrics);

    for raw in 1..=u32::try_from(tree_a.len()).unwrap() {
        let id = InternalId(raw);
        let (a, b) = (tree_a.get(id).unwrap(), tree_b.get(id).unwrap());
        assert_eq!(a.margin_box, b.margin_box);
        assert_eq!(a.words, b.words);
    }
}

#[test]
fn root_margin_box_matches_viewport() {
    let doc = Document::new();
    let tree = layout_document(&doc, &config(640, 480), &TestMetrics);
    let root_box = tree.root().margin_box;
    assert_eq!(root_box, Rect::new(
        Pos::ZERO,
        Pos::ZERO,
        Pos::from_int(640),
        Pos::from_int(480),
    ));
}
