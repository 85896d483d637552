//! Property tests for the engine's wrap predicate.
//!
//! The contract: `would_flow(s)` returns true exactly when a subsequent
//! `add_word` of width `s` starts a new line, for any size and any
//! prior sequence of adds. The test drives random add sequences while
//! tracking a shadow cursor; a placed box lands at the shadow cursor
//! when no wrap was predicted, and at the minor origin when one was.

use numbat_doc::{Bump, InternalId, Tag};
use numbat_geom::{Edges, Pos, Rect};
use numbat_layout::{BoxLayout3, NodeInput, WordInput};
use quickcheck_macros::quickcheck;

fn open_context(engine: &mut BoxLayout3, limit: Pos) {
    engine.begin_document();
    engine.begin_node(&NodeInput {
        id: InternalId(1),
        tag: Tag::Div,
        margin_border_padding: Edges::ZERO,
        content_width: Some(limit),
        content_height: None,
        bump: Bump::Regular,
        new_flow_context: true,
        restart_on_overflow: false,
    });
}

#[quickcheck]
fn would_flow_never_mispredicts(ops: Vec<u8>, limit_seed: u8) -> bool {
    let limit = Pos::from_int(20 + i32::from(limit_seed % 100));
    let mut engine = BoxLayout3::default();
    open_context(&mut engine, limit);

    let mut cursor = Pos::ZERO;
    for op in ops {
        match op % 4 {
            0 | 1 => {
                let width = Pos::from_int(5 + i32::from(op % 37));
                let predicted = engine.would_flow(width);
                let mut placed = Rect::default();
                let _ = engine.add_word(
                    &WordInput {
                        width,
                        height: Pos::from_int(10),
                    },
                    &mut placed,
                );
                let expected_left = if predicted { Pos::ZERO } else { cursor };
                if placed.left != expected_left {
                    return false;
                }
                cursor = placed.right;
            }
            2 => {
                let size = Pos::from_int(i32::from(op % 23));
                engine.add_space(size);
                cursor += size;
            }
            _ => {
                engine.add_linebreak();
                cursor = Pos::ZERO;
            }
        }
    }
    true
}

/// The predicate is pure: asking never changes the answer.
#[quickcheck]
fn would_flow_is_idempotent(sizes: Vec<u8>, limit_seed: u8) -> bool {
    let limit = Pos::from_int(20 + i32::from(limit_seed % 100));
    let mut engine = BoxLayout3::default();
    open_context(&mut engine, limit);

    let mut placed = Rect::default();
    let _ = engine.add_word(
        &WordInput {
            width: Pos::from_int(15),
            height: Pos::from_int(10),
        },
        &mut placed,
    );

    sizes.iter().all(|&s| {
        let size = Pos::from_int(i32::from(s));
        let first = engine.would_flow(size);
        (0..3).all(|_| engine.would_flow(size) == first)
    })
}
