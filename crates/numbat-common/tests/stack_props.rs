//! Property tests for the non-destructive stack.
//!
//! The layout engine's historical-line access depends on one guarantee:
//! a popped value stays readable, bit-for-bit, until a later push grows
//! over its slot. These properties drive random push/pop sequences at
//! the container directly.

use numbat_common::Stack;
use quickcheck_macros::quickcheck;

/// Replay a sequence of operations: `Some(v)` pushes `v`, `None` pops
/// (ignored when empty). Returns the stack and a shadow Vec model.
fn replay(ops: &[Option<u32>]) -> (Stack<u32>, Vec<u32>) {
    let mut stack = Stack::new();
    let mut model = Vec::new();
    for op in ops {
        match op {
            Some(v) => {
                stack.push(*v);
                model.push(*v);
            }
            None => {
                if !model.is_empty() {
                    stack.pop();
                    let _ = model.pop();
                }
            }
        }
    }
    (stack, model)
}

/// The live region always matches a conventional stack.
#[quickcheck]
fn live_region_matches_model(ops: Vec<Option<u32>>) -> bool {
    let (stack, model) = replay(&ops);
    if stack.depth() != model.len() {
        return false;
    }
    (0..model.len()).all(|i| stack.get(i) == Some(&model[i]))
}

/// Immediately after a pop, the popped value is still readable at
/// index `depth()`.
#[quickcheck]
fn pop_is_non_destructive(ops: Vec<Option<u32>>, last: u32) -> bool {
    let (mut stack, _) = replay(&ops);
    stack.push(last);
    stack.pop();
    stack.get(stack.depth()) == Some(&last)
}

/// The arena never shrinks: retained_len is monotone over any sequence.
#[quickcheck]
fn arena_never_shrinks(ops: Vec<Option<u32>>) -> bool {
    let mut stack = Stack::new();
    let mut high = 0;
    for op in ops {
        match op {
            Some(v) => stack.push(v),
            None => {
                if !stack.is_empty() {
                    stack.pop();
                }
            }
        }
        if stack.retained_len() < high {
            return false;
        }
        high = stack.retained_len();
    }
    true
}

/// clear() preserves retained slots; a push_reuse after clear hands back
/// the first retained slot.
#[quickcheck]
fn clear_then_reuse_reclaims_first_slot(values: Vec<u32>) -> bool {
    if values.is_empty() {
        return true;
    }
    let mut stack = Stack::new();
    for v in &values {
        stack.push(*v);
    }
    stack.clear();
    let slot = stack.push_reuse();
    *slot == values[0]
}
