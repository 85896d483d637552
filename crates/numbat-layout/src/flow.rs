//! Flow-context state: the wrap cursor and line-box history.
//!
//! A flow context is an independent coordinate space with its own wrap
//! cursor, established by one node; descendants without their own
//! context share it. The cursor tracks two axes: *minor* is the wrap
//! direction (horizontal in the default flow), *major* is the stacking
//! direction (vertical). The terminology matches CSS inline formatting
//! ([§ 9.4.2](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting):
//! "boxes are laid out horizontally, one after the other") but the flow
//! model here is axis-generic.

use numbat_doc::InternalId;
use numbat_geom::Pos;
use serde::Serialize;

/// One line within a flow context.
///
/// Every time the flow starts a new line, another one of these is
/// appended. The record is deliberately small: the renderer derives
/// visual line height from the placed boxes; the engine only books the
/// line boundary, its baseline, and which child the line ended on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LineBox {
    /// Baseline of this line in flow-context major coordinates.
    /// `None` until the first `set_baseline` call for the line;
    /// the first setter wins and later calls are ignored.
    pub inner_baseline: Option<Pos>,
    /// The child that defined the baseline (first-wins).
    pub inner_baseline_defined_by: Option<InternalId>,
    /// The last child placed on this line. `None` while the line is
    /// still open (or when nothing was ever placed on it). Used to
    /// recover which line each child landed on.
    pub last_child: Option<InternalId>,
}

impl LineBox {
    /// A fresh line: no baseline, no children, not yet closed.
    #[must_use]
    pub const fn fresh() -> LineBox {
        LineBox {
            inner_baseline: None,
            inner_baseline_defined_by: None,
            last_child: None,
        }
    }
}

/// Mutable cursor state for one active flow context.
///
/// `high_minor`/`high_major` are high-water marks over the extent
/// actually consumed; they only ever grow during the context's life and
/// are independent of the wrap limits. The `lines` vector is append-only
/// while the context is open, and its allocation is retained across
/// layout restarts (see [`FlowState::reset`]).
#[derive(Debug, Clone, Default)]
pub struct FlowState {
    /// Permit wrapping even when the minor cursor sits at the origin.
    /// Normally an empty line never refuses a box (that guarantees
    /// termination for over-wide content); injected flow needs to wrap
    /// anyway because the origin may not belong to it.
    pub flow_on_zero_minor: bool,
    /// Minor-axis cursor (horizontal in default flow).
    pub pos_minor: Pos,
    /// Major-axis cursor (vertical in default flow).
    pub pos_major: Pos,
    /// Minor-axis wrap limit. `None` means no limit.
    pub max_minor: Option<Pos>,
    /// Major-axis limit; exceeding it is what triggers a layout
    /// restart under the overflow policy. `None` means no limit.
    pub max_major: Option<Pos>,
    /// True if exceeding `max_major` invalidates the pass. Armed for
    /// contexts whose node committed a size to an ancestor (a scroll
    /// box that has not yet reserved its scrollbar); disarmed once the
    /// commitment has been renegotiated, since scrolled content is then
    /// expected to overflow.
    pub restart_on_overflow: bool,
    /// Greatest minor coordinate consumed so far.
    pub high_minor: Pos,
    /// Greatest major coordinate consumed so far.
    pub high_major: Pos,
    /// The child most recently placed into this context; stamped onto
    /// the line record when the line closes.
    pub last_placed: Option<InternalId>,
    /// Line records, one per started line, append-only.
    pub lines: Vec<LineBox>,
}

impl FlowState {
    /// Reinitialize for a new context without releasing the line
    /// history's allocation. Called on a slot reclaimed from the
    /// non-destructive stack so repeated passes do not re-allocate.
    pub fn reset(&mut self, max_minor: Option<Pos>, max_major: Option<Pos>, restart_on_overflow: bool) {
        self.flow_on_zero_minor = false;
        self.pos_minor = Pos::ZERO;
        self.pos_major = Pos::ZERO;
        self.max_minor = max_minor;
        self.max_major = max_major;
        self.restart_on_overflow = restart_on_overflow;
        self.high_minor = Pos::ZERO;
        self.high_major = Pos::ZERO;
        self.last_placed = None;
        self.lines.clear();
        self.lines.push(LineBox::fresh());
    }

    /// The line currently being filled.
    ///
    /// # Panics
    /// Panics if the context was never reset (no line exists).
    #[must_use]
    pub fn current_line(&self) -> &LineBox {
        self.lines.last().expect("flow context has no line")
    }

    /// Mutable access to the line currently being filled.
    ///
    /// # Panics
    /// Panics if the context was never reset (no line exists).
    pub fn current_line_mut(&mut self) -> &mut LineBox {
        self.lines.last_mut().expect("flow context has no line")
    }
}
