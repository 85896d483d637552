//! The box-flow layout engine.
//!
//! This system receives abstract boxes and spits out their positions. It
//! deliberately deals only with "boxy" decisions: it does not walk the
//! document tree or understand how styles were resolved. Its input is
//! boxes, and its output is boxes.
//!
//! Inputs arrive as a depth-first event stream: [`BoxLayout3::begin_node`]
//! / [`BoxLayout3::end_node`] bracket each element, and
//! [`BoxLayout3::add_word`] / [`BoxLayout3::add_space`] /
//! [`BoxLayout3::add_linebreak`] feed inline content in between. Words
//! are not a special kind of object (they are flowed like any other
//! box), but they are the overwhelmingly common case, so they get
//! their own entry point.
//!
//! # Coordinate space of shared-flow nodes
//!
//! Nodes that do not establish their own flow context are positioned in
//! the coordinate space of their most recent ancestor that does. The
//! engine performs no translation between nested contexts; compositing a
//! child context's output into the parent's space is the renderer's job.
//!
//! # Restart
//!
//! The engine can discover, mid-pass, that an earlier placement
//! assumption no longer holds (content overflowed a major-axis limit a
//! scrolling ancestor committed to). It then returns
//! [`FlowResult::Restart`]; the caller calls [`BoxLayout3::restart`] and
//! redrives the same event sequence. The engine does not remember or
//! replay calls; it only guarantees that replaying identical inputs
//! reproduces identical outputs, which the fixed-point coordinate type
//! makes exact.

use numbat_common::Stack;
use numbat_common::warning::warn_once;
use numbat_doc::{Bump, InternalId, Tag};
use numbat_geom::{Edges, Pos, Rect};

use crate::flow::{FlowState, LineBox};

/// Outcome of a placement operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowResult {
    /// Placement succeeded; carry on.
    Normal,
    /// The pass is invalid from some earlier point. Call
    /// [`BoxLayout3::restart`] and redrive the event sequence.
    Restart,
}

/// When the engine signals a restart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RestartPolicy {
    /// Never signal; overflow wraps or spills silently.
    #[default]
    Never,
    /// Signal when a placement pushes a flow context past its
    /// major-axis limit: the size commitment an ancestor made (e.g. a
    /// scrolling box that now needs room for a scrollbar) is violated.
    OnMajorOverflow,
}

/// Per-node input record, resolved by the caller before the call.
#[derive(Debug, Clone, Copy)]
pub struct NodeInput {
    /// The element this node represents.
    pub id: InternalId,
    /// The element's tag, carried through to the output.
    pub tag: Tag,
    /// Margin, border, and padding summed per edge by the caller.
    pub margin_border_padding: Edges,
    /// Resolved content width; `None` derives it from the content flow.
    pub content_width: Option<Pos>,
    /// Resolved content height; `None` derives it from the content flow.
    pub content_height: Option<Pos>,
    /// How the placed box nudges the surrounding flow.
    pub bump: Bump,
    /// True if this node establishes its own flow context.
    pub new_flow_context: bool,
    /// True if content exceeding this node's major limit invalidates
    /// the whole pass (the node committed its size to an ancestor and
    /// has not yet renegotiated, e.g. a scroll box still without its
    /// scrollbar). Callers clear this on redrive once the commitment
    /// has been adjusted.
    pub restart_on_overflow: bool,
}

/// One pre-measured inline run.
#[derive(Debug, Clone, Copy)]
pub struct WordInput {
    /// Advance width of the run.
    pub width: Pos,
    /// Height of the run (normally the line height of its font).
    pub height: Pos,
}

/// Per-node state retained across the node's begin..end bracket.
#[derive(Debug, Clone, Copy)]
struct NodeState {
    input: NodeInput,
    margin_box: Rect,
    /// Cursor snapshot at begin_node, used to bound shared-flow nodes.
    start_minor: Pos,
    start_major: Pos,
    /// Previous value of the enclosing flow's zero-minor override, to
    /// restore on end_node (shared-flow nodes only).
    saved_flow_on_zero_minor: bool,
}

/// The layout engine.
///
/// One instance serves one document's layout pass at a time; it is
/// single-threaded and holds no external resources, only the two state
/// stacks. Both stacks pop non-destructively: a just-closed node's state
/// stays readable until the next `begin_node`, which is what makes
/// [`BoxLayout3::line_from_previous_node`] possible.
#[derive(Debug, Default)]
pub struct BoxLayout3 {
    flow_states: Stack<FlowState>,
    node_states: Stack<NodeState>,
    restart_policy: RestartPolicy,
    waiting_for_restart: bool,
    /// Whether the most recently closed node owned its flow context.
    /// `None` when no node has closed since the last begin.
    last_closed_owned_flow: Option<bool>,
}

impl BoxLayout3 {
    /// Create an engine with the given restart policy.
    #[must_use]
    pub fn new(restart_policy: RestartPolicy) -> BoxLayout3 {
        BoxLayout3 {
            restart_policy,
            ..BoxLayout3::default()
        }
    }

    /// True if the engine has signaled [`FlowResult::Restart`] and is
    /// waiting for [`BoxLayout3::restart`].
    #[must_use]
    pub const fn is_waiting_for_restart(&self) -> bool {
        self.waiting_for_restart
    }

    /// Begin a layout pass: clear both stacks and open the root flow
    /// context with unconstrained wrap limits. Viewport constraints
    /// enter through the root node's [`NodeInput`], not here.
    pub fn begin_document(&mut self) {
        self.flow_states.clear();
        self.node_states.clear();
        self.flow_states.push_reuse().reset(None, None, false);
        self.waiting_for_restart = false;
        self.last_closed_owned_flow = None;
    }

    /// End the layout pass. No further calls are valid until the next
    /// [`BoxLayout3::begin_document`].
    pub fn end_document(&mut self) {
        debug_assert!(
            self.node_states.is_empty(),
            "end_document with unclosed nodes"
        );
        if !self.node_states.is_empty() {
            warn_once("Layout", "end_document called with unclosed nodes");
        }
        self.flow_states.pop();
        self.last_closed_owned_flow = None;
    }

    /// Open a node. If the node establishes a new flow context, a fresh
    /// cursor is pushed whose wrap limits derive from the declared
    /// content size (unconstrained where undeclared).
    pub fn begin_node(&mut self, input: &NodeInput) {
        #[cfg(feature = "layout-trace")]
        eprintln!(
            "[FLOW] {:indent$}begin {} #{} flow={}",
            "",
            input.tag,
            input.id.0,
            input.new_flow_context,
            indent = self.node_states.depth() * 2
        );

        let (start_minor, start_major, enclosing_mid_line) = {
            let flow = self.current_flow();
            (
                flow.pos_minor,
                flow.pos_major,
                flow.pos_minor != Pos::ZERO,
            )
        };

        let mut saved_flow_on_zero_minor = false;
        if input.new_flow_context {
            let (max_minor, max_major) = (input.content_width, input.content_height);
            self.flow_states
                .push_reuse()
                .reset(max_minor, max_major, input.restart_on_overflow);
        } else {
            // Injected flow: when this node's content enters an
            // enclosing line it does not own, even a box sitting at the
            // minor origin must be allowed to wrap. Snapshot the
            // override either way so nested injected nodes restore
            // correctly on close.
            let flow = self.current_flow_mut();
            saved_flow_on_zero_minor = flow.flow_on_zero_minor;
            if enclosing_mid_line {
                flow.flow_on_zero_minor = true;
            }
        }

        self.node_states.push(NodeState {
            input: *input,
            margin_box: Rect::default(),
            start_minor,
            start_major,
            saved_flow_on_zero_minor,
        });
        self.last_closed_owned_flow = None;
    }

    /// Close the most recently opened node, computing its final margin
    /// box. For a flow-context node the box is placed into the parent
    /// context (content size falling back to the closed context's
    /// high-water extent); for a shared-flow node the box bounds the
    /// cursor travel during the bracket.
    ///
    /// The popped state remains readable until the next `begin_node`,
    /// so [`BoxLayout3::line_from_previous_node`] and
    /// [`BoxLayout3::first_baseline`] can inspect the closed node.
    pub fn end_node(&mut self, margin_box: &mut Rect) -> FlowResult {
        let Some(ns) = self.node_states.top().copied() else {
            debug_assert!(false, "end_node without matching begin_node");
            warn_once("Layout", "end_node called with no open node");
            return FlowResult::Normal;
        };
        let input = ns.input;

        let placed = if input.new_flow_context {
            // Resolve the content size: declared wins, otherwise the
            // extent the context actually consumed.
            let (high_minor, high_major) = {
                let closed = self.current_flow();
                (closed.high_minor, closed.high_major)
            };
            self.flow_states.pop();

            let content_w = input.content_width.unwrap_or(high_minor);
            let content_h = input.content_height.unwrap_or(high_major);
            let mbp = input.margin_border_padding;
            let width = mbp.horizontal() + content_w;
            let height = mbp.vertical() + content_h;

            let flow = self.current_flow_mut();
            if input.bump != Bump::None && Self::must_flow(flow, width) {
                Self::new_line(flow);
            }
            Self::place(flow, width, height, input.bump, input.id)
        } else {
            // Shared flow: bound the travel between the begin snapshot
            // and the current cursor. Wrapped content spans back to the
            // minor origin.
            let flow = self.current_flow_mut();
            flow.flow_on_zero_minor = ns.saved_flow_on_zero_minor;

            let wrapped = flow.pos_major > ns.start_major;
            let left = if wrapped { Pos::ZERO } else { ns.start_minor };
            let right = if wrapped {
                flow.high_minor
            } else {
                flow.pos_minor
            };
            Rect::new(
                left,
                ns.start_major,
                right.max(left),
                flow.high_major.max(ns.start_major),
            )
        };

        *margin_box = placed;
        if let Some(top) = self.node_states.top_mut() {
            top.margin_box = placed;
        }
        self.node_states.pop();
        self.last_closed_owned_flow = Some(input.new_flow_context);

        #[cfg(feature = "layout-trace")]
        eprintln!(
            "[FLOW] {:indent$}end   {} #{} box=({},{})..({},{})",
            "",
            input.tag,
            input.id.0,
            placed.left,
            placed.top,
            placed.right,
            placed.bottom,
            indent = self.node_states.depth() * 2
        );

        self.check_restart(placed.bottom)
    }

    /// Flow one word into the current context, wrapping first if it
    /// must. Writes the placed box and returns the flow outcome.
    pub fn add_word(&mut self, input: &WordInput, margin_box: &mut Rect) -> FlowResult {
        let child = self.open_node_id();
        let flow = self.current_flow_mut();
        if Self::must_flow(flow, input.width) {
            Self::new_line(flow);
        }
        let placed = Self::place(flow, input.width, input.height, Bump::Regular, child);
        *margin_box = placed;

        #[cfg(feature = "layout-trace")]
        eprintln!(
            "[FLOW] {:indent$}word  {}x{} at ({},{})",
            "",
            input.width,
            input.height,
            placed.left,
            placed.top,
            indent = self.node_states.depth() * 2
        );

        self.check_restart(placed.bottom)
    }

    /// Advance the minor cursor without creating a placeable box.
    ///
    /// The engine does not special-case leading spaces; whether a space
    /// at the start of a line should exist is the caller's decision,
    /// made before calling in.
    pub fn add_space(&mut self, size: Pos) {
        let flow = self.current_flow_mut();
        flow.pos_minor += size;
    }

    /// Unconditionally close the current line (even under capacity) and
    /// begin a new one.
    pub fn add_linebreak(&mut self) {
        let flow = self.current_flow_mut();
        Self::new_line(flow);
    }

    /// Set the current line's inner baseline, but only if it is not
    /// already set: the first setter wins and also records which child
    /// defined the line's baseline.
    pub fn set_baseline(&mut self, baseline: Pos, child: InternalId) {
        let line = self.current_flow_mut().current_line_mut();
        if line.inner_baseline.is_none() {
            line.inner_baseline = Some(baseline);
            line.inner_baseline_defined_by = Some(child);
        }
    }

    /// The current line's baseline, or `None` if no child has set one.
    #[must_use]
    pub fn baseline(&self) -> Option<Pos> {
        self.current_flow().current_line().inner_baseline
    }

    /// The first line's baseline of the flow context that just closed.
    /// This is the closed node's *outer* baseline, the reference its
    /// parent aligns against sibling baselines.
    ///
    /// Valid between an `end_node` and the next `begin_node`; when the
    /// closed node did not own a context, reads the nearest enclosing
    /// one.
    #[must_use]
    pub fn first_baseline(&self) -> Option<Pos> {
        self.previous_flow()
            .and_then(|flow| flow.lines.first())
            .and_then(|line| line.inner_baseline)
    }

    /// Retrieve line `line_index` from the node most recently finished
    /// with `end_node`, or from the nearest enclosing flow context if
    /// that node did not own one. Returns `None` when out of range.
    ///
    /// It may seem strange that we can retrieve line data from a node
    /// that has already ended. Surely its state was popped? It was,
    /// but the stacks pop by decrementing a counter without wiping, so
    /// until a new node is started the old data is still there, fully
    /// intact.
    #[must_use]
    pub fn line_from_previous_node(&self, line_index: usize) -> Option<&LineBox> {
        debug_assert!(
            self.last_closed_owned_flow.is_some(),
            "line_from_previous_node is only valid directly after end_node"
        );
        self.previous_flow()
            .and_then(|flow| flow.lines.get(line_index))
    }

    /// Predict, without mutating anything, whether adding a minor-axis
    /// box of `size` would start a new line.
    #[must_use]
    pub fn would_flow(&self, size: Pos) -> bool {
        Self::must_flow(self.current_flow(), size)
    }

    /// The margin box of the node most recently closed with `end_node`,
    /// readable (like the line records) until the next `begin_node`.
    #[must_use]
    pub fn previous_node_margin_box(&self) -> Option<Rect> {
        debug_assert!(
            self.last_closed_owned_flow.is_some(),
            "previous_node_margin_box is only valid directly after end_node"
        );
        self.node_states
            .get(self.node_states.depth())
            .map(|ns| ns.margin_box)
    }

    /// Reset to the state directly after the last `begin_document`,
    /// keeping every internal allocation (line histories included) for
    /// the next attempt. Only valid after receiving
    /// [`FlowResult::Restart`]; the caller then redrives the same call
    /// sequence.
    pub fn restart(&mut self) {
        debug_assert!(
            self.waiting_for_restart,
            "restart without a FlowResult::Restart signal"
        );
        if !self.waiting_for_restart {
            warn_once("Layout", "restart called without a restart signal");
        }
        self.waiting_for_restart = false;
        self.last_closed_owned_flow = None;
        self.node_states.clear();
        self.flow_states.clear();
        self.flow_states.push_reuse().reset(None, None, false);
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// A box of `size` must wrap when a minor limit exists and the
    /// cursor would pass it, unless the cursor is at the minor origin.
    /// An empty line never refuses a box, whatever its size; that is
    /// what guarantees termination for a single over-wide word. The
    /// zero-minor override disables the exception for injected flow.
    fn must_flow(flow: &FlowState, size: Pos) -> bool {
        let Some(max_minor) = flow.max_minor else {
            return false;
        };
        if flow.pos_minor == Pos::ZERO && !flow.flow_on_zero_minor {
            return false;
        }
        flow.pos_minor + size > max_minor
    }

    /// Place a box at the cursor and advance per the bump style.
    fn place(flow: &mut FlowState, width: Pos, height: Pos, bump: Bump, child: InternalId) -> Rect {
        let placed = Rect::new(
            flow.pos_minor,
            flow.pos_major,
            flow.pos_minor + width,
            flow.pos_major + height,
        );
        match bump {
            Bump::Regular => {
                flow.pos_minor += width;
                flow.high_minor = flow.high_minor.max(placed.right);
                flow.high_major = flow.high_major.max(placed.bottom);
            }
            Bump::HorzOnly => {
                flow.pos_minor += width;
                flow.high_minor = flow.high_minor.max(placed.right);
            }
            Bump::VertOnly => {
                flow.high_minor = flow.high_minor.max(placed.right);
                flow.high_major = flow.high_major.max(placed.bottom);
            }
            Bump::None => {}
        }
        if bump != Bump::None {
            flow.last_placed = Some(child);
        }
        placed
    }

    /// Close the current line and open a fresh one: stamp the closing
    /// line's last child, reset the minor cursor to the origin, and
    /// advance the major cursor to the high-water mark (the closed
    /// line's height contribution).
    fn new_line(flow: &mut FlowState) {
        let last_placed = flow.last_placed.take();
        flow.current_line_mut().last_child = last_placed;
        flow.lines.push(LineBox::fresh());
        flow.pos_minor = Pos::ZERO;
        flow.pos_major = flow.high_major;
    }

    /// Arm and signal a restart when the placement broke a major-axis
    /// commitment under the active policy.
    fn check_restart(&mut self, placed_bottom: Pos) -> FlowResult {
        let flow = self.current_flow();
        if self.restart_policy == RestartPolicy::OnMajorOverflow
            && !self.waiting_for_restart
            && flow.restart_on_overflow
            && flow.max_major.is_some_and(|max| placed_bottom > max)
        {
            self.waiting_for_restart = true;
            return FlowResult::Restart;
        }
        FlowResult::Normal
    }

    /// The innermost active flow context.
    ///
    /// # Panics
    /// Panics if called outside a document bracket.
    fn current_flow(&self) -> &FlowState {
        self.flow_states
            .top()
            .expect("no active flow context (missing begin_document?)")
    }

    fn current_flow_mut(&mut self) -> &mut FlowState {
        self.flow_states
            .top_mut()
            .expect("no active flow context (missing begin_document?)")
    }

    /// The flow context of the most recently closed node: the popped one
    /// if it owned a context, otherwise the nearest enclosing (live)
    /// one. Relies on the non-destructive pop.
    fn previous_flow(&self) -> Option<&FlowState> {
        match self.last_closed_owned_flow {
            Some(true) => self.flow_states.get(self.flow_states.depth()),
            _ => self.flow_states.top(),
        }
    }

    /// The id of the innermost open node, for line attribution.
    fn open_node_id(&self) -> InternalId {
        match self.node_states.top() {
            Some(ns) => ns.input.id,
            None => {
                debug_assert!(false, "inline content outside any node");
                InternalId::ROOT
            }
        }
    }
}
