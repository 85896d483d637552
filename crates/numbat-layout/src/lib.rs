//! Incremental, restartable box-flow layout for the numbat toolkit.
//!
//! # Scope
//!
//! This crate converts a depth-first stream of node and word events into
//! absolutely positioned rectangles:
//!
//! - **The engine** ([`BoxLayout3`]): line-wrapping, baseline tracking,
//!   nested flow contexts, and the restart protocol. It sees only boxes;
//!   it never walks the document or touches styles.
//! - **The pass** ([`LayoutPass`]/[`layout_document`]): the walker that
//!   feeds the engine from a document tree, splits text into measured
//!   words, and honors the restart contract by redriving the event
//!   sequence after reserving scrollbar space.
//! - **Word measurement** ([`WordMetrics`]): the seam where a text
//!   shaper plugs in; words always reach the engine pre-measured.
//!
//! The line-box model matches the classical inline formatting notions
//! ([CSS 2.1 § 9.4.2](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting),
//! [§ 10.8](https://www.w3.org/TR/CSS2/visudet.html#line-height)) with
//! axis-generic naming: *minor* is the wrap axis, *major* the stacking
//! axis.
//!
//! # Not in this crate
//!
//! Style resolution, text shaping, rendering, and rasterization. The
//! layout output is consumed by `numbat-render`.

/// The box-flow engine and its input records.
pub mod boxlayout;
/// Flow-context cursor state and line records.
pub mod flow;
/// Word measurement seam.
pub mod metrics;
/// The tree-walking layout pass and its output tree.
pub mod pass;

pub use boxlayout::{BoxLayout3, FlowResult, NodeInput, RestartPolicy, WordInput};
pub use flow::LineBox;
pub use metrics::{ApproximateWordMetrics, WordMetrics};
pub use pass::{LayoutConfig, LayoutPass, LayoutTree, PlacedNode, PlacedWord, layout_document};
