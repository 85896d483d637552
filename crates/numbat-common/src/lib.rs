//! Common infrastructure for the numbat toolkit.
//!
//! This crate provides shared pieces used by all toolkit components:
//! - **Warning System** - colored, deduplicated terminal output for
//!   unsupported or suspicious inputs
//! - **Stack** - the non-destructive stack container the layout engine
//!   uses for its node and flow state

pub mod stack;
pub mod warning;

pub use stack::Stack;
