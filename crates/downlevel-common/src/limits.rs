//! Centralized limits and thresholds for the downlevel crates.
//!
//! Centralizing these values prevents duplicate definitions with
//! inconsistent values and documents the rationale for each limit.

/// Maximum depth for recursive AST rewriting.
///
/// Each nested expression or statement adds a frame to the call stack while a
/// pass rebuilds its children; at 500 levels deep the pass stops descending
/// and keeps the subtree as-is rather than overflow the stack.
pub const MAX_TRANSFORM_DEPTH: u32 = 500;

/// Maximum pre-allocation for arena node pools, to avoid capacity overflow
/// when a caller passes a huge size hint.
pub const MAX_NODE_PREALLOC: usize = 5_000_000;
