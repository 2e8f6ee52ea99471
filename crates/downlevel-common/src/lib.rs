//! Common types for the downlevel transform engine.
//!
//! This crate provides the foundational configuration types shared across the
//! downlevel crates:
//! - Compile configuration (`CompilerOptions`)
//! - Target/output enums (`ScriptTarget`, `ModuleKind`, `JsxEmit`, `NewLineKind`)
//! - Centralized limits and thresholds

// Common enums and compile configuration
pub mod common;
pub use common::{CompilerOptions, JsxEmit, ModuleKind, NewLineKind, ScriptTarget};

// Centralized limits and thresholds
pub mod limits;
