//! AST transformation pipeline engine.
//!
//! Lowers a typed source AST to a target ECMAScript version through an
//! ordered sequence of passes. The engine owns pass composition
//! ([`compose`]/[`chain`]), pipeline selection ([`pipeline::transformers`]),
//! the per-run [`TransformContext`] (emit-metadata overlay, lexical
//! environments, printer hooks), and the generic child visitor passes build
//! on.
//!
//! Parsing, type checking, and text generation live outside this crate: the
//! engine consumes a built [`downlevel_ast::NodeArena`] and hands back
//! transformed roots plus the context the printer consults.

pub mod chain;
pub mod context;
pub mod emit_flags;
pub mod passes;
pub mod pipeline;
pub mod visitor;

pub use chain::{chain, compose, Transform, Transformer, TransformerFactory};
pub use context::{
    EmitHost, EmitResolver, NullEmitResolver, StaticEmitHost, TransformContext,
};
pub use emit_flags::{NodeEmitFlags, NodeEmitOptions, SyntaxKindFeatureFlags};
pub use pipeline::{transform_files, transformers, TransformResult};
pub use visitor::visit_each_child;
