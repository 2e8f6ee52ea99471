//! Thin-node arena AST for the downlevel transform engine.
//!
//! Nodes are 16-byte headers stored in a single `Vec`, with kind-specific
//! payloads in typed storage pools. Trees are immutable once built: a pass
//! that wants to change a node creates a replacement through the arena and
//! links it to the superseded node via the `original` back-reference, which
//! the emit-metadata overlay walks at read time.

pub mod base;
pub use base::{NodeIndex, NodeList, TextRange};

pub mod syntax_kind;
pub use syntax_kind::SyntaxKind;

pub mod node;
pub use node::{Node, NodeArena, NodeFlags};

mod arena;
