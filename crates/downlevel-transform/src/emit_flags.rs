//! Emit-behavior flags and the overlay record attached to nodes.

use bitflags::bitflags;
use downlevel_ast::TextRange;
use rustc_hash::FxHashMap;

bitflags! {
    /// Flags that control how the printer emits a node.
    ///
    /// Stored in the emit-metadata overlay, never on the node itself.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct NodeEmitFlags: u32 {
        /// Combine these flags with whatever is already recorded for the
        /// node. Resolved lazily on read against the original chain; never
        /// escapes a read.
        const MERGE = 1 << 0;
        /// Do not emit a source map entry for this node.
        const NO_SOURCE_MAP = 1 << 1;
        /// Do not emit source map entries for this node's children.
        const NO_NESTED_SOURCE_MAPS = 1 << 2;
        /// Do not emit source map entries for this node's tokens.
        const NO_TOKEN_SOURCE_MAPS = 1 << 3;
        /// Do not emit comments for this node.
        const NO_COMMENTS = 1 << 4;
        /// Emit this node on a single line.
        const SINGLE_LINE = 1 << 5;
        /// Raise an emit notification for this specific node even when its
        /// kind has no notification interest.
        const ADVISE_ON_EMIT = 1 << 6;
        /// Emit the node's exported binding name instead of its local name.
        const EXPORT_NAME = 1 << 7;
        /// Emit the node's local binding name even when exported.
        const LOCAL_NAME = 1 << 8;
    }
}

bitflags! {
    /// Per-syntax-kind printer interception interest.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct SyntaxKindFeatureFlags: u8 {
        const SUBSTITUTION = 1 << 0;
        const EMIT_NOTIFICATIONS = 1 << 1;
    }
}

/// Lazily created overlay record for one node.
///
/// A `None` field means "inherit from the node this one replaces"; the
/// accessors on the transformation context walk the original chain.
#[derive(Clone, Debug, Default)]
pub struct NodeEmitOptions {
    pub flags: Option<NodeEmitFlags>,
    pub source_map_range: Option<TextRange>,
    pub token_source_map_ranges: Option<FxHashMap<u16, TextRange>>,
    pub comment_range: Option<TextRange>,
}
