//! Concrete pass factories named by the pipeline selection table.
//!
//! Each pass is deliberately thin: enough rewriting to exercise the engine
//! (visitor rebuilds, original links, hoisting, overlay writes, printer
//! interest) without a full lowering surface.

pub mod es2015;
pub mod es2016;
pub mod jsx;
pub mod module_cjs;
pub mod module_es;
pub mod module_system;
pub mod type_erasure;

use crate::context::TransformContext;
use downlevel_ast::node::SourceFileData;
use downlevel_ast::{NodeIndex, NodeList, SyntaxKind};
use downlevel_common::limits::MAX_TRANSFORM_DEPTH;

/// Traversal depth cutoff. Past the limit a pass stops descending and keeps
/// the subtree as-is.
#[inline]
fn too_deep(depth: u32) -> bool {
    if depth >= MAX_TRANSFORM_DEPTH {
        tracing::debug!(depth, "transform depth limit reached, keeping subtree");
        return true;
    }
    false
}

/// Rebuild a source file with `leading` statements ahead of its body.
/// Identity when `leading` is empty.
fn prepend_statements(
    context: &mut TransformContext,
    file: NodeIndex,
    leading: Vec<NodeIndex>,
) -> NodeIndex {
    if leading.is_empty() {
        return file;
    }
    let Some(data) = context.arena().source_file(file).cloned() else {
        return file;
    };
    let mut statements = leading;
    statements.extend(data.statements.iter());
    let (pos, end) = context
        .arena()
        .get(file)
        .map_or((0, 0), |header| (header.pos, header.end));
    let rebuilt = context.arena_mut().add_source_file(
        pos,
        end,
        SourceFileData {
            file_name: data.file_name,
            statements: NodeList::new(statements),
            end_of_file_token: data.end_of_file_token,
            is_declaration_file: data.is_declaration_file,
        },
    );
    context.arena_mut().set_original(rebuilt, file);
    rebuilt
}

/// Whether a node is a statement-position declaration that modifier-driven
/// passes care about.
fn is_top_level_declaration(context: &TransformContext, node: NodeIndex) -> bool {
    matches!(
        context.arena().kind(node),
        SyntaxKind::VariableStatement | SyntaxKind::FunctionDeclaration
    )
}
