//! Type erasure. Always the first pass: every later pass sees an AST free
//! of type-only syntax.
//!
//! Drops type annotations from parameters, variable declarations, and
//! function return positions, and elides `declare`d statements entirely.

use super::too_deep;
use crate::chain::Transform;
use crate::context::TransformContext;
use crate::visitor::visit_each_child;
use downlevel_ast::{NodeIndex, SyntaxKind};

pub fn factory(_context: &mut TransformContext) -> Transform {
    Box::new(|context, node| visit(context, node, 0))
}

fn visit(context: &mut TransformContext, node: NodeIndex, depth: u32) -> NodeIndex {
    if too_deep(depth) {
        return node;
    }
    match context.arena().kind(node) {
        // Type-only syntax in annotation position erases to an absent child.
        SyntaxKind::TypeReference
        | SyntaxKind::AnyKeyword
        | SyntaxKind::NumberKeyword
        | SyntaxKind::StringKeyword
        | SyntaxKind::BooleanKeyword
        | SyntaxKind::VoidKeyword => NodeIndex::NONE,

        // Ambient declarations carry no runtime semantics.
        SyntaxKind::VariableStatement | SyntaxKind::FunctionDeclaration
            if context
                .arena()
                .has_modifier(node, SyntaxKind::DeclareKeyword) =>
        {
            NodeIndex::NONE
        }

        _ => visit_each_child(context, node, &mut |context, child| {
            visit(context, child, depth + 1)
        }),
    }
}
