//! ES2016 lowering. Always present: rewrites the exponentiation operator
//! into `Math.pow` calls.

use super::too_deep;
use crate::chain::Transform;
use crate::context::TransformContext;
use crate::visitor::visit_each_child;
use downlevel_ast::{NodeIndex, NodeList, SyntaxKind};

pub fn factory(_context: &mut TransformContext) -> Transform {
    Box::new(|context, node| visit(context, node, 0))
}

fn visit(context: &mut TransformContext, node: NodeIndex, depth: u32) -> NodeIndex {
    if too_deep(depth) {
        return node;
    }
    // Operands first, so nested exponentiation lowers bottom-up.
    let visited = visit_each_child(context, node, &mut |context, child| {
        visit(context, child, depth + 1)
    });
    if is_exponentiation(context, visited) {
        return lower_exponent(context, visited);
    }
    visited
}

fn is_exponentiation(context: &TransformContext, node: NodeIndex) -> bool {
    context.arena().kind(node) == SyntaxKind::BinaryExpression
        && context
            .arena()
            .binary_expr(node)
            .is_some_and(|data| data.operator == SyntaxKind::AsteriskAsteriskToken as u16)
}

fn lower_exponent(context: &mut TransformContext, expression: NodeIndex) -> NodeIndex {
    let Some(data) = context.arena().binary_expr(expression).cloned() else {
        return expression;
    };
    let (pos, end) = context
        .arena()
        .get(expression)
        .map_or((0, 0), |header| (header.pos, header.end));

    let callee = context.arena_mut().add_synthetic_access("Math", "pow");
    let call = context.arena_mut().add_call_expr(
        pos,
        end,
        downlevel_ast::node::CallExprData {
            expression: callee,
            arguments: NodeList::new(vec![data.left, data.right]),
        },
    );
    context.arena_mut().set_original(call, expression);
    call
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{NullEmitResolver, StaticEmitHost};
    use downlevel_ast::node::BinaryExprData;
    use downlevel_ast::NodeArena;
    use downlevel_common::CompilerOptions;
    use std::rc::Rc;

    fn test_context() -> TransformContext {
        TransformContext::new(
            NodeArena::new(),
            Rc::new(StaticEmitHost::new(CompilerOptions::default())),
            Rc::new(NullEmitResolver),
        )
    }

    #[test]
    fn test_exponent_becomes_math_pow() {
        let mut ctx = test_context();
        let left = ctx.arena_mut().add_identifier(0, 1, "a");
        let right = ctx.arena_mut().add_identifier(5, 6, "b");
        let expression = ctx.arena_mut().add_binary_expr(
            0,
            6,
            BinaryExprData {
                left,
                operator: SyntaxKind::AsteriskAsteriskToken as u16,
                right,
            },
        );

        let mut transform = factory(&mut ctx);
        let lowered = transform(&mut ctx, expression);

        assert_eq!(ctx.arena().kind(lowered), SyntaxKind::CallExpression);
        assert_eq!(ctx.arena().original(lowered), expression);

        let call = ctx.arena().call_expr(lowered).unwrap().clone();
        let callee = ctx.arena().access_expr(call.expression).unwrap();
        assert_eq!(ctx.arena().identifier_text(callee.expression), "Math");
        assert_eq!(ctx.arena().identifier_text(callee.name), "pow");
        assert_eq!(call.arguments.nodes, vec![left, right]);

        // Source range survives for source maps.
        let header = ctx.arena().get(lowered).unwrap();
        assert_eq!((header.pos, header.end), (0, 6));
    }

    #[test]
    fn test_nested_exponent_lowers_bottom_up() {
        let mut ctx = test_context();
        let a = ctx.arena_mut().add_identifier(0, 1, "a");
        let b = ctx.arena_mut().add_identifier(5, 6, "b");
        let c = ctx.arena_mut().add_identifier(10, 11, "c");
        let inner = ctx.arena_mut().add_binary_expr(
            5,
            11,
            BinaryExprData {
                left: b,
                operator: SyntaxKind::AsteriskAsteriskToken as u16,
                right: c,
            },
        );
        let outer = ctx.arena_mut().add_binary_expr(
            0,
            11,
            BinaryExprData {
                left: a,
                operator: SyntaxKind::AsteriskAsteriskToken as u16,
                right: inner,
            },
        );

        let mut transform = factory(&mut ctx);
        let lowered = transform(&mut ctx, outer);

        let call = ctx.arena().call_expr(lowered).unwrap().clone();
        let inner_lowered = call.arguments.nodes[1];
        assert_eq!(ctx.arena().kind(inner_lowered), SyntaxKind::CallExpression);
        assert_eq!(ctx.arena().original(inner_lowered), inner);
    }

    #[test]
    fn test_other_operators_untouched() {
        let mut ctx = test_context();
        let left = ctx.arena_mut().add_identifier(0, 1, "a");
        let right = ctx.arena_mut().add_identifier(4, 5, "b");
        let expression = ctx.arena_mut().add_binary_expr(
            0,
            5,
            BinaryExprData {
                left,
                operator: SyntaxKind::PlusToken as u16,
                right,
            },
        );

        let mut transform = factory(&mut ctx);
        assert_eq!(transform(&mut ctx, expression), expression);
    }
}
