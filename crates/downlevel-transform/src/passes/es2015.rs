//! ES2015 lowering, selected only when the target predates ES2015.
//!
//! Rewrites `let`/`const` declaration lists to `var` and arrow functions to
//! function expressions. The file body runs inside a lexical environment so
//! lowerings that need a hoisted temporary can use the context.

use super::{prepend_statements, too_deep};
use crate::chain::Transform;
use crate::context::TransformContext;
use crate::visitor::visit_each_child;
use downlevel_ast::node::{BlockData, FunctionData, ReturnData, VariableData};
use downlevel_ast::{NodeFlags, NodeIndex, NodeList, SyntaxKind};

pub fn factory(_context: &mut TransformContext) -> Transform {
    Box::new(|context, node| {
        if context.arena().kind(node) != SyntaxKind::SourceFile {
            return visit(context, node, 0);
        }
        context.start_lexical_environment();
        let visited = visit(context, node, 0);
        let hoisted = context.end_lexical_environment();
        prepend_statements(context, visited, hoisted)
    })
}

fn visit(context: &mut TransformContext, node: NodeIndex, depth: u32) -> NodeIndex {
    if too_deep(depth) {
        return node;
    }
    let visited = visit_each_child(context, node, &mut |context, child| {
        visit(context, child, depth + 1)
    });
    match context.arena().kind(visited) {
        SyntaxKind::VariableDeclarationList
            if context
                .arena()
                .node_flags(visited)
                .intersects(NodeFlags::BLOCK_SCOPED) =>
        {
            lower_declaration_list(context, visited)
        }
        SyntaxKind::ArrowFunction => lower_arrow_function(context, visited),
        _ => visited,
    }
}

fn lower_declaration_list(context: &mut TransformContext, list: NodeIndex) -> NodeIndex {
    let Some(data) = context.arena().variable_declaration_list(list).cloned() else {
        return list;
    };
    let (pos, end) = context
        .arena()
        .get(list)
        .map_or((0, 0), |header| (header.pos, header.end));
    let rebuilt = context.arena_mut().add_variable_declaration_list(
        pos,
        end,
        VariableData {
            declarations: data.declarations,
        },
        NodeFlags::empty(),
    );
    context.arena_mut().set_original(rebuilt, list);
    rebuilt
}

fn lower_arrow_function(context: &mut TransformContext, arrow: NodeIndex) -> NodeIndex {
    let Some(data) = context.arena().function(arrow).cloned() else {
        return arrow;
    };
    let (pos, end) = context
        .arena()
        .get(arrow)
        .map_or((0, 0), |header| (header.pos, header.end));

    // A bare expression body becomes a block returning it.
    let body = if !data.body.is_none() && context.arena().kind(data.body) != SyntaxKind::Block {
        let (body_pos, body_end) = context
            .arena()
            .get(data.body)
            .map_or((0, 0), |header| (header.pos, header.end));
        let return_statement = context.arena_mut().add_return(
            body_pos,
            body_end,
            ReturnData {
                expression: data.body,
            },
        );
        context.arena_mut().add_block(
            body_pos,
            body_end,
            BlockData {
                statements: NodeList::new(vec![return_statement]),
            },
        )
    } else {
        data.body
    };

    let rebuilt = context.arena_mut().add_function(
        SyntaxKind::FunctionExpression,
        pos,
        end,
        FunctionData {
            modifiers: data.modifiers,
            name: NodeIndex::NONE,
            parameters: data.parameters,
            type_annotation: data.type_annotation,
            body,
        },
    );
    context.arena_mut().set_original(rebuilt, arrow);
    rebuilt
}
