//! Generic child traversal for passes.
//!
//! `visit_each_child` applies a visitor to every child of a node and rebuilds
//! the node only when some child actually changed. An unchanged subtree keeps
//! its identity, which keeps the emit-metadata overlay and parent links valid
//! for the untouched parts of the tree. Rebuilt nodes are linked to the node
//! they replace through the arena's `original` back-reference.
//!
//! A visitor returning `NodeIndex::NONE` drops the child: elided from lists,
//! stored as an absent child otherwise.

use crate::context::TransformContext;
use downlevel_ast::node::{
    AccessExprData, BinaryExprData, BlockData, CallExprData, ExprStatementData, FunctionData,
    JsxAttributeData, JsxElementData, LiteralExprData, ParameterData, ParenthesizedData,
    PropertyAssignmentData, ReturnData, SourceFileData, TypeRefData, VariableData,
    VariableDeclarationData, VariableStatementData,
};
use downlevel_ast::{NodeIndex, NodeList, SyntaxKind};

/// Callback applied to each child node.
pub type Visitor<'a> = &'a mut dyn FnMut(&mut TransformContext, NodeIndex) -> NodeIndex;

fn visit(context: &mut TransformContext, node: NodeIndex, visitor: Visitor) -> NodeIndex {
    if node.is_none() {
        return node;
    }
    visitor(context, node)
}

fn visit_list(
    context: &mut TransformContext,
    list: &NodeList,
    visitor: Visitor,
) -> (NodeList, bool) {
    let mut changed = false;
    let mut nodes = Vec::with_capacity(list.len());
    for child in list.iter() {
        let visited = visitor(context, child);
        if visited != child {
            changed = true;
        }
        if !visited.is_none() {
            nodes.push(visited);
        }
    }
    (NodeList::new(nodes), changed)
}

fn visit_opt_list(
    context: &mut TransformContext,
    list: &Option<NodeList>,
    visitor: Visitor,
) -> (Option<NodeList>, bool) {
    match list {
        Some(list) => {
            let (visited, changed) = visit_list(context, list, visitor);
            (Some(visited), changed)
        }
        None => (None, false),
    }
}

fn source_range(context: &TransformContext, node: NodeIndex) -> (u32, u32) {
    context
        .arena()
        .get(node)
        .map_or((0, 0), |header| (header.pos, header.end))
}

fn finish(context: &mut TransformContext, rebuilt: NodeIndex, replaced: NodeIndex) -> NodeIndex {
    context.arena_mut().set_original(rebuilt, replaced);
    rebuilt
}

/// Visit every child of `node`, rebuilding the node when any child changed
/// and returning `node` itself otherwise. Kinds without children pass
/// through untouched.
pub fn visit_each_child(
    context: &mut TransformContext,
    node: NodeIndex,
    visitor: Visitor,
) -> NodeIndex {
    match context.arena().kind(node) {
        SyntaxKind::BinaryExpression => {
            let Some(data) = context.arena().binary_expr(node).cloned() else {
                return node;
            };
            let left = visit(context, data.left, visitor);
            let right = visit(context, data.right, visitor);
            if left == data.left && right == data.right {
                return node;
            }
            let (pos, end) = source_range(context, node);
            let rebuilt = context.arena_mut().add_binary_expr(
                pos,
                end,
                BinaryExprData {
                    left,
                    operator: data.operator,
                    right,
                },
            );
            finish(context, rebuilt, node)
        }

        SyntaxKind::CallExpression => {
            let Some(data) = context.arena().call_expr(node).cloned() else {
                return node;
            };
            let expression = visit(context, data.expression, visitor);
            let (arguments, arguments_changed) = visit_list(context, &data.arguments, visitor);
            if expression == data.expression && !arguments_changed {
                return node;
            }
            let (pos, end) = source_range(context, node);
            let rebuilt = context.arena_mut().add_call_expr(
                pos,
                end,
                CallExprData {
                    expression,
                    arguments,
                },
            );
            finish(context, rebuilt, node)
        }

        SyntaxKind::PropertyAccessExpression => {
            let Some(data) = context.arena().access_expr(node).cloned() else {
                return node;
            };
            let expression = visit(context, data.expression, visitor);
            let name = visit(context, data.name, visitor);
            if expression == data.expression && name == data.name {
                return node;
            }
            let (pos, end) = source_range(context, node);
            let rebuilt =
                context
                    .arena_mut()
                    .add_access_expr(pos, end, AccessExprData { expression, name });
            finish(context, rebuilt, node)
        }

        SyntaxKind::ParenthesizedExpression => {
            let Some(data) = context.arena().parenthesized_expr(node).cloned() else {
                return node;
            };
            let expression = visit(context, data.expression, visitor);
            if expression == data.expression {
                return node;
            }
            let (pos, end) = source_range(context, node);
            let rebuilt =
                context
                    .arena_mut()
                    .add_parenthesized(pos, end, ParenthesizedData { expression });
            finish(context, rebuilt, node)
        }

        SyntaxKind::ObjectLiteralExpression => {
            let Some(data) = context.arena().literal_expr(node).cloned() else {
                return node;
            };
            let (elements, changed) = visit_list(context, &data.elements, visitor);
            if !changed {
                return node;
            }
            let (pos, end) = source_range(context, node);
            let rebuilt = context
                .arena_mut()
                .add_literal_expr(pos, end, LiteralExprData { elements });
            finish(context, rebuilt, node)
        }

        SyntaxKind::PropertyAssignment => {
            let Some(data) = context.arena().property_assignment(node).cloned() else {
                return node;
            };
            let name = visit(context, data.name, visitor);
            let initializer = visit(context, data.initializer, visitor);
            if name == data.name && initializer == data.initializer {
                return node;
            }
            let (pos, end) = source_range(context, node);
            let rebuilt = context.arena_mut().add_property_assignment(
                pos,
                end,
                PropertyAssignmentData { name, initializer },
            );
            finish(context, rebuilt, node)
        }

        kind @ (SyntaxKind::FunctionDeclaration
        | SyntaxKind::FunctionExpression
        | SyntaxKind::ArrowFunction) => {
            let Some(data) = context.arena().function(node).cloned() else {
                return node;
            };
            let (modifiers, modifiers_changed) = visit_opt_list(context, &data.modifiers, visitor);
            let name = visit(context, data.name, visitor);
            let (parameters, parameters_changed) = visit_list(context, &data.parameters, visitor);
            let type_annotation = visit(context, data.type_annotation, visitor);
            let body = visit(context, data.body, visitor);
            if !modifiers_changed
                && name == data.name
                && !parameters_changed
                && type_annotation == data.type_annotation
                && body == data.body
            {
                return node;
            }
            let (pos, end) = source_range(context, node);
            let rebuilt = context.arena_mut().add_function(
                kind,
                pos,
                end,
                FunctionData {
                    modifiers,
                    name,
                    parameters,
                    type_annotation,
                    body,
                },
            );
            finish(context, rebuilt, node)
        }

        SyntaxKind::Parameter => {
            let Some(data) = context.arena().parameter(node).cloned() else {
                return node;
            };
            let name = visit(context, data.name, visitor);
            let type_annotation = visit(context, data.type_annotation, visitor);
            let initializer = visit(context, data.initializer, visitor);
            if name == data.name
                && type_annotation == data.type_annotation
                && initializer == data.initializer
            {
                return node;
            }
            let (pos, end) = source_range(context, node);
            let rebuilt = context.arena_mut().add_parameter(
                pos,
                end,
                ParameterData {
                    name,
                    type_annotation,
                    initializer,
                },
            );
            finish(context, rebuilt, node)
        }

        SyntaxKind::VariableDeclaration => {
            let Some(data) = context.arena().variable_declaration(node).cloned() else {
                return node;
            };
            let name = visit(context, data.name, visitor);
            let type_annotation = visit(context, data.type_annotation, visitor);
            let initializer = visit(context, data.initializer, visitor);
            if name == data.name
                && type_annotation == data.type_annotation
                && initializer == data.initializer
            {
                return node;
            }
            let (pos, end) = source_range(context, node);
            let rebuilt = context.arena_mut().add_variable_declaration(
                pos,
                end,
                VariableDeclarationData {
                    name,
                    type_annotation,
                    initializer,
                },
            );
            finish(context, rebuilt, node)
        }

        SyntaxKind::VariableDeclarationList => {
            let Some(data) = context.arena().variable_declaration_list(node).cloned() else {
                return node;
            };
            let (declarations, changed) = visit_list(context, &data.declarations, visitor);
            if !changed {
                return node;
            }
            let flags = context.arena().node_flags(node);
            let (pos, end) = source_range(context, node);
            let rebuilt = context.arena_mut().add_variable_declaration_list(
                pos,
                end,
                VariableData { declarations },
                flags,
            );
            finish(context, rebuilt, node)
        }

        SyntaxKind::VariableStatement => {
            let Some(data) = context.arena().variable_statement(node).cloned() else {
                return node;
            };
            let (modifiers, modifiers_changed) = visit_opt_list(context, &data.modifiers, visitor);
            let declaration_list = visit(context, data.declaration_list, visitor);
            if !modifiers_changed && declaration_list == data.declaration_list {
                return node;
            }
            let (pos, end) = source_range(context, node);
            let rebuilt = context.arena_mut().add_variable_statement(
                pos,
                end,
                VariableStatementData {
                    modifiers,
                    declaration_list,
                },
            );
            finish(context, rebuilt, node)
        }

        SyntaxKind::Block => {
            let Some(data) = context.arena().block(node).cloned() else {
                return node;
            };
            let (statements, changed) = visit_list(context, &data.statements, visitor);
            if !changed {
                return node;
            }
            let (pos, end) = source_range(context, node);
            let rebuilt = context
                .arena_mut()
                .add_block(pos, end, BlockData { statements });
            finish(context, rebuilt, node)
        }

        SyntaxKind::ExpressionStatement => {
            let Some(data) = context.arena().expr_statement(node).cloned() else {
                return node;
            };
            let expression = visit(context, data.expression, visitor);
            if expression == data.expression {
                return node;
            }
            let (pos, end) = source_range(context, node);
            let rebuilt =
                context
                    .arena_mut()
                    .add_expr_statement(pos, end, ExprStatementData { expression });
            finish(context, rebuilt, node)
        }

        SyntaxKind::ReturnStatement => {
            let Some(data) = context.arena().return_statement(node).cloned() else {
                return node;
            };
            let expression = visit(context, data.expression, visitor);
            if expression == data.expression {
                return node;
            }
            let (pos, end) = source_range(context, node);
            let rebuilt = context
                .arena_mut()
                .add_return(pos, end, ReturnData { expression });
            finish(context, rebuilt, node)
        }

        SyntaxKind::JsxElement => {
            let Some(data) = context.arena().jsx_element(node).cloned() else {
                return node;
            };
            let tag_name = visit(context, data.tag_name, visitor);
            let (attributes, attributes_changed) = visit_list(context, &data.attributes, visitor);
            let (children, children_changed) = visit_list(context, &data.children, visitor);
            if tag_name == data.tag_name && !attributes_changed && !children_changed {
                return node;
            }
            let (pos, end) = source_range(context, node);
            let rebuilt = context.arena_mut().add_jsx_element(
                pos,
                end,
                JsxElementData {
                    tag_name,
                    attributes,
                    children,
                },
            );
            finish(context, rebuilt, node)
        }

        SyntaxKind::JsxAttribute => {
            let Some(data) = context.arena().jsx_attribute(node).cloned() else {
                return node;
            };
            let name = visit(context, data.name, visitor);
            let initializer = visit(context, data.initializer, visitor);
            if name == data.name && initializer == data.initializer {
                return node;
            }
            let (pos, end) = source_range(context, node);
            let rebuilt =
                context
                    .arena_mut()
                    .add_jsx_attribute(pos, end, JsxAttributeData { name, initializer });
            finish(context, rebuilt, node)
        }

        SyntaxKind::TypeReference => {
            let Some(data) = context.arena().type_ref(node).cloned() else {
                return node;
            };
            let type_name = visit(context, data.type_name, visitor);
            let (type_arguments, arguments_changed) =
                visit_opt_list(context, &data.type_arguments, visitor);
            if type_name == data.type_name && !arguments_changed {
                return node;
            }
            let (pos, end) = source_range(context, node);
            let rebuilt = context.arena_mut().add_type_ref(
                pos,
                end,
                TypeRefData {
                    type_name,
                    type_arguments,
                },
            );
            finish(context, rebuilt, node)
        }

        SyntaxKind::SourceFile => {
            let Some(data) = context.arena().source_file(node).cloned() else {
                return node;
            };
            let (statements, changed) = visit_list(context, &data.statements, visitor);
            if !changed {
                return node;
            }
            let (pos, end) = source_range(context, node);
            let rebuilt = context.arena_mut().add_source_file(
                pos,
                end,
                SourceFileData {
                    file_name: data.file_name,
                    statements,
                    end_of_file_token: data.end_of_file_token,
                    is_declaration_file: data.is_declaration_file,
                },
            );
            finish(context, rebuilt, node)
        }

        // Tokens, identifiers, literals, and keyword type nodes have no
        // children to visit.
        _ => node,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{NullEmitResolver, StaticEmitHost};
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

    fn sample_call(ctx: &mut TransformContext) -> NodeIndex {
        let callee = ctx.arena_mut().add_identifier(0, 1, "f");
        let a = ctx.arena_mut().add_identifier(2, 3, "a");
        let b = ctx.arena_mut().add_identifier(5, 6, "b");
        ctx.arena_mut().add_call_expr(
            0,
            7,
            CallExprData {
                expression: callee,
                arguments: NodeList::new(vec![a, b]),
            },
        )
    }

    #[test]
    fn test_unchanged_children_preserve_identity() {
        let mut ctx = test_context();
        let call = sample_call(&mut ctx);
        let result = visit_each_child(&mut ctx, call, &mut |_ctx, child| child);
        assert_eq!(result, call);
    }

    #[test]
    fn test_changed_child_rebuilds_with_original_link() {
        let mut ctx = test_context();
        let call = sample_call(&mut ctx);
        let result = visit_each_child(&mut ctx, call, &mut |ctx, child| {
            if ctx.arena().identifier_text(child) == "a" {
                ctx.arena_mut().add_synthetic_identifier("z")
            } else {
                child
            }
        });

        assert_ne!(result, call);
        assert_eq!(ctx.arena().original(result), call);
        let arguments = &ctx.arena().call_expr(result).unwrap().arguments;
        assert_eq!(arguments.len(), 2);
        assert_eq!(ctx.arena().identifier_text(arguments.nodes[0]), "z");
        assert_eq!(ctx.arena().identifier_text(arguments.nodes[1]), "b");

        // Rebuild keeps the replaced node's source range.
        let header = ctx.arena().get(result).unwrap();
        assert_eq!((header.pos, header.end), (0, 7));
    }

    #[test]
    fn test_none_result_elides_from_list() {
        let mut ctx = test_context();
        let call = sample_call(&mut ctx);
        let result = visit_each_child(&mut ctx, call, &mut |ctx, child| {
            if ctx.arena().identifier_text(child) == "a" {
                NodeIndex::NONE
            } else {
                child
            }
        });

        let arguments = &ctx.arena().call_expr(result).unwrap().arguments;
        assert_eq!(arguments.len(), 1);
        assert_eq!(ctx.arena().identifier_text(arguments.nodes[0]), "b");
    }

    #[test]
    fn test_declaration_list_keeps_flags() {
        use downlevel_ast::NodeFlags;

        let mut ctx = test_context();
        let name = ctx.arena_mut().add_identifier(4, 5, "x");
        let init = ctx.arena_mut().add_literal(SyntaxKind::NumericLiteral, 8, 9, "1");
        let declaration = ctx.arena_mut().add_variable_declaration(
            4,
            9,
            VariableDeclarationData {
                name,
                type_annotation: NodeIndex::NONE,
                initializer: init,
            },
        );
        let list = ctx.arena_mut().add_variable_declaration_list(
            0,
            9,
            VariableData {
                declarations: NodeList::new(vec![declaration]),
            },
            NodeFlags::CONST,
        );

        let result = visit_each_child(&mut ctx, list, &mut |ctx, child| {
            if ctx.arena().kind(child) == SyntaxKind::VariableDeclaration {
                let rebuilt = ctx.arena_mut().add_variable_declaration(
                    4,
                    9,
                    VariableDeclarationData {
                        name,
                        type_annotation: NodeIndex::NONE,
                        initializer: NodeIndex::NONE,
                    },
                );
                ctx.arena_mut().set_original(rebuilt, child);
                rebuilt
            } else {
                child
            }
        });

        assert_ne!(result, list);
        assert_eq!(ctx.arena().node_flags(result), NodeFlags::CONST);
    }

    #[test]
    fn test_leaf_nodes_pass_through() {
        let mut ctx = test_context();
        let ident = ctx.arena_mut().add_identifier(0, 1, "a");
        let mut visited = 0usize;
        let result = visit_each_child(&mut ctx, ident, &mut |_ctx, child| {
            visited += 1;
            child
        });
        assert_eq!(result, ident);
        assert_eq!(visited, 0);
    }
}
