//! JSX lowering. Rewrites `JsxElement` nodes into `React.createElement`
//! calls; selected only when the markup mode is `JsxEmit::React`.

use super::too_deep;
use crate::chain::Transform;
use crate::context::TransformContext;
use crate::visitor::visit_each_child;
use downlevel_ast::node::{CallExprData, LiteralExprData, PropertyAssignmentData};
use downlevel_ast::{NodeIndex, NodeList, SyntaxKind};

pub fn factory(_context: &mut TransformContext) -> Transform {
    Box::new(|context, node| visit(context, node, 0))
}

fn visit(context: &mut TransformContext, node: NodeIndex, depth: u32) -> NodeIndex {
    if too_deep(depth) {
        return node;
    }
    if context.arena().kind(node) == SyntaxKind::JsxElement {
        return lower_element(context, node, depth);
    }
    visit_each_child(context, node, &mut |context, child| {
        visit(context, child, depth + 1)
    })
}

fn lower_element(context: &mut TransformContext, element: NodeIndex, depth: u32) -> NodeIndex {
    let Some(data) = context.arena().jsx_element(element).cloned() else {
        return element;
    };

    let tag = lower_tag(context, data.tag_name);
    let props = lower_attributes(context, &data.attributes, depth);
    let mut arguments = vec![tag, props];
    for child in data.children.iter() {
        // Children may contain nested elements.
        arguments.push(visit(context, child, depth + 1));
    }

    let (pos, end) = context
        .arena()
        .get(element)
        .map_or((0, 0), |header| (header.pos, header.end));
    let callee = context.arena_mut().add_synthetic_access("React", "createElement");
    let call = context.arena_mut().add_call_expr(
        pos,
        end,
        CallExprData {
            expression: callee,
            arguments: NodeList::new(arguments),
        },
    );
    context.arena_mut().set_original(call, element);
    call
}

/// Intrinsic tags (lower-case) become string literals; component tags stay
/// identifier references.
fn lower_tag(context: &mut TransformContext, tag_name: NodeIndex) -> NodeIndex {
    let text = context.arena().identifier_text(tag_name).to_string();
    if text.starts_with(|c: char| c.is_ascii_lowercase()) {
        let (pos, end) = context
            .arena()
            .get(tag_name)
            .map_or((0, 0), |header| (header.pos, header.end));
        let literal = context
            .arena_mut()
            .add_literal(SyntaxKind::StringLiteral, pos, end, &text);
        context.arena_mut().set_original(literal, tag_name);
        literal
    } else {
        tag_name
    }
}

/// Attributes lower to an object literal, or a `null` token when there are
/// none.
fn lower_attributes(
    context: &mut TransformContext,
    attributes: &NodeList,
    depth: u32,
) -> NodeIndex {
    if attributes.is_empty() {
        return context.arena_mut().add_token(SyntaxKind::NullKeyword, 0, 0);
    }

    let mut properties = Vec::with_capacity(attributes.len());
    for attribute in attributes.iter() {
        let Some(data) = context.arena().jsx_attribute(attribute).cloned() else {
            continue;
        };
        let initializer = visit(context, data.initializer, depth + 1);
        let (pos, end) = context
            .arena()
            .get(attribute)
            .map_or((0, 0), |header| (header.pos, header.end));
        let property = context.arena_mut().add_property_assignment(
            pos,
            end,
            PropertyAssignmentData {
                name: data.name,
                initializer,
            },
        );
        context.arena_mut().set_original(property, attribute);
        properties.push(property);
    }

    context.arena_mut().add_literal_expr(
        0,
        0,
        LiteralExprData {
            elements: NodeList::new(properties),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{NullEmitResolver, StaticEmitHost};
    use downlevel_ast::node::JsxElementData;
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
    fn test_intrinsic_element_becomes_create_element_call() {
        let mut ctx = test_context();
        let tag = ctx.arena_mut().add_identifier(1, 4, "div");
        let element = ctx.arena_mut().add_jsx_element(
            0,
            11,
            JsxElementData {
                tag_name: tag,
                attributes: NodeList::empty(),
                children: NodeList::empty(),
            },
        );

        let mut transform = factory(&mut ctx);
        let lowered = transform(&mut ctx, element);

        assert_eq!(ctx.arena().kind(lowered), SyntaxKind::CallExpression);
        assert_eq!(ctx.arena().original(lowered), element);

        let call = ctx.arena().call_expr(lowered).unwrap().clone();
        let callee = ctx.arena().access_expr(call.expression).unwrap();
        assert_eq!(ctx.arena().identifier_text(callee.expression), "React");
        assert_eq!(ctx.arena().identifier_text(callee.name), "createElement");

        // Tag lowered to a string literal, props to null.
        assert_eq!(call.arguments.len(), 2);
        assert_eq!(
            ctx.arena().kind(call.arguments.nodes[0]),
            SyntaxKind::StringLiteral
        );
        assert_eq!(
            ctx.arena().kind(call.arguments.nodes[1]),
            SyntaxKind::NullKeyword
        );
    }

    #[test]
    fn test_component_tag_stays_identifier() {
        let mut ctx = test_context();
        let tag = ctx.arena_mut().add_identifier(1, 4, "App");
        let element = ctx.arena_mut().add_jsx_element(
            0,
            7,
            JsxElementData {
                tag_name: tag,
                attributes: NodeList::empty(),
                children: NodeList::empty(),
            },
        );

        let mut transform = factory(&mut ctx);
        let lowered = transform(&mut ctx, element);
        let call = ctx.arena().call_expr(lowered).unwrap();
        assert_eq!(call.arguments.nodes[0], tag);
    }

    #[test]
    fn test_nested_elements_lower_recursively() {
        let mut ctx = test_context();
        let inner_tag = ctx.arena_mut().add_identifier(6, 10, "span");
        let inner = ctx.arena_mut().add_jsx_element(
            5,
            18,
            JsxElementData {
                tag_name: inner_tag,
                attributes: NodeList::empty(),
                children: NodeList::empty(),
            },
        );
        let outer_tag = ctx.arena_mut().add_identifier(1, 4, "div");
        let outer = ctx.arena_mut().add_jsx_element(
            0,
            25,
            JsxElementData {
                tag_name: outer_tag,
                attributes: NodeList::empty(),
                children: NodeList::new(vec![inner]),
            },
        );

        let mut transform = factory(&mut ctx);
        let lowered = transform(&mut ctx, outer);
        let call = ctx.arena().call_expr(lowered).unwrap().clone();
        assert_eq!(call.arguments.len(), 3);
        let lowered_child = call.arguments.nodes[2];
        assert_eq!(ctx.arena().kind(lowered_child), SyntaxKind::CallExpression);
        assert_eq!(ctx.arena().original(lowered_child), inner);
    }
}
