//! Wrap-and-register module output, shared by CommonJS, AMD, UMD, and
//! module-less compilation.
//!
//! `export` modifiers cannot survive into the wrapped body, so exported
//! statements lose the modifier and instead carry `EXPORT_NAME` in the emit
//! overlay. The printer consumes the flag through identifier substitution
//! when it rewrites references to exported names.

use super::is_top_level_declaration;
use crate::chain::Transform;
use crate::context::TransformContext;
use crate::emit_flags::NodeEmitFlags;
use crate::visitor::visit_each_child;
use downlevel_ast::node::{FunctionData, VariableStatementData};
use downlevel_ast::{NodeIndex, NodeList, SyntaxKind};

pub fn factory(context: &mut TransformContext) -> Transform {
    context.enable_substitution(SyntaxKind::Identifier);
    Box::new(|context, node| {
        if context.arena().kind(node) != SyntaxKind::SourceFile {
            return node;
        }
        visit_each_child(context, node, &mut visit_statement)
    })
}

fn visit_statement(context: &mut TransformContext, statement: NodeIndex) -> NodeIndex {
    if !is_top_level_declaration(context, statement)
        || !context
            .arena()
            .has_modifier(statement, SyntaxKind::ExportKeyword)
    {
        return statement;
    }

    let stripped = strip_export_modifier(context, statement);
    context.set_node_emit_flags(
        stripped,
        NodeEmitFlags::MERGE | NodeEmitFlags::EXPORT_NAME,
    );
    stripped
}

fn without_export(context: &TransformContext, modifiers: &Option<NodeList>) -> Option<NodeList> {
    let kept: Vec<NodeIndex> = modifiers
        .as_ref()
        .map(|list| {
            list.iter()
                .filter(|&modifier| context.arena().kind(modifier) != SyntaxKind::ExportKeyword)
                .collect()
        })
        .unwrap_or_default();
    if kept.is_empty() {
        None
    } else {
        Some(NodeList::new(kept))
    }
}

fn strip_export_modifier(context: &mut TransformContext, statement: NodeIndex) -> NodeIndex {
    let (pos, end) = context
        .arena()
        .get(statement)
        .map_or((0, 0), |header| (header.pos, header.end));

    let rebuilt = match context.arena().kind(statement) {
        SyntaxKind::VariableStatement => {
            let Some(data) = context.arena().variable_statement(statement).cloned() else {
                return statement;
            };
            let modifiers = without_export(context, &data.modifiers);
            context.arena_mut().add_variable_statement(
                pos,
                end,
                VariableStatementData {
                    modifiers,
                    declaration_list: data.declaration_list,
                },
            )
        }
        SyntaxKind::FunctionDeclaration => {
            let Some(data) = context.arena().function(statement).cloned() else {
                return statement;
            };
            let modifiers = without_export(context, &data.modifiers);
            context.arena_mut().add_function(
                SyntaxKind::FunctionDeclaration,
                pos,
                end,
                FunctionData {
                    modifiers,
                    name: data.name,
                    parameters: data.parameters,
                    type_annotation: data.type_annotation,
                    body: data.body,
                },
            )
        }
        _ => return statement,
    };

    context.arena_mut().set_original(rebuilt, statement);
    rebuilt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{NullEmitResolver, StaticEmitHost};
    use downlevel_ast::node::{SourceFileData, VariableData, VariableDeclarationData};
    use downlevel_ast::{NodeArena, NodeFlags};
    use downlevel_common::CompilerOptions;
    use std::rc::Rc;

    fn test_context() -> TransformContext {
        TransformContext::new(
            NodeArena::new(),
            Rc::new(StaticEmitHost::new(CompilerOptions::default())),
            Rc::new(NullEmitResolver),
        )
    }

    fn exported_variable_file(ctx: &mut TransformContext) -> (NodeIndex, NodeIndex) {
        let export = ctx.arena_mut().add_token(SyntaxKind::ExportKeyword, 0, 6);
        let name = ctx.arena_mut().add_identifier(11, 12, "x");
        let declaration = ctx.arena_mut().add_variable_declaration(
            11,
            12,
            VariableDeclarationData {
                name,
                type_annotation: NodeIndex::NONE,
                initializer: NodeIndex::NONE,
            },
        );
        let list = ctx.arena_mut().add_variable_declaration_list(
            7,
            12,
            VariableData {
                declarations: NodeList::new(vec![declaration]),
            },
            NodeFlags::empty(),
        );
        let statement = ctx.arena_mut().add_variable_statement(
            0,
            13,
            VariableStatementData {
                modifiers: Some(NodeList::new(vec![export])),
                declaration_list: list,
            },
        );
        let eof = ctx.arena_mut().add_token(SyntaxKind::EndOfFileToken, 13, 13);
        let file = ctx.arena_mut().add_source_file(
            0,
            13,
            SourceFileData {
                file_name: "main.ts".to_string(),
                statements: NodeList::new(vec![statement]),
                end_of_file_token: eof,
                is_declaration_file: false,
            },
        );
        (file, statement)
    }

    #[test]
    fn test_export_modifier_becomes_emit_flag() {
        let mut ctx = test_context();
        let (file, statement) = exported_variable_file(&mut ctx);

        let mut transform = factory(&mut ctx);
        let transformed = transform(&mut ctx, file);
        assert_ne!(transformed, file);

        let rewritten = ctx.arena().source_file(transformed).unwrap().statements.nodes[0];
        assert_ne!(rewritten, statement);
        assert_eq!(ctx.arena().original(rewritten), statement);
        assert!(ctx.arena().modifiers(rewritten).is_none());

        let flags = ctx.node_emit_flags(rewritten).unwrap();
        assert!(flags.contains(NodeEmitFlags::EXPORT_NAME));
        assert!(!flags.contains(NodeEmitFlags::MERGE));
    }

    #[test]
    fn test_unexported_statements_keep_identity() {
        let mut ctx = test_context();
        let name = ctx.arena_mut().add_identifier(14, 15, "f");
        let declaration = ctx.arena_mut().add_function(
            SyntaxKind::FunctionDeclaration,
            0,
            20,
            FunctionData {
                modifiers: None,
                name,
                parameters: NodeList::empty(),
                type_annotation: NodeIndex::NONE,
                body: NodeIndex::NONE,
            },
        );
        let eof = ctx.arena_mut().add_token(SyntaxKind::EndOfFileToken, 20, 20);
        let file = ctx.arena_mut().add_source_file(
            0,
            20,
            SourceFileData {
                file_name: "main.ts".to_string(),
                statements: NodeList::new(vec![declaration]),
                end_of_file_token: eof,
                is_declaration_file: false,
            },
        );

        let mut transform = factory(&mut ctx);
        assert_eq!(transform(&mut ctx, file), file);
    }
}
