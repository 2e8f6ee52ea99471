//! System-format module output.
//!
//! The loader registers the module body as a closure, so every top-level
//! function declaration is hoisted ahead of the executable statements. The
//! file body runs inside its own lexical environment and the hoisted
//! declarations re-emit at the top.

use super::prepend_statements;
use crate::chain::Transform;
use crate::context::TransformContext;
use crate::visitor::visit_each_child;
use downlevel_ast::{NodeIndex, SyntaxKind};

pub fn factory(context: &mut TransformContext) -> Transform {
    // The printer rewrites exported identifier references and brackets the
    // file body with the loader registration.
    context.enable_substitution(SyntaxKind::Identifier);
    context.enable_emit_notification(SyntaxKind::SourceFile);
    Box::new(|context, node| transform_source_file(context, node))
}

fn transform_source_file(context: &mut TransformContext, file: NodeIndex) -> NodeIndex {
    if context.arena().kind(file) != SyntaxKind::SourceFile {
        return file;
    }

    context.start_lexical_environment();
    let visited = visit_each_child(context, file, &mut |context, statement| {
        if context.arena().kind(statement) == SyntaxKind::FunctionDeclaration {
            context.hoist_function_declaration(statement);
            return NodeIndex::NONE;
        }
        statement
    });
    let hoisted = context.end_lexical_environment();
    prepend_statements(context, visited, hoisted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{NullEmitResolver, StaticEmitHost};
    use downlevel_ast::node::{ExprStatementData, FunctionData, SourceFileData};
    use downlevel_ast::{NodeArena, NodeList};
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
    fn test_function_declarations_move_to_top() {
        let mut ctx = test_context();
        let call_target = ctx.arena_mut().add_identifier(0, 1, "f");
        let call = ctx.arena_mut().add_call_expr(
            0,
            3,
            downlevel_ast::node::CallExprData {
                expression: call_target,
                arguments: NodeList::empty(),
            },
        );
        let statement = ctx
            .arena_mut()
            .add_expr_statement(0, 4, ExprStatementData { expression: call });
        let f_name = ctx.arena_mut().add_identifier(14, 15, "f");
        let declaration = ctx.arena_mut().add_function(
            SyntaxKind::FunctionDeclaration,
            5,
            20,
            FunctionData {
                modifiers: None,
                name: f_name,
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
                statements: NodeList::new(vec![statement, declaration]),
                end_of_file_token: eof,
                is_declaration_file: false,
            },
        );

        let mut transform = factory(&mut ctx);
        let transformed = transform(&mut ctx, file);

        assert_ne!(transformed, file);
        let statements = &ctx.arena().source_file(transformed).unwrap().statements;
        assert_eq!(statements.nodes, vec![declaration, statement]);
    }

    #[test]
    fn test_registers_printer_interest() {
        let mut ctx = test_context();
        let ident = ctx.arena_mut().add_identifier(0, 1, "a");
        let _ = factory(&mut ctx);
        assert!(ctx.is_substitution_enabled(ident));
    }
}
