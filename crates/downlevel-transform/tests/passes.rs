//! Cross-pass behavior through full configured pipelines: type erasure
//! feeding later passes, JSX lowering under React mode, and arrow
//! downleveling under a pre-ES2015 target.

use downlevel_ast::node::{
    ExprStatementData, FunctionData, JsxElementData, ParameterData, SourceFileData, TypeRefData,
    VariableData, VariableDeclarationData, VariableStatementData,
};
use downlevel_ast::{NodeArena, NodeFlags, NodeIndex, NodeList, SyntaxKind};
use downlevel_common::{CompilerOptions, JsxEmit, ModuleKind, ScriptTarget};
use downlevel_transform::{transform_files, transformers, NullEmitResolver, StaticEmitHost};
use std::rc::Rc;

fn add_file(arena: &mut NodeArena, statements: Vec<NodeIndex>) -> NodeIndex {
    let eof = arena.add_token(SyntaxKind::EndOfFileToken, 0, 0);
    arena.add_source_file(
        0,
        0,
        SourceFileData {
            file_name: "main.tsx".to_string(),
            statements: NodeList::new(statements),
            end_of_file_token: eof,
            is_declaration_file: false,
        },
    )
}

fn run(
    options: CompilerOptions,
    arena: NodeArena,
    file: NodeIndex,
) -> (NodeIndex, downlevel_transform::TransformResult) {
    let pipeline = transformers(&options);
    let result = transform_files(
        Rc::new(NullEmitResolver),
        Rc::new(StaticEmitHost::new(options)),
        arena,
        &[file],
        pipeline,
    );
    (result.transformed[0], result)
}

#[test]
fn test_jsx_lowers_under_react_mode_only() {
    let build = |arena: &mut NodeArena| {
        let tag = arena.add_identifier(1, 4, "div");
        let element = arena.add_jsx_element(
            0,
            11,
            JsxElementData {
                tag_name: tag,
                attributes: NodeList::empty(),
                children: NodeList::empty(),
            },
        );
        let statement = arena.add_expr_statement(0, 12, ExprStatementData { expression: element });
        add_file(arena, vec![statement])
    };

    // React mode: the element becomes a call.
    let mut arena = NodeArena::new();
    let file = build(&mut arena);
    let options = CompilerOptions {
        target: ScriptTarget::ES2015,
        module: ModuleKind::ES2015,
        jsx: JsxEmit::React,
        ..CompilerOptions::default()
    };
    let (transformed, result) = run(options, arena, file);
    assert_ne!(transformed, file);
    let statements = &result.context.arena().source_file(transformed).unwrap().statements;
    let expression = result
        .context
        .arena()
        .expr_statement(statements.nodes[0])
        .unwrap()
        .expression;
    assert_eq!(
        result.context.arena().kind(expression),
        SyntaxKind::CallExpression
    );

    // Preserve mode: no JSX pass in the pipeline, file unchanged.
    let mut arena = NodeArena::new();
    let file = build(&mut arena);
    let options = CompilerOptions {
        target: ScriptTarget::ES2015,
        module: ModuleKind::ES2015,
        jsx: JsxEmit::Preserve,
        ..CompilerOptions::default()
    };
    let (transformed, _result) = run(options, arena, file);
    assert_eq!(transformed, file);
}

#[test]
fn test_annotated_arrow_downlevels_to_clean_function_expression() {
    // let f = (x: Widget) => x;
    let mut arena = NodeArena::new();
    let parameter_name = arena.add_identifier(9, 10, "x");
    let type_name = arena.add_identifier(12, 18, "Widget");
    let annotation = arena.add_type_ref(
        12,
        18,
        TypeRefData {
            type_name,
            type_arguments: None,
        },
    );
    let parameter = arena.add_parameter(
        9,
        18,
        ParameterData {
            name: parameter_name,
            type_annotation: annotation,
            initializer: NodeIndex::NONE,
        },
    );
    let body = arena.add_identifier(24, 25, "x");
    let arrow = arena.add_function(
        SyntaxKind::ArrowFunction,
        8,
        25,
        FunctionData {
            modifiers: None,
            name: NodeIndex::NONE,
            parameters: NodeList::new(vec![parameter]),
            type_annotation: NodeIndex::NONE,
            body,
        },
    );
    let f = arena.add_identifier(4, 5, "f");
    let declaration = arena.add_variable_declaration(
        4,
        25,
        VariableDeclarationData {
            name: f,
            type_annotation: NodeIndex::NONE,
            initializer: arrow,
        },
    );
    let list = arena.add_variable_declaration_list(
        0,
        25,
        VariableData {
            declarations: NodeList::new(vec![declaration]),
        },
        NodeFlags::LET,
    );
    let statement = arena.add_variable_statement(
        0,
        26,
        VariableStatementData {
            modifiers: None,
            declaration_list: list,
        },
    );
    let file = add_file(&mut arena, vec![statement]);

    let options = CompilerOptions {
        target: ScriptTarget::ES5,
        module: ModuleKind::CommonJS,
        jsx: JsxEmit::None,
        ..CompilerOptions::default()
    };
    let (transformed, result) = run(options, arena, file);
    let arena = result.context.arena();

    let statements = &arena.source_file(transformed).unwrap().statements;
    let rewritten_list = arena
        .variable_statement(statements.nodes[0])
        .unwrap()
        .declaration_list;

    // let lowered to var.
    assert_eq!(arena.node_flags(rewritten_list), NodeFlags::empty());

    let rewritten_declaration = arena
        .variable_declaration_list(rewritten_list)
        .unwrap()
        .declarations
        .nodes[0];
    let initializer = arena
        .variable_declaration(rewritten_declaration)
        .unwrap()
        .initializer;

    // Arrow lowered to a function expression with a block body.
    assert_eq!(arena.kind(initializer), SyntaxKind::FunctionExpression);
    let function = arena.function(initializer).unwrap();
    assert_eq!(arena.kind(function.body), SyntaxKind::Block);

    // The parameter annotation was erased before downleveling.
    let rewritten_parameter = function.parameters.nodes[0];
    assert!(arena
        .parameter(rewritten_parameter)
        .unwrap()
        .type_annotation
        .is_none());
}

#[test]
fn test_ambient_statement_elided() {
    // declare var x; f();
    let mut arena = NodeArena::new();
    let declare = arena.add_token(SyntaxKind::DeclareKeyword, 0, 7);
    let x = arena.add_identifier(12, 13, "x");
    let declaration = arena.add_variable_declaration(
        12,
        13,
        VariableDeclarationData {
            name: x,
            type_annotation: NodeIndex::NONE,
            initializer: NodeIndex::NONE,
        },
    );
    let list = arena.add_variable_declaration_list(
        8,
        13,
        VariableData {
            declarations: NodeList::new(vec![declaration]),
        },
        NodeFlags::empty(),
    );
    let ambient = arena.add_variable_statement(
        0,
        14,
        VariableStatementData {
            modifiers: Some(NodeList::new(vec![declare])),
            declaration_list: list,
        },
    );
    let callee = arena.add_identifier(15, 16, "f");
    let call = arena.add_call_expr(
        15,
        18,
        downlevel_ast::node::CallExprData {
            expression: callee,
            arguments: NodeList::empty(),
        },
    );
    let executable = arena.add_expr_statement(15, 19, ExprStatementData { expression: call });
    let file = add_file(&mut arena, vec![ambient, executable]);

    let options = CompilerOptions {
        target: ScriptTarget::ES2015,
        module: ModuleKind::ES2015,
        jsx: JsxEmit::None,
        ..CompilerOptions::default()
    };
    let (transformed, result) = run(options, arena, file);

    let statements = &result.context.arena().source_file(transformed).unwrap().statements;
    assert_eq!(statements.nodes, vec![executable]);
}
