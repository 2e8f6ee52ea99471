//! NodeArena creation methods (add_* methods).
//!
//! All node creation goes through the arena so parent pointers stay
//! consistent. Children are always created before their parent (trees build
//! bottom-up), which makes parent wiring a plain backfill.

use crate::base::{NodeIndex, NodeList};
use crate::node::*;
use crate::syntax_kind::SyntaxKind;
use downlevel_common::limits::MAX_NODE_PREALLOC;

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    /// Create an arena with pre-allocated capacity.
    /// Ratios follow typical AST composition for the supported node set.
    pub fn with_capacity(capacity: usize) -> NodeArena {
        let safe_capacity = capacity.min(MAX_NODE_PREALLOC);
        let mut arena = NodeArena::default();
        arena.nodes = Vec::with_capacity(safe_capacity);
        arena.extended_info = Vec::with_capacity(safe_capacity);
        arena.identifiers = Vec::with_capacity(safe_capacity / 4);
        arena.literals = Vec::with_capacity(safe_capacity / 8);
        arena.binary_exprs = Vec::with_capacity(safe_capacity / 8);
        arena.call_exprs = Vec::with_capacity(safe_capacity / 8);
        arena.blocks = Vec::with_capacity(safe_capacity / 8);
        arena.variables = Vec::with_capacity(safe_capacity / 16);
        arena.functions = Vec::with_capacity(safe_capacity / 16);
        arena.source_files = Vec::with_capacity(1);
        arena
    }

    pub fn clear(&mut self) {
        macro_rules! clear_vecs {
            ($($field:ident),+ $(,)?) => {
                $(self.$field.clear();)+
            };
        }

        clear_vecs!(
            nodes,
            extended_info,
            identifiers,
            literals,
            binary_exprs,
            call_exprs,
            access_exprs,
            parenthesized,
            literal_exprs,
            property_assignments,
            functions,
            parameters,
            variable_declarations,
            variables,
            variable_statements,
            blocks,
            expr_statements,
            return_data,
            jsx_elements,
            jsx_attributes,
            type_refs,
            source_files,
        );
    }

    // ========================================================================
    // Parent mapping helpers
    // ========================================================================

    #[inline]
    fn set_parent(&mut self, child: NodeIndex, parent: NodeIndex) {
        if !child.is_none() {
            if let Some(info) = self.extended_info.get_mut(child.0 as usize) {
                info.parent = parent;
            }
        }
    }

    #[inline]
    fn set_parent_list(&mut self, list: &NodeList, parent: NodeIndex) {
        for &child in &list.nodes {
            self.set_parent(child, parent);
        }
    }

    #[inline]
    fn set_parent_opt_list(&mut self, list: &Option<NodeList>, parent: NodeIndex) {
        if let Some(l) = list {
            self.set_parent_list(l, parent);
        }
    }

    #[inline]
    fn push_node(&mut self, node: Node) -> NodeIndex {
        let index = self.nodes.len() as u32;
        self.nodes.push(node);
        self.extended_info.push(ExtendedNodeInfo::default());
        NodeIndex(index)
    }

    // ========================================================================
    // Node creation methods
    // ========================================================================

    /// Add a token node (no payload).
    pub fn add_token(&mut self, kind: SyntaxKind, pos: u32, end: u32) -> NodeIndex {
        self.push_node(Node::new(kind as u16, pos, end))
    }

    pub fn add_identifier(&mut self, pos: u32, end: u32, text: &str) -> NodeIndex {
        let data_index = self.identifiers.len() as u32;
        self.identifiers.push(IdentifierData {
            escaped_text: text.to_string(),
        });
        self.push_node(Node::with_data(
            SyntaxKind::Identifier as u16,
            pos,
            end,
            data_index,
        ))
    }

    pub fn add_literal(&mut self, kind: SyntaxKind, pos: u32, end: u32, text: &str) -> NodeIndex {
        let data_index = self.literals.len() as u32;
        self.literals.push(LiteralData {
            text: text.to_string(),
        });
        self.push_node(Node::with_data(kind as u16, pos, end, data_index))
    }

    pub fn add_binary_expr(&mut self, pos: u32, end: u32, data: BinaryExprData) -> NodeIndex {
        let left = data.left;
        let right = data.right;

        let data_index = self.binary_exprs.len() as u32;
        self.binary_exprs.push(data);
        let parent = self.push_node(Node::with_data(
            SyntaxKind::BinaryExpression as u16,
            pos,
            end,
            data_index,
        ));
        self.set_parent(left, parent);
        self.set_parent(right, parent);
        parent
    }

    pub fn add_call_expr(&mut self, pos: u32, end: u32, data: CallExprData) -> NodeIndex {
        let expression = data.expression;
        let arguments = data.arguments.clone();

        let data_index = self.call_exprs.len() as u32;
        self.call_exprs.push(data);
        let parent = self.push_node(Node::with_data(
            SyntaxKind::CallExpression as u16,
            pos,
            end,
            data_index,
        ));
        self.set_parent(expression, parent);
        self.set_parent_list(&arguments, parent);
        parent
    }

    pub fn add_access_expr(&mut self, pos: u32, end: u32, data: AccessExprData) -> NodeIndex {
        let expression = data.expression;
        let name = data.name;

        let data_index = self.access_exprs.len() as u32;
        self.access_exprs.push(data);
        let parent = self.push_node(Node::with_data(
            SyntaxKind::PropertyAccessExpression as u16,
            pos,
            end,
            data_index,
        ));
        self.set_parent(expression, parent);
        self.set_parent(name, parent);
        parent
    }

    pub fn add_parenthesized(&mut self, pos: u32, end: u32, data: ParenthesizedData) -> NodeIndex {
        let expression = data.expression;
        let data_index = self.parenthesized.len() as u32;
        self.parenthesized.push(data);
        let parent = self.push_node(Node::with_data(
            SyntaxKind::ParenthesizedExpression as u16,
            pos,
            end,
            data_index,
        ));
        self.set_parent(expression, parent);
        parent
    }

    /// Add an object literal expression.
    pub fn add_literal_expr(&mut self, pos: u32, end: u32, data: LiteralExprData) -> NodeIndex {
        let elements = data.elements.clone();
        let data_index = self.literal_exprs.len() as u32;
        self.literal_exprs.push(data);
        let parent = self.push_node(Node::with_data(
            SyntaxKind::ObjectLiteralExpression as u16,
            pos,
            end,
            data_index,
        ));
        self.set_parent_list(&elements, parent);
        parent
    }

    pub fn add_property_assignment(
        &mut self,
        pos: u32,
        end: u32,
        data: PropertyAssignmentData,
    ) -> NodeIndex {
        let name = data.name;
        let initializer = data.initializer;
        let data_index = self.property_assignments.len() as u32;
        self.property_assignments.push(data);
        let parent = self.push_node(Node::with_data(
            SyntaxKind::PropertyAssignment as u16,
            pos,
            end,
            data_index,
        ));
        self.set_parent(name, parent);
        self.set_parent(initializer, parent);
        parent
    }

    /// Add a function node (declaration, expression, or arrow).
    pub fn add_function(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        end: u32,
        data: FunctionData,
    ) -> NodeIndex {
        let modifiers = data.modifiers.clone();
        let name = data.name;
        let parameters = data.parameters.clone();
        let type_annotation = data.type_annotation;
        let body = data.body;

        let data_index = self.functions.len() as u32;
        self.functions.push(data);
        let parent = self.push_node(Node::with_data(kind as u16, pos, end, data_index));
        self.set_parent_opt_list(&modifiers, parent);
        self.set_parent(name, parent);
        self.set_parent_list(&parameters, parent);
        self.set_parent(type_annotation, parent);
        self.set_parent(body, parent);
        parent
    }

    pub fn add_parameter(&mut self, pos: u32, end: u32, data: ParameterData) -> NodeIndex {
        let name = data.name;
        let type_annotation = data.type_annotation;
        let initializer = data.initializer;

        let data_index = self.parameters.len() as u32;
        self.parameters.push(data);
        let parent = self.push_node(Node::with_data(
            SyntaxKind::Parameter as u16,
            pos,
            end,
            data_index,
        ));
        self.set_parent(name, parent);
        self.set_parent(type_annotation, parent);
        self.set_parent(initializer, parent);
        parent
    }

    pub fn add_variable_declaration(
        &mut self,
        pos: u32,
        end: u32,
        data: VariableDeclarationData,
    ) -> NodeIndex {
        let name = data.name;
        let type_annotation = data.type_annotation;
        let initializer = data.initializer;

        let data_index = self.variable_declarations.len() as u32;
        self.variable_declarations.push(data);
        let parent = self.push_node(Node::with_data(
            SyntaxKind::VariableDeclaration as u16,
            pos,
            end,
            data_index,
        ));
        self.set_parent(name, parent);
        self.set_parent(type_annotation, parent);
        self.set_parent(initializer, parent);
        parent
    }

    pub fn add_variable_declaration_list(
        &mut self,
        pos: u32,
        end: u32,
        data: VariableData,
        flags: NodeFlags,
    ) -> NodeIndex {
        let declarations = data.declarations.clone();

        let data_index = self.variables.len() as u32;
        self.variables.push(data);
        let parent = self.push_node(Node::with_data_and_flags(
            SyntaxKind::VariableDeclarationList as u16,
            pos,
            end,
            data_index,
            flags.bits(),
        ));
        self.set_parent_list(&declarations, parent);
        parent
    }

    pub fn add_variable_statement(
        &mut self,
        pos: u32,
        end: u32,
        data: VariableStatementData,
    ) -> NodeIndex {
        let modifiers = data.modifiers.clone();
        let declaration_list = data.declaration_list;

        let data_index = self.variable_statements.len() as u32;
        self.variable_statements.push(data);
        let parent = self.push_node(Node::with_data(
            SyntaxKind::VariableStatement as u16,
            pos,
            end,
            data_index,
        ));
        self.set_parent_opt_list(&modifiers, parent);
        self.set_parent(declaration_list, parent);
        parent
    }

    pub fn add_block(&mut self, pos: u32, end: u32, data: BlockData) -> NodeIndex {
        let statements = data.statements.clone();
        let data_index = self.blocks.len() as u32;
        self.blocks.push(data);
        let parent = self.push_node(Node::with_data(
            SyntaxKind::Block as u16,
            pos,
            end,
            data_index,
        ));
        self.set_parent_list(&statements, parent);
        parent
    }

    pub fn add_expr_statement(&mut self, pos: u32, end: u32, data: ExprStatementData) -> NodeIndex {
        let expression = data.expression;
        let data_index = self.expr_statements.len() as u32;
        self.expr_statements.push(data);
        let parent = self.push_node(Node::with_data(
            SyntaxKind::ExpressionStatement as u16,
            pos,
            end,
            data_index,
        ));
        self.set_parent(expression, parent);
        parent
    }

    pub fn add_return(&mut self, pos: u32, end: u32, data: ReturnData) -> NodeIndex {
        let expression = data.expression;
        let data_index = self.return_data.len() as u32;
        self.return_data.push(data);
        let parent = self.push_node(Node::with_data(
            SyntaxKind::ReturnStatement as u16,
            pos,
            end,
            data_index,
        ));
        self.set_parent(expression, parent);
        parent
    }

    pub fn add_jsx_element(&mut self, pos: u32, end: u32, data: JsxElementData) -> NodeIndex {
        let tag_name = data.tag_name;
        let attributes = data.attributes.clone();
        let children = data.children.clone();

        let data_index = self.jsx_elements.len() as u32;
        self.jsx_elements.push(data);
        let parent = self.push_node(Node::with_data(
            SyntaxKind::JsxElement as u16,
            pos,
            end,
            data_index,
        ));
        self.set_parent(tag_name, parent);
        self.set_parent_list(&attributes, parent);
        self.set_parent_list(&children, parent);
        parent
    }

    pub fn add_jsx_attribute(&mut self, pos: u32, end: u32, data: JsxAttributeData) -> NodeIndex {
        let name = data.name;
        let initializer = data.initializer;
        let data_index = self.jsx_attributes.len() as u32;
        self.jsx_attributes.push(data);
        let parent = self.push_node(Node::with_data(
            SyntaxKind::JsxAttribute as u16,
            pos,
            end,
            data_index,
        ));
        self.set_parent(name, parent);
        self.set_parent(initializer, parent);
        parent
    }

    pub fn add_type_ref(&mut self, pos: u32, end: u32, data: TypeRefData) -> NodeIndex {
        let type_name = data.type_name;
        let type_arguments = data.type_arguments.clone();
        let data_index = self.type_refs.len() as u32;
        self.type_refs.push(data);
        let parent = self.push_node(Node::with_data(
            SyntaxKind::TypeReference as u16,
            pos,
            end,
            data_index,
        ));
        self.set_parent(type_name, parent);
        self.set_parent_opt_list(&type_arguments, parent);
        parent
    }

    pub fn add_source_file(&mut self, pos: u32, end: u32, data: SourceFileData) -> NodeIndex {
        let statements = data.statements.clone();
        let end_of_file_token = data.end_of_file_token;

        let data_index = self.source_files.len() as u32;
        self.source_files.push(data);
        let parent = self.push_node(Node::with_data(
            SyntaxKind::SourceFile as u16,
            pos,
            end,
            data_index,
        ));
        self.set_parent_list(&statements, parent);
        self.set_parent(end_of_file_token, parent);
        parent
    }

    // ========================================================================
    // Synthesized-node helpers
    // ========================================================================

    /// Create an identifier with no source position, for nodes a pass
    /// invents out of thin air (helper names, `Math`, `React`, ...).
    pub fn add_synthetic_identifier(&mut self, text: &str) -> NodeIndex {
        self.add_identifier(0, 0, text)
    }

    /// Create a `receiver.member` access with no source position.
    pub fn add_synthetic_access(&mut self, receiver: &str, member: &str) -> NodeIndex {
        let expression = self.add_synthetic_identifier(receiver);
        let name = self.add_synthetic_identifier(member);
        self.add_access_expr(0, 0, AccessExprData { expression, name })
    }
}
