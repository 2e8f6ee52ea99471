//! Thin node header and typed storage pools.
//!
//! Each node is a 16-byte header (4 nodes per 64-byte cache line): kind,
//! packed flags, source positions, and an index into a kind-specific payload
//! pool. Per-node bookkeeping that is rarely touched during traversal
//! (parent pointer, `original` back-link) lives in a parallel
//! `ExtendedNodeInfo` vector instead of inflating the header.

use crate::base::{NodeIndex, NodeList};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// A thin 16-byte node header.
///
/// Layout:
/// - `kind`: 2 bytes (`SyntaxKind` value)
/// - `flags`: 2 bytes (packed `NodeFlags`)
/// - `pos`/`end`: 4 bytes each (character offsets; 0..0 for synthesized nodes)
/// - `data_index`: 4 bytes (index into the kind's pool, `u32::MAX` = no data)
#[repr(C)]
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Node {
    pub kind: u16,
    pub flags: u16,
    pub pos: u32,
    pub end: u32,
    pub data_index: u32,
}

impl Node {
    pub const NO_DATA: u32 = u32::MAX;

    #[inline]
    pub fn new(kind: u16, pos: u32, end: u32) -> Node {
        Node {
            kind,
            flags: 0,
            pos,
            end,
            data_index: Self::NO_DATA,
        }
    }

    #[inline]
    pub fn with_data(kind: u16, pos: u32, end: u32, data_index: u32) -> Node {
        Node {
            kind,
            flags: 0,
            pos,
            end,
            data_index,
        }
    }

    #[inline]
    pub fn with_data_and_flags(kind: u16, pos: u32, end: u32, data_index: u32, flags: u16) -> Node {
        Node {
            kind,
            flags,
            pos,
            end,
            data_index,
        }
    }

    #[inline]
    pub fn has_data(&self) -> bool {
        self.data_index != Self::NO_DATA
    }
}

bitflags! {
    /// Packed per-node flags stored in the thin header.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct NodeFlags: u16 {
        /// `let` declaration list.
        const LET = 1 << 0;
        /// `const` declaration list.
        const CONST = 1 << 1;
    }
}

impl NodeFlags {
    pub const BLOCK_SCOPED: NodeFlags = NodeFlags::LET.union(NodeFlags::CONST);
}

/// Rarely-accessed per-node bookkeeping kept out of the hot header.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct ExtendedNodeInfo {
    /// Enclosing node, set when the parent is created (trees build bottom-up).
    pub parent: NodeIndex,
    /// The node this one replaces, set when a pass synthesizes a
    /// replacement. Walked by the emit-metadata overlay.
    pub original: NodeIndex,
}

// ============================================================================
// Payload pools
// ============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IdentifierData {
    pub escaped_text: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LiteralData {
    pub text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BinaryExprData {
    pub left: NodeIndex,
    /// Operator token kind (`SyntaxKind` as u16).
    pub operator: u16,
    pub right: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CallExprData {
    pub expression: NodeIndex,
    pub arguments: NodeList,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccessExprData {
    pub expression: NodeIndex,
    pub name: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParenthesizedData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LiteralExprData {
    pub elements: NodeList,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PropertyAssignmentData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

/// Shared payload for function declarations, function expressions, and
/// arrow functions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FunctionData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub parameters: NodeList,
    pub type_annotation: NodeIndex,
    pub body: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterData {
    pub name: NodeIndex,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VariableDeclarationData {
    pub name: NodeIndex,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

/// Payload for a `VariableDeclarationList`; `let`/`const` live in the node
/// header flags.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VariableData {
    pub declarations: NodeList,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VariableStatementData {
    pub modifiers: Option<NodeList>,
    pub declaration_list: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockData {
    pub statements: NodeList,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExprStatementData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReturnData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JsxElementData {
    pub tag_name: NodeIndex,
    pub attributes: NodeList,
    pub children: NodeList,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JsxAttributeData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeRefData {
    pub type_name: NodeIndex,
    pub type_arguments: Option<NodeList>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceFileData {
    pub file_name: String,
    pub statements: NodeList,
    pub end_of_file_token: NodeIndex,
    /// Declaration files carry no runtime semantics and bypass transformation.
    pub is_declaration_file: bool,
}

// ============================================================================
// Arena
// ============================================================================

/// Arena holding every node header plus the typed payload pools.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NodeArena {
    pub(crate) nodes: Vec<Node>,
    pub(crate) extended_info: Vec<ExtendedNodeInfo>,
    pub(crate) identifiers: Vec<IdentifierData>,
    pub(crate) literals: Vec<LiteralData>,
    pub(crate) binary_exprs: Vec<BinaryExprData>,
    pub(crate) call_exprs: Vec<CallExprData>,
    pub(crate) access_exprs: Vec<AccessExprData>,
    pub(crate) parenthesized: Vec<ParenthesizedData>,
    pub(crate) literal_exprs: Vec<LiteralExprData>,
    pub(crate) property_assignments: Vec<PropertyAssignmentData>,
    pub(crate) functions: Vec<FunctionData>,
    pub(crate) parameters: Vec<ParameterData>,
    pub(crate) variable_declarations: Vec<VariableDeclarationData>,
    pub(crate) variables: Vec<VariableData>,
    pub(crate) variable_statements: Vec<VariableStatementData>,
    pub(crate) blocks: Vec<BlockData>,
    pub(crate) expr_statements: Vec<ExprStatementData>,
    pub(crate) return_data: Vec<ReturnData>,
    pub(crate) jsx_elements: Vec<JsxElementData>,
    pub(crate) jsx_attributes: Vec<JsxAttributeData>,
    pub(crate) type_refs: Vec<TypeRefData>,
    pub(crate) source_files: Vec<SourceFileData>,
}

macro_rules! pool_accessor {
    ($name:ident, $pool:ident, $data:ty) => {
        pub fn $name(&self, index: NodeIndex) -> Option<&$data> {
            let node = self.get(index)?;
            self.$pool.get(node.data_index as usize)
        }
    };
}

impl NodeArena {
    /// Get the header for a node.
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            return None;
        }
        self.nodes.get(index.0 as usize)
    }

    /// Kind of a node, `SyntaxKind::Unknown` for an absent index.
    #[inline]
    pub fn kind(&self, index: NodeIndex) -> crate::SyntaxKind {
        self.get(index)
            .map_or(crate::SyntaxKind::Unknown, |node| {
                crate::SyntaxKind::from_u16(node.kind)
            })
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Enclosing node, `NodeIndex::NONE` at the root.
    #[inline]
    pub fn parent(&self, index: NodeIndex) -> NodeIndex {
        if index.is_none() {
            return NodeIndex::NONE;
        }
        self.extended_info
            .get(index.0 as usize)
            .map_or(NodeIndex::NONE, |info| info.parent)
    }

    /// The node this one replaces, `NodeIndex::NONE` for source-tree nodes.
    #[inline]
    pub fn original(&self, index: NodeIndex) -> NodeIndex {
        if index.is_none() {
            return NodeIndex::NONE;
        }
        self.extended_info
            .get(index.0 as usize)
            .map_or(NodeIndex::NONE, |info| info.original)
    }

    /// Link a synthesized node to the node it replaces.
    pub fn set_original(&mut self, index: NodeIndex, original: NodeIndex) {
        if let Some(info) = self.extended_info.get_mut(index.0 as usize) {
            info.original = original;
        }
    }

    pool_accessor!(identifier, identifiers, IdentifierData);
    pool_accessor!(literal, literals, LiteralData);
    pool_accessor!(binary_expr, binary_exprs, BinaryExprData);
    pool_accessor!(call_expr, call_exprs, CallExprData);
    pool_accessor!(access_expr, access_exprs, AccessExprData);
    pool_accessor!(parenthesized_expr, parenthesized, ParenthesizedData);
    pool_accessor!(literal_expr, literal_exprs, LiteralExprData);
    pool_accessor!(property_assignment, property_assignments, PropertyAssignmentData);
    pool_accessor!(function, functions, FunctionData);
    pool_accessor!(parameter, parameters, ParameterData);
    pool_accessor!(variable_declaration, variable_declarations, VariableDeclarationData);
    pool_accessor!(variable_declaration_list, variables, VariableData);
    pool_accessor!(variable_statement, variable_statements, VariableStatementData);
    pool_accessor!(block, blocks, BlockData);
    pool_accessor!(expr_statement, expr_statements, ExprStatementData);
    pool_accessor!(return_statement, return_data, ReturnData);
    pool_accessor!(jsx_element, jsx_elements, JsxElementData);
    pool_accessor!(jsx_attribute, jsx_attributes, JsxAttributeData);
    pool_accessor!(type_ref, type_refs, TypeRefData);
    pool_accessor!(source_file, source_files, SourceFileData);

    /// Resolve an identifier's text, empty for non-identifiers.
    pub fn identifier_text(&self, index: NodeIndex) -> &str {
        self.identifier(index)
            .map_or("", |data| data.escaped_text.as_str())
    }

    /// The modifier list of a declaration, if the kind carries one.
    pub fn modifiers(&self, index: NodeIndex) -> Option<&NodeList> {
        use crate::SyntaxKind;
        match self.kind(index) {
            SyntaxKind::VariableStatement => {
                self.variable_statement(index)?.modifiers.as_ref()
            }
            SyntaxKind::FunctionDeclaration
            | SyntaxKind::FunctionExpression
            | SyntaxKind::ArrowFunction => self.function(index)?.modifiers.as_ref(),
            _ => None,
        }
    }

    /// Whether a declaration carries the given modifier keyword.
    pub fn has_modifier(&self, index: NodeIndex, kind: crate::SyntaxKind) -> bool {
        self.modifiers(index)
            .is_some_and(|modifiers| modifiers.iter().any(|m| self.kind(m) == kind))
    }

    /// Node flags decoded from the thin header.
    #[inline]
    pub fn node_flags(&self, index: NodeIndex) -> NodeFlags {
        self.get(index)
            .map_or(NodeFlags::empty(), |node| {
                NodeFlags::from_bits_truncate(node.flags)
            })
    }
}
