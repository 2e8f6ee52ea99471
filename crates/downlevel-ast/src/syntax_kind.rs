//! Syntax kinds for tokens and tree nodes.
//!
//! The transform engine indexes its per-kind feature table by these values,
//! so the enum carries a `Count` sentinel and every kind fits in a `u16`.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum SyntaxKind {
    Unknown = 0,
    EndOfFileToken,

    // Punctuation
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    DotToken,
    CommaToken,
    SemicolonToken,
    EqualsToken,
    PlusToken,
    MinusToken,
    AsteriskToken,
    AsteriskAsteriskToken,
    EqualsGreaterThanToken,

    // Keywords
    VarKeyword,
    LetKeyword,
    ConstKeyword,
    ExportKeyword,
    DefaultKeyword,
    DeclareKeyword,
    FunctionKeyword,
    ThisKeyword,
    NullKeyword,
    ReturnKeyword,

    // Names and literals
    Identifier,
    NumericLiteral,
    StringLiteral,

    // Type nodes (erased before emission)
    TypeReference,
    AnyKeyword,
    NumberKeyword,
    StringKeyword,
    BooleanKeyword,
    VoidKeyword,

    // Expressions
    PropertyAccessExpression,
    CallExpression,
    ParenthesizedExpression,
    ObjectLiteralExpression,
    PropertyAssignment,
    BinaryExpression,
    ArrowFunction,
    FunctionExpression,
    JsxElement,
    JsxAttribute,

    // Declarations and statements
    Parameter,
    VariableDeclaration,
    VariableDeclarationList,
    VariableStatement,
    FunctionDeclaration,
    Block,
    ExpressionStatement,
    ReturnStatement,
    SourceFile,

    /// Sentinel: number of syntax kinds. Not a real kind.
    Count,
}

impl SyntaxKind {
    pub const COUNT: usize = SyntaxKind::Count as usize;

    /// Every kind in discriminant order: `BY_VALUE[k as u16] == k`. Must
    /// stay in sync with the enum declaration above.
    const BY_VALUE: [SyntaxKind; SyntaxKind::COUNT] = [
        SyntaxKind::Unknown,
        SyntaxKind::EndOfFileToken,
        SyntaxKind::OpenBraceToken,
        SyntaxKind::CloseBraceToken,
        SyntaxKind::OpenParenToken,
        SyntaxKind::CloseParenToken,
        SyntaxKind::DotToken,
        SyntaxKind::CommaToken,
        SyntaxKind::SemicolonToken,
        SyntaxKind::EqualsToken,
        SyntaxKind::PlusToken,
        SyntaxKind::MinusToken,
        SyntaxKind::AsteriskToken,
        SyntaxKind::AsteriskAsteriskToken,
        SyntaxKind::EqualsGreaterThanToken,
        SyntaxKind::VarKeyword,
        SyntaxKind::LetKeyword,
        SyntaxKind::ConstKeyword,
        SyntaxKind::ExportKeyword,
        SyntaxKind::DefaultKeyword,
        SyntaxKind::DeclareKeyword,
        SyntaxKind::FunctionKeyword,
        SyntaxKind::ThisKeyword,
        SyntaxKind::NullKeyword,
        SyntaxKind::ReturnKeyword,
        SyntaxKind::Identifier,
        SyntaxKind::NumericLiteral,
        SyntaxKind::StringLiteral,
        SyntaxKind::TypeReference,
        SyntaxKind::AnyKeyword,
        SyntaxKind::NumberKeyword,
        SyntaxKind::StringKeyword,
        SyntaxKind::BooleanKeyword,
        SyntaxKind::VoidKeyword,
        SyntaxKind::PropertyAccessExpression,
        SyntaxKind::CallExpression,
        SyntaxKind::ParenthesizedExpression,
        SyntaxKind::ObjectLiteralExpression,
        SyntaxKind::PropertyAssignment,
        SyntaxKind::BinaryExpression,
        SyntaxKind::ArrowFunction,
        SyntaxKind::FunctionExpression,
        SyntaxKind::JsxElement,
        SyntaxKind::JsxAttribute,
        SyntaxKind::Parameter,
        SyntaxKind::VariableDeclaration,
        SyntaxKind::VariableDeclarationList,
        SyntaxKind::VariableStatement,
        SyntaxKind::FunctionDeclaration,
        SyntaxKind::Block,
        SyntaxKind::ExpressionStatement,
        SyntaxKind::ReturnStatement,
        SyntaxKind::SourceFile,
    ];

    /// Reconstruct a kind from the `u16` stored in a node header.
    #[inline]
    pub fn from_u16(kind: u16) -> SyntaxKind {
        SyntaxKind::BY_VALUE
            .get(kind as usize)
            .copied()
            .unwrap_or(SyntaxKind::Unknown)
    }

    /// Whether this kind is a bare token with no payload pool.
    pub fn is_token(self) -> bool {
        (self as u16) <= SyntaxKind::ReturnKeyword as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_u16_round_trips() {
        assert_eq!(
            SyntaxKind::from_u16(SyntaxKind::SourceFile as u16),
            SyntaxKind::SourceFile
        );
        assert_eq!(
            SyntaxKind::from_u16(SyntaxKind::Identifier as u16),
            SyntaxKind::Identifier
        );
    }

    #[test]
    fn test_from_u16_round_trips_every_kind() {
        // Catches the lookup table drifting out of sync with the enum.
        for value in 0..SyntaxKind::COUNT as u16 {
            assert_eq!(SyntaxKind::from_u16(value) as u16, value);
        }
    }

    #[test]
    fn test_from_u16_out_of_range_is_unknown() {
        assert_eq!(SyntaxKind::from_u16(u16::MAX), SyntaxKind::Unknown);
        assert_eq!(
            SyntaxKind::from_u16(SyntaxKind::Count as u16),
            SyntaxKind::Unknown
        );
    }

    #[test]
    fn test_token_classification() {
        assert!(SyntaxKind::AsteriskAsteriskToken.is_token());
        assert!(SyntaxKind::ConstKeyword.is_token());
        assert!(!SyntaxKind::CallExpression.is_token());
        assert!(!SyntaxKind::SourceFile.is_token());
    }
}
