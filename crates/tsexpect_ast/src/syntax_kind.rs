//! SyntaxKind enum - the node kinds a checker reports for a test file.
//!
//! Only node kinds are represented; tokens and trivia never reach the matcher.
//! Kinds a checker reports that have no variant here map to `Unknown`.

use serde::{Deserialize, Serialize};

/// The kind of a node in a [`crate::SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SyntaxKind {
    // ========================================================================
    // Names and literals
    // ========================================================================
    Identifier,
    PrivateIdentifier,
    QualifiedName,
    ComputedPropertyName,
    NumericLiteral,
    BigIntLiteral,
    StringLiteral,
    RegularExpressionLiteral,
    NoSubstitutionTemplateLiteral,
    TrueKeyword,
    FalseKeyword,
    NullKeyword,
    ThisKeyword,
    SuperKeyword,

    // ========================================================================
    // Expressions
    // ========================================================================
    ArrayLiteralExpression,
    ObjectLiteralExpression,
    PropertyAccessExpression,
    ElementAccessExpression,
    CallExpression,
    NewExpression,
    TaggedTemplateExpression,
    TypeAssertionExpression,
    ParenthesizedExpression,
    FunctionExpression,
    ArrowFunction,
    DeleteExpression,
    TypeOfExpression,
    VoidExpression,
    AwaitExpression,
    PrefixUnaryExpression,
    PostfixUnaryExpression,
    BinaryExpression,
    ConditionalExpression,
    TemplateExpression,
    YieldExpression,
    SpreadElement,
    ClassExpression,
    AsExpression,
    NonNullExpression,
    SatisfiesExpression,

    // ========================================================================
    // Statements
    // ========================================================================
    Block,
    EmptyStatement,
    VariableStatement,
    ExpressionStatement,
    IfStatement,
    DoStatement,
    WhileStatement,
    ForStatement,
    ForInStatement,
    ForOfStatement,
    ContinueStatement,
    BreakStatement,
    ReturnStatement,
    WithStatement,
    SwitchStatement,
    LabeledStatement,
    ThrowStatement,
    TryStatement,
    DebuggerStatement,

    // ========================================================================
    // Declarations
    // ========================================================================
    VariableDeclaration,
    VariableDeclarationList,
    FunctionDeclaration,
    ClassDeclaration,
    InterfaceDeclaration,
    TypeAliasDeclaration,
    EnumDeclaration,
    ModuleDeclaration,
    ModuleBlock,
    ImportEqualsDeclaration,
    ImportDeclaration,
    ExportAssignment,
    ExportDeclaration,
    Parameter,
    TypeParameter,
    PropertyDeclaration,
    PropertySignature,
    MethodDeclaration,
    MethodSignature,
    PropertyAssignment,
    ShorthandPropertyAssignment,

    // ========================================================================
    // Type nodes
    // ========================================================================
    TypeReference,
    FunctionType,
    TypeLiteral,
    ArrayType,
    TupleType,
    UnionType,
    IntersectionType,
    LiteralType,
    TypeQuery,
    KeywordType,

    // ========================================================================
    // Top level
    // ========================================================================
    SourceFile,

    #[serde(other)]
    Unknown,
}

impl SyntaxKind {
    /// Whether this kind is an expression (including names and literals).
    pub fn is_expression(self) -> bool {
        use SyntaxKind::*;
        matches!(
            self,
            Identifier
                | PrivateIdentifier
                | NumericLiteral
                | BigIntLiteral
                | StringLiteral
                | RegularExpressionLiteral
                | NoSubstitutionTemplateLiteral
                | TrueKeyword
                | FalseKeyword
                | NullKeyword
                | ThisKeyword
                | SuperKeyword
                | ArrayLiteralExpression
                | ObjectLiteralExpression
                | PropertyAccessExpression
                | ElementAccessExpression
                | CallExpression
                | NewExpression
                | TaggedTemplateExpression
                | TypeAssertionExpression
                | ParenthesizedExpression
                | FunctionExpression
                | ArrowFunction
                | DeleteExpression
                | TypeOfExpression
                | VoidExpression
                | AwaitExpression
                | PrefixUnaryExpression
                | PostfixUnaryExpression
                | BinaryExpression
                | ConditionalExpression
                | TemplateExpression
                | YieldExpression
                | SpreadElement
                | ClassExpression
                | AsExpression
                | NonNullExpression
                | SatisfiesExpression
        )
    }

    /// Whether this kind is a statement.
    pub fn is_statement(self) -> bool {
        use SyntaxKind::*;
        matches!(
            self,
            Block
                | EmptyStatement
                | VariableStatement
                | ExpressionStatement
                | IfStatement
                | DoStatement
                | WhileStatement
                | ForStatement
                | ForInStatement
                | ForOfStatement
                | ContinueStatement
                | BreakStatement
                | ReturnStatement
                | WithStatement
                | SwitchStatement
                | LabeledStatement
                | ThrowStatement
                | TryStatement
                | DebuggerStatement
        )
    }

    /// Whether this kind is a type node.
    pub fn is_type_node(self) -> bool {
        use SyntaxKind::*;
        matches!(
            self,
            TypeReference
                | FunctionType
                | TypeLiteral
                | ArrayType
                | TupleType
                | UnionType
                | IntersectionType
                | LiteralType
                | TypeQuery
                | KeywordType
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        assert!(SyntaxKind::CallExpression.is_expression());
        assert!(!SyntaxKind::ExpressionStatement.is_expression());
        assert!(SyntaxKind::ExpressionStatement.is_statement());
        assert!(SyntaxKind::UnionType.is_type_node());
        assert!(!SyntaxKind::SourceFile.is_statement());
    }

    #[test]
    fn test_unrecognized_kind_deserializes_as_unknown() {
        let kind: SyntaxKind = serde_json::from_str("\"JsxElement\"").unwrap();
        assert_eq!(kind, SyntaxKind::Unknown);
        let kind: SyntaxKind = serde_json::from_str("\"CallExpression\"").unwrap();
        assert_eq!(kind, SyntaxKind::CallExpression);
    }
}
