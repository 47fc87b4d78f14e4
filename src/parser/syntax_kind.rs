//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the syntax tree.
//! It follows the Pkl grammar structure.

/// All syntax kinds (tokens and nodes) in Pkl
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (classes, properties, expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    DOC_COMMENT,
    BLOCK_COMMENT,
    SHEBANG,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,              // foo or `foo bar`
    INT_NUMBER,         // 42, 0x2A, 1_000
    FLOAT_NUMBER,       // 3.14, 1e3
    STRING_START,       // " or """
    STRING_END,         // " or """
    STRING_CHARS,       // literal run inside a string, escapes included
    INTERPOLATION_START,// \(

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,            // {
    R_BRACE,            // }
    L_BRACKET,          // [
    R_BRACKET,          // ]
    L_PAREN,            // (
    R_PAREN,            // )
    COMMA,              // ,
    DOT,                // .
    QUESTION_DOT,       // ?.
    SPREAD,             // ...
    QUESTION_SPREAD,    // ...?
    COLON,              // :
    ARROW,              // ->
    EQ,                 // =
    EQ_EQ,              // ==
    BANG_EQ,            // !=
    LT,                 // <
    GT,                 // >
    LT_EQ,              // <=
    GT_EQ,              // >=
    PLUS,               // +
    MINUS,              // -
    STAR,               // *
    STAR_STAR,          // **
    SLASH,              // /
    TILDE_SLASH,        // ~/
    PERCENT,            // %
    BANG,               // !
    BANG_BANG,          // !!
    AMP_AMP,            // &&
    PIPE_PIPE,          // ||
    PIPE_GT,            // |>
    PIPE,               // |
    QUESTION,           // ?
    QUESTION_QUESTION,  // ??
    AT,                 // @
    UNDERSCORE,         // _

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    ABSTRACT_KW,
    AMENDS_KW,
    AS_KW,
    CLASS_KW,
    CONST_KW,
    ELSE_KW,
    EXTENDS_KW,
    EXTERNAL_KW,
    FALSE_KW,
    FIXED_KW,
    FOR_KW,
    FUNCTION_KW,
    HIDDEN_KW,
    IF_KW,
    IMPORT_KW,
    IMPORT_STAR_KW,     // import*
    IN_KW,
    IS_KW,
    LET_KW,
    LOCAL_KW,
    MODULE_KW,
    NEW_KW,
    NOTHING_KW,
    NULL_KW,
    OPEN_KW,
    OUT_KW,
    OUTER_KW,
    READ_KW,
    READ_OR_NULL_KW,    // read?
    READ_STAR_KW,       // read*
    SUPER_KW,
    THIS_KW,
    THROW_KW,
    TRACE_KW,
    TRUE_KW,
    TYPEALIAS_KW,
    UNKNOWN_KW,
    WHEN_KW,

    // =========================================================================
    // NODES - module structure
    // =========================================================================
    MODULE,
    MODULE_HEADER,
    MODULE_DECL,            // module a.b.c
    EXTENDS_AMENDS_CLAUSE,
    IMPORT_CLAUSE,
    MODULE_URI,
    QUALIFIED_IDENT,
    CLASS,
    CLASS_HEADER_EXTENDS,
    CLASS_BODY,
    TYPE_ALIAS,
    CLASS_PROPERTY,
    CLASS_METHOD,
    ANNOTATION,
    MODIFIER_LIST,
    TYPE_PARAMETER_LIST,
    TYPE_PARAMETER,
    TYPE_ARGUMENT_LIST,
    PARAMETER_LIST,
    PARAMETER,
    TYPED_IDENTIFIER,
    TYPE_ANNOTATION,

    // =========================================================================
    // NODES - object bodies
    // =========================================================================
    OBJECT_BODY,
    OBJECT_PROPERTY,
    OBJECT_METHOD,
    OBJECT_ENTRY,
    OBJECT_ELEMENT,
    OBJECT_SPREAD,
    FOR_GENERATOR,
    WHEN_GENERATOR,

    // =========================================================================
    // NODES - types
    // =========================================================================
    UNKNOWN_TYPE,
    NOTHING_TYPE,
    MODULE_TYPE,
    STRING_LITERAL_TYPE,
    DECLARED_TYPE,
    PARENTHESIZED_TYPE,
    NULLABLE_TYPE,
    UNION_TYPE,
    FUNCTION_TYPE,

    // =========================================================================
    // NODES - expressions
    // =========================================================================
    THIS_EXPR,
    OUTER_EXPR,
    MODULE_EXPR,
    NULL_LITERAL,
    TRUE_LITERAL,
    FALSE_LITERAL,
    INT_LITERAL,
    FLOAT_LITERAL,
    THROW_EXPR,
    TRACE_EXPR,
    IMPORT_EXPR,
    READ_EXPR,
    UNQUALIFIED_ACCESS_EXPR,
    STRING_LITERAL,
    ML_STRING_LITERAL,
    STRING_PART,
    NEW_EXPR,
    AMEND_EXPR,
    SUPER_ACCESS_EXPR,
    SUPER_SUBSCRIPT_EXPR,
    QUALIFIED_ACCESS_EXPR,
    SUBSCRIPT_EXPR,
    NON_NULL_EXPR,
    UNARY_MINUS_EXPR,
    LOGICAL_NOT_EXPR,
    ADDITIVE_EXPR,
    MULTIPLICATIVE_EXPR,
    COMPARISON_EXPR,
    EQUALITY_EXPR,
    EXPONENTIATION_EXPR,
    LOGICAL_AND_EXPR,
    LOGICAL_OR_EXPR,
    NULL_COALESCE_EXPR,
    TYPE_TEST_EXPR,
    PIPE_EXPR,
    IF_EXPR,
    LET_EXPR,
    FUNCTION_LITERAL,
    PARENTHESIZED_EXPR,
    ARGUMENT_LIST,

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE
                | Self::LINE_COMMENT
                | Self::DOC_COMMENT
                | Self::BLOCK_COMMENT
                | Self::SHEBANG
        )
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::ABSTRACT_KW as u16) && (self as u16) <= (Self::WHEN_KW as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_BRACE as u16) && (self as u16) <= (Self::UNDERSCORE as u16)
    }

    /// Check if this is a composite node kind
    pub fn is_node(self) -> bool {
        (self as u16) >= (Self::MODULE as u16) && (self as u16) <= (Self::ERROR as u16)
    }

    /// Modifier keywords that may precede a member
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Self::ABSTRACT_KW
                | Self::OPEN_KW
                | Self::EXTERNAL_KW
                | Self::LOCAL_KW
                | Self::HIDDEN_KW
                | Self::FIXED_KW
                | Self::CONST_KW
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PklLanguage {}

impl rowan::Language for PklLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<PklLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<PklLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<PklLanguage>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert!(SyntaxKind::DOC_COMMENT.is_trivia());
        assert!(SyntaxKind::IMPORT_STAR_KW.is_keyword());
        assert!(!SyntaxKind::IDENT.is_keyword());
        assert!(SyntaxKind::PIPE_GT.is_punct());
        assert!(SyntaxKind::ARGUMENT_LIST.is_node());
        assert!(!SyntaxKind::R_PAREN.is_node());
        assert!(SyntaxKind::LOCAL_KW.is_modifier());
    }

    #[test]
    fn test_raw_kind_roundtrip() {
        let raw: rowan::SyntaxKind = SyntaxKind::LET_EXPR.into();
        assert_eq!(SyntaxKind::from(raw), SyntaxKind::LET_EXPR);
    }
}
