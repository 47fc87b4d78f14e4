//! AST node kinds and visitor dispatch.
//!
//! Every composite syntax kind except `ERROR` has exactly one AST node kind.
//! The [`Visitor`] trait has one method per kind; expression and type kinds
//! fall back to [`Visitor::visit_expr`] / [`Visitor::visit_type`], which in
//! turn fall back to [`Visitor::visit_node`].

use super::Node;
use crate::parser::SyntaxKind;

macro_rules! node_kinds {
    (
        expr { $($e_var:ident = $e_syn:ident => $e_fn:ident,)* }
        types { $($t_var:ident = $t_syn:ident => $t_fn:ident,)* }
        other { $($o_var:ident = $o_syn:ident => $o_fn:ident,)* }
    ) => {
        /// Kind of an AST node.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum NodeKind {
            $($e_var,)*
            $($t_var,)*
            $($o_var,)*
        }

        impl NodeKind {
            /// AST kind wrapping a syntax node of `kind`, if any.
            pub fn from_syntax(kind: SyntaxKind) -> Option<Self> {
                match kind {
                    $(SyntaxKind::$e_syn => Some(Self::$e_var),)*
                    $(SyntaxKind::$t_syn => Some(Self::$t_var),)*
                    $(SyntaxKind::$o_syn => Some(Self::$o_var),)*
                    _ => None,
                }
            }

            pub fn syntax_kind(self) -> SyntaxKind {
                match self {
                    $(Self::$e_var => SyntaxKind::$e_syn,)*
                    $(Self::$t_var => SyntaxKind::$t_syn,)*
                    $(Self::$o_var => SyntaxKind::$o_syn,)*
                }
            }

            pub fn is_expr(self) -> bool {
                matches!(self, $(Self::$e_var)|*)
            }

            pub fn is_type(self) -> bool {
                matches!(self, $(Self::$t_var)|*)
            }
        }

        /// Read-only traversal over AST nodes.
        ///
        /// Implement only the methods for the kinds of interest; everything
        /// else reaches [`Visitor::visit_node`].
        pub trait Visitor {
            type Output;

            fn visit_node(&mut self, node: &Node) -> Self::Output;

            fn visit_expr(&mut self, node: &Node) -> Self::Output {
                self.visit_node(node)
            }

            fn visit_type(&mut self, node: &Node) -> Self::Output {
                self.visit_node(node)
            }

            $(
                fn $e_fn(&mut self, node: &Node) -> Self::Output {
                    self.visit_expr(node)
                }
            )*

            $(
                fn $t_fn(&mut self, node: &Node) -> Self::Output {
                    self.visit_type(node)
                }
            )*

            $(
                fn $o_fn(&mut self, node: &Node) -> Self::Output {
                    self.visit_node(node)
                }
            )*
        }

        impl Node {
            /// Dispatch to the visitor method for this node's kind.
            pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
                match self.kind() {
                    $(NodeKind::$e_var => visitor.$e_fn(self),)*
                    $(NodeKind::$t_var => visitor.$t_fn(self),)*
                    $(NodeKind::$o_var => visitor.$o_fn(self),)*
                }
            }
        }
    };
}

node_kinds! {
    expr {
        ThisExpr = THIS_EXPR => visit_this_expr,
        OuterExpr = OUTER_EXPR => visit_outer_expr,
        ModuleExpr = MODULE_EXPR => visit_module_expr,
        NullLiteral = NULL_LITERAL => visit_null_literal,
        TrueLiteral = TRUE_LITERAL => visit_true_literal,
        FalseLiteral = FALSE_LITERAL => visit_false_literal,
        IntLiteral = INT_LITERAL => visit_int_literal,
        FloatLiteral = FLOAT_LITERAL => visit_float_literal,
        ThrowExpr = THROW_EXPR => visit_throw_expr,
        TraceExpr = TRACE_EXPR => visit_trace_expr,
        ImportExpr = IMPORT_EXPR => visit_import_expr,
        ReadExpr = READ_EXPR => visit_read_expr,
        UnqualifiedAccessExpr = UNQUALIFIED_ACCESS_EXPR => visit_unqualified_access_expr,
        StringLiteral = STRING_LITERAL => visit_string_literal,
        MlStringLiteral = ML_STRING_LITERAL => visit_ml_string_literal,
        NewExpr = NEW_EXPR => visit_new_expr,
        AmendExpr = AMEND_EXPR => visit_amend_expr,
        SuperAccessExpr = SUPER_ACCESS_EXPR => visit_super_access_expr,
        SuperSubscriptExpr = SUPER_SUBSCRIPT_EXPR => visit_super_subscript_expr,
        QualifiedAccessExpr = QUALIFIED_ACCESS_EXPR => visit_qualified_access_expr,
        SubscriptExpr = SUBSCRIPT_EXPR => visit_subscript_expr,
        NonNullExpr = NON_NULL_EXPR => visit_non_null_expr,
        UnaryMinusExpr = UNARY_MINUS_EXPR => visit_unary_minus_expr,
        LogicalNotExpr = LOGICAL_NOT_EXPR => visit_logical_not_expr,
        AdditiveExpr = ADDITIVE_EXPR => visit_additive_expr,
        MultiplicativeExpr = MULTIPLICATIVE_EXPR => visit_multiplicative_expr,
        ComparisonExpr = COMPARISON_EXPR => visit_comparison_expr,
        EqualityExpr = EQUALITY_EXPR => visit_equality_expr,
        ExponentiationExpr = EXPONENTIATION_EXPR => visit_exponentiation_expr,
        LogicalAndExpr = LOGICAL_AND_EXPR => visit_logical_and_expr,
        LogicalOrExpr = LOGICAL_OR_EXPR => visit_logical_or_expr,
        NullCoalesceExpr = NULL_COALESCE_EXPR => visit_null_coalesce_expr,
        TypeTestExpr = TYPE_TEST_EXPR => visit_type_test_expr,
        PipeExpr = PIPE_EXPR => visit_pipe_expr,
        IfExpr = IF_EXPR => visit_if_expr,
        LetExpr = LET_EXPR => visit_let_expr,
        FunctionLiteral = FUNCTION_LITERAL => visit_function_literal,
        ParenthesizedExpr = PARENTHESIZED_EXPR => visit_parenthesized_expr,
    }
    types {
        UnknownType = UNKNOWN_TYPE => visit_unknown_type,
        NothingType = NOTHING_TYPE => visit_nothing_type,
        ModuleType = MODULE_TYPE => visit_module_type,
        StringLiteralType = STRING_LITERAL_TYPE => visit_string_literal_type,
        DeclaredType = DECLARED_TYPE => visit_declared_type,
        ParenthesizedType = PARENTHESIZED_TYPE => visit_parenthesized_type,
        NullableType = NULLABLE_TYPE => visit_nullable_type,
        UnionType = UNION_TYPE => visit_union_type,
        FunctionType = FUNCTION_TYPE => visit_function_type,
    }
    other {
        Module = MODULE => visit_module,
        ModuleHeader = MODULE_HEADER => visit_module_header,
        ModuleDecl = MODULE_DECL => visit_module_decl,
        ExtendsAmendsClause = EXTENDS_AMENDS_CLAUSE => visit_extends_amends_clause,
        ImportClause = IMPORT_CLAUSE => visit_import_clause,
        ModuleUri = MODULE_URI => visit_module_uri,
        QualifiedIdent = QUALIFIED_IDENT => visit_qualified_ident,
        Class = CLASS => visit_class,
        ClassHeaderExtends = CLASS_HEADER_EXTENDS => visit_class_header_extends,
        ClassBody = CLASS_BODY => visit_class_body,
        TypeAlias = TYPE_ALIAS => visit_type_alias,
        ClassProperty = CLASS_PROPERTY => visit_class_property,
        ClassMethod = CLASS_METHOD => visit_class_method,
        Annotation = ANNOTATION => visit_annotation,
        ModifierList = MODIFIER_LIST => visit_modifier_list,
        TypeParameterList = TYPE_PARAMETER_LIST => visit_type_parameter_list,
        TypeParameter = TYPE_PARAMETER => visit_type_parameter,
        TypeArgumentList = TYPE_ARGUMENT_LIST => visit_type_argument_list,
        ParameterList = PARAMETER_LIST => visit_parameter_list,
        Parameter = PARAMETER => visit_parameter,
        TypedIdentifier = TYPED_IDENTIFIER => visit_typed_identifier,
        TypeAnnotation = TYPE_ANNOTATION => visit_type_annotation,
        ObjectBody = OBJECT_BODY => visit_object_body,
        ObjectProperty = OBJECT_PROPERTY => visit_object_property,
        ObjectMethod = OBJECT_METHOD => visit_object_method,
        ObjectEntry = OBJECT_ENTRY => visit_object_entry,
        ObjectElement = OBJECT_ELEMENT => visit_object_element,
        ObjectSpread = OBJECT_SPREAD => visit_object_spread,
        ForGenerator = FOR_GENERATOR => visit_for_generator,
        WhenGenerator = WHEN_GENERATOR => visit_when_generator,
        StringPart = STRING_PART => visit_string_part,
        ArgumentList = ARGUMENT_LIST => visit_argument_list,
    }
}

impl NodeKind {
    /// Binary operator expressions
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            Self::AdditiveExpr
                | Self::MultiplicativeExpr
                | Self::ComparisonExpr
                | Self::EqualityExpr
                | Self::ExponentiationExpr
                | Self::LogicalAndExpr
                | Self::LogicalOrExpr
                | Self::NullCoalesceExpr
                | Self::PipeExpr
        )
    }

    /// Members of a module or class body
    pub fn is_class_member(self) -> bool {
        matches!(
            self,
            Self::Class | Self::TypeAlias | Self::ClassProperty | Self::ClassMethod
        )
    }

    /// Members of an object body
    pub fn is_object_member(self) -> bool {
        matches!(
            self,
            Self::ObjectProperty
                | Self::ObjectMethod
                | Self::ObjectEntry
                | Self::ObjectElement
                | Self::ObjectSpread
                | Self::ForGenerator
                | Self::WhenGenerator
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_composite_syntax_kind_maps() {
        let raw_range = (SyntaxKind::MODULE as u16)..(SyntaxKind::ERROR as u16);
        for raw in raw_range {
            let kind = SyntaxKind::from(rowan::SyntaxKind(raw));
            let node_kind = NodeKind::from_syntax(kind);
            assert_eq!(node_kind.map(NodeKind::syntax_kind), Some(kind));
        }
        assert_eq!(NodeKind::from_syntax(SyntaxKind::ERROR), None);
        assert_eq!(NodeKind::from_syntax(SyntaxKind::IDENT), None);
    }

    #[test]
    fn test_categories() {
        assert!(NodeKind::LetExpr.is_expr());
        assert!(NodeKind::UnionType.is_type());
        assert!(!NodeKind::Class.is_expr());
        assert!(NodeKind::PipeExpr.is_binary());
        assert!(NodeKind::ForGenerator.is_object_member());
    }
}
