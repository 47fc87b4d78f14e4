//! Type annotation nodes.

use super::{AstError, QualifiedIdent, StringLiteral};
use crate::parser::SyntaxKind;

ast_node!(TypeNode, |kind| kind.is_type());

ast_node!(DeclaredType, DeclaredType);

impl DeclaredType {
    required_child_method!(name, QualifiedIdent, "type name");
    first_child_method!(type_argument_list, TypeArgumentList);

    pub fn type_arguments(&self) -> Vec<TypeNode> {
        self.type_argument_list()
            .map(|l| l.types())
            .unwrap_or_default()
    }
}

ast_node!(TypeArgumentList, TypeArgumentList);

impl TypeArgumentList {
    children_method!(types, TypeNode);
}

ast_node!(NullableType, NullableType);

impl NullableType {
    required_child_method!(inner, TypeNode, "type");
}

ast_node!(ParenthesizedType, ParenthesizedType);

impl ParenthesizedType {
    required_child_method!(inner, TypeNode, "type");
}

ast_node!(UnionType, UnionType);

impl UnionType {
    required_child_method!(left, TypeNode, "left type");

    pub fn right(&self) -> Result<TypeNode, AstError> {
        self.0
            .children()
            .into_iter()
            .filter_map(TypeNode::cast)
            .nth(1)
            .ok_or_else(|| self.0.missing_child("right type"))
    }

    /// Members of a chain `A|B|C`, flattened
    pub fn members(&self) -> Vec<TypeNode> {
        let mut out = Vec::new();
        for child in self.0.children().into_iter().filter_map(TypeNode::cast) {
            match UnionType::cast_ref(child.node()) {
                Some(nested) => out.extend(nested.members()),
                None => out.push(child),
            }
        }
        out
    }
}

ast_node!(FunctionType, FunctionType);

impl FunctionType {
    /// Parameter types, the types before `->`
    pub fn parameter_types(&self) -> Vec<TypeNode> {
        let arrow = self.arrow_offset();
        self.0
            .children()
            .into_iter()
            .filter_map(TypeNode::cast)
            .filter(|t| arrow.is_none_or(|a| t.node().range().start() < a))
            .collect()
    }

    pub fn return_type(&self) -> Result<TypeNode, AstError> {
        let arrow = self
            .arrow_offset()
            .ok_or_else(|| self.0.missing_terminal("->"))?;
        self.0
            .children()
            .into_iter()
            .filter_map(TypeNode::cast)
            .find(|t| t.node().range().start() >= arrow)
            .ok_or_else(|| self.0.missing_child("return type"))
    }

    fn arrow_offset(&self) -> Option<crate::base::TextSize> {
        self.0.terminal(SyntaxKind::ARROW).map(|t| t.range.start())
    }
}

ast_node!(StringLiteralType, StringLiteralType);

impl StringLiteralType {
    required_child_method!(literal, StringLiteral, "string literal");

    pub fn value(&self) -> Option<String> {
        self.literal().ok()?.value()
    }
}
