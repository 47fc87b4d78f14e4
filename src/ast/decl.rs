//! Declarations: modules, classes, members, parameters and object bodies.

use smol_str::SmolStr;

use super::{AstError, Expr, Node, NodeKind, StringLiteral, Terminal, TypeNode};
use crate::parser::SyntaxKind;

// ============================================================================
// Module level
// ============================================================================

ast_node!(Module, Module);

impl Module {
    first_child_method!(header, ModuleHeader);
    children_method!(imports, ImportClause);
    children_method!(classes, Class);
    children_method!(type_aliases, TypeAlias);
    children_method!(properties, ClassProperty);
    children_method!(methods, ClassMethod);

    /// Declared module name (`module a.b.c`)
    pub fn name(&self) -> Option<String> {
        let decl = self.header()?.decl()?;
        Some(decl.qualified_name()?.text())
    }

    pub fn extends_amends(&self) -> Option<ExtendsAmendsClause> {
        self.header()?.extends_amends()
    }

    pub fn is_amend(&self) -> bool {
        self.extends_amends().is_some_and(|c| c.is_amend())
    }

    pub fn decl(&self) -> Option<ModuleDecl> {
        self.header()?.decl()
    }

    /// Classes, type aliases, properties and methods in source order
    pub fn members(&self) -> Vec<Node> {
        self.0
            .children()
            .into_iter()
            .filter(|c| c.kind().is_class_member())
            .collect()
    }
}

ast_node!(ModuleHeader, ModuleHeader);

impl ModuleHeader {
    first_child_method!(decl, ModuleDecl);
    first_child_method!(extends_amends, ExtendsAmendsClause);
}

ast_node!(ModuleDecl, ModuleDecl);

impl ModuleDecl {
    first_child_method!(qualified_name, QualifiedIdent);
    first_child_method!(modifiers, ModifierList);
    children_method!(annotations, Annotation);

    has_modifier_method!(is_abstract, ABSTRACT_KW);
    has_modifier_method!(is_open, OPEN_KW);
}

ast_node!(ExtendsAmendsClause, ExtendsAmendsClause);

impl ExtendsAmendsClause {
    has_terminal_method!(is_amend, AMENDS_KW);
    has_terminal_method!(is_extend, EXTENDS_KW);
    required_child_method!(uri, ModuleUri, "module uri");
}

ast_node!(ImportClause, ImportClause);

impl ImportClause {
    has_terminal_method!(is_glob, IMPORT_STAR_KW);
    required_child_method!(uri, ModuleUri, "module uri");

    /// The `as` alias, if given
    pub fn alias(&self) -> Option<&Terminal> {
        self.0.terminal(SyntaxKind::IDENT)
    }

    /// Name the import binds in the module scope: the alias, or the last path
    /// segment of the uri without its extension.
    pub fn binding_name(&self) -> Option<SmolStr> {
        if let Some(alias) = self.alias() {
            return Some(alias.name());
        }
        let uri = self.uri().ok()?.value()?;
        let last = uri.rsplit(['/', ':']).next()?;
        let stem = last.strip_suffix(".pkl").unwrap_or(last);
        (!stem.is_empty()).then(|| SmolStr::new(stem))
    }
}

ast_node!(ModuleUri, ModuleUri);

impl ModuleUri {
    first_child_method!(string_literal, StringLiteral);

    /// Uri text, if it is a constant string
    pub fn value(&self) -> Option<String> {
        self.string_literal()?.value()
    }
}

ast_node!(QualifiedIdent, QualifiedIdent);

impl QualifiedIdent {
    pub fn identifiers(&self) -> Vec<&Terminal> {
        self.0
            .terminals()
            .iter()
            .filter(|t| t.kind == SyntaxKind::IDENT)
            .collect()
    }

    pub fn parts(&self) -> Vec<SmolStr> {
        self.identifiers().into_iter().map(Terminal::name).collect()
    }

    pub fn text(&self) -> String {
        self.parts().join(".")
    }
}

// ============================================================================
// Classes and members
// ============================================================================

ast_node!(Class, Class);

impl Class {
    first_child_method!(modifiers, ModifierList);
    children_method!(annotations, Annotation);
    first_child_method!(type_parameter_list, TypeParameterList);
    first_child_method!(header_extends, ClassHeaderExtends);
    first_child_method!(body, ClassBody);

    has_modifier_method!(is_abstract, ABSTRACT_KW);
    has_modifier_method!(is_open, OPEN_KW);
    has_modifier_method!(is_external, EXTERNAL_KW);

    pub fn name(&self) -> Result<SmolStr, AstError> {
        Ok(self.0.identifier()?.name())
    }

    pub fn type_parameters(&self) -> Vec<TypeParameter> {
        self.type_parameter_list()
            .map(|l| l.parameters())
            .unwrap_or_default()
    }

    /// Declared supertype (`extends T`)
    pub fn supertype(&self) -> Option<TypeNode> {
        self.header_extends()?.supertype().ok()
    }

    pub fn properties(&self) -> Vec<ClassProperty> {
        self.body().map(|b| b.properties()).unwrap_or_default()
    }

    pub fn methods(&self) -> Vec<ClassMethod> {
        self.body().map(|b| b.methods()).unwrap_or_default()
    }
}

ast_node!(ClassHeaderExtends, ClassHeaderExtends);

impl ClassHeaderExtends {
    required_child_method!(supertype, TypeNode, "supertype");
}

ast_node!(ClassBody, ClassBody);

impl ClassBody {
    children_method!(properties, ClassProperty);
    children_method!(methods, ClassMethod);
}

ast_node!(TypeAlias, TypeAlias);

impl TypeAlias {
    first_child_method!(modifiers, ModifierList);
    children_method!(annotations, Annotation);
    first_child_method!(type_parameter_list, TypeParameterList);
    required_child_method!(aliased_type, TypeNode, "aliased type");

    pub fn name(&self) -> Result<SmolStr, AstError> {
        Ok(self.0.identifier()?.name())
    }

    pub fn type_parameters(&self) -> Vec<TypeParameter> {
        self.type_parameter_list()
            .map(|l| l.parameters())
            .unwrap_or_default()
    }
}

ast_node!(Property, |kind| matches!(kind, NodeKind::ClassProperty | NodeKind::ObjectProperty));

/// Property declared in a module or class.
pub type ClassProperty = Property;
/// Property defined or amended in an object body.
pub type ObjectProperty = Property;

impl Property {
    first_child_method!(modifiers, ModifierList);
    children_method!(annotations, Annotation);
    first_child_method!(type_annotation, TypeAnnotation);
    first_child_method!(expr, Expr);
    children_method!(object_bodies, ObjectBody);

    has_modifier_method!(is_local, LOCAL_KW);
    has_modifier_method!(is_hidden, HIDDEN_KW);
    has_modifier_method!(is_fixed, FIXED_KW);
    has_modifier_method!(is_const, CONST_KW);
    has_modifier_method!(is_external, EXTERNAL_KW);
    has_modifier_method!(is_abstract, ABSTRACT_KW);

    pub fn name(&self) -> Result<SmolStr, AstError> {
        Ok(self.0.identifier()?.name())
    }

    /// Declared type, if annotated
    pub fn declared_type(&self) -> Option<TypeNode> {
        self.type_annotation()?.type_node().ok()
    }

    /// Whether the property amends its inherited value (`foo { ... }`)
    pub fn is_amend(&self) -> bool {
        self.expr().is_none() && !self.object_bodies().is_empty()
    }
}

ast_node!(Method, |kind| matches!(kind, NodeKind::ClassMethod | NodeKind::ObjectMethod));

/// Method declared in a module or class.
pub type ClassMethod = Method;
/// Local method of an object body.
pub type ObjectMethod = Method;

impl Method {
    first_child_method!(modifiers, ModifierList);
    children_method!(annotations, Annotation);
    first_child_method!(type_parameter_list, TypeParameterList);
    required_child_method!(parameter_list, ParameterList, "parameter list");
    first_child_method!(type_annotation, TypeAnnotation);
    first_child_method!(body, Expr);

    has_modifier_method!(is_abstract, ABSTRACT_KW);
    has_modifier_method!(is_external, EXTERNAL_KW);
    has_modifier_method!(is_local, LOCAL_KW);

    pub fn name(&self) -> Result<SmolStr, AstError> {
        Ok(self.0.identifier()?.name())
    }

    pub fn type_parameters(&self) -> Vec<TypeParameter> {
        self.type_parameter_list()
            .map(|l| l.parameters())
            .unwrap_or_default()
    }

    pub fn parameters(&self) -> Vec<Parameter> {
        self.parameter_list()
            .map(|l| l.parameters())
            .unwrap_or_default()
    }

    pub fn return_type(&self) -> Option<TypeNode> {
        self.type_annotation()?.type_node().ok()
    }
}

ast_node!(Annotation, Annotation);

impl Annotation {
    first_child_method!(type_node, TypeNode);
    first_child_method!(object_body, ObjectBody);
}

ast_node!(ModifierList, ModifierList);

impl ModifierList {
    pub fn has(&self, kind: SyntaxKind) -> bool {
        self.0.has_terminal(kind)
    }

    pub fn modifiers(&self) -> Vec<SyntaxKind> {
        self.0.terminals().iter().map(|t| t.kind).collect()
    }
}

// ============================================================================
// Type parameters and parameters
// ============================================================================

ast_node!(TypeParameterList, TypeParameterList);

impl TypeParameterList {
    children_method!(parameters, TypeParameter);
}

/// Declared variance of a type parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variance {
    Invariant,
    Covariant,
    Contravariant,
}

ast_node!(TypeParameter, TypeParameter);

impl TypeParameter {
    pub fn name(&self) -> Result<SmolStr, AstError> {
        Ok(self.0.identifier()?.name())
    }

    pub fn variance(&self) -> Variance {
        if self.0.has_terminal(SyntaxKind::OUT_KW) {
            Variance::Covariant
        } else if self.0.has_terminal(SyntaxKind::IN_KW) {
            Variance::Contravariant
        } else {
            Variance::Invariant
        }
    }
}

ast_node!(ParameterList, ParameterList);

impl ParameterList {
    children_method!(parameters, Parameter);
}

ast_node!(Parameter, Parameter);

impl Parameter {
    first_child_method!(typed_identifier, TypedIdentifier);
    has_terminal_method!(is_underscore, UNDERSCORE);

    /// Bound name; `None` for `_`
    pub fn name(&self) -> Option<SmolStr> {
        self.typed_identifier()?.name().ok()
    }

    pub fn declared_type(&self) -> Option<TypeNode> {
        self.typed_identifier()?.declared_type()
    }
}

ast_node!(TypedIdentifier, TypedIdentifier);

impl TypedIdentifier {
    first_child_method!(type_annotation, TypeAnnotation);

    pub fn name(&self) -> Result<SmolStr, AstError> {
        Ok(self.0.identifier()?.name())
    }

    pub fn declared_type(&self) -> Option<TypeNode> {
        self.type_annotation()?.type_node().ok()
    }
}

ast_node!(TypeAnnotation, TypeAnnotation);

impl TypeAnnotation {
    required_child_method!(type_node, TypeNode, "type");
}

// ============================================================================
// Object bodies
// ============================================================================

ast_node!(ObjectBody, ObjectBody);

impl ObjectBody {
    children_method!(parameters, Parameter);
    children_method!(properties, Property);
    children_method!(methods, Method);
    children_method!(entries, ObjectEntry);
    children_method!(elements, ObjectElement);
    children_method!(for_generators, ForGenerator);
    children_method!(when_generators, WhenGenerator);

    pub fn members(&self) -> Vec<Node> {
        self.0
            .children()
            .into_iter()
            .filter(|c| c.kind().is_object_member())
            .collect()
    }
}

ast_node!(ObjectEntry, ObjectEntry);

impl ObjectEntry {
    required_child_method!(key, Expr, "key");
    children_method!(object_bodies, ObjectBody);

    /// Value after `=`
    pub fn value(&self) -> Option<Expr> {
        self.0
            .children()
            .into_iter()
            .filter_map(Expr::cast)
            .nth(1)
    }
}

ast_node!(ObjectElement, ObjectElement);

impl ObjectElement {
    required_child_method!(expr, Expr, "element");
}

ast_node!(ObjectSpread, ObjectSpread);

impl ObjectSpread {
    required_child_method!(expr, Expr, "spread operand");
    has_terminal_method!(is_nullable, QUESTION_SPREAD);
}

ast_node!(ForGenerator, ForGenerator);

impl ForGenerator {
    children_method!(parameters, Parameter);
    required_child_method!(iterable, Expr, "iterable");
    first_child_method!(body, ObjectBody);

    /// `k` in `for (k, v in ...)`
    pub fn key_parameter(&self) -> Option<Parameter> {
        let params = self.parameters();
        if params.len() == 2 { params.into_iter().next() } else { None }
    }

    /// `v` in `for (k, v in ...)` or `for (v in ...)`
    pub fn value_parameter(&self) -> Result<Parameter, AstError> {
        self.parameters()
            .pop()
            .ok_or_else(|| self.0.missing_child("value parameter"))
    }
}

ast_node!(WhenGenerator, WhenGenerator);

impl WhenGenerator {
    required_child_method!(condition, Expr, "condition");

    pub fn then_body(&self) -> Option<ObjectBody> {
        self.0.children().into_iter().find_map(ObjectBody::cast)
    }

    pub fn else_body(&self) -> Option<ObjectBody> {
        self.0
            .children()
            .into_iter()
            .filter_map(ObjectBody::cast)
            .nth(1)
    }
}

/// Name a declaration introduces into its scope, if it is one.
pub fn declaration_name(node: &Node) -> Option<SmolStr> {
    match node.kind() {
        NodeKind::Class
        | NodeKind::TypeAlias
        | NodeKind::ClassProperty
        | NodeKind::ClassMethod
        | NodeKind::ObjectProperty
        | NodeKind::ObjectMethod
        | NodeKind::TypedIdentifier
        | NodeKind::TypeParameter => node.identifier().ok().map(Terminal::name),
        NodeKind::Parameter => Parameter::cast_ref(node)?.name(),
        NodeKind::ImportClause => ImportClause::cast_ref(node)?.binding_name(),
        NodeKind::Module => {
            let name = Module::cast_ref(node)?.name()?;
            name.rsplit('.').next().map(SmolStr::new)
        }
        _ => None,
    }
}
