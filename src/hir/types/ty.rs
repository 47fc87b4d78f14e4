//! Static types.

use std::fmt;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::ast::{Class, Module, Node, declaration_name};
use crate::hir::BaseModule;

/// Concrete types bound to type parameters, keyed by the `TypeParameter` node.
pub type TypeParameterBindings = FxHashMap<Node, Type>;

/// Static type of an expression or declaration.
///
/// Builtin types are class types whose class lives in the base module.
/// A nullable type is a union containing the `Null` class.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// Resolution failed or nothing is known; compatible with everything.
    Unknown,
    /// The bottom type, e.g. of `throw(...)`.
    Nothing,
    Class { class: Node, args: Vec<Type> },
    Module { module: Node },
    /// Flattened, duplicate-free alternatives; never fewer than two.
    Union(Vec<Type>),
    StringLiteral(SmolStr),
    Function { params: Vec<Type>, ret: Box<Type> },
    /// An unbound type parameter.
    Variable(Node),
}

impl Type {
    pub fn class(class: Node, args: Vec<Type>) -> Self {
        Type::Class { class, args }
    }

    pub fn module(module: Node) -> Self {
        Type::Module { module }
    }

    pub fn function(params: Vec<Type>, ret: Type) -> Self {
        Type::Function {
            params,
            ret: Box::new(ret),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }

    /// Class node of a class type
    pub fn class_node(&self) -> Option<&Node> {
        match self {
            Type::Class { class, .. } => Some(class),
            _ => None,
        }
    }

    /// Type arguments of a class type
    pub fn args(&self) -> &[Type] {
        match self {
            Type::Class { args, .. } => args,
            _ => &[],
        }
    }

    /// Union of two types.
    ///
    /// Nested unions are flattened and duplicates dropped. `Nothing` is the
    /// identity and `Unknown` absorbs everything.
    pub fn union(self, other: Type) -> Type {
        Type::union_of([self, other])
    }

    pub fn union_of(types: impl IntoIterator<Item = Type>) -> Type {
        let mut members: Vec<Type> = Vec::new();
        for ty in types {
            match ty {
                Type::Unknown => return Type::Unknown,
                Type::Nothing => {}
                Type::Union(inner) => {
                    for member in inner {
                        if !members.contains(&member) {
                            members.push(member);
                        }
                    }
                }
                other => {
                    if !members.contains(&other) {
                        members.push(other);
                    }
                }
            }
        }
        match members.len() {
            0 => Type::Nothing,
            1 => members.pop().unwrap_or(Type::Nothing),
            _ => Type::Union(members),
        }
    }

    /// This type or `null`
    pub fn nullable(self, base: &BaseModule) -> Type {
        self.union(base.null_type())
    }

    /// This type with `Null` removed
    pub fn non_null(self, base: &BaseModule) -> Type {
        match self {
            Type::Union(members) => {
                Type::union_of(members.into_iter().filter(|m| !m.is_null(base)))
            }
            ty if ty.is_null(base) => Type::Nothing,
            ty => ty,
        }
    }

    /// Whether this is exactly the `Null` class
    pub fn is_null(&self, base: &BaseModule) -> bool {
        matches!(self, Type::Class { class, .. } if base.is_class(class, "Null"))
    }

    /// Whether `null` inhabits this type
    pub fn is_nullable(&self, base: &BaseModule) -> bool {
        match self {
            Type::Union(members) => members.iter().any(|m| m.is_null(base)),
            ty => ty.is_null(base),
        }
    }

    /// Replace bound type variables.
    pub fn substitute(&self, bindings: &TypeParameterBindings) -> Type {
        if bindings.is_empty() {
            return self.clone();
        }
        match self {
            Type::Variable(param) => bindings.get(param).cloned().unwrap_or_else(|| self.clone()),
            Type::Class { class, args } => Type::Class {
                class: class.clone(),
                args: args.iter().map(|a| a.substitute(bindings)).collect(),
            },
            Type::Union(members) => Type::union_of(members.iter().map(|m| m.substitute(bindings))),
            Type::Function { params, ret } => Type::Function {
                params: params.iter().map(|p| p.substitute(bindings)).collect(),
                ret: Box::new(ret.substitute(bindings)),
            },
            _ => self.clone(),
        }
    }

    /// Bindings of a class type's parameters to its arguments.
    ///
    /// Parameters without a matching argument stay unbound.
    pub fn bindings(&self) -> TypeParameterBindings {
        match self {
            Type::Class { class, args } => Class::cast_ref(class)
                .map(|c| bind_parameters(&c, args))
                .unwrap_or_default(),
            _ => TypeParameterBindings::default(),
        }
    }
}

/// Bind the type parameters of `class` to `args`, positionally.
pub(crate) fn bind_parameters(class: &Class, args: &[Type]) -> TypeParameterBindings {
    class
        .type_parameters()
        .into_iter()
        .zip(args)
        .map(|(param, arg)| (param.node().clone(), arg.clone()))
        .collect()
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Unknown => f.write_str("unknown"),
            Type::Nothing => f.write_str("nothing"),
            Type::Class { class, args } => {
                f.write_str(&declaration_name(class).unwrap_or_else(|| SmolStr::new("<class>")))?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    write_list(f, args)?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            Type::Module { module } => {
                let name = Module::cast_ref(module)
                    .and_then(|m| m.name())
                    .unwrap_or_else(|| module_stem(module.document().uri()));
                f.write_str(&name)
            }
            Type::Union(members) => {
                // `T?` for a two-member union with Null
                let null_index = members.iter().position(|m| {
                    matches!(m, Type::Class { class, args } if args.is_empty()
                        && declaration_name(class).as_deref() == Some("Null")
                        && class.file().is_base())
                });
                if let (2, Some(index)) = (members.len(), null_index) {
                    let other = &members[1 - index];
                    return if matches!(other, Type::Union(_) | Type::Function { .. }) {
                        write!(f, "({other})?")
                    } else {
                        write!(f, "{other}?")
                    };
                }
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
            Type::StringLiteral(text) => write!(f, "\"{text}\""),
            Type::Function { params, ret } => {
                f.write_str("(")?;
                write_list(f, params)?;
                write!(f, ") -> {ret}")
            }
            Type::Variable(param) => {
                f.write_str(&declaration_name(param).unwrap_or_else(|| SmolStr::new("?")))
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[Type]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}

fn module_stem(uri: &str) -> String {
    let last = uri.rsplit(['/', ':']).next().unwrap_or(uri);
    last.strip_suffix(".pkl").unwrap_or(last).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> BaseModule {
        BaseModule::new().unwrap()
    }

    #[test]
    fn test_union_flattens_and_dedupes() {
        let base = base();
        let int = base.int_type();
        let string = base.string_type();
        let union = int.clone().union(string.clone()).union(int.clone());
        assert_eq!(union, Type::Union(vec![int.clone(), string]));
        assert_eq!(int.clone().union(Type::Nothing), int);
        assert_eq!(int.union(Type::Unknown), Type::Unknown);
    }

    #[test]
    fn test_nullable_round_trip() {
        let base = base();
        let nullable = base.int_type().nullable(&base);
        assert!(nullable.is_nullable(&base));
        assert_eq!(nullable.non_null(&base), base.int_type());
        assert_eq!(base.null_type().non_null(&base), Type::Nothing);
    }

    #[test]
    fn test_display() {
        let base = base();
        let list = base.generic_type("List", vec![base.int_type()]);
        assert_eq!(list.to_string(), "List<Int>");
        assert_eq!(base.string_type().nullable(&base).to_string(), "String?");
        let function = Type::function(vec![base.int_type()], base.boolean_type());
        assert_eq!(function.to_string(), "(Int) -> Boolean");
        assert_eq!(
            base.int_type().union(base.string_type()).to_string(),
            "Int|String"
        );
    }

    #[test]
    fn test_substitute_binds_class_parameters() {
        let base = base();
        let list_class = base.class("List").unwrap();
        let element = list_class.type_parameters()[0].node().clone();
        let bindings: TypeParameterBindings =
            [(element.clone(), base.string_type())].into_iter().collect();
        let open = base.generic_type("List", vec![Type::Variable(element)]);
        assert_eq!(
            open.substitute(&bindings),
            base.generic_type("List", vec![base.string_type()])
        );
    }
}
