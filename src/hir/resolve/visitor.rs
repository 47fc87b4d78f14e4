//! Resolve visitors: strategies deciding which candidates a lookup keeps.

use indexmap::IndexMap;
use indexmap::map::Entry;
use smol_str::SmolStr;

use crate::ast::Node;
use crate::hir::TypeParameterBindings;

/// Receives candidate declarations in lookup order.
///
/// `visit` returns `false` to stop the lookup. Whatever the visitor kept is
/// returned by [`finish`](ResolveVisitor::finish); a lookup that finds
/// nothing returns the visitor's empty result.
pub trait ResolveVisitor {
    type Output;

    /// Offer `element`, declared under `name`. `bindings` are the type
    /// parameter bindings of the type the element was found on.
    fn visit(&mut self, name: &str, element: &Node, bindings: &TypeParameterBindings) -> bool;

    fn finish(self) -> Self::Output;
}

/// A declaration found by a lookup, with the bindings of its owner type.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub node: Node,
    pub bindings: TypeParameterBindings,
}

/// Stops at the first element named `name`.
#[derive(Debug)]
pub struct FirstElementNamed {
    name: SmolStr,
    found: Option<Resolved>,
}

impl FirstElementNamed {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            found: None,
        }
    }
}

impl ResolveVisitor for FirstElementNamed {
    type Output = Option<Resolved>;

    fn visit(&mut self, name: &str, element: &Node, bindings: &TypeParameterBindings) -> bool {
        if name != self.name.as_str() {
            return true;
        }
        self.found = Some(Resolved {
            node: element.clone(),
            bindings: bindings.clone(),
        });
        false
    }

    fn finish(self) -> Self::Output {
        self.found
    }
}

/// Collects every element named `name`, innermost first.
#[derive(Debug)]
pub struct ElementsNamed {
    name: SmolStr,
    found: Vec<Resolved>,
}

impl ElementsNamed {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            found: Vec::new(),
        }
    }
}

impl ResolveVisitor for ElementsNamed {
    type Output = Vec<Resolved>;

    fn visit(&mut self, name: &str, element: &Node, bindings: &TypeParameterBindings) -> bool {
        if name == self.name.as_str() && !self.found.iter().any(|r| &r.node == element) {
            self.found.push(Resolved {
                node: element.clone(),
                bindings: bindings.clone(),
            });
        }
        true
    }

    fn finish(self) -> Self::Output {
        self.found
    }
}

/// Collects every visible name, keeping the first (innermost) declaration of
/// each. Used for completion.
#[derive(Debug, Default)]
pub struct CollectAll {
    found: IndexMap<SmolStr, Resolved>,
}

impl CollectAll {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResolveVisitor for CollectAll {
    type Output = IndexMap<SmolStr, Resolved>;

    fn visit(&mut self, name: &str, element: &Node, bindings: &TypeParameterBindings) -> bool {
        if let Entry::Vacant(slot) = self.found.entry(SmolStr::new(name)) {
            slot.insert(Resolved {
                node: element.clone(),
                bindings: bindings.clone(),
            });
        }
        true
    }

    fn finish(self) -> Self::Output {
        self.found
    }
}
