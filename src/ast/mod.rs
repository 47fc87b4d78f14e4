//! AST node model over the concrete syntax tree.
//!
//! Every document owns an arena of nodes ([`Document`]). A [`Node`] handle
//! wraps one syntax node; its children and terminals are derived on first
//! access and cached in the arena. Typed wrappers (`Class`, `LetExpr`, ...)
//! give named access to the child slots of each grammar rule.
//!
//! Required slots return [`AstError`] when absent; optional slots return
//! `Option`. Neither panics on malformed input.

use crate::parser::SyntaxKind;

// ============================================================================
// Helper macros for typed wrappers
// ============================================================================

/// Define a typed wrapper over [`Node`] for one kind, or for a family of kinds
/// selected by a predicate.
macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        ast_node!($name, |kind| kind == $crate::ast::NodeKind::$kind);
    };
    ($name:ident, |$k:ident| $pred:expr) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name($crate::ast::Node);

        impl $name {
            pub fn cast(node: $crate::ast::Node) -> Option<Self> {
                let $k = node.kind();
                if $pred { Some(Self(node)) } else { None }
            }

            pub fn cast_ref(node: &$crate::ast::Node) -> Option<Self> {
                Self::cast(node.clone())
            }

            pub fn node(&self) -> &$crate::ast::Node {
                &self.0
            }
        }

        impl From<$name> for $crate::ast::Node {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

/// Generate a method returning the first child of a typed wrapper.
macro_rules! first_child_method {
    ($name:ident, $type:ident) => {
        #[doc = concat!("First `", stringify!($type), "` child, if present.")]
        pub fn $name(&self) -> Option<$type> {
            self.0.children().into_iter().find_map($type::cast)
        }
    };
}

/// Generate a method returning a child the grammar always produces.
macro_rules! required_child_method {
    ($name:ident, $type:ident, $slot:literal) => {
        #[doc = concat!("Required `", $slot, "` slot.")]
        pub fn $name(&self) -> Result<$type, $crate::ast::AstError> {
            self.0
                .children()
                .into_iter()
                .find_map($type::cast)
                .ok_or_else(|| self.0.missing_child($slot))
        }
    };
}

/// Generate a method returning all children of a typed wrapper.
macro_rules! children_method {
    ($name:ident, $type:ident) => {
        #[doc = concat!("All `", stringify!($type), "` children.")]
        pub fn $name(&self) -> Vec<$type> {
            self.0.children().into_iter().filter_map($type::cast).collect()
        }
    };
}

/// Generate a boolean method checking for a direct terminal.
macro_rules! has_terminal_method {
    ($name:ident, $($kind:ident)|+) => {
        pub fn $name(&self) -> bool {
            self.0
                .terminals()
                .iter()
                .any(|t| matches!(t.kind, $($crate::parser::SyntaxKind::$kind)|+))
        }
    };
}

/// Generate a boolean method checking the modifier list of a declaration.
macro_rules! has_modifier_method {
    ($name:ident, $kind:ident) => {
        pub fn $name(&self) -> bool {
            self.modifiers()
                .is_some_and(|m| m.has($crate::parser::SyntaxKind::$kind))
        }
    };
}

mod decl;
mod document;
mod error;
mod expr;
mod kinds;
mod node;
mod types;

pub use decl::*;
pub use document::{Document, NodeId};
pub use error::AstError;
pub use expr::*;
pub use kinds::{NodeKind, Visitor};
pub use node::{Node, Terminal};
pub use types::*;

impl Node {
    /// Expected closing token of a delimited construct, when it is missing.
    ///
    /// Returns `None` when the closer is present or when the parser already
    /// captured an error marker at that position, so a malformed construct is
    /// reported once. Argument lists additionally report `","` when the
    /// number of separators does not match the number of arguments.
    pub fn check_closing_delimiter(&self) -> Option<&'static str> {
        match self.kind() {
            NodeKind::ParenthesizedExpr
            | NodeKind::ThrowExpr
            | NodeKind::TraceExpr
            | NodeKind::ImportExpr
            | NodeKind::ReadExpr
            | NodeKind::IfExpr
            | NodeKind::LetExpr
            | NodeKind::StringPart => {
                self.expect_closer(&[SyntaxKind::L_PAREN, SyntaxKind::INTERPOLATION_START], SyntaxKind::R_PAREN, ")")
            }
            NodeKind::SubscriptExpr | NodeKind::SuperSubscriptExpr => {
                self.expect_closer(&[SyntaxKind::L_BRACKET], SyntaxKind::R_BRACKET, "]")
            }
            NodeKind::ArgumentList => {
                let args = self.children().into_iter().filter(|c| c.kind().is_expr()).count();
                let commas = self
                    .terminals()
                    .iter()
                    .filter(|t| t.kind == SyntaxKind::COMMA)
                    .count();
                if args > 0 && commas != args - 1 {
                    return Some(",");
                }
                self.expect_closer(&[SyntaxKind::L_PAREN], SyntaxKind::R_PAREN, ")")
            }
            _ => None,
        }
    }

    fn expect_closer(
        &self,
        openers: &[SyntaxKind],
        closer: SyntaxKind,
        text: &'static str,
    ) -> Option<&'static str> {
        let opened = self.terminals().iter().any(|t| openers.contains(&t.kind));
        if !opened || self.has_terminal(closer) || self.has_error() {
            None
        } else {
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests;
