//! Grammar modules for Pkl parsing
//!
//! This module contains the language-specific parsing logic organized by area:
//! - `module` - module header, imports, classes, members and object bodies
//! - `types` - type annotations (unions, nullable, function and declared types)
//! - `expressions` - the expression precedence chain
//!
//! The parsing functions are generic over [`PklParser`] so the grammar stays
//! independent of how tokens are buffered and how the green tree is built.

pub mod expressions;
pub mod module;
pub mod types;

pub use expressions::{at_expression_start, parse_expression, parse_string_literal};
pub use module::{parse_module, parse_object_body, parse_parameter, parse_parameter_list};
pub use types::{at_type_start, parse_type};

use crate::parser::syntax_kind::SyntaxKind;
use rowan::Checkpoint;

/// Tokens that end an error-recovery run inside delimited constructs.
pub(crate) const RECOVERY_STOP: &[SyntaxKind] = &[
    SyntaxKind::R_PAREN,
    SyntaxKind::R_BRACKET,
    SyntaxKind::R_BRACE,
    SyntaxKind::COMMA,
];

/// Interface between the grammar functions and the main parser.
///
/// All inspection methods look past trivia. Consuming methods attach pending
/// trivia to the node that is open at the time.
pub trait PklParser {
    // Token inspection
    fn current_kind(&self) -> SyntaxKind;
    fn current_text(&self) -> &str;
    fn at_eof(&self) -> bool;

    /// Peek at the kind of the nth significant token ahead
    fn peek_kind(&self, n: usize) -> SyntaxKind;

    /// Whether a line break separates the previous token from the current one
    fn newline_before_current(&self) -> bool;

    fn at(&self, kind: SyntaxKind) -> bool {
        !self.at_eof() && self.current_kind() == kind
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        !self.at_eof() && kinds.contains(&self.current_kind())
    }

    // Position tracking
    fn get_pos(&self) -> usize;

    // Token consumption
    fn bump(&mut self);

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool;

    // Node building
    fn start_node(&mut self, kind: SyntaxKind);
    fn finish_node(&mut self);
    fn checkpoint(&mut self) -> Checkpoint;
    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind);

    // Errors
    fn error(&mut self, message: &str);

    /// Report an error and wrap tokens up to one of `recovery` in an ERROR node.
    /// Always consumes at least one token unless at EOF.
    fn error_recover(&mut self, message: &str, recovery: &[SyntaxKind]);

    /// Close a delimited construct whose closing token is optional.
    ///
    /// Stray tokens on the same line before the closer are captured in an ERROR
    /// node and reported. A missing closer is not reported here; the semantic
    /// layer checks it through the node's closing-delimiter slot.
    fn close_delimited(&mut self, closer: SyntaxKind) {
        if !self.at(closer)
            && !self.at_eof()
            && !self.newline_before_current()
            && !self.at_any(RECOVERY_STOP)
        {
            self.error("unexpected token");
            self.start_node(SyntaxKind::ERROR);
            while !self.at_eof()
                && !self.at(closer)
                && !self.at_any(RECOVERY_STOP)
                && !self.newline_before_current()
            {
                self.bump();
            }
            self.finish_node();
        }
        self.eat(closer);
    }
}
