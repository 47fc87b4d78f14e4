//! Internal-consistency errors of the AST layer.

use thiserror::Error;

use super::NodeKind;
use crate::base::TextRange;

/// A grammar rule produced a node without a slot the AST requires.
///
/// These indicate a mismatch between the parser and the AST model rather than
/// a user error. Analysis recovers by skipping the offending subtree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AstError {
    /// A required child node is absent.
    #[error("{kind:?} at {range:?} is missing required child `{slot}`")]
    MissingChild {
        kind: NodeKind,
        slot: &'static str,
        range: TextRange,
    },

    /// A required terminal token is absent.
    #[error("{kind:?} at {range:?} is missing required terminal `{terminal}`")]
    MissingTerminal {
        kind: NodeKind,
        terminal: &'static str,
        range: TextRange,
    },
}

impl AstError {
    /// Source range of the node that violated the invariant.
    pub fn range(&self) -> TextRange {
        match self {
            Self::MissingChild { range, .. } | Self::MissingTerminal { range, .. } => *range,
        }
    }
}
