//! Cheap, clonable handles to arena nodes.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use smol_str::SmolStr;

use super::document::{Document, NodeData, NodeId};
use super::{AstError, NodeKind};
use crate::base::{FileId, Span, TextRange, TextSize};
use crate::parser::{CstNode, CstToken, SyntaxKind};

/// A non-trivia token directly under a node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Terminal {
    pub kind: SyntaxKind,
    pub text: SmolStr,
    pub range: TextRange,
}

impl Terminal {
    /// Identifier text with surrounding backticks removed
    pub fn name(&self) -> SmolStr {
        let text = self.text.as_str();
        if text.len() > 1 && text.starts_with('`') && text.ends_with('`') {
            SmolStr::new(&text[1..text.len() - 1])
        } else {
            self.text.clone()
        }
    }
}

impl From<CstToken> for Terminal {
    fn from(token: CstToken) -> Self {
        Self {
            kind: token.kind,
            text: token.text,
            range: token.range,
        }
    }
}

/// Handle to one AST node.
///
/// Equality and hashing are by identity: two handles are equal when they point
/// at the same slot of the same document.
#[derive(Clone)]
pub struct Node {
    doc: Arc<Document>,
    id: NodeId,
    data: Arc<NodeData>,
}

impl Node {
    pub(crate) fn new(doc: Arc<Document>, id: NodeId) -> Self {
        let data = doc.data(id);
        Self { doc, id, data }
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &Arc<Document> {
        &self.doc
    }

    pub fn file(&self) -> FileId {
        self.doc.file()
    }

    pub fn syntax(&self) -> &CstNode {
        &self.data.syntax
    }

    pub fn range(&self) -> TextRange {
        self.data.syntax.range()
    }

    /// Line/column span for protocol consumers
    pub fn span(&self) -> Span {
        self.doc.line_index().span(self.range())
    }

    pub fn text(&self) -> String {
        self.data.syntax.text()
    }

    pub fn parent(&self) -> Option<Node> {
        self.data.parent.map(|id| Node::new(self.doc.clone(), id))
    }

    /// Strict ancestors, innermost first
    pub fn ancestors(&self) -> impl Iterator<Item = Node> {
        std::iter::successors(self.parent(), Node::parent)
    }

    /// AST children in source order. Error nodes of the parse are skipped.
    pub fn children(&self) -> Vec<Node> {
        let ids = self
            .data
            .children
            .get_or_init(|| self.doc.alloc_children(self.id, &self.data.syntax));
        ids.iter().map(|id| Node::new(self.doc.clone(), *id)).collect()
    }

    /// Non-trivia tokens directly under this node
    pub fn terminals(&self) -> &[Terminal] {
        self.data.terminals.get_or_init(|| {
            self.data
                .syntax
                .tokens()
                .filter(|t| !t.kind.is_trivia())
                .map(Terminal::from)
                .collect()
        })
    }

    pub fn terminal(&self, kind: SyntaxKind) -> Option<&Terminal> {
        self.terminals().iter().find(|t| t.kind == kind)
    }

    pub fn has_terminal(&self, kind: SyntaxKind) -> bool {
        self.terminal(kind).is_some()
    }

    /// The identifier terminal, which most declarations require
    pub fn identifier(&self) -> Result<&Terminal, AstError> {
        self.terminal(SyntaxKind::IDENT)
            .ok_or_else(|| self.missing_terminal("identifier"))
    }

    pub fn child_of_kind(&self, kind: NodeKind) -> Option<Node> {
        self.children().into_iter().find(|c| c.kind() == kind)
    }

    pub fn children_of_kind(&self, kind: NodeKind) -> Vec<Node> {
        self.children()
            .into_iter()
            .filter(|c| c.kind() == kind)
            .collect()
    }

    /// Whether the parser captured an error marker directly under this node
    pub fn has_error(&self) -> bool {
        self.data.syntax.has_error()
    }

    /// This node and all descendants, pre-order
    pub fn descendants(&self) -> Vec<Node> {
        let mut out = Vec::new();
        let mut stack = vec![self.clone()];
        while let Some(node) = stack.pop() {
            let mut children = node.children();
            children.reverse();
            stack.extend(children);
            out.push(node);
        }
        out
    }

    /// Deepest node whose range contains `offset`, ends included
    pub fn node_at_offset(&self, offset: TextSize) -> Option<Node> {
        if !self.range().contains_inclusive(offset) {
            return None;
        }
        let mut current = self.clone();
        'descend: loop {
            for child in current.children() {
                if child.range().contains_inclusive(offset) {
                    current = child;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }

    /// `///` comments directly preceding this node
    pub fn doc_comment(&self) -> Option<String> {
        let parent = self.parent()?;
        parent.syntax().doc_comment_before(self.range().start())
    }

    pub(crate) fn missing_child(&self, slot: &'static str) -> AstError {
        AstError::MissingChild {
            kind: self.kind(),
            slot,
            range: self.range(),
        }
    }

    pub(crate) fn missing_terminal(&self, terminal: &'static str) -> AstError {
        AstError::MissingTerminal {
            kind: self.kind(),
            terminal,
            range: self.range(),
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.doc, &other.doc)
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.doc.file().hash(state);
        self.id.hash(state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?} in {}", self.kind(), self.range(), self.doc.file())
    }
}
