//! Per-document node arena.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;

use super::node::Terminal;
use super::{Node, NodeKind};
use crate::base::{FileId, LineIndex};
use crate::parser::{self, CstNode, SyntaxError};

/// Index of a node in its document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Arena slot of one AST node.
///
/// Children and terminals are derived from the wrapped syntax node on first
/// access. The cells are initialized at most once; concurrent readers block on
/// the initializing thread rather than allocating duplicate children.
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) syntax: CstNode,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: OnceCell<Box<[NodeId]>>,
    pub(crate) terminals: OnceCell<Box<[Terminal]>>,
}

impl NodeData {
    fn new(kind: NodeKind, syntax: CstNode, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            syntax,
            parent,
            children: OnceCell::new(),
            terminals: OnceCell::new(),
        }
    }
}

/// One parsed source file and the AST built over it.
///
/// A document is immutable apart from its lazily grown node arena. Edits
/// produce a new `Document`; nodes of the old one stay valid for whoever
/// still holds them but are never mixed with nodes of the new one.
pub struct Document {
    file: FileId,
    uri: String,
    version: i32,
    text: String,
    errors: Vec<SyntaxError>,
    line_index: LineIndex,
    nodes: RwLock<Vec<Arc<NodeData>>>,
}

impl Document {
    /// Parse `text` and create the document with only its root node built.
    pub fn new(file: FileId, uri: impl Into<String>, version: i32, text: impl Into<String>) -> Arc<Self> {
        let text = text.into();
        let parse = parser::parse(&text);
        let root = NodeData::new(NodeKind::Module, CstNode::new_root(parse.green), None);
        Arc::new(Self {
            file,
            uri: uri.into(),
            version,
            line_index: LineIndex::new(&text),
            text,
            errors: parse.errors,
            nodes: RwLock::new(vec![Arc::new(root)]),
        })
    }

    pub fn root(self: &Arc<Self>) -> Node {
        Node::new(self.clone(), NodeId::ROOT)
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Syntax errors reported by the parser
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Number of nodes materialized so far
    pub fn node_count(&self) -> usize {
        self.nodes.read().len()
    }

    pub(crate) fn data(&self, id: NodeId) -> Arc<NodeData> {
        self.nodes.read()[id.index()].clone()
    }

    /// Build the AST children of `parent` from its syntax node.
    pub(crate) fn alloc_children(&self, parent: NodeId, syntax: &CstNode) -> Box<[NodeId]> {
        let pending: Vec<_> = syntax
            .child_nodes()
            .filter_map(|cst| Some(NodeData::new(NodeKind::from_syntax(cst.kind())?, cst, Some(parent))))
            .collect();

        let mut nodes = self.nodes.write();
        pending
            .into_iter()
            .map(|data| {
                let id = NodeId(nodes.len() as u32);
                nodes.push(Arc::new(data));
                id
            })
            .collect()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("file", &self.file)
            .field("uri", &self.uri)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
