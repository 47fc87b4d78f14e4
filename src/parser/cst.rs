//! Thread-safe view over the green tree
//!
//! `rowan` red nodes are `!Send`, so the semantic layer wraps green nodes
//! together with their absolute offset instead. Green nodes are immutable and
//! reference counted, which makes `CstNode` cheap to clone and share.

use rowan::{GreenNode, NodeOrToken, TextRange, TextSize};
use smol_str::SmolStr;

use super::syntax_kind::SyntaxKind;

/// A composite node of the concrete syntax tree at a known position
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CstNode {
    green: GreenNode,
    offset: TextSize,
}

/// A token of the concrete syntax tree at a known position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CstToken {
    pub kind: SyntaxKind,
    pub text: SmolStr,
    pub range: TextRange,
}

pub type CstElement = NodeOrToken<CstNode, CstToken>;

impl CstNode {
    pub fn new_root(green: GreenNode) -> Self {
        Self {
            green,
            offset: TextSize::new(0),
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.green.kind().into()
    }

    pub fn range(&self) -> TextRange {
        TextRange::at(self.offset, self.green.text_len())
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// Direct children, nodes and tokens, with absolute positions
    pub fn elements(&self) -> impl Iterator<Item = CstElement> + '_ {
        let mut offset = self.offset;
        self.green.children().map(move |child| {
            let start = offset;
            offset += child.text_len();
            match child {
                NodeOrToken::Node(node) => NodeOrToken::Node(CstNode {
                    green: node.to_owned(),
                    offset: start,
                }),
                NodeOrToken::Token(token) => NodeOrToken::Token(CstToken {
                    kind: token.kind().into(),
                    text: SmolStr::new(token.text()),
                    range: TextRange::at(start, token.text_len()),
                }),
            }
        })
    }

    /// Direct child nodes, in source order
    pub fn child_nodes(&self) -> impl Iterator<Item = CstNode> + '_ {
        self.elements().filter_map(NodeOrToken::into_node)
    }

    /// Direct child tokens, trivia included
    pub fn tokens(&self) -> impl Iterator<Item = CstToken> + '_ {
        self.elements().filter_map(NodeOrToken::into_token)
    }

    /// First direct token of `kind`
    pub fn token(&self, kind: SyntaxKind) -> Option<CstToken> {
        self.tokens().find(|t| t.kind == kind)
    }

    /// Whether the parser captured an error marker directly under this node
    pub fn has_error(&self) -> bool {
        self.green
            .children()
            .any(|c| c.as_node().is_some_and(|n| SyntaxKind::from(n.kind()) == SyntaxKind::ERROR))
    }

    pub fn text(&self) -> String {
        self.green.to_string()
    }

    /// Text of the `///` comment block directly preceding the child starting at `offset`
    pub fn doc_comment_before(&self, offset: TextSize) -> Option<String> {
        let preceding: Vec<_> = self
            .elements()
            .take_while(|e| element_range(e).start() < offset)
            .collect();

        let mut lines = Vec::new();
        for element in preceding.iter().rev() {
            match element {
                NodeOrToken::Token(t) if t.kind == SyntaxKind::DOC_COMMENT => {
                    lines.push(t.text.trim_start_matches("///").trim().to_string());
                }
                NodeOrToken::Token(t) if t.kind.is_trivia() => {}
                _ => break,
            }
        }
        if lines.is_empty() {
            return None;
        }
        lines.reverse();
        Some(lines.join("\n"))
    }
}

fn element_range(element: &CstElement) -> TextRange {
    match element {
        NodeOrToken::Node(n) => n.range(),
        NodeOrToken::Token(t) => t.range,
    }
}

impl std::fmt::Debug for CstNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}@{:?}", self.kind(), self.range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_child_offsets_match_red_tree() {
        let parse = parse("foo = 1\nbar { baz = 2 }\n");
        let root = CstNode::new_root(parse.green.clone());
        let red: Vec<_> = parse
            .syntax()
            .children()
            .map(|n| (n.kind(), n.text_range()))
            .collect();
        let ours: Vec<_> = root.child_nodes().map(|n| (n.kind(), n.range())).collect();
        assert_eq!(ours, red);
    }

    #[test]
    fn test_doc_comment_before_member() {
        let parse = parse("/// First\n/// Second\nfoo = 1\n// not docs\nbar = 2");
        let root = CstNode::new_root(parse.green.clone());
        let members: Vec<_> = root.child_nodes().collect();
        assert_eq!(
            root.doc_comment_before(members[0].range().start()).as_deref(),
            Some("First\nSecond")
        );
        assert_eq!(root.doc_comment_before(members[1].range().start()), None);
    }

    #[test]
    fn test_has_error_is_direct_only() {
        let parse = parse("x = (1 2)");
        let root = CstNode::new_root(parse.green.clone());
        assert!(!root.has_error());
        let paren = root
            .child_nodes()
            .flat_map(|n| n.child_nodes().collect::<Vec<_>>())
            .find(|n| n.kind() == SyntaxKind::PARENTHESIZED_EXPR);
        assert!(paren.is_some_and(|n| n.has_error()));
    }
}
