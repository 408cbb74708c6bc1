//! Compact syntax tree consumed by the binding resolver.
//!
//! The swc AST is lowered into a flat arena of [`Node`]s. Only the node kinds
//! the resolver inspects get their own variant; everything else is either
//! dropped (if it contains nothing interesting) or kept as an
//! [`NodeKind::Opaque`] container so that nested scopes and calls keep their
//! place in the tree.
//!
//! Nodes are stored in pre-order, so a smaller [`NodeId`] always means "starts
//! earlier in the source" and iterating `0..len` is a stable source-order
//! traversal.

use crate::core::SourceSpan;

/// Index of a node inside its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Function,
    Block,
}

/// One property of an object destructuring pattern.
///
/// `{ t }` and `{ t = fallback }` have `key == local == "t"`;
/// `{ t: translate }` has `key == "t"` and `local == "translate"`.
/// `local` is `None` when the value is itself a nested pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternProp {
    pub key: String,
    pub local: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A lexical scope. `params` are the names bound by function or catch
    /// parameters.
    Scope { kind: ScopeKind, params: Vec<String> },
    /// `target = init` inside a `const`/`let`/`var` declaration. `init` is set
    /// only when the initializer is a call, possibly behind `await` or parens.
    VarDecl {
        target: NodeId,
        init: Option<NodeId>,
    },
    Call { callee: NodeId, args: Vec<NodeId> },
    Ident(String),
    StringLit(String),
    ObjectPattern(Vec<PatternProp>),
    /// Any other expression or pattern.
    Opaque,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub span: SourceSpan,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// A parsed source file.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub(crate) nodes: Vec<Node>,
}

impl SyntaxTree {
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids in source order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Parents of `id`, nearest first (not including `id` itself).
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.nodes[id.0].parent, move |p| self.nodes[p.0].parent)
    }

    /// The nearest scope enclosing `id` (or `id` itself if it is the root).
    pub fn enclosing_scope(&self, id: NodeId) -> NodeId {
        self.ancestors(id)
            .find(|a| self.is_scope(*a))
            .unwrap_or_else(|| self.root())
    }

    /// Scopes enclosing `id`, innermost first.
    pub fn enclosing_scopes(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.ancestors(id).filter(|a| self.is_scope(*a))
    }

    pub fn is_scope(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Scope { .. })
    }

    /// Whether `ancestor` is `id` or one of its parents.
    pub fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        ancestor == id || self.ancestors(id).any(|a| a == ancestor)
    }

    /// Name of an [`NodeKind::Ident`] node.
    pub fn ident_name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// Value of a [`NodeKind::StringLit`] node.
    pub fn string_value(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::StringLit(value) => Some(value),
            _ => None,
        }
    }
}

/// Incrementally builds a [`SyntaxTree`] in pre-order.
#[derive(Debug, Default)]
pub(crate) struct TreeBuilder {
    nodes: Vec<Node>,
    open: Vec<NodeId>,
}

impl TreeBuilder {
    /// Append a node as the last child of the innermost open node.
    pub fn push(&mut self, kind: NodeKind, span: SourceSpan) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = self.open.last().copied();
        self.nodes.push(Node {
            kind,
            span,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    /// Append a node and make it the parent of subsequently pushed nodes.
    pub fn open(&mut self, kind: NodeKind, span: SourceSpan) -> NodeId {
        let id = self.push(kind, span);
        self.open.push(id);
        id
    }

    pub fn close(&mut self) {
        self.open.pop();
    }

    /// Replace the kind of a node after its children are known.
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id.0].kind = kind;
    }

    /// Number of nodes pushed so far; the id the next node will get.
    pub fn next_id(&self) -> NodeId {
        NodeId(self.nodes.len())
    }

    /// Drop an opaque node that ended up without children.
    ///
    /// Only valid for the most recently pushed node.
    pub fn discard_if_empty(&mut self, id: NodeId) {
        let is_last = id.0 + 1 == self.nodes.len();
        let node = &self.nodes[id.0];
        if is_last && node.children.is_empty() && matches!(node.kind, NodeKind::Opaque) {
            if let Some(parent) = node.parent {
                self.nodes[parent.0].children.pop();
            }
            self.nodes.pop();
        }
    }

    pub fn finish(self) -> SyntaxTree {
        SyntaxTree { nodes: self.nodes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> SourceSpan {
        SourceSpan::default()
    }

    fn sample() -> SyntaxTree {
        let mut b = TreeBuilder::default();
        b.open(
            NodeKind::Scope {
                kind: ScopeKind::Module,
                params: vec![],
            },
            span(),
        );
        b.open(
            NodeKind::Scope {
                kind: ScopeKind::Block,
                params: vec![],
            },
            span(),
        );
        b.push(NodeKind::Ident("t".to_string()), span());
        b.close();
        b.push(NodeKind::StringLit("x".to_string()), span());
        b.close();
        b.finish()
    }

    #[test]
    fn test_builder_links_parents_and_children() {
        let tree = sample();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.node(tree.root()).children, vec![NodeId(1), NodeId(3)]);
        assert_eq!(tree.node(NodeId(2)).parent, Some(NodeId(1)));
        assert_eq!(tree.ident_name(NodeId(2)), Some("t"));
        assert_eq!(tree.string_value(NodeId(3)), Some("x"));
    }

    #[test]
    fn test_enclosing_scope() {
        let tree = sample();
        assert_eq!(tree.enclosing_scope(NodeId(2)), NodeId(1));
        assert_eq!(tree.enclosing_scope(NodeId(3)), NodeId(0));
        assert_eq!(tree.enclosing_scope(tree.root()), NodeId(0));
        let scopes: Vec<_> = tree.enclosing_scopes(NodeId(2)).collect();
        assert_eq!(scopes, vec![NodeId(1), NodeId(0)]);
    }

    #[test]
    fn test_contains() {
        let tree = sample();
        assert!(tree.contains(NodeId(1), NodeId(2)));
        assert!(tree.contains(NodeId(0), NodeId(2)));
        assert!(!tree.contains(NodeId(1), NodeId(3)));
    }

    #[test]
    fn test_discard_if_empty() {
        let mut b = TreeBuilder::default();
        b.open(
            NodeKind::Scope {
                kind: ScopeKind::Module,
                params: vec![],
            },
            span(),
        );
        let opaque = b.open(NodeKind::Opaque, span());
        b.close();
        b.discard_if_empty(opaque);
        b.close();
        let tree = b.finish();
        assert_eq!(tree.len(), 1);
        assert!(tree.node(tree.root()).children.is_empty());
    }
}
