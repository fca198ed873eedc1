use super::rect::Rect;
use crate::text::char_len;

/// Handle to a node in a [`TextTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Element { tag: String },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    rect: Rect,
}

/// A minimal document tree of element and text nodes, the shape a host
/// renders manuscript content into.
///
/// Text is extracted in pre-order over text nodes, the same order the
/// renderer emits segments in, so offsets computed against this tree line up
/// with offsets into the manuscript content.
#[derive(Debug, Clone)]
pub struct TextTree {
    nodes: Vec<Node>,
}

impl TextTree {
    /// Create a tree holding a single root element.
    pub fn new(root_tag: &str) -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Element {
                    tag: root_tag.to_string(),
                },
                parent: None,
                children: Vec::new(),
                rect: Rect::default(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append an element as the last child of `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        self.push(
            parent,
            NodeKind::Element {
                tag: tag.to_string(),
            },
        )
    }

    /// Append a text node as the last child of `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        debug_assert!(!self.is_text(parent), "text nodes cannot have children");
        self.push(parent, NodeKind::Text(text.to_string()))
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            rect: Rect::default(),
        });
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(id);
        }
        id
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Text of a text node; `None` for elements.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match self.nodes.get(node.0).map(|n| &n.kind) {
            Some(NodeKind::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Tag of an element; `None` for text nodes.
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match self.nodes.get(node.0).map(|n| &n.kind) {
            Some(NodeKind::Element { tag }) => Some(tag),
            _ => None,
        }
    }

    pub fn is_text(&self, node: NodeId) -> bool {
        self.text(node).is_some()
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.rect = rect;
        }
    }

    pub fn rect(&self, node: NodeId) -> Rect {
        self.nodes.get(node.0).map(|n| n.rect).unwrap_or_default()
    }

    /// Inclusive containment: a node contains itself.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|a| a == ancestor)
    }

    /// `node` followed by each of its ancestors up to the tree root.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let start = self.nodes.get(node.0).map(|_| node);
        std::iter::successors(start, move |&n| self.parent(n))
    }

    /// Nodes of the subtree rooted at `root`, in pre-order.
    pub fn preorder(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.nodes.get(root.0).is_none() {
            return out;
        }
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev());
        }
        out
    }

    /// Concatenated text of every text node under `node`.
    pub fn text_content(&self, node: NodeId) -> String {
        self.preorder(node)
            .into_iter()
            .filter_map(|n| self.text(n))
            .collect()
    }

    fn text_len(&self, node: NodeId) -> usize {
        self.preorder(node)
            .into_iter()
            .filter_map(|n| self.text(n))
            .map(char_len)
            .sum()
    }

    /// Number of characters between the start of `root` and `boundary`.
    ///
    /// `None` when the boundary lies outside `root`.
    pub fn text_offset(&self, root: NodeId, boundary: Boundary) -> Option<usize> {
        if !self.contains(root, boundary.node) {
            return None;
        }

        let mut before = 0;
        for node in self.preorder(root) {
            if node == boundary.node {
                break;
            }
            if let Some(text) = self.text(node) {
                before += char_len(text);
            }
        }

        let local = match self.text(boundary.node) {
            Some(text) => boundary.offset.min(char_len(text)),
            None => {
                let children = self.children(boundary.node);
                let upto = boundary.offset.min(children.len());
                children[..upto].iter().map(|&c| self.text_len(c)).sum()
            }
        };

        Some(before + local)
    }
}

/// A point in the tree, with DOM range semantics: a char offset inside a text
/// node, or a child index inside an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub node: NodeId,
    pub offset: usize,
}

impl Boundary {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// `<article><h1>Title</h1><div root><p>The quick </p><mark>brown</mark> fox</div></article>`
    fn sample_tree() -> (TextTree, NodeId, [NodeId; 4]) {
        let mut tree = TextTree::new("article");
        let article = tree.root();
        let h1 = tree.append_element(article, "h1");
        let title = tree.append_text(h1, "Title");
        let root = tree.append_element(article, "div");
        let p = tree.append_element(root, "p");
        let quick = tree.append_text(p, "The quick ");
        let mark = tree.append_element(root, "mark");
        let brown = tree.append_text(mark, "brown");
        let fox = tree.append_text(root, " fox");
        (tree, root, [title, quick, brown, fox])
    }

    #[test]
    fn text_content_is_preorder() {
        let (tree, root, _) = sample_tree();
        assert_eq!(tree.text_content(root), "The quick brown fox");
        assert_eq!(tree.text_content(tree.root()), "TitleThe quick brown fox");
    }

    #[test]
    fn text_offset_inside_text_nodes() {
        let (tree, root, [_, quick, brown, fox]) = sample_tree();
        assert_eq!(tree.text_offset(root, Boundary::new(quick, 4)), Some(4));
        assert_eq!(tree.text_offset(root, Boundary::new(brown, 0)), Some(10));
        assert_eq!(tree.text_offset(root, Boundary::new(fox, 4)), Some(19));
    }

    #[test]
    fn text_offset_clamps_past_node_end() {
        let (tree, root, [_, quick, ..]) = sample_tree();
        assert_eq!(tree.text_offset(root, Boundary::new(quick, 99)), Some(10));
    }

    #[test]
    fn text_offset_at_element_child_index() {
        let (tree, root, _) = sample_tree();
        assert_eq!(tree.text_offset(root, Boundary::new(root, 0)), Some(0));
        assert_eq!(tree.text_offset(root, Boundary::new(root, 2)), Some(15));
        assert_eq!(tree.text_offset(root, Boundary::new(root, 3)), Some(19));
    }

    #[test]
    fn text_offset_outside_root_is_none() {
        let (tree, root, [title, ..]) = sample_tree();
        assert_eq!(tree.text_offset(root, Boundary::new(title, 1)), None);
    }

    #[test]
    fn contains_is_inclusive() {
        let (tree, root, [title, quick, ..]) = sample_tree();
        assert!(tree.contains(root, root));
        assert!(tree.contains(root, quick));
        assert!(!tree.contains(root, title));
        assert!(tree.contains(tree.root(), title));
    }
}
