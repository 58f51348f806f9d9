use tree_sitter::Node;

/// Which end of a [`NodeChain`] a search starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Innermost node first, toward the document root.
    Outward,
    /// Document root first, toward the innermost node.
    Inward,
}

/// The named nodes enclosing an offset, outermost first and innermost last.
#[derive(Debug, Clone)]
pub struct NodeChain<'t> {
    nodes: Vec<Node<'t>>,
}

impl<'t> NodeChain<'t> {
    /// Top-down containment descent from `root`.
    ///
    /// At each level the child with `start <= offset < end` wins. When no
    /// child strictly contains the offset, a child ending exactly at it is
    /// taken instead, so a cursor sitting right after a word still lands on
    /// that word.
    pub(crate) fn build(root: Node<'t>, offset: usize) -> Self {
        let mut nodes = vec![root];
        let mut current = root;
        while let Some(next) = child_containing(current, offset) {
            nodes.push(next);
            current = next;
        }
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node<'t>] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn innermost(&self) -> Option<Node<'t>> {
        self.nodes.last().copied()
    }

    /// Node kinds, outermost first. Handy in assertions and logs.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.nodes.iter().map(Node::kind).collect()
    }

    /// The part of the chain strictly inside `ancestor`, outermost first.
    pub fn below(&self, ancestor: Node<'t>) -> &[Node<'t>] {
        match self.nodes.iter().position(|n| n.id() == ancestor.id()) {
            Some(idx) => &self.nodes[idx + 1..],
            None => &[],
        }
    }
}

/// First node in `direction` order for which `predicate` holds.
///
/// The predicate may do arbitrary work per node, including oracle
/// round-trips, and is called at most once per node.
pub fn find_ancestor_where<'t>(
    chain: &NodeChain<'t>,
    direction: Direction,
    mut predicate: impl FnMut(Node<'t>) -> bool,
) -> Option<Node<'t>> {
    match direction {
        Direction::Outward => chain.nodes.iter().rev().copied().find(|n| predicate(*n)),
        Direction::Inward => chain.nodes.iter().copied().find(|n| predicate(*n)),
    }
}

fn child_containing<'t>(node: Node<'t>, offset: usize) -> Option<Node<'t>> {
    let mut touching = None;
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.start_byte() <= offset && offset < child.end_byte() {
            return Some(child);
        }
        if child.end_byte() == offset && child.start_byte() < offset {
            touching = Some(child);
        }
    }
    touching
}
