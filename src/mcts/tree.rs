//! Arena-based search tree.
//!
//! Nodes live in a flat `Vec` and refer to each other by [`NodeId`]. Children
//! are owned by the arena and listed by their parent; the parent index is a
//! plain back-reference used only to walk up during backpropagation. Nodes are
//! appended once and never re-parented, so cycles cannot form.

use super::node::NodeId;

/// Structural access every arena node provides.
pub trait TreeNode {
    fn parent(&self) -> NodeId;
    fn depth(&self) -> u16;
    fn visits(&self) -> u32;
    fn children(&self) -> &[NodeId];
    fn push_child(&mut self, child: NodeId);
    /// Actions not yet expanded into children.
    fn untried_count(&self) -> usize;
}

/// Arena of search nodes rooted at `NodeId(0)`.
#[derive(Clone, Debug)]
pub struct SearchTree<N> {
    nodes: Vec<N>,
    root: NodeId,
}

impl<N: TreeNode> SearchTree<N> {
    /// Create a new tree holding only `root`.
    pub fn new(root: N) -> Self {
        Self::with_capacity(root, 256)
    }

    pub fn with_capacity(root: N, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(root);
        Self {
            nodes,
            root: NodeId::new(0),
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &N {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut N {
        &mut self.nodes[id.0 as usize]
    }

    /// Append `node` and register it as a child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, node: N) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        self.get_mut(parent).push_child(id);
        id
    }

    /// Apply `update` to `from` and every ancestor up to the root.
    ///
    /// Touches exactly the nodes on the path, in leaf-to-root order.
    pub fn update_path(&mut self, from: NodeId, mut update: impl FnMut(&mut N)) {
        let mut current = from;
        while !current.is_none() {
            let node = self.get_mut(current);
            update(&mut *node);
            current = node.parent();
        }
    }

    /// Children of `id` with their ids, in creation order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &N)> {
        self.get(id).children().iter().map(move |&c| (c, self.get(c)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &N)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    #[must_use]
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            node_count: self.nodes.len(),
            max_depth: self.nodes.iter().map(TreeNode::depth).max().unwrap_or(0),
            leaf_count: self.nodes.iter().filter(|n| n.children().is_empty()).count(),
            untried_actions: self.nodes.iter().map(TreeNode::untried_count).sum(),
            root_visits: self.get(self.root).visits(),
        }
    }
}

/// Shape of a tree after a search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub node_count: usize,
    pub max_depth: u16,
    pub leaf_count: usize,
    /// Actions still waiting to be expanded, summed over all nodes.
    pub untried_actions: usize,
    pub root_visits: u32,
}

impl TreeStats {
    /// Average children per interior node.
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        let interior = self.node_count.saturating_sub(self.leaf_count);
        if interior == 0 {
            0.0
        } else {
            (self.node_count - 1) as f64 / interior as f64
        }
    }
}
