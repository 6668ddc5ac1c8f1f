use crate::engine::{Board, Move, Score};

/// Priority given to the root; it is never compared against a sibling.
pub const ROOT_PRIORITY: Score = 1;

/// Index of a node inside its [`SearchTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize { self.0 as usize }
}

/// One explored board state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchNode {
    pub board: Board,
    pub parent: Option<NodeId>,
    pub depth: u32,
    /// Direction applied to the parent; `None` only for the root.
    pub mv: Option<Move>,
    /// Immediate merge score of `mv`.
    pub priority: Score,
    pub prop_score: f64,
    pub highest_from_child: f64,
    pub average_from_child: f64,
    /// Accepted children only.
    pub child_count: u32,
}

impl SearchNode {
    pub fn root(board: Board) -> Self {
        SearchNode {
            board,
            parent: None,
            depth: 0,
            mv: None,
            priority: ROOT_PRIORITY,
            prop_score: ROOT_PRIORITY as f64,
            highest_from_child: 0.0,
            average_from_child: 0.0,
            child_count: 0,
        }
    }

    /// Candidate child of `self` (stored at `id`) for `mv`, before the move runs.
    ///
    /// The board is still the parent's copy; the caller applies the move.
    pub fn candidate(&self, id: NodeId, mv: Move) -> Self {
        SearchNode {
            parent: Some(id),
            depth: self.depth + 1,
            mv: Some(mv),
            highest_from_child: 0.0,
            average_from_child: 0.0,
            child_count: 0,
            ..*self
        }
    }
}

/// Arena owning every accepted node of one search.
///
/// Nodes are never removed; dropping the tree releases all of them at once.
#[derive(Debug, Clone, Default)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    pub fn with_root(board: Board) -> (Self, NodeId) {
        let mut tree = SearchTree { nodes: Vec::with_capacity(256) };
        let root = tree.insert(SearchNode::root(board));
        (tree, root)
    }

    pub fn insert(&mut self, node: SearchNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode { &self.nodes[id.index()] }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode { &mut self.nodes[id.index()] }

    #[inline]
    pub fn root(&self) -> NodeId { NodeId(0) }

    #[inline]
    pub fn len(&self) -> usize { self.nodes.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SearchNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i as u32), n))
    }

    /// Accepted children of `id`, in the order they were created.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &SearchNode)> {
        self.iter().filter(move |(_, n)| n.parent == Some(id))
    }

    /// The depth-1 node on the path from the root to `id`.
    pub fn first_move_ancestor(&self, mut id: NodeId) -> Option<NodeId> {
        loop {
            let node = self.get(id);
            match node.depth {
                0 => return None,
                1 => return Some(id),
                _ => id = node.parent?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_resets_aggregates() {
        let (mut tree, root) = SearchTree::with_root(Board::from_raw(0x1100));
        {
            let r = tree.get_mut(root);
            r.child_count = 3;
            r.highest_from_child = 7.0;
            r.average_from_child = 2.5;
        }
        let c = tree.get(root).candidate(root, Move::Left);
        assert_eq!(c.parent, Some(root));
        assert_eq!(c.depth, 1);
        assert_eq!(c.mv, Some(Move::Left));
        assert_eq!(c.child_count, 0);
        assert_eq!(c.highest_from_child, 0.0);
        assert_eq!(c.average_from_child, 0.0);
        assert_eq!(c.board, Board::from_raw(0x1100));
    }

    #[test]
    fn first_move_ancestor_walks_to_depth_one() {
        let (mut tree, root) = SearchTree::with_root(Board::EMPTY);
        let a = tree.insert(tree.get(root).candidate(root, Move::Up));
        let b = tree.insert(tree.get(a).candidate(a, Move::Left));
        let c = tree.insert(tree.get(b).candidate(b, Move::Down));
        assert_eq!(tree.first_move_ancestor(c), Some(a));
        assert_eq!(tree.first_move_ancestor(a), Some(a));
        assert_eq!(tree.first_move_ancestor(root), None);
        assert_eq!(tree.children(root).count(), 1);
        assert_eq!(tree.len(), 4);
    }
}
