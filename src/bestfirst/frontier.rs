use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::engine::Score;

use super::tree::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    priority: Score,
    // Older entries win ties, so the heap behaves FIFO among equals.
    seq: Reverse<u64>,
    id: NodeId,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority.cmp(&other.priority).then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

/// Pending nodes, popped highest priority first.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<Entry>,
    pushed: u64,
}

impl Frontier {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, id: NodeId, priority: Score) {
        let seq = Reverse(self.pushed);
        self.pushed += 1;
        self.heap.push(Entry { priority, seq, id });
    }

    pub fn pop(&mut self) -> Option<NodeId> { self.heap.pop().map(|e| e.id) }

    #[inline]
    pub fn len(&self) -> usize { self.heap.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.heap.is_empty() }
}
