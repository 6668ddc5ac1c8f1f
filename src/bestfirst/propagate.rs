use super::select::DirectionScores;
use super::tree::{NodeId, SearchTree};
use super::{BestFirstConfig, Propagation};

/// Push the score of a freshly accepted node up to its depth-1 ancestor.
///
/// Every ancestor strictly above `node` and below the root folds in the score
/// of the child on the path. The depth-1 ancestor's resulting `prop_score`
/// then overwrites the accumulator for its move. The root is never touched.
pub fn propagate(tree: &mut SearchTree, node: NodeId, cfg: &BestFirstConfig, scores: &mut DirectionScores) {
    let mut from = node;
    loop {
        let child = *tree.get(from);
        if child.depth <= 1 {
            break;
        }
        let Some(to) = child.parent else { break };
        let parent = tree.get_mut(to);
        match cfg.propagation {
            Propagation::Max => {
                if child.prop_score > parent.highest_from_child {
                    parent.prop_score -= parent.highest_from_child;
                    parent.highest_from_child = child.prop_score;
                    parent.prop_score += parent.highest_from_child;
                }
            }
            Propagation::Average => {
                parent.prop_score -= parent.average_from_child;
                parent.average_from_child =
                    cfg.average_rule.update(parent.average_from_child, child.prop_score, parent.child_count);
                parent.prop_score += parent.average_from_child;
            }
        }
        from = to;
    }

    let top = tree.get(from);
    if top.depth == 1 {
        if let Some(mv) = top.mv {
            scores.record(mv, top.prop_score);
        }
    }
}
