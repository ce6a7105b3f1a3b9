use super::handles::{Signal, SignalIndex};
use super::node::{ExprIndex, ExprNode};
use crate::data_structures::DoubleStack;
use bitvec::prelude::*;
use indexmap::IndexSet;

/// Read access to signals and the expression nodes their definitions are made of.
///
/// Implemented by both [super::CircuitBuilder] and [super::Circuit] so they share
/// [dependency_closure].
pub(super) trait SignalGraph {
    fn node(&self, idx: ExprIndex) -> &ExprNode;
    fn signal_at(&self, idx: SignalIndex) -> &Signal;
    /// Upper bound of every [ExprIndex] in the graph.
    fn node_slots(&self) -> usize;
}

/// Returns `targets` and every signal referenced, directly or transitively, by the definitions of
/// the signals in the set.
///
/// Both combinational and registered definitions are followed. The result is the smallest set
/// containing `targets` that is closed under "referenced by the definition of a member".
/// Members are ordered by discovery, targets first.
pub(super) fn dependency_closure<G: SignalGraph + ?Sized>(
    g: &G,
    targets: &[SignalIndex],
) -> IndexSet<SignalIndex> {
    let mut closure: IndexSet<SignalIndex> = targets.iter().copied().collect();
    let mut frontier: DoubleStack<SignalIndex> = closure.iter().copied().collect();
    let mut visited = bitvec![0; g.node_slots()];
    let mut work = Vec::new();

    // Every round expands the signals discovered in the previous one, until none are new.
    loop {
        while let Some(signal) = frontier.pop() {
            work.extend(g.signal_at(signal).roots());

            while let Some(idx) = work.pop() {
                if visited[idx.idx] {
                    continue;
                }
                visited.set(idx.idx, true);

                let node = g.node(idx);
                if let ExprNode::Signal(referenced) = *node {
                    if closure.insert(referenced) {
                        frontier.push(referenced);
                    }
                }
                work.extend(node.children());
            }
        }
        if !frontier.next_round() {
            break;
        }
    }
    closure
}
