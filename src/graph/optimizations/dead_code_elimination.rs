use super::super::{circuit_builder::CircuitBuilder, node::ExprIndex};
use bitvec::prelude::*;

// Traverses the graph backwards from every definition, removing all nodes that weren't reached.
pub fn dead_code_elimination_pass(g: &mut CircuitBuilder) {
    let mut live = bitvec![0; g.nodes.total_len()];

    let mut work: Vec<ExprIndex> = g.signals.iter().flat_map(|s| s.roots()).collect();

    while let Some(idx) = work.pop() {
        if live[idx.idx] {
            continue;
        }
        live.set(idx.idx, true);
        work.extend(g.get(idx).children());
    }

    for idx in g.nodes.keys() {
        if !live[idx.idx] {
            g.nodes.remove(idx);
        }
    }
    // Memoized references can't point to removed nodes.
    g.references.retain(|_, idx| live[idx.idx]);
}
