use super::super::{circuit_builder::CircuitBuilder, node::*};

/// Returns the constant `node` can be replaced with, if all of its operands are constants.
///
/// Nodes with a signal anywhere below them are never folded, even when short-circuiting would
/// make the value known, so the signals a definition references stay the same.
fn find_replacement(g: &CircuitBuilder, node: &ExprNode) -> Option<ExprNode> {
    let constant = |idx: ExprIndex| g.get(idx).as_constant();
    let value = match *node {
        ExprNode::Constant(_) | ExprNode::Signal(_) => return None,
        ExprNode::Unary { op, operand } => op.apply(constant(operand)?),
        ExprNode::Binary { op, lhs, rhs } => op.apply(constant(lhs)?, constant(rhs)?),
        ExprNode::Select {
            condition,
            then_branch,
            else_branch,
        } => {
            let (then_value, else_value) = (constant(then_branch)?, constant(else_branch)?);
            if constant(condition)? != 0 {
                then_value
            } else {
                else_value
            }
        }
    };
    Some(ExprNode::Constant(value))
}

// Traverses the graph forwards replacing nodes whose value doesn't depend on any signal with constants.
// Children are always created before their parents so a single pass in slot order reaches a fixed point.
pub fn const_folding_pass(g: &mut CircuitBuilder) {
    for idx in g.nodes.keys() {
        let node = *g.get(idx);
        if let Some(replacement) = find_replacement(g, &node) {
            *g.get_mut(idx) = replacement;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::select;

    #[test]
    fn test_constant_trees_fold() {
        let mut g = CircuitBuilder::new();
        let a = g.signal("a");
        let two = g.constant(2);
        let three = g.constant(3);
        let product = g.mul(two, three);
        let negated = g.neg(product);
        let zero = g.constant(0);
        let divided = g.div(negated, zero);
        g.assign(a, divided);

        const_folding_pass(&mut g);
        assert_eq!(g.get(product).as_constant(), Some(6));
        assert_eq!(g.get(negated).as_constant(), Some(-6));
        assert_eq!(g.get(divided).as_constant(), Some(0));
    }

    #[test]
    fn test_signals_stop_folding() {
        let mut g = CircuitBuilder::new();
        let a = g.signal("a");
        let b = g.signal("b");
        g.assign(b, (a + 1) * 2);

        const_folding_pass(&mut g);
        let root = g.get_signal(b).combinational().unwrap();
        assert_eq!(g.get(root).as_constant(), None);
    }

    #[test]
    fn test_signal_references_are_kept() {
        let mut g = CircuitBuilder::new();
        let a = g.signal("a");
        let b = g.signal("b");
        let zero = g.constant(0);
        let one = g.constant(1);
        let reference = g.reference(a);
        let and = g.log_and(zero, reference);
        let or = g.log_or(one, one);
        let chosen = g.select(one, reference, zero);
        g.assign(b, and);

        const_folding_pass(&mut g);
        assert_eq!(g.get(or).as_constant(), Some(1));
        assert_eq!(g.get(and).as_constant(), None);
        assert_eq!(g.get(chosen).as_constant(), None);
        assert!(g.dependency_closure(&[b]).contains(&a));
    }

    #[test]
    fn test_constant_selects_fold() {
        let mut g = CircuitBuilder::new();
        let a = g.signal("a");
        let b = g.signal("b");
        g.assign(a, select(1, 7, 99));
        g.assign(b, select(0, 99, 5));

        const_folding_pass(&mut g);
        let root = g.get_signal(a).combinational().unwrap();
        assert_eq!(g.get(root).as_constant(), Some(7));
        let root = g.get_signal(b).combinational().unwrap();
        assert_eq!(g.get(root).as_constant(), Some(5));
    }
}
