use super::circuit_builder::CircuitBuilder;
use super::handles::SignalIndex;
use super::node::{BinaryOp, ExprIndex, UnaryOp};
use std::ops;

/// Anything that can become a node of a [CircuitBuilder].
///
/// Implemented for existing nodes ([ExprIndex]), signals ([SignalIndex]), integer constants and
/// fluent [Expr] trees.
pub trait IntoExpr {
    /// Returns the [ExprIndex] of the node representing `self` in `g`, creating it if needed.
    fn into_expr(self, g: &mut CircuitBuilder) -> ExprIndex;
}

impl IntoExpr for ExprIndex {
    fn into_expr(self, _: &mut CircuitBuilder) -> ExprIndex {
        self
    }
}

impl IntoExpr for SignalIndex {
    fn into_expr(self, g: &mut CircuitBuilder) -> ExprIndex {
        g.reference(self)
    }
}

impl IntoExpr for i64 {
    fn into_expr(self, g: &mut CircuitBuilder) -> ExprIndex {
        g.constant(self)
    }
}

impl IntoExpr for Expr {
    fn into_expr(self, g: &mut CircuitBuilder) -> ExprIndex {
        match self {
            Expr::Constant(v) => g.constant(v),
            Expr::Signal(signal) => g.reference(signal),
            Expr::Node(idx) => idx,
            Expr::Unary(op, operand) => {
                let operand = operand.into_expr(g);
                g.unary(op, operand)
            }
            Expr::Binary(op, lhs, rhs) => {
                let lhs = lhs.into_expr(g);
                let rhs = rhs.into_expr(g);
                g.binary(op, lhs, rhs)
            }
            Expr::Select(condition, then_branch, else_branch) => {
                let condition = condition.into_expr(g);
                let then_branch = then_branch.into_expr(g);
                let else_branch = else_branch.into_expr(g);
                g.select(condition, then_branch, else_branch)
            }
        }
    }
}

/// Owned expression tree, the ergonomic way of describing definitions.
///
/// Built with the usual operators between [Expr], [SignalIndex] and integers, and lowered into a
/// [CircuitBuilder] by [IntoExpr]. `!` is bitwise not, like it is for integers,
/// logical not is [Expr::logical_not].
///
/// # Example
/// ```
/// # use wires::{CircuitBuilder, Expr, select};
/// let mut g = CircuitBuilder::new();
/// let a = g.signal_with_initial("a", 6);
/// let b = g.signal_with_initial("b", 4);
/// let max = g.signal("max");
/// let mix = g.signal("mix");
///
/// g.assign(max, select(Expr::from(a).greater(b), a, b));
/// g.assign(mix, (a + b) * 2 - (!Expr::from(a) & 0xff));
///
/// let c = &mut g.init();
/// let h = c.simulate(&[max, mix], 1, true).unwrap();
/// assert_eq!(h["max"], vec![6]);
/// assert_eq!(h["mix"], vec![20 - (!6 & 0xff)]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Constant(i64),
    Signal(SignalIndex),
    /// An already existing node, reusing it shares the subgraph.
    Node(ExprIndex),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Select(Box<Expr>, Box<Expr>, Box<Expr>),
}

/// Returns `then_branch` if `condition` is not 0 and `else_branch` otherwise.
///
/// Only the chosen branch is evaluated.
pub fn select<C: Into<Expr>, T: Into<Expr>, E: Into<Expr>>(
    condition: C,
    then_branch: T,
    else_branch: E,
) -> Expr {
    Expr::Select(
        Box::new(condition.into()),
        Box::new(then_branch.into()),
        Box::new(else_branch.into()),
    )
}

impl Expr {
    pub fn unary(op: UnaryOp, operand: impl Into<Expr>) -> Expr {
        Expr::Unary(op, Box::new(operand.into()))
    }

    pub fn binary(op: BinaryOp, lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        Expr::Binary(op, Box::new(lhs.into()), Box::new(rhs.into()))
    }

    pub fn equal(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Eq, self, rhs)
    }

    pub fn not_equal(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Ne, self, rhs)
    }

    pub fn less(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Lt, self, rhs)
    }

    pub fn less_equal(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Le, self, rhs)
    }

    pub fn greater(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Gt, self, rhs)
    }

    pub fn greater_equal(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Ge, self, rhs)
    }

    /// Logical and, `rhs` is only evaluated if `self` is not 0.
    pub fn logical_and(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::LogAnd, self, rhs)
    }

    /// Logical or, `rhs` is only evaluated if `self` is 0.
    pub fn logical_or(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::LogOr, self, rhs)
    }

    pub fn logical_not(self) -> Expr {
        Expr::unary(UnaryOp::LogNot, self)
    }

    /// Same as [select] with `self` as the condition.
    pub fn select(self, then_branch: impl Into<Expr>, else_branch: impl Into<Expr>) -> Expr {
        select(self, then_branch, else_branch)
    }
}

impl From<i64> for Expr {
    fn from(v: i64) -> Self {
        Expr::Constant(v)
    }
}

impl From<SignalIndex> for Expr {
    fn from(s: SignalIndex) -> Self {
        Expr::Signal(s)
    }
}

impl From<ExprIndex> for Expr {
    fn from(idx: ExprIndex) -> Self {
        Expr::Node(idx)
    }
}

/// Implements the binary operator traits for every combination of operands that has
/// an [Expr] or a [SignalIndex] on at least one side.
///
/// Integer operands are only `i64` so that literals infer to it.
macro_rules! binary_operators {
    ($($trait:ident $method:ident),*) => {
        $(
            binary_operators!(@impl $trait $method, Expr, Expr);
            binary_operators!(@impl $trait $method, Expr, SignalIndex);
            binary_operators!(@impl $trait $method, Expr, i64);
            binary_operators!(@impl $trait $method, SignalIndex, Expr);
            binary_operators!(@impl $trait $method, SignalIndex, SignalIndex);
            binary_operators!(@impl $trait $method, SignalIndex, i64);
            binary_operators!(@impl $trait $method, i64, Expr);
            binary_operators!(@impl $trait $method, i64, SignalIndex);
        )*
    };
    (@impl $trait:ident $method:ident, $lhs:ty, $rhs:ty) => {
        impl ops::$trait<$rhs> for $lhs {
            type Output = Expr;
            fn $method(self, rhs: $rhs) -> Expr {
                Expr::binary(BinaryOp::$trait, self, rhs)
            }
        }
    };
}

binary_operators!(
    Add add, Sub sub, Mul mul, Div div, Rem rem,
    BitAnd bitand, BitOr bitor, BitXor bitxor, Shl shl, Shr shr
);

macro_rules! unary_operators {
    ($($operand:ty),*) => {
        $(
            impl ops::Neg for $operand {
                type Output = Expr;
                fn neg(self) -> Expr {
                    Expr::unary(UnaryOp::Neg, self)
                }
            }

            impl ops::Not for $operand {
                type Output = Expr;
                fn not(self) -> Expr {
                    Expr::unary(UnaryOp::BitNot, self)
                }
            }
        )*
    };
}

unary_operators!(Expr, SignalIndex);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operators_build_trees() {
        let a = SignalIndex::new(0);
        let b = SignalIndex::new(1);

        assert_eq!(
            a + b * 2,
            Expr::Binary(
                BinaryOp::Add,
                Box::new(Expr::Signal(a)),
                Box::new(Expr::Binary(
                    BinaryOp::Mul,
                    Box::new(Expr::Signal(b)),
                    Box::new(Expr::Constant(2))
                ))
            )
        );
        assert_eq!(
            -Expr::from(a),
            Expr::Unary(UnaryOp::Neg, Box::new(Expr::Signal(a)))
        );
        assert_eq!(!a, Expr::Unary(UnaryOp::BitNot, Box::new(Expr::Signal(a))));
        assert_eq!(
            1i64 << a,
            Expr::binary(BinaryOp::Shl, Expr::Constant(1), Expr::Signal(a))
        );
    }

    #[test]
    fn test_methods() {
        let a = Expr::from(SignalIndex::new(0));
        assert_eq!(
            a.clone().greater_equal(3),
            Expr::binary(BinaryOp::Ge, a.clone(), 3)
        );
        assert_eq!(
            a.clone().logical_not(),
            Expr::unary(UnaryOp::LogNot, a.clone())
        );
        assert_eq!(
            a.clone().select(1, 2),
            Expr::Select(
                Box::new(a),
                Box::new(Expr::Constant(1)),
                Box::new(Expr::Constant(2))
            )
        );
    }

    #[test]
    fn test_literal_operands_are_i64() {
        let mut g = CircuitBuilder::new();
        let a = g.signal("a");
        let sum = (a + 1).into_expr(&mut g);
        let compare = (2 * Expr::from(a)).less(7).into_expr(&mut g);

        let rhs = g.get(sum).children()[1];
        assert_eq!(g.get(rhs).as_constant(), Some(1));
        let rhs = g.get(compare).children()[1];
        assert_eq!(g.get(rhs).as_constant(), Some(7));
    }

    #[test]
    fn test_lowering_shares_nodes() {
        let mut g = CircuitBuilder::new();
        let a = g.signal("a");
        let shared = (a + 1).into_expr(&mut g);
        let before = g.node_count();

        let root = (Expr::from(shared) * Expr::from(shared)).into_expr(&mut g);

        // Only the multiplication is new, `a` is referenced through a single node.
        assert_eq!(g.node_count(), before + 1);
        assert_eq!(g.reference(a), g.reference(a));
        assert_eq!(g.get(root).children().as_slice(), &[shared, shared]);
    }
}
