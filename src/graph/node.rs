use super::handles::SignalIndex;
use crate::data_structures::SlabKey;
use smallvec::{smallvec, SmallVec};
use std::fmt::{self, Display, Formatter};
use strum_macros::{Display, EnumIter};

/// Represents the index of an expression node in a [super::CircuitBuilder] or [super::Circuit].
#[repr(transparent)]
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub struct ExprIndex {
    pub(super) idx: usize,
}

/// Returns a new ExprIndex from a provided usize.
macro_rules! ei {
    ( $x:expr ) => {{
        ExprIndex::new($x)
    }};
}

impl ExprIndex {
    pub(super) const fn new(idx: usize) -> ExprIndex {
        ExprIndex { idx }
    }
}

impl SlabKey for ExprIndex {
    fn from_slot(i: usize) -> Self {
        ei!(i)
    }
    fn slot(self) -> usize {
        self.idx
    }
}

impl Display for ExprIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.idx)
    }
}

/// Returns 1 if `b` is true and 0 otherwise.
#[inline(always)]
fn flag(b: bool) -> i64 {
    b as i64
}

/// Operations with one operand.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display, EnumIter)]
pub enum UnaryOp {
    #[strum(serialize = "-")]
    Neg,
    #[strum(serialize = "~")]
    BitNot,
    #[strum(serialize = "!")]
    LogNot,
}

impl UnaryOp {
    /// Returns the result of applying `self` to `v`.
    ///
    /// # Example
    /// ```
    /// # use wires::UnaryOp;
    /// assert_eq!(UnaryOp::Neg.apply(i64::MIN), i64::MIN);
    /// assert_eq!(UnaryOp::BitNot.apply(0), -1);
    /// assert_eq!(UnaryOp::LogNot.apply(42), 0);
    /// assert_eq!(UnaryOp::LogNot.apply(0), 1);
    /// ```
    #[inline(always)]
    pub fn apply(self, v: i64) -> i64 {
        match self {
            UnaryOp::Neg => v.wrapping_neg(),
            UnaryOp::BitNot => !v,
            UnaryOp::LogNot => flag(v == 0),
        }
    }
}

/// Operations with two operands.
///
/// Arithmetic wraps on overflow, division and remainder by 0 return 0, logical and comparison
/// operations return 0 or 1.
///
/// Shifts use the right operand as the amount with [i64::wrapping_shl] and [i64::wrapping_shr]
/// semantics, the amount is taken modulo 64 after being truncated to a [u32].
/// [BinaryOp::Shr] is arithmetic.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display, EnumIter)]
pub enum BinaryOp {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "%")]
    Rem,
    #[strum(serialize = "&")]
    BitAnd,
    #[strum(serialize = "|")]
    BitOr,
    #[strum(serialize = "^")]
    BitXor,
    #[strum(serialize = "<<")]
    Shl,
    #[strum(serialize = ">>")]
    Shr,
    #[strum(serialize = "&&")]
    LogAnd,
    #[strum(serialize = "||")]
    LogOr,
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    Ne,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    Ge,
}

impl BinaryOp {
    /// Returns the result of applying `self` to `a` and `b`.
    ///
    /// # Example
    /// ```
    /// # use wires::BinaryOp;
    /// assert_eq!(BinaryOp::Add.apply(i64::MAX, 1), i64::MIN);
    /// assert_eq!(BinaryOp::Div.apply(7, 0), 0);
    /// assert_eq!(BinaryOp::Rem.apply(7, 0), 0);
    /// assert_eq!(BinaryOp::LogAnd.apply(3, -2), 1);
    /// assert_eq!(BinaryOp::Lt.apply(3, -2), 0);
    /// ```
    #[inline(always)]
    pub fn apply(self, a: i64, b: i64) -> i64 {
        use BinaryOp::*;
        match self {
            Add => a.wrapping_add(b),
            Sub => a.wrapping_sub(b),
            Mul => a.wrapping_mul(b),
            Div if b == 0 => 0,
            Div => a.wrapping_div(b),
            Rem if b == 0 => 0,
            Rem => a.wrapping_rem(b),
            BitAnd => a & b,
            BitOr => a | b,
            BitXor => a ^ b,
            Shl => a.wrapping_shl(b as u32),
            Shr => a.wrapping_shr(b as u32),
            LogAnd => flag(a != 0 && b != 0),
            LogOr => flag(a != 0 || b != 0),
            Eq => flag(a == b),
            Ne => flag(a != b),
            Lt => flag(a < b),
            Le => flag(a <= b),
            Gt => flag(a > b),
            Ge => flag(a >= b),
        }
    }

    /// Returns the result of `self` if the left operand alone decides it.
    ///
    /// Logical and/or don't evaluate their right operand when the left one is
    /// respectively false or true.
    #[inline(always)]
    pub fn short_circuit(self, a: i64) -> Option<i64> {
        match self {
            BinaryOp::LogAnd if a == 0 => Some(0),
            BinaryOp::LogOr if a != 0 => Some(1),
            _ => None,
        }
    }
}

/// A node of the expression graph.
///
/// Nodes are immutable once they have been created and can be shared by any number of parents,
/// children are always created before their parents.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ExprNode {
    Constant(i64),
    Signal(SignalIndex),
    Unary {
        op: UnaryOp,
        operand: ExprIndex,
    },
    Binary {
        op: BinaryOp,
        lhs: ExprIndex,
        rhs: ExprIndex,
    },
    Select {
        condition: ExprIndex,
        then_branch: ExprIndex,
        else_branch: ExprIndex,
    },
}

/// Maximum amount of children of an [ExprNode].
pub(super) const MAX_CHILDREN: usize = 3;

impl ExprNode {
    /// Returns the children of `self` in evaluation order.
    pub fn children(&self) -> SmallVec<[ExprIndex; MAX_CHILDREN]> {
        match *self {
            ExprNode::Constant(_) | ExprNode::Signal(_) => smallvec![],
            ExprNode::Unary { operand, .. } => smallvec![operand],
            ExprNode::Binary { lhs, rhs, .. } => smallvec![lhs, rhs],
            ExprNode::Select {
                condition,
                then_branch,
                else_branch,
            } => smallvec![condition, then_branch, else_branch],
        }
    }

    /// Replaces every child with `f(child)`, used when nodes get renumbered.
    pub(super) fn map_children<F: FnMut(ExprIndex) -> ExprIndex>(&mut self, mut f: F) {
        match self {
            ExprNode::Constant(_) | ExprNode::Signal(_) => {}
            ExprNode::Unary { operand, .. } => *operand = f(*operand),
            ExprNode::Binary { lhs, rhs, .. } => {
                *lhs = f(*lhs);
                *rhs = f(*rhs);
            }
            ExprNode::Select {
                condition,
                then_branch,
                else_branch,
            } => {
                *condition = f(*condition);
                *then_branch = f(*then_branch);
                *else_branch = f(*else_branch);
            }
        }
    }

    /// Returns the value of `self` if it is a [ExprNode::Constant].
    pub fn as_constant(&self) -> Option<i64> {
        match self {
            ExprNode::Constant(v) => Some(*v),
            _ => None,
        }
    }
}

impl Display for ExprNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExprNode::Constant(v) => write!(f, "{}", v),
            ExprNode::Signal(s) => write!(f, "{}", s),
            ExprNode::Unary { op, .. } => write!(f, "{}", op),
            ExprNode::Binary { op, .. } => write!(f, "{}", op),
            ExprNode::Select { .. } => write!(f, "?:"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_arithmetic_wraps() {
        assert_eq!(BinaryOp::Add.apply(i64::MAX, 1), i64::MIN);
        assert_eq!(BinaryOp::Sub.apply(i64::MIN, 1), i64::MAX);
        assert_eq!(BinaryOp::Mul.apply(i64::MAX, 2), -2);
        assert_eq!(BinaryOp::Div.apply(i64::MIN, -1), i64::MIN);
        assert_eq!(BinaryOp::Rem.apply(i64::MIN, -1), 0);
        assert_eq!(UnaryOp::Neg.apply(i64::MIN), i64::MIN);
    }

    #[test]
    fn test_division_by_zero_is_zero() {
        for a in &[i64::MIN, -7, 0, 7, i64::MAX] {
            assert_eq!(BinaryOp::Div.apply(*a, 0), 0);
            assert_eq!(BinaryOp::Rem.apply(*a, 0), 0);
        }
        assert_eq!(BinaryOp::Div.apply(-7, 2), -3);
        assert_eq!(BinaryOp::Rem.apply(-7, 2), -1);
    }

    #[test]
    fn test_logical_and_comparisons_are_flags() {
        for op in BinaryOp::iter() {
            let logical = matches!(
                op,
                BinaryOp::LogAnd
                    | BinaryOp::LogOr
                    | BinaryOp::Eq
                    | BinaryOp::Ne
                    | BinaryOp::Lt
                    | BinaryOp::Le
                    | BinaryOp::Gt
                    | BinaryOp::Ge
            );
            if !logical {
                continue;
            }
            for a in -3..3 {
                for b in -3..3 {
                    let r = op.apply(a, b);
                    assert!(r == 0 || r == 1, "{} {} {} = {}", a, op, b, r);
                }
            }
        }
        assert_eq!(UnaryOp::LogNot.apply(-5), 0);
        assert_eq!(BinaryOp::LogOr.apply(0, -5), 1);
        assert_eq!(BinaryOp::LogAnd.apply(2, 0), 0);
    }

    #[test]
    fn test_shifts_use_native_wrapping_amounts() {
        assert_eq!(BinaryOp::Shl.apply(1, 3), 8);
        assert_eq!(BinaryOp::Shr.apply(-16, 2), -4);
        assert_eq!(BinaryOp::Shl.apply(1, 64), 1);
        assert_eq!(BinaryOp::Shl.apply(1, 65), 2);
        assert_eq!(BinaryOp::Shl.apply(1, -1), i64::MIN);
    }

    #[test]
    fn test_short_circuit() {
        assert_eq!(BinaryOp::LogAnd.short_circuit(0), Some(0));
        assert_eq!(BinaryOp::LogAnd.short_circuit(3), None);
        assert_eq!(BinaryOp::LogOr.short_circuit(-1), Some(1));
        assert_eq!(BinaryOp::LogOr.short_circuit(0), None);
        assert_eq!(BinaryOp::Add.short_circuit(0), None);
    }

    #[test]
    fn test_children() {
        let n = ExprNode::Select {
            condition: ei!(0),
            then_branch: ei!(1),
            else_branch: ei!(2),
        };
        assert_eq!(n.children().as_slice(), &[ei!(0), ei!(1), ei!(2)]);
        assert!(ExprNode::Constant(1).children().is_empty());

        let mut n = ExprNode::Binary {
            op: BinaryOp::Add,
            lhs: ei!(3),
            rhs: ei!(3),
        };
        n.map_children(|c| ei!(c.idx + 1));
        assert_eq!(n.children().as_slice(), &[ei!(4), ei!(4)]);
    }

    #[test]
    fn test_display() {
        assert_eq!(BinaryOp::Shl.to_string(), "<<");
        assert_eq!(UnaryOp::LogNot.to_string(), "!");
        assert_eq!(ExprNode::Constant(-3).to_string(), "-3");
    }
}
