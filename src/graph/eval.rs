use super::error::SimError;
use super::handles::{Signal, SignalIndex};
use super::node::{ExprIndex, ExprNode};
use crate::data_structures::State;
use bitvec::prelude::*;

/// Per-cycle evaluation context.
///
/// Memoizes the value of every signal computed during the cycle and tracks which signals are
/// being computed to detect combinational cycles. A new context must be used every cycle.
#[derive(Debug, Clone)]
pub struct EvalContext {
    values: Vec<Option<i64>>,
    in_progress: BitVec,
}

impl EvalContext {
    /// Returns a new [EvalContext] for a circuit with `signals` signals.
    pub fn new(signals: usize) -> Self {
        Self {
            values: vec![None; signals],
            in_progress: bitvec![0; signals],
        }
    }

    /// Returns the memoized value of `signal`, if it has been computed in this cycle.
    pub fn memoized(&self, signal: SignalIndex) -> Option<i64> {
        self.values[signal.idx]
    }
}

/// Evaluates signals and expression nodes against the committed [State] of a cycle.
pub(super) struct Evaluator<'a> {
    pub nodes: &'a [ExprNode],
    pub signals: &'a [Signal],
    pub state: &'a State,
}

impl<'a> Evaluator<'a> {
    /// Returns the value `signal` reads as during the current cycle.
    ///
    /// Signals with a combinational definition read as that definition, the rest read as their
    /// committed value. Every signal is computed at most once per context.
    pub fn value_of(&self, signal: SignalIndex, ctx: &mut EvalContext) -> Result<i64, SimError> {
        if let Some(value) = ctx.memoized(signal) {
            return Ok(value);
        }
        let s = &self.signals[signal.idx];
        let value = match s.combinational {
            Some(root) => {
                if ctx.in_progress[signal.idx] {
                    return Err(SimError::CombinationalCycle {
                        name: s.name.clone(),
                    });
                }
                ctx.in_progress.set(signal.idx, true);
                let result = self.eval(root, ctx);
                ctx.in_progress.set(signal.idx, false);
                result?
            }
            None => self.state.get(signal.idx),
        };
        ctx.values[signal.idx] = Some(value);
        Ok(value)
    }

    /// Returns the value of the node at `idx`.
    ///
    /// Logical and/or only evaluate their right operand when the left one doesn't decide the result,
    /// selects only evaluate the chosen branch.
    pub fn eval(&self, idx: ExprIndex, ctx: &mut EvalContext) -> Result<i64, SimError> {
        Ok(match self.nodes[idx.idx] {
            ExprNode::Constant(v) => v,
            ExprNode::Signal(signal) => self.value_of(signal, ctx)?,
            ExprNode::Unary { op, operand } => op.apply(self.eval(operand, ctx)?),
            ExprNode::Binary { op, lhs, rhs } => {
                let a = self.eval(lhs, ctx)?;
                match op.short_circuit(a) {
                    Some(v) => v,
                    None => op.apply(a, self.eval(rhs, ctx)?),
                }
            }
            ExprNode::Select {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval(condition, ctx)? != 0 {
                    self.eval(then_branch, ctx)?
                } else {
                    self.eval(else_branch, ctx)?
                }
            }
        })
    }
}
