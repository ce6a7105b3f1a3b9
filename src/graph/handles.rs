use super::node::ExprIndex;
use std::fmt::{self, Display, Formatter};

/// Identifier of a signal in a [super::CircuitBuilder] or [super::Circuit].
///
/// It is the only handle callers get to a signal, committed values can only be read or written
/// through the [super::Circuit] that owns them.
#[repr(transparent)]
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub struct SignalIndex {
    pub(super) idx: usize,
}

impl SignalIndex {
    pub(super) const fn new(idx: usize) -> SignalIndex {
        SignalIndex { idx }
    }
}

impl Display for SignalIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.idx)
    }
}

/// A named cell with an initial value and up to two definitions.
///
/// - `combinational` is recomputed every cycle from the committed state and is what the signal reads as
///   during that cycle.
/// - `registered` is evaluated every cycle as well but its value only becomes the committed value at the
///   end of the cycle.
///
/// Having both is legal, the signal then reads as its combinational value while its committed value
/// follows the registered definition.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Signal {
    pub(super) name: String,
    pub(super) initial: i64,
    pub(super) combinational: Option<ExprIndex>,
    pub(super) registered: Option<ExprIndex>,
}

impl Signal {
    pub(super) fn new(name: String, initial: i64) -> Self {
        Self {
            name,
            initial,
            combinational: None,
            registered: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the committed value the signal starts with.
    pub fn initial(&self) -> i64 {
        self.initial
    }

    pub fn combinational(&self) -> Option<ExprIndex> {
        self.combinational
    }

    pub fn registered(&self) -> Option<ExprIndex> {
        self.registered
    }

    /// Returns the roots of every definition of the signal.
    pub fn roots(&self) -> impl Iterator<Item = ExprIndex> {
        self.combinational.into_iter().chain(self.registered)
    }
}
