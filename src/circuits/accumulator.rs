use crate::graph::*;

/// Returns a signal named `name` that adds the value of `input` every cycle.
///
/// It goes back to 0 the cycle after `reset` is not 0.
///
/// # Example
/// ```
/// # use wires::{CircuitBuilder, accumulator};
/// let mut g = CircuitBuilder::new();
/// let input = g.signal_with_initial("input", 3);
/// let reset = g.signal("reset");
/// let acc = accumulator(&mut g, input, reset, "acc");
///
/// let c = &mut g.init();
/// assert_eq!(c.simulate(&[acc], 6, true).unwrap()["acc"], vec![0, 3, 6, 9, 12, 15]);
/// ```
pub fn accumulator<S: Into<String>>(
    g: &mut CircuitBuilder,
    input: SignalIndex,
    reset: SignalIndex,
    name: S,
) -> SignalIndex {
    let acc = g.signal(name);
    g.register(acc, select(reset, 0, acc + input));
    acc
}
