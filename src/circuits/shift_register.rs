use crate::graph::*;

/// Returns `stages` signals named `name0`, `name1`... where the first one takes the value of `input`
/// every cycle and every other one takes the value of the previous stage.
///
/// All stages commit at once so a value moves exactly one stage per cycle.
///
/// # Panics
///
/// Will panic if `stages` is 0.
///
/// # Example
/// ```
/// # use wires::{CircuitBuilder, shift_register};
/// let mut g = CircuitBuilder::new();
/// let input = g.signal_with_initial("input", 7);
/// let stages = shift_register(&mut g, input, 3, "stage");
///
/// let c = &mut g.init();
/// let h = c.simulate(&stages[2..], 4, true).unwrap();
/// assert_eq!(h["stage0"], vec![0, 7, 7, 7]);
/// assert_eq!(h["stage2"], vec![0, 0, 0, 7]);
/// ```
pub fn shift_register<S: Into<String>>(
    g: &mut CircuitBuilder,
    input: SignalIndex,
    stages: usize,
    name: S,
) -> Vec<SignalIndex> {
    assert!(stages > 0, "A shift register needs at least 1 stage");
    let name = name.into();

    let mut previous = input;
    (0..stages)
        .map(|i| {
            let stage = g.signal(format!("{}{}", name, i));
            g.register(stage, previous);
            previous = stage;
            stage
        })
        .collect()
}
