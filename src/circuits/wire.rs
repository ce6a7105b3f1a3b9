/// Declares a signal in `$g` named after the binding.
///
/// # Example
/// ```
/// # use wires::{wire, CircuitBuilder};
/// let mut g = CircuitBuilder::new();
/// wire!(g, a = 20);
/// wire!(g, b = 22);
/// wire!(g, sum);
/// g.assign(sum, a + b);
///
/// let c = &mut g.init();
/// assert_eq!(c.name(sum), "sum");
/// assert_eq!(c.simulate(&[sum], 1, true).unwrap()["sum"], vec![42]);
/// ```
#[macro_export]
macro_rules! wire {
    ($g:expr, $name:ident) => {
        let $name = $g.signal(stringify!($name));
    };
    ($g:expr, $name:ident = $initial:expr) => {
        let $name = $g.signal_with_initial(stringify!($name), $initial);
    };
}

#[cfg(test)]
mod tests {
    use crate::graph::*;

    #[test]
    fn test_wire_names_signals() {
        let mut g = CircuitBuilder::new();
        wire!(g, input = -3);
        wire!(g, output);
        g.register(output, input * input);

        assert_eq!(g.signal_by_name("input"), Some(input));
        assert_eq!(g.get_signal(input).initial(), -3);
        assert_eq!(g.get_signal(output).name(), "output");
    }
}
