use crate::graph::*;

/// Returns a signal named `name` that reads as the input selected by `address`.
///
/// Addresses outside of `inputs` read as 0. Only the selected input is evaluated.
///
/// # Example
/// ```
/// # use wires::{CircuitBuilder, multiplexer};
/// let mut g = CircuitBuilder::new();
/// let address = g.signal("address");
/// let inputs: Vec<_> = (0..3).map(|i| g.signal_with_initial(format!("in{}", i), 10 * i)).collect();
/// let mux = multiplexer(&mut g, address, &inputs, "mux");
///
/// let c = &mut g.init();
/// for (address_value, expected) in &[(0, 0), (2, 20), (1, 10), (3, 0), (-1, 0)] {
///     c.set_value(address, *address_value);
///     assert_eq!(c.peek(mux), Ok(*expected));
/// }
/// ```
pub fn multiplexer<S: Into<String>>(
    g: &mut CircuitBuilder,
    address: SignalIndex,
    inputs: &[SignalIndex],
    name: S,
) -> SignalIndex {
    let output = g.signal(name);
    let chain = inputs
        .iter()
        .enumerate()
        .rev()
        .fold(Expr::from(0), |rest, (i, input)| {
            select(Expr::from(address).equal(i as i64), *input, rest)
        });
    g.assign(output, chain);
    output
}

/// Returns a signal named `name` that reads as the largest of `a` and `b`.
///
/// # Example
/// ```
/// # use wires::{CircuitBuilder, maximum};
/// let mut g = CircuitBuilder::new();
/// let a = g.signal_with_initial("a", -4);
/// let b = g.signal_with_initial("b", 2);
/// let max = maximum(&mut g, a, b, "max");
///
/// let c = &mut g.init();
/// assert_eq!(c.peek(max), Ok(2));
/// c.set_value(a, 9);
/// assert_eq!(c.peek(max), Ok(9));
/// ```
pub fn maximum<S: Into<String>>(
    g: &mut CircuitBuilder,
    a: SignalIndex,
    b: SignalIndex,
    name: S,
) -> SignalIndex {
    let output = g.signal(name);
    g.assign(output, select(Expr::from(a).greater(b), a, b));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplexer_selects() {
        let mut g = CircuitBuilder::new();
        let address = g.signal("address");
        let inputs: Vec<_> = (0..4)
            .map(|i| g.signal_with_initial(format!("in{}", i), i * i))
            .collect();
        let mux = multiplexer(&mut g, address, &inputs, "mux");
        g.register(address, address + 1);

        let c = &mut g.init();
        let h = c.simulate(&[mux], 6, false).unwrap();
        assert_eq!(h["mux"], vec![0, 1, 4, 9, 0, 0]);
        assert_eq!(h.len(), 6);
    }

    #[test]
    fn test_multiplexer_skips_unselected_inputs() {
        let mut g = CircuitBuilder::new();
        let address = g.signal("address");
        let looped = g.signal("looped");
        let fine = g.signal_with_initial("fine", 5);
        g.assign(looped, looped + 1);
        let mux = multiplexer(&mut g, address, &[fine, looped], "mux");

        let c = &mut g.init();
        assert_eq!(c.peek(mux), Ok(5));
        c.set_value(address, 1);
        assert!(c.peek(mux).is_err());
    }

    #[test]
    fn test_empty_multiplexer() {
        let mut g = CircuitBuilder::new();
        let address = g.signal_with_initial("address", 0);
        let mux = multiplexer(&mut g, address, &[], "mux");

        let c = &mut g.init();
        assert_eq!(c.peek(mux), Ok(0));
    }

    #[test]
    fn test_maximum() {
        let mut g = CircuitBuilder::new();
        let a = g.signal("a");
        let b = g.signal_with_initial("b", 3);
        let max = maximum(&mut g, a, b, "max");
        g.register(a, a + 2);

        let c = &mut g.init();
        let h = c.simulate(&[max], 4, true).unwrap();
        assert_eq!(h["max"], vec![3, 3, 4, 6]);
    }
}
