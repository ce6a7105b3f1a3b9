use crate::graph::*;

/// Returns a signal named `name` that counts the cycles in which `enable` is not 0.
///
/// The count goes back to 0 the cycle after `reset` is not 0, reset wins over enable.
///
/// # Example
/// ```
/// # use wires::{CircuitBuilder, counter};
/// let mut g = CircuitBuilder::new();
/// let enable = g.signal_with_initial("enable", 1);
/// let reset = g.signal("reset");
/// let count = counter(&mut g, enable, reset, "count");
///
/// let c = &mut g.init();
/// assert_eq!(c.simulate(&[count], 4, false).unwrap()["count"], vec![0, 1, 2, 3]);
///
/// c.set_value(enable, 0);
/// assert_eq!(c.simulate(&[count], 2, false).unwrap()["count"], vec![4, 4]);
///
/// c.set_value(reset, 1);
/// assert_eq!(c.simulate(&[count], 2, false).unwrap()["count"], vec![4, 0]);
/// ```
pub fn counter<S: Into<String>>(
    g: &mut CircuitBuilder,
    enable: SignalIndex,
    reset: SignalIndex,
    name: S,
) -> SignalIndex {
    let count = g.signal(name);
    g.register(count, select(reset, 0, select(enable, count + 1, count)));
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_counts() {
        let mut g = CircuitBuilder::new();
        let enable = g.signal("enable");
        let reset = g.signal("reset");
        let count = counter(&mut g, enable, reset, "counter");
        // Enabled every other cycle.
        g.register(enable, Expr::from(enable).logical_not());

        let c = &mut g.init();
        let h = c.simulate(&[count], 7, false).unwrap();
        assert_eq!(h["enable"], vec![0, 1, 0, 1, 0, 1, 0]);
        assert_eq!(h["counter"], vec![0, 0, 1, 1, 2, 2, 3]);
    }

    #[test]
    fn test_counter_wraps() {
        let mut g = CircuitBuilder::new();
        let enable = g.signal_with_initial("enable", 1);
        let reset = g.signal("reset");
        let count = counter(&mut g, enable, reset, "counter");
        g.set_initial(count, i64::MAX);

        let c = &mut g.init();
        let h = c.simulate(&[count], 2, false).unwrap();
        assert_eq!(h["counter"], vec![i64::MAX, i64::MIN]);
    }
}
