use unwrap::unwrap;

/// Committed values of every signal in a circuit, one 64 bit slot per signal.
///
/// [State] is the only place committed values live, reads happen at any time but
/// writes are batched: a whole cycle of registered updates is applied by a single call to
/// [State::commit], so no reader can observe half of a clock edge.
///
/// # Example
/// ```
/// # use wires::data_structures::State;
/// let mut s = State::new(&[0, 5]);
///
/// assert_eq!(s.get(1), 5);
///
/// let snapshot = s.snapshot(&[0, 1]);
/// s.commit(&[(0, 3), (1, 4)]);
/// assert_eq!(s.get(0), 3);
///
/// s.restore(&snapshot);
/// assert_eq!(s.get(0), 0);
/// assert_eq!(s.get(1), 5);
/// ```
///
/// # Panics
///
/// Panics if you try to read or write an index >= [State::len()]
///
/// ```should_panic
/// # use wires::data_structures::State;
/// let s = State::new(&[0, 0]);
///
/// s.get(2);
/// ```
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct State {
    values: Vec<i64>,
}

/// Saved committed values, produced by [State::snapshot] and written back by [State::restore].
pub type Snapshot = Vec<(usize, i64)>;

impl State {
    /// Returns a new [State] holding `initial` as the committed values.
    pub fn new(initial: &[i64]) -> State {
        State {
            values: initial.to_vec(),
        }
    }

    /// Returns the committed value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` >= [State::len()]
    pub fn get(&self, index: usize) -> i64 {
        *unwrap!(
            self.values.get(index),
            "Tried to access index out of bounds:{}, size:{}",
            index,
            self.values.len(),
        )
    }

    /// Overwrites the committed value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` >= [State::len()]
    pub fn set(&mut self, index: usize, value: i64) {
        let len = self.values.len();
        let slot = unwrap!(
            self.values.get_mut(index),
            "Tried to write to index out of bounds:{}, size:{}",
            index,
            len,
        );
        *slot = value;
    }

    /// Applies a batch of `(index, value)` updates, one clock edge worth of registered updates.
    ///
    /// Every value in `updates` was computed before this call, so the order of the batch
    /// doesn't matter as long as no index appears twice.
    ///
    /// # Panics
    ///
    /// Panics if any index >= [State::len()]
    pub fn commit(&mut self, updates: &[(usize, i64)]) {
        for &(index, value) in updates {
            self.set(index, value);
        }
    }

    /// Returns the committed values at `indexes`.
    ///
    /// # Panics
    ///
    /// Panics if any index >= [State::len()]
    pub fn snapshot(&self, indexes: &[usize]) -> Snapshot {
        indexes.iter().map(|&i| (i, self.get(i))).collect()
    }

    /// Writes back a [Snapshot].
    ///
    /// # Panics
    ///
    /// Panics if any index >= [State::len()]
    pub fn restore(&mut self, snapshot: &[(usize, i64)]) {
        self.commit(snapshot)
    }

    /// Returns the number of slots in the [State].
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the [State] has no slots.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set() {
        let mut state = State::new(&[0; 100]);
        for i in 0..100 {
            assert_eq!(state.get(i), 0);

            state.set(i, i as i64 - 50);
            assert_eq!(state.get(i), i as i64 - 50);
        }
    }

    #[test]
    fn test_commit_applies_whole_batch() {
        let mut state = State::new(&[1, 2, 3]);
        // Swapping two slots only works because the batch was computed up front.
        let updates = vec![(0, state.get(1)), (1, state.get(0))];
        state.commit(&updates);

        assert_eq!(state.get(0), 2);
        assert_eq!(state.get(1), 1);
        assert_eq!(state.get(2), 3);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut state = State::new(&[10, 20, 30]);
        let snapshot = state.snapshot(&[0, 2]);

        state.commit(&[(0, -1), (1, -2), (2, -3)]);
        state.restore(&snapshot);

        assert_eq!(state.get(0), 10);
        assert_eq!(state.get(1), -2);
        assert_eq!(state.get(2), 30);
    }

    #[test]
    fn test_len() {
        assert_eq!(State::new(&[]).len(), 0);
        assert!(State::new(&[]).is_empty());
        assert_eq!(State::new(&[0; 65]).len(), 65);
    }

    #[test]
    #[should_panic(expected = "Tried to access index out of bounds:3, size:3")]
    fn test_get_panics() {
        let state = State::new(&[0; 3]);
        state.get(3);
    }

    #[test]
    #[should_panic(expected = "Tried to write to index out of bounds:4, size:3")]
    fn test_set_panics() {
        let mut state = State::new(&[0; 3]);
        state.set(4, 1);
    }
}
