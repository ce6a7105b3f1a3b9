use std::iter::FromIterator;

/// A write stack and a read stack, items pushed during one round are popped during the next.
///
/// Used to drive fixed-point iterations: the items discovered while processing round `n`
/// are pushed to the write stack and become round `n + 1` after [DoubleStack::next_round].
///
/// # Example
/// ```
/// # use wires::data_structures::DoubleStack;
/// let mut stacks: DoubleStack<u8> = vec![1, 2].into_iter().collect();
///
/// assert_eq!(stacks.pop(), None);
/// assert!(stacks.next_round());
///
/// assert_eq!(stacks.pop(), Some(2));
/// stacks.push(3);
/// assert_eq!(stacks.pop(), Some(1));
/// assert_eq!(stacks.pop(), None);
///
/// assert!(stacks.next_round());
/// assert_eq!(stacks.pop(), Some(3));
///
/// assert!(!stacks.next_round());
/// assert_eq!(stacks.rounds(), 2);
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct DoubleStack<T> {
    read_stack: Vec<T>,
    write_stack: Vec<T>,
    rounds: usize,
}

impl<T> DoubleStack<T> {
    /// Returns an empty [DoubleStack].
    pub fn new() -> Self {
        Self {
            read_stack: Vec::new(),
            write_stack: Vec::new(),
            rounds: 0,
        }
    }

    /// Pops an item from the read stack, [None] once the current round is exhausted.
    #[inline(always)]
    pub fn pop(&mut self) -> Option<T> {
        self.read_stack.pop()
    }

    /// Pushes an item into the next round.
    #[inline(always)]
    pub fn push(&mut self, v: T) {
        self.write_stack.push(v);
    }

    /// Moves the items pushed so far into the read stack.
    ///
    /// Returns false if nothing was pushed, meaning the iteration reached its fixed point.
    pub fn next_round(&mut self) -> bool {
        debug_assert!(
            self.read_stack.is_empty(),
            "Tried to start a new round while the current one is not exhausted"
        );
        if self.write_stack.is_empty() {
            return false;
        }
        std::mem::swap(&mut self.read_stack, &mut self.write_stack);
        self.rounds += 1;
        true
    }

    /// Returns the number of rounds started so far.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Returns the number of items waiting in both stacks.
    pub fn len(&self) -> usize {
        self.read_stack.len() + self.write_stack.len()
    }

    /// Returns true if both stacks are empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Extend<T> for DoubleStack<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.write_stack.extend(iter)
    }
}

impl<T> Default for DoubleStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for DoubleStack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            read_stack: Vec::new(),
            write_stack: iter.into_iter().collect(),
            rounds: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop() {
        let mut s: DoubleStack<u8> = Default::default();

        assert_eq!(s.pop(), None);

        for i in 0..10 {
            s.push(i);
            assert_eq!(s.pop(), None);
        }

        assert!(s.next_round());

        for i in (0..10).rev() {
            assert_eq!(s.pop(), Some(i));
        }
        assert_eq!(s.pop(), None);
        assert!(s.is_empty());
    }

    #[test]
    fn test_rounds() {
        let mut s: DoubleStack<u8> = Default::default();
        assert!(!s.next_round());
        assert_eq!(s.rounds(), 0);

        s.extend(0..3);
        assert_eq!(s.len(), 3);
        assert!(s.next_round());
        while let Some(i) = s.pop() {
            if i == 0 {
                s.push(10);
            }
        }
        assert!(s.next_round());
        assert_eq!(s.pop(), Some(10));
        assert!(!s.next_round());
        assert_eq!(s.rounds(), 2);
    }
}
