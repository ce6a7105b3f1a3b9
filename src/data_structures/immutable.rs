use std::ops::Deref;

/// Read only wrapper, the expression graph of an initialized [Circuit](crate::Circuit)
/// is kept in one so that nothing can mutate it during a simulation.
#[repr(transparent)]
#[derive(Debug, Clone)]
pub struct Immutable<T>(T);

impl<T> Immutable<T> {
    pub fn new(i: T) -> Self {
        Self(i)
    }
}

impl<T> Deref for Immutable<T> {
    type Target = T;
    #[inline(always)]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> From<T> for Immutable<T> {
    fn from(i: T) -> Self {
        Self(i)
    }
}
