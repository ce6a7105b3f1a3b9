use std::marker::PhantomData;

/// Index types that can address a [Slab].
///
/// Implemented by the typed handles of the graph so that a [Slab] of expression nodes
/// can only be indexed by [ExprIndex](crate::ExprIndex) and so on.
pub trait SlabKey: Copy {
    /// Returns the key for slot `i`.
    fn from_slot(i: usize) -> Self;
    /// Returns the slot addressed by `self`.
    fn slot(self) -> usize;
}

impl SlabKey for usize {
    fn from_slot(i: usize) -> Self {
        i
    }
    fn slot(self) -> usize {
        self
    }
}

/// Arena that stores items of the same type and reuses removed slots.
///
/// # Example
///
/// ```
/// # use wires::data_structures::Slab;
/// let mut s = Slab::<usize, _>::new();
///
/// let index = s.insert(5);
/// assert_eq!(s.get(index), Some(&5));
///
/// assert_eq!(s.remove(index), Some(5));
///
/// assert_eq!(s.get(index), None);
/// ```
#[derive(Debug, Clone)]
pub struct Slab<K, T> {
    data: Vec<Option<T>>,
    removed_slots: Vec<usize>,
    key: PhantomData<K>,
}

impl<K: SlabKey, T> Slab<K, T> {
    /// Returns an empty [Slab].
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            removed_slots: Vec::new(),
            key: PhantomData,
        }
    }

    /// Inserts an item and returns its key, reusing a removed slot if there is one.
    pub fn insert(&mut self, item: T) -> K {
        if let Some(slot) = self.removed_slots.pop() {
            self.data[slot] = Some(item);
            K::from_slot(slot)
        } else {
            self.data.push(Some(item));
            K::from_slot(self.data.len() - 1)
        }
    }

    /// Returns a reference to the item at `key`, [None] if it was removed or never existed.
    pub fn get(&self, key: K) -> Option<&T> {
        self.data.get(key.slot())?.as_ref()
    }

    /// Returns a mutable reference to the item at `key`, [None] if it was removed or never existed.
    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.data.get_mut(key.slot())?.as_mut()
    }

    /// Removes the item at `key` and returns it, the slot will be reused by the next [Slab::insert].
    pub fn remove(&mut self, key: K) -> Option<T> {
        let item = self.data.get_mut(key.slot())?.take()?;
        self.removed_slots.push(key.slot());
        Some(item)
    }

    /// Returns the number of live items.
    ///
    /// This is different from the number of allocated slots, see [Slab::total_len].
    pub fn len(&self) -> usize {
        self.data.len() - self.removed_slots.len()
    }

    /// Returns true if there are no live items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of allocated slots, some of them could be empty.
    pub fn total_len(&self) -> usize {
        self.data.len()
    }

    /// Returns an iterator over the live `(key, &item)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> + '_ {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(i, item)| Some((K::from_slot(i), item.as_ref()?)))
    }

    /// Returns a vector of the live keys in slot order.
    pub fn keys(&self) -> Vec<K> {
        self.iter().map(|(key, _)| key).collect()
    }
}

/// Owning iterator over the live `(key, item)` pairs of a [Slab], in slot order.
pub struct IntoIter<K, T> {
    iter: std::iter::Enumerate<std::vec::IntoIter<Option<T>>>,
    key: PhantomData<K>,
}

impl<K: SlabKey, T> Iterator for IntoIter<K, T> {
    type Item = (K, T);
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (i, item) = self.iter.next()?;
            if let Some(item) = item {
                return Some((K::from_slot(i), item));
            }
        }
    }
}

impl<K: SlabKey, T> IntoIterator for Slab<K, T> {
    type Item = (K, T);
    type IntoIter = IntoIter<K, T>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            iter: self.data.into_iter().enumerate(),
            key: PhantomData,
        }
    }
}

impl<K: SlabKey, T> Default for Slab<K, T> {
    fn default() -> Self {
        Self::new()
    }
}
