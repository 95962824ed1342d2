/*!
A fixed capacity bit-set of state identifiers.

State sets serve three purposes in this crate:

* As the frontier and result of an epsilon closure over NFA states.
* As the identity of a DFA state during subset construction. Two subsets of
NFA states denote the same DFA state if and only if their bit-sets are
identical, and since a bit-set has exactly one representation for every set,
no canonicalization is needed beyond the bits themselves.
* As an equivalence class (a "block") of DFA states during minimization.

Every set has a capacity that is fixed when the set is created. The capacity
is chosen per automaton (the number of NFA states for subsets, the number of
DFA states for blocks), so there is no crate wide limit. Inserting an ID at or
beyond the capacity is a bug in the caller and results in a panic.
*/

use crate::util::id::StateID;

/// The number of bits in each block of the set.
const BITS: usize = 64;

/// A set of state IDs represented as a bit-set.
///
/// Equality and hashing are bit-exact. Comparing two sets with different
/// capacities always reports them as distinct.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct StateSet {
    capacity: usize,
    bits: Vec<u64>,
}

impl StateSet {
    /// Create a new empty set that can hold state IDs in the range
    /// `0..capacity`.
    pub fn new(capacity: usize) -> StateSet {
        let blocks = (capacity + BITS - 1) / BITS;
        StateSet { capacity, bits: vec![0; blocks] }
    }

    /// Create a new set with the given capacity that contains every state ID
    /// in the inclusive range `start..=end`.
    ///
    /// This panics if `end` is not less than `capacity`.
    pub fn range(capacity: usize, start: StateID, end: StateID) -> StateSet {
        let mut set = StateSet::new(capacity);
        for id in start.as_usize()..=end.as_usize() {
            set.insert(StateID::new_unchecked(id));
        }
        set
    }

    /// Returns the capacity of this set. Only state IDs less than the
    /// capacity may be inserted.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of IDs in this set.
    pub fn len(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Returns true if and only if this set is empty.
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&b| b == 0)
    }

    /// Insert the given ID into this set. Inserting an ID that is already in
    /// the set is a no-op.
    ///
    /// This returns true if the ID was not previously in the set.
    ///
    /// # Panics
    ///
    /// This panics if the ID is not less than this set's capacity.
    pub fn insert(&mut self, id: StateID) -> bool {
        let i = id.as_usize();
        assert!(
            i < self.capacity,
            "state {} exceeds state set capacity of {}",
            i,
            self.capacity,
        );
        let (block, mask) = (i / BITS, 1 << (i % BITS));
        let added = self.bits[block] & mask == 0;
        self.bits[block] |= mask;
        added
    }

    /// Remove the given ID from this set, returning true if it was present.
    pub fn remove(&mut self, id: StateID) -> bool {
        if !self.contains(id) {
            return false;
        }
        let i = id.as_usize();
        self.bits[i / BITS] &= !(1 << (i % BITS));
        true
    }

    /// Returns true if and only if the given ID is in this set. IDs beyond
    /// this set's capacity are never in the set.
    pub fn contains(&self, id: StateID) -> bool {
        let i = id.as_usize();
        i < self.capacity && self.bits[i / BITS] & (1 << (i % BITS)) != 0
    }

    /// Return some member of this set without removing it. If the set is
    /// empty, then `None` is returned.
    ///
    /// The member returned is always the smallest one, which makes it a
    /// stable representative of the set.
    pub fn peek(&self) -> Option<StateID> {
        for (block, &bits) in self.bits.iter().enumerate() {
            if bits != 0 {
                let i = block * BITS + bits.trailing_zeros() as usize;
                return Some(StateID::new_unchecked(i));
            }
        }
        None
    }

    /// Remove and return some member of this set. If the set is empty, then
    /// `None` is returned.
    pub fn pop(&mut self) -> Option<StateID> {
        let id = self.peek()?;
        self.remove(id);
        Some(id)
    }

    /// Remove every ID from this set.
    pub fn clear(&mut self) {
        for b in self.bits.iter_mut() {
            *b = 0;
        }
    }

    /// Add every ID in `other` to this set.
    ///
    /// # Panics
    ///
    /// This panics if the sets have different capacities.
    pub fn union(&mut self, other: &StateSet) {
        assert_eq!(self.capacity, other.capacity, "mismatched capacities");
        for (a, &b) in self.bits.iter_mut().zip(other.bits.iter()) {
            *a |= b;
        }
    }

    /// Return the set of IDs that are in `universe` but not in `exclude`.
    ///
    /// # Panics
    ///
    /// This panics if the sets have different capacities.
    pub fn complement(universe: &StateSet, exclude: &StateSet) -> StateSet {
        assert_eq!(
            universe.capacity, exclude.capacity,
            "mismatched capacities",
        );
        let bits = universe
            .bits
            .iter()
            .zip(exclude.bits.iter())
            .map(|(&u, &e)| u & !e)
            .collect();
        StateSet { capacity: universe.capacity, bits }
    }

    /// Returns an iterator over all IDs in this set, in ascending order.
    pub fn iter(&self) -> StateSetIter<'_> {
        StateSetIter { set: self, block: 0, bits: self.bits.get(0).copied() }
    }
}

impl core::fmt::Debug for StateSet {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let elements: Vec<usize> =
            self.iter().map(|id| id.as_usize()).collect();
        f.debug_tuple("StateSet").field(&elements).finish()
    }
}

/// An iterator over the IDs in a [`StateSet`], in ascending order.
#[derive(Debug)]
pub struct StateSetIter<'a> {
    set: &'a StateSet,
    block: usize,
    /// The bits of the current block that haven't been yielded yet.
    bits: Option<u64>,
}

impl<'a> Iterator for StateSetIter<'a> {
    type Item = StateID;

    fn next(&mut self) -> Option<StateID> {
        loop {
            let bits = self.bits?;
            if bits != 0 {
                let offset = bits.trailing_zeros() as usize;
                self.bits = Some(bits & (bits - 1));
                let id = self.block * BITS + offset;
                return Some(StateID::new_unchecked(id));
            }
            self.block += 1;
            self.bits = self.set.bits.get(self.block).copied();
        }
    }
}

impl<'a> IntoIterator for &'a StateSet {
    type Item = StateID;
    type IntoIter = StateSetIter<'a>;

    fn into_iter(self) -> StateSetIter<'a> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    fn s(id: usize) -> StateID {
        StateID::must(id)
    }

    #[test]
    fn insert_is_idempotent() {
        let mut set = StateSet::new(10);
        assert!(set.insert(s(3)));
        assert!(!set.insert(s(3)));
        assert_eq!(1, set.len());
        assert!(set.contains(s(3)));
        assert!(!set.contains(s(4)));
        assert!(!set.contains(s(500)));
    }

    #[test]
    #[should_panic]
    fn insert_beyond_capacity_panics() {
        let mut set = StateSet::new(64);
        set.insert(s(64));
    }

    #[test]
    fn pop_drains() {
        let mut set = StateSet::new(200);
        for &id in &[150, 3, 64, 63] {
            set.insert(s(id));
        }
        let mut got = vec![];
        while let Some(id) = set.pop() {
            got.push(id.as_usize());
        }
        got.sort();
        assert_eq!(vec![3, 63, 64, 150], got);
        assert!(set.is_empty());
        assert_eq!(None, set.pop());
        assert_eq!(None, set.peek());
    }

    #[test]
    fn peek_does_not_remove() {
        let mut set = StateSet::new(8);
        set.insert(s(5));
        set.insert(s(2));
        assert_eq!(Some(s(2)), set.peek());
        assert_eq!(2, set.len());
    }

    #[test]
    fn complement_of_range() {
        let universe = StateSet::range(130, s(1), s(129));
        let mut accepting = StateSet::new(130);
        accepting.insert(s(2));
        accepting.insert(s(129));
        let rest = StateSet::complement(&universe, &accepting);
        assert_eq!(127, rest.len());
        assert!(rest.contains(s(1)));
        assert!(!rest.contains(s(2)));
        assert!(!rest.contains(s(129)));
        assert!(!rest.contains(s(0)));
    }

    #[test]
    fn equality_is_bitwise() {
        let mut a = StateSet::new(100);
        let mut b = StateSet::new(100);
        a.insert(s(1));
        a.insert(s(99));
        b.insert(s(99));
        assert_ne!(a, b);
        b.insert(s(1));
        assert_eq!(a, b);
        a.remove(s(1));
        a.insert(s(1));
        assert_eq!(a, b);
    }

    quickcheck! {
        fn prop_iter_yields_sorted_members(ids: Vec<u8>) -> bool {
            let mut set = StateSet::new(256);
            for &id in &ids {
                set.insert(StateID::new_unchecked(id as usize));
            }
            let mut expected: Vec<usize> =
                ids.iter().map(|&id| id as usize).collect();
            expected.sort();
            expected.dedup();
            let got: Vec<usize> = set.iter().map(|id| id.as_usize()).collect();
            got == expected && set.len() == expected.len()
        }

        fn prop_complement_partitions_universe(
            a: Vec<u8>,
            b: Vec<u8>
        ) -> bool {
            let (mut universe, mut exclude) =
                (StateSet::new(256), StateSet::new(256));
            for &id in &a {
                universe.insert(StateID::new_unchecked(id as usize));
            }
            for &id in &b {
                exclude.insert(StateID::new_unchecked(id as usize));
            }
            let rest = StateSet::complement(&universe, &exclude);
            universe.iter().all(|id| {
                rest.contains(id) != exclude.contains(id)
            }) && rest.iter().all(|id| universe.contains(id))
        }
    }
}
