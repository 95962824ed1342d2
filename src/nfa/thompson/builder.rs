use crate::{
    nfa::thompson::{
        error::Error,
        nfa::{EPSILON, NFA},
    },
    util::{id::StateID, transitions::TransitionTable},
};

/// A partially built NFA with a single entry and a single exit.
///
/// Fragments are always consumed by value when combined, so no two fragments
/// ever share a state. Every fragment built by the same [`Builder`] uses
/// state IDs that are disjoint from those of every other fragment it built.
#[derive(Clone, Debug)]
pub(crate) struct Fragment {
    table: TransitionTable,
    start: StateID,
    end: StateID,
}

/// Allocates state IDs and provides the structural operations of Thompson's
/// construction.
///
/// IDs are handed out from a single "next free ID" counter starting at `1`,
/// so every fragment created by the same builder is disjoint from every
/// other, regardless of how deeply groups and alternations are nested.
#[derive(Clone, Debug)]
pub(crate) struct Builder {
    next: usize,
    limit: Option<usize>,
}

impl Builder {
    /// Create a new builder. If a limit is given, then allocating more than
    /// that many states fails.
    pub(crate) fn new(limit: Option<usize>) -> Builder {
        Builder { next: 1, limit }
    }

    /// Reserve `count` consecutive fresh IDs and return the first one.
    fn reserve(&mut self, count: usize) -> Result<usize, Error> {
        let first = self.next;
        // IDs start at 1, so the last ID reserved is also the total number
        // of states.
        let last = first + count - 1;
        if let Some(limit) = self.limit {
            if last > limit {
                return Err(Error::too_many_states(limit));
            }
        }
        if last > StateID::MAX.as_usize() {
            return Err(Error::too_many_states(StateID::LIMIT));
        }
        self.next = last + 1;
        Ok(first)
    }

    fn alloc(&mut self) -> Result<StateID, Error> {
        self.reserve(1).map(StateID::new_unchecked)
    }

    /// A fragment matching only the empty string.
    pub(crate) fn empty(&mut self) -> Result<Fragment, Error> {
        let (start, end) = (self.alloc()?, self.alloc()?);
        let mut table = TransitionTable::new();
        table.add(start, EPSILON, end);
        Ok(Fragment { table, start, end })
    }

    /// A fragment matching exactly one byte.
    pub(crate) fn literal(&mut self, byte: u8) -> Result<Fragment, Error> {
        self.range(byte, byte)
    }

    /// A fragment matching exactly one byte in the inclusive range given.
    pub(crate) fn range(
        &mut self,
        start_byte: u8,
        end_byte: u8,
    ) -> Result<Fragment, Error> {
        assert_ne!(EPSILON, start_byte, "epsilon cannot be matched");
        let (start, end) = (self.alloc()?, self.alloc()?);
        let mut table = TransitionTable::new();
        for byte in start_byte..=end_byte {
            table.insert(start, byte, end);
        }
        Ok(Fragment { table, start, end })
    }

    /// Concatenate two fragments by linking the end of the first to the
    /// start of the second. When there is no first fragment, the second is
    /// returned unchanged.
    pub(crate) fn concat(
        &self,
        first: Option<Fragment>,
        second: Fragment,
    ) -> Fragment {
        let mut first = match first {
            None => return second,
            Some(first) => first,
        };
        first.table.append(second.table);
        first.table.add(first.end, EPSILON, second.start);
        Fragment { table: first.table, start: first.start, end: second.end }
    }

    /// A fragment matching either of the two fragments given.
    pub(crate) fn alternate(
        &mut self,
        left: Fragment,
        right: Fragment,
    ) -> Result<Fragment, Error> {
        let (head, tail) = (self.alloc()?, self.alloc()?);
        let mut table = left.table;
        table.append(right.table);
        table.add(head, EPSILON, left.start);
        table.add(head, EPSILON, right.start);
        table.add(left.end, EPSILON, tail);
        table.add(right.end, EPSILON, tail);
        Ok(Fragment { table, start: head, end: tail })
    }

    /// A fragment matching zero or more repetitions of the one given.
    pub(crate) fn star(&mut self, frag: Fragment) -> Result<Fragment, Error> {
        let (head, tail) = (self.alloc()?, self.alloc()?);
        let mut table = frag.table;
        table.add(head, EPSILON, frag.start);
        table.add(head, EPSILON, tail);
        table.add(frag.end, EPSILON, frag.start);
        table.add(frag.end, EPSILON, tail);
        Ok(Fragment { table, start: head, end: tail })
    }

    /// A fragment matching one or more repetitions of the one given.
    ///
    /// This is the given fragment followed by a starred duplicate of it.
    pub(crate) fn plus(&mut self, frag: Fragment) -> Result<Fragment, Error> {
        let copy = self.duplicate(&frag)?;
        let starred = self.star(copy)?;
        Ok(self.concat(Some(frag), starred))
    }

    /// Return a copy of the given fragment that uses fresh state IDs.
    ///
    /// Every ID in the copy is shifted by the same offset, so the copy has
    /// exactly the same shape as the fragment it was copied from.
    pub(crate) fn duplicate(
        &mut self,
        frag: &Fragment,
    ) -> Result<Fragment, Error> {
        let (min, max) = frag.id_range();
        let first = self.reserve(max.as_usize() - min.as_usize() + 1)?;
        let offset = first - min.as_usize();
        let shift =
            |id: StateID| StateID::new_unchecked(id.as_usize() + offset);
        Ok(Fragment {
            table: frag.table.shifted(offset),
            start: shift(frag.start),
            end: shift(frag.end),
        })
    }

    /// Turn a complete fragment into an NFA.
    pub(crate) fn finish(&self, frag: Fragment) -> NFA {
        NFA::from_parts(frag.table, frag.start, frag.end)
    }
}

impl Fragment {
    /// Returns the smallest and largest IDs used by this fragment.
    fn id_range(&self) -> (StateID, StateID) {
        let ends = [self.start, self.end];
        let min = self.table.min_id().into_iter().chain(ends.iter().copied());
        let max = self.table.max_id().into_iter().chain(ends.iter().copied());
        // Both iterators contain at least the start and end states.
        (min.min().unwrap_or(self.start), max.max().unwrap_or(self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(id: usize) -> StateID {
        StateID::must(id)
    }

    #[test]
    fn ids_are_never_reused() {
        let mut b = Builder::new(None);
        let x = b.literal(b'x').unwrap();
        let y = b.literal(b'y').unwrap();
        assert_eq!((s(1), s(2)), (x.start, x.end));
        assert_eq!((s(3), s(4)), (y.start, y.end));
        let alt = b.alternate(x, y).unwrap();
        assert_eq!((s(5), s(6)), (alt.start, alt.end));
        // The next fresh ID follows the six allocated states.
        assert_eq!(7, b.next);
    }

    #[test]
    fn star_links_head_and_end() {
        let mut b = Builder::new(None);
        let a = b.literal(b'a').unwrap();
        let star = b.star(a).unwrap();
        let eps = |id| {
            star.table
                .find_all(s(id), EPSILON)
                .iter()
                .map(|t| t.next.as_usize())
                .collect::<Vec<usize>>()
        };
        assert_eq!(vec![1, 4], eps(3));
        assert_eq!(vec![1, 4], eps(2));
        let nfa = b.finish(star);
        assert!(nfa.is_match(b""));
        assert!(nfa.is_match(b"aaa"));
        assert!(!nfa.is_match(b"ab"));
    }

    #[test]
    fn duplicate_is_disjoint() {
        let mut b = Builder::new(None);
        let a = b.literal(b'a').unwrap();
        let c = b.literal(b'c').unwrap();
        let ac = b.concat(Some(a), c);
        let copy = b.duplicate(&ac).unwrap();
        assert_eq!((s(5), s(8)), (copy.start, copy.end));
        assert_eq!(s(6), copy.table.find(s(5), b'a'));
        assert_eq!(s(8), copy.table.find(s(7), b'c'));
        assert_eq!(9, b.next);
    }

    #[test]
    fn plus_requires_one() {
        let mut b = Builder::new(None);
        let a = b.literal(b'a').unwrap();
        let nfa = {
            let plus = b.plus(a).unwrap();
            b.finish(plus)
        };
        assert!(!nfa.is_match(b""));
        assert!(nfa.is_match(b"a"));
        assert!(nfa.is_match(b"aaaa"));
    }

    #[test]
    fn limit_is_enforced() {
        let mut b = Builder::new(Some(3));
        b.literal(b'a').unwrap();
        let err = b.literal(b'b').unwrap_err();
        assert_eq!(
            &crate::nfa::thompson::ErrorKind::TooManyStates { limit: 3 },
            err.kind()
        );
    }
}
