/*!
A sparse transition table shared by NFAs and DFAs.

A table is an ordered sequence of rows, one for each source state that has at
least one outgoing transition. Each row is an ordered sequence of
[`Transition`]s sorted by their trigger byte. Both levels are kept sorted at
all times, so every lookup is two binary searches.

For every consuming byte, a table maps each `(source, byte)` pair to at most
one destination: inserting an existing pair overwrites it. The only exception
is the epsilon sentinel used by Thompson NFAs, which may appear more than once
in the same row via [`TransitionTable::add`].
*/

use crate::util::{escape::DebugByte, id::StateID};

/// A sparse mapping from `(state, byte)` to a destination state.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct TransitionTable {
    /// Rows sorted by source state ID. No two rows share an ID.
    rows: Vec<Row>,
}

/// All of the outgoing transitions of a single source state.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Row {
    id: StateID,
    /// Sorted by `(byte, next)`.
    transitions: Vec<Transition>,
}

/// A single transition out of a state.
///
/// The derived ordering sorts by trigger byte first, which is the order
/// in which transitions are kept within a row.
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Transition {
    /// The byte that triggers this transition.
    pub byte: u8,
    /// The state this transition leads to.
    pub next: StateID,
}

impl TransitionTable {
    /// Create a new empty transition table.
    pub fn new() -> TransitionTable {
        TransitionTable { rows: vec![] }
    }

    /// Returns true if and only if this table has no transitions.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows in this table, which is the number of
    /// states with at least one outgoing transition.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Return the destination of the transition out of `id` on `byte`.
    ///
    /// If no such transition exists, then `StateID::ZERO` is returned. When
    /// more than one transition exists (which only happens for epsilon
    /// transitions in an NFA), the one with the smallest destination is
    /// returned.
    pub fn find(&self, id: StateID, byte: u8) -> StateID {
        self.find_all(id, byte).first().map_or(StateID::ZERO, |t| t.next)
    }

    /// Return every transition out of `id` on `byte`, ordered by
    /// destination.
    pub fn find_all(&self, id: StateID, byte: u8) -> &[Transition] {
        match self.row(id) {
            None => &[],
            Some(row) => row.find_all(byte),
        }
    }

    /// Insert a transition from `id` to `next` on `byte`.
    ///
    /// If a row for `id` doesn't exist, then one is created. If a transition
    /// on `byte` already exists in that row, then its destination is
    /// overwritten.
    pub fn insert(&mut self, id: StateID, byte: u8, next: StateID) {
        let row = self.row_mut(id);
        match row.transitions.binary_search_by_key(&byte, |t| t.byte) {
            Ok(i) => row.transitions[i].next = next,
            Err(i) => row.transitions.insert(i, Transition { byte, next }),
        }
    }

    /// Add a transition from `id` to `next` on `byte` without overwriting any
    /// existing transition on the same byte. Adding an identical transition
    /// twice is a no-op.
    ///
    /// This is how an NFA records more than one epsilon transition out of
    /// the same state.
    pub fn add(&mut self, id: StateID, byte: u8, next: StateID) {
        let row = self.row_mut(id);
        let t = Transition { byte, next };
        if let Err(i) = row.transitions.binary_search(&t) {
            row.transitions.insert(i, t);
        }
    }

    /// Return the row for the given state, if it has any transitions.
    pub fn row(&self, id: StateID) -> Option<&Row> {
        self.rows
            .binary_search_by_key(&id, |r| r.id)
            .ok()
            .map(|i| &self.rows[i])
    }

    /// Return an iterator over all rows in this table, in order of their
    /// source state ID.
    pub fn rows(&self) -> core::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Return an iterator over every `(source, transition)` pair in this
    /// table, in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (StateID, Transition)> + '_ {
        self.rows
            .iter()
            .flat_map(|row| row.transitions.iter().map(move |&t| (row.id, t)))
    }

    /// Returns the largest state ID mentioned anywhere in this table, either
    /// as a source or as a destination.
    pub fn max_id(&self) -> Option<StateID> {
        self.iter().map(|(id, t)| core::cmp::max(id, t.next)).max()
    }

    /// Returns the smallest state ID mentioned anywhere in this table, either
    /// as a source or as a destination.
    pub fn min_id(&self) -> Option<StateID> {
        self.iter().map(|(id, t)| core::cmp::min(id, t.next)).min()
    }

    /// Merge all transitions from `other` into this table.
    ///
    /// Transitions are merged with `add` semantics, so nothing in this table
    /// is overwritten.
    pub fn append(&mut self, other: TransitionTable) {
        if self.rows.is_empty() {
            self.rows = other.rows;
            return;
        }
        for row in other.rows {
            for t in row.transitions {
                self.add(row.id, t.byte, t.next);
            }
        }
    }

    /// Return a copy of this table where every state ID, both sources and
    /// destinations, has been increased by `offset`.
    ///
    /// Callers must ensure that the shifted IDs do not exceed
    /// [`StateID::MAX`].
    pub fn shifted(&self, offset: usize) -> TransitionTable {
        let shift = |id: StateID| {
            StateID::new_unchecked(id.as_usize() + offset)
        };
        let rows = self
            .rows
            .iter()
            .map(|row| Row {
                id: shift(row.id),
                transitions: row
                    .transitions
                    .iter()
                    .map(|t| Transition { byte: t.byte, next: shift(t.next) })
                    .collect(),
            })
            .collect();
        TransitionTable { rows }
    }

    /// Return a mutable reference to the row for `id`, creating an empty
    /// row if one doesn't exist yet.
    fn row_mut(&mut self, id: StateID) -> &mut Row {
        let i = match self.rows.binary_search_by_key(&id, |r| r.id) {
            Ok(i) => i,
            Err(i) => {
                self.rows.insert(i, Row { id, transitions: vec![] });
                i
            }
        };
        &mut self.rows[i]
    }
}

impl core::fmt::Debug for TransitionTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for row in self.rows.iter() {
            write!(f, "{:06?}: ", row.id.as_usize())?;
            for (i, t) in row.transitions.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:?}", t)?;
            }
            writeln!(f, "")?;
        }
        Ok(())
    }
}

impl core::fmt::Debug for Transition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?} => {:?}", DebugByte(self.byte), self.next.as_usize())
    }
}

impl Row {
    /// The source state of every transition in this row.
    pub fn id(&self) -> StateID {
        self.id
    }

    /// All transitions in this row, sorted by trigger byte.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Return every transition in this row on the given byte.
    pub fn find_all(&self, byte: u8) -> &[Transition] {
        let start = self.transitions.partition_point(|t| t.byte < byte);
        let end = self.transitions.partition_point(|t| t.byte <= byte);
        &self.transitions[start..end]
    }

    /// Return an iterator over the transitions in this row, where runs of
    /// consecutive bytes leading to the same state are merged into a single
    /// range.
    pub fn ranges(&self) -> Ranges<'_> {
        Ranges { transitions: &self.transitions }
    }
}

/// An inclusive range of trigger bytes that all lead to the same state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ByteRange {
    pub start: u8,
    pub end: u8,
    pub next: StateID,
}

/// An iterator over the merged byte ranges of a [`Row`].
#[derive(Debug)]
pub struct Ranges<'a> {
    transitions: &'a [Transition],
}

impl<'a> Iterator for Ranges<'a> {
    type Item = ByteRange;

    fn next(&mut self) -> Option<ByteRange> {
        let (first, rest) = self.transitions.split_first()?;
        let mut range =
            ByteRange { start: first.byte, end: first.byte, next: first.next };
        let mut len = 1;
        for t in rest {
            if t.next != range.next || range.end.checked_add(1) != Some(t.byte)
            {
                break;
            }
            range.end = t.byte;
            len += 1;
        }
        self.transitions = &self.transitions[len..];
        Some(range)
    }
}

impl core::fmt::Display for ByteRange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.start == self.end {
            write!(f, "{:?}", DebugByte(self.start))
        } else {
            write!(f, "{:?}-{:?}", DebugByte(self.start), DebugByte(self.end))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(id: usize) -> StateID {
        StateID::must(id)
    }

    #[test]
    fn find_missing() {
        let mut table = TransitionTable::new();
        assert_eq!(StateID::ZERO, table.find(s(1), b'a'));
        table.insert(s(1), b'a', s(2));
        assert_eq!(StateID::ZERO, table.find(s(1), b'b'));
        assert_eq!(StateID::ZERO, table.find(s(2), b'a'));
        assert_eq!(s(2), table.find(s(1), b'a'));
    }

    #[test]
    fn insert_overwrites() {
        let mut table = TransitionTable::new();
        table.insert(s(1), b'a', s(2));
        table.insert(s(1), b'a', s(3));
        assert_eq!(s(3), table.find(s(1), b'a'));
        assert_eq!(1, table.find_all(s(1), b'a').len());
    }

    #[test]
    fn rows_and_pairs_stay_sorted() {
        let mut table = TransitionTable::new();
        table.insert(s(5), b'z', s(1));
        table.insert(s(2), b'c', s(3));
        table.insert(s(5), b'a', s(4));
        table.insert(s(2), b'a', s(6));
        let got: Vec<(usize, u8, usize)> = table
            .iter()
            .map(|(id, t)| (id.as_usize(), t.byte, t.next.as_usize()))
            .collect();
        assert_eq!(
            vec![(2, b'a', 6), (2, b'c', 3), (5, b'a', 4), (5, b'z', 1)],
            got
        );
        assert_eq!(2, table.len());
    }

    #[test]
    fn add_keeps_parallel_edges() {
        let mut table = TransitionTable::new();
        table.add(s(1), 0, s(4));
        table.add(s(1), 0, s(2));
        table.add(s(1), 0, s(4));
        table.add(s(1), b'x', s(9));
        let nexts: Vec<StateID> =
            table.find_all(s(1), 0).iter().map(|t| t.next).collect();
        assert_eq!(vec![s(2), s(4)], nexts);
        assert_eq!(s(2), table.find(s(1), 0));
        assert_eq!(s(9), table.find(s(1), b'x'));
    }

    #[test]
    fn shifted_and_append() {
        let mut a = TransitionTable::new();
        a.insert(s(1), b'a', s(2));
        let b = a.shifted(2);
        assert_eq!(s(4), b.find(s(3), b'a'));
        assert_eq!(Some(s(3)), b.min_id());
        assert_eq!(Some(s(4)), b.max_id());

        a.append(b);
        assert_eq!(s(2), a.find(s(1), b'a'));
        assert_eq!(s(4), a.find(s(3), b'a'));
        assert_eq!(Some(s(4)), a.max_id());
    }

    #[test]
    fn ranges_merge_runs() {
        let mut table = TransitionTable::new();
        for b in b'0'..=b'9' {
            table.insert(s(1), b, s(2));
        }
        table.insert(s(1), b'a', s(2));
        table.insert(s(1), b'b', s(3));
        table.insert(s(1), b'c', s(3));
        let row = table.row(s(1)).unwrap();
        let got: Vec<String> = row.ranges().map(|r| r.to_string()).collect();
        assert_eq!(vec!["0-9", "a", "b-c"], got);
    }
}
