use crate::{
    dfa::DFA,
    util::{id::StateID, state_set::StateSet, transitions::TransitionTable},
};

/// An implementation of Moore's partition refinement algorithm for
/// minimizing DFAs.
///
/// The partition starts as the accepting states and the non-accepting
/// states. Each pass then tries to split every block in two: a block is
/// split on the first byte for which its members don't all transition into
/// the same block (where "no transition" counts as its own block). Passes
/// repeat until one of them doesn't split anything, at which point every
/// block is a set of states that no input can tell apart.
///
/// Each pass is quadratic in the worst case, but the automata built from the
/// patterns this crate supports are small enough that it doesn't matter.
/// Hopcroft's algorithm would produce the same result.
///
/// The minimal DFA keeps the convention that state `1` is the start state.
/// The block containing the original start state gets ID `1` and every other
/// block follows in partition order.
pub(crate) struct Minimizer<'a> {
    dfa: &'a DFA,
    /// The blocks of the current partition.
    partition: Vec<StateSet>,
}

impl<'a> core::fmt::Debug for Minimizer<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Minimizer")
            .field("partition", &self.partition)
            .finish()
    }
}

impl<'a> Minimizer<'a> {
    pub fn new(dfa: &'a DFA) -> Minimizer<'a> {
        let n = dfa.state_len();
        let universe = StateSet::range(
            n,
            StateID::new_unchecked(1),
            StateID::new_unchecked(n - 1),
        );
        let accepting = dfa.accepting_states().clone();
        let rejecting = StateSet::complement(&universe, &accepting);
        let partition: Vec<StateSet> = vec![rejecting, accepting]
            .into_iter()
            .filter(|block| !block.is_empty())
            .collect();
        Minimizer { dfa, partition }
    }

    #[cfg_attr(
        not(feature = "logging"),
        allow(unused_variables, unused_assignments)
    )]
    pub fn run(mut self) -> DFA {
        let mut passes = 0;
        loop {
            passes += 1;
            let block_of = self.block_map();
            let mut next = Vec::with_capacity(self.partition.len());
            for block in self.partition.iter() {
                let (left, right) = self.split(block, &block_of);
                next.push(left);
                if !right.is_empty() {
                    next.push(right);
                }
            }
            trace!(
                "minimization pass {}: {} blocks refined into {}",
                passes,
                self.partition.len(),
                next.len(),
            );
            let stable = next.len() == self.partition.len();
            self.partition = next;
            if stable {
                break;
            }
        }
        let min = self.build();
        debug!(
            "minimized DFA from {} states to {} states in {} passes",
            self.dfa.state_len() - 1,
            min.state_len() - 1,
            passes,
        );
        min
    }

    /// Split a block on the first byte that distinguishes its members, or
    /// return it unchanged (with an empty right half) if no byte does.
    fn split(
        &self,
        block: &StateSet,
        block_of: &[Option<usize>],
    ) -> (StateSet, StateSet) {
        let target = |id: StateID, byte: u8| {
            block_of[self.dfa.next_state(id, byte).as_usize()]
        };
        let first = match block.peek() {
            Some(first) => first,
            None => unreachable!("partition blocks are never empty"),
        };
        for byte in 1..=255 {
            let expect = target(first, byte);
            if block.iter().all(|id| target(id, byte) == expect) {
                continue;
            }
            let capacity = block.capacity();
            let (mut left, mut right) =
                (StateSet::new(capacity), StateSet::new(capacity));
            for id in block.iter() {
                if target(id, byte) == expect {
                    left.insert(id);
                } else {
                    right.insert(id);
                }
            }
            return (left, right);
        }
        (block.clone(), StateSet::new(block.capacity()))
    }

    /// Map every DFA state to the index of the block containing it in the
    /// current partition. The error state is in no block.
    fn block_map(&self) -> Vec<Option<usize>> {
        let mut block_of = vec![None; self.dfa.state_len()];
        for (i, block) in self.partition.iter().enumerate() {
            for id in block.iter() {
                block_of[id.as_usize()] = Some(i);
            }
        }
        assert!(
            block_of[1..].iter().all(Option::is_some),
            "every DFA state must belong to exactly one block",
        );
        block_of
    }

    /// Build the minimal DFA from the final partition.
    fn build(&self) -> DFA {
        let block_of = self.block_map();
        let start_block = match block_of[self.dfa.start().as_usize()] {
            Some(block) => block,
            None => unreachable!("start state must belong to a block"),
        };
        // Block 'i' becomes state 'new_ids[i]'.
        let mut new_ids = vec![StateID::ZERO; self.partition.len()];
        new_ids[start_block] = StateID::new_unchecked(1);
        let mut next_id = 2;
        for (i, new_id) in new_ids.iter_mut().enumerate() {
            if i != start_block {
                *new_id = StateID::new_unchecked(next_id);
                next_id += 1;
            }
        }

        let state_len = self.partition.len() + 1;
        let mut table = TransitionTable::new();
        let mut accepting = StateSet::new(state_len);
        for (i, block) in self.partition.iter().enumerate() {
            let rep = match block.peek() {
                Some(rep) => rep,
                None => unreachable!("partition blocks are never empty"),
            };
            let is_match = self.dfa.is_match_state(rep);
            debug_assert!(
                block.iter().all(|id| self.dfa.is_match_state(id) == is_match),
                "all states in a block must agree on acceptance",
            );
            if is_match {
                accepting.insert(new_ids[i]);
            }
            let row = match self.dfa.transitions().row(rep) {
                Some(row) => row,
                None => continue,
            };
            for t in row.transitions() {
                let to = match block_of[t.next.as_usize()] {
                    Some(to) => to,
                    None => continue,
                };
                table.insert(new_ids[i], t.byte, new_ids[to]);
            }
        }
        DFA::from_parts(table, state_len, accepting)
    }
}
