/*!
Low level building blocks shared by every automaton in this crate.

The [`transitions`] and [`state_set`] modules provide the two data structures
that the Thompson builder, the subset constructor and the minimizer are built
on. The [`id`] module defines the state identifier type they all speak.
*/

pub mod id;
pub mod state_set;
pub mod transitions;

pub(crate) mod escape;
