/*!
Provides non-deterministic finite automata.

Currently the only kind of NFA is a [Thompson NFA](thompson::NFA).
*/

pub mod thompson;
