/*!
Defines a Thompson NFA and provides the compiler for building one from a
pattern.

A Thompson NFA has exactly one start state and one accepting state. It is
assembled bottom-up from small fragments using four structural operations:
concatenation, alternation, Kleene star and duplication (from which `+` is
derived). Epsilon transitions are ordinary transitions on the reserved byte
[`EPSILON`].
*/

mod builder;
mod compiler;
mod error;
mod nfa;

pub use self::{
    compiler::{Compiler, Config},
    error::{Error, ErrorKind},
    nfa::{EPSILON, NFA},
};
