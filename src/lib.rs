//! Library for turning nondeterministic finite automata into deterministic ones and for
//! computing which states of a deterministic automaton are equivalent.
//!
//! An automaton consists of a finite collection of named states, an alphabet of single `char`
//! symbols, one initial state and a set of final states. Each state owns its outgoing
//! transitions, which refer to their target by name. States are identified by their name
//! throughout, in particular the states created by the subset construction are named after the
//! sorted concatenation of the states they consist of.
//!
//! The conversion is a pipeline of three steps, each of which is available on its own:
//! - [`operations::eliminate_epsilon`] removes epsilon transitions (labeled with
//!   [`alphabet::EPSILON`]) from an [`automaton::NFA`], producing a new automaton that accepts the
//!   same language.
//! - [`operations::subset_construction`] performs the powerset construction on an epsilon-free
//!   [`automaton::NFA`]. Only states that are reachable from the initial state are built, and a
//!   dead state [`automaton::PHI`] is added if some transition would otherwise be missing.
//! - [`operations::partition_refinement`] runs Moore's algorithm on an [`automaton::DFA`] and
//!   reports every partition it goes through, the last one grouping the equivalent states.
//!
//! The first two steps are combined in [`automaton::NFA::determinize`]. Automata can be read
//! from and written to a simple text format, see [`text`], and drawn with graphviz when the
//! `graphviz` feature is enabled.
//!
//! ```
//! use determinize::prelude::*;
//!
//! let nfa: NFA = "A,B\n0,1\nA\nB\nA,0,A\nA,0,B\nA,1,A\nB,1,B".parse().unwrap();
//! let dfa = nfa.determinize().unwrap();
//! assert_eq!(dfa.states().map(State::name).collect::<Vec<_>>(), vec!["A", "AB"]);
//! assert!(dfa.accepts("10").unwrap());
//!
//! let equivalences = dfa.equivalence_classes();
//! assert_eq!(equivalences.stable().size(), 2);
//! ```
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use determinize::prelude::*;` should be enough to use the package.
pub mod prelude {
    #[cfg(feature = "graphviz")]
    pub use super::dot::{DotStateAttribute, DotTransitionAttribute, Dottable};
    #[cfg(feature = "random")]
    pub use super::random;
    pub use super::{
        alphabet::{CharAlphabet, EPSILON},
        automaton::{
            AutomatonCore, FiniteAutomaton, State, StateName, Transition, DFA, NFA, PHI,
        },
        error::AutomatonError,
        math::{self, Partition},
        operations::{
            canonical_name, eliminate_epsilon, epsilon_closure, partition_refinement,
            subset_construction, Equivalences, SubsetConstruction,
        },
        text,
    };
}

/// This module contains some definitions of mathematical objects which are used throughout the crate and
/// do not really fit to the top level.
pub mod math;

/// Module that contains definitions for dealing with alphabets.
pub mod alphabet;

/// The error type of the crate.
pub mod error;
pub use error::AutomatonError;

/// Defines states, transitions and the two kinds of automata.
#[allow(clippy::upper_case_acronyms)]
pub mod automaton;

/// The algorithms: epsilon elimination, subset construction and partition refinement.
pub mod operations;

pub mod text;

#[cfg(feature = "graphviz")]
pub mod dot;

/// Implements the generation of random automata and words.
#[cfg(feature = "random")]
pub mod random;
