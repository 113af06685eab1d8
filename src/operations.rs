/// Removal of epsilon transitions by folding epsilon-closures into labeled transitions.
mod epsilon;
pub use epsilon::{eliminate_epsilon, epsilon_closure};

/// Lazy powerset construction turning an epsilon-free [`crate::automaton::NFA`] into a
/// [`crate::automaton::DFA`].
mod subset;
pub use subset::{canonical_name, subset_construction, SubsetConstruction};

/// Moore-style partition refinement on the states of a [`crate::automaton::DFA`].
mod partition_refinement;
pub use partition_refinement::{partition_refinement, Equivalences};
