use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    automaton::{FiniteAutomaton, NFA},
    error::AutomatonError,
    math::OrderedSet,
};

/// Computes the epsilon-closure of the given states, that is every state reachable from one of
/// them through zero or more epsilon transitions. The seeds themselves are part of the closure.
/// Names that do not belong to `nfa` are ignored.
pub fn epsilon_closure<'a, I>(nfa: &'a NFA, seeds: I) -> OrderedSet<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut closure = OrderedSet::new();
    let mut stack = seeds
        .into_iter()
        .filter_map(|name| nfa.state(name))
        .collect::<Vec<_>>();

    while let Some(state) = stack.pop() {
        if !closure.insert(state.name()) {
            continue;
        }
        for transition in state.transitions().iter().filter(|t| t.is_epsilon()) {
            if let Some(next) = nfa.state(transition.target()) {
                if !closure.contains(next.name()) {
                    stack.push(next);
                }
            }
        }
    }
    closure
}

/// Produces a new [`NFA`] without epsilon transitions that accepts the same language as `nfa`.
///
/// For every state `q` and symbol `a`, the result has a transition from `q` on `a` to each
/// state in the epsilon-closure of the `a`-successors of the epsilon-closure of `q`. A state
/// is final if its epsilon-closure contains a final state. All states of `nfa` are kept in
/// their original order and the initial state is carried over by name.
///
/// # Example
/// ```
/// use determinize::prelude::*;
///
/// let mut nfa = NFA::new();
/// for q in ["A", "B", "C"] {
///     nfa.add_state(q).unwrap();
/// }
/// nfa.set_initial("A").unwrap();
/// nfa.add_final("C").unwrap();
/// nfa.add_transition("A", EPSILON, "B").unwrap();
/// nfa.add_transition("B", '0', "C").unwrap();
///
/// let free = eliminate_epsilon(&nfa).unwrap();
/// assert!(!free.has_epsilon());
/// assert_eq!(free.successors("A", '0').collect::<Vec<_>>(), vec!["C"]);
/// ```
pub fn eliminate_epsilon(nfa: &NFA) -> Result<NFA, AutomatonError> {
    let initial = nfa.initial()?;
    debug!(
        "eliminating epsilon transitions from NFA with {} states",
        nfa.size()
    );

    let mut out = NFA::for_alphabet(nfa.alphabet().clone());
    for state in nfa.states() {
        out.add_state(state.name())?;
    }
    out.set_initial(initial.name())?;

    for state in nfa.states() {
        let closure = epsilon_closure(nfa, [state.name()]);
        trace!(
            "closure of {} is {{{}}}",
            state.name(),
            closure.iter().join(", ")
        );
        if closure.iter().any(|q| nfa.is_final(q)) {
            out.add_final(state.name())?;
        }

        for symbol in nfa.alphabet().universe() {
            let step: OrderedSet<&str> = closure
                .iter()
                .flat_map(|q| nfa.successors(q, symbol))
                .collect();
            for target in epsilon_closure(nfa, step) {
                out.add_transition(state.name(), symbol, target)?;
            }
        }
    }

    debug_assert!(!out.has_epsilon());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn chain() -> NFA {
        let mut nfa = NFA::new();
        for q in ["A", "B", "C", "D"] {
            nfa.add_state(q).unwrap();
        }
        nfa.set_initial("A").unwrap();
        nfa.add_final("D").unwrap();
        nfa.add_transition("A", EPSILON, "B").unwrap();
        nfa.add_transition("B", EPSILON, "A").unwrap();
        nfa.add_transition("B", '0', "C").unwrap();
        nfa.add_transition("C", EPSILON, "D").unwrap();
        nfa.add_transition("D", '1', "A").unwrap();
        nfa
    }

    #[test]
    fn closure_terminates_on_cycles() {
        let nfa = chain();
        let closure = epsilon_closure(&nfa, ["A"]);
        assert_eq!(closure.into_iter().collect::<Vec<_>>(), vec!["A", "B"]);
        let closure = epsilon_closure(&nfa, ["C", "missing"]);
        assert_eq!(closure.into_iter().collect::<Vec<_>>(), vec!["C", "D"]);
    }

    #[test_log::test]
    fn epsilon_edges_are_folded_into_labeled_ones() {
        let nfa = chain();
        let free = eliminate_epsilon(&nfa).unwrap();

        assert!(!free.has_epsilon());
        assert!(free
            .states()
            .all(|q| q.transitions().iter().all(|t| !t.is_epsilon())));
        assert_eq!(free.initial().unwrap().name(), "A");
        assert_eq!(
            free.successors("A", '0').collect::<Vec<_>>(),
            vec!["C", "D"]
        );
        assert_eq!(
            free.successors("D", '1').collect::<Vec<_>>(),
            vec!["A", "B"]
        );
        assert!(free.is_final("C"));
        assert!(free.is_final("D"));
        assert!(!free.is_final("A"));

        for word in ["", "0", "01", "010", "0101", "1", "00"] {
            assert_eq!(
                nfa.accepts(word).unwrap(),
                free.accepts(word).unwrap(),
                "disagreement on {word:?}"
            );
        }
    }

    #[test]
    fn initial_state_inherits_finality_through_closure() {
        let mut nfa = NFA::new();
        for q in ["A", "B"] {
            nfa.add_state(q).unwrap();
        }
        nfa.set_initial("A").unwrap();
        nfa.add_final("B").unwrap();
        nfa.add_transition("A", EPSILON, "B").unwrap();
        nfa.add_symbol('0');

        let free = eliminate_epsilon(&nfa).unwrap();
        assert!(free.is_final("A"));
        assert!(free.accepts("").unwrap());
        assert!(!free.accepts("0").unwrap());
    }
}
