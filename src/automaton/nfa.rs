use std::fmt::Display;

use crate::{
    alphabet::{CharAlphabet, EPSILON},
    error::AutomatonError,
    math::OrderedSet,
    operations::{eliminate_epsilon, epsilon_closure, subset_construction},
};

use super::{describe, AutomatonCore, FiniteAutomaton, State, Transition, DFA};

/// A nondeterministic finite automaton over a [`CharAlphabet`], which may contain transitions
/// labeled with [`EPSILON`]. Whether it does is tracked by [`NFA::has_epsilon`].
///
/// # Example
/// ```
/// use determinize::prelude::*;
///
/// let mut nfa = NFA::new();
/// nfa.add_state("A").unwrap();
/// nfa.add_state("B").unwrap();
/// nfa.set_initial("A").unwrap();
/// nfa.add_final("B").unwrap();
/// nfa.add_transition("A", '0', "A").unwrap();
/// nfa.add_transition("A", '0', "B").unwrap();
/// assert!(nfa.accepts("000").unwrap());
/// assert!(!nfa.accepts("").unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct NFA {
    core: AutomatonCore,
    has_epsilon: bool,
}

impl FiniteAutomaton for NFA {
    fn core(&self) -> &AutomatonCore {
        &self.core
    }

    fn table_symbols(&self) -> Vec<char> {
        let mut symbols: Vec<char> = self.alphabet().universe().collect();
        if self.has_epsilon {
            symbols.push(EPSILON);
        }
        symbols
    }
}

impl NFA {
    /// Creates an empty automaton over the empty alphabet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty automaton over the given alphabet.
    pub fn for_alphabet(alphabet: CharAlphabet) -> Self {
        Self {
            core: AutomatonCore::for_alphabet(alphabet),
            has_epsilon: false,
        }
    }

    /// Returns true if at least one transition is labeled with [`EPSILON`].
    pub fn has_epsilon(&self) -> bool {
        self.has_epsilon
    }

    /// Adds a state without transitions. Fails with [`AutomatonError::DuplicateState`] if the
    /// name is already taken, in which case the automaton is left unchanged.
    pub fn add_state<S: Into<String>>(&mut self, name: S) -> Result<(), AutomatonError> {
        self.core.add_state(State::new(name))
    }

    /// Returns the state with the given name, creating it first if it does not exist yet.
    pub fn state_or_insert(&mut self, name: &str) -> &State {
        if !self.core.states.contains_key(name) {
            self.core.states.insert(name.to_string(), State::new(name));
        }
        &self.core.states[name]
    }

    /// Adds `symbol` to the alphabet. Adding [`EPSILON`] has no effect.
    pub fn add_symbol(&mut self, symbol: char) -> bool {
        self.core.alphabet.insert(symbol)
    }

    /// Makes the state with the given name the initial state.
    pub fn set_initial(&mut self, name: &str) -> Result<(), AutomatonError> {
        self.core.set_initial(name)
    }

    /// Marks the state with the given name as final. Returns whether it was not final before.
    pub fn add_final(&mut self, name: &str) -> Result<bool, AutomatonError> {
        self.core.add_final(name)
    }

    /// Adds a transition between two existing states. Non-epsilon symbols become part of the
    /// alphabet. Returns whether the transition is new.
    pub fn add_transition(
        &mut self,
        from: &str,
        symbol: char,
        to: &str,
    ) -> Result<bool, AutomatonError> {
        self.core.ensure_known(to)?;
        let added = self
            .core
            .state_mut(from)?
            .add_transition(Transition::new(symbol, to));
        if symbol == EPSILON {
            self.has_epsilon = true;
        } else {
            self.core.alphabet.insert(symbol);
        }
        Ok(added)
    }

    /// Iterates over the names of the states reached from `state` on `symbol`. Yields nothing
    /// if the state does not exist.
    pub fn successors<'a>(&'a self, state: &str, symbol: char) -> impl Iterator<Item = &'a str> {
        self.state(state)
            .into_iter()
            .flat_map(move |q| q.targets(symbol))
    }

    /// Decides whether the automaton accepts `word` by tracking the set of states that can be
    /// reached, closed under epsilon transitions. Symbols outside the alphabet reject.
    pub fn accepts(&self, word: &str) -> Result<bool, AutomatonError> {
        let initial = self.initial()?;
        let mut current = epsilon_closure(self, [initial.name()]);
        for symbol in word.chars() {
            if !self.alphabet().contains(symbol) {
                return Ok(false);
            }
            let step: OrderedSet<&str> = current
                .iter()
                .flat_map(|q| self.successors(q, symbol))
                .collect();
            current = epsilon_closure(self, step);
            if current.is_empty() {
                return Ok(false);
            }
        }
        Ok(current.iter().any(|q| self.is_final(q)))
    }

    /// Converts `self` into an equivalent [`DFA`]. If there are epsilon transitions, they are
    /// eliminated first, `self` stays untouched in any case.
    pub fn determinize(&self) -> Result<DFA, AutomatonError> {
        if self.has_epsilon {
            subset_construction(&eliminate_epsilon(self)?)
        } else {
            subset_construction(self)
        }
    }
}

impl Display for NFA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        describe("NFA", self, f)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn state_lookup_creates_missing_states() {
        let mut nfa = NFA::new();
        assert_eq!(nfa.state_or_insert("A").name(), "A");
        assert_eq!(nfa.state_or_insert("A").name(), "A");
        assert_eq!(nfa.size(), 1);
    }

    #[test]
    fn transitions_track_epsilon_and_alphabet() {
        let mut nfa = NFA::new();
        for q in ["A", "B"] {
            nfa.add_state(q).unwrap();
        }
        assert!(nfa.add_transition("A", '1', "B").unwrap());
        assert!(!nfa.add_transition("A", '1', "B").unwrap());
        assert!(!nfa.has_epsilon());
        nfa.add_transition("A", EPSILON, "B").unwrap();
        assert!(nfa.has_epsilon());
        assert_eq!(nfa.alphabet().universe().collect::<String>(), "1");
        assert_eq!(nfa.table_symbols(), vec!['1', EPSILON]);
        assert!(matches!(
            nfa.add_transition("A", '1', "C"),
            Err(AutomatonError::UnknownState(_))
        ));
    }

    #[test_log::test]
    fn acceptance_follows_epsilon_closures() {
        let mut nfa = NFA::new();
        for q in ["A", "B", "C"] {
            nfa.add_state(q).unwrap();
        }
        nfa.set_initial("A").unwrap();
        nfa.add_final("C").unwrap();
        nfa.add_transition("A", EPSILON, "B").unwrap();
        nfa.add_transition("B", '0', "C").unwrap();
        nfa.add_transition("C", EPSILON, "A").unwrap();

        assert!(nfa.accepts("0").unwrap());
        assert!(nfa.accepts("000").unwrap());
        assert!(!nfa.accepts("").unwrap());
        assert!(!nfa.accepts("01").unwrap());
    }

    #[test]
    fn acceptance_needs_an_initial_state() {
        let nfa = NFA::new();
        assert!(matches!(
            nfa.accepts(""),
            Err(AutomatonError::MissingInitialState)
        ));
    }
}
