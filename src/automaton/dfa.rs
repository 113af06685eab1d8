use std::fmt::Display;

use crate::{
    alphabet::CharAlphabet,
    error::AutomatonError,
    operations::{partition_refinement, Equivalences},
};

use super::{describe, AutomatonCore, FiniteAutomaton, State};

/// Name of the synthetic dead state that absorbs every transition which would otherwise be
/// undefined.
pub const PHI: &str = "Ø";

/// A deterministic finite automaton. When produced by the subset construction, every state has
/// precisely one transition for each symbol of the alphabet, there are no epsilon transitions
/// and every state is reachable from the initial state.
///
/// Unlike an [`crate::automaton::NFA`], looking up a state that does not exist is an error, the states of
/// a DFA are fixed once it has been built.
#[derive(Debug, Clone, Default)]
pub struct DFA {
    core: AutomatonCore,
    has_phi: bool,
}

impl FiniteAutomaton for DFA {
    fn core(&self) -> &AutomatonCore {
        &self.core
    }
}

impl DFA {
    /// Creates an empty automaton over the given alphabet.
    pub fn for_alphabet(alphabet: CharAlphabet) -> Self {
        Self {
            core: AutomatonCore::for_alphabet(alphabet),
            has_phi: false,
        }
    }

    /// Adds a state without transitions, rejecting names that are already taken.
    pub fn add_state<S: Into<String>>(&mut self, name: S) -> Result<(), AutomatonError> {
        self.core.add_state(State::new(name))
    }

    /// Makes the state with the given name the initial state.
    pub fn set_initial(&mut self, name: &str) -> Result<(), AutomatonError> {
        self.core.set_initial(name)
    }

    /// Marks the state with the given name as final. Returns whether it was not final before.
    pub fn add_final(&mut self, name: &str) -> Result<bool, AutomatonError> {
        self.core.add_final(name)
    }

    /// Sets the successor of `from` on `symbol` to `to`, replacing an existing transition on the
    /// same symbol. The symbol becomes part of the alphabet.
    pub fn add_transition(
        &mut self,
        from: &str,
        symbol: char,
        to: &str,
    ) -> Result<(), AutomatonError> {
        self.core.ensure_known(to)?;
        self.core.state_mut(from)?.replace_transition(symbol, to);
        self.core.alphabet.insert(symbol);
        Ok(())
    }

    /// Appends a fully built state, used by the subset construction.
    pub(crate) fn push_state(
        &mut self,
        state: State,
        accepting: bool,
    ) -> Result<(), AutomatonError> {
        let name = state.name().to_string();
        self.core.add_state(state)?;
        if accepting {
            self.core.finals.insert(name);
        }
        Ok(())
    }

    /// Appends the dead state [`PHI`] with a self-loop on every symbol.
    pub(crate) fn push_phi(&mut self) -> Result<(), AutomatonError> {
        let mut phi = State::new(PHI);
        for sym in self.core.alphabet.universe() {
            phi.replace_transition(sym, PHI);
        }
        self.core.add_state(phi)?;
        self.has_phi = true;
        Ok(())
    }

    /// Returns the synthetic dead state, if one had to be added.
    pub fn phi(&self) -> Option<&State> {
        if self.has_phi {
            self.state(PHI)
        } else {
            None
        }
    }

    /// Returns true if `name` refers to the synthetic dead state.
    pub fn is_phi(&self, name: &str) -> bool {
        self.has_phi && name == PHI
    }

    /// Looks up a state by name, failing with [`AutomatonError::UnknownState`] if there is none.
    pub fn state_by_name(&self, name: &str) -> Result<&State, AutomatonError> {
        self.state(name)
            .ok_or_else(|| AutomatonError::UnknownState(name.to_string()))
    }

    /// Returns the state reached from `state` on `symbol`, or `None` if there is no such
    /// transition.
    pub fn successor(&self, state: &str, symbol: char) -> Result<Option<&State>, AutomatonError> {
        Ok(self
            .state_by_name(state)?
            .target(symbol)
            .and_then(|target| self.state(target)))
    }

    /// Returns true if every state has exactly one transition on every symbol of the alphabet.
    pub fn is_total(&self) -> bool {
        self.states().all(|q| {
            self.alphabet()
                .universe()
                .all(|sym| q.targets(sym).count() == 1)
        })
    }

    /// Runs `word` from the initial state and reports whether a final state is reached.
    ///
    /// # Example
    /// ```
    /// use determinize::prelude::*;
    ///
    /// let mut dfa = DFA::for_alphabet(CharAlphabet::from_iter(['a']));
    /// dfa.add_state("even").unwrap();
    /// dfa.add_state("odd").unwrap();
    /// dfa.set_initial("even").unwrap();
    /// dfa.add_final("even").unwrap();
    /// dfa.add_transition("even", 'a', "odd").unwrap();
    /// dfa.add_transition("odd", 'a', "even").unwrap();
    /// assert!(dfa.accepts("aa").unwrap());
    /// assert!(!dfa.accepts("aaa").unwrap());
    /// ```
    pub fn accepts(&self, word: &str) -> Result<bool, AutomatonError> {
        let mut current = self.initial()?;
        for symbol in word.chars() {
            match self.successor(current.name(), symbol)? {
                Some(next) => current = next,
                None => return Ok(false),
            }
        }
        Ok(self.is_final(current.name()))
    }

    /// Computes the sequence of partitions that Moore's partition refinement passes through,
    /// see [`partition_refinement`].
    pub fn equivalence_classes(&self) -> Equivalences {
        partition_refinement(self)
    }
}

impl Display for DFA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        describe("DFA", self, f)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn parity() -> DFA {
        let mut dfa = DFA::for_alphabet(CharAlphabet::from_iter(['a', 'b']));
        for q in ["even", "odd"] {
            dfa.add_state(q).unwrap();
        }
        dfa.set_initial("even").unwrap();
        dfa.add_final("even").unwrap();
        dfa.add_transition("even", 'a', "odd").unwrap();
        dfa.add_transition("odd", 'a', "even").unwrap();
        dfa.add_transition("even", 'b', "even").unwrap();
        dfa.add_transition("odd", 'b', "odd").unwrap();
        dfa
    }

    #[test]
    fn lookups_of_unknown_states_fail() {
        let dfa = parity();
        assert!(matches!(
            dfa.state_by_name("three"),
            Err(AutomatonError::UnknownState(name)) if name == "three"
        ));
        assert!(dfa.successor("three", 'a').is_err());
        assert_eq!(
            dfa.successor("even", 'a').unwrap().map(State::name),
            Some("odd")
        );
        assert!(dfa.successor("even", 'c').unwrap().is_none());
    }

    #[test]
    fn transitions_stay_deterministic() {
        let mut dfa = parity();
        assert!(dfa.is_total());
        dfa.add_transition("even", 'a', "even").unwrap();
        assert!(dfa.is_total());
        assert!(dfa.accepts("ab").unwrap());
        assert!(dfa.accepts("").unwrap());
        assert!(!dfa.accepts("c").unwrap());
        assert!(dfa.phi().is_none());
    }

    #[test]
    fn only_the_constructed_dead_state_is_phi() {
        let mut dfa = parity();
        dfa.add_state(PHI).unwrap();
        assert!(!dfa.is_phi(PHI));
        assert!(dfa.phi().is_none());

        let mut nfa = NFA::new();
        nfa.add_state("A").unwrap();
        nfa.set_initial("A").unwrap();
        nfa.add_symbol('a');
        let dfa = nfa.determinize().unwrap();
        assert_eq!(dfa.phi().map(State::name), Some(PHI));
        assert!(dfa.is_phi(PHI));
        assert!(!dfa.is_phi("A"));
    }
}
