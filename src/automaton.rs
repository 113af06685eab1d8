use itertools::Itertools;

use crate::{
    alphabet::CharAlphabet,
    error::AutomatonError,
    math::{OrderedMap, Set},
};

mod state;
pub use state::{State, StateName, Transition};

mod nfa;
pub use nfa::NFA;

mod dfa;
pub use dfa::{DFA, PHI};

/// The storage shared by [`NFA`] and [`DFA`]: the alphabet, the states (unique by name and kept in
/// insertion order), the initial state and the set of final states.
///
/// Every state that is referenced by a transition or marked as final is also a member of the
/// automaton, the mutating methods refuse to break this.
#[derive(Debug, Clone, Default)]
pub struct AutomatonCore {
    pub(crate) alphabet: CharAlphabet,
    pub(crate) states: OrderedMap<StateName, State>,
    pub(crate) initial: Option<StateName>,
    pub(crate) finals: Set<StateName>,
}

impl AutomatonCore {
    pub(crate) fn for_alphabet(alphabet: CharAlphabet) -> Self {
        Self {
            alphabet,
            ..Default::default()
        }
    }

    /// Adds a new state, rejecting names that are already taken.
    pub(crate) fn add_state(&mut self, state: State) -> Result<(), AutomatonError> {
        if self.states.contains_key(state.name()) {
            return Err(AutomatonError::DuplicateState(state.name().to_string()));
        }
        self.states.insert(state.name().to_string(), state);
        Ok(())
    }

    pub(crate) fn set_initial(&mut self, name: &str) -> Result<(), AutomatonError> {
        self.ensure_known(name)?;
        self.initial = Some(name.to_string());
        Ok(())
    }

    pub(crate) fn add_final(&mut self, name: &str) -> Result<bool, AutomatonError> {
        self.ensure_known(name)?;
        Ok(self.finals.insert(name.to_string()))
    }

    pub(crate) fn state_mut(&mut self, name: &str) -> Result<&mut State, AutomatonError> {
        self.states
            .get_mut(name)
            .ok_or_else(|| AutomatonError::UnknownState(name.to_string()))
    }

    pub(crate) fn ensure_known(&self, name: &str) -> Result<(), AutomatonError> {
        if self.states.contains_key(name) {
            Ok(())
        } else {
            Err(AutomatonError::UnknownState(name.to_string()))
        }
    }
}

/// Common behaviour of [`NFA`] and [`DFA`]. Implementors only need to hand out their
/// [`AutomatonCore`], everything else is provided.
pub trait FiniteAutomaton {
    /// Gives access to the underlying storage.
    fn core(&self) -> &AutomatonCore;

    /// The alphabet of the automaton, it never contains [`crate::alphabet::EPSILON`].
    fn alphabet(&self) -> &CharAlphabet {
        &self.core().alphabet
    }

    /// Iterates over all states in insertion order.
    fn states(&self) -> indexmap::map::Values<'_, StateName, State> {
        self.core().states.values()
    }

    /// The number of states.
    fn size(&self) -> usize {
        self.core().states.len()
    }

    /// Looks up a state by its name.
    fn state(&self, name: &str) -> Option<&State> {
        self.core().states.get(name)
    }

    /// Returns true if a state with the given name exists.
    fn contains_state(&self, name: &str) -> bool {
        self.core().states.contains_key(name)
    }

    /// Returns the initial state, failing if none has been set.
    fn initial(&self) -> Result<&State, AutomatonError> {
        self.core()
            .initial
            .as_deref()
            .and_then(|name| self.state(name))
            .ok_or(AutomatonError::MissingInitialState)
    }

    /// Returns true if the state with the given name is final.
    fn is_final(&self, name: &str) -> bool {
        self.core().finals.contains(name)
    }

    /// Iterates over the final states in insertion order.
    fn final_states(&self) -> FinalStates<'_> {
        FinalStates {
            states: self.states(),
            finals: &self.core().finals,
        }
    }

    /// The symbols for which [`FiniteAutomaton::transition_table`] has a column.
    fn table_symbols(&self) -> Vec<char> {
        self.alphabet().universe().collect()
    }

    /// Computes the names of all states that can be reached from the initial state, including
    /// through epsilon transitions.
    fn reachable_state_names(&self) -> Result<Set<&str>, AutomatonError> {
        let initial = self.initial()?;
        let mut seen: Set<&str> = Set::from_iter([initial.name()]);
        let mut stack = vec![initial];
        while let Some(state) = stack.pop() {
            for transition in state.transitions() {
                if seen.insert(transition.target()) {
                    if let Some(next) = self.state(transition.target()) {
                        stack.push(next);
                    }
                }
            }
        }
        Ok(seen)
    }

    /// Returns a string representation of the transition table. The initial state is marked
    /// with `→`, final states with `*`. A cell holds the single successor or, if there are
    /// several, the set of all successors.
    fn transition_table(&self) -> String {
        let symbols = self.table_symbols();
        let initial = self.core().initial.as_deref();

        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(symbols.iter().map(|s| s.to_string())),
        );
        for state in self.states() {
            let marker = match (Some(state.name()) == initial, self.is_final(state.name())) {
                (true, true) => "→*",
                (true, false) => "→ ",
                (false, true) => " *",
                (false, false) => "  ",
            };
            let mut row = vec![format!("{marker}{}", state.name())];
            for &sym in &symbols {
                let targets = state.targets(sym).collect_vec();
                row.push(match targets.len() {
                    0 => "-".to_string(),
                    1 => targets[0].to_string(),
                    _ => format!("{{{}}}", targets.join(", ")),
                });
            }
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

/// Iterator over the final states of a [`FiniteAutomaton`].
#[derive(Clone)]
pub struct FinalStates<'a> {
    states: indexmap::map::Values<'a, StateName, State>,
    finals: &'a Set<StateName>,
}

impl<'a> Iterator for FinalStates<'a> {
    type Item = &'a State;

    fn next(&mut self) -> Option<Self::Item> {
        let finals = self.finals;
        self.states.find(|q| finals.contains(q.name()))
    }
}

/// Writes the summary that the [`std::fmt::Display`] implementations of [`NFA`] and [`DFA`] share.
pub(crate) fn describe<A: FiniteAutomaton + ?Sized>(
    kind: &str,
    automaton: &A,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{kind}:")?;
    writeln!(f, "States: [{}]", automaton.states().map(State::name).join(", "))?;
    writeln!(f, "Alphabet: {}", automaton.alphabet())?;
    writeln!(
        f,
        "Initial State: {}",
        automaton.core().initial.as_deref().unwrap_or("-")
    )?;
    writeln!(
        f,
        "Accepting States: [{}]",
        automaton.final_states().map(State::name).join(", ")
    )?;
    write!(f, "{}", automaton.transition_table())
}
