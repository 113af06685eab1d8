use std::fmt::Display;

use crate::alphabet::EPSILON;

/// States are identified by their name. For states created by the subset construction, the
/// name is the sorted concatenation of the names of the states it is made of.
pub type StateName = String;

/// A transition leaving some [`State`]. It is owned by its source state and refers to the
/// target by name, so transitions never duplicate parts of the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition {
    symbol: char,
    target: StateName,
}

impl Transition {
    /// Creates a new transition on `symbol` that leads to the state called `target`.
    pub fn new<S: Into<StateName>>(symbol: char, target: S) -> Self {
        Self {
            symbol,
            target: target.into(),
        }
    }

    /// The symbol that is consumed when taking the transition.
    pub fn symbol(&self) -> char {
        self.symbol
    }

    /// The name of the state that is reached.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns true if the transition is labeled with [`EPSILON`].
    pub fn is_epsilon(&self) -> bool {
        self.symbol == EPSILON
    }
}

impl Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.symbol, self.target)
    }
}

/// A named state together with the ordered list of its outgoing transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    name: StateName,
    transitions: Vec<Transition>,
}

impl State {
    /// Creates a state without any outgoing transitions.
    pub fn new<S: Into<StateName>>(name: S) -> Self {
        Self {
            name: name.into(),
            transitions: vec![],
        }
    }

    /// Returns the name of the state.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the outgoing transitions in the order they were added.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Adds `transition` unless an identical one already leaves this state. Returns whether
    /// the transition was added.
    pub fn add_transition(&mut self, transition: Transition) -> bool {
        if self.transitions.contains(&transition) {
            return false;
        }
        self.transitions.push(transition);
        true
    }

    /// Makes `target` the only successor on `symbol`, dropping all other transitions on it.
    pub(crate) fn replace_transition(&mut self, symbol: char, target: &str) {
        self.transitions.retain(|t| t.symbol != symbol);
        self.transitions.push(Transition::new(symbol, target));
    }

    /// Iterates over the names of all states that are reached on `symbol`.
    pub fn targets(&self, symbol: char) -> impl Iterator<Item = &str> + '_ {
        self.transitions
            .iter()
            .filter(move |t| t.symbol == symbol)
            .map(|t| t.target())
    }

    /// Returns the first state reached on `symbol`. For states of a [`crate::automaton::DFA`] this
    /// is the unique successor.
    pub fn target(&self, symbol: char) -> Option<&str> {
        self.targets(symbol).next()
    }
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_transitions_are_stored_once() {
        let mut state = State::new("A");
        assert!(state.add_transition(Transition::new('0', "A")));
        assert!(state.add_transition(Transition::new('0', "B")));
        assert!(!state.add_transition(Transition::new('0', "A")));
        assert_eq!(state.targets('0').collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(state.target('1'), None);

        state.replace_transition('0', "C");
        assert_eq!(state.targets('0').collect::<Vec<_>>(), vec!["C"]);
        assert!(Transition::new(EPSILON, "A").is_epsilon());
    }
}
