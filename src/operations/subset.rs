use std::collections::VecDeque;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    automaton::{FiniteAutomaton, State, StateName, Transition, DFA, NFA, PHI},
    error::AutomatonError,
    math::{OrderedMap, OrderedSet},
};

/// Computes the canonical name of a set of states: the names sorted alphabetically, with
/// duplicates removed and concatenated without a separator. Two collections with the same
/// members always produce the same name, regardless of order.
///
/// ```
/// use determinize::prelude::*;
///
/// assert_eq!(canonical_name(["B", "A", "B"]), "AB");
/// assert_eq!(canonical_name(["q0"]), "q0");
/// ```
pub fn canonical_name<I, S>(names: I) -> StateName
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| name.as_ref().to_string())
        .collect::<OrderedSet<_>>()
        .into_iter()
        .join("")
}

/// The two phases a discovered state goes through. A provisional state only carries the raw
/// union of its constituents' transitions, which is what its successors are computed from.
/// Once it has been taken from the worklist, its symbol-complete transitions live in the
/// [`DFA`] and the state is resolved.
#[derive(Debug, Clone)]
enum Phase {
    Provisional(Vec<Transition>),
    Resolved,
}

#[derive(Debug, Clone)]
struct Discovered {
    accepting: bool,
    phase: Phase,
}

/// Lazy powerset construction. States are discovered on demand and stored in an arena that is
/// keyed by their canonical name, which guarantees that every set of NFA states is
/// represented by exactly one DFA state. Discovered states wait in a worklist and are resolved
/// in the order in which they were found.
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
/// nfa.add_transition("A", '1', "A").unwrap();
/// nfa.add_transition("B", '1', "B").unwrap();
///
/// let dfa = SubsetConstruction::new(&nfa).unwrap().run().unwrap();
/// assert_eq!(dfa.states().map(State::name).collect::<Vec<_>>(), vec!["A", "AB"]);
/// assert!(dfa.is_final("AB"));
/// ```
pub struct SubsetConstruction<'a> {
    nfa: &'a NFA,
    arena: OrderedMap<StateName, Discovered>,
    worklist: VecDeque<usize>,
    needs_phi: bool,
}

impl<'a> SubsetConstruction<'a> {
    /// Prepares the construction for `nfa`, which must have an initial state and must not
    /// contain epsilon transitions.
    pub fn new(nfa: &'a NFA) -> Result<Self, AutomatonError> {
        if nfa.has_epsilon() {
            return Err(AutomatonError::EpsilonTransitions);
        }
        let initial = nfa.initial()?;

        let mut construction = Self {
            nfa,
            arena: OrderedMap::default(),
            worklist: VecDeque::new(),
            needs_phi: false,
        };
        construction.resolve([initial.name()]);
        Ok(construction)
    }

    /// Applies the state-merge rule to a non-empty collection of NFA states and returns the
    /// name of the DFA state that represents it. If a state with the canonical name has been
    /// discovered before, it is reused as is. Otherwise a new provisional state is created,
    /// it is accepting if any constituent is, carries a copy of all transitions of its
    /// constituents and is put on the worklist.
    fn resolve<I, S>(&mut self, constituents: I) -> StateName
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let constituents: OrderedSet<String> = constituents
            .into_iter()
            .map(|name| name.as_ref().to_string())
            .collect();
        debug_assert!(!constituents.is_empty());
        let name = constituents.iter().join("");

        if self.arena.contains_key(&name) {
            return name;
        }

        let mut merged = State::new(name.as_str());
        for constituent in &constituents {
            if let Some(state) = self.nfa.state(constituent) {
                for transition in state.transitions() {
                    merged.add_transition(transition.clone());
                }
            }
        }
        let accepting = constituents.iter().any(|q| self.nfa.is_final(q));
        trace!(
            "discovered {name} from {{{}}}, accepting: {accepting}",
            constituents.iter().join(", ")
        );

        let (index, _) = self.arena.insert_full(
            name.clone(),
            Discovered {
                accepting,
                phase: Phase::Provisional(merged.transitions().to_vec()),
            },
        );
        self.worklist.push_back(index);
        name
    }

    /// Takes the provisional transitions of the state at `index` and computes its
    /// authoritative transitions, exactly one per symbol.
    fn process(&mut self, index: usize) -> (State, bool) {
        let nfa = self.nfa;
        let (name, discovered) = self
            .arena
            .get_index_mut(index)
            .expect("worklist only holds indices of discovered states");
        let name = name.clone();
        let accepting = discovered.accepting;
        let Phase::Provisional(transitions) =
            std::mem::replace(&mut discovered.phase, Phase::Resolved)
        else {
            unreachable!("state {name} was resolved twice");
        };

        let mut state = State::new(name.as_str());
        for symbol in nfa.alphabet().universe() {
            let targets: OrderedSet<&str> = transitions
                .iter()
                .filter(|t| t.symbol() == symbol)
                .map(Transition::target)
                .collect();

            let target = if targets.is_empty() {
                trace!("{name} has no successor on {symbol}, routing to {PHI}");
                self.needs_phi = true;
                PHI.to_string()
            } else {
                self.resolve(targets)
            };
            state.add_transition(Transition::new(symbol, target));
        }
        (state, accepting)
    }

    /// Drains the worklist and assembles the resulting [`DFA`]. The states appear in the
    /// order in which they were resolved, followed by the dead state [`PHI`] if some
    /// transition would otherwise have been undefined.
    pub fn run(mut self) -> Result<DFA, AutomatonError> {
        let mut dfa = DFA::for_alphabet(self.nfa.alphabet().clone());

        while let Some(index) = self.worklist.pop_front() {
            let (state, accepting) = self.process(index);
            trace!("resolved {}", state.name());
            dfa.push_state(state, accepting)?;
        }

        let initial = self.nfa.initial()?;
        dfa.set_initial(initial.name())?;
        if self.needs_phi {
            dfa.push_phi()?;
        }

        debug!(
            "subset construction produced {} states from {} NFA states",
            dfa.size(),
            self.nfa.size()
        );
        Ok(dfa)
    }
}

/// Converts the epsilon-free `nfa` into an equivalent [`DFA`], see [`SubsetConstruction`].
pub fn subset_construction(nfa: &NFA) -> Result<DFA, AutomatonError> {
    SubsetConstruction::new(nfa)?.run()
}
