//! Reading and writing automata in a simple line based text format:
//!
//! ```text
//! A,B,C        states
//! 0,1          alphabet, `e` stands for epsilon
//! A            initial state
//! C            final states, may be empty
//! A,0,B        one transition `from,symbol,to` per remaining line
//! B,e,C
//! ```
use std::{path::Path, str::FromStr};

use itertools::Itertools;
use tracing::{trace, warn};

use crate::{
    alphabet::EPSILON,
    automaton::{FiniteAutomaton, State, DFA, NFA},
    error::AutomatonError,
};

fn fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(',').map(str::trim).filter(|f| !f.is_empty())
}

fn symbol(field: &str, line: usize) -> Result<char, AutomatonError> {
    let mut chars = field.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(AutomatonError::parse(
            line,
            format!("symbols must be a single character, found \"{field}\""),
        )),
    }
}

/// Parses an [`NFA`] from its textual description. States that only show up in the initial
/// state, the final states or a transition are created on the fly.
///
/// ```
/// use determinize::prelude::*;
///
/// let nfa = text::parse_nfa("A,B\n0,1\nA\nB\nA,0,A\nA,0,B\nA,1,A\nB,1,B").unwrap();
/// assert_eq!(nfa.size(), 2);
/// assert!(nfa.accepts("0").unwrap());
/// ```
pub fn parse_nfa(input: &str) -> Result<NFA, AutomatonError> {
    let mut lines = input.lines().enumerate().map(|(i, line)| (i + 1, line));
    let mut header = |what: &str| {
        lines
            .next()
            .ok_or_else(|| AutomatonError::parse(0, format!("missing line with {what}")))
    };
    let (_, states) = header("states")?;
    let (alphabet_line, alphabet) = header("the alphabet")?;
    let (initial_line, initial) = header("the initial state")?;
    let (_, finals) = header("the final states")?;

    let mut nfa = NFA::new();
    for name in fields(states) {
        if let Err(e) = nfa.add_state(name) {
            warn!("ignoring repeated state declaration: {e}");
        }
    }
    for field in fields(alphabet) {
        let sym = symbol(field, alphabet_line)?;
        if sym != EPSILON {
            nfa.add_symbol(sym);
        }
    }

    let initial = initial.trim();
    if initial.is_empty() {
        return Err(AutomatonError::parse(initial_line, "no initial state given"));
    }
    nfa.state_or_insert(initial);
    nfa.set_initial(initial)?;

    for name in fields(finals) {
        nfa.state_or_insert(name);
        nfa.add_final(name)?;
    }

    for (number, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let parts = line.split(',').map(str::trim).collect_vec();
        let [from, sym, to] = parts.as_slice() else {
            return Err(AutomatonError::parse(
                number,
                format!("expected `from,symbol,to`, found \"{line}\""),
            ));
        };
        if from.is_empty() || to.is_empty() {
            return Err(AutomatonError::parse(number, "transition without state"));
        }
        let sym = symbol(sym, number)?;
        nfa.state_or_insert(from);
        nfa.state_or_insert(to);
        nfa.add_transition(from, sym, to)?;
    }

    trace!(
        "parsed NFA with {} states over {}",
        nfa.size(),
        nfa.alphabet()
    );
    Ok(nfa)
}

impl FromStr for NFA {
    type Err = AutomatonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_nfa(s)
    }
}

/// Reads and parses the file at `path`, see [`parse_nfa`].
pub fn read_nfa_file<P: AsRef<Path>>(path: P) -> Result<NFA, AutomatonError> {
    parse_nfa(&std::fs::read_to_string(path)?)
}

/// Writes `dfa` in the text format. The result can be read back with [`parse_nfa`].
pub fn write_dfa(dfa: &DFA) -> String {
    let mut out = vec![
        dfa.states().map(State::name).join(","),
        dfa.alphabet().universe().join(","),
        dfa.initial().map(|q| q.name().to_string()).unwrap_or_default(),
        dfa.final_states().map(State::name).join(","),
    ];
    for state in dfa.states() {
        for transition in state.transitions() {
            out.push(format!(
                "{},{},{}",
                state.name(),
                transition.symbol(),
                transition.target()
            ));
        }
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    const EPSILON_NFA: &str = "A, B, C\n0,1,e\nA\nC\nA,e,B\nB,0,C\n\nC,1,C\n";

    #[test]
    fn parses_the_header_and_transitions() {
        let nfa: NFA = EPSILON_NFA.parse().unwrap();
        assert_eq!(
            nfa.states().map(State::name).collect::<Vec<_>>(),
            vec!["A", "B", "C"]
        );
        assert_eq!(nfa.alphabet().universe().collect::<String>(), "01");
        assert_eq!(nfa.initial().unwrap().name(), "A");
        assert!(nfa.is_final("C"));
        assert!(nfa.has_epsilon());
        assert!(nfa.accepts("0111").unwrap());
    }

    #[test]
    fn unknown_states_are_created() {
        let nfa = parse_nfa("A\na\nA\nZ\nA,a,Y\nY,a,Z").unwrap();
        assert!(nfa.contains_state("Y"));
        assert!(nfa.is_final("Z"));
        assert!(nfa.accepts("aa").unwrap());
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(matches!(
            parse_nfa("A\n0\n"),
            Err(AutomatonError::Parse { .. })
        ));
        assert!(matches!(
            parse_nfa("A\n0\n\nA"),
            Err(AutomatonError::Parse { line: 3, .. })
        ));
        assert!(matches!(
            parse_nfa("A\n0\nA\nA\nA,0"),
            Err(AutomatonError::Parse { line: 5, .. })
        ));
        assert!(matches!(
            parse_nfa("A\n01\nA\nA"),
            Err(AutomatonError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            parse_nfa("A\n0\nA\nA\nA,00,A"),
            Err(AutomatonError::Parse { line: 5, .. })
        ));
    }

    #[test_log::test]
    fn written_dfa_reads_back_as_the_same_language() {
        let nfa: NFA = EPSILON_NFA.parse().unwrap();
        let dfa = nfa.determinize().unwrap();
        let written = write_dfa(&dfa);
        assert!(written.starts_with("A,C,Ø\n0,1\nA\nC\n"));

        let reread = parse_nfa(&written).unwrap();
        assert_eq!(reread.size(), dfa.size());
        for word in ["", "0", "01", "011", "1", "00", "010"] {
            assert_eq!(
                reread.accepts(word).unwrap(),
                dfa.accepts(word).unwrap(),
                "disagreement on {word:?}"
            );
        }
    }
}
