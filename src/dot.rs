//! Graphviz output for automata. For more information on the DOT format, see the
//! [graphviz documentation](https://graphviz.org/doc/info/lang.html).
use std::{fmt::Display, path::Path};

use itertools::Itertools;
use tracing::trace;

use crate::{
    alphabet::EPSILON,
    automaton::{FiniteAutomaton, State, Transition, DFA, NFA},
};

/// Name of the invisible node from which the edge into the initial state starts.
const START_NODE: &str = "__start";

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// State names may contain anything, so identifiers are always quoted.
fn quote_dot_ident(name: &str) -> String {
    format!("\"{}\"", escape(name))
}

/// Attributes of a node in the DOT format.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DotStateAttribute {
    /// The label of a node
    Label(String),
    /// The shape of a node
    Shape(String),
    /// The line style of a node
    Style(String),
}

impl Display for DotStateAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotStateAttribute::Label(s) => write!(f, "label=\"{}\"", escape(s)),
            DotStateAttribute::Shape(s) => write!(f, "shape=\"{}\"", escape(s)),
            DotStateAttribute::Style(s) => write!(f, "style=\"{}\"", escape(s)),
        }
    }
}

/// Attributes of an edge in the DOT format.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DotTransitionAttribute {
    /// The label of an edge
    Label(String),
}

impl Display for DotTransitionAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotTransitionAttribute::Label(lbl) => write!(f, "label=\"{}\"", escape(lbl)),
        }
    }
}

/// Automata that can be drawn with graphviz. Final states are drawn as double circles and an
/// edge from an invisible node points to the initial state.
pub trait Dottable: FiniteAutomaton {
    /// The name of the graph.
    fn dot_name(&self) -> &str;

    /// Statements that are placed right after the opening of the graph.
    fn dot_header_statements(&self) -> Vec<String> {
        vec!["rankdir=LR".to_string(), "charset=\"UTF-8\"".to_string()]
    }

    /// The attributes of the node for `state`.
    fn dot_state_attributes(&self, state: &State) -> Vec<DotStateAttribute> {
        let shape = if self.is_final(state.name()) {
            "doublecircle"
        } else {
            "circle"
        };
        vec![
            DotStateAttribute::Shape(shape.into()),
            DotStateAttribute::Label(state.name().to_string()),
        ]
    }

    /// The attributes of the edge for `transition`, epsilon transitions are labeled `ε`.
    fn dot_transition_attributes(&self, transition: &Transition) -> Vec<DotTransitionAttribute> {
        let label = if transition.symbol() == EPSILON {
            "ε".to_string()
        } else {
            transition.symbol().to_string()
        };
        vec![DotTransitionAttribute::Label(label)]
    }

    /// Compute the graphviz representation.
    fn dot_representation(&self) -> String {
        let header = std::iter::once(format!("digraph {} {{", self.dot_name()))
            .chain(self.dot_header_statements());

        let start = self.initial().ok().into_iter().flat_map(|initial| {
            [
                format!("{START_NODE} [shape=\"none\", label=\"\"]"),
                format!("{START_NODE} -> {}", quote_dot_ident(initial.name())),
            ]
        });

        let states = self.states().map(|q| {
            format!(
                "{} [{}]",
                quote_dot_ident(q.name()),
                self.dot_state_attributes(q).into_iter().join(", ")
            )
        });

        let transitions = self.states().flat_map(|q| {
            q.transitions().iter().map(move |t| {
                format!(
                    "{} -> {} [{}]",
                    quote_dot_ident(q.name()),
                    quote_dot_ident(t.target()),
                    self.dot_transition_attributes(t).into_iter().join(", ")
                )
            })
        });

        header
            .chain(start)
            .chain(states)
            .chain(transitions)
            .chain(std::iter::once("}".to_string()))
            .join("\n")
    }

    /// Renders the automaton as SVG into the file `filename` by running the `dot` executable,
    /// which has to be installed. The DOT source is handed over through a temporary file.
    fn render_to_file_name<P: AsRef<Path>>(&self, filename: P) -> Result<(), std::io::Error> {
        use std::io::Write;

        let dot = self.dot_representation();
        trace!("rendering dot representation\n{dot}");
        let mut tempfile = tempfile::NamedTempFile::new()?;
        tempfile.write_all(dot.as_bytes())?;

        let status = std::process::Command::new("dot")
            .arg("-Tsvg")
            .arg("-o")
            .arg(filename.as_ref())
            .arg(tempfile.path())
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("dot process exited with status: {status}"),
            ))
        }
    }
}

impl Dottable for NFA {
    fn dot_name(&self) -> &str {
        "NFA"
    }
}

impl Dottable for DFA {
    fn dot_name(&self) -> &str {
        "DFA"
    }

    fn dot_state_attributes(&self, state: &State) -> Vec<DotStateAttribute> {
        let shape = if self.is_final(state.name()) {
            "doublecircle"
        } else {
            "circle"
        };
        let mut attributes = vec![
            DotStateAttribute::Shape(shape.into()),
            DotStateAttribute::Label(state.name().to_string()),
        ];
        if self.is_phi(state.name()) {
            attributes.push(DotStateAttribute::Style("dashed".into()));
        }
        attributes
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    const EPSILON_NFA: &str = "A,B,C\n0\nA\nC\nA,e,B\nB,0,C\nB,0,A";

    #[test]
    fn nfa_graph_shows_epsilon_finals_and_start() {
        let nfa: NFA = EPSILON_NFA.parse().unwrap();
        let dot = nfa.dot_representation();
        let lines = dot.lines().collect::<Vec<_>>();

        assert_eq!(lines[0], "digraph NFA {");
        assert_eq!(lines.last(), Some(&"}"));
        assert!(lines.contains(&"__start [shape=\"none\", label=\"\"]"));
        assert!(lines.contains(&"__start -> \"A\""));
        assert!(lines.contains(&"\"A\" [shape=\"circle\", label=\"A\"]"));
        assert!(lines.contains(&"\"C\" [shape=\"doublecircle\", label=\"C\"]"));
        assert!(lines.contains(&"\"A\" -> \"B\" [label=\"ε\"]"));
        assert!(lines.contains(&"\"B\" -> \"C\" [label=\"0\"]"));
        assert!(lines.contains(&"\"B\" -> \"A\" [label=\"0\"]"));
    }

    #[test_log::test]
    fn dfa_graph_draws_the_dead_state() {
        let nfa: NFA = "A,B,C\n0\nA\nC\nA,e,B\nB,0,C".parse().unwrap();
        let dfa = nfa.determinize().unwrap();
        let dot = dfa.dot_representation();

        assert!(dot.starts_with("digraph DFA {"));
        assert!(dot.contains("\"A\" -> \"C\" [label=\"0\"]"));
        assert!(dot.contains("\"Ø\" [shape=\"circle\", label=\"Ø\", style=\"dashed\"]"));
        assert!(dot.contains("\"Ø\" -> \"Ø\" [label=\"0\"]"));
        assert!(dot.contains("\"C\" -> \"Ø\" [label=\"0\"]"));
        assert!(!dot.contains('ε'));
        assert_eq!(
            dot.lines().filter(|l| l.contains(" -> ")).count(),
            dfa.size() * dfa.alphabet().size() + 1
        );
    }

    #[test]
    fn quotes_in_names_are_escaped() {
        let mut nfa = NFA::new();
        nfa.add_state("say \"hi\"").unwrap();
        nfa.add_symbol('a');
        let dot = nfa.dot_representation();
        assert!(dot.contains("\"say \\\"hi\\\"\" [shape=\"circle\", label=\"say \\\"hi\\\"\"]"));
        assert!(!dot.contains("__start"));
    }
}
