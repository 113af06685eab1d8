use thiserror::Error;

/// Everything that can go wrong when building, converting or reading an automaton.
#[derive(Error, Debug)]
pub enum AutomatonError {
    /// A state with this name is already part of the automaton, the addition was rejected.
    #[error("state \"{0}\" already exists")]
    DuplicateState(String),
    /// The operation needs an initial state, but none has been set.
    #[error("the automaton has no initial state")]
    MissingInitialState,
    /// No state with this name exists.
    #[error("unknown state \"{0}\"")]
    UnknownState(String),
    /// The subset construction was handed an automaton that still has epsilon transitions.
    #[error("automaton has epsilon transitions, eliminate them first")]
    EpsilonTransitions,
    /// The textual description of an automaton is malformed.
    #[error("line {line}: {message}")]
    Parse {
        /// The 1-based number of the offending line.
        line: usize,
        /// What is wrong with it.
        message: String,
    },
    /// Reading or writing a file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl AutomatonError {
    pub(crate) fn parse<M: Into<String>>(line: usize, message: M) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
