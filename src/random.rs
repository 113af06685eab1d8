use crate::prelude::*;

/// Draws a random [`NFA`] with `states` states called `q0`, `q1`, ... over the first `symbols`
/// letters (see [`CharAlphabet::of_size`]). The state `q0` is initial and every state is final
/// with probability one half. Each possible transition `(p, a, q)` is present with probability
/// `density`, each epsilon transition `(p, q)` with probability `epsilon_density`.
///
/// Since every name starts with `q`, the names of merged states produced by the subset
/// construction never clash with each other or with the names of the original states.
pub fn random_nfa(states: usize, symbols: usize, density: f64, epsilon_density: f64) -> NFA {
    assert!(states > 0, "an automaton needs at least one state");
    let alphabet = CharAlphabet::of_size(symbols);
    let names: Vec<String> = (0..states).map(|i| format!("q{i}")).collect();

    let mut nfa = NFA::for_alphabet(alphabet.clone());
    for name in &names {
        nfa.add_state(name.as_str()).expect("generated names are distinct");
        if fastrand::bool() {
            nfa.add_final(name).expect("state was just added");
        }
    }
    nfa.set_initial(&names[0]).expect("state was just added");

    for from in &names {
        for sym in alphabet.universe() {
            for to in &names {
                if fastrand::f64() < density {
                    nfa.add_transition(from, sym, to).expect("both states exist");
                }
            }
        }
        for to in &names {
            if fastrand::f64() < epsilon_density {
                nfa.add_transition(from, EPSILON, to).expect("both states exist");
            }
        }
    }
    nfa
}

/// Generate a random `String` over the universe of the `alphabet`.
/// The length of the `String` is drawn uniformly from the range `min_len..=max_len`.
pub fn random_word(alphabet: &CharAlphabet, min_len: usize, max_len: usize) -> String {
    let charset: Vec<char> = alphabet.universe().collect();
    if charset.is_empty() {
        return String::new();
    }
    let length = fastrand::usize(min_len..=max_len);
    (0..length)
        .map(|_| charset[fastrand::usize(..charset.len())])
        .collect()
}
