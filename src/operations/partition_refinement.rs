use std::fmt::Display;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    automaton::{FiniteAutomaton, StateName, DFA},
    math::{Map, Partition},
};

/// The sequence of partitions that [`partition_refinement`] went through. The partition at
/// position `i` is the one obtained in iteration `i`, the first one separates final from
/// non-final states and the last one is stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equivalences {
    partitions: Vec<Partition<StateName>>,
}

impl Equivalences {
    /// Returns all partitions, ordered by iteration.
    pub fn partitions(&self) -> &[Partition<StateName>] {
        &self.partitions
    }

    /// Returns the number of iterations that were recorded.
    pub fn iterations(&self) -> usize {
        self.partitions.len()
    }

    /// The last partition, whose classes are the equivalence classes of the states.
    pub fn stable(&self) -> &Partition<StateName> {
        self.partitions
            .last()
            .expect("refinement records at least two partitions")
    }

    /// Iterates over the partitions together with their iteration number.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Partition<StateName>)> + '_ {
        self.partitions.iter().enumerate()
    }
}

impl Display for Equivalences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.iter()
                .map(|(i, partition)| format!("{i}- Equivalence: {partition}"))
                .join("\n")
        )
    }
}

/// For each symbol, the class that the successor lies in. A state with a successor outside of
/// the partition (the dead state or a missing transition) has no signature.
type Signature = Option<Vec<usize>>;

fn signatures<'a>(dfa: &'a DFA, current: &Partition<StateName>) -> Map<&'a str, Signature> {
    let class_of: Map<&str, usize> = current
        .iter()
        .enumerate()
        .flat_map(|(i, class)| class.iter().map(move |q| (q.as_str(), i)))
        .collect();

    dfa.states()
        .filter(|q| class_of.contains_key(q.name()))
        .map(|q| {
            let signature = dfa
                .alphabet()
                .universe()
                .map(|sym| q.target(sym).and_then(|p| class_of.get(p).copied()))
                .collect();
            (q.name(), signature)
        })
        .collect()
}

/// Performs one refinement step. Singleton classes are kept as they are. Every other class is
/// split by going through its states in order: a state joins the first sub-class of its class
/// whose first member has the same signature, or opens a new sub-class. States without a
/// signature match nothing and always end up alone.
fn refine(dfa: &DFA, current: &Partition<StateName>) -> Partition<StateName> {
    let signatures = signatures(dfa, current);
    let mut next: Vec<Vec<StateName>> = Vec::with_capacity(current.size());

    for class in current {
        if class.len() == 1 {
            next.push(class.clone());
            continue;
        }
        let mut split: Vec<Vec<StateName>> = vec![];
        for q in class {
            let joined = match &signatures[q.as_str()] {
                Some(signature) => split.iter_mut().find(|group| {
                    signatures[group[0].as_str()].as_ref() == Some(signature)
                }),
                None => None,
            };
            match joined {
                Some(group) => group.push(q.clone()),
                None => split.push(vec![q.clone()]),
            }
        }
        next.extend(split);
    }
    Partition::from(next)
}

/// Moore's partition refinement. Starts from the partition into non-final and final states
/// (empty classes are left out, the dead state [`crate::automaton::PHI`] is not partitioned)
/// and refines it until the number of classes no longer changes. Every intermediate
/// partition is recorded, including the last one, which has as many classes as its
/// predecessor.
///
/// Since the dead state lies in no class, a state with a transition into it is split off
/// from every other state of its class in the first refinement step.
///
/// # Example
/// ```
/// use determinize::prelude::*;
///
/// let mut dfa = DFA::for_alphabet(CharAlphabet::from_iter(['a']));
/// for q in ["X", "Y", "Z"] {
///     dfa.add_state(q).unwrap();
/// }
/// dfa.set_initial("Y").unwrap();
/// dfa.add_final("X").unwrap();
/// dfa.add_transition("X", 'a', "X").unwrap();
/// dfa.add_transition("Y", 'a', "X").unwrap();
/// dfa.add_transition("Z", 'a', "X").unwrap();
///
/// let equivalences = partition_refinement(&dfa);
/// let expected = Partition::new([vec!["Y".to_string(), "Z".to_string()], vec!["X".to_string()]]);
/// assert_eq!(equivalences.stable(), &expected);
/// println!("{equivalences}");
/// ```
pub fn partition_refinement(dfa: &DFA) -> Equivalences {
    let (accepting, rejecting): (Vec<_>, Vec<_>) = dfa
        .states()
        .filter(|q| !dfa.is_phi(q.name()))
        .map(|q| q.name().to_string())
        .partition(|q| dfa.is_final(q));

    let mut current = Partition::new([rejecting, accepting]);
    let mut partitions = vec![current.clone()];
    debug!(
        "refining partition of {} states, starting with {} classes",
        current.element_count(),
        current.size()
    );

    loop {
        let next = refine(dfa, &current);
        trace!(
            "iteration {}: {} -> {} classes",
            partitions.len(),
            current.size(),
            next.size()
        );
        let stable = next.size() == current.size();
        partitions.push(next.clone());
        if stable {
            break;
        }
        current = next;
    }

    debug!(
        "partition refinement stabilized after {} iterations",
        partitions.len()
    );
    Equivalences { partitions }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn classes(partition: &Partition<StateName>) -> Vec<Vec<&str>> {
        partition
            .iter()
            .map(|class| class.iter().map(String::as_str).collect())
            .collect()
    }

    #[test_log::test]
    fn behaviourally_equal_states_are_merged() {
        let mut dfa = DFA::for_alphabet(CharAlphabet::from_iter(['0', '1']));
        for q in ["X", "Y", "Z"] {
            dfa.add_state(q).unwrap();
        }
        dfa.set_initial("Y").unwrap();
        dfa.add_final("X").unwrap();
        for q in ["X", "Y", "Z"] {
            dfa.add_transition(q, '0', "X").unwrap();
            dfa.add_transition(q, '1', "Z").unwrap();
        }

        let equivalences = dfa.equivalence_classes();
        assert_eq!(equivalences.iterations(), 2);
        assert_eq!(classes(&equivalences.partitions()[0]), vec![vec!["Y", "Z"], vec!["X"]]);
        assert_eq!(classes(equivalences.stable()), vec![vec!["Y", "Z"], vec!["X"]]);
        assert_eq!(
            equivalences.to_string(),
            "0- Equivalence: [[Y, Z], [X]]\n1- Equivalence: [[Y, Z], [X]]"
        );
    }

    /// Accepts words over `a` whose length is divisible by three, with redundant copies.
    fn modulo_three() -> DFA {
        let mut dfa = DFA::for_alphabet(CharAlphabet::from_iter(['a']));
        let names = ["0", "1", "2", "3", "4", "5"];
        for q in names {
            dfa.add_state(q).unwrap();
        }
        dfa.set_initial("0").unwrap();
        dfa.add_final("0").unwrap();
        dfa.add_final("3").unwrap();
        for i in 0..6 {
            dfa.add_transition(names[i], 'a', names[(i + 1) % 6]).unwrap();
        }
        dfa
    }

    #[test]
    fn refinement_is_monotone_and_stabilizes() {
        let dfa = modulo_three();
        let equivalences = partition_refinement(&dfa);

        let sizes = equivalences
            .partitions()
            .iter()
            .map(|p| p.size())
            .collect::<Vec<_>>();
        assert_eq!(sizes, vec![2, 3, 3]);
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
        assert!(sizes.iter().all(|&s| s <= dfa.size()));
        assert_eq!(
            classes(equivalences.stable()),
            vec![vec!["1", "4"], vec!["2", "5"], vec!["0", "3"]]
        );
    }

    #[test]
    fn dead_state_is_not_partitioned() {
        let mut nfa = NFA::new();
        for q in ["A", "B"] {
            nfa.add_state(q).unwrap();
        }
        nfa.set_initial("A").unwrap();
        nfa.add_final("B").unwrap();
        nfa.add_transition("A", 'a', "B").unwrap();
        nfa.add_transition("B", 'b', "B").unwrap();

        let dfa = nfa.determinize().unwrap();
        assert!(dfa.phi().is_some());
        let equivalences = dfa.equivalence_classes();
        for (_, partition) in equivalences.iter() {
            assert_eq!(partition.element_count(), 2);
            assert!(partition.class_of(&PHI.to_string()).is_none());
        }
    }

    #[test_log::test]
    fn states_leading_to_the_dead_state_are_never_equivalent() {
        let nfa: NFA = "S,P,Q,F\na,b\nS\nF\nS,a,P\nS,b,Q\nP,a,F\nQ,a,F"
            .parse()
            .unwrap();
        let dfa = nfa.determinize().unwrap();
        assert_eq!(target_name(&dfa, "P", 'b'), PHI);
        assert_eq!(target_name(&dfa, "Q", 'b'), PHI);

        let equivalences = dfa.equivalence_classes();
        assert_eq!(
            classes(&equivalences.partitions()[0]),
            vec![vec!["S", "P", "Q"], vec!["F"]]
        );
        assert_eq!(
            classes(equivalences.stable()),
            vec![vec!["S"], vec!["P"], vec!["Q"], vec!["F"]]
        );
        assert_eq!(equivalences.iterations(), 3);
    }

    fn target_name<'a>(dfa: &'a DFA, state: &str, symbol: char) -> &'a str {
        dfa.successor(state, symbol).unwrap().unwrap().name()
    }

    #[test]
    fn all_final_states_give_a_single_initial_class() {
        let mut dfa = DFA::for_alphabet(CharAlphabet::from_iter(['a']));
        dfa.add_state("P").unwrap();
        dfa.add_state("Q").unwrap();
        dfa.set_initial("P").unwrap();
        dfa.add_final("P").unwrap();
        dfa.add_final("Q").unwrap();
        dfa.add_transition("P", 'a', "Q").unwrap();
        dfa.add_transition("Q", 'a', "P").unwrap();

        let equivalences = partition_refinement(&dfa);
        assert_eq!(equivalences.partitions()[0].size(), 1);
        assert_eq!(classes(equivalences.stable()), vec![vec!["P", "Q"]]);
    }
}
