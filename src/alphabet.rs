use itertools::Itertools;

/// The reserved symbol that labels epsilon transitions, i.e. transitions that can be taken
/// without consuming any input. It never is a symbol of a [`CharAlphabet`].
pub const EPSILON: char = 'e';

/// A simple alphabet that consists of single `char` symbols. The symbols are kept sorted and free
/// of duplicates, so iterating over an alphabet always yields the symbols in the same order.
/// The [`EPSILON`] marker is not a symbol, inserting it has no effect.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct CharAlphabet(Vec<char>);

impl CharAlphabet {
    /// Creates a new [`CharAlphabet`] of the given size. The symbols are the first `size`
    /// lowercase latin letters, skipping the [`EPSILON`] marker.
    pub fn of_size(size: usize) -> Self {
        let symbols = ('a'..='z').filter(|c| *c != EPSILON).take(size).collect_vec();
        assert_eq!(symbols.len(), size, "Alphabet is too large");
        Self(symbols)
    }

    /// Adds `symbol` to the alphabet, returns `true` if it was not present before.
    pub fn insert(&mut self, symbol: char) -> bool {
        if symbol == EPSILON {
            return false;
        }
        match self.0.binary_search(&symbol) {
            Ok(_) => false,
            Err(pos) => {
                self.0.insert(pos, symbol);
                true
            }
        }
    }

    /// Returns true if `symbol` belongs to the alphabet.
    pub fn contains(&self, symbol: char) -> bool {
        self.0.binary_search(&symbol).is_ok()
    }

    /// Iterates over the symbols in ascending order.
    pub fn universe(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().copied()
    }

    /// Returns the number of symbols.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the alphabet has no symbols.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::ops::Index<usize> for CharAlphabet {
    type Output = char;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl FromIterator<char> for CharAlphabet {
    fn from_iter<T: IntoIterator<Item = char>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .filter(|c| *c != EPSILON)
                .unique()
                .sorted()
                .collect(),
        )
    }
}

impl std::fmt::Debug for CharAlphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.0.iter().join(", "))
    }
}

impl std::fmt::Display for CharAlphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
