use std::{fmt::Debug, hash::Hash};

use itertools::Itertools;
use thiserror::Error;

use crate::{word::Word, Show};

/// A symbol of an alphabet, which is also the type of the symbols in a word. Symbols are opaque
/// atoms, the only thing we rely on is that they can be compared, hashed and shown. Typical
/// choices are `char` or `&'static str`.
pub trait Symbol: Clone + Eq + Ord + Hash + Debug + Show {}
impl<S: Clone + Eq + Ord + Hash + Debug + Show> Symbol for S {}

/// Errors that can occur when constructing an [`Alphabet`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AlphabetError {
    /// An alphabet must not be empty.
    #[error("an alphabet must contain at least one symbol")]
    Empty,
}

/// A finite, non-empty collection of symbols. The order in which symbols are given is kept and
/// it is the order in which [`Alphabet::universe`] yields them, so every scan over the alphabet
/// is deterministic.
///
/// # Example
/// ```
/// use lstar_core::prelude::*;
/// let alphabet = Alphabet::new(["power", "keycard", "power"]).unwrap();
/// assert_eq!(alphabet.size(), 2);
/// assert_eq!(alphabet.universe().copied().collect::<Vec<_>>(), vec!["power", "keycard"]);
/// ```
#[derive(Clone, Hash, PartialEq, Eq, Debug)]
pub struct Alphabet<S = char>(Vec<S>);

/// Represents an alphabet where a [`Symbol`] is just a single `char`.
pub type CharAlphabet = Alphabet<char>;

impl<S: Symbol> Alphabet<S> {
    /// Creates an alphabet from the given symbols. Duplicates are dropped, the first occurrence
    /// determines the position of a symbol. Fails if no symbol is given.
    pub fn new<I: IntoIterator<Item = S>>(symbols: I) -> Result<Self, AlphabetError> {
        let symbols = symbols.into_iter().unique().collect_vec();
        if symbols.is_empty() {
            return Err(AlphabetError::Empty);
        }
        Ok(Self(symbols))
    }

    /// Creates an alphabet that contains at least the symbol `first`, so this cannot fail.
    pub fn from_first<I: IntoIterator<Item = S>>(first: S, rest: I) -> Self {
        Self(std::iter::once(first).chain(rest).unique().collect())
    }

    /// Returns an iterator over all symbols in the alphabet, in alphabet order.
    pub fn universe(&self) -> std::slice::Iter<'_, S> {
        self.0.iter()
    }

    /// Gives the symbols as a slice.
    pub fn symbols(&self) -> &[S] {
        &self.0
    }

    /// Returns true if the given symbol is present in the alphabet.
    pub fn contains(&self, symbol: &S) -> bool {
        self.0.contains(symbol)
    }

    /// Returns the position of `symbol` in the alphabet, if it is present.
    pub fn position(&self, symbol: &S) -> Option<usize> {
        self.0.iter().position(|s| s == symbol)
    }

    /// Returns the number of symbols in the alphabet.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Returns the first symbol of `word` that does not belong to the alphabet, or `None` if
    /// every symbol of `word` is known.
    pub fn first_unknown<'a>(&self, word: &'a Word<S>) -> Option<&'a S> {
        word.symbols().find(|sym| !self.contains(sym))
    }
}

impl CharAlphabet {
    /// Creates a new [`CharAlphabet`] of the given size. The symbols are the first `size`
    /// characters starting from `'a'`, so up to a size of 26 these are the letters 'a' to 'z'.
    ///
    /// Fails with [`AlphabetError::Empty`] if `size` is zero.
    pub fn of_size(size: usize) -> Result<Self, AlphabetError> {
        if size == 0 {
            return Err(AlphabetError::Empty);
        }
        Ok(Self(
            ('a' as u32..)
                .filter_map(char::from_u32)
                .take(size)
                .collect(),
        ))
    }
}

impl<S> std::ops::Index<usize> for Alphabet<S> {
    type Output = S;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a, S> IntoIterator for &'a Alphabet<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Helper macro for creating an [`Alphabet`]. Is called simply with a non-empty list of symbols
/// that are separated by commata.
///
/// # Examples
/// ```
/// use lstar_core::prelude::*;
/// let alphabet = alphabet!('a', 'b', 'c');
/// assert_eq!(alphabet.size(), 3);
/// ```
#[macro_export]
macro_rules! alphabet {
    ($first:expr $(, $rest:expr)* $(,)?) => {
        $crate::alphabet::Alphabet::from_first($first, [$($rest),*])
    };
}

#[cfg(test)]
mod tests {
    use super::{Alphabet, AlphabetError, CharAlphabet};
    use crate::word::Word;

    #[test]
    fn keeps_given_order() {
        let alphabet = alphabet!('b', 'a', 'b');
        assert_eq!(alphabet.size(), 2);
        assert_eq!(alphabet.symbols(), &['b', 'a']);
        assert_eq!(alphabet.position(&'a'), Some(1));
        assert_eq!(alphabet[0], 'b');
    }

    #[test]
    fn empty_alphabet_is_rejected() {
        assert_eq!(
            Alphabet::<char>::new(std::iter::empty()),
            Err(AlphabetError::Empty)
        );
    }

    #[test]
    fn unknown_symbols() {
        let alphabet = CharAlphabet::of_size(2).unwrap();
        assert!(alphabet.contains(&'b'));
        assert!(!alphabet.contains(&'c'));
        assert_eq!(alphabet.first_unknown(&Word::from("abba")), None);
        assert_eq!(alphabet.first_unknown(&Word::from("abcd")), Some(&'c'));
    }

    #[test]
    fn sized_char_alphabets() {
        assert_eq!(CharAlphabet::of_size(0), Err(AlphabetError::Empty));
        assert_eq!(CharAlphabet::of_size(3).unwrap().symbols(), &['a', 'b', 'c']);

        let large = CharAlphabet::of_size(40).unwrap();
        assert_eq!(large.size(), 40);
        assert_eq!(large[25], 'z');
    }
}
