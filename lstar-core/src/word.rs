use std::fmt::{Debug, Display};

use crate::{alphabet::Symbol, Show};

mod subwords;
pub use subwords::{Prefixes, Suffixes};

/// A finite, possibly empty sequence of symbols. Words are plain values: two words are equal
/// precisely if they consist of the same symbols in the same order, and they are ordered
/// lexicographically. The empty word is denoted by ε.
///
/// # Example
/// ```
/// use lstar_core::prelude::*;
/// let ab = Word::from("ab");
/// assert_eq!(ab.concat(&Word::empty()), ab);
/// assert_eq!(Word::from("a").append('b'), ab);
/// assert_eq!(ab.as_string(), "ab");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word<S>(Vec<S>);

impl<S> Word<S> {
    /// Returns the empty word ε.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// The number of symbols in `self`.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if `self` is the empty word.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the symbols of `self` from left to right.
    pub fn symbols(&self) -> std::slice::Iter<'_, S> {
        self.0.iter()
    }

    /// Gives the symbols of `self` as a slice.
    pub fn as_slice(&self) -> &[S] {
        &self.0
    }

    /// Returns the symbol at the given `position` in `self`, if it exists.
    pub fn nth(&self, position: usize) -> Option<&S> {
        self.0.get(position)
    }

    /// Returns the first symbol of `self`, if it exists.
    pub fn first(&self) -> Option<&S> {
        self.0.first()
    }

    /// Returns the last symbol of `self`, if it exists.
    pub fn last(&self) -> Option<&S> {
        self.0.last()
    }

    /// Iterates over all non-empty prefixes of `self`, shortest first.
    pub fn prefixes(&self) -> Prefixes<'_, S> {
        Prefixes::new(&self.0)
    }

    /// Iterates over all non-empty suffixes of `self`, shortest first.
    pub fn suffixes(&self) -> Suffixes<'_, S> {
        Suffixes::new(&self.0)
    }

    /// Consumes `self` and gives back the underlying symbols.
    pub fn into_vec(self) -> Vec<S> {
        self.0
    }
}

impl<S: Clone> Word<S> {
    /// Concatenates `self` with `other`, producing the word `self · other`.
    pub fn concat(&self, other: &Word<S>) -> Self {
        let mut symbols = Vec::with_capacity(self.len() + other.len());
        symbols.extend_from_slice(&self.0);
        symbols.extend_from_slice(&other.0);
        Self(symbols)
    }

    /// Produces the word `self · symbol`.
    pub fn append(&self, symbol: S) -> Self {
        let mut symbols = Vec::with_capacity(self.len() + 1);
        symbols.extend_from_slice(&self.0);
        symbols.push(symbol);
        Self(symbols)
    }

    /// Produces the word `symbol · self`.
    pub fn prepend(&self, symbol: S) -> Self {
        let mut symbols = Vec::with_capacity(self.len() + 1);
        symbols.push(symbol);
        symbols.extend_from_slice(&self.0);
        Self(symbols)
    }

    /// Returns the prefix of `self` of the given `length`, or all of `self` if it is shorter.
    pub fn prefix(&self, length: usize) -> Self {
        Self(self.0[..length.min(self.len())].to_vec())
    }
}

impl<S: Symbol> Word<S> {
    /// Renders `self` in a human readable way, ε is used for the empty word.
    pub fn as_string(&self) -> String {
        if self.is_empty() {
            "ε".to_string()
        } else {
            S::show_sequence(&self.0)
        }
    }
}

impl<S> Default for Word<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: Symbol> Show for Word<S> {
    fn show(&self) -> String {
        self.as_string()
    }
}

impl<S: Symbol> Debug for Word<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.as_string())
    }
}

impl<S: Symbol> Display for Word<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl<S> From<Vec<S>> for Word<S> {
    fn from(value: Vec<S>) -> Self {
        Self(value)
    }
}

impl<S: Clone> From<&[S]> for Word<S> {
    fn from(value: &[S]) -> Self {
        Self(value.to_vec())
    }
}

impl<S, const N: usize> From<[S; N]> for Word<S> {
    fn from(value: [S; N]) -> Self {
        Self(value.into())
    }
}

impl From<&str> for Word<char> {
    fn from(value: &str) -> Self {
        Self(value.chars().collect())
    }
}

impl<S: Clone> From<&Word<S>> for Word<S> {
    fn from(value: &Word<S>) -> Self {
        value.clone()
    }
}

impl<S> FromIterator<S> for Word<S> {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<S> IntoIterator for Word<S> {
    type Item = S;
    type IntoIter = std::vec::IntoIter<S>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, S> IntoIterator for &'a Word<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Creates a [`Word`] from a list of symbols, `word![]` gives the empty word.
///
/// # Example
/// ```
/// use lstar_core::prelude::*;
/// assert_eq!(word!['a', 'b'], Word::from("ab"));
/// let empty: Word<char> = word![];
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! word {
    () => {
        $crate::word::Word::empty()
    };
    ($($symbol:expr),+ $(,)?) => {
        $crate::word::Word::from(vec![$($symbol),+])
    };
}
