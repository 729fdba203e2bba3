//! Basic building blocks for active automata learning.
//!
//! A [`Word`](word::Word) is a finite sequence of symbols drawn from an [`Alphabet`](alphabet::Alphabet).
//! Learned hypotheses are represented as [`MooreMachine`](automaton::MooreMachine)s, that is
//! deterministic and complete transition systems where every state carries an output. A
//! [`DFA`](automaton::DFA) is simply a Moore machine whose outputs are `bool`, where `true` marks a
//! state as accepting.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::{fmt::Debug, hash::Hash};

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use lstar_core::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        alphabet,
        alphabet::{Alphabet, AlphabetError, CharAlphabet, Symbol},
        automaton::{AutomatonError, MooreBuilder, MooreMachine, StateIndex, DFA},
        math, show_duration, word,
        word::{Prefixes, Suffixes, Word},
        Color, Show,
    };
}

/// Type aliases for the collections used throughout the workspace.
pub mod math;

mod show;
pub use show::{show_duration, Show};

/// Module that contains definitions for dealing with alphabets.
#[macro_use]
pub mod alphabet;

/// Module that contains definitions for dealing with finite words.
#[macro_use]
pub mod word;

/// Deterministic Moore machines and DFAs, which are the hypotheses produced by learning.
pub mod automaton;

/// Implements the generation of random automata. This is feature gated behind the `random` feature.
#[cfg(feature = "random")]
pub mod random;

/// A color is simply a type that can be used as the output of a state, or equivalently as the
/// observation that a system produces after reading a word.
pub trait Color: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Color for T {}
