use std::{collections::VecDeque, fmt::Display, ops::Range};

use itertools::Itertools;
use thiserror::Error;
use tracing::trace;

use crate::{
    alphabet::{Alphabet, AlphabetError, Symbol},
    math,
    word::Word,
    Color,
};

/// Type used to identify states of a [`MooreMachine`]. States are numbered consecutively
/// starting from `0`.
pub type StateIndex = usize;

/// Errors that can occur when assembling a [`MooreMachine`] from its parts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AutomatonError {
    /// A machine needs at least one state.
    #[error("a machine needs at least one state")]
    NoStates,
    /// The alphabet of the machine could not be created.
    #[error(transparent)]
    Alphabet(#[from] AlphabetError),
    /// A transition or the initial state refers to a state that does not exist.
    #[error("state {0} does not exist")]
    UnknownState(StateIndex),
    /// A transition is labeled with a symbol outside the alphabet.
    #[error("symbol `{0}` is not part of the alphabet")]
    UnknownSymbol(String),
    /// Some state lacks an outgoing transition for a symbol.
    #[error("state {state} has no transition on `{symbol}`")]
    Incomplete {
        /// the state whose transition is missing
        state: StateIndex,
        /// the symbol on which no transition exists
        symbol: String,
    },
    /// Two transitions leave the same state on the same symbol but lead to different states.
    #[error("state {state} has conflicting transitions on `{symbol}`")]
    Conflicting {
        /// the state with the conflicting transitions
        state: StateIndex,
        /// the symbol on which the conflict occurs
        symbol: String,
    },
}

/// A deterministic and complete transition system with a designated initial state, where every
/// state is colored with an output. The output of a word is the output of the state that is
/// reached by reading it from the initial state, in particular the output of the empty word is
/// the output of the initial state.
///
/// Transitions are stored densely: for every state there is precisely one target per symbol of
/// the alphabet.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MooreMachine<S, O> {
    alphabet: Alphabet<S>,
    initial: StateIndex,
    outputs: Vec<O>,
    transitions: Vec<StateIndex>,
}

/// A deterministic finite automaton (DFA) is a Moore machine that outputs `bool`. It accepts a
/// finite word if it reaches an accepting state, i.e. one whose output is `true`.
pub type DFA<S = char> = MooreMachine<S, bool>;

impl<S: Symbol, O: Color> MooreMachine<S, O> {
    /// Starts building a machine over the given alphabet, see [`MooreBuilder`].
    pub fn builder(alphabet: Alphabet<S>) -> MooreBuilder<S, O> {
        MooreBuilder::new(alphabet)
    }

    /// Returns a reference to the alphabet of `self`.
    pub fn alphabet(&self) -> &Alphabet<S> {
        &self.alphabet
    }

    /// The number of states.
    pub fn size(&self) -> usize {
        self.outputs.len()
    }

    /// Returns the initial state.
    pub fn initial(&self) -> StateIndex {
        self.initial
    }

    /// Iterates over all state indices.
    pub fn states(&self) -> Range<StateIndex> {
        0..self.size()
    }

    /// Gives the output of `state`, or `None` if no such state exists.
    pub fn state_output(&self, state: StateIndex) -> Option<&O> {
        self.outputs.get(state)
    }

    /// Returns the state that is reached from `state` by reading `symbol`. Gives back `None` if the
    /// state or the symbol are unknown.
    pub fn successor(&self, state: StateIndex, symbol: &S) -> Option<StateIndex> {
        if state >= self.size() {
            return None;
        }
        let position = self.alphabet.position(symbol)?;
        self.transitions
            .get(state * self.alphabet.size() + position)
            .copied()
    }

    /// Runs `word` starting in `origin` and returns the reached state.
    pub fn reached_state_from(&self, origin: StateIndex, word: &Word<S>) -> Option<StateIndex> {
        word.symbols()
            .try_fold(origin, |state, sym| self.successor(state, sym))
    }

    /// Runs `word` from the initial state and returns the reached state.
    pub fn reached_state(&self, word: &Word<S>) -> Option<StateIndex> {
        self.reached_state_from(self.initial, word)
    }

    /// Computes the output that `self` produces on `word`. Gives back `None` only if `word`
    /// contains a symbol that does not belong to the alphabet.
    pub fn output(&self, word: &Word<S>) -> Option<&O> {
        self.reached_state(word)
            .and_then(|state| self.state_output(state))
    }

    /// Iterates over all transitions as triples of origin, symbol and target.
    pub fn transitions(&self) -> impl Iterator<Item = (StateIndex, &S, StateIndex)> + '_ {
        self.states()
            .cartesian_product(0..self.alphabet.size())
            .map(|(state, position)| {
                (
                    state,
                    &self.alphabet[position],
                    self.transitions[state * self.alphabet.size() + position],
                )
            })
    }

    /// Computes the states reachable from the initial state, in breadth-first order. The
    /// returned vector maps each position to the original state index.
    pub fn reachable_states(&self) -> Vec<StateIndex> {
        let mut seen = math::Set::default();
        let mut order = vec![];
        let mut queue = VecDeque::from([self.initial]);
        seen.insert(self.initial);

        while let Some(state) = queue.pop_front() {
            order.push(state);
            for sym in self.alphabet.universe() {
                if let Some(target) = self.successor(state, sym) {
                    if seen.insert(target) {
                        queue.push_back(target);
                    }
                }
            }
        }
        order
    }

    /// Removes all states that cannot be reached from the initial state. The remaining states are
    /// renumbered in breadth-first order, so the initial state of the result is `0`.
    pub fn trim(&self) -> Self {
        let order = self.reachable_states();
        let renaming: math::Map<StateIndex, StateIndex> = order
            .iter()
            .enumerate()
            .map(|(new, old)| (*old, new))
            .collect();

        let outputs = order.iter().map(|q| self.outputs[*q].clone()).collect();
        let transitions = order
            .iter()
            .flat_map(|q| {
                let start = q * self.alphabet.size();
                self.transitions[start..start + self.alphabet.size()]
                    .iter()
                    .map(|target| renaming[target])
            })
            .collect();

        Self {
            alphabet: self.alphabet.clone(),
            initial: 0,
            outputs,
            transitions,
        }
    }

    /// Attempts to separate `self` from `other` by finding a shortest word on which the two
    /// produce different outputs. This is done through a breadth-first search of the product,
    /// which explores the symbols in the order given by the alphabet of `self`. A symbol that
    /// `other` cannot read is also considered to be a witness.
    ///
    /// Returns `None` if and only if the two machines are equivalent.
    pub fn separate(&self, other: &MooreMachine<S, O>) -> Option<Word<S>> {
        let start = (self.initial, other.initial());
        let mut seen = math::Set::default();
        let mut queue = VecDeque::from([(start, Word::empty())]);
        seen.insert(start);

        while let Some(((left, right), access)) = queue.pop_front() {
            if self.state_output(left) != other.state_output(right) {
                trace!("separated by {}", access.as_string());
                return Some(access);
            }
            for sym in self.alphabet.universe() {
                let extended = access.append(sym.clone());
                let (Some(l), Some(r)) = (self.successor(left, sym), other.successor(right, sym))
                else {
                    return Some(extended);
                };
                if seen.insert((l, r)) {
                    queue.push_back(((l, r), extended));
                }
            }
        }
        None
    }

    /// Checks whether `self` and `other` produce the same output on every word.
    pub fn equivalent(&self, other: &MooreMachine<S, O>) -> bool {
        self.separate(other).is_none()
    }
}

impl<S: Symbol> MooreMachine<S, bool> {
    /// Returns true if the DFA accepts `word`. Words containing unknown symbols are rejected.
    pub fn accepts(&self, word: &Word<S>) -> bool {
        self.output(word).copied().unwrap_or(false)
    }

    /// Returns the indices of all states that are accepting.
    pub fn accepting_states(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.states().filter(|q| self.outputs[*q])
    }
}

impl<S: Symbol, O: Color> Display for MooreMachine<S, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut builder = tabled::builder::Builder::default();
        let mut header = vec!["state".to_string(), "output".to_string()];
        header.extend(self.alphabet.universe().map(|sym| sym.show()));
        builder.push_record(header);

        for state in self.states() {
            let name = if state == self.initial {
                format!("-> q{state}")
            } else {
                format!("q{state}")
            };
            let mut row = vec![name, format!("{:?}", self.outputs[state])];
            row.extend(
                self.alphabet
                    .universe()
                    .filter_map(|sym| self.successor(state, sym))
                    .map(|target| format!("q{target}")),
            );
            builder.push_record(row);
        }

        write!(f, "{}", builder.build())
    }
}

/// Helper for assembling a [`MooreMachine`] from a list of state outputs and a list of
/// transitions. States are identified by their position in the list of outputs.
///
/// # Example
/// ```
/// use lstar_core::prelude::*;
/// let dfa: DFA = MooreMachine::builder(alphabet!('a', 'b'))
///     .with_state_colors([false, true])
///     .with_transitions([(0, 'a', 0), (0, 'b', 1), (1, 'a', 1), (1, 'b', 0)])
///     .into_moore(0)
///     .unwrap();
/// assert!(dfa.accepts(&Word::from("abaa")));
/// assert!(!dfa.accepts(&Word::from("abb")));
/// ```
#[derive(Debug, Clone)]
pub struct MooreBuilder<S, O> {
    alphabet: Alphabet<S>,
    outputs: Vec<O>,
    transitions: Vec<(StateIndex, S, StateIndex)>,
}

impl<S: Symbol, O: Color> MooreBuilder<S, O> {
    /// Creates an empty builder for the given alphabet.
    pub fn new(alphabet: Alphabet<S>) -> Self {
        Self {
            alphabet,
            outputs: vec![],
            transitions: vec![],
        }
    }

    /// Appends states with the given outputs.
    pub fn with_state_colors<I: IntoIterator<Item = O>>(mut self, outputs: I) -> Self {
        self.outputs.extend(outputs);
        self
    }

    /// Adds the given transitions, each one a triple of origin, symbol and target.
    pub fn with_transitions<I: IntoIterator<Item = (StateIndex, S, StateIndex)>>(
        mut self,
        transitions: I,
    ) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Collects into a [`MooreMachine`] with the given `initial` state. Fails if the result would
    /// not be deterministic and complete.
    pub fn into_moore(self, initial: StateIndex) -> Result<MooreMachine<S, O>, AutomatonError> {
        let size = self.outputs.len();
        if size == 0 {
            return Err(AutomatonError::NoStates);
        }
        if initial >= size {
            return Err(AutomatonError::UnknownState(initial));
        }

        let width = self.alphabet.size();
        let mut table: Vec<Option<StateIndex>> = vec![None; size * width];
        for (origin, sym, target) in self.transitions {
            for q in [origin, target] {
                if q >= size {
                    return Err(AutomatonError::UnknownState(q));
                }
            }
            let position = self
                .alphabet
                .position(&sym)
                .ok_or_else(|| AutomatonError::UnknownSymbol(sym.show()))?;
            let slot = origin * width + position;
            match table[slot] {
                Some(existing) if existing != target => {
                    return Err(AutomatonError::Conflicting {
                        state: origin,
                        symbol: sym.show(),
                    })
                }
                _ => table[slot] = Some(target),
            }
        }

        let transitions = table
            .into_iter()
            .enumerate()
            .map(|(i, target)| {
                target.ok_or_else(|| AutomatonError::Incomplete {
                    state: i / width,
                    symbol: self.alphabet[i % width].show(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MooreMachine {
            alphabet: self.alphabet,
            initial,
            outputs: self.outputs,
            transitions,
        })
    }
}
