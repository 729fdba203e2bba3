use std::fmt;

use itertools::Itertools;
use lstar_core::{
    math::{Map, OrderedMap, OrderedSet, Set},
    prelude::*,
};
use owo_colors::OwoColorize;
use tracing::{debug, trace};

use crate::{
    sul::{membership_query, Sul},
    LearningError,
};

type SymbolOf<T> = <T as Sul>::Symbol;
type OutputOf<T> = <T as Sul>::Output;

/// A row of an [`ObservationTable`]. It is identified by its word `w` and holds one observation
/// per separator `e`, namely the output of the system on `w · e`.
#[derive(Clone, PartialEq, Eq)]
pub struct Row<S, O> {
    word: Word<S>,
    content: Vec<O>,
}

impl<S, O> Row<S, O> {
    /// The word that identifies this row.
    pub fn word(&self) -> &Word<S> {
        &self.word
    }

    /// The observations, one per separator in the order in which separators were added.
    pub fn content(&self) -> &[O] {
        &self.content
    }
}

impl<S: Symbol, O: fmt::Debug> fmt::Debug for Row<S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {:?}", self.word.as_string(), self.content)
    }
}

/// Witnesses that a table is not consistent: `left` and `right` are the one-symbol extensions by
/// `symbol` of two representatives that have equal rows, yet the rows of `left` and `right`
/// differ.
#[derive(Clone, PartialEq, Eq)]
pub struct Inconsistency<S> {
    /// extension of the first representative
    pub left: Word<S>,
    /// extension of the second representative
    pub right: Word<S>,
    /// the symbol by which both representatives were extended
    pub symbol: S,
}

impl<S: Symbol> fmt::Debug for Inconsistency<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inconsistency")
            .field("left", &self.left)
            .field("right", &self.right)
            .field("symbol", &self.symbol)
            .finish()
    }
}

/// Answers membership queries for pairs of a row word and a separator. Each pair is sent to the
/// system at most once. Every concatenation that was ever observed is remembered as well, so
/// that reaching the same word through a different pair can be checked against the earlier
/// answer.
struct QueryCache<T: Sul> {
    sul: T,
    answers: Map<Word<SymbolOf<T>>, Map<Word<SymbolOf<T>>, OutputOf<T>>>,
    observed: Map<Word<SymbolOf<T>>, OutputOf<T>>,
    issued: usize,
}

impl<T: Sul> QueryCache<T> {
    fn new(sul: T) -> Self {
        Self {
            sul,
            answers: Map::default(),
            observed: Map::default(),
            issued: 0,
        }
    }

    fn query(
        &mut self,
        word: &Word<SymbolOf<T>>,
        separator: &Word<SymbolOf<T>>,
    ) -> Result<OutputOf<T>, LearningError> {
        if let Some(output) = self.answers.get(word).and_then(|row| row.get(separator)) {
            return Ok(output.clone());
        }

        let full = word.concat(separator);
        let output = membership_query(&mut self.sul, &full);
        self.issued += 1;

        match self.observed.get(&full) {
            Some(expected) if expected != &output => {
                return Err(LearningError::NonDeterministic {
                    word: full.as_string(),
                    expected: format!("{expected:?}"),
                    observed: format!("{output:?}"),
                })
            }
            Some(_) => {}
            None => {
                self.observed.insert(full, output.clone());
            }
        }

        self.answers
            .entry(word.clone())
            .or_default()
            .insert(separator.clone(), output.clone());
        Ok(output)
    }
}

/// The observation table of L*. It consists of
/// - the representatives `S`, an ordered set of words that always contains ε,
/// - the separators `E`, an ordered set of words that always contains ε as its first element,
/// - one [`Row`] for every word in `S` and every one-symbol extension `r·a` of a representative
///   `r`, where the row of `w` stores the output of the system on `w·e` for every `e ∈ E`.
///
/// Rows are created lazily and the table only ever grows. All membership queries go through a
/// cache which is owned by the table.
///
/// A table is *closed* if the row of every extension `r·a` equals the row of some
/// representative, and it is *consistent* if representatives with equal rows also have equal
/// rows for all their extensions. For a closed table, [`ObservationTable::construct_hypothesis`]
/// produces a [`MooreMachine`] whose states are the distinct rows of the representatives.
pub struct ObservationTable<T: Sul> {
    alphabet: Alphabet<SymbolOf<T>>,
    representatives: OrderedSet<Word<SymbolOf<T>>>,
    separators: OrderedSet<Word<SymbolOf<T>>>,
    rows: OrderedMap<Word<SymbolOf<T>>, Row<SymbolOf<T>, OutputOf<T>>>,
    queries: QueryCache<T>,
}

impl<T: Sul> ObservationTable<T> {
    /// Creates a fresh table with `S = {ε}` and `E = {ε}`. This already issues the membership
    /// queries for ε and for every symbol of the alphabet.
    pub fn new(sul: T, alphabet: Alphabet<SymbolOf<T>>) -> Result<Self, LearningError> {
        let mut separators = OrderedSet::default();
        separators.insert(Word::empty());

        let mut table = Self {
            alphabet,
            representatives: OrderedSet::default(),
            separators,
            rows: OrderedMap::default(),
            queries: QueryCache::new(sul),
        };
        table.add_representative(Word::empty())?;
        Ok(table)
    }

    /// Adds `word` to the representatives. If it is new, its row and the rows of all its
    /// one-symbol extensions are materialized. Returns whether `word` was newly inserted, adding a
    /// word twice has no effect. If a query fails, neither `word` nor any of its rows is added.
    pub fn add_representative<W: Into<Word<SymbolOf<T>>>>(
        &mut self,
        word: W,
    ) -> Result<bool, LearningError> {
        let word = word.into();
        self.check_symbols(&word)?;
        if self.representatives.contains(&word) {
            trace!("{} is already a representative", word.as_string());
            return Ok(false);
        }

        let extensions = self
            .alphabet
            .universe()
            .map(|sym| word.append(sym.clone()))
            .collect_vec();
        let mut fresh = vec![];
        for candidate in std::iter::once(&word).chain(&extensions) {
            if !self.rows.contains_key(candidate) {
                fresh.push(self.query_row(candidate)?);
            }
        }
        for row in fresh {
            trace!("new row {:?}", row);
            self.rows.insert(row.word.clone(), row);
        }

        debug!("adding representative {}", word.as_string());
        self.representatives.insert(word);
        Ok(true)
    }

    /// Adds `separator` as the new last column. If it is new, one membership query is issued for
    /// every existing row. Returns whether the separator was newly inserted.
    pub fn add_separator<W: Into<Word<SymbolOf<T>>>>(
        &mut self,
        separator: W,
    ) -> Result<bool, LearningError> {
        let separator = separator.into();
        self.check_symbols(&separator)?;
        if self.separators.contains(&separator) {
            trace!("{} is already a separator", separator.as_string());
            return Ok(false);
        }

        let column = self
            .rows
            .values()
            .map(|row| self.queries.query(&row.word, &separator))
            .collect::<Result<Vec<_>, _>>()?;
        for (row, output) in self.rows.values_mut().zip(column) {
            row.content.push(output);
        }

        debug!("adding separator {}", separator.as_string());
        self.separators.insert(separator);
        Ok(true)
    }

    /// Scans the one-symbol extensions of all representatives, ordered first by representative
    /// and then by symbol, and returns the first row that matches no representative's row.
    pub fn find_unclosed(&self) -> Option<&Row<SymbolOf<T>, OutputOf<T>>> {
        let known: Set<&[OutputOf<T>]> = self
            .representatives
            .iter()
            .map(|rep| self.content(rep))
            .collect();
        self.extension_rows()
            .find(|row| !known.contains(row.content()))
    }

    /// Promotes the word of an unclosed row to a representative.
    pub fn make_closed(&mut self, word: &Word<SymbolOf<T>>) -> Result<bool, LearningError> {
        self.add_representative(word.clone())
    }

    /// Looks for two representatives with equal rows whose extensions by the same symbol have
    /// different rows. Pairs are considered in the order in which representatives were inserted,
    /// symbols in alphabet order.
    pub fn find_inconsistency(&self) -> Option<Inconsistency<SymbolOf<T>>> {
        self.representatives
            .iter()
            .tuple_combinations()
            .filter(|(left, right)| self.content(left) == self.content(right))
            .find_map(|(left, right)| {
                self.alphabet.universe().find_map(|sym| {
                    let left = left.append(sym.clone());
                    let right = right.append(sym.clone());
                    (self.content(&left) != self.content(&right)).then(|| Inconsistency {
                        left,
                        right,
                        symbol: sym.clone(),
                    })
                })
            })
    }

    /// Resolves an inconsistency by adding the separator `a · e`, where `a` is the symbol of the
    /// inconsistency and `e` is the first separator on which the two rows differ. Returns the
    /// separator that was added.
    ///
    /// Fails with [`LearningError::InvariantViolated`] if the rows of the inconsistency are
    /// equal or do not exist.
    pub fn make_consistent(
        &mut self,
        inconsistency: &Inconsistency<SymbolOf<T>>,
    ) -> Result<Word<SymbolOf<T>>, LearningError> {
        let row = |word: &Word<SymbolOf<T>>| {
            self.rows.get(word).ok_or_else(|| {
                LearningError::InvariantViolated(format!("no row exists for {}", word.as_string()))
            })
        };
        let (left, right) = (row(&inconsistency.left)?, row(&inconsistency.right)?);

        let column = left
            .content
            .iter()
            .zip(&right.content)
            .position(|(l, r)| l != r)
            .ok_or_else(|| {
                LearningError::InvariantViolated(format!(
                    "rows of {} and {} are equal",
                    left.word.as_string(),
                    right.word.as_string()
                ))
            })?;
        let separator = self.separators[column].prepend(inconsistency.symbol.clone());

        trace!(
            "{} and {} differ on {}, adding {}",
            left.word.as_string(),
            right.word.as_string(),
            self.separators[column].as_string(),
            separator.as_string()
        );
        self.add_separator(separator.clone())?;
        Ok(separator)
    }

    /// Repairs the table until it is closed and consistent. Every repair adds a representative
    /// or a separator, so this terminates whenever the system under learning is finite-state.
    pub fn make_closed_and_consistent(&mut self) -> Result<(), LearningError> {
        loop {
            if let Some(word) = self.find_unclosed().map(|row| row.word.clone()) {
                debug!("row of {} is not closed", word.as_string());
                self.make_closed(&word)?;
                continue;
            }
            if let Some(inconsistency) = self.find_inconsistency() {
                debug!(
                    "{} and {} are inconsistent",
                    inconsistency.left.as_string(),
                    inconsistency.right.as_string()
                );
                self.make_consistent(&inconsistency)?;
                continue;
            }
            trace!("table is closed and consistent\n{self}");
            return Ok(());
        }
    }

    /// Builds the hypothesis of a closed table. Each distinct row among the representatives
    /// gives one state, numbered in the order in which representatives were inserted, so the
    /// class of ε is the initial state `0`. The output of a state is the entry of its row in the
    /// column of ε, and reading `a` in the state of `r` leads to the state whose row equals the
    /// row of `r·a`.
    ///
    /// Fails with [`LearningError::IncompleteTable`] if the table is not closed.
    pub fn construct_hypothesis(
        &self,
    ) -> Result<MooreMachine<SymbolOf<T>, OutputOf<T>>, LearningError> {
        let start = std::time::Instant::now();
        if let Some(row) = self.find_unclosed() {
            return Err(LearningError::IncompleteTable {
                word: row.word.as_string(),
            });
        }

        let epsilon_column = self
            .separators
            .get_index_of(&Word::empty())
            .ok_or_else(|| LearningError::InvariantViolated("ε is not a separator".to_string()))?;

        let mut classes: Map<&[OutputOf<T>], StateIndex> = Map::default();
        let mut canonical = vec![];
        for rep in &self.representatives {
            let content = self.content(rep);
            if !classes.contains_key(content) {
                classes.insert(content, canonical.len());
                canonical.push(rep);
            }
        }

        let outputs = canonical
            .iter()
            .map(|rep| {
                self.content(rep)
                    .get(epsilon_column)
                    .cloned()
                    .ok_or_else(|| {
                        LearningError::InvariantViolated(format!(
                            "row of {} is shorter than the number of separators",
                            rep.as_string()
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut transitions = Vec::with_capacity(canonical.len() * self.alphabet.size());
        for (state, rep) in canonical.iter().enumerate() {
            for sym in self.alphabet.universe() {
                let extension = rep.append(sym.clone());
                let target = self
                    .rows
                    .get(&extension)
                    .and_then(|row| classes.get(row.content.as_slice()))
                    .ok_or_else(|| LearningError::IncompleteTable {
                        word: extension.as_string(),
                    })?;
                transitions.push((state, sym.clone(), *target));
            }
        }

        let initial = classes
            .get(self.content(&Word::empty()))
            .copied()
            .ok_or_else(|| LearningError::InvariantViolated("ε has no row".to_string()))?;
        let hypothesis = MooreMachine::builder(self.alphabet.clone())
            .with_state_colors(outputs)
            .with_transitions(transitions)
            .into_moore(initial)
            .map_err(|e| LearningError::InvariantViolated(e.to_string()))?;

        debug!(
            "constructed hypothesis with {} states in {}",
            hypothesis.size(),
            show_duration(start.elapsed())
        );
        Ok(hypothesis)
    }

    /// Incorporates a counterexample by adding each of its non-empty prefixes as a
    /// representative, shortest first. The separators remain untouched.
    pub fn process_counterexample(
        &mut self,
        counterexample: &Word<SymbolOf<T>>,
    ) -> Result<(), LearningError> {
        self.check_symbols(counterexample)?;
        debug!("processing counterexample {}", counterexample.as_string());
        for prefix in counterexample.prefixes() {
            self.add_representative(prefix)?;
        }
        Ok(())
    }

    /// Incorporates a counterexample by adding each of its non-empty suffixes as a separator,
    /// shortest first. The representatives remain untouched.
    pub fn process_counterexample_suffixes(
        &mut self,
        counterexample: &Word<SymbolOf<T>>,
    ) -> Result<(), LearningError> {
        self.check_symbols(counterexample)?;
        debug!(
            "processing counterexample {} through its suffixes",
            counterexample.as_string()
        );
        for suffix in counterexample.suffixes() {
            self.add_separator(suffix)?;
        }
        Ok(())
    }

    /// Returns the row of `word`, if the table has one.
    pub fn get_row(&self, word: &Word<SymbolOf<T>>) -> Option<&Row<SymbolOf<T>, OutputOf<T>>> {
        self.rows.get(word)
    }

    /// Iterates over the representatives in insertion order.
    pub fn representatives(&self) -> impl Iterator<Item = &Word<SymbolOf<T>>> + '_ {
        self.representatives.iter()
    }

    /// Iterates over the separators in insertion order, which is the order of the columns.
    pub fn separators(&self) -> impl Iterator<Item = &Word<SymbolOf<T>>> + '_ {
        self.separators.iter()
    }

    /// Iterates over all rows in the order in which they were created.
    pub fn rows(&self) -> impl Iterator<Item = &Row<SymbolOf<T>, OutputOf<T>>> + '_ {
        self.rows.values()
    }

    /// The alphabet over which the table is built.
    pub fn alphabet(&self) -> &Alphabet<SymbolOf<T>> {
        &self.alphabet
    }

    /// The number of rows, i.e. of distinct words among representatives and their extensions.
    pub fn number_rows(&self) -> usize {
        self.rows.len()
    }

    /// The number of separators.
    pub fn number_separators(&self) -> usize {
        self.separators.len()
    }

    /// The number of representatives.
    pub fn number_representatives(&self) -> usize {
        self.representatives.len()
    }

    /// The number of membership queries that were sent to the system so far.
    pub fn queries(&self) -> usize {
        self.queries.issued
    }

    /// Returns true if no unclosed row exists.
    pub fn is_closed(&self) -> bool {
        self.find_unclosed().is_none()
    }

    /// Returns true if no inconsistency exists.
    pub fn is_consistent(&self) -> bool {
        self.find_inconsistency().is_none()
    }

    fn content(&self, word: &Word<SymbolOf<T>>) -> &[OutputOf<T>] {
        self.rows
            .get(word)
            .map(|row| row.content.as_slice())
            .unwrap_or_default()
    }

    fn extension_rows(&self) -> impl Iterator<Item = &Row<SymbolOf<T>, OutputOf<T>>> + '_ {
        self.representatives
            .iter()
            .cartesian_product(self.alphabet.universe())
            .filter_map(|(rep, sym)| self.rows.get(&rep.append(sym.clone())))
    }

    fn query_row(
        &mut self,
        word: &Word<SymbolOf<T>>,
    ) -> Result<Row<SymbolOf<T>, OutputOf<T>>, LearningError> {
        let content = self
            .separators
            .iter()
            .map(|separator| self.queries.query(word, separator))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Row {
            word: word.clone(),
            content,
        })
    }

    fn check_symbols(&self, word: &Word<SymbolOf<T>>) -> Result<(), LearningError> {
        match self.alphabet.first_unknown(word) {
            Some(symbol) => Err(LearningError::UnknownSymbol {
                symbol: symbol.show(),
                word: word.as_string(),
            }),
            None => Ok(()),
        }
    }
}

impl<T: Sul> fmt::Display for ObservationTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = tabled::builder::Builder::default();
        let mut header = vec!["".to_string()];
        header.extend(self.separators.iter().map(|e| e.as_string()));
        builder.push_record(header);

        let representatives = self.representatives.iter().filter_map(|w| self.rows.get(w));
        let extensions = self
            .rows
            .values()
            .filter(|row| !self.representatives.contains(&row.word));

        for row in representatives {
            let mut record = vec![row.word.as_string().blue().bold().to_string()];
            record.extend(row.content.iter().map(|o| format!("{o:?}")));
            builder.push_record(record);
        }
        for row in extensions {
            let mut record = vec![row.word.as_string()];
            record.extend(row.content.iter().map(|o| format!("{o:?}")));
            builder.push_record(record);
        }

        write!(f, "{}", builder.build())
    }
}

impl<T: Sul> fmt::Debug for ObservationTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
