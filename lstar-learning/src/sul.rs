use lstar_core::prelude::*;
use tracing::{trace, warn};

/// The system under learning (SUL). It is a black box that can be reset into its initial
/// configuration and then fed one symbol at a time, answering with an observation after each
/// step. Every interaction mutates the system, so it is only ever accessed through `&mut self`.
pub trait Sul {
    /// The type of input symbols.
    type Symbol: Symbol;
    /// The type of observations, `bool` for acceptors.
    type Output: Color;

    /// Brings the system back into its initial configuration.
    fn reset(&mut self);

    /// Consumes one symbol and returns the observation of the configuration that is reached.
    fn step(&mut self, symbol: &Self::Symbol) -> Self::Output;

    /// Returns the observation of the current configuration without consuming a symbol.
    fn observe(&mut self) -> Self::Output;
}

impl<T: Sul + ?Sized> Sul for &mut T {
    type Symbol = T::Symbol;
    type Output = T::Output;

    fn reset(&mut self) {
        T::reset(self)
    }

    fn step(&mut self, symbol: &Self::Symbol) -> Self::Output {
        T::step(self, symbol)
    }

    fn observe(&mut self) -> Self::Output {
        T::observe(self)
    }
}

/// Poses a membership query for `word`: the system is reset, each symbol of `word` is fed in
/// order and the observation after the last symbol is returned. For the empty word, this is the
/// observation of the initial configuration.
pub fn membership_query<T: Sul + ?Sized>(sul: &mut T, word: &Word<T::Symbol>) -> T::Output {
    sul.reset();
    let output = word
        .symbols()
        .fold(None, |_, sym| Some(sul.step(sym)))
        .unwrap_or_else(|| sul.observe());
    trace!("membership query {} gave {:?}", word.as_string(), output);
    output
}

/// Turns a [`MooreMachine`] into a [`Sul`], which is mostly useful when the target of learning
/// is known, for example in tests and experiments.
#[derive(Debug, Clone)]
pub struct MooreSul<S, O> {
    machine: MooreMachine<S, O>,
    state: StateIndex,
}

impl<S: Symbol, O: Color> MooreSul<S, O> {
    /// Wraps the given machine, starting in its initial state.
    pub fn new(machine: MooreMachine<S, O>) -> Self {
        let state = machine.initial();
        Self { machine, state }
    }

    /// Returns a reference to the wrapped machine.
    pub fn machine(&self) -> &MooreMachine<S, O> {
        &self.machine
    }

    fn current_output(&self) -> O {
        self.machine
            .state_output(self.state)
            .cloned()
            .unwrap_or_else(|| unreachable!("{} is a state of the wrapped machine", self.state))
    }
}

impl<S: Symbol, O: Color> Sul for MooreSul<S, O> {
    type Symbol = S;
    type Output = O;

    fn reset(&mut self) {
        self.state = self.machine.initial();
    }

    fn step(&mut self, symbol: &S) -> O {
        match self.machine.successor(self.state, symbol) {
            Some(next) => self.state = next,
            None => warn!(
                "symbol {} is unknown to the wrapped machine, staying in q{}",
                symbol.show(),
                self.state
            ),
        }
        self.current_output()
    }

    fn observe(&mut self) -> O {
        self.current_output()
    }
}

#[cfg(test)]
mod tests {
    use lstar_core::prelude::*;

    use super::{membership_query, MooreSul, Sul};

    fn parity() -> MooreMachine<char, u8> {
        MooreMachine::builder(alphabet!('a', 'b'))
            .with_state_colors([0, 1])
            .with_transitions([(0, 'a', 1), (0, 'b', 0), (1, 'a', 0), (1, 'b', 1)])
            .into_moore(0)
            .unwrap()
    }

    #[test_log::test]
    fn queries_reset_before_running() {
        let mut sul = MooreSul::new(parity());
        assert_eq!(membership_query(&mut sul, &Word::from("a")), 1);
        // without the reset, this would continue from the state reached by `a`
        assert_eq!(membership_query(&mut sul, &Word::from("ab")), 1);
        assert_eq!(membership_query(&mut sul, &Word::from("aa")), 0);
    }

    #[test_log::test]
    fn empty_word_observes_initial_output() {
        let mut sul = MooreSul::new(parity());
        sul.step(&'a');
        assert_eq!(membership_query(&mut sul, &Word::empty()), 0);
    }

    #[test]
    fn works_through_mutable_references() {
        let mut sul = MooreSul::new(parity());
        let mut borrowed = &mut sul;
        assert_eq!(membership_query(&mut borrowed, &Word::from("bab")), 1);
    }
}
