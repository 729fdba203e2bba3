use rand::Rng;
use tracing::debug;

use crate::prelude::*;

/// Generate a random Moore machine with `size` states over a [`CharAlphabet`] with `symbols`
/// symbols. For every state and every symbol a target is drawn uniformly, and every state
/// receives an output drawn uniformly from `0..outputs`. Depending on the drawn transitions,
/// some states may be unreachable from the initial state `0`, these are removed, so the result
/// may be smaller than `size`.
///
/// Fails with [`AutomatonError::NoStates`] if `size` is zero and with
/// [`AutomatonError::Alphabet`] if `symbols` is zero.
///
/// # Panics
/// If `outputs` is zero.
pub fn generate_random_moore<R: Rng + ?Sized>(
    symbols: usize,
    size: usize,
    outputs: usize,
    rng: &mut R,
) -> Result<MooreMachine<char, usize>, AutomatonError> {
    assert!(outputs > 0, "a machine needs at least one output");
    if size == 0 {
        return Err(AutomatonError::NoStates);
    }
    let alphabet = CharAlphabet::of_size(symbols)?;

    let colors = (0..size).map(|_| rng.gen_range(0..outputs)).collect::<Vec<_>>();
    let mut transitions = Vec::with_capacity(size * symbols);
    for q in 0..size {
        for sym in alphabet.universe() {
            transitions.push((q, *sym, rng.gen_range(0..size)));
        }
    }

    let drawn = MooreMachine::builder(alphabet)
        .with_state_colors(colors)
        .with_transitions(transitions)
        .into_moore(0)?;
    let trimmed = drawn.trim();
    debug!(
        "drew machine with {size} states of which {} are reachable",
        trimmed.size()
    );
    Ok(trimmed)
}

/// Works as [`generate_random_moore`], but returns a [`DFA`] instead by flipping a fair coin for
/// every state to decide whether it is accepting.
pub fn generate_random_dfa<R: Rng + ?Sized>(
    symbols: usize,
    size: usize,
    rng: &mut R,
) -> Result<DFA, AutomatonError> {
    let moore = generate_random_moore(symbols, size, 2, rng)?;
    let colors = moore
        .states()
        .filter_map(|q| moore.state_output(q))
        .map(|output| *output == 1)
        .collect::<Vec<_>>();
    let transitions = moore
        .transitions()
        .map(|(q, sym, p)| (q, *sym, p))
        .collect::<Vec<_>>();

    MooreMachine::builder(moore.alphabet().clone())
        .with_state_colors(colors)
        .with_transitions(transitions)
        .into_moore(moore.initial())
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::{generate_random_dfa, generate_random_moore};
    use crate::prelude::*;

    #[test_log::test]
    fn random_machines_are_complete_and_reachable() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..20 {
            let dfa = generate_random_dfa(3, 8, &mut rng).unwrap();
            assert!(dfa.size() <= 8);
            assert_eq!(dfa.transitions().count(), dfa.size() * 3);
            assert_eq!(dfa.reachable_states().len(), dfa.size());
            assert_eq!(dfa.initial(), 0);
        }
    }

    #[test]
    fn outputs_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let moore = generate_random_moore(2, 10, 3, &mut rng).unwrap();
        assert!(moore.states().all(|q| moore.state_output(q).is_some_and(|o| *o < 3)));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let first = generate_random_dfa(2, 6, &mut StdRng::seed_from_u64(99)).unwrap();
        let second = generate_random_dfa(2, 6, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn degenerate_sizes() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            generate_random_dfa(0, 4, &mut rng),
            Err(AutomatonError::Alphabet(AlphabetError::Empty))
        );
        assert_eq!(generate_random_dfa(2, 0, &mut rng), Err(AutomatonError::NoStates));

        let wide = generate_random_dfa(30, 3, &mut rng).unwrap();
        assert_eq!(wide.alphabet().size(), 30);
        assert_eq!(wide.transitions().count(), wide.size() * 30);
    }
}
