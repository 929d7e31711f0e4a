use derive_more::{Display, Error};
use log::debug;
use rand::Rng;

use crate::model::{ColorId, PuzzleState, TUBE_CAPACITY};
use crate::solver::{SearchLimits, SolverGraph};

/// Generation failure: every deal within the attempt ceiling came back
/// unsolvable (or at least unprovable within the solver's node budget).
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum GenerateError {
    #[display("no solvable deal found in {attempts} attempts")]
    AttemptsExhausted { attempts: usize },
}

/// Deals random puzzle instances and keeps only the ones the solver can
/// actually solve.
///
/// Each deal places exactly [`TUBE_CAPACITY`] units of every color, one
/// unit at a time, drawing the color uniformly from a reserve with
/// remaining-count bookkeeping. A full deal is then handed to
/// [`SolverGraph::recalculate`]; on failure the whole deal is discarded
/// and redealt. The attempt ceiling turns a pathological configuration
/// into a clear error instead of an endless loop.
#[derive(Clone, Copy, Debug)]
pub struct PuzzleGenerator {
    pub color_count: u8,
    pub extra_tubes: usize,
    pub max_attempts: usize,
    pub limits: SearchLimits,
}

impl PuzzleGenerator {
    /// Spare empty tubes dealt alongside the colored ones.
    pub const DEFAULT_EXTRA_TUBES: usize = 2;
    /// Deal-and-validate retries before giving up.
    pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

    #[must_use]
    pub fn new(color_count: u8) -> Self {
        Self {
            color_count,
            extra_tubes: Self::DEFAULT_EXTRA_TUBES,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            limits: SearchLimits::default(),
        }
    }

    /// Produces a solver-confirmed solvable initial state.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::AttemptsExhausted`] when `max_attempts`
    /// deals in a row failed validation.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<PuzzleState, GenerateError> {
        let mut graph = SolverGraph::with_limits(self.limits);
        for attempt in 1..=self.max_attempts {
            let state = self.deal(rng);
            if graph.recalculate(&state, rng) {
                debug!("solvable deal found on attempt {attempt}");
                return Ok(state);
            }
            debug!("deal {attempt} not solvable within budget, redealing");
        }
        Err(GenerateError::AttemptsExhausted {
            attempts: self.max_attempts,
        })
    }

    /// One random deal: colored tubes are filled in order, each unit's
    /// color drawn uniformly from what is still owed; spares stay empty.
    fn deal<R: Rng + ?Sized>(&self, rng: &mut R) -> PuzzleState {
        let mut state = PuzzleState::new(self.color_count, self.extra_tubes);
        let mut reserve: Vec<(u8, usize)> = (1..=self.color_count)
            .map(|code| (code, TUBE_CAPACITY))
            .collect();
        let total = usize::from(self.color_count) * TUBE_CAPACITY;
        for unit in 0..total {
            let pick = rng.random_range(0..reserve.len());
            let (code, remaining) = &mut reserve[pick];
            let color = ColorId::new(*code);
            *remaining -= 1;
            if *remaining == 0 {
                reserve.swap_remove(pick);
            }
            state.add(unit / TUBE_CAPACITY, color, 1);
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn units_of(state: &PuzzleState, code: u8) -> usize {
        (0..state.tube_count())
            .flat_map(|i| state.segments(i))
            .filter(|(color, _)| color.code() == code)
            .map(|(_, count)| count)
            .sum()
    }

    #[test]
    fn generates_a_solvable_four_color_puzzle() {
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let generator = PuzzleGenerator::new(4);
        let state = generator.generate(&mut rng).unwrap();

        assert_eq!(state.tube_count(), 6);
        assert_eq!(state.color_count(), 4);
        for code in 1..=4 {
            assert_eq!(units_of(&state, code), TUBE_CAPACITY);
        }
        // The spare tubes at the end of the row start empty.
        assert!(state.is_tube_empty(4));
        assert!(state.is_tube_empty(5));
        assert!(!state.is_final());

        // What the generator promises: the deal is solvable.
        let mut graph = SolverGraph::new();
        assert!(graph.recalculate(&state, &mut rng));
    }

    #[test]
    fn same_seed_deals_the_same_puzzle() {
        let generator = PuzzleGenerator::new(4);
        let mut rng_a = Pcg64Mcg::seed_from_u64(77);
        let mut rng_b = Pcg64Mcg::seed_from_u64(77);
        assert_eq!(
            generator.generate(&mut rng_a).unwrap(),
            generator.generate(&mut rng_b).unwrap()
        );
    }

    #[test]
    fn attempt_ceiling_reports_failure() {
        let mut rng = Pcg64Mcg::seed_from_u64(2);
        let mut generator = PuzzleGenerator::new(5);
        generator.max_attempts = 3;
        // A zero-node budget makes every validation come back inconclusive.
        generator.limits = SearchLimits { max_nodes: 0 };
        assert_eq!(
            generator.generate(&mut rng),
            Err(GenerateError::AttemptsExhausted { attempts: 3 })
        );
    }
}
