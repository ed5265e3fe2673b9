use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::types::CellCount;

/// Decides which cells of a freshly dealt board receive mines.
///
/// Implementations visit flat cell indices `0..population` in ascending scan
/// order and return the selected indices, also ascending. Every `mines`-sized
/// subset of the population must come out equally likely.
pub trait MineSampler {
    fn sample(&mut self, population: CellCount, mines: CellCount) -> Vec<CellCount>;
}

/// Unbiased selection without replacement in a single linear pass: with
/// `need` mines left to place among `remaining` unexamined cells, the current
/// cell is selected with probability `need / remaining`. One uniform draw per
/// undecided cell, early exit once nothing is left to place.
#[derive(Clone, Debug)]
pub struct BernoulliSampler {
    rng: SmallRng,
}

impl BernoulliSampler {
    /// Sampler for a real game, seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Fixed-seed sampler; identical seeds reproduce identical layouts.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// One trial with probability `p / q`.
    fn trial(&mut self, p: CellCount, q: CellCount) -> bool {
        if q <= 1 {
            return p >= q;
        }
        self.rng.random_range(1..=q) <= p
    }
}

impl MineSampler for BernoulliSampler {
    fn sample(&mut self, population: CellCount, mines: CellCount) -> Vec<CellCount> {
        if mines >= population {
            if mines > population {
                log::warn!("asked for {mines} mines but only {population} cells exist");
            }
            return (0..population).collect();
        }

        let mut selected = Vec::with_capacity(usize::from(mines));
        for idx in 0..population {
            let need = mines - selected.len() as CellCount;
            if need == 0 {
                break;
            }
            if self.trial(need, population - idx) {
                selected.push(idx);
            }
        }
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_the_requested_number_of_mines() {
        for seed in 0..64 {
            let mut sampler = BernoulliSampler::with_seed(seed);
            let picked = sampler.sample(81, 10);

            assert_eq!(picked.len(), 10);
            assert!(picked.windows(2).all(|w| w[0] < w[1]));
            assert!(picked.iter().all(|&idx| idx < 81));
        }
    }

    #[test]
    fn same_seed_reproduces_the_same_layout() {
        let a = BernoulliSampler::with_seed(1234).sample(480, 99);
        let b = BernoulliSampler::with_seed(1234).sample(480, 99);

        assert_eq!(a, b);
    }

    #[test]
    fn overfull_request_selects_everything() {
        let mut sampler = BernoulliSampler::with_seed(0);

        assert_eq!(sampler.sample(4, 4), vec![0, 1, 2, 3]);
        assert_eq!(sampler.sample(4, 9), vec![0, 1, 2, 3]);
    }

    #[test]
    fn every_cell_is_selected_equally_often() {
        const DRAWS: u32 = 6000;

        let mut sampler = BernoulliSampler::with_seed(99);
        let mut hits = [0u32; 6];
        for _ in 0..DRAWS {
            for idx in sampler.sample(6, 2) {
                hits[usize::from(idx)] += 1;
            }
        }

        // expectation is DRAWS * 2/6 = 2000 per cell; the bound is ~5.5 sigma
        for (idx, &count) in hits.iter().enumerate() {
            assert!(
                (1800..=2200).contains(&count),
                "cell {idx} selected {count} times"
            );
        }
    }

    #[test]
    fn every_combination_is_drawn_equally_often() {
        const DRAWS: u32 = 4000;

        let mut sampler = BernoulliSampler::with_seed(7);
        let mut combos = std::collections::HashMap::new();
        for _ in 0..DRAWS {
            let picked = sampler.sample(5, 2);
            *combos.entry((picked[0], picked[1])).or_insert(0u32) += 1;
        }

        // C(5, 2) = 10 combinations, 400 expected apiece
        assert_eq!(combos.len(), 10);
        for (combo, &count) in &combos {
            assert!(
                (250..=550).contains(&count),
                "combination {combo:?} drawn {count} times"
            );
        }
    }
}
