//! Parent selection over ranked fitness.
//!
//! Selection is a pure function of the ranked state and the RNG stream: it
//! holds no memory across calls within a generation, and it only ever
//! returns member slots in `[0, population_size)`.

use rand::Rng;

/// A generation's members ordered by fitness, best first.
///
/// Ties keep their original slot order (stable sort), so ranking, and with
/// it the whole generation advance, is deterministic for a fixed RNG seed.
#[derive(Debug, Clone)]
pub struct Ranking {
    /// Member slots, best-ranked first.
    order: Vec<usize>,
}

impl Ranking {
    /// Rank member slots by descending fitness.
    ///
    /// NaN scores compare as equal to everything and therefore keep their
    /// original position among their neighbors.
    #[must_use]
    pub fn from_fitness(fitness: &[f32]) -> Self {
        let mut order: Vec<usize> = (0..fitness.len()).collect();
        order.sort_by(|&a, &b| {
            fitness[b]
                .partial_cmp(&fitness[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self { order }
    }

    /// Number of ranked members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the ranking is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The member slot holding the given rank (0 = best).
    #[must_use]
    pub fn slot_at_rank(&self, rank: usize) -> usize {
        self.order[rank]
    }

    /// Member slots in rank order, best first.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }
}

/// Rule for choosing which ranked genotype parents each offspring slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Sample `size` distinct ranked positions uniformly without
    /// replacement and keep the best-ranked of them.
    Tournament {
        /// Contestants per tournament; clamped to the population size.
        size: usize,
    },
    /// Choose rank `p` of `n` with probability proportional to `n - p`.
    RankProportional,
}

impl SelectionPolicy {
    /// Choose a parent; returns the member's original slot.
    ///
    /// # Panics
    ///
    /// Panics on an empty ranking.
    pub fn select<R: Rng>(&self, ranking: &Ranking, rng: &mut R) -> usize {
        let n = ranking.len();
        assert!(n > 0, "cannot select from an empty ranking");

        match *self {
            Self::Tournament { size } => {
                let contestants = size.clamp(1, n);
                let best_rank = rand::seq::index::sample(rng, n, contestants)
                    .into_iter()
                    .min()
                    .unwrap_or(0);
                ranking.slot_at_rank(best_rank)
            }
            Self::RankProportional => {
                // Triangular weights: rank 0 gets n, the last rank gets 1.
                let total = n * (n + 1) / 2;
                let mut draw = rng.random_range(0..total);
                for rank in 0..n {
                    let weight = n - rank;
                    if draw < weight {
                        return ranking.slot_at_rank(rank);
                    }
                    draw -= weight;
                }
                unreachable!("triangular weights cover the draw range")
            }
        }
    }
}
