//! Population state and the generation-advance algorithm.
//!
//! Each generation moves through three states: awaiting evaluation (all
//! fitness unset), ranked (scores sorted, elites identified), and
//! reproduced (offspring fill the non-elite slots). [`Population::evaluate`]
//! performs the first transition, [`Population::advance_generation`] the
//! remaining two, after which the population awaits evaluation again.

use std::sync::Arc;

use log::{debug, trace};
use rand::Rng;
use thiserror::Error;

use crate::config::{CgpConfig, ConfigError};
use crate::domain::Domain;
use crate::genotype::Genotype;
use crate::mutation;
use crate::selection::{Ranking, SelectionPolicy};

/// Error raised by population construction or the generation loop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvolutionError {
    /// The config failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The domain's circuit shape disagrees with the config.
    #[error(
        "domain expects {domain_inputs} inputs / {domain_outputs} outputs, \
         config provides {config_inputs}/{config_outputs}"
    )]
    DomainShapeMismatch {
        /// Inputs the domain feeds each genotype.
        domain_inputs: usize,
        /// Outputs the domain reads from each genotype.
        domain_outputs: usize,
        /// Inputs per the population's config.
        config_inputs: usize,
        /// Outputs per the population's config.
        config_outputs: usize,
    },
    /// The domain returned the wrong number of fitness scores. Fatal:
    /// continuing would misattribute fitness to the wrong genotypes.
    #[error("domain returned {found} fitness scores for {expected} members")]
    FitnessCountMismatch {
        /// Population size.
        expected: usize,
        /// Scores actually returned.
        found: usize,
    },
    /// Generation advance requested while members are still unevaluated.
    #[error("generation {generation} cannot advance before every member is evaluated")]
    NotEvaluated {
        /// The generation that was asked to advance.
        generation: usize,
    },
}

/// Summary of one evaluated generation.
#[derive(Debug, Clone, Copy)]
pub struct GenerationStats {
    /// Generation number the scores belong to.
    pub generation: usize,
    /// Best fitness in the generation.
    pub best_fitness: f32,
    /// Mean fitness across the generation.
    pub mean_fitness: f32,
}

/// An ordered generation of genotypes with fitness bookkeeping.
///
/// Invariant: the fitness sequence always has exactly one slot per member;
/// scores are `None` from construction and after every advance, until the
/// next evaluation fills them.
///
/// Determinism: given an identical config, identical seed genotypes, and an
/// identically seeded RNG, runs are reproducible because randomness is
/// consumed in a fixed order: during advance, each offspring slot draws
/// selection first, then mutation, slot by slot in slot order.
#[derive(Debug, Clone)]
pub struct Population {
    config: Arc<CgpConfig>,
    members: Vec<Genotype>,
    fitness: Vec<Option<f32>>,
    generation: usize,
}

impl Population {
    /// Seed a generation-0 population of primordial genotypes.
    ///
    /// # Errors
    ///
    /// Fails on an invalid config.
    pub fn new<R: Rng>(config: Arc<CgpConfig>, rng: &mut R) -> Result<Self, EvolutionError> {
        config.validate()?;
        let members = (0..config.population_size)
            .map(|_| Genotype::primordial_seed(config.clone(), rng))
            .collect::<Result<Vec<_>, _>>()?;
        let fitness = vec![None; config.population_size];

        Ok(Self {
            config,
            members,
            fitness,
            generation: 0,
        })
    }

    /// The config shared by every member.
    #[must_use]
    pub fn config(&self) -> &Arc<CgpConfig> {
        &self.config
    }

    /// Current members, in slot order.
    #[must_use]
    pub fn members(&self) -> &[Genotype] {
        &self.members
    }

    /// Fitness per member slot; `None` until evaluated this generation.
    #[must_use]
    pub fn fitness(&self) -> &[Option<f32>] {
        &self.fitness
    }

    /// Monotonic generation counter, starting at 0.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Ask the domain to score every member.
    ///
    /// # Errors
    ///
    /// Fails if the domain's circuit shape disagrees with the config, or if
    /// it returns a score sequence of the wrong length (in which case no
    /// score is recorded).
    pub fn evaluate<D: Domain + ?Sized>(
        &mut self,
        domain: &D,
    ) -> Result<GenerationStats, EvolutionError> {
        if domain.num_inputs() != self.config.num_inputs
            || domain.num_outputs() != self.config.num_outputs
        {
            return Err(EvolutionError::DomainShapeMismatch {
                domain_inputs: domain.num_inputs(),
                domain_outputs: domain.num_outputs(),
                config_inputs: self.config.num_inputs,
                config_outputs: self.config.num_outputs,
            });
        }

        let scores = domain.evaluate_population(&self.members);
        if scores.len() != self.members.len() {
            return Err(EvolutionError::FitnessCountMismatch {
                expected: self.members.len(),
                found: scores.len(),
            });
        }

        let best = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mean = scores.iter().sum::<f32>() / scores.len() as f32;
        for (slot, score) in self.fitness.iter_mut().zip(&scores) {
            *slot = Some(*score);
        }

        let stats = GenerationStats {
            generation: self.generation,
            best_fitness: best,
            mean_fitness: mean,
        };
        debug!(
            "generation {}: best fitness {:.4}, mean {:.4}",
            stats.generation, stats.best_fitness, stats.mean_fitness
        );
        Ok(stats)
    }

    /// Rank the evaluated members, best first.
    ///
    /// # Errors
    ///
    /// Fails if any member is still unevaluated.
    pub fn ranking(&self) -> Result<Ranking, EvolutionError> {
        let scores = self.evaluated_scores()?;
        Ok(Ranking::from_fitness(&scores))
    }

    /// The best-ranked member and its fitness, if evaluated.
    #[must_use]
    pub fn best(&self) -> Option<(&Genotype, f32)> {
        let ranking = self.ranking().ok()?;
        let slot = ranking.slot_at_rank(0);
        Some((&self.members[slot], self.fitness[slot]?))
    }

    /// Rank, keep elites, and fill the remaining slots with mutated clones
    /// of selected parents; then clear fitness and increment the counter.
    ///
    /// Elites occupy slots `0..elite_count` of the next generation,
    /// structurally unchanged. Every other slot draws a parent from
    /// `policy`, clones it, and mutates the clone with the config's rates.
    ///
    /// # Errors
    ///
    /// Fails if any member is still unevaluated; the population is left
    /// untouched.
    pub fn advance_generation<R: Rng>(
        &mut self,
        policy: &SelectionPolicy,
        rng: &mut R,
    ) -> Result<(), EvolutionError> {
        let ranking = self.ranking()?;

        let mut next = Vec::with_capacity(self.members.len());
        for rank in 0..self.config.elite_count {
            next.push(self.members[ranking.slot_at_rank(rank)].clone());
        }
        for slot in self.config.elite_count..self.members.len() {
            let parent = policy.select(&ranking, rng);
            trace!("slot {slot}: parent slot {parent}");
            let mut child = self.members[parent].clone();
            mutation::mutate(
                &mut child,
                self.config.function_mutation_rate,
                self.config.connection_mutation_rate,
                rng,
            );
            next.push(child);
        }

        self.members = next;
        self.fitness = vec![None; self.members.len()];
        self.generation += 1;
        debug!("advanced to generation {}", self.generation);
        Ok(())
    }

    fn evaluated_scores(&self) -> Result<Vec<f32>, EvolutionError> {
        self.fitness
            .iter()
            .map(|&slot| {
                slot.ok_or(EvolutionError::NotEvaluated {
                    generation: self.generation,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn test_config() -> Arc<CgpConfig> {
        Arc::new(CgpConfig {
            rows: 3,
            columns: 6,
            levels_back: 2,
            num_inputs: 2,
            num_outputs: 1,
            population_size: 10,
            elite_count: 2,
            ..CgpConfig::default()
        })
    }

    /// Scores members by a fixed table, cycling if needed.
    struct TableDomain {
        inputs: usize,
        outputs: usize,
        table: Vec<f32>,
    }

    impl Domain for TableDomain {
        fn num_inputs(&self) -> usize {
            self.inputs
        }
        fn num_outputs(&self) -> usize {
            self.outputs
        }
        fn evaluate_population(&self, members: &[Genotype]) -> Vec<f32> {
            (0..members.len())
                .map(|i| self.table[i % self.table.len()])
                .collect()
        }
    }

    /// Deliberately returns one score too few.
    struct ShortDomain;

    impl Domain for ShortDomain {
        fn num_inputs(&self) -> usize {
            2
        }
        fn num_outputs(&self) -> usize {
            1
        }
        fn evaluate_population(&self, members: &[Genotype]) -> Vec<f32> {
            vec![0.0; members.len().saturating_sub(1)]
        }
    }

    fn table_domain(table: &[f32]) -> TableDomain {
        TableDomain {
            inputs: 2,
            outputs: 1,
            table: table.to_vec(),
        }
    }

    #[test]
    fn test_new_population_awaits_evaluation() {
        let population = Population::new(test_config(), &mut test_rng()).unwrap();
        assert_eq!(population.generation(), 0);
        assert_eq!(population.members().len(), 10);
        assert_eq!(population.fitness().len(), 10);
        assert!(population.fitness().iter().all(Option::is_none));
        assert!(population.best().is_none());
    }

    #[test]
    fn test_evaluate_fills_scores() {
        let mut population = Population::new(test_config(), &mut test_rng()).unwrap();
        let domain = table_domain(&[5.0, 3.0, 8.0, 1.0, 9.0, 2.0, 7.0, 4.0, 6.0, 0.0]);

        let stats = population.evaluate(&domain).unwrap();
        assert!((stats.best_fitness - 9.0).abs() < 1e-6);
        assert!((stats.mean_fitness - 4.5).abs() < 1e-6);
        assert!(population.fitness().iter().all(Option::is_some));

        let (_, best_fitness) = population.best().unwrap();
        assert!((best_fitness - 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_fitness_count_mismatch_is_fatal() {
        let mut population = Population::new(test_config(), &mut test_rng()).unwrap();
        let result = population.evaluate(&ShortDomain);
        assert_eq!(
            result.unwrap_err(),
            EvolutionError::FitnessCountMismatch {
                expected: 10,
                found: 9
            }
        );
        // No score was recorded.
        assert!(population.fitness().iter().all(Option::is_none));
    }

    #[test]
    fn test_domain_shape_mismatch() {
        let mut population = Population::new(test_config(), &mut test_rng()).unwrap();
        let domain = TableDomain {
            inputs: 3,
            outputs: 1,
            table: vec![0.0],
        };
        assert!(matches!(
            population.evaluate(&domain),
            Err(EvolutionError::DomainShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_advance_requires_evaluation() {
        let mut population = Population::new(test_config(), &mut test_rng()).unwrap();
        let policy = SelectionPolicy::Tournament { size: 3 };
        assert_eq!(
            population
                .advance_generation(&policy, &mut test_rng())
                .unwrap_err(),
            EvolutionError::NotEvaluated { generation: 0 }
        );
    }

    #[test]
    fn test_advance_resets_state() {
        let mut rng = test_rng();
        let mut population = Population::new(test_config(), &mut rng).unwrap();
        let domain = table_domain(&[5.0, 3.0, 8.0, 1.0, 9.0, 2.0, 7.0, 4.0, 6.0, 0.0]);
        let policy = SelectionPolicy::Tournament { size: 3 };

        population.evaluate(&domain).unwrap();
        population.advance_generation(&policy, &mut rng).unwrap();

        assert_eq!(population.generation(), 1);
        assert_eq!(population.members().len(), 10);
        assert_eq!(population.fitness().len(), 10);
        assert!(population.fitness().iter().all(Option::is_none));
    }

    #[test]
    fn test_elites_survive_unchanged() {
        let mut rng = test_rng();
        let mut population = Population::new(test_config(), &mut rng).unwrap();
        let domain = table_domain(&[5.0, 3.0, 8.0, 1.0, 9.0, 2.0, 7.0, 4.0, 6.0, 0.0]);
        let policy = SelectionPolicy::Tournament { size: 3 };

        population.evaluate(&domain).unwrap();
        // Fitness 9.0 sits at slot 4, fitness 8.0 at slot 2.
        let expected_first = population.members()[4].clone();
        let expected_second = population.members()[2].clone();

        population.advance_generation(&policy, &mut rng).unwrap();
        assert_eq!(population.members()[0], expected_first);
        assert_eq!(population.members()[1], expected_second);
    }

    #[test]
    fn test_runs_are_reproducible() {
        let domain = table_domain(&[5.0, 3.0, 8.0, 1.0, 9.0, 2.0, 7.0, 4.0, 6.0, 0.0]);
        let policy = SelectionPolicy::Tournament { size: 3 };

        let run = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut population = Population::new(test_config(), &mut rng).unwrap();
            for _ in 0..5 {
                population.evaluate(&domain).unwrap();
                population.advance_generation(&policy, &mut rng).unwrap();
            }
            population
        };

        let a = run(9);
        let b = run(9);
        assert_eq!(a.members(), b.members());

        let c = run(10);
        assert_ne!(a.members(), c.members());
    }
}
