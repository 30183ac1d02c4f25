//! Symbolic regression example using CGP.
//!
//! Evolves a grid-encoded program approximating `f(x) = x^2 + x + 1` from
//! input/output samples, a classic benchmark for genetic programming.
//!
//! Run with: `cargo run --example symbolic_regression`

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use symbios_cgp::{CgpConfig, Domain, Genotype, Population, SelectionPolicy};

/// Target function to recover.
fn target(x: f32) -> f32 {
    x * x + x + 1.0
}

/// Regression fitness: negated sum of squared errors over sample points.
///
/// Maximum fitness is 0.0 (perfect fit); non-finite programs score
/// `f32::MIN` so they rank below every finite candidate.
struct Regression {
    samples: Vec<f32>,
}

impl Domain for Regression {
    fn num_inputs(&self) -> usize {
        1
    }

    fn num_outputs(&self) -> usize {
        1
    }

    fn evaluate_population(&self, members: &[Genotype]) -> Vec<f32> {
        members
            .iter()
            .map(|genotype| {
                let mut error = 0.0f32;
                for &x in &self.samples {
                    let out = genotype.evaluate(&[x])[0];
                    if !out.is_finite() {
                        return f32::MIN;
                    }
                    error += (out - target(x)).powi(2);
                }
                -error
            })
            .collect()
    }
}

fn main() {
    println!("CGP Symbolic Regression Example");
    println!("===============================\n");

    let config = Arc::new(CgpConfig {
        rows: 4,
        columns: 16,
        levels_back: 8,
        num_inputs: 1,
        num_outputs: 1,
        population_size: 100,
        elite_count: 4,
        function_mutation_rate: 0.05,
        connection_mutation_rate: 0.1,
        ..CgpConfig::default()
    });

    let generations = 200;
    let seed = 42;

    let domain = Regression {
        samples: (-10..=10).map(|i| i as f32 * 0.2).collect(),
    };
    let policy = SelectionPolicy::Tournament { size: 5 };

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut population = Population::new(config, &mut rng).expect("config is valid");

    println!("Population: {}", population.members().len());
    println!("Generations: {}", generations);
    println!("Target: f(x) = x^2 + x + 1\n");

    for generation in 0..generations {
        let stats = population.evaluate(&domain).expect("domain upholds its contract");

        if generation % 20 == 0 || generation == generations - 1 {
            println!(
                "gen {:>4}  best {:>12.6}  mean {:>12.6}",
                stats.generation, stats.best_fitness, stats.mean_fitness
            );
        }

        if stats.best_fitness > -1e-6 {
            println!("\nPerfect fit found at generation {}", stats.generation);
            break;
        }

        // Keep the final generation evaluated so the champion can be read out.
        if generation + 1 < generations {
            population
                .advance_generation(&policy, &mut rng)
                .expect("population was evaluated");
        }
    }

    let (best, fitness) = population.best().expect("population is evaluated");
    println!("\nBest fitness: {fitness:.6}");
    println!("Sample predictions:");
    for x in [-1.0f32, 0.0, 0.5, 1.0, 2.0] {
        let y = best.evaluate(&[x])[0];
        println!("  f({x:>4.1}) = {y:>8.4}   (target {:>8.4})", target(x));
    }
}
