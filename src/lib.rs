//! # Symbios CGP
//!
//! A deterministic Cartesian Genetic Programming engine: grid-encoded
//! programs evolved against a pluggable fitness domain.
//!
//! ## Features
//!
//! - **Validity by Construction**: connections are sampled from their legal
//!   levels-back window at every seeding and mutation site, so no genotype
//!   in a lineage can ever hold a dangling or cyclic reference
//! - **Acyclic by Layout**: the column-major grid admits single-sweep
//!   evaluation with no reachability analysis or topological sort
//! - **Deterministic Runs**: every stochastic operation takes an explicit
//!   `Rng`, and the generation loop consumes it in a documented order, so
//!   identical seeds reproduce identical runs bit for bit
//! - **Serializable Genotypes**: an explicit JSON codec with per-record
//!   decode errors for checkpointing and test fixtures
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use symbios_cgp::{CgpConfig, Genotype};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! // Seed a random program with 2 inputs and 1 output
//! let config = Arc::new(CgpConfig::basic(2, 1));
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let mut genotype = Genotype::primordial_seed(config, &mut rng).unwrap();
//!
//! // Evaluate and mutate
//! let outputs = genotype.evaluate(&[0.5, -0.5]);
//! genotype.mutate(0.05, 0.1, &mut rng);
//! assert_eq!(outputs.len(), 1);
//! ```
//!
//! ## Running Evolution
//!
//! ```rust
//! use std::sync::Arc;
//! use symbios_cgp::{CgpConfig, Domain, Genotype, Population, SelectionPolicy};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! // A domain scores genotypes; here, closeness of output to 1.0.
//! struct UnitTarget;
//! impl Domain for UnitTarget {
//!     fn num_inputs(&self) -> usize { 2 }
//!     fn num_outputs(&self) -> usize { 1 }
//!     fn evaluate_population(&self, members: &[Genotype]) -> Vec<f32> {
//!         members
//!             .iter()
//!             .map(|g| {
//!                 let out = g.evaluate(&[0.5, 2.0])[0];
//!                 if out.is_finite() { -(out - 1.0).abs() } else { f32::MIN }
//!             })
//!             .collect()
//!     }
//! }
//!
//! let config = Arc::new(CgpConfig {
//!     population_size: 20,
//!     elite_count: 2,
//!     ..CgpConfig::basic(2, 1)
//! });
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let mut population = Population::new(config, &mut rng).unwrap();
//! let policy = SelectionPolicy::Tournament { size: 3 };
//!
//! for _ in 0..10 {
//!     population.evaluate(&UnitTarget).unwrap();
//!     population.advance_generation(&policy, &mut rng).unwrap();
//! }
//! ```
//!
//! ## Architecture
//!
//! ### The Levels-Back Invariant
//!
//! A node in column `c` may only read primary inputs or nodes in columns
//! `[c - levels_back, c - 1]`. Seeding and mutation share one sampling
//! rule that draws exclusively from that window, which is the whole
//! validity story: there is no repair step or post-mutation check, and a
//! cycle cannot even be expressed.
//!
//! ### Neutral Drift
//!
//! Nodes that no output (transitively) reads are legal and expected; they
//! are the substrate CGP mutates through flat fitness landscapes. The
//! evaluator computes every node exactly once, referenced or not, keeping
//! evaluation branch-free and reproducible.
//!
//! ### One RNG, Explicit Everywhere
//!
//! No operation owns a random engine. Seeding, mutation, and selection all
//! take `&mut R`, and the generation loop documents its draw order
//! (selection before mutation, slot by slot), making whole runs
//! reproducible from a single seed.

pub mod codec;
pub mod config;
pub mod domain;
pub mod function;
pub mod gene;
pub mod genotype;
pub mod mutation;
pub mod population;
pub mod selection;

// Re-exports for convenience
pub use codec::{
    decode_function_gene, decode_genotype, decode_output_gene, encode_function_gene,
    encode_genotype, encode_output_gene, DecodeError,
};
pub use config::{CgpConfig, ConfigError};
pub use domain::Domain;
#[cfg(feature = "parallel")]
pub use domain::evaluate_in_parallel;
pub use function::{Function, FunctionSet, MAX_ARITY};
pub use gene::{FunctionGene, IndexType, OutputGene};
pub use genotype::Genotype;
pub use population::{EvolutionError, GenerationStats, Population};
pub use selection::{Ranking, SelectionPolicy};
