//! The mutation operator.
//!
//! Mutation is the only way descendants are produced, so its single job is
//! to resample genes without ever leaving the legal address space. It uses
//! the identical sampling rule as primordial seeding, which makes validity
//! structural: each slot write is independently legal the instant it lands,
//! and no multi-slot invariant spans the pass, so an interrupted mutation
//! still leaves a valid genotype.
//!
//! RNG draw order is fixed and is part of the reproducibility contract:
//! nodes in column-major order (one draw for the function, then one draw
//! per connection slot, each followed by a replacement draw when it hits),
//! then output genes in order.

use rand::Rng;

use crate::function::FunctionSet;
use crate::genotype::{sample_node_connection, sample_output_connection, Genotype};

/// Resample genes of `genotype` in place.
///
/// For every node gene, with probability `function_mutation_rate` the
/// function id is resampled uniformly among enabled functions;
/// independently, every connection slot (node and output genes alike) is
/// resampled with probability `connection_mutation_rate` over its legal
/// space: column-constrained for node connections, unconstrained for
/// output connections.
///
/// Resampling may land on the current value; that is the standard CGP
/// semantics and is deliberately not special-cased, so the effective change
/// rate is slightly below the nominal rate.
///
/// Grid shape, levels-back window, and output count never change.
pub fn mutate<R: Rng>(
    genotype: &mut Genotype,
    function_mutation_rate: f32,
    connection_mutation_rate: f32,
    rng: &mut R,
) {
    let config = genotype.config().clone();
    let functions = FunctionSet::from_config(&config);

    for (i, gene) in genotype.nodes_mut().iter_mut().enumerate() {
        let column = i / config.rows;
        if rng.random::<f32>() < function_mutation_rate {
            gene.function = functions.sample(rng);
        }
        for connection in &mut gene.connections {
            if rng.random::<f32>() < connection_mutation_rate {
                *connection = sample_node_connection(&config, column, rng);
            }
        }
    }

    for output in genotype.outputs_mut() {
        if rng.random::<f32>() < connection_mutation_rate {
            output.connection = sample_output_connection(&config, rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CgpConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;

    fn test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn seeded_genotype(rng: &mut ChaCha8Rng) -> Genotype {
        let config = Arc::new(CgpConfig {
            rows: 3,
            columns: 6,
            levels_back: 2,
            num_inputs: 2,
            num_outputs: 2,
            ..CgpConfig::default()
        });
        Genotype::primordial_seed(config, rng).unwrap()
    }

    #[test]
    fn test_zero_rates_leave_genotype_unchanged() {
        let mut rng = test_rng();
        let genotype = seeded_genotype(&mut rng);
        let mut mutated = genotype.clone();

        mutate(&mut mutated, 0.0, 0.0, &mut rng);
        assert_eq!(genotype, mutated);
    }

    #[test]
    fn test_forced_mutation_stays_valid() {
        let mut rng = test_rng();
        let mut genotype = seeded_genotype(&mut rng);

        for _ in 0..500 {
            mutate(&mut genotype, 1.0, 1.0, &mut rng);
            assert!(genotype.is_valid());
        }
    }

    #[test]
    fn test_valid_across_many_seeds() {
        for seed in 0..100 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut genotype = seeded_genotype(&mut rng);
            for _ in 0..20 {
                mutate(&mut genotype, 0.3, 0.3, &mut rng);
                assert!(genotype.is_valid(), "invalid genotype for seed {seed}");
            }
        }
    }

    #[test]
    fn test_mutation_preserves_shape() {
        let mut rng = test_rng();
        let mut genotype = seeded_genotype(&mut rng);
        let nodes = genotype.nodes().len();
        let outputs = genotype.outputs().len();

        mutate(&mut genotype, 1.0, 1.0, &mut rng);
        assert_eq!(genotype.nodes().len(), nodes);
        assert_eq!(genotype.outputs().len(), outputs);
    }

    #[test]
    fn test_mutated_functions_stay_enabled() {
        let mut rng = test_rng();
        let config = Arc::new(CgpConfig {
            fn_basic_constants: true,
            fn_transcendental_constants: false,
            fn_basic_arithmetic: true,
            fn_common_math: false,
            fn_trigonometric: false,
            fn_comparisons: false,
            fn_boolean_logic: false,
            fn_conditional: false,
            ..CgpConfig::default()
        });
        let mut genotype = Genotype::primordial_seed(config.clone(), &mut rng).unwrap();
        let functions = FunctionSet::from_config(&config);

        for _ in 0..50 {
            mutate(&mut genotype, 1.0, 1.0, &mut rng);
            for gene in genotype.nodes() {
                assert!(functions.contains(gene.function));
            }
        }
    }

    #[test]
    fn test_same_seed_same_mutation() {
        let mut seed_rng = test_rng();
        let genotype = seeded_genotype(&mut seed_rng);

        let mut a = genotype.clone();
        let mut b = genotype.clone();
        let mut rng_a = ChaCha8Rng::seed_from_u64(7);
        let mut rng_b = ChaCha8Rng::seed_from_u64(7);

        mutate(&mut a, 0.5, 0.5, &mut rng_a);
        mutate(&mut b, 0.5, 0.5, &mut rng_b);
        assert_eq!(a, b);
    }
}
