//! The CGP chromosome: a grid of function nodes plus output selectors.
//!
//! A [`Genotype`] is a `rows × columns` matrix of [`FunctionGene`] stored in
//! column-major order, followed by `num_outputs` [`OutputGene`] selectors.
//! Node connections are restricted to the levels-back window of preceding
//! columns (primary inputs are always addressable), which makes the
//! dependency graph acyclic by construction: a single column-major sweep
//! evaluates every node after all of its operands, with no reachability
//! analysis.

use std::sync::Arc;

use rand::Rng;

use crate::config::{CgpConfig, ConfigError};
use crate::function::FunctionSet;
use crate::gene::{FunctionGene, IndexType, OutputGene};

/// One candidate program: node grid, output selectors, and a binding to the
/// [`CgpConfig`] it was built under.
///
/// The config binding keeps evaluation and mutation from ever consulting a
/// mismatched grid shape; it is shared, never owned, and does not
/// participate in equality.
#[derive(Debug, Clone)]
pub struct Genotype {
    config: Arc<CgpConfig>,
    /// Column-major: node `(column, row)` lives at `column * rows + row`.
    nodes: Vec<FunctionGene>,
    outputs: Vec<OutputGene>,
}

impl Genotype {
    /// Create the primordial seed: every gene uniformly sampled from its
    /// legal address space.
    ///
    /// This is the only unconstrained-random construction in a run; all
    /// descendants are produced by mutating an existing valid genotype, so
    /// validity is preserved by construction for the whole lineage.
    ///
    /// # Errors
    ///
    /// Fails only if the config is internally inconsistent (see
    /// [`CgpConfig::validate`]).
    pub fn primordial_seed<R: Rng>(config: Arc<CgpConfig>, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;
        let functions = FunctionSet::from_config(&config);

        let mut nodes = Vec::with_capacity(config.num_nodes());
        for column in 0..config.columns {
            for _ in 0..config.rows {
                nodes.push(FunctionGene {
                    function: functions.sample(rng),
                    connections: std::array::from_fn(|_| {
                        sample_node_connection(&config, column, rng)
                    }),
                });
            }
        }

        let outputs = (0..config.num_outputs)
            .map(|_| OutputGene {
                connection: sample_output_connection(&config, rng),
            })
            .collect();

        Ok(Self {
            config,
            nodes,
            outputs,
        })
    }

    /// The config this genotype was built under.
    #[must_use]
    pub fn config(&self) -> &Arc<CgpConfig> {
        &self.config
    }

    /// Node genes in column-major order.
    #[must_use]
    pub fn nodes(&self) -> &[FunctionGene] {
        &self.nodes
    }

    /// Output genes in circuit-output order.
    #[must_use]
    pub fn outputs(&self) -> &[OutputGene] {
        &self.outputs
    }

    /// Evaluate the encoded program on the given primary inputs.
    ///
    /// Deterministic and pure: nodes are computed column-major (column 0
    /// first), each resolving its connections against the primary inputs
    /// and already-computed node values. Every node is evaluated exactly
    /// once, including nodes no output depends on: unused code is legal
    /// genetic material (neutral drift), and evaluating it unconditionally
    /// keeps the walk branch-free and reproducible.
    ///
    /// # Panics
    ///
    /// Panics if `inputs.len()` differs from the config's `num_inputs`.
    #[must_use]
    pub fn evaluate(&self, inputs: &[f32]) -> Vec<f32> {
        assert_eq!(
            inputs.len(),
            self.config.num_inputs,
            "input length mismatch: expected {}, got {}",
            self.config.num_inputs,
            inputs.len()
        );

        let mut values = vec![0.0f32; self.config.address_space()];
        values[..inputs.len()].copy_from_slice(inputs);

        // Storage order is column-major, so a linear sweep visits each node
        // after everything it may legally reference.
        let mut slot = self.config.num_inputs;
        for gene in &self.nodes {
            let a = values[gene.connections[0] as usize];
            let b = values[gene.connections[1] as usize];
            values[slot] = gene.function.apply(a, b);
            slot += 1;
        }

        self.outputs
            .iter()
            .map(|output| values[output.connection as usize])
            .collect()
    }

    /// Resample genes in place; see [`crate::mutation::mutate`].
    pub fn mutate<R: Rng>(
        &mut self,
        function_mutation_rate: f32,
        connection_mutation_rate: f32,
        rng: &mut R,
    ) {
        crate::mutation::mutate(self, function_mutation_rate, connection_mutation_rate, rng);
    }

    /// Check every connection against its legal address space.
    ///
    /// Seeding and mutation uphold this structurally; the check exists for
    /// tests and for auditing decoded genotypes.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        if self.nodes.len() != self.config.num_nodes()
            || self.outputs.len() != self.config.num_outputs
        {
            return false;
        }
        let nodes_legal = self.nodes.iter().enumerate().all(|(i, gene)| {
            let column = i / self.config.rows;
            gene.connections
                .iter()
                .all(|&c| node_connection_is_legal(&self.config, column, c))
        });
        let outputs_legal = self
            .outputs
            .iter()
            .all(|output| (output.connection as usize) < self.config.address_space());
        nodes_legal && outputs_legal
    }

    /// Assemble a genotype from already-decoded parts (codec use).
    pub(crate) fn from_parts(
        config: Arc<CgpConfig>,
        nodes: Vec<FunctionGene>,
        outputs: Vec<OutputGene>,
    ) -> Self {
        Self {
            config,
            nodes,
            outputs,
        }
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [FunctionGene] {
        &mut self.nodes
    }

    pub(crate) fn outputs_mut(&mut self) -> &mut [OutputGene] {
        &mut self.outputs
    }
}

/// Equality is structural: node and output genes only. Two genotypes built
/// under different configs but carrying identical genes compare equal.
impl PartialEq for Genotype {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.outputs == other.outputs
    }
}

impl Eq for Genotype {}

/// Sample a uniformly random legal connection for a node in `column`:
/// primary inputs plus nodes in columns `[column - levels_back, column - 1]`.
pub(crate) fn sample_node_connection<R: Rng>(
    config: &CgpConfig,
    column: usize,
    rng: &mut R,
) -> IndexType {
    let first_column = column.saturating_sub(config.levels_back);
    let window = (column - first_column) * config.rows;
    let pick = rng.random_range(0..config.num_inputs + window);
    let index = if pick < config.num_inputs {
        pick
    } else {
        config.num_inputs + first_column * config.rows + (pick - config.num_inputs)
    };
    index as IndexType
}

/// Sample a uniformly random output connection over the full address space.
pub(crate) fn sample_output_connection<R: Rng>(config: &CgpConfig, rng: &mut R) -> IndexType {
    rng.random_range(0..config.address_space()) as IndexType
}

/// Whether `index` is a legal connection for a node in `column`.
pub(crate) fn node_connection_is_legal(
    config: &CgpConfig,
    column: usize,
    index: IndexType,
) -> bool {
    let index = index as usize;
    if index < config.num_inputs {
        return true;
    }
    let node = index - config.num_inputs;
    if node >= config.num_nodes() {
        return false;
    }
    let referenced_column = node / config.rows;
    referenced_column < column && column - referenced_column <= config.levels_back
}
