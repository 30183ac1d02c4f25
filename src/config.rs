//! Run configuration for CGP evolution.
//!
//! A [`CgpConfig`] is constructed once per run, validated eagerly, and
//! shared read-only (via `Arc`) by every genotype and by the mutation and
//! selection logic. Invalid values are rejected outright, never clamped.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gene::IndexType;

/// Error raised by [`CgpConfig::validate`] for internally inconsistent
/// configurations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The node grid has no cells.
    #[error("grid dimensions must be positive (rows={rows}, columns={columns})")]
    EmptyGrid {
        /// Configured row count.
        rows: usize,
        /// Configured column count.
        columns: usize,
    },
    /// `levels_back` lies outside `1..=columns`.
    #[error("levels_back must be in 1..=columns (levels_back={levels_back}, columns={columns})")]
    LevelsBackOutOfRange {
        /// Configured levels-back window.
        levels_back: usize,
        /// Configured column count.
        columns: usize,
    },
    /// The genotype would have no primary inputs.
    #[error("num_inputs must be at least 1")]
    NoInputs,
    /// The genotype would have no circuit outputs.
    #[error("num_outputs must be at least 1")]
    NoOutputs,
    /// Every function family is disabled.
    #[error("at least one function family must be enabled")]
    NoFunctionsEnabled,
    /// The population would be empty.
    #[error("population_size must be at least 1")]
    EmptyPopulation,
    /// More elites than population slots.
    #[error("elite_count {elite_count} exceeds population_size {population_size}")]
    EliteCountOutOfRange {
        /// Configured elite count.
        elite_count: usize,
        /// Configured population size.
        population_size: usize,
    },
    /// A mutation rate lies outside `[0, 1]`.
    #[error("{rate} of {value} is outside [0, 1]")]
    RateOutOfRange {
        /// Which rate field is out of range.
        rate: &'static str,
        /// The offending value.
        value: f32,
    },
    /// The combined input + node address space does not fit `IndexType`.
    #[error("address space of {size} values exceeds the {max} representable connection indices")]
    AddressSpaceOverflow {
        /// Required address-space size.
        size: usize,
        /// Largest representable size.
        max: usize,
    },
}

/// Immutable per-run configuration.
///
/// Field semantics follow the classic CGP formulation: the chromosome is a
/// `rows × columns` grid whose nodes may connect to primary inputs or to
/// nodes at most `levels_back` columns to their left.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CgpConfig {
    /// Grid rows (>= 1).
    pub rows: usize,
    /// Grid columns (>= 1).
    pub columns: usize,
    /// How many preceding columns a node may connect to (`1..=columns`).
    pub levels_back: usize,
    /// Number of primary inputs (>= 1).
    pub num_inputs: usize,
    /// Number of circuit outputs (>= 1).
    pub num_outputs: usize,

    /// Enable the basic constants family (0, 1, 2).
    pub fn_basic_constants: bool,
    /// Enable the transcendental constants family (π, e).
    pub fn_transcendental_constants: bool,
    /// Enable the basic arithmetic family.
    pub fn_basic_arithmetic: bool,
    /// Enable the common math family.
    pub fn_common_math: bool,
    /// Enable the trigonometric family.
    pub fn_trigonometric: bool,
    /// Enable the comparisons family.
    pub fn_comparisons: bool,
    /// Enable the boolean logic family.
    pub fn_boolean_logic: bool,
    /// Enable the conditional family.
    pub fn_conditional: bool,

    /// Genotypes per generation (>= 1).
    pub population_size: usize,
    /// Top-ranked genotypes copied unchanged into the next generation
    /// (`0..=population_size`).
    pub elite_count: usize,
    /// Per-gene probability of resampling a node's function (`[0, 1]`).
    pub function_mutation_rate: f32,
    /// Per-slot probability of resampling a connection (`[0, 1]`).
    pub connection_mutation_rate: f32,
}

impl Default for CgpConfig {
    fn default() -> Self {
        Self {
            rows: 4,
            columns: 12,
            levels_back: 6,
            num_inputs: 2,
            num_outputs: 1,
            fn_basic_constants: true,
            fn_transcendental_constants: false,
            fn_basic_arithmetic: true,
            fn_common_math: true,
            fn_trigonometric: false,
            fn_comparisons: false,
            fn_boolean_logic: false,
            fn_conditional: false,
            population_size: 100,
            elite_count: 2,
            function_mutation_rate: 0.05,
            connection_mutation_rate: 0.1,
        }
    }
}

impl CgpConfig {
    /// Create a config with the default grid and the given circuit shape.
    #[must_use]
    pub fn basic(num_inputs: usize, num_outputs: usize) -> Self {
        Self {
            num_inputs,
            num_outputs,
            ..Self::default()
        }
    }

    /// Check the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] encountered; values are never
    /// silently adjusted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.levels_back == 0 || self.levels_back > self.columns {
            return Err(ConfigError::LevelsBackOutOfRange {
                levels_back: self.levels_back,
                columns: self.columns,
            });
        }
        if self.num_inputs == 0 {
            return Err(ConfigError::NoInputs);
        }
        if self.num_outputs == 0 {
            return Err(ConfigError::NoOutputs);
        }
        if !self.any_family_enabled() {
            return Err(ConfigError::NoFunctionsEnabled);
        }
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.elite_count > self.population_size {
            return Err(ConfigError::EliteCountOutOfRange {
                elite_count: self.elite_count,
                population_size: self.population_size,
            });
        }
        for (rate, value) in [
            ("function_mutation_rate", self.function_mutation_rate),
            ("connection_mutation_rate", self.connection_mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RateOutOfRange { rate, value });
            }
        }
        let max = IndexType::MAX as usize + 1;
        if self.address_space() > max {
            return Err(ConfigError::AddressSpaceOverflow {
                size: self.address_space(),
                max,
            });
        }
        Ok(())
    }

    /// Total number of grid nodes.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.rows * self.columns
    }

    /// Size of the addressable value space: primary inputs plus every node.
    #[must_use]
    pub fn address_space(&self) -> usize {
        self.num_inputs + self.num_nodes()
    }

    fn any_family_enabled(&self) -> bool {
        self.fn_basic_constants
            || self.fn_transcendental_constants
            || self.fn_basic_arithmetic
            || self.fn_common_math
            || self.fn_trigonometric
            || self.fn_comparisons
            || self.fn_boolean_logic
            || self.fn_conditional
    }
}
