//! Gene types for CGP genotypes.
//!
//! This module defines the fundamental building blocks of a Cartesian
//! genotype:
//! - [`FunctionGene`]: one cell of the node grid
//! - [`OutputGene`]: one circuit-output selector

use crate::function::{Function, MAX_ARITY};

/// Index into a genotype's addressable value space.
///
/// Index `i < num_inputs` names primary input `i`; any larger index names
/// the output of node `i - num_inputs` in column-major grid order. `u16`
/// comfortably covers practical grid sizes; [`CgpConfig`](crate::CgpConfig)
/// validation rejects address spaces that would not fit.
pub type IndexType = u16;

/// A function gene representing one cell of the node grid.
///
/// Every gene carries exactly [`MAX_ARITY`] connection slots regardless of
/// the function's actual arity. Dormant slots (beyond the arity) are still
/// sampled, mutated, and serialized; they are genetic material that becomes
/// live again when a later mutation swaps the function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionGene {
    /// The operation this node computes.
    pub function: Function,
    /// Connection indices supplying the node's operands.
    pub connections: [IndexType; MAX_ARITY],
}

/// An output gene selecting which computed value feeds one circuit output.
///
/// Output connections range over the full address space (primary inputs and
/// every node), with no levels-back restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputGene {
    /// The value this circuit output reads.
    pub connection: IndexType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_gene_construction() {
        let gene = FunctionGene {
            function: Function::Multiply,
            connections: [0, 1],
        };
        assert_eq!(gene.function, Function::Multiply);
        assert_eq!(gene.connections, [0, 1]);
    }

    #[test]
    fn test_genes_compare_structurally() {
        let a = FunctionGene {
            function: Function::Add,
            connections: [3, 7],
        };
        let b = FunctionGene {
            function: Function::Add,
            connections: [3, 7],
        };
        assert_eq!(a, b);

        let c = FunctionGene {
            function: Function::Add,
            connections: [3, 8],
        };
        assert_ne!(a, c);

        assert_eq!(OutputGene { connection: 5 }, OutputGene { connection: 5 });
        assert_ne!(OutputGene { connection: 5 }, OutputGene { connection: 6 });
    }
}
