//! The external fitness collaborator boundary.
//!
//! A [`Domain`] supplies the fitness signal, whether from a board game, a
//! physics simulation, or a regression target. The engine
//! never looks inside it; it issues one evaluation request per generation
//! and expects one score per member, in member order.

use crate::genotype::Genotype;

/// Fitness provider consumed by [`Population`](crate::Population).
///
/// Implementations may evaluate members concurrently, call
/// [`Genotype::evaluate`] any number of times per member (once per episode
/// or opponent, say) and aggregate however they like, as long as the
/// returned scores line up with the member slots they were computed for.
pub trait Domain: Send + Sync {
    /// Number of primary inputs fed to each genotype. Must match the
    /// population's config.
    fn num_inputs(&self) -> usize;

    /// Number of outputs read from each genotype. Must match the
    /// population's config.
    fn num_outputs(&self) -> usize;

    /// Score every member; one fitness per member, same order. Higher is
    /// better; no bound is required.
    fn evaluate_population(&self, members: &[Genotype]) -> Vec<f32>;
}

/// Score members concurrently while preserving slot order.
///
/// Convenience for [`Domain`] implementors whose per-member scoring is
/// independent: genotype evaluation is a pure function, so members can be
/// fanned out across worker threads freely. Results come back indexed by
/// original slot regardless of completion order.
#[cfg(feature = "parallel")]
pub fn evaluate_in_parallel<F>(members: &[Genotype], score: F) -> Vec<f32>
where
    F: Fn(&Genotype) -> f32 + Sync + Send,
{
    use rayon::prelude::*;
    members.par_iter().map(score).collect()
}
