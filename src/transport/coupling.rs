use super::matching::Matching;
use crate::Energy;

/// A transport plan between two diagrams.
///
/// Implementations are built from a [`super::Bipartite`] problem, solved by
/// [`Coupling::minimize`], and then read back as matchings in terms of the
/// original diagram indices.
pub trait Coupling {
    /// Solve the assignment problem, consuming the unsolved state.
    fn minimize(self) -> Self;
    /// Every point of both diagrams appears exactly once, diagonal matches included.
    fn matchings(&self) -> Vec<Matching>;
    /// Total cost in p-th power form, i.e. distance^p (or the max for p = ∞).
    fn cost(&self) -> Energy;
}
