use super::support::Support;
use crate::Energy;

/// Ground cost of a diagram transport problem.
///
/// Besides the cost of moving one point onto another, diagrams need the cost
/// of letting a point vanish into the diagonal. Both are reported already
/// raised to the order of the distance, so matching costs simply accumulate.
pub trait Measure {
    /// The space points live in.
    type X: Support;
    /// Cost of transporting `x` onto `y`.
    fn distance(&self, x: &Self::X, y: &Self::X) -> Energy;
    /// Cost of transporting `x` onto its diagonal projection.
    fn vanish(&self, x: &Self::X) -> Energy;
}
