use super::*;
use crate::Energy;
use crate::Point;
use std::time::Instant;

/// Matching between two diagrams of the same kind.
#[derive(Debug, Clone, Default)]
pub struct Transport {
    pub matchings: Vec<Matching>,
    /// distance^p, or the largest matched cost for p = ∞
    pub cost: Energy,
    /// Solved exactly after the auction degenerated.
    pub fallback: bool,
}

/// Diagram matcher.
///
/// Picks the algorithm for the configured order: the auction (falling back to
/// [`Hungarian`] on degeneracy) for finite p, [`Bottleneck`] for p = ∞.
/// Identical diagrams, and diagrams facing an empty one, are answered
/// without solving anything.
#[derive(Debug, Clone, Copy)]
pub struct Wasserstein<'a> {
    metric: &'a GroundCost,
    indexed: bool,
    deadline: Option<Instant>,
}

impl<'a> Wasserstein<'a> {
    pub fn new(metric: &'a GroundCost) -> Self {
        Self {
            metric,
            indexed: true,
            deadline: None,
        }
    }
    pub fn indexed(mut self, on: bool) -> Self {
        self.indexed = on;
        self
    }
    pub fn deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }
    pub fn metric(&self) -> &'a GroundCost {
        self.metric
    }
    pub fn order(&self) -> Order {
        self.metric.order()
    }

    /// Optimal matching of `lhs` (bidders) against `rhs` (goods).
    pub fn transport(&self, lhs: &[Point], rhs: &[Point]) -> Transport {
        let problem = Bipartite::from((self.metric, lhs, rhs));
        if lhs == rhs {
            return Transport {
                matchings: (0..lhs.len())
                    .map(|i| Matching::from((Some(i), Some(i), 0.)))
                    .collect(),
                cost: 0.,
                fallback: false,
            };
        }
        if lhs.is_empty() || rhs.is_empty() {
            let (n, m) = (problem.n(), problem.m());
            let assignment = (0..n + m)
                .map(|b| if b < n { m + b } else { b - n })
                .collect::<Vec<_>>();
            let matchings = problem.matchings(&assignment);
            let cost = problem.total(&matchings);
            return Transport {
                matchings,
                cost,
                fallback: false,
            };
        }
        if !self.order().is_finite() {
            let bottleneck = Bottleneck::from(problem).deadline(self.deadline).minimize();
            return Self::settle(problem, bottleneck, false);
        }
        let auction = Auction::from(problem)
            .indexed(self.indexed)
            .deadline(self.deadline)
            .minimize();
        if auction.degenerate() {
            let shape = format!("{}x{}", problem.n(), problem.m());
            log::debug!("{:<32}{:<32}", "exact fallback", shape);
            Self::settle(problem, Hungarian::from(problem).minimize(), true)
        } else {
            Self::settle(problem, auction, false)
        }
    }

    /// distance^p between two diagrams.
    pub fn cost(&self, lhs: &[Point], rhs: &[Point]) -> Energy {
        self.transport(lhs, rhs).cost
    }

    /// Distance between two diagrams.
    pub fn distance(&self, lhs: &[Point], rhs: &[Point]) -> Energy {
        self.order().root(self.cost(lhs, rhs))
    }

    fn settle(problem: Bipartite<'_>, coupling: impl Coupling, fallback: bool) -> Transport {
        let matchings = coupling.matchings();
        let cost = problem.total(&matchings);
        Transport {
            matchings,
            cost,
            fallback,
        }
    }
}
