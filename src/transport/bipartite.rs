use super::*;
use crate::Energy;
use crate::Point;

/// The augmented assignment problem between two diagrams.
///
/// With `n` points on the left and `m` on the right, there are `n + m`
/// bidders and `n + m` goods:
///
/// - bidder `b < n` is the real point `lhs[b]`; bidder `n + j` is the diagonal
///   copy of `rhs[j]`
/// - good `g < m` is the real point `rhs[g]`; good `m + i` is the diagonal
///   copy of `lhs[i]`
///
/// A real point may move onto a real point of the other side or onto its own
/// diagonal copy. Diagonal copies may pair with each other for free. Every
/// other edge is forbidden, which keeps the optimum equal to the diagram
/// distance while letting solvers treat the problem as a square assignment.
#[derive(Debug, Clone, Copy)]
pub struct Bipartite<'a> {
    metric: &'a GroundCost,
    lhs: &'a [Point],
    rhs: &'a [Point],
}

impl<'a> Bipartite<'a> {
    pub fn lhs(&self) -> &'a [Point] {
        self.lhs
    }
    pub fn rhs(&self) -> &'a [Point] {
        self.rhs
    }
    pub fn metric(&self) -> &'a GroundCost {
        self.metric
    }
    /// Number of real bidders.
    pub fn n(&self) -> usize {
        self.lhs.len()
    }
    /// Number of real goods.
    pub fn m(&self) -> usize {
        self.rhs.len()
    }
    /// Bidders (and goods) in the augmented problem.
    pub fn size(&self) -> usize {
        self.n() + self.m()
    }

    /// Edge cost, `None` when the edge is forbidden.
    pub fn cost(&self, b: usize, g: usize) -> Option<Energy> {
        let (n, m) = (self.n(), self.m());
        match (b < n, g < m) {
            (true, true) => Some(self.metric.distance(&self.lhs[b], &self.rhs[g])),
            (true, false) if g - m == b => Some(self.metric.vanish(&self.lhs[b])),
            (false, true) if b - n == g => Some(self.metric.vanish(&self.rhs[g])),
            (false, false) => Some(0.),
            _ => None,
        }
    }

    /// Upper bound on every allowed edge cost.
    ///
    /// The distance between opposite corners of the joint bounding box bounds
    /// every real edge; the largest diagonal cost bounds the rest.
    pub fn ceiling(&self) -> Energy {
        let mut lo = [Energy::INFINITY; 5];
        let mut hi = [Energy::NEG_INFINITY; 5];
        for axes in self.lhs.iter().chain(self.rhs).map(Point::axes) {
            for d in 0..5 {
                lo[d] = lo[d].min(axes[d]);
                hi[d] = hi[d].max(axes[d]);
            }
        }
        let span = if self.n() > 0 && self.m() > 0 {
            self.metric
                .gaps(&std::array::from_fn(|d| (hi[d] - lo[d]).max(0.)))
        } else {
            0.
        };
        self.lhs
            .iter()
            .chain(self.rhs)
            .map(|p| self.metric.vanish(p))
            .fold(span, Energy::max)
    }

    /// Translate a complete assignment (`assignment[b]` = good of bidder `b`)
    /// into matchings over the original diagrams. Diagonal-to-diagonal pairs
    /// carry no information and are left out.
    pub fn matchings(&self, assignment: &[usize]) -> Vec<Matching> {
        let (n, m) = (self.n(), self.m());
        assignment
            .iter()
            .enumerate()
            .filter(|&(b, &g)| b < n || g < m)
            .map(|(b, &g)| {
                let cost = self.cost(b, g).expect("assignment uses allowed edges");
                let source = (b < n).then_some(b);
                let target = (g < m).then_some(g);
                Matching::from((source, target, cost))
            })
            .collect()
    }

    /// Accumulated p-th power cost of a set of matchings.
    pub fn total(&self, matchings: &[Matching]) -> Energy {
        let order = self.metric.order();
        matchings
            .iter()
            .map(|m| m.cost)
            .fold(0., |a, b| order.combine(a, b))
    }
}

impl<'a> From<(&'a GroundCost, &'a [Point], &'a [Point])> for Bipartite<'a> {
    fn from((metric, lhs, rhs): (&'a GroundCost, &'a [Point], &'a [Point])) -> Self {
        Self { metric, lhs, rhs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_edges_cross_diagonal_copies() {
        let metric = GroundCost::new(Order::W2, 1.);
        let lhs = [Point::new(0., 2.), Point::new(0., 4.)];
        let rhs = [Point::new(1., 3.)];
        let problem = Bipartite::from((&metric, &lhs[..], &rhs[..]));
        assert_eq!(problem.size(), 3);
        assert!(problem.cost(0, 1).is_some());
        assert!(problem.cost(0, 2).is_none());
        assert!(problem.cost(1, 2).is_some());
        assert!(problem.cost(2, 0).is_some());
        assert_eq!(problem.cost(2, 1), Some(0.));
    }

    #[test]
    fn ceiling_bounds_every_edge() {
        let metric = GroundCost::new(Order::W1, 0.5);
        let lhs = [Point::new(0., 2.), Point::new(-1., 4.)];
        let rhs = [Point::new(1., 3.), Point::new(5., 9.)];
        let problem = Bipartite::from((&metric, &lhs[..], &rhs[..]));
        let ceiling = problem.ceiling();
        for b in 0..problem.size() {
            for g in 0..problem.size() {
                if let Some(c) = problem.cost(b, g) {
                    assert!(c <= ceiling);
                }
            }
        }
    }
}
