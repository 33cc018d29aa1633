use super::*;
use crate::Energy;
use std::collections::VecDeque;
use std::time::Instant;

/// Exact minimax matching for the p = ∞ distance.
///
/// Binary search over the distinct edge costs for the smallest threshold that
/// still admits a perfect matching on the augmented problem, with feasibility
/// decided by breadth-first augmenting paths. Real-to-real costs are tabled
/// once up front since every threshold test revisits them.
///
/// The largest threshold is always tried first, so once a deadline passes the
/// search stops with the tightest complete assignment found so far.
#[derive(Debug, Clone)]
pub struct Bottleneck<'a> {
    problem: Bipartite<'a>,
    table: Vec<Energy>,
    assignment: Vec<usize>,
    deadline: Option<Instant>,
}

impl<'a> Bottleneck<'a> {
    pub fn deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }
    fn edge(&self, b: usize, g: usize) -> Option<Energy> {
        let (n, m) = (self.problem.n(), self.problem.m());
        match (b < n, g < m) {
            (true, true) => Some(self.table[b * m + g]),
            (false, false) => Some(0.),
            _ => self.problem.cost(b, g),
        }
    }

    /// A perfect matching using only edges no costlier than `threshold`.
    fn feasible(&self, threshold: Energy) -> Option<Vec<usize>> {
        let size = self.problem.size();
        let mut owner = vec![None::<usize>; size];
        let mut holds = vec![None::<usize>; size];
        for root in 0..size {
            let mut parent = vec![None::<usize>; size];
            let mut queue = VecDeque::from([root]);
            let mut free = None;
            'search: while let Some(b) = queue.pop_front() {
                for g in 0..size {
                    if parent[g].is_some() || !self.edge(b, g).is_some_and(|c| c <= threshold) {
                        continue;
                    }
                    parent[g] = Some(b);
                    match owner[g] {
                        None => {
                            free = Some(g);
                            break 'search;
                        }
                        Some(o) => queue.push_back(o),
                    }
                }
            }
            let mut g = free?;
            loop {
                let b = parent[g].expect("reached goods have a parent");
                let previous = holds[b].replace(g);
                owner[g] = Some(b);
                match previous {
                    Some(p) => g = p,
                    None => break,
                }
            }
        }
        holds.into_iter().collect()
    }
}

impl<'a> From<Bipartite<'a>> for Bottleneck<'a> {
    fn from(problem: Bipartite<'a>) -> Self {
        let metric = problem.metric();
        let table = problem
            .lhs()
            .iter()
            .flat_map(|x| problem.rhs().iter().map(move |y| metric.distance(x, y)))
            .collect();
        Self {
            problem,
            table,
            assignment: Vec::new(),
            deadline: None,
        }
    }
}

impl Coupling for Bottleneck<'_> {
    fn minimize(mut self) -> Self {
        let size = self.problem.size();
        if size == 0 {
            return self;
        }
        let mut thresholds = self
            .table
            .iter()
            .copied()
            .chain(self.problem.lhs().iter().map(|x| self.problem.metric().vanish(x)))
            .chain(self.problem.rhs().iter().map(|y| self.problem.metric().vanish(y)))
            .collect::<Vec<_>>();
        thresholds.sort_by(|a, b| a.total_cmp(b));
        thresholds.dedup();
        let (mut lo, mut hi) = (0, thresholds.len() - 1);
        let mut best = self
            .feasible(thresholds[hi])
            .expect("every point can vanish into the diagonal");
        while lo < hi {
            if self.deadline.is_some_and(|d| Instant::now() >= d) {
                log::debug!("{:<32}{:<32}", "bottleneck deadline", thresholds[hi]);
                break;
            }
            let mid = (lo + hi) / 2;
            match self.feasible(thresholds[mid]) {
                Some(assignment) => {
                    best = assignment;
                    hi = mid;
                }
                None => lo = mid + 1,
            }
        }
        self.assignment = best;
        self
    }
    fn matchings(&self) -> Vec<Matching> {
        self.problem.matchings(&self.assignment)
    }
    fn cost(&self) -> Energy {
        self.matchings()
            .iter()
            .map(|m| m.cost)
            .fold(0., Energy::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Arbitrary;
    use crate::Point;

    #[test]
    fn minimizes_the_largest_edge() {
        let metric = GroundCost::new(Order::Bottleneck, 1.);
        let lhs = [Point::new(0., 10.), Point::new(0., 4.)];
        let rhs = [Point::new(1., 10.), Point::new(0., 6.)];
        let problem = Bipartite::from((&metric, &lhs[..], &rhs[..]));
        let solved = Bottleneck::from(problem).minimize();
        assert_eq!(solved.cost(), 2.);
        assert_eq!(solved.matchings().len(), 2);
    }

    #[test]
    fn expired_deadline_still_matches_every_point() {
        let metric = GroundCost::new(Order::Bottleneck, 0.7);
        let lhs = (0..40).map(|_| Point::random()).collect::<Vec<_>>();
        let rhs = (0..35).map(|_| Point::random()).collect::<Vec<_>>();
        let problem = Bipartite::from((&metric, &lhs[..], &rhs[..]));
        let exact = Bottleneck::from(problem).minimize();
        let rushed = Bottleneck::from(problem)
            .deadline(Some(Instant::now()))
            .minimize();
        let matchings = rushed.matchings();
        let mut sources = matchings.iter().filter_map(|m| m.source).collect::<Vec<_>>();
        let mut targets = matchings.iter().filter_map(|m| m.target).collect::<Vec<_>>();
        sources.sort();
        targets.sort();
        assert_eq!(sources, (0..40).collect::<Vec<_>>());
        assert_eq!(targets, (0..35).collect::<Vec<_>>());
        assert!(rushed.cost() >= exact.cost());
    }

    #[test]
    fn lone_point_vanishes() {
        let metric = GroundCost::new(Order::Bottleneck, 1.);
        let lhs = [Point::new(2., 8.)];
        let none: [Point; 0] = [];
        let problem = Bipartite::from((&metric, &lhs[..], &none[..]));
        let solved = Bottleneck::from(problem).minimize();
        assert_eq!(solved.cost(), 3.);
        assert_eq!(solved.matchings()[0].target, None);
    }
}
