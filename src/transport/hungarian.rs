use super::*;
use crate::Energy;

/// Exact O(s³) assignment with row and column potentials.
///
/// Used for diagram pairs on which the auction degenerates. Forbidden edges of
/// the augmented problem get a cost larger than any complete allowed
/// assignment, so the optimum never uses them.
#[derive(Debug, Clone)]
pub struct Hungarian<'a> {
    problem: Bipartite<'a>,
    assignment: Vec<usize>,
}

impl<'a> From<Bipartite<'a>> for Hungarian<'a> {
    fn from(problem: Bipartite<'a>) -> Self {
        Self {
            problem,
            assignment: Vec::new(),
        }
    }
}

impl Coupling for Hungarian<'_> {
    fn minimize(mut self) -> Self {
        let problem = self.problem;
        let size = problem.size();
        let forbidden = problem.ceiling() * (size as Energy + 1.) + 1.;
        let cost = |b: usize, g: usize| problem.cost(b, g).unwrap_or(forbidden);
        // 1-indexed, column 0 is the virtual start of each augmenting path
        let mut u = vec![0.; size + 1];
        let mut v = vec![0.; size + 1];
        let mut owner = vec![0usize; size + 1];
        let mut way = vec![0usize; size + 1];
        for row in 1..=size {
            owner[0] = row;
            let mut j0 = 0;
            let mut slack = vec![Energy::INFINITY; size + 1];
            let mut used = vec![false; size + 1];
            loop {
                used[j0] = true;
                let i0 = owner[j0];
                let mut delta = Energy::INFINITY;
                let mut j1 = 0;
                for j in 1..=size {
                    if used[j] {
                        continue;
                    }
                    let reduced = cost(i0 - 1, j - 1) - u[i0] - v[j];
                    if reduced < slack[j] {
                        slack[j] = reduced;
                        way[j] = j0;
                    }
                    if slack[j] < delta {
                        delta = slack[j];
                        j1 = j;
                    }
                }
                for j in 0..=size {
                    if used[j] {
                        u[owner[j]] += delta;
                        v[j] -= delta;
                    } else {
                        slack[j] -= delta;
                    }
                }
                j0 = j1;
                if owner[j0] == 0 {
                    break;
                }
            }
            loop {
                let j1 = way[j0];
                owner[j0] = owner[j1];
                j0 = j1;
                if j0 == 0 {
                    break;
                }
            }
        }
        self.assignment = vec![0; size];
        for j in 1..=size {
            self.assignment[owner[j] - 1] = j - 1;
        }
        self
    }
    fn matchings(&self) -> Vec<Matching> {
        self.problem.matchings(&self.assignment)
    }
    fn cost(&self) -> Energy {
        self.problem.total(&self.matchings())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    #[test]
    fn picks_the_cheaper_crossing() {
        let metric = GroundCost::new(Order::W2, 1.);
        let lhs = [Point::new(0., 10.), Point::new(5., 20.)];
        let rhs = [Point::new(5., 19.), Point::new(0., 11.)];
        let problem = Bipartite::from((&metric, &lhs[..], &rhs[..]));
        let exact = Hungarian::from(problem).minimize();
        let mut pairs = exact
            .matchings()
            .iter()
            .map(|m| (m.source, m.target))
            .collect::<Vec<_>>();
        pairs.sort();
        assert_eq!(pairs, vec![(Some(0), Some(1)), (Some(1), Some(0))]);
        assert_eq!(exact.cost(), 2.);
    }

    #[test]
    fn empty_problem_is_free() {
        let metric = GroundCost::new(Order::W1, 1.);
        let none: [Point; 0] = [];
        let problem = Bipartite::from((&metric, &none[..], &none[..]));
        let exact = Hungarian::from(problem).minimize();
        assert!(exact.matchings().is_empty());
        assert_eq!(exact.cost(), 0.);
    }
}
