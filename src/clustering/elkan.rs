use super::*;
use crate::Energy;
use rayon::prelude::*;

/// Triangle-inequality accelerated k-means assignment.
///
/// Implements the assignment half of Elkan (2003) over diagram space. Upper and
/// lower bounds on diagram-centroid distances let most matchings be skipped
/// while producing the same nearest centroids as the naive scan.
///
/// # Implementation
///
/// - `init_bounds()`: exact nearest centroid for every diagram
/// - `step_elkan()`: reassignment with bound maintenance
/// - `step_naive()`: reference reassignment, every centroid every time
///
/// Distances come from [`Elkan::nearest`], which may itself prune candidates
/// progressively, and from [`Elkan::distance`] when an upper bound goes stale.
pub trait Elkan: Sync {
    /// Number of diagrams.
    fn n(&self) -> usize;
    /// Number of centroids.
    fn k(&self) -> usize;
    /// Exact distance from diagram `i` to centroid `j`.
    fn distance(&self, i: usize, j: usize) -> Energy;
    /// Exact distance between centroids `a` and `b`.
    fn separation(&self, a: usize, b: usize) -> Energy;
    /// Nearest centroid to diagram `i` among `candidates` and `incumbent`.
    fn nearest(&self, i: usize, candidates: &[usize], incumbent: Option<(usize, Energy)>) -> Nearest;

    /// Full bounds for diagram `i` from a search over every centroid.
    fn neighbor(&self, i: usize) -> Bounds {
        let all = (0..self.k()).collect::<Vec<_>>();
        let nearest = self.nearest(i, &all, None);
        let mut lower = vec![0.; self.k()];
        lower[nearest.j] = nearest.distance;
        for (j, bound) in nearest.lower {
            lower[j] = bound;
        }
        Bounds::from((nearest.j, lower))
    }
    /// Initializes bounds by searching every centroid for every diagram.
    fn init_bounds(&self) -> Vec<Bounds> {
        (0..self.n())
            .into_par_iter()
            .map(|i| self.neighbor(i))
            .collect()
    }

    /// Computes pairwise distances between all centroids.
    fn pairwises(&self) -> Vec<Vec<Energy>> {
        let k = self.k();
        let upper = (0..k)
            .flat_map(|a| (a + 1..k).map(move |b| (a, b)))
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(a, b)| (a, b, self.separation(a, b)))
            .collect::<Vec<_>>();
        let mut pairs = vec![vec![0.; k]; k];
        for (a, b, d) in upper {
            pairs[a][b] = d;
            pairs[b][a] = d;
        }
        pairs
    }

    /// Computes s(c) = (1/2) min_{c'≠c} d(c, c') for each centroid.
    fn midpoints(&self, pairs: &[Vec<Energy>]) -> Vec<Energy> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, d)| d * 0.5)
                    .fold(Energy::MAX, Energy::min)
            })
            .collect()
    }

    /// Refreshes stale upper bound before triangle inequality checks.
    fn refresh(&self, i: usize, b: &mut Bounds) {
        if b.stale() {
            b.refresh(self.distance(i, b.j()));
        }
    }
    /// Searches the centroids that survive the bound filters, possibly reassigning.
    fn rebound(&self, i: usize, b: &mut Bounds, pairs: &[Vec<Energy>]) {
        let candidates = (0..self.k())
            .filter(|&j| b.has_shifted(pairs, j))
            .collect::<Vec<_>>();
        if candidates.is_empty() {
            return;
        }
        let nearest = self.nearest(i, &candidates, Some((b.j(), b.u())));
        for (j, lower) in nearest.lower {
            b.witness(lower, j);
        }
        b.assign(nearest.distance, nearest.j);
    }

    /// Executes one Elkan reassignment against the current centroids.
    ///
    /// Bounds must already account for centroid drift via [`Bounds::update`].
    fn step_elkan(&self, bounds: &mut [Bounds]) {
        let pairs = self.pairwises();
        let midpoints = self.midpoints(&pairs);
        bounds
            .par_iter_mut()
            .enumerate()
            .filter(|(_, b)| !b.can_exclude(&midpoints))
            .for_each(|(i, b)| {
                self.refresh(i, b);
                self.rebound(i, b, &pairs);
            });
    }

    /// Executes one naive reassignment (for verification/benchmarking).
    fn step_naive(&self, bounds: &mut [Bounds]) {
        bounds
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, b)| *b = self.neighbor(i));
    }

    /// Computes root-mean-square distance to assigned centroids.
    fn rms(&self, bounds: &[Bounds]) -> Energy {
        let n = bounds.len().max(1) as Energy;
        (bounds
            .par_iter()
            .enumerate()
            .map(|(i, b)| self.distance(i, b.j()))
            .map(|d| d * d)
            .sum::<Energy>()
            / n)
            .sqrt()
    }
}
