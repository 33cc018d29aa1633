use crate::Energy;

/// Per-diagram metadata for Elkan's accelerated k-means.
///
/// Holds the current assignment, an upper bound on the distance to the
/// assigned centroid, and a lower bound on the distance to every centroid.
/// If `u(x) ≤ l(x,c)` or `u(x) ≤ d(c(x),c)/2`, centroid `c` cannot be closer
/// than the current one and its distance is never computed.
///
/// # Fields
///
/// - `j`: Index of currently assigned centroid (c(x) in the paper)
/// - `lower`: Lower bounds l(x, c) for each centroid c
/// - `error`: Upper bound u(x) on distance to assigned centroid
/// - `stale`: Whether the upper bound needs refreshing after centroid drift
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    j: usize,
    lower: Vec<Energy>,
    error: Energy,
    stale: bool,
}

impl Bounds {
    /// Currently assigned centroid index.
    pub fn j(&self) -> usize {
        self.j
    }
    /// Upper bound on distance to assigned centroid.
    pub fn u(&self) -> Energy {
        self.error
    }
    pub fn stale(&self) -> bool {
        self.stale
    }
    pub fn lower(&self, j: usize) -> Energy {
        self.lower[j]
    }
    /// Checks if centroid j could be closer than current assignment.
    ///
    /// True (needs checking) when every triangle inequality filter fails:
    /// 1. j ≠ c(x): not currently assigned
    /// 2. u(x) > l(x,j): upper bound exceeds lower bound
    /// 3. u(x) > d(c(x),j)/2: upper bound exceeds half inter-centroid distance
    pub fn has_shifted(&self, pairs: &[Vec<Energy>], j: usize) -> bool {
        self.j() != j && self.u() > self.lower(j) && self.u() > 0.5 * pairs[self.j()][j]
    }
    /// True when u(x) ≤ s(c(x)) where s(c) = min_{c'≠c} d(c,c')/2.
    pub fn can_exclude(&self, midpoints: &[Energy]) -> bool {
        self.u() <= midpoints[self.j()]
    }
    /// Loosen bounds after centroids move by `movements`.
    pub fn update(&mut self, movements: &[Energy]) {
        self.lower
            .iter_mut()
            .zip(movements)
            .for_each(|(lower, movement)| *lower = (*lower - movement).max(0.));
        self.error += movements[self.j()];
        self.stale = true;
    }
    /// Replace the upper bound by the actual distance.
    pub fn refresh(&mut self, distance: Energy) {
        let j = self.j();
        self.lower[j] = distance;
        self.error = distance;
        self.stale = false;
    }
    /// Tighten the lower bound to centroid j without reassigning.
    pub fn witness(&mut self, lower: Energy, j: usize) {
        self.lower[j] = self.lower[j].max(lower);
    }
    /// Move to centroid j at a known distance.
    pub fn assign(&mut self, distance: Energy, j: usize) {
        self.j = j;
        self.lower[j] = distance;
        self.error = distance;
        self.stale = false;
    }
    /// Centroid j was replaced outright, so nothing is known about it anymore.
    pub fn forget(&mut self, j: usize) {
        self.lower[j] = 0.;
    }
}

impl From<(usize, Vec<Energy>)> for Bounds {
    /// Assignment `j` with exact distance `lower[j]` and lower bounds elsewhere.
    fn from((j, lower): (usize, Vec<Energy>)) -> Self {
        Self {
            j,
            error: lower[j],
            lower,
            stale: false,
        }
    }
}
