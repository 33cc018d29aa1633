use super::*;
use crate::Kind;
use crate::Matching;
use serde::Deserialize;
use serde::Serialize;
use std::time::Duration;

/// Why the clustering loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// No diagram changed cluster.
    Stable,
    /// Every centroid moved less than the delta limit.
    Delta,
    /// The time limit ran out.
    Deadline,
    /// [`crate::KMEANS_ITERATIONS`] reached.
    IterationCap,
    /// K = N or K = 1 answered without iterating.
    Shortcut,
    /// No active partition left to cluster on.
    Trivial,
}

/// The result is best-effort, not converged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Warning {
    Deadline,
    IterationCap,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::Stable => write!(f, "stable"),
            Termination::Delta => write!(f, "delta"),
            Termination::Deadline => write!(f, "deadline"),
            Termination::IterationCap => write!(f, "iteration cap"),
            Termination::Shortcut => write!(f, "shortcut"),
            Termination::Trivial => write!(f, "trivial"),
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::Deadline => write!(f, "time limit reached before convergence"),
            Warning::IterationCap => write!(f, "iteration cap reached before convergence"),
        }
    }
}

/// Everything a clustering call hands back.
///
/// Matchings are per diagram and per kind. Their `source` indexes the raw
/// input diagram and their `target` indexes the points of the assigned
/// centroid of that kind; `None` stands for the diagonal.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Cluster of each diagram.
    pub labels: Vec<usize>,
    pub sizes: Vec<usize>,
    pub centroids: Vec<Centroid>,
    pub matchings: Option<Vec<[Vec<Matching>; 3]>>,
    pub matrices: Option<Matrices>,
    /// Kinds the clustering actually ran on.
    pub active: Vec<Kind>,
    pub termination: Termination,
    pub warning: Option<Warning>,
    pub iterations: usize,
    /// Diagram pairs solved exactly after the auction degenerated.
    pub fallbacks: usize,
    pub elapsed: Duration,
}

impl Report {
    pub fn n(&self) -> usize {
        self.labels.len()
    }
    pub fn k(&self) -> usize {
        self.sizes.len()
    }
    /// Diagrams assigned to `cluster`, in input order.
    pub fn members(&self, cluster: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == cluster)
            .map(|(i, _)| i)
            .collect()
    }
    pub fn converged(&self) -> bool {
        self.warning.is_none()
    }

    /// All diagrams in cluster 0 at distance 0, for runs where every
    /// selected partition is empty.
    pub fn trivial(n: usize, config: &Config, elapsed: Duration) -> Self {
        let k = config.clusters;
        let labels = vec![0; n];
        Self {
            sizes: sizes(&labels, k),
            labels,
            centroids: vec![Centroid::default(); k],
            matchings: config.matchings.then(|| vec![Default::default(); n]),
            matrices: config.matrices.then(|| Matrices::trivial(n, k)),
            active: Vec::new(),
            termination: Termination::Trivial,
            warning: None,
            iterations: 0,
            fallbacks: 0,
            elapsed,
        }
    }
}

/// Number of diagrams per cluster.
pub fn sizes(labels: &[usize], k: usize) -> Vec<usize> {
    let mut sizes = vec![0; k];
    for &label in labels {
        sizes[label] += 1;
    }
    sizes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_count_labels() {
        assert_eq!(sizes(&[0, 2, 2, 0, 2], 4), vec![2, 0, 3, 0]);
    }
}
