use super::*;
use crate::Energy;
use crate::Sample;
use rayon::prelude::*;
use serde::Serialize;

/// Triangular storage for pairwise distances between diagrams.
///
/// Stores the lower triangle of the symmetric matrix (excluding the zero
/// diagonal) as a flat array. Entries stay `None` when they were never
/// computed, as happens across clusters with per-cluster matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct Distances {
    n: usize,
    values: Vec<Option<Energy>>,
}

impl Distances {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            values: vec![None; n * n.saturating_sub(1) / 2],
        }
    }
    pub fn n(&self) -> usize {
        self.n
    }
    fn triangular(i: usize, j: usize) -> usize {
        let (hi, lo) = if i > j { (i, j) } else { (j, i) };
        hi * (hi - 1) / 2 + lo
    }
    pub fn get(&self, i: usize, j: usize) -> Option<Energy> {
        if i == j {
            Some(0.)
        } else {
            self.values[Self::triangular(i, j)]
        }
    }
    pub fn set(&mut self, i: usize, j: usize, value: Energy) {
        debug_assert!(i != j);
        self.values[Self::triangular(i, j)] = Some(value);
    }
    /// Full square matrix.
    pub fn dense(&self) -> Vec<Vec<Option<Energy>>> {
        (0..self.n)
            .map(|i| (0..self.n).map(|j| self.get(i, j)).collect())
            .collect()
    }
}

impl Serialize for Distances {
    /// Written out as the full square matrix, `null` where never computed.
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.dense().serialize(serializer)
    }
}

/// Distance matrices assembled after clustering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matrices {
    /// Diagram to diagram.
    pub diagrams: Distances,
    /// Diagram to every centroid, N rows of K.
    pub centroids: Vec<Vec<Energy>>,
    /// Diagram to its own centroid.
    pub distance_to_centroid: Vec<Energy>,
}

impl Matrices {
    /// Fill diagram-to-diagram entries through `refinement` (all pairs, or
    /// only pairs sharing a cluster) and diagram-to-centroid entries exactly.
    pub fn assemble(
        refinement: &Refinement,
        space: &Space,
        samples: &[Sample],
        centroids: &[Centroid],
        labels: &[usize],
        per_cluster: bool,
    ) -> Self {
        let n = samples.len();
        log::info!("{:<32}{:<32}", "assembling matrices", n);
        let entries = (0..n)
            .flat_map(|i| (0..i).map(move |j| (i, j)))
            .filter(|&(i, j)| !per_cluster || labels[i] == labels[j])
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(i, j)| (i, j, refinement.entry(&samples[i], &samples[j])))
            .collect::<Vec<_>>();
        let mut diagrams = Distances::new(n);
        for (i, j, d) in entries {
            diagrams.set(i, j, d);
        }
        let centroids = samples
            .par_iter()
            .map(|sample| {
                centroids
                    .iter()
                    .map(|c| space.distance(sample.parts(), c.parts()))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        let distance_to_centroid = centroids
            .iter()
            .zip(labels)
            .map(|(row, &label)| row[label])
            .collect();
        Self {
            diagrams,
            centroids,
            distance_to_centroid,
        }
    }

    /// Every distance zero, for runs without any active kind.
    pub fn trivial(n: usize, k: usize) -> Self {
        let mut diagrams = Distances::new(n);
        diagrams.values.iter_mut().for_each(|v| *v = Some(0.));
        Self {
            diagrams,
            centroids: vec![vec![0.; k]; n],
            distance_to_centroid: vec![0.; n],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangular_storage_is_symmetric() {
        let mut distances = Distances::new(4);
        distances.set(3, 1, 2.5);
        distances.set(0, 2, 1.5);
        assert_eq!(distances.get(1, 3), Some(2.5));
        assert_eq!(distances.get(2, 0), Some(1.5));
        assert_eq!(distances.get(2, 2), Some(0.));
        assert_eq!(distances.get(0, 1), None);
        assert_eq!(distances.dense()[3][1], Some(2.5));
    }

    #[test]
    fn single_diagram_has_no_pairs() {
        let distances = Distances::new(1);
        assert_eq!(distances.dense(), vec![vec![Some(0.)]]);
    }

    #[test]
    fn serializes_as_square_matrix() {
        let mut distances = Distances::new(3);
        distances.set(1, 0, 1.5);
        let json = serde_json::to_string(&distances).unwrap();
        assert_eq!(json, "[[0.0,1.5,null],[1.5,0.0,null],[null,null,0.0]]");
    }
}
