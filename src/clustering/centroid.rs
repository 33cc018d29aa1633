use super::*;
use crate::Kind;
use crate::Point;
use crate::Sample;
use serde::Deserialize;
use serde::Serialize;

/// Barycenter diagram of one cluster, one point set per kind.
///
/// Replaced wholesale every iteration rather than edited in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    points: [Vec<Point>; 3],
}

impl Centroid {
    pub fn points(&self, kind: Kind) -> &[Point] {
        &self.points[kind.index()]
    }
    pub fn parts(&self) -> Parts<'_> {
        Kind::ALL.map(|kind| self.points(kind))
    }
    pub fn len(&self) -> usize {
        self.points.iter().map(Vec::len).sum()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&Sample> for Centroid {
    fn from(sample: &Sample) -> Self {
        Self {
            points: Kind::ALL.map(|kind| sample.points(kind).to_vec()),
        }
    }
}

impl From<[Vec<Point>; 3]> for Centroid {
    fn from(points: [Vec<Point>; 3]) -> Self {
        Self { points }
    }
}
