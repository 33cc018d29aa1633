use super::*;
use crate::Arbitrary;
use crate::Energy;
use crate::Persistence;
use serde::Deserialize;
use serde::Serialize;

/// A persistence pair embedded in matching space.
///
/// `birth` and `death` are the scalar values of the pair. `coords` locates the
/// pair in the domain as `λ·birth_coords + (1-λ)·death_coords`, so the
/// geometric part of the ground cost compares where features live.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub birth: Persistence,
    pub death: Persistence,
    pub coords: [Persistence; 3],
}

impl Point {
    pub fn new(birth: Persistence, death: Persistence) -> Self {
        Self {
            birth,
            death,
            coords: [0.; 3],
        }
    }
    pub fn persistence(&self) -> Persistence {
        (self.death - self.birth).abs()
    }
    /// Nearest point on the diagonal. Keeps the domain position.
    pub fn projection(&self) -> Self {
        let mid = (self.birth + self.death) / 2.;
        Self {
            birth: mid,
            death: mid,
            coords: self.coords,
        }
    }
    /// Coordinates as one 5-vector: birth, death, then domain position.
    pub fn axes(&self) -> [Energy; 5] {
        [
            self.birth,
            self.death,
            self.coords[0],
            self.coords[1],
            self.coords[2],
        ]
    }
    /// Weighted blend `w·self + (1-w)·other`.
    pub fn lerp(&self, other: &Self, w: Energy) -> Self {
        Self {
            birth: w * self.birth + (1. - w) * other.birth,
            death: w * self.death + (1. - w) * other.death,
            coords: std::array::from_fn(|i| w * self.coords[i] + (1. - w) * other.coords[i]),
        }
    }
}

impl From<(&CriticalPair, Energy)> for Point {
    fn from((pair, lambda): (&CriticalPair, Energy)) -> Self {
        Self {
            birth: pair.birth,
            death: pair.death,
            coords: std::array::from_fn(|i| {
                lambda * pair.birth_coords[i] + (1. - lambda) * pair.death_coords[i]
            }),
        }
    }
}

impl From<[Energy; 5]> for Point {
    fn from(axes: [Energy; 5]) -> Self {
        Self {
            birth: axes[0],
            death: axes[1],
            coords: [axes[2], axes[3], axes[4]],
        }
    }
}

impl Arbitrary for Point {
    fn random() -> Self {
        Self::from((&CriticalPair::random(), 0.5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_lies_on_diagonal() {
        let p = Point::new(1., 5.);
        let q = p.projection();
        assert_eq!(q.birth, 3.);
        assert_eq!(q.death, 3.);
        assert_eq!(q.persistence(), 0.);
    }

    #[test]
    fn lambda_blends_vertex_positions() {
        let mut pair = CriticalPair::from((CriticalType::Saddle2, CriticalType::LocalMax, 0., 1.));
        pair.birth_coords = [0., 0., 0.];
        pair.death_coords = [4., 8., 0.];
        assert_eq!(Point::from((&pair, 1.)).coords, [0., 0., 0.]);
        assert_eq!(Point::from((&pair, 0.)).coords, [4., 8., 0.]);
        assert_eq!(Point::from((&pair, 0.25)).coords, [3., 6., 0.]);
    }
}
