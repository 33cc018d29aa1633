use super::*;
use crate::Arbitrary;
use crate::Persistence;
use serde::Deserialize;
use serde::Serialize;

/// One persistence pair, as produced by upstream critical point extraction.
///
/// The pair links a birth vertex to a death vertex. Both ends carry their Morse
/// type, scalar value and position in the domain. Only pairs with positive
/// persistence take part in matching.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalPair {
    pub birth_vertex: usize,
    pub birth_type: CriticalType,
    pub death_vertex: usize,
    pub death_type: CriticalType,
    pub persistence: Persistence,
    pub birth: Persistence,
    pub birth_coords: [Persistence; 3],
    pub death: Persistence,
    pub death_coords: [Persistence; 3],
}

impl CriticalPair {
    /// Whether either end has the given type.
    pub fn touches(&self, t: CriticalType) -> bool {
        self.birth_type == t || self.death_type == t
    }
    /// Whether this pair is the global min-max pair (in either order).
    pub fn is_global(&self) -> bool {
        self.birth_type.is_extremum()
            && self.death_type.is_extremum()
            && self.birth_type != self.death_type
    }
    /// Whether this pair links a 1-saddle and a 2-saddle (in either order).
    pub fn is_saddle_saddle(&self) -> bool {
        self.birth_type.is_saddle()
            && self.death_type.is_saddle()
            && self.birth_type != self.death_type
    }
    /// Whether birth and death differ. The `persistence` field is carried
    /// through untouched; matching always measures `|death - birth|`.
    pub fn is_persistent(&self) -> bool {
        (self.death - self.birth).abs() > 0.
    }
}

impl From<(CriticalType, CriticalType, Persistence, Persistence)> for CriticalPair {
    /// Pair located at the origin from types and (birth, death) values.
    fn from((bt, dt, birth, death): (CriticalType, CriticalType, Persistence, Persistence)) -> Self {
        Self {
            birth_vertex: 0,
            birth_type: bt,
            death_vertex: 0,
            death_type: dt,
            persistence: (death - birth).abs(),
            birth,
            birth_coords: [0.; 3],
            death,
            death_coords: [0.; 3],
        }
    }
}

impl Arbitrary for CriticalPair {
    fn random() -> Self {
        use rand::Rng;
        let ref mut rng = rand::rng();
        let types = [
            (CriticalType::LocalMin, CriticalType::Saddle1),
            (CriticalType::Saddle1, CriticalType::Saddle2),
            (CriticalType::Saddle2, CriticalType::LocalMax),
        ];
        let (bt, dt) = types[rng.random_range(0..types.len())];
        let birth = rng.random::<Persistence>();
        let death = birth + rng.random::<Persistence>();
        Self {
            birth_vertex: rng.random_range(0..1 << 16),
            birth_type: bt,
            death_vertex: rng.random_range(0..1 << 16),
            death_type: dt,
            persistence: death - birth,
            birth,
            birth_coords: std::array::from_fn(|_| rng.random::<Persistence>()),
            death,
            death_coords: std::array::from_fn(|_| rng.random::<Persistence>()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_pair_in_either_order() {
        let a = CriticalPair::from((CriticalType::LocalMin, CriticalType::LocalMax, 0., 5.));
        let b = CriticalPair::from((CriticalType::LocalMax, CriticalType::LocalMin, 0., 5.));
        assert!(a.is_global());
        assert!(b.is_global());
        assert!(!a.is_saddle_saddle());
    }

    #[test]
    fn persistence_is_read_from_values() {
        let mut stale = CriticalPair::from((CriticalType::LocalMin, CriticalType::Saddle1, 1., 4.));
        stale.persistence = 0.;
        assert!(stale.is_persistent());
        let mut flat = CriticalPair::from((CriticalType::LocalMin, CriticalType::Saddle1, 2., 2.));
        flat.persistence = 5.;
        assert!(!flat.is_persistent());
        let both = CriticalPair::from((CriticalType::Saddle1, CriticalType::Saddle1, 0., 2.));
        assert!(!both.is_saddle_saddle());
    }

    #[test]
    fn random_pair_has_positive_persistence() {
        let p = CriticalPair::random();
        assert!(p.persistence >= 0.);
        assert_eq!(p.persistence, p.death - p.birth);
    }

    #[test]
    fn deserializes_from_json() {
        let json = r#"{
            "birth_vertex": 3, "birth_type": "Saddle1",
            "death_vertex": 9, "death_type": "Saddle2",
            "persistence": 0.5,
            "birth": 1.0, "birth_coords": [0, 0, 0],
            "death": 1.5, "death_coords": [1, 0, 0]
        }"#;
        let pair = serde_json::from_str::<CriticalPair>(json).unwrap();
        assert!(pair.is_saddle_saddle());
        assert_eq!(pair.death_coords[0], 1.);
    }
}
