use super::*;
use crate::Energy;
use crate::GroundCost;
use crate::Measure;
use crate::Persistence;

/// Matching-ready form of one input: the points of each kind, sorted by
/// decreasing persistence.
///
/// The sort makes every persistence threshold a prefix, so a coarse version
/// of the diagram is just a shorter slice. `residual` holds, for each prefix
/// length, the accumulated diagonal cost of everything left out, which bounds
/// how much the omitted points can move a distance.
#[derive(Debug, Clone, Default)]
pub struct Sample {
    points: [Vec<Point>; 3],
    origin: [Vec<usize>; 3],
    residual: [Vec<Energy>; 3],
}

impl Sample {
    pub fn new(partition: &Partition, metric: &GroundCost, lambda: Energy) -> Self {
        let mut sample = Self::default();
        for kind in Kind::ALL {
            let mut entries = partition
                .diagram(kind)
                .iter()
                .map(|(i, pair)| (i, Point::from((pair, lambda))))
                .collect::<Vec<_>>();
            entries.sort_by(|a, b| b.1.persistence().total_cmp(&a.1.persistence()));
            let k = kind.index();
            let mut residual = vec![0.; entries.len() + 1];
            for (l, (_, point)) in entries.iter().enumerate().rev() {
                residual[l] = metric.order().combine(residual[l + 1], metric.vanish(point));
            }
            sample.origin[k] = entries.iter().map(|(i, _)| *i).collect();
            sample.points[k] = entries.into_iter().map(|(_, p)| p).collect();
            sample.residual[k] = residual;
        }
        sample
    }

    pub fn points(&self, kind: Kind) -> &[Point] {
        &self.points[kind.index()]
    }
    /// Position of each point in the raw, unpartitioned diagram.
    pub fn origin(&self, kind: Kind) -> &[usize] {
        &self.origin[kind.index()]
    }
    pub fn parts(&self) -> [&[Point]; 3] {
        Kind::ALL.map(|kind| self.points(kind))
    }
    pub fn len(&self) -> usize {
        self.points.iter().map(Vec::len).sum()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of leading points of `kind` with persistence at least `threshold`.
    pub fn cut(&self, kind: Kind, threshold: Persistence) -> usize {
        self.points(kind)
            .partition_point(|p| p.persistence() >= threshold)
    }
    /// Accumulated diagonal cost of the points of `kind` past the first `len`.
    pub fn residual(&self, kind: Kind, len: usize) -> Energy {
        self.residual[kind.index()][len]
    }
    /// Largest persistence across all kinds.
    pub fn peak(&self) -> Persistence {
        self.points
            .iter()
            .filter_map(|points| points.first())
            .map(Point::persistence)
            .fold(0., Persistence::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Order;
    use CriticalType::*;

    fn fixture(order: Order) -> Sample {
        let raw = vec![
            CriticalPair::from((LocalMin, Saddle1, 0., 1.)),
            CriticalPair::from((Saddle2, LocalMax, 2., 4.)),
            CriticalPair::from((LocalMin, Saddle1, 0., 3.)),
            CriticalPair::from((LocalMin, Saddle1, 1., 3.)),
        ];
        let partition = Partition::split(&raw, &Active::from_selector(Selector::All));
        Sample::new(&partition, &GroundCost::new(order, 1.), 0.5)
    }

    #[test]
    fn points_sorted_by_persistence_keep_origin() {
        let sample = fixture(Order::W1);
        let persistence = sample
            .points(Kind::Min)
            .iter()
            .map(Point::persistence)
            .collect::<Vec<_>>();
        assert_eq!(persistence, vec![3., 2., 1.]);
        assert_eq!(sample.origin(Kind::Min), &[2, 3, 0]);
        assert_eq!(sample.origin(Kind::Max), &[1]);
        assert_eq!(sample.len(), 4);
        assert_eq!(sample.peak(), 3.);
    }

    #[test]
    fn thresholds_cut_prefixes() {
        let sample = fixture(Order::W1);
        assert_eq!(sample.cut(Kind::Min, 2.), 2);
        assert_eq!(sample.cut(Kind::Min, 0.), 3);
        assert_eq!(sample.cut(Kind::Min, 5.), 0);
    }

    #[test]
    fn residual_accumulates_vanishing_costs() {
        let sample = fixture(Order::W1);
        assert_eq!(sample.residual(Kind::Min, 0), 6.);
        assert_eq!(sample.residual(Kind::Min, 2), 1.);
        assert_eq!(sample.residual(Kind::Min, 3), 0.);
        let sample = fixture(Order::Bottleneck);
        assert_eq!(sample.residual(Kind::Min, 0), 1.5);
    }
}
