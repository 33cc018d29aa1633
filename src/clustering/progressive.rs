use super::*;
use crate::Active;
use crate::Energy;
use crate::Kind;
use crate::Order;
use crate::PROGRESSIVE_LEVELS;
use crate::PROGRESSIVE_TOLERANCE;
use crate::Persistence;
use crate::Sample;

/// Decreasing persistence thresholds, always ending at 0 (full resolution).
///
/// Progressive schedules start at half the largest persistence across all
/// inputs and halve it [`PROGRESSIVE_LEVELS`] times.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    thresholds: Vec<Persistence>,
}

impl Schedule {
    pub fn new(peak: Persistence, progressive: bool) -> Self {
        let levels = if progressive { PROGRESSIVE_LEVELS } else { 0 };
        Self {
            thresholds: (0..levels)
                .map(|l| peak / (2. as Persistence).powi(l as i32 + 1))
                .chain(std::iter::once(0.))
                .collect(),
        }
    }
    /// A single full-resolution level.
    pub fn full() -> Self {
        Self::new(0., false)
    }
    pub fn thresholds(&self) -> &[Persistence] {
        &self.thresholds
    }
    pub fn len(&self) -> usize {
        self.thresholds.len()
    }
    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }
}

/// A sample truncated at one persistence threshold.
///
/// `radius` bounds how far the truncated diagram lies from the full one in
/// diagram space, so every distance computed on views is off by at most the
/// sum of the two radii.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub parts: Parts<'a>,
    pub cuts: [usize; 3],
    pub radius: Energy,
}

impl<'a> View<'a> {
    pub fn new(sample: &'a Sample, active: &Active, order: Order, threshold: Persistence) -> Self {
        let cuts = Kind::ALL.map(|kind| {
            if active.contains(kind) {
                sample.cut(kind, threshold)
            } else {
                0
            }
        });
        let parts = Kind::ALL.map(|kind| &sample.points(kind)[..cuts[kind.index()]]);
        let radius = order.root(
            active
                .kinds()
                .map(|kind| sample.residual(kind, cuts[kind.index()]))
                .fold(0., |a, b| order.combine(a, b)),
        );
        Self {
            parts,
            cuts,
            radius,
        }
    }
}

/// Winner of a nearest-centroid search.
#[derive(Debug, Clone, PartialEq)]
pub struct Nearest {
    pub j: usize,
    /// Exact full-resolution distance to `j`.
    pub distance: Energy,
    /// Lower bounds on the distance to every other candidate.
    pub lower: Vec<(usize, Energy)>,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    j: usize,
    lo: Energy,
    hi: Energy,
}

impl Candidate {
    fn exact(&self) -> bool {
        self.lo == self.hi
    }
    fn settle(&mut self, distance: Energy) {
        self.lo = distance;
        self.hi = distance;
    }
}

/// Coarse-to-fine distance bounds between samples and centroids.
///
/// Distances are first taken between truncated views, then tightened level by
/// level only for the pairs whose bounds still matter. Whatever survives to
/// the end is matched at full resolution, so reported distances are exact.
pub struct Refinement<'a, 'b> {
    space: &'b Space<'a>,
    schedule: &'b Schedule,
}

impl<'a, 'b> Refinement<'a, 'b> {
    pub fn new(space: &'b Space<'a>, schedule: &'b Schedule) -> Self {
        Self { space, schedule }
    }

    fn view<'s>(&self, sample: &'s Sample, threshold: Persistence) -> View<'s> {
        View::new(
            sample,
            self.space.active(),
            self.space.matcher().order(),
            threshold,
        )
    }

    /// Nearest centroid to `sample` among `candidates`.
    ///
    /// `incumbent` is a centroid whose exact distance is already known. A
    /// candidate is dropped as soon as its lower bound exceeds the smallest
    /// upper bound; ties survive to full resolution and go to the lowest index.
    pub fn nearest(
        &self,
        sample: &Sample,
        centroids: &[Centroid],
        candidates: &[usize],
        incumbent: Option<(usize, Energy)>,
    ) -> Nearest {
        let mut alive = candidates
            .iter()
            .filter(|&&j| incumbent.is_none_or(|(i, _)| i != j))
            .map(|&j| Candidate {
                j,
                lo: 0.,
                hi: Energy::INFINITY,
            })
            .chain(incumbent.map(|(j, d)| Candidate { j, lo: d, hi: d }))
            .collect::<Vec<_>>();
        let mut lower = Vec::new();
        let mut previous = None;
        for &threshold in self.schedule.thresholds() {
            if alive.len() <= 1 {
                break;
            }
            let view = self.view(sample, threshold);
            if previous == Some(view.cuts) {
                continue;
            }
            previous = Some(view.cuts);
            for candidate in alive.iter_mut().filter(|c| !c.exact()) {
                let d = self.space.distance(view.parts, centroids[candidate.j].parts());
                if view.radius == 0. {
                    candidate.settle(d);
                } else {
                    candidate.lo = candidate.lo.max(d - view.radius);
                    candidate.hi = candidate.hi.min(d + view.radius);
                }
            }
            let cap = alive.iter().map(|c| c.hi).fold(Energy::INFINITY, Energy::min);
            alive.retain(|c| {
                let keep = c.lo <= cap;
                if !keep {
                    lower.push((c.j, c.lo));
                }
                keep
            });
            if view.radius == 0. {
                break;
            }
        }
        for candidate in alive.iter_mut().filter(|c| !c.exact()) {
            let d = self
                .space
                .distance(sample.parts(), centroids[candidate.j].parts());
            candidate.settle(d);
        }
        let winner = *alive
            .iter()
            .min_by(|a, b| a.hi.total_cmp(&b.hi).then(a.j.cmp(&b.j)))
            .expect("at least one candidate");
        lower.extend(
            alive
                .iter()
                .filter(|c| c.j != winner.j)
                .map(|c| (c.j, c.hi)),
        );
        Nearest {
            j: winner.j,
            distance: winner.hi,
            lower,
        }
    }

    /// Distance between two samples, refined until the bound width is
    /// within [`PROGRESSIVE_TOLERANCE`] of the estimate.
    pub fn entry(&self, a: &Sample, b: &Sample) -> Energy {
        let mut previous = None;
        let mut estimate = 0.;
        for &threshold in self.schedule.thresholds() {
            let (va, vb) = (self.view(a, threshold), self.view(b, threshold));
            if previous == Some((va.cuts, vb.cuts)) {
                continue;
            }
            previous = Some((va.cuts, vb.cuts));
            estimate = self.space.distance(va.parts, vb.parts);
            let radius = va.radius + vb.radius;
            if radius == 0. || radius <= PROGRESSIVE_TOLERANCE * estimate {
                break;
            }
        }
        estimate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CriticalPair;
    use crate::CriticalType;
    use crate::GroundCost;
    use crate::Partition;
    use crate::Selector;
    use crate::Wasserstein;

    fn sample(metric: &GroundCost, points: &[(f64, f64)]) -> Sample {
        let raw = points
            .iter()
            .map(|&(b, d)| CriticalPair::from((CriticalType::LocalMin, CriticalType::Saddle1, b, d)))
            .collect::<Vec<_>>();
        let partition = Partition::split(&raw, &Active::from_selector(Selector::All));
        Sample::new(&partition, metric, 0.5)
    }

    #[test]
    fn schedules_halve_then_finish() {
        let schedule = Schedule::new(8., true);
        assert_eq!(schedule.len(), PROGRESSIVE_LEVELS + 1);
        assert_eq!(schedule.thresholds()[0], 4.);
        assert_eq!(schedule.thresholds()[1], 2.);
        assert_eq!(*schedule.thresholds().last().unwrap(), 0.);
        assert_eq!(Schedule::full().thresholds(), &[0.]);
    }

    #[test]
    fn views_bound_the_full_distance() {
        let metric = GroundCost::new(Order::W2, 1.);
        let space = Space::new(Wasserstein::new(&metric), Active::from_selector(Selector::MinSaddle));
        let a = sample(&metric, &[(0., 16.), (1., 3.), (2., 2.5), (0., 0.75)]);
        let b = sample(&metric, &[(0., 15.), (1., 4.), (3., 3.2)]);
        let exact = space.distance(a.parts(), b.parts());
        for threshold in Schedule::new(16., true).thresholds() {
            let va = View::new(&a, space.active(), Order::W2, *threshold);
            let vb = View::new(&b, space.active(), Order::W2, *threshold);
            let d = space.distance(va.parts, vb.parts);
            let r = va.radius + vb.radius;
            assert!(d - r <= exact + 1e-6);
            assert!(d + r >= exact - 1e-6);
        }
    }

    #[test]
    fn progressive_and_full_searches_agree() {
        let metric = GroundCost::new(Order::W2, 1.);
        let space = Space::new(Wasserstein::new(&metric), Active::from_selector(Selector::MinSaddle));
        let a = sample(&metric, &[(0., 16.), (1., 3.), (2., 2.5)]);
        let centroids = [
            Centroid::from(&sample(&metric, &[(0., 4.)])),
            Centroid::from(&sample(&metric, &[(0., 15.), (1., 3.5)])),
            Centroid::from(&sample(&metric, &[(5., 30.)])),
        ];
        let progressive = Schedule::new(16., true);
        let full = Schedule::full();
        let lhs = Refinement::new(&space, &progressive).nearest(&a, &centroids, &[0, 1, 2], None);
        let rhs = Refinement::new(&space, &full).nearest(&a, &centroids, &[0, 1, 2], None);
        assert_eq!(lhs.j, 1);
        assert_eq!(rhs.j, 1);
        assert!((lhs.distance - rhs.distance).abs() < 1e-6);
        for (j, lower) in lhs.lower {
            assert!(lower <= space.distance(a.parts(), centroids[j].parts()) + 1e-6);
        }
    }

    #[test]
    fn matrix_entries_converge() {
        let metric = GroundCost::new(Order::W1, 1.);
        let space = Space::new(Wasserstein::new(&metric), Active::from_selector(Selector::MinSaddle));
        let a = sample(&metric, &[(0., 16.), (1., 3.), (2., 2.5)]);
        let b = sample(&metric, &[(0., 12.), (1., 2.)]);
        let schedule = Schedule::new(16., true);
        let entry = Refinement::new(&space, &schedule).entry(&a, &b);
        let exact = space.distance(a.parts(), b.parts());
        assert!((entry - exact).abs() <= 2e-6 * exact.max(1.));
    }
}
