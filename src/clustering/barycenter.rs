use super::*;
use crate::BARYCENTER_ITERATIONS;
use crate::BARYCENTER_TOLERANCE;
use crate::Energy;
use crate::Order;
use crate::Point;
use crate::Transport;
use rayon::prelude::*;

/// Wasserstein barycenter of one kind over the members of one cluster.
///
/// Alternates between matching every member against the current barycenter
/// and moving each barycenter point to the centre of what it was matched with:
/// the coordinate-wise median for p = 1, the mean otherwise.
///
/// - a member point matched to it contributes itself
/// - a member that sent it to the diagonal contributes its projection
/// - a point every member sent to the diagonal is dropped
/// - a member point sent to the diagonal spawns a new point
///   `(x + (m-1)·proj(x)) / m`, its mean against `m-1` diagonal copies
///
/// The centre minimizes `Σ W_p^p` for the current matching at p = 1 and 2.
/// At p = ∞ the mean is a heuristic, which is why the best barycenter seen
/// is kept. Relocation stops once the energy `Σ W_p(member, barycenter)^p`
/// stops improving by more than [`BARYCENTER_TOLERANCE`] relative.
pub struct Barycenter<'a, 'b> {
    space: &'b Space<'a>,
    members: Vec<&'b [Point]>,
}

impl<'a, 'b> Barycenter<'a, 'b> {
    pub fn new(space: &'b Space<'a>, members: Vec<&'b [Point]>) -> Self {
        Self { space, members }
    }

    /// Total p-th power cost from every member to `points`.
    pub fn energy(&self, points: &[Point]) -> Energy {
        self.members
            .par_iter()
            .map(|member| self.space.transport(member, points).cost)
            .collect::<Vec<_>>()
            .into_iter()
            .sum()
    }

    /// Relocate from `start` until the energy settles.
    pub fn fit(&self, start: &[Point]) -> Vec<Point> {
        if self.members.is_empty() {
            return start.to_vec();
        }
        let mut current = start.to_vec();
        let mut best: Option<(Vec<Point>, Energy)> = None;
        let mut previous = Energy::INFINITY;
        for _ in 0..BARYCENTER_ITERATIONS {
            let transports = self
                .members
                .par_iter()
                .map(|member| self.space.transport(member, &current))
                .collect::<Vec<_>>();
            let energy = transports.iter().map(|t| t.cost).sum::<Energy>();
            if best.as_ref().is_none_or(|(_, e)| energy < *e) {
                best = Some((current.clone(), energy));
            }
            let settled = previous.is_finite() && previous - energy <= BARYCENTER_TOLERANCE * previous;
            if energy == 0. || settled {
                break;
            }
            previous = energy;
            current = self.relocate(&current, &transports);
        }
        best.map(|(points, _)| points).unwrap_or(current)
    }

    fn relocate(&self, current: &[Point], transports: &[Transport]) -> Vec<Point> {
        let m = self.members.len() as Energy;
        let mut slots = vec![Vec::with_capacity(self.members.len()); current.len()];
        let mut matched = vec![false; current.len()];
        let mut spawned = Vec::new();
        for (member, transport) in self.members.iter().zip(transports) {
            for matching in transport.matchings.iter() {
                match (matching.source, matching.target) {
                    (Some(s), Some(g)) => {
                        slots[g].push(member[s].axes());
                        matched[g] = true;
                    }
                    (None, Some(g)) => slots[g].push(current[g].projection().axes()),
                    (Some(s), None) => {
                        let x = member[s];
                        spawned.push(x.lerp(&x.projection(), 1. / m));
                    }
                    (None, None) => {}
                }
            }
        }
        let order = self.space.matcher().order();
        slots
            .into_iter()
            .zip(matched)
            .filter(|(_, matched)| *matched)
            .map(|(slot, _)| match order {
                Order::W1 => Self::median(slot),
                Order::W2 | Order::Bottleneck => Self::mean(&slot),
            })
            .chain(spawned)
            .collect()
    }

    fn mean(slot: &[[Energy; 5]]) -> Point {
        let n = slot.len() as Energy;
        Point::from(std::array::from_fn(|d| slot.iter().map(|x| x[d]).sum::<Energy>() / n))
    }

    fn median(slot: Vec<[Energy; 5]>) -> Point {
        Point::from(std::array::from_fn(|d| {
            let mut axis = slot.iter().map(|x| x[d]).collect::<Vec<_>>();
            axis.sort_by(|a, b| a.total_cmp(b));
            let mid = axis.len() / 2;
            if axis.len() % 2 == 1 {
                axis[mid]
            } else {
                (axis[mid - 1] + axis[mid]) / 2.
            }
        }))
    }
}
