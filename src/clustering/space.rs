use crate::Active;
use crate::Energy;
use crate::Kind;
use crate::Point;
use crate::Transport;
use crate::Wasserstein;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

/// Points of one diagram (or centroid) for each kind.
pub type Parts<'a> = [&'a [Point]; 3];

/// Diagram space: the matching distance accumulated over active kinds.
///
/// Per-kind costs are combined in p-th power form, so the distance between
/// two inputs is `(Σ_k W_p(A_k, B_k)^p)^(1/p)`, or the largest per-kind
/// distance for p = ∞. Inactive kinds are skipped outright. Exact fallbacks
/// taken by the matcher are counted across threads.
#[derive(Debug)]
pub struct Space<'a> {
    matcher: Wasserstein<'a>,
    active: Active,
    fallbacks: AtomicUsize,
}

impl<'a> Space<'a> {
    pub fn new(matcher: Wasserstein<'a>, active: Active) -> Self {
        Self {
            matcher,
            active,
            fallbacks: AtomicUsize::new(0),
        }
    }
    pub fn active(&self) -> &Active {
        &self.active
    }
    pub fn matcher(&self) -> &Wasserstein<'a> {
        &self.matcher
    }
    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    /// Matching of one kind, counting exact fallbacks.
    pub fn transport(&self, lhs: &[Point], rhs: &[Point]) -> Transport {
        let transport = self.matcher.transport(lhs, rhs);
        if transport.fallback {
            self.fallbacks.fetch_add(1, Ordering::Relaxed);
        }
        transport
    }
    /// Matchings of every kind; inactive kinds stay empty.
    pub fn transports(&self, lhs: Parts, rhs: Parts) -> [Transport; 3] {
        Kind::ALL.map(|kind| {
            if self.active.contains(kind) {
                self.transport(lhs[kind.index()], rhs[kind.index()])
            } else {
                Transport::default()
            }
        })
    }
    /// Accumulated p-th power cost over active kinds.
    pub fn cost(&self, lhs: Parts, rhs: Parts) -> Energy {
        let order = self.matcher.order();
        self.active
            .kinds()
            .map(|kind| self.transport(lhs[kind.index()], rhs[kind.index()]).cost)
            .fold(0., |a, b| order.combine(a, b))
    }
    pub fn distance(&self, lhs: Parts, rhs: Parts) -> Energy {
        self.matcher.order().root(self.cost(lhs, rhs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GroundCost;
    use crate::Order;
    use crate::Selector;

    #[test]
    fn kinds_combine_in_power_form() {
        let metric = GroundCost::new(Order::W2, 1.);
        let space = Space::new(Wasserstein::new(&metric), Active::from_selector(Selector::All));
        let a = [[Point::new(0., 10.)], [Point::new(0., 2.)], [Point::new(1., 9.)]];
        let b = [[Point::new(3., 10.)], [Point::new(0., 2.)], [Point::new(1., 13.)]];
        let lhs = [&a[0][..], &a[1][..], &a[2][..]];
        let rhs = [&b[0][..], &b[1][..], &b[2][..]];
        let distance = space.distance(lhs, rhs);
        assert!((distance - 5.).abs() < 1e-6);
    }

    #[test]
    fn inactive_kinds_are_skipped() {
        let metric = GroundCost::new(Order::W1, 1.);
        let space = Space::new(Wasserstein::new(&metric), Active::from_selector(Selector::SaddleMax));
        let a = [Point::new(0., 4.)];
        let none: [Point; 0] = [];
        let lhs = [&a[..], &none[..], &none[..]];
        let rhs = [&none[..], &none[..], &none[..]];
        assert_eq!(space.distance(lhs, rhs), 0.);
        assert!(space.transports(lhs, rhs)[0].matchings.is_empty());
    }
}
