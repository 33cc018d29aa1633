use super::*;
use crate::Energy;
use crate::Point;

/// Order-p ground cost blending persistence and domain geometry.
///
/// With finite p the cost between two points is
/// `α(|Δbirth|^p + |Δdeath|^p) + (1-α)Σ|Δcoords|^p`; for p = ∞ each group uses
/// its largest gap instead of the sum. Vanishing into the diagonal keeps the
/// point's position, so it only pays the persistence part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundCost {
    order: Order,
    alpha: Energy,
}

impl GroundCost {
    pub fn new(order: Order, alpha: Energy) -> Self {
        Self { order, alpha }
    }
    pub fn order(&self) -> Order {
        self.order
    }
    pub fn alpha(&self) -> Energy {
        self.alpha
    }
    /// Per-axis weights in [`Point::axes`] order.
    pub fn weights(&self) -> [Energy; 5] {
        let a = self.alpha;
        let g = 1. - self.alpha;
        [a, a, g, g, g]
    }
    /// Cost given absolute gaps along each axis.
    pub fn gaps(&self, gaps: &[Energy; 5]) -> Energy {
        let [a, _, g, _, _] = self.weights();
        match self.order {
            Order::Bottleneck => {
                let persistence = gaps[0].max(gaps[1]);
                let geometry = gaps[2].max(gaps[3]).max(gaps[4]);
                self.weighted(a, persistence) + self.weighted(g, geometry)
            }
            order => {
                let persistence = order.pow(gaps[0]) + order.pow(gaps[1]);
                let geometry = order.pow(gaps[2]) + order.pow(gaps[3]) + order.pow(gaps[4]);
                self.weighted(a, persistence) + self.weighted(g, geometry)
            }
        }
    }
    /// Lower bound on the cost from `x` to anything inside the box `[lo, hi]`.
    pub fn bound(&self, x: &Point, lo: &[Energy; 5], hi: &[Energy; 5]) -> Energy {
        let axes = x.axes();
        self.gaps(&std::array::from_fn(|d| {
            (lo[d] - axes[d]).max(axes[d] - hi[d]).max(0.)
        }))
    }
    /// Zero weight must silence an axis even when its gap is unbounded.
    fn weighted(&self, w: Energy, x: Energy) -> Energy {
        if w == 0. { 0. } else { w * x }
    }
}

impl Measure for GroundCost {
    type X = Point;
    fn distance(&self, x: &Point, y: &Point) -> Energy {
        let (a, b) = (x.axes(), y.axes());
        self.gaps(&std::array::from_fn(|d| (a[d] - b[d]).abs()))
    }
    fn vanish(&self, x: &Point) -> Energy {
        let half = x.persistence() / 2.;
        match self.order {
            Order::Bottleneck => self.weighted(self.alpha, half),
            order => self.weighted(self.alpha, 2. * order.pow(half)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vanish_is_distance_to_projection() {
        let x = Point::new(1., 5.);
        for order in [Order::W1, Order::W2, Order::Bottleneck] {
            let metric = GroundCost::new(order, 1.);
            assert_eq!(metric.vanish(&x), metric.distance(&x, &x.projection()));
        }
    }

    #[test]
    fn geometry_only_counts_below_full_alpha() {
        let mut x = Point::new(0., 1.);
        let mut y = Point::new(0., 1.);
        x.coords = [0., 0., 0.];
        y.coords = [3., 0., 0.];
        assert_eq!(GroundCost::new(Order::W2, 1.).distance(&x, &y), 0.);
        assert_eq!(GroundCost::new(Order::W2, 0.5).distance(&x, &y), 4.5);
        assert_eq!(GroundCost::new(Order::Bottleneck, 0.).distance(&x, &y), 3.);
    }

    #[test]
    fn bound_never_exceeds_distance() {
        let metric = GroundCost::new(Order::W2, 0.7);
        let x = Point::new(0., 2.);
        let y = Point::new(3., 4.);
        let z = Point::new(1., 7.);
        let lo = std::array::from_fn(|d| y.axes()[d].min(z.axes()[d]));
        let hi = std::array::from_fn(|d| y.axes()[d].max(z.axes()[d]));
        let bound = metric.bound(&x, &lo, &hi);
        assert!(bound <= metric.distance(&x, &y));
        assert!(bound <= metric.distance(&x, &z));
    }
}
