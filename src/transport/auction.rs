use super::*;
use crate::AUCTION_BID_FACTOR;
use crate::AUCTION_BID_FLOOR;
use crate::AUCTION_EPSILON_DECAY;
use crate::AUCTION_EPSILON_START;
use crate::AUCTION_PRECISION;
use crate::Energy;
use crate::KDTREE_MIN_GOODS;
use std::cmp::Ordering;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::VecDeque;
use std::time::Instant;

/// Gauss-Seidel auction with ε-scaling over a [`Bipartite`] problem.
///
/// Unassigned bidders wait in a FIFO queue. Each one in turn takes its best
/// good, raising the price by the gap to its second-best good plus ε and
/// evicting the previous owner. A phase ends when every bidder holds a good;
/// ε then shrinks by [`AUCTION_EPSILON_DECAY`] while prices carry over. Once
/// ε reaches `ceiling · AUCTION_PRECISION / size`, the assignment is optimal
/// up to `ceiling · AUCTION_PRECISION`.
///
/// Every phase is bounded by a bid budget. Running out marks the auction as
/// degenerate and leaves the assignment to an exact solver. A deadline is
/// checked between phases only, so a returned assignment is always complete.
#[derive(Debug, Clone)]
pub struct Auction<'a> {
    problem: Bipartite<'a>,
    bidders: Vec<Bidder>,
    goods: Vec<Good>,
    tree: Option<KdTree>,
    quotes: Option<BinaryHeap<Reverse<Quote>>>,
    deadline: Option<Instant>,
    degenerate: bool,
    phases: usize,
    bids: usize,
}

/// Price snapshot of a diagonal good. Stale once the good is repriced.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Quote {
    price: Energy,
    good: usize,
}

impl Eq for Quote {}
impl PartialOrd for Quote {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Quote {
    fn cmp(&self, other: &Self) -> Ordering {
        self.price
            .total_cmp(&other.price)
            .then(self.good.cmp(&other.good))
    }
}

impl<'a> Auction<'a> {
    /// Index real goods with a [`KdTree`] and diagonal goods with a price heap,
    /// each only when there are enough of them to pay off.
    pub fn indexed(mut self, on: bool) -> Self {
        let (n, m) = (self.problem.n(), self.problem.m());
        if on && m >= KDTREE_MIN_GOODS {
            self.tree = Some(KdTree::new(self.problem.rhs(), self.problem.metric()));
        }
        if on && n >= KDTREE_MIN_GOODS {
            self.quotes = Some(
                (m..m + n)
                    .map(|good| Reverse(Quote { price: 0., good }))
                    .collect(),
            );
        }
        self
    }
    pub fn deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }
    /// A phase ran out of bids before every bidder was assigned.
    pub fn degenerate(&self) -> bool {
        self.degenerate
    }

    /// Run one ε-phase from an empty assignment. False if the bid budget ran out.
    fn phase(&mut self, epsilon: Energy) -> bool {
        self.bidders.iter_mut().for_each(Bidder::evict);
        self.goods.iter_mut().for_each(Good::release);
        let size = self.problem.size();
        let budget = (AUCTION_BID_FACTOR * size * size).max(AUCTION_BID_FLOOR);
        let mut queue = (0..size).collect::<VecDeque<_>>();
        let mut bids = 0;
        while let Some(bidder) = queue.pop_front() {
            if bids == budget {
                return false;
            }
            bids += 1;
            if let Some(evicted) = self.bid(bidder, epsilon) {
                queue.push_back(evicted);
            }
        }
        self.bids += bids;
        true
    }

    /// Place one bid, returning the bidder that got outbid.
    fn bid(&mut self, bidder: usize, epsilon: Energy) -> Option<usize> {
        let offers = self.offers(bidder);
        let (good, value) = offers.best().expect("every bidder reaches its diagonal");
        let increment = offers
            .next()
            .map_or(epsilon, |(_, next)| next - value + epsilon);
        let price = self.goods[good].price() + increment;
        let evicted = self.goods[good].sell(bidder, price);
        if let Some(evicted) = evicted {
            self.bidders[evicted].evict();
        }
        self.bidders[bidder].assign(good);
        self.reindex(good);
        evicted
    }

    /// The two cheapest goods for `bidder`, valued at cost plus price.
    fn offers(&mut self, bidder: usize) -> Offers {
        let problem = self.problem;
        let metric = problem.metric();
        let (n, m) = (problem.n(), problem.m());
        let mut offers = Offers::default();
        if bidder < n {
            let x = &problem.lhs()[bidder];
            let own = m + bidder;
            offers.consider(own, metric.vanish(x) + self.goods[own].price());
            match self.tree {
                Some(ref tree) => tree.search(x, problem.rhs(), &self.goods[..m], metric, &mut offers),
                None => {
                    for (g, y) in problem.rhs().iter().enumerate() {
                        offers.consider(g, metric.distance(x, y) + self.goods[g].price());
                    }
                }
            }
        } else {
            let own = bidder - n;
            let y = &problem.rhs()[own];
            offers.consider(own, metric.vanish(y) + self.goods[own].price());
            match self.quotes {
                Some(_) => self.cheapest(&mut offers),
                None => {
                    for g in m..m + n {
                        offers.consider(g, self.goods[g].price());
                    }
                }
            }
        }
        offers
    }

    /// Offer the two cheapest diagonal goods from the heap, dropping stale quotes.
    fn cheapest(&mut self, offers: &mut Offers) {
        let Some(ref mut quotes) = self.quotes else {
            return;
        };
        let mut valid = Vec::with_capacity(2);
        while valid.len() < 2 {
            match quotes.pop() {
                None => break,
                Some(Reverse(quote)) if self.goods[quote.good].price() != quote.price => continue,
                Some(Reverse(quote)) if valid.contains(&quote) => continue,
                Some(Reverse(quote)) => valid.push(quote),
            }
        }
        for quote in valid {
            offers.consider(quote.good, quote.price);
            quotes.push(Reverse(quote));
        }
    }

    /// Keep the indexes in sync with a new price of `good`.
    fn reindex(&mut self, good: usize) {
        let m = self.problem.m();
        if good < m {
            if let Some(ref mut tree) = self.tree {
                tree.reprice(good, &self.goods[..m]);
            }
        } else if let Some(ref mut quotes) = self.quotes {
            let price = self.goods[good].price();
            quotes.push(Reverse(Quote { price, good }));
        }
    }

    fn assignment(&self) -> Vec<usize> {
        self.bidders
            .iter()
            .map(|b| b.good().expect("completed auction assigns every bidder"))
            .collect()
    }
}

impl<'a> From<Bipartite<'a>> for Auction<'a> {
    fn from(problem: Bipartite<'a>) -> Self {
        Self {
            problem,
            bidders: vec![Bidder::default(); problem.size()],
            goods: vec![Good::default(); problem.size()],
            tree: None,
            quotes: None,
            deadline: None,
            degenerate: false,
            phases: 0,
            bids: 0,
        }
    }
}

impl Coupling for Auction<'_> {
    fn minimize(mut self) -> Self {
        let size = self.problem.size();
        if size == 0 {
            return self;
        }
        let ceiling = self.problem.ceiling().max(Energy::EPSILON);
        let floor = (ceiling * AUCTION_PRECISION / size as Energy).max(Energy::EPSILON);
        let mut epsilon = (ceiling * AUCTION_EPSILON_START).max(floor);
        loop {
            if !self.phase(epsilon) {
                log::debug!("{:<32}{:<32}", "auction out of bids", epsilon);
                self.degenerate = true;
                return self;
            }
            self.phases += 1;
            if epsilon <= floor {
                break;
            }
            if self.deadline.is_some_and(|d| Instant::now() >= d) {
                log::debug!("{:<32}{:<32}", "auction deadline", epsilon);
                break;
            }
            epsilon = (epsilon / AUCTION_EPSILON_DECAY).max(floor);
        }
        log::trace!(
            "{:<32}{:<32}",
            format!("auction {}x{}", self.problem.n(), self.problem.m()),
            format!("{} phases {} bids", self.phases, self.bids)
        );
        self
    }
    fn matchings(&self) -> Vec<Matching> {
        self.problem.matchings(&self.assignment())
    }
    fn cost(&self) -> Energy {
        self.problem.total(&self.matchings())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Arbitrary;
    use crate::Point;

    fn solve(metric: &GroundCost, lhs: &[Point], rhs: &[Point], indexed: bool) -> (Energy, Energy) {
        let problem = Bipartite::from((metric, lhs, rhs));
        let auction = Auction::from(problem).indexed(indexed).minimize();
        let exact = Hungarian::from(problem).minimize();
        assert!(!auction.degenerate());
        (auction.cost(), exact.cost())
    }

    #[test]
    fn single_points_match_directly() {
        let metric = GroundCost::new(Order::W2, 1.);
        let lhs = [Point::new(0., 10.)];
        let rhs = [Point::new(0., 9.)];
        let problem = Bipartite::from((&metric, &lhs[..], &rhs[..]));
        let auction = Auction::from(problem).minimize();
        let matchings = auction.matchings();
        assert_eq!(matchings.len(), 1);
        assert_eq!(matchings[0].source, Some(0));
        assert_eq!(matchings[0].target, Some(0));
        assert!((auction.cost() - 1.).abs() < 1e-6);
    }

    #[test]
    fn small_points_vanish_instead_of_travelling() {
        let metric = GroundCost::new(Order::W1, 1.);
        let lhs = [Point::new(0., 0.2)];
        let rhs = [Point::new(50., 50.2)];
        let problem = Bipartite::from((&metric, &lhs[..], &rhs[..]));
        let auction = Auction::from(problem).minimize();
        assert!(auction.matchings().iter().all(|m| m.source.is_none() || m.target.is_none()));
        assert!((auction.cost() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn auction_is_near_optimal() {
        let metric = GroundCost::new(Order::W2, 0.9);
        for _ in 0..10 {
            let lhs = (0..12).map(|_| Point::random()).collect::<Vec<_>>();
            let rhs = (0..9).map(|_| Point::random()).collect::<Vec<_>>();
            let (auction, exact) = solve(&metric, &lhs, &rhs, false);
            assert!((auction - exact).abs() <= 1e-6 * exact.max(1.));
        }
    }

    #[test]
    fn indexed_auction_is_near_optimal() {
        let metric = GroundCost::new(Order::W1, 1.);
        let lhs = (0..60).map(|_| Point::random()).collect::<Vec<_>>();
        let rhs = (0..70).map(|_| Point::random()).collect::<Vec<_>>();
        let (auction, exact) = solve(&metric, &lhs, &rhs, true);
        assert!((auction - exact).abs() <= 1e-6 * exact.max(1.));
    }

    #[test]
    fn matchings_cover_every_point_once() {
        let metric = GroundCost::new(Order::W2, 1.);
        let lhs = (0..7).map(|_| Point::random()).collect::<Vec<_>>();
        let rhs = (0..5).map(|_| Point::random()).collect::<Vec<_>>();
        let problem = Bipartite::from((&metric, &lhs[..], &rhs[..]));
        let matchings = Auction::from(problem).minimize().matchings();
        let mut sources = matchings.iter().filter_map(|m| m.source).collect::<Vec<_>>();
        let mut targets = matchings.iter().filter_map(|m| m.target).collect::<Vec<_>>();
        sources.sort();
        targets.sort();
        assert_eq!(sources, (0..7).collect::<Vec<_>>());
        assert_eq!(targets, (0..5).collect::<Vec<_>>());
    }
}
