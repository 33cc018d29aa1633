use crate::Energy;

/// Auction state of one bidder: the good it currently holds, if any.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bidder {
    good: Option<usize>,
}

impl Bidder {
    pub fn good(&self) -> Option<usize> {
        self.good
    }
    pub fn assign(&mut self, good: usize) {
        self.good = Some(good);
    }
    pub fn evict(&mut self) {
        self.good = None;
    }
}

/// Auction state of one good: its current owner and price.
///
/// Prices only ever rise within an auction, and they are carried over from
/// one ε-scaling phase to the next while ownership is reset.
#[derive(Debug, Clone, Copy, Default)]
pub struct Good {
    owner: Option<usize>,
    price: Energy,
}

impl Good {
    pub fn owner(&self) -> Option<usize> {
        self.owner
    }
    pub fn price(&self) -> Energy {
        self.price
    }
    /// Raise the price and hand the good to `bidder`, returning the evicted owner.
    pub fn sell(&mut self, bidder: usize, price: Energy) -> Option<usize> {
        self.price = price;
        self.owner.replace(bidder)
    }
    pub fn release(&mut self) {
        self.owner = None;
    }
}

/// The two cheapest goods seen so far for one bidder, as `(good, value)`.
///
/// Values compare first and indices break ties, lowest index first, so the
/// winner does not depend on the order goods were visited in.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offers {
    best: Option<(usize, Energy)>,
    next: Option<(usize, Energy)>,
}

impl Offers {
    pub fn best(&self) -> Option<(usize, Energy)> {
        self.best
    }
    pub fn next(&self) -> Option<(usize, Energy)> {
        self.next
    }
    pub fn consider(&mut self, good: usize, value: Energy) {
        let candidate = (good, value);
        if Self::beats(candidate, self.best) {
            self.next = self.best.replace(candidate);
        } else if Self::beats(candidate, self.next) {
            self.next = Some(candidate);
        }
    }
    /// Whether a good whose value is at least `bound` could still change the offers.
    pub fn admits(&self, bound: Energy) -> bool {
        self.next.is_none_or(|(_, value)| bound <= value)
    }
    fn beats((g, v): (usize, Energy), incumbent: Option<(usize, Energy)>) -> bool {
        incumbent.is_none_or(|(h, w)| v < w || (v == w && g < h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offers_keep_two_cheapest_lowest_index_first() {
        let mut offers = Offers::default();
        offers.consider(4, 3.);
        offers.consider(2, 1.);
        offers.consider(7, 1.);
        offers.consider(1, 1.);
        assert_eq!(offers.best(), Some((1, 1.)));
        assert_eq!(offers.next(), Some((2, 1.)));
        assert!(offers.admits(1.));
        assert!(!offers.admits(1.5));
    }

    #[test]
    fn selling_evicts_previous_owner() {
        let mut good = Good::default();
        assert_eq!(good.sell(3, 1.), None);
        assert_eq!(good.sell(5, 2.), Some(3));
        assert_eq!(good.owner(), Some(5));
        assert_eq!(good.price(), 2.);
    }
}
