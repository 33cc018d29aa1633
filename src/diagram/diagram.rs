use super::*;

/// The pairs of one raw input that fall into one partition.
///
/// Pairs are borrowed from the caller's raw diagram in insertion order.
/// `index[k]` is the position of `pairs[k]` in the raw, unpartitioned diagram,
/// which is what lets matchings be reported against original pair identities.
#[derive(Debug, Clone, Default)]
pub struct Diagram<'a> {
    pairs: Vec<&'a CriticalPair>,
    index: Vec<usize>,
}

impl<'a> Diagram<'a> {
    pub fn index(&self) -> &[usize] {
        &self.index
    }
    pub fn len(&self) -> usize {
        self.pairs.len()
    }
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
    /// Appends a pair found at position `i` of the raw diagram.
    pub fn push(&mut self, i: usize, pair: &'a CriticalPair) {
        self.pairs.push(pair);
        self.index.push(i);
    }
    /// Iterates over (original index, pair).
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a CriticalPair)> + '_ {
        self.index.iter().copied().zip(self.pairs.iter().copied())
    }
}
