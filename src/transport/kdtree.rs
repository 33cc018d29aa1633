use super::*;
use crate::Energy;
use crate::KDTREE_LEAF_SIZE;
use crate::Point;

/// Price-aware kd-tree over the real goods of an auction.
///
/// Each node keeps the bounding box of its goods and the lowest price among
/// them, so `metric.bound(query, box) + min price` lower-bounds the value of
/// every good below it. Searches for the two best goods are branch and bound
/// on that quantity. A leaf map lets a price change walk straight to the root.
#[derive(Debug, Clone)]
pub struct KdTree {
    nodes: Vec<Node>,
    items: Vec<usize>,
    leaf: Vec<usize>,
}

#[derive(Debug, Clone)]
struct Node {
    lo: [Energy; 5],
    hi: [Energy; 5],
    start: usize,
    end: usize,
    children: Option<(usize, usize)>,
    parent: Option<usize>,
    price: Energy,
}

impl KdTree {
    /// Build over `points`, splitting along the widest weighted axis.
    pub fn new(points: &[Point], metric: &GroundCost) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(2 * points.len() / KDTREE_LEAF_SIZE + 1),
            items: (0..points.len()).collect(),
            leaf: vec![0; points.len()],
        };
        if !points.is_empty() {
            tree.grow(points, &metric.weights(), None, 0, points.len());
        }
        tree
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn grow(
        &mut self,
        points: &[Point],
        weights: &[Energy; 5],
        parent: Option<usize>,
        start: usize,
        end: usize,
    ) -> usize {
        let mut lo = [Energy::INFINITY; 5];
        let mut hi = [Energy::NEG_INFINITY; 5];
        for axes in self.items[start..end].iter().map(|&i| points[i].axes()) {
            for d in 0..5 {
                lo[d] = lo[d].min(axes[d]);
                hi[d] = hi[d].max(axes[d]);
            }
        }
        let id = self.nodes.len();
        self.nodes.push(Node {
            lo,
            hi,
            start,
            end,
            children: None,
            parent,
            price: 0.,
        });
        let (axis, spread) = (0..5)
            .map(|d| (d, weights[d] * (hi[d] - lo[d])))
            .fold((0, 0.), |best, next| if next.1 > best.1 { next } else { best });
        if end - start <= KDTREE_LEAF_SIZE || spread <= 0. {
            for &i in &self.items[start..end] {
                self.leaf[i] = id;
            }
            return id;
        }
        let mid = start + (end - start) / 2;
        self.items[start..end].select_nth_unstable_by(mid - start, |&a, &b| {
            points[a].axes()[axis]
                .total_cmp(&points[b].axes()[axis])
                .then(a.cmp(&b))
        });
        let l = self.grow(points, weights, Some(id), start, mid);
        let r = self.grow(points, weights, Some(id), mid, end);
        self.nodes[id].children = Some((l, r));
        id
    }

    /// Propagate the current price of `good` up to the root.
    pub fn reprice(&mut self, good: usize, goods: &[Good]) {
        let mut id = self.leaf[good];
        let (start, end) = (self.nodes[id].start, self.nodes[id].end);
        self.nodes[id].price = self.items[start..end]
            .iter()
            .map(|&i| goods[i].price())
            .fold(Energy::INFINITY, Energy::min);
        while let Some(parent) = self.nodes[id].parent {
            let (l, r) = self.nodes[parent].children.expect("parent has children");
            self.nodes[parent].price = self.nodes[l].price.min(self.nodes[r].price);
            id = parent;
        }
    }

    /// Fold the goods below the root into `offers`, visiting only subtrees
    /// that could still beat the second-best value.
    pub fn search(
        &self,
        query: &Point,
        points: &[Point],
        goods: &[Good],
        metric: &GroundCost,
        offers: &mut Offers,
    ) {
        if self.nodes.is_empty() {
            return;
        }
        let bound = |id: usize| {
            let node = &self.nodes[id];
            metric.bound(query, &node.lo, &node.hi) + node.price
        };
        let mut stack = vec![(0, bound(0))];
        while let Some((id, lower)) = stack.pop() {
            if !offers.admits(lower) {
                continue;
            }
            let node = &self.nodes[id];
            match node.children {
                None => {
                    for &g in &self.items[node.start..node.end] {
                        offers.consider(g, metric.distance(query, &points[g]) + goods[g].price());
                    }
                }
                Some((l, r)) => {
                    let (bl, br) = (bound(l), bound(r));
                    if bl <= br {
                        stack.push((r, br));
                        stack.push((l, bl));
                    } else {
                        stack.push((l, bl));
                        stack.push((r, br));
                    }
                }
            }
        }
    }
}
