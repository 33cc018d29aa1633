//! Optimal transport between persistence diagrams.
//!
//! Two diagrams are compared by the augmented assignment problem: every point of
//! either diagram is matched to a point of the other or sent to the diagonal.
//! The total cost of the best such matching, under an order-p ground cost, is
//! the Wasserstein distance between the diagrams.
//!
//! ## Algorithms
//!
//! - [`Auction`]: Gauss-Seidel auction with ε-scaling, optionally driven by a [`KdTree`]
//! - [`Hungarian`]: exact O(n³) assignment, used when an auction degenerates
//! - [`Bottleneck`]: exact minimax matching for p = ∞
//!
//! ## Core Types
//!
//! - [`Measure`]: ground cost between points and to the diagonal
//! - [`Coupling`]: a solved (or solvable) matching between two diagrams
//! - [`Bipartite`]: the augmented problem with bidders, goods and diagonal copies
//! - [`Wasserstein`]: picks the right algorithm and handles trivial inputs
mod auction;
mod bidder;
mod bipartite;
mod bottleneck;
mod cost;
mod coupling;
mod hungarian;
mod kdtree;
mod matching;
mod measure;
mod order;
mod support;
mod wasserstein;

pub use auction::*;
pub use bidder::*;
pub use bipartite::*;
pub use bottleneck::*;
pub use cost::*;
pub use coupling::*;
pub use hungarian::*;
pub use kdtree::*;
pub use matching::*;
pub use measure::*;
pub use order::*;
pub use support::*;
pub use wasserstein::*;
