//! Wasserstein distances, barycenters and k-means clustering of persistence diagrams.
//!
//! A persistence diagram is a multiset of (birth, death) pairs produced by topological
//! analysis of a scalar field. This crate partitions diagrams by critical pair type,
//! matches them with an auction algorithm under an order-p Wasserstein cost, and
//! clusters whole collections of diagrams around Wasserstein barycenters.
//!
//! ## Pipeline
//!
//! 1. **Partition**: split every raw diagram into min-saddle, saddle-saddle and
//!    saddle-max sub-diagrams, remembering where each pair came from
//! 2. **Match**: solve the augmented assignment problem between two diagrams
//!    (every point may also vanish into the diagonal)
//! 3. **Cluster**: k-means over diagram space with barycenter centroids,
//!    optionally seeded by k-means++, pruned by Elkan bounds and progressive refinement
//! 4. **Assemble**: distance matrices and per-diagram matchings for the caller
//!
//! ## Modules
//!
//! - [`diagram`]: critical pairs, partitions and matching-space points
//! - [`transport`]: ground costs, auction, exact fallbacks, matchings
//! - [`clustering`]: configuration, k-means engine, barycenters, reports
pub mod clustering;
pub mod diagram;
pub mod transport;

pub use clustering::*;
pub use diagram::*;
pub use transport::*;

use rayon::prelude::*;
use std::time::Instant;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Transport costs, distances, prices and bounds.
pub type Energy = f64;
/// Scalar values carried by critical points (birth, death, persistence).
pub type Persistence = f64;

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for testing and benchmarking.
pub trait Arbitrary {
    /// Generate a uniformly random instance.
    fn random() -> Self;
}

// ============================================================================
// AUCTION
// Gauss-Seidel auction with ε-scaling over the augmented bipartite problem.
// ============================================================================
/// Divisor applied to ε between scaling phases.
pub const AUCTION_EPSILON_DECAY: Energy = 5.0;
/// Initial ε as a fraction of the largest possible edge cost.
pub const AUCTION_EPSILON_START: Energy = 0.25;
/// Final ε times the number of bidders, relative to the largest edge cost.
pub const AUCTION_PRECISION: Energy = 1e-9;
/// Bid budget per phase is this many bids per squared bidder count.
pub const AUCTION_BID_FACTOR: usize = 8;
/// Lower floor on the per-phase bid budget.
pub const AUCTION_BID_FLOOR: usize = 1 << 16;

// ============================================================================
// KD-TREE
// Price-aware spatial index over goods; only pays off past a few dozen goods.
// ============================================================================
/// Maximum goods stored in one leaf.
pub const KDTREE_LEAF_SIZE: usize = 8;
/// Below this many real goods a linear scan beats the tree.
pub const KDTREE_MIN_GOODS: usize = 32;

// ============================================================================
// BARYCENTER
// Fixed point of "match members to barycenter, move barycenter to the mean".
// ============================================================================
/// Maximum relocation rounds per barycenter update.
pub const BARYCENTER_ITERATIONS: usize = 32;
/// Relative improvement below which relocation stops.
pub const BARYCENTER_TOLERANCE: Energy = 1e-9;

// ============================================================================
// K-MEANS CLUSTERING
// ============================================================================
/// Hard cap on assignment/update iterations.
pub const KMEANS_ITERATIONS: usize = 100;
/// Seed used when the caller asks for a deterministic run without choosing one.
pub const DEFAULT_SEED: u64 = 0x5EED_D1A6;

// ============================================================================
// PROGRESSIVE REFINEMENT
// Coarse-to-fine persistence thresholds: max / 2, max / 4, ..., then everything.
// ============================================================================
/// Number of truncated levels before full resolution.
pub const PROGRESSIVE_LEVELS: usize = 8;
/// Relative bound width at which a matrix entry stops refining.
pub const PROGRESSIVE_TOLERANCE: Energy = 1e-6;

// ============================================================================
// ENTRY POINT
// ============================================================================
/// Cluster `diagrams` into `config.clusters` groups.
///
/// Validates the configuration, then runs the whole pipeline on a dedicated
/// pool of `config.threads()` workers. Hitting the time limit or the
/// iteration cap is not an error: the report carries a warning instead.
pub fn execute(diagrams: &[Vec<CriticalPair>], config: &Config) -> Result<Report> {
    let start = Instant::now();
    let n = diagrams.len();
    if n == 0 {
        return Err(Error::NoDiagrams);
    }
    config.validate(n)?;
    if !diagrams.iter().flatten().any(CriticalPair::is_persistent) {
        return Err(Error::EmptyInput { n });
    }
    log::info!("{:<32}{:<32}", "clustering diagrams", n);
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads())
        .build()?
        .install(|| Ok(cluster(diagrams, config, start)))
}

fn cluster(diagrams: &[Vec<CriticalPair>], config: &Config, start: Instant) -> Report {
    let (partitions, active) = Partition::all(diagrams, config.selector);
    if active.is_empty() {
        log::warn!("{:<32}{:<32}", "nothing to cluster", config.selector);
        return Report::trivial(diagrams.len(), config, start.elapsed());
    }
    let deadline = config.deadline(start);
    let ref metric = config.metric();
    let matcher = Wasserstein::new(metric)
        .indexed(config.kdtree)
        .deadline(deadline);
    let ref space = Space::new(matcher, active);
    let samples = partitions
        .par_iter()
        .map(|partition| Sample::new(partition, metric, config.lambda))
        .collect::<Vec<_>>();
    let mut engine = Engine::new(config, space, &samples, deadline);
    let outcome = engine.cluster();
    let ref output = Space::new(Wasserstein::new(metric).indexed(config.kdtree), active);
    let matchings = config.matchings.then(|| engine.matchings(output));
    let matrices = config.matrices.then(|| engine.matrices(output));
    let fallbacks = space.fallbacks() + output.fallbacks();
    if fallbacks > 0 {
        log::warn!("{:<32}{:<32}", "exact fallbacks", fallbacks);
    }
    let labels = engine.labels();
    let report = Report {
        sizes: sizes(&labels, config.clusters),
        labels,
        centroids: engine.centroids().to_vec(),
        matchings,
        matrices,
        active: active.kinds().collect(),
        termination: outcome.termination,
        warning: outcome.warning,
        iterations: outcome.iterations,
        fallbacks,
        elapsed: start.elapsed(),
    };
    log::info!("{:<32}{:<32}", "clustering finished", report.termination);
    report
}

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize terminal logging at the given level.
#[cfg(feature = "cli")]
pub fn log(level: log::LevelFilter) {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let term = simplelog::TermLogger::new(
        level,
        config,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term]).expect("initialize logger");
}
