use super::*;
use crate::DEFAULT_SEED;
use crate::Energy;
use crate::GroundCost;
use crate::KMEANS_ITERATIONS;
use crate::Order;
use crate::Selector;
use serde::Deserialize;
use serde::Serialize;
use std::time::Duration;
use std::time::Instant;

/// Every knob of a clustering call, fixed for the duration of that call.
///
/// Built with the `with_*` methods from [`Config::default`] and checked by
/// [`Config::validate`] before any work starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Wasserstein order p.
    pub order: Order,
    /// Worker threads; 0 uses every core.
    pub threads: usize,
    /// Bound distances on persistence-truncated diagrams before matching in full.
    pub progressive: bool,
    /// Weight of birth/death against domain position in the ground cost.
    pub alpha: Energy,
    /// Position of a pair between its birth vertex (1) and death vertex (0).
    pub lambda: Energy,
    pub time_limit: Option<Duration>,
    pub kmeanspp: bool,
    /// Triangle-inequality pruning of the assignment step.
    pub accelerated: bool,
    pub clusters: usize,
    /// Run the full algorithm even where a shortcut applies.
    pub force: bool,
    /// Seed from `seed` rather than from the OS.
    pub deterministic: bool,
    pub seed: u64,
    pub selector: Selector,
    /// Stop once no centroid moves further than this.
    pub delta_limit: Option<Energy>,
    /// Iteration cap; reaching it is reported as a warning.
    pub iterations: usize,
    pub kdtree: bool,
    /// Assemble distance matrices after clustering.
    pub matrices: bool,
    /// Only fill diagram-to-diagram entries within a cluster.
    pub per_cluster: bool,
    /// Compute matrices at full resolution regardless of `progressive`.
    pub full_diagrams: bool,
    /// Report the matching of every diagram to its centroid.
    pub matchings: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            order: Order::W2,
            threads: 0,
            progressive: true,
            alpha: 1.,
            lambda: 0.5,
            time_limit: None,
            kmeanspp: false,
            accelerated: false,
            clusters: 1,
            force: false,
            deterministic: true,
            seed: DEFAULT_SEED,
            selector: Selector::All,
            delta_limit: None,
            iterations: KMEANS_ITERATIONS,
            kdtree: true,
            matrices: false,
            per_cluster: false,
            full_diagrams: false,
            matchings: true,
        }
    }
}

impl Config {
    pub fn with_order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }
    pub fn with_progressive(mut self, progressive: bool) -> Self {
        self.progressive = progressive;
        self
    }
    pub fn with_alpha(mut self, alpha: Energy) -> Self {
        self.alpha = alpha;
        self
    }
    pub fn with_lambda(mut self, lambda: Energy) -> Self {
        self.lambda = lambda;
        self
    }
    pub fn with_time_limit(mut self, time_limit: Option<Duration>) -> Self {
        self.time_limit = time_limit;
        self
    }
    pub fn with_kmeanspp(mut self, kmeanspp: bool) -> Self {
        self.kmeanspp = kmeanspp;
        self
    }
    pub fn with_accelerated(mut self, accelerated: bool) -> Self {
        self.accelerated = accelerated;
        self
    }
    pub fn with_clusters(mut self, clusters: usize) -> Self {
        self.clusters = clusters;
        self
    }
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
    pub fn with_deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
    pub fn with_selector(mut self, selector: Selector) -> Self {
        self.selector = selector;
        self
    }
    pub fn with_delta_limit(mut self, delta_limit: Option<Energy>) -> Self {
        self.delta_limit = delta_limit;
        self
    }
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }
    pub fn with_kdtree(mut self, kdtree: bool) -> Self {
        self.kdtree = kdtree;
        self
    }
    pub fn with_matrices(mut self, matrices: bool) -> Self {
        self.matrices = matrices;
        self
    }
    pub fn with_per_cluster(mut self, per_cluster: bool) -> Self {
        self.per_cluster = per_cluster;
        self
    }
    pub fn with_full_diagrams(mut self, full_diagrams: bool) -> Self {
        self.full_diagrams = full_diagrams;
        self
    }
    pub fn with_matchings(mut self, matchings: bool) -> Self {
        self.matchings = matchings;
        self
    }

    /// Check every value against `n` input diagrams.
    pub fn validate(&self, n: usize) -> Result<()> {
        if !(0. ..=1.).contains(&self.alpha) {
            return Err(Error::InvalidParameter {
                name: "alpha",
                message: format!("{} not in [0, 1]", self.alpha),
            });
        }
        if !(0. ..=1.).contains(&self.lambda) {
            return Err(Error::InvalidParameter {
                name: "lambda",
                message: format!("{} not in [0, 1]", self.lambda),
            });
        }
        if let Some(delta) = self.delta_limit {
            if !delta.is_finite() || delta < 0. {
                return Err(Error::InvalidParameter {
                    name: "delta_limit",
                    message: format!("{} is not a finite non-negative value", delta),
                });
            }
        }
        if self.clusters == 0 || self.clusters > n {
            return Err(Error::InvalidClusterCount {
                requested: self.clusters,
                n_items: n,
            });
        }
        Ok(())
    }

    /// Ground cost between points of two diagrams.
    pub fn metric(&self) -> GroundCost {
        GroundCost::new(self.order, self.alpha)
    }
    pub fn deadline(&self, start: Instant) -> Option<Instant> {
        self.time_limit.map(|limit| start + limit)
    }
    pub fn threads(&self) -> usize {
        match self.threads {
            0 => num_cpus::get(),
            n => n,
        }
    }
}
