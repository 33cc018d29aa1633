use super::*;
use crate::Energy;
use crate::Kind;
use crate::Matching;
use crate::Sample;
use rand::Rng;
use rand::SeedableRng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::SmallRng;
use rayon::prelude::*;
use std::time::Instant;

/// K-means over diagram space.
///
/// Holds the samples being clustered, the current centroids and the Elkan
/// bounds that double as the current assignment. One iteration:
///
/// 1. recompute every cluster's barycenter from its members
/// 2. measure how far each centroid drifted and loosen bounds accordingly
/// 3. reassign every diagram, pruned by bounds when accelerated
/// 4. reseed clusters left empty
///
/// An iteration is only committed if it finishes before the deadline, so an
/// interrupted run returns the last complete assignment.
pub struct Engine<'a, 'b> {
    config: &'b Config,
    space: &'b Space<'a>,
    samples: &'b [Sample],
    schedule: Schedule,
    centroids: Vec<Centroid>,
    bounds: Vec<Bounds>,
    deadline: Option<Instant>,
}

/// How a clustering run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub termination: Termination,
    pub warning: Option<Warning>,
    pub iterations: usize,
}

impl<'a, 'b> Engine<'a, 'b> {
    pub fn new(
        config: &'b Config,
        space: &'b Space<'a>,
        samples: &'b [Sample],
        deadline: Option<Instant>,
    ) -> Self {
        let peak = samples.iter().map(Sample::peak).fold(0., Energy::max);
        Self {
            config,
            space,
            samples,
            schedule: Schedule::new(peak, config.progressive),
            centroids: Vec::new(),
            bounds: Vec::new(),
            deadline,
        }
    }

    pub fn centroids(&self) -> &[Centroid] {
        &self.centroids
    }
    pub fn labels(&self) -> Vec<usize> {
        self.bounds.iter().map(Bounds::j).collect()
    }
    fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
    fn refinement(&self) -> Refinement<'a, '_> {
        Refinement::new(self.space, &self.schedule)
    }

    /// Run to termination, leaving labels and centroids in place.
    pub fn cluster(&mut self) -> Outcome {
        let (n, k) = (self.samples.len(), self.config.clusters);
        if !self.config.force && k == n {
            log::info!("{:<32}{:<32}", "kmeans shortcut", "one cluster per diagram");
            self.centroids = self.samples.iter().map(Centroid::from).collect();
            self.bounds = (0..n).map(|i| Bounds::from((i, vec![0.; k]))).collect();
            return Outcome {
                termination: Termination::Shortcut,
                warning: None,
                iterations: 0,
            };
        }
        let ref mut rng = if self.config.deterministic {
            SmallRng::seed_from_u64(self.config.seed)
        } else {
            SmallRng::from_os_rng()
        };
        log::info!("{:<32}{:<32}", "kmeans initializing", k);
        self.centroids = self.init_kmeans(rng);
        if !self.config.force && k == 1 {
            log::info!("{:<32}{:<32}", "kmeans shortcut", "single barycenter");
            self.centroids = self.barycenters(&vec![0; n]);
            self.bounds = (0..n)
                .into_par_iter()
                .map(|i| Bounds::from((0, vec![self.distance(i, 0)])))
                .collect();
            return Outcome {
                termination: Termination::Shortcut,
                warning: None,
                iterations: 0,
            };
        }
        log::info!("{:<32}{:<32}", "kmeans bounding", n);
        let mut bounds = self.init_bounds();
        self.heal(&mut bounds);
        self.bounds = bounds;
        log::info!("{:<32}{:<32}", "kmeans iterating", self.describe());
        self.iterate()
    }

    fn iterate(&mut self) -> Outcome {
        let mut iterations = 0;
        loop {
            if self.expired() {
                return self.interrupt(Warning::Deadline, Termination::Deadline, iterations);
            }
            if iterations >= self.config.iterations {
                return self.interrupt(Warning::IterationCap, Termination::IterationCap, iterations);
            }
            let labels = self.labels();
            let news = self.barycenters(&labels);
            let drift = self.drift(&news);
            let previous = std::mem::replace(&mut self.centroids, news);
            let mut next = self.bounds.clone();
            next.par_iter_mut().for_each(|b| b.update(&drift));
            if self.config.accelerated {
                self.step_elkan(&mut next);
            } else {
                self.step_naive(&mut next);
            }
            self.heal(&mut next);
            if self.expired() {
                self.centroids = previous;
                return self.interrupt(Warning::Deadline, Termination::Deadline, iterations);
            }
            self.bounds = next;
            iterations += 1;
            let moved = labels
                .iter()
                .zip(self.labels())
                .filter(|(a, b)| **a != *b)
                .count();
            let delta = drift.iter().copied().fold(0., Energy::max);
            if log::log_enabled!(log::Level::Debug) {
                log::debug!(
                    "{:<32}{:<32}",
                    format!("kmeans iteration {}", iterations),
                    format!("moved {} drift {:.3e} rms {:.3e}", moved, delta, self.rms(&self.bounds))
                );
            }
            if self.config.delta_limit.is_some_and(|limit| delta < limit) {
                log::info!("{:<32}{:<32}", "kmeans settled", iterations);
                return Outcome {
                    termination: Termination::Delta,
                    warning: None,
                    iterations,
                };
            }
            if moved == 0 {
                log::info!("{:<32}{:<32}", "kmeans stable", iterations);
                return Outcome {
                    termination: Termination::Stable,
                    warning: None,
                    iterations,
                };
            }
        }
    }

    fn interrupt(&self, warning: Warning, termination: Termination, iterations: usize) -> Outcome {
        log::warn!("{:<32}{:<32}", warning, iterations);
        Outcome {
            termination,
            warning: Some(warning),
            iterations,
        }
    }

    fn describe(&self) -> String {
        let sizes = sizes(&self.labels(), self.config.clusters);
        format!("sizes {:?}", sizes)
    }

    /// Initial centroids: copies of K distinct diagrams.
    fn init_kmeans(&self, rng: &mut SmallRng) -> Vec<Centroid> {
        let (n, k) = (self.samples.len(), self.config.clusters);
        let seeds = if self.config.kmeanspp {
            self.kmeanspp(rng)
        } else {
            rand::seq::index::sample(rng, n, k).into_vec()
        };
        log::debug!("{:<32}{:<32}", "kmeans seeds", format!("{:?}", seeds));
        seeds
            .into_iter()
            .map(|i| Centroid::from(&self.samples[i]))
            .collect()
    }

    /// k-means++: each new seed drawn with probability proportional to its
    /// squared distance from the nearest seed so far.
    fn kmeanspp(&self, rng: &mut SmallRng) -> Vec<usize> {
        let (n, k) = (self.samples.len(), self.config.clusters);
        let first = rng.random_range(0..n);
        let mut seeds = vec![first];
        let mut potentials = self.potentials(first);
        while seeds.len() < k {
            let next = match WeightedIndex::new(potentials.iter()) {
                Ok(weights) => weights.sample(rng),
                Err(_) => (0..n)
                    .find(|i| !seeds.contains(i))
                    .expect("fewer seeds than diagrams"),
            };
            seeds.push(next);
            potentials = potentials
                .iter()
                .zip(self.potentials(next))
                .map(|(d0, d1)| Energy::min(*d0, d1))
                .collect();
            potentials[next] = 0.;
        }
        seeds
    }

    /// Squared distance from every diagram to diagram `x`.
    fn potentials(&self, x: usize) -> Vec<Energy> {
        let ref seed = self.samples[x];
        self.samples
            .par_iter()
            .map(|sample| self.space.distance(sample.parts(), seed.parts()))
            .map(|d| d * d)
            .collect()
    }

    /// Barycenter of every cluster under `labels`. Empty clusters keep their centroid.
    fn barycenters(&self, labels: &[usize]) -> Vec<Centroid> {
        (0..self.config.clusters)
            .into_par_iter()
            .map(|c| {
                let members = labels
                    .iter()
                    .enumerate()
                    .filter(|(_, l)| **l == c)
                    .map(|(i, _)| &self.samples[i])
                    .collect::<Vec<_>>();
                if members.is_empty() {
                    return self.centroids[c].clone();
                }
                Centroid::from(Kind::ALL.map(|kind| {
                    if self.space.active().contains(kind) {
                        let points = members.iter().map(|s| s.points(kind)).collect();
                        Barycenter::new(self.space, points).fit(self.centroids[c].points(kind))
                    } else {
                        Vec::new()
                    }
                }))
            })
            .collect()
    }

    /// How far each centroid moved.
    fn drift(&self, news: &[Centroid]) -> Vec<Energy> {
        self.centroids
            .par_iter()
            .zip(news)
            .map(|(old, new)| self.space.distance(old.parts(), new.parts()))
            .collect()
    }

    /// Reseed empty clusters with the diagram farthest from its own centroid,
    /// taken from clusters that can spare one.
    fn heal(&mut self, bounds: &mut [Bounds]) {
        let k = self.config.clusters;
        let mut sizes = sizes(&bounds.iter().map(Bounds::j).collect::<Vec<_>>(), k);
        while let Some(empty) = sizes.iter().position(|&s| s == 0) {
            let donor = bounds
                .par_iter()
                .enumerate()
                .filter(|(_, b)| sizes[b.j()] >= 2)
                .map(|(i, b)| (i, self.distance(i, b.j())))
                .collect::<Vec<_>>()
                .into_iter()
                .fold(None, |best: Option<(usize, Energy)>, (i, d)| match best {
                    Some((_, e)) if e >= d => best,
                    _ => Some((i, d)),
                });
            let Some((i, distance)) = donor else {
                break;
            };
            log::debug!(
                "{:<32}{:<32}",
                format!("healing cluster {}", empty),
                format!("diagram {} at {:.3e}", i, distance)
            );
            sizes[bounds[i].j()] -= 1;
            sizes[empty] += 1;
            self.centroids[empty] = Centroid::from(&self.samples[i]);
            bounds.iter_mut().for_each(|b| b.forget(empty));
            bounds[i].assign(0., empty);
        }
    }

    /// Matching of every diagram to its centroid, sources mapped back to raw
    /// input positions.
    pub fn matchings(&self, space: &Space) -> Vec<[Vec<Matching>; 3]> {
        self.samples
            .par_iter()
            .zip(self.labels())
            .map(|(sample, label)| {
                let transports = space.transports(sample.parts(), self.centroids[label].parts());
                Kind::ALL.map(|kind| {
                    let origin = sample.origin(kind);
                    transports[kind.index()]
                        .matchings
                        .iter()
                        .map(|m| Matching {
                            source: m.source.map(|s| origin[s]),
                            ..*m
                        })
                        .collect()
                })
            })
            .collect()
    }

    /// Distance matrices, refined progressively unless full diagrams are required.
    pub fn matrices(&self, space: &Space) -> Matrices {
        let schedule = if self.config.full_diagrams {
            Schedule::full()
        } else {
            self.schedule.clone()
        };
        let refinement = Refinement::new(space, &schedule);
        Matrices::assemble(
            &refinement,
            space,
            self.samples,
            &self.centroids,
            &self.labels(),
            self.config.per_cluster,
        )
    }
}

impl Elkan for Engine<'_, '_> {
    fn n(&self) -> usize {
        self.samples.len()
    }
    fn k(&self) -> usize {
        self.centroids.len()
    }
    fn distance(&self, i: usize, j: usize) -> Energy {
        self.space
            .distance(self.samples[i].parts(), self.centroids[j].parts())
    }
    fn separation(&self, a: usize, b: usize) -> Energy {
        self.space
            .distance(self.centroids[a].parts(), self.centroids[b].parts())
    }
    fn nearest(&self, i: usize, candidates: &[usize], incumbent: Option<(usize, Energy)>) -> Nearest {
        self.refinement()
            .nearest(&self.samples[i], &self.centroids, candidates, incumbent)
    }
}
