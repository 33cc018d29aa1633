//! K-means clustering of persistence diagrams.
//!
//! Diagrams are clustered around Wasserstein barycenters, with distances
//! accumulated over the active kinds.
//!
//! ## Core Types
//!
//! - [`Config`]: every knob of one clustering call
//! - [`Engine`]: the k-means state machine
//! - [`Report`]: labels, centroids, matchings, matrices and termination
//!
//! ## Algorithms
//!
//! - [`Elkan`]: triangle-inequality pruned assignment
//! - [`Barycenter`]: fixed point of matching and relocation
//! - [`Refinement`]: coarse-to-fine distance bounds over [`Schedule`] levels
//! - [`Matrices`]: diagram-to-diagram and diagram-to-centroid distances
mod barycenter;
mod bounds;
mod centroid;
mod config;
mod distances;
mod elkan;
mod engine;
mod error;
mod progressive;
mod report;
mod space;

pub use barycenter::*;
pub use bounds::*;
pub use centroid::*;
pub use config::*;
pub use distances::*;
pub use elkan::*;
pub use engine::*;
pub use error::*;
pub use progressive::*;
pub use report::*;
pub use space::*;
pub use tests::*;
