//! Persistence diagrams and their partition by critical pair type.
//!
//! ## Core Types
//!
//! - [`CriticalPair`]: one persistence pair as supplied by the caller
//! - [`Kind`]: min-saddle, saddle-saddle or saddle-max partition
//! - [`Diagram`]: borrowed pairs of one kind with their original positions
//! - [`Partition`]: the three kind-diagrams of one raw input
//! - [`Point`]: a pair embedded in matching space
//! - [`Sample`]: persistence-sorted points ready for progressive matching
mod critical;
mod diagram;
mod kind;
mod pair;
mod partition;
mod point;
mod sample;

pub use critical::*;
pub use diagram::*;
pub use kind::*;
pub use pair::*;
pub use partition::*;
pub use point::*;
pub use sample::*;
