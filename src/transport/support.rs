/// Marker trait for the elements being transported.
///
/// The `Clone` bound lets transport plans copy support elements when
/// building matchings and barycenters.
pub trait Support: Clone {}

impl Support for crate::Point {}
