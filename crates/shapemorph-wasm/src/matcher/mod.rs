//! Pairing pieces between two shapes for least visible movement.
//!
//! Both the correspondence and the ring alignment are greedy heuristics:
//! each source element takes the nearest unused target in order, and each
//! ring takes the rotation with the smallest total vertex distance. Neither
//! is a globally optimal assignment, and the resulting motion depends on
//! that greedy order.

pub mod align;
pub mod centroids;

pub use align::*;
pub use centroids::*;
