//! Triangulation, face adjacency and collapsing.

pub mod collapse;
pub mod topology;
pub mod triangulate;
pub mod types;

pub use collapse::*;
pub use topology::*;
pub use triangulate::*;
pub use types::*;
