//! Core types for the planarity kernel.

pub mod vertex;
pub mod edge;

pub use vertex::VertexId;
pub use edge::Edge;
