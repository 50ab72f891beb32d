//! Geometric primitives: nodes and element types.

pub mod cell_type;
pub mod node;

pub use cell_type::CellType;
pub use node::Node;
