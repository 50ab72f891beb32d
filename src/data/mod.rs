//! Data attached to cells and solution vectors exchanged with PDE solvers.

pub mod cell_data;
pub mod distributed_vector;

pub use cell_data::CellData;
pub use distributed_vector::{DistributedVector, ReplicatedVector};
