//! Message passing used to replicate distributed solutions.

pub mod communicator;
pub mod wire;

pub use communicator::{CommTag, Communicator, NoComm, Wait};
#[cfg(feature = "mpi-support")]
pub use communicator::MpiComm;
#[cfg(feature = "rayon")]
pub use communicator::RayonComm;
