#![cfg_attr(docsrs, feature(doc_cfg))]
//! # cell-pde-mesh
//!
//! cell-pde-mesh lets a PDE solver run on a cell population whose geometry
//! changes every time step. Before each solve it builds a finite-element mesh
//! consistent with the current cell positions; after the solve it samples the
//! solution back into each cell's data and periodically writes the field to a
//! VTK file.
//!
//! ## Features
//! - Six population representations behind one closed enum: mesh-based (with
//!   or without ghost nodes), node-based, vertex-based, lattice-based (Potts)
//!   and site-based (cellular automaton)
//! - Delaunay meshing of synthesized node sets in any dimension
//! - Explicit borrowed/owned mesh handles
//! - Pluggable communication backends (serial, Rayon, MPI) for replicating
//!   distributed solutions
//! - Legacy VTK output and input
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! cell-pde-mesh = "0.3"
//! # Optional features:
//! # features = ["mpi-support"]
//! ```
//!
//! Cargo features:
//! - `vtk` (default): snapshot output; without it snapshots are skipped.
//! - `rayon` (default): in-process [`RayonComm`](algs::communicator::RayonComm) rank groups.
//! - `mpi-support`: [`MpiComm`](algs::communicator::MpiComm) over `MPI_COMM_WORLD`.
//! - `strict-invariants` / `check-invariants`: validate mesh invariants in
//!   release builds too.

pub mod algs;
pub mod data;
pub mod debug_invariants;
pub mod io;
pub mod mesh;
pub mod modifier;
pub mod pde_error;
pub mod population;
pub mod topology;

pub use debug_invariants::DebugInvariants;
pub use pde_error::PdeError;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::communicator::{Communicator, NoComm};
    #[cfg(feature = "mpi-support")]
    pub use crate::algs::communicator::MpiComm;
    #[cfg(feature = "rayon")]
    pub use crate::algs::communicator::RayonComm;
    pub use crate::data::{CellData, DistributedVector, ReplicatedVector};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::mesh::{FeMesh, FeMeshHandle, VertexMesh};
    pub use crate::modifier::{
        GrowingDomainPdeModifier, ModifierConfig, PdeSolver, build_fe_mesh, scatter_to_cells,
        snapshot_file_name, tet_node_indices, write_snapshot,
    };
    pub use crate::pde_error::PdeError;
    pub use crate::population::{
        Cell, CellId, CellPopulation, Lattice, LatticeBasedCellPopulation,
        MeshBasedCellPopulation, MeshBasedWithGhostNodesCellPopulation, NodeBasedCellPopulation,
        Population, SiteBasedCellPopulation, VertexBasedCellPopulation,
    };
    pub use crate::topology::{CellType, Node};
}
