//! PdeError: Unified error type for cell-pde-mesh public APIs
//!
//! Every fault raised while adapting a cell population to a PDE solve is
//! reported through this type. Callers are expected to treat all of them as
//! fatal for the current run: they signal either a feature gap
//! (`UnsupportedConfiguration`) or a broken invariant between the mesh and the
//! population it was built from.

use crate::population::cell::CellId;
use thiserror::Error;

/// Unified error type for cell-pde-mesh operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PdeError {
    /// The population is of a supported kind but in a configuration that
    /// cannot be solved on (e.g. a mesh with ghost nodes).
    #[error("Unsupported configuration: {0}")]
    UnsupportedConfiguration(String),
    /// A synthesized mesh does not have one node per live cell.
    #[error("Internal consistency: mesh has {nodes} nodes but population has {cells} live cells")]
    NodeCountMismatch { nodes: usize, cells: usize },
    /// The node index computed for a cell is outside the solution vector.
    #[error("Internal consistency: cell {cell} maps to node {index}, but the solution has {len} entries")]
    NodeIndexOutOfRange { cell: CellId, index: usize, len: usize },
    /// Two synthesized nodes share an index.
    #[error("Internal consistency: duplicate node index {0}")]
    DuplicateNodeIndex(usize),
    /// Node indices are not contiguous from zero.
    #[error("Internal consistency: expected node index {expected}, found {found}")]
    NodeIndexGap { expected: usize, found: usize },
    /// An element references a node that does not exist.
    #[error("Internal consistency: element {element} references missing node {node}")]
    MissingElementNode { element: usize, node: usize },
    /// Operation requires a finite-element mesh, but none has been built.
    #[error("No finite-element mesh has been generated yet")]
    MissingMesh,
    /// Operation requires a PDE solution, but none has been supplied.
    #[error("No PDE solution is available")]
    MissingSolution,
    /// The replicated solution does not match the expected length.
    #[error("Solution length mismatch: expected {expected}, found {found}")]
    SolutionLengthMismatch { expected: usize, found: usize },
    /// Shard layout of a distributed vector is inconsistent.
    #[error("Invalid distributed layout: {0}")]
    InvalidLayout(String),
    /// Communication failure while replicating.
    #[error("Communication error with rank {neighbor}: {reason}")]
    CommError { neighbor: usize, reason: String },
    /// Geometry that cannot be represented (wrong arity, non-finite coordinates, ...).
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    /// Rejected configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Malformed mesh file.
    #[error("Mesh I/O parse error: {0}")]
    MeshIoParse(String),
    /// Underlying filesystem failure.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for PdeError {
    fn from(err: std::io::Error) -> Self {
        PdeError::Io(err.to_string())
    }
}
