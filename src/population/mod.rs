//! Cell populations in their six spatial representations.
//!
//! [`CellPopulation`] is a closed enum: every consumer that needs to treat
//! representations differently (mesh construction, node-index mapping)
//! matches on it exhaustively, so adding a representation is a compile-time
//! decision point.
//!
//! All representations share the [`Population`] trait, whose [`Population::sites`]
//! iteration is the single canonical cell order used both when a mesh is
//! synthesized and when solution values are scattered back.

pub mod cell;
pub mod lattice;
pub mod lattice_based;
pub mod mesh_based;
pub mod node_based;
pub mod site_based;
pub mod vertex_based;

pub use cell::{Cell, CellId};
pub use lattice::Lattice;
pub use lattice_based::LatticeBasedCellPopulation;
pub use mesh_based::{MeshBasedCellPopulation, MeshBasedWithGhostNodesCellPopulation};
pub use node_based::NodeBasedCellPopulation;
pub use site_based::SiteBasedCellPopulation;
pub use vertex_based::VertexBasedCellPopulation;

/// One live cell as seen by the canonical iteration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellSite<const D: usize> {
    /// Position of the cell in iteration order.
    pub ordinal: usize,
    pub cell: CellId,
    /// The population's own location index for the cell.
    pub location_index: usize,
    /// Location of the cell centre.
    pub centre: [f64; D],
}

/// Capabilities every population representation exposes.
///
/// `ordinal` arguments index the canonical cell order and must be smaller
/// than [`Population::num_real_cells`].
///
/// # Panics
///
/// [`location_index`](Population::location_index) and
/// [`location_of_cell_centre`](Population::location_of_cell_centre) panic on
/// an out-of-range `ordinal` in every implementation. Callers iterate through
/// [`sites`](Population::sites), which never produces one.
pub trait Population<const D: usize> {
    /// Live cells in canonical order.
    fn cells(&self) -> &[Cell];

    /// Live cells in canonical order, for updating their data.
    fn cells_mut(&mut self) -> &mut [Cell];

    /// Location index of the cell at `ordinal`.
    fn location_index(&self, ordinal: usize) -> usize;

    /// Centre of the cell at `ordinal`.
    fn location_of_cell_centre(&self, ordinal: usize) -> [f64; D];

    /// Number of nodes (or lattice sites) of the underlying spatial structure.
    fn num_nodes(&self) -> usize;

    /// Number of live cells.
    fn num_real_cells(&self) -> usize {
        self.cells().len()
    }

    /// Canonical iteration over live cells.
    fn sites(&self) -> impl Iterator<Item = CellSite<D>> + '_ {
        self.cells()
            .iter()
            .enumerate()
            .map(move |(ordinal, cell)| CellSite {
                ordinal,
                cell: cell.id(),
                location_index: self.location_index(ordinal),
                centre: self.location_of_cell_centre(ordinal),
            })
    }
}

/// A cell population in one of the supported representations.
#[derive(Debug)]
pub enum CellPopulation<const D: usize> {
    /// Cells are nodes of a finite-element mesh.
    MeshBased(MeshBasedCellPopulation<D>),
    /// As `MeshBased`, with extra non-cell nodes for boundary bookkeeping.
    MeshBasedWithGhostNodes(MeshBasedWithGhostNodesCellPopulation<D>),
    /// Off-lattice point cloud.
    NodeBased(NodeBasedCellPopulation<D>),
    /// Polygonal cells sharing vertices.
    VertexBased(VertexBasedCellPopulation<D>),
    /// Cellular Potts model: each cell covers a set of lattice sites.
    LatticeBased(LatticeBasedCellPopulation<D>),
    /// Cellular automaton: each cell occupies one lattice site.
    SiteBased(SiteBasedCellPopulation<D>),
}

macro_rules! delegate {
    ($self:expr, $p:ident => $body:expr) => {
        match $self {
            CellPopulation::MeshBased($p) => $body,
            CellPopulation::MeshBasedWithGhostNodes($p) => $body,
            CellPopulation::NodeBased($p) => $body,
            CellPopulation::VertexBased($p) => $body,
            CellPopulation::LatticeBased($p) => $body,
            CellPopulation::SiteBased($p) => $body,
        }
    };
}

impl<const D: usize> CellPopulation<D> {
    /// Short name of the representation, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            CellPopulation::MeshBased(_) => "mesh-based",
            CellPopulation::MeshBasedWithGhostNodes(_) => "mesh-based with ghost nodes",
            CellPopulation::NodeBased(_) => "node-based",
            CellPopulation::VertexBased(_) => "vertex-based",
            CellPopulation::LatticeBased(_) => "lattice-based",
            CellPopulation::SiteBased(_) => "site-based",
        }
    }
}

impl<const D: usize> Population<D> for CellPopulation<D> {
    fn cells(&self) -> &[Cell] {
        delegate!(self, p => p.cells())
    }

    fn cells_mut(&mut self) -> &mut [Cell] {
        delegate!(self, p => p.cells_mut())
    }

    fn location_index(&self, ordinal: usize) -> usize {
        delegate!(self, p => p.location_index(ordinal))
    }

    fn location_of_cell_centre(&self, ordinal: usize) -> [f64; D] {
        delegate!(self, p => p.location_of_cell_centre(ordinal))
    }

    fn num_nodes(&self) -> usize {
        delegate!(self, p => p.num_nodes())
    }
}

impl<const D: usize> From<MeshBasedCellPopulation<D>> for CellPopulation<D> {
    fn from(p: MeshBasedCellPopulation<D>) -> Self {
        CellPopulation::MeshBased(p)
    }
}

impl<const D: usize> From<MeshBasedWithGhostNodesCellPopulation<D>> for CellPopulation<D> {
    fn from(p: MeshBasedWithGhostNodesCellPopulation<D>) -> Self {
        CellPopulation::MeshBasedWithGhostNodes(p)
    }
}

impl<const D: usize> From<NodeBasedCellPopulation<D>> for CellPopulation<D> {
    fn from(p: NodeBasedCellPopulation<D>) -> Self {
        CellPopulation::NodeBased(p)
    }
}

impl<const D: usize> From<VertexBasedCellPopulation<D>> for CellPopulation<D> {
    fn from(p: VertexBasedCellPopulation<D>) -> Self {
        CellPopulation::VertexBased(p)
    }
}

impl<const D: usize> From<LatticeBasedCellPopulation<D>> for CellPopulation<D> {
    fn from(p: LatticeBasedCellPopulation<D>) -> Self {
        CellPopulation::LatticeBased(p)
    }
}

impl<const D: usize> From<SiteBasedCellPopulation<D>> for CellPopulation<D> {
    fn from(p: SiteBasedCellPopulation<D>) -> Self {
        CellPopulation::SiteBased(p)
    }
}
