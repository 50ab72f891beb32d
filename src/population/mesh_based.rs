//! Mesh-based populations: every cell is a node of a finite-element mesh.
//!
//! The mesh is held behind an `Arc` so a PDE modifier can solve on it
//! without copying. Mechanics that move nodes go through `Arc::make_mut`, so a
//! mesh still referenced by a modifier is never mutated underneath it.

use super::Population;
use super::cell::Cell;
use crate::mesh::FeMesh;
use crate::pde_error::PdeError;
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct MeshBasedCellPopulation<const D: usize> {
    mesh: Arc<FeMesh<D>>,
    cells: Vec<Cell>,
    cell_nodes: Vec<usize>,
}

impl<const D: usize> MeshBasedCellPopulation<D> {
    /// Attaches `cells[i]` to mesh node `cell_nodes[i]`. Every mesh node
    /// must carry exactly one cell.
    pub fn new(
        mesh: impl Into<Arc<FeMesh<D>>>,
        cells: Vec<Cell>,
        cell_nodes: Vec<usize>,
    ) -> Result<Self, PdeError> {
        let pop = Self::attach(mesh.into(), cells, cell_nodes)?;
        if pop.cell_nodes.len() != pop.mesh.num_nodes() {
            return Err(PdeError::NodeCountMismatch {
                nodes: pop.mesh.num_nodes(),
                cells: pop.cell_nodes.len(),
            });
        }
        Ok(pop)
    }

    /// Range and uniqueness checks only; nodes may be left without a cell.
    fn attach(
        mesh: Arc<FeMesh<D>>,
        cells: Vec<Cell>,
        cell_nodes: Vec<usize>,
    ) -> Result<Self, PdeError> {
        if cells.len() != cell_nodes.len() {
            return Err(PdeError::InvalidGeometry(format!(
                "{} cells but {} node assignments",
                cells.len(),
                cell_nodes.len()
            )));
        }
        let mut seen = BTreeSet::new();
        for &node in &cell_nodes {
            if node >= mesh.num_nodes() {
                return Err(PdeError::InvalidGeometry(format!(
                    "cell assigned to node {node}, mesh has {} nodes",
                    mesh.num_nodes()
                )));
            }
            if !seen.insert(node) {
                return Err(PdeError::DuplicateNodeIndex(node));
            }
        }
        Ok(Self {
            mesh,
            cells,
            cell_nodes,
        })
    }

    /// One cell per mesh node, in node order.
    pub fn with_cell_per_node(
        mesh: impl Into<Arc<FeMesh<D>>>,
        cells: Vec<Cell>,
    ) -> Result<Self, PdeError> {
        let nodes = (0..cells.len()).collect();
        Self::new(mesh, cells, nodes)
    }

    /// The population's own mesh.
    #[inline]
    pub fn mesh(&self) -> &Arc<FeMesh<D>> {
        &self.mesh
    }

    /// Moves the node carrying the cell at `ordinal`.
    pub fn move_cell(&mut self, ordinal: usize, location: [f64; D]) -> Result<(), PdeError> {
        let node = *self.cell_nodes.get(ordinal).ok_or_else(|| {
            PdeError::InvalidGeometry(format!("no cell at position {ordinal}"))
        })?;
        Arc::make_mut(&mut self.mesh).set_node_location(node, location)
    }
}

impl<const D: usize> Population<D> for MeshBasedCellPopulation<D> {
    fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    fn location_index(&self, ordinal: usize) -> usize {
        self.cell_nodes[ordinal]
    }

    fn location_of_cell_centre(&self, ordinal: usize) -> [f64; D] {
        *self.mesh.nodes()[self.cell_nodes[ordinal]].location()
    }

    fn num_nodes(&self) -> usize {
        self.mesh.num_nodes()
    }
}

/// A mesh-based population whose mesh also carries ghost nodes.
#[derive(Clone, Debug)]
pub struct MeshBasedWithGhostNodesCellPopulation<const D: usize> {
    inner: MeshBasedCellPopulation<D>,
    ghost_nodes: BTreeSet<usize>,
}

impl<const D: usize> MeshBasedWithGhostNodesCellPopulation<D> {
    /// `ghost_nodes` must be mesh nodes that carry no cell, and every mesh
    /// node is either a cell or a ghost.
    pub fn new(
        mesh: impl Into<Arc<FeMesh<D>>>,
        cells: Vec<Cell>,
        cell_nodes: Vec<usize>,
        ghost_nodes: BTreeSet<usize>,
    ) -> Result<Self, PdeError> {
        let inner = MeshBasedCellPopulation::attach(mesh.into(), cells, cell_nodes)?;
        for &g in &ghost_nodes {
            if g >= inner.mesh.num_nodes() || inner.cell_nodes.contains(&g) {
                return Err(PdeError::InvalidGeometry(format!(
                    "ghost node {g} is out of range or carries a cell"
                )));
            }
        }
        let covered = inner.cell_nodes.len() + ghost_nodes.len();
        if covered != inner.mesh.num_nodes() {
            return Err(PdeError::InvalidGeometry(format!(
                "{} cells and {} ghosts cover {covered} of {} mesh nodes",
                inner.cell_nodes.len(),
                ghost_nodes.len(),
                inner.mesh.num_nodes()
            )));
        }
        Ok(Self { inner, ghost_nodes })
    }

    #[inline]
    pub fn mesh(&self) -> &Arc<FeMesh<D>> {
        self.inner.mesh()
    }

    #[inline]
    pub fn ghost_nodes(&self) -> &BTreeSet<usize> {
        &self.ghost_nodes
    }
}

impl<const D: usize> Population<D> for MeshBasedWithGhostNodesCellPopulation<D> {
    fn cells(&self) -> &[Cell] {
        self.inner.cells()
    }

    fn cells_mut(&mut self) -> &mut [Cell] {
        self.inner.cells_mut()
    }

    fn location_index(&self, ordinal: usize) -> usize {
        self.inner.location_index(ordinal)
    }

    fn location_of_cell_centre(&self, ordinal: usize) -> [f64; D] {
        self.inner.location_of_cell_centre(ordinal)
    }

    fn num_nodes(&self) -> usize {
        self.inner.num_nodes()
    }
}
