//! Builds the finite-element mesh a PDE is solved on from a cell population.
//!
//! Dispatch is an exhaustive match over [`CellPopulation`]:
//!
//! | population                 | mesh                                      | handle     |
//! |----------------------------|-------------------------------------------|------------|
//! | mesh-based                 | the population's own mesh                 | borrowed   |
//! | mesh-based, ghost nodes    | unsupported                               | n/a        |
//! | node-based                 | one node per cell at its index            | owned      |
//! | vertex-based               | triangulation derived by the population   | borrowed   |
//! | lattice-based (Potts)      | one node per cell centre, by element      | owned      |
//! | site-based (CA)            | one node per cell centre, sequential      | owned      |
//!
//! Synthesized meshes are keyed by the same canonical cell iteration that
//! [`tet_node_indices`](super::node_mapper::tet_node_indices) uses.

use crate::mesh::{FeMesh, FeMeshHandle};
use crate::pde_error::PdeError;
use crate::population::{CellPopulation, CellSite, Population};
use crate::topology::node::Node;
use std::sync::Arc;

/// Builds (or reuses) the mesh for the population's current state.
pub fn build_fe_mesh<const D: usize>(
    population: &CellPopulation<D>,
) -> Result<FeMeshHandle<D>, PdeError> {
    let handle = match population {
        CellPopulation::MeshBased(p) => {
            check_node_count(p.mesh().num_nodes(), p.num_real_cells())?;
            FeMeshHandle::Borrowed(Arc::clone(p.mesh()))
        }
        CellPopulation::MeshBasedWithGhostNodes(p) => {
            return Err(PdeError::UnsupportedConfiguration(format!(
                "cannot solve on a mesh with {} ghost nodes",
                p.ghost_nodes().len()
            )));
        }
        CellPopulation::NodeBased(p) => synthesize(p, |site| site.location_index)?,
        CellPopulation::VertexBased(p) => {
            FeMeshHandle::Borrowed(p.tetrahedral_mesh_using_vertex_mesh()?)
        }
        CellPopulation::LatticeBased(p) => synthesize(p, |site| site.location_index)?,
        CellPopulation::SiteBased(p) => synthesize(p, |site| site.ordinal)?,
    };
    log::debug!(
        "built {} mesh for {} population: {} nodes, {} elements",
        if handle.is_owned() { "owned" } else { "borrowed" },
        population.kind(),
        handle.num_nodes(),
        handle.num_elements()
    );
    Ok(handle)
}

/// One node per live cell at its centre, indexed by `key`.
fn synthesize<const D: usize, P: Population<D>>(
    population: &P,
    key: impl Fn(&CellSite<D>) -> usize,
) -> Result<FeMeshHandle<D>, PdeError> {
    let nodes: Vec<Node<D>> = population
        .sites()
        .map(|site| Node::new(key(&site), site.centre))
        .collect();
    let mesh = FeMesh::from_nodes(nodes)?;
    check_node_count(mesh.num_nodes(), population.num_real_cells())?;
    Ok(FeMeshHandle::Owned(Box::new(mesh)))
}

fn check_node_count(nodes: usize, cells: usize) -> Result<(), PdeError> {
    if nodes != cells {
        return Err(PdeError::NodeCountMismatch { nodes, cells });
    }
    Ok(())
}
