//! Vertex-based populations: each cell is a polygon of a [`VertexMesh`].
//!
//! The population derives (and caches) the triangular mesh PDE solvers run
//! on. The cached mesh is shared out as an `Arc`, so its lifetime is tied to
//! whoever still holds it rather than to the population alone; moving a
//! vertex drops the population's copy.

use super::Population;
use super::cell::Cell;
use crate::mesh::{FeMesh, VertexMesh};
use crate::pde_error::PdeError;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug)]
pub struct VertexBasedCellPopulation<const D: usize> {
    mesh: VertexMesh<D>,
    cells: Vec<Cell>,
    tetrahedral: Mutex<Option<Arc<FeMesh<D>>>>,
}

impl<const D: usize> VertexBasedCellPopulation<D> {
    /// Cell `i` occupies element `i` of `mesh`.
    pub fn new(mesh: VertexMesh<D>, cells: Vec<Cell>) -> Result<Self, PdeError> {
        if mesh.num_elements() != cells.len() {
            return Err(PdeError::InvalidGeometry(format!(
                "vertex mesh has {} elements but {} cells were given",
                mesh.num_elements(),
                cells.len()
            )));
        }
        Ok(Self {
            mesh,
            cells,
            tetrahedral: Mutex::new(None),
        })
    }

    #[inline]
    pub fn vertex_mesh(&self) -> &VertexMesh<D> {
        &self.mesh
    }

    /// Triangular mesh derived from the vertex mesh; see
    /// [`VertexMesh::to_tetrahedral_mesh`] for its node numbering.
    pub fn tetrahedral_mesh_using_vertex_mesh(&self) -> Result<Arc<FeMesh<D>>, PdeError> {
        let mut cached = self.tetrahedral.lock();
        if let Some(mesh) = cached.as_ref() {
            return Ok(Arc::clone(mesh));
        }
        let mesh = Arc::new(self.mesh.to_tetrahedral_mesh()?);
        *cached = Some(Arc::clone(&mesh));
        Ok(mesh)
    }

    /// Moves a vertex, invalidating the derived mesh.
    pub fn move_vertex(&mut self, index: usize, location: [f64; D]) -> Result<(), PdeError> {
        self.mesh.set_node_location(index, location)?;
        *self.tetrahedral.get_mut() = None;
        Ok(())
    }
}

impl<const D: usize> Population<D> for VertexBasedCellPopulation<D> {
    fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    fn location_index(&self, ordinal: usize) -> usize {
        ordinal
    }

    fn location_of_cell_centre(&self, ordinal: usize) -> [f64; D] {
        self.mesh
            .centroid_of_element(ordinal)
            .unwrap_or_else(|| panic!("no vertex element for cell position {ordinal}"))
    }

    fn num_nodes(&self) -> usize {
        self.mesh.num_nodes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hexagon_pair() -> VertexBasedCellPopulation<2> {
        let mesh = VertexMesh::new(
            vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [2.0, 0.0], [2.0, 1.0]],
            vec![vec![0, 1, 2, 3], vec![1, 4, 5, 2]],
        )
        .unwrap();
        VertexBasedCellPopulation::new(mesh, vec![Cell::new(10), Cell::new(11)]).unwrap()
    }

    #[test]
    fn derived_mesh_is_cached_until_a_vertex_moves() {
        let mut pop = hexagon_pair();
        let first = pop.tetrahedral_mesh_using_vertex_mesh().unwrap();
        let again = pop.tetrahedral_mesh_using_vertex_mesh().unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        pop.move_vertex(5, [3.0, 1.0]).unwrap();
        let moved = pop.tetrahedral_mesh_using_vertex_mesh().unwrap();
        assert!(!Arc::ptr_eq(&first, &moved));
        assert_eq!(moved.node(5).unwrap().location(), &[3.0, 1.0]);
        assert_eq!(first.node(5).unwrap().location(), &[2.0, 1.0]);
    }

    #[test]
    fn cell_count_must_match_elements() {
        let mesh = VertexMesh::new(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]], vec![vec![0, 1, 2]]).unwrap();
        assert!(VertexBasedCellPopulation::new(mesh, vec![]).is_err());
    }

    #[test]
    fn location_index_is_element_index() {
        let pop = hexagon_pair();
        assert_eq!(pop.location_index(1), 1);
        assert_eq!(pop.num_nodes(), 6);
        assert_eq!(pop.location_of_cell_centre(0), [0.5, 0.5]);
    }
}
