//! Node-based (off-lattice) populations: a cloud of points, one per cell.
//!
//! Cell `i` sits on node `i`. Removing a cell renumbers the remaining nodes
//! so indices always stay contiguous from zero.

use super::Population;
use super::cell::Cell;
use crate::pde_error::PdeError;
use crate::topology::node::Node;

#[derive(Clone, Debug)]
pub struct NodeBasedCellPopulation<const D: usize> {
    nodes: Vec<Node<D>>,
    cells: Vec<Cell>,
}

impl<const D: usize> NodeBasedCellPopulation<D> {
    pub fn new(cells: Vec<(Cell, [f64; D])>) -> Result<Self, PdeError> {
        let mut pop = Self {
            nodes: Vec::with_capacity(cells.len()),
            cells: Vec::with_capacity(cells.len()),
        };
        for (cell, location) in cells {
            pop.add_cell(cell, location)?;
        }
        Ok(pop)
    }

    /// The point cloud, in index order.
    #[inline]
    pub fn nodes(&self) -> &[Node<D>] {
        &self.nodes
    }

    /// Adds a cell (e.g. a daughter after division) and returns its node index.
    pub fn add_cell(&mut self, cell: Cell, location: [f64; D]) -> Result<usize, PdeError> {
        let node = Node::new(self.nodes.len(), location);
        if !node.is_finite() {
            return Err(PdeError::InvalidGeometry(format!(
                "cell {} has non-finite location",
                cell.id()
            )));
        }
        self.nodes.push(node);
        self.cells.push(cell);
        Ok(node.index())
    }

    /// Removes the cell at `ordinal` (cell death), renumbering later nodes.
    pub fn remove_cell(&mut self, ordinal: usize) -> Option<Cell> {
        if ordinal >= self.cells.len() {
            return None;
        }
        self.nodes.remove(ordinal);
        for (i, node) in self.nodes.iter_mut().enumerate().skip(ordinal) {
            node.set_index(i);
        }
        Some(self.cells.remove(ordinal))
    }

    /// Moves the cell at `ordinal`.
    pub fn move_cell(&mut self, ordinal: usize, location: [f64; D]) -> Result<(), PdeError> {
        let node = self
            .nodes
            .get_mut(ordinal)
            .ok_or_else(|| PdeError::InvalidGeometry(format!("no cell at position {ordinal}")))?;
        node.set_location(location);
        Ok(())
    }
}

impl<const D: usize> Population<D> for NodeBasedCellPopulation<D> {
    fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    fn location_index(&self, ordinal: usize) -> usize {
        self.nodes[ordinal].index()
    }

    fn location_of_cell_centre(&self, ordinal: usize) -> [f64; D] {
        *self.nodes[ordinal].location()
    }

    fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn death_keeps_indices_contiguous() {
        let mut pop = NodeBasedCellPopulation::new(
            (0..4).map(|i| (Cell::new(i), [i as f64])).collect(),
        )
        .unwrap();
        let dead = pop.remove_cell(1).unwrap();
        assert_eq!(dead.id().get(), 1);
        let indices: Vec<_> = pop.nodes().iter().map(Node::index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(pop.location_of_cell_centre(1), [2.0]);
        assert!(pop.remove_cell(3).is_none());
    }

    #[test]
    fn division_appends_a_node() {
        let mut pop = NodeBasedCellPopulation::new(vec![(Cell::new(0), [0.0, 0.0])]).unwrap();
        assert_eq!(pop.add_cell(Cell::new(1), [0.1, 0.0]).unwrap(), 1);
        assert_eq!(pop.num_real_cells(), 2);
        assert!(pop.add_cell(Cell::new(2), [f64::INFINITY, 0.0]).is_err());
        pop.move_cell(0, [-1.0, 0.0]).unwrap();
        assert_eq!(pop.location_of_cell_centre(0), [-1.0, 0.0]);
    }
}
