//! Site-based (cellular automaton) populations: each cell occupies one site.
//!
//! The location index is the lattice site index, which is generally sparse
//! and therefore not usable as a mesh node index.

use super::Population;
use super::cell::Cell;
use super::lattice::Lattice;
use crate::pde_error::PdeError;

#[derive(Clone, Debug)]
pub struct SiteBasedCellPopulation<const D: usize> {
    lattice: Lattice<D>,
    cells: Vec<Cell>,
    sites: Vec<usize>,
}

impl<const D: usize> SiteBasedCellPopulation<D> {
    pub fn new(lattice: Lattice<D>, cells: Vec<(Cell, usize)>) -> Result<Self, PdeError> {
        let mut pop = Self {
            lattice,
            cells: Vec::with_capacity(cells.len()),
            sites: Vec::with_capacity(cells.len()),
        };
        for (cell, site) in cells {
            pop.add_cell(cell, site)?;
        }
        Ok(pop)
    }

    #[inline]
    pub fn lattice(&self) -> &Lattice<D> {
        &self.lattice
    }

    /// Places a cell on `site`.
    pub fn add_cell(&mut self, cell: Cell, site: usize) -> Result<(), PdeError> {
        self.lattice.check_site(site)?;
        self.cells.push(cell);
        self.sites.push(site);
        Ok(())
    }

    /// Removes the cell at `ordinal`; later cells shift down by one.
    pub fn remove_cell(&mut self, ordinal: usize) -> Option<Cell> {
        if ordinal >= self.cells.len() {
            return None;
        }
        self.sites.remove(ordinal);
        Some(self.cells.remove(ordinal))
    }

    /// Moves the cell at `ordinal` to another site.
    pub fn move_cell(&mut self, ordinal: usize, site: usize) -> Result<(), PdeError> {
        self.lattice.check_site(site)?;
        let slot = self
            .sites
            .get_mut(ordinal)
            .ok_or_else(|| PdeError::InvalidGeometry(format!("no cell at position {ordinal}")))?;
        *slot = site;
        Ok(())
    }
}

impl<const D: usize> Population<D> for SiteBasedCellPopulation<D> {
    fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    fn location_index(&self, ordinal: usize) -> usize {
        self.sites[ordinal]
    }

    fn location_of_cell_centre(&self, ordinal: usize) -> [f64; D] {
        self.lattice
            .site_location(self.sites[ordinal])
            .unwrap_or_else(|| panic!("cell at position {ordinal} sits outside the lattice"))
    }

    fn num_nodes(&self) -> usize {
        self.lattice.num_sites()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_index_is_site() {
        let lattice = Lattice::new([5, 5], 2.0).unwrap();
        let mut pop =
            SiteBasedCellPopulation::new(lattice, vec![(Cell::new(0), 12), (Cell::new(1), 3)]).unwrap();
        assert_eq!(pop.location_index(0), 12);
        assert_eq!(pop.location_of_cell_centre(0), [4.0, 4.0]);
        pop.move_cell(1, 24).unwrap();
        assert_eq!(pop.location_of_cell_centre(1), [8.0, 8.0]);
        assert!(pop.move_cell(1, 25).is_err());
        assert!(pop.add_cell(Cell::new(2), 99).is_err());
        assert_eq!(pop.remove_cell(0).map(|c| c.id().get()), Some(0));
        assert_eq!(pop.location_index(0), 24);
    }
}
