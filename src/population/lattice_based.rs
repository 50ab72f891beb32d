//! Lattice-based (cellular Potts) populations.
//!
//! Each cell is a Potts element covering one or more lattice sites; the cell's
//! location index is its element index and its centre is the mean position
//! of its sites.

use super::Population;
use super::cell::Cell;
use super::lattice::Lattice;
use crate::pde_error::PdeError;
use crate::topology::node::mean_location;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct LatticeBasedCellPopulation<const D: usize> {
    lattice: Lattice<D>,
    elements: Vec<Vec<usize>>,
    cells: Vec<Cell>,
    owner: HashMap<usize, usize>,
}

impl<const D: usize> LatticeBasedCellPopulation<D> {
    /// Cell `i` becomes Potts element `i` covering the given sites.
    pub fn new(lattice: Lattice<D>, cells: Vec<(Cell, Vec<usize>)>) -> Result<Self, PdeError> {
        let mut owner = HashMap::new();
        let mut elements = Vec::with_capacity(cells.len());
        let mut out = Vec::with_capacity(cells.len());
        for (e, (cell, sites)) in cells.into_iter().enumerate() {
            if sites.is_empty() {
                return Err(PdeError::InvalidGeometry(format!(
                    "Potts cell {} covers no lattice sites",
                    cell.id()
                )));
            }
            for &site in &sites {
                lattice.check_site(site)?;
                if owner.insert(site, e).is_some() {
                    return Err(PdeError::InvalidGeometry(format!(
                        "lattice site {site} is claimed by two cells"
                    )));
                }
            }
            elements.push(sites);
            out.push(cell);
        }
        Ok(Self {
            lattice,
            elements,
            cells: out,
            owner,
        })
    }

    #[inline]
    pub fn lattice(&self) -> &Lattice<D> {
        &self.lattice
    }

    /// Sites covered by the cell at `ordinal`.
    pub fn element_sites(&self, ordinal: usize) -> Option<&[usize]> {
        self.elements.get(ordinal).map(Vec::as_slice)
    }

    /// Potts spin flip: hands `site` over to the cell at `ordinal`.
    ///
    /// A cell may not give away its last site.
    pub fn flip_site(&mut self, site: usize, ordinal: usize) -> Result<(), PdeError> {
        self.lattice.check_site(site)?;
        if ordinal >= self.elements.len() {
            return Err(PdeError::InvalidGeometry(format!("no cell at position {ordinal}")));
        }
        if let Some(&from) = self.owner.get(&site) {
            if from == ordinal {
                return Ok(());
            }
            if self.elements[from].len() == 1 {
                return Err(PdeError::InvalidGeometry(format!(
                    "site {site} is the last site of cell {}",
                    self.cells[from].id()
                )));
            }
            self.elements[from].retain(|&s| s != site);
        }
        self.elements[ordinal].push(site);
        self.owner.insert(site, ordinal);
        Ok(())
    }
}

impl<const D: usize> Population<D> for LatticeBasedCellPopulation<D> {
    fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    fn location_index(&self, ordinal: usize) -> usize {
        assert!(ordinal < self.elements.len(), "no Potts element at position {ordinal}");
        ordinal
    }

    fn location_of_cell_centre(&self, ordinal: usize) -> [f64; D] {
        assert!(ordinal < self.elements.len(), "no Potts element at position {ordinal}");
        let locations: Vec<[f64; D]> = self.elements[ordinal]
            .iter()
            .filter_map(|&s| self.lattice.site_location(s))
            .collect();
        // elements are never empty and only hold checked sites
        mean_location(locations.iter())
            .unwrap_or_else(|| panic!("Potts element {ordinal} has no sites on the lattice"))
    }

    fn num_nodes(&self) -> usize {
        self.lattice.num_sites()
    }
}
