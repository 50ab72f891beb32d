//! Writes a replicated PDE solution into each cell's data store.

use super::node_mapper::tet_node_indices;
use crate::data::ReplicatedVector;
use crate::pde_error::PdeError;
use crate::population::{CellPopulation, Population};

/// Stores, for every live cell, the solution value at its node under `name`.
///
/// All node indices are checked before any cell is written, so a failed
/// scatter leaves the population untouched.
pub fn scatter_to_cells<const D: usize>(
    population: &mut CellPopulation<D>,
    solution: &ReplicatedVector,
    name: &str,
) -> Result<(), PdeError> {
    let indices = tet_node_indices(population);
    let values = population
        .cells()
        .iter()
        .zip(&indices)
        .map(|(cell, &index)| {
            solution.get(index).ok_or(PdeError::NodeIndexOutOfRange {
                cell: cell.id(),
                index,
                len: solution.len(),
            })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    for ((cell, value), index) in population.cells_mut().iter_mut().zip(values).zip(indices) {
        log::trace!("{} <- node {index}: {name} = {value}", cell.id());
        cell.data_mut().set_item(name, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::{Cell, NodeBasedCellPopulation};

    fn pair() -> CellPopulation<2> {
        NodeBasedCellPopulation::new(vec![(Cell::new(4), [0.0, 0.0]), (Cell::new(9), [1.0, 0.0])])
            .unwrap()
            .into()
    }

    #[test]
    fn writes_value_at_node() {
        let mut pop = pair();
        scatter_to_cells(&mut pop, &vec![0.25, 0.75].into(), "u").unwrap();
        let got: Vec<_> = pop.cells().iter().map(|c| c.data().get_item("u")).collect();
        assert_eq!(got, vec![Some(0.25), Some(0.75)]);
    }

    #[test]
    fn short_solution_is_fatal_and_writes_nothing() {
        let mut pop = pair();
        let err = scatter_to_cells(&mut pop, &vec![1.0].into(), "u").unwrap_err();
        assert!(matches!(err, PdeError::NodeIndexOutOfRange { index: 1, len: 1, .. }));
        assert!(pop.cells().iter().all(|c| !c.data().has_item("u")));
    }
}
