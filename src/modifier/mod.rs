//! Couples a PDE solve to a cell population whose geometry changes every
//! step.
//!
//! Each step, [`GrowingDomainPdeModifier`] rebuilds a finite-element mesh
//! from the population's current state, hands it to a [`PdeSolver`], and
//! writes the solution back into every cell's data under the configured
//! dependent-variable name. At output steps it also writes a snapshot of the
//! field.
//!
//! ```no_run
//! use cell_pde_mesh::prelude::*;
//!
//! # fn step(population: &mut CellPopulation<2>, solver: &mut impl PdeSolver<2>) -> Result<(), PdeError> {
//! let mut modifier = GrowingDomainPdeModifier::new(ModifierConfig::new("results", "oxygen"))?;
//! modifier.solve_and_update(population, solver)?;
//! modifier.update_at_end_of_output_time_step(1)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod mesh_builder;
pub mod node_mapper;
pub mod scatter;
pub mod snapshot;

pub use config::ModifierConfig;
pub use mesh_builder::build_fe_mesh;
pub use node_mapper::tet_node_indices;
pub use scatter::scatter_to_cells;
pub use snapshot::{snapshot_file_name, write_snapshot};

use crate::algs::communicator::{Communicator, NoComm};
use crate::data::DistributedVector;
use crate::mesh::{FeMesh, FeMeshHandle};
use crate::pde_error::PdeError;
use crate::population::CellPopulation;
use std::path::PathBuf;

/// External solver: discretizes and solves the PDE on a mesh.
pub trait PdeSolver<const D: usize> {
    /// Solves on `mesh` and returns this rank's shard of the nodal solution.
    fn solve<C: Communicator>(
        &mut self,
        mesh: &FeMesh<D>,
        comm: &C,
    ) -> Result<DistributedVector, PdeError>;
}

/// PDE modifier for populations whose domain grows with the cells.
///
/// Not meant to be shared between threads: each step mutates the mesh
/// handle and the cell data.
#[derive(Debug)]
pub struct GrowingDomainPdeModifier<const D: usize, C: Communicator = NoComm> {
    config: ModifierConfig,
    comm: C,
    mesh: Option<FeMeshHandle<D>>,
    solution: Option<DistributedVector>,
}

impl<const D: usize> GrowingDomainPdeModifier<D, NoComm> {
    /// Serial modifier.
    pub fn new(config: ModifierConfig) -> Result<Self, PdeError> {
        Self::with_communicator(config, NoComm)
    }
}

impl<const D: usize, C: Communicator> GrowingDomainPdeModifier<D, C> {
    pub fn with_communicator(config: ModifierConfig, comm: C) -> Result<Self, PdeError> {
        config.validate()?;
        Ok(Self {
            config,
            comm,
            mesh: None,
            solution: None,
        })
    }

    #[inline]
    pub fn config(&self) -> &ModifierConfig {
        &self.config
    }

    #[inline]
    pub fn communicator(&self) -> &C {
        &self.comm
    }

    #[inline]
    pub fn dependent_variable_name(&self) -> &str {
        &self.config.dependent_variable
    }

    /// Rebuilds the mesh for the population's current state.
    ///
    /// The previous mesh handle is dropped, releasing it if it was owned,
    /// and any solution computed on it is discarded.
    pub fn generate_fe_mesh(&mut self, population: &CellPopulation<D>) -> Result<&FeMesh<D>, PdeError> {
        let handle = build_fe_mesh(population)?;
        self.solution = None;
        Ok(&**self.mesh.insert(handle))
    }

    /// Current mesh, if one has been generated.
    #[inline]
    pub fn fe_mesh(&self) -> Option<&FeMesh<D>> {
        self.mesh.as_deref()
    }

    #[inline]
    pub fn fe_mesh_handle(&self) -> Option<&FeMeshHandle<D>> {
        self.mesh.as_ref()
    }

    /// Whether the current mesh was synthesized (and is released) by this
    /// modifier rather than shared with the population.
    #[inline]
    pub fn owns_fe_mesh(&self) -> bool {
        self.mesh.as_ref().is_some_and(FeMeshHandle::is_owned)
    }

    /// Records the solver's output for the current mesh.
    pub fn set_solution(&mut self, solution: DistributedVector) -> Result<(), PdeError> {
        let mesh = self.mesh.as_ref().ok_or(PdeError::MissingMesh)?;
        if solution.global_len() != mesh.num_nodes() {
            return Err(PdeError::SolutionLengthMismatch {
                expected: mesh.num_nodes(),
                found: solution.global_len(),
            });
        }
        self.solution = Some(solution);
        Ok(())
    }

    #[inline]
    pub fn solution(&self) -> Option<&DistributedVector> {
        self.solution.as_ref()
    }

    /// Writes the current solution into every live cell. Collective.
    pub fn update_cell_data(&self, population: &mut CellPopulation<D>) -> Result<(), PdeError> {
        let solution = self.solution.as_ref().ok_or(PdeError::MissingSolution)?;
        let replicated = solution.replicate(&self.comm)?;
        scatter_to_cells(population, &replicated, self.dependent_variable_name())
    }

    /// Writes the snapshot for `time_step_index`. Collective; only rank 0
    /// touches the filesystem and returns the written path.
    pub fn update_at_end_of_output_time_step(
        &self,
        time_step_index: u64,
    ) -> Result<Option<PathBuf>, PdeError> {
        if !snapshot::snapshots_enabled::<D>() {
            log::debug!("snapshot {time_step_index} skipped in {D}D");
            return Ok(None);
        }
        let mesh = self.fe_mesh().ok_or(PdeError::MissingMesh)?;
        let solution = self.solution.as_ref().ok_or(PdeError::MissingSolution)?;
        let replicated = solution.replicate(&self.comm)?;
        if self.comm.rank() != 0 {
            return Ok(None);
        }
        write_snapshot(
            mesh,
            &replicated,
            self.dependent_variable_name(),
            &self.config.output_directory,
            time_step_index,
        )
    }

    /// One full step: build the mesh, solve on it, scatter the result.
    pub fn solve_and_update<S: PdeSolver<D>>(
        &mut self,
        population: &mut CellPopulation<D>,
        solver: &mut S,
    ) -> Result<(), PdeError> {
        self.generate_fe_mesh(population)?;
        let mesh = self.fe_mesh().ok_or(PdeError::MissingMesh)?;
        let solution = solver.solve(mesh, &self.comm)?;
        self.set_solution(solution)?;
        self.update_cell_data(population)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::{Cell, NodeBasedCellPopulation};

    fn config() -> ModifierConfig {
        ModifierConfig::new(std::env::temp_dir(), "u")
    }

    #[test]
    fn solution_must_match_mesh() {
        let mut modifier = GrowingDomainPdeModifier::<2>::new(config()).unwrap();
        assert_eq!(
            modifier.set_solution(DistributedVector::serial(vec![1.0])),
            Err(PdeError::MissingMesh)
        );
        let pop: CellPopulation<2> = NodeBasedCellPopulation::new(vec![
            (Cell::new(0), [0.0, 0.0]),
            (Cell::new(1), [1.0, 0.0]),
            (Cell::new(2), [0.0, 1.0]),
        ])
        .unwrap()
        .into();
        modifier.generate_fe_mesh(&pop).unwrap();
        assert!(modifier.owns_fe_mesh());
        assert!(matches!(
            modifier.set_solution(DistributedVector::serial(vec![1.0])),
            Err(PdeError::SolutionLengthMismatch { expected: 3, found: 1 })
        ));
    }

    #[test]
    fn invalid_variable_name_is_rejected() {
        let err = GrowingDomainPdeModifier::<2>::new(ModifierConfig::new("out", "a b")).unwrap_err();
        assert!(matches!(err, PdeError::InvalidConfig(_)));
    }
}
