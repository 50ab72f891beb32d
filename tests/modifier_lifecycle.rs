mod util;

use cell_pde_mesh::prelude::*;
use util::*;

/// Nodal field `f(x)`, sharded by a balanced block layout.
struct FieldSolver<F> {
    field: F,
    solves: usize,
}

impl<F> FieldSolver<F> {
    fn new(field: F) -> Self {
        Self { field, solves: 0 }
    }
}

impl<const D: usize, F: Fn(&[f64; D]) -> f64> PdeSolver<D> for FieldSolver<F> {
    fn solve<C: Communicator>(
        &mut self,
        mesh: &FeMesh<D>,
        comm: &C,
    ) -> Result<DistributedVector, PdeError> {
        self.solves += 1;
        let global: Vec<f64> = mesh.nodes().iter().map(|n| (self.field)(n.location())).collect();
        DistributedVector::block_partition(&global, comm.rank(), comm.size())
    }
}

#[test]
fn each_cell_samples_the_field_at_its_position() {
    let points = random_cloud(15, 8);
    let mut pop = node_population(&points);
    let mut solver = FieldSolver::new(|x: &[f64; 2]| x[0] + 10.0 * x[1]);
    let mut modifier =
        GrowingDomainPdeModifier::<2>::new(ModifierConfig::new("unused", "nutrient")).unwrap();

    modifier.solve_and_update(&mut pop, &mut solver).unwrap();
    assert_eq!(solver.solves, 1);
    assert!(modifier.owns_fe_mesh());
    for (cell, p) in pop.cells().iter().zip(&points) {
        let got = cell.data().get_item("nutrient").unwrap();
        assert!((got - (p[0] + 10.0 * p[1])).abs() < 1e-12);
    }
}

#[test]
fn growth_between_steps_is_picked_up() {
    let mut population = NodeBasedCellPopulation::new(vec![
        (Cell::new(0), [0.0, 0.0]),
        (Cell::new(1), [1.0, 0.0]),
        (Cell::new(2), [0.0, 1.0]),
    ])
    .unwrap();
    let mut solver = FieldSolver::new(|x: &[f64; 2]| x[0]);
    let mut modifier = GrowingDomainPdeModifier::<2>::new(ModifierConfig::new("unused", "u")).unwrap();

    let mut pop: CellPopulation<2> = population.clone().into();
    modifier.solve_and_update(&mut pop, &mut solver).unwrap();
    assert_eq!(modifier.fe_mesh().unwrap().num_nodes(), 3);

    population.add_cell(Cell::new(3), [2.0, 2.0]).unwrap();
    population.move_cell(0, [-1.0, 0.0]).unwrap();
    let mut pop: CellPopulation<2> = population.into();
    modifier.solve_and_update(&mut pop, &mut solver).unwrap();
    assert_eq!(modifier.fe_mesh().unwrap().num_nodes(), 4);
    assert_eq!(
        cell_values(&pop, "u"),
        vec![Some(-1.0), Some(1.0), Some(0.0), Some(2.0)]
    );
}

#[test]
fn vertex_population_solves_on_shared_triangulation() {
    let mut pop: CellPopulation<2> = vertex_fan().into();
    let mut solver = FieldSolver::new(|x: &[f64; 2]| x[1]);
    let mut modifier = GrowingDomainPdeModifier::<2>::new(ModifierConfig::new("unused", "u")).unwrap();
    modifier.solve_and_update(&mut pop, &mut solver).unwrap();
    assert!(!modifier.owns_fe_mesh());
    let centres: Vec<f64> = pop.sites().map(|s| s.centre[1]).collect();
    for (got, want) in cell_values(&pop, "u").into_iter().zip(centres) {
        assert!((got.unwrap() - want).abs() < 1e-12);
    }
}

#[test]
fn new_mesh_discards_old_solution() {
    let pop = node_population(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
    let mut modifier = GrowingDomainPdeModifier::<2>::new(ModifierConfig::new("unused", "u")).unwrap();
    modifier.generate_fe_mesh(&pop).unwrap();
    modifier.set_solution(DistributedVector::serial(vec![0.0; 3])).unwrap();
    modifier.generate_fe_mesh(&pop).unwrap();
    assert!(modifier.solution().is_none());
    let mut pop = pop;
    assert_eq!(modifier.update_cell_data(&mut pop), Err(PdeError::MissingSolution));
}

#[cfg(feature = "rayon")]
#[test]
fn ranks_agree_after_a_distributed_step() {
    let points = random_cloud(11, 30);
    let dir = scratch_dir("distributed-step");
    let results = RayonComm::run(3, |comm| {
        let mut pop = node_population(&points);
        let mut solver = FieldSolver::new(|x: &[f64; 2]| 3.0 * x[0] - x[1]);
        let mut modifier =
            GrowingDomainPdeModifier::with_communicator(ModifierConfig::new(&dir, "u"), comm.clone())?;
        modifier.solve_and_update(&mut pop, &mut solver)?;
        let written = modifier.update_at_end_of_output_time_step(4)?;
        Ok::<_, PdeError>((cell_values(&pop, "u"), written))
    })
    .unwrap();

    let (reference, _) = results[0].as_ref().unwrap();
    for (rank, result) in results.iter().enumerate() {
        let (values, written) = result.as_ref().unwrap();
        assert_eq!(values, reference);
        assert_eq!(written.is_some(), rank == 0 && cfg!(feature = "vtk"));
    }
    for (value, p) in reference.iter().zip(&points) {
        assert!((value.unwrap() - (3.0 * p[0] - p[1])).abs() < 1e-12);
    }
    let _ = std::fs::remove_dir_all(&dir);
}
