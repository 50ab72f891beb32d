mod util;

use cell_pde_mesh::io::MeshReader;
use cell_pde_mesh::io::vtk::VtkReader;
use cell_pde_mesh::prelude::*;
use serial_test::serial;
use std::fs::File;
use util::*;

#[cfg(feature = "vtk")]
#[test]
#[serial]
fn snapshot_holds_one_value_per_node() {
    let dir = scratch_dir("snapshot-2d");
    let pop = node_population(&random_cloud(9, 4));
    let mut modifier =
        GrowingDomainPdeModifier::<2>::new(ModifierConfig::new(&dir, "oxygen")).unwrap();
    let mesh = modifier.generate_fe_mesh(&pop).unwrap();
    let values: Vec<f64> = mesh.nodes().iter().map(|n| n.location()[0] * 2.0).collect();
    let num_elements = mesh.num_elements();
    modifier.set_solution(DistributedVector::serial(values.clone())).unwrap();

    let path = modifier.update_at_end_of_output_time_step(7).unwrap().unwrap();
    assert_eq!(path, dir.join("pde_results_7.vtk"));

    let data = VtkReader.read(File::open(&path).unwrap()).unwrap();
    assert_eq!(data.points.len(), 9);
    assert_eq!(data.cells.len(), num_elements);
    assert_eq!(data.point_data.len(), 1);
    assert_eq!(data.point_data["oxygen"], values);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[cfg(feature = "vtk")]
#[test]
#[serial]
fn same_index_overwrites_and_other_indices_do_not_collide() {
    let dir = scratch_dir("snapshot-overwrite");
    let pop = node_population(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
    let mut modifier = GrowingDomainPdeModifier::<2>::new(ModifierConfig::new(&dir, "u")).unwrap();
    modifier.generate_fe_mesh(&pop).unwrap();

    modifier.set_solution(DistributedVector::serial(vec![1.0; 3])).unwrap();
    let first = modifier.update_at_end_of_output_time_step(2).unwrap().unwrap();
    modifier.set_solution(DistributedVector::serial(vec![5.0; 3])).unwrap();
    let again = modifier.update_at_end_of_output_time_step(2).unwrap().unwrap();
    let later = modifier.update_at_end_of_output_time_step(3).unwrap().unwrap();
    assert_eq!(first, again);
    assert_ne!(first, later);

    let data = VtkReader.read(File::open(&first).unwrap()).unwrap();
    assert_eq!(data.point_data["u"], vec![5.0; 3]);
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 2);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
#[serial]
fn one_dimensional_snapshot_is_skipped() {
    let dir = scratch_dir("snapshot-1d");
    let pop = node_population(&[[0.0], [0.5], [2.0]]);
    let mut modifier = GrowingDomainPdeModifier::<1>::new(ModifierConfig::new(&dir, "u")).unwrap();
    modifier.generate_fe_mesh(&pop).unwrap();
    modifier.set_solution(DistributedVector::serial(vec![1.0, 2.0, 3.0])).unwrap();

    assert_eq!(modifier.update_at_end_of_output_time_step(7).unwrap(), None);
    assert!(!dir.exists());
    assert_eq!(modifier.fe_mesh().unwrap().num_nodes(), 3);
    assert_eq!(modifier.solution().unwrap().local_values(), &[1.0, 2.0, 3.0]);
}

#[cfg(not(feature = "vtk"))]
#[test]
#[serial]
fn snapshots_are_skipped_without_vtk() {
    let dir = scratch_dir("snapshot-no-vtk");
    let pop = node_population(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
    let mut modifier = GrowingDomainPdeModifier::<2>::new(ModifierConfig::new(&dir, "u")).unwrap();
    modifier.generate_fe_mesh(&pop).unwrap();
    modifier.set_solution(DistributedVector::serial(vec![1.0; 3])).unwrap();
    assert_eq!(modifier.update_at_end_of_output_time_step(7).unwrap(), None);
    assert!(!dir.exists());
}

#[cfg(feature = "vtk")]
#[test]
#[serial]
fn snapshot_needs_a_solution() {
    let dir = scratch_dir("snapshot-missing");
    let pop = node_population(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
    let mut modifier = GrowingDomainPdeModifier::<2>::new(ModifierConfig::new(&dir, "u")).unwrap();
    assert_eq!(
        modifier.update_at_end_of_output_time_step(1),
        Err(PdeError::MissingMesh)
    );
    modifier.generate_fe_mesh(&pop).unwrap();
    assert_eq!(
        modifier.update_at_end_of_output_time_step(1),
        Err(PdeError::MissingSolution)
    );
}
