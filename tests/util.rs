#![allow(dead_code)]
use cell_pde_mesh::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

/// Node-based population with cell `i` at `points[i]`.
pub fn node_population<const D: usize>(points: &[[f64; D]]) -> CellPopulation<D> {
    NodeBasedCellPopulation::new(
        points
            .iter()
            .enumerate()
            .map(|(i, p)| (Cell::new(i as u64), *p))
            .collect(),
    )
    .unwrap()
    .into()
}

/// `n` points uniformly in the unit square, reproducible from `seed`.
pub fn random_cloud(n: usize, seed: u64) -> Vec<[f64; 2]> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..n)
        .map(|_| [rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)])
        .collect()
}

/// `nx * ny` grid mesh with unit spacing.
pub fn grid_mesh(nx: usize, ny: usize) -> FeMesh<2> {
    let nodes = (0..nx * ny)
        .map(|i| Node::new(i, [(i % nx) as f64, (i / nx) as f64]))
        .collect();
    FeMesh::from_nodes(nodes).unwrap()
}

/// Three triangular cells fanned around vertex 0 of a five-vertex mesh.
pub fn vertex_fan() -> VertexBasedCellPopulation<2> {
    let mesh = VertexMesh::new(
        vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [-1.0, 0.5]],
        vec![vec![0, 1, 2], vec![0, 2, 3], vec![0, 3, 4]],
    )
    .unwrap();
    VertexBasedCellPopulation::new(mesh, (0..3).map(|i| Cell::new(100 + i)).collect()).unwrap()
}

/// Empty scratch directory unique to this process and `name`.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cell-pde-mesh-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

/// Value of `name` stored on every cell, in iteration order.
pub fn cell_values<const D: usize>(population: &CellPopulation<D>, name: &str) -> Vec<Option<f64>> {
    population
        .cells()
        .iter()
        .map(|c| c.data().get_item(name))
        .collect()
}
