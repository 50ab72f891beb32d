//! Periodic visualization output of the solved field.

use crate::data::ReplicatedVector;
use crate::io::vtk::VtkWriter;
use crate::io::{MeshData, MeshWriter};
use crate::mesh::FeMesh;
use crate::pde_error::PdeError;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const FILE_PREFIX: &str = "pde_results_";

/// Base name (without extension) of the snapshot for a time step.
pub fn snapshot_file_name(time_step_index: u64) -> String {
    format!("{FILE_PREFIX}{time_step_index}")
}

/// `true` when snapshots are written for meshes of dimension `D`.
pub const fn snapshots_enabled<const D: usize>() -> bool {
    D > 1 && cfg!(feature = "vtk")
}

/// Writes `mesh` with `solution` as point data named `name` to
/// `dir/pde_results_<time_step_index>.vtk`, overwriting any earlier file for
/// the same index.
///
/// Returns `Ok(None)` without touching the filesystem for one-dimensional
/// meshes or when the `vtk` feature is disabled.
pub fn write_snapshot<const D: usize>(
    mesh: &FeMesh<D>,
    solution: &ReplicatedVector,
    name: &str,
    dir: &Path,
    time_step_index: u64,
) -> Result<Option<PathBuf>, PdeError> {
    if !snapshots_enabled::<D>() {
        log::warn!("snapshot {time_step_index} skipped: no visualization output in {D}D");
        return Ok(None);
    }
    if solution.len() != mesh.num_nodes() {
        return Err(PdeError::SolutionLengthMismatch {
            expected: mesh.num_nodes(),
            found: solution.len(),
        });
    }
    let mut data = MeshData::from_fe_mesh(mesh);
    data.add_point_data(name, solution.as_slice().to_vec())?;

    let writer = VtkWriter;
    fs::create_dir_all(dir)?;
    let path = dir
        .join(snapshot_file_name(time_step_index))
        .with_extension(writer.extension());
    let mut out = BufWriter::new(File::create(&path)?);
    writer.write(&mut out, &data)?;
    out.flush()?;
    log::info!("wrote {name} snapshot {}", path.display());
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_keyed_by_step() {
        assert_eq!(snapshot_file_name(7), "pde_results_7");
        assert_ne!(snapshot_file_name(1), snapshot_file_name(10));
    }

    #[test]
    fn one_dimensional_meshes_are_skipped() {
        assert!(!snapshots_enabled::<1>());
        assert_eq!(snapshots_enabled::<2>(), cfg!(feature = "vtk"));
    }
}
