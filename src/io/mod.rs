//! Mesh output for visualization.
//!
//! Writers and readers exchange [`MeshData`]: an unstructured grid with
//! named nodal scalar fields. Points are always stored with three
//! coordinates; lower-dimensional meshes are padded with zeros.

pub mod vtk;

use crate::mesh::FeMesh;
use crate::pde_error::PdeError;
use crate::topology::cell_type::CellType;
use std::collections::BTreeMap;
use std::io::{Read, Write};

/// An unstructured grid and its nodal fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// Point coordinates, padded to 3D.
    pub points: Vec<[f64; 3]>,
    /// Point indices of each cell.
    pub cells: Vec<Vec<usize>>,
    /// Type of each cell, parallel to `cells`.
    pub cell_types: Vec<CellType>,
    /// Named scalar fields with one value per point.
    pub point_data: BTreeMap<String, Vec<f64>>,
}

impl MeshData {
    /// Grid of `mesh`, without fields.
    pub fn from_fe_mesh<const D: usize>(mesh: &FeMesh<D>) -> Self {
        let points = mesh
            .nodes()
            .iter()
            .map(|n| {
                let mut p = [0.0; 3];
                for (dst, src) in p.iter_mut().zip(n.location()) {
                    *dst = *src;
                }
                p
            })
            .collect();
        let (cells, cell_types) = mesh
            .elements()
            .iter()
            .map(|e| (e.node_indices().to_vec(), e.cell_type()))
            .unzip();
        Self {
            points,
            cells,
            cell_types,
            point_data: BTreeMap::new(),
        }
    }

    /// Attaches a nodal field; `values` must have one entry per point.
    pub fn add_point_data(&mut self, name: &str, values: Vec<f64>) -> Result<(), PdeError> {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(PdeError::InvalidConfig(format!(
                "field name {name:?} cannot be written"
            )));
        }
        if values.len() != self.points.len() {
            return Err(PdeError::SolutionLengthMismatch {
                expected: self.points.len(),
                found: values.len(),
            });
        }
        self.point_data.insert(name.to_string(), values);
        Ok(())
    }
}

/// Serializes [`MeshData`].
pub trait MeshWriter {
    /// File extension, without the dot.
    fn extension(&self) -> &'static str;

    fn write<W: Write>(&self, writer: W, mesh: &MeshData) -> Result<(), PdeError>;
}

/// Parses [`MeshData`].
pub trait MeshReader {
    fn read<R: Read>(&self, reader: R) -> Result<MeshData, PdeError>;
}
