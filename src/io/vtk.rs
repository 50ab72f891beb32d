//! Legacy VTK (`.vtk`) reader/writer for unstructured grids.
//!
//! This implementation targets ASCII legacy VTK files with an
//! `UNSTRUCTURED_GRID` dataset. Nodal fields are stored as `POINT_DATA`
//! scalars with the default lookup table.

use crate::io::{MeshData, MeshReader, MeshWriter};
use crate::pde_error::PdeError;
use crate::topology::cell_type::CellType;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::str::FromStr;

const TITLE: &str = "cell-pde-mesh";

#[derive(Debug, Default, Clone)]
pub struct VtkReader;

#[derive(Debug, Default, Clone)]
pub struct VtkWriter;

impl MeshWriter for VtkWriter {
    fn extension(&self) -> &'static str {
        "vtk"
    }

    fn write<W: Write>(&self, mut writer: W, mesh: &MeshData) -> Result<(), PdeError> {
        if mesh.cells.len() != mesh.cell_types.len() {
            return Err(PdeError::MeshIoParse(format!(
                "{} cells but {} cell types",
                mesh.cells.len(),
                mesh.cell_types.len()
            )));
        }
        let num_points = mesh.points.len();

        writeln!(writer, "# vtk DataFile Version 3.0")?;
        writeln!(writer, "{TITLE}")?;
        writeln!(writer, "ASCII")?;
        writeln!(writer, "DATASET UNSTRUCTURED_GRID")?;
        writeln!(writer, "POINTS {num_points} double")?;
        for [x, y, z] in &mesh.points {
            writeln!(writer, "{x} {y} {z}")?;
        }

        let total_size: usize = mesh.cells.iter().map(|c| c.len() + 1).sum();
        writeln!(writer, "CELLS {} {total_size}", mesh.cells.len())?;
        for cell in &mesh.cells {
            write!(writer, "{}", cell.len())?;
            for &idx in cell {
                if idx >= num_points {
                    return Err(PdeError::MeshIoParse(format!(
                        "cell refers to point {idx} of {num_points}"
                    )));
                }
                write!(writer, " {idx}")?;
            }
            writeln!(writer)?;
        }

        writeln!(writer, "CELL_TYPES {}", mesh.cell_types.len())?;
        for cell_type in &mesh.cell_types {
            writeln!(writer, "{}", cell_type.vtk_code())?;
        }

        if !mesh.point_data.is_empty() {
            writeln!(writer, "POINT_DATA {num_points}")?;
            for (name, values) in &mesh.point_data {
                if values.len() != num_points {
                    return Err(PdeError::SolutionLengthMismatch {
                        expected: num_points,
                        found: values.len(),
                    });
                }
                writeln!(writer, "SCALARS {name} double 1")?;
                writeln!(writer, "LOOKUP_TABLE default")?;
                for v in values {
                    writeln!(writer, "{v}")?;
                }
            }
        }
        Ok(())
    }
}

fn next_token<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    what: &str,
) -> Result<&'a str, PdeError> {
    tokens
        .next()
        .ok_or_else(|| PdeError::MeshIoParse(format!("missing {what}")))
}

fn parse_next<'a, T: FromStr>(
    tokens: &mut impl Iterator<Item = &'a str>,
    what: &str,
) -> Result<T, PdeError> {
    let token = next_token(tokens, what)?;
    token
        .parse()
        .map_err(|_| PdeError::MeshIoParse(format!("invalid {what} {token:?}")))
}

fn expect_keyword<'a>(tokens: &mut impl Iterator<Item = &'a str>, keyword: &str) -> Result<(), PdeError> {
    let token = next_token(tokens, keyword)?;
    if token != keyword {
        return Err(PdeError::MeshIoParse(format!("expected {keyword}, found {token:?}")));
    }
    Ok(())
}

impl MeshReader for VtkReader {
    fn read<R: Read>(&self, mut reader: R) -> Result<MeshData, PdeError> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        let mut lines = input.lines();
        let _version = lines.next();
        let _title = lines.next();
        let format = lines
            .next()
            .ok_or_else(|| PdeError::MeshIoParse("missing ASCII line".into()))?;
        if format.trim() != "ASCII" {
            return Err(PdeError::MeshIoParse("VTK ASCII format required".into()));
        }
        let dataset = lines
            .next()
            .ok_or_else(|| PdeError::MeshIoParse("missing DATASET line".into()))?;
        if !dataset.trim().ends_with("UNSTRUCTURED_GRID") {
            return Err(PdeError::MeshIoParse("VTK UNSTRUCTURED_GRID required".into()));
        }

        let mut tokens = lines.flat_map(str::split_whitespace);

        expect_keyword(&mut tokens, "POINTS")?;
        let num_points: usize = parse_next(&mut tokens, "point count")?;
        let _point_type = next_token(&mut tokens, "point type")?;
        let mut points = Vec::with_capacity(num_points);
        for _ in 0..num_points {
            let mut p = [0.0; 3];
            for c in &mut p {
                *c = parse_next(&mut tokens, "point value")?;
            }
            points.push(p);
        }

        expect_keyword(&mut tokens, "CELLS")?;
        let num_cells: usize = parse_next(&mut tokens, "cell count")?;
        let _total_size: usize = parse_next(&mut tokens, "cell list size")?;
        let mut cells = Vec::with_capacity(num_cells);
        for _ in 0..num_cells {
            let count: usize = parse_next(&mut tokens, "cell size")?;
            let mut cell = Vec::with_capacity(count);
            for _ in 0..count {
                let idx: usize = parse_next(&mut tokens, "cell point")?;
                if idx >= num_points {
                    return Err(PdeError::MeshIoParse(format!(
                        "cell refers to point {idx} of {num_points}"
                    )));
                }
                cell.push(idx);
            }
            cells.push(cell);
        }

        expect_keyword(&mut tokens, "CELL_TYPES")?;
        let num_types: usize = parse_next(&mut tokens, "cell type count")?;
        if num_types != num_cells {
            return Err(PdeError::MeshIoParse(format!(
                "{num_cells} cells but {num_types} cell types"
            )));
        }
        let mut cell_types = Vec::with_capacity(num_types);
        for cell in &cells {
            let code: i32 = parse_next(&mut tokens, "cell type")?;
            let cell_type = CellType::from_vtk_code(code, cell.len())
                .ok_or_else(|| PdeError::MeshIoParse(format!("unsupported VTK cell type {code}")))?;
            cell_types.push(cell_type);
        }

        let mut point_data: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        if let Some(token) = tokens.next() {
            if token != "POINT_DATA" {
                return Err(PdeError::MeshIoParse(format!("unexpected token {token:?}")));
            }
            let n: usize = parse_next(&mut tokens, "point data count")?;
            if n != num_points {
                return Err(PdeError::MeshIoParse(format!(
                    "{n} point data tuples for {num_points} points"
                )));
            }
            while let Some(token) = tokens.next() {
                if token != "SCALARS" {
                    return Err(PdeError::MeshIoParse(format!("unexpected token {token:?}")));
                }
                let name = next_token(&mut tokens, "scalar name")?.to_string();
                let _data_type = next_token(&mut tokens, "scalar type")?;
                let mut after = next_token(&mut tokens, "LOOKUP_TABLE")?;
                if after != "LOOKUP_TABLE" {
                    let components: usize = after
                        .parse()
                        .map_err(|_| PdeError::MeshIoParse(format!("invalid component count {after:?}")))?;
                    if components != 1 {
                        return Err(PdeError::MeshIoParse(format!(
                            "scalar {name} has {components} components"
                        )));
                    }
                    after = next_token(&mut tokens, "LOOKUP_TABLE")?;
                }
                if after != "LOOKUP_TABLE" {
                    return Err(PdeError::MeshIoParse(format!("expected LOOKUP_TABLE, found {after:?}")));
                }
                let _table = next_token(&mut tokens, "lookup table name")?;
                let mut values: Vec<f64> = Vec::with_capacity(n);
                for _ in 0..n {
                    values.push(parse_next(&mut tokens, "scalar value")?);
                }
                point_data.insert(name, values);
            }
        }

        Ok(MeshData {
            points,
            cells,
            cell_types,
            point_data,
        })
    }
}
