//! Element type metadata for finite-element meshes.

/// Element kinds that appear in generated meshes.
///
/// Meshes handed to the PDE solver are always simplicial; `Polygon` only
/// describes the cells of a vertex mesh before it is triangulated.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CellType {
    /// 0D vertex.
    Vertex,
    /// 1D segment/edge.
    Segment,
    /// 2D simplex (triangle).
    Triangle,
    /// 3D simplex (tet).
    Tetrahedron,
    /// 2D polygon with `n` vertices.
    Polygon(u8),
}

impl Default for CellType {
    fn default() -> Self {
        CellType::Vertex
    }
}

impl CellType {
    /// Simplex of topological dimension `dim`, if one is supported.
    pub fn simplex(dim: usize) -> Option<Self> {
        match dim {
            0 => Some(CellType::Vertex),
            1 => Some(CellType::Segment),
            2 => Some(CellType::Triangle),
            3 => Some(CellType::Tetrahedron),
            _ => None,
        }
    }

    /// Returns the topological dimension of the cell.
    pub fn dimension(self) -> u8 {
        match self {
            CellType::Vertex => 0,
            CellType::Segment => 1,
            CellType::Triangle | CellType::Polygon(_) => 2,
            CellType::Tetrahedron => 3,
        }
    }

    /// Number of nodes an element of this type connects.
    pub fn num_vertices(self) -> usize {
        match self {
            CellType::Vertex => 1,
            CellType::Segment => 2,
            CellType::Triangle => 3,
            CellType::Tetrahedron => 4,
            CellType::Polygon(n) => n as usize,
        }
    }

    /// Legacy VTK cell type code.
    pub fn vtk_code(self) -> i32 {
        match self {
            CellType::Vertex => 1,
            CellType::Segment => 3,
            CellType::Triangle => 5,
            CellType::Tetrahedron => 10,
            CellType::Polygon(_) => 7,
        }
    }

    /// Inverse of [`CellType::vtk_code`]; polygons need their vertex count.
    pub fn from_vtk_code(code: i32, num_vertices: usize) -> Option<Self> {
        match code {
            1 => Some(CellType::Vertex),
            3 => Some(CellType::Segment),
            5 => Some(CellType::Triangle),
            10 => Some(CellType::Tetrahedron),
            7 => u8::try_from(num_vertices).ok().map(CellType::Polygon),
            _ => None,
        }
    }
}
