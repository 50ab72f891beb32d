//! Polygonal vertex meshes used by vertex-based cell populations.
//!
//! Each element is a polygon (one cell) given by its vertex indices in
//! counter-clockwise order. Vertices are shared between neighbouring cells.

use super::FeMesh;
use crate::pde_error::PdeError;
use crate::topology::cell_type::CellType;
use crate::topology::node::{Node, mean_location};

/// Mesh of polygonal cells sharing vertices.
#[derive(Clone, Debug)]
pub struct VertexMesh<const D: usize> {
    nodes: Vec<Node<D>>,
    elements: Vec<Vec<usize>>,
}

impl<const D: usize> VertexMesh<D> {
    /// Builds a vertex mesh. Vertex `i` of `locations` gets node index `i`.
    pub fn new(locations: Vec<[f64; D]>, elements: Vec<Vec<usize>>) -> Result<Self, PdeError> {
        let nodes: Vec<Node<D>> = locations
            .into_iter()
            .enumerate()
            .map(|(i, loc)| Node::new(i, loc))
            .collect();
        for (e, element) in elements.iter().enumerate() {
            if element.len() < 3 {
                return Err(PdeError::InvalidGeometry(format!(
                    "vertex element {e} has {} vertices, need at least 3",
                    element.len()
                )));
            }
            if let Some(&node) = element.iter().find(|&&n| n >= nodes.len()) {
                return Err(PdeError::MissingElementNode { element: e, node });
            }
        }
        Ok(Self { nodes, elements })
    }

    /// Number of vertices.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of polygonal elements.
    #[inline]
    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn nodes(&self) -> &[Node<D>] {
        &self.nodes
    }

    /// Vertex indices of element `e`.
    #[inline]
    pub fn element(&self, e: usize) -> Option<&[usize]> {
        self.elements.get(e).map(Vec::as_slice)
    }

    /// Element type of polygon `e`.
    pub fn element_type(&self, e: usize) -> Option<CellType> {
        let n = self.elements.get(e)?.len();
        u8::try_from(n).ok().map(CellType::Polygon)
    }

    pub(crate) fn set_node_location(&mut self, index: usize, location: [f64; D]) -> Result<(), PdeError> {
        let len = self.nodes.len();
        self.nodes
            .get_mut(index)
            .ok_or_else(|| {
                PdeError::InvalidGeometry(format!("vertex {index} out of range for mesh with {len} vertices"))
            })?
            .set_location(location);
        Ok(())
    }

    /// Centroid of element `e`.
    ///
    /// In two dimensions this is the area-weighted polygon centroid; it falls
    /// back to the vertex mean for degenerate polygons and other dimensions.
    pub fn centroid_of_element(&self, e: usize) -> Option<[f64; D]> {
        let element = self.elements.get(e)?;
        let mean = mean_location(element.iter().map(|&v| self.nodes[v].location()))?;
        if D != 2 {
            return Some(mean);
        }
        let mut twice_area = 0.0;
        let (mut cx, mut cy) = (0.0, 0.0);
        for (k, &v) in element.iter().enumerate() {
            let a = self.nodes[v].location().as_slice();
            let b = self.nodes[element[(k + 1) % element.len()]].location().as_slice();
            let cross = a[0] * b[1] - b[0] * a[1];
            twice_area += cross;
            cx += (a[0] + b[0]) * cross;
            cy += (a[1] + b[1]) * cross;
        }
        if twice_area.abs() <= f64::EPSILON {
            return Some(mean);
        }
        let mut centroid = mean;
        let c = centroid.as_mut_slice();
        c[0] = cx / (3.0 * twice_area);
        c[1] = cy / (3.0 * twice_area);
        Some(centroid)
    }

    /// Triangular mesh derived from the polygons.
    ///
    /// Nodes `0..num_nodes()` are the vertices; node `num_nodes() + e` is the
    /// centroid of element `e`. Each polygon is fanned into triangles around
    /// its centroid node.
    pub fn to_tetrahedral_mesh(&self) -> Result<FeMesh<D>, PdeError> {
        if D != 2 {
            return Err(PdeError::UnsupportedConfiguration(format!(
                "tetrahedral meshes can only be derived from 2D vertex meshes, not {D}D"
            )));
        }
        let nv = self.nodes.len();
        let mut nodes = self.nodes.clone();
        let mut triangles = Vec::new();
        for (e, element) in self.elements.iter().enumerate() {
            let centroid = self
                .centroid_of_element(e)
                .ok_or_else(|| PdeError::InvalidGeometry(format!("element {e} has no centroid")))?;
            nodes.push(Node::new(nv + e, centroid));
            for (k, &v) in element.iter().enumerate() {
                triangles.push(vec![v, element[(k + 1) % element.len()], nv + e]);
            }
        }
        FeMesh::from_parts(nodes, triangles)
    }
}
