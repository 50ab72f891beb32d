//! Finite-element meshes handed to the PDE solver.
//!
//! An [`FeMesh`] is an ordered list of [`Node`]s, where the node stored at
//! position `i` always has index `i`, plus simplicial [`Element`]s connecting
//! them. Because node indices double as positions in the solution vector,
//! every constructor validates that the indices form a permutation of `0..n`.

pub mod delaunay;
pub mod handle;
pub mod vertex_mesh;

pub use handle::FeMeshHandle;
pub use vertex_mesh::VertexMesh;

use crate::debug_invariants::DebugInvariants;
use crate::pde_error::PdeError;
use crate::topology::cell_type::CellType;
use crate::topology::node::Node;

/// A simplicial element: its type and the indices of the nodes it connects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    cell_type: CellType,
    nodes: Vec<usize>,
}

impl Element {
    /// Element type.
    #[inline]
    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    /// Indices of the nodes this element connects.
    #[inline]
    pub fn node_indices(&self) -> &[usize] {
        &self.nodes
    }
}

/// Unstructured simplicial mesh of dimension `D` in `D`-dimensional space.
#[derive(Clone, Debug)]
pub struct FeMesh<const D: usize> {
    nodes: Vec<Node<D>>,
    elements: Vec<Element>,
}

impl<const D: usize> FeMesh<D> {
    /// Builds a mesh from a node set, connecting the nodes with a Delaunay
    /// triangulation.
    ///
    /// The nodes may arrive in any order; they are stored sorted by index.
    /// Their indices must be exactly `0..nodes.len()`.
    pub fn from_nodes(nodes: Vec<Node<D>>) -> Result<Self, PdeError> {
        let cell_type = Self::element_type()?;
        let nodes = order_nodes(nodes)?;
        let locations: Vec<[f64; D]> = nodes.iter().map(|n| *n.location()).collect();
        let elements = delaunay::triangulate(&locations)
            .into_iter()
            .map(|nodes| Element { cell_type, nodes })
            .collect();
        let mesh = Self { nodes, elements };
        crate::debug_invariants!(mesh.validate_invariants(), "FeMesh::from_nodes");
        Ok(mesh)
    }

    /// Builds a mesh with explicit simplicial connectivity.
    pub fn from_parts(nodes: Vec<Node<D>>, elements: Vec<Vec<usize>>) -> Result<Self, PdeError> {
        let cell_type = Self::element_type()?;
        let nodes = order_nodes(nodes)?;
        let elements = elements
            .into_iter()
            .map(|nodes| Element { cell_type, nodes })
            .collect();
        let mesh = Self { nodes, elements };
        mesh.validate_invariants()?;
        Ok(mesh)
    }

    fn element_type() -> Result<CellType, PdeError> {
        CellType::simplex(D).filter(|_| D > 0).ok_or_else(|| {
            PdeError::UnsupportedConfiguration(format!("no simplicial elements in dimension {D}"))
        })
    }

    /// Number of nodes.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of elements.
    #[inline]
    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Nodes in index order.
    #[inline]
    pub fn nodes(&self) -> &[Node<D>] {
        &self.nodes
    }

    /// Node with the given index.
    #[inline]
    pub fn node(&self, index: usize) -> Option<&Node<D>> {
        self.nodes.get(index)
    }

    /// Elements in construction order.
    #[inline]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Moves a node. Connectivity is left untouched.
    pub fn set_node_location(&mut self, index: usize, location: [f64; D]) -> Result<(), PdeError> {
        let len = self.nodes.len();
        let node = self.nodes.get_mut(index).ok_or_else(|| {
            PdeError::InvalidGeometry(format!("node {index} out of range for mesh with {len} nodes"))
        })?;
        node.set_location(location);
        Ok(())
    }

    /// Signed measure (length/area/volume) of an element; zero for unsupported dimensions.
    pub fn element_measure(&self, element: usize) -> Option<f64> {
        let el = self.elements.get(element)?;
        let p = |k: usize| self.nodes[el.nodes[k]].location().as_slice();
        let m = match D {
            1 => p(1)[0] - p(0)[0],
            2 => {
                let (a, b, c) = (p(0), p(1), p(2));
                0.5 * ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]))
            }
            3 => {
                let (a, b, c, d) = (p(0), p(1), p(2), p(3));
                let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
                let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
                let w = [d[0] - a[0], d[1] - a[1], d[2] - a[2]];
                (u[0] * (v[1] * w[2] - v[2] * w[1]) - u[1] * (v[0] * w[2] - v[2] * w[0])
                    + u[2] * (v[0] * w[1] - v[1] * w[0]))
                    / 6.0
            }
            _ => 0.0,
        };
        Some(m)
    }
}

/// Sorts nodes by index and checks the indices are exactly `0..n`.
fn order_nodes<const D: usize>(mut nodes: Vec<Node<D>>) -> Result<Vec<Node<D>>, PdeError> {
    nodes.sort_by_key(|n| n.index());
    for (expected, node) in nodes.iter().enumerate() {
        if !node.is_finite() {
            return Err(PdeError::InvalidGeometry(format!(
                "node {} has non-finite coordinates",
                node.index()
            )));
        }
        if node.index() != expected {
            if expected > 0 && node.index() == expected - 1 {
                return Err(PdeError::DuplicateNodeIndex(node.index()));
            }
            return Err(PdeError::NodeIndexGap {
                expected,
                found: node.index(),
            });
        }
    }
    Ok(nodes)
}

impl<const D: usize> DebugInvariants for FeMesh<D> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "FeMesh");
    }

    fn validate_invariants(&self) -> Result<(), PdeError> {
        for (pos, node) in self.nodes.iter().enumerate() {
            if node.index() != pos {
                return Err(PdeError::NodeIndexGap {
                    expected: pos,
                    found: node.index(),
                });
            }
        }
        for (e, el) in self.elements.iter().enumerate() {
            if el.nodes.len() != el.cell_type.num_vertices() {
                return Err(PdeError::InvalidGeometry(format!(
                    "element {e} has {} nodes, expected {}",
                    el.nodes.len(),
                    el.cell_type.num_vertices()
                )));
            }
            if let Some(&node) = el.nodes.iter().find(|&&n| n >= self.nodes.len()) {
                return Err(PdeError::MissingElementNode { element: e, node });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_nodes_sorts_by_index_and_triangulates() {
        let nodes = vec![
            Node::new(2, [1.0, 1.0]),
            Node::new(0, [0.0, 0.0]),
            Node::new(1, [1.0, 0.0]),
        ];
        let mesh = FeMesh::from_nodes(nodes).unwrap();
        assert_eq!(mesh.num_nodes(), 3);
        assert_eq!(mesh.node(2).unwrap().location(), &[1.0, 1.0]);
        assert_eq!(mesh.num_elements(), 1);
        assert_eq!(mesh.elements()[0].cell_type(), CellType::Triangle);
        assert!((mesh.element_measure(0).unwrap().abs() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn gaps_and_duplicates_are_rejected() {
        let gap = vec![Node::new(0, [0.0]), Node::new(2, [1.0])];
        assert_eq!(
            FeMesh::from_nodes(gap).unwrap_err(),
            PdeError::NodeIndexGap { expected: 1, found: 2 }
        );
        let dup = vec![Node::new(0, [0.0]), Node::new(0, [1.0])];
        assert_eq!(FeMesh::from_nodes(dup).unwrap_err(), PdeError::DuplicateNodeIndex(0));
    }

    #[test]
    fn from_parts_checks_connectivity() {
        let nodes = vec![Node::new(0, [0.0, 0.0]), Node::new(1, [1.0, 0.0]), Node::new(2, [0.0, 1.0])];
        assert!(FeMesh::from_parts(nodes.clone(), vec![vec![0, 1, 2]]).is_ok());
        assert_eq!(
            FeMesh::from_parts(nodes.clone(), vec![vec![0, 1, 5]]).unwrap_err(),
            PdeError::MissingElementNode { element: 0, node: 5 }
        );
        assert!(matches!(
            FeMesh::from_parts(nodes, vec![vec![0, 1]]).unwrap_err(),
            PdeError::InvalidGeometry(_)
        ));
    }

    #[test]
    fn moving_a_node_keeps_connectivity() {
        let nodes = vec![Node::new(0, [0.0]), Node::new(1, [1.0])];
        let mut mesh = FeMesh::from_nodes(nodes).unwrap();
        mesh.set_node_location(1, [2.0]).unwrap();
        assert_eq!(mesh.element_measure(0).map(f64::abs), Some(2.0));
        assert!(mesh.set_node_location(7, [0.0]).is_err());
    }
}
