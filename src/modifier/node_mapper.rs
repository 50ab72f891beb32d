//! Which mesh node holds each cell's solution value.

use crate::population::{CellPopulation, Population};

/// Node index for every live cell, in canonical cell order.
///
/// - vertex-based: location index plus the vertex mesh's node count, since
///   the derived triangulation appends one centroid node per cell after the
///   original vertices;
/// - site-based: position in the iteration, matching the sequential node
///   numbering used when the mesh was synthesized;
/// - otherwise: the population location index.
pub fn tet_node_indices<const D: usize>(population: &CellPopulation<D>) -> Vec<usize> {
    match population {
        CellPopulation::VertexBased(p) => {
            let offset = p.vertex_mesh().num_nodes();
            p.sites().map(|s| s.location_index + offset).collect()
        }
        CellPopulation::SiteBased(p) => p.sites().map(|s| s.ordinal).collect(),
        CellPopulation::MeshBased(_)
        | CellPopulation::MeshBasedWithGhostNodes(_)
        | CellPopulation::NodeBased(_)
        | CellPopulation::LatticeBased(_) => population.sites().map(|s| s.location_index).collect(),
    }
}
