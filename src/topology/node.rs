//! `Node`: a finite-element node with an index and a spatial location.
//!
//! Node indices double as positions in the PDE solution vector, so a mesh
//! built from nodes keeps them ordered by index.

use std::fmt;

/// A mesh node in `D`-dimensional space.
#[derive(Copy, Clone, PartialEq)]
pub struct Node<const D: usize> {
    index: usize,
    location: [f64; D],
}

impl<const D: usize> Node<D> {
    /// Creates a node with the given index and location.
    #[inline]
    pub const fn new(index: usize, location: [f64; D]) -> Self {
        Self { index, location }
    }

    /// Index of this node within its mesh.
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Spatial coordinates of the node.
    #[inline]
    pub fn location(&self) -> &[f64; D] {
        &self.location
    }

    #[inline]
    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    #[inline]
    pub(crate) fn set_location(&mut self, location: [f64; D]) {
        self.location = location;
    }

    /// `true` when every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.location.iter().all(|x| x.is_finite())
    }
}

impl<const D: usize> fmt::Debug for Node<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("index", &self.index)
            .field("location", &self.location)
            .finish()
    }
}

/// Squared Euclidean distance between two locations.
#[inline]
pub fn distance_squared<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Arithmetic mean of a set of locations; `None` for an empty set.
pub fn mean_location<'a, const D: usize>(
    points: impl IntoIterator<Item = &'a [f64; D]>,
) -> Option<[f64; D]> {
    let mut sum = [0.0; D];
    let mut count = 0usize;
    for p in points {
        for (s, x) in sum.iter_mut().zip(p) {
            *s += x;
        }
        count += 1;
    }
    if count == 0 {
        return None;
    }
    for s in &mut sum {
        *s /= count as f64;
    }
    Some(sum)
}
