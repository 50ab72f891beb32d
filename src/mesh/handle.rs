//! Ownership of the mesh a PDE modifier solves on.
//!
//! A mesh is either shared with the population that produced it (mesh-based
//! and vertex-based populations) or owned outright because it was synthesized
//! from cell positions. Dropping or replacing a handle releases an owned mesh
//! exactly once and never touches a borrowed one beyond its reference count.

use super::FeMesh;
use std::ops::Deref;
use std::sync::Arc;

/// Either a mesh shared with a cell population, or one owned by the holder.
#[derive(Clone, Debug)]
pub enum FeMeshHandle<const D: usize> {
    /// Aliases a mesh whose lifetime the population manages.
    Borrowed(Arc<FeMesh<D>>),
    /// Freshly synthesized; released when the handle is dropped or replaced.
    Owned(Box<FeMesh<D>>),
}

impl<const D: usize> FeMeshHandle<D> {
    /// `true` when this handle is responsible for releasing the mesh.
    #[inline]
    pub fn is_owned(&self) -> bool {
        matches!(self, FeMeshHandle::Owned(_))
    }

    /// The population's shared mesh, if borrowed.
    pub fn as_shared(&self) -> Option<&Arc<FeMesh<D>>> {
        match self {
            FeMeshHandle::Borrowed(mesh) => Some(mesh),
            FeMeshHandle::Owned(_) => None,
        }
    }
}

impl<const D: usize> Deref for FeMeshHandle<D> {
    type Target = FeMesh<D>;

    fn deref(&self) -> &FeMesh<D> {
        match self {
            FeMeshHandle::Borrowed(mesh) => &**mesh,
            FeMeshHandle::Owned(mesh) => &**mesh,
        }
    }
}
