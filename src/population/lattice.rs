//! Regular lattices underlying Potts and cellular-automaton populations.
//!
//! Sites are numbered row-major with the first coordinate varying fastest,
//! and sit at `spacing * multi_index`.

use crate::pde_error::PdeError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lattice<const D: usize> {
    dims: [usize; D],
    spacing: f64,
}

impl<const D: usize> Lattice<D> {
    /// A lattice with `dims[k]` sites along axis `k`.
    pub fn new(dims: [usize; D], spacing: f64) -> Result<Self, PdeError> {
        if dims.iter().any(|&n| n == 0) {
            return Err(PdeError::InvalidGeometry(format!("lattice dimensions {dims:?} contain zero")));
        }
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(PdeError::InvalidGeometry(format!("lattice spacing {spacing} must be positive")));
        }
        Ok(Self { dims, spacing })
    }

    #[inline]
    pub fn dims(&self) -> [usize; D] {
        self.dims
    }

    #[inline]
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Total number of sites.
    pub fn num_sites(&self) -> usize {
        self.dims.iter().product()
    }

    /// Site index of a multi-index, or `None` outside the lattice.
    pub fn site_index(&self, multi: [usize; D]) -> Option<usize> {
        let mut index = 0;
        let mut stride = 1;
        for k in 0..D {
            if multi[k] >= self.dims[k] {
                return None;
            }
            index += multi[k] * stride;
            stride *= self.dims[k];
        }
        Some(index)
    }

    /// Multi-index of a site.
    pub fn multi_index(&self, site: usize) -> Option<[usize; D]> {
        if site >= self.num_sites() {
            return None;
        }
        let mut rest = site;
        let mut multi = [0; D];
        for k in 0..D {
            multi[k] = rest % self.dims[k];
            rest /= self.dims[k];
        }
        Some(multi)
    }

    /// Spatial location of a site.
    pub fn site_location(&self, site: usize) -> Option<[f64; D]> {
        let multi = self.multi_index(site)?;
        Some(multi.map(|i| i as f64 * self.spacing))
    }

    pub(crate) fn check_site(&self, site: usize) -> Result<(), PdeError> {
        if site < self.num_sites() {
            Ok(())
        } else {
            Err(PdeError::InvalidGeometry(format!(
                "site {site} outside lattice with {} sites",
                self.num_sites()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_numbering() {
        let lattice = Lattice::new([3, 2], 0.5).unwrap();
        assert_eq!(lattice.num_sites(), 6);
        assert_eq!(lattice.site_index([2, 1]), Some(5));
        assert_eq!(lattice.multi_index(4), Some([1, 1]));
        assert_eq!(lattice.site_location(4), Some([0.5, 0.5]));
        assert_eq!(lattice.site_index([3, 0]), None);
        assert_eq!(lattice.site_location(6), None);
    }

    #[test]
    fn rejects_degenerate_lattices() {
        assert!(Lattice::new([0, 2], 1.0).is_err());
        assert!(Lattice::new([2, 2], 0.0).is_err());
        assert!(Lattice::new([2], f64::NAN).is_err());
    }
}
