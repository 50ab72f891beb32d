//! Bowyer-Watson Delaunay triangulation in `D` dimensions.
//!
//! Used to connect synthesized node sets (point clouds, lattice centroids)
//! into a simplicial mesh. Points are inserted one by one into an enclosing
//! super-simplex; simplices whose circumsphere strictly contains the new
//! point are removed and the cavity is re-filled by connecting its boundary
//! faces to the point. Simplices touching the super-simplex are discarded at
//! the end.

use crate::topology::node::distance_squared;
use itertools::Itertools;
use std::collections::HashMap;

/// Distance of the super-simplex from the point cloud, in bounding-box extents.
const SUPER_SIMPLEX_SCALE: f64 = 1.0e3;
/// Relative tolerance for the strict in-circumsphere test.
const IN_SPHERE_EPS: f64 = 1.0e-12;
/// Relative pivot threshold below which a simplex is considered flat.
const PIVOT_EPS: f64 = 1.0e-14;

#[derive(Clone, Debug)]
struct Simplex<const D: usize> {
    vertices: Vec<usize>,
    sphere: Option<([f64; D], f64)>,
}

impl<const D: usize> Simplex<D> {
    fn new(vertices: Vec<usize>, points: &[[f64; D]]) -> Self {
        let sphere = circumsphere(&vertices, points);
        Self { vertices, sphere }
    }

    fn strictly_contains(&self, p: &[f64; D]) -> bool {
        match &self.sphere {
            Some((centre, r2)) => distance_squared(centre, p) < r2 * (1.0 - IN_SPHERE_EPS),
            None => false,
        }
    }
}

/// Centre and squared radius of the sphere through the `D + 1` vertices, or
/// `None` when the simplex is degenerate.
fn circumsphere<const D: usize>(vertices: &[usize], points: &[[f64; D]]) -> Option<([f64; D], f64)> {
    let v0 = &points[vertices[0]];
    let mut a = [[0.0f64; D]; D];
    let mut b = [0.0f64; D];
    let mut scale = 0.0f64;
    for i in 0..D {
        let vi = &points[vertices[i + 1]];
        for j in 0..D {
            a[i][j] = 2.0 * (vi[j] - v0[j]);
            scale = scale.max(a[i][j].abs());
        }
        b[i] = vi.iter().map(|x| x * x).sum::<f64>() - v0.iter().map(|x| x * x).sum::<f64>();
    }
    let centre = solve(a, b, scale * PIVOT_EPS)?;
    Some((centre, distance_squared(&centre, v0)))
}

/// Gaussian elimination with partial pivoting.
fn solve<const D: usize>(mut a: [[f64; D]; D], mut b: [f64; D], tol: f64) -> Option<[f64; D]> {
    for col in 0..D {
        let pivot = (col..D).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() <= tol {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        for row in col + 1..D {
            let factor = a[row][col] / a[col][col];
            for k in col..D {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }
    let mut x = [0.0; D];
    for row in (0..D).rev() {
        let tail: f64 = (row + 1..D).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}

/// Vertices of a simplex that strictly encloses the bounding box of `points`.
fn super_simplex<const D: usize>(points: &[[f64; D]]) -> Vec<[f64; D]> {
    let mut lo = [f64::INFINITY; D];
    let mut hi = [f64::NEG_INFINITY; D];
    for p in points {
        for k in 0..D {
            lo[k] = lo[k].min(p[k]);
            hi[k] = hi[k].max(p[k]);
        }
    }
    let extent = (0..D).map(|k| hi[k] - lo[k]).fold(0.0, f64::max);
    let extent = if extent > 0.0 { extent } else { 1.0 };
    let s = SUPER_SIMPLEX_SCALE * extent;
    let mut base = [0.0; D];
    for k in 0..D {
        base[k] = 0.5 * (lo[k] + hi[k]) - s;
    }
    let edge = (2 * D + 1) as f64 * s;
    let mut out = Vec::with_capacity(D + 1);
    out.push(base);
    for k in 0..D {
        let mut v = base;
        v[k] += edge;
        out.push(v);
    }
    out
}

/// Triangulates `points`, returning simplices as lists of `D + 1` point indices.
///
/// Fewer than `D + 1` points yield no simplices. A point that coincides with
/// an earlier one is left unconnected.
pub(crate) fn triangulate<const D: usize>(points: &[[f64; D]]) -> Vec<Vec<usize>> {
    let n = points.len();
    if D == 0 || n < D + 1 {
        return Vec::new();
    }

    let mut all: Vec<[f64; D]> = points.to_vec();
    all.extend(super_simplex(points));
    let mut simplices = vec![Simplex::new((n..n + D + 1).collect(), &all)];

    for p in 0..n {
        let (bad, good): (Vec<_>, Vec<_>) = simplices
            .into_iter()
            .partition(|s| s.strictly_contains(&all[p]));
        simplices = good;
        if bad.is_empty() {
            log::warn!("point {p} coincides with an existing node and is left unconnected");
            continue;
        }

        let mut faces: HashMap<Vec<usize>, usize> = HashMap::new();
        for simplex in &bad {
            for face in simplex.vertices.iter().copied().sorted().combinations(D) {
                *faces.entry(face).or_insert(0) += 1;
            }
        }
        for (mut face, count) in faces {
            if count == 1 {
                face.push(p);
                simplices.push(Simplex::new(face, &all));
            }
        }
    }

    let before = simplices.len();
    let out: Vec<Vec<usize>> = simplices
        .into_iter()
        .filter(|s| s.vertices.iter().all(|&v| v < n))
        .filter(|s| s.sphere.is_some())
        .map(|s| s.vertices)
        .collect();
    log::trace!("delaunay: {n} points, {} simplices kept of {before}", out.len());
    out
}
