use crate::core::models::cell::Cell;
use nalgebra::{Matrix3, Point3, Vector3};

/// A cell in the engine's canonical orientation: lower-triangular with a
/// positive diagonal.
///
/// The diagonal entries are the box extents along x, y, and z; the three
/// entries below the diagonal are the tilt factors of a triclinic box. The
/// upper triangle is exactly zero (produced by the triangular factorization,
/// not rounded away).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangularCell {
    matrix: Matrix3<f64>,
}

impl TriangularCell {
    /// Returns the full lattice matrix (rows are lattice vectors).
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Returns the box extents `(xx, yy, zz)`.
    pub fn extents(&self) -> Vector3<f64> {
        self.matrix.diagonal()
    }

    /// Returns the tilt factors `(xy, xz, yz)`, i.e. the entries at
    /// `(1,0)`, `(2,0)`, and `(2,1)` of the lattice matrix.
    pub fn tilts(&self) -> (f64, f64, f64) {
        (
            self.matrix[(1, 0)],
            self.matrix[(2, 0)],
            self.matrix[(2, 1)],
        )
    }
}

/// The isometry mapping the original frame into the triangularized frame.
///
/// The transform is an orthogonal matrix (a rotation composed with an
/// axis-aligned reflection), so it preserves distances and angles. It is
/// produced once per cell and must be applied uniformly to every
/// frame-dependent vector quantity of the same structure: positions here,
/// and e.g. velocities on the caller's side. Reuse the returned value rather
/// than recomputing it, so all derived quantities share the exact same frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordTransform {
    matrix: Matrix3<f64>,
}

impl CoordTransform {
    /// Returns the transform matrix.
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Maps a position into the triangularized frame.
    pub fn apply_point(&self, position: &Point3<f64>) -> Point3<f64> {
        self.matrix * position
    }

    /// Maps a free vector (e.g. a velocity) into the triangularized frame.
    pub fn apply_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.matrix * vector
    }
}

/// Brings a cell into lower-triangular, positive-diagonal form.
///
/// The transpose of the lattice matrix is QR-factorized into an orthogonal
/// `Q` and an upper-triangular `R`; the transpose of `R` is then the cell in
/// lower-triangular orientation. Any negative diagonal entry is corrected by
/// an axis-aligned reflection, each axis independently, so the returned cell
/// always has a positive diagonal for non-degenerate input.
///
/// Returns the triangular cell together with the [`CoordTransform`] that
/// carries row vectors of the original cell (and any site position) into the
/// new frame.
///
/// The cell must be non-degenerate. A singular lattice matrix is not
/// detected here; the factorization output (zero diagonal entries) is
/// propagated as-is, and callers validate before rendering.
pub fn triangularize(cell: &Cell) -> (TriangularCell, CoordTransform) {
    let qr = cell.matrix().transpose().qr();
    let q = qr.q();
    let lower = qr.r().transpose();

    // Flip every axis whose extent came out of the factorization negative.
    let mut inversion = Matrix3::<f64>::identity();
    for entry in 0..3 {
        if lower[(entry, entry)] < 0.0 {
            inversion[(entry, entry)] = -1.0;
        }
    }

    let matrix = lower * inversion;
    let transform = inversion * q.transpose();

    (
        TriangularCell { matrix },
        CoordTransform { matrix: transform },
    )
}
