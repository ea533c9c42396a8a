use nalgebra::{Matrix3, Vector3};

/// Represents the periodic simulation box of a crystal structure.
///
/// The three lattice vectors are stored as the rows of a 3x3 matrix, so
/// `matrix.row(i)` is the i-th lattice vector expressed in Cartesian
/// coordinates. All downstream geometry (triangularization, coordinate
/// transforms) assumes this row-vector convention.
///
/// A cell must be non-degenerate (linearly independent rows) for the
/// triangularization to produce a usable simulation box; degeneracy is
/// checked at the serialization boundary rather than at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    matrix: Matrix3<f64>,
}

impl Cell {
    /// Creates a cell from three lattice vectors.
    ///
    /// # Arguments
    ///
    /// * `a`, `b`, `c` - The lattice vectors, which become rows 0, 1, and 2.
    pub fn from_vectors(a: Vector3<f64>, b: Vector3<f64>, c: Vector3<f64>) -> Self {
        Self {
            matrix: Matrix3::from_rows(&[a.transpose(), b.transpose(), c.transpose()]),
        }
    }

    /// Creates a cell directly from a row-vector lattice matrix.
    pub fn from_matrix(matrix: Matrix3<f64>) -> Self {
        Self { matrix }
    }

    /// Returns the lattice matrix (rows are lattice vectors).
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Returns the i-th lattice vector.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not 0, 1, or 2.
    pub fn vector(&self, index: usize) -> Vector3<f64> {
        self.matrix.row(index).transpose()
    }

    /// Returns the lengths of the three lattice vectors.
    pub fn lengths(&self) -> [f64; 3] {
        [
            self.vector(0).norm(),
            self.vector(1).norm(),
            self.vector(2).norm(),
        ]
    }

    /// Returns the (unsigned) cell volume.
    pub fn volume(&self) -> f64 {
        self.matrix.determinant().abs()
    }

    /// Returns `true` if the cell volume is below `tolerance`.
    ///
    /// A degenerate cell has linearly dependent lattice vectors and cannot
    /// describe a periodic simulation box.
    pub fn is_degenerate(&self, tolerance: f64) -> bool {
        self.volume() < tolerance
    }
}
