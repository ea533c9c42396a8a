//! # lmpforge Core Library
//!
//! A library for converting atomistic crystal structures into the textual data
//! files consumed by the LAMMPS molecular-dynamics engine.
//!
//! LAMMPS requires the simulation cell to be a lower-triangular matrix with a
//! positive diagonal, so an arbitrary lattice basis must be rotated (and
//! possibly reflected) before it can be written out. This crate implements that
//! triangularization, applies the same isometry to every site position, and
//! renders the result under the strict formatting and ordering rules the
//! engine's `read_data` command expects.
//!
//! ## Architectural Philosophy
//!
//! The library is split into two layers with a clear separation of concerns:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Structure`, `Cell`,
//!   `Kind`, `Site`), the pure cell-triangularization geometry, and the
//!   data-file serialization seam.
//!
//! - **[`workflows`]: The Public API.** The highest-level, user-facing layer.
//!   It ties the models, geometry, and serializer together into a single entry
//!   point that returns the rendered file content along with the coordinate
//!   transform, so callers can apply the same transform to sibling vector
//!   quantities such as velocities.

pub mod core;
pub mod workflows;
