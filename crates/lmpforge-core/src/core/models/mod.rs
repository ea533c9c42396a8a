//! # Structure Models Module
//!
//! This module contains the data structures used to represent periodic crystal
//! structures, providing the foundation for everything the library renders.
//!
//! ## Key Components
//!
//! - [`cell`] - The periodic simulation box as a 3x3 lattice basis
//! - [`element`] - Standard atomic masses keyed by element symbol
//! - [`kind`] - Species definitions (label plus atomic mass)
//! - [`site`] - Individual atoms with a position and a kind reference
//! - [`structure`] - The validated aggregate of cell, kinds, and sites
//!
//! ## Usage
//!
//! Structures are assembled through [`structure::StructureBuilder`]:
//!
//! ```ignore
//! use lmpforge::core::models::{cell::Cell, kind::Kind, site::Site, structure::StructureBuilder};
//!
//! let structure = StructureBuilder::new()
//!     .cell(Cell::from_matrix(matrix))
//!     .kind(Kind::new("Fe", 55.845))
//!     .site(Site::new("Fe", Point3::new(0.0, 0.0, 0.0)))
//!     .build()?;
//! ```

pub mod cell;
pub mod element;
pub mod kind;
pub mod site;
pub mod structure;
