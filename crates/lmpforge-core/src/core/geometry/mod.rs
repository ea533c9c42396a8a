//! # Lattice Geometry Module
//!
//! Pure numeric routines for bringing an arbitrary lattice basis into the
//! lower-triangular, positive-diagonal form the target engine requires, and
//! for carrying site coordinates into that frame.

pub mod triangular;
