//! # Workflows Module
//!
//! The public, user-facing API. Workflows tie the models, geometry, and
//! serializers together into complete operations an orchestration layer can
//! call directly.

pub mod generate;
