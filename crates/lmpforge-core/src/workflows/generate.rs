use crate::core::geometry::triangular::CoordTransform;
use crate::core::io::data::{DataError, LammpsDataFile, WriteOptions};
use crate::core::io::traits::StructureFile;
use crate::core::models::structure::Structure;
use tracing::{debug, info, instrument};

/// The result of a structure-file generation: the rendered file content and
/// the isometry that was applied to the cell and every site position.
///
/// Callers that carry other frame-dependent vector quantities for the same
/// structure (velocities, forces) must apply `transform` to them as well,
/// and must reuse this value rather than recompute it.
#[derive(Debug, Clone)]
pub struct GeneratedStructure {
    /// The complete structure-file text. Persisting it is the caller's
    /// responsibility; this crate performs no file I/O on its own here.
    pub content: String,
    /// The transform from the original frame into the triangularized frame.
    pub transform: CoordTransform,
}

/// Renders a structure into engine-consumable data-file text.
///
/// This is the entry point the orchestration layer calls once per structure.
/// The structure is validated up front (non-degenerate cell, every site kind
/// resolvable); on error no text is produced.
///
/// # Errors
///
/// Returns a [`DataError`] if the cell is degenerate, a site references an
/// undefined kind, or the atom style cannot render the structure.
#[instrument(skip_all, name = "structure_generation")]
pub fn run(structure: &Structure, options: &WriteOptions) -> Result<GeneratedStructure, DataError> {
    info!(
        sites = structure.sites().len(),
        kinds = structure.kinds().len(),
        style = %options.atom_style,
        "Rendering structure file."
    );

    let (content, transform) = LammpsDataFile::render_to_string(structure, options)?;

    debug!(bytes = content.len(), "Structure file rendered.");
    Ok(GeneratedStructure { content, transform })
}
