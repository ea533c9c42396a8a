use crate::core::geometry::triangular::CoordTransform;
use crate::core::models::structure::Structure;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Defines the interface for rendering a structure into an engine-consumable
/// text file.
///
/// Implementors own the format-specific layout and validation; the trait
/// supplies path- and string-based conveniences on top of the streaming
/// writer. Every method returns the [`CoordTransform`] that was applied to
/// the structure, so callers can carry sibling vector quantities (velocities,
/// forces) into the same frame.
pub trait StructureFile {
    /// Format-specific rendering options.
    type Options;

    /// The error type for rendering operations.
    type Error: Error + From<io::Error>;

    /// Renders a structure to a writer.
    ///
    /// Implementations must validate their inputs in full before emitting the
    /// first byte: on error, nothing has been written.
    ///
    /// # Arguments
    ///
    /// * `structure` - The structure to render.
    /// * `options` - Format-specific rendering options.
    /// * `writer` - The writer to output to.
    ///
    /// # Return
    ///
    /// Returns the coordinate transform applied to the structure.
    ///
    /// # Errors
    ///
    /// Returns an error if the structure violates the format's requirements
    /// or the writer fails.
    fn write_to(
        structure: &Structure,
        options: &Self::Options,
        writer: &mut impl Write,
    ) -> Result<CoordTransform, Self::Error>;

    /// Renders a structure to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or rendering fails.
    fn write_to_path<P: AsRef<Path>>(
        structure: &Structure,
        options: &Self::Options,
        path: P,
    ) -> Result<CoordTransform, Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        let transform = Self::write_to(structure, options, &mut writer)?;
        writer.flush()?;
        Ok(transform)
    }

    /// Renders a structure into an owned string.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails; no partial text is returned.
    fn render_to_string(
        structure: &Structure,
        options: &Self::Options,
    ) -> Result<(String, CoordTransform), Self::Error> {
        let mut buffer = Vec::new();
        let transform = Self::write_to(structure, options, &mut buffer)?;
        Ok((String::from_utf8_lossy(&buffer).into_owned(), transform))
    }
}
