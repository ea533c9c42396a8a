use crate::cli::CheckArgs;
use crate::error::{CliError, Result};
use lmpforge::core::geometry::triangular;
use lmpforge::core::io::document::StructureDocument;
use lmpforge::core::models::structure::KindIndex;
use std::fs;
use tracing::info;

/// Cells below this volume are reported as degenerate, matching the
/// serializer's rejection threshold.
const DEGENERACY_TOLERANCE: f64 = 1e-10;

pub fn run(args: CheckArgs) -> Result<()> {
    let text = fs::read_to_string(&args.input).map_err(|source| CliError::FileRead {
        path: args.input.clone(),
        source,
    })?;
    let structure = StructureDocument::from_toml_str(&text)?.into_structure()?;
    info!("Document '{}' parsed.", args.input.display());

    let kind_index = KindIndex::from_sites(structure.sites());
    for (index, site) in structure.sites().iter().enumerate() {
        if structure.kind(&site.kind_label).is_none() {
            return Err(CliError::Argument(format!(
                "site {} references undefined kind '{}'",
                index, site.kind_label
            )));
        }
    }

    println!("Structure: {}", args.input.display());
    println!("  sites:      {}", structure.sites().len());
    println!("  atom types: {}", kind_index.len());

    let lengths = structure.cell().lengths();
    println!(
        "  cell lengths: {:.6} {:.6} {:.6}",
        lengths[0], lengths[1], lengths[2]
    );
    println!("  cell volume:  {:.6}", structure.cell().volume());

    if structure.cell().is_degenerate(DEGENERACY_TOLERANCE) {
        return Err(CliError::Argument(
            "cell is degenerate; lattice vectors must be linearly independent".to_string(),
        ));
    }

    let (triangular_cell, transform) = triangular::triangularize(structure.cell());
    let extents = triangular_cell.extents();
    let (xy, xz, yz) = triangular_cell.tilts();
    println!(
        "  box extents:  {:.6} {:.6} {:.6}",
        extents.x, extents.y, extents.z
    );
    println!("  box tilts:    {:.6} {:.6} {:.6}", xy, xz, yz);
    println!("  transform:");
    let matrix = transform.matrix();
    for row in 0..3 {
        println!(
            "    {:12.8} {:12.8} {:12.8}",
            matrix[(row, 0)],
            matrix[(row, 1)],
            matrix[(row, 2)]
        );
    }

    println!("OK");
    Ok(())
}
