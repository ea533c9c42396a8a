use crate::cli::GenerateArgs;
use crate::error::{CliError, Result};
use lmpforge::core::io::data::{AtomStyle, WriteOptions};
use lmpforge::core::io::document::StructureDocument;
use lmpforge::workflows::generate;
use std::collections::HashMap;
use std::fs;
use tracing::{debug, info};

pub fn run(args: GenerateArgs) -> Result<()> {
    let text = fs::read_to_string(&args.input).map_err(|source| CliError::FileRead {
        path: args.input.clone(),
        source,
    })?;
    let document = StructureDocument::from_toml_str(&text)?;

    let comment = args
        .comment
        .clone()
        .or_else(|| document.comment.clone())
        .unwrap_or_else(|| WriteOptions::default().comment);

    let structure = document.into_structure()?;
    let options = WriteOptions {
        atom_style: args.atom_style.parse::<AtomStyle>()?,
        charges: parse_charge_overrides(&args.charges)?,
        round_dp: args.round_dp,
        comment,
    };

    let generated = generate::run(&structure, &options)?;
    debug!(transform = ?generated.transform.matrix(), "Coordinate transform applied.");

    fs::write(&args.output, &generated.content).map_err(|source| CliError::FileWrite {
        path: args.output.clone(),
        source,
    })?;

    info!(
        "Wrote {} ({} sites, {} kinds).",
        args.output.display(),
        structure.sites().len(),
        structure.kinds().len()
    );
    println!("Wrote {}", args.output.display());
    Ok(())
}

/// Parses repeated `LABEL=VALUE` charge overrides into a map.
fn parse_charge_overrides(pairs: &[String]) -> Result<HashMap<String, f64>> {
    let mut charges = HashMap::new();
    for pair in pairs {
        let (label, value) = pair.split_once('=').ok_or_else(|| {
            CliError::Argument(format!(
                "charge override '{}' is not of the form LABEL=VALUE",
                pair
            ))
        })?;
        let charge: f64 = value.parse().map_err(|_| {
            CliError::Argument(format!("charge value '{}' is not a number", value))
        })?;
        charges.insert(label.to_string(), charge);
    }
    Ok(charges)
}
