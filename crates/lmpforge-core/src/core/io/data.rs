use crate::core::geometry::triangular::{self, CoordTransform};
use crate::core::io::traits::StructureFile;
use crate::core::models::structure::{KindIndex, Structure};
use nalgebra::Point3;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use thiserror::Error;

/// Cells with a volume below this are rejected before any geometry runs.
const DEGENERACY_TOLERANCE: f64 = 1e-10;

/// Treatment of the per-atom columns in the `Atoms` section.
///
/// The engine's `read_data` command expects a different column layout per
/// style; only the two styles below are supported here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AtomStyle {
    /// `id kind-id x y z` - point particles without charge.
    #[default]
    Atomic,
    /// `id kind-id q x y z` - point particles carrying a charge column.
    Charge,
}

impl FromStr for AtomStyle {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "atomic" => Ok(AtomStyle::Atomic),
            "charge" => Ok(AtomStyle::Charge),
            _ => Err(DataError::UnsupportedStyle {
                style: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for AtomStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomStyle::Atomic => write!(f, "atomic"),
            AtomStyle::Charge => write!(f, "charge"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Unsupported atom style '{style}'; expected 'atomic' or 'charge'")]
    UnsupportedStyle { style: String },

    #[error("Cell is degenerate (volume {volume:.3e}); lattice vectors must be linearly independent")]
    DegenerateCell { volume: f64 },

    #[error("Site {index} references kind '{label}', which the structure does not define")]
    UndefinedKind { index: usize, label: String },
}

/// Options controlling how a structure is rendered into a data file.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// The atom style of the `Atoms` section.
    pub atom_style: AtomStyle,
    /// Per-kind charge overrides, keyed by kind label. Only consulted by the
    /// `charge` style; takes precedence over per-site charges. Kinds absent
    /// from the map fall back to the site charge, then to 0.0.
    pub charges: HashMap<String, f64>,
    /// When set, cell and position values are rounded to this many decimal
    /// places (numerically, before formatting).
    pub round_dp: Option<u32>,
    /// The header comment on the first line of the file.
    pub comment: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atom_style: AtomStyle::default(),
            charges: HashMap::new(),
            round_dp: None,
            comment: "generated by lmpforge".to_string(),
        }
    }
}

// .round() can return -0.0; adding 0.0 keeps the sign out of the output.
fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor + 0.0
}

/// The structure-file format consumed by the engine's `read_data` command.
///
/// Layout: a header comment, the atom and atom-type counts, the box bounds
/// (diagonal extents starting at 0.0) and tilt factors, the mass table
/// sorted lexicographically by kind label, and one atom line per site in
/// input order. Kind ids in the atom table follow first-encounter order over
/// the sites; the two orderings are independent, and both are relied on by
/// downstream inputs.
pub struct LammpsDataFile;

impl StructureFile for LammpsDataFile {
    type Options = WriteOptions;
    type Error = DataError;

    fn write_to(
        structure: &Structure,
        options: &Self::Options,
        writer: &mut impl Write,
    ) -> Result<CoordTransform, Self::Error> {
        let cell = structure.cell();
        if cell.is_degenerate(DEGENERACY_TOLERANCE) {
            return Err(DataError::DegenerateCell {
                volume: cell.volume(),
            });
        }

        let kind_index = KindIndex::from_sites(structure.sites());
        let masses = structure.kind_masses();
        for (index, site) in structure.sites().iter().enumerate() {
            if !masses.contains_key(site.kind_label.as_str()) {
                return Err(DataError::UndefinedKind {
                    index,
                    label: site.kind_label.clone(),
                });
            }
        }

        let (triangular, transform) = triangular::triangularize(cell);
        let mut box_matrix = *triangular.matrix();
        let mut positions: Vec<Point3<f64>> = structure
            .sites()
            .iter()
            .map(|site| transform.apply_point(&site.position))
            .collect();

        if let Some(decimals) = options.round_dp {
            box_matrix = box_matrix.map(|value| round_to(value, decimals));
            for position in &mut positions {
                *position = position.map(|value| round_to(value, decimals));
            }
        }

        writeln!(writer, "# {}\n", options.comment)?;
        writeln!(writer, "{} atoms", structure.sites().len())?;
        writeln!(writer, "{} atom types\n", kind_index.len())?;

        writeln!(writer, "0.0 {:20.10} xlo xhi", box_matrix[(0, 0)])?;
        writeln!(writer, "0.0 {:20.10} ylo yhi", box_matrix[(1, 1)])?;
        writeln!(writer, "0.0 {:20.10} zlo zhi", box_matrix[(2, 2)])?;
        writeln!(
            writer,
            "{:20.10} {:20.10} {:20.10} xy xz yz\n",
            box_matrix[(1, 0)],
            box_matrix[(2, 0)],
            box_matrix[(2, 1)]
        )?;

        writeln!(writer, "Masses\n")?;
        let mut mass_entries: Vec<(&str, usize)> = kind_index
            .labels()
            .iter()
            .enumerate()
            .map(|(position, label)| (label.as_str(), position + 1))
            .collect();
        mass_entries.sort_unstable_by_key(|&(label, _)| label);
        for (label, id) in mass_entries {
            // Cannot fail: every indexed label passed the mass check above.
            let mass = masses[label];
            writeln!(writer, "{} {:20.10} ", id, mass)?;
        }
        writeln!(writer)?;

        writeln!(writer, "Atoms\n")?;
        for (index, (site, position)) in structure.sites().iter().zip(&positions).enumerate() {
            let kind_id = kind_index.id_of(&site.kind_label).unwrap();

            match options.atom_style {
                AtomStyle::Atomic => {
                    writeln!(
                        writer,
                        "{} {} {:20.10} {:20.10} {:20.10}",
                        index + 1,
                        kind_id,
                        position.x,
                        position.y,
                        position.z
                    )?;
                }
                AtomStyle::Charge => {
                    let charge = options
                        .charges
                        .get(&site.kind_label)
                        .copied()
                        .or(site.charge)
                        .unwrap_or(0.0);
                    // {:?} keeps a decimal point on integral charges.
                    writeln!(
                        writer,
                        "{} {} {:?} {:20.10} {:20.10} {:20.10}",
                        index + 1,
                        kind_id,
                        charge,
                        position.x,
                        position.y,
                        position.z
                    )?;
                }
            }
        }

        Ok(transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::cell::Cell;
    use crate::core::models::kind::Kind;
    use crate::core::models::site::Site;
    use crate::core::models::structure::StructureBuilder;
    use nalgebra::{Matrix3, Vector3};

    fn cubic_structure() -> Structure {
        StructureBuilder::new()
            .cell(Cell::from_matrix(Matrix3::from_diagonal_element(2.0)))
            .kind(Kind::new("X", 10.8))
            .site(Site::new("X", Point3::new(1.0, 1.0, 1.0)))
            .build()
            .unwrap()
    }

    #[test]
    fn atom_style_parses_supported_values() {
        assert_eq!("atomic".parse::<AtomStyle>().unwrap(), AtomStyle::Atomic);
        assert_eq!("charge".parse::<AtomStyle>().unwrap(), AtomStyle::Charge);
        assert_eq!("Charge".parse::<AtomStyle>().unwrap(), AtomStyle::Charge);
    }

    #[test]
    fn unknown_atom_style_fails_fast() {
        let err = "full".parse::<AtomStyle>().unwrap_err();
        assert!(matches!(err, DataError::UnsupportedStyle { style } if style == "full"));
    }

    #[test]
    fn cubic_cell_renders_byte_exact() {
        let structure = cubic_structure();
        let (content, transform) =
            LammpsDataFile::render_to_string(&structure, &WriteOptions::default()).unwrap();

        // The mass line ends with a space before the newline, as the engine's
        // existing inputs do.
        let expected = concat!(
            "# generated by lmpforge\n",
            "\n",
            "1 atoms\n",
            "1 atom types\n",
            "\n",
            "0.0         2.0000000000 xlo xhi\n",
            "0.0         2.0000000000 ylo yhi\n",
            "0.0         2.0000000000 zlo zhi\n",
            "        0.0000000000         0.0000000000         0.0000000000 xy xz yz\n",
            "\n",
            "Masses\n",
            "\n",
            "1        10.8000000000 \n",
            "\n",
            "Atoms\n",
            "\n",
            "1 1         1.0000000000         1.0000000000         1.0000000000\n",
        );
        assert_eq!(content, expected);
        assert!((transform.matrix() - Matrix3::identity()).norm() < 1e-10);
    }

    #[test]
    fn header_counts_match_sites_and_kinds() {
        let structure = StructureBuilder::new()
            .cell(Cell::from_matrix(Matrix3::from_diagonal_element(4.0)))
            .kind(Kind::new("Na", 22.98976928))
            .kind(Kind::new("Cl", 35.45))
            .site(Site::new("Na", Point3::new(0.0, 0.0, 0.0)))
            .site(Site::new("Cl", Point3::new(2.0, 0.0, 0.0)))
            .site(Site::new("Na", Point3::new(0.0, 2.0, 0.0)))
            .build()
            .unwrap();

        let (content, _) =
            LammpsDataFile::render_to_string(&structure, &WriteOptions::default()).unwrap();
        assert!(content.contains("3 atoms\n"));
        assert!(content.contains("2 atom types\n"));
    }

    #[test]
    fn mass_table_is_sorted_by_label_while_ids_follow_first_encounter() {
        let structure = StructureBuilder::new()
            .cell(Cell::from_matrix(Matrix3::from_diagonal_element(4.0)))
            .kind(Kind::new("B", 2.0))
            .kind(Kind::new("A", 1.0))
            .site(Site::new("B", Point3::new(0.0, 0.0, 0.0)))
            .site(Site::new("A", Point3::new(1.0, 0.0, 0.0)))
            .build()
            .unwrap();

        let (content, _) =
            LammpsDataFile::render_to_string(&structure, &WriteOptions::default()).unwrap();

        // "B" was encountered first, so it owns id 1; the mass table still
        // lists "A" (id 2) before "B" (id 1).
        let masses_at = content.find("Masses").unwrap();
        let atoms_at = content.find("Atoms").unwrap();
        let mass_block = &content[masses_at..atoms_at];
        let a_line = mass_block.find("2         1.0000000000").unwrap();
        let b_line = mass_block.find("1         2.0000000000").unwrap();
        assert!(a_line < b_line);

        let atom_block = &content[atoms_at..];
        assert!(atom_block.contains("\n1 1 "));
        assert!(atom_block.contains("\n2 2 "));
    }

    #[test]
    fn charge_style_defaults_to_zero() {
        let structure = StructureBuilder::new()
            .cell(Cell::from_matrix(Matrix3::from_diagonal_element(4.0)))
            .kind(Kind::new("X", 1.0))
            .site(Site::new("X", Point3::new(1.0, 1.0, 1.0)))
            .build()
            .unwrap();

        let options = WriteOptions {
            atom_style: AtomStyle::Charge,
            ..Default::default()
        };
        let (content, _) = LammpsDataFile::render_to_string(&structure, &options).unwrap();
        assert!(content.contains("\n1 1 0.0 "));
    }

    #[test]
    fn charge_overrides_beat_site_charges() {
        let structure = StructureBuilder::new()
            .cell(Cell::from_matrix(Matrix3::from_diagonal_element(4.0)))
            .kind(Kind::new("Li", 6.94))
            .kind(Kind::new("F", 18.998403163))
            .site(Site::with_charge("Li", Point3::new(0.0, 0.0, 0.0), 0.5))
            .site(Site::new("F", Point3::new(2.0, 0.0, 0.0)))
            .build()
            .unwrap();

        let options = WriteOptions {
            atom_style: AtomStyle::Charge,
            charges: HashMap::from([("Li".to_string(), 1.0), ("F".to_string(), -1.0)]),
            ..Default::default()
        };
        let (content, _) = LammpsDataFile::render_to_string(&structure, &options).unwrap();
        assert!(content.contains("\n1 1 1.0 "));
        assert!(content.contains("\n2 2 -1.0 "));
    }

    #[test]
    fn site_charge_is_used_when_no_override_exists() {
        let structure = StructureBuilder::new()
            .cell(Cell::from_matrix(Matrix3::from_diagonal_element(4.0)))
            .kind(Kind::new("O", 15.999))
            .site(Site::with_charge("O", Point3::new(0.0, 0.0, 0.0), -0.25))
            .build()
            .unwrap();

        let options = WriteOptions {
            atom_style: AtomStyle::Charge,
            ..Default::default()
        };
        let (content, _) = LammpsDataFile::render_to_string(&structure, &options).unwrap();
        assert!(content.contains("\n1 1 -0.25 "));
    }

    #[test]
    fn atomic_style_has_no_charge_column() {
        let (content, _) =
            LammpsDataFile::render_to_string(&cubic_structure(), &WriteOptions::default())
                .unwrap();
        let atom_line = content.lines().last().unwrap();
        assert_eq!(atom_line.split_whitespace().count(), 5);
    }

    #[test]
    fn degenerate_cell_is_rejected_before_output() {
        let structure = StructureBuilder::new()
            .cell(Cell::from_vectors(
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(2.0, 0.0, 0.0),
                Vector3::new(0.0, 0.0, 1.0),
            ))
            .kind(Kind::new("X", 1.0))
            .site(Site::new("X", Point3::origin()))
            .build()
            .unwrap();

        let mut buffer = Vec::new();
        let err =
            LammpsDataFile::write_to(&structure, &WriteOptions::default(), &mut buffer).unwrap_err();
        assert!(matches!(err, DataError::DegenerateCell { .. }));
        assert!(buffer.is_empty());
    }

    #[test]
    fn undefined_kind_is_rejected_before_output() {
        let structure = StructureBuilder::new()
            .cell(Cell::from_matrix(Matrix3::from_diagonal_element(2.0)))
            .kind(Kind::new("X", 1.0))
            .site(Site::new("X", Point3::origin()))
            .site(Site::new("Y", Point3::new(1.0, 0.0, 0.0)))
            .build()
            .unwrap();

        let mut buffer = Vec::new();
        let err =
            LammpsDataFile::write_to(&structure, &WriteOptions::default(), &mut buffer).unwrap_err();
        assert!(
            matches!(err, DataError::UndefinedKind { index: 1, label } if label == "Y")
        );
        assert!(buffer.is_empty());
    }

    #[test]
    fn rounding_applies_to_cell_and_positions() {
        let structure = StructureBuilder::new()
            .cell(Cell::from_matrix(Matrix3::from_diagonal_element(
                1.23456789,
            )))
            .kind(Kind::new("X", 1.0))
            .site(Site::new("X", Point3::new(0.111111111, -1e-12, 0.5)))
            .build()
            .unwrap();

        let options = WriteOptions {
            round_dp: Some(4),
            ..Default::default()
        };
        let (content, _) = LammpsDataFile::render_to_string(&structure, &options).unwrap();

        assert!(content.contains("0.0         1.2346000000 xlo xhi"));
        // A tiny negative value rounds to zero without keeping its sign.
        assert!(content.contains("        0.1111000000         0.0000000000         0.5000000000"));
    }

    #[test]
    fn reflected_cell_reflects_positions_in_the_same_axis() {
        let structure = StructureBuilder::new()
            .cell(Cell::from_vectors(
                Vector3::new(-2.0, 0.0, 0.0),
                Vector3::new(0.0, 2.0, 0.0),
                Vector3::new(0.0, 0.0, 2.0),
            ))
            .kind(Kind::new("X", 1.0))
            .site(Site::new("X", Point3::new(1.0, 1.0, 1.0)))
            .build()
            .unwrap();

        let (content, transform) =
            LammpsDataFile::render_to_string(&structure, &WriteOptions::default()).unwrap();

        assert!(content.contains("0.0         2.0000000000 xlo xhi"));
        assert!(content.contains("\n1 1        -1.0000000000         1.0000000000         1.0000000000"));
        let mapped = transform.apply_point(&Point3::new(1.0, 1.0, 1.0));
        assert!((mapped - Point3::new(-1.0, 1.0, 1.0)).norm() < 1e-10);
    }

    #[test]
    fn write_to_path_persists_the_same_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("structure.dat");
        let structure = cubic_structure();
        let options = WriteOptions::default();

        LammpsDataFile::write_to_path(&structure, &options, &path).unwrap();
        let from_disk = std::fs::read_to_string(&path).unwrap();
        let (rendered, _) = LammpsDataFile::render_to_string(&structure, &options).unwrap();
        assert_eq!(from_disk, rendered);
    }

    #[test]
    fn transform_is_reusable_for_sibling_vectors() {
        let structure = StructureBuilder::new()
            .cell(Cell::from_vectors(
                Vector3::new(0.0, 2.0, 2.0),
                Vector3::new(2.0, 0.0, 2.0),
                Vector3::new(2.0, 2.0, 0.0),
            ))
            .kind(Kind::new("X", 1.0))
            .site(Site::new("X", Point3::new(0.5, 0.5, 0.5)))
            .build()
            .unwrap();

        let (_, transform) =
            LammpsDataFile::render_to_string(&structure, &WriteOptions::default()).unwrap();
        let velocity = Vector3::new(1.0, -2.0, 0.5);
        let mapped = transform.apply_vector(&velocity);
        assert!((mapped.norm() - velocity.norm()).abs() < 1e-10);
    }
}
