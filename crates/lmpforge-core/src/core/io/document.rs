use crate::core::models::cell::Cell;
use crate::core::models::element::standard_atomic_mass;
use crate::core::models::kind::Kind;
use crate::core::models::site::Site;
use crate::core::models::structure::{Structure, StructureBuilder, StructureError};
use nalgebra::{Matrix3, Point3};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Kind entry {index} needs a label or an element symbol")]
    UnnamedKind { index: usize },

    #[error("Kind '{label}' has no mass and '{symbol}' is not a known element")]
    UnknownElement { label: String, symbol: String },

    #[error("Kind '{label}' has neither a mass nor an element to take one from")]
    MissingMass { label: String },

    #[error(transparent)]
    Structure(#[from] StructureError),
}

/// A structure described in a TOML document.
///
/// This is the on-disk input format of the CLI: the lattice as three row
/// vectors, a list of kinds, and a list of sites. Masses may be given
/// explicitly or taken from the standard element table via the `element`
/// field; a kind without a label borrows its element symbol.
///
/// ```toml
/// comment = "bcc iron"
///
/// [cell]
/// vectors = [[2.87, 0.0, 0.0], [0.0, 2.87, 0.0], [0.0, 0.0, 2.87]]
///
/// [[kinds]]
/// element = "Fe"
///
/// [[sites]]
/// kind = "Fe"
/// position = [0.0, 0.0, 0.0]
///
/// [[sites]]
/// kind = "Fe"
/// position = [1.435, 1.435, 1.435]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructureDocument {
    /// Default header comment for generated files.
    pub comment: Option<String>,
    pub cell: CellDocument,
    #[serde(default)]
    pub kinds: Vec<KindDocument>,
    #[serde(default)]
    pub sites: Vec<SiteDocument>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellDocument {
    /// The three lattice vectors, in Angstroms.
    pub vectors: [[f64; 3]; 3],
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KindDocument {
    /// Species label; defaults to the element symbol.
    pub label: Option<String>,
    /// Element symbol used to fill in the standard atomic mass.
    pub element: Option<String>,
    /// Explicit mass override in atomic mass units.
    pub mass: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteDocument {
    /// Label of the kind this site belongs to.
    pub kind: String,
    /// Cartesian position in Angstroms.
    pub position: [f64; 3],
    /// Optional per-site charge.
    pub charge: Option<f64>,
}

impl StructureDocument {
    /// Parses a document from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, DocumentError> {
        Ok(toml::from_str(text)?)
    }

    /// Converts the document into a validated [`Structure`].
    ///
    /// # Errors
    ///
    /// Returns an error if a kind has neither label nor element, if a mass
    /// cannot be resolved, or if the assembled structure is invalid
    /// (duplicate kind labels).
    pub fn into_structure(self) -> Result<Structure, DocumentError> {
        let rows = self.cell.vectors;
        let cell = Cell::from_matrix(Matrix3::new(
            rows[0][0], rows[0][1], rows[0][2],
            rows[1][0], rows[1][1], rows[1][2],
            rows[2][0], rows[2][1], rows[2][2],
        ));

        let mut builder = StructureBuilder::new().cell(cell);

        for (index, kind) in self.kinds.into_iter().enumerate() {
            let label = match (&kind.label, &kind.element) {
                (Some(label), _) => label.clone(),
                (None, Some(symbol)) => symbol.clone(),
                (None, None) => return Err(DocumentError::UnnamedKind { index }),
            };
            let mass = match (kind.mass, &kind.element) {
                (Some(mass), _) => mass,
                (None, Some(symbol)) => standard_atomic_mass(symbol).ok_or_else(|| {
                    DocumentError::UnknownElement {
                        label: label.clone(),
                        symbol: symbol.clone(),
                    }
                })?,
                (None, None) => return Err(DocumentError::MissingMass { label }),
            };
            builder = builder.kind(Kind::new(&label, mass));
        }

        for site in self.sites {
            let position = Point3::new(site.position[0], site.position[1], site.position[2]);
            let site_model = match site.charge {
                Some(charge) => Site::with_charge(&site.kind, position, charge),
                None => Site::new(&site.kind, position),
            };
            builder = builder.site(site_model);
        }

        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BCC_IRON: &str = r#"
comment = "bcc iron"

[cell]
vectors = [[2.87, 0.0, 0.0], [0.0, 2.87, 0.0], [0.0, 0.0, 2.87]]

[[kinds]]
element = "Fe"

[[sites]]
kind = "Fe"
position = [0.0, 0.0, 0.0]

[[sites]]
kind = "Fe"
position = [1.435, 1.435, 1.435]
"#;

    #[test]
    fn parses_and_converts_a_document() {
        let document = StructureDocument::from_toml_str(BCC_IRON).unwrap();
        assert_eq!(document.comment.as_deref(), Some("bcc iron"));

        let structure = document.into_structure().unwrap();
        assert_eq!(structure.sites().len(), 2);
        assert_eq!(structure.kinds().len(), 1);
        assert_eq!(structure.kind("Fe").unwrap().mass, 55.845);
        assert!((structure.cell().volume() - 2.87f64.powi(3)).abs() < 1e-9);
    }

    #[test]
    fn explicit_mass_overrides_element_table() {
        let text = r#"
[cell]
vectors = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]

[[kinds]]
label = "D"
element = "H"
mass = 2.014
"#;
        let structure = StructureDocument::from_toml_str(text)
            .unwrap()
            .into_structure()
            .unwrap();
        assert_eq!(structure.kind("D").unwrap().mass, 2.014);
    }

    #[test]
    fn kind_without_label_or_element_is_rejected() {
        let text = r#"
[cell]
vectors = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]

[[kinds]]
mass = 1.0
"#;
        let err = StructureDocument::from_toml_str(text)
            .unwrap()
            .into_structure()
            .unwrap_err();
        assert!(matches!(err, DocumentError::UnnamedKind { index: 0 }));
    }

    #[test]
    fn unknown_element_without_mass_is_rejected() {
        let text = r#"
[cell]
vectors = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]

[[kinds]]
element = "Qq"
"#;
        let err = StructureDocument::from_toml_str(text)
            .unwrap()
            .into_structure()
            .unwrap_err();
        assert!(
            matches!(err, DocumentError::UnknownElement { label, symbol } if label == "Qq" && symbol == "Qq")
        );
    }

    #[test]
    fn label_without_mass_source_is_rejected() {
        let text = r#"
[cell]
vectors = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]

[[kinds]]
label = "X"
"#;
        let err = StructureDocument::from_toml_str(text)
            .unwrap()
            .into_structure()
            .unwrap_err();
        assert!(matches!(err, DocumentError::MissingMass { label } if label == "X"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let text = r#"
[cell]
vectors = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
tilt = "large"
"#;
        assert!(StructureDocument::from_toml_str(text).is_err());
    }

    #[test]
    fn site_charges_survive_conversion() {
        let text = r#"
[cell]
vectors = [[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]]

[[kinds]]
element = "Li"

[[sites]]
kind = "Li"
position = [0.0, 0.0, 0.0]
charge = 1.0
"#;
        let structure = StructureDocument::from_toml_str(text)
            .unwrap()
            .into_structure()
            .unwrap();
        assert_eq!(structure.sites()[0].charge, Some(1.0));
    }
}
