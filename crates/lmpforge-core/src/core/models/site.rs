use nalgebra::Point3;

/// Represents one atom of a structure: a kind reference plus a Cartesian
/// position, and optionally a per-site charge.
///
/// Sites refer to kinds by label; the reference is resolved against the
/// structure's kind list when the structure is serialized. The per-site
/// charge, when present, is only consulted by the `charge` atom style and is
/// overridden by any per-kind charge the caller supplies at serialization
/// time.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    /// Label of the kind this site belongs to.
    pub kind_label: String,
    /// Cartesian position in Angstroms, in the original (untransformed) frame.
    pub position: Point3<f64>,
    /// Optional per-site charge in elementary charge units.
    pub charge: Option<f64>,
}

impl Site {
    /// Creates a site with no per-site charge.
    pub fn new(kind_label: &str, position: Point3<f64>) -> Self {
        Self {
            kind_label: kind_label.to_string(),
            position,
            charge: None,
        }
    }

    /// Creates a site carrying its own charge.
    pub fn with_charge(kind_label: &str, position: Point3<f64>, charge: f64) -> Self {
        Self {
            kind_label: kind_label.to_string(),
            position,
            charge: Some(charge),
        }
    }
}
