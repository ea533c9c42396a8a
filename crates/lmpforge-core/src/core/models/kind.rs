use super::element::standard_atomic_mass;

/// Represents a chemical species shared by zero or more sites.
///
/// A kind pairs a unique label with the atomic mass written into the data
/// file's mass table. Labels often coincide with element symbols ("Fe") but
/// may distinguish symmetry-inequivalent positions of the same element
/// ("Fe1", "Fe2"), each with its own entry in the mass table.
#[derive(Debug, Clone, PartialEq)]
pub struct Kind {
    /// The species label sites refer to. Unique within a structure.
    pub label: String,
    /// The atomic mass in atomic mass units.
    pub mass: f64,
}

impl Kind {
    /// Creates a kind with an explicit mass.
    pub fn new(label: &str, mass: f64) -> Self {
        Self {
            label: label.to_string(),
            mass,
        }
    }

    /// Creates a kind labeled by an element symbol, with the standard atomic
    /// mass taken from the element table.
    ///
    /// # Return
    ///
    /// Returns `None` if `symbol` is not a known element.
    pub fn of_element(symbol: &str) -> Option<Self> {
        Self::of_element_labeled(symbol, symbol)
    }

    /// Creates a kind with a custom label but the standard atomic mass of
    /// `symbol`, e.g. a "Fe1" kind carrying the mass of iron.
    ///
    /// # Return
    ///
    /// Returns `None` if `symbol` is not a known element.
    pub fn of_element_labeled(label: &str, symbol: &str) -> Option<Self> {
        standard_atomic_mass(symbol).map(|mass| Self::new(label, mass))
    }
}
