use super::cell::Cell;
use super::kind::Kind;
use super::site::Site;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors raised while assembling a structure.
#[derive(Debug, Error, PartialEq)]
pub enum StructureError {
    #[error("Duplicate kind label '{0}'; kind labels must be unique")]
    DuplicateKind(String),

    #[error("Structure has no cell")]
    MissingCell,
}

/// Represents a complete crystal structure: a periodic cell, the species
/// kinds it contains, and the list of atomic sites.
///
/// The aggregate is immutable once built. Kind labels are guaranteed unique
/// by [`StructureBuilder::build`]; whether every site's kind label resolves
/// to a kind is checked at the serialization boundary, where an unresolved
/// label fails before any output is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    cell: Cell,
    kinds: Vec<Kind>,
    sites: Vec<Site>,
}

impl Structure {
    /// Returns the periodic cell.
    pub fn cell(&self) -> &Cell {
        &self.cell
    }

    /// Returns the species kinds, in declaration order.
    pub fn kinds(&self) -> &[Kind] {
        &self.kinds
    }

    /// Returns the atomic sites, in input order.
    ///
    /// Site order is significant: it fixes the 1-based site numbering in the
    /// rendered atom table and the first-encounter order of kind ids.
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Looks up a kind by label.
    pub fn kind(&self, label: &str) -> Option<&Kind> {
        self.kinds.iter().find(|kind| kind.label == label)
    }

    /// Returns a label-to-mass map over the declared kinds.
    pub fn kind_masses(&self) -> HashMap<&str, f64> {
        self.kinds
            .iter()
            .map(|kind| (kind.label.as_str(), kind.mass))
            .collect()
    }
}

/// Incremental builder for [`Structure`].
#[derive(Debug, Default)]
pub struct StructureBuilder {
    cell: Option<Cell>,
    kinds: Vec<Kind>,
    sites: Vec<Site>,
}

impl StructureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the periodic cell.
    pub fn cell(mut self, cell: Cell) -> Self {
        self.cell = Some(cell);
        self
    }

    /// Declares a species kind.
    pub fn kind(mut self, kind: Kind) -> Self {
        self.kinds.push(kind);
        self
    }

    /// Appends a site. Sites keep their insertion order.
    pub fn site(mut self, site: Site) -> Self {
        self.sites.push(site);
        self
    }

    /// Finalizes the structure.
    ///
    /// # Errors
    ///
    /// Returns `StructureError::MissingCell` if no cell was set, and
    /// `StructureError::DuplicateKind` if two kinds share a label.
    pub fn build(self) -> Result<Structure, StructureError> {
        let cell = self.cell.ok_or(StructureError::MissingCell)?;

        let mut seen = HashSet::new();
        for kind in &self.kinds {
            if !seen.insert(kind.label.as_str()) {
                return Err(StructureError::DuplicateKind(kind.label.clone()));
            }
        }

        Ok(Structure {
            cell,
            kinds: self.kinds,
            sites: self.sites,
        })
    }
}

/// Maps species labels to the 1-based integer ids used in the rendered atom
/// table.
///
/// Ids are assigned in first-encounter order while scanning the site list,
/// not alphabetically. Downstream files (pair coefficients, grouping
/// commands) reference atoms by these integers, so the assignment is an
/// externally observable contract and must be deterministic for a fixed site
/// order. Note that the mass table is sorted by label instead; the two
/// orderings are intentionally independent.
#[derive(Debug, Clone, PartialEq)]
pub struct KindIndex {
    ids: HashMap<String, usize>,
    labels: Vec<String>,
}

impl KindIndex {
    /// Builds the index by scanning sites in order, assigning the next free
    /// id to each label the first time it appears.
    pub fn from_sites<'a>(sites: impl IntoIterator<Item = &'a Site>) -> Self {
        let mut ids = HashMap::new();
        let mut labels = Vec::new();
        for site in sites {
            if !ids.contains_key(&site.kind_label) {
                ids.insert(site.kind_label.clone(), labels.len() + 1);
                labels.push(site.kind_label.clone());
            }
        }
        Self { ids, labels }
    }

    /// Returns the 1-based id for a label, if the label occurred in the
    /// scanned sites.
    pub fn id_of(&self, label: &str) -> Option<usize> {
        self.ids.get(label).copied()
    }

    /// Returns the labels in id order (`labels()[i]` has id `i + 1`).
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of distinct kinds encountered.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
