// crates/matdoc-core/src/metadata.rs
//
// Descriptive metadata computed from a Structure.
//
// A MaterialsDocument embeds one StructureMetadata value. Its fields are
// flattened into the document's encoded form so that consumers see a single
// flat record.

use serde::{Deserialize, Serialize};

use crate::composition::Composition;
use crate::element::Element;

/// The seven crystal systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrystalSystem {
    Triclinic,
    Monoclinic,
    Orthorhombic,
    Tetragonal,
    Trigonal,
    Hexagonal,
    Cubic,
}

impl CrystalSystem {
    /// Crystal system of an international space group number (1-230).
    pub fn from_space_group(number: u16) -> Option<Self> {
        match number {
            1..=2 => Some(CrystalSystem::Triclinic),
            3..=15 => Some(CrystalSystem::Monoclinic),
            16..=74 => Some(CrystalSystem::Orthorhombic),
            75..=142 => Some(CrystalSystem::Tetragonal),
            143..=167 => Some(CrystalSystem::Trigonal),
            168..=194 => Some(CrystalSystem::Hexagonal),
            195..=230 => Some(CrystalSystem::Cubic),
            _ => None,
        }
    }
}

/// Space-group description of a structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymmetryData {
    pub crystal_system: Option<CrystalSystem>,
    /// Hermann-Mauguin space group symbol, e.g. "Fd-3m".
    pub symbol: Option<String>,
    /// International space group number.
    pub number: Option<u16>,
    pub point_group: Option<String>,
    /// Distance tolerance used when the symmetry was determined.
    pub symprec: Option<f64>,
    /// Version of the symmetry finder that produced this record.
    pub version: Option<String>,
}

/// Structure-derived fields of a materials document.
///
/// Every field is optional: a deriver fills what it can compute and callers
/// may override any of them at build time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureMetadata {
    /// Total number of sites.
    #[serde(default)]
    pub nsites: Option<usize>,
    /// Elements present, in electronegativity order.
    #[serde(default)]
    pub elements: Option<Vec<Element>>,
    #[serde(default)]
    pub nelements: Option<usize>,
    /// Full composition of the cell.
    #[serde(default)]
    pub composition: Option<Composition>,
    #[serde(default)]
    pub composition_reduced: Option<Composition>,
    /// Reduced formula, e.g. "SiO2".
    #[serde(default)]
    pub formula_pretty: Option<String>,
    /// Anonymized reduced formula, e.g. "AB2".
    #[serde(default)]
    pub formula_anonymous: Option<String>,
    /// Dash-joined sorted element symbols, e.g. "O-Si".
    #[serde(default)]
    pub chemsys: Option<String>,
    /// Cell volume in cubic Angstrom.
    #[serde(default)]
    pub volume: Option<f64>,
    /// Mass density in g/cm^3.
    #[serde(default)]
    pub density: Option<f64>,
    /// Volume per atom in cubic Angstrom.
    #[serde(default)]
    pub density_atomic: Option<f64>,
    #[serde(default)]
    pub symmetry: Option<SymmetryData>,
}

impl StructureMetadata {
    /// Encoded field names, in declaration order.
    pub const FIELDS: &'static [&'static str] = &[
        "nsites",
        "elements",
        "nelements",
        "composition",
        "composition_reduced",
        "formula_pretty",
        "formula_anonymous",
        "chemsys",
        "volume",
        "density",
        "density_atomic",
        "symmetry",
    ];

    pub fn is_field(name: &str) -> bool {
        Self::FIELDS.contains(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crystal_system_ranges() {
        assert_eq!(CrystalSystem::from_space_group(1), Some(CrystalSystem::Triclinic));
        assert_eq!(CrystalSystem::from_space_group(194), Some(CrystalSystem::Hexagonal));
        assert_eq!(CrystalSystem::from_space_group(227), Some(CrystalSystem::Cubic));
        assert_eq!(CrystalSystem::from_space_group(0), None);
        assert_eq!(CrystalSystem::from_space_group(231), None);
    }

    #[test]
    fn field_list_matches_serialized_keys() {
        let value = serde_json::to_value(StructureMetadata::default()).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();
        assert_eq!(keys.len(), StructureMetadata::FIELDS.len());
        for key in keys {
            assert!(StructureMetadata::is_field(key), "unlisted field {}", key);
        }
    }

    #[test]
    fn missing_fields_default_to_none() {
        let meta: StructureMetadata =
            serde_json::from_value(serde_json::json!({"formula_pretty": "Si"})).unwrap();
        assert_eq!(meta.formula_pretty.as_deref(), Some("Si"));
        assert!(meta.symmetry.is_none());
        assert!(meta.nsites.is_none());
    }
}
