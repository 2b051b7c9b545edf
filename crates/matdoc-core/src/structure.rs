// crates/matdoc-core/src/structure.rs
//
// Periodic atomic arrangement: a lattice plus sites in fractional coordinates.
//
// The document layer treats a Structure as an opaque value. It is stored,
// compared, and serialized, never interpreted beyond what a
// StructureMetadataDeriver chooses to compute from it.

use serde::{Deserialize, Serialize};

use crate::composition::Composition;
use crate::element::Element;

/// Lattice vectors as rows of a 3x3 matrix, in Angstrom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    pub fn new(matrix: [[f64; 3]; 3]) -> Self {
        Self { matrix }
    }

    /// Cubic lattice with edge length `a`.
    pub fn cubic(a: f64) -> Self {
        Self::new([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]])
    }

    /// Cell volume in cubic Angstrom (absolute value of the determinant).
    pub fn volume(&self) -> f64 {
        let [a, b, c] = self.matrix;
        let det = a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0]);
        det.abs()
    }

    /// Lengths of the three lattice vectors.
    pub fn abc(&self) -> [f64; 3] {
        self.matrix
            .map(|row| (row[0] * row[0] + row[1] * row[1] + row[2] * row[2]).sqrt())
    }
}

/// A single occupied site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub species: Element,
    /// Fractional coordinates relative to the lattice vectors.
    pub abc: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Site {
    pub fn new(species: Element, abc: [f64; 3]) -> Self {
        Self {
            species,
            abc,
            label: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub lattice: Lattice,
    pub sites: Vec<Site>,
}

impl Structure {
    pub fn new(lattice: Lattice, sites: Vec<Site>) -> Self {
        Self { lattice, sites }
    }

    #[inline]
    pub fn num_sites(&self) -> usize {
        self.sites.len()
    }

    pub fn volume(&self) -> f64 {
        self.lattice.volume()
    }

    /// Element counts over all sites.
    pub fn composition(&self) -> Composition {
        Composition::from_species(self.sites.iter().map(|s| s.species))
    }
}
