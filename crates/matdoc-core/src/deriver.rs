// crates/matdoc-core/src/deriver.rs
//
// Reference StructureMetadataDeriver: everything that follows from the
// lattice and the site species. Space-group analysis is left to external
// derivers, so `symmetry` stays unset here.

use crate::element::Element;
use crate::error::DerivationError;
use crate::metadata::StructureMetadata;
use crate::structure::Structure;
use crate::traits::StructureMetadataDeriver;

/// g/cm^3 per amu/A^3.
const AMU_PER_CUBIC_ANGSTROM_TO_G_PER_CC: f64 = 1.660_539_066_60;

#[derive(Debug, Clone, Copy, Default)]
pub struct CompositionDeriver;

impl StructureMetadataDeriver for CompositionDeriver {
    fn derive(&self, structure: &Structure) -> Result<StructureMetadata, DerivationError> {
        if structure.sites.is_empty() {
            return Err(DerivationError::EmptyStructure);
        }
        let volume = structure.volume();
        if !(volume.is_finite() && volume > 0.0) {
            return Err(DerivationError::DegenerateLattice { volume });
        }

        let composition = structure.composition();
        let nsites = structure.num_sites();
        let mut elements: Vec<Element> = composition.elements().collect();
        elements.sort_by(Element::formula_order);

        tracing::debug!(
            formula = %composition.reduced_formula(),
            nsites,
            volume,
            "derived structure metadata"
        );

        Ok(StructureMetadata {
            nsites: Some(nsites),
            nelements: Some(elements.len()),
            elements: Some(elements),
            formula_pretty: Some(composition.reduced_formula()),
            formula_anonymous: Some(composition.anonymous_formula()),
            chemsys: Some(composition.chemical_system()),
            volume: Some(volume),
            density: Some(composition.weight() / volume * AMU_PER_CUBIC_ANGSTROM_TO_G_PER_CC),
            density_atomic: Some(volume / nsites as f64),
            composition_reduced: Some(composition.reduced()),
            composition: Some(composition),
            symmetry: None,
        })
    }
}
