// crates/matdoc-core/src/traits.rs

use crate::error::DerivationError;
use crate::metadata::StructureMetadata;
use crate::structure::Structure;

/// Computes descriptive metadata from a structure.
///
/// Implemented by `CompositionDeriver` in this crate; symmetry-aware
/// implementations live with whatever space-group finder the caller uses.
/// Implementations must be deterministic for a fixed structure.
pub trait StructureMetadataDeriver: Send + Sync {
    fn derive(&self, structure: &Structure) -> Result<StructureMetadata, DerivationError>;
}

impl<D: StructureMetadataDeriver + ?Sized> StructureMetadataDeriver for &D {
    fn derive(&self, structure: &Structure) -> Result<StructureMetadata, DerivationError> {
        (**self).derive(structure)
    }
}

impl<D: StructureMetadataDeriver + ?Sized> StructureMetadataDeriver for Box<D> {
    fn derive(&self, structure: &Structure) -> Result<StructureMetadata, DerivationError> {
        (**self).derive(structure)
    }
}
