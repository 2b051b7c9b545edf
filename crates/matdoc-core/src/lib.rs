// crates/matdoc-core/src/lib.rs
//
// matdoc-core: validated materials documents and the logic that builds them.
//
// A materials document aggregates the calculations behind one material. This
// crate defines the document and its provenance entries, the rules that
// validate them, and the build operation that expands a structure and an
// identifier into a fully populated record. Structure metadata comes from a
// pluggable StructureMetadataDeriver.

pub mod build;
pub mod coerce;
pub mod composition;
pub mod config;
pub mod deriver;
pub mod element;
pub mod error;
pub mod material;
pub mod metadata;
pub mod provenance;
pub mod structure;
pub mod traits;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use matdoc_core::MaterialsDocument;`

// Document types
pub use material::MaterialsDocument;
pub use provenance::PropertyOrigin;

// Build
pub use build::DocumentBuilder;
pub use coerce::FieldMap;
pub use config::{UnknownFieldPolicy, ValidationConfig};

// Structure types
pub use composition::Composition;
pub use element::{Element, ParseElementError};
pub use metadata::{CrystalSystem, StructureMetadata, SymmetryData};
pub use structure::{Lattice, Site, Structure};

// Derivation
pub use deriver::CompositionDeriver;
pub use traits::StructureMetadataDeriver;

// Error types
pub use error::{BuildError, DerivationError, FieldError, ValidationError};
