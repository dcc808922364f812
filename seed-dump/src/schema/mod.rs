//! Schema metadata: models, associations and the provider seam
//!
//! The ordering pipeline never looks models up on its own; everything it
//! knows about the schema comes through [`MetadataProvider`].

pub mod models;
pub mod registry;

pub use models::{default_table_name, Association, AssociationKind, Model};
pub use registry::{ModelDescriptor, SchemaRegistry, JOIN_MODEL_MARKER};

use crate::error::OrderingResult;

/// Read-only access to model and association metadata
pub trait MetadataProvider {
    /// Every model that may take part in an export, in a stable order
    fn candidate_models(&self) -> Vec<Model>;

    /// Look up a model by name (exact match first, then case-insensitive)
    fn find_model(&self, name: &str) -> Option<Model>;

    /// Associations of the given kind declared on `model`
    fn associations_of(
        &self,
        model: &Model,
        kind: AssociationKind,
    ) -> OrderingResult<Vec<Association>>;

    /// Physical table backing `model`
    fn table_name_of(&self, model: &Model) -> OrderingResult<String>;

    /// Whether `model` is an auto-generated many-to-many join representation
    fn is_synthetic_join_model(&self, model: &Model) -> bool;
}
