//! Dependency-ordered seed export
//!
//! Models are exported so that every row is written after the rows it
//! references: associations are resolved into a dependency graph (including
//! polymorphic ones), the graph is sorted topologically and duplicate
//! many-to-many join models are collapsed before the export sink runs.

pub mod cli;
pub mod config;
pub mod dump;
pub mod error;
pub mod export;
pub mod ordering;
pub mod schema;

pub use dump::{run_dump, DumpSummary};
pub use error::{OrderingError, OrderingResult};
pub use ordering::{dependency_order, dependency_order_excluding};
pub use schema::{Association, AssociationKind, MetadataProvider, Model, SchemaRegistry};
