//! Schema registry loaded from a TOML file
//!
//! The registry is the immutable snapshot of every known model and its
//! declared associations. It is built once at startup and handed to the
//! ordering pipeline through the [`MetadataProvider`] trait.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::models::{default_table_name, Association, AssociationKind, Model};
use super::MetadataProvider;
use crate::error::{OrderingError, OrderingResult};

/// Marker contained in the name of auto-generated many-to-many join models
pub const JOIN_MODEL_MARKER: &str = "HABTM_";

/// Model declaration as written in the schema file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub name: String,
    /// Physical table. Defaults to the snake_case plural of the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Abstract models have no table and are never exported
    #[serde(default, rename = "abstract")]
    pub abstract_class: bool,
    /// Synthetic join model flag. Defaults to the name containing `HABTM_`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_model: Option<bool>,
    #[serde(default)]
    pub associations: Vec<Association>,
}

impl ModelDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            abstract_class: false,
            join_model: None,
            associations: Vec::new(),
        }
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn association(mut self, association: Association) -> Self {
        self.associations.push(association);
        self
    }

    pub fn abstract_class(mut self) -> Self {
        self.abstract_class = true;
        self
    }

    pub fn join_model(mut self, join_model: bool) -> Self {
        self.join_model = Some(join_model);
        self
    }
}

#[derive(Debug, Deserialize)]
struct SchemaFile {
    #[serde(default)]
    models: Vec<ModelDescriptor>,
}

#[derive(Debug, Clone)]
struct RegistryEntry {
    model: Model,
    abstract_class: bool,
    join_model: bool,
    associations: Vec<Association>,
}

/// In-memory registry of models, keyed by name
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    /// Entries in declaration order
    entries: Vec<RegistryEntry>,
    /// Model name -> index into `entries`
    by_name: HashMap<String, usize>,
    /// Lowercased model name -> index, for user-supplied names
    by_folded_name: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Build a registry from descriptors, rejecting duplicate names
    pub fn from_descriptors(descriptors: Vec<ModelDescriptor>) -> Result<Self> {
        let mut registry = SchemaRegistry::default();

        for descriptor in descriptors {
            if registry.by_name.contains_key(&descriptor.name) {
                anyhow::bail!("Model '{}' is declared more than once", descriptor.name);
            }

            let table_name = descriptor
                .table
                .clone()
                .unwrap_or_else(|| default_table_name(&descriptor.name));
            let join_model = descriptor
                .join_model
                .unwrap_or_else(|| descriptor.name.contains(JOIN_MODEL_MARKER));

            let index = registry.entries.len();
            registry.by_name.insert(descriptor.name.clone(), index);
            registry
                .by_folded_name
                .entry(descriptor.name.to_lowercase())
                .or_insert(index);
            registry.entries.push(RegistryEntry {
                model: Model::new(descriptor.name, table_name),
                abstract_class: descriptor.abstract_class,
                join_model,
                associations: descriptor.associations,
            });
        }

        log::debug!("Schema registry built with {} models", registry.entries.len());
        Ok(registry)
    }

    /// Parse a registry from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: SchemaFile = toml::from_str(content).context("Failed to parse schema file")?;
        Self::from_descriptors(file.models)
    }

    /// Load a registry from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Schema file does not exist: {}", path.display());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema file: {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid schema file: {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, model: &Model) -> OrderingResult<&RegistryEntry> {
        self.by_name
            .get(&model.name)
            .map(|&idx| &self.entries[idx])
            .filter(|entry| entry.model == *model)
            .ok_or_else(|| OrderingError::MetadataUnavailable {
                model: model.name.clone(),
                reason: "model is not declared in the schema registry".to_string(),
            })
    }
}

impl MetadataProvider for SchemaRegistry {
    fn candidate_models(&self) -> Vec<Model> {
        self.entries
            .iter()
            .filter(|e| !e.abstract_class)
            .map(|e| e.model.clone())
            .collect()
    }

    fn find_model(&self, name: &str) -> Option<Model> {
        self.by_name
            .get(name)
            .or_else(|| self.by_folded_name.get(&name.to_lowercase()))
            .map(|&idx| self.entries[idx].model.clone())
    }

    fn associations_of(
        &self,
        model: &Model,
        kind: AssociationKind,
    ) -> OrderingResult<Vec<Association>> {
        let entry = self.entry(model)?;
        Ok(entry
            .associations
            .iter()
            .filter(|a| a.kind == kind)
            .cloned()
            .collect())
    }

    fn table_name_of(&self, model: &Model) -> OrderingResult<String> {
        self.entry(model).map(|e| e.model.table_name.clone())
    }

    fn is_synthetic_join_model(&self, model: &Model) -> bool {
        self.entry(model).map(|e| e.join_model).unwrap_or(false)
    }
}
