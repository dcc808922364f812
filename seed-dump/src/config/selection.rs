//! Model selection from inclusion and exclusion lists

use anyhow::Result;
use std::collections::HashSet;

use super::DumpConfig;
use crate::export::RecordSource;
use crate::schema::{MetadataProvider, Model};

/// Pick the models to dump
///
/// An empty inclusion list selects every candidate. Names are matched
/// case-insensitively; unknown or abstract names are skipped with a warning.
pub fn select_models<P: MetadataProvider + ?Sized>(provider: &P, config: &DumpConfig) -> Vec<Model> {
    let candidates = provider.candidate_models();

    let requested: Vec<Model> = if config.models.is_empty() {
        candidates.clone()
    } else {
        config
            .models
            .iter()
            .filter_map(|name| match provider.find_model(name) {
                Some(model) if candidates.contains(&model) => Some(model),
                Some(model) => {
                    log::warn!("Skipping {}: abstract models have no rows", model.name);
                    None
                }
                None => {
                    log::warn!("Skipping {}: not declared in the schema", name);
                    None
                }
            })
            .collect()
    };

    let excluded = excluded_models(provider, config);

    let mut seen = HashSet::new();
    requested
        .into_iter()
        .filter(|m| !excluded.contains(m))
        .filter(|m| seen.insert(m.clone()))
        .collect()
}

/// Models named in the exclusion list
///
/// Exclusion wins over dependency pull-in: these models are never exported,
/// even when a selected model references them.
pub fn excluded_models<P: MetadataProvider + ?Sized>(
    provider: &P,
    config: &DumpConfig,
) -> HashSet<Model> {
    config
        .models_exclude
        .iter()
        .filter_map(|name| {
            let model = provider.find_model(name);
            if model.is_none() {
                log::warn!("Ignoring exclusion of unknown model {}", name);
            }
            model
        })
        .collect()
}

/// Models among `models` whose table does not exist in the record source
pub async fn models_without_tables<S: RecordSource + ?Sized>(
    source: &S,
    models: &[Model],
) -> Result<HashSet<Model>> {
    let mut missing = HashSet::new();

    for model in models {
        if !source.table_exists(&model.table_name).await? {
            log::warn!("Skipping {}: table {} does not exist", model.name, model.table_name);
            missing.insert(model.clone());
        }
    }

    Ok(missing)
}
