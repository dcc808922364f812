//! Association resolution
//!
//! Turns each model's belongs-to associations into the set of models that
//! must be exported before it. Polymorphic belongs-to associations name no
//! target; their referents are the models declaring a has-many with a
//! matching `as:` inverse name anywhere in the candidate set.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::{OrderingError, OrderingResult};
use crate::schema::{AssociationKind, MetadataProvider, Model};

/// Resolved dependencies, one entry per model in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedDependencies {
    pub entries: Vec<(Model, Vec<Model>)>,
}

impl ResolvedDependencies {
    pub fn get(&self, model: &Model) -> Option<&[Model]> {
        self.entries
            .iter()
            .find(|(m, _)| m == model)
            .map(|(_, deps)| deps.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reverse index: polymorphic inverse name -> models declaring `has_many ... as: name`
#[derive(Debug, Default)]
pub struct PolymorphicIndex {
    by_inverse: HashMap<String, Vec<Model>>,
}

impl PolymorphicIndex {
    /// Scan every candidate's has-many associations once
    pub fn build<P: MetadataProvider + ?Sized>(
        provider: &P,
        candidates: &[Model],
    ) -> OrderingResult<Self> {
        let mut index = PolymorphicIndex::default();

        for candidate in candidates {
            for assoc in provider.associations_of(candidate, AssociationKind::HasMany)? {
                let Some(inverse) = assoc.inverse_name else {
                    continue;
                };
                let owners = index.by_inverse.entry(inverse).or_default();
                if !owners.contains(candidate) {
                    owners.push(candidate.clone());
                }
            }
        }

        Ok(index)
    }

    /// Models that can be the target of a polymorphic association named `name`
    pub fn owners_of(&self, name: &str) -> &[Model] {
        self.by_inverse
            .get(name)
            .map(|owners| owners.as_slice())
            .unwrap_or(&[])
    }
}

/// Resolve the dependencies of `models` against the full candidate set
///
/// `candidates` is the universe used for target lookup and the polymorphic
/// scan; `models` is the selection being ordered. Referents are returned in
/// declaration order with duplicates removed.
pub fn resolve<P: MetadataProvider + ?Sized>(
    provider: &P,
    candidates: &[Model],
    models: &[Model],
) -> OrderingResult<ResolvedDependencies> {
    let polymorphic = PolymorphicIndex::build(provider, candidates)?;
    let candidate_set: HashSet<&Model> = candidates.iter().collect();

    let mut resolved = ResolvedDependencies::default();
    for model in models {
        let referents = referents_of(provider, &polymorphic, &candidate_set, model)?;
        resolved.entries.push((model.clone(), referents));
    }

    Ok(resolved)
}

/// Resolve `models` and, transitively, every model they reference
///
/// Newly discovered referents are resolved in turn until no new model
/// appears, so every entry's referents have entries of their own. Models in
/// `excluded` are never expanded and are dropped from the referent lists.
pub fn resolve_transitive<P: MetadataProvider + ?Sized>(
    provider: &P,
    candidates: &[Model],
    models: &[Model],
    excluded: &HashSet<Model>,
) -> OrderingResult<ResolvedDependencies> {
    let polymorphic = PolymorphicIndex::build(provider, candidates)?;
    let candidate_set: HashSet<&Model> = candidates.iter().collect();

    let mut queue: VecDeque<Model> = models
        .iter()
        .filter(|m| !excluded.contains(*m))
        .cloned()
        .collect();
    let mut queued: HashSet<Model> = queue.iter().cloned().collect();
    let mut resolved = ResolvedDependencies::default();

    while let Some(model) = queue.pop_front() {
        let mut referents = referents_of(provider, &polymorphic, &candidate_set, &model)?;

        referents.retain(|referent| {
            if excluded.contains(referent) {
                log::warn!(
                    "{} references excluded model {}; its rows are not exported",
                    model.name,
                    referent.name
                );
                return false;
            }
            true
        });

        for referent in &referents {
            if queued.insert(referent.clone()) {
                queue.push_back(referent.clone());
            }
        }

        resolved.entries.push((model, referents));
    }

    Ok(resolved)
}

fn referents_of<P: MetadataProvider + ?Sized>(
    provider: &P,
    polymorphic: &PolymorphicIndex,
    candidate_set: &HashSet<&Model>,
    model: &Model,
) -> OrderingResult<Vec<Model>> {
    let mut referents: Vec<Model> = Vec::new();

    for assoc in provider.associations_of(model, AssociationKind::BelongsTo)? {
        if assoc.polymorphic {
            let owners = polymorphic.owners_of(&assoc.name);
            if owners.is_empty() {
                log::debug!(
                    "Polymorphic association {}.{} has no has_many counterpart",
                    model.name,
                    assoc.name
                );
            }
            for owner in owners {
                push_unique(&mut referents, owner.clone());
            }
            continue;
        }

        let target_name = assoc.target.as_deref().unwrap_or_default();
        let target = provider
            .find_model(target_name)
            .filter(|target| candidate_set.contains(target))
            .ok_or_else(|| OrderingError::UnresolvableReference {
                model: model.name.clone(),
                association: assoc.name.clone(),
                target: target_name.to_string(),
            })?;
        push_unique(&mut referents, target);
    }

    Ok(referents)
}

fn push_unique(referents: &mut Vec<Model>, model: Model) {
    if !referents.contains(&model) {
        referents.push(model);
    }
}
