//! Duplicate join-model collapsing
//!
//! A many-to-many association declared from both sides produces two
//! synthetic join models backed by the same table. Exporting both would
//! duplicate every join row, so only the first one per table is kept.

use std::collections::HashSet;

use crate::error::OrderingResult;
use crate::schema::{MetadataProvider, Model};

/// Keep one synthetic join model per table
///
/// Regular models come first in their original relative order, followed by
/// the surviving join models in their original relative order. Tables are
/// asked from the provider, so a model it cannot describe fails the collapse.
pub fn collapse<P: MetadataProvider + ?Sized>(
    provider: &P,
    ordered: &[Model],
) -> OrderingResult<Vec<Model>> {
    let (join_models, regular): (Vec<&Model>, Vec<&Model>) = ordered
        .iter()
        .partition(|m| provider.is_synthetic_join_model(m));

    let mut seen_tables: HashSet<String> = HashSet::new();
    let mut result: Vec<Model> = regular.into_iter().cloned().collect();

    for model in join_models {
        let table = provider.table_name_of(model)?;
        if seen_tables.insert(table.clone()) {
            result.push(model.clone());
        } else {
            log::debug!(
                "Dropping join model {} (table {} already exported)",
                model.name,
                table
            );
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrderingError;
    use crate::schema::{ModelDescriptor, SchemaRegistry};

    fn registry() -> SchemaRegistry {
        SchemaRegistry::from_descriptors(vec![
            ModelDescriptor::new("User"),
            ModelDescriptor::new("Role"),
            ModelDescriptor::new("UsersRoles").table("users_roles").join_model(true),
            ModelDescriptor::new("RolesUsers").table("users_roles").join_model(true),
            ModelDescriptor::new("User::HABTM_Groups").table("groups_users"),
        ])
        .unwrap()
    }

    fn names(models: &[Model]) -> Vec<&str> {
        models.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_duplicate_join_models_collapsed_to_first() {
        let registry = registry();
        let ordered = vec![
            registry.find_model("User").unwrap(),
            registry.find_model("RolesUsers").unwrap(),
            registry.find_model("Role").unwrap(),
            registry.find_model("UsersRoles").unwrap(),
        ];

        let collapsed = collapse(&registry, &ordered).unwrap();

        assert_eq!(names(&collapsed), vec!["User", "Role", "RolesUsers"]);
    }

    #[test]
    fn test_distinct_join_tables_survive() {
        let registry = registry();
        let ordered = vec![
            registry.find_model("User::HABTM_Groups").unwrap(),
            registry.find_model("UsersRoles").unwrap(),
            registry.find_model("User").unwrap(),
        ];

        let collapsed = collapse(&registry, &ordered).unwrap();

        assert_eq!(names(&collapsed), vec!["User", "User::HABTM_Groups", "UsersRoles"]);
    }

    #[test]
    fn test_collapse_is_idempotent() {
        let registry = registry();
        let ordered = registry.candidate_models();

        let once = collapse(&registry, &ordered).unwrap();
        let twice = collapse(&registry, &once).unwrap();

        assert_eq!(once, twice);
        assert_eq!(once.len(), 4);
    }

    /// Claims every model is a join model but cannot name any table
    struct TablelessProvider;

    impl MetadataProvider for TablelessProvider {
        fn candidate_models(&self) -> Vec<Model> {
            Vec::new()
        }

        fn find_model(&self, _name: &str) -> Option<Model> {
            None
        }

        fn associations_of(
            &self,
            _model: &Model,
            _kind: crate::schema::AssociationKind,
        ) -> OrderingResult<Vec<crate::schema::Association>> {
            Ok(Vec::new())
        }

        fn table_name_of(&self, model: &Model) -> OrderingResult<String> {
            Err(OrderingError::MetadataUnavailable {
                model: model.name.clone(),
                reason: "connection lost".to_string(),
            })
        }

        fn is_synthetic_join_model(&self, _model: &Model) -> bool {
            true
        }
    }

    #[test]
    fn test_table_lookup_failure_propagates() {
        let ordered = vec![Model::new("User::HABTM_Roles", "roles_users")];

        let err = collapse(&TablelessProvider, &ordered).unwrap_err();

        assert_eq!(
            err,
            OrderingError::MetadataUnavailable {
                model: "User::HABTM_Roles".to_string(),
                reason: "connection lost".to_string(),
            }
        );
    }
}
