//! Dump orchestration
//!
//! Computes the export order up front, then hands each model to the export
//! sink in that order. Ordering failures abort before any row is written.

use anyhow::{Context, Result};
use std::collections::HashSet;

use crate::export::{ExportOptions, ExportSink};
use crate::ordering::dependency_order_excluding;
use crate::schema::{MetadataProvider, Model};

/// Rows written per model, in export order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpSummary {
    pub exported: Vec<(Model, usize)>,
}

impl DumpSummary {
    pub fn total_rows(&self) -> usize {
        self.exported.iter().map(|(_, rows)| rows).sum()
    }

    pub fn model_count(&self) -> usize {
        self.exported.len()
    }
}

/// Export `models` (plus everything they reference) in dependency order
///
/// Models in `excluded` are left out even when referenced. The first model
/// honours `options.append`; every later model appends so the whole dump
/// lands in one continuous output.
pub async fn run_dump<P, K>(
    provider: &P,
    models: &[Model],
    excluded: &HashSet<Model>,
    options: &ExportOptions,
    sink: &mut K,
) -> Result<DumpSummary>
where
    P: MetadataProvider + ?Sized,
    K: ExportSink + ?Sized,
{
    let order = dependency_order_excluding(provider, models, excluded)?;

    log::info!(
        "Dumping {} models to {}: {}",
        order.len(),
        options.destination,
        order.iter().map(|m| m.name.as_str()).collect::<Vec<_>>().join(", ")
    );

    let mut summary = DumpSummary::default();

    for (position, model) in order.into_iter().enumerate() {
        let model_options = ExportOptions {
            append: options.append || position > 0,
            ..options.clone()
        };

        let rows = sink
            .export(&model, &model_options)
            .await
            .with_context(|| format!("Failed to export {}", model.name))?;

        summary.exported.push((model, rows));
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrderingError;
    use crate::schema::{Association, ModelDescriptor, SchemaRegistry};
    use async_trait::async_trait;

    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<(String, bool)>,
    }

    #[async_trait]
    impl ExportSink for RecordingSink {
        async fn export(&mut self, model: &Model, options: &ExportOptions) -> Result<usize> {
            self.calls.push((model.name.clone(), options.append));
            Ok(model.name.len())
        }
    }

    fn blog() -> SchemaRegistry {
        SchemaRegistry::from_descriptors(vec![
            ModelDescriptor::new("Comment")
                .association(Association::belongs_to("post", "Post"))
                .association(Association::polymorphic("commentable")),
            ModelDescriptor::new("Post")
                .association(Association::belongs_to("user", "User"))
                .association(Association::has_many("comments", "Comment").with_inverse("commentable")),
            ModelDescriptor::new("User").association(Association::has_many("posts", "Post")),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_append_forced_after_first_model() {
        let registry = blog();
        let models = registry.candidate_models();
        let mut sink = RecordingSink::default();

        let summary = run_dump(&registry, &models, &HashSet::new(), &ExportOptions::default(), &mut sink)
            .await
            .unwrap();

        assert_eq!(
            sink.calls,
            vec![
                ("User".to_string(), false),
                ("Post".to_string(), true),
                ("Comment".to_string(), true),
            ]
        );
        assert_eq!(summary.model_count(), 3);
        assert_eq!(summary.total_rows(), 4 + 4 + 7);
    }

    #[tokio::test]
    async fn test_caller_append_applies_to_first_model() {
        let registry = blog();
        let models = registry.candidate_models();
        let mut sink = RecordingSink::default();
        let options = ExportOptions { append: true, ..ExportOptions::default() };

        run_dump(&registry, &models, &HashSet::new(), &options, &mut sink).await.unwrap();

        assert!(sink.calls.iter().all(|(_, append)| *append));
    }

    #[tokio::test]
    async fn test_cycle_aborts_before_export() {
        let registry = SchemaRegistry::from_descriptors(vec![
            ModelDescriptor::new("A").association(Association::belongs_to("b", "B")),
            ModelDescriptor::new("B").association(Association::belongs_to("a", "A")),
        ])
        .unwrap();
        let models = registry.candidate_models();
        let mut sink = RecordingSink::default();

        let err = run_dump(&registry, &models, &HashSet::new(), &ExportOptions::default(), &mut sink)
            .await
            .unwrap_err();

        assert!(sink.calls.is_empty());
        assert!(matches!(
            err.downcast_ref::<OrderingError>(),
            Some(OrderingError::CyclicDependency { .. })
        ));
    }

    #[tokio::test]
    async fn test_sqlite_dump_writes_parents_first() {
        use crate::export::{Destination, SeedWriter, SqliteRecordSource};

        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        for sql in [
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)",
            "CREATE TABLE posts (id INTEGER PRIMARY KEY, user_id INTEGER REFERENCES users(id), title TEXT)",
            "CREATE TABLE comments (id INTEGER PRIMARY KEY, commentable_id INTEGER, commentable_type TEXT, body TEXT)",
            "INSERT INTO users (name) VALUES ('ada')",
            "INSERT INTO posts (user_id, title) VALUES (1, 'Hello')",
            "INSERT INTO comments (commentable_id, commentable_type, body) VALUES (1, 'Post', 'First!')",
        ] {
            sqlx::query(sql).execute(&pool).await.unwrap();
        }

        let registry = blog();
        let comment = registry.find_model("Comment").unwrap();
        let path = std::env::temp_dir()
            .join(format!("seed-dump-{}", uuid::Uuid::new_v4()))
            .join("seeds.sql");
        let options = ExportOptions {
            destination: Destination::File(path.clone()),
            ..ExportOptions::default()
        };
        let mut writer = SeedWriter::new(SqliteRecordSource::new(pool));

        let summary = run_dump(&registry, &[comment], &HashSet::new(), &options, &mut writer)
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let tables: Vec<&str> = content
            .lines()
            .filter_map(|l| l.strip_prefix("INSERT INTO \""))
            .filter_map(|l| l.split('"').next())
            .collect();
        assert_eq!(tables, vec!["users", "posts", "comments"]);
        assert_eq!(summary.total_rows(), 3);
        assert!(!content.contains("\"id\""));
    }

    #[tokio::test]
    async fn test_excluded_models_never_reach_the_sink() {
        let registry = blog();
        let comment = registry.find_model("Comment").unwrap();
        let excluded = HashSet::from([registry.find_model("User").unwrap()]);
        let mut sink = RecordingSink::default();

        run_dump(&registry, &[comment], &excluded, &ExportOptions::default(), &mut sink)
            .await
            .unwrap();

        assert_eq!(
            sink.calls,
            vec![("Post".to_string(), false), ("Comment".to_string(), true)]
        );
    }

    #[tokio::test]
    async fn test_referent_without_table_is_skipped() {
        use crate::config::models_without_tables;
        use crate::export::{Destination, SeedWriter, SqliteRecordSource};

        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        for sql in [
            "CREATE TABLE posts (id INTEGER PRIMARY KEY, user_id INTEGER, title TEXT)",
            "INSERT INTO posts (user_id, title) VALUES (1, 'Orphan')",
        ] {
            sqlx::query(sql).execute(&pool).await.unwrap();
        }

        let registry = SchemaRegistry::from_descriptors(vec![
            ModelDescriptor::new("User"),
            ModelDescriptor::new("Post").association(Association::belongs_to("user", "User")),
        ])
        .unwrap();
        let source = SqliteRecordSource::new(pool);
        let missing = models_without_tables(&source, &registry.candidate_models())
            .await
            .unwrap();
        let post = registry.find_model("Post").unwrap();
        let path = std::env::temp_dir()
            .join(format!("seed-dump-{}", uuid::Uuid::new_v4()))
            .join("seeds.sql");
        let options = ExportOptions {
            destination: Destination::File(path.clone()),
            ..ExportOptions::default()
        };
        let mut writer = SeedWriter::new(source);

        let summary = run_dump(&registry, &[post], &missing, &options, &mut writer)
            .await
            .unwrap();

        assert_eq!(summary.model_count(), 1);
        assert_eq!(summary.exported[0].0.name, "Post");
        assert!(std::fs::read_to_string(&path).unwrap().contains("'Orphan'"));
    }
}
