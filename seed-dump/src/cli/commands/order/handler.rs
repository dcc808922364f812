//! Order command handler

use anyhow::{Context, Result};
use colored::*;
use std::path::Path;

use super::OrderArgs;
use crate::config::{excluded_models, select_models, DumpConfig};
use crate::ordering::dependency_order_excluding;
use crate::schema::{MetadataProvider, Model, SchemaRegistry};

/// Print the export order for the selected models
pub fn handle_order_command(schema: &Path, args: OrderArgs) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let registry = SchemaRegistry::load(schema)?;

    let mut config = DumpConfig::from_env()?;
    args.selection.apply(&mut config);

    let models = select_models(&registry, &config);
    if models.is_empty() {
        anyhow::bail!("No models selected. Check MODELS/MODELS_EXCLUDE and the schema file.");
    }

    let excluded = excluded_models(&registry, &config);
    let order = dependency_order_excluding(&registry, &models, &excluded)
        .context("Failed to compute export order")?;

    if args.json {
        let names: Vec<&str> = order.iter().map(|m| m.name.as_str()).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&names).context("Failed to format JSON output")?
        );
    } else {
        print!("{}", render_order(&registry, &models, &order));
    }

    Ok(())
}

/// Numbered listing of the order; models pulled in as dependencies are marked
pub fn render_order<P: MetadataProvider + ?Sized>(
    provider: &P,
    selected: &[Model],
    order: &[Model],
) -> String {
    let width = order.len().to_string().len();
    let mut out = String::new();

    for (i, model) in order.iter().enumerate() {
        let mut line = format!(
            "{:>width$}. {} {}",
            i + 1,
            model.name.bold(),
            format!("({})", model.table_name).dimmed(),
            width = width
        );
        if provider.is_synthetic_join_model(model) {
            line.push_str(&format!(" {}", "[join]".cyan()));
        }
        if !selected.contains(model) {
            line.push_str(&format!(" {}", "[dependency]".yellow()));
        }
        out.push_str(&line);
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::dependency_order;
    use crate::schema::{Association, ModelDescriptor};

    #[test]
    fn test_render_order_marks_dependencies() {
        colored::control::set_override(false);

        let registry = SchemaRegistry::from_descriptors(vec![
            ModelDescriptor::new("User"),
            ModelDescriptor::new("Post").association(Association::belongs_to("user", "User")),
        ])
        .unwrap();
        let post = registry.find_model("Post").unwrap();
        let order = dependency_order(&registry, &[post.clone()]).unwrap();

        let rendered = render_order(&registry, &[post], &order);

        assert_eq!(rendered, "1. User (users) [dependency]\n2. Post (posts)\n");
    }
}
