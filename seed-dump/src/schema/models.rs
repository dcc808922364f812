//! Model and association types

use serde::{Deserialize, Serialize};
use std::fmt;

/// A table-backed entity type
///
/// Two models are the same model when both the name and the table match.
/// The table name is what the join-model collapser groups on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    pub table_name: String,
}

impl Model {
    pub fn new(name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_name: table_name.into(),
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Association kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationKind {
    /// The declaring model holds the foreign key
    BelongsTo,
    /// Another model holds a foreign key pointing back at the declaring model
    HasMany,
}

/// A declared reference from one model to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    /// Association name (e.g., "author", "comments", "commentable")
    pub name: String,
    pub kind: AssociationKind,
    /// Target model name. None for polymorphic belongs-to associations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default)]
    pub polymorphic: bool,
    /// Inverse polymorphic name on has-many associations (`as: commentable`)
    #[serde(default, rename = "as", skip_serializing_if = "Option::is_none")]
    pub inverse_name: Option<String>,
}

impl Association {
    /// Plain belongs-to pointing at `target`
    pub fn belongs_to(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AssociationKind::BelongsTo,
            target: Some(target.into()),
            polymorphic: false,
            inverse_name: None,
        }
    }

    /// Polymorphic belongs-to; targets are discovered through `has_many ... as: name`
    pub fn polymorphic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AssociationKind::BelongsTo,
            target: None,
            polymorphic: true,
            inverse_name: None,
        }
    }

    pub fn has_many(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AssociationKind::HasMany,
            target: Some(target.into()),
            polymorphic: false,
            inverse_name: None,
        }
    }

    /// Set the inverse polymorphic name (`as:`)
    pub fn with_inverse(mut self, inverse_name: impl Into<String>) -> Self {
        self.inverse_name = Some(inverse_name.into());
        self
    }
}

/// Default table name for a model name: snake_case plus a trailing "s"
///
/// `User` -> `users`, `BlogPost` -> `blog_posts`, `Admin::Note` -> `admin_notes`
pub fn default_table_name(model_name: &str) -> String {
    let mut table = String::with_capacity(model_name.len() + 4);
    let mut prev_lower = false;

    for c in model_name.chars() {
        if c == ':' {
            if !table.ends_with('_') && !table.is_empty() {
                table.push('_');
            }
            prev_lower = false;
            continue;
        }

        if c.is_uppercase() {
            if prev_lower {
                table.push('_');
            }
            table.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            table.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }

    if !table.ends_with('s') {
        table.push('s');
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_name() {
        assert_eq!(default_table_name("User"), "users");
        assert_eq!(default_table_name("BlogPost"), "blog_posts");
        assert_eq!(default_table_name("Admin::Note"), "admin_notes");
        assert_eq!(default_table_name("Status"), "status");
    }

    #[test]
    fn test_association_deserializes_inverse_name_from_as() {
        let assoc: Association = toml::from_str(
            r#"
            name = "comments"
            kind = "has_many"
            target = "Comment"
            as = "commentable"
            "#,
        )
        .unwrap();

        assert_eq!(assoc.kind, AssociationKind::HasMany);
        assert_eq!(assoc.inverse_name.as_deref(), Some("commentable"));
        assert!(!assoc.polymorphic);
    }
}
