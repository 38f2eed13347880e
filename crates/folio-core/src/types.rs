use serde::{Deserialize, Serialize};
use std::fmt;

/// Type alias for document identifiers
pub type DocumentId = String;

/// One unit of aggregated portfolio content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Derived from category and natural key, e.g. `blog_my-first-post`
    /// or `project_X`. Stable across loads of unchanged input.
    pub id: DocumentId,

    /// Human-readable title.
    pub title: String,

    /// Full text. Blog posts keep their front-matter block in front of
    /// the body so key-value pairs stay visible.
    pub content: String,

    /// Where this document came from.
    pub category: SourceCategory,

    pub metadata: DocumentMetadata,
}

/// Content source categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum SourceCategory {
    Project,
    Publication,
    BlogPost,
    GeneralInfo,
}

impl SourceCategory {
    /// Prefix used when deriving document identifiers.
    pub fn id_prefix(self) -> &'static str {
        match self {
            SourceCategory::Project => "project",
            SourceCategory::Publication => "publication",
            SourceCategory::BlogPost => "blog",
            SourceCategory::GeneralInfo => "general",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SourceCategory::Project => "project",
            SourceCategory::Publication => "publication",
            SourceCategory::BlogPost => "blog-post",
            SourceCategory::GeneralInfo => "general-info",
        }
    }
}

impl fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Free-form date text as found in the source (`2020`, `2023-04-01`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Ordered tags. The first tag always names the category.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Document {
    /// Build a document whose id is `<category prefix>_<key>`.
    pub fn new(
        category: SourceCategory,
        key: &str,
        title: impl Into<String>,
        content: impl Into<String>,
        metadata: DocumentMetadata,
    ) -> Self {
        Self {
            id: document_id(category, key),
            title: title.into(),
            content: content.into(),
            category,
            metadata,
        }
    }
}

/// Deterministic identifier for a natural key within a category.
pub fn document_id(category: SourceCategory, key: &str) -> DocumentId {
    format!("{}_{}", category.id_prefix(), key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_uses_category_prefix() {
        assert_eq!(document_id(SourceCategory::Project, "X"), "project_X");
        assert_eq!(
            document_id(SourceCategory::BlogPost, "my-first-post"),
            "blog_my-first-post"
        );
        assert_eq!(document_id(SourceCategory::GeneralInfo, "info"), "general_info");
    }

    #[test]
    fn test_category_serializes_kebab_case() {
        let json = serde_json::to_string(&SourceCategory::BlogPost).unwrap();
        assert_eq!(json, "\"blog-post\"");
        let back: SourceCategory = serde_json::from_str("\"general-info\"").unwrap();
        assert_eq!(back, SourceCategory::GeneralInfo);
    }
}
