//! Content loading.
//!
//! Three independent sources feed the chat context: a directory of blog
//! posts, a JSON file of project and publication records, and a personal-info
//! JSON record combined with the static site settings. Each source is loaded
//! on its own blocking task and a failing source only shrinks the result.

pub mod frontmatter;
pub mod records;

pub use frontmatter::FrontMatter;
pub use records::{Authors, ProjectRecord, PublicationRecord, RecordSet};

use crate::error::{FolioError, Result};
use crate::types::{Document, DocumentMetadata, SourceCategory};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File extensions recognised as blog posts.
pub const BLOG_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Static site settings merged into the general-info document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteInfo {
    pub url: String,
    pub last_updated: String,
}

/// Where the loader finds its inputs.
#[derive(Debug, Clone)]
pub struct ContentSources {
    pub blog_dir: PathBuf,
    pub records_file: PathBuf,
    pub personal_file: PathBuf,
    pub site: SiteInfo,
}

impl ContentSources {
    /// Conventional layout under `root`: `content/blog`, `data/resume.json`
    /// and `data/personal.json`.
    pub fn under(root: impl AsRef<Path>, site: SiteInfo) -> Self {
        let root = root.as_ref();
        Self {
            blog_dir: root.join("content").join("blog"),
            records_file: root.join("data").join("resume.json"),
            personal_file: root.join("data").join("personal.json"),
            site,
        }
    }
}

/// Loads [`Document`]s from the configured sources.
#[derive(Debug, Clone)]
pub struct ContentLoader {
    sources: ContentSources,
}

impl ContentLoader {
    pub fn new(sources: ContentSources) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &ContentSources {
        &self.sources
    }

    /// Load every source concurrently and concatenate: blog posts, then
    /// projects and publications, then the general-info document.
    pub async fn aggregate(&self) -> Vec<Document> {
        let (blog, records, general) = tokio::join!(
            self.load_blog_documents(),
            self.load_structured_records(),
            self.load_general_info(),
        );

        let mut documents = blog;
        documents.extend(records);
        documents.extend(general);
        log::debug!("Aggregated {} documents", documents.len());
        documents
    }

    /// One document per `.md`/`.mdx` file in the blog directory.
    /// A missing directory yields an empty list.
    pub async fn load_blog_documents(&self) -> Vec<Document> {
        let dir = self.sources.blog_dir.clone();
        let site = self.sources.site.clone();
        run_source("blog", move || read_blog_documents(&dir, &site)).await
    }

    /// One document per project and publication record.
    pub async fn load_structured_records(&self) -> Vec<Document> {
        let path = self.sources.records_file.clone();
        run_source("records", move || read_record_documents(&path)).await
    }

    /// The general-info document, or nothing if the personal record is unusable.
    pub async fn load_general_info(&self) -> Vec<Document> {
        let path = self.sources.personal_file.clone();
        let site = self.sources.site.clone();
        run_source("general info", move || {
            read_general_info(&path, &site).map(|doc| vec![doc])
        })
        .await
    }
}

/// Run a blocking source load and settle its outcome into a list.
async fn run_source<F>(source: &'static str, load: F) -> Vec<Document>
where
    F: FnOnce() -> Result<Vec<Document>> + Send + 'static,
{
    match tokio::task::spawn_blocking(load).await {
        Ok(result) => settle(source, result),
        Err(e) => {
            log::warn!("Loading {} content panicked or was cancelled: {}", source, e);
            Vec::new()
        }
    }
}

/// Collapse a per-source result: errors are logged and contribute nothing.
pub(crate) fn settle(source: &str, result: Result<Vec<Document>>) -> Vec<Document> {
    match result {
        Ok(documents) => documents,
        Err(e) => {
            log::warn!("Skipping {} content: {}", source, e);
            Vec::new()
        }
    }
}

/// Blog files in `dir`, sorted by file name. `Ok(None)` when the directory
/// does not exist.
pub(crate) fn list_blog_files(dir: &Path) -> Result<Option<Vec<PathBuf>>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_blog_file(path))
        .collect();
    files.sort();
    Ok(Some(files))
}

fn is_blog_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| BLOG_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// File stem of a blog post, used as its natural key.
pub(crate) fn blog_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

/// `my-first_post` -> `my first post`
pub fn title_from_stem(stem: &str) -> String {
    stem.replace(['-', '_'], " ")
}

fn read_blog_documents(dir: &Path, site: &SiteInfo) -> Result<Vec<Document>> {
    let Some(files) = list_blog_files(dir)? else {
        log::debug!("Blog directory {:?} not found", dir);
        return Ok(Vec::new());
    };

    let mut documents = Vec::with_capacity(files.len());
    for path in files {
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Failed to read blog post {:?}: {}", path, e);
                continue;
            }
        };
        let stem = blog_stem(&path);
        documents.push(blog_document(&stem, &text, site));
    }
    assign_unique_ids(&mut documents);
    Ok(documents)
}

fn blog_document(stem: &str, text: &str, site: &SiteInfo) -> Document {
    let (front_matter, body) = frontmatter::split(text);
    let content = if front_matter.is_empty() {
        body.trim().to_string()
    } else {
        format!("{}\n\n{}", front_matter.raw, body.trim())
    };

    let url = if site.url.is_empty() {
        None
    } else {
        Some(format!("{}/blog/{}", site.url.trim_end_matches('/'), stem))
    };

    Document::new(
        SourceCategory::BlogPost,
        stem,
        title_from_stem(stem),
        content,
        DocumentMetadata {
            url,
            date: front_matter.get("date"),
            tags: vec!["blog".to_string(), stem.to_string()],
        },
    )
}

/// Read and decode the records file. `Ok(None)` when it does not exist.
pub(crate) fn read_record_set(path: &Path) -> Result<Option<RecordSet>> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let set = RecordSet::parse(&text)?;
    for skipped in &set.skipped {
        log::warn!("Skipped record in {:?}: {}", path, skipped);
    }
    Ok(Some(set))
}

fn read_record_documents(path: &Path) -> Result<Vec<Document>> {
    let Some(set) = read_record_set(path)? else {
        log::debug!("Records file {:?} not found", path);
        return Ok(Vec::new());
    };

    let projects = set.projects.iter().map(|p| {
        let mut tags = vec!["project".to_string()];
        tags.extend(p.technologies.iter().cloned());
        Document::new(
            SourceCategory::Project,
            &p.name,
            p.name.clone(),
            p.body(),
            DocumentMetadata {
                url: p.url.clone(),
                date: p.dates.clone(),
                tags,
            },
        )
    });

    let publications = set.publications.iter().map(|p| {
        Document::new(
            SourceCategory::Publication,
            &p.name,
            p.name.clone(),
            p.body(),
            DocumentMetadata {
                url: p.url.clone(),
                date: p.dates.clone(),
                tags: vec!["publication".to_string(), "research".to_string()],
            },
        )
    });

    let mut documents: Vec<Document> = projects.chain(publications).collect();
    assign_unique_ids(&mut documents);
    Ok(documents)
}

/// Later documents that repeat an earlier id get `_2`, `_3`, ... in list
/// order. Prefixes differ per category, so per-source uniqueness is enough
/// for the aggregated list.
fn assign_unique_ids(documents: &mut [Document]) {
    let mut used: HashSet<String> = HashSet::with_capacity(documents.len());
    for doc in documents.iter_mut() {
        if used.insert(doc.id.clone()) {
            continue;
        }
        let mut n = 2;
        let id = loop {
            let candidate = format!("{}_{}", doc.id, n);
            if !used.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        log::debug!("Duplicate document id {} renamed to {}", doc.id, id);
        used.insert(id.clone());
        doc.id = id;
    }
}

/// Read the personal-info record. Anything but a JSON object is rejected.
pub(crate) fn read_personal_info(path: &Path) -> Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)?;
    let personal: serde_json::Value = serde_json::from_str(&text)?;
    if !personal.is_object() {
        return Err(FolioError::Validation(format!(
            "personal info in {:?} is not a JSON object",
            path
        )));
    }
    Ok(personal)
}

fn read_general_info(path: &Path, site: &SiteInfo) -> Result<Document> {
    let personal = read_personal_info(path)?;
    let pretty = serde_json::to_string_pretty(&personal)?;

    let content = format!(
        "Website: {}\nLast Updated: {}\n\nPersonal Information:\n{}",
        site.url, site.last_updated, pretty
    );

    Ok(Document::new(
        SourceCategory::GeneralInfo,
        "info",
        "General Information",
        content,
        DocumentMetadata {
            url: (!site.url.is_empty()).then(|| site.url.clone()),
            date: (!site.last_updated.is_empty()).then(|| site.last_updated.clone()),
            tags: vec!["general".to_string(), "about".to_string()],
        },
    ))
}
