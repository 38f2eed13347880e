use super::DocumentsArgs;
use crate::config::FolioConfig;
use anyhow::Result;
use folio_core::{build_research_context, ContentLoader, SourceCategory};
use std::path::Path;

pub fn context(config: &FolioConfig, content_root: &Path) -> Result<()> {
    let sources = config.content_sources(content_root);
    let context = build_research_context(&sources);
    println!("{}", context);
    eprintln!("({} characters)", context.chars().count());
    Ok(())
}

pub async fn documents(args: DocumentsArgs, config: &FolioConfig, content_root: &Path) -> Result<()> {
    let category = match args.category.as_deref() {
        Some(name) => Some(parse_category(name)?),
        None => None,
    };

    let loader = ContentLoader::new(config.content_sources(content_root));
    let mut documents = loader.aggregate().await;
    if let Some(category) = category {
        documents.retain(|d| d.category == category);
    }

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&documents)?);
        return Ok(());
    }

    if documents.is_empty() {
        println!("(no documents found under {})", content_root.display());
        return Ok(());
    }

    println!("{:<32}  {:<12}  {:<30}  {}", "ID", "CATEGORY", "TITLE", "TAGS");
    println!("{}", "─".repeat(90));
    for doc in &documents {
        println!(
            "{:<32}  {:<12}  {:<30}  {}",
            doc.id,
            doc.category.as_str(),
            doc.title,
            doc.metadata.tags.join(", ")
        );
    }
    println!("\n{} document(s)", documents.len());

    Ok(())
}

fn parse_category(name: &str) -> Result<SourceCategory> {
    serde_json::from_value(serde_json::Value::String(name.to_lowercase())).map_err(|_| {
        anyhow::anyhow!(
            "Unknown category '{}'. Expected one of: project, publication, blog-post, general-info",
            name
        )
    })
}
