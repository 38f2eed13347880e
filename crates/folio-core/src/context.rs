//! Research context assembly.
//!
//! Builds the bounded text blob that is pasted into the system prompt. This
//! reads the sources directly instead of going through [`Document`]s because
//! each source has its own cap.
//!
//! [`Document`]: crate::types::Document

use crate::loader::{self, frontmatter, ContentSources};
use std::path::Path;

/// Blog posts included in the context.
pub const MAX_BLOG_POSTS: usize = 10;
/// Project records included in the context.
pub const MAX_PROJECTS: usize = 10;
/// Publication records included in the context.
pub const MAX_PUBLICATIONS: usize = 10;
/// Characters kept from each blog body.
pub const BLOG_EXCERPT_CHARS: usize = 800;
/// Characters kept from each blog title.
pub const BLOG_TITLE_CHARS: usize = 120;
/// Characters kept from the serialized personal-info record.
pub const PERSONAL_INFO_CHARS: usize = 1000;
/// Width of the divider line between sections.
pub const DIVIDER_WIDTH: usize = 50;

/// Returned when no source contributed anything.
pub const NO_CONTENT: &str = "No research content available";

pub fn divider() -> String {
    "=".repeat(DIVIDER_WIDTH)
}

/// Truncate `s` to at most `max_chars` Unicode scalar values.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_end, _)) => &s[..byte_end],
        None => s,
    }
}

/// Assemble the research context from every available source.
///
/// Blog entries are bounded by [`BLOG_TITLE_CHARS`] and [`BLOG_EXCERPT_CHARS`],
/// personal info by [`PERSONAL_INFO_CHARS`]. Project and publication entries
/// are capped in count only and carry their full field text.
pub fn build_research_context(sources: &ContentSources) -> String {
    let mut sections = Vec::new();

    if let Some(entries) = blog_entries(&sources.blog_dir) {
        sections.push(section("BLOG POSTS", &entries));
    }

    match loader::read_record_set(&sources.records_file) {
        Ok(Some(set)) => {
            let projects: Vec<String> = set
                .projects
                .iter()
                .take(MAX_PROJECTS)
                .map(|p| format!("[PROJECT] {}\n{}", p.name, p.details()))
                .collect();
            if !projects.is_empty() {
                sections.push(section("PROJECTS", &projects));
            }

            let publications: Vec<String> = set
                .publications
                .iter()
                .take(MAX_PUBLICATIONS)
                .map(|p| format!("[PUBLICATION] {}\n{}", p.name, p.details()))
                .collect();
            if !publications.is_empty() {
                sections.push(section("PUBLICATIONS", &publications));
            }
        }
        Ok(None) => {}
        Err(e) => log::warn!("Leaving records out of the research context: {}", e),
    }

    match loader::read_personal_info(&sources.personal_file)
        .and_then(|value| Ok(serde_json::to_string_pretty(&value)?))
    {
        Ok(pretty) => {
            let excerpt = truncate_chars(&pretty, PERSONAL_INFO_CHARS).to_string();
            sections.push(section("PERSONAL INFORMATION", &[excerpt]));
        }
        Err(e) => log::debug!("Leaving personal info out of the research context: {}", e),
    }

    if sections.is_empty() {
        return NO_CONTENT.to_string();
    }
    sections.join("\n\n")
}

fn section(header: &str, entries: &[String]) -> String {
    format!("{}:\n{}\n\n{}", header, divider(), entries.join("\n\n"))
}

/// `[BLOG] <title>\n<excerpt>` for the first posts in file-name order.
/// `None` when the directory is missing, unreadable or holds no posts.
fn blog_entries(dir: &Path) -> Option<Vec<String>> {
    let files = match loader::list_blog_files(dir) {
        Ok(Some(files)) => files,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Leaving blog posts out of the research context: {}", e);
            return None;
        }
    };

    let entries: Vec<String> = files
        .iter()
        .take(MAX_BLOG_POSTS)
        .filter_map(|path| {
            let text = std::fs::read_to_string(path)
                .map_err(|e| log::warn!("Failed to read blog post {:?}: {}", path, e))
                .ok()?;
            let (front_matter, body) = frontmatter::split(&text);
            let title = front_matter
                .get("title")
                .unwrap_or_else(|| loader::title_from_stem(&loader::blog_stem(path)));
            Some(format!(
                "[BLOG] {}\n{}",
                truncate_chars(&title, BLOG_TITLE_CHARS),
                truncate_chars(body.trim(), BLOG_EXCERPT_CHARS)
            ))
        })
        .collect();

    (!entries.is_empty()).then_some(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::SiteInfo;
    use proptest::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    fn sources(dir: &TempDir) -> ContentSources {
        let sources = ContentSources::under(dir.path(), SiteInfo::default());
        fs::create_dir_all(&sources.blog_dir).unwrap();
        fs::create_dir_all(sources.records_file.parent().unwrap()).unwrap();
        sources
    }

    #[test]
    fn test_no_sources_returns_placeholder() {
        let dir = TempDir::new().unwrap();
        let sources = ContentSources::under(dir.path(), SiteInfo::default());
        assert_eq!(build_research_context(&sources), NO_CONTENT);
    }

    #[test]
    fn test_empty_sources_return_placeholder() {
        let dir = TempDir::new().unwrap();
        let sources = sources(&dir);
        fs::write(&sources.records_file, r#"{"projects": {"items": []}}"#).unwrap();
        assert_eq!(build_research_context(&sources), NO_CONTENT);
    }

    #[test]
    fn test_blog_entry_prefers_front_matter_title() {
        let dir = TempDir::new().unwrap();
        let sources = sources(&dir);
        fs::write(
            sources.blog_dir.join("my-first-post.mdx"),
            "---\ntitle: \"Hello\"\n---\nWorld",
        )
        .unwrap();
        fs::write(sources.blog_dir.join("untitled-note.md"), "Just text").unwrap();

        let context = build_research_context(&sources);
        assert!(context.starts_with(&format!("BLOG POSTS:\n{}\n\n", divider())));
        assert!(context.contains("[BLOG] Hello\nWorld"));
        assert!(context.contains("[BLOG] untitled note\nJust text"));
        assert!(!context.contains("title:"));
    }

    #[test]
    fn test_blog_excerpt_is_cut_at_cap() {
        let dir = TempDir::new().unwrap();
        let sources = sources(&dir);
        let body = "é".repeat(BLOG_EXCERPT_CHARS + 200);
        fs::write(sources.blog_dir.join("long.md"), &body).unwrap();

        let context = build_research_context(&sources);
        let excerpt = context.lines().last().unwrap();
        assert_eq!(excerpt.chars().count(), BLOG_EXCERPT_CHARS);
    }

    #[test]
    fn test_blog_title_is_cut_at_cap() {
        let dir = TempDir::new().unwrap();
        let sources = sources(&dir);
        let title = "t".repeat(BLOG_TITLE_CHARS * 10);
        fs::write(
            sources.blog_dir.join("long-title.md"),
            format!("---\ntitle: {}\n---\nbody", title),
        )
        .unwrap();

        let context = build_research_context(&sources);
        let expected = format!("[BLOG] {}\nbody", &title[..BLOG_TITLE_CHARS]);
        assert!(context.ends_with(&expected));
    }

    #[test]
    fn test_non_object_personal_info_is_left_out() {
        let dir = TempDir::new().unwrap();
        let sources = sources(&dir);
        for text in ["null", "[1, 2]", "\"just a string\""] {
            fs::write(&sources.personal_file, text).unwrap();
            assert_eq!(build_research_context(&sources), NO_CONTENT, "input: {}", text);
        }

        fs::write(sources.blog_dir.join("a.md"), "alpha").unwrap();
        fs::write(&sources.personal_file, "null").unwrap();
        let context = build_research_context(&sources);
        assert!(context.contains("[BLOG] a\nalpha"));
        assert!(!context.contains("PERSONAL INFORMATION"));
    }

    #[test]
    fn test_blog_section_is_bounded_for_many_posts() {
        let dir = TempDir::new().unwrap();
        let sources = sources(&dir);
        for i in 0..50 {
            fs::write(
                sources.blog_dir.join(format!("post-{:02}.md", i)),
                "x".repeat(5_000),
            )
            .unwrap();
        }

        let context = build_research_context(&sources);
        assert_eq!(context.matches("[BLOG] ").count(), MAX_BLOG_POSTS);
        assert!(context.contains("[BLOG] post 00"));
        assert!(context.contains("[BLOG] post 09"));
        assert!(!context.contains("[BLOG] post 10"));

        // header + divider + 10 * ("[BLOG] post NN\n" + excerpt) + separators
        let header = "BLOG POSTS:\n".len() + DIVIDER_WIDTH + 2;
        let entry = "[BLOG] post 00\n".len() + BLOG_EXCERPT_CHARS;
        let bound = header + MAX_BLOG_POSTS * entry + (MAX_BLOG_POSTS - 1) * 2;
        assert_eq!(context.chars().count(), bound);
    }

    #[test]
    fn test_records_are_capped_and_untruncated() {
        let dir = TempDir::new().unwrap();
        let sources = sources(&dir);
        let long_description = "d".repeat(3_000);
        let projects: Vec<_> = (0..15)
            .map(|i| {
                serde_json::json!({
                    "name": format!("P{}", i),
                    "dates": "2020",
                    "description": long_description,
                    "technologies": ["Rust"],
                })
            })
            .collect();
        let records = serde_json::json!({
            "projects": {"items": projects},
            "publications": {"items": [{"name": "Paper", "authors": "Ada"}]},
        });
        fs::write(&sources.records_file, records.to_string()).unwrap();

        let context = build_research_context(&sources);
        assert_eq!(context.matches("[PROJECT] ").count(), MAX_PROJECTS);
        assert!(context.contains(&long_description));
        assert!(context.contains("[PUBLICATION] Paper\nAuthors: Ada\nDates: N/A"));
        assert!(context.find("PROJECTS:").unwrap() < context.find("PUBLICATIONS:").unwrap());
    }

    #[test]
    fn test_personal_info_is_pretty_and_truncated() {
        let dir = TempDir::new().unwrap();
        let sources = sources(&dir);
        let info = serde_json::json!({
            "name": "Sam",
            "bio": "b".repeat(4_000),
        });
        fs::write(&sources.personal_file, info.to_string()).unwrap();

        let context = build_research_context(&sources);
        let prefix = format!("PERSONAL INFORMATION:\n{}\n\n", divider());
        assert!(context.starts_with(&prefix));
        let body = &context[prefix.len()..];
        assert_eq!(body.chars().count(), PERSONAL_INFO_CHARS);
        assert!(body.starts_with("{\n  \""));
    }

    #[test]
    fn test_malformed_records_leave_other_sections() {
        let dir = TempDir::new().unwrap();
        let sources = sources(&dir);
        fs::write(sources.blog_dir.join("a.md"), "alpha").unwrap();
        fs::write(&sources.records_file, "nope").unwrap();

        let context = build_research_context(&sources);
        assert!(context.contains("[BLOG] a\nalpha"));
        assert!(!context.contains("PROJECTS"));
    }

    #[test]
    fn test_section_order() {
        let dir = TempDir::new().unwrap();
        let sources = sources(&dir);
        fs::write(sources.blog_dir.join("a.md"), "alpha").unwrap();
        fs::write(
            &sources.records_file,
            r#"{"projects": {"items": [{"name": "X"}]}, "publications": {"items": [{"name": "Y"}]}}"#,
        )
        .unwrap();
        fs::write(&sources.personal_file, r#"{"name": "Sam"}"#).unwrap();

        let context = build_research_context(&sources);
        let order: Vec<usize> = ["BLOG POSTS:", "PROJECTS:", "PUBLICATIONS:", "PERSONAL INFORMATION:"]
            .iter()
            .map(|h| context.find(h).unwrap())
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
    }

    proptest! {
        #[test]
        fn prop_truncate_chars_never_exceeds_cap(s in "\\PC{0,300}", cap in 0usize..400) {
            let out = truncate_chars(&s, cap);
            prop_assert!(out.chars().count() <= cap);
            prop_assert!(s.starts_with(out));
            if s.chars().count() <= cap {
                prop_assert_eq!(out, s.as_str());
            }
        }
    }
}
