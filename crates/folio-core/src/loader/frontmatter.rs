//! Front-matter split for blog documents.
//!
//! A document may open with a `---` line, a block of `key: value` lines and a
//! closing `---` line. Everything after the closing line is the body. Content
//! without an opening delimiter, or with an unclosed block, is all body.

const DELIMITER: &str = "---";

/// The leading key-value block of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    /// Raw text between the delimiter lines, without the delimiters.
    pub raw: String,
}

impl FrontMatter {
    pub fn is_empty(&self) -> bool {
        self.raw.trim().is_empty()
    }

    /// `key: value` pairs in block order. Values have surrounding quotes removed.
    pub fn fields(&self) -> Vec<(String, String)> {
        self.raw
            .lines()
            .filter_map(|line| {
                let (key, value) = line.split_once(':')?;
                let key = key.trim();
                if key.is_empty() || key.starts_with('#') || line.starts_with(char::is_whitespace) {
                    return None;
                }
                Some((key.to_string(), unquote(value.trim()).to_string()))
            })
            .collect()
    }

    /// First value for `key`, if present and non-empty.
    pub fn get(&self, key: &str) -> Option<String> {
        self.fields()
            .into_iter()
            .find(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v)
    }
}

/// Split `text` into its front-matter block and body.
pub fn split(text: &str) -> (FrontMatter, &str) {
    let rest = match text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
    {
        Some(rest) => rest,
        None => return (FrontMatter::default(), text),
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            let block = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (
                FrontMatter {
                    raw: block.trim_end_matches(['\r', '\n']).to_string(),
                },
                body,
            );
        }
        offset += line.len();
    }

    (FrontMatter::default(), text)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
