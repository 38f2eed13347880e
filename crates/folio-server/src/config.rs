use folio_core::{ContentSources, SiteInfo};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Contents of `folio.toml`. Every section and key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub server: ServerConfig,
    pub content: ContentConfig,
    pub site: SiteConfig,
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP listen address
    pub http_addr: SocketAddr,
    /// Origins allowed to call the API from a browser. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            cors_origins: Vec::new(),
        }
    }
}

/// Content locations. Relative paths resolve against the content root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub blog_dir: PathBuf,
    pub records_file: PathBuf,
    pub personal_file: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            blog_dir: PathBuf::from("content/blog"),
            records_file: PathBuf::from("data/resume.json"),
            personal_file: PathBuf::from("data/personal.json"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub url: String,
    pub last_updated: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of an OpenAI-compatible API; `/chat/completions` is appended.
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Transport timeout for one completion call.
    pub timeout_secs: u64,
    /// Inline credential. Prefer `api_key_env`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable consulted when `api_key` is unset.
    pub api_key_env: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            timeout_secs: 60,
            api_key: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl FolioConfig {
    /// Parse a config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Parse a config file, or fall back to defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Provider credential: the inline value, else the configured env var.
    /// Blank values count as missing.
    pub fn resolved_api_key(&self) -> Option<String> {
        let non_blank = |s: String| (!s.trim().is_empty()).then_some(s);
        self.provider
            .api_key
            .clone()
            .and_then(non_blank)
            .or_else(|| {
                std::env::var(&self.provider.api_key_env)
                    .ok()
                    .and_then(non_blank)
            })
    }

    pub fn content_sources(&self, root: &Path) -> ContentSources {
        ContentSources {
            blog_dir: root.join(&self.content.blog_dir),
            records_file: root.join(&self.content.records_file),
            personal_file: root.join(&self.content.personal_file),
            site: SiteInfo {
                url: self.site.url.clone(),
                last_updated: self.site.last_updated.clone(),
            },
        }
    }

    /// Human-readable problems with this config. Empty when valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let p = &self.provider;

        if !(p.base_url.starts_with("http://") || p.base_url.starts_with("https://")) {
            errors.push(format!(
                "[provider] base_url must be an http(s) URL, got '{}'",
                p.base_url
            ));
        }
        if p.model.trim().is_empty() {
            errors.push("[provider] model must not be empty".to_string());
        }
        if !(0.0..=2.0).contains(&p.temperature) {
            errors.push(format!(
                "[provider] temperature must be within 0.0..=2.0, got {}",
                p.temperature
            ));
        }
        if p.max_tokens == 0 {
            errors.push("[provider] max_tokens must be greater than 0".to_string());
        }
        if p.timeout_secs == 0 {
            errors.push("[provider] timeout_secs must be greater than 0".to_string());
        }
        if p.api_key_env.trim().is_empty() && p.api_key.is_none() {
            errors.push("[provider] set api_key or api_key_env".to_string());
        }
        if !self.site.url.is_empty()
            && !(self.site.url.starts_with("http://") || self.site.url.starts_with("https://"))
        {
            errors.push(format!("[site] url must be an http(s) URL, got '{}'", self.site.url));
        }

        errors
    }
}
