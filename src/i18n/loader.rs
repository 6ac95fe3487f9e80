use reqwest::blocking::Client;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const LOCALIZATION_KEY: &str = "Localization";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid language tag `{0}`")]
    InvalidTag(String),
    #[error("failed reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("{origin} is not valid JSON: {source}")]
    Decode {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A short language identifier such as `en`, `es` or `pt-BR`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageTag(String);

impl LanguageTag {
    pub fn parse(raw: &str) -> Result<Self, LoadError> {
        let trimmed = raw.trim();
        let valid = !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(LoadError::InvalidTag(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl Default for LanguageTag {
    fn default() -> Self {
        Self("en".to_string())
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait LanguageSource {
    /// Fetch the dictionary document for `tag`.
    fn load(&self, tag: &LanguageTag) -> Result<Value, LoadError>;
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// When enabled and the document carries a truthy top-level `Localization`
/// member, that member becomes the dictionary whatever its shape. A scalar
/// there leaves nothing to resolve, so every lookup degrades to its key.
pub fn unwrap_localization(doc: Value, enabled: bool) -> Value {
    if !enabled {
        return doc;
    }
    match doc {
        Value::Object(mut map) if map.get(LOCALIZATION_KEY).is_some_and(is_truthy) => {
            map.remove(LOCALIZATION_KEY).unwrap_or_default()
        }
        other => other,
    }
}

/// Reads `<dir>/<tag>.json` from local storage, as the plugin backend does.
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    pub dir: PathBuf,
    pub unwrap_localization: bool,
}

impl LocalFileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            unwrap_localization: false,
        }
    }
}

impl LanguageSource for LocalFileSource {
    fn load(&self, tag: &LanguageTag) -> Result<Value, LoadError> {
        let path = self.dir.join(tag.file_name());
        let raw = fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let doc = serde_json::from_str::<Value>(&raw).map_err(|source| LoadError::Decode {
            origin: path.display().to_string(),
            source,
        })?;
        Ok(unwrap_localization(doc, self.unwrap_localization))
    }
}

/// Fetches `<base_url>/<tag>.json`, as the property inspector page does.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    pub base_url: String,
    pub unwrap_localization: bool,
    client: Client,
}

impl RemoteSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, LoadError> {
        let base_url = base_url.into();
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|source| LoadError::Http {
                url: base_url.clone(),
                source,
            })?;
        Ok(Self {
            base_url,
            unwrap_localization: true,
            client,
        })
    }

    pub fn url_for(&self, tag: &LanguageTag) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), tag.file_name())
    }
}

impl LanguageSource for RemoteSource {
    fn load(&self, tag: &LanguageTag) -> Result<Value, LoadError> {
        let url = self.url_for(tag);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| LoadError::Http {
                url: url.clone(),
                source,
            })?;
        if !response.status().is_success() {
            return Err(LoadError::Status {
                url,
                status: response.status().as_u16(),
            });
        }
        let body = response.text().map_err(|source| LoadError::Http {
            url: url.clone(),
            source,
        })?;
        let doc = serde_json::from_str::<Value>(&body).map_err(|source| LoadError::Decode {
            origin: url,
            source,
        })?;
        Ok(unwrap_localization(doc, self.unwrap_localization))
    }
}
