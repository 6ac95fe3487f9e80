use crate::error::SdPackError;
use crate::i18n::loader::LanguageTag;
use crate::util::DEFAULT_EXTERNAL_COMMAND_TIMEOUT_SECS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "sdpack.toml";
pub const DEFAULT_PLUGIN_ID: &str = "com.cajigas.absence";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginSection {
    pub id: String,
    pub dir: Option<String>,
    pub required_files: Vec<String>,
}

impl Default for PluginSection {
    fn default() -> Self {
        Self {
            id: DEFAULT_PLUGIN_ID.to_string(),
            dir: None,
            required_files: [
                "index.html",
                "propertyInspector.html",
                "manifest.json",
                "i18n.js",
                "en.json",
                "es.json",
                "package.json",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackSection {
    pub zip_bin: String,
    pub exclude: Vec<String>,
}

impl Default for PackSection {
    fn default() -> Self {
        Self {
            zip_bin: "zip".to_string(),
            exclude: ["*.DS_Store", "__MACOSX/*", "*node_modules/*", "*.log"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IconsSection {
    pub converter_bin: String,
}

impl Default for IconsSection {
    fn default() -> Self {
        Self {
            converter_bin: "rsvg-convert".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nSection {
    pub fallback_language: String,
    pub languages: Vec<String>,
}

impl Default for I18nSection {
    fn default() -> Self {
        Self {
            fallback_language: "en".to_string(),
            languages: vec!["en".to_string(), "es".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SdPackConfig {
    pub plugin: PluginSection,
    pub pack: PackSection,
    pub icons: IconsSection,
    pub i18n: I18nSection,
    pub command_timeout_secs: u64,
}

impl Default for SdPackConfig {
    fn default() -> Self {
        Self {
            plugin: PluginSection::default(),
            pack: PackSection::default(),
            icons: IconsSection::default(),
            i18n: I18nSection::default(),
            command_timeout_secs: DEFAULT_EXTERNAL_COMMAND_TIMEOUT_SECS,
        }
    }
}

impl SdPackConfig {
    pub fn plugin_dir_name(&self) -> String {
        match &self.plugin.dir {
            Some(dir) if !dir.trim().is_empty() => dir.trim().to_string(),
            _ => format!("{}.sdPlugin", self.plugin.id),
        }
    }

    pub fn archive_name(&self) -> String {
        format!("{}.streamDeckPlugin", self.plugin.id)
    }
}

fn env_string(var: &str) -> Option<String> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

fn env_or_u64(var: &str, fallback: u64) -> u64 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u64>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_csv(var: &str, fallback: &[String]) -> Vec<String> {
    match env::var(var) {
        Ok(v) => {
            let out = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>();
            if out.is_empty() {
                fallback.to_vec()
            } else {
                out
            }
        }
        Err(_) => fallback.to_vec(),
    }
}

fn invalid(reason: impl Into<String>) -> anyhow::Error {
    SdPackError::ConfigInvalid(reason.into()).into()
}

fn validate(cfg: &SdPackConfig) -> Result<()> {
    if cfg.plugin.id.trim().is_empty() {
        return Err(invalid("plugin.id cannot be empty"));
    }
    let dir = cfg.plugin_dir_name();
    if dir.contains('/') || dir.contains('\\') || dir == "." || dir == ".." {
        return Err(invalid(format!(
            "plugin.dir must be a single folder name, got `{dir}`"
        )));
    }
    if cfg.pack.zip_bin.trim().is_empty() {
        return Err(invalid("pack.zip_bin cannot be empty"));
    }
    if cfg.icons.converter_bin.trim().is_empty() {
        return Err(invalid("icons.converter_bin cannot be empty"));
    }
    if LanguageTag::parse(&cfg.i18n.fallback_language).is_err() {
        return Err(invalid(format!(
            "i18n.fallback_language `{}` is not a valid language tag",
            cfg.i18n.fallback_language
        )));
    }
    for lang in &cfg.i18n.languages {
        if LanguageTag::parse(lang).is_err() {
            return Err(invalid(format!(
                "i18n.languages entry `{lang}` is not a valid language tag"
            )));
        }
    }
    if cfg.command_timeout_secs == 0 {
        return Err(invalid("command_timeout_secs must be >= 1"));
    }
    Ok(())
}

pub fn resolve_config_path(project_root: &Path) -> PathBuf {
    env_string("SDPACK_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| project_root.join(CONFIG_FILE_NAME))
}

fn merge_file_config(path: &Path) -> Result<SdPackConfig> {
    if !path.exists() {
        return Ok(SdPackConfig::default());
    }
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str::<SdPackConfig>(&raw)
        .map_err(|err| invalid(format!("failed to parse {}: {err}", path.display())))
}

fn apply_env_overrides(cfg: &mut SdPackConfig) {
    if let Some(id) = env_string("SDPACK_PLUGIN_ID") {
        cfg.plugin.id = id;
    }
    if let Some(dir) = env_string("SDPACK_PLUGIN_DIR") {
        cfg.plugin.dir = Some(dir);
    }
    if let Some(bin) = env_string("SDPACK_ZIP_BIN") {
        cfg.pack.zip_bin = bin;
    }
    if let Some(bin) = env_string("SDPACK_CONVERTER_BIN") {
        cfg.icons.converter_bin = bin;
    }
    if let Some(lang) = env_string("SDPACK_FALLBACK_LANGUAGE") {
        cfg.i18n.fallback_language = lang;
    }
    cfg.i18n.languages = env_or_csv("SDPACK_LANGUAGES", &cfg.i18n.languages);
    cfg.command_timeout_secs =
        env_or_u64("SDPACK_COMMAND_TIMEOUT_SECS", cfg.command_timeout_secs);
}

/// Defaults, then `sdpack.toml`, then `SDPACK_*` environment overrides.
pub fn load_config(project_root: &Path) -> Result<SdPackConfig> {
    let mut cfg = merge_file_config(&resolve_config_path(project_root))?;
    apply_env_overrides(&mut cfg);
    validate(&cfg)?;
    Ok(cfg)
}
