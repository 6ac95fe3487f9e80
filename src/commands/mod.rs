pub mod build;
pub mod config;
pub mod i18n;
pub mod icons;
pub mod link;
pub mod pack;

use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::plugin::config::{SdPackConfig, load_config};
use crate::plugin::paths::{ProjectPaths, resolve_paths, resolve_project_root};

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub issues: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }
}

/// Configuration and layout shared by every command.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub config_path: PathBuf,
    pub config: SdPackConfig,
    pub paths: ProjectPaths,
}

pub fn load_project(project_dir: Option<&Path>) -> Result<ProjectContext> {
    let root = resolve_project_root(project_dir)?;
    let config = load_config(&root)?;
    let paths = resolve_paths(&root, &config);
    Ok(ProjectContext {
        config_path: crate::plugin::config::resolve_config_path(&root),
        config,
        paths,
    })
}
